//! sizefit CLI - target-size image compression tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod backend;
mod commands;

/// Compress images toward a byte-size target, by percentage level, or
/// convert between formats.
#[derive(Parser)]
#[command(name = "sizefit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (per-trial progress)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress images toward a target byte size
    Fit {
        /// Input image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target size, e.g. 500KB, 2MB, or a bare byte count
        #[arg(short, long)]
        target: String,

        /// Output format (jpeg, png, webp, gif); defaults to the input's
        #[arg(short, long)]
        format: Option<String>,

        /// Output directory (defaults to each input's directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Write a JSON search report (single input only)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the trial table as CSV (single input only)
        #[arg(long)]
        trials: Option<PathBuf>,
    },

    /// Compress an image by percentage level
    Compress {
        /// Input image file
        input: PathBuf,

        /// Compression level in percent (10-90, higher = smaller file)
        #[arg(short, long, default_value = "70")]
        level: u8,

        /// Output file (defaults to <stem>_compressed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an image to another format
    Convert {
        /// Input image file
        input: PathBuf,

        /// Target format: jpeg, png, webp, gif
        #[arg(short, long)]
        format: String,

        /// Output file (defaults to <stem>.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fit {
            inputs,
            target,
            format,
            out_dir,
            report,
            trials,
        } => commands::fit::run(
            &inputs,
            &target,
            format.as_deref(),
            out_dir.as_deref(),
            report.as_deref(),
            trials.as_deref(),
            cli.verbose,
        ),
        Commands::Compress { input, level, output } => {
            commands::compress::run(&input, level, output.as_deref())
        }
        Commands::Convert { input, format, output } => {
            commands::convert::run(&input, &format, output.as_deref())
        }
    }
}
