//! Image-crate-backed codec callbacks.
//!
//! The library is codec-agnostic; this module binds its callback seam to
//! the `image` crate. JPEG is the only format here whose encoder exposes a
//! quality knob; PNG, WebP, and GIF encodes are lossless or palette-based
//! and ignore it.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage, imageops};

use sizefit::{Codec, DecodeFn, EncodeFn, Error, MimeFamily, PixelBuffer, ResampleFn, Result};

/// Build a [`Codec`] with decode, encode, and resample all backed by the
/// `image` crate.
pub fn image_codec() -> Codec {
    let encode: EncodeFn = Box::new(|pixels, mime, quality| encode_pixels(pixels, mime, quality));
    let resample: ResampleFn = Box::new(|pixels, scale| resample_pixels(pixels, scale));
    let decode: DecodeFn = Box::new(|bytes| decode_pixels(bytes));
    Codec::new(encode, resample).with_decode(decode)
}

/// Decode encoded bytes into an RGB8 pixel buffer.
pub fn decode_pixels(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::DecodeFailed {
        reason: e.to_string(),
    })?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(PixelBuffer::RgbSlice {
        data: rgb.into_raw(),
        width: width as usize,
        height: height as usize,
    })
}

fn encode_pixels(pixels: &PixelBuffer, mime: MimeFamily, quality: f64) -> Result<Vec<u8>> {
    let img = DynamicImage::ImageRgb8(to_rgb_image(pixels));
    let mut cursor = Cursor::new(Vec::new());
    match mime {
        MimeFamily::Jpeg => {
            let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
            img.write_with_encoder(encoder).map_err(codec_err)?;
        }
        MimeFamily::Png => img.write_to(&mut cursor, ImageFormat::Png).map_err(codec_err)?,
        MimeFamily::WebP => img.write_to(&mut cursor, ImageFormat::WebP).map_err(codec_err)?,
        MimeFamily::Gif => img.write_to(&mut cursor, ImageFormat::Gif).map_err(codec_err)?,
    }
    Ok(cursor.into_inner())
}

fn resample_pixels(pixels: &PixelBuffer, scale: f64) -> PixelBuffer {
    let width = (((pixels.width() as f64) * scale).floor() as u32).max(1);
    let height = (((pixels.height() as f64) * scale).floor() as u32).max(1);
    let resized = imageops::resize(&to_rgb_image(pixels), width, height, FilterType::Triangle);
    PixelBuffer::RgbSlice {
        data: resized.into_raw(),
        width: width as usize,
        height: height as usize,
    }
}

fn to_rgb_image(pixels: &PixelBuffer) -> RgbImage {
    RgbImage::from_raw(
        pixels.width() as u32,
        pixels.height() as u32,
        pixels.to_rgb8_vec(),
    )
    .expect("pixel buffer length matches its dimensions")
}

fn codec_err(e: image::ImageError) -> Error {
    Error::Codec(e.to_string())
}
