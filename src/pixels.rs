//! Decoded pixel buffers passed across the codec callback seam.
//!
//! The search engine never inspects pixel content; it only forwards buffers
//! to the caller-provided encode and resample callbacks. Buffers are
//! read-only to the engine, so one decoded source can back any number of
//! concurrent requests.

use imgref::ImgVec;
use rgb::{RGB8, RGBA8};

/// Decoded image data accepted by the engine and its codec callbacks.
///
/// Supports both `imgref::ImgVec` types and raw slices for flexibility.
#[derive(Clone)]
pub enum PixelBuffer {
    /// RGB8 image using imgref.
    Rgb8(ImgVec<RGB8>),

    /// RGBA8 image using imgref.
    Rgba8(ImgVec<RGBA8>),

    /// RGB8 raw slice with dimensions.
    RgbSlice {
        /// Pixel data in row-major order.
        data: Vec<u8>,
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },

    /// RGBA8 raw slice with dimensions.
    RgbaSlice {
        /// Pixel data in row-major order.
        data: Vec<u8>,
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
}

impl PixelBuffer {
    /// Get image width.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Rgb8(img) => img.width(),
            Self::Rgba8(img) => img.width(),
            Self::RgbSlice { width, .. } => *width,
            Self::RgbaSlice { width, .. } => *width,
        }
    }

    /// Get image height.
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Self::Rgb8(img) => img.height(),
            Self::Rgba8(img) => img.height(),
            Self::RgbSlice { height, .. } => *height,
            Self::RgbaSlice { height, .. } => *height,
        }
    }

    /// Total pixel count.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Convert to RGB8 slice representation, dropping any alpha channel.
    #[must_use]
    pub fn to_rgb8_vec(&self) -> Vec<u8> {
        match self {
            Self::Rgb8(img) => img.pixels().flat_map(|p| [p.r, p.g, p.b]).collect(),
            Self::Rgba8(img) => img.pixels().flat_map(|p| [p.r, p.g, p.b]).collect(),
            Self::RgbSlice { data, .. } => data.clone(),
            Self::RgbaSlice { data, width, height } => {
                let mut rgb = Vec::with_capacity(width * height * 3);
                for chunk in data.chunks_exact(4) {
                    rgb.push(chunk[0]);
                    rgb.push(chunk[1]);
                    rgb.push(chunk[2]);
                }
                rgb
            }
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::Rgb8(_) => "Rgb8",
            Self::Rgba8(_) => "Rgba8",
            Self::RgbSlice { .. } => "RgbSlice",
            Self::RgbaSlice { .. } => "RgbaSlice",
        };
        write!(f, "PixelBuffer::{}({}x{})", variant, self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_dimensions() {
        let buf = PixelBuffer::RgbSlice {
            data: vec![0; 100 * 50 * 3],
            width: 100,
            height: 50,
        };
        assert_eq!(buf.width(), 100);
        assert_eq!(buf.height(), 50);
        assert_eq!(buf.pixel_count(), 5000);
    }

    #[test]
    fn test_rgba_to_rgb8_drops_alpha() {
        let buf = PixelBuffer::RgbaSlice {
            data: vec![10, 20, 30, 255, 40, 50, 60, 128],
            width: 2,
            height: 1,
        };
        assert_eq!(buf.to_rgb8_vec(), vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_imgref_roundtrip() {
        let pixels = vec![RGB8::new(1, 2, 3); 6];
        let buf = PixelBuffer::Rgb8(ImgVec::new(pixels, 3, 2));
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.to_rgb8_vec()[..3], [1, 2, 3]);
    }
}
