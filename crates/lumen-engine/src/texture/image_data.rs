use std::path::Path;

use image::DynamicImage;

use crate::gl::PixelFormat;

use super::error::TextureError;

/// Decoded 8-bit pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Decodes an image file, keeping its channel count where GL has a
    /// matching format (1..=4 channels). Deeper formats are reduced to 8 bits.
    pub fn load(path: impl AsRef<Path>, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let data = Self::from_dynamic(image, flip_vertically);
        data.validate(&path.display().to_string())?;
        Ok(data)
    }

    pub fn from_dynamic(image: DynamicImage, flip_vertically: bool) -> Self {
        let image = if flip_vertically { image.flipv() } else { image };
        let (width, height) = (image.width(), image.height());

        let (format, pixels) = match image.color().channel_count() {
            1 => (PixelFormat::Red, image.into_luma8().into_raw()),
            2 => (PixelFormat::Rg, image.into_luma_alpha8().into_raw()),
            3 => (PixelFormat::Rgb, image.into_rgb8().into_raw()),
            _ => (PixelFormat::Rgba, image.into_rgba8().into_raw()),
        };

        Self { width, height, format, pixels }
    }

    /// A single RGBA texel.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba,
            pixels: rgba.to_vec(),
        }
    }

    /// Bytes per row, without padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.channels()
    }

    /// Rejects images GL cannot address or whose buffer disagrees with its header.
    pub(crate) fn validate(&self, label: &str) -> Result<(), TextureError> {
        let addressable = self.width > 0
            && self.height > 0
            && i32::try_from(self.width).is_ok()
            && i32::try_from(self.height).is_ok();

        if !addressable || self.pixels.len() != self.row_bytes() * self.height as usize {
            return Err(TextureError::UnsupportedDimensions {
                label: label.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
