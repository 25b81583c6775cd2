use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load image `{}`", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image `{label}` has unsupported dimensions {width}x{height}")]
    UnsupportedDimensions { label: String, width: u32, height: u32 },

    #[error("cube map face {face} is {width}x{height}, expected {expected_width}x{expected_height}")]
    FaceSizeMismatch {
        face: usize,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("driver refused to create a texture: {0}")]
    Create(String),
}
