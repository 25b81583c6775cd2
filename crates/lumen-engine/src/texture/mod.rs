//! Image decoding and GPU texture owners.

mod cubemap;
mod error;
mod image_data;
mod options;
mod texture2d;

pub use cubemap::Cubemap;
pub use error::TextureError;
pub use image_data::ImageData;
pub use options::TextureOptions;
pub use texture2d::Texture2d;
