use std::path::Path;

use crate::gl::{
    Gl, GraphicsApi, ImageTarget, TextureFilter, TextureHandle, TextureParam, TextureTarget,
    TextureWrap,
};

use super::error::TextureError;
use super::image_data::ImageData;
use super::texture2d::upload;

/// Six-face cube texture, faces ordered +X, -X, +Y, -Y, +Z, -Z.
pub struct Cubemap {
    gl: Gl,
    handle: TextureHandle,
}

impl Cubemap {
    /// Loads the faces without flipping; cube map faces use a top-left origin.
    pub fn from_faces<P: AsRef<Path>>(gl: &Gl, faces: &[P; 6]) -> Result<Self, TextureError> {
        let mut images = Vec::with_capacity(6);
        for path in faces {
            images.push(ImageData::load(path, false)?);
        }
        Self::from_images(gl, &images)
    }

    pub fn from_images(gl: &Gl, faces: &[ImageData]) -> Result<Self, TextureError> {
        let Some(first) = faces.first() else {
            return Err(TextureError::UnsupportedDimensions {
                label: "cube map".to_string(),
                width: 0,
                height: 0,
            });
        };
        if faces.len() != 6 {
            return Err(TextureError::UnsupportedDimensions {
                label: format!("cube map with {} faces", faces.len()),
                width: first.width,
                height: first.height,
            });
        }

        for (face, image) in faces.iter().enumerate() {
            image.validate(&format!("cube map face {face}"))?;
            if (image.width, image.height) != (first.width, first.height) {
                return Err(TextureError::FaceSizeMismatch {
                    face,
                    width: image.width,
                    height: image.height,
                    expected_width: first.width,
                    expected_height: first.height,
                });
            }
        }

        let api: &dyn GraphicsApi = gl.as_ref();
        let handle = api.create_texture().map_err(TextureError::Create)?;
        let target = TextureTarget::CubeMap;

        api.bind_texture(target, Some(handle));
        for (face, image) in (0u8..).zip(faces) {
            upload(api, ImageTarget::CubeFace(face), image);
        }
        api.tex_parameter(target, TextureParam::MinFilter(TextureFilter::Linear));
        api.tex_parameter(target, TextureParam::MagFilter(TextureFilter::Linear));
        api.tex_parameter(target, TextureParam::WrapS(TextureWrap::ClampToEdge));
        api.tex_parameter(target, TextureParam::WrapT(TextureWrap::ClampToEdge));
        api.tex_parameter(target, TextureParam::WrapR(TextureWrap::ClampToEdge));
        api.bind_texture(target, None);

        Ok(Self { gl: gl.clone(), handle })
    }

    pub fn bind(&self, unit: u32) {
        self.gl.active_texture(unit);
        self.gl.bind_texture(TextureTarget::CubeMap, Some(self.handle));
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}

impl Drop for Cubemap {
    fn drop(&mut self) {
        self.gl.delete_texture(self.handle);
    }
}
