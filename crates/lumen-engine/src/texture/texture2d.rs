use std::path::Path;

use crate::gl::{Gl, GraphicsApi, ImageTarget, TextureHandle, TextureParam, TextureTarget};

use super::error::TextureError;
use super::image_data::ImageData;
use super::options::TextureOptions;

/// An immutable 2D texture. Released on drop.
///
/// Meshes share textures through `Rc<Texture2d>`.
pub struct Texture2d {
    gl: Gl,
    handle: TextureHandle,
    width: u32,
    height: u32,
}

impl Texture2d {
    pub fn from_path(gl: &Gl, path: impl AsRef<Path>, options: &TextureOptions) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = ImageData::load(path, options.flip_vertically)?;
        log::debug!(
            "loaded texture `{}` ({}x{}, {:?})",
            path.display(),
            image.width,
            image.height,
            image.format
        );
        Self::from_image(gl, &image, options)
    }

    pub fn from_image(gl: &Gl, image: &ImageData, options: &TextureOptions) -> Result<Self, TextureError> {
        image.validate("in-memory image")?;

        let api: &dyn GraphicsApi = gl.as_ref();
        let handle = api.create_texture().map_err(TextureError::Create)?;
        let target = TextureTarget::Texture2d;

        api.bind_texture(target, Some(handle));
        api.tex_parameter(target, TextureParam::WrapS(options.wrap));
        api.tex_parameter(target, TextureParam::WrapT(options.wrap));
        api.tex_parameter(target, TextureParam::MinFilter(options.min_filter));
        api.tex_parameter(target, TextureParam::MagFilter(options.mag_filter));
        upload(api, ImageTarget::Texture2d, image);
        if options.wants_mipmaps() {
            api.generate_mipmap(target);
        }
        api.bind_texture(target, None);

        Ok(Self {
            gl: gl.clone(),
            handle,
            width: image.width,
            height: image.height,
        })
    }

    /// 1x1 texture of one color. Stands in for assets that failed to load.
    pub fn solid(gl: &Gl, rgba: [u8; 4]) -> Result<Self, TextureError> {
        let options = TextureOptions::pixelated().with_flip(false);
        Self::from_image(gl, &ImageData::solid(rgba), &options)
    }

    /// Binds to texture unit `unit` and leaves that unit active.
    pub fn bind(&self, unit: u32) {
        self.gl.active_texture(unit);
        self.gl.bind_texture(TextureTarget::Texture2d, Some(self.handle));
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for Texture2d {
    fn drop(&mut self) {
        self.gl.delete_texture(self.handle);
    }
}

impl std::fmt::Debug for Texture2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2d")
            .field("handle", &self.handle)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Uploads one image. Tightly packed rows need byte alignment.
pub(super) fn upload(api: &dyn GraphicsApi, target: ImageTarget, image: &ImageData) {
    let alignment = if image.row_bytes() % 4 == 0 { 4 } else { 1 };
    api.set_unpack_alignment(alignment);
    // Dimensions were validated to fit in i32.
    api.tex_image_2d(
        target,
        image.width as i32,
        image.height as i32,
        image.format,
        &image.pixels,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::gl::{PixelFormat, TextureFilter, TextureWrap};

    fn rgb(width: u32, height: u32) -> ImageData {
        ImageData {
            width,
            height,
            format: PixelFormat::Rgb,
            pixels: vec![0; (width * height * 3) as usize],
        }
    }

    #[test]
    fn smooth_upload_sets_params_and_generates_mipmaps() {
        let rec = RecordingGl::new();
        let tex = Texture2d::from_image(&rec.handle(), &rgb(4, 2), &TextureOptions::smooth()).unwrap();

        assert_eq!(tex.size(), (4, 2));
        let calls = rec.calls();
        assert!(calls.contains(&Call::TexParameter(
            TextureTarget::Texture2d,
            TextureParam::WrapS(TextureWrap::Repeat)
        )));
        assert!(calls.contains(&Call::TexParameter(
            TextureTarget::Texture2d,
            TextureParam::MinFilter(TextureFilter::LinearMipmapLinear)
        )));
        assert!(calls.contains(&Call::TexImage {
            target: ImageTarget::Texture2d,
            width: 4,
            height: 2,
            format: PixelFormat::Rgb,
            len: 24,
        }));
        assert_eq!(rec.count(|c| matches!(c, Call::GenerateMipmap(_))), 1);
        assert_eq!(calls.last(), Some(&Call::BindTexture(TextureTarget::Texture2d, None)));
    }

    #[test]
    fn mipmaps_skipped_for_plain_filters() {
        let rec = RecordingGl::new();
        let options = TextureOptions {
            min_filter: TextureFilter::Linear,
            ..TextureOptions::smooth()
        };
        let _tex = Texture2d::from_image(&rec.handle(), &rgb(4, 4), &options).unwrap();

        assert_eq!(rec.count(|c| matches!(c, Call::GenerateMipmap(_))), 0);
    }

    #[test]
    fn odd_row_widths_use_byte_alignment() {
        let rec = RecordingGl::new();
        let _tex = Texture2d::from_image(&rec.handle(), &rgb(3, 3), &TextureOptions::smooth()).unwrap();
        assert!(rec.calls().contains(&Call::UnpackAlignment(1)));

        let rec = RecordingGl::new();
        let _tex = Texture2d::from_image(&rec.handle(), &rgb(4, 3), &TextureOptions::smooth()).unwrap();
        assert!(rec.calls().contains(&Call::UnpackAlignment(4)));
    }

    #[test]
    fn invalid_image_never_reaches_the_driver() {
        let rec = RecordingGl::new();
        let bad = ImageData { pixels: vec![0; 5], ..rgb(2, 2) };

        let err = Texture2d::from_image(&rec.handle(), &bad, &TextureOptions::smooth()).unwrap_err();

        assert!(matches!(err, TextureError::UnsupportedDimensions { .. }));
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn bind_selects_unit_then_binds() {
        let rec = RecordingGl::new();
        let tex = Texture2d::solid(&rec.handle(), [255, 255, 255, 255]).unwrap();
        rec.clear_calls();

        tex.bind(2);

        assert_eq!(
            rec.calls(),
            vec![
                Call::ActiveTexture(2),
                Call::BindTexture(TextureTarget::Texture2d, Some(tex.handle())),
            ]
        );
    }

    #[test]
    fn drop_releases_texture() {
        let rec = RecordingGl::new();
        let tex = Texture2d::solid(&rec.handle(), [0, 0, 0, 255]).unwrap();
        let handle = tex.handle();

        drop(tex);

        assert_eq!(rec.calls().last(), Some(&Call::DeleteTexture(handle)));
    }
}
