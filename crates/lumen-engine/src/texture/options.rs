use crate::gl::{TextureFilter, TextureWrap};

/// Sampling and decode settings for a 2D texture.
///
/// Mipmaps are generated exactly when `min_filter` samples them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureOptions {
    /// Flip rows on decode so the first row is the bottom of the image, as GL expects.
    pub flip_vertically: bool,
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl TextureOptions {
    /// Clamped, nearest-neighbour sampling. Crisp texels up close.
    pub fn pixelated() -> Self {
        Self {
            flip_vertically: true,
            wrap: TextureWrap::ClampToEdge,
            min_filter: TextureFilter::NearestMipmapNearest,
            mag_filter: TextureFilter::Nearest,
        }
    }

    /// Repeating, trilinear sampling.
    pub fn smooth() -> Self {
        Self {
            flip_vertically: true,
            wrap: TextureWrap::Repeat,
            min_filter: TextureFilter::LinearMipmapLinear,
            mag_filter: TextureFilter::Linear,
        }
    }

    pub fn with_flip(mut self, flip_vertically: bool) -> Self {
        self.flip_vertically = flip_vertically;
        self
    }

    pub fn with_wrap(mut self, wrap: TextureWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub(crate) fn wants_mipmaps(&self) -> bool {
        self.min_filter.uses_mipmaps()
    }
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self::smooth()
    }
}
