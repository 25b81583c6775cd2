use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::texture::Texture2d;

use super::error::MeshError;

/// Prefix shared by every sampler a mesh binds.
pub const MATERIAL_PREFIX: &str = "material.";

/// Semantic role of a texture within a material.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
    /// A tag with no numbering rule. Its sampler name carries no suffix.
    Other(String),
}

impl TextureKind {
    /// Lenient parse: unrecognized tags become [`TextureKind::Other`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| TextureKind::Other(tag.to_string()))
    }

    pub fn tag(&self) -> &str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
            TextureKind::Other(tag) => tag,
        }
    }

    fn counter_slot(&self) -> Option<usize> {
        match self {
            TextureKind::Diffuse => Some(0),
            TextureKind::Specular => Some(1),
            TextureKind::Normal => Some(2),
            TextureKind::Height => Some(3),
            TextureKind::Other(_) => None,
        }
    }
}

/// Strict parse: only the four numbered tags are accepted.
impl FromStr for TextureKind {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "texture_diffuse" => Ok(TextureKind::Diffuse),
            "texture_specular" => Ok(TextureKind::Specular),
            "texture_normal" => Ok(TextureKind::Normal),
            "texture_height" => Ok(TextureKind::Height),
            other => Err(MeshError::UnknownTextureTag(other.to_string())),
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A texture bound by a mesh, with its role and the path it came from.
#[derive(Debug, Clone)]
pub struct MaterialTexture {
    pub texture: Rc<Texture2d>,
    pub kind: TextureKind,
    pub path: String,
}

impl MaterialTexture {
    pub fn new(texture: Rc<Texture2d>, kind: TextureKind, path: impl Into<String>) -> Self {
        Self {
            texture,
            kind,
            path: path.into(),
        }
    }
}

/// Sampler uniform name for each texture, in order.
///
/// Each of the four numbered kinds counts from 1 independently, so
/// diffuse, specular, diffuse yields `material.texture_diffuse1`,
/// `material.texture_specular1`, `material.texture_diffuse2`.
/// `Other` kinds get no number and may repeat.
pub fn sampler_uniform_names<'a>(kinds: impl IntoIterator<Item = &'a TextureKind>) -> Vec<String> {
    let mut counters = [0u32; 4];

    kinds
        .into_iter()
        .map(|kind| match kind.counter_slot() {
            Some(slot) => {
                counters[slot] += 1;
                format!("{MATERIAL_PREFIX}{}{}", kind.tag(), counters[slot])
            }
            None => format!("{MATERIAL_PREFIX}{}", kind.tag()),
        })
        .collect()
}

/// First pair of textures that would bind the same sampler name.
pub(crate) fn first_collision(names: &[String]) -> Option<MeshError> {
    names.iter().enumerate().find_map(|(second, name)| {
        names[..second]
            .iter()
            .position(|earlier| earlier == name)
            .map(|first| MeshError::SamplerCollision {
                name: name.clone(),
                first,
                second,
            })
    })
}
