//! Drawable indexed meshes and their material textures.

mod drawable;
mod error;
mod material;
pub mod primitives;
mod vertex;

pub use drawable::Mesh;
pub use error::MeshError;
pub use material::{sampler_uniform_names, MaterialTexture, TextureKind, MATERIAL_PREFIX};
pub use vertex::{Vertex, MAX_BONE_INFLUENCE};
