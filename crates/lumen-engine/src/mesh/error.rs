use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("mesh has {0} indices, more than a single draw can address")]
    TooManyIndices(usize),

    #[error("unknown texture tag `{0}`")]
    UnknownTextureTag(String),

    #[error("textures {first} and {second} both bind sampler `{name}`")]
    SamplerCollision { name: String, first: usize, second: usize },

    #[error("driver refused to create a {object}: {reason}")]
    Create { object: &'static str, reason: String },
}
