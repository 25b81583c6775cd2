use std::path::PathBuf;

use thiserror::Error;

use crate::mesh::MeshError;
use crate::texture::TextureError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to import model `{}`", path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model `{}` contains no triangle geometry", path.display())]
    Empty { path: PathBuf },

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}
