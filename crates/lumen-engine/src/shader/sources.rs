use std::fs;
use std::path::Path;

use crate::gl::ShaderStage;

use super::error::ShaderError;

/// GLSL text for every stage of one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    /// Used only to label log output.
    pub name: String,
    pub vertex: String,
    pub fragment: String,
    pub geometry: Option<String>,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            name: "program".to_string(),
            vertex: vertex.into(),
            fragment: fragment.into(),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reads each stage from disk. The program name is the vertex file stem.
    pub fn from_files(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
        geometry: Option<&Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = vertex.as_ref();
        let name = vertex
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string());

        let mut sources = Self::new(
            read_stage(ShaderStage::Vertex, vertex)?,
            read_stage(ShaderStage::Fragment, fragment.as_ref())?,
        )
        .with_name(name);

        if let Some(path) = geometry {
            sources.geometry = Some(read_stage(ShaderStage::Geometry, path)?);
        }

        Ok(sources)
    }

    /// Stages in attach order.
    pub(crate) fn stages(&self) -> impl Iterator<Item = (ShaderStage, &str)> {
        [
            Some((ShaderStage::Vertex, self.vertex.as_str())),
            Some((ShaderStage::Fragment, self.fragment.as_str())),
            self.geometry.as_deref().map(|g| (ShaderStage::Geometry, g)),
        ]
        .into_iter()
        .flatten()
    }
}

fn read_stage(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Read {
        stage: stage.label(),
        path: path.to_path_buf(),
        source,
    })
}
