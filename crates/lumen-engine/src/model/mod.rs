//! glTF models as lists of meshes.

mod cache;
mod error;
mod loader;

use std::path::Path;

use glam::Vec3;

use crate::gl::Gl;
use crate::mesh::Mesh;
use crate::shader::Program;

pub use cache::TextureCache;
pub use error::ModelError;

/// Meshes loaded from one file, drawn together.
#[derive(Debug)]
pub struct Model {
    meshes: Vec<Mesh>,
}

impl Model {
    pub fn load(gl: &Gl, path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::load_with_cache(gl, path, &mut TextureCache::new())
    }

    /// Loads through `cache` so textures already loaded for other models are reused.
    pub fn load_with_cache(gl: &Gl, path: impl AsRef<Path>, cache: &mut TextureCache) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let meshes = loader::load_meshes(gl, path, cache)?;
        log::info!("loaded model `{}` ({} meshes)", path.display(), meshes.len());
        Ok(Self { meshes })
    }

    pub fn from_meshes(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    pub fn draw(&self, program: &Program) {
        for mesh in &self.meshes {
            mesh.draw(program);
        }
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Axis-aligned bounds of every vertex, or `None` for an empty model.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.vertices())
            .map(|v| v.position)
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::gl::PrimitiveMode;
    use crate::mesh::primitives;
    use crate::shader::ShaderSources;

    /// One triangle at (0,0,0) (1,0,0) (0,1,0) under a node translated +2 on Y.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [0.0, 2.0, 0.0] } ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
        "buffers": [ {
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-model-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_embedded_triangle_with_node_transform() {
        let rec = RecordingGl::new();
        let path = write_fixture("triangle.gltf", TRIANGLE_GLTF);

        let model = Model::load(&rec.handle(), &path).unwrap();

        assert_eq!(model.meshes().len(), 1);
        let mesh = &model.meshes()[0];
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert!(mesh.textures().is_empty());
        assert_eq!(mesh.vertices()[2].position, Vec3::new(0.0, 3.0, 0.0));

        let (min, max) = model.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let rec = RecordingGl::new();
        let err = Model::load(&rec.handle(), "no/such/model.gltf").unwrap_err();
        assert!(matches!(err, ModelError::Import { .. }));
    }

    #[test]
    fn draw_issues_one_draw_per_mesh() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let program = Program::new(&gl, &ShaderSources::new("#version 330 core", "#version 330 core"));

        let (cube_v, cube_i) = primitives::cube();
        let (plane_v, plane_i) = primitives::plane(5.0, -0.5, 2.0);
        let model = Model::from_meshes(vec![
            Mesh::new(&gl, cube_v, cube_i, vec![]).unwrap(),
            Mesh::new(&gl, plane_v, plane_i, vec![]).unwrap(),
        ]);
        rec.clear_calls();

        model.draw(&program);

        let counts: Vec<i32> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DrawElements { mode: PrimitiveMode::Triangles, count, .. } => Some(count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![36, 6]);
    }

    #[test]
    fn empty_model_has_no_bounds() {
        assert!(Model::from_meshes(vec![]).bounds().is_none());
    }
}
