use crate::gl::{
    BufferHandle, BufferTarget, BufferUsage, Gl, GraphicsApi, PrimitiveMode, TextureTarget,
    VertexArrayHandle,
};
use crate::shader::Program;

use super::error::MeshError;
use super::material::{first_collision, sampler_uniform_names, MaterialTexture, TextureKind};
use super::vertex::Vertex;

/// Indexed triangle geometry plus the textures it samples.
///
/// Vertex and index data are uploaded once at construction into one vertex
/// array, one vertex buffer and one element buffer, all released on drop.
pub struct Mesh {
    gl: Gl,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<MaterialTexture>,
    sampler_names: Vec<String>,
    vao: VertexArrayHandle,
    vbo: BufferHandle,
    ebo: BufferHandle,
}

impl Mesh {
    pub fn new(
        gl: &Gl,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<MaterialTexture>,
    ) -> Result<Self, MeshError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        if i32::try_from(indices.len()).is_err() {
            return Err(MeshError::TooManyIndices(indices.len()));
        }

        for texture in &textures {
            if let TextureKind::Other(tag) = &texture.kind {
                log::warn!(
                    "texture `{}` has unnumbered tag `{tag}`; its sampler name may collide",
                    texture.path
                );
            }
        }
        let sampler_names = sampler_uniform_names(textures.iter().map(|t| &t.kind));

        let api: &dyn GraphicsApi = gl.as_ref();
        let (vao, vbo, ebo) = create_objects(api)?;

        api.bind_vertex_array(Some(vao));

        api.bind_buffer(BufferTarget::Vertex, Some(vbo));
        api.buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(&vertices), BufferUsage::StaticDraw);

        // The element buffer binding is recorded in the vertex array.
        api.bind_buffer(BufferTarget::Index, Some(ebo));
        api.buffer_data(BufferTarget::Index, bytemuck::cast_slice(&indices), BufferUsage::StaticDraw);

        for attribute in &Vertex::ATTRIBUTES {
            api.enable_vertex_attrib(attribute.location);
            api.vertex_attrib_pointer(attribute, Vertex::STRIDE);
        }

        api.bind_vertex_array(None);

        Ok(Self {
            gl: gl.clone(),
            vertices,
            indices,
            textures,
            sampler_names,
            vao,
            vbo,
            ebo,
        })
    }

    /// Binds every texture and draws the triangles with `program`.
    ///
    /// Texture `i` goes to unit `i` and its sampler uniform is set to `i`.
    /// `program` must already be current. Afterwards no vertex array is bound
    /// and unit 0 is active again.
    pub fn draw(&self, program: &Program) {
        for (unit, (texture, name)) in (0u32..).zip(self.textures.iter().zip(&self.sampler_names)) {
            self.gl.active_texture(unit);
            program.set_int(name, unit as i32);
            self.gl
                .bind_texture(TextureTarget::Texture2d, Some(texture.texture.handle()));
        }

        self.gl.bind_vertex_array(Some(self.vao));
        // Length checked against i32 at construction.
        self.gl
            .draw_elements(PrimitiveMode::Triangles, self.indices.len() as i32, 0);
        self.gl.bind_vertex_array(None);

        self.gl.active_texture(0);
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[MaterialTexture] {
        &self.textures
    }

    /// Sampler uniform names in texture order.
    pub fn sampler_names(&self) -> &[String] {
        &self.sampler_names
    }

    /// Fails if two textures would write the same sampler uniform.
    pub fn check_sampler_names(&self) -> Result<(), MeshError> {
        match first_collision(&self.sampler_names) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vao);
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_buffer(self.ebo);
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("samplers", &self.sampler_names)
            .field("vao", &self.vao)
            .finish()
    }
}

/// Creates the three objects, releasing any already created if one fails.
fn create_objects(api: &dyn GraphicsApi) -> Result<(VertexArrayHandle, BufferHandle, BufferHandle), MeshError> {
    let vao = api
        .create_vertex_array()
        .map_err(|reason| MeshError::Create { object: "vertex array", reason })?;

    let vbo = match api.create_buffer() {
        Ok(vbo) => vbo,
        Err(reason) => {
            api.delete_vertex_array(vao);
            return Err(MeshError::Create { object: "vertex buffer", reason });
        }
    };

    let ebo = match api.create_buffer() {
        Ok(ebo) => ebo,
        Err(reason) => {
            api.delete_buffer(vbo);
            api.delete_vertex_array(vao);
            return Err(MeshError::Create { object: "element buffer", reason });
        }
    };

    Ok((vao, vbo, ebo))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::{Vec2, Vec3};

    use super::*;
    use crate::gl::recording::{Call, RecordingGl};
    use crate::gl::AttribKind;
    use crate::shader::ShaderSources;
    use crate::texture::Texture2d;

    const VS: &str = "#version 330 core\nvoid main() {}";
    const FS: &str = "#version 330 core\nuniform sampler2D texture_diffuse1;\nuniform sampler2D texture_specular1;\nuniform sampler2D texture_diffuse2;\nvoid main() {}";

    fn triangle() -> (Vec<Vertex>, Vec<u32>) {
        let v = |x, y| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Vec2::new(x, y));
        (vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], vec![0, 1, 2])
    }

    fn texture(gl: &Gl, kind: TextureKind) -> MaterialTexture {
        let tex = Texture2d::solid(gl, [255, 255, 255, 255]).unwrap();
        MaterialTexture::new(Rc::new(tex), kind, "mem")
    }

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn construction_uploads_once_and_describes_seven_attributes() {
        let rec = RecordingGl::new();
        let (vertices, indices) = triangle();

        let _mesh = Mesh::new(&rec.handle(), vertices, indices, vec![]).unwrap();

        assert!(rec.calls().contains(&Call::BufferData { target: BufferTarget::Vertex, len: 3 * 88 }));
        assert!(rec.calls().contains(&Call::BufferData { target: BufferTarget::Index, len: 3 * 4 }));

        let attributes: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AttribPointer { attribute, stride } => Some((attribute, stride)),
                _ => None,
            })
            .collect();
        assert_eq!(attributes.len(), 7);
        assert!(attributes.iter().all(|(_, stride)| *stride == 88));
        assert_eq!(attributes[5].0.kind, AttribKind::Int);
        assert_eq!(rec.count(|c| matches!(c, Call::EnableAttrib(_))), 7);

        assert_eq!(rec.calls().last(), Some(&Call::BindVertexArray(None)));
    }

    #[test]
    fn out_of_range_index_is_rejected_before_upload() {
        let rec = RecordingGl::new();
        let (vertices, _) = triangle();

        let err = Mesh::new(&rec.handle(), vertices, vec![0, 1, 3], vec![]).unwrap_err();

        assert!(matches!(err, MeshError::IndexOutOfRange { index: 3, vertex_count: 3 }));
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn empty_mesh_is_allowed() {
        let rec = RecordingGl::new();
        let mesh = Mesh::new(&rec.handle(), vec![], vec![], vec![]).unwrap();
        assert_eq!(mesh.index_count(), 0);
    }

    // ── drawing ──────────────────────────────────────────────────────────

    #[test]
    fn untextured_triangle_draws_once_and_resets_state() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let program = Program::new(&gl, &ShaderSources::new(VS, FS));
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&gl, vertices, indices, vec![]).unwrap();
        rec.clear_calls();

        mesh.draw(&program);

        let calls = rec.calls();
        assert_eq!(
            calls,
            vec![
                Call::BindVertexArray(Some(mesh.vao)),
                Call::DrawElements { mode: PrimitiveMode::Triangles, count: 3, byte_offset: 0 },
                Call::BindVertexArray(None),
                Call::ActiveTexture(0),
            ]
        );
        assert_eq!(rec.count(|c| matches!(c, Call::BindTexture(..))), 0);
    }

    #[test]
    fn draw_count_matches_index_count() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let program = Program::new(&gl, &ShaderSources::new(VS, FS));
        let (vertices, _) = triangle();
        let indices = vec![0, 1, 2, 2, 1, 0, 0, 2, 1];
        let mesh = Mesh::new(&gl, vertices, indices, vec![]).unwrap();
        rec.clear_calls();

        mesh.draw(&program);

        let draws: Vec<_> = rec
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::DrawElements { .. } | Call::DrawArrays { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![Call::DrawElements { mode: PrimitiveMode::Triangles, count: 9, byte_offset: 0 }]
        );
    }

    #[test]
    fn textures_bind_to_sequential_units_with_numbered_samplers() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let program = Program::new(&gl, &ShaderSources::new(VS, FS));
        program.use_program();

        let textures = vec![
            texture(&gl, TextureKind::Diffuse),
            texture(&gl, TextureKind::Specular),
            texture(&gl, TextureKind::Diffuse),
        ];
        let handles: Vec<_> = textures.iter().map(|t| t.texture.handle()).collect();
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&gl, vertices, indices, textures).unwrap();
        assert_eq!(
            mesh.sampler_names(),
            &[
                "material.texture_diffuse1",
                "material.texture_specular1",
                "material.texture_diffuse2",
            ]
        );
        rec.clear_calls();

        mesh.draw(&program);

        let units: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ActiveTexture(unit) => Some(unit),
                _ => None,
            })
            .collect();
        assert_eq!(units, vec![0, 1, 2, 0]);

        let bound: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BindTexture(TextureTarget::Texture2d, Some(h)) => Some(h),
                _ => None,
            })
            .collect();
        assert_eq!(bound, handles);

        let samplers: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetUniform(_, crate::gl::UniformValue::Int(i)) => Some(i),
                _ => None,
            })
            .collect();
        assert_eq!(samplers, vec![0, 1, 2]);
        assert_eq!(rec.calls().last(), Some(&Call::ActiveTexture(0)));
    }

    #[test]
    fn collision_check_flags_unknown_tags() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let (vertices, indices) = triangle();
        let textures = vec![
            texture(&gl, TextureKind::from_tag("texture_emissive")),
            texture(&gl, TextureKind::from_tag("texture_emissive")),
        ];

        let mesh = Mesh::new(&gl, vertices, indices, textures).unwrap();

        assert!(matches!(
            mesh.check_sampler_names(),
            Err(MeshError::SamplerCollision { first: 0, second: 1, .. })
        ));
    }

    #[test]
    fn unknown_tags_share_one_sampler_and_still_draw_once() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let fs = "#version 330 core\nuniform sampler2D texture_emissive;\nvoid main() {}";
        let program = Program::new(&gl, &ShaderSources::new(VS, fs));
        program.use_program();

        let textures = vec![
            texture(&gl, TextureKind::Other("texture_emissive".to_string())),
            texture(&gl, TextureKind::Other("texture_emissive".to_string())),
        ];
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&gl, vertices, indices, textures).unwrap();
        assert_eq!(mesh.sampler_names(), &["material.texture_emissive", "material.texture_emissive"]);
        rec.clear_calls();

        mesh.draw(&program);

        let units: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ActiveTexture(unit) => Some(unit),
                _ => None,
            })
            .collect();
        assert_eq!(units, vec![0, 1, 0]);

        let writes: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetUniform(location, crate::gl::UniformValue::Int(i)) => Some((location, i)),
                _ => None,
            })
            .collect();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].0, writes[1].0);
        assert_eq!((writes[0].1, writes[1].1), (0, 1));

        assert_eq!(rec.count(|c| matches!(c, Call::DrawElements { count: 3, .. })), 1);
        assert_eq!(rec.calls().last(), Some(&Call::ActiveTexture(0)));
    }

    // ── lifetime ─────────────────────────────────────────────────────────

    #[test]
    fn drop_releases_vertex_array_and_both_buffers() {
        let rec = RecordingGl::new();
        let (vertices, indices) = triangle();
        let mesh = Mesh::new(&rec.handle(), vertices, indices, vec![]).unwrap();
        let (vao, vbo, ebo) = (mesh.vao, mesh.vbo, mesh.ebo);
        rec.clear_calls();

        drop(mesh);

        assert_eq!(
            rec.calls(),
            vec![Call::DeleteVertexArray(vao), Call::DeleteBuffer(vbo), Call::DeleteBuffer(ebo)]
        );
    }

    #[test]
    fn shared_texture_outlives_first_mesh() {
        let rec = RecordingGl::new();
        let gl = rec.handle();
        let shared = texture(&gl, TextureKind::Diffuse);
        let (vertices, indices) = triangle();

        let a = Mesh::new(&gl, vertices.clone(), indices.clone(), vec![shared.clone()]).unwrap();
        let b = Mesh::new(&gl, vertices, indices, vec![shared.clone()]).unwrap();
        drop(shared);
        drop(a);

        assert_eq!(rec.count(|c| matches!(c, Call::DeleteTexture(_))), 0);
        drop(b);
        assert_eq!(rec.count(|c| matches!(c, Call::DeleteTexture(_))), 1);
    }
}
