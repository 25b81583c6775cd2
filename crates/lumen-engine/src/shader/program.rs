use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::gl::{Gl, GraphicsApi, ProgramHandle, ShaderHandle, ShaderStage, UniformLocation, UniformValue};

use super::error::{DiagnosticSource, ShaderDiagnostic, ShaderError};
use super::sources::ShaderSources;

/// Upper bound on a stored driver info log, in bytes.
const INFO_LOG_LIMIT: usize = 1024;

/// A linked GPU program with name-indexed uniform setters.
///
/// Construction never fails. If any stage fails to compile or the link fails,
/// every diagnostic is logged and the program becomes inert: `use_program`
/// unbinds, and setters do nothing. Callers that prefer a hard error use
/// [`Program::into_linked`].
///
/// Uniform locations are resolved on first use and cached, misses included,
/// so an absent uniform costs exactly one driver lookup.
pub struct Program {
    gl: Gl,
    name: String,
    handle: Option<ProgramHandle>,
    diagnostics: Vec<ShaderDiagnostic>,
    locations: RefCell<HashMap<String, Option<UniformLocation>>>,
}

impl Program {
    pub fn new(gl: &Gl, sources: &ShaderSources) -> Self {
        let api: &dyn GraphicsApi = gl.as_ref();
        let mut diagnostics = Vec::new();

        let mut shaders = Vec::new();
        let mut every_stage_created = true;
        for (stage, source) in sources.stages() {
            match compile_stage(api, &sources.name, stage, source, &mut diagnostics) {
                Some(shader) => shaders.push(shader),
                None => every_stage_created = false,
            }
        }

        // A missing stage must not link into a smaller program.
        let handle = if every_stage_created {
            link(api, &sources.name, &shaders, &mut diagnostics)
        } else {
            None
        };

        for shader in shaders {
            api.delete_shader(shader);
        }

        if handle.is_some() {
            log::debug!("program `{}` linked", sources.name);
        }

        Self {
            gl: gl.clone(),
            name: sources.name.clone(),
            handle,
            diagnostics,
            locations: RefCell::new(HashMap::new()),
        }
    }

    /// Reads the stage sources from disk and builds the program.
    ///
    /// Only unreadable files are reported as `Err`; build failures yield an
    /// inert program like [`Program::new`].
    pub fn from_files(
        gl: &Gl,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
        geometry: Option<&Path>,
    ) -> Result<Self, ShaderError> {
        let sources = ShaderSources::from_files(vertex, fragment, geometry)?;
        Ok(Self::new(gl, &sources))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_linked(&self) -> bool {
        self.handle.is_some()
    }

    /// Compile and link failures, in the order they happened.
    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    /// Returns the program if it linked, otherwise its diagnostics as an error.
    pub fn into_linked(mut self) -> Result<Self, ShaderError> {
        if self.is_linked() {
            return Ok(self);
        }
        Err(ShaderError::Build {
            name: std::mem::take(&mut self.name),
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }

    /// Makes this program current. An inert program unbinds instead.
    pub fn use_program(&self) {
        self.gl.use_program(self.handle);
    }

    /// Writes `value` to the uniform called `name` of the current program.
    ///
    /// The program must be current. Unknown names are ignored.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        if let Some(location) = self.location(name) {
            self.gl.set_uniform(location, &value.into());
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec2(&self, name: &str, value: Vec2) {
        self.set_uniform(name, value);
    }

    pub fn set_vec2_xy(&self, name: &str, x: f32, y: f32) {
        self.set_uniform(name, Vec2::new(x, y));
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        self.set_uniform(name, value);
    }

    pub fn set_vec3_xyz(&self, name: &str, x: f32, y: f32, z: f32) {
        self.set_uniform(name, Vec3::new(x, y, z));
    }

    pub fn set_vec4(&self, name: &str, value: Vec4) {
        self.set_uniform(name, value);
    }

    pub fn set_vec4_xyzw(&self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        self.set_uniform(name, Vec4::new(x, y, z, w));
    }

    pub fn set_mat2(&self, name: &str, value: &Mat2) {
        self.set_uniform(name, *value);
    }

    pub fn set_mat3(&self, name: &str, value: &Mat3) {
        self.set_uniform(name, *value);
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        self.set_uniform(name, *value);
    }

    fn location(&self, name: &str) -> Option<UniformLocation> {
        let handle = self.handle?;

        if let Some(cached) = self.locations.borrow().get(name) {
            return *cached;
        }

        let location = self.gl.uniform_location(handle, name);
        if location.is_none() {
            log::trace!("program `{}`: `{name}` is not an active uniform", self.name);
        }
        self.locations.borrow_mut().insert(name.to_owned(), location);
        location
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_program(handle);
        }
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

/// Compiles one stage. A shader object that failed to compile is still
/// returned so the link step reports on it too.
fn compile_stage(
    api: &dyn GraphicsApi,
    program: &str,
    stage: ShaderStage,
    source: &str,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> Option<ShaderHandle> {
    let from = DiagnosticSource::Stage(stage);

    let shader = match api.create_shader(stage) {
        Ok(shader) => shader,
        Err(reason) => {
            report(program, from, reason, diagnostics);
            return None;
        }
    };

    api.shader_source(shader, source);
    api.compile_shader(shader);
    if !api.shader_compile_status(shader) {
        report(program, from, api.shader_info_log(shader), diagnostics);
    }

    Some(shader)
}

fn link(
    api: &dyn GraphicsApi,
    program: &str,
    shaders: &[ShaderHandle],
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> Option<ProgramHandle> {
    let handle = match api.create_program() {
        Ok(handle) => handle,
        Err(reason) => {
            report(program, DiagnosticSource::Link, reason, diagnostics);
            return None;
        }
    };

    for &shader in shaders {
        api.attach_shader(handle, shader);
    }
    api.link_program(handle);
    for &shader in shaders {
        api.detach_shader(handle, shader);
    }

    if api.program_link_status(handle) {
        Some(handle)
    } else {
        report(program, DiagnosticSource::Link, api.program_info_log(handle), diagnostics);
        api.delete_program(handle);
        None
    }
}

fn report(program: &str, source: DiagnosticSource, log: String, diagnostics: &mut Vec<ShaderDiagnostic>) {
    let log = truncate_log(log);
    log::error!("program `{program}`: {} failed\n{}", source.label(), log.trim_end());
    diagnostics.push(ShaderDiagnostic { source, log });
}

fn truncate_log(mut log: String) -> String {
    if log.len() > INFO_LOG_LIMIT {
        let mut cut = INFO_LOG_LIMIT;
        while !log.is_char_boundary(cut) {
            cut -= 1;
        }
        log.truncate(cut);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingGl};

    const VS: &str = "#version 330 core\nuniform mat4 model;\nuniform mat4 view;\nvoid main() {}";
    const FS: &str = "#version 330 core\nuniform vec3 objectColor;\nvoid main() {}";
    const GS: &str = "#version 330 core\nlayout (triangles) in;\nuniform float magnitude;\nvoid main() {}";
    const BROKEN: &str = "void main() { oops }";

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn valid_sources_link_without_diagnostics() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS));

        assert!(program.is_linked());
        assert!(program.diagnostics().is_empty());
        assert_eq!(rec.count(|c| matches!(c, Call::CreateShader(..))), 2);
        assert_eq!(rec.count(|c| matches!(c, Call::LinkProgram(_))), 1);
    }

    #[test]
    fn shader_objects_are_deleted_after_link() {
        let rec = RecordingGl::new();
        let _program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS).with_geometry(GS));

        let created = rec.count(|c| matches!(c, Call::CreateShader(..)));
        let deleted = rec.count(|c| matches!(c, Call::DeleteShader(_)));
        assert_eq!(created, 3);
        assert_eq!(deleted, 3);

        let calls = rec.calls();
        let link = calls.iter().position(|c| matches!(c, Call::LinkProgram(_))).unwrap();
        let first_delete = calls.iter().position(|c| matches!(c, Call::DeleteShader(_))).unwrap();
        assert!(link < first_delete);
    }

    #[test]
    fn geometry_stage_is_compiled_when_present() {
        let rec = RecordingGl::new();
        let _program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS).with_geometry(GS));

        assert_eq!(
            rec.count(|c| matches!(c, Call::CreateShader(ShaderStage::Geometry, _))),
            1
        );
    }

    #[test]
    fn broken_fragment_yields_labelled_diagnostics_and_inert_program() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, BROKEN));

        assert!(!program.is_linked());
        let labels: Vec<_> = program.diagnostics().iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["FRAGMENT", "PROGRAM"]);
        assert!(program.diagnostics().iter().all(|d| !d.log.is_empty()));

        // The failed program object is released immediately.
        assert_eq!(rec.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }

    #[test]
    fn each_failing_stage_is_reported() {
        let rec = RecordingGl::new();
        let program = Program::new(
            &rec.handle(),
            &ShaderSources::new(BROKEN, FS).with_geometry(BROKEN),
        );

        let labels: Vec<_> = program.diagnostics().iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["VERTEX", "GEOMETRY", "PROGRAM"]);
    }

    #[test]
    fn stage_without_shader_object_leaves_program_inert() {
        let rec = RecordingGl::new();
        rec.refuse_shader_stage(ShaderStage::Geometry);

        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS).with_geometry(GS));

        let labels: Vec<_> = program.diagnostics().iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["GEOMETRY"]);
        assert!(!program.is_linked());
        assert_eq!(rec.count(|c| matches!(c, Call::LinkProgram(_))), 0);
        // The stages that were created are still released.
        assert_eq!(rec.count(|c| matches!(c, Call::DeleteShader(_))), 2);
        assert!(program.into_linked().is_err());
    }

    #[test]
    fn long_info_logs_are_truncated_on_a_char_boundary() {
        let log = "é".repeat(INFO_LOG_LIMIT);
        let cut = truncate_log(log);
        assert!(cut.len() <= INFO_LOG_LIMIT);
        assert!(cut.chars().all(|c| c == 'é'));

        assert_eq!(truncate_log("short".to_string()), "short");
    }

    #[test]
    fn into_linked_surfaces_diagnostics() {
        let rec = RecordingGl::new();
        let gl = rec.handle();

        assert!(Program::new(&gl, &ShaderSources::new(VS, FS)).into_linked().is_ok());

        let err = Program::new(&gl, &ShaderSources::new(BROKEN, FS).with_name("lamp"))
            .into_linked()
            .unwrap_err();
        match err {
            ShaderError::Build { name, diagnostics } => {
                assert_eq!(name, "lamp");
                assert_eq!(diagnostics[0].label(), "VERTEX");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── inert program ────────────────────────────────────────────────────

    #[test]
    fn inert_program_binds_nothing_and_ignores_setters() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(BROKEN, FS));
        rec.clear_calls();

        program.use_program();
        program.set_mat4("model", &Mat4::IDENTITY);
        program.set_vec3_xyz("objectColor", 1.0, 0.5, 0.31);
        drop(program);

        assert_eq!(rec.calls(), vec![Call::UseProgram(None)]);
    }

    // ── uniforms ─────────────────────────────────────────────────────────

    #[test]
    fn absent_uniform_is_looked_up_once_and_never_written() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS));
        rec.clear_calls();

        program.set_float("doesNotExist", 1.0);
        program.set_float("doesNotExist", 2.0);
        program.set_float("doesNotExist", 3.0);

        assert_eq!(rec.count(|c| matches!(c, Call::UniformLocation(..))), 1);
        assert_eq!(rec.count(|c| matches!(c, Call::SetUniform(..))), 0);
    }

    #[test]
    fn active_uniform_location_is_cached() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS));
        rec.clear_calls();

        program.set_vec3("objectColor", Vec3::new(1.0, 0.5, 0.31));
        program.set_vec3_xyz("objectColor", 0.0, 0.0, 0.0);

        assert_eq!(rec.count(|c| matches!(c, Call::UniformLocation(..))), 1);
        let values: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetUniform(_, v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![
                UniformValue::Vec3(Vec3::new(1.0, 0.5, 0.31)),
                UniformValue::Vec3(Vec3::ZERO),
            ]
        );
    }

    #[test]
    fn typed_setters_forward_matching_values() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS).with_geometry(GS));
        rec.clear_calls();

        program.set_bool("magnitude", true);
        program.set_int("magnitude", 3);
        program.set_vec2_xy("magnitude", 1.0, 2.0);
        program.set_vec4_xyzw("magnitude", 1.0, 2.0, 3.0, 4.0);
        program.set_mat3("magnitude", &Mat3::IDENTITY);

        let values: Vec<_> = rec
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetUniform(_, v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![
                UniformValue::Bool(true),
                UniformValue::Int(3),
                UniformValue::Vec2(Vec2::new(1.0, 2.0)),
                UniformValue::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)),
                UniformValue::Mat3(Mat3::IDENTITY),
            ]
        );
    }

    // ── lifetime ─────────────────────────────────────────────────────────

    #[test]
    fn drop_deletes_linked_program() {
        let rec = RecordingGl::new();
        let program = Program::new(&rec.handle(), &ShaderSources::new(VS, FS));
        rec.clear_calls();

        drop(program);

        assert_eq!(rec.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
    }
}
