//! In-memory `GraphicsApi` that records every call.
//!
//! Compile and link outcomes are simulated so program construction can be
//! exercised without a driver:
//! - a shader compiles iff its source starts with `#version`
//! - a program links iff every attached shader compiled
//! - a uniform is active iff the last `.`-separated segment of its name occurs
//!   in one of the linked sources

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;

use super::api::{Gl, GraphicsApi};
use super::types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, ShaderHandle),
    CompileShader(ShaderHandle),
    DeleteShader(ShaderHandle),
    CreateProgram(ProgramHandle),
    AttachShader(ProgramHandle, ShaderHandle),
    DetachShader(ProgramHandle, ShaderHandle),
    LinkProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    UniformLocation(ProgramHandle, String),
    SetUniform(UniformLocation, UniformValue),
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(Option<VertexArrayHandle>),
    DeleteVertexArray(VertexArrayHandle),
    CreateBuffer(BufferHandle),
    BindBuffer(BufferTarget, Option<BufferHandle>),
    BufferData { target: BufferTarget, len: usize },
    DeleteBuffer(BufferHandle),
    EnableAttrib(u32),
    AttribPointer { attribute: VertexAttribute, stride: i32 },
    CreateTexture(TextureHandle),
    BindTexture(TextureTarget, Option<TextureHandle>),
    DeleteTexture(TextureHandle),
    ActiveTexture(u32),
    TexImage { target: ImageTarget, width: i32, height: i32, format: PixelFormat, len: usize },
    TexParameter(TextureTarget, TextureParam),
    GenerateMipmap(TextureTarget),
    UnpackAlignment(i32),
    DrawElements { mode: PrimitiveMode, count: i32, byte_offset: i32 },
    DrawArrays { mode: PrimitiveMode, first: i32, count: i32 },
    Capability(Capability, bool),
    DepthFunc(CompareFunc),
    DepthMask(bool),
    StencilFunc(CompareFunc, i32, u32),
    StencilOp(StencilAction, StencilAction, StencilAction),
    StencilMask(u32),
    PolygonMode(PolygonMode),
    ClearColor([f32; 4]),
    Clear(ClearFlags),
    Viewport(i32, i32, i32, i32),
}

#[derive(Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_name: Cell<u32>,
    shader_sources: RefCell<HashMap<ShaderHandle, String>>,
    attached: RefCell<HashMap<ProgramHandle, Vec<ShaderHandle>>>,
    linked_sources: RefCell<HashMap<ProgramHandle, Vec<String>>>,
    uniforms: RefCell<HashMap<(ProgramHandle, String), UniformLocation>>,
    refused_stages: RefCell<Vec<ShaderStage>>,
}

impl RecordingGl {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Upcasts to the shared handle the engine types expect.
    pub fn handle(self: &Rc<Self>) -> Gl {
        self.clone()
    }

    /// Makes `create_shader` fail for `stage`, as a driver out of objects would.
    pub fn refuse_shader_stage(&self, stage: ShaderStage) {
        self.refused_stages.borrow_mut().push(stage);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> NonZeroU32 {
        let n = self.next_name.get() + 1;
        self.next_name.set(n);
        NonZeroU32::MIN.saturating_add(n - 1)
    }

    fn compiled(&self, shader: ShaderHandle) -> bool {
        self.shader_sources
            .borrow()
            .get(&shader)
            .is_some_and(|s| s.trim_start().starts_with("#version"))
    }
}

impl GraphicsApi for RecordingGl {
    fn version_string(&self) -> String {
        "3.3 (recording)".to_string()
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        if self.refused_stages.borrow().contains(&stage) {
            return Err(format!("cannot create {stage:?} shader object"));
        }
        let h = ShaderHandle(self.next());
        self.push(Call::CreateShader(stage, h));
        Ok(h)
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        self.shader_sources.borrow_mut().insert(shader, source.to_string());
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        self.push(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.compiled(shader)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        if self.compiled(shader) {
            String::new()
        } else {
            "0:1(1): error: missing #version directive".to_string()
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.push(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        let h = ProgramHandle(self.next());
        self.push(Call::CreateProgram(h));
        Ok(h)
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.attached.borrow_mut().entry(program).or_default().push(shader);
        self.push(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.push(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: ProgramHandle) {
        let shaders = self.attached.borrow().get(&program).cloned().unwrap_or_default();
        if shaders.iter().all(|s| self.compiled(*s)) {
            let sources = self.shader_sources.borrow();
            let linked = shaders.iter().filter_map(|s| sources.get(s).cloned()).collect();
            self.linked_sources.borrow_mut().insert(program, linked);
        }
        self.push(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.linked_sources.borrow().contains_key(&program)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled/unspecialized shader".to_string()
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.push(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.push(Call::UseProgram(program));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.push(Call::UniformLocation(program, name.to_string()));

        let key = (program, name.to_string());
        if let Some(loc) = self.uniforms.borrow().get(&key) {
            return Some(*loc);
        }

        let leaf = name.rsplit('.').next().unwrap_or(name);
        let active = self
            .linked_sources
            .borrow()
            .get(&program)
            .is_some_and(|srcs| srcs.iter().any(|s| s.contains(leaf)));
        if !active {
            return None;
        }

        let mut uniforms = self.uniforms.borrow_mut();
        let loc = UniformLocation(uniforms.len() as u32);
        uniforms.insert(key, loc);
        Some(loc)
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.push(Call::SetUniform(location, *value));
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        let h = VertexArrayHandle(self.next());
        self.push(Call::CreateVertexArray(h));
        Ok(h)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.push(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.push(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        let h = BufferHandle(self.next());
        self.push(Call::CreateBuffer(h));
        Ok(h)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        self.push(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        self.push(Call::BufferData { target, len: data.len() });
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.push(Call::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib(&self, location: u32) {
        self.push(Call::EnableAttrib(location));
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: i32) {
        self.push(Call::AttribPointer { attribute: *attribute, stride });
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        let h = TextureHandle(self.next());
        self.push(Call::CreateTexture(h));
        Ok(h)
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        self.push(Call::BindTexture(target, texture));
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.push(Call::DeleteTexture(texture));
    }

    fn active_texture(&self, unit: u32) {
        self.push(Call::ActiveTexture(unit));
    }

    fn tex_image_2d(
        &self,
        target: ImageTarget,
        width: i32,
        height: i32,
        format: PixelFormat,
        pixels: &[u8],
    ) {
        self.push(Call::TexImage { target, width, height, format, len: pixels.len() });
    }

    fn tex_parameter(&self, target: TextureTarget, param: TextureParam) {
        self.push(Call::TexParameter(target, param));
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        self.push(Call::GenerateMipmap(target));
    }

    fn set_unpack_alignment(&self, alignment: i32) {
        self.push(Call::UnpackAlignment(alignment));
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, byte_offset: i32) {
        self.push(Call::DrawElements { mode, count, byte_offset });
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        self.push(Call::DrawArrays { mode, first, count });
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        self.push(Call::Capability(capability, enabled));
    }

    fn depth_func(&self, func: CompareFunc) {
        self.push(Call::DepthFunc(func));
    }

    fn depth_mask(&self, write: bool) {
        self.push(Call::DepthMask(write));
    }

    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) {
        self.push(Call::StencilFunc(func, reference, mask));
    }

    fn stencil_op(&self, stencil_fail: StencilAction, depth_fail: StencilAction, pass: StencilAction) {
        self.push(Call::StencilOp(stencil_fail, depth_fail, pass));
    }

    fn stencil_mask(&self, mask: u32) {
        self.push(Call::StencilMask(mask));
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        self.push(Call::PolygonMode(mode));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.push(Call::ClearColor(rgba));
    }

    fn clear(&self, flags: ClearFlags) {
        self.push(Call::Clear(flags));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.push(Call::Viewport(x, y, width, height));
    }
}
