use std::rc::Rc;

use super::types::*;

/// Shared handle to the current GL context.
///
/// Every resource owner keeps one so it can release its object on drop.
/// `Rc` because a context is only ever current on one thread.
pub type Gl = Rc<dyn GraphicsApi>;

/// The GL entry points used by the engine.
///
/// Implementations assume the context is current on the calling thread.
/// Object creation returns `Err(reason)` when the driver hands back no name;
/// everything else mirrors the GL call of the same name and reports failures
/// the way GL does (through object status queries, not return values).
pub trait GraphicsApi {
    /// `GL_VERSION` string of the context.
    fn version_string(&self) -> String;

    // ── shaders & programs ────────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String>;
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    fn compile_shader(&self, shader: ShaderHandle);
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle, String>;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&self, program: ProgramHandle);
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle) -> String;
    fn delete_program(&self, program: ProgramHandle);
    fn use_program(&self, program: Option<ProgramHandle>);

    /// Returns `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Writes `value` into the currently bound program.
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    // ── buffers & vertex arrays ───────────────────────────────────────────

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    fn create_buffer(&self) -> Result<BufferHandle, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: BufferHandle);

    fn enable_vertex_attrib(&self, location: u32);

    /// Describes `attribute` for the bound vertex array, reading from the bound
    /// vertex buffer with the given stride in bytes.
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: i32);

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&self) -> Result<TextureHandle, String>;
    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>);
    fn delete_texture(&self, texture: TextureHandle);

    /// Selects texture unit `unit` (0-based) for subsequent binds.
    fn active_texture(&self, unit: u32);

    fn tex_image_2d(
        &self,
        target: ImageTarget,
        width: i32,
        height: i32,
        format: PixelFormat,
        pixels: &[u8],
    );
    fn tex_parameter(&self, target: TextureTarget, param: TextureParam);
    fn generate_mipmap(&self, target: TextureTarget);

    /// Row alignment for client pixel uploads (`GL_UNPACK_ALIGNMENT`).
    fn set_unpack_alignment(&self, alignment: i32);

    // ── drawing & fixed-function state ────────────────────────────────────

    /// Draws `count` `u32` indices from the bound element buffer.
    fn draw_elements(&self, mode: PrimitiveMode, count: i32, byte_offset: i32);
    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32);

    fn set_capability(&self, capability: Capability, enabled: bool);
    fn depth_func(&self, func: CompareFunc);
    fn depth_mask(&self, write: bool);
    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32);
    fn stencil_op(&self, stencil_fail: StencilAction, depth_fail: StencilAction, pass: StencilAction);
    fn stencil_mask(&self, mask: u32);
    fn polygon_mode(&self, mode: PolygonMode);

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, flags: ClearFlags);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
}
