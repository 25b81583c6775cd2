//! `GraphicsApi` over a loaded `glow` context.
//!
//! This is the only module that issues raw GL calls. Each `unsafe` block relies
//! on the same invariant: the runtime made the context current on this thread
//! before handing out the `Gl` handle, and keeps it current until the handle
//! and everything holding it are dropped.

use glow::HasContext;

use super::api::GraphicsApi;
use super::types::*;

impl GraphicsApi for glow::Context {
    fn version_string(&self) -> String {
        unsafe { self.get_parameter_string(glow::VERSION) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        };
        unsafe { HasContext::create_shader(self, ty).map(|s| ShaderHandle(s.0)) }
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        unsafe { HasContext::shader_source(self, glow::NativeShader(shader.0), source) }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { HasContext::compile_shader(self, glow::NativeShader(shader.0)) }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        unsafe { self.get_shader_compile_status(glow::NativeShader(shader.0)) }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        unsafe { self.get_shader_info_log(glow::NativeShader(shader.0)) }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { HasContext::delete_shader(self, glow::NativeShader(shader.0)) }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        unsafe { HasContext::create_program(self).map(|p| ProgramHandle(p.0)) }
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe {
            HasContext::attach_shader(
                self,
                glow::NativeProgram(program.0),
                glow::NativeShader(shader.0),
            )
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe {
            HasContext::detach_shader(
                self,
                glow::NativeProgram(program.0),
                glow::NativeShader(shader.0),
            )
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { HasContext::link_program(self, glow::NativeProgram(program.0)) }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        unsafe { self.get_program_link_status(glow::NativeProgram(program.0)) }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        unsafe { self.get_program_info_log(glow::NativeProgram(program.0)) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { HasContext::delete_program(self, glow::NativeProgram(program.0)) }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { HasContext::use_program(self, program.map(|p| glow::NativeProgram(p.0))) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.get_uniform_location(glow::NativeProgram(program.0), name)
                .map(|l| UniformLocation(l.0))
        }
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let loc = glow::NativeUniformLocation(location.0);
        let loc = Some(&loc);
        unsafe {
            match *value {
                UniformValue::Bool(v) => self.uniform_1_i32(loc, v as i32),
                UniformValue::Int(v) => self.uniform_1_i32(loc, v),
                UniformValue::Float(v) => self.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => self.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3(v) => self.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat2(m) => {
                    self.uniform_matrix_2_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat3(m) => {
                    self.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    self.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe { HasContext::create_vertex_array(self).map(|v| VertexArrayHandle(v.0)) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            HasContext::bind_vertex_array(self, vertex_array.map(|v| glow::NativeVertexArray(v.0)))
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe { HasContext::delete_vertex_array(self, glow::NativeVertexArray(vertex_array.0)) }
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { HasContext::create_buffer(self).map(|b| BufferHandle(b.0)) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        unsafe {
            HasContext::bind_buffer(
                self,
                buffer_target(target),
                buffer.map(|b| glow::NativeBuffer(b.0)),
            )
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let usage = match usage {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        };
        unsafe { self.buffer_data_u8_slice(buffer_target(target), data, usage) }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { HasContext::delete_buffer(self, glow::NativeBuffer(buffer.0)) }
    }

    fn enable_vertex_attrib(&self, location: u32) {
        unsafe { self.enable_vertex_attrib_array(location) }
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: i32) {
        unsafe {
            match attribute.kind {
                AttribKind::Float => self.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    stride,
                    attribute.offset,
                ),
                AttribKind::Int => self.vertex_attrib_pointer_i32(
                    attribute.location,
                    attribute.components,
                    glow::INT,
                    stride,
                    attribute.offset,
                ),
            }
        }
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        unsafe { HasContext::create_texture(self).map(|t| TextureHandle(t.0)) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<TextureHandle>) {
        unsafe {
            HasContext::bind_texture(
                self,
                texture_target(target),
                texture.map(|t| glow::NativeTexture(t.0)),
            )
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        unsafe { HasContext::delete_texture(self, glow::NativeTexture(texture.0)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn tex_image_2d(
        &self,
        target: ImageTarget,
        width: i32,
        height: i32,
        format: PixelFormat,
        pixels: &[u8],
    ) {
        let target = match target {
            ImageTarget::Texture2d => glow::TEXTURE_2D,
            ImageTarget::CubeFace(face) => glow::TEXTURE_CUBE_MAP_POSITIVE_X + u32::from(face),
        };
        let format = match format {
            PixelFormat::Red => glow::RED,
            PixelFormat::Rg => glow::RG,
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        };
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                0,
                format as i32,
                width,
                height,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            )
        }
    }

    fn tex_parameter(&self, target: TextureTarget, param: TextureParam) {
        let (pname, value) = match param {
            TextureParam::WrapS(w) => (glow::TEXTURE_WRAP_S, wrap(w)),
            TextureParam::WrapT(w) => (glow::TEXTURE_WRAP_T, wrap(w)),
            TextureParam::WrapR(w) => (glow::TEXTURE_WRAP_R, wrap(w)),
            TextureParam::MinFilter(f) => (glow::TEXTURE_MIN_FILTER, filter(f)),
            TextureParam::MagFilter(f) => (glow::TEXTURE_MAG_FILTER, filter(f)),
        };
        unsafe { self.tex_parameter_i32(texture_target(target), pname, value as i32) }
    }

    fn generate_mipmap(&self, target: TextureTarget) {
        unsafe { HasContext::generate_mipmap(self, texture_target(target)) }
    }

    fn set_unpack_alignment(&self, alignment: i32) {
        unsafe { self.pixel_store_i32(glow::UNPACK_ALIGNMENT, alignment) }
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, byte_offset: i32) {
        unsafe {
            HasContext::draw_elements(self, primitive(mode), count, glow::UNSIGNED_INT, byte_offset)
        }
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, primitive(mode), first, count) }
    }

    fn set_capability(&self, capability: Capability, enabled: bool) {
        let cap = match capability {
            Capability::DepthTest => glow::DEPTH_TEST,
            Capability::StencilTest => glow::STENCIL_TEST,
            Capability::Blend => glow::BLEND,
            Capability::CullFace => glow::CULL_FACE,
            Capability::Multisample => glow::MULTISAMPLE,
        };
        unsafe {
            if enabled {
                self.enable(cap)
            } else {
                self.disable(cap)
            }
        }
    }

    fn depth_func(&self, func: CompareFunc) {
        unsafe { HasContext::depth_func(self, compare(func)) }
    }

    fn depth_mask(&self, write: bool) {
        unsafe { HasContext::depth_mask(self, write) }
    }

    fn stencil_func(&self, func: CompareFunc, reference: i32, mask: u32) {
        unsafe { HasContext::stencil_func(self, compare(func), reference, mask) }
    }

    fn stencil_op(&self, stencil_fail: StencilAction, depth_fail: StencilAction, pass: StencilAction) {
        unsafe {
            HasContext::stencil_op(
                self,
                stencil_action(stencil_fail),
                stencil_action(depth_fail),
                stencil_action(pass),
            )
        }
    }

    fn stencil_mask(&self, mask: u32) {
        unsafe { HasContext::stencil_mask(self, mask) }
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        };
        unsafe { HasContext::polygon_mode(self, glow::FRONT_AND_BACK, mode) }
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe { HasContext::clear_color(self, rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&self, flags: ClearFlags) {
        let mut mask = 0;
        if flags.color {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if flags.depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if flags.stencil {
            mask |= glow::STENCIL_BUFFER_BIT;
        }
        if mask != 0 {
            unsafe { HasContext::clear(self, mask) }
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2d => glow::TEXTURE_2D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
    }
}

fn wrap(w: TextureWrap) -> u32 {
    match w {
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
    }
}

fn filter(f: TextureFilter) -> u32 {
    match f {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
        TextureFilter::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
        TextureFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}

fn primitive(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::Points => glow::POINTS,
    }
}

fn compare(func: CompareFunc) -> u32 {
    match func {
        CompareFunc::Never => glow::NEVER,
        CompareFunc::Less => glow::LESS,
        CompareFunc::Equal => glow::EQUAL,
        CompareFunc::LessEqual => glow::LEQUAL,
        CompareFunc::Greater => glow::GREATER,
        CompareFunc::NotEqual => glow::NOTEQUAL,
        CompareFunc::GreaterEqual => glow::GEQUAL,
        CompareFunc::Always => glow::ALWAYS,
    }
}

fn stencil_action(action: StencilAction) -> u32 {
    match action {
        StencilAction::Keep => glow::KEEP,
        StencilAction::Zero => glow::ZERO,
        StencilAction::Replace => glow::REPLACE,
        StencilAction::Increment => glow::INCR,
        StencilAction::Decrement => glow::DECR,
        StencilAction::Invert => glow::INVERT,
    }
}
