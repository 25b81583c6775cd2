use std::num::NonZeroU32;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(pub(crate) NonZeroU32);

        impl $name {
            /// Raw GL object name.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gl_handle!(
    /// Shader object (one compiled stage).
    ShaderHandle
);
gl_handle!(
    /// Linked program object.
    ProgramHandle
);
gl_handle!(
    /// Buffer object (vertex or element data).
    BufferHandle
);
gl_handle!(
    /// Vertex array object (attribute bindings + element buffer).
    VertexArrayHandle
);
gl_handle!(
    /// Texture object (2D or cube map).
    TextureHandle
);

/// Location of an active uniform inside one linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub(crate) u32);

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// Upper-case label used in compile diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
            ShaderStage::Geometry => "GEOMETRY",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`
    Vertex,
    /// `GL_ELEMENT_ARRAY_BUFFER`
    Index,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
}

/// Component type of a vertex attribute as seen by the vertex stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttribKind {
    /// 32-bit floats, read as `float`/`vecN`.
    Float,
    /// 32-bit signed integers, read as `int`/`ivecN` (no conversion).
    Int,
}

/// One slot of an interleaved vertex layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub kind: AttribKind,
    pub offset: i32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureTarget {
    Texture2d,
    CubeMap,
}

/// Destination of a single image upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageTarget {
    Texture2d,
    /// Cube map face in GL order: +X, -X, +Y, -Y, +Z, -Z.
    CubeFace(u8),
}

/// Client pixel layout of 8-bit-per-channel image data.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Red => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TextureFilter {
    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, TextureFilter::Nearest | TextureFilter::Linear)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureParam {
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    WrapR(TextureWrap),
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveMode {
    Triangles,
    Lines,
    Points,
}

/// Fixed-function toggles used by the demos.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    DepthTest,
    StencilTest,
    Blend,
    CullFace,
    Multisample,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StencilAction {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    Invert,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Buffers touched by `clear`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearFlags {
    pub const COLOR_DEPTH: Self = Self { color: true, depth: true, stencil: false };
    pub const ALL: Self = Self { color: true, depth: true, stencil: true };
}

/// A value assignable to a uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat2> for UniformValue {
    fn from(v: Mat2) -> Self {
        UniformValue::Mat2(v)
    }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self {
        UniformValue::Mat3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}
