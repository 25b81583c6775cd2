//! Narrow seam over the OpenGL object model.
//!
//! Engine types (programs, meshes, textures) talk to GL only through
//! [`GraphicsApi`]. The production implementation forwards to `glow`; unit
//! tests use a recording implementation to assert call sequences.

mod api;
mod glow_backend;
mod types;

#[cfg(test)]
pub(crate) mod recording;

pub use api::{Gl, GraphicsApi};
pub use types::{
    AttribKind, BufferHandle, BufferTarget, BufferUsage, Capability, ClearFlags, CompareFunc,
    ImageTarget, PixelFormat, PolygonMode, PrimitiveMode, ProgramHandle, ShaderHandle,
    ShaderStage, StencilAction, TextureFilter, TextureHandle, TextureParam, TextureTarget,
    TextureWrap, UniformLocation, UniformValue, VertexArrayHandle, VertexAttribute,
};
