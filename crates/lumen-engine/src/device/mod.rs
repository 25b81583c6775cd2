//! GL context + window surface management.
//!
//! This module is responsible for:
//! - choosing a framebuffer config (depth, stencil, samples)
//! - creating the core-profile context and making it current
//! - resizing and presenting the window surface

mod context;
mod init;

pub use context::GlContext;
pub use init::ContextInit;
