//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single window, and wires them to the
//! GL context.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
