//! Lumen engine crate.
//!
//! Window + GL context runtime, a testable GL seam, and the building blocks
//! the demos are made of: shader programs, meshes, textures, a fly camera and
//! glTF models.

pub mod core;
pub mod device;
pub mod gl;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;

pub mod camera;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod texture;
