//! Shader program construction and uniform access.

mod error;
mod program;
mod sources;

pub use error::{DiagnosticSource, ShaderDiagnostic, ShaderError};
pub use program::Program;
pub use sources::ShaderSources;
