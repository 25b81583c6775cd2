use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::gl::ShaderStage;

/// Which step of program construction produced a diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticSource {
    Stage(ShaderStage),
    Link,
}

impl DiagnosticSource {
    /// `VERTEX`, `FRAGMENT`, `GEOMETRY` or `PROGRAM`.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticSource::Stage(stage) => stage.label(),
            DiagnosticSource::Link => "PROGRAM",
        }
    }
}

/// Driver output for one failed compile or link step.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDiagnostic {
    pub source: DiagnosticSource,
    pub log: String,
}

impl ShaderDiagnostic {
    pub fn label(&self) -> &'static str {
        self.source.label()
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.log.trim_end())
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source `{}`", path.display())]
    Read {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("program `{name}` failed to build: {}", join(diagnostics))]
    Build {
        name: String,
        diagnostics: Vec<ShaderDiagnostic>,
    },
}

fn join(diagnostics: &[ShaderDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
