use thiserror::Error;

use crate::shader::ShaderStage;

/// Everything that can stop a demo from starting.
///
/// None of these are retried: `run_with_config` logs the error, closes the
/// window and returns it, and `main` exits with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("failed to compile {stage} shader '{label}':\n{diagnostic}")]
    ShaderCompile {
        label: String,
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("failed to link program '{label}':\n{diagnostic}")]
    ShaderLink { label: String, diagnostic: String },
}

/// Coarse grouping of [`Error`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Window, event loop, surface, adapter or device setup failed.
    Initialization,
    /// A shader stage did not compile.
    Compile,
    /// Compiled stages could not be linked into a pipeline.
    Link,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ShaderCompile { .. } => ErrorKind::Compile,
            Error::ShaderLink { .. } => ErrorKind::Link,
            _ => ErrorKind::Initialization,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_errors_carry_diagnostics() {
        let err = Error::ShaderCompile {
            label: "Sphere".into(),
            stage: ShaderStage::Fragment,
            diagnostic: "expected ';'".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Compile);
        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader 'Sphere':\nexpected ';'"
        );

        let err = Error::ShaderLink {
            label: "Cube".into(),
            diagnostic: "location 0 not provided".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Link);
        assert!(err.to_string().contains("'Cube'"));
    }

    #[test]
    fn setup_errors_are_initialization_failures() {
        assert_eq!(Error::NoSurfaceFormat.kind(), ErrorKind::Initialization);
    }
}
