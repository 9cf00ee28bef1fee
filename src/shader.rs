//! Compiling WGSL stages.
//!
//! Each stage lives in its own source string with a fixed entry point
//! (`vs_main` or `fs_main`). Compilation runs inside a validation error scope,
//! so a broken shader comes back as [`Error::ShaderCompile`] carrying the
//! compiler's messages instead of tripping wgpu's uncaptured-error handler.

use std::fmt;

use crate::error::{Error, Result};
use crate::gpu::GpuContext;

/// The pipeline stage a shader source is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Name of the function a source for this stage must define.
    pub const fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A compiled shader stage, ready to be linked by [`Program::link`](crate::Program::link).
#[derive(Debug)]
pub struct Shader {
    module: wgpu::ShaderModule,
    stage: ShaderStage,
    label: String,
}

impl Shader {
    /// Compiles one WGSL stage.
    ///
    /// Warnings are logged; any validation error aborts with
    /// [`Error::ShaderCompile`].
    pub fn compile(
        gpu: &GpuContext,
        label: &str,
        source: &str,
        stage: ShaderStage,
    ) -> Result<Self> {
        let label = format!("{label} ({stage})");

        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        let scope_error = pollster::block_on(gpu.device.pop_error_scope());

        let info = pollster::block_on(module.get_compilation_info());
        for message in &info.messages {
            if message.message_type == wgpu::CompilationMessageType::Warning {
                log::warn!("{label}: {}", describe(message));
            }
        }

        if let Some(err) = scope_error {
            let diagnostic = diagnostic_text(&info.messages).unwrap_or_else(|| err.to_string());
            log::error!("{label} failed to compile:\n{diagnostic}");
            return Err(Error::ShaderCompile {
                label,
                stage,
                diagnostic,
            });
        }

        log::debug!("compiled {label}");
        Ok(Self {
            module,
            stage,
            label,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_point(&self) -> &'static str {
        self.stage.entry_point()
    }

    pub(crate) fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

/// One compiler message as `line:column: text`.
fn describe(message: &wgpu::CompilationMessage) -> String {
    match &message.location {
        Some(loc) => format!(
            "{}:{}: {}",
            loc.line_number, loc.line_position, message.message
        ),
        None => message.message.clone(),
    }
}

/// Every error message joined line by line, or `None` if there were none.
fn diagnostic_text(messages: &[wgpu::CompilationMessage]) -> Option<String> {
    let errors: Vec<String> = messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(describe)
        .collect();

    if errors.is_empty() {
        None
    } else {
        Some(errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(
        kind: wgpu::CompilationMessageType,
        text: &str,
        at: Option<(u32, u32)>,
    ) -> wgpu::CompilationMessage {
        wgpu::CompilationMessage {
            message: text.to_string(),
            message_type: kind,
            location: at.map(|(line_number, line_position)| wgpu::SourceLocation {
                line_number,
                line_position,
                offset: 0,
                length: 1,
            }),
        }
    }

    #[test]
    fn entry_points_per_stage() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn diagnostic_keeps_only_errors_with_locations() {
        let messages = vec![
            message(wgpu::CompilationMessageType::Warning, "unused", Some((2, 1))),
            message(wgpu::CompilationMessageType::Error, "expected ';'", Some((7, 12))),
            message(wgpu::CompilationMessageType::Error, "unknown type", None),
        ];

        assert_eq!(
            diagnostic_text(&messages).as_deref(),
            Some("7:12: expected ';'\nunknown type")
        );
    }

    #[test]
    fn no_errors_means_no_diagnostic() {
        let messages = vec![message(
            wgpu::CompilationMessageType::Info,
            "fine",
            None,
        )];
        assert_eq!(diagnostic_text(&messages), None);
    }
}
