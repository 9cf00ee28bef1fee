//! Fullscreen shader effect passes.
//!
//! This module provides [`EffectPass`], a fullscreen quad drawn with a custom
//! program so the fragment shader runs once per pixel. The raymarched sphere
//! demo is one of these: all of its work happens in the fragment stage.
//!
//! # Shader Requirements
//!
//! The vertex source must define `vs_main` taking the quad position at
//! `@location(0)`; the fragment source must define `fs_main`. Both may read
//! the uniform struct `U` at `@group(0) @binding(0)`.
//!
//! ```wgsl
//! @vertex
//! fn vs_main(@location(0) position: vec3f) -> @builtin(position) vec4f {
//!     return vec4f(position, 1.0);
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use firstlight::{EffectPass, SphereUniforms};
//!
//! let effect: EffectPass<SphereUniforms> = EffectPass::new(
//!     &gpu,
//!     "Sphere",
//!     include_str!("shaders/fullscreen.vert.wgsl"),
//!     include_str!("shaders/sphere.frag.wgsl"),
//! )?;
//! effect.render(&gpu, &mut render_pass, &SphereUniforms::default());
//! ```

use crate::error::Result;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, QUAD_INDICES, QUAD_VERTICES, Vertex};
use crate::program::{Program, ProgramLayout};
use crate::shader::{Shader, ShaderStage};

/// Uniforms of the raymarched sphere shader.
///
/// # WGSL Declaration
///
/// ```wgsl
/// struct SphereUniforms {
///     resolution: vec2f,
///     center: vec2f,
///     color: vec3f,
///     radius: f32,
/// }
/// @group(0) @binding(0) var<uniform> u: SphereUniforms;
/// ```
///
/// `radius` fills the tail of the `vec3f` slot, so the struct is 32 bytes
/// with no explicit padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereUniforms {
    /// Framebuffer size in pixels `[width, height]`.
    pub resolution: [f32; 2],
    /// Sphere center in the `uv` plane (x stretched by the aspect ratio).
    pub center: [f32; 2],
    /// Diffuse color.
    pub color: [f32; 3],
    /// Sphere radius in `uv` units.
    pub radius: f32,
}

impl Default for SphereUniforms {
    fn default() -> Self {
        Self {
            resolution: [800.0, 600.0],
            center: [0.0, 0.0],
            color: [1.0, 0.5, 0.2],
            radius: 0.5,
        }
    }
}

/// A fullscreen quad drawn with its own program.
pub struct EffectPass<U> {
    program: Program<U>,
    quad: Mesh,
}

impl<U: bytemuck::Pod> EffectPass<U> {
    /// Compiles both stages, links them and uploads the quad.
    pub fn new(
        gpu: &GpuContext,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let vertex = Shader::compile(gpu, label, vertex_source, ShaderStage::Vertex)?;
        let fragment = Shader::compile(gpu, label, fragment_source, ShaderStage::Fragment)?;

        let program = Program::link(
            gpu,
            label,
            &vertex,
            &fragment,
            ProgramLayout {
                vertex_buffers: &[Vertex::LAYOUT],
                ..Default::default()
            },
        )?;

        let quad = Mesh::indexed(gpu, label, &QUAD_VERTICES, &QUAD_INDICES);

        Ok(Self { program, quad })
    }

    /// Uploads `uniforms` and draws the quad.
    pub fn render(&self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass, uniforms: &U) {
        self.program.set_uniforms(gpu, uniforms);
        self.program.bind(render_pass);
        self.quad.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<SphereUniforms>(), 32);
        assert_eq!(std::mem::offset_of!(SphereUniforms, center), 8);
        assert_eq!(std::mem::offset_of!(SphereUniforms, color), 16);
        assert_eq!(std::mem::offset_of!(SphereUniforms, radius), 28);
    }
}
