//! Depth-tested mesh rendering with model, view and projection matrices.
//!
//! [`MeshPass`] draws one [`Mesh`] with a program whose vertex stage computes
//! `projection * view * model * position`. The three matrices and a flat
//! color travel in [`ModelViewProjection`], uploaded every frame.
//!
//! The render pass it draws into must carry a depth attachment in
//! [`DEPTH_FORMAT`](crate::gpu::DEPTH_FORMAT); enable it with
//! [`AppConfig::depth`](crate::AppConfig::depth).
//!
//! [`perspective`](crate::transform::perspective) produces OpenGL clip depth
//! in `[-w, w]`, while wgpu clips to `[0, w]`. The vertex shader remaps it
//! with `z = (z + w) / 2` after the multiply.

use crate::error::Result;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex};
use crate::program::{Program, ProgramLayout};
use crate::shader::{Shader, ShaderStage};
use crate::transform::Matrix4;

/// Per-frame uniforms of the mesh program.
///
/// # WGSL Declaration
///
/// ```wgsl
/// struct Uniforms {
///     model: mat4x4f,
///     view: mat4x4f,
///     projection: mat4x4f,
///     color: vec4f,
/// }
/// @group(0) @binding(0) var<uniform> u: Uniforms;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelViewProjection {
    /// Object to world.
    pub model: [[f32; 4]; 4],
    /// World to camera.
    pub view: [[f32; 4]; 4],
    /// Camera to clip space.
    pub projection: [[f32; 4]; 4],
    /// Flat RGBA color.
    pub color: [f32; 4],
}

impl ModelViewProjection {
    pub fn new(model: Matrix4, view: Matrix4, projection: Matrix4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            color,
        }
    }
}

/// A mesh and the depth-tested program that draws it.
pub struct MeshPass {
    program: Program<ModelViewProjection>,
    mesh: Mesh,
}

impl MeshPass {
    /// Compiles and links the program, then uploads `vertices` (three per triangle).
    pub fn new(
        gpu: &GpuContext,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
        vertices: &[Vertex],
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
                depth: true,
                // CUBE_VERTICES mixes windings across faces.
                cull_back: false,
            },
        )?;

        let mesh = Mesh::new(gpu, label, vertices);
        log::debug!("{label}: {} vertices uploaded", mesh.vertex_count());

        Ok(Self { program, mesh })
    }

    /// Uploads this frame's matrices and draws the mesh.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        uniforms: &ModelViewProjection,
    ) {
        self.program.set_uniforms(gpu, uniforms);
        self.program.bind(render_pass);
        self.mesh.draw(render_pass);
    }
}
