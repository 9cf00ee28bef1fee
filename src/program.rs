//! Linking compiled stages into a drawable program.
//!
//! A [`Program`] is a render pipeline plus one uniform buffer bound at
//! `@group(0) @binding(0)`. The uniform type `U` is a `#[repr(C)]`
//! [`bytemuck::Pod`] struct whose layout mirrors the WGSL struct, so a single
//! [`Program::set_uniforms`] call replaces a string of per-name uniform setters.

use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::gpu::{DEPTH_FORMAT, GpuContext};
use crate::shader::{Shader, ShaderStage};

/// Fixed-function state the pipeline is linked with.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgramLayout<'a> {
    /// Vertex buffer layouts, in slot order.
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Enable depth testing against a [`DEPTH_FORMAT`] attachment.
    pub depth: bool,
    /// Drop triangles wound clockwise on screen.
    pub cull_back: bool,
}

/// A linked vertex + fragment pipeline with its uniform buffer.
pub struct Program<U> {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _uniforms: PhantomData<U>,
}

impl<U: bytemuck::Pod> Program<U> {
    /// Links `vertex` and `fragment` into a pipeline targeting the surface format.
    ///
    /// Mismatched stage interfaces and bad bindings are validation errors
    /// caught here and returned as [`Error::ShaderLink`].
    pub fn link(
        gpu: &GpuContext,
        label: &str,
        vertex: &Shader,
        fragment: &Shader,
        layout: ProgramLayout,
    ) -> Result<Self> {
        check_stage(label, vertex, ShaderStage::Vertex)?;
        check_stage(label, fragment, ShaderStage::Fragment)?;

        let device = &gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Uniforms")),
            size: std::mem::size_of::<U>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} Bind Group Layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = layout.depth.then(|| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} Pipeline")),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: vertex.module(),
                entry_point: Some(vertex.entry_point()),
                buffers: layout.vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment.module(),
                entry_point: Some(fragment.entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: layout.cull_back.then_some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            let diagnostic = err.to_string();
            log::error!("{label} failed to link:\n{diagnostic}");
            return Err(Error::ShaderLink {
                label: label.to_string(),
                diagnostic,
            });
        }

        log::debug!(
            "linked {label} ({} byte uniforms, depth {})",
            std::mem::size_of::<U>(),
            layout.depth
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
            _uniforms: PhantomData,
        })
    }

    /// Uploads this frame's uniform values. Takes effect at the next submit.
    pub fn set_uniforms(&self, gpu: &GpuContext, uniforms: &U) {
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Binds the pipeline and its uniforms on `render_pass`.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

fn check_stage(label: &str, shader: &Shader, expected: ShaderStage) -> Result<()> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(Error::ShaderLink {
            label: label.to_string(),
            diagnostic: format!(
                "'{}' is a {} shader, expected a {expected} shader",
                shader.label(),
                shader.stage()
            ),
        })
    }
}
