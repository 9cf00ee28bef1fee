//! Vertex data uploaded once at startup.
//!
//! - [`Vertex`] — position-only vertex, the only attribute the demos need
//! - [`Mesh`] — GPU-resident vertex buffer with an optional index buffer
//! - [`CUBE_VERTICES`], [`QUAD_VERTICES`], [`QUAD_INDICES`] — the fixed geometry
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |

use crate::gpu::GpuContext;

/// A vertex with a single model-space position.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    /// The wgpu vertex buffer layout for [`Vertex`]: 12-byte stride, one
    /// `Float32x3` attribute at location 0.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }
}

/// Two triangles covering clip space, drawn with [`QUAD_INDICES`].
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new(-1.0, -1.0, 0.0),
    Vertex::new(1.0, -1.0, 0.0),
    Vertex::new(1.0, 1.0, 0.0),
    Vertex::new(-1.0, 1.0, 0.0),
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// A unit cube centered at the origin as 12 unindexed triangles (6 faces × 2).
pub const CUBE_VERTICES: [Vertex; 36] = [
    // back (-Z)
    Vertex::new(-0.5, -0.5, -0.5),
    Vertex::new(0.5, -0.5, -0.5),
    Vertex::new(0.5, 0.5, -0.5),
    Vertex::new(0.5, 0.5, -0.5),
    Vertex::new(-0.5, 0.5, -0.5),
    Vertex::new(-0.5, -0.5, -0.5),
    // front (+Z)
    Vertex::new(-0.5, -0.5, 0.5),
    Vertex::new(0.5, -0.5, 0.5),
    Vertex::new(0.5, 0.5, 0.5),
    Vertex::new(0.5, 0.5, 0.5),
    Vertex::new(-0.5, 0.5, 0.5),
    Vertex::new(-0.5, -0.5, 0.5),
    // left (-X)
    Vertex::new(-0.5, 0.5, 0.5),
    Vertex::new(-0.5, 0.5, -0.5),
    Vertex::new(-0.5, -0.5, -0.5),
    Vertex::new(-0.5, -0.5, -0.5),
    Vertex::new(-0.5, -0.5, 0.5),
    Vertex::new(-0.5, 0.5, 0.5),
    // right (+X)
    Vertex::new(0.5, 0.5, 0.5),
    Vertex::new(0.5, 0.5, -0.5),
    Vertex::new(0.5, -0.5, -0.5),
    Vertex::new(0.5, -0.5, -0.5),
    Vertex::new(0.5, -0.5, 0.5),
    Vertex::new(0.5, 0.5, 0.5),
    // bottom (-Y)
    Vertex::new(-0.5, -0.5, -0.5),
    Vertex::new(0.5, -0.5, -0.5),
    Vertex::new(0.5, -0.5, 0.5),
    Vertex::new(0.5, -0.5, 0.5),
    Vertex::new(-0.5, -0.5, 0.5),
    Vertex::new(-0.5, -0.5, -0.5),
    // top (+Y)
    Vertex::new(-0.5, 0.5, -0.5),
    Vertex::new(0.5, 0.5, -0.5),
    Vertex::new(0.5, 0.5, 0.5),
    Vertex::new(0.5, 0.5, 0.5),
    Vertex::new(-0.5, 0.5, 0.5),
    Vertex::new(-0.5, 0.5, -0.5),
];

/// GPU-resident geometry.
///
/// Buffers are released when the mesh is dropped. Meshes are immutable after
/// creation.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    /// Uploads vertices drawn in order, three per triangle.
    pub fn new(gpu: &GpuContext, label: &str, vertices: &[Vertex]) -> Self {
        Self {
            vertex_buffer: Self::vertex_buffer(gpu, label, vertices),
            index_buffer: None,
            vertex_count: vertices.len() as u32,
            index_count: 0,
        }
    }

    /// Uploads vertices plus a `u32` index list, three indices per triangle.
    pub fn indexed(gpu: &GpuContext, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer: Self::vertex_buffer(gpu, label, vertices),
            index_buffer: Some(index_buffer),
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
        }
    }

    fn vertex_buffer(gpu: &GpuContext, label: &str, vertices: &[Vertex]) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        gpu.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertex Buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    /// Binds the buffers and issues the draw. The pipeline must already be set.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) => {
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            None => render_pass.draw(0..self.vertex_count, 0..1),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);
        assert_eq!(Vertex::LAYOUT.array_stride, 12);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 1);
        assert_eq!(
            bytemuck::cast_slice::<Vertex, f32>(&QUAD_VERTICES[..1]),
            &[-1.0, -1.0, 0.0]
        );
    }

    #[test]
    fn quad_covers_clip_space() {
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
        for corner in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            assert!(
                QUAD_VERTICES
                    .iter()
                    .any(|v| v.position[0] == corner[0] && v.position[1] == corner[1])
            );
        }
    }

    #[test]
    fn cube_faces_lie_on_the_unit_box() {
        assert_eq!(CUBE_VERTICES.len() % 3, 0);

        for (face, tri) in CUBE_VERTICES.chunks(6).enumerate() {
            // Every vertex of a face shares one coordinate fixed at ±0.5.
            let shared = (0..3).find(|&axis| {
                let value = tri[0].position[axis];
                value.abs() == 0.5 && tri.iter().all(|v| v.position[axis] == value)
            });
            assert!(shared.is_some(), "face {face} is not axis aligned");
        }

        assert!(
            CUBE_VERTICES
                .iter()
                .flat_map(|v| v.position)
                .all(|c| c.abs() == 0.5)
        );
    }
}
