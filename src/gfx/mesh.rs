//! # Mesh Data
//!
//! Vertex format and GPU buffer ownership for the geometry the demo
//! draws. The only mesh is a unit quad, kept as a plain vertex list so
//! no index buffer is involved.

use wgpu::util::DeviceExt;

/// A vertex with position and texture coordinates.
///
/// `#[repr(C)]` fixes the memory layout so the struct can be uploaded
/// directly into a GPU vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space [x, y, z].
    pub position: [f32; 3],
    /// Texture coordinates [u, v] covering [0, 1].
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Returns the vertex buffer layout matching the vertex shader's
    /// `@location(0)` position and `@location(1)` texture coordinates.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit quad in the XY plane, centred on the origin, as two
/// counter-clockwise triangles.
pub const QUAD_VERTICES: [Vertex; 6] = [
    Vertex { position: [-0.5, -0.5, 0.0], tex_coords: [0.0, 0.0] },
    Vertex { position: [0.5, -0.5, 0.0], tex_coords: [1.0, 0.0] },
    Vertex { position: [0.5, 0.5, 0.0], tex_coords: [1.0, 1.0] },
    Vertex { position: [0.5, 0.5, 0.0], tex_coords: [1.0, 1.0] },
    Vertex { position: [-0.5, 0.5, 0.0], tex_coords: [0.0, 1.0] },
    Vertex { position: [-0.5, -0.5, 0.0], tex_coords: [0.0, 0.0] },
];

/// Owns one vertex buffer, uploaded once at construction.
///
/// Not clonable; a second owner would release the buffer twice at the
/// driver boundary. The buffer is freed when the value drops.
pub struct MeshBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl MeshBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
