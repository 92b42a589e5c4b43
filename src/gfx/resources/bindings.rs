//! Uniform bind groups for the quad pipeline
//!
//! Group 0 carries the camera matrices shared by every draw; group 1
//! carries the per-mesh model transform. Both are single uniform-buffer
//! bindings visible to the vertex stage.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::camera::camera_utils::{convert_matrix4_to_array, CameraUniform};
use crate::wgpu_utils::uniform_buffer::UniformBuffer;

/// Global uniform buffer holding the camera matrices.
pub type GlobalUBO = UniformBuffer<CameraUniform>;

/// Per-mesh model transform in the layout the vertex shader expects at
/// group 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    /// Model-to-world transform, column major.
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            model: convert_matrix4_to_array(Matrix4::from_translation(translation)),
        }
    }
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self {
            model: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub type TransformUBO = UniformBuffer<TransformUniform>;

/// Bind group layout and bind group for one uniform buffer at binding 0.
pub struct UniformBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl UniformBindings {
    pub fn new<Content: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        ubo: &UniformBuffer<Content>,
    ) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Bind Group Layout")),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
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
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_uniform_layout() {
        // One mat4x4<f32>, matching the shader's Transform struct.
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
    }

    #[test]
    fn test_from_translation_places_offset_in_last_column() {
        let transform = TransformUniform::from_translation(Vector3::new(2.0, 0.0, -3.0));
        assert_eq!(transform.model[3], [2.0, 0.0, -3.0, 1.0]);
        // Rotation block stays identity.
        assert_eq!(transform.model[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(transform.model[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(transform.model[2], [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_default_transform_is_identity() {
        let transform = TransformUniform::default();
        for (col, values) in transform.model.iter().enumerate() {
            for (row, value) in values.iter().enumerate() {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert_eq!(*value, expected);
            }
        }
    }
}
