//! Camera support types shared between the camera and the renderer.

use cgmath::{Matrix4, SquareMatrix};
use winit::{event::ElementState, keyboard::KeyCode};

use super::{camera_controller::CameraController, fly_camera::FlyCamera};

/// Owns the camera and its controller and wires input events through to
/// camera state. One frame tick is `update`: apply held movement keys,
/// then refresh the uniform contents.
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        self.controller.process_keyboard(key, state)
    }

    pub fn process_cursor(&mut self, x: f64, y: f64) {
        self.controller.process_cursor(x, y, &mut self.camera);
    }

    pub fn update(&mut self) {
        self.controller.update_camera(&mut self.camera);
        self.camera.update_view_proj();
    }

    pub fn uniform(&self) -> CameraUniform {
        self.camera.uniform
    }
}

/// Camera matrices in the layout the vertex shader expects at group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// World-to-camera transform, column major.
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip transform, column major.
    pub proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: convert_matrix4_to_array(Matrix4::identity()),
            proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

/// Convert a cgmath matrix into the nested array layout uniform buffers
/// use, preserving column-major order.
pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_uniform_layout_matches_shader_expectation() {
        // Two mat4x4<f32> fields, 16 bytes aligned, no padding.
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
    }

    #[test]
    fn test_default_uniform_is_identity() {
        let uniform = CameraUniform::default();
        assert_eq!(uniform.view[0][0], 1.0);
        assert_eq!(uniform.view[1][1], 1.0);
        assert_eq!(uniform.view[3][3], 1.0);
        assert_eq!(uniform.view[3][0], 0.0);
        assert_eq!(uniform.view, uniform.proj);
    }

    #[test]
    fn test_convert_preserves_column_major_order() {
        let translation = Matrix4::from_translation(Vector3::new(2.0, 0.0, -3.0));
        let array = convert_matrix4_to_array(translation);
        assert_eq!(array[3], [2.0, 0.0, -3.0, 1.0]);
        assert_eq!(array[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_manager_update_runs_movement_then_uniform_refresh() {
        let camera = FlyCamera::new(Vector3::new(0.0, 0.0, 3.0), -90.0, 0.0, 1.0);
        let controller = CameraController::new(0.03, 0.1);
        let mut manager = CameraManager::new(camera, controller);

        manager.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        manager.update();

        // The uniform reflects the post-movement position.
        let expected = convert_matrix4_to_array(manager.camera.view_matrix());
        assert_eq!(manager.uniform().view, expected);
        assert!((manager.camera.position.z - 2.97).abs() < 1e-6);
    }
}
