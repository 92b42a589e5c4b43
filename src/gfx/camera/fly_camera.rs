//! First-person free-fly camera
//!
//! Orientation is stored as yaw/pitch Euler angles in degrees and turned
//! into a forward vector whenever either angle changes. All camera state
//! lives in this struct; callers own it and pass it where needed.

use cgmath::{Angle, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{convert_matrix4_to_array, CameraUniform};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch is kept strictly inside the poles so the forward vector never
/// becomes parallel to the world up axis.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    /// Eye position in world space.
    pub position: Vector3<f32>,
    /// Unit forward vector, derived from yaw and pitch.
    pub front: Vector3<f32>,
    /// World up axis.
    pub up: Vector3<f32>,
    /// Heading in degrees; -90 looks down the negative Z axis.
    pub yaw: f32,
    /// Elevation in degrees, clamped to [-89, 89].
    pub pitch: f32,
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// GPU-ready copy of the view and projection matrices.
    pub uniform: CameraUniform,
}

impl FlyCamera {
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            front: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            aspect,
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
        };
        camera.update_front();
        camera
    }

    /// Apply a look delta in degrees. Yaw accumulates freely; pitch is
    /// clamped before the forward vector is rebuilt.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        self.update_front();
    }

    fn update_front(&mut self) {
        let (yaw_sin, yaw_cos) = Deg(self.yaw).sin_cos();
        let (pitch_sin, pitch_cos) = Deg(self.pitch).sin_cos();
        self.front =
            Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
    }

    /// World-to-camera transform looking along the forward vector.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        let target = Point3::from_vec(self.position + self.front);
        Matrix4::look_at_rh(eye, target, self.up)
    }

    /// Camera-to-clip transform, corrected for wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Refresh the cached uniform from the current view and projection.
    pub fn update_view_proj(&mut self) {
        self.uniform.view = convert_matrix4_to_array(self.view_matrix());
        self.uniform.proj = convert_matrix4_to_array(self.projection_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> FlyCamera {
        FlyCamera::new(Vector3::new(0.0, 0.0, 3.0), -90.0, 0.0, 800.0 / 600.0)
    }

    fn assert_vec3_near(actual: Vector3<f32>, expected: Vector3<f32>, epsilon: f32) {
        assert!(
            (actual - expected).magnitude() < epsilon,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_default_orientation_faces_negative_z() {
        let camera = test_camera();
        assert_vec3_near(camera.front, Vector3::new(0.0, 0.0, -1.0), 1e-6);
    }

    #[test]
    fn test_front_stays_unit_length_after_rotation() {
        let mut camera = test_camera();
        camera.rotate(37.0, 21.0);
        camera.rotate(-112.5, -48.25);
        assert!((camera.front.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_clamps_at_both_poles() {
        let mut camera = test_camera();
        camera.rotate(0.0, 500.0);
        assert_eq!(camera.pitch, PITCH_LIMIT_DEG);
        camera.rotate(0.0, -1000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT_DEG);
        // The forward vector never reaches the world up axis.
        assert!(camera.front.y.abs() < 1.0);
    }

    #[test]
    fn test_pitch_clamped_at_construction() {
        let camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0), -90.0, 170.0, 1.0);
        assert_eq!(camera.pitch, PITCH_LIMIT_DEG);
    }

    #[test]
    fn test_view_matrix_is_identity_at_origin_default_orientation() {
        let camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0), -90.0, 0.0, 1.0);
        let view = convert_matrix4_to_array(camera.view_matrix());
        for (col, view_col) in view.iter().enumerate() {
            for (row, value) in view_col.iter().enumerate() {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert!(
                    (value - expected).abs() < 1e-5,
                    "view[{}][{}] = {}, expected {}",
                    col,
                    row,
                    value,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_view_matrix_translates_opposite_to_position() {
        let camera = test_camera();
        let view = convert_matrix4_to_array(camera.view_matrix());
        assert!((view[3][0]).abs() < 1e-5);
        assert!((view[3][1]).abs() < 1e-5);
        assert!((view[3][2] + 3.0).abs() < 1e-5);
        assert!((view[3][3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_resize_updates_projection_aspect() {
        let mut camera = test_camera();
        let before = convert_matrix4_to_array(camera.projection_matrix());
        camera.resize_projection(1600, 600);
        let after = convert_matrix4_to_array(camera.projection_matrix());
        // Doubling the aspect ratio halves the horizontal focal term.
        assert!((after[0][0] - before[0][0] / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_resize_to_zero_keeps_last_aspect() {
        let mut camera = test_camera();
        let aspect = camera.aspect;
        camera.resize_projection(0, 0);
        assert_eq!(camera.aspect, aspect);
    }

    #[test]
    fn test_update_view_proj_fills_uniform() {
        let mut camera = test_camera();
        camera.update_view_proj();
        assert_eq!(camera.uniform.view, convert_matrix4_to_array(camera.view_matrix()));
        assert_eq!(
            camera.uniform.proj,
            convert_matrix4_to_array(camera.projection_matrix())
        );
        // Perspective projection has no w passthrough.
        assert_eq!(camera.uniform.proj[3][3], 0.0);
    }
}
