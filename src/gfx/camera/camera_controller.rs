//! Keyboard and mouse input for the fly camera
//!
//! Key events toggle four held-direction flags; cursor events feed a
//! last-position tracker that converts absolute coordinates into look
//! deltas. Movement is applied once per frame as a fixed step per held
//! key, deliberately not scaled by elapsed time.

use cgmath::InnerSpace;
use winit::{event::ElementState, keyboard::KeyCode};

use super::fly_camera::FlyCamera;

pub struct CameraController {
    /// World units moved per frame per held direction key.
    pub move_speed: f32,
    /// Degrees of rotation per pixel of cursor travel.
    pub mouse_sensitivity: f32,
    forward_pressed: bool,
    backward_pressed: bool,
    left_pressed: bool,
    right_pressed: bool,
    last_cursor: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new(move_speed: f32, mouse_sensitivity: f32) -> Self {
        Self {
            move_speed,
            mouse_sensitivity,
            forward_pressed: false,
            backward_pressed: false,
            left_pressed: false,
            right_pressed: false,
            last_cursor: None,
        }
    }

    /// Record a key transition. Returns true when the key is one the
    /// controller tracks.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state.is_pressed();
        match key {
            KeyCode::KeyW => {
                self.forward_pressed = pressed;
                true
            }
            KeyCode::KeyS => {
                self.backward_pressed = pressed;
                true
            }
            KeyCode::KeyA => {
                self.left_pressed = pressed;
                true
            }
            KeyCode::KeyD => {
                self.right_pressed = pressed;
                true
            }
            _ => false,
        }
    }

    /// Feed an absolute cursor position and rotate the camera by the
    /// offset from the previous one. The first event only seeds the
    /// reference position, so wherever the cursor happens to start
    /// cannot kick the view.
    pub fn process_cursor(&mut self, x: f64, y: f64, camera: &mut FlyCamera) {
        let Some((last_x, last_y)) = self.last_cursor.replace((x, y)) else {
            return;
        };
        let yaw_delta = (x - last_x) as f32 * self.mouse_sensitivity;
        // Screen y grows downward; invert so moving the mouse up looks up.
        let pitch_delta = (last_y - y) as f32 * self.mouse_sensitivity;
        camera.rotate(yaw_delta, pitch_delta);
    }

    /// Apply one movement step for every held direction key. Strafing
    /// moves along the camera's right vector, so it stays perpendicular
    /// to the current view direction.
    pub fn update_camera(&self, camera: &mut FlyCamera) {
        let step = self.move_speed;
        if self.forward_pressed {
            camera.position += camera.front * step;
        }
        if self.backward_pressed {
            camera.position -= camera.front * step;
        }
        let right = camera.front.cross(camera.up).normalize();
        if self.left_pressed {
            camera.position -= right * step;
        }
        if self.right_pressed {
            camera.position += right * step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn test_rig() -> (CameraController, FlyCamera) {
        let controller = CameraController::new(0.03, 0.1);
        let camera = FlyCamera::new(Vector3::new(0.0, 0.0, 3.0), -90.0, 0.0, 800.0 / 600.0);
        (controller, camera)
    }

    #[test]
    fn test_forward_key_moves_one_fixed_step() {
        let (mut controller, mut camera) = test_rig();
        assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
        controller.update_camera(&mut camera);
        assert!((camera.position.x).abs() < 1e-6);
        assert!((camera.position.y).abs() < 1e-6);
        assert!((camera.position.z - 2.97).abs() < 1e-6);
    }

    #[test]
    fn test_released_key_stops_movement() {
        let (mut controller, mut camera) = test_rig();
        controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
        controller.update_camera(&mut camera);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_untracked_key_is_ignored() {
        let (mut controller, mut camera) = test_rig();
        assert!(!controller.process_keyboard(KeyCode::KeyQ, ElementState::Pressed));
        controller.update_camera(&mut camera);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_opposite_strafe_keys_cancel() {
        let (mut controller, mut camera) = test_rig();
        controller.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        let before = camera.position;
        controller.update_camera(&mut camera);
        assert!((camera.position - before).magnitude() < 1e-6);
    }

    #[test]
    fn test_strafe_is_perpendicular_to_view_direction() {
        let (mut controller, mut camera) = test_rig();
        camera.rotate(30.0, 10.0);
        let before = camera.position;
        controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        controller.update_camera(&mut camera);
        let moved = camera.position - before;
        assert!(moved.dot(camera.front).abs() < 1e-6);
        assert!((moved.magnitude() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_first_cursor_event_does_not_rotate() {
        let (mut controller, mut camera) = test_rig();
        let front_before = camera.front;
        controller.process_cursor(912.0, 473.0, &mut camera);
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.front, front_before);
    }

    #[test]
    fn test_cursor_offset_scales_by_sensitivity() {
        let (mut controller, mut camera) = test_rig();
        controller.process_cursor(400.0, 300.0, &mut camera);
        controller.process_cursor(410.0, 290.0, &mut camera);
        assert!((camera.yaw + 89.0).abs() < 1e-5);
        assert!((camera.pitch - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_upward_cursor_travel_raises_pitch() {
        let (mut controller, mut camera) = test_rig();
        controller.process_cursor(400.0, 300.0, &mut camera);
        controller.process_cursor(400.0, 250.0, &mut camera);
        assert!(camera.pitch > 0.0);
    }

    #[test]
    fn test_pitch_stays_clamped_under_large_cursor_sweeps() {
        let (mut controller, mut camera) = test_rig();
        controller.process_cursor(400.0, 10_000.0, &mut camera);
        for step in 1..=20 {
            controller.process_cursor(400.0, 10_000.0 - step as f64 * 500.0, &mut camera);
        }
        assert_eq!(camera.pitch, 89.0);
        for step in 1..=40 {
            controller.process_cursor(400.0, step as f64 * 500.0, &mut camera);
        }
        assert_eq!(camera.pitch, -89.0);
    }
}
