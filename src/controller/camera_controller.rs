use winit::keyboard::KeyCode;

use crate::controller::InputState;
use crate::model::{CameraRig, MoveDirection};

/// Applies held movement and speed-adjust keys to the camera each frame.
/// Pointer and scroll events go to the rig directly; this only covers the
/// polled key state.
pub struct CameraController {
    /// Speed-bias change applied per frame while an adjust key is held.
    pub speed_step: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self { speed_step: 0.01 }
    }

    pub fn update(&self, rig: &mut CameraRig, input: &InputState, dt: f32) {
        if input.is_pressed(KeyCode::KeyW) {
            rig.on_movement_key(MoveDirection::Forward, dt);
        }
        if input.is_pressed(KeyCode::KeyS) {
            rig.on_movement_key(MoveDirection::Backward, dt);
        }
        if input.is_pressed(KeyCode::KeyA) {
            rig.on_movement_key(MoveDirection::Left, dt);
        }
        if input.is_pressed(KeyCode::KeyD) {
            rig.on_movement_key(MoveDirection::Right, dt);
        }

        if input.is_pressed(KeyCode::ArrowUp) {
            rig.on_speed_adjust(self.speed_step);
        }
        if input.is_pressed(KeyCode::ArrowDown) {
            rig.on_speed_adjust(-self.speed_step);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use winit::event::ElementState;

    #[test]
    fn held_key_moves_camera_forward() {
        let mut rig = CameraRig::new();
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);

        let start = rig.position;
        CameraController::new().update(&mut rig, &input, 0.016);
        assert!(rig.position != start);
        // forward from the default pose is -Z
        assert!(rig.position.z < start.z);
        assert!((rig.position.truncate() - start.truncate()).length() < 1e-6);
    }

    #[test]
    fn adjust_keys_move_speed_bias_both_ways() {
        let mut rig = CameraRig::new();
        let mut input = InputState::new();
        let controller = CameraController::new();

        input.process_key(KeyCode::ArrowUp, ElementState::Pressed);
        controller.update(&mut rig, &input, 0.016);
        assert!(rig.speed_bias > 0.0);

        input.process_key(KeyCode::ArrowUp, ElementState::Released);
        input.process_key(KeyCode::ArrowDown, ElementState::Pressed);
        controller.update(&mut rig, &input, 0.016);
        controller.update(&mut rig, &input, 0.016);
        assert!(rig.speed_bias < 0.0);
    }

    #[test]
    fn no_keys_no_motion() {
        let mut rig = CameraRig::new();
        let input = InputState::new();
        CameraController::new().update(&mut rig, &input, 0.016);
        assert_eq!(rig.position, Vec3::new(0.0, 0.0, 3.0));
    }
}
