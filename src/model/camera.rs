use glam::{Mat4, Vec3};

const PITCH_LIMIT: f32 = 89.0;
const FOV_MIN: f32 = 1.0;
const FOV_MAX: f32 = 45.0;

/// Movement directions for keyboard-driven translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-look camera: position plus yaw/pitch orientation and fov zoom.
///
/// Angles are in degrees. Pitch is clamped to (-89, 89); yaw is unbounded
/// and wraps implicitly through the trig in [`CameraRig::front`]. The rig
/// consumes raw pointer samples, scroll offsets, and movement keys, and
/// produces the view/projection matrices each frame.
pub struct CameraRig {
    pub position: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees, clamped to [1, 45] by scroll input.
    pub fov: f32,
    pub sensitivity: f32,
    pub base_speed: f32,
    /// Extra per-frame speed, accumulated by the speed-adjust keys. Unclamped.
    pub speed_bias: f32,
    front: Vec3,
    last_cursor: Option<(f32, f32)>,
}

impl Default for CameraRig {
    fn default() -> Self {
        let mut rig = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            up: Vec3::Y,
            // front points down -Z
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            sensitivity: 0.1,
            base_speed: 2.5,
            speed_bias: 0.0,
            front: Vec3::NEG_Z,
            last_cursor: None,
        };
        rig.update_front();
        rig
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit vector the camera is facing.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Feed an absolute pointer position. The first sample only latches the
    /// position so the initial event does not produce a jump-cut delta.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if let Some((lx, ly)) = self.last_cursor {
            let dx = (x - lx) * self.sensitivity;
            let dy = (y - ly) * self.sensitivity;
            self.yaw += dx;
            self.pitch = (self.pitch + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.update_front();
        }
        self.last_cursor = Some((x, y));
    }

    /// Scroll zoom: positive offsets narrow the fov.
    pub fn on_scroll(&mut self, y_offset: f32) {
        self.fov = (self.fov - y_offset).clamp(FOV_MIN, FOV_MAX);
    }

    /// Translate along the facing direction or the strafe axis.
    pub fn on_movement_key(&mut self, direction: MoveDirection, dt: f32) {
        let speed = self.base_speed * dt + self.speed_bias;
        match direction {
            MoveDirection::Forward => self.position += self.front * speed,
            MoveDirection::Backward => self.position -= self.front * speed,
            MoveDirection::Left => self.position -= self.right() * speed,
            MoveDirection::Right => self.position += self.right() * speed,
        }
    }

    /// Accumulate into the speed bias. Intentionally unclamped.
    pub fn on_speed_adjust(&mut self, delta: f32) {
        self.speed_bias += delta;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, 0.1, 100.0)
    }

    fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn default_front_points_down_negative_z() {
        let rig = CameraRig::new();
        assert_close(rig.front(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn first_pointer_sample_only_latches() {
        let mut rig = CameraRig::new();
        let (yaw, pitch) = (rig.yaw, rig.pitch);
        rig.on_pointer_move(500.0, 300.0);
        assert_eq!(rig.yaw, yaw);
        assert_eq!(rig.pitch, pitch);
        // the next sample produces a real delta
        rig.on_pointer_move(510.0, 300.0);
        assert!((rig.yaw - yaw).abs() > 0.0);
    }

    #[test]
    fn pitch_stays_clamped_under_large_input() {
        let mut rig = CameraRig::new();
        rig.on_pointer_move(0.0, 0.0);
        rig.on_pointer_move(0.0, 1e6);
        assert!(rig.pitch <= 89.0);
        rig.on_pointer_move(0.0, -1e6);
        assert!(rig.pitch >= -89.0);
    }

    #[test]
    fn front_stays_unit_length() {
        let mut rig = CameraRig::new();
        rig.on_pointer_move(0.0, 0.0);
        for i in 0..100 {
            rig.on_pointer_move(i as f32 * 13.7, (i as f32 * 7.3).sin() * 400.0);
            assert!((rig.front().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn fov_stays_clamped() {
        let mut rig = CameraRig::new();
        rig.on_scroll(1000.0);
        assert_eq!(rig.fov, 1.0);
        rig.on_scroll(-1000.0);
        assert_eq!(rig.fov, 45.0);
        rig.on_scroll(5.0);
        assert_eq!(rig.fov, 40.0);
    }

    #[test]
    fn view_matrix_matches_look_at() {
        let rig = CameraRig::new();
        let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let got = rig.view_matrix();
        for (a, b) in got.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert!((a - b).abs() < 1e-5);
        }
        // identity rotation, world translated by (0, 0, -3)
        let t = got.w_axis;
        assert!((t.x).abs() < 1e-5 && (t.y).abs() < 1e-5 && (t.z + 3.0).abs() < 1e-5);
    }

    #[test]
    fn movement_follows_front_and_strafe_axes() {
        let mut rig = CameraRig::new();
        rig.on_movement_key(MoveDirection::Forward, 1.0);
        assert_close(rig.position, Vec3::new(0.0, 0.0, 3.0 - 2.5));

        let mut rig = CameraRig::new();
        rig.on_movement_key(MoveDirection::Right, 1.0);
        // right of -Z is +X
        assert_close(rig.position, Vec3::new(2.5, 0.0, 3.0));
    }

    #[test]
    fn speed_bias_accumulates_without_clamp() {
        let mut rig = CameraRig::new();
        for _ in 0..1000 {
            rig.on_speed_adjust(0.5);
        }
        assert_eq!(rig.speed_bias, 500.0);
        rig.on_speed_adjust(-600.0);
        assert_eq!(rig.speed_bias, -100.0);
    }
}
