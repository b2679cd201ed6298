use glam::{Mat4, Vec3};

/// World-space offsets for the 10 cube instances, in draw order.
pub const CUBE_OFFSETS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Per-instance static tilt, degrees per instance index.
const BASE_TILT_DEG: f32 = -55.0;
/// Continuous spin rate: BASE + index * STEP, degrees per second.
const SPIN_RATE_BASE_DEG: f32 = 50.0;
const SPIN_RATE_STEP_DEG: f32 = 5.0;

const TILT_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const SPIN_AXIS: Vec3 = Vec3::new(0.5, 1.0, 0.0);

/// The fixed instance set: all draws share one cube mesh, only the model
/// matrix differs per instance.
pub struct Scene;

impl Scene {
    pub fn instance_count() -> usize {
        CUBE_OFFSETS.len()
    }

    /// Model matrix for instance `i` at `elapsed` seconds since start:
    /// translation to the fixed offset, a static tilt that grows with the
    /// index, then a time-based spin whose rate also grows with the index.
    pub fn instance_model(i: usize, elapsed: f32) -> Mat4 {
        let base_angle = (BASE_TILT_DEG * i as f32).to_radians();
        let spin_angle = (elapsed * (SPIN_RATE_BASE_DEG + i as f32 * SPIN_RATE_STEP_DEG)).to_radians();

        Mat4::from_translation(CUBE_OFFSETS[i])
            * Mat4::from_axis_angle(TILT_AXIS.normalize(), base_angle)
            * Mat4::from_axis_angle(SPIN_AXIS.normalize(), spin_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_instances() {
        assert_eq!(Scene::instance_count(), 10);
    }

    #[test]
    fn model_translation_matches_offset() {
        for (i, offset) in CUBE_OFFSETS.iter().enumerate() {
            let m = Scene::instance_model(i, 12.34);
            let t = m.w_axis.truncate();
            assert!((t - *offset).length() < 1e-5);
        }
    }

    #[test]
    fn first_instance_at_time_zero_is_identity() {
        // index 0 has no tilt and no elapsed spin
        let m = Scene::instance_model(0, 0.0);
        for (a, b) in m.to_cols_array().iter().zip(Mat4::IDENTITY.to_cols_array()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn rotation_preserves_scale() {
        let m = Scene::instance_model(7, 3.21);
        // the upper-left 3x3 of a pure rotation has unit-length columns
        for col in [m.x_axis.truncate(), m.y_axis.truncate(), m.z_axis.truncate()] {
            assert!((col.length() - 1.0).abs() < 1e-5);
        }
    }
}
