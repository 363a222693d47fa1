use std::time::Instant;

use nalgebra_glm as glm;

use crate::input::{InputSource, NavKey};
use crate::renderer::camera::CameraState;

const ASPECT_RATIO: f32 = 4.0 / 3.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Drives the free-look camera: samples the pointer offset from the
/// reference point once per frame, recenters the pointer, and applies
/// held navigation keys.
///
/// Pointer rotation is applied per frame without time scaling, so a
/// higher frame rate turns faster for the same physical mouse motion.
/// Key movement is scaled by the elapsed time and is frame rate
/// independent. The first update after construction sees zero elapsed
/// time and produces no movement.
pub struct CameraController {
    state: CameraState,
    last_time: Option<Instant>,
}

impl CameraController {
    pub fn new(state: CameraState) -> Self {
        Self {
            state,
            last_time: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Advances the camera one frame and returns the (view, projection)
    /// pair for it. `now` is injected so tests can script time.
    pub fn update(&mut self, input: &mut dyn InputSource, now: Instant) -> (glm::Mat4, glm::Mat4) {
        let dt = match self.last_time {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_time = Some(now);

        let (pointer_x, pointer_y) = input.pointer_position();
        let (reference_x, reference_y) = input.reference_point();
        input.recenter_pointer();

        self.state.horizontal_angle +=
            self.state.mouse_sensitivity * (reference_x - pointer_x) as f32;
        self.state.vertical_angle +=
            self.state.mouse_sensitivity * (reference_y - pointer_y) as f32;

        let direction = self.state.direction();
        let right = self.state.right();
        let up = self.state.up();

        let step = dt * self.state.move_speed;
        if input.is_pressed(NavKey::Forward) {
            self.state.position += direction * step;
        }
        if input.is_pressed(NavKey::Backward) {
            self.state.position -= direction * step;
        }
        if input.is_pressed(NavKey::StrafeRight) {
            self.state.position += right * step;
        }
        if input.is_pressed(NavKey::StrafeLeft) {
            self.state.position -= right * step;
        }
        let world_up = glm::vec3(0.0, 1.0, 0.0);
        if input.is_pressed(NavKey::Up) {
            self.state.position += world_up * step;
        }
        if input.is_pressed(NavKey::Down) {
            self.state.position -= world_up * step;
        }

        let projection =
            glm::perspective(ASPECT_RATIO, self.state.field_of_view, NEAR_PLANE, FAR_PLANE);
        let view = glm::look_at(
            &self.state.position,
            &(self.state.position + direction),
            &up,
        );
        (view, projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Input source with a fixed pointer offset and key set, for driving
    /// the controller without a window.
    struct ScriptedInput {
        pointer: (f64, f64),
        reference: (f64, f64),
        pressed: Vec<NavKey>,
        recenter_on_sample: bool,
    }

    impl ScriptedInput {
        fn idle() -> Self {
            Self {
                pointer: (512.0, 384.0),
                reference: (512.0, 384.0),
                pressed: Vec::new(),
                recenter_on_sample: true,
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn pointer_position(&self) -> (f64, f64) {
            self.pointer
        }

        fn reference_point(&self) -> (f64, f64) {
            self.reference
        }

        fn recenter_pointer(&mut self) {
            if self.recenter_on_sample {
                self.pointer = self.reference;
            }
        }

        fn is_pressed(&self, key: NavKey) -> bool {
            self.pressed.contains(&key)
        }
    }

    fn assert_vec3_eq(a: &glm::Vec3, b: &glm::Vec3) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5, "component {i}: {a:?} vs {b:?}");
        }
    }

    fn assert_mat4_eq(a: &glm::Mat4, b: &glm::Mat4) {
        for i in 0..16 {
            assert!((a[i] - b[i]).abs() < 1e-5, "element {i}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn idle_input_leaves_the_camera_alone() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        let start = Instant::now();

        let initial = controller.state().clone();
        for i in 0..5 {
            controller.update(&mut input, start + Duration::from_millis(16 * i));
        }

        assert_vec3_eq(&controller.state().position, &initial.position);
        assert_eq!(controller.state().horizontal_angle, initial.horizontal_angle);
        assert_eq!(controller.state().vertical_angle, initial.vertical_angle);
    }

    #[test]
    fn forward_movement_is_time_scaled() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pressed.push(NavKey::Forward);
        let start = Instant::now();

        // First call only establishes the time base.
        controller.update(&mut input, start);
        let origin = controller.state().position;
        let direction = controller.state().direction();
        let speed = controller.state().move_speed;

        for i in 1..=4 {
            controller.update(&mut input, start + Duration::from_millis(100 * i));
        }

        let expected = origin + direction * (0.4 * speed);
        assert_vec3_eq(&controller.state().position, &expected);
    }

    #[test]
    fn first_update_never_moves() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pressed.push(NavKey::Forward);

        let origin = controller.state().position;
        controller.update(&mut input, Instant::now());
        assert_vec3_eq(&controller.state().position, &origin);
    }

    #[test]
    fn pointer_offset_turns_by_sensitivity_regardless_of_dt() {
        let start = Instant::now();
        let run = |frame_gap_ms: u64| {
            let mut controller = CameraController::new(CameraState::default());
            let mut input = ScriptedInput::idle();
            input.pointer = (502.0, 380.0); // 10 px left, 4 px up of reference
            input.recenter_on_sample = false;
            controller.update(&mut input, start);
            controller.update(&mut input, start + Duration::from_millis(frame_gap_ms));
            (
                controller.state().horizontal_angle,
                controller.state().vertical_angle,
            )
        };

        // Same pointer offset per frame turns the same amount whether the
        // frames are 1ms or 100ms apart.
        let fast = run(1);
        let slow = run(100);
        assert_eq!(fast, slow);

        let sensitivity = CameraState::default().mouse_sensitivity;
        assert!((fast.0 - (3.14 + 2.0 * sensitivity * 10.0)).abs() < 1e-6);
        assert!((fast.1 - 2.0 * sensitivity * 4.0).abs() < 1e-6);
    }

    #[test]
    fn recenter_happens_after_sampling() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pointer = (600.0, 384.0);
        controller.update(&mut input, Instant::now());

        // The offset was consumed and the pointer snapped back.
        assert_eq!(input.pointer, input.reference);
        let sensitivity = CameraState::default().mouse_sensitivity;
        let expected = 3.14 + sensitivity * (512.0 - 600.0) as f32;
        assert!((controller.state().horizontal_angle - expected).abs() < 1e-6);
    }

    #[test]
    fn dropping_a_held_key_stops_translation() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pressed.push(NavKey::Forward);
        let start = Instant::now();

        controller.update(&mut input, start);
        controller.update(&mut input, start + Duration::from_millis(100));
        let position_at_drop = controller.state().position;

        // The app empties the pressed set when window focus changes;
        // from then on the camera must hold still.
        input.pressed.clear();
        for i in 2..6 {
            controller.update(&mut input, start + Duration::from_millis(100 * i));
        }
        assert_vec3_eq(&controller.state().position, &position_at_drop);
    }

    #[test]
    fn vertical_movement_follows_world_up() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pressed.push(NavKey::Up);
        let start = Instant::now();

        controller.update(&mut input, start);
        let origin = controller.state().position;
        let speed = controller.state().move_speed;
        controller.update(&mut input, start + Duration::from_millis(500));

        let expected = origin + glm::vec3(0.0, 0.5 * speed, 0.0);
        assert_vec3_eq(&controller.state().position, &expected);
    }

    #[test]
    fn projection_depends_only_on_field_of_view() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();
        input.pressed.push(NavKey::StrafeRight);
        let start = Instant::now();

        let (_, first) = controller.update(&mut input, start);
        let (_, second) = controller.update(&mut input, start + Duration::from_millis(250));
        assert_mat4_eq(&first, &second);

        let expected = glm::perspective(4.0 / 3.0, 45.0f32.to_radians(), 0.1, 100.0);
        assert_mat4_eq(&first, &expected);
    }

    #[test]
    fn view_matrix_matches_look_at_of_the_pose() {
        let mut controller = CameraController::new(CameraState::default());
        let mut input = ScriptedInput::idle();

        let (view, _) = controller.update(&mut input, Instant::now());

        let state = controller.state();
        let expected = glm::look_at(
            &state.position,
            &(state.position + state.direction()),
            &state.up(),
        );
        assert_mat4_eq(&view, &expected);
    }

    #[test]
    fn up_vector_is_right_cross_direction() {
        let state = CameraState::default();
        let expected = state.right().cross(&state.direction());
        assert_vec3_eq(&state.up(), &expected);
    }
}
