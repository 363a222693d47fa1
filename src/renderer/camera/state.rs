use nalgebra_glm as glm;

use crate::settings::CameraSettings;

/// Free-look camera pose and tuning. Orientation is the spherical pair
/// (horizontal, vertical) in radians; horizontal 3.14 faces roughly
/// down -Z.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: glm::Vec3,
    pub horizontal_angle: f32,
    pub vertical_angle: f32,
    pub field_of_view: f32,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl CameraState {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: glm::vec3(4.0, 3.0, -3.0),
            horizontal_angle: 3.14,
            vertical_angle: 0.0,
            field_of_view: settings.fov_degrees.to_radians(),
            move_speed: settings.move_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
        }
    }

    /// Unit vector the camera is looking along.
    pub fn direction(&self) -> glm::Vec3 {
        glm::vec3(
            self.vertical_angle.cos() * self.horizontal_angle.sin(),
            self.vertical_angle.sin(),
            self.vertical_angle.cos() * self.horizontal_angle.cos(),
        )
    }

    /// Camera-space right vector, always horizontal.
    pub fn right(&self) -> glm::Vec3 {
        let angle = self.horizontal_angle - std::f32::consts::FRAC_PI_2;
        glm::vec3(angle.sin(), 0.0, angle.cos())
    }

    pub fn up(&self) -> glm::Vec3 {
        self.right().cross(&self.direction())
    }
}
