use serde::{Deserialize, Serialize};

use crate::CONFY_APP_NAME;

/// Camera tuning, persisted across sessions. Defaults match the values
/// the viewer has always shipped with: 3 units/second, 0.005 rad/pixel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            mouse_sensitivity: 0.005,
            fov_degrees: 45.0,
        }
    }
}

impl CameraSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "camera").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "camera", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub clear_color: [f32; 3],
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.4],
        }
    }
}

impl DisplaySettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "display").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "display", self);
    }
}

pub struct Settings {
    pub camera: CameraSettings,
    pub display: DisplaySettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            camera: CameraSettings::load(),
            display: DisplaySettings::load(),
        }
    }

    pub fn save(&self) {
        self.camera.save();
        self.display.save();
    }
}
