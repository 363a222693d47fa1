pub mod bmp;
pub mod obj;

use std::path::Path;

use crate::error::ViewerError;
use crate::scene::SceneSource;

/// Loads a model file into a CPU-side scene, dispatching on extension.
pub fn load_scene(path: &Path) -> Result<SceneSource, ViewerError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("obj") => {
            obj::load(path).map_err(|e| ViewerError::from(e).with_arg("path", path.display()))
        }
        _ => Err(ViewerError::new("unsupported-model-format").with_arg("path", path.display())),
    }
}
