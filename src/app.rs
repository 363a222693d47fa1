use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey, PhysicalKey};
use winit::window::Window;

use crate::error::ViewerError;
use crate::input::{NavKey, WindowInput, nav_key_for};
use crate::parser::load_scene;
use crate::renderer::Renderer;
use crate::renderer::camera::{CameraController, CameraState};
use crate::scene::Scene;
use crate::settings::Settings;

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

impl EventResponse {
    fn none() -> Self {
        Self {
            repaint: false,
            exit: false,
        }
    }
}

pub struct App {
    pub window: Arc<Window>,
    renderer: Renderer,
    scene: Option<Scene>,
    pinned_mesh: Option<usize>,
    camera_controller: CameraController,
    pressed: HashSet<NavKey>,
    cursor_position: (f64, f64),
    focused: bool,
    settings: Settings,
}

impl App {
    /// Brings up the GPU side only; the model is loaded separately so
    /// its failures stay distinguishable from device failures.
    pub async fn new(window: Arc<Window>) -> Result<Self, ViewerError> {
        let settings = Settings::load();
        let renderer = Renderer::new(&window, &settings).await?;

        let camera_state = CameraState::from_settings(&settings.camera);
        let camera_controller = CameraController::new(camera_state);

        window.set_cursor_visible(false);

        let reference = reference_point(&window);
        Ok(Self {
            window,
            renderer,
            scene: None,
            pinned_mesh: None,
            camera_controller,
            pressed: HashSet::new(),
            cursor_position: reference,
            focused: true,
            settings,
        })
    }

    /// Parses, validates and uploads a model file. When `pinned_mesh` is
    /// given, only that mesh will be drawn; it must exist in the file.
    pub fn load_model(&mut self, path: &Path, pinned_mesh: Option<usize>) -> Result<(), ViewerError> {
        let source = load_scene(path)?;
        let scene = Scene::load(self.renderer.device(), &source)
            .map_err(|e| ViewerError::from(e).with_arg("path", path.display()))?;

        if let Some(index) = pinned_mesh {
            if index >= scene.mesh_count() {
                return Err(ViewerError::new("mesh-index-out-of-range")
                    .with_arg("index", index)
                    .with_arg("count", scene.mesh_count())
                    .with_arg("path", path.display()));
            }
        }

        self.scene = Some(scene);
        self.pinned_mesh = pinned_mesh;
        Ok(())
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> EventResponse {
        match event {
            WindowEvent::CloseRequested => {
                self.settings.save();
                return EventResponse {
                    repaint: false,
                    exit: true,
                };
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    self.settings.save();
                    return EventResponse {
                        repaint: false,
                        exit: true,
                    };
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(nav) = nav_key_for(code) {
                        match event.state {
                            ElementState::Pressed => {
                                self.pressed.insert(nav);
                            }
                            ElementState::Released => {
                                self.pressed.remove(&nav);
                            }
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
            }
            WindowEvent::Focused(focused) => {
                self.focused = *focused;
                self.window.set_cursor_visible(!focused);
                // Releases are not delivered while unfocused, so a key
                // held across either focus edge would otherwise stick.
                self.pressed.clear();
                if *focused {
                    self.cursor_position = reference_point(&self.window);
                }
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
            }
            _ => {}
        }
        EventResponse::none()
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let reference = reference_point(&self.window);
        if !self.focused {
            // An unfocused window keeps the camera still.
            self.cursor_position = reference;
        }

        let mut input = WindowInput::new(
            &self.window,
            &self.pressed,
            &mut self.cursor_position,
            reference,
        );
        let (view, projection) = self.camera_controller.update(&mut input, Instant::now());

        self.renderer
            .render(self.scene.as_ref(), self.pinned_mesh, &view, &projection)
    }
}

/// Pointer recenter target: the middle of the window.
fn reference_point(window: &Window) -> (f64, f64) {
    let size = window.inner_size();
    (size.width as f64 / 2.0, size.height as f64 / 2.0)
}
