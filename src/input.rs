use std::collections::HashSet;

use winit::dpi::PhysicalPosition;
use winit::keyboard::KeyCode;
use winit::window::Window;

/// Navigation actions the camera understands, independent of the key
/// bindings that trigger them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
}

/// Maps a physical key to its navigation action. Arrow keys are the
/// historical bindings; WASD is an alias for the same actions.
pub fn nav_key_for(code: KeyCode) -> Option<NavKey> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(NavKey::Forward),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(NavKey::Backward),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(NavKey::StrafeLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(NavKey::StrafeRight),
        KeyCode::PageUp => Some(NavKey::Up),
        KeyCode::PageDown => Some(NavKey::Down),
        _ => None,
    }
}

/// Everything the camera polls once per frame: where the pointer is,
/// which navigation keys are held, and the ability to snap the pointer
/// back to the reference point after sampling.
///
/// The camera never talks to the window directly, so its update logic
/// can be driven by a scripted source in tests.
pub trait InputSource {
    fn pointer_position(&self) -> (f64, f64);
    fn reference_point(&self) -> (f64, f64);
    fn recenter_pointer(&mut self);
    fn is_pressed(&self, key: NavKey) -> bool;
}

/// Live input source backed by the winit window and the key/cursor state
/// the app accumulates from window events.
pub struct WindowInput<'a> {
    window: &'a Window,
    pressed: &'a HashSet<NavKey>,
    cursor: &'a mut (f64, f64),
    reference: (f64, f64),
}

impl<'a> WindowInput<'a> {
    pub fn new(
        window: &'a Window,
        pressed: &'a HashSet<NavKey>,
        cursor: &'a mut (f64, f64),
        reference: (f64, f64),
    ) -> Self {
        Self {
            window,
            pressed,
            cursor,
            reference,
        }
    }
}

impl InputSource for WindowInput<'_> {
    fn pointer_position(&self) -> (f64, f64) {
        *self.cursor
    }

    fn reference_point(&self) -> (f64, f64) {
        self.reference
    }

    fn recenter_pointer(&mut self) {
        // Some platforms refuse to warp the pointer; the camera then
        // simply sees no further deltas.
        let _ = self
            .window
            .set_cursor_position(PhysicalPosition::new(self.reference.0, self.reference.1));
        *self.cursor = self.reference;
    }

    fn is_pressed(&self, key: NavKey) -> bool {
        self.pressed.contains(&key)
    }
}
