pub mod camera;
mod render;
mod renderer;

pub use renderer::Renderer;
