use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

mod app;
mod error;
mod input;
mod parser;
mod renderer;
mod scene;
mod settings;

pub const CONFY_APP_NAME: &str = "yingyang";

const WINDOW_TITLE: &str = "YingYang";
const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = 768;
const DEFAULT_MODEL_PATH: &str = "assets/cube.obj";

// Process exit codes, one per startup stage.
const EXIT_EVENT_LOOP: u8 = 1;
const EXIT_WINDOW: u8 = 2;
const EXIT_GPU: u8 = 3;
const EXIT_MODEL: u8 = 4;

struct AppHandler {
    app: Option<app::App>,
    model_path: PathBuf,
    pinned_mesh: Option<usize>,
    exit_code: u8,
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.exit_code = EXIT_WINDOW;
                event_loop.exit();
                return;
            }
        };

        let mut app = match pollster::block_on(app::App::new(window)) {
            Ok(app) => app,
            Err(e) => {
                log::error!("failed to initialize GPU: {e}");
                self.exit_code = EXIT_GPU;
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = app.load_model(&self.model_path, self.pinned_mesh) {
            log::error!("failed to load model '{}': {e}", self.model_path.display());
            self.exit_code = EXIT_MODEL;
            event_loop.exit();
            return;
        }

        self.app = Some(app);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &mut self.app {
            if let Err(e) = app.render() {
                log::error!("render error: {e:?}");
            }
            app.window.request_redraw();
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let model_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
    let pinned_mesh = match args.get(2) {
        Some(raw) => match raw.parse::<usize>() {
            Ok(index) => Some(index),
            Err(_) => {
                log::error!("mesh index must be a non-negative integer, got '{raw}'");
                return ExitCode::from(EXIT_MODEL);
            }
        },
        None => None,
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            return ExitCode::from(EXIT_EVENT_LOOP);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler {
        app: None,
        model_path,
        pinned_mesh,
        exit_code: 0,
    };

    if let Err(e) = event_loop.run_app(&mut handler) {
        log::error!("event loop error: {e}");
        return ExitCode::from(EXIT_EVENT_LOOP);
    }

    ExitCode::from(handler.exit_code)
}
