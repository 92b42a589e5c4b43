//! # Application Lifecycle
//!
//! Window creation, the winit event loop and the wiring between window
//! events, the camera and the render engine. The window and engine are
//! created lazily in `resumed` because winit only allows window creation
//! once the loop is running; a startup failure there is stored and
//! surfaced from `run` after the loop exits.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager, fly_camera::FlyCamera,
    },
    render_engine::RenderEngine,
};

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const WINDOW_TITLE: &str = "3D World";

pub const VERTEX_SHADER_PATH: &str = "res/shaders/quad.vs.wgsl";
pub const FRAGMENT_SHADER_PATH: &str = "res/shaders/quad.fs.wgsl";

const CAMERA_POSITION: Vector3<f32> = Vector3::new(0.0, 0.0, 3.0);
const CAMERA_YAW_DEG: f32 = -90.0;
const CAMERA_PITCH_DEG: f32 = 0.0;
/// World units per frame per held movement key.
const CAMERA_MOVE_SPEED: f32 = 0.03;
/// Degrees per pixel of cursor travel.
const MOUSE_SENSITIVITY: f32 = 0.1;

pub struct CairnApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera_manager: CameraManager,
    init_error: Option<anyhow::Error>,
}

impl CairnApp {
    /// Create the application with the default camera three units back
    /// from the origin, looking down the negative Z axis.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let camera = FlyCamera::new(
            CAMERA_POSITION,
            CAMERA_YAW_DEG,
            CAMERA_PITCH_DEG,
            WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32,
        );
        let controller = CameraController::new(CAMERA_MOVE_SPEED, MOUSE_SENSITIVITY);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                camera_manager: CameraManager::new(camera, controller),
                init_error: None,
            },
        })
    }

    /// Run the event loop to completion (consumes self). Startup
    /// failures inside the winit callbacks are carried out of the loop
    /// and returned here.
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.init_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);

        // Capture the cursor for mouse look. Confined keeps absolute
        // cursor positions flowing; Locked is the fallback where
        // confinement is unsupported.
        if let Err(error) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("cursor grab unavailable: {error}");
        }
        window.set_cursor_visible(false);

        let (width, height) = window.inner_size().into();
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            Path::new(VERTEX_SHADER_PATH),
            Path::new(FRAGMENT_SHADER_PATH),
        ))?;

        self.camera_manager.camera.resize_projection(width, height);
        self.window = Some(window);
        self.render_engine = Some(render_engine);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_window(event_loop) {
            log::error!("startup failed: {error:#}");
            self.init_error = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                if key_code == KeyCode::Escape && state.is_pressed() {
                    event_loop.exit();
                    return;
                }
                self.camera_manager.process_keyboard(key_code, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.camera_manager.process_cursor(position.x, position.y);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera_manager.camera.resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                self.camera_manager.update();
                render_engine.update(self.camera_manager.uniform());
                if let Err(error) = render_engine.render_frame() {
                    log::error!("frame failed: {error:#}");
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous rendering: request the next frame as soon as the
        // queue drains.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
