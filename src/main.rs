//! scene3d arena
//!
//! Runs the arena scene in a winit window. The scene's draw dispatch goes to a
//! logging sink.

use std::error::Error;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use scene3d::config::AppConfig;
use scene3d::scene::Arena;
use scene3d::systems::{FrameClock, LogRenderer, WindowError, WindowSystem};
use scene3d_core::Scene;
use scene3d_input::{FreeFlyController, InputState, Viewport};
use scene3d_math::Vec2;

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    scene: Scene,
    arena: Arena,
    input: InputState,
    clock: FrameClock,
    renderer: LogRenderer,
    error: Option<WindowError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera_settings = config.camera.to_settings();

        let scene = Scene::new("arena")
            .with_camera(camera_settings.to_camera(aspect))
            .with_free_fly(FreeFlyController::new(config.input.to_free_fly()))
            .with_collision(config.physics.to_collision());
        let arena = Arena::new(camera_settings, config.game.to_settings());

        Self {
            config,
            window: None,
            scene,
            arena,
            input: InputState::new(),
            clock: FrameClock::new(),
            renderer: LogRenderer::new(),
            error: None,
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, state: ElementState, repeat: bool) {
        if state == ElementState::Pressed && !repeat {
            match key {
                KeyCode::Escape if !self.scene.camera.is_free() => {
                    event_loop.exit();
                    return;
                }
                KeyCode::F1 if !self.scene.camera.is_free() => {
                    if let Some(window) = self.window.as_mut() {
                        self.scene.camera.enable_free_camera(window);
                    }
                }
                _ => {}
            }
        }
        // The scene leaves free-fly itself when Escape is released
        self.input.process_keyboard(key, state);
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.as_mut() else {
            return;
        };

        let dt = self.clock.tick();
        let stats = self
            .scene
            .run_frame(&mut self.arena, &self.input, window, &mut self.renderer, dt);
        self.input.end_frame();

        if self.clock.frames() % 300 == 0 {
            log::debug!(
                "Frame {}: {} collisions, {} draws",
                self.clock.frames(),
                stats.collisions,
                stats.draws
            );
        }

        let position = if self.scene.camera.is_free() {
            Some(self.scene.camera.position())
        } else {
            self.arena.player_position(&self.scene)
        };
        window.update_title(position.unwrap_or_default(), self.scene.camera.mode());
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        };

        let size = window.window().inner_size();
        self.scene.window_resized(&Viewport::new(0, 0, size.width, size.height));
        if self.config.debug.start_free_fly {
            self.scene.camera.enable_free_camera(&mut window);
        }
        self.scene.start(&mut self.arena, &mut window);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.scene.shutdown(&mut self.renderer);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.scene.window_resized(&Viewport::new(0, 0, size.width, size.height));
            }

            WindowEvent::Moved(position) => {
                if let Some(window) = self.window.as_mut() {
                    let position = Vec2::new(position.x as f32, position.y as f32);
                    self.scene.window_moved(&mut self.arena, window, position);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(event_loop, key, event.state, event.repeat);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_moved(position.x, position.y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.input.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting scene3d");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
