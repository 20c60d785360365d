//! Scene and frame driver
//!
//! A [`Scene`] owns the world, camera and lighting of one running level.
//! Game code plugs in through [`SceneHooks`]; [`Scene::run_frame`] calls the
//! hooks and the world passes in a fixed order:
//!
//! 1. free-fly camera input (when the camera is free)
//! 2. [`SceneHooks::update`]
//! 3. [`SceneHooks::before_render`]
//! 4. collision pass, then velocity integration
//! 5. render dispatch to the [`RenderSink`]
//! 6. [`SceneHooks::after_render`]

use scene3d_input::{FreeFlyController, InputState, KeyCode, Viewport, WindowControl};
use scene3d_math::Vec2;

use crate::pipeline::{before_render_pass, render_pass, CollisionSettings};
use crate::{Camera, Lighting, RenderSink, RenderView, World};

/// Game logic attached to a scene
///
/// Every method has an empty default so implementors only override what they
/// use.
pub trait SceneHooks {
    /// Called once, before the first frame
    fn start(&mut self, _scene: &mut Scene, _window: &mut dyn WindowControl) {}

    /// Per-frame game logic, before collisions are resolved
    fn update(&mut self, _scene: &mut Scene, _input: &InputState, _window: &mut dyn WindowControl, _dt: f32) {}

    /// Runs right before the collision pass
    fn before_render(&mut self, _scene: &mut Scene, _window: &mut dyn WindowControl, _dt: f32) {}

    /// Runs after the frame has been handed to the renderer
    fn after_render(&mut self, _scene: &mut Scene, _dt: f32) {}

    /// The host window was moved to `position` (desktop pixels)
    fn on_window_move(&mut self, _scene: &mut Scene, _window: &mut dyn WindowControl, _position: Vec2) {}
}

/// Counters from one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Colliding pairs found by the collision pass
    pub collisions: usize,
    /// Entities handed to the render sink
    pub draws: usize,
}

/// A running scene
pub struct Scene {
    pub name: String,
    pub world: World,
    pub camera: Camera,
    pub lighting: Lighting,
    pub free_fly: FreeFlyController,
    pub collision: CollisionSettings,
    started: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: World::new(),
            camera: Camera::default(),
            lighting: Lighting::default(),
            free_fly: FreeFlyController::default(),
            collision: CollisionSettings::default(),
            started: false,
        }
    }

    /// Builder: replace the camera
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Builder: replace the free-fly controller
    pub fn with_free_fly(mut self, free_fly: FreeFlyController) -> Self {
        self.free_fly = free_fly;
        self
    }

    /// Builder: set collision pass options
    pub fn with_collision(mut self, collision: CollisionSettings) -> Self {
        self.collision = collision;
        self
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Run the start hook if it has not run yet
    pub fn start<H: SceneHooks + ?Sized>(&mut self, hooks: &mut H, window: &mut dyn WindowControl) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!("Starting scene '{}'", self.name);
        hooks.start(self, window);
    }

    /// Advance the scene by one frame and render it
    pub fn run_frame<H, S>(
        &mut self,
        hooks: &mut H,
        input: &InputState,
        window: &mut dyn WindowControl,
        sink: &mut S,
        dt: f32,
    ) -> FrameStats
    where
        H: SceneHooks + ?Sized,
        S: RenderSink + ?Sized,
    {
        self.start(hooks, window);

        if self.camera.is_free() {
            if input.was_released(KeyCode::Escape) {
                self.camera.disable_free_camera(window);
            } else {
                self.free_fly.update(&mut self.camera, input, dt);
            }
        }

        hooks.update(self, input, window, dt);
        hooks.before_render(self, window, dt);
        let collisions = before_render_pass(&mut self.world, &self.collision, dt);

        let view = RenderView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            camera_position: self.camera.position(),
            lighting: &self.lighting,
        };
        let draws = render_pass(&mut self.world, &view, sink);

        hooks.after_render(self, dt);

        FrameStats { collisions, draws }
    }

    /// Forward a window move to the hooks
    pub fn window_moved<H: SceneHooks + ?Sized>(&mut self, hooks: &mut H, window: &mut dyn WindowControl, position: Vec2) {
        hooks.on_window_move(self, window, position);
    }

    /// Keep the camera aspect in step with the window
    pub fn window_resized(&mut self, viewport: &Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.camera.set_aspect(viewport.aspect());
    }

    /// Camera and lighting for the current state
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            camera_position: self.camera.position(),
            lighting: &self.lighting,
        }
    }

    /// Destroy every node and hand the freed meshes to the sink
    pub fn shutdown<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        self.world.clear();
        for mesh in self.world.take_released() {
            sink.release(mesh);
        }
        self.lighting.clear_point_lights();
        log::info!("Scene '{}' shut down", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Collider, Entity, EntityKey, MeshHandle};
    use scene3d_math::Vec3;
    use scene3d_input::ElementState;

    #[derive(Default)]
    struct FakeWindow {
        viewport: Viewport,
        captured: bool,
    }

    impl WindowControl for FakeWindow {
        fn viewport(&self) -> Viewport {
            self.viewport
        }
        fn set_position(&mut self, x: i32, y: i32) {
            self.viewport.x = x;
            self.viewport.y = y;
        }
        fn set_size(&mut self, width: u32, height: u32) {
            self.viewport.width = width;
            self.viewport.height = height;
        }
        fn set_cursor_captured(&mut self, captured: bool) -> bool {
            self.captured = captured;
            captured
        }
        fn is_cursor_captured(&self) -> bool {
            self.captured
        }
        fn monitor_size(&self) -> Option<(u32, u32)> {
            Some((1920, 1080))
        }
    }

    #[derive(Default)]
    struct CountingSink {
        draws: usize,
        released: Vec<MeshHandle>,
    }

    impl RenderSink for CountingSink {
        fn draw(&mut self, _view: &RenderView<'_>, _key: EntityKey, _entity: &Entity) {
            self.draws += 1;
        }
        fn release(&mut self, mesh: MeshHandle) {
            self.released.push(mesh);
        }
    }

    /// Records hook calls and where the ball was when each ran
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        ball: Option<EntityKey>,
        ball_x_before_render: f32,
    }

    impl SceneHooks for Recorder {
        fn start(&mut self, scene: &mut Scene, _window: &mut dyn WindowControl) {
            self.calls.push("start");
            self.ball = Some(scene.world.add_entity(
                Entity::new()
                    .with_velocity(Vec3::new(1.0, 0.0, 0.0))
                    .with_friction(0.0)
                    .with_collider(Collider::sphere(0.5)),
            ));
        }
        fn update(&mut self, _scene: &mut Scene, _input: &InputState, _window: &mut dyn WindowControl, _dt: f32) {
            self.calls.push("update");
        }
        fn before_render(&mut self, scene: &mut Scene, _window: &mut dyn WindowControl, _dt: f32) {
            self.calls.push("before_render");
            self.ball_x_before_render = self.ball.and_then(|k| scene.world.get(k)).map_or(f32::NAN, |e| e.position().x);
        }
        fn after_render(&mut self, _scene: &mut Scene, _dt: f32) {
            self.calls.push("after_render");
        }
        fn on_window_move(&mut self, _scene: &mut Scene, window: &mut dyn WindowControl, _position: Vec2) {
            self.calls.push("window_move");
            window.set_position(0, 0);
        }
    }

    #[test]
    fn test_hook_order_and_single_start() {
        let mut scene = Scene::new("test");
        let mut hooks = Recorder::default();
        let mut window = FakeWindow::default();
        let mut sink = CountingSink::default();
        let input = InputState::new();

        scene.run_frame(&mut hooks, &input, &mut window, &mut sink, 0.5);
        let stats = scene.run_frame(&mut hooks, &input, &mut window, &mut sink, 0.5);

        assert_eq!(
            hooks.calls,
            vec!["start", "update", "before_render", "after_render", "update", "before_render", "after_render"]
        );
        assert_eq!(stats, FrameStats { collisions: 0, draws: 1 });
        // integration runs after before_render on each frame
        assert_eq!(hooks.ball_x_before_render, 0.5);
        let ball = hooks.ball.and_then(|k| scene.world.get(k)).map(|e| e.position().x);
        assert_eq!(ball, Some(1.0));
    }

    #[test]
    fn test_escape_release_leaves_free_fly() {
        let mut scene = Scene::new("test");
        let mut window = FakeWindow::default();
        let mut sink = CountingSink::default();
        scene.camera.enable_free_camera(&mut window);

        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        input.end_frame();
        input.process_keyboard(KeyCode::Escape, ElementState::Released);

        scene.run_frame(&mut Recorder::default(), &input, &mut window, &mut sink, 0.016);
        assert!(!scene.camera.is_free());
        assert!(!window.captured);
    }

    #[test]
    fn test_free_fly_moves_camera() {
        let mut scene = Scene::new("test");
        let mut window = FakeWindow::default();
        let mut sink = CountingSink::default();
        scene.camera.enable_free_camera(&mut window);

        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        let speed = scene.free_fly.settings.move_speed;

        scene.run_frame(&mut Recorder::default(), &input, &mut window, &mut sink, 1.0);
        assert!((scene.camera.position().z + speed).abs() < 0.0001);
    }

    #[test]
    fn test_following_camera_ignores_free_fly_keys() {
        let mut scene = Scene::new("test");
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);

        scene.run_frame(&mut Recorder::default(), &input, &mut FakeWindow::default(), &mut CountingSink::default(), 1.0);
        assert_eq!(scene.camera.position(), Vec3::ZERO);
    }

    #[test]
    fn test_window_moved_reaches_hooks() {
        let mut scene = Scene::new("test");
        let mut hooks = Recorder::default();
        let mut window = FakeWindow {
            viewport: Viewport::new(40, 40, 800, 600),
            ..Default::default()
        };
        scene.window_moved(&mut hooks, &mut window, Vec2::new(40.0, 40.0));
        assert_eq!(hooks.calls, vec!["window_move"]);
        assert_eq!(window.viewport.position(), Vec2::ZERO);
    }

    #[test]
    fn test_window_resized_updates_aspect() {
        let mut scene = Scene::new("test");
        scene.window_resized(&Viewport::new(0, 0, 1000, 500));
        assert_eq!(scene.camera.aspect(), 2.0);
        scene.window_resized(&Viewport::new(0, 0, 0, 0));
        assert_eq!(scene.camera.aspect(), 2.0);
    }

    #[test]
    fn test_shutdown_releases_meshes() {
        let mut scene = Scene::new("test");
        scene.world.add_entity(Entity::new().with_mesh(MeshHandle(7)));
        let mut sink = CountingSink::default();
        scene.shutdown(&mut sink);
        assert!(scene.world.is_empty());
        assert_eq!(sink.released, vec![MeshHandle(7)]);
    }
}
