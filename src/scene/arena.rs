//! Arena demo scene
//!
//! A top-down game played inside the OS window:
//! - The player sphere is steered with WASD and kept inside the window
//! - Enemies chase the player and bounce off it
//! - Bullets fire toward the mouse, nudge enemies they pass through and light
//!   up the floor; bullets leaving the window kick its edges outward
//! - The window shrinks over time and cannot be dragged away
//!
//! World units map to window pixels through `pixels_per_unit`, so the world
//! XZ plane lines up with the desktop.

use std::cell::Cell;
use std::rc::Rc;

use scene3d_core::{
    Camera, Collider, Entity, EntityKey, Group, GroupKey, Material, MeshHandle, PointLight, Scene, SceneHooks,
    SunLight, MAX_POINT_LIGHTS,
};
use scene3d_input::{InputState, KeyCode, WindowControl};
use scene3d_math::{Vec2, Vec3};

use super::window_bounds::{Rect, ShrinkRule, WindowBounds};

/// Bullet collider radius
const BULLET_RADIUS: f32 = 0.25;
const BULLET_LIGHT: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Camera placement for the arena
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Height of the camera above the floor
    pub elevation: f32,
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    /// Window pixels per world unit
    pub pixels_per_unit: f32,
    /// Shift the view so the player stays under its window position
    pub follow_offset: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            elevation: 30.0,
            yaw: -90.0,
            pitch: -89.999,
            pixels_per_unit: 50.0,
            follow_offset: true,
        }
    }
}

impl CameraSettings {
    /// Top-down camera looking straight at the floor
    pub fn to_camera(&self, aspect: f32) -> Camera {
        Camera::new(Vec3::new(0.0, self.elevation, 0.0), aspect).with_direction(self.yaw, self.pitch)
    }
}

/// Gameplay tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameSettings {
    /// Seconds before play starts
    pub start_delay: f32,
    /// Player acceleration from WASD, units/s^2
    pub player_acceleration: f32,
    pub bullet_speed: f32,
    /// Seconds between bullets
    pub bullet_interval: f32,
    /// Acceleration applied to an enemy a bullet passes through
    pub bullet_push: f32,
    /// Edge speed (px/s) when a bullet leaves through it
    pub border_push: f32,
    pub enemy_acceleration: f32,
    /// Enemies stop accelerating above this speed
    pub enemy_max_speed: f32,
    /// Speed an enemy bounces off the player with
    pub enemy_bounce: f32,
    /// Pixels per second each edge moves inward
    pub window_shrink_rate: f32,
    pub window_min_width: u32,
    pub window_min_height: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            start_delay: 5.0,
            player_acceleration: 10.0,
            bullet_speed: 10.0,
            bullet_interval: 0.5,
            bullet_push: 30.0,
            border_push: 300.0,
            enemy_acceleration: 10.0,
            enemy_max_speed: 7.0,
            enemy_bounce: 5.0,
            window_shrink_rate: 30.0,
            window_min_width: 300,
            window_min_height: 300,
        }
    }
}

impl GameSettings {
    fn shrink_rule(&self) -> ShrinkRule {
        ShrinkRule {
            rate: self.window_shrink_rate,
            min_width: self.window_min_width as f32,
            min_height: self.window_min_height as f32,
        }
    }
}

/// Arena game state; plugs into a [`Scene`] as its hooks
pub struct Arena {
    camera: CameraSettings,
    game: GameSettings,
    bounds: WindowBounds,

    player: Option<EntityKey>,
    overlay: Option<EntityKey>,
    enemies: Option<GroupKey>,
    bullets: Option<GroupKey>,

    countdown: f32,
    spawn_timer: f32,
    /// Frame time, shared with bullet collision handlers
    frame_dt: Rc<Cell<f32>>,
    next_mesh: u32,
}

impl Arena {
    pub fn new(camera: CameraSettings, game: GameSettings) -> Self {
        Self {
            camera,
            game,
            bounds: WindowBounds::default(),
            player: None,
            overlay: None,
            enemies: None,
            bullets: None,
            countdown: game.start_delay,
            spawn_timer: 0.0,
            frame_dt: Rc::new(Cell::new(0.0)),
            next_mesh: 0,
        }
    }

    pub fn player(&self) -> Option<EntityKey> {
        self.player
    }

    pub fn enemies(&self) -> Option<GroupKey> {
        self.enemies
    }

    pub fn bullets(&self) -> Option<GroupKey> {
        self.bullets
    }

    pub fn bounds(&self) -> &WindowBounds {
        &self.bounds
    }

    /// True once the start countdown has run out
    pub fn is_running(&self) -> bool {
        self.countdown <= 0.0
    }

    pub fn player_position(&self, scene: &Scene) -> Option<Vec3> {
        self.player.and_then(|key| scene.world.get(key)).map(Entity::position)
    }

    fn mesh(&mut self) -> MeshHandle {
        self.next_mesh += 1;
        MeshHandle(self.next_mesh)
    }

    fn spawn_enemy(&mut self, scene: &mut Scene, group: GroupKey, player: EntityKey, position: Vec3) {
        let bounce = self.game.enemy_bounce;
        let scale = 0.8;
        let enemy = Entity::new()
            .with_name("enemy")
            .with_position(position)
            .with_rotation(Vec3::new(0.0, 45f32.to_radians(), 0.0))
            .with_scale(Vec3::splat(scale))
            .with_friction(1.0)
            .with_mesh(self.mesh())
            .with_material(Material::from_rgb(0.5, 1.0, 0.83))
            .with_collider(Collider::sphere(scale / 2.0).with_handler(move |ctx| {
                if ctx.other != player {
                    return;
                }
                let (Some(this), Some(other)) = (ctx.this_entity(), ctx.other_entity()) else {
                    return;
                };
                let away = (this.position() - other.position()).normalized().with_y(0.0);
                if let Some(enemy) = ctx.this_entity_mut() {
                    enemy.velocity = away * bounce;
                }
            }));
        if let Err(err) = scene.world.add_to_group(group, enemy) {
            log::warn!("Could not spawn enemy: {}", err);
        }
    }

    fn spawn_bullet(&mut self, scene: &mut Scene, origin: Vec3, target: Vec3) {
        let (Some(bullets), Some(enemies)) = (self.bullets, self.enemies) else {
            return;
        };
        let position = origin.with_y(BULLET_RADIUS);
        let velocity = (target - position.with_y(0.0)).normalized() * self.game.bullet_speed;

        let push = self.game.bullet_push;
        let dt = self.frame_dt.clone();
        let collider = Collider::sphere(BULLET_RADIUS).with_trigger(true).with_handler(move |ctx| {
            if ctx.other_parent() != Some(enemies) {
                return;
            }
            let (Some(this), Some(other)) = (ctx.this_entity(), ctx.other_entity()) else {
                return;
            };
            let away = (other.position() - this.position()).normalized().with_y(0.0);
            if let Some(enemy) = ctx.other_entity_mut() {
                enemy.velocity += away * push * dt.get();
            }
        });

        let bullet = Entity::new()
            .with_name("bullet")
            .with_position(position)
            .with_scale(Vec3::splat(BULLET_RADIUS * 2.0))
            .with_velocity(velocity)
            .with_friction(0.0)
            .with_mesh(self.mesh())
            .with_collider(collider);
        if let Err(err) = scene.world.add_to_group(bullets, bullet) {
            log::warn!("Could not spawn bullet: {}", err);
        }
    }

    /// Remove bullets that left the window and light up the rest
    fn sweep_bullets(&mut self, scene: &mut Scene) {
        let Some(bullets) = self.bullets else {
            return;
        };
        let ppu = self.camera.pixels_per_unit;
        let members = scene.world.group(bullets).map(|g| g.members().to_vec()).unwrap_or_default();

        let mut gone = Vec::new();
        scene.lighting.clear_point_lights();
        for (index, key) in members.into_iter().enumerate() {
            let Some(bullet) = scene.world.get(key) else {
                continue;
            };
            let radius = bullet.scale().z / 2.0;
            if self.bounds.is_outside(bullet.position(), radius, ppu) {
                self.bounds.push_from(bullet.position(), bullet.velocity, self.game.border_push, ppu);
                gone.push(index);
            } else if scene.lighting.point_lights().len() < MAX_POINT_LIGHTS {
                scene.lighting.add_point_light(PointLight::new(bullet.position(), BULLET_LIGHT));
            }
        }

        if !gone.is_empty() {
            if let Err(err) = scene.world.group_remove_at(bullets, &gone) {
                log::warn!("Could not remove bullets: {}", err);
            }
        }
    }

    fn steer_player(&self, scene: &mut Scene, input: &InputState, dt: f32) {
        let Some(player) = self.player.and_then(|key| scene.world.get_mut(key)) else {
            return;
        };

        let speed = self.game.player_acceleration * dt;
        if input.is_pressed(KeyCode::KeyW) {
            player.velocity.z -= speed;
        } else if input.is_pressed(KeyCode::KeyS) {
            player.velocity.z += speed;
        }
        if input.is_pressed(KeyCode::KeyD) {
            player.velocity.x += speed;
        } else if input.is_pressed(KeyCode::KeyA) {
            player.velocity.x -= speed;
        }
        player.set_rotation(player.rotation() + Vec3::new(1.0, 1.0, 0.0) * dt);

        // Keep the whole sphere inside the window
        let ppu = self.camera.pixels_per_unit;
        let min = self.bounds.world_origin(ppu);
        let max = min + self.bounds.world_size(ppu);
        let half = player.scale() / 2.0;
        let mut position = player.position();
        if position.x - half.x < min.x {
            position.x = min.x + half.x;
            player.velocity.x = player.velocity.x.max(0.0);
        }
        if position.x + half.x > max.x {
            position.x = max.x - half.x;
            player.velocity.x = player.velocity.x.min(0.0);
        }
        if position.z - half.z < min.y {
            position.z = min.y + half.z;
            player.velocity.z = player.velocity.z.max(0.0);
        }
        if position.z + half.z > max.y {
            position.z = max.y - half.z;
            player.velocity.z = player.velocity.z.min(0.0);
        }
        if position != player.position() {
            player.set_position(position);
        }
    }

    fn chase_player(&self, scene: &mut Scene, dt: f32) {
        let (Some(target), Some(enemies)) = (self.player_position(scene), self.enemies) else {
            return;
        };
        let members = scene.world.group(enemies).map(|g| g.members().to_vec()).unwrap_or_default();
        for key in members {
            let Some(enemy) = scene.world.get_mut(key) else {
                continue;
            };
            let towards = (target - enemy.position()).with_y(0.0);
            if enemy.velocity.length() < self.game.enemy_max_speed {
                enemy.velocity += towards.normalized() * self.game.enemy_acceleration * dt;
            }
        }
    }

    /// Fractional screen offset of the player inside the window
    fn follow_offset(&self, scene: &Scene) -> Option<Vec2> {
        let player = self.player_position(scene)?;
        let ppu = self.camera.pixels_per_unit;
        let size = self.bounds.world_size(ppu);
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let relative = Vec2::new(player.x, player.z) - self.bounds.world_origin(ppu);
        Some(relative.component_div(size) - Vec2::new(0.5, 0.5))
    }

    fn apply_bounds(&self, scene: &mut Scene, window: &mut dyn WindowControl) {
        let viewport = self.bounds.rect().to_viewport();
        window.set_position(viewport.x, viewport.y);
        window.set_size(viewport.width, viewport.height);
        scene.window_resized(&viewport);
        scene.camera.follow_viewport(&viewport, self.camera.pixels_per_unit);
    }
}

impl SceneHooks for Arena {
    fn start(&mut self, scene: &mut Scene, window: &mut dyn WindowControl) {
        let viewport = window.viewport();
        let ppu = self.camera.pixels_per_unit;
        self.bounds = WindowBounds::new(Rect::from_viewport(&viewport));
        scene.camera.follow_viewport(&viewport, ppu);
        scene.lighting.sun = SunLight {
            direction: Vec3::new(0.0, -90f32.to_radians(), 0.0),
            ..SunLight::default()
        };

        // Floor covering the whole desktop
        let (monitor_w, monitor_h) = window.monitor_size().unwrap_or((viewport.width, viewport.height));
        let floor_scale = Vec3::new(monitor_w as f32 / ppu, monitor_h as f32 / ppu, 1.0);
        let floor = Entity::new()
            .with_name("floor")
            .with_rotation(Vec3::new(90f32.to_radians(), 0.0, 0.0))
            .with_scale(floor_scale)
            .with_position(Vec3::new(floor_scale.x / 2.0, 0.0, floor_scale.y / 2.0))
            .with_mesh(self.mesh())
            .with_material(Material::from_rgb(0.31, 0.31, 0.31).with_light_mask(0b10));
        scene.world.add_entity(floor);

        let start = scene.camera.position().with_y(0.0);
        let player = scene.world.add_entity(
            Entity::new()
                .with_name("player")
                .with_position(start)
                .with_friction(1.0)
                .with_mesh(self.mesh())
                .with_collider(Collider::sphere(0.5)),
        );
        self.player = Some(player);

        let crate_mesh = self.mesh();
        scene
            .world
            .add_entity(Entity::new().with_name("crate").with_position(Vec3::new(10.0, 0.5, 10.0)).with_mesh(crate_mesh));

        let overlay_mesh = self.mesh();
        self.overlay = Some(
            scene
                .world
                .add_entity(Entity::new().with_name("start_overlay").with_mesh(overlay_mesh)),
        );

        let bullets = scene.world.add_group(Group::new().with_name("bullets"));
        let enemies = scene.world.add_group(Group::new().with_name("enemies"));
        self.bullets = Some(bullets);
        self.enemies = Some(enemies);
        self.spawn_enemy(scene, enemies, player, start + Vec3::new(5.0, 0.0, -5.0));

        log::info!("Arena ready: window {:?}, {} px per unit", viewport, ppu);
    }

    fn update(&mut self, scene: &mut Scene, input: &InputState, _window: &mut dyn WindowControl, dt: f32) {
        self.frame_dt.set(dt);

        if self.countdown > 0.0 {
            self.countdown -= dt;
            if self.countdown <= 0.0 {
                if let Some(overlay) = self.overlay.take() {
                    scene.world.destroy_entity(overlay).ok();
                }
                log::info!("Arena started");
            }
            return;
        }

        self.spawn_timer += dt;
        if self.spawn_timer > self.game.bullet_interval {
            self.spawn_timer = 0.0;
            if let Some(origin) = self.player_position(scene) {
                let ppu = self.camera.pixels_per_unit;
                let mouse = self.bounds.rect().position() + input.mouse_position();
                let target = Vec3::new(mouse.x / ppu, 0.0, mouse.y / ppu);
                self.spawn_bullet(scene, origin, target);
            }
        }

        self.sweep_bullets(scene);
        self.steer_player(scene, input, dt);
    }

    fn before_render(&mut self, scene: &mut Scene, window: &mut dyn WindowControl, dt: f32) {
        if !self.is_running() {
            return;
        }

        if self.bounds.update(dt, &self.game.shrink_rule(), window.monitor_size()) {
            self.apply_bounds(scene, window);
        }

        if self.camera.follow_offset {
            if let Some(offset) = self.follow_offset(scene) {
                scene.camera.set_offset(offset);
            }
        }

        self.chase_player(scene, dt);
    }

    fn on_window_move(&mut self, _scene: &mut Scene, window: &mut dyn WindowControl, position: Vec2) {
        let pinned = self.bounds.rect().to_viewport();
        if position.x as i32 != pinned.x || position.y as i32 != pinned.y {
            window.set_position(pinned.x, pinned.y);
        }
    }
}
