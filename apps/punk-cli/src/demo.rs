//! A small headless scene: rocks fall, a ship sweeps the bottom of the
//! screen and knocks them back into the pool.

use glam::Vec2;
use punk_common::math;
use punk_engine::EngineConfig;
use punk_tween::{Tween, TweenId, TweenMode, ease};
use punk_world::{Behavior, ClassRegistry, Entity, EntityId, World, WorldBehavior};

pub const ROCK: &str = "rock";

/// Moves at a constant velocity and returns to the pool once off screen.
pub struct Drift {
    pub velocity: Vec2,
}

impl Behavior for Drift {
    fn class_name(&self) -> &'static str {
        ROCK
    }

    fn update(&mut self, world: &mut World, id: EntityId) {
        let elapsed = world.frame().elapsed;
        let Some(rock) = world.entity_mut(id) else {
            return;
        };
        rock.x += self.velocity.x * elapsed;
        rock.y += self.velocity.y * elapsed;
        if !world.on_camera(id) {
            world.recycle(id);
        }
    }
}

/// Follows the world's sweep tween and recycles any rock it touches.
pub struct Pilot {
    pub sweep: TweenId,
    pub hits: u32,
}

impl Behavior for Pilot {
    fn update(&mut self, world: &mut World, id: EntityId) {
        let width = world.frame().width as f32;
        let scale = world.tweens.get(self.sweep).map_or(0.0, Tween::scale);
        let target = math::lerp(8.0, width - 24.0, scale);
        let Some(ship) = world.entity_mut(id) else {
            return;
        };
        ship.x = math::approach(ship.x, target, 6.0);
        let (x, y) = (ship.x, ship.y);
        let mut touching = Vec::new();
        world.collide_into(id, ROCK, x, y, &mut touching);
        // Rocks that left this frame are still linked until the commit.
        let live = touching
            .into_iter()
            .find(|&rock| world.entity(rock).and_then(Entity::world).is_some());
        if let Some(rock) = live {
            world.recycle(rock);
            self.hits += 1;
            tracing::debug!(?rock, hits = self.hits, "rock hit");
        }
    }
}

/// Drops a rock every `every` ticks, reusing pooled ones first.
pub struct Spawner {
    pub every: u64,
    pub spawned: u64,
}

impl WorldBehavior for Spawner {
    fn update(&mut self, world: &mut World) {
        let frame = *world.frame();
        if self.every == 0 || frame.tick % self.every != 0 {
            return;
        }
        let n = self.spawned;
        let id = match world.create(ROCK, true) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, "spawn failed");
                return;
            }
        };
        self.spawned += 1;
        let Some(rock) = world.entity_mut(id) else {
            return;
        };
        rock.x = (n * 37 % frame.width.max(1) as u64) as f32;
        rock.y = 0.0;
        if let Some(drift) = rock.behavior_mut::<Drift>() {
            drift.velocity = Vec2::new(0.0, 40.0 + (n % 5) as f32 * 15.0);
        }
    }
}

pub fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    registry.register(ROCK, || {
        Entity::new(0.0, 0.0)
            .with_hitbox(8, 8, 0, 0)
            .with_tag(ROCK)
            .with_layer(1)
            .with_behavior(Drift { velocity: Vec2::ZERO })
    });
    registry
}

/// Build the scene for `config`. Returns the world and the ship's id.
pub fn build(config: &EngineConfig) -> (World, EntityId) {
    let mut world = World::with_registry(registry());
    // Tween durations count ticks under a fixed timestep.
    let period = if config.fixed {
        config.frame_rate as f32 * 2.0
    } else {
        2.0
    };
    let sweep = world.tweens.add_tween(
        Tween::new(period, TweenMode::Looping).with_ease(ease::sine_in_out),
        true,
    );
    let ship = world.add_entity(
        Entity::new(8.0, (config.height - 16) as f32)
            .with_hitbox(16, 8, 0, 0)
            .with_tag("ship")
            .with_behavior(Pilot { sweep, hits: 0 }),
    );
    world.set_behavior(Spawner {
        every: u64::from(config.frame_rate / 4).max(1),
        spawned: 0,
    });
    (world, ship)
}
