//! Host hooks attached to entities and worlds.
//!
//! The world removes a behavior from its slot for the duration of a hook, so
//! the hook receives the world mutably alongside the entity's id. Anything the
//! hook changes through the world structurally (adds, removes, recycles) is
//! deferred to the next commit.

use std::any::Any;

use glam::Vec2;

use crate::entity::{Entity, EntityId};
use crate::world::World;

/// Downcasting support for boxed behaviors.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-entity game logic.
pub trait Behavior: AsAny + 'static {
    /// Name the recycle pool and class queries know this entity by.
    fn class_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The entity was committed into `world`.
    fn added(&mut self, _world: &mut World, _id: EntityId) {}

    /// The entity is being committed out of `world`. It is still linked,
    /// so queries made here see it.
    fn removed(&mut self, _world: &mut World, _id: EntityId) {}

    /// Once per update walk while the entity is active, after its tweens.
    fn update(&mut self, _world: &mut World, _id: EntityId) {}

    /// Draw the entity. Defaults to drawing its graphic.
    fn render(&mut self, entity: &mut Entity, camera: Vec2) {
        entity.render_graphic(camera);
    }
}

/// World-level hooks.
pub trait WorldBehavior: AsAny + 'static {
    /// The world became the engine's active world.
    fn begin(&mut self, _world: &mut World) {}

    /// The world is being switched away from.
    fn end(&mut self, _world: &mut World) {}

    /// Once per world update, before the entity walk.
    fn update(&mut self, _world: &mut World) {}
}
