//! The world: entity arena, deferred lifecycle, update and render walks.
//!
//! Adds and removes are buffered and only change the walkable lists when
//! [`World::update_lists`] commits them. Hooks run with the world borrowed
//! mutably, so anything they do structurally lands in the buffers for the
//! next commit.

mod collide;
mod lists;
mod order;
mod query;

use std::collections::BTreeMap;

use glam::Vec2;
use punk_common::{Frame, WorldId};
use punk_tween::Tweener;

use crate::behavior::{Behavior, WorldBehavior};
use crate::entity::{Entity, EntityId};
use crate::error::WorldError;
use crate::factory::ClassRegistry;
use crate::graphic::Graphic;
use crate::mask::Mask;
use lists::{Arena, Ends, List};

pub use lists::EntityIds;

/// A population of entities plus the lists that order them.
///
/// Entity ids are only meaningful for the world that issued them. To move an
/// entity between worlds, [`take`](World::take) it out of one and
/// [`add_entity`](World::add_entity) it to the other.
pub struct World {
    id: WorldId,
    /// Whether the engine renders this world.
    pub visible: bool,
    /// Whether the engine steps this world's tweens and update hook.
    pub active: bool,
    /// Screen-space offset applied when drawing.
    pub camera: Vec2,
    /// World-level tweens. Setting `tweens.auto_clear` clears them when the
    /// engine switches away from this world.
    pub tweens: Tweener,
    frame: Frame,
    registry: ClassRegistry,
    behavior: Option<Box<dyn WorldBehavior>>,
    arena: Arena,
    to_add: Vec<EntityId>,
    to_remove: Vec<EntityId>,
    updates: Ends,
    count: usize,
    layers: BTreeMap<i32, Ends>,
    layer_list: Vec<i32>,
    layer_count: BTreeMap<i32, usize>,
    layer_sort: bool,
    tagged: BTreeMap<String, Ends>,
    tag_count: BTreeMap<String, usize>,
    class_count: BTreeMap<String, usize>,
    recycled: BTreeMap<String, EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::with_registry(ClassRegistry::new())
    }

    pub fn with_registry(registry: ClassRegistry) -> Self {
        Self {
            id: WorldId::new(),
            visible: true,
            active: true,
            camera: Vec2::ZERO,
            tweens: Tweener::new(),
            frame: Frame::default(),
            registry,
            behavior: None,
            arena: Arena::with_key(),
            to_add: Vec::new(),
            to_remove: Vec::new(),
            updates: Ends::default(),
            count: 0,
            layers: BTreeMap::new(),
            layer_list: Vec::new(),
            layer_count: BTreeMap::new(),
            layer_sort: false,
            tagged: BTreeMap::new(),
            tag_count: BTreeMap::new(),
            class_count: BTreeMap::new(),
            recycled: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Timing of the tick being simulated.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    pub fn set_behavior(&mut self, behavior: impl WorldBehavior) {
        self.behavior = Some(Box::new(behavior));
    }

    pub fn behavior<T: WorldBehavior>(&self) -> Option<&T> {
        self.behavior.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id)
    }

    /// Whether `id` names an entity stored in this world's arena, attached
    /// or not.
    pub fn contains(&self, id: EntityId) -> bool {
        self.arena.contains_key(id)
    }

    /// Entities stored in the arena, including detached and pooled ones.
    pub fn stored(&self) -> usize {
        self.arena.len()
    }

    pub fn pending_adds(&self) -> usize {
        self.to_add.len()
    }

    pub fn pending_removes(&self) -> usize {
        self.to_remove.len()
    }

    /// The engine made this world active.
    pub fn begin(&mut self) {
        self.with_world_behavior(|behavior, world| behavior.begin(world));
    }

    /// The engine is switching away from this world.
    pub fn end(&mut self) {
        self.with_world_behavior(|behavior, world| behavior.end(world));
    }

    /// Store a new entity and queue it for addition.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.world = None;
        entity.added = false;
        entity.pooled = false;
        entity.links = Default::default();
        let id = self.arena.insert(entity);
        self.add(id)
    }

    /// Queue a stored entity for addition. Entities that already belong to a
    /// world are left alone.
    pub fn add(&mut self, id: EntityId) -> EntityId {
        let Some(entity) = self.arena.get_mut(id) else {
            tracing::trace!(?id, "add ignored: unknown entity");
            return id;
        };
        if entity.world.is_some() {
            tracing::trace!(?id, "add ignored: already in a world");
            return id;
        }
        entity.world = Some(self.id);
        if entity.pooled {
            self.unpool(id);
        }
        self.to_add.push(id);
        id
    }

    /// Queue an entity of this world for removal.
    pub fn remove(&mut self, id: EntityId) -> EntityId {
        let own = self.id;
        let Some(entity) = self.arena.get_mut(id).filter(|e| e.world == Some(own)) else {
            tracing::trace!(?id, "remove ignored: not in this world");
            return id;
        };
        entity.world = None;
        self.to_remove.push(id);
        id
    }

    /// Queue every committed entity for removal.
    pub fn remove_all(&mut self) {
        let ids: Vec<_> = self.ids().collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn add_list(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        for id in ids {
            self.add(id);
        }
    }

    pub fn remove_list(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        for id in ids {
            self.remove(id);
        }
    }

    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityId> {
        entities.into_iter().map(|e| self.add_entity(e)).collect()
    }

    /// Add an inactive entity that only draws `graphic`.
    pub fn add_graphic(&mut self, graphic: impl Graphic + 'static, layer: i32, x: f32, y: f32) -> EntityId {
        let mut entity = Entity::new(x, y).with_graphic(graphic).with_layer(layer);
        entity.active = false;
        self.add_entity(entity)
    }

    /// Add an inactive, invisible entity that only carries a mask and tag.
    pub fn add_mask(&mut self, mask: impl Into<Mask>, tag: &str, x: f32, y: f32) -> EntityId {
        let mut entity = Entity::new(x, y).with_mask(mask).with_tag(tag);
        entity.active = false;
        entity.visible = false;
        self.add_entity(entity)
    }

    /// Reuse a pooled entity of `class`, or build one through the registry.
    ///
    /// An entity created without adding it stays detached in the arena until
    /// it is added or taken.
    pub fn create(&mut self, class: &str, add: bool) -> Result<EntityId, WorldError> {
        let id = match self.recycled.get(class).copied() {
            Some(head) => {
                self.unpool(head);
                tracing::trace!(class, id = ?head, "reused pooled entity");
                head
            }
            None => {
                let entity = self
                    .registry
                    .construct(class)
                    .ok_or_else(|| WorldError::UnknownClass(class.to_owned()))?;
                self.arena.insert(entity)
            }
        };
        if add {
            self.add(id);
        }
        Ok(id)
    }

    /// Pool an entity of this world for reuse by [`create`](World::create),
    /// then remove it. Its fields are kept as they are.
    pub fn recycle(&mut self, id: EntityId) -> EntityId {
        let own = self.id;
        let Some(entity) = self.arena.get_mut(id).filter(|e| e.world == Some(own)) else {
            tracing::trace!(?id, "recycle ignored: not in this world");
            return id;
        };
        let class = entity.class.clone();
        entity.links.recycle_next = self.recycled.get(&class).copied();
        entity.pooled = true;
        self.recycled.insert(class, id);
        self.remove(id)
    }

    /// Drop the pooled entities of `class`. Ones still waiting for their
    /// removal to commit stay in the arena, detached.
    pub fn clear_recycled(&mut self, class: &str) {
        let mut cursor = self.recycled.remove(class);
        let mut dropped = 0usize;
        while let Some(id) = cursor {
            let Some(entity) = self.arena.get_mut(id) else {
                break;
            };
            cursor = entity.links.recycle_next.take();
            entity.pooled = false;
            if !entity.added && !entity.links.linked {
                self.arena.remove(id);
                dropped += 1;
            }
        }
        tracing::debug!(class, dropped, "recycle pool cleared");
    }

    pub fn clear_recycled_all(&mut self) {
        let classes: Vec<String> = self.recycled.keys().cloned().collect();
        for class in classes {
            self.clear_recycled(&class);
        }
    }

    /// Number of pooled entities of `class`.
    pub fn recycled_count(&self, class: &str) -> usize {
        let mut count = 0;
        let mut cursor = self.recycled.get(class).copied();
        while let Some(id) = cursor {
            count += 1;
            cursor = self.arena.get(id).and_then(|e| e.links.recycle_next);
        }
        count
    }

    /// Move a detached entity out of the arena, handing ownership back.
    pub fn take(&mut self, id: EntityId) -> Result<Entity, WorldError> {
        let entity = self.arena.get(id).ok_or(WorldError::UnknownEntity(id))?;
        if !Self::is_detached(entity) {
            return Err(WorldError::NotDetached(id));
        }
        self.to_add.retain(|&pending| pending != id);
        self.to_remove.retain(|&pending| pending != id);
        self.arena.remove(id).ok_or(WorldError::UnknownEntity(id))
    }

    /// Stored entities that belong to no world and are not pooled: removed
    /// ones and ones created without being added. They keep their ids and
    /// can be [`add`](World::add)ed again.
    pub fn detached_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.arena
            .iter()
            .filter(|(_, entity)| Self::is_detached(entity))
            .map(|(id, _)| id)
    }

    /// [`take`](World::take) every detached entity.
    pub fn drain_detached(&mut self) -> Vec<Entity> {
        let ids: Vec<_> = self.detached_ids().collect();
        let drained: Vec<Entity> = ids.into_iter().filter_map(|id| self.take(id).ok()).collect();
        if !drained.is_empty() {
            tracing::debug!(drained = drained.len(), "detached entities drained");
        }
        drained
    }

    fn is_detached(entity: &Entity) -> bool {
        entity.world.is_none() && !entity.added && !entity.pooled && !entity.links.linked
    }

    /// Commit queued removals, then queued additions, then re-sort layers.
    ///
    /// A removed entity's `removed` hook runs while it is still linked, so
    /// queries made from the hook still see it; it is unlinked right after.
    /// Entities that leave stay in the arena, detached, until they are added
    /// again or taken.
    pub fn update_lists(&mut self) {
        let _span = tracing::info_span!("update_lists").entered();
        let mut removed = 0usize;
        let mut added = 0usize;

        if !self.to_remove.is_empty() {
            for id in std::mem::take(&mut self.to_remove) {
                let Some(entity) = self.arena.get_mut(id) else {
                    continue;
                };
                if !entity.added {
                    if let Some(at) = self.to_add.iter().position(|&pending| pending == id) {
                        self.to_add.remove(at);
                    }
                    continue;
                }
                entity.added = false;
                self.with_behavior(id, |behavior, world| behavior.removed(world, id));
                self.unlink_update(id);
                self.unlink_render(id);
                self.unlink_tagged(id);
                let entity = &mut self.arena[id];
                entity.links.linked = false;
                if entity.tweens.auto_clear {
                    entity.tweens.clear_tweens();
                }
                removed += 1;
            }
        }

        if !self.to_add.is_empty() {
            let own = Some(self.id);
            for id in std::mem::take(&mut self.to_add) {
                let Some(entity) = self.arena.get_mut(id) else {
                    continue;
                };
                if entity.added || entity.world != own {
                    continue;
                }
                entity.added = true;
                entity.links.linked = true;
                self.link_update(id);
                self.link_render(id);
                self.link_tagged(id);
                self.with_behavior(id, |behavior, world| behavior.added(world, id));
                added += 1;
            }
        }

        self.sort_layers();

        if added + removed > 0 {
            tracing::debug!(added, removed, "world lists committed");
        }
    }

    /// One update walk.
    ///
    /// Runs the world behavior's update hook, then visits the update list
    /// head to tail. Active entities step their tweens by the frame's step
    /// and then run their behavior's update hook; a graphic whose `active`
    /// flag is set is updated either way. The next entity is read before any
    /// hook runs, and adds or removes made by hooks wait for the next commit,
    /// so a walk visits exactly the entities committed when it started.
    pub fn update(&mut self, frame: &Frame) {
        let _span = tracing::info_span!("world_update").entered();
        self.frame = *frame;
        self.with_world_behavior(|behavior, world| behavior.update(world));
        let step = frame.step();
        let mut cursor = self.updates.head;
        while let Some(id) = cursor {
            let Some(entity) = self.arena.get_mut(id) else {
                break;
            };
            cursor = entity.links.update.next;
            if entity.active {
                if !entity.tweens.is_empty() {
                    entity.tweens.update_tweens(step);
                }
                self.with_behavior(id, |behavior, world| behavior.update(world, id));
            }
            if let Some(graphic) = self.arena.get_mut(id).and_then(Entity::graphic_mut) {
                if graphic.active() {
                    graphic.update();
                }
            }
        }
    }

    /// Draw visible entities back to front: highest layer first, and within
    /// a layer from its tail to its head.
    pub fn render(&mut self) {
        if !self.visible {
            return;
        }
        let _span = tracing::info_span!("world_render").entered();
        let camera = self.camera;
        for at in (0..self.layer_list.len()).rev() {
            let layer = self.layer_list[at];
            let mut cursor = self.layers.get(&layer).and_then(|ends| ends.tail);
            while let Some(id) = cursor {
                let Some(entity) = self.arena.get_mut(id) else {
                    break;
                };
                cursor = entity.links.render.prev;
                if !entity.visible {
                    continue;
                }
                let mut behavior = entity.behavior.take();
                match behavior.as_mut() {
                    Some(behavior) => behavior.render(entity, camera),
                    None => entity.render_graphic(camera),
                }
                if entity.behavior.is_none() {
                    entity.behavior = behavior;
                }
            }
        }
    }

    /// Whether an entity's hitbox touches the screen seen from the camera.
    pub fn on_camera(&self, id: EntityId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|e| e.on_screen(self.camera, self.frame.width, self.frame.height))
    }

    fn with_behavior(&mut self, id: EntityId, hook: impl FnOnce(&mut dyn Behavior, &mut World)) {
        let Some(mut behavior) = self.arena.get_mut(id).and_then(|e| e.behavior.take()) else {
            return;
        };
        hook(behavior.as_mut(), self);
        if let Some(entity) = self.arena.get_mut(id) {
            if entity.behavior.is_none() {
                entity.behavior = Some(behavior);
            }
        }
    }

    fn with_world_behavior(&mut self, hook: impl FnOnce(&mut dyn WorldBehavior, &mut World)) {
        let Some(mut behavior) = self.behavior.take() else {
            return;
        };
        hook(behavior.as_mut(), self);
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
    }

    /// Detach `id` from its class's recycle stack.
    fn unpool(&mut self, id: EntityId) {
        let entity = &mut self.arena[id];
        let class = entity.class.clone();
        let next = entity.links.recycle_next.take();
        entity.pooled = false;
        let Some(head) = self.recycled.get(&class).copied() else {
            return;
        };
        if head == id {
            match next {
                Some(next) => self.recycled.insert(class, next),
                None => self.recycled.remove(&class),
            };
            return;
        }
        let mut cursor = head;
        while let Some(after) = self.arena.get(cursor).and_then(|e| e.links.recycle_next) {
            if after == id {
                self.arena[cursor].links.recycle_next = next;
                return;
            }
            cursor = after;
        }
    }

    fn link_update(&mut self, id: EntityId) {
        self.updates.push_front(&mut self.arena, List::Update, id);
        self.count += 1;
        let class = self.arena[id].class.clone();
        *self.class_count.entry(class).or_default() += 1;
    }

    fn unlink_update(&mut self, id: EntityId) {
        self.updates.unlink(&mut self.arena, List::Update, id);
        self.count -= 1;
        let class = &self.arena[id].class;
        if let Some(count) = self.class_count.get_mut(class) {
            *count -= 1;
            if *count == 0 {
                self.class_count.remove(class);
            }
        }
    }

    fn link_render(&mut self, id: EntityId) {
        let layer = self.arena[id].layer;
        if !self.layers.contains_key(&layer) {
            self.layer_list.push(layer);
            self.layer_sort = true;
        }
        let ends = self.layers.entry(layer).or_default();
        ends.push_front(&mut self.arena, List::Render, id);
        *self.layer_count.entry(layer).or_default() += 1;
    }

    fn unlink_render(&mut self, id: EntityId) {
        let layer = self.arena[id].layer;
        let Some(ends) = self.layers.get_mut(&layer) else {
            return;
        };
        ends.unlink(&mut self.arena, List::Render, id);
        if ends.is_empty() {
            self.layers.remove(&layer);
            self.layer_count.remove(&layer);
            self.layer_list.retain(|&l| l != layer);
        } else if let Some(count) = self.layer_count.get_mut(&layer) {
            *count -= 1;
        }
    }

    fn link_tagged(&mut self, id: EntityId) {
        let Some(tag) = self.arena[id].tag.clone() else {
            return;
        };
        let ends = self.tagged.entry(tag.clone()).or_default();
        ends.push_front(&mut self.arena, List::Tagged, id);
        *self.tag_count.entry(tag).or_default() += 1;
    }

    fn unlink_tagged(&mut self, id: EntityId) {
        let Some(tag) = self.arena[id].tag.clone() else {
            return;
        };
        let Some(ends) = self.tagged.get_mut(&tag) else {
            return;
        };
        ends.unlink(&mut self.arena, List::Tagged, id);
        if ends.is_empty() {
            self.tagged.remove(&tag);
            self.tag_count.remove(&tag);
        } else if let Some(count) = self.tag_count.get_mut(&tag) {
            *count -= 1;
        }
    }

    fn sort_layers(&mut self) {
        if self.layer_sort {
            if self.layer_list.len() > 1 {
                self.layer_list.sort();
            }
            self.layer_sort = false;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("count", &self.count)
            .field("layers", &self.layer_list)
            .field("pending_adds", &self.to_add.len())
            .field("pending_removes", &self.to_remove.len())
            .field("active", &self.active)
            .field("visible", &self.visible)
            .finish()
    }
}
