//! Collision driven by one entity against the rest of the world.
//!
//! The entity is placed virtually at the queried position; nothing is moved.

use super::World;
use crate::entity::EntityId;
use crate::mask::{self, Body};

impl World {
    /// First collidable entity tagged `tag`, other than `id`, that `id`
    /// would hit if it stood at (`x`, `y`).
    pub fn collide(&self, id: EntityId, tag: &str, x: f32, y: f32) -> Option<EntityId> {
        let body = self.body_for(id, x, y)?;
        self.type_ids(tag).find(|&other| self.hits(id, &body, other))
    }

    /// [`collide`](World::collide) over several tags, in order.
    pub fn collide_types(&self, id: EntityId, tags: &[&str], x: f32, y: f32) -> Option<EntityId> {
        tags.iter().find_map(|tag| self.collide(id, tag, x, y))
    }

    /// Append every entity tagged `tag` that [`collide`](World::collide)
    /// would consider a hit.
    pub fn collide_into(&self, id: EntityId, tag: &str, x: f32, y: f32, into: &mut impl Extend<EntityId>) {
        let Some(body) = self.body_for(id, x, y) else {
            return;
        };
        into.extend(self.type_ids(tag).filter(|&other| self.hits(id, &body, other)));
    }

    pub fn collide_types_into(
        &self,
        id: EntityId,
        tags: &[&str],
        x: f32,
        y: f32,
        into: &mut impl Extend<EntityId>,
    ) {
        for tag in tags {
            self.collide_into(id, tag, x, y, into);
        }
    }

    /// Whether `id` standing at (`x`, `y`) hits `other`. Both must be
    /// collidable.
    pub fn collide_with(&self, id: EntityId, other: EntityId, x: f32, y: f32) -> Option<EntityId> {
        let body = self.body_for(id, x, y)?;
        let target = self.arena.get(other).filter(|e| e.collidable)?.body();
        (body.overlaps(&target) && mask::collide(&body, &target)).then_some(other)
    }

    fn body_for(&self, id: EntityId, x: f32, y: f32) -> Option<Body<'_>> {
        self.arena
            .get(id)
            .filter(|e| e.collidable)
            .map(|e| e.body_at(x, y))
    }

    fn hits(&self, id: EntityId, body: &Body<'_>, other: EntityId) -> bool {
        if other == id {
            return false;
        }
        let Some(entity) = self.arena.get(other).filter(|e| e.collidable) else {
            return false;
        };
        let target = entity.body();
        body.overlaps(&target) && mask::collide(body, &target)
    }
}

#[cfg(test)]
mod tests {
    use crate::mask::{Hitbox, Masklist};
    use crate::{Entity, EntityId, World};

    fn boxed(world: &mut World, x: f32, y: f32, tag: &str) -> EntityId {
        world.add_entity(Entity::new(x, y).with_hitbox(10, 10, 0, 0).with_tag(tag))
    }

    #[test]
    fn collide_places_the_entity_without_moving() {
        let mut world = World::new();
        let player = boxed(&mut world, 0.0, 0.0, "player");
        let wall = boxed(&mut world, 30.0, 0.0, "wall");
        world.update_lists();

        assert_eq!(world.collide(player, "wall", 0.0, 0.0), None);
        assert_eq!(world.collide(player, "wall", 25.0, 0.0), Some(wall));
        assert_eq!(world.entity(player).map(|e| e.x), Some(0.0));
        assert_eq!(world.collide(player, "wall", 20.0, 0.0), None);
    }

    #[test]
    fn collide_skips_self_and_non_collidable() {
        let mut world = World::new();
        let a = boxed(&mut world, 0.0, 0.0, "crate");
        let b = boxed(&mut world, 5.0, 0.0, "crate");
        world.update_lists();
        assert_eq!(world.collide(a, "crate", 0.0, 0.0), Some(b));

        world.entity_mut(b).unwrap().collidable = false;
        assert_eq!(world.collide(a, "crate", 0.0, 0.0), None);

        world.entity_mut(b).unwrap().collidable = true;
        world.entity_mut(a).unwrap().collidable = false;
        assert_eq!(world.collide(a, "crate", 0.0, 0.0), None);
        assert_eq!(world.collide_with(a, b, 0.0, 0.0), None);
    }

    #[test]
    fn masks_refine_entity_collisions() {
        let mut world = World::new();
        let ring = Masklist::new(vec![Hitbox::new(4, 20, 0, 0).into(), Hitbox::new(4, 20, 16, 0).into()]);
        let post = world.add_entity(Entity::new(0.0, 0.0).with_mask(ring).with_tag("post"));
        let ball = world.add_entity(Entity::new(0.0, 0.0).with_mask(Hitbox::new(4, 4, 0, 0)));
        world.update_lists();

        assert_eq!(world.collide(ball, "post", 8.0, 8.0), None);
        assert_eq!(world.collide(ball, "post", 14.0, 8.0), Some(post));
        assert_eq!(world.collide_with(ball, post, 1.0, 1.0), Some(post));
        assert_eq!(world.collide_with(ball, post, 8.0, 1.0), None);
    }

    #[test]
    fn multi_tag_and_into_variants() {
        let mut world = World::new();
        let player = boxed(&mut world, 0.0, 0.0, "player");
        let wall = boxed(&mut world, 5.0, 0.0, "wall");
        let spike = boxed(&mut world, 0.0, 5.0, "spike");
        let other_spike = boxed(&mut world, 5.0, 5.0, "spike");
        world.update_lists();

        assert_eq!(world.collide_types(player, &["ghost", "wall", "spike"], 0.0, 0.0), Some(wall));

        let mut spikes = Vec::new();
        world.collide_into(player, "spike", 0.0, 0.0, &mut spikes);
        spikes.sort();
        let mut expected = vec![spike, other_spike];
        expected.sort();
        assert_eq!(spikes, expected);

        let mut everything = vec![player];
        world.collide_types_into(player, &["wall", "spike"], 0.0, 0.0, &mut everything);
        assert_eq!(everything.len(), 4);
    }
}
