//! Render order within and across layers.
//!
//! The head of a layer's list is its front and is drawn last.

use super::World;
use super::lists::{EntityIds, List};
use crate::entity::EntityId;

impl World {
    /// The committed entity's render links, if it is linked in this world.
    fn render_link(&self, id: EntityId) -> Option<(i32, crate::entity::Link)> {
        let entity = self.arena.get(id)?;
        if !entity.added || entity.world != Some(self.id) {
            return None;
        }
        Some((entity.layer, entity.links.render))
    }

    /// Move an entity to the front of its layer.
    pub fn bring_to_front(&mut self, id: EntityId) -> bool {
        let Some((layer, link)) = self.render_link(id) else {
            return false;
        };
        if link.prev.is_none() {
            return false;
        }
        let Some(ends) = self.layers.get_mut(&layer) else {
            return false;
        };
        ends.unlink(&mut self.arena, List::Render, id);
        ends.push_front(&mut self.arena, List::Render, id);
        true
    }

    /// Move an entity to the back of its layer.
    pub fn send_to_back(&mut self, id: EntityId) -> bool {
        let Some((layer, link)) = self.render_link(id) else {
            return false;
        };
        if link.next.is_none() {
            return false;
        }
        let Some(ends) = self.layers.get_mut(&layer) else {
            return false;
        };
        ends.unlink(&mut self.arena, List::Render, id);
        ends.push_back(&mut self.arena, List::Render, id);
        true
    }

    /// Swap an entity with the one directly in front of it.
    pub fn bring_forward(&mut self, id: EntityId) -> bool {
        let Some((layer, link)) = self.render_link(id) else {
            return false;
        };
        let Some(ahead) = link.prev else {
            return false;
        };
        let Some(ends) = self.layers.get_mut(&layer) else {
            return false;
        };
        ends.unlink(&mut self.arena, List::Render, id);
        ends.insert_before(&mut self.arena, List::Render, ahead, id);
        true
    }

    /// Swap an entity with the one directly behind it.
    pub fn send_backward(&mut self, id: EntityId) -> bool {
        let Some((layer, link)) = self.render_link(id) else {
            return false;
        };
        let Some(behind) = link.next else {
            return false;
        };
        let Some(ends) = self.layers.get_mut(&layer) else {
            return false;
        };
        ends.unlink(&mut self.arena, List::Render, id);
        ends.insert_after(&mut self.arena, List::Render, behind, id);
        true
    }

    pub fn is_at_front(&self, id: EntityId) -> bool {
        self.render_link(id).is_some_and(|(_, link)| link.prev.is_none())
    }

    pub fn is_at_back(&self, id: EntityId) -> bool {
        self.render_link(id).is_some_and(|(_, link)| link.next.is_none())
    }

    /// Change an entity's layer, relinking it at the front of the new layer
    /// when it is committed.
    pub fn set_layer(&mut self, id: EntityId, layer: i32) {
        let Some(entity) = self.arena.get_mut(id) else {
            return;
        };
        if entity.layer == layer {
            return;
        }
        if !entity.links.linked {
            entity.layer = layer;
            return;
        }
        self.unlink_render(id);
        self.arena[id].layer = layer;
        self.link_render(id);
        self.sort_layers();
    }

    /// Layers holding committed entities, ascending.
    pub fn layers(&self) -> &[i32] {
        &self.layer_list
    }

    /// Number of committed entities on `layer`.
    pub fn layer_count(&self, layer: i32) -> usize {
        self.layer_count.get(&layer).copied().unwrap_or(0)
    }

    /// Front entity of `layer`.
    pub fn layer_first(&self, layer: i32) -> Option<EntityId> {
        self.layers.get(&layer)?.head
    }

    /// Back entity of `layer`.
    pub fn layer_last(&self, layer: i32) -> Option<EntityId> {
        self.layers.get(&layer)?.tail
    }

    /// The entity drawn first overall: the back of the highest layer.
    pub fn farthest(&self) -> Option<EntityId> {
        self.layer_last(*self.layer_list.last()?)
    }

    /// The entity drawn last overall: the front of the lowest layer.
    pub fn nearest(&self) -> Option<EntityId> {
        self.layer_first(*self.layer_list.first()?)
    }

    /// Highest layer in use.
    pub fn layer_farthest(&self) -> Option<i32> {
        self.layer_list.last().copied()
    }

    /// Lowest layer in use.
    pub fn layer_nearest(&self) -> Option<i32> {
        self.layer_list.first().copied()
    }

    /// Entities of `layer` in drawing order, back to front.
    pub fn layer_ids(&self, layer: i32) -> EntityIds<'_> {
        EntityIds::backward(&self.arena, List::Render, self.layers.get(&layer))
    }

    /// Every committed entity in drawing order.
    pub fn render_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.layer_list.iter().rev().flat_map(move |&layer| self.layer_ids(layer))
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::Entity;
    use crate::world::World;

    fn layered(world: &mut World, layer: i32, n: usize) -> Vec<crate::EntityId> {
        let ids = (0..n)
            .map(|_| world.add_entity(Entity::new(0.0, 0.0).with_layer(layer)))
            .collect();
        world.update_lists();
        ids
    }

    #[test]
    fn layers_render_highest_first() {
        let mut world = World::new();
        let low = world.add_entity(Entity::new(0.0, 0.0).with_layer(0));
        let high = world.add_entity(Entity::new(0.0, 0.0).with_layer(2));
        let mid = world.add_entity(Entity::new(0.0, 0.0).with_layer(1));
        world.update_lists();
        assert_eq!(world.layers(), &[0, 1, 2]);
        assert_eq!(world.render_ids().collect::<Vec<_>>(), vec![high, mid, low]);
        assert_eq!(world.farthest(), Some(high));
        assert_eq!(world.nearest(), Some(low));
        assert_eq!(world.layer_farthest(), Some(2));
        assert_eq!(world.layer_nearest(), Some(0));
    }

    #[test]
    fn newest_entity_is_at_the_front() {
        let mut world = World::new();
        let ids = layered(&mut world, 0, 3);
        assert_eq!(world.layer_first(0), Some(ids[2]));
        assert_eq!(world.layer_last(0), Some(ids[0]));
        assert_eq!(world.layer_ids(0).collect::<Vec<_>>(), vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn bring_to_front_and_send_to_back() {
        let mut world = World::new();
        let ids = layered(&mut world, 0, 3);
        assert!(world.bring_to_front(ids[0]));
        assert!(world.is_at_front(ids[0]));
        assert!(!world.bring_to_front(ids[0]));
        assert_eq!(world.layer_ids(0).collect::<Vec<_>>(), vec![ids[1], ids[2], ids[0]]);

        assert!(world.send_to_back(ids[0]));
        assert!(world.is_at_back(ids[0]));
        assert!(!world.send_to_back(ids[0]));
        assert_eq!(world.layer_ids(0).collect::<Vec<_>>(), vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn forward_and_backward_swap_neighbours() {
        let mut world = World::new();
        let ids = layered(&mut world, 0, 3);
        assert!(world.bring_forward(ids[1]));
        assert_eq!(world.layer_ids(0).collect::<Vec<_>>(), vec![ids[0], ids[2], ids[1]]);
        assert!(!world.bring_forward(ids[1]));

        assert!(world.send_backward(ids[2]));
        assert_eq!(world.layer_ids(0).collect::<Vec<_>>(), vec![ids[2], ids[0], ids[1]]);
        assert!(!world.send_backward(ids[2]));
    }

    #[test]
    fn ordering_rejects_entities_outside_the_world() {
        let mut world = World::new();
        let pending = world.add_entity(Entity::default());
        assert!(!world.bring_to_front(pending));
        assert!(!world.send_to_back(pending));
        assert!(!world.is_at_front(pending));

        let ids = layered(&mut world, 0, 2);
        world.remove(ids[0]);
        assert!(!world.bring_to_front(ids[0]));
        assert!(!world.send_backward(ids[0]));
        world.update_lists();
        assert!(!world.bring_forward(ids[0]));
    }

    #[test]
    fn set_layer_relinks_committed_entities() {
        let mut world = World::new();
        let ids = layered(&mut world, 0, 2);
        world.set_layer(ids[0], 5);
        assert_eq!(world.layers(), &[0, 5]);
        assert_eq!(world.layer_count(0), 1);
        assert_eq!(world.layer_count(5), 1);
        assert_eq!(world.render_ids().collect::<Vec<_>>(), vec![ids[0], ids[1]]);

        world.set_layer(ids[1], 5);
        assert_eq!(world.layers(), &[5]);
        assert_eq!(world.layer_count(0), 0);
        assert_eq!(world.layer_first(5), Some(ids[1]));
    }

    #[test]
    fn set_layer_on_pending_entity_only_changes_the_field() {
        let mut world = World::new();
        let id = world.add_entity(Entity::default());
        world.set_layer(id, -3);
        assert!(world.layers().is_empty());
        world.update_lists();
        assert_eq!(world.layers(), &[-3]);
    }
}
