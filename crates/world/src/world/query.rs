//! Type, class and spatial queries. All scans are linear over the relevant
//! list; there is no spatial partitioning.

use glam::{DVec2, IVec2, Vec2};
use punk_common::math;

use super::World;
use super::lists::{EntityIds, List};
use crate::entity::EntityId;

impl World {
    /// Committed entities in update order.
    pub fn ids(&self) -> EntityIds<'_> {
        EntityIds::forward(&self.arena, List::Update, Some(&self.updates))
    }

    /// Committed entities tagged `tag`, most recently added first.
    pub fn type_ids(&self, tag: &str) -> EntityIds<'_> {
        EntityIds::forward(&self.arena, List::Tagged, self.tagged.get(tag))
    }

    /// Number of committed entities.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn type_count(&self, tag: &str) -> usize {
        self.tag_count.get(tag).copied().unwrap_or(0)
    }

    pub fn class_count(&self, class: &str) -> usize {
        self.class_count.get(class).copied().unwrap_or(0)
    }

    /// Number of distinct tags among committed entities.
    pub fn unique_types(&self) -> usize {
        self.tagged.len()
    }

    /// Tags in use, sorted.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.tagged.keys().map(String::as_str)
    }

    /// Head of the update list.
    pub fn first(&self) -> Option<EntityId> {
        self.updates.head
    }

    pub fn type_first(&self, tag: &str) -> Option<EntityId> {
        self.tagged.get(tag)?.head
    }

    /// First entity of `class` in update order.
    pub fn class_first(&self, class: &str) -> Option<EntityId> {
        self.ids().find(|&id| self.arena[id].class == class)
    }

    /// Retag an entity, relinking it when it is committed.
    pub fn set_tag(&mut self, id: EntityId, tag: Option<&str>) {
        let Some(entity) = self.arena.get_mut(id) else {
            return;
        };
        if entity.tag.as_deref() == tag {
            return;
        }
        if !entity.links.linked {
            entity.tag = tag.map(str::to_owned);
            return;
        }
        self.unlink_tagged(id);
        self.arena[id].tag = tag.map(str::to_owned);
        self.link_tagged(id);
    }

    /// Append entities tagged `tag`.
    pub fn get_type(&self, tag: &str, into: &mut impl Extend<EntityId>) {
        into.extend(self.type_ids(tag));
    }

    /// Append entities of `class`, in update order.
    pub fn get_class(&self, class: &str, into: &mut impl Extend<EntityId>) {
        into.extend(self.ids().filter(|&id| self.arena[id].class == class));
    }

    /// Append entities on `layer`, in drawing order.
    pub fn get_layer(&self, layer: i32, into: &mut impl Extend<EntityId>) {
        into.extend(self.layer_ids(layer));
    }

    /// Append every committed entity, in update order.
    pub fn get_all(&self, into: &mut impl Extend<EntityId>) {
        into.extend(self.ids());
    }

    /// First entity tagged `tag` that touches the rectangle.
    pub fn collide_rect(&self, tag: &str, rx: f32, ry: f32, rw: i32, rh: i32) -> Option<EntityId> {
        self.type_ids(tag).find(|&id| {
            let e = &self.arena[id];
            e.collide_rect(e.x, e.y, rx, ry, rw, rh)
        })
    }

    /// First entity tagged `tag` that contains the point.
    pub fn collide_point(&self, tag: &str, px: f32, py: f32) -> Option<EntityId> {
        self.type_ids(tag).find(|&id| {
            let e = &self.arena[id];
            e.collide_point(e.x, e.y, px, py)
        })
    }

    pub fn collide_rect_into(
        &self,
        tag: &str,
        rx: f32,
        ry: f32,
        rw: i32,
        rh: i32,
        into: &mut impl Extend<EntityId>,
    ) {
        into.extend(self.type_ids(tag).filter(|&id| {
            let e = &self.arena[id];
            e.collide_rect(e.x, e.y, rx, ry, rw, rh)
        }));
    }

    pub fn collide_point_into(&self, tag: &str, px: f32, py: f32, into: &mut impl Extend<EntityId>) {
        into.extend(self.type_ids(tag).filter(|&id| {
            let e = &self.arena[id];
            e.collide_point(e.x, e.y, px, py)
        }));
    }

    /// First entity tagged `tag` met when walking from `from` to `to`,
    /// sampling every `precision` pixels along the longer axis.
    pub fn collide_line(&self, tag: &str, from: IVec2, to: IVec2, precision: i32) -> Option<EntityId> {
        self.collide_line_point(tag, from, to, precision).0
    }

    /// Like [`collide_line`](World::collide_line), also returning the last
    /// sampled point before the hit, or `to` when nothing was hit.
    pub fn collide_line_point(&self, tag: &str, from: IVec2, to: IVec2, precision: i32) -> (Option<EntityId>, Vec2) {
        self.walk_line(tag, from.as_dvec2(), to.as_dvec2(), f64::from(precision.max(1)))
    }

    /// Samples are indexed so the walk terminates whatever the magnitude
    /// of the endpoints.
    fn walk_line(&self, tag: &str, from: DVec2, to: DVec2, precision: f64) -> (Option<EntityId>, Vec2) {
        let hit_at = |p: DVec2| self.collide_point(tag, p.x as f32, p.y as f32);
        if from == to {
            return (hit_at(to), to.as_vec2());
        }
        if precision > 1.0 && from.distance(to) < precision {
            return self.walk_line(tag, from, to, 1.0);
        }

        let delta = to - from;
        let major = delta.x.abs().max(delta.y.abs());
        let step = delta * (precision / major);
        let samples = (major / precision).ceil() as u64;
        let sample = |i: f64| from + step * i;

        for i in 0..samples {
            if let Some(hit) = hit_at(sample(i as f64)) {
                let free = sample(i as f64 - 1.0);
                if precision < 2.0 {
                    return (Some(hit), free.as_vec2());
                }
                return self.walk_line(tag, free, to, 1.0);
            }
        }

        if precision > 1.0 {
            if let Some(hit) = hit_at(to) {
                let last = sample(samples as f64 - 1.0);
                return match self.walk_line(tag, last, to, 1.0) {
                    (Some(found), free) => (Some(found), free),
                    (None, _) => (Some(hit), (to - delta / major).as_vec2()),
                };
            }
        }
        (None, to.as_vec2())
    }

    /// Entity tagged `tag` whose hitbox is closest to the rectangle.
    pub fn nearest_to_rect(&self, tag: &str, x: f32, y: f32, width: f32, height: f32) -> Option<EntityId> {
        self.nearest_by(tag, None, |e| {
            math::square_rects(x, y, width, height, e.left(), e.top(), e.width as f32, e.height as f32)
        })
    }

    /// Entity tagged `tag` closest to `id`, other than `id` itself.
    pub fn nearest_to_entity(&self, tag: &str, id: EntityId, use_hitboxes: bool) -> Option<EntityId> {
        let target = self.arena.get(id)?;
        let (x, y) = (target.x, target.y);
        let (left, top) = (target.left(), target.top());
        let (width, height) = (target.width as f32, target.height as f32);
        self.nearest_by(tag, Some(id), |e| {
            if use_hitboxes {
                math::square_rects(left, top, width, height, e.left(), e.top(), e.width as f32, e.height as f32)
            } else {
                math::square_points(x, y, e.x, e.y)
            }
        })
    }

    /// Entity tagged `tag` closest to the point.
    pub fn nearest_to_point(&self, tag: &str, x: f32, y: f32, use_hitboxes: bool) -> Option<EntityId> {
        self.nearest_by(tag, None, |e| {
            if use_hitboxes {
                math::square_point_rect(x, y, e.left(), e.top(), e.width as f32, e.height as f32)
            } else {
                math::square_points(x, y, e.x, e.y)
            }
        })
    }

    fn nearest_by(
        &self,
        tag: &str,
        skip: Option<EntityId>,
        distance: impl Fn(&crate::Entity) -> f32,
    ) -> Option<EntityId> {
        let mut nearest = None;
        let mut best = f32::INFINITY;
        for id in self.type_ids(tag) {
            if Some(id) == skip {
                continue;
            }
            let d = distance(&self.arena[id]);
            if d < best {
                best = d;
                nearest = Some(id);
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;
    use crate::mask::{Hitbox, Masklist};

    fn enemy(world: &mut World, x: f32, y: f32, w: i32, h: i32) -> EntityId {
        world.add_entity(Entity::new(x, y).with_hitbox(w, h, 0, 0).with_tag("enemy"))
    }

    #[test]
    fn collide_rect_finds_overlapping_enemy() {
        let mut world = World::new();
        let id = enemy(&mut world, 0.0, 0.0, 10, 10);
        world.update_lists();
        assert_eq!(world.collide_rect("enemy", 5.0, 5.0, 10, 10), Some(id));
        assert_eq!(world.collide_rect("enemy", 20.0, 20.0, 5, 5), None);
        assert_eq!(world.collide_rect("wall", 5.0, 5.0, 10, 10), None);
    }

    #[test]
    fn uncommitted_entities_are_not_queried() {
        let mut world = World::new();
        enemy(&mut world, 0.0, 0.0, 10, 10);
        assert_eq!(world.collide_point("enemy", 1.0, 1.0), None);
        assert_eq!(world.type_count("enemy"), 0);
    }

    #[test]
    fn into_variants_append_without_clearing() {
        let mut world = World::new();
        let a = enemy(&mut world, 0.0, 0.0, 10, 10);
        let b = enemy(&mut world, 5.0, 5.0, 10, 10);
        enemy(&mut world, 50.0, 50.0, 10, 10);
        world.update_lists();

        let mut hits = vec![EntityId::default()];
        world.collide_rect_into("enemy", 6.0, 6.0, 2, 2, &mut hits);
        assert_eq!(hits.len(), 3);
        assert!(hits.contains(&a) && hits.contains(&b));

        let mut points = std::collections::BTreeSet::new();
        world.collide_point_into("enemy", 7.0, 7.0, &mut points);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn zero_length_line_is_a_point_check() {
        let mut world = World::new();
        let id = enemy(&mut world, 10.0, 10.0, 4, 4);
        world.update_lists();
        let at = IVec2::new(11, 11);
        assert_eq!(world.collide_line("enemy", at, at, 1), world.collide_point("enemy", 11.0, 11.0));
        assert_eq!(world.collide_line("enemy", at, at, 1), Some(id));
        let away = IVec2::new(0, 0);
        assert_eq!(world.collide_line("enemy", away, away, 3), None);
    }

    #[test]
    fn line_reports_last_free_point() {
        let mut world = World::new();
        let id = enemy(&mut world, 50.0, 0.0, 10, 10);
        world.update_lists();
        let (from, to) = (IVec2::new(0, 5), IVec2::new(100, 5));
        assert_eq!(world.collide_line_point("enemy", from, to, 1), (Some(id), Vec2::new(49.0, 5.0)));
        assert_eq!(world.collide_line_point("enemy", from, to, 4), (Some(id), Vec2::new(49.0, 5.0)));
        assert_eq!(world.collide_line_point("enemy", to, from, 1), (Some(id), Vec2::new(60.0, 5.0)));
    }

    #[test]
    fn line_miss_returns_the_end_point() {
        let mut world = World::new();
        enemy(&mut world, 50.0, 50.0, 10, 10);
        world.update_lists();
        let to = IVec2::new(30, 100);
        assert_eq!(world.collide_line_point("enemy", IVec2::ZERO, to, 2), (None, Vec2::new(30.0, 100.0)));
    }

    #[test]
    fn vertical_lines_step_along_y() {
        let mut world = World::new();
        let id = enemy(&mut world, 0.0, 20.0, 10, 10);
        world.update_lists();
        let hit = world.collide_line("enemy", IVec2::new(5, 0), IVec2::new(5, 40), 3);
        assert_eq!(hit, Some(id));
    }

    #[test]
    fn lines_beyond_f32_integer_range_terminate() {
        let mut world = World::new();
        let id = enemy(&mut world, 16_777_280.0, 0.0, 8, 8);
        world.update_lists();
        let (from, to) = (IVec2::new(16_777_216, 0), IVec2::new(16_777_300, 0));
        assert_eq!(world.collide_line("enemy", from, to, 1), Some(id));
        assert_eq!(world.collide_line("wall", from, to, 1), None);
        assert_eq!(world.collide_line_point("wall", from, to, 7), (None, to.as_vec2()));
    }

    #[test]
    fn coarse_hit_at_the_end_point_refines_the_free_point() {
        let mut world = World::new();
        let id = enemy(&mut world, 9.0, 0.0, 4, 4);
        world.update_lists();
        let (from, to) = (IVec2::new(0, 1), IVec2::new(10, 1));
        assert_eq!(world.collide_line_point("enemy", from, to, 4), (Some(id), Vec2::new(8.0, 1.0)));
        assert_eq!(world.collide_line_point("enemy", from, to, 1), (Some(id), Vec2::new(8.0, 1.0)));
    }

    #[test]
    fn coarse_hit_only_on_the_end_pixel_steps_back_one_pixel() {
        let mut world = World::new();
        let id = enemy(&mut world, 10.0, 0.0, 1, 4);
        world.update_lists();
        let (from, to) = (IVec2::new(0, 1), IVec2::new(10, 1));
        assert_eq!(world.collide_line_point("enemy", from, to, 4), (Some(id), Vec2::new(9.0, 1.0)));
    }

    #[test]
    fn nearest_queries_use_squared_distances() {
        let mut world = World::new();
        let near = enemy(&mut world, 20.0, 0.0, 10, 10);
        let far = enemy(&mut world, 100.0, 0.0, 10, 10);
        let player = world.add_entity(Entity::new(0.0, 0.0).with_hitbox(10, 10, 0, 0).with_tag("enemy"));
        world.update_lists();

        assert_eq!(world.nearest_to_rect("enemy", 90.0, 0.0, 5.0, 5.0), Some(far));
        assert_eq!(world.nearest_to_entity("enemy", player, true), Some(near));
        assert_eq!(world.nearest_to_entity("enemy", player, false), Some(near));
        assert_eq!(world.nearest_to_point("enemy", 104.0, 4.0, true), Some(far));
        assert_eq!(world.nearest_to_point("enemy", 55.0, 0.0, false), Some(near));
        assert_eq!(world.nearest_to_point("ghost", 0.0, 0.0, false), None);
    }

    #[test]
    fn counts_and_firsts_track_commits() {
        let mut world = World::new();
        let a = world.add_entity(Entity::default().with_class("Bullet").with_tag("shot"));
        let b = world.add_entity(Entity::default().with_class("Bullet"));
        let c = world.add_entity(Entity::default().with_class("Ship").with_tag("hull"));
        world.update_lists();

        assert_eq!(world.count(), 3);
        assert_eq!(world.class_count("Bullet"), 2);
        assert_eq!(world.type_count("shot"), 1);
        assert_eq!(world.unique_types(), 2);
        assert_eq!(world.types().collect::<Vec<_>>(), vec!["hull", "shot"]);
        assert_eq!(world.first(), Some(c));
        assert_eq!(world.type_first("shot"), Some(a));
        assert_eq!(world.class_first("Bullet"), Some(b));

        let mut bullets = Vec::new();
        world.get_class("Bullet", &mut bullets);
        assert_eq!(bullets, vec![b, a]);
        let mut all = Vec::new();
        world.get_all(&mut all);
        assert_eq!(all, vec![c, b, a]);
        let mut layer = Vec::new();
        world.get_layer(0, &mut layer);
        assert_eq!(layer, vec![a, b, c]);

        world.remove(a);
        world.update_lists();
        assert_eq!(world.type_count("shot"), 0);
        assert_eq!(world.unique_types(), 1);
        assert_eq!(world.class_count("Bullet"), 1);
    }

    #[test]
    fn set_tag_relinks_committed_entities() {
        let mut world = World::new();
        let id = enemy(&mut world, 0.0, 0.0, 4, 4);
        world.update_lists();
        world.set_tag(id, Some("friend"));
        assert_eq!(world.type_first("enemy"), None);
        assert_eq!(world.type_first("friend"), Some(id));
        world.set_tag(id, None);
        assert_eq!(world.unique_types(), 0);
        assert_eq!(world.entity(id).and_then(|e| e.tag()), None);
    }

    #[test]
    fn masks_refine_world_queries() {
        let mut world = World::new();
        let list = Masklist::new(vec![Hitbox::new(4, 4, 0, 0).into(), Hitbox::new(4, 4, 20, 0).into()]);
        let id = world.add_mask(list, "solid", 0.0, 0.0);
        world.update_lists();
        assert_eq!(world.collide_point("solid", 21.0, 1.0), Some(id));
        assert_eq!(world.collide_point("solid", 10.0, 1.0), None);
        assert_eq!(world.collide_rect("solid", 9.0, 0.0, 2, 2), None);
    }
}
