//! Intrusive doubly linked lists threaded through the entity arena.

use slotmap::SlotMap;

use crate::entity::{Entity, EntityId, Link};

pub(crate) type Arena = SlotMap<EntityId, Entity>;

/// Which of an entity's link pairs a list uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum List {
    Update,
    Render,
    Tagged,
}

fn link_mut(arena: &mut Arena, list: List, id: EntityId) -> &mut Link {
    let links = &mut arena[id].links;
    match list {
        List::Update => &mut links.update,
        List::Render => &mut links.render,
        List::Tagged => &mut links.tagged,
    }
}

pub(crate) fn link(arena: &Arena, list: List, id: EntityId) -> Option<Link> {
    let links = &arena.get(id)?.links;
    Some(match list {
        List::Update => links.update,
        List::Render => links.render,
        List::Tagged => links.tagged,
    })
}

/// Head and tail of one list. Every id reachable from here is in the arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ends {
    pub head: Option<EntityId>,
    pub tail: Option<EntityId>,
}

impl Ends {
    pub fn push_front(&mut self, arena: &mut Arena, list: List, id: EntityId) {
        let old = self.head;
        *link_mut(arena, list, id) = Link { prev: None, next: old };
        match old {
            Some(old) => link_mut(arena, list, old).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    pub fn push_back(&mut self, arena: &mut Arena, list: List, id: EntityId) {
        match self.tail {
            Some(tail) => self.insert_after(arena, list, tail, id),
            None => self.push_front(arena, list, id),
        }
    }

    /// Link `id` directly in front of `anchor` (towards the head).
    pub fn insert_before(&mut self, arena: &mut Arena, list: List, anchor: EntityId, id: EntityId) {
        let prev = link_mut(arena, list, anchor).prev;
        *link_mut(arena, list, id) = Link {
            prev,
            next: Some(anchor),
        };
        link_mut(arena, list, anchor).prev = Some(id);
        match prev {
            Some(prev) => link_mut(arena, list, prev).next = Some(id),
            None => self.head = Some(id),
        }
    }

    /// Link `id` directly behind `anchor` (towards the tail).
    pub fn insert_after(&mut self, arena: &mut Arena, list: List, anchor: EntityId, id: EntityId) {
        let next = link_mut(arena, list, anchor).next;
        *link_mut(arena, list, id) = Link {
            prev: Some(anchor),
            next,
        };
        link_mut(arena, list, anchor).next = Some(id);
        match next {
            Some(next) => link_mut(arena, list, next).prev = Some(id),
            None => self.tail = Some(id),
        }
    }

    pub fn unlink(&mut self, arena: &mut Arena, list: List, id: EntityId) {
        let Link { prev, next } = std::mem::take(link_mut(arena, list, id));
        match prev {
            Some(prev) => link_mut(arena, list, prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => link_mut(arena, list, next).prev = prev,
            None => self.tail = prev,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Iterator over one list, head to tail or tail to head.
pub struct EntityIds<'a> {
    arena: &'a Arena,
    list: List,
    cursor: Option<EntityId>,
    backwards: bool,
}

impl<'a> EntityIds<'a> {
    pub(crate) fn forward(arena: &'a Arena, list: List, ends: Option<&Ends>) -> Self {
        Self {
            arena,
            list,
            cursor: ends.and_then(|e| e.head),
            backwards: false,
        }
    }

    pub(crate) fn backward(arena: &'a Arena, list: List, ends: Option<&Ends>) -> Self {
        Self {
            arena,
            list,
            cursor: ends.and_then(|e| e.tail),
            backwards: true,
        }
    }
}

impl Iterator for EntityIds<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let id = self.cursor?;
        let link = link(self.arena, self.list, id)?;
        self.cursor = if self.backwards { link.prev } else { link.next };
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(n: usize) -> (Arena, Vec<EntityId>) {
        let mut arena = Arena::with_key();
        let ids = (0..n).map(|_| arena.insert(Entity::default())).collect();
        (arena, ids)
    }

    fn walk(arena: &Arena, ends: &Ends) -> Vec<EntityId> {
        EntityIds::forward(arena, List::Render, Some(ends)).collect()
    }

    fn walk_back(arena: &Arena, ends: &Ends) -> Vec<EntityId> {
        EntityIds::backward(arena, List::Render, Some(ends)).collect()
    }

    #[test]
    fn push_front_and_back_keep_both_ends() {
        let (mut arena, ids) = arena_with(3);
        let mut ends = Ends::default();
        ends.push_front(&mut arena, List::Render, ids[0]);
        ends.push_front(&mut arena, List::Render, ids[1]);
        ends.push_back(&mut arena, List::Render, ids[2]);
        assert_eq!(walk(&arena, &ends), vec![ids[1], ids[0], ids[2]]);
        assert_eq!(walk_back(&arena, &ends), vec![ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn unlink_repairs_neighbours_and_ends() {
        let (mut arena, ids) = arena_with(3);
        let mut ends = Ends::default();
        for &id in &ids {
            ends.push_front(&mut arena, List::Render, id);
        }
        ends.unlink(&mut arena, List::Render, ids[1]);
        assert_eq!(walk(&arena, &ends), vec![ids[2], ids[0]]);
        ends.unlink(&mut arena, List::Render, ids[2]);
        ends.unlink(&mut arena, List::Render, ids[0]);
        assert!(ends.is_empty());
        assert_eq!(ends.tail, None);
    }

    #[test]
    fn insert_around_an_anchor() {
        let (mut arena, ids) = arena_with(4);
        let mut ends = Ends::default();
        ends.push_front(&mut arena, List::Render, ids[0]);
        ends.insert_before(&mut arena, List::Render, ids[0], ids[1]);
        ends.insert_after(&mut arena, List::Render, ids[0], ids[2]);
        ends.insert_after(&mut arena, List::Render, ids[1], ids[3]);
        assert_eq!(walk(&arena, &ends), vec![ids[1], ids[3], ids[0], ids[2]]);
        assert_eq!(ends.head, Some(ids[1]));
        assert_eq!(ends.tail, Some(ids[2]));
    }

    #[test]
    fn lists_are_independent() {
        let (mut arena, ids) = arena_with(2);
        let mut render = Ends::default();
        let mut update = Ends::default();
        render.push_front(&mut arena, List::Render, ids[0]);
        render.push_front(&mut arena, List::Render, ids[1]);
        update.push_front(&mut arena, List::Update, ids[1]);
        assert_eq!(EntityIds::forward(&arena, List::Update, Some(&update)).count(), 1);
        assert_eq!(walk(&arena, &render).len(), 2);
    }
}
