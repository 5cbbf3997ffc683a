use slotmap::{SlotMap, new_key_type};

use crate::tween::{Finished, Tween};

new_key_type! {
    /// Handle to a tween attached to a [`Tweener`].
    pub struct TweenId;
}

/// Errors from tweener operations.
#[derive(Debug, thiserror::Error)]
pub enum TweenError {
    #[error("tweener does not contain tween {0:?}")]
    NotOwned(TweenId),
}

#[derive(Debug)]
struct Slot {
    tween: Tween,
    prev: Option<TweenId>,
    next: Option<TweenId>,
}

/// An ordered container of tweens, stepped once per tick by its host.
///
/// New tweens are inserted at the head, so a sweep visits the most recently
/// added tween first.
#[derive(Debug, Default)]
pub struct Tweener {
    /// Whether the host clears its tweens when it leaves its container
    /// (an entity removed from its world, or a world switched away from).
    pub auto_clear: bool,
    slots: SlotMap<TweenId, Slot>,
    head: Option<TweenId>,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.slots.get(id).map(|slot| &slot.tween)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.slots.get_mut(id).map(|slot| &mut slot.tween)
    }

    /// Attach a tween, optionally starting it. Ownership moves in, so a tween
    /// can never be attached to two tweeners at once.
    pub fn add_tween(&mut self, tween: Tween, start: bool) -> TweenId {
        let next = self.head;
        let id = self.slots.insert(Slot {
            tween,
            prev: None,
            next,
        });
        if let Some(old) = next {
            self.slots[old].prev = Some(id);
        }
        self.head = Some(id);
        if start {
            self.slots[id].tween.start();
        }
        id
    }

    /// Detach a tween and hand it back, deactivated.
    pub fn remove_tween(&mut self, id: TweenId) -> Result<Tween, TweenError> {
        let slot = self.slots.remove(id).ok_or(TweenError::NotOwned(id))?;
        match slot.prev {
            Some(prev) => self.slots[prev].next = slot.next,
            None => self.head = slot.next,
        }
        if let Some(next) = slot.next {
            self.slots[next].prev = slot.prev;
        }
        let mut tween = slot.tween;
        tween.active = false;
        Ok(tween)
    }

    /// Detach and drop every tween.
    pub fn clear_tweens(&mut self) {
        let cleared = self.slots.len();
        self.slots.clear();
        self.head = None;
        if cleared > 0 {
            tracing::trace!(cleared, "tweens cleared");
        }
    }

    /// One forward sweep: advance each active tween by `dt`, finishing any that
    /// complete during this same pass. Returns how many tweens finished.
    pub fn update_tweens(&mut self, dt: f32) -> usize {
        let mut finished = 0;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let slot = &mut self.slots[id];
            cursor = slot.next;
            if !slot.tween.active {
                continue;
            }
            slot.tween.update(dt);
            if !slot.tween.is_finish_pending() {
                continue;
            }
            finished += 1;
            if slot.tween.finish() == Finished::Detach {
                // The slot is known to exist; `remove_tween` cannot fail here.
                if self.remove_tween(id).is_ok() {
                    tracing::trace!(?id, "one-shot tween detached");
                }
            }
        }
        finished
    }

    /// Tween handles in sweep order.
    pub fn ids(&self) -> TweenIds<'_> {
        TweenIds {
            tweener: self,
            cursor: self.head,
        }
    }
}

/// Iterator over tween handles in sweep order.
pub struct TweenIds<'a> {
    tweener: &'a Tweener,
    cursor: Option<TweenId>,
}

impl Iterator for TweenIds<'_> {
    type Item = TweenId;

    fn next(&mut self) -> Option<TweenId> {
        let id = self.cursor?;
        self.cursor = self.tweener.slots.get(id).and_then(|slot| slot.next);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TweenMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn add_tween_head_inserts() {
        let mut tweener = Tweener::new();
        let a = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), false);
        let b = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), false);
        assert_eq!(tweener.ids().collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn add_with_start_activates() {
        let mut tweener = Tweener::new();
        let id = tweener.add_tween(Tween::new(3.0, TweenMode::Persist), true);
        assert!(tweener.get(id).unwrap().active);
    }

    #[test]
    fn remove_tween_detaches_and_deactivates() {
        let mut tweener = Tweener::new();
        let a = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), true);
        let b = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), true);
        let c = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), true);

        let removed = tweener.remove_tween(b).unwrap();
        assert!(!removed.active);
        assert_eq!(tweener.ids().collect::<Vec<_>>(), vec![c, a]);

        tweener.remove_tween(c).unwrap();
        assert_eq!(tweener.ids().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn removing_foreign_tween_is_an_error() {
        let mut owner = Tweener::new();
        let mut other = Tweener::new();
        let id = owner.add_tween(Tween::new(1.0, TweenMode::Persist), false);
        assert!(matches!(other.remove_tween(id), Err(TweenError::NotOwned(_))));

        owner.remove_tween(id).unwrap();
        assert!(owner.remove_tween(id).is_err());
    }

    #[test]
    fn persist_tween_clamps_elapsed_and_stays_inactive() {
        let mut tweener = Tweener::new();
        let id = tweener.add_tween(Tween::new(10.0, TweenMode::Persist), true);
        for _ in 0..3 {
            tweener.update_tweens(4.0);
        }
        let tween = tweener.get(id).unwrap();
        assert_eq!(tween.elapsed(), 10.0);
        assert_eq!(tween.scale(), 1.0);
        assert!(!tween.active);

        tweener.update_tweens(4.0);
        assert_eq!(tweener.get(id).unwrap().elapsed(), 10.0);
    }

    #[test]
    fn oneshot_tween_detaches_itself() {
        let mut tweener = Tweener::new();
        let id = tweener.add_tween(Tween::new(2.0, TweenMode::OneShot), true);
        assert_eq!(tweener.update_tweens(1.0), 0);
        assert_eq!(tweener.update_tweens(1.0), 1);
        assert!(!tweener.contains(id));
        assert!(tweener.is_empty());
    }

    #[test]
    fn looping_tween_keeps_running() {
        let mut tweener = Tweener::new();
        let id = tweener.add_tween(Tween::new(3.0, TweenMode::Looping), true);
        let mut completions = 0;
        for _ in 0..7 {
            completions += tweener.update_tweens(1.0);
        }
        assert_eq!(completions, 2);
        let tween = tweener.get(id).unwrap();
        assert!(tween.active);
        assert_eq!(tween.elapsed(), 1.0);

        assert_eq!(tweener.update_tweens(4.5), 1);
        assert_eq!(tweener.get(id).unwrap().elapsed(), 0.0);
    }

    #[test]
    fn callbacks_run_after_the_whole_update_of_their_tween() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tweener = Tweener::new();
        let seen = log.clone();
        tweener.add_tween(
            Tween::new(1.0, TweenMode::Persist).on_complete(move || seen.borrow_mut().push("done")),
            true,
        );
        tweener.update_tweens(1.0);
        assert_eq!(*log.borrow(), vec!["done"]);
        tweener.update_tweens(1.0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn inactive_tweens_are_skipped() {
        let mut tweener = Tweener::new();
        let id = tweener.add_tween(Tween::new(1.0, TweenMode::Persist), false);
        tweener.update_tweens(5.0);
        assert_eq!(tweener.get(id).unwrap().elapsed(), 0.0);
    }

    #[test]
    fn clear_tweens_empties_the_list() {
        let mut tweener = Tweener::new();
        tweener.add_tween(Tween::new(1.0, TweenMode::Persist), true);
        tweener.add_tween(Tween::new(1.0, TweenMode::Looping), true);
        tweener.clear_tweens();
        assert!(tweener.is_empty());
        assert_eq!(tweener.len(), 0);
    }
}
