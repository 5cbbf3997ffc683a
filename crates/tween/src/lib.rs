//! Tweens: timed interpolators with completion policies, and the tweener
//! containers that entities and worlds use to step them.
//!
//! # Invariants
//! - A tween belongs to at most one tweener; ownership moves in on attach.
//! - A sweep finishes a tween in the same pass that completed it.
//! - One-shot tweens leave their tweener when they finish.

pub mod ease;
mod tween;
mod tweener;

pub use tween::{Ease, OnComplete, Tween, TweenMode};
pub use tweener::{TweenError, TweenId, TweenIds, Tweener};

/// Returns crate identification string.
pub fn crate_info() -> &'static str {
    concat!("punk-tween v", env!("CARGO_PKG_VERSION"))
}
