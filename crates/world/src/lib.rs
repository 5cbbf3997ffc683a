//! World: entity population, deferred lifecycle, render and type ordering,
//! and collision queries.
//!
//! # Invariants
//! - An entity is linked into the update, render and type lists iff it is
//!   committed (`added`) and belongs to the world.
//! - Adds and removes take effect only when `update_lists` commits them.
//! - The update walk visits entities head to tail; the render walk draws the
//!   highest layer first and, within a layer, back to front.
//! - Mask resolution is symmetric for every pair of mask kinds.

pub mod behavior;
pub mod entity;
mod error;
pub mod factory;
pub mod graphic;
pub mod inspect;
pub mod mask;
pub mod world;

pub use behavior::{Behavior, WorldBehavior};
pub use entity::{Entity, EntityId};
pub use error::WorldError;
pub use factory::ClassRegistry;
pub use graphic::Graphic;
pub use inspect::{EntityInfo, WorldInspector, WorldSummary};
pub use mask::{Hitbox, Mask, MaskKind, Masklist};
pub use world::{EntityIds, World};

/// Returns crate identification string.
pub fn crate_info() -> &'static str {
    concat!("punk-world v", env!("CARGO_PKG_VERSION"))
}
