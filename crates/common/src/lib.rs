//! Shared types and geometry helpers for the punk runtime.
//!
//! # Invariants
//! - Everything here is pure data or pure functions; no engine state.

pub mod math;
mod types;

pub use types::{Frame, IRect, WorldId};
