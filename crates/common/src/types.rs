use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a world. Entities hold it as their back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing and screen information for the tick currently being simulated.
///
/// Replaces process-wide engine globals: the engine builds one per logical
/// tick and hands it to the world, which exposes it to entity hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Seconds elapsed for this tick, already clamped and scaled.
    pub elapsed: f32,
    /// Whether the engine runs a fixed timestep.
    pub fixed: bool,
    /// Screen width in pixels.
    pub width: i32,
    /// Screen height in pixels.
    pub height: i32,
    /// Logical tick counter.
    pub tick: u64,
}

impl Frame {
    /// How far time-driven state should advance this tick: one unit per tick
    /// under a fixed timestep, measured seconds otherwise.
    pub fn step(&self) -> f32 {
        if self.fixed { 1.0 } else { self.elapsed }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            fixed: false,
            width: 320,
            height: 240,
            tick: 0,
        }
    }
}

/// Integer rectangle used for hitboxes and literal collision areas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &IRect) -> IRect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        IRect::new(left, top, right - left, bottom - top)
    }
}
