//! Collision masks and the pairwise resolution table between mask kinds.
//!
//! An entity without a mask collides with its plain hitbox; that implicit
//! shape is [`MaskKind::Bounds`]. Each kind owns a resolver table keyed by the
//! other side's kind. Resolution looks in the left side's table first and
//! falls back to the right side's table with the arguments swapped, so every
//! pair only has to be written once.

use punk_common::IRect;
use serde::{Deserialize, Serialize};

/// Concrete kind of a mask, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskKind {
    /// The owner's own hitbox; entities without a mask.
    Bounds,
    Hitbox,
    Masklist,
}

/// Resolver invoked with the table owner first and the other body second.
type Resolver = fn(&Body<'_>, &Body<'_>) -> bool;

impl MaskKind {
    /// The table this kind registers for other kinds.
    fn resolver(self, other: MaskKind) -> Option<Resolver> {
        match (self, other) {
            (MaskKind::Bounds, MaskKind::Bounds) => Some(bounds_vs_bounds),
            (MaskKind::Bounds, MaskKind::Masklist) => Some(forward_to_list),
            (MaskKind::Bounds, MaskKind::Hitbox) => None,
            (MaskKind::Hitbox, MaskKind::Bounds) => Some(hitbox_vs_bounds),
            (MaskKind::Hitbox, MaskKind::Hitbox) => Some(hitbox_vs_hitbox),
            (MaskKind::Hitbox, MaskKind::Masklist) => Some(forward_to_list),
            (MaskKind::Masklist, _) => Some(list_vs_any),
        }
    }
}

/// A rectangular mask offset from its owner's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Hitbox {
    pub fn new(width: i32, height: i32, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for Hitbox {
    fn default() -> Self {
        Self::new(1, 1, 0, 0)
    }
}

/// An aggregate mask that collides when any member does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Masklist {
    masks: Vec<Mask>,
}

impl Masklist {
    pub fn new(masks: Vec<Mask>) -> Self {
        Self { masks }
    }

    pub fn push(&mut self, mask: Mask) {
        self.masks.push(mask);
    }

    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    pub fn masks_mut(&mut self) -> &mut Vec<Mask> {
        &mut self.masks
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mask {
    Hitbox(Hitbox),
    Masklist(Masklist),
}

impl Mask {
    pub fn kind(&self) -> MaskKind {
        match self {
            Mask::Hitbox(_) => MaskKind::Hitbox,
            Mask::Masklist(_) => MaskKind::Masklist,
        }
    }

    /// Bounding rectangle relative to the owner's position. An empty list
    /// has empty bounds at the origin.
    pub fn bounds(&self) -> IRect {
        match self {
            Mask::Hitbox(h) => IRect::new(h.x, h.y, h.width, h.height),
            Mask::Masklist(list) => list
                .masks
                .iter()
                .map(Mask::bounds)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default(),
        }
    }
}

impl From<Hitbox> for Mask {
    fn from(hitbox: Hitbox) -> Self {
        Mask::Hitbox(hitbox)
    }
}

impl From<Masklist> for Mask {
    fn from(list: Masklist) -> Self {
        Mask::Masklist(list)
    }
}

/// A shape placed in the world: an owner's position and hitbox plus the mask
/// (if any) refining it.
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub mask: Option<&'a Mask>,
}

impl<'a> Body<'a> {
    /// A bare rectangle with its origin at the top-left corner.
    pub fn rect(x: f32, y: f32, width: i32, height: i32) -> Body<'static> {
        Body {
            x,
            y,
            width,
            height,
            origin_x: 0,
            origin_y: 0,
            mask: None,
        }
    }

    pub fn kind(&self) -> MaskKind {
        self.mask.map_or(MaskKind::Bounds, Mask::kind)
    }

    pub fn left(&self) -> f32 {
        self.x - self.origin_x as f32
    }

    pub fn top(&self) -> f32 {
        self.y - self.origin_y as f32
    }

    pub fn right(&self) -> f32 {
        self.left() + self.width as f32
    }

    pub fn bottom(&self) -> f32 {
        self.top() + self.height as f32
    }

    /// Strict hitbox overlap, ignoring masks.
    pub fn overlaps(&self, other: &Body<'_>) -> bool {
        self.right() > other.left()
            && self.bottom() > other.top()
            && self.left() < other.right()
            && self.top() < other.bottom()
    }

    fn with_mask(&self, mask: &'a Mask) -> Body<'a> {
        Body {
            mask: Some(mask),
            ..*self
        }
    }
}

/// Resolve two placed shapes against each other.
///
/// Pairs with no resolver on either side do not collide.
pub fn collide(a: &Body<'_>, b: &Body<'_>) -> bool {
    if let Some(resolve) = a.kind().resolver(b.kind()) {
        return resolve(a, b);
    }
    if let Some(resolve) = b.kind().resolver(a.kind()) {
        return resolve(b, a);
    }
    false
}

fn bounds_vs_bounds(this: &Body<'_>, other: &Body<'_>) -> bool {
    this.overlaps(other)
}

fn forward_to_list(this: &Body<'_>, list: &Body<'_>) -> bool {
    collide(list, this)
}

fn hitbox_vs_bounds(this: &Body<'_>, other: &Body<'_>) -> bool {
    let Some(Mask::Hitbox(h)) = this.mask else {
        return false;
    };
    let left = this.x + h.x as f32;
    let top = this.y + h.y as f32;
    left + h.width as f32 > other.left()
        && top + h.height as f32 > other.top()
        && left < other.right()
        && top < other.bottom()
}

fn hitbox_vs_hitbox(this: &Body<'_>, other: &Body<'_>) -> bool {
    let (Some(Mask::Hitbox(a)), Some(Mask::Hitbox(b))) = (this.mask, other.mask) else {
        return false;
    };
    let (ax, ay) = (this.x + a.x as f32, this.y + a.y as f32);
    let (bx, by) = (other.x + b.x as f32, other.y + b.y as f32);
    ax + a.width as f32 > bx
        && ay + a.height as f32 > by
        && ax < bx + b.width as f32
        && ay < by + b.height as f32
}

fn list_vs_any(this: &Body<'_>, other: &Body<'_>) -> bool {
    let Some(Mask::Masklist(list)) = this.mask else {
        return false;
    };
    list.masks
        .iter()
        .any(|member| collide(&this.with_mask(member), other))
}
