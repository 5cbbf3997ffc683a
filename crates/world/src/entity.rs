use glam::Vec2;
use punk_common::{WorldId, math};
use punk_tween::Tweener;
use slotmap::new_key_type;

use crate::behavior::Behavior;
use crate::graphic::Graphic;
use crate::mask::{self, Body, Mask};

new_key_type! {
    /// Stable handle to an entity stored in a world's arena.
    pub struct EntityId;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub prev: Option<EntityId>,
    pub next: Option<EntityId>,
}

/// Intrusive list membership, owned by the world that links the entity.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Links {
    pub update: Link,
    pub render: Link,
    pub tagged: Link,
    pub recycle_next: Option<EntityId>,
    /// Set while the entity sits in the update, render and type lists. It
    /// outlives `added` for the length of the `removed` hook.
    pub linked: bool,
}

/// A positioned game object with a hitbox, an optional mask and graphic,
/// and its own tweens.
///
/// Layer, collision tag and class are fixed by the builder methods while the
/// entity is detached; once it lives in a world they change through
/// [`World::set_layer`](crate::World::set_layer) and
/// [`World::set_tag`](crate::World::set_tag) so the world can relink it.
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    /// Whether the update walk steps its tweens and behavior.
    pub active: bool,
    /// Whether the render walk draws it.
    pub visible: bool,
    /// Whether collision queries can hit it.
    pub collidable: bool,
    /// Tweens stepped while this entity is active. Setting
    /// `tweens.auto_clear` clears them when the entity leaves its world.
    pub tweens: Tweener,
    mask: Option<Mask>,
    graphic: Option<Box<dyn Graphic>>,
    pub(crate) tag: Option<String>,
    pub(crate) layer: i32,
    pub(crate) class: String,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) world: Option<WorldId>,
    pub(crate) added: bool,
    pub(crate) pooled: bool,
    pub(crate) links: Links,
}

impl Entity {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: 0,
            height: 0,
            origin_x: 0,
            origin_y: 0,
            active: true,
            visible: true,
            collidable: true,
            tweens: Tweener::new(),
            mask: None,
            graphic: None,
            tag: None,
            layer: 0,
            class: String::new(),
            behavior: None,
            world: None,
            added: false,
            pooled: false,
            links: Links::default(),
        }
    }

    pub fn with_graphic(mut self, graphic: impl Graphic + 'static) -> Self {
        self.set_graphic(Some(Box::new(graphic)));
        self
    }

    pub fn with_mask(mut self, mask: impl Into<Mask>) -> Self {
        self.set_mask(Some(mask.into()));
        self
    }

    pub fn with_hitbox(mut self, width: i32, height: i32, origin_x: i32, origin_y: i32) -> Self {
        self.set_hitbox(width, height, origin_x, origin_y);
        self
    }

    /// Collision tag queried by type.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Render layer; higher layers are drawn first.
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Attach game logic. The class name becomes the behavior's.
    pub fn with_behavior(mut self, behavior: impl Behavior) -> Self {
        self.class = behavior.class_name().to_owned();
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// The world this entity currently belongs to.
    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    /// Whether the entity is linked into its world's lists.
    pub fn is_added(&self) -> bool {
        self.added
    }

    pub fn is_pooled(&self) -> bool {
        self.pooled
    }

    pub fn behavior<T: Behavior>(&self) -> Option<&T> {
        self.behavior.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        self.behavior.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Assign or clear the mask. A mask resets the hitbox to its bounds;
    /// clearing keeps the current hitbox.
    pub fn set_mask(&mut self, mask: Option<Mask>) {
        self.mask = mask;
        self.sync_hitbox();
    }

    /// Edit the mask in place and resync the hitbox afterwards.
    pub fn modify_mask<R>(&mut self, edit: impl FnOnce(&mut Mask) -> R) -> Option<R> {
        let out = self.mask.as_mut().map(edit);
        self.sync_hitbox();
        out
    }

    pub fn graphic(&self) -> Option<&dyn Graphic> {
        self.graphic.as_deref()
    }

    pub fn graphic_mut(&mut self) -> Option<&mut (dyn Graphic + 'static)> {
        self.graphic.as_deref_mut()
    }

    pub fn set_graphic(&mut self, graphic: Option<Box<dyn Graphic>>) {
        self.graphic = graphic;
        if let Some(graphic) = self.graphic.as_mut() {
            graphic.assigned();
        }
    }

    pub fn set_hitbox(&mut self, width: i32, height: i32, origin_x: i32, origin_y: i32) {
        self.width = width;
        self.height = height;
        self.origin_x = origin_x;
        self.origin_y = origin_y;
    }

    pub fn center_origin(&mut self) {
        self.origin_x = self.width / 2;
        self.origin_y = self.height / 2;
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

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left() + self.width as f32 / 2.0,
            self.top() + self.height as f32 / 2.0,
        )
    }

    /// The entity's collision shape at its current position.
    pub fn body(&self) -> Body<'_> {
        self.body_at(self.x, self.y)
    }

    /// The entity's collision shape as if it stood at (`x`, `y`).
    pub fn body_at(&self, x: f32, y: f32) -> Body<'_> {
        Body {
            x,
            y,
            width: self.width,
            height: self.height,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            mask: self.mask.as_ref(),
        }
    }

    /// Whether the entity placed at (`x`, `y`) touches the rectangle. Edges
    /// count as touching for the hitbox test; the mask refines it.
    pub fn collide_rect(&self, x: f32, y: f32, rx: f32, ry: f32, rw: i32, rh: i32) -> bool {
        let left = x - self.origin_x as f32;
        let top = y - self.origin_y as f32;
        if left + self.width as f32 >= rx
            && top + self.height as f32 >= ry
            && left <= rx + rw as f32
            && top <= ry + rh as f32
        {
            if self.mask.is_none() {
                return true;
            }
            return mask::collide(&self.body_at(x, y), &Body::rect(rx, ry, rw, rh));
        }
        false
    }

    /// Whether the entity placed at (`x`, `y`) contains the point. The right
    /// and bottom edges are exclusive.
    pub fn collide_point(&self, x: f32, y: f32, px: f32, py: f32) -> bool {
        let left = x - self.origin_x as f32;
        let top = y - self.origin_y as f32;
        if px >= left && py >= top && px < left + self.width as f32 && py < top + self.height as f32 {
            if self.mask.is_none() {
                return true;
            }
            return mask::collide(&self.body_at(x, y), &Body::rect(px, py, 1, 1));
        }
        false
    }

    /// Distance to another entity: between hitboxes (zero when they overlap)
    /// or between raw positions.
    pub fn distance_from(&self, other: &Entity, use_hitboxes: bool) -> f32 {
        if !use_hitboxes {
            return math::distance(self.x, self.y, other.x, other.y);
        }
        math::distance_rects(
            self.left(),
            self.top(),
            self.width as f32,
            self.height as f32,
            other.left(),
            other.top(),
            other.width as f32,
            other.height as f32,
        )
    }

    pub fn distance_to_point(&self, px: f32, py: f32, use_hitbox: bool) -> f32 {
        if !use_hitbox {
            return math::distance(self.x, self.y, px, py);
        }
        math::distance_rect_point(px, py, self.left(), self.top(), self.width as f32, self.height as f32)
    }

    pub fn distance_to_rect(&self, rx: f32, ry: f32, rw: f32, rh: f32) -> f32 {
        math::distance_rects(
            rx,
            ry,
            rw,
            rh,
            self.left(),
            self.top(),
            self.width as f32,
            self.height as f32,
        )
    }

    /// Whether the hitbox touches a screen of `width` × `height` seen from
    /// `camera`.
    pub fn on_screen(&self, camera: Vec2, width: i32, height: i32) -> bool {
        self.collide_rect(self.x, self.y, camera.x, camera.y, width, height)
    }

    /// Draw the graphic if it is visible, at the entity's position when the
    /// graphic is relative and at the origin otherwise.
    pub fn render_graphic(&mut self, camera: Vec2) {
        let point = Vec2::new(self.x, self.y);
        if let Some(graphic) = self.graphic.as_mut() {
            if !graphic.visible() {
                return;
            }
            let at = if graphic.relative() { point } else { Vec2::ZERO };
            graphic.render(at, camera);
        }
    }

    fn sync_hitbox(&mut self) {
        if let Some(mask) = self.mask.as_ref() {
            let bounds = mask.bounds();
            self.set_hitbox(bounds.width, bounds.height, -bounds.x, -bounds.y);
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("class", &self.class)
            .field("position", &(self.x, self.y))
            .field("hitbox", &(self.width, self.height, self.origin_x, self.origin_y))
            .field("tag", &self.tag)
            .field("layer", &self.layer)
            .field("active", &self.active)
            .field("visible", &self.visible)
            .field("collidable", &self.collidable)
            .field("mask", &self.mask)
            .field("world", &self.world)
            .field("added", &self.added)
            .finish()
    }
}
