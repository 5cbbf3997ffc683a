use glam::Vec2;

/// Something an entity draws. The world only steers it: it asks whether the
/// graphic is active, visible or relative, and calls `update` and `render`.
///
/// Rasterization itself belongs to the host.
pub trait Graphic {
    /// Whether `update` is called during the world's update walk.
    fn active(&self) -> bool {
        false
    }

    /// Whether the owner draws it.
    fn visible(&self) -> bool {
        true
    }

    /// Whether it is drawn relative to its owner's position.
    fn relative(&self) -> bool {
        true
    }

    fn update(&mut self) {}

    /// Draw at `point`, offset by `camera`.
    fn render(&mut self, point: Vec2, camera: Vec2);

    /// Called once the graphic has been given to an entity.
    fn assigned(&mut self) {}
}
