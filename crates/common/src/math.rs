//! Numeric helpers shared by entities, worlds and tweens.
//!
//! Rectangles are given as `(x, y, width, height)` with `x, y` at the top-left.

use glam::Vec2;

/// Degrees per radian.
pub const DEG: f32 = 180.0 / std::f32::consts::PI;
/// Radians per degree.
pub const RAD: f32 = std::f32::consts::PI / 180.0;

pub fn sign(value: f32) -> i32 {
    if value < 0.0 {
        -1
    } else if value > 0.0 {
        1
    } else {
        0
    }
}

/// Moves `value` towards `target` by `amount` without overshooting.
pub fn approach(value: f32, target: f32, amount: f32) -> f32 {
    if value < target {
        (value + amount).min(target)
    } else {
        (value - amount).max(target)
    }
}

/// Linear interpolation: `t = 0` yields `a`, `t = 1` yields `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise interpolation between two ARGB colors. `t` is clamped to [0, 1].
pub fn color_lerp(from: u32, to: u32, t: f32) -> u32 {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    let channel = |shift: u32| {
        let a = ((from >> shift) & 0xFF) as f32;
        let b = ((to >> shift) & 0xFF) as f32;
        ((a + (b - a) * t) as u32 & 0xFF) << shift
    };
    channel(24) | channel(16) | channel(8) | channel(0)
}

/// Packs 8-bit channels into a 0xRRGGBB color.
pub fn color_rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Moves `position` towards `target` by at most `distance`.
pub fn step_towards(position: &mut Vec2, target: Vec2, distance: f32) {
    let delta = target - *position;
    if delta.length() <= distance {
        *position = target;
        return;
    }
    *position += delta.normalize() * distance;
}

/// Angle in degrees from the first point to the second, in [0, 360).
pub fn angle(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let a = (y2 - y1).atan2(x2 - x1) * DEG;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Vector of the given length pointing along `angle` degrees.
pub fn angle_xy(angle: f32, length: f32) -> Vec2 {
    let radians = angle * RAD;
    Vec2::new(radians.cos() * length, radians.sin() * length)
}

pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    square_points(x1, y1, x2, y2).sqrt()
}

pub fn square_points(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2)
}

/// Distance between two rectangles, zero when they overlap.
#[allow(clippy::too_many_arguments)]
pub fn distance_rects(x1: f32, y1: f32, w1: f32, h1: f32, x2: f32, y2: f32, w2: f32, h2: f32) -> f32 {
    square_rects(x1, y1, w1, h1, x2, y2, w2, h2).sqrt()
}

/// Squared distance between two rectangles, zero when they overlap.
#[allow(clippy::too_many_arguments)]
pub fn square_rects(x1: f32, y1: f32, w1: f32, h1: f32, x2: f32, y2: f32, w2: f32, h2: f32) -> f32 {
    let overlap_x = x1 < x2 + w2 && x2 < x1 + w1;
    let overlap_y = y1 < y2 + h2 && y2 < y1 + h1;
    if overlap_x {
        if overlap_y {
            return 0.0;
        }
        let gap = if y1 > y2 { y1 - (y2 + h2) } else { y2 - (y1 + h1) };
        return gap * gap;
    }
    if overlap_y {
        let gap = if x1 > x2 { x1 - (x2 + w2) } else { x2 - (x1 + w1) };
        return gap * gap;
    }
    if x1 > x2 {
        if y1 > y2 {
            return square_points(x1, y1, x2 + w2, y2 + h2);
        }
        return square_points(x1, y1 + h1, x2 + w2, y2);
    }
    if y1 > y2 {
        return square_points(x1 + w1, y1, x2, y2 + h2);
    }
    square_points(x1 + w1, y1 + h1, x2, y2)
}

/// Distance from a point to a rectangle, zero when the point is inside.
pub fn distance_rect_point(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> f32 {
    square_point_rect(px, py, rx, ry, rw, rh).sqrt()
}

/// Squared distance from a point to a rectangle, zero when the point is inside.
pub fn square_point_rect(px: f32, py: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> f32 {
    let inside_x = px >= rx && px <= rx + rw;
    let inside_y = py >= ry && py <= ry + rh;
    if inside_x {
        if inside_y {
            return 0.0;
        }
        let gap = if py > ry { py - (ry + rh) } else { ry - py };
        return gap * gap;
    }
    if inside_y {
        let gap = if px > rx { px - (rx + rw) } else { rx - px };
        return gap * gap;
    }
    let cx = if px > rx { rx + rw } else { rx };
    let cy = if py > ry { ry + rh } else { ry };
    square_points(px, py, cx, cy)
}

/// Clamps `value` between the two bounds, in either order.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if max > min {
        value.min(max).max(min)
    } else {
        value.min(min).max(max)
    }
}

/// Maps `value` from `[min, max]` onto `[min2, max2]`.
pub fn scale(value: f32, min: f32, max: f32, min2: f32, max2: f32) -> f32 {
    min2 + ((value - min) / (max - min)) * (max2 - min2)
}

/// Like [`scale`], clamped to the second range.
pub fn scale_clamp(value: f32, min: f32, max: f32, min2: f32, max2: f32) -> f32 {
    clamp(scale(value, min, max, min2, max2), min2, max2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_does_not_overshoot() {
        assert_eq!(approach(0.0, 1.0, 5.0), 1.0);
        assert_eq!(approach(10.0, 4.0, 2.0), 8.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn color_lerp_blends_each_channel() {
        assert_eq!(color_lerp(0xFF00_0000, 0xFFFF_FFFF, 0.0), 0xFF00_0000);
        assert_eq!(color_lerp(0xFF00_0000, 0xFFFF_FFFF, 1.0), 0xFFFF_FFFF);
        assert_eq!(color_lerp(0x0000_0000, 0x00FF_0064, 0.5), 0x007F_0032);
        // Decreasing channels must not wrap.
        assert_eq!(color_lerp(0x00FF_0000, 0x0000_0000, 0.5), 0x007F_0000);
    }

    #[test]
    fn angle_is_in_degrees_and_positive() {
        assert!((angle(0.0, 0.0, 1.0, 0.0) - 0.0).abs() < 1e-4);
        assert!((angle(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-4);
        assert!((angle(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 1e-4);
        let v = angle_xy(90.0, 2.0);
        assert!(v.x.abs() < 1e-5 && (v.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn rect_distances() {
        assert_eq!(square_rects(0.0, 0.0, 10.0, 10.0, 5.0, 5.0, 10.0, 10.0), 0.0);
        assert_eq!(square_rects(0.0, 0.0, 10.0, 10.0, 13.0, 0.0, 2.0, 2.0), 9.0);
        assert_eq!(distance_rects(0.0, 0.0, 1.0, 1.0, 4.0, 5.0, 1.0, 1.0), 5.0);
    }

    #[test]
    fn point_rect_distances() {
        assert_eq!(square_point_rect(5.0, 5.0, 0.0, 0.0, 10.0, 10.0), 0.0);
        assert_eq!(square_point_rect(5.0, 13.0, 0.0, 0.0, 10.0, 10.0), 9.0);
        assert_eq!(distance_rect_point(13.0, 14.0, 0.0, 0.0, 10.0, 10.0), 5.0);
        assert_eq!(square_point_rect(-3.0, 5.0, 0.0, 0.0, 10.0, 10.0), 9.0);
    }

    #[test]
    fn clamp_accepts_reversed_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(5.0, 1.0, 0.0), 1.0);
        assert_eq!(clamp(-5.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn scale_maps_ranges() {
        assert_eq!(scale(0.5, 0.0, 1.0, 10.0, 20.0), 15.0);
        assert_eq!(scale(3.0, 0.0, 5.0, 100.0, 0.0), 40.0);
        assert_eq!(scale_clamp(2.0, 0.0, 1.0, 10.0, 20.0), 20.0);
    }

    #[test]
    fn step_towards_snaps_when_close() {
        let mut p = Vec2::ZERO;
        step_towards(&mut p, Vec2::new(3.0, 4.0), 1.0);
        assert!((p - Vec2::new(0.6, 0.8)).length() < 1e-5);
        step_towards(&mut p, Vec2::new(3.0, 4.0), 100.0);
        assert_eq!(p, Vec2::new(3.0, 4.0));
    }
}
