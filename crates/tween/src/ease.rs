//! Standard easing curves. Each maps normalized time in (0, 1) onto eased
//! progress, with `f(0) = 0` and `f(1) = 1`.

use std::f32::consts::{FRAC_PI_2, PI};

const B1: f32 = 1.0 / 2.75;
const B2: f32 = 2.0 / 2.75;
const B3: f32 = 1.5 / 2.75;
const B4: f32 = 2.5 / 2.75;
const B5: f32 = 2.25 / 2.75;
const B6: f32 = 2.625 / 2.75;

pub fn quad_in(t: f32) -> f32 {
    t * t
}

pub fn quad_out(t: f32) -> f32 {
    -t * (t - 2.0)
}

pub fn quad_in_out(t: f32) -> f32 {
    if t <= 0.5 {
        t * t * 2.0
    } else {
        1.0 - (t - 1.0) * (t - 1.0) * 2.0
    }
}

pub fn cube_in(t: f32) -> f32 {
    t * t * t
}

pub fn cube_out(t: f32) -> f32 {
    let t = t - 1.0;
    1.0 + t * t * t
}

pub fn cube_in_out(t: f32) -> f32 {
    if t <= 0.5 {
        t * t * t * 4.0
    } else {
        let t = t - 1.0;
        1.0 + t * t * t * 4.0
    }
}

pub fn sine_in(t: f32) -> f32 {
    1.0 - (FRAC_PI_2 * t).cos()
}

pub fn sine_out(t: f32) -> f32 {
    (FRAC_PI_2 * t).sin()
}

pub fn sine_in_out(t: f32) -> f32 {
    0.5 - (PI * t).cos() / 2.0
}

pub fn circ_in(t: f32) -> f32 {
    1.0 - (1.0 - t * t).sqrt()
}

pub fn circ_out(t: f32) -> f32 {
    let t = t - 1.0;
    (1.0 - t * t).sqrt()
}

pub fn expo_in(t: f32) -> f32 {
    2f32.powf(10.0 * (t - 1.0))
}

pub fn expo_out(t: f32) -> f32 {
    1.0 - 2f32.powf(-10.0 * t)
}

pub fn back_in(t: f32) -> f32 {
    t * t * (2.70158 * t - 1.70158)
}

pub fn back_out(t: f32) -> f32 {
    let t = t - 1.0;
    1.0 + t * t * (2.70158 * t + 1.70158)
}

pub fn bounce_in(t: f32) -> f32 {
    1.0 - bounce_out(1.0 - t)
}

pub fn bounce_out(t: f32) -> f32 {
    if t < B1 {
        7.5625 * t * t
    } else if t < B2 {
        7.5625 * (t - B3) * (t - B3) + 0.75
    } else if t < B4 {
        7.5625 * (t - B5) * (t - B5) + 0.9375
    } else {
        7.5625 * (t - B6) * (t - B6) + 0.984375
    }
}
