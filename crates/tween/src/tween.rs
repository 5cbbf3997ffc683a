use punk_common::math;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress strictly between 0 and 1.
pub type Ease = fn(f32) -> f32;

/// Completion callback invoked after the completion policy has been applied.
pub type OnComplete = Box<dyn FnMut()>;

/// What a tween does once its elapsed time reaches its duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenMode {
    /// Stops and stays at the end value.
    #[default]
    Persist,
    /// Restarts from zero. The scale of the finishing tick reflects the
    /// overshoot past the duration.
    Looping,
    /// Stops and is detached from its tweener.
    OneShot,
}

/// Result of applying the completion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Finished {
    Keep,
    Detach,
}

/// A timed interpolation unit.
///
/// A tween only produces a normalized `scale` in [0, 1]; hosts read it (or use
/// [`Tween::lerp`] / [`Tween::color`]) to drive whatever value they animate.
pub struct Tween {
    /// Whether the tween advances when its tweener sweeps.
    pub active: bool,
    mode: TweenMode,
    ease: Option<Ease>,
    complete: Option<OnComplete>,
    t: f32,
    time: f32,
    target: f32,
    finish: bool,
}

impl Tween {
    /// Create an inactive tween lasting `duration` units (ticks under a fixed
    /// timestep, seconds otherwise).
    pub fn new(duration: f32, mode: TweenMode) -> Self {
        Self {
            active: false,
            mode,
            ease: None,
            complete: None,
            t: 0.0,
            time: 0.0,
            target: duration.max(0.0),
            finish: false,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn on_complete(mut self, complete: impl FnMut() + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    pub fn mode(&self) -> TweenMode {
        self.mode
    }

    pub fn duration(&self) -> f32 {
        self.target
    }

    pub fn elapsed(&self) -> f32 {
        self.time
    }

    /// True between reaching the duration and the tweener's finish pass.
    pub fn is_finish_pending(&self) -> bool {
        self.finish
    }

    /// Start, or restart if already running. A zero-length tween never activates.
    pub fn start(&mut self) {
        self.time = 0.0;
        self.t = 0.0;
        self.finish = false;
        self.active = self.target > 0.0;
    }

    /// Advance by `dt` and flag completion once the duration is reached.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.t = self.progress();
        if self.time >= self.target {
            self.t = 1.0;
            self.finish = true;
        }
    }

    /// Apply the completion policy, then run the callback.
    pub(crate) fn finish(&mut self) -> Finished {
        let outcome = match self.mode {
            TweenMode::Persist => {
                self.time = self.target;
                self.active = false;
                Finished::Keep
            }
            TweenMode::Looping => {
                self.time %= self.target;
                self.t = self.progress();
                self.time = 0.0;
                self.active = true;
                Finished::Keep
            }
            TweenMode::OneShot => {
                self.time = self.target;
                self.active = false;
                Finished::Detach
            }
        };
        self.finish = false;
        if let Some(complete) = self.complete.as_mut() {
            complete();
        }
        outcome
    }

    /// Normalized elapsed time, before easing.
    pub fn percent(&self) -> f32 {
        if self.target > 0.0 { self.time / self.target } else { 0.0 }
    }

    /// Jump to a normalized position. `scale` follows on the next update.
    pub fn set_percent(&mut self, percent: f32) {
        self.time = self.target * percent;
    }

    /// Current progress after easing.
    pub fn scale(&self) -> f32 {
        self.t
    }

    /// Interpolate between two numbers at the current scale.
    pub fn lerp(&self, from: f32, to: f32) -> f32 {
        math::lerp(from, to, self.t)
    }

    /// Blend two ARGB colors at the current scale.
    pub fn color(&self, from: u32, to: u32) -> u32 {
        math::color_lerp(from, to, self.t)
    }

    fn progress(&self) -> f32 {
        let t = self.percent();
        match self.ease {
            Some(ease) if t > 0.0 && t < 1.0 => ease(t),
            _ => t,
        }
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("active", &self.active)
            .field("mode", &self.mode)
            .field("time", &self.time)
            .field("target", &self.target)
            .field("scale", &self.t)
            .field("eased", &self.ease.is_some())
            .finish()
    }
}
