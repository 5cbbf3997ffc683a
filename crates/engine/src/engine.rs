use std::collections::VecDeque;
use std::time::{Duration, Instant};

use punk_common::Frame;
use punk_world::World;

use crate::clock::Clock;
use crate::config::{ConfigError, EngineConfig};
use crate::platform::{Headless, Platform};

/// Frames averaged by [`Engine::frame_rate`].
const FPS_WINDOW: usize = 10;

/// Wall time spent in each phase of the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timings {
    /// All updates run this frame, commits and world switches included.
    pub update: Duration,
    pub render: Duration,
    /// The whole frame.
    pub game: Duration,
}

/// Drives one world through update, commit, render and world switches.
pub struct Engine {
    /// Skip updates and rendering. Console and input are still polled.
    pub paused: bool,
    config: EngineConfig,
    world: World,
    next: Option<World>,
    previous: Option<World>,
    platform: Box<dyn Platform>,
    started: bool,
    last: Duration,
    debt: Duration,
    frame: Frame,
    last_render: Option<Duration>,
    frame_times: VecDeque<Duration>,
    timings: Timings,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_world(config, World::new())
    }

    pub fn with_world(config: EngineConfig, mut world: World) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame = Frame {
            elapsed: 0.0,
            fixed: config.fixed,
            width: config.width,
            height: config.height,
            tick: 0,
        };
        world.set_frame(frame);
        Ok(Self {
            paused: false,
            config,
            world,
            next: None,
            previous: None,
            platform: Box::new(Headless),
            started: false,
            last: Duration::ZERO,
            debt: Duration::ZERO,
            frame,
            last_render: None,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            timings: Timings::default(),
        })
    }

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Box::new(platform);
        self
    }

    pub fn set_platform(&mut self, platform: impl Platform + 'static) {
        self.platform = Box::new(platform);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The world waiting to become current at the end of the next update.
    pub fn next_world(&self) -> Option<&World> {
        self.next.as_ref()
    }

    /// Take the world that was current before the last switch.
    pub fn take_previous(&mut self) -> Option<World> {
        self.previous.take()
    }

    /// The context of the most recent tick.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Logical ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.frame.tick
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Frames per second averaged over the last few rendered frames.
    pub fn frame_rate(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.frame_times.len() as f32 / total.as_secs_f32()
    }

    /// Stage `world` to replace the current one once the next update has
    /// committed. Staging the current world again does nothing.
    pub fn set_world(&mut self, world: World) {
        if world.id() == self.world.id() {
            tracing::trace!(world = ?world.id(), "world already current");
            return;
        }
        tracing::debug!(world = ?world.id(), "world staged");
        self.next = Some(world);
    }

    /// Anchor the clock at `now` and make any staged world current.
    /// [`tick`](Engine::tick) calls this on its first run.
    pub fn start(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        self.last = now;
        if self.next.is_some() {
            self.check_world();
        }
        tracing::debug!(
            fixed = self.config.fixed,
            frame_rate = self.config.frame_rate,
            "engine started"
        );
    }

    /// Read `clock` and run one frame.
    pub fn step(&mut self, clock: &impl Clock) -> u32 {
        self.tick(clock.now())
    }

    /// Run one platform frame at time `now`. Returns how many logical
    /// ticks were run.
    pub fn tick(&mut self, now: Duration) -> u32 {
        if !self.started {
            self.start(now);
            return 0;
        }
        let _span = tracing::info_span!("engine_tick").entered();
        let frame_start = Instant::now();
        self.timings.update = Duration::ZERO;
        self.timings.render = Duration::ZERO;
        let ticks = if self.config.fixed {
            self.tick_fixed(now)
        } else {
            self.tick_variable(now)
        };
        self.timings.game = frame_start.elapsed();
        ticks
    }

    fn tick_variable(&mut self, now: Duration) -> u32 {
        let delta = now.saturating_sub(self.last);
        self.last = now;
        self.platform.update_console();
        let mut ticks = 0;
        if !self.paused {
            self.update(self.config.elapsed(delta));
            ticks = 1;
        }
        self.platform.update_input();
        if !self.paused {
            self.render(now);
        }
        ticks
    }

    fn tick_fixed(&mut self, now: Duration) -> u32 {
        self.debt += now.saturating_sub(self.last);
        self.last = now;
        let rate = self.config.rate();
        if self.debt < rate {
            return 0;
        }
        self.platform.update_console();
        let skip = self.config.skip();
        if self.debt > skip {
            tracing::trace!(debt = ?self.debt, "frame skip clamped");
            self.debt = skip;
        }
        let elapsed = self.config.elapsed(rate);
        let mut ticks = 0;
        while self.debt >= rate {
            self.debt -= rate;
            if !self.paused {
                self.update(elapsed);
                ticks += 1;
            }
            self.platform.update_input();
        }
        if !self.paused {
            self.render(now);
        }
        ticks
    }

    /// One logical tick: world tweens, world update, commit, then any staged
    /// world switch.
    fn update(&mut self, elapsed: f32) {
        let started = Instant::now();
        self.frame = Frame {
            elapsed,
            fixed: self.config.fixed,
            width: self.config.width,
            height: self.config.height,
            tick: self.frame.tick + 1,
        };
        self.world.set_frame(self.frame);
        if self.world.active {
            if !self.world.tweens.is_empty() {
                self.world.tweens.update_tweens(self.frame.step());
            }
            self.world.update(&self.frame);
        }
        self.world.update_lists();
        if self.next.is_some() {
            self.check_world();
        }
        self.timings.update += started.elapsed();
    }

    fn render(&mut self, now: Duration) {
        let started = Instant::now();
        self.platform.begin_frame();
        self.world.render();
        self.platform.end_frame();
        if let Some(last) = self.last_render {
            if self.frame_times.len() == FPS_WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(now.saturating_sub(last));
        }
        self.last_render = Some(now);
        self.timings.render += started.elapsed();
    }

    fn check_world(&mut self) {
        let Some(next) = self.next.take() else {
            return;
        };
        let _span = tracing::info_span!("world_switch").entered();
        self.world.end();
        self.world.update_lists();
        if self.world.tweens.auto_clear {
            self.world.tweens.clear_tweens();
        }
        let previous = std::mem::replace(&mut self.world, next);
        tracing::debug!(from = ?previous.id(), to = ?self.world.id(), "world switched");
        self.previous = Some(previous);
        self.world.set_frame(self.frame);
        self.world.update_lists();
        self.world.begin();
        self.world.update_lists();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("paused", &self.paused)
            .field("world", &self.world.id())
            .field("next", &self.next.as_ref().map(World::id))
            .field("tick", &self.frame.tick)
            .finish()
    }
}
