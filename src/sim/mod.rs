//! Simulation module
//!
//! All gameplay logic lives here. Worlds are plain values owned by a game
//! host; steppers take them by `&mut` and advance exactly one frame:
//! - Seeded RNG only
//! - Stable iteration order (row-major bricks, roster order players)
//! - No platform dependencies; drawing goes through `renderer::Surface`

pub mod blitzball;
pub mod breakout;
pub mod collision;

use glam::Vec2;

use crate::input::{Action, InputSampler, KeyEvent, KeyResponse};
use crate::renderer::{self, Surface};
use crate::settings::{BlitzballConfig, BreakoutConfig};
use blitzball::{BlitzballWorld, HoldTackle, MatchClock, MatchPhase, TackleResolver};
use breakout::{BreakoutEvent, BreakoutWorld};

/// A mountable game: receives key events, steps and draws
pub trait Game {
    fn name(&self) -> &'static str;

    /// Canvas size in pixels
    fn arena_size(&self) -> Vec2;

    /// Feed a key transition; the response tells the host whether to
    /// suppress the browser default
    fn handle_key(&mut self, event: KeyEvent) -> KeyResponse;

    /// Forget held keys (window blur)
    fn focus_lost(&mut self);

    /// Wall time since the previous refresh, unclamped
    ///
    /// Called once per refresh before any step. Match time counts here.
    fn elapsed(&mut self, _wall_ms: f64) {}

    /// Advance one simulation step; `delta_ms` is the wall time it covers
    fn step(&mut self, delta_ms: f64);

    /// Full redraw of the current state
    fn draw(&self, surface: &mut dyn Surface);
}

/// Breakout host: world, input and demo autopilot
#[derive(Debug, Clone)]
pub struct BreakoutGame {
    pub world: BreakoutWorld,
    input: InputSampler,
    demo: bool,
}

impl BreakoutGame {
    pub fn new(config: BreakoutConfig, seed: u64) -> Self {
        Self {
            world: BreakoutWorld::new(config, seed),
            input: InputSampler::new(),
            demo: false,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
        log::info!("Demo mode: {}", if demo { "on" } else { "off" });
    }
}

impl Game for BreakoutGame {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn arena_size(&self) -> Vec2 {
        Vec2::new(self.world.config.arena_width, self.world.config.arena_height)
    }

    fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let response = self.input.handle(event);
        match response.action {
            Some(Action::Primary) => {
                if let Some(BreakoutEvent::Launched { vel }) = self.world.primary_action() {
                    log::info!("Launched at {:.1}, {:.1}", vel.x, vel.y);
                }
            }
            Some(Action::ToggleDemo) => self.set_demo(!self.demo),
            None => {}
        }
        response
    }

    fn focus_lost(&mut self) {
        self.input.release_all();
    }

    fn step(&mut self, _delta_ms: f64) {
        let intents = if self.demo {
            if self.world.is_game_over() {
                self.world.restart();
            }
            self.world.launch();
            breakout::demo_intents(&self.world)
        } else {
            self.input.intents()
        };

        for event in breakout::tick(&mut self.world, intents) {
            log::debug!("{:?}", event);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        renderer::breakout::draw(&self.world, self.demo, surface);
    }
}

/// Blitzball host: world, match clock and tackle resolution
pub struct BlitzballGame {
    pub world: BlitzballWorld,
    clock: MatchClock,
    resolver: Box<dyn TackleResolver>,
    input: InputSampler,
}

impl BlitzballGame {
    pub fn new(config: BlitzballConfig, seed: u64) -> Self {
        Self::with_resolver(config, seed, Box::new(HoldTackle))
    }

    pub fn with_resolver(
        config: BlitzballConfig,
        seed: u64,
        resolver: Box<dyn TackleResolver>,
    ) -> Self {
        Self {
            world: BlitzballWorld::new(config, seed),
            clock: MatchClock::new(),
            resolver,
            input: InputSampler::new(),
        }
    }

    fn clock_stalled(&self) -> bool {
        self.world.state.phase == MatchPhase::Tackling && self.resolver.stalls_clock()
    }
}

impl Game for BlitzballGame {
    fn name(&self) -> &'static str {
        "Blitzball"
    }

    fn arena_size(&self) -> Vec2 {
        Vec2::new(self.world.config.arena_width, self.world.config.arena_height)
    }

    fn handle_key(&mut self, event: KeyEvent) -> KeyResponse {
        let response = self.input.handle(event);
        if response.action == Some(Action::Primary) && self.world.is_game_over() {
            self.world.restart();
            self.clock.reset();
        }
        response
    }

    fn focus_lost(&mut self) {
        self.input.release_all();
    }

    fn elapsed(&mut self, wall_ms: f64) {
        if self.clock_stalled() {
            return;
        }
        for _ in 0..self.clock.advance(wall_ms) {
            blitzball::clock_tick(&mut self.world);
        }
    }

    fn step(&mut self, _delta_ms: f64) {
        for event in blitzball::tick(&mut self.world, self.resolver.as_mut()) {
            log::debug!("{:?}", event);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        renderer::blitzball::draw(&self.world, surface);
    }
}
