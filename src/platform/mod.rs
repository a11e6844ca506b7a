//! Platform layer
//!
//! Frame pacing shared by every host:
//! - `FrameDriver`: turns display-refresh timestamps into simulation steps
//! - `CancelToken`: checked once per frame; unmount cancels it
//! - `DisplaySync`: where refresh timestamps come from
//!
//! The browser host lives in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_FRAME_DELTA_MS, MAX_SUBSTEPS};
use crate::renderer::Surface;
use crate::settings::StepMode;
use crate::sim::Game;

/// Shared cancellation flag for a frame loop
///
/// Clones observe the same flag. Single-threaded, like the loop itself.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Source of display-refresh timestamps (milliseconds, monotonic)
pub trait DisplaySync {
    /// Wait for the next refresh; `None` once the source has ended
    fn next_frame(&mut self) -> Option<f64>;
}

/// Synthetic refreshes at a fixed rate, without waiting
///
/// Drives headless runs and tests.
#[derive(Debug, Clone)]
pub struct ScriptedSync {
    period_ms: f64,
    next_ms: f64,
    remaining: Option<u64>,
}

impl ScriptedSync {
    /// `frames` refreshes at `hz`
    pub fn fixed_rate(hz: f64, frames: u64) -> Self {
        Self {
            period_ms: 1000.0 / hz,
            next_ms: 0.0,
            remaining: Some(frames),
        }
    }

    /// Refreshes at `hz` until the loop is cancelled
    pub fn endless(hz: f64) -> Self {
        Self {
            remaining: None,
            ..Self::fixed_rate(hz, 0)
        }
    }
}

impl DisplaySync for ScriptedSync {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let now = self.next_ms;
        self.next_ms += self.period_ms;
        Some(now)
    }
}

/// Real-time refreshes paced by sleeping on the monotonic clock
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct IntervalSync {
    start: std::time::Instant,
    period: std::time::Duration,
    next: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl IntervalSync {
    pub fn new(hz: f64) -> Self {
        let start = std::time::Instant::now();
        Self {
            start,
            period: std::time::Duration::from_secs_f64(1.0 / hz),
            next: start,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DisplaySync for IntervalSync {
    fn next_frame(&mut self) -> Option<f64> {
        let now = std::time::Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        // Skip missed refreshes rather than bursting to catch up
        self.next = (self.next + self.period).max(std::time::Instant::now());
        Some(self.start.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Why a frame loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    /// The display source stopped producing frames
    SourceEnded,
}

/// Steps and draws a game once per display refresh
pub struct FrameDriver<G: Game> {
    game: G,
    step_mode: StepMode,
    last_timestamp: Option<f64>,
    accumulator: f64,
    frames: u64,
}

impl<G: Game> FrameDriver<G> {
    pub fn new(game: G, step_mode: StepMode) -> Self {
        Self {
            game,
            step_mode,
            last_timestamp: None,
            accumulator: 0.0,
            frames: 0,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle one refresh: step the simulation, then redraw
    ///
    /// Returns the number of simulation steps taken.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> u32 {
        let wall = match self.last_timestamp {
            Some(last) if timestamp_ms.is_finite() => (timestamp_ms - last).max(0.0),
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(timestamp_ms);
        }
        self.game.elapsed(wall);
        let delta = wall.min(MAX_FRAME_DELTA_MS);

        let steps = match self.step_mode {
            StepMode::PerFrame => {
                self.game.step(delta);
                1
            }
            StepMode::Fixed { hz } => self.fixed_steps(delta, hz),
        };

        self.game.draw(surface);
        self.frames += 1;
        steps
    }

    fn fixed_steps(&mut self, delta: f64, hz: u32) -> u32 {
        let step_ms = 1000.0 / f64::from(hz.max(1));
        self.accumulator += delta;

        let mut substeps = 0;
        while self.accumulator >= step_ms && substeps < MAX_SUBSTEPS {
            self.game.step(step_ms);
            self.accumulator -= step_ms;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= step_ms {
            log::debug!("Dropping {:.1}ms of simulation backlog", self.accumulator);
            self.accumulator %= step_ms;
        }
        substeps
    }
}

/// Drive frames until the token is cancelled or the source ends
pub fn run_until_cancelled<G: Game>(
    driver: &mut FrameDriver<G>,
    sync: &mut dyn DisplaySync,
    surface: &mut dyn Surface,
    token: &CancelToken,
) -> LoopExit {
    loop {
        if token.is_cancelled() {
            log::info!(
                "{} loop cancelled after {} frames",
                driver.game().name(),
                driver.frames()
            );
            return LoopExit::Cancelled;
        }
        let Some(timestamp) = sync.next_frame() else {
            return LoopExit::SourceEnded;
        };
        driver.frame(timestamp, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyEvent, KeyResponse};
    use crate::renderer::CommandList;
    use glam::Vec2;

    /// Records the deltas it was stepped with
    #[derive(Default)]
    struct Probe {
        steps: Vec<f64>,
        wall: Vec<f64>,
        cancel_after: Option<(usize, CancelToken)>,
    }

    impl Game for Probe {
        fn name(&self) -> &'static str {
            "Probe"
        }

        fn arena_size(&self) -> Vec2 {
            Vec2::new(10.0, 10.0)
        }

        fn handle_key(&mut self, _event: KeyEvent) -> KeyResponse {
            KeyResponse::default()
        }

        fn focus_lost(&mut self) {}

        fn elapsed(&mut self, wall_ms: f64) {
            self.wall.push(wall_ms);
        }

        fn step(&mut self, delta_ms: f64) {
            self.steps.push(delta_ms);
            if let Some((after, token)) = &self.cancel_after {
                if self.steps.len() >= *after {
                    token.cancel();
                }
            }
        }

        fn draw(&self, _surface: &mut dyn Surface) {}
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_scripted_sync() {
        let mut sync = ScriptedSync::fixed_rate(50.0, 3);
        assert_eq!(sync.next_frame(), Some(0.0));
        assert_eq!(sync.next_frame(), Some(20.0));
        assert_eq!(sync.next_frame(), Some(40.0));
        assert_eq!(sync.next_frame(), None);
    }

    #[test]
    fn test_per_frame_steps_once_with_clamped_delta() {
        let mut driver = FrameDriver::new(Probe::default(), StepMode::PerFrame);
        let mut surface = CommandList::new(10.0, 10.0);
        assert_eq!(driver.frame(1000.0, &mut surface), 1);
        driver.frame(1016.0, &mut surface);
        driver.frame(5000.0, &mut surface);
        driver.frame(4000.0, &mut surface);
        assert_eq!(driver.game().steps, vec![0.0, 16.0, 100.0, 0.0]);
        assert_eq!(driver.game().wall, vec![0.0, 16.0, 3984.0, 0.0]);
        assert_eq!(driver.frames(), 4);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut driver = FrameDriver::new(Probe::default(), StepMode::Fixed { hz: 100 });
        let mut surface = CommandList::new(10.0, 10.0);
        driver.frame(0.0, &mut surface);
        assert_eq!(driver.frame(5.0, &mut surface), 0);
        assert_eq!(driver.frame(25.0, &mut surface), 2);
        assert_eq!(driver.game().steps, vec![10.0, 10.0]);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut driver = FrameDriver::new(Probe::default(), StepMode::Fixed { hz: 1000 });
        let mut surface = CommandList::new(10.0, 10.0);
        driver.frame(0.0, &mut surface);
        assert_eq!(driver.frame(100.0, &mut surface), MAX_SUBSTEPS);
        // Backlog dropped: a short frame does not burst again
        assert_eq!(driver.frame(100.5, &mut surface), 0);
    }

    #[test]
    fn test_run_until_source_ends() {
        let mut driver = FrameDriver::new(Probe::default(), StepMode::PerFrame);
        let mut sync = ScriptedSync::fixed_rate(60.0, 30);
        let mut surface = CommandList::new(10.0, 10.0);
        let exit = run_until_cancelled(&mut driver, &mut sync, &mut surface, &CancelToken::new());
        assert_eq!(exit, LoopExit::SourceEnded);
        assert_eq!(driver.frames(), 30);
    }

    #[test]
    fn test_cancel_stops_before_next_frame() {
        let token = CancelToken::new();
        let probe = Probe {
            cancel_after: Some((5, token.clone())),
            ..Probe::default()
        };
        let mut driver = FrameDriver::new(probe, StepMode::PerFrame);
        let mut sync = ScriptedSync::endless(60.0);
        let mut surface = CommandList::new(10.0, 10.0);

        let exit = run_until_cancelled(&mut driver, &mut sync, &mut surface, &token);
        assert_eq!(exit, LoopExit::Cancelled);
        assert_eq!(driver.game().steps.len(), 5);
    }
}
