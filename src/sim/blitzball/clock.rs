//! Match clock
//!
//! Runs at one tick per second of wall time, independent of the frame
//! rate. The host feeds it frame deltas and applies each whole second with
//! [`clock_tick`].

use super::roster::TeamSide;
use super::state::{BlitzballEvent, BlitzballWorld, MatchPhase};

const MS_PER_SECOND: f64 = 1000.0;

/// Turns frame deltas into whole elapsed seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchClock {
    accumulated_ms: f64,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add elapsed time; returns how many whole seconds completed
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0;
        }
        self.accumulated_ms += delta_ms;
        let seconds = (self.accumulated_ms / MS_PER_SECOND).floor();
        self.accumulated_ms -= seconds * MS_PER_SECOND;
        seconds as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }
}

/// Apply one second of match time
///
/// The half ends on the second after the display reaches 0:00. The second
/// half restarts the clock and gives the ball to the midfielder of the
/// team that did not have it; the end of the second half ends the match.
pub fn clock_tick(world: &mut BlitzballWorld) -> Option<BlitzballEvent> {
    let state = &mut world.state;
    if state.phase == MatchPhase::GameOver {
        return None;
    }

    if state.time_remaining > 0 {
        state.time_remaining -= 1;
        return None;
    }

    if state.half == 1 {
        state.half = 2;
        state.half_time = true;
        state.time_remaining = world.config.half_length_secs;
        state.phase = MatchPhase::Normal;
        state.last_tackle = None;

        let had_ball = world.carrier().map_or(TeamSide::A, |(side, _)| side);
        world.hand_possession(had_ball.other());
        log::info!(
            "Half time: {} - {}, {} kick off",
            world.state.score_a,
            world.state.score_b,
            world.team(had_ball.other()).name
        );
        Some(BlitzballEvent::HalfTime)
    } else {
        state.phase = MatchPhase::GameOver;
        log::info!("Full time: {} - {}", state.score_a, state.score_b);
        Some(BlitzballEvent::FullTime {
            score_a: state.score_a,
            score_b: state.score_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BlitzballConfig;
    use crate::sim::blitzball::roster::Slot;

    #[test]
    fn test_clock_accumulates_whole_seconds() {
        let mut clock = MatchClock::new();
        assert_eq!(clock.advance(400.0), 0);
        assert_eq!(clock.advance(400.0), 0);
        assert_eq!(clock.advance(400.0), 1);
        assert_eq!(clock.advance(2500.0), 2);
        assert_eq!(clock.advance(300.0), 1);
        assert_eq!(clock.advance(-5.0), 0);
        assert_eq!(clock.advance(f64::NAN), 0);
    }

    #[test]
    fn test_countdown() {
        let mut world = BlitzballWorld::new(BlitzballConfig::default(), 4);
        for _ in 0..10 {
            assert!(clock_tick(&mut world).is_none());
        }
        assert_eq!(world.state.time_remaining, 290);
    }

    #[test]
    fn test_half_time_one_second_after_zero() {
        let mut world = BlitzballWorld::new(BlitzballConfig::default(), 4);
        world.give_ball_to(TeamSide::B, Slot::RightForward);
        world.state.time_remaining = 1;

        assert!(clock_tick(&mut world).is_none());
        assert_eq!(world.state.time_remaining, 0);
        assert_eq!(world.state.half, 1);

        assert_eq!(clock_tick(&mut world), Some(BlitzballEvent::HalfTime));
        assert_eq!(world.state.half, 2);
        assert!(world.state.half_time);
        assert_eq!(world.state.time_remaining, 300);
        assert_eq!(world.carrier(), Some((TeamSide::A, Slot::Midfielder)));
        assert_eq!(world.ball_holders(), 1);
    }

    #[test]
    fn test_half_time_clears_pending_tackle() {
        let mut world = BlitzballWorld::new(BlitzballConfig::default(), 4);
        world.state.time_remaining = 0;
        world.state.phase = MatchPhase::Tackling;

        clock_tick(&mut world);
        assert_eq!(world.state.phase, MatchPhase::Normal);
        assert!(world.state.last_tackle.is_none());
    }

    #[test]
    fn test_full_time() {
        let mut world = BlitzballWorld::new(BlitzballConfig::default(), 4);
        world.state.half = 2;
        world.state.time_remaining = 0;
        world.state.score_a = 2;
        world.state.score_b = 1;

        assert_eq!(
            clock_tick(&mut world),
            Some(BlitzballEvent::FullTime {
                score_a: 2,
                score_b: 1
            })
        );
        assert!(world.is_game_over());
        assert!(clock_tick(&mut world).is_none());
        assert_eq!(world.state.time_remaining, 0);
    }

    #[test]
    fn test_whole_match_length() {
        let mut world = BlitzballWorld::new(BlitzballConfig::default(), 4);
        let mut seconds = 0;
        while !world.is_game_over() {
            clock_tick(&mut world);
            seconds += 1;
        }
        // Two halves of 300s plus the expiry second of each
        assert_eq!(seconds, 602);
    }
}
