//! Blitzball match state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::roster::{PlayerId, Slot, SlotState, Team, TeamSide};
use crate::settings::BlitzballConfig;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Players pursue and attack
    Normal,
    /// A tackle is pending resolution; nobody moves
    Tackling,
    /// Full time; only restart is accepted
    GameOver,
}

/// A detected tackle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tackle {
    pub carrier: PlayerId,
    pub tackler: PlayerId,
    /// Carrier position when the tackle happened
    pub at: Vec2,
}

/// Events produced by the stepper and the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlitzballEvent {
    Goal {
        scorer: TeamSide,
        score_a: u32,
        score_b: u32,
    },
    Tackle(Tackle),
    TackleResolved,
    HalfTime,
    FullTime {
        score_a: u32,
        score_b: u32,
    },
}

/// Scoreboard, clock and possession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// 1 or 2
    pub half: u8,
    /// Seconds left in the current half
    pub time_remaining: u32,
    pub score_a: u32,
    pub score_b: u32,
    /// Player holding the ball
    pub possession: Option<PlayerId>,
    pub phase: MatchPhase,
    /// Set once the first half has ended
    pub half_time: bool,
    pub last_tackle: Option<Tackle>,
}

impl MatchState {
    pub fn new(half_length_secs: u32) -> Self {
        Self {
            half: 1,
            time_remaining: half_length_secs,
            score_a: 0,
            score_b: 0,
            possession: None,
            phase: MatchPhase::Normal,
            half_time: false,
            last_tackle: None,
        }
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::A => self.score_a,
            TeamSide::B => self.score_b,
        }
    }

    /// `m:ss` of the time left in the half
    pub fn clock_label(&self) -> String {
        format!("{}:{:02}", self.time_remaining / 60, self.time_remaining % 60)
    }
}

/// Complete Blitzball state
#[derive(Debug, Clone)]
pub struct BlitzballWorld {
    pub config: BlitzballConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Indexed by `TeamSide::index`
    pub teams: [Team; 2],
    pub state: MatchState,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl BlitzballWorld {
    /// Kick off: both teams in formation, a random midfielder on the ball
    pub fn new(config: BlitzballConfig, seed: u64) -> Self {
        let mut world = Self {
            state: MatchState::new(config.half_length_secs),
            teams: [Team::besaid_aurochs(), Team::luca_goers()],
            rng: Pcg32::seed_from_u64(seed),
            seed,
            config,
            time_ticks: 0,
        };
        world.kick_off();
        world
    }

    fn kick_off(&mut self) {
        let center = self.config.field_center();
        for team in &mut self.teams {
            team.place_in_formation(center);
        }
        let side = if self.rng.random_bool(0.5) {
            TeamSide::A
        } else {
            TeamSide::B
        };
        self.hand_possession(side);
        log::info!(
            "Kick-off: {} start with the ball",
            self.team(side).name
        );
    }

    /// Start a new match with the same config; the RNG stream carries on
    pub fn restart(&mut self) {
        self.state = MatchState::new(self.config.half_length_secs);
        self.time_ticks = 0;
        for team in &mut self.teams {
            for slot in &mut team.slots {
                slot.has_ball = false;
            }
        }
        self.kick_off();
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        &mut self.teams[side.index()]
    }

    pub fn slot(&self, side: TeamSide, slot: Slot) -> &SlotState {
        self.team(side).slot(slot)
    }

    /// Side and slot of a player
    pub fn locate(&self, player_id: PlayerId) -> Option<(TeamSide, Slot)> {
        TeamSide::BOTH
            .into_iter()
            .find_map(|side| self.team(side).slot_of(player_id).map(|slot| (side, slot)))
    }

    /// `Name (CODE)` for logs, or the bare id of an unknown player
    pub fn describe_player(&self, player_id: PlayerId) -> String {
        match self.locate(player_id) {
            Some((side, slot)) => format!(
                "{} ({})",
                self.team(side).player(slot).name,
                slot.code()
            ),
            None => format!("player {}", player_id),
        }
    }

    /// Side and slot of the ball carrier
    pub fn carrier(&self) -> Option<(TeamSide, Slot)> {
        self.state.possession.and_then(|id| self.locate(id))
    }

    /// Carrier position, or the field center when nobody has the ball
    pub fn carrier_position(&self) -> Vec2 {
        match self.carrier() {
            Some((side, slot)) => self.slot(side, slot).pos,
            None => self.config.field_center(),
        }
    }

    /// Give the ball to one player, taking it from everyone else
    pub fn give_ball_to(&mut self, side: TeamSide, slot: Slot) {
        for team in &mut self.teams {
            for state in &mut team.slots {
                state.has_ball = false;
            }
        }
        let state = self.team_mut(side).slot_mut(slot);
        state.has_ball = true;
        self.state.possession = Some(state.player_id);
    }

    /// Restart play from a team's midfielder
    pub fn hand_possession(&mut self, side: TeamSide) {
        self.give_ball_to(side, Slot::Midfielder);
    }

    /// Number of slots flagged as holding the ball
    pub fn ball_holders(&self) -> usize {
        self.teams
            .iter()
            .flat_map(|team| team.slots.iter())
            .filter(|slot| slot.has_ball)
            .count()
    }

    /// Goal target of the attacking side
    pub fn goal_target(&self, side: TeamSide) -> Vec2 {
        let y = self.config.arena_height / 2.0;
        if side.attacks_right() {
            Vec2::new(self.config.arena_width - self.config.goal_target_inset, y)
        } else {
            Vec2::new(self.config.goal_target_inset, y)
        }
    }

    /// Whether `x` is past the goal line the side attacks
    pub fn crosses_goal_line(&self, side: TeamSide, x: f32) -> bool {
        if side.attacks_right() {
            x >= self.config.arena_width - self.config.goal_line_inset
        } else {
            x <= self.config.goal_line_inset
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == MatchPhase::GameOver
    }
}
