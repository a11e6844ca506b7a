//! Blitzball: two AI teams of six on a circular field

pub mod clock;
pub mod roster;
pub mod state;
pub mod tick;

pub use clock::{MatchClock, clock_tick};
pub use roster::{Player, PlayerId, PlayerStats, Slot, SlotState, Team, TeamSide};
pub use state::{BlitzballEvent, BlitzballWorld, MatchPhase, MatchState, Tackle};
pub use tick::{HoldTackle, TackleOutcome, TackleResolver, tick};
