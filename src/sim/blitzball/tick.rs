//! Blitzball frame stepper
//!
//! Each frame the carrier's team runs at the opposing goal while the other
//! team chases the carrier. Goalkeepers hold their line and never move.

use glam::Vec2;

use super::roster::{Slot, TeamSide};
use super::state::{BlitzballEvent, BlitzballWorld, MatchPhase, Tackle};
use crate::sim::collision::step_toward;

/// What to do with a pending tackle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TackleOutcome {
    /// Keep the match frozen
    Hold,
    /// Back to open play; possession unchanged
    Resume,
}

/// Decides how a tackle plays out
pub trait TackleResolver {
    /// Called once per frame while a tackle is pending
    fn resolve(&mut self, world: &BlitzballWorld, tackle: &Tackle) -> TackleOutcome;

    /// Whether the match clock stops while a tackle is pending
    fn stalls_clock(&self) -> bool {
        false
    }
}

/// Freezes play at the first tackle; the clock keeps running
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldTackle;

impl TackleResolver for HoldTackle {
    fn resolve(&mut self, _world: &BlitzballWorld, _tackle: &Tackle) -> TackleOutcome {
        TackleOutcome::Hold
    }
}

/// Advance the match by one frame
pub fn tick(world: &mut BlitzballWorld, resolver: &mut dyn TackleResolver) -> Vec<BlitzballEvent> {
    let mut events = Vec::new();

    match world.state.phase {
        MatchPhase::GameOver => return events,
        MatchPhase::Tackling => {
            world.time_ticks += 1;
            if let Some(tackle) = world.state.last_tackle {
                if resolver.resolve(world, &tackle) == TackleOutcome::Resume {
                    world.state.phase = MatchPhase::Normal;
                    events.push(BlitzballEvent::TackleResolved);
                    log::debug!("Tackle on player {} resolved", tackle.carrier);
                }
            } else {
                world.state.phase = MatchPhase::Normal;
            }
            return events;
        }
        MatchPhase::Normal => {}
    }

    world.time_ticks += 1;

    let carrier = world.carrier();
    let carrier_pos = world.carrier_position();
    let carrier_reached = move_players(world, carrier, carrier_pos);

    // Goal: judged on where the carrier's step landed, before the field clamp
    if let Some((side, slot)) = carrier {
        let x = carrier_reached.unwrap_or(world.slot(side, slot).pos).x;
        if world.crosses_goal_line(side, x) {
            match side {
                TeamSide::A => world.state.score_a += 1,
                TeamSide::B => world.state.score_b += 1,
            }
            world.hand_possession(side.other());
            log::info!(
                "Goal for {}: {} - {}",
                world.team(side).name,
                world.state.score_a,
                world.state.score_b
            );
            events.push(BlitzballEvent::Goal {
                scorer: side,
                score_a: world.state.score_a,
                score_b: world.state.score_b,
            });
        }
    }

    if let Some(tackle) = detect_tackle(world) {
        world.state.phase = MatchPhase::Tackling;
        world.state.last_tackle = Some(tackle);
        log::info!(
            "Tackle: {} on {}",
            world.describe_player(tackle.tackler),
            world.describe_player(tackle.carrier)
        );
        events.push(BlitzballEvent::Tackle(tackle));
    }

    events
}

/// Step every field player toward its target; returns the carrier's
/// unclamped landing point if the carrier moved
fn move_players(
    world: &mut BlitzballWorld,
    carrier: Option<(TeamSide, Slot)>,
    carrier_pos: Vec2,
) -> Option<Vec2> {
    let config = &world.config;
    let (speed, arrive, center, radius) = (
        config.player_speed,
        config.arrive_radius,
        config.field_center(),
        config.field_radius,
    );
    let mut carrier_reached = None;

    for side in TeamSide::BOTH {
        let attacking = carrier.is_some_and(|(s, _)| s == side);
        let target = if attacking {
            world.goal_target(side)
        } else {
            carrier_pos
        };

        let team = world.team_mut(side);
        for slot in Slot::FIELD {
            let state = team.slot_mut(slot);
            let Some(step) = step_toward(state.pos, target, speed, arrive, center, radius) else {
                continue;
            };
            state.pos = step.clamped;
            state.rotation = step.heading.y.atan2(step.heading.x);
            if carrier == Some((side, slot)) {
                carrier_reached = Some(step.reached);
            }
        }
    }

    carrier_reached
}

/// First player, in roster order, strictly within tackle range of the
/// carrier. Teammates and goalkeepers count.
fn detect_tackle(world: &BlitzballWorld) -> Option<Tackle> {
    let (carrier_side, carrier_slot) = world.carrier()?;
    let carrier = world.slot(carrier_side, carrier_slot);
    let range = world.config.tackle_distance();

    TeamSide::BOTH.into_iter().find_map(|side| {
        Slot::ALL.into_iter().find_map(|slot| {
            if (side, slot) == (carrier_side, carrier_slot) {
                return None;
            }
            let other = world.slot(side, slot);
            (other.pos.distance(carrier.pos) < range).then_some(Tackle {
                carrier: carrier.player_id,
                tackler: other.player_id,
                at: carrier.pos,
            })
        })
    })
}
