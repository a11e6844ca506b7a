//! Teams, players and formations

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type PlayerId = u32;

/// Player attributes (display only; the simulation does not read them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hp: u16,
    pub stamina: u16,
    pub energy: u16,
    pub attack: u16,
    pub pass: u16,
    pub block: u16,
    pub shoot: u16,
    pub catch: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub stats: PlayerStats,
}

/// The six positions of a team, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    LeftForward,
    RightForward,
    Midfielder,
    LeftDefender,
    RightDefender,
    Goalkeeper,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::LeftForward,
        Slot::RightForward,
        Slot::Midfielder,
        Slot::LeftDefender,
        Slot::RightDefender,
        Slot::Goalkeeper,
    ];

    /// Slots that move (everyone but the goalkeeper)
    pub const FIELD: [Slot; 5] = [
        Slot::LeftForward,
        Slot::RightForward,
        Slot::Midfielder,
        Slot::LeftDefender,
        Slot::RightDefender,
    ];

    pub fn index(&self) -> usize {
        match self {
            Slot::LeftForward => 0,
            Slot::RightForward => 1,
            Slot::Midfielder => 2,
            Slot::LeftDefender => 3,
            Slot::RightDefender => 4,
            Slot::Goalkeeper => 5,
        }
    }

    /// Short code shown in rosters
    pub fn code(&self) -> &'static str {
        match self {
            Slot::LeftForward => "LF",
            Slot::RightForward => "RF",
            Slot::Midfielder => "MF",
            Slot::LeftDefender => "LD",
            Slot::RightDefender => "RD",
            Slot::Goalkeeper => "GL",
        }
    }

    /// Dice-5 kick-off formation relative to the field center
    ///
    /// The away side lines up at the mirrored x, but each slot keeps its
    /// own column: B's left forward is nearer the center line than its
    /// right forward.
    pub fn formation_offset(&self, side: TeamSide) -> Vec2 {
        let (x, y) = match (side, self) {
            (TeamSide::A, Slot::LeftForward) => (-105.0, -70.0),
            (TeamSide::A, Slot::RightForward) => (-15.0, -70.0),
            (TeamSide::A, Slot::Midfielder) => (-60.0, 0.0),
            (TeamSide::A, Slot::LeftDefender) => (-105.0, 70.0),
            (TeamSide::A, Slot::RightDefender) => (-15.0, 70.0),
            (TeamSide::A, Slot::Goalkeeper) => (-235.0, 0.0),
            (TeamSide::B, Slot::LeftForward) => (15.0, -70.0),
            (TeamSide::B, Slot::RightForward) => (105.0, -70.0),
            (TeamSide::B, Slot::Midfielder) => (60.0, 0.0),
            (TeamSide::B, Slot::LeftDefender) => (15.0, 70.0),
            (TeamSide::B, Slot::RightDefender) => (105.0, 70.0),
            (TeamSide::B, Slot::Goalkeeper) => (235.0, 0.0),
        };
        Vec2::new(x, y)
    }
}

/// Which of the two teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    /// Attacks the right goal
    A,
    /// Attacks the left goal
    B,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::A, TeamSide::B];

    pub fn other(&self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TeamSide::A => 0,
            TeamSide::B => 1,
        }
    }

    pub fn attacks_right(&self) -> bool {
        *self == TeamSide::A
    }

    /// Heading of a player standing in formation
    pub fn facing(&self) -> f32 {
        if self.attacks_right() {
            0.0
        } else {
            std::f32::consts::PI
        }
    }
}

/// Mutable per-position state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    pub player_id: PlayerId,
    pub pos: Vec2,
    /// Radians: 0 = right, π/2 = down
    pub rotation: f32,
    pub has_ball: bool,
}

/// A team: six players bound one-to-one to the six slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    /// 0xRRGGBB
    pub color_primary: u32,
    pub color_secondary: u32,
    pub side: TeamSide,
    /// Indexed by `Slot::index`
    pub players: [Player; 6],
    /// Indexed by `Slot::index`
    pub slots: [SlotState; 6],
}

impl Team {
    fn build(
        id: u32,
        name: &str,
        colors: (u32, u32),
        side: TeamSide,
        roster: [(PlayerId, &str, [u16; 8]); 6],
    ) -> Self {
        let players = roster.map(|(id, name, s)| Player {
            id,
            name: name.to_string(),
            stats: PlayerStats {
                hp: s[0],
                stamina: s[1],
                energy: s[2],
                attack: s[3],
                pass: s[4],
                block: s[5],
                shoot: s[6],
                catch: s[7],
            },
        });
        let slots = std::array::from_fn(|i| SlotState {
            player_id: players[i].id,
            pos: Vec2::ZERO,
            rotation: side.facing(),
            has_ball: false,
        });
        Self {
            id,
            name: name.to_string(),
            color_primary: colors.0,
            color_secondary: colors.1,
            side,
            players,
            slots,
        }
    }

    /// Home side, attacking right
    pub fn besaid_aurochs() -> Self {
        Self::build(
            1,
            "Besaid Aurochs",
            (0xffca00, 0x000000),
            TeamSide::A,
            [
                (1, "Tidus", [132, 60, 10, 3, 3, 2, 10, 1]),
                (2, "Datto", [90, 60, 12, 2, 4, 2, 8, 1]),
                (3, "Letty", [95, 60, 7, 5, 10, 5, 4, 1]),
                (4, "Jassu", [100, 63, 7, 10, 7, 5, 1, 1]),
                (5, "Botta", [105, 60, 3, 10, 6, 5, 1, 1]),
                (6, "Keepa", [90, 54, 4, 2, 2, 4, 1, 5]),
            ],
        )
    }

    /// Away side, attacking left
    pub fn luca_goers() -> Self {
        Self::build(
            2,
            "Luca Goers",
            (0xf2a5e3, 0x808080),
            TeamSide::B,
            [
                (7, "Bickson", [140, 60, 12, 3, 5, 2, 12, 1]),
                (8, "Abus", [130, 60, 9, 3, 4, 1, 13, 1]),
                (9, "Graav", [207, 60, 9, 8, 13, 8, 8, 2]),
                (10, "Doram", [142, 60, 3, 9, 7, 5, 1, 1]),
                (11, "Balgerda", [141, 60, 5, 9, 9, 8, 1, 1]),
                (12, "Raudy", [142, 60, 4, 2, 2, 4, 1, 8]),
            ],
        )
    }

    pub fn slot(&self, slot: Slot) -> &SlotState {
        &self.slots[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }

    pub fn player(&self, slot: Slot) -> &Player {
        &self.players[slot.index()]
    }

    /// Slot held by a player of this team
    pub fn slot_of(&self, player_id: PlayerId) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.slot(*slot).player_id == player_id)
    }

    /// Line up in kick-off formation around `center`
    pub fn place_in_formation(&mut self, center: Vec2) {
        let side = self.side;
        for slot in Slot::ALL {
            let state = self.slot_mut(slot);
            state.pos = center + slot.formation_offset(side);
            state.rotation = side.facing();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formations() {
        let center = Vec2::new(375.0, 250.0);
        let mut a = Team::besaid_aurochs();
        let mut b = Team::luca_goers();
        a.place_in_formation(center);
        b.place_in_formation(center);

        assert_eq!(a.slot(Slot::LeftForward).pos, Vec2::new(270.0, 180.0));
        assert_eq!(a.slot(Slot::Midfielder).pos, Vec2::new(315.0, 250.0));
        assert_eq!(a.slot(Slot::Goalkeeper).pos, Vec2::new(140.0, 250.0));
        assert_eq!(b.slot(Slot::LeftForward).pos, Vec2::new(390.0, 180.0));
        assert_eq!(b.slot(Slot::RightForward).pos, Vec2::new(480.0, 180.0));
        assert_eq!(b.slot(Slot::LeftDefender).pos, Vec2::new(390.0, 320.0));
        assert_eq!(b.slot(Slot::RightDefender).pos, Vec2::new(480.0, 320.0));
        assert_eq!(b.slot(Slot::Midfielder).pos, Vec2::new(435.0, 250.0));
        assert_eq!(b.slot(Slot::Goalkeeper).pos, Vec2::new(610.0, 250.0));
        assert_eq!(b.slot(Slot::Midfielder).rotation, std::f32::consts::PI);
    }

    #[test]
    fn test_rosters_bind_slots() {
        let team = Team::luca_goers();
        assert_eq!(team.player(Slot::Midfielder).name, "Graav");
        assert_eq!(team.slot(Slot::Midfielder).player_id, 9);
        assert_eq!(team.slot_of(12), Some(Slot::Goalkeeper));
        assert_eq!(team.slot_of(1), None);
        assert_eq!(Slot::ALL.map(|s| s.code()).join(" "), "LF RF MF LD RD GL");
    }

    #[test]
    fn test_sides() {
        assert_eq!(TeamSide::A.other(), TeamSide::B);
        assert!(TeamSide::A.attacks_right());
        assert!(!TeamSide::B.attacks_right());
    }
}
