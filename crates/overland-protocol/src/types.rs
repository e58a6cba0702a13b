use serde::{Deserialize, Serialize};

use crate::MapCoord;

/// Legacy sentinel for a cell that was never reached.
pub const DISTANCE_UNREACHED: i32 = -1;
/// Legacy sentinel for a cell the stack may not enter at all.
pub const DISTANCE_IMPASSABLE: i32 = -2;
/// Legacy direction code for "no direction" (the origin, or never settled).
pub const DIRECTION_NONE: u8 = 0;

/// Final state of one cell after a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "cost")]
pub enum CellDistance {
    Unvisited,
    Impassable,
    /// Minimum cumulative double-movement cost from the origin.
    Settled(i32),
}

impl CellDistance {
    pub const fn to_legacy(self) -> i32 {
        match self {
            CellDistance::Unvisited => DISTANCE_UNREACHED,
            CellDistance::Impassable => DISTANCE_IMPASSABLE,
            CellDistance::Settled(cost) => cost,
        }
    }

    pub const fn from_legacy(value: i32) -> Option<CellDistance> {
        match value {
            DISTANCE_UNREACHED => Some(CellDistance::Unvisited),
            DISTANCE_IMPASSABLE => Some(CellDistance::Impassable),
            v if v >= 0 => Some(CellDistance::Settled(v)),
            _ => None,
        }
    }

    pub const fn cost(self) -> Option<i32> {
        match self {
            CellDistance::Settled(cost) => Some(cost),
            _ => None,
        }
    }
}

/// What happens if the stack moves onto a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveOutcome {
    #[default]
    None,
    /// Unscouted or guarded node, lair or tower: entering starts a scouting fight.
    Scout,
    /// Hostile units or a populated hostile city: entering starts combat.
    Attack,
}

impl MoveOutcome {
    /// Scout and attack cells can be entered but never moved through.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, MoveOutcome::None)
    }
}

/// The sentinel-encoded form of one invocation's output, indexed `[plane][y][x]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMovementGrids {
    pub distance: Vec<Vec<Vec<i32>>>,
    pub direction: Vec<Vec<Vec<u8>>>,
    pub can_move_in_one_turn: Vec<Vec<Vec<bool>>>,
    pub attack_outcome: Vec<Vec<Vec<MoveOutcome>>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MovementStopReason {
    /// The path ends on a cell that triggers scouting.
    Scout { at: MapCoord },
    /// The path ends on a cell that triggers combat.
    Attack { at: MapCoord },
    /// The budget runs out before the destination.
    MovesExhausted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPreview {
    pub full_path: Vec<MapCoord>,
    pub this_turn_path: Vec<MapCoord>,
    pub stop_at: MapCoord,
    #[serde(default)]
    pub stop_reason: Option<MovementStopReason>,
}
