use overland_protocol::{Plane, PlayerId, UnitId};
use thiserror::Error;

/// Reasons an invocation is rejected. All of them are detected before the
/// traversal starts; a traversal that has started always completes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MovementError {
    #[error("unit stack is empty")]
    EmptyStack,
    #[error("origin ({x},{y}) on {plane:?} is outside the {width}x{height} map")]
    OriginOutOfBounds {
        plane: Plane,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("map data has {actual} cells, expected {expected}")]
    SnapshotShape { expected: usize, actual: usize },
    #[error("unit {unit:?} belongs to player {owner:?}, not the moving player {player:?}")]
    ForeignUnit {
        unit: UnitId,
        owner: PlayerId,
        player: PlayerId,
    },
    #[error("terrain id {0} is not in the rules database")]
    UnknownTerrain(u16),
    #[error("map feature id {0} is not in the rules database")]
    UnknownFeature(u16),
    #[error("unit type id {0} is not in the rules database")]
    UnknownUnitType(u16),
    #[error("skill id {0} is not in the rules database")]
    UnknownSkill(u16),
    #[error("spell id {0} is not in the rules database")]
    UnknownSpell(u16),
}

impl MovementError {
    /// Lookup failures that point at a corrupt or mismatched ruleset rather
    /// than a bad request.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            MovementError::UnknownTerrain(_)
                | MovementError::UnknownFeature(_)
                | MovementError::UnknownUnitType(_)
                | MovementError::UnknownSkill(_)
                | MovementError::UnknownSpell(_)
        )
    }
}
