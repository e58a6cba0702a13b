use serde::{Deserialize, Serialize};

use crate::{
    Direction, MapCoord, MapFeatureId, PlaneGrid, PlayerId, SpellId, TerrainId, UnitId,
    UnitTypeId,
};

/// The caller's memory of the overland map for both planes.
///
/// Engine invocations borrow a snapshot immutably and never keep a reference
/// past the call, so one snapshot may be shared by concurrent invocations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub wrap_horizontal: bool,
    pub cells: PlaneGrid<CellSnapshot>,
}

/// What a player knows about one cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// `None` when the terrain has never been seen (fog of war).
    #[serde(default)]
    pub terrain: Option<TerrainId>,
    #[serde(default)]
    pub feature: Option<MapFeatureId>,
    #[serde(default)]
    pub city: Option<CitySnapshot>,
    #[serde(default)]
    pub units: Option<UnitPresence>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub owner: PlayerId,
    pub population: u32,
}

/// Units known to stand on a cell. A cell only ever holds one player's units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPresence {
    pub owner: PlayerId,
    pub count: u32,
}

/// Scouting knowledge for node, lair and tower cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKnowledge {
    #[default]
    Unknown,
    KnownEmpty,
    KnownOccupied,
}

/// Per-cell scouting knowledge, kept separately from the terrain snapshot.
pub type KnowledgeMap = PlaneGrid<FeatureKnowledge>;

impl MapSnapshot {
    /// A fully explored, empty map covered in one terrain type on both planes.
    pub fn filled(width: u32, height: u32, wrap_horizontal: bool, terrain: TerrainId) -> Self {
        let cell = CellSnapshot {
            terrain: Some(terrain),
            ..CellSnapshot::default()
        };
        Self {
            wrap_horizontal,
            cells: PlaneGrid::new(width, height, cell),
        }
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn contains(&self, coord: MapCoord) -> bool {
        self.cells.contains(coord)
    }

    pub fn index_of(&self, coord: MapCoord) -> Option<usize> {
        self.cells.index_of(coord)
    }

    pub fn coord_at(&self, index: usize) -> Option<MapCoord> {
        self.cells.coord_at(index)
    }

    pub fn cell(&self, coord: MapCoord) -> Option<&CellSnapshot> {
        self.cells.get(coord)
    }

    pub fn cell_mut(&mut self, coord: MapCoord) -> Option<&mut CellSnapshot> {
        self.cells.get_mut(coord)
    }

    /// A knowledge map of matching shape with nothing scouted yet.
    pub fn blank_knowledge(&self) -> KnowledgeMap {
        PlaneGrid::new(self.width(), self.height(), FeatureKnowledge::Unknown)
    }

    /// The cell reached by moving one step in `direction`, honouring the
    /// horizontal wrap. `PlaneShift` lands on the same (x, y) of the other plane.
    pub fn step(&self, coord: MapCoord, direction: Direction) -> Option<MapCoord> {
        self.cells.step(coord, direction, self.wrap_horizontal)
    }
}

/// One member of the moving stack, as the caller knows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub type_id: UnitTypeId,
    pub owner: PlayerId,
    /// Remaining movement this turn, in double-movement units.
    pub double_moves_left: i32,
}

/// A maintained unit enchantment currently in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintainedSpell {
    pub spell: SpellId,
    pub target: UnitId,
}
