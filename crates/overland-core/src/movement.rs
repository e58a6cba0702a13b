use overland_protocol::{
    CellDistance, Direction, KnowledgeMap, LegacyMovementGrids, MaintainedSpell, MapCoord,
    MapSnapshot, MoveOutcome, PlaneGrid, PlayerId, UnitSnapshot, DIRECTION_NONE,
};

use crate::capability::{aggregate_stack, StackCapabilities};
use crate::classify::Classifier;
use crate::cost_table::MoveCostTable;
use crate::projection::project_reachability;
use crate::rules::CompiledRules;
use crate::traversal::traverse;
use crate::MovementError;

/// One stack's movement query against an immutable snapshot.
#[derive(Clone, Copy, Debug)]
pub struct MovementRequest<'a> {
    pub snapshot: &'a MapSnapshot,
    pub knowledge: &'a KnowledgeMap,
    pub stack: &'a [UnitSnapshot],
    pub spells: &'a [MaintainedSpell],
    pub player: PlayerId,
    pub origin: MapCoord,
    /// Double-movement budget for this turn; `None` uses the slowest unit's
    /// remaining movement.
    pub budget: Option<i32>,
}

impl<'a> MovementRequest<'a> {
    pub fn new(
        snapshot: &'a MapSnapshot,
        knowledge: &'a KnowledgeMap,
        stack: &'a [UnitSnapshot],
        player: PlayerId,
        origin: MapCoord,
    ) -> Self {
        Self {
            snapshot,
            knowledge,
            stack,
            spells: &[],
            player,
            origin,
            budget: None,
        }
    }

    pub fn with_spells(mut self, spells: &'a [MaintainedSpell]) -> Self {
        self.spells = spells;
        self
    }

    pub fn with_budget(mut self, budget: i32) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Every output grid of one invocation. Recomputed from scratch on each call.
#[derive(Clone, Debug)]
pub struct OverlandMovement {
    pub(crate) origin: MapCoord,
    pub(crate) budget: i32,
    pub(crate) wrap_horizontal: bool,
    pub(crate) capabilities: StackCapabilities,
    pub(crate) cost_table: MoveCostTable,
    pub(crate) distance: PlaneGrid<CellDistance>,
    pub(crate) direction: PlaneGrid<Option<Direction>>,
    pub(crate) can_move_in_one_turn: PlaneGrid<bool>,
    pub(crate) attack_outcome: PlaneGrid<MoveOutcome>,
}

impl OverlandMovement {
    pub fn origin(&self) -> MapCoord {
        self.origin
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    pub fn capabilities(&self) -> &StackCapabilities {
        &self.capabilities
    }

    pub fn cost_table(&self) -> &MoveCostTable {
        &self.cost_table
    }

    pub fn distance(&self) -> &PlaneGrid<CellDistance> {
        &self.distance
    }

    pub fn direction(&self) -> &PlaneGrid<Option<Direction>> {
        &self.direction
    }

    pub fn can_move_in_one_turn(&self) -> &PlaneGrid<bool> {
        &self.can_move_in_one_turn
    }

    pub fn attack_outcome(&self) -> &PlaneGrid<MoveOutcome> {
        &self.attack_outcome
    }

    pub fn distance_at(&self, coord: MapCoord) -> CellDistance {
        self.distance
            .get(coord)
            .copied()
            .unwrap_or(CellDistance::Unvisited)
    }

    pub fn direction_at(&self, coord: MapCoord) -> Option<Direction> {
        self.direction.get(coord).copied().flatten()
    }

    pub fn reachable_at(&self, coord: MapCoord) -> bool {
        self.can_move_in_one_turn.get(coord).copied().unwrap_or(false)
    }

    pub fn outcome_at(&self, coord: MapCoord) -> MoveOutcome {
        self.attack_outcome.get(coord).copied().unwrap_or_default()
    }

    /// Sentinel-encoded `[plane][y][x]` arrays for callers on the wire.
    pub fn legacy(&self) -> LegacyMovementGrids {
        LegacyMovementGrids {
            distance: self.distance.map(|d| d.to_legacy()).to_nested(),
            direction: self
                .direction
                .map(|d| d.map_or(DIRECTION_NONE, Direction::code))
                .to_nested(),
            can_move_in_one_turn: self.can_move_in_one_turn.to_nested(),
            attack_outcome: self.attack_outcome.to_nested(),
        }
    }
}

/// Computes distance, direction, reachability and outcome for every cell of
/// both planes. Rejections happen before the traversal starts.
pub fn calculate_overland_movement(
    rules: &CompiledRules,
    request: &MovementRequest<'_>,
) -> Result<OverlandMovement, MovementError> {
    let result = compute(rules, request);
    if let Err(err) = &result {
        tracing::warn!(
            origin = %request.origin,
            player = request.player.0,
            error = %err,
            "overland movement request rejected"
        );
    }
    result
}

fn compute(
    rules: &CompiledRules,
    request: &MovementRequest<'_>,
) -> Result<OverlandMovement, MovementError> {
    let snapshot = request.snapshot;
    let origin = request.origin;

    if request.stack.is_empty() {
        return Err(MovementError::EmptyStack);
    }
    if !snapshot.contains(origin) {
        return Err(MovementError::OriginOutOfBounds {
            plane: origin.plane,
            x: origin.x,
            y: origin.y,
            width: snapshot.width(),
            height: snapshot.height(),
        });
    }
    validate_shape(snapshot, request.knowledge)?;
    if let Some(unit) = request.stack.iter().find(|u| u.owner != request.player) {
        return Err(MovementError::ForeignUnit {
            unit: unit.id,
            owner: unit.owner,
            player: request.player,
        });
    }

    let capabilities = aggregate_stack(rules, request.stack, request.spells)?;
    let cost_table = MoveCostTable::build(rules, &capabilities);
    let classifier = Classifier::new(rules, &cost_table, request.player, capabilities.len());
    let plans = classifier.plan_map(snapshot, request.knowledge)?;

    let budget = request
        .budget
        .unwrap_or_else(|| capabilities.slowest_moves_left());
    tracing::debug!(
        origin = %origin,
        budget,
        stack = capabilities.len(),
        "overland traversal started"
    );

    let traversal = traverse(
        &plans,
        rules.movement.adjacency,
        snapshot.wrap_horizontal,
        origin,
    );
    tracing::debug!(
        settled = traversal.settled,
        pushes = traversal.pushes,
        "overland traversal finished"
    );

    let can_move_in_one_turn = project_reachability(&traversal.distance, budget);

    Ok(OverlandMovement {
        origin,
        budget,
        wrap_horizontal: snapshot.wrap_horizontal,
        capabilities,
        cost_table,
        distance: traversal.distance,
        direction: traversal.direction,
        can_move_in_one_turn,
        attack_outcome: traversal.outcome,
    })
}

fn validate_shape(snapshot: &MapSnapshot, knowledge: &KnowledgeMap) -> Result<(), MovementError> {
    let cells = &snapshot.cells;
    if !cells.is_well_formed() {
        return Err(MovementError::SnapshotShape {
            expected: cells.expected_len(),
            actual: cells.len(),
        });
    }
    if !knowledge.is_well_formed() || !cells.same_shape(knowledge) {
        return Err(MovementError::SnapshotShape {
            expected: cells.expected_len(),
            actual: knowledge.len(),
        });
    }
    Ok(())
}
