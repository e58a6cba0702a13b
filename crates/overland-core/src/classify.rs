//! Occupancy and threat classification of destination cells.

use overland_protocol::{
    CellSnapshot, FeatureKnowledge, KnowledgeMap, MapSnapshot, MoveOutcome, PlaneGrid, PlayerId,
};

use crate::cost_table::MoveCostTable;
use crate::rules::CompiledRules;
use crate::MovementError;

/// Everything the traversal needs to know about entering one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellPlan {
    /// `None` is NO-ENTRY: overfull with allies or terrain the stack cannot enter.
    pub entry_cost: Option<i32>,
    pub outcome: MoveOutcome,
    /// Towers, cleared or not, link to the same (x, y) on the other plane.
    pub portal: bool,
}

impl CellPlan {
    pub fn is_enterable(&self) -> bool {
        self.entry_cost.is_some()
    }
}

pub struct Classifier<'a> {
    rules: &'a CompiledRules,
    costs: &'a MoveCostTable,
    player: PlayerId,
    stack_len: u32,
}

impl<'a> Classifier<'a> {
    pub fn new(
        rules: &'a CompiledRules,
        costs: &'a MoveCostTable,
        player: PlayerId,
        stack_len: usize,
    ) -> Self {
        Self {
            rules,
            costs,
            player,
            stack_len: u32::try_from(stack_len).unwrap_or(u32::MAX),
        }
    }

    /// Classifies one destination cell. Checks run in a fixed order: capacity,
    /// terrain, guarded features, then hostile occupants.
    pub fn classify_cell(
        &self,
        cell: &CellSnapshot,
        knowledge: FeatureKnowledge,
    ) -> Result<CellPlan, MovementError> {
        let feature = match cell.feature {
            Some(id) => Some(
                self.rules
                    .feature(id)
                    .ok_or(MovementError::UnknownFeature(id.raw))?,
            ),
            None => None,
        };
        let portal = feature.is_some_and(|f| f.is_tower());
        let entry_cost = self.costs.cost(cell.terrain)?;

        let allied = cell
            .units
            .filter(|u| u.owner == self.player)
            .map_or(0, |u| u.count);
        if allied.saturating_add(self.stack_len) > self.rules.movement.stack_capacity {
            return Ok(CellPlan {
                entry_cost: None,
                outcome: MoveOutcome::None,
                portal,
            });
        }

        let Some(entry_cost) = entry_cost else {
            return Ok(CellPlan {
                entry_cost: None,
                outcome: MoveOutcome::None,
                portal,
            });
        };

        let outcome = if feature.is_some_and(|f| f.guarded)
            && knowledge != FeatureKnowledge::KnownEmpty
        {
            MoveOutcome::Scout
        } else if self.is_hostile(cell) {
            MoveOutcome::Attack
        } else {
            MoveOutcome::None
        };

        Ok(CellPlan {
            entry_cost: Some(entry_cost),
            outcome,
            portal,
        })
    }

    fn is_hostile(&self, cell: &CellSnapshot) -> bool {
        let city = cell
            .city
            .is_some_and(|c| c.owner != self.player && c.population > 0);
        let units = cell
            .units
            .is_some_and(|u| u.owner != self.player && u.count > 0);
        city || units
    }

    /// Plans every cell of both planes, validating all ids the snapshot uses.
    pub fn plan_map(
        &self,
        snapshot: &MapSnapshot,
        knowledge: &KnowledgeMap,
    ) -> Result<PlaneGrid<CellPlan>, MovementError> {
        let cells = snapshot
            .cells
            .as_slice()
            .iter()
            .zip(knowledge.as_slice())
            .map(|(cell, known)| self.classify_cell(cell, *known))
            .collect::<Result<Vec<_>, _>>()?;

        PlaneGrid::from_raw(snapshot.width(), snapshot.height(), cells).ok_or(
            MovementError::SnapshotShape {
                expected: snapshot.cells.expected_len(),
                actual: snapshot.cells.len(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::aggregate_stack;
    use crate::rules::{load_rules, RulesSource};
    use overland_protocol::{CitySnapshot, EntityId, UnitPresence, UnitSnapshot};

    const ME: PlayerId = PlayerId(1);
    const THEM: PlayerId = PlayerId(2);

    struct Fixture {
        rules: CompiledRules,
        costs: MoveCostTable,
    }

    impl Fixture {
        fn new() -> Self {
            let rules = load_rules(RulesSource::Embedded).expect("rules load");
            let stack = [UnitSnapshot {
                id: EntityId::new(0, 0),
                type_id: rules.unit_type_id("spearmen").expect("unit type"),
                owner: ME,
                double_moves_left: 2,
            }];
            let caps = aggregate_stack(&rules, &stack, &[]).expect("aggregate");
            let costs = MoveCostTable::build(&rules, &caps);
            Self { rules, costs }
        }

        fn classifier(&self, stack_len: usize) -> Classifier<'_> {
            Classifier::new(&self.rules, &self.costs, ME, stack_len)
        }

        fn cell(&self, terrain: &str) -> CellSnapshot {
            CellSnapshot {
                terrain: Some(self.rules.terrain_id(terrain).expect("terrain")),
                ..CellSnapshot::default()
            }
        }
    }

    #[test]
    fn plain_grass_is_free_to_enter() {
        let fx = Fixture::new();
        let plan = fx
            .classifier(1)
            .classify_cell(&fx.cell("grassland"), FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(
            plan,
            CellPlan {
                entry_cost: Some(2),
                outcome: MoveOutcome::None,
                portal: false
            }
        );
    }

    #[test]
    fn overfull_allied_cell_is_no_entry_even_with_enemies_nearby() {
        let fx = Fixture::new();
        let mut cell = fx.cell("grassland");
        cell.units = Some(UnitPresence {
            owner: ME,
            count: 9,
        });
        cell.city = Some(CitySnapshot {
            owner: THEM,
            population: 4,
        });
        let plan = fx
            .classifier(1)
            .classify_cell(&cell, FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(plan.entry_cost, None);
        assert_eq!(plan.outcome, MoveOutcome::None);

        cell.units = Some(UnitPresence {
            owner: ME,
            count: 7,
        });
        let plan = fx
            .classifier(2)
            .classify_cell(&cell, FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(plan.outcome, MoveOutcome::Attack);
    }

    #[test]
    fn guarded_feature_scouts_until_known_empty() {
        let fx = Fixture::new();
        let mut cell = fx.cell("grassland");
        cell.feature = fx.rules.feature_id("tower_of_wizardry");
        let classifier = fx.classifier(1);

        for knowledge in [FeatureKnowledge::Unknown, FeatureKnowledge::KnownOccupied] {
            let plan = classifier.classify_cell(&cell, knowledge).expect("classify");
            assert_eq!(plan.outcome, MoveOutcome::Scout);
            assert!(plan.portal);
        }

        let plan = classifier
            .classify_cell(&cell, FeatureKnowledge::KnownEmpty)
            .expect("classify");
        assert_eq!(plan.outcome, MoveOutcome::None);
        assert!(plan.portal);
    }

    #[test]
    fn unguarded_features_never_scout() {
        let fx = Fixture::new();
        let mut cell = fx.cell("hills");
        cell.feature = fx.rules.feature_id("gold_ore");
        let plan = fx
            .classifier(1)
            .classify_cell(&cell, FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(plan.outcome, MoveOutcome::None);
        assert!(!plan.portal);
    }

    #[test]
    fn empty_enemy_outpost_is_not_an_attack() {
        let fx = Fixture::new();
        let mut cell = fx.cell("plains");
        cell.city = Some(CitySnapshot {
            owner: THEM,
            population: 0,
        });
        cell.units = Some(UnitPresence {
            owner: THEM,
            count: 0,
        });
        let plan = fx
            .classifier(1)
            .classify_cell(&cell, FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(plan.outcome, MoveOutcome::None);
    }

    #[test]
    fn water_blocks_a_land_stack_and_fog_does_not() {
        let fx = Fixture::new();
        let classifier = fx.classifier(1);
        let ocean = classifier
            .classify_cell(&fx.cell("ocean"), FeatureKnowledge::Unknown)
            .expect("classify");
        assert!(!ocean.is_enterable());

        let fog = classifier
            .classify_cell(&CellSnapshot::default(), FeatureKnowledge::Unknown)
            .expect("classify");
        assert_eq!(fog.entry_cost, Some(2));
    }

    #[test]
    fn unknown_feature_id_fails_the_plan() {
        let fx = Fixture::new();
        let grass = fx.rules.terrain_id("grassland").expect("terrain");
        let mut map = MapSnapshot::filled(3, 3, false, grass);
        let at = overland_protocol::MapCoord::new(overland_protocol::Plane::Myrror, 2, 2);
        if let Some(cell) = map.cell_mut(at) {
            cell.feature = Some(overland_protocol::MapFeatureId::new(77));
        }
        let knowledge = map.blank_knowledge();
        assert_eq!(
            fx.classifier(1).plan_map(&map, &knowledge),
            Err(MovementError::UnknownFeature(77))
        );
    }
}
