//! Property-based tests for the traversal contract on random two-plane maps.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use overland_core::{
    calculate_overland_movement, load_rules, CompiledRules, MovementRequest, OverlandMovement,
    RulesSource,
};
use overland_protocol::{
    CellDistance, CitySnapshot, EntityId, FeatureKnowledge, KnowledgeMap, MapCoord, MapSnapshot,
    MoveOutcome, Plane, PlayerId, TerrainId, UnitPresence, UnitSnapshot,
};

const ME: PlayerId = PlayerId(0);
const ENEMY: PlayerId = PlayerId(1);
const MAX_W: u32 = 10;
const MAX_H: u32 = 8;
const UNITS: [&str; 8] = [
    "spearmen",
    "cavalry",
    "rangers",
    "dwarven_halberdiers",
    "trireme",
    "great_drake",
    "shadow_demons",
    "lizardmen",
];

#[derive(Debug)]
struct World {
    rules: CompiledRules,
    map: MapSnapshot,
    knowledge: KnowledgeMap,
    stack: Vec<UnitSnapshot>,
    origin: MapCoord,
}

impl World {
    fn run(&self) -> OverlandMovement {
        let request =
            MovementRequest::new(&self.map, &self.knowledge, &self.stack, ME, self.origin);
        calculate_overland_movement(&self.rules, &request).unwrap()
    }
}

fn build_world(
    width: u32,
    height: u32,
    wrap: bool,
    codes: &[(usize, u8)],
    units: &[usize],
    origin: (bool, u32, u32),
) -> World {
    let rules = load_rules(RulesSource::Embedded).unwrap();
    let terrain_count = rules.terrains.len();
    let mut map = MapSnapshot::filled(width, height, wrap, TerrainId::new(0));
    let mut knowledge = map.blank_knowledge();
    let guarded = rules.feature_id("tower_of_wizardry").unwrap();
    let cleared = rules.feature_id("cleared_tower").unwrap();

    let coords: Vec<MapCoord> = map.cells.iter().map(|(c, _)| c).collect();
    for (coord, (terrain, extra)) in coords.into_iter().zip(codes.iter().copied()) {
        let cell = map.cell_mut(coord).unwrap();
        cell.terrain = Some(TerrainId::new((terrain % terrain_count) as u16));
        match extra {
            0 | 1 => {
                let feature = if extra == 0 { cleared } else { guarded };
                for plane in Plane::ALL {
                    let at = MapCoord::new(plane, coord.x, coord.y);
                    map.cell_mut(at).unwrap().feature = Some(feature);
                }
            }
            2 => {
                cell.units = Some(UnitPresence {
                    owner: ENEMY,
                    count: 1 + (terrain % 3) as u32,
                })
            }
            3 | 4 => {
                cell.units = Some(UnitPresence {
                    owner: ME,
                    count: if extra == 3 { 9 } else { 8 },
                })
            }
            5 => cell.terrain = None,
            6 => {
                cell.city = Some(CitySnapshot {
                    owner: ENEMY,
                    population: (terrain % 2) as u32,
                })
            }
            7 => *knowledge.get_mut(coord).unwrap() = FeatureKnowledge::KnownEmpty,
            _ => {}
        }
    }

    let stack = units
        .iter()
        .enumerate()
        .map(|(i, pick)| {
            let type_id = rules.unit_type_id(UNITS[pick % UNITS.len()]).unwrap();
            UnitSnapshot {
                id: EntityId::new(i as u32, 0),
                type_id,
                owner: ME,
                double_moves_left: rules.unit_type(type_id).unwrap().double_moves,
            }
        })
        .collect();

    let plane = if origin.0 { Plane::Myrror } else { Plane::Arcanus };
    let origin = MapCoord::new(plane, origin.1 % width, origin.2 % height);

    World {
        rules,
        map,
        knowledge,
        stack,
        origin,
    }
}

fn world_strategy() -> impl Strategy<Value = World> {
    (
        3u32..=MAX_W,
        3u32..=MAX_H,
        any::<bool>(),
        prop::collection::vec((0usize..64, 0u8..16), (2 * MAX_W * MAX_H) as usize),
        prop::collection::vec(0usize..UNITS.len(), 1..4),
        (any::<bool>(), 0u32..MAX_W, 0u32..MAX_H),
    )
        .prop_map(|(w, h, wrap, codes, units, origin)| {
            build_world(w, h, wrap, &codes, &units, origin)
        })
}

/// The cell a settled cell was entered from.
fn predecessor(movement: &OverlandMovement, world: &World, coord: MapCoord) -> MapCoord {
    let dir = movement.direction_at(coord).unwrap();
    world.map.step(coord, dir.reverse()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_repeated_runs_are_identical(world in world_strategy()) {
        let a = world.run().legacy();
        let b = world.run().legacy();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_origin_is_settled_at_zero(world in world_strategy()) {
        let movement = world.run();
        prop_assert_eq!(movement.distance_at(world.origin), CellDistance::Settled(0));
        prop_assert_eq!(movement.direction_at(world.origin), None);
        prop_assert!(movement.reachable_at(world.origin));
    }

    #[test]
    fn prop_distance_never_decreases_along_a_path(world in world_strategy()) {
        let movement = world.run();
        for (coord, dist) in movement.distance().iter() {
            let Some(cost) = dist.cost() else {
                prop_assert_eq!(movement.direction_at(coord), None);
                continue;
            };
            if coord == world.origin {
                continue;
            }
            let from = predecessor(&movement, &world, coord);
            let from_cost = movement.distance_at(from).cost();
            prop_assert!(from_cost.is_some());
            prop_assert!(from_cost.unwrap() <= cost);
        }
    }

    #[test]
    fn prop_scout_and_attack_cells_are_dead_ends(world in world_strategy()) {
        let movement = world.run();
        for (coord, dist) in movement.distance().iter() {
            if dist.cost().is_none() || coord == world.origin {
                continue;
            }
            let from = predecessor(&movement, &world, coord);
            if from != world.origin {
                prop_assert_eq!(movement.outcome_at(from), MoveOutcome::None);
            }
        }
    }

    #[test]
    fn prop_full_allied_cells_are_impassable(world in world_strategy()) {
        let movement = world.run();
        let capacity = world.rules.movement.stack_capacity;
        let stack_len = world.stack.len() as u32;
        for (coord, cell) in world.map.cells.iter() {
            if coord == world.origin {
                continue;
            }
            let allied = cell.units.filter(|u| u.owner == ME).map_or(0, |u| u.count);
            if allied + stack_len > capacity {
                prop_assert_eq!(movement.distance_at(coord), CellDistance::Impassable);
            }
        }
    }

    #[test]
    fn prop_open_towers_bound_the_cross_plane_gap(world in world_strategy()) {
        let movement = world.run();
        for (coord, cell) in world.map.cells.iter() {
            let is_tower = cell
                .feature
                .and_then(|f| world.rules.feature(f))
                .is_some_and(|f| f.is_tower());
            if !is_tower {
                continue;
            }
            let Some(here) = movement.distance_at(coord).cost() else {
                continue;
            };
            let expands = coord == world.origin
                || movement.outcome_at(coord) == MoveOutcome::None;
            if !expands {
                continue;
            }
            let across = coord.across();
            if across == world.origin {
                continue;
            }
            if let CellDistance::Settled(there) = movement.distance_at(across) {
                let entry = movement
                    .cost_table()
                    .cost(world.map.cell(across).unwrap().terrain)
                    .unwrap()
                    .unwrap();
                prop_assert!(there <= here + entry);
            } else {
                prop_assert_eq!(movement.distance_at(across), CellDistance::Impassable);
            }
        }
    }
}
