//! Dijkstra over both planes, with tower portals as extra edges.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use overland_protocol::{Adjacency, CellDistance, Direction, MapCoord, MoveOutcome, PlaneGrid};

use crate::classify::CellPlan;

#[derive(Debug, Clone, Copy)]
struct FrontierNode {
    cost: i32,
    seq: u64,
    index: usize,
}

impl FrontierNode {
    fn key(&self) -> (i32, u64) {
        (self.cost, self.seq)
    }
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Raw traversal result, before projection against a budget.
#[derive(Debug, Clone)]
pub struct Traversal {
    pub distance: PlaneGrid<CellDistance>,
    pub direction: PlaneGrid<Option<Direction>>,
    pub outcome: PlaneGrid<MoveOutcome>,
    pub settled: usize,
    pub pushes: usize,
}

/// Settles every cell reachable from `origin` in non-decreasing cost order.
///
/// Scout and attack cells are settled but never expanded. The origin is
/// always settled at zero and always expanded, whatever its own plan says.
/// An origin outside `plans` yields a traversal with nothing settled.
pub fn traverse(
    plans: &PlaneGrid<CellPlan>,
    adjacency: Adjacency,
    wrap_horizontal: bool,
    origin: MapCoord,
) -> Traversal {
    let width = plans.width();
    let height = plans.height();

    let mut distance = plans.map(|plan| {
        if plan.is_enterable() {
            CellDistance::Unvisited
        } else {
            CellDistance::Impassable
        }
    });
    let mut direction: PlaneGrid<Option<Direction>> = PlaneGrid::new(width, height, None);
    let mut outcome = PlaneGrid::new(width, height, MoveOutcome::None);
    let mut settled = 0usize;
    let mut pushes = 0usize;

    let Some(start) = plans.index_of(origin) else {
        return Traversal {
            distance,
            direction,
            outcome,
            settled,
            pushes,
        };
    };

    let cell_plans = plans.as_slice();
    let mut best = vec![i32::MAX; cell_plans.len()];
    let mut done = vec![false; cell_plans.len()];
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    best[start] = 0;
    frontier.push(FrontierNode {
        cost: 0,
        seq,
        index: start,
    });
    seq += 1;
    pushes += 1;

    while let Some(node) = frontier.pop() {
        if done[node.index] || node.cost != best[node.index] {
            continue;
        }
        done[node.index] = true;
        settled += 1;

        let plan = cell_plans[node.index];
        let is_origin = node.index == start;
        let cell_outcome = if is_origin {
            MoveOutcome::None
        } else {
            plan.outcome
        };
        distance.as_mut_slice()[node.index] = CellDistance::Settled(node.cost);
        outcome.as_mut_slice()[node.index] = cell_outcome;

        if cell_outcome.is_terminal() {
            continue;
        }

        let Some(coord) = plans.coord_at(node.index) else {
            continue;
        };
        let portal = plan.portal.then_some(Direction::PlaneShift);
        let edges = adjacency.directions().iter().copied().chain(portal);

        for dir in edges {
            let Some(next) = plans
                .step(coord, dir, wrap_horizontal)
                .and_then(|c| plans.index_of(c))
            else {
                continue;
            };
            if done[next] {
                continue;
            }
            let Some(entry) = cell_plans[next].entry_cost else {
                continue;
            };
            let candidate = node.cost.saturating_add(entry);
            if candidate < best[next] {
                best[next] = candidate;
                direction.as_mut_slice()[next] = Some(dir);
                frontier.push(FrontierNode {
                    cost: candidate,
                    seq,
                    index: next,
                });
                seq += 1;
                pushes += 1;
            }
        }
    }

    // Tentative directions on cells that never settled are meaningless.
    for (dir, dist) in direction
        .as_mut_slice()
        .iter_mut()
        .zip(distance.as_slice())
    {
        if dist.cost().is_none() {
            *dir = None;
        }
    }
    if let Some(dir) = direction.as_mut_slice().get_mut(start) {
        *dir = None;
    }

    Traversal {
        distance,
        direction,
        outcome,
        settled,
        pushes,
    }
}
