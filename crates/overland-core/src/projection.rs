use overland_protocol::{CellDistance, PlaneGrid};

/// Marks every settled cell whose cost fits in `budget` double-movement.
/// A negative budget behaves like zero: only the origin is reachable.
pub fn project_reachability(distance: &PlaneGrid<CellDistance>, budget: i32) -> PlaneGrid<bool> {
    let budget = budget.max(0);
    distance.map(|d| d.cost().is_some_and(|cost| cost <= budget))
}
