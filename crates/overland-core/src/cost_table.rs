use overland_protocol::TerrainId;

use crate::capability::{Capabilities, StackCapabilities};
use crate::rules::{Capability, CompiledRules, MovementSettings, TerrainCategory, TerrainType};
use crate::MovementError;

/// Per-terrain entry cost for one particular stack, in double movement.
///
/// `None` means nobody in the stack can enter that terrain, so the whole
/// stack is blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCostTable {
    entries: Vec<Option<i32>>,
    unexplored: i32,
}

impl MoveCostTable {
    pub fn build(rules: &CompiledRules, stack: &StackCapabilities) -> Self {
        let settings = &rules.movement;
        let entries: Vec<Option<i32>> = rules
            .terrains
            .iter()
            .map(|terrain| {
                let cost = stack
                    .units()
                    .iter()
                    .filter_map(|u| unit_entry_cost(settings, terrain, u.capabilities))
                    .max();
                tracing::trace!(terrain = %terrain.name, ?cost, "stack entry cost");
                cost
            })
            .collect();

        Self {
            entries,
            unexplored: settings.unexplored_cost,
        }
    }

    /// Entry cost of a terrain; `None` terrain is fog of war.
    pub fn cost(&self, terrain: Option<TerrainId>) -> Result<Option<i32>, MovementError> {
        match terrain {
            None => Ok(Some(self.unexplored)),
            Some(id) => self
                .entries
                .get(id.index())
                .copied()
                .ok_or(MovementError::UnknownTerrain(id.raw)),
        }
    }

    pub fn unexplored_cost(&self) -> i32 {
        self.unexplored
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerrainId, Option<i32>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, cost)| (TerrainId::new(i as u16), *cost))
    }
}

/// Cost for a single unit with `caps` to enter `terrain`.
///
/// Flying and non-corporeal units use their flat cost where it applies and
/// otherwise fall back to plain walking or swimming. Path finding and
/// mountaineering only discount units that use the plain entry rules.
pub fn unit_entry_cost(
    settings: &MovementSettings,
    terrain: &TerrainType,
    caps: Capabilities,
) -> Option<i32> {
    if terrain.impassable {
        return None;
    }
    let base = base_entry_cost(terrain, caps);

    if caps.is_effective_flyer() {
        return settings.flat_cost(Capability::Flying, terrain).or(base);
    }
    if caps.contains(Capabilities::NON_CORPOREAL) {
        return settings
            .flat_cost(Capability::NonCorporeal, terrain)
            .or(base);
    }

    let base = base?;
    let discounted = [
        (Capabilities::MOUNTAINEERING, Capability::Mountaineering),
        (Capabilities::PATH_FINDING, Capability::PathFinding),
    ]
    .into_iter()
    .filter(|(flag, _)| caps.contains(*flag))
    .filter_map(|(_, capability)| settings.flat_cost(capability, terrain))
    .min();

    Some(discounted.unwrap_or(base))
}

fn base_entry_cost(terrain: &TerrainType, caps: Capabilities) -> Option<i32> {
    match terrain.category {
        TerrainCategory::Land if caps.contains(Capabilities::WALKING) => Some(terrain.move_cost),
        TerrainCategory::Water if caps.contains(Capabilities::SWIMMING) => Some(terrain.move_cost),
        _ => None,
    }
}
