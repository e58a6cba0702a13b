//! Scenario files: a small map described with rules data ids.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use overland_core::CompiledRules;
use overland_protocol::{
    CitySnapshot, EntityId, FeatureKnowledge, KnowledgeMap, MaintainedSpell, MapCoord,
    MapSnapshot, PlayerId, UnitPresence, UnitSnapshot,
};

#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub wrap_horizontal: bool,
    pub default_terrain: String,
    pub player: u8,
    #[serde(default)]
    pub budget: Option<i32>,
    pub origin: MapCoord,
    pub stack: Vec<StackEntry>,
    #[serde(default)]
    pub spells: Vec<SpellEntry>,
    #[serde(default)]
    pub cells: Vec<CellOverride>,
}

#[derive(Debug, Deserialize)]
pub struct StackEntry {
    pub unit: String,
    /// Remaining double movement; defaults to the unit type's full allowance.
    #[serde(default)]
    pub moves_left: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SpellEntry {
    pub spell: String,
    /// Index into `stack`.
    pub target: usize,
}

#[derive(Debug, Deserialize)]
pub struct CellOverride {
    pub at: MapCoord,
    /// A terrain data id, or `unexplored` for fog of war.
    #[serde(default)]
    pub terrain: Option<String>,
    #[serde(default)]
    pub feature: Option<String>,
    #[serde(default)]
    pub knowledge: Option<FeatureKnowledge>,
    #[serde(default)]
    pub city: Option<CitySnapshot>,
    #[serde(default)]
    pub units: Option<UnitPresence>,
}

/// A scenario with every data id resolved against a ruleset.
pub struct Scenario {
    pub map: MapSnapshot,
    pub knowledge: KnowledgeMap,
    pub stack: Vec<UnitSnapshot>,
    pub spells: Vec<MaintainedSpell>,
    pub player: PlayerId,
    pub origin: MapCoord,
    pub budget: Option<i32>,
}

pub fn load_scenario(path: &Path, rules: &CompiledRules) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let file: ScenarioFile = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    resolve(file, rules)
}

pub fn resolve(file: ScenarioFile, rules: &CompiledRules) -> Result<Scenario> {
    let player = PlayerId(file.player);
    let default_terrain = rules
        .terrain_id(&file.default_terrain)
        .ok_or_else(|| anyhow!("unknown terrain `{}`", file.default_terrain))?;

    let mut map = MapSnapshot::filled(file.width, file.height, file.wrap_horizontal, default_terrain);
    let mut knowledge = map.blank_knowledge();

    for over in &file.cells {
        let cell = map
            .cell_mut(over.at)
            .ok_or_else(|| anyhow!("cell override {} is outside the map", over.at))?;
        match over.terrain.as_deref() {
            None => {}
            Some("unexplored") => cell.terrain = None,
            Some(id) => {
                cell.terrain = Some(
                    rules
                        .terrain_id(id)
                        .ok_or_else(|| anyhow!("unknown terrain `{id}`"))?,
                )
            }
        }
        if let Some(id) = &over.feature {
            cell.feature = Some(
                rules
                    .feature_id(id)
                    .ok_or_else(|| anyhow!("unknown map feature `{id}`"))?,
            );
        }
        if over.city.is_some() {
            cell.city = over.city;
        }
        if over.units.is_some() {
            cell.units = over.units;
        }
        if let Some(known) = over.knowledge {
            if let Some(slot) = knowledge.get_mut(over.at) {
                *slot = known;
            }
        }
    }

    let mut stack = Vec::with_capacity(file.stack.len());
    for (i, entry) in file.stack.iter().enumerate() {
        let type_id = rules
            .unit_type_id(&entry.unit)
            .ok_or_else(|| anyhow!("unknown unit type `{}`", entry.unit))?;
        let full = rules
            .unit_type(type_id)
            .map(|t| t.double_moves)
            .unwrap_or_default();
        stack.push(UnitSnapshot {
            id: EntityId::new(i as u32, 0),
            type_id,
            owner: player,
            double_moves_left: entry.moves_left.unwrap_or(full),
        });
    }

    let mut spells = Vec::with_capacity(file.spells.len());
    for entry in &file.spells {
        let spell = rules
            .spell_id(&entry.spell)
            .ok_or_else(|| anyhow!("unknown spell `{}`", entry.spell))?;
        let Some(target) = stack.get(entry.target) else {
            bail!(
                "spell `{}` targets stack index {} but the stack has {} units",
                entry.spell,
                entry.target,
                stack.len()
            );
        };
        spells.push(MaintainedSpell {
            spell,
            target: target.id,
        });
    }

    Ok(Scenario {
        map,
        knowledge,
        stack,
        spells,
        player,
        origin: file.origin,
        budget: file.budget,
    })
}
