use std::collections::HashMap;

use overland_protocol::{Adjacency, DataId, MapFeatureId, SkillId, SpellId, TerrainId, UnitTypeId};
use serde::Deserialize;

use crate::rules::RulesError;

#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub terrains: Vec<TerrainType>,
    pub features: Vec<MapFeature>,
    pub skills: Vec<Skill>,
    pub unit_types: Vec<UnitType>,
    pub spells: Vec<Spell>,
    pub movement: MovementSettings,

    pub terrain_ids: HashMap<DataId, TerrainId>,
    pub feature_ids: HashMap<DataId, MapFeatureId>,
    pub skill_ids: HashMap<DataId, SkillId>,
    pub unit_type_ids: HashMap<DataId, UnitTypeId>,
    pub spell_ids: HashMap<DataId, SpellId>,
}

impl CompiledRules {
    pub fn terrain(&self, id: TerrainId) -> Option<&TerrainType> {
        self.terrains.get(id.index())
    }

    pub fn feature(&self, id: MapFeatureId) -> Option<&MapFeature> {
        self.features.get(id.index())
    }

    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(id.index())
    }

    pub fn unit_type(&self, id: UnitTypeId) -> Option<&UnitType> {
        self.unit_types.get(id.index())
    }

    pub fn spell(&self, id: SpellId) -> Option<&Spell> {
        self.spells.get(id.index())
    }

    pub fn terrain_id(&self, data_id: &str) -> Option<TerrainId> {
        self.terrain_ids.get(data_id).copied()
    }

    pub fn feature_id(&self, data_id: &str) -> Option<MapFeatureId> {
        self.feature_ids.get(data_id).copied()
    }

    pub fn unit_type_id(&self, data_id: &str) -> Option<UnitTypeId> {
        self.unit_type_ids.get(data_id).copied()
    }

    pub fn spell_id(&self, data_id: &str) -> Option<SpellId> {
        self.spell_ids.get(data_id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    Land,
    Water,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTerrainType {
    pub name: String,
    pub category: TerrainCategory,
    #[serde(default = "default_move_cost")]
    pub move_cost: i32,
    /// Hills, mountains and the like; qualifies for mountaineering.
    #[serde(default)]
    pub rough: bool,
    #[serde(default)]
    pub impassable: bool,
}

impl RawTerrainType {
    pub fn compile(self) -> TerrainType {
        TerrainType {
            name: self.name,
            category: self.category,
            move_cost: self.move_cost.max(1),
            rough: self.rough,
            impassable: self.impassable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerrainType {
    pub name: String,
    pub category: TerrainCategory,
    /// Double-movement cost for a unit that walks (land) or swims (water) in.
    pub move_cost: i32,
    pub rough: bool,
    pub impassable: bool,
}

fn default_move_cost() -> i32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Node,
    Lair,
    Tower,
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMapFeature {
    pub name: String,
    pub kind: FeatureKind,
    #[serde(default)]
    pub guarded: bool,
}

impl RawMapFeature {
    pub fn compile(self) -> MapFeature {
        MapFeature {
            name: self.name,
            kind: self.kind,
            guarded: self.guarded && self.kind != FeatureKind::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapFeature {
    pub name: String,
    pub kind: FeatureKind,
    /// May hold monsters; entering without knowledge of it triggers scouting.
    pub guarded: bool,
}

impl MapFeature {
    pub fn is_tower(&self) -> bool {
        self.kind == FeatureKind::Tower
    }
}

/// Movement-relevant meaning of a unit skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Walking,
    Swimming,
    Flying,
    NonCorporeal,
    PathFinding,
    WindWalking,
    Mountaineering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillScope {
    /// Applies to the unit that has the skill.
    #[default]
    Unit,
    /// Applies to every unit in a stack that contains the skill.
    Stack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSkill {
    pub name: String,
    #[serde(default)]
    pub capability: Option<Capability>,
    #[serde(default)]
    pub scope: SkillScope,
}

impl RawSkill {
    pub fn compile(self) -> Skill {
        Skill {
            name: self.name,
            capability: self.capability,
            scope: self.scope,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Skill {
    pub name: String,
    pub capability: Option<Capability>,
    pub scope: SkillScope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnitType {
    pub name: String,
    /// Whole movement points per turn.
    pub moves: i32,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl RawUnitType {
    pub fn compile(self, skill_ids: &HashMap<DataId, SkillId>) -> Result<UnitType, RulesError> {
        let skills = resolve_skills(self.skills, skill_ids)?;
        Ok(UnitType {
            name: self.name,
            double_moves: self.moves.max(0) * 2,
            skills,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UnitType {
    pub name: String,
    pub double_moves: i32,
    pub skills: Vec<SkillId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpell {
    pub name: String,
    #[serde(default)]
    pub grants: Vec<String>,
}

impl RawSpell {
    pub fn compile(self, skill_ids: &HashMap<DataId, SkillId>) -> Result<Spell, RulesError> {
        let grants = resolve_skills(self.grants, skill_ids)?;
        Ok(Spell {
            name: self.name,
            grants,
        })
    }
}

/// A maintained unit enchantment and the skills it adds to its target.
#[derive(Debug, Clone)]
pub struct Spell {
    pub name: String,
    pub grants: Vec<SkillId>,
}

fn resolve_skills(
    ids: Vec<String>,
    skill_ids: &HashMap<DataId, SkillId>,
) -> Result<Vec<SkillId>, RulesError> {
    ids.into_iter()
        .map(|id| {
            skill_ids
                .get(&id)
                .copied()
                .ok_or(RulesError::MissingId(id))
        })
        .collect()
}

/// Tile categories a flat substituted cost applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainMatch {
    Land,
    Water,
    Rough,
}

impl TerrainMatch {
    pub fn matches(self, terrain: &TerrainType) -> bool {
        match self {
            TerrainMatch::Land => terrain.category == TerrainCategory::Land,
            TerrainMatch::Water => terrain.category == TerrainCategory::Water,
            TerrainMatch::Rough => terrain.rough,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatCostRule {
    pub capability: Capability,
    pub double_moves: i32,
    pub applies_to: Vec<TerrainMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementSettings {
    /// Most units that may share one cell.
    pub stack_capacity: u32,
    /// Cost of entering a cell whose terrain is not yet known.
    pub unexplored_cost: i32,
    #[serde(default)]
    pub adjacency: Adjacency,
    #[serde(default)]
    pub flat_costs: Vec<FlatCostRule>,
}

impl MovementSettings {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.stack_capacity == 0 {
            return Err(RulesError::InvalidSetting(
                "stack_capacity must be at least 1".to_string(),
            ));
        }
        if self.unexplored_cost < 1 {
            return Err(RulesError::InvalidSetting(
                "unexplored_cost must be at least 1".to_string(),
            ));
        }
        if let Some(rule) = self.flat_costs.iter().find(|r| r.double_moves < 0) {
            return Err(RulesError::InvalidSetting(format!(
                "flat cost for {:?} is negative",
                rule.capability
            )));
        }
        Ok(())
    }

    /// First flat cost for `capability` that applies to `terrain`.
    pub fn flat_cost(&self, capability: Capability, terrain: &TerrainType) -> Option<i32> {
        self.flat_costs
            .iter()
            .filter(|rule| rule.capability == capability)
            .find(|rule| rule.applies_to.iter().any(|m| m.matches(terrain)))
            .map(|rule| rule.double_moves)
    }
}
