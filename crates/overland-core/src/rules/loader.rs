use std::collections::{BTreeMap, HashMap};

use overland_protocol::{DataId, RuntimeId};
use serde::Deserialize;
use thiserror::Error;

use crate::rules::{
    CompiledRules, MovementSettings, RawMapFeature, RawSkill, RawSpell, RawTerrainType,
    RawUnitType,
};

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("invalid movement setting: {0}")]
    InvalidSetting(String),
    #[error("too many {0} entries for 16-bit runtime ids")]
    TooMany(&'static str),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub enum RulesSource<'a> {
    Embedded,
    Path(String),
    Bytes {
        terrain: &'a [u8],
        features: &'a [u8],
        skills: &'a [u8],
        units: &'a [u8],
        spells: &'a [u8],
        movement: &'a [u8],
    },
}

#[derive(Debug, Deserialize)]
struct RawRules {
    terrains: BTreeMap<String, RawTerrainType>,
    features: BTreeMap<String, RawMapFeature>,
    skills: BTreeMap<String, RawSkill>,
    units: BTreeMap<String, RawUnitType>,
    spells: BTreeMap<String, RawSpell>,
    movement: MovementSettings,
}

pub fn load_rules(source: RulesSource<'_>) -> Result<CompiledRules, RulesError> {
    let raw = match source {
        RulesSource::Embedded => parse_raw_rules(
            include_str!("../../data/base/terrain.yaml"),
            include_str!("../../data/base/features.yaml"),
            include_str!("../../data/base/skills.yaml"),
            include_str!("../../data/base/units.yaml"),
            include_str!("../../data/base/spells.yaml"),
            include_str!("../../data/base/movement.yaml"),
        )?,
        RulesSource::Path(path) => {
            let terrain_yaml = std::fs::read_to_string(format!("{path}/terrain.yaml"))?;
            let features_yaml = std::fs::read_to_string(format!("{path}/features.yaml"))?;
            let skills_yaml = std::fs::read_to_string(format!("{path}/skills.yaml"))?;
            let units_yaml = std::fs::read_to_string(format!("{path}/units.yaml"))?;
            let spells_yaml = std::fs::read_to_string(format!("{path}/spells.yaml"))?;
            let movement_yaml = std::fs::read_to_string(format!("{path}/movement.yaml"))?;
            parse_raw_rules(
                &terrain_yaml,
                &features_yaml,
                &skills_yaml,
                &units_yaml,
                &spells_yaml,
                &movement_yaml,
            )?
        }
        RulesSource::Bytes {
            terrain,
            features,
            skills,
            units,
            spells,
            movement,
        } => parse_raw_rules(
            std::str::from_utf8(terrain)?,
            std::str::from_utf8(features)?,
            std::str::from_utf8(skills)?,
            std::str::from_utf8(units)?,
            std::str::from_utf8(spells)?,
            std::str::from_utf8(movement)?,
        )?,
    };

    compile_rules(raw)
}

fn parse_raw_rules(
    terrain_yaml: &str,
    features_yaml: &str,
    skills_yaml: &str,
    units_yaml: &str,
    spells_yaml: &str,
    movement_yaml: &str,
) -> Result<RawRules, RulesError> {
    Ok(RawRules {
        terrains: serde_yaml::from_str(terrain_yaml)?,
        features: serde_yaml::from_str(features_yaml)?,
        skills: serde_yaml::from_str(skills_yaml)?,
        units: serde_yaml::from_str(units_yaml)?,
        spells: serde_yaml::from_str(spells_yaml)?,
        movement: serde_yaml::from_str(movement_yaml)?,
    })
}

/// Runtime ids follow the sorted data-id order, so they are stable for a ruleset.
fn assign_ids<T, V>(
    entries: &BTreeMap<String, V>,
    kind: &'static str,
) -> Result<HashMap<DataId, RuntimeId<T>>, RulesError> {
    if entries.len() > usize::from(u16::MAX) {
        return Err(RulesError::TooMany(kind));
    }
    Ok(entries
        .keys()
        .enumerate()
        .map(|(i, k)| (k.clone(), RuntimeId::new(i as u16)))
        .collect())
}

fn compile_rules(raw: RawRules) -> Result<CompiledRules, RulesError> {
    raw.movement.validate()?;

    let terrain_ids = assign_ids(&raw.terrains, "terrain")?;
    let feature_ids = assign_ids(&raw.features, "feature")?;
    let skill_ids = assign_ids(&raw.skills, "skill")?;
    let unit_type_ids = assign_ids(&raw.units, "unit")?;
    let spell_ids = assign_ids(&raw.spells, "spell")?;

    let terrains = raw
        .terrains
        .into_values()
        .map(RawTerrainType::compile)
        .collect::<Vec<_>>();
    let features = raw
        .features
        .into_values()
        .map(RawMapFeature::compile)
        .collect::<Vec<_>>();
    let skills = raw
        .skills
        .into_values()
        .map(RawSkill::compile)
        .collect::<Vec<_>>();
    let unit_types = raw
        .units
        .into_values()
        .map(|u| u.compile(&skill_ids))
        .collect::<Result<Vec<_>, _>>()?;
    let spells = raw
        .spells
        .into_values()
        .map(|s| s.compile(&skill_ids))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledRules {
        terrains,
        features,
        skills,
        unit_types,
        spells,
        movement: raw.movement,
        terrain_ids,
        feature_ids,
        skill_ids,
        unit_type_ids,
        spell_ids,
    })
}
