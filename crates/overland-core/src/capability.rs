//! Stack capability aggregation.
//!
//! Every movement-relevant unit skill is reduced to a bit in [`Capabilities`]
//! once per invocation, so the cost table never inspects unit types again.

use bitflags::bitflags;
use overland_protocol::{MaintainedSpell, SkillId, UnitId, UnitSnapshot, UnitTypeId};

use crate::rules::{Capability, CompiledRules, SkillScope};
use crate::MovementError;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        const WALKING = 1 << 0;
        const SWIMMING = 1 << 1;
        const FLYING = 1 << 2;
        const NON_CORPOREAL = 1 << 3;
        const PATH_FINDING = 1 << 4;
        const WIND_WALKING = 1 << 5;
        const MOUNTAINEERING = 1 << 6;
    }
}

impl Capabilities {
    /// Flying units, and every unit of a wind-walking stack, use flying costs.
    pub fn is_effective_flyer(self) -> bool {
        self.intersects(Capabilities::FLYING | Capabilities::WIND_WALKING)
    }
}

impl From<Capability> for Capabilities {
    fn from(capability: Capability) -> Self {
        match capability {
            Capability::Walking => Capabilities::WALKING,
            Capability::Swimming => Capabilities::SWIMMING,
            Capability::Flying => Capabilities::FLYING,
            Capability::NonCorporeal => Capabilities::NON_CORPOREAL,
            Capability::PathFinding => Capabilities::PATH_FINDING,
            Capability::WindWalking => Capabilities::WIND_WALKING,
            Capability::Mountaineering => Capabilities::MOUNTAINEERING,
        }
    }
}

/// Movement view of one stack member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitMovement {
    pub id: UnitId,
    pub type_id: UnitTypeId,
    /// Own skills, spell-granted skills and stack-wide skills combined.
    pub capabilities: Capabilities,
    /// Full double-movement allowance of the unit type.
    pub base_double_moves: i32,
    pub double_moves_left: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackCapabilities {
    units: Vec<UnitMovement>,
    stack_wide: Capabilities,
}

impl StackCapabilities {
    pub fn units(&self) -> &[UnitMovement] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Capabilities shared by the whole stack (path finding, wind walking...).
    pub fn stack_wide(&self) -> Capabilities {
        self.stack_wide
    }

    /// Every capability present on any member.
    pub fn union(&self) -> Capabilities {
        self.units
            .iter()
            .fold(self.stack_wide, |acc, u| acc | u.capabilities)
    }

    /// The stack moves as far as its most exhausted member.
    pub fn slowest_moves_left(&self) -> i32 {
        self.units
            .iter()
            .map(|u| u.double_moves_left)
            .min()
            .unwrap_or(0)
    }
}

/// Derives per-unit capabilities for a stack from its unit types and the
/// maintained spells in effect. Spells targeting units outside the stack are
/// still resolved, so a dangling spell id is reported either way.
pub fn aggregate_stack(
    rules: &CompiledRules,
    stack: &[UnitSnapshot],
    spells: &[MaintainedSpell],
) -> Result<StackCapabilities, MovementError> {
    if stack.is_empty() {
        return Err(MovementError::EmptyStack);
    }

    let mut own = Vec::with_capacity(stack.len());
    let mut stack_wide = Capabilities::empty();

    for unit in stack {
        let utype = rules
            .unit_type(unit.type_id)
            .ok_or(MovementError::UnknownUnitType(unit.type_id.raw))?;
        let mut caps = Capabilities::empty();
        for &skill in &utype.skills {
            apply_skill(rules, skill, &mut caps, &mut stack_wide)?;
        }
        own.push((unit, utype.double_moves, caps));
    }

    for spell in spells {
        let def = rules
            .spell(spell.spell)
            .ok_or(MovementError::UnknownSpell(spell.spell.raw))?;
        let Some(slot) = own.iter_mut().find(|(u, _, _)| u.id == spell.target) else {
            continue;
        };
        for &skill in &def.grants {
            apply_skill(rules, skill, &mut slot.2, &mut stack_wide)?;
        }
    }

    let units = own
        .into_iter()
        .map(|(unit, base_double_moves, caps)| UnitMovement {
            id: unit.id,
            type_id: unit.type_id,
            capabilities: caps | stack_wide,
            base_double_moves,
            double_moves_left: unit.double_moves_left,
        })
        .collect();

    Ok(StackCapabilities { units, stack_wide })
}

fn apply_skill(
    rules: &CompiledRules,
    skill: SkillId,
    caps: &mut Capabilities,
    stack_wide: &mut Capabilities,
) -> Result<(), MovementError> {
    let def = rules
        .skill(skill)
        .ok_or(MovementError::UnknownSkill(skill.raw))?;
    let Some(capability) = def.capability else {
        return Ok(());
    };
    let flag = Capabilities::from(capability);
    *caps |= flag;
    if def.scope == SkillScope::Stack {
        *stack_wide |= flag;
    }
    Ok(())
}
