//! Overland movement engine: rules database, stack capabilities, per-stack
//! cost tables, cell classification and the dual-plane traversal.

#![forbid(unsafe_code)]

mod capability;
mod classify;
mod cost_table;
mod error;
mod movement;
mod path;
mod projection;
mod rules;
mod traversal;

pub use crate::capability::*;
pub use crate::classify::*;
pub use crate::cost_table::*;
pub use crate::error::*;
pub use crate::movement::*;
pub use crate::projection::*;
pub use crate::rules::*;
pub use crate::traversal::*;
