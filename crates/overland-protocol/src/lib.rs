//! Types that cross the boundary between the overland movement engine and
//! its collaborators: rule IDs, map coordinates, the immutable terrain/unit
//! snapshot, the output grids and their wire encodings.

#![forbid(unsafe_code)]

mod coord;
mod grid;
mod ids;
mod snapshot;
mod types;
pub mod wire;

pub use crate::coord::*;
pub use crate::grid::*;
pub use crate::ids::*;
pub use crate::snapshot::*;
pub use crate::types::*;
pub use crate::wire::WireError;
