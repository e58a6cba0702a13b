//! Path reconstruction over a finished movement result.

use overland_protocol::{MapCoord, MoveOutcome, MovementStopReason, PathPreview};

use crate::movement::OverlandMovement;

impl OverlandMovement {
    /// Coordinates from the first step after the origin up to `dest`.
    ///
    /// `None` if `dest` was never settled. The origin yields an empty path.
    pub fn path_to(&self, dest: MapCoord) -> Option<Vec<MapCoord>> {
        self.distance_at(dest).cost()?;

        let mut path = Vec::new();
        let mut cur = dest;
        while cur != self.origin {
            // Each settled cell is visited at most once on a valid chain.
            if path.len() > self.distance.len() {
                return None;
            }
            path.push(cur);
            let dir = self.direction_at(cur)?;
            cur = self
                .distance
                .step(cur, dir.reverse(), self.wrap_horizontal)?;
        }
        path.reverse();
        Some(path)
    }

    /// How far along the path to `dest` the stack gets this turn, and why it stops.
    pub fn preview(&self, dest: MapCoord) -> Option<PathPreview> {
        let full_path = self.path_to(dest)?;

        let this_turn_path: Vec<MapCoord> = full_path
            .iter()
            .copied()
            .take_while(|c| self.reachable_at(*c))
            .collect();
        let stop_at = this_turn_path.last().copied().unwrap_or(self.origin);

        let stop_reason = if this_turn_path.len() < full_path.len() {
            Some(MovementStopReason::MovesExhausted)
        } else if full_path.is_empty() {
            None
        } else {
            match self.outcome_at(dest) {
                MoveOutcome::Scout => Some(MovementStopReason::Scout { at: dest }),
                MoveOutcome::Attack => Some(MovementStopReason::Attack { at: dest }),
                MoveOutcome::None => None,
            }
        };

        Some(PathPreview {
            full_path,
            this_turn_path,
            stop_at,
            stop_reason,
        })
    }
}
