use rmp_serde::{decode, encode};
use thiserror::Error;

use crate::{LegacyMovementGrids, MapSnapshot, PathPreview};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[from] encode::Error),
    #[error("decode error: {0}")]
    Decode(#[from] decode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn serialize_snapshot(snapshot: &MapSnapshot) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(snapshot)?)
}

pub fn deserialize_snapshot(bytes: &[u8]) -> Result<MapSnapshot, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_grids(grids: &LegacyMovementGrids) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(grids)?)
}

pub fn deserialize_grids(bytes: &[u8]) -> Result<LegacyMovementGrids, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_path_preview(preview: &PathPreview) -> Result<Vec<u8>, WireError> {
    Ok(encode::to_vec(preview)?)
}

pub fn deserialize_path_preview(bytes: &[u8]) -> Result<PathPreview, WireError> {
    Ok(decode::from_slice(bytes)?)
}

pub fn serialize_snapshot_json(snapshot: &MapSnapshot) -> Result<String, WireError> {
    Ok(serde_json::to_string(snapshot)?)
}

pub fn deserialize_snapshot_json(json: &str) -> Result<MapSnapshot, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_grids_json(grids: &LegacyMovementGrids) -> Result<String, WireError> {
    Ok(serde_json::to_string(grids)?)
}

pub fn deserialize_grids_json(json: &str) -> Result<LegacyMovementGrids, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn serialize_path_preview_json(preview: &PathPreview) -> Result<String, WireError> {
    Ok(serde_json::to_string(preview)?)
}

pub fn deserialize_path_preview_json(json: &str) -> Result<PathPreview, WireError> {
    Ok(serde_json::from_str(json)?)
}

/// Deterministic hash of one invocation's output, for comparing AI planning
/// results and replays without shipping whole grids around.
///
/// Hashes the MessagePack-serialized grids using FNV-1a 64-bit.
pub fn grids_hash(grids: &LegacyMovementGrids) -> Result<u64, WireError> {
    let bytes = serialize_grids(grids)?;
    Ok(hash_bytes_fnv1a64(&bytes))
}

/// Deterministic, stable 64-bit hash for raw bytes (FNV-1a).
pub fn hash_bytes_fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CellSnapshot, MapCoord, MoveOutcome, MovementStopReason, Plane, PlayerId, TerrainId,
        UnitPresence,
    };

    fn sample_grids() -> LegacyMovementGrids {
        LegacyMovementGrids {
            distance: vec![vec![vec![0, 2, -2]], vec![vec![-1, -1, 4]]],
            direction: vec![vec![vec![0, 3, 0]], vec![vec![0, 0, 9]]],
            can_move_in_one_turn: vec![
                vec![vec![true, true, false]],
                vec![vec![false, false, false]],
            ],
            attack_outcome: vec![
                vec![vec![MoveOutcome::None, MoveOutcome::None, MoveOutcome::None]],
                vec![vec![MoveOutcome::None, MoveOutcome::None, MoveOutcome::Scout]],
            ],
        }
    }

    #[test]
    fn grids_survive_msgpack_and_json() {
        let grids = sample_grids();
        let bytes = serialize_grids(&grids).expect("encode");
        assert_eq!(deserialize_grids(&bytes).expect("decode"), grids);

        let json = serialize_grids_json(&grids).expect("json");
        assert!(json.contains("\"SCOUT\""));
        assert_eq!(deserialize_grids_json(&json).expect("json decode"), grids);
    }

    #[test]
    fn grids_hash_is_stable_and_sensitive() {
        let a = sample_grids();
        let mut b = sample_grids();
        assert_eq!(grids_hash(&a).expect("hash"), grids_hash(&b).expect("hash"));
        b.distance[1][0][2] = 5;
        assert_ne!(grids_hash(&a).expect("hash"), grids_hash(&b).expect("hash"));
    }

    #[test]
    fn snapshot_keeps_fog_and_occupants() {
        let mut snapshot = MapSnapshot::filled(3, 2, true, TerrainId::new(1));
        let at = MapCoord::new(Plane::Myrror, 2, 1);
        *snapshot.cell_mut(at).expect("cell") = CellSnapshot {
            terrain: None,
            units: Some(UnitPresence {
                owner: PlayerId(3),
                count: 8,
            }),
            ..CellSnapshot::default()
        };

        let bytes = serialize_snapshot(&snapshot).expect("encode");
        let back = deserialize_snapshot(&bytes).expect("decode");
        assert_eq!(back.cell(at), snapshot.cell(at));
        assert!(back.wrap_horizontal);
        assert!(back.cells.is_well_formed());
    }

    #[test]
    fn path_preview_json_tags_stop_reason() {
        let at = MapCoord::new(Plane::Arcanus, 1, 1);
        let preview = PathPreview {
            full_path: vec![at],
            this_turn_path: vec![at],
            stop_at: at,
            stop_reason: Some(MovementStopReason::Attack { at }),
        };
        let json = serialize_path_preview_json(&preview).expect("json");
        assert!(json.contains("\"type\":\"Attack\""));
        assert_eq!(deserialize_path_preview_json(&json).expect("decode"), preview);
    }
}
