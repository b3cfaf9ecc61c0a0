use serde::{Deserialize, Serialize};

/// Complete state of one game, as persisted inside an image.
///
/// Serialized as `{"type": ..., "players": [a, b], "state": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "type")]
    pub game_type: String,
    /// Platform user ids; index 0 moves first.
    pub players: [String; 2],
    /// Variant-defined state.
    pub state: serde_json::Value,
}

impl GameRecord {
    pub fn new(game_type: impl Into<String>, players: [String; 2], state: serde_json::Value) -> Self {
        Self {
            game_type: game_type.into(),
            players,
            state,
        }
    }

    /// Canonical JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
