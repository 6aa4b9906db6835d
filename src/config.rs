// src/config.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SaveLoadError;
use crate::types::PieceKind;

// --- Constants ---
pub const DEFAULT_PROMOTION: PieceKind = PieceKind::Queen;
pub const DEFAULT_MAX_OBSERVERS: usize = 64;
pub const DEFAULT_VIEW_FILENAME: &str = "chess_game.json";

/// Settings shared by every session a directory creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Piece a pawn becomes when it reaches its last rank without a stated choice.
    pub default_promotion: PieceKind,
    /// Upper bound on observers per session.
    pub max_observers: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            default_promotion: DEFAULT_PROMOTION,
            max_observers: DEFAULT_MAX_OBSERVERS,
        }
    }
}

impl ArenaConfig {
    /// Reads a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SaveLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| SaveLoadError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SaveLoadError> {
        let mut config: ArenaConfig = serde_json::from_str(text)?;
        if !config.default_promotion.is_promotion_target() {
            tracing::warn!(
                "default_promotion {:?} is not a promotion piece, using {:?}",
                config.default_promotion,
                DEFAULT_PROMOTION
            );
            config.default_promotion = DEFAULT_PROMOTION;
        }
        Ok(config)
    }
}
