//! Game-type keyword to engine lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::GameEngine;
use crate::tictactoe::TicTacToe;

/// Engines keyed by [`GameEngine::game_type`].
#[derive(Clone, Default)]
pub struct GameRegistry {
    engines: HashMap<&'static str, Arc<dyn GameEngine>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in game.
    pub fn with_default_games() -> Self {
        let mut registry = Self::new();
        registry.register(TicTacToe);
        registry
    }

    /// Adds `engine`, replacing any engine with the same type.
    pub fn register<E: GameEngine + 'static>(&mut self, engine: E) {
        let game_type = engine.game_type();
        tracing::debug!(game_type, "registered game");
        self.engines.insert(game_type, Arc::new(engine));
    }

    pub fn get(&self, game_type: &str) -> Option<Arc<dyn GameEngine>> {
        self.engines.get(game_type).cloned()
    }

    /// Registered keywords, sorted.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut keywords: Vec<_> = self.engines.keys().copied().collect();
        keywords.sort_unstable();
        keywords
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("games", &self.keywords())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_tictactoe() {
        let registry = GameRegistry::with_default_games();
        assert_eq!(registry.keywords(), vec!["tictactoe"]);
        let engine = registry.get("tictactoe").unwrap();
        assert_eq!(engine.game_type(), "tictactoe");
    }

    #[test]
    fn unknown_keyword_is_none() {
        let registry = GameRegistry::with_default_games();
        assert!(registry.get("chess").is_none());
        assert!(registry.get("TicTacToe").is_none());
    }

    #[test]
    fn engine_round_trips_json_state() {
        let engine = GameRegistry::with_default_games().get("tictactoe").unwrap();
        let initial = engine.initial_state().unwrap();
        assert_eq!(engine.current_player(&initial).unwrap(), 0);

        let next = engine.next_state(&initial, "3").unwrap().unwrap();
        assert_eq!(next["grid"][2], "x");
        assert_eq!(engine.current_player(&next).unwrap(), 1);
        assert_eq!(engine.winner(&next).unwrap(), None);
        assert!(engine.next_state(&next, "3").unwrap().is_none());
    }

    #[test]
    fn malformed_state_is_an_error() {
        let engine = GameRegistry::with_default_games().get("tictactoe").unwrap();
        let err = engine
            .current_player(&serde_json::json!({ "grid": 5 }))
            .unwrap_err();
        assert!(err.to_string().contains("tictactoe"));
    }

    #[test]
    fn empty_registry() {
        let registry = GameRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
