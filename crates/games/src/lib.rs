//! Turn-based game engines.
//!
//! Variants implement the typed [`TurnGame`] trait. Every `TurnGame` is also
//! a [`GameEngine`], the object-safe form that works on JSON states so the
//! [`GameRegistry`] can hold heterogeneous variants keyed by game type.

pub mod canvas;
pub mod engine;
pub mod registry;
pub mod tictactoe;

pub use engine::{GameEngine, TurnGame};
pub use registry::GameRegistry;
pub use tictactoe::TicTacToe;

/// Errors produced by game engines.
#[derive(Debug, thiserror::Error)]
pub enum GamesError {
    #[error("invalid {game} state: {source}")]
    State {
        game: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
