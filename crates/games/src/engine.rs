//! Engine traits.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use turnpost_codec::PixelBuffer;

use crate::GamesError;

/// A two-player, turn-based game with a typed state.
///
/// All operations are pure; none perform I/O.
pub trait TurnGame: Send + Sync + 'static {
    type State: Serialize + DeserializeOwned + Clone + Send;

    /// Keyword that identifies the game in requests and records.
    fn game_type(&self) -> &'static str;

    /// Whether `command` is well-formed for this game.
    fn is_valid_input(&self, command: &str) -> bool;

    fn initial_state(&self) -> Self::State;

    /// Applies `command`; `None` means the move is illegal in `state`.
    fn next_state(&self, state: &Self::State, command: &str) -> Option<Self::State>;

    /// Index (0 or 1) of the player to move.
    fn current_player(&self, state: &Self::State) -> usize;

    /// Index of the winner, `None` while undecided or drawn.
    fn winner(&self, state: &Self::State) -> Option<usize>;

    /// Text of the reply announcing `state`; `names` are display handles
    /// in player order.
    fn reply_text(&self, state: &Self::State, names: &[String; 2]) -> String;

    /// Draws the board for `state`.
    fn render(&self, state: &Self::State) -> PixelBuffer;
}

/// Object-safe engine over JSON states.
pub trait GameEngine: Send + Sync {
    fn game_type(&self) -> &'static str;
    fn is_valid_input(&self, command: &str) -> bool;
    fn initial_state(&self) -> Result<Value, GamesError>;
    fn next_state(&self, state: &Value, command: &str) -> Result<Option<Value>, GamesError>;
    fn current_player(&self, state: &Value) -> Result<usize, GamesError>;
    fn winner(&self, state: &Value) -> Result<Option<usize>, GamesError>;
    fn reply_text(&self, state: &Value, names: &[String; 2]) -> Result<String, GamesError>;
    fn render(&self, state: &Value) -> Result<PixelBuffer, GamesError>;
}

impl<G: TurnGame> GameEngine for G {
    fn game_type(&self) -> &'static str {
        TurnGame::game_type(self)
    }

    fn is_valid_input(&self, command: &str) -> bool {
        TurnGame::is_valid_input(self, command)
    }

    fn initial_state(&self) -> Result<Value, GamesError> {
        to_value(self, &TurnGame::initial_state(self))
    }

    fn next_state(&self, state: &Value, command: &str) -> Result<Option<Value>, GamesError> {
        let state = parse_state(self, state)?;
        TurnGame::next_state(self, &state, command)
            .map(|next| to_value(self, &next))
            .transpose()
    }

    fn current_player(&self, state: &Value) -> Result<usize, GamesError> {
        Ok(TurnGame::current_player(self, &parse_state(self, state)?))
    }

    fn winner(&self, state: &Value) -> Result<Option<usize>, GamesError> {
        Ok(TurnGame::winner(self, &parse_state(self, state)?))
    }

    fn reply_text(&self, state: &Value, names: &[String; 2]) -> Result<String, GamesError> {
        Ok(TurnGame::reply_text(self, &parse_state(self, state)?, names))
    }

    fn render(&self, state: &Value) -> Result<PixelBuffer, GamesError> {
        Ok(TurnGame::render(self, &parse_state(self, state)?))
    }
}

fn parse_state<G: TurnGame>(game: &G, state: &Value) -> Result<G::State, GamesError> {
    G::State::deserialize(state).map_err(|source| GamesError::State {
        game: TurnGame::game_type(game),
        source,
    })
}

fn to_value<G: TurnGame>(game: &G, state: &G::State) -> Result<Value, GamesError> {
    serde_json::to_value(state).map_err(|source| GamesError::State {
        game: TurnGame::game_type(game),
        source,
    })
}
