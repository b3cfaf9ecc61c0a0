//! Tic-tac-toe on a 3x3 board.
//!
//! Cells are numbered 1-9 in reading order in commands and 0-8 internally.

mod render;

use serde::{Deserialize, Serialize};
use turnpost_codec::PixelBuffer;

use crate::engine::TurnGame;

pub const GAME_TYPE: &str = "tictactoe";

/// Every line that wins, rows first, then columns, then both diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    #[serde(rename = "x")]
    X,
    #[serde(rename = "o")]
    O,
}

impl Cell {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// Serialized tic-tac-toe state.
///
/// The field layout is part of the image format: boards posted earlier must
/// keep decoding, so fields are never renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub grid: [Cell; 9],
    pub starter: Mark,
    pub current: Mark,
    /// No move has been made yet.
    pub empty: bool,
    pub full: bool,
    /// `Cell::Empty` while undecided or drawn.
    pub winner: Cell,
    /// Winning triplet, `[0, 0, 0]` while there is none.
    pub tiles: [usize; 3],
}

impl Board {
    pub fn is_draw(&self) -> bool {
        self.full && self.winner == Cell::Empty
    }

    pub fn is_over(&self) -> bool {
        self.winner != Cell::Empty || self.full
    }

    fn player_of(&self, mark: Mark) -> usize {
        if mark == self.starter { 0 } else { 1 }
    }
}

/// Scans for three identical marks; x is checked before o.
pub fn find_winner(grid: &[Cell; 9]) -> Option<(Mark, [usize; 3])> {
    [Mark::X, Mark::O].into_iter().find_map(|mark| {
        LINES
            .iter()
            .find(|line| line.iter().all(|&i| grid[i] == Cell::from(mark)))
            .map(|line| (mark, *line))
    })
}

/// Parses a 1-9 cell command into a grid index. Only the leading number
/// counts, so "5!" and "3," are moves.
fn parse_position(command: &str) -> Option<usize> {
    let rest = command.trim_start();
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    match rest[..end].parse::<u8>() {
        Ok(n @ 1..=9) => Some(n as usize - 1),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TurnGame for TicTacToe {
    type State = Board;

    fn game_type(&self) -> &'static str {
        GAME_TYPE
    }

    fn is_valid_input(&self, command: &str) -> bool {
        parse_position(command).is_some()
    }

    fn initial_state(&self) -> Board {
        Board {
            grid: [Cell::Empty; 9],
            starter: Mark::X,
            current: Mark::X,
            empty: true,
            full: false,
            winner: Cell::Empty,
            tiles: [0, 0, 0],
        }
    }

    fn next_state(&self, state: &Board, command: &str) -> Option<Board> {
        let position = parse_position(command)?;
        if state.winner != Cell::Empty || state.grid[position] != Cell::Empty {
            return None;
        }

        let mut grid = state.grid;
        grid[position] = state.current.into();
        let (winner, tiles) = match find_winner(&grid) {
            Some((mark, tiles)) => (mark.into(), tiles),
            None => (Cell::Empty, [0, 0, 0]),
        };

        Some(Board {
            grid,
            starter: state.starter,
            current: state.current.other(),
            empty: false,
            full: grid.iter().all(|c| *c != Cell::Empty),
            winner,
            tiles,
        })
    }

    fn current_player(&self, state: &Board) -> usize {
        state.player_of(state.current)
    }

    fn winner(&self, state: &Board) -> Option<usize> {
        state.winner.mark().map(|mark| state.player_of(mark))
    }

    fn reply_text(&self, state: &Board, names: &[String; 2]) -> String {
        let line = |index: usize, suffix: &str| {
            let symbol = if index == 0 { "❌" } else { "⭕" };
            format!("{symbol} @{}{suffix}\n", names[index])
        };

        if state.empty {
            return format!(
                "You started a game of Tic-Tac-Toe!\n\n{}{}",
                line(0, " (your turn!)"),
                line(1, "")
            );
        }

        if let Some(winner) = self.winner(state) {
            let flag = |i| if i == winner { " wins the game!" } else { "" };
            return format!("GAME OVER!\n\n{}{}", line(0, flag(0)), line(1, flag(1)));
        }

        if state.is_draw() {
            return format!("GAME OVER!\n\n{}{}It's a draw!\n", line(0, ""), line(1, ""));
        }

        let current = self.current_player(state);
        let flag = |i| if i == current { " (your turn!)" } else { "" };
        format!("\u{200D}\n{}{}", line(0, flag(0)), line(1, flag(1)))
    }

    fn render(&self, state: &Board) -> PixelBuffer {
        render::render(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[&str]) -> Board {
        let game = TicTacToe;
        moves.iter().fold(game.initial_state(), |state, m| {
            game.next_state(&state, m)
                .unwrap_or_else(|| panic!("move {m} rejected"))
        })
    }

    fn names() -> [String; 2] {
        ["alice".to_string(), "bob".to_string()]
    }

    #[test]
    fn initial_state_matches_stored_layout() {
        let json = serde_json::to_value(TicTacToe.initial_state()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grid": ["", "", "", "", "", "", "", "", ""],
                "starter": "x",
                "current": "x",
                "empty": true,
                "full": false,
                "winner": "",
                "tiles": [0, 0, 0],
            })
        );
    }

    #[test]
    fn valid_input_accepts_only_cells() {
        let game = TicTacToe;
        for ok in ["1", "5", "9", " 7 ", "+4", "09"] {
            assert!(game.is_valid_input(ok), "{ok}");
        }
        for bad in ["0", "10", "-1", "x", "", "300", "!5", "+", "12abc"] {
            assert!(!game.is_valid_input(bad), "{bad}");
        }
    }

    #[test]
    fn trailing_text_after_number_is_ignored() {
        let game = TicTacToe;
        for ok in ["5!", "5.", "5abc", "3,", "8 please"] {
            assert!(game.is_valid_input(ok), "{ok}");
        }
        let state = game.next_state(&game.initial_state(), "5!").unwrap();
        assert_eq!(state.grid[4], Cell::X);
    }

    #[test]
    fn turns_alternate() {
        let game = TicTacToe;
        let state = play(&["5"]);
        assert_eq!(state.grid[4], Cell::X);
        assert_eq!(state.current, Mark::O);
        assert_eq!(game.current_player(&state), 1);
        assert!(!state.empty);

        let state = game.next_state(&state, "1").unwrap();
        assert_eq!(state.grid[0], Cell::O);
        assert_eq!(game.current_player(&state), 0);
    }

    #[test]
    fn occupied_cell_is_illegal() {
        let state = play(&["5"]);
        assert!(TicTacToe.next_state(&state, "5").is_none());
    }

    #[test]
    fn no_moves_after_win() {
        let state = play(&["1", "4", "2", "5", "3"]);
        assert_eq!(TicTacToe.winner(&state), Some(0));
        assert!(TicTacToe.next_state(&state, "9").is_none());
    }

    #[test]
    fn every_line_wins_with_its_tiles() {
        let game = TicTacToe;
        for line in LINES {
            // x fills the line; o plays anywhere else.
            let mut fillers = (0..9).filter(|i| !line.contains(i));
            let mut state = game.initial_state();
            for (n, &cell) in line.iter().enumerate() {
                state = game.next_state(&state, &(cell + 1).to_string()).unwrap();
                if n < 2 {
                    let other = fillers.next().unwrap();
                    state = game.next_state(&state, &(other + 1).to_string()).unwrap();
                }
            }
            assert_eq!(game.winner(&state), Some(0), "line {line:?}");
            assert_eq!(state.winner, Cell::X);
            assert_eq!(state.tiles, line);
        }
    }

    #[test]
    fn second_player_can_win() {
        let state = play(&["1", "4", "2", "5", "9", "6"]);
        assert_eq!(TicTacToe.winner(&state), Some(1));
        assert_eq!(state.winner, Cell::O);
        assert_eq!(state.tiles, [3, 4, 5]);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // x o x / x o o / o x x
        let state = play(&["1", "2", "3", "5", "4", "6", "8", "7", "9"]);
        assert_eq!(TicTacToe.winner(&state), None);
        assert!(state.full);
        assert!(state.is_draw());
        assert!(state.is_over());
        assert_eq!(state.tiles, [0, 0, 0]);
    }

    #[test]
    fn new_game_text() {
        let text = TicTacToe.reply_text(&TicTacToe.initial_state(), &names());
        assert_eq!(
            text,
            "You started a game of Tic-Tac-Toe!\n\n❌ @alice (your turn!)\n⭕ @bob\n"
        );
    }

    #[test]
    fn in_progress_text_flags_current_player() {
        let text = TicTacToe.reply_text(&play(&["5"]), &names());
        assert_eq!(text, "\u{200D}\n❌ @alice\n⭕ @bob (your turn!)\n");
    }

    #[test]
    fn finished_text_flags_winner() {
        let state = play(&["1", "4", "2", "5", "3"]);
        let text = TicTacToe.reply_text(&state, &names());
        assert_eq!(text, "GAME OVER!\n\n❌ @alice wins the game!\n⭕ @bob\n");
    }

    #[test]
    fn draw_text() {
        let state = play(&["1", "2", "3", "5", "4", "6", "8", "7", "9"]);
        let text = TicTacToe.reply_text(&state, &names());
        assert_eq!(text, "GAME OVER!\n\n❌ @alice\n⭕ @bob\nIt's a draw!\n");
    }
}
