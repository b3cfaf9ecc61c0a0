use turnpost_codec::{IMAGE_HEIGHT, IMAGE_WIDTH, PixelBuffer};

use super::{Board, Cell};
use crate::canvas::{self, BLACK, Rgb};

const BACKGROUND: Rgb = [160, 210, 200];
const WIN_LINE: Rgb = [160, 0, 0];

const MARGIN: i32 = 30;
const MARK_RADIUS: f32 = 20.0;
const MARK_WIDTH: f32 = 12.0;
const SHADOW_OFFSET: f32 = 3.0;
const SHADOW_ALPHA: f32 = 0.2;
const GRID_WIDTH: f32 = 4.0;
const WIN_WIDTH: f32 = 6.0;
const NUMBER_ALPHA: f32 = 0.08;
const NUMBER_SCALE: i32 = 8;

struct Layout {
    size: i32,
    ox: i32,
    oy: i32,
}

impl Layout {
    fn new() -> Self {
        let (w, h) = (IMAGE_WIDTH as i32, IMAGE_HEIGHT as i32);
        let size = (h - 2 * MARGIN) / 3;
        Self {
            size,
            ox: w / 2 - size - size / 2,
            oy: h / 2 - size - size / 2,
        }
    }

    fn center(&self, index: usize) -> (i32, i32) {
        let (col, row) = ((index % 3) as i32, (index / 3) as i32);
        (
            self.ox + col * self.size + self.size / 2,
            self.oy + row * self.size + self.size / 2,
        )
    }
}

pub(super) fn render(state: &Board) -> PixelBuffer {
    let layout = Layout::new();
    let mut pixels = PixelBuffer::new(IMAGE_WIDTH, IMAGE_HEIGHT);
    canvas::clear(&mut pixels, BACKGROUND);

    let decided = state.winner != Cell::Empty;
    let in_play = !state.is_over();
    for (index, cell) in state.grid.iter().enumerate() {
        let (x, y) = layout.center(index);
        let (x, y) = (x as f32, y as f32);
        match cell {
            Cell::X => {
                draw_cross(&mut pixels, x + SHADOW_OFFSET, y + SHADOW_OFFSET, SHADOW_ALPHA);
                draw_cross(&mut pixels, x, y, 1.0);
            }
            Cell::O => {
                let shadow = (x + SHADOW_OFFSET, y + SHADOW_OFFSET);
                canvas::ring(&mut pixels, shadow, MARK_RADIUS, MARK_WIDTH, BLACK, SHADOW_ALPHA);
                canvas::ring(&mut pixels, (x, y), MARK_RADIUS, MARK_WIDTH, BLACK, 1.0);
            }
            Cell::Empty if in_play => {
                let (cx, cy) = layout.center(index);
                canvas::digit(&mut pixels, index as u8 + 1, (cx, cy), NUMBER_SCALE, BLACK, NUMBER_ALPHA);
            }
            Cell::Empty => {}
        }
    }

    let (ox, oy, size) = (layout.ox as f32, layout.oy as f32, layout.size as f32);
    for i in 1..3 {
        let offset = i as f32 * size;
        canvas::line(&mut pixels, (ox + offset, oy), (ox + offset, oy + 3.0 * size), GRID_WIDTH, BLACK, 1.0);
        canvas::line(&mut pixels, (ox, oy + offset), (ox + 3.0 * size, oy + offset), GRID_WIDTH, BLACK, 1.0);
    }

    if decided {
        let [first, middle, last] = state.tiles;
        let start = win_line_end(&layout, first, middle);
        let end = win_line_end(&layout, last, middle);
        canvas::line(&mut pixels, start, end, WIN_WIDTH, WIN_LINE, 1.0);
    }

    pixels
}

fn draw_cross(pixels: &mut PixelBuffer, x: f32, y: f32, alpha: f32) {
    let r = MARK_RADIUS;
    canvas::line(pixels, (x - r, y - r), (x + r, y + r), MARK_WIDTH, BLACK, alpha);
    canvas::line(pixels, (x - r, y + r), (x + r, y - r), MARK_WIDTH, BLACK, alpha);
}

/// Centre of `tile` pushed half a cell away from `middle`, so the line
/// reaches the outer edges of the winning cells.
fn win_line_end(layout: &Layout, tile: usize, middle: usize) -> (f32, f32) {
    let (x, y) = layout.center(tile);
    let dx = (tile % 3) as i32 - (middle % 3) as i32;
    let dy = (tile / 3) as i32 - (middle / 3) as i32;
    (
        (x + dx * layout.size / 2) as f32,
        (y + dy * layout.size / 2) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TurnGame;
    use crate::tictactoe::TicTacToe;

    const BG: [u8; 4] = [160, 210, 200, 255];

    #[test]
    fn layout_matches_board_geometry() {
        let layout = Layout::new();
        assert_eq!((layout.size, layout.ox, layout.oy), (100, 170, 30));
        assert_eq!(layout.center(0), (220, 80));
        assert_eq!(layout.center(4), (320, 180));
    }

    #[test]
    fn empty_board_is_opaque_with_grid() {
        let pixels = render(&TicTacToe.initial_state());
        assert_eq!((pixels.width(), pixels.height()), (640, 360));
        assert!(pixels.as_bytes().chunks_exact(4).all(|p| p[3] == 255));
        assert_eq!(pixels.pixel(0, 0), Some(BG));
        // Vertical grid line at x = 270.
        assert_eq!(pixels.pixel(270, 100), Some([0, 0, 0, 255]));
    }

    #[test]
    fn cross_is_drawn_in_its_cell() {
        let state = TicTacToe.next_state(&TicTacToe.initial_state(), "5").unwrap();
        let pixels = render(&state);
        assert_eq!(pixels.pixel(320, 180), Some([0, 0, 0, 255]));
    }

    #[test]
    fn ring_centre_stays_background() {
        let game = TicTacToe;
        let state = game.next_state(&game.initial_state(), "1").unwrap();
        let state = game.next_state(&state, "5").unwrap();
        let pixels = render(&state);
        assert_eq!(pixels.pixel(320, 180), Some(BG));
        // Right side of the ring.
        assert_eq!(pixels.pixel(340, 180), Some([0, 0, 0, 255]));
    }

    #[test]
    fn cell_numbers_only_while_in_play() {
        let game = TicTacToe;
        let open = render(&game.initial_state());
        // Middle bar of the faint "9" in the bottom-right cell.
        let faint = open.pixel(420, 280).unwrap();
        assert_ne!(faint, BG);
        assert!(faint[0] > 100, "{faint:?}");

        let won = ["1", "4", "2", "5", "3"]
            .iter()
            .fold(game.initial_state(), |s, m| game.next_state(&s, m).unwrap());
        assert!(won.is_over());
        assert_eq!(render(&won).pixel(420, 280), Some(BG));
    }

    #[test]
    fn winning_row_is_struck_through() {
        let game = TicTacToe;
        let state = ["1", "4", "2", "5", "3"]
            .iter()
            .fold(game.initial_state(), |s, m| game.next_state(&s, m).unwrap());
        let pixels = render(&state);
        // Between cells, outside the marks, on the top row's centre line.
        assert_eq!(pixels.pixel(245, 80), Some([160, 0, 0, 255]));
        // Line extends to the board edge.
        assert_eq!(pixels.pixel(172, 80), Some([160, 0, 0, 255]));
    }
}
