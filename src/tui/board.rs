//! Text rendering of a chess board from one side's perspective.

use crate::games::chess::{BOARD_SIZE, Board, Side};

const BORDER: &str = "  +-----------------+";
const FILES: [char; BOARD_SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Renders `board` so that `perspective`'s back rank is at the bottom.
///
/// White sees rank 8 at the top and files a..h left to right; Black sees
/// rank 1 at the top and files h..a.
pub fn render_board(board: &Board, perspective: Side) -> String {
    let (ranks, files): (Vec<usize>, Vec<usize>) = match perspective {
        Side::White => ((0..BOARD_SIZE).rev().collect(), (0..BOARD_SIZE).collect()),
        Side::Black => ((0..BOARD_SIZE).collect(), (0..BOARD_SIZE).rev().collect()),
    };

    let mut out = String::new();
    out.push_str(BORDER);
    out.push('\n');
    for &rank in &ranks {
        out.push_str(&format!("{} | ", rank + 1));
        for &file in &files {
            out.push_str(board.get(file, rank).unwrap_or("."));
            out.push(' ');
        }
        out.push_str("|\n");
    }
    out.push_str(BORDER);
    out.push('\n');

    let labels: Vec<String> = files.iter().map(|&file| FILES[file].to_string()).collect();
    out.push_str("    ");
    out.push_str(&labels.join(" "));
    out.push('\n');
    out
}
