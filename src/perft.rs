use crate::position::Position;

/// Counts legal move paths of a given length.
///
/// Paths with checkmate or stalemate are not counted unless they occur
/// in the final position. Useful for comparing, testing and debugging
/// move generation correctness and performance.
///
/// # Examples
///
/// ```
/// use banmen::{perft, Shogi};
///
/// let pos = Shogi::default();
/// assert_eq!(perft(&pos, 1), 30);
/// assert_eq!(perft(&pos, 2), 900);
/// ```
pub fn perft<P: Position + Clone>(pos: &P, depth: u32) -> u64 {
    if depth < 1 {
        1
    } else {
        let moves = pos.legal_moves();
        if depth == 1 {
            moves.len() as u64
        } else {
            moves
                .iter()
                .map(|&m| {
                    let mut child = pos.clone();
                    child.play_unchecked(m);
                    perft(&child, depth - 1)
                })
                .sum()
        }
    }
}
