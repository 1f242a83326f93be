//! Format moves in western notation.
//!
//! Writing only, like [`japanese`](crate::japanese). Pieces are named
//! by their SFEN letters (`+` prefixed for promoted pieces), captures
//! use `x`, quiet moves `-`, drops `*`, and the origin square is
//! included whenever another piece of the same kind could reach the
//! destination. A trailing `+` marks promotion, `=` a declined one.
//! Two-step moves write both stops, e.g. `N7j-7ix7h`.

use crate::{m::Move, position::Position, role::Role, sfen, square::Square, variant::Variant};

fn role_letters(variant: Variant, role: Role) -> Option<String> {
    let (promoted, letter) = sfen::role_to_sfen(variant, role)?;
    let mut s = String::new();
    if promoted {
        s.push('+');
    }
    s.push(letter.to_ascii_uppercase());
    Some(s)
}

fn is_ambiguous<P: Position>(pos: &P, from: Square, to: Square) -> bool {
    let Some(piece) = pos.board().get(from) else {
        return false;
    };
    let ctx = pos.ctx();
    (pos.board().by_piece(piece).without(from))
        .into_iter()
        .any(|rival| pos.move_dests(rival, &ctx).contains(to))
}

/// Writes a move in western notation, e.g. `P-7f`, `Bx3c+`, `S6i-5h`
/// or `P*5e`. Requires the position the move is about to be played in.
/// Returns `None` if the move does not fit the position at all.
pub fn make_western_move<P: Position>(pos: &P, m: Move) -> Option<String> {
    let variant = pos.variant();
    Some(match m {
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let piece = pos.board().get(from)?;
            let mut s = role_letters(variant, piece.role)?;
            if is_ambiguous(pos, from, to) {
                s.push_str(&from.to_string());
            }
            s.push(if pos.board().has(to) { 'x' } else { '-' });
            s.push_str(&to.to_string());
            if promotion {
                s.push('+');
            } else if variant.can_promote(piece, from, to, pos.board().has(to)) {
                s.push('=');
            }
            s
        }
        Move::Lion { from, mid, to } => {
            let piece = pos.board().get(from)?;
            let mut s = role_letters(variant, piece.role)?;
            s.push_str(&from.to_string());
            s.push(if pos.board().has(mid) { 'x' } else { '-' });
            s.push_str(&mid.to_string());
            s.push(if to != from && pos.board().has(to) {
                'x'
            } else {
                '-'
            });
            s.push_str(&to.to_string());
            s
        }
        Move::Drop { role, to } => {
            format!("{}*{}", role_letters(variant, role)?, to)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        position::{FromSetup, Position, Shogi},
        usi::parse_usi,
    };

    fn shogi(s: &str) -> Shogi {
        Shogi::from_setup(sfen::parse_sfen(Variant::Standard, s).expect("valid sfen"))
            .expect("legal position")
    }

    fn western(pos: &Shogi, usi: &str) -> String {
        make_western_move(pos, parse_usi(usi).expect("valid usi")).expect("piece exists")
    }

    #[test]
    fn test_simple() {
        let pos = Shogi::default();
        assert_eq!(western(&pos, "7g7f"), "P-7f");
        assert_eq!(western(&pos, "2h5h"), "R-5h");
    }

    #[test]
    fn test_capture_and_promotion() {
        let pos = Shogi::default()
            .play(parse_usi("7g7f").unwrap())
            .and_then(|pos| pos.play(parse_usi("3c3d").unwrap()))
            .expect("legal opening");
        assert_eq!(western(&pos, "8h2b+"), "Bx2b+");
        assert_eq!(western(&pos, "8h2b"), "Bx2b=");
    }

    #[test]
    fn test_origin_when_ambiguous() {
        let pos = shogi("4k4/9/9/9/9/9/9/4G1G2/4K4 b - 1");
        assert_eq!(western(&pos, "3h4h"), "G3h-4h");
        assert_eq!(western(&pos, "5h4h"), "G5h-4h");
    }

    #[test]
    fn test_drop() {
        let pos = shogi("4k4/9/9/9/9/9/9/9/4K4 b P 1");
        assert_eq!(western(&pos, "P*5e"), "P*5e");
    }

    #[test]
    fn test_promoted_letter() {
        let pos = shogi("4k4/9/9/9/4+P4/9/9/9/4K4 b - 1");
        assert_eq!(western(&pos, "5e5d"), "+P-5d");
    }
}
