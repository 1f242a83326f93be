//! Format moves in Japanese notation, with disambiguation glyphs.
//!
//! Writing only: game records are parsed via [`kif`](crate::kif) or
//! [`usi`](crate::usi), which carry the origin square explicitly.
//!
//! When several pieces of the same kind could reach the destination,
//! the mover is qualified by a motion glyph if its motion is unique
//! (`上` advancing, `引` retreating, `寄` sideways), and otherwise by a
//! side glyph seen from the moving player (`右`/`中`/`左`), with `直`
//! for a general stepping straight forward. A lion-class piece jumping
//! two squares gets `跳`; its two-step moves spell out both stops.

use crate::{
    color::Color,
    kif,
    m::Move,
    position::Position,
    role::Role,
    square::Square,
    square_set::SquareSet,
    types::Piece,
    variant::Variant,
};

/// Short-range generals that take the `直` glyph when stepping straight
/// forward.
fn is_general(role: Role) -> bool {
    matches!(
        role,
        Role::Gold
            | Role::Silver
            | Role::Tokin
            | Role::PromotedLance
            | Role::PromotedKnight
            | Role::PromotedSilver
            | Role::Copper
            | Role::Leopard
            | Role::Elephant
            | Role::ElephantPromoted
            | Role::Tiger
    )
}

/// The file as seen from the moving player, so that smaller is further
/// to the player's right.
fn relative_file(piece: Piece, sq: Square) -> i32 {
    match piece.color {
        Color::Sente => sq.file() as i32,
        Color::Gote => -(sq.file() as i32),
    }
}

fn motion_glyph(variant: Variant, piece: Piece, from: Square, to: Square) -> char {
    let before = variant.relative_rank(piece.color, from);
    let after = variant.relative_rank(piece.color, to);
    if after < before {
        '上'
    } else if after > before {
        '引'
    } else {
        '寄'
    }
}

fn disambiguation<P: Position>(pos: &P, piece: Piece, from: Square, to: Square) -> String {
    let ctx = pos.ctx();
    let mut others = SquareSet::EMPTY;
    for rival in pos.board().by_piece(piece).without(from) {
        if pos.move_dests(rival, &ctx).contains(to) {
            others.add(rival);
        }
    }
    if others.is_empty() {
        return String::new();
    }

    let variant = pos.variant();
    let forward = piece.color.fold(-16, 16);
    if from.offset(forward) == Some(to) && is_general(piece.role) {
        return "直".to_owned();
    }

    let my_motion = motion_glyph(variant, piece, from, to);
    let same_motion: Vec<Square> = others
        .into_iter()
        .filter(|&rival| motion_glyph(variant, piece, rival, to) == my_motion)
        .collect();
    if same_motion.is_empty() {
        return my_motion.to_string();
    }

    let mine = relative_file(piece, from);
    if same_motion
        .iter()
        .all(|&rival| mine < relative_file(piece, rival))
    {
        "右".to_owned()
    } else if same_motion
        .iter()
        .all(|&rival| mine > relative_file(piece, rival))
    {
        "左".to_owned()
    } else {
        "中".to_owned()
    }
}

/// Writes a move in Japanese notation, e.g. `７六歩`, `４八金左`,
/// `２二歩成` or `５七金打`. Requires the position the move is about to
/// be played in. Returns `None` if the move does not fit the position
/// at all (no piece on the origin square).
pub fn make_japanese_move<P: Position>(pos: &P, m: Move) -> Option<String> {
    let variant = pos.variant();
    Some(match m {
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let piece = pos.board().get(from)?;
            let mut s = if pos.last_move().map(Move::to) == Some(to) {
                "同　".to_owned()
            } else {
                kif::kif_square(to)
            };
            s.push_str(kif::role_kanji_move(variant, piece.role)?);
            if piece.role.is_lion() && from.distance(to) == 2 {
                s.push('跳');
            }
            s.push_str(&disambiguation(pos, piece, from, to));
            if promotion {
                s.push('成');
            } else if variant.can_promote(piece, from, to, pos.board().has(to)) {
                s.push_str("不成");
            }
            s
        }
        Move::Lion { from, mid, to } => {
            let piece = pos.board().get(from)?;
            format!(
                "{}・{}{}",
                kif::kif_square(mid),
                kif::kif_square(to),
                kif::role_kanji_move(variant, piece.role)?,
            )
        }
        Move::Drop { role, to } => {
            let piece = role.of(pos.turn());
            let mut s = kif::kif_square(to);
            s.push_str(kif::role_kanji_move(variant, role)?);
            // 打 only when a board piece of the same kind could also
            // move there.
            let ctx = pos.ctx();
            let ambiguous = pos
                .board()
                .by_piece(piece)
                .into_iter()
                .any(|from| pos.move_dests(from, &ctx).contains(to));
            if ambiguous {
                s.push('打');
            }
            s
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        position::{FromSetup, Shogi},
        sfen,
        usi::parse_usi,
    };

    fn shogi(s: &str) -> Shogi {
        Shogi::from_setup(sfen::parse_sfen(Variant::Standard, s).expect("valid sfen"))
            .expect("legal position")
    }

    fn japanese(pos: &Shogi, usi: &str) -> String {
        make_japanese_move(pos, parse_usi(usi).expect("valid usi")).expect("piece exists")
    }

    #[test]
    fn test_simple_moves() {
        let pos = Shogi::default();
        assert_eq!(japanese(&pos, "7g7f"), "７六歩");
        assert_eq!(japanese(&pos, "2h5h"), "５八飛");
    }

    #[test]
    fn test_side_disambiguation() {
        // Two golds flanking the destination, both moving sideways.
        // Sides are seen from the moving player: file 3 is on Sente's
        // right.
        let pos = shogi("4k4/9/9/9/9/9/9/4G1G2/4K4 b - 1");
        assert_eq!(japanese(&pos, "3h4h"), "４八金右");
        assert_eq!(japanese(&pos, "5h4h"), "４八金左");
    }

    #[test]
    fn test_straight_forward() {
        let pos = shogi("4k4/9/9/9/9/9/3SS4/9/4K4 b - 1");
        assert_eq!(japanese(&pos, "5g5f"), "５六銀直");
        assert_eq!(japanese(&pos, "6g5f"), "５六銀左");
    }

    #[test]
    fn test_motion_disambiguation() {
        // Two rooks on one file: side glyphs cannot help, motion can.
        let pos = shogi("4k4/9/4R4/9/4R4/9/9/9/4K4 b - 1");
        assert_eq!(japanese(&pos, "5e5d"), "５四飛上");
        assert_eq!(japanese(&pos, "5c5d"), "５四飛引");
        // Two rooks on one rank move sideways alike: back to sides.
        let pos = shogi("4k4/9/9/9/R7R/9/9/9/4K4 b - 1");
        assert_eq!(japanese(&pos, "1e5e"), "５五飛右");
        assert_eq!(japanese(&pos, "9e5e"), "５五飛左");
    }

    #[test]
    fn test_sideways() {
        // A gold stepping sideways while its rival advances gets 寄.
        let pos = shogi("4k4/9/9/9/9/9/9/3G5/4GK3 b - 1");
        assert_eq!(japanese(&pos, "6h5h"), "５八金寄");
        assert_eq!(japanese(&pos, "5i5h"), "５八金直");
    }

    #[test]
    fn test_gote_perspective() {
        // 右 and 左 flip with the moving player.
        let pos = shogi("4k4/4g1g2/9/9/9/9/9/9/4K4 w - 1");
        assert_eq!(japanese(&pos, "3b4b"), "４二金左");
        assert_eq!(japanese(&pos, "5b4b"), "４二金右");
    }

    #[test]
    fn test_promotion_suffixes() {
        let pos = shogi("4k4/9/7P1/9/9/9/9/9/4K4 b - 1");
        assert_eq!(japanese(&pos, "2c2b+"), "２二歩成");
        assert_eq!(japanese(&pos, "2c2b"), "２二歩不成");
    }

    #[test]
    fn test_drop_marker() {
        // With a gold in hand and one on the board able to reach the
        // square, the drop needs 打.
        let pos = shogi("4k4/9/9/9/9/9/9/4G4/4K4 b G 1");
        assert_eq!(japanese(&pos, "G*5g"), "５七金打");
        // Nothing else reaches 1c; no marker.
        assert_eq!(japanese(&pos, "G*1c"), "１三金");
    }

    #[test]
    fn test_same_destination() {
        let pos = Shogi::default()
            .play(parse_usi("7g7f").unwrap())
            .and_then(|pos| pos.play(parse_usi("3c3d").unwrap()))
            .and_then(|pos| pos.play(parse_usi("8h3c+").unwrap()))
            .expect("legal opening");
        assert_eq!(japanese(&pos, "2b3c"), "同　銀");
    }
}
