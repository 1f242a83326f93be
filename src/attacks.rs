//! Attack and ray tables.
//!
//! Stepping pieces use tables precomputed per square (and per color
//! where the movement is asymmetric). Sliding pieces use hyperbola
//! quintessence on the 256-bit occupancy: intersect the occupancy with
//! a precomputed ray mask, subtract the mover's square bit from the
//! forward occupancy and from the bit-reversed occupancy, reverse the
//! second result back and xor the two. The result is the visible part
//! of the ray up to and including the first blocker in each direction,
//! in a constant number of word operations.
//!
//! # Example
//!
//! ```
//! use banmen::{attacks, Square, SquareSet};
//!
//! let occupied = SquareSet::from_rank(6); // blocking pieces
//! let sq: Square = "5i".parse()?;
//! let attacks = attacks::rook_attacks(sq, occupied);
//! assert!(attacks.contains("5h".parse()?));
//! assert!(attacks.contains("5g".parse()?)); // first blocker
//! assert!(!attacks.contains("5f".parse()?)); // behind the blocker
//! # Ok::<_, banmen::ParseSquareError>(())
//! ```

use crate::{
    color::{ByColor, Color},
    role::Role,
    square::Square,
    square_set::SquareSet,
    types::Piece,
};

// Deltas are (file, rank) steps from Sente's point of view: rank 0 is
// the far side of the board, so moving forward decreases the rank.
const KING_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const ORTHO_DELTAS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const DIAG_DELTAS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const VERTICAL_DELTAS: [(i32, i32); 2] = [(0, -1), (0, 1)];
const HORIZONTAL_DELTAS: [(i32, i32); 2] = [(-1, 0), (1, 0)];
const PAWN_DELTAS: [(i32, i32); 1] = [(0, -1)];
const KNIGHT_DELTAS: [(i32, i32); 2] = [(-1, -2), (1, -2)];
const SILVER_DELTAS: [(i32, i32); 5] = [(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const GOLD_DELTAS: [(i32, i32); 6] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const COPPER_DELTAS: [(i32, i32); 4] = [(-1, -1), (0, -1), (1, -1), (0, 1)];
const LEOPARD_DELTAS: [(i32, i32); 6] = [(-1, -1), (0, -1), (1, -1), (-1, 1), (0, 1), (1, 1)];
const ELEPHANT_DELTAS: [(i32, i32); 7] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
];
const TIGER_DELTAS: [(i32, i32); 7] = [
    (-1, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const KIRIN_DELTAS: [(i32, i32); 8] = [
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (0, -2),
    (0, 2),
    (-2, 0),
    (2, 0),
];
const PHOENIX_DELTAS: [(i32, i32); 8] = [
    (0, -1),
    (-1, 0),
    (1, 0),
    (0, 1),
    (-2, -2),
    (2, -2),
    (-2, 2),
    (2, 2),
];
const LION_DELTAS: [(i32, i32); 24] = [
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (-2, -1),
    (-1, -1),
    (0, -1),
    (1, -1),
    (2, -1),
    (-2, 0),
    (-1, 0),
    (1, 0),
    (2, 0),
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
    (2, 1),
    (-2, 2),
    (-1, 2),
    (0, 2),
    (1, 2),
    (2, 2),
];
// Lion power reaches distance two regardless of intervening pieces.
const FALCON_POWER_DELTAS: [(i32, i32); 2] = [(0, -1), (0, -2)];
const EAGLE_POWER_DELTAS: [(i32, i32); 4] = [(-1, -1), (-2, -2), (1, -1), (2, -2)];

const fn delta_walk(square: u32, occupied: SquareSet, deltas: &[(i32, i32)], flip: bool) -> SquareSet {
    let mut attack = SquareSet::EMPTY;
    let mut i = 0;
    while i < deltas.len() {
        let mut file_delta = deltas[i].0;
        let mut rank_delta = deltas[i].1;
        if flip {
            file_delta = -file_delta;
            rank_delta = -rank_delta;
        }
        let mut file = (square & 15) as i32;
        let mut rank = (square >> 4) as i32;
        loop {
            file += file_delta;
            rank += rank_delta;
            if file < 0 || file >= 16 || rank < 0 || rank >= 16 {
                break;
            }
            let sq = Square::new((file | (rank << 4)) as u32);
            attack = attack.with(sq);
            if occupied.contains(sq) {
                break;
            }
        }
        i += 1;
    }
    attack
}

const fn bootstrap_stepping(deltas: &[(i32, i32)], flip: bool) -> [SquareSet; 256] {
    let mut table = [SquareSet::EMPTY; 256];
    let mut sq = 0;
    while sq < 256 {
        // With a fully occupied board the walk stops after one step of
        // each delta, which is exactly the stepping attack set.
        table[sq as usize] = delta_walk(sq, SquareSet::FULL, deltas, flip);
        sq += 1;
    }
    table
}

const fn bootstrap_range(deltas: &[(i32, i32)]) -> [SquareSet; 256] {
    let mut table = [SquareSet::EMPTY; 256];
    let mut sq = 0;
    while sq < 256 {
        table[sq as usize] = delta_walk(sq, SquareSet::EMPTY, deltas, false);
        sq += 1;
    }
    table
}

static KING_ATTACKS: [SquareSet; 256] = bootstrap_stepping(&KING_DELTAS, false);
static ORTHO_STEPS: [SquareSet; 256] = bootstrap_stepping(&ORTHO_DELTAS, false);
static DIAG_STEPS: [SquareSet; 256] = bootstrap_stepping(&DIAG_DELTAS, false);
static VERTICAL_STEPS: [SquareSet; 256] = bootstrap_stepping(&VERTICAL_DELTAS, false);
static HORIZONTAL_STEPS: [SquareSet; 256] = bootstrap_stepping(&HORIZONTAL_DELTAS, false);
static KIRIN_ATTACKS: [SquareSet; 256] = bootstrap_stepping(&KIRIN_DELTAS, false);
static PHOENIX_ATTACKS: [SquareSet; 256] = bootstrap_stepping(&PHOENIX_DELTAS, false);
static LION_ATTACKS: [SquareSet; 256] = bootstrap_stepping(&LION_DELTAS, false);

static PAWN_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&PAWN_DELTAS, false),
    gote: bootstrap_stepping(&PAWN_DELTAS, true),
};
static KNIGHT_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&KNIGHT_DELTAS, false),
    gote: bootstrap_stepping(&KNIGHT_DELTAS, true),
};
static SILVER_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&SILVER_DELTAS, false),
    gote: bootstrap_stepping(&SILVER_DELTAS, true),
};
static GOLD_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&GOLD_DELTAS, false),
    gote: bootstrap_stepping(&GOLD_DELTAS, true),
};
static COPPER_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&COPPER_DELTAS, false),
    gote: bootstrap_stepping(&COPPER_DELTAS, true),
};
static LEOPARD_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&LEOPARD_DELTAS, false),
    gote: bootstrap_stepping(&LEOPARD_DELTAS, true),
};
static ELEPHANT_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&ELEPHANT_DELTAS, false),
    gote: bootstrap_stepping(&ELEPHANT_DELTAS, true),
};
static TIGER_ATTACKS: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&TIGER_DELTAS, false),
    gote: bootstrap_stepping(&TIGER_DELTAS, true),
};
static FALCON_POWER: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&FALCON_POWER_DELTAS, false),
    gote: bootstrap_stepping(&FALCON_POWER_DELTAS, true),
};
static EAGLE_POWER: ByColor<[SquareSet; 256]> = ByColor {
    sente: bootstrap_stepping(&EAGLE_POWER_DELTAS, false),
    gote: bootstrap_stepping(&EAGLE_POWER_DELTAS, true),
};

static FILE_RANGE: [SquareSet; 256] = bootstrap_range(&VERTICAL_DELTAS);
static RANK_RANGE: [SquareSet; 256] = bootstrap_range(&HORIZONTAL_DELTAS);
static DIAG_RANGE: [SquareSet; 256] = bootstrap_range(&[(-1, -1), (1, 1)]);
static ANTI_DIAG_RANGE: [SquareSet; 256] = bootstrap_range(&[(1, -1), (-1, 1)]);

const fn bootstrap_forward_ranks(gote: bool) -> [SquareSet; 16] {
    let mut table = [SquareSet::EMPTY; 16];
    let mut rank = 0;
    while rank < 16 {
        let ahead = SquareSet::first_ranks(rank);
        table[rank as usize] = if gote {
            SquareSet::first_ranks(rank + 1).complement()
        } else {
            ahead
        };
        rank += 1;
    }
    table
}

static FORWARD_RANKS: ByColor<[SquareSet; 16]> = ByColor {
    sente: bootstrap_forward_ranks(false),
    gote: bootstrap_forward_ranks(true),
};

/// All squares on ranks strictly ahead of `rank` from the point of view
/// of `color`.
#[inline]
pub fn forward_ranks(color: Color, rank: u32) -> SquareSet {
    FORWARD_RANKS.get(color)[(rank & 15) as usize]
}

#[inline]
fn backward_ranks(color: Color, rank: u32) -> SquareSet {
    forward_ranks(!color, rank)
}

fn hyperbola(bit: SquareSet, range: SquareSet, occupied: SquareSet) -> SquareSet {
    let mut forward = occupied & range;
    let mut reverse = forward.rotate_180();
    forward = forward.minus(bit);
    reverse = reverse.minus(bit.rotate_180());
    (forward ^ reverse.rotate_180()) & range
}

/// Looks up attacks along the file of `sq` with `occupied` squares.
pub fn file_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    // A file ray has at most one square per rank, so the cheaper
    // rank-order swap can stand in for the full bit reversal.
    let bit = SquareSet::from_square(sq);
    let range = FILE_RANGE[sq.to_usize()];
    let mut forward = occupied & range;
    let mut reverse = forward.flip_vertical();
    forward = forward.minus(bit);
    reverse = reverse.minus(bit.flip_vertical());
    (forward ^ reverse.flip_vertical()) & range
}

/// Looks up attacks along the rank of `sq` with `occupied` squares.
pub fn rank_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    hyperbola(SquareSet::from_square(sq), RANK_RANGE[sq.to_usize()], occupied)
}

fn diag_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    hyperbola(SquareSet::from_square(sq), DIAG_RANGE[sq.to_usize()], occupied)
}

fn anti_diag_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    hyperbola(SquareSet::from_square(sq), ANTI_DIAG_RANGE[sq.to_usize()], occupied)
}

/// Looks up attacks for a pawn of `color` on `sq`.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> SquareSet {
    PAWN_ATTACKS.get(color)[sq.to_usize()]
}

/// Looks up attacks for a knight of `color` on `sq`.
#[inline]
pub fn knight_attacks(color: Color, sq: Square) -> SquareSet {
    KNIGHT_ATTACKS.get(color)[sq.to_usize()]
}

/// Looks up attacks for a silver general of `color` on `sq`.
#[inline]
pub fn silver_attacks(color: Color, sq: Square) -> SquareSet {
    SILVER_ATTACKS.get(color)[sq.to_usize()]
}

/// Looks up attacks for a gold general of `color` on `sq`. Also used by
/// every gold-moving promoted piece.
#[inline]
pub fn gold_attacks(color: Color, sq: Square) -> SquareSet {
    GOLD_ATTACKS.get(color)[sq.to_usize()]
}

/// Looks up attacks for a king on `sq`.
#[inline]
pub fn king_attacks(sq: Square) -> SquareSet {
    KING_ATTACKS[sq.to_usize()]
}

#[inline]
pub fn copper_attacks(color: Color, sq: Square) -> SquareSet {
    COPPER_ATTACKS.get(color)[sq.to_usize()]
}

#[inline]
pub fn leopard_attacks(color: Color, sq: Square) -> SquareSet {
    LEOPARD_ATTACKS.get(color)[sq.to_usize()]
}

#[inline]
pub fn elephant_attacks(color: Color, sq: Square) -> SquareSet {
    ELEPHANT_ATTACKS.get(color)[sq.to_usize()]
}

#[inline]
pub fn tiger_attacks(color: Color, sq: Square) -> SquareSet {
    TIGER_ATTACKS.get(color)[sq.to_usize()]
}

#[inline]
pub fn go_between_attacks(sq: Square) -> SquareSet {
    VERTICAL_STEPS[sq.to_usize()]
}

#[inline]
pub fn kirin_attacks(sq: Square) -> SquareSet {
    KIRIN_ATTACKS[sq.to_usize()]
}

#[inline]
pub fn phoenix_attacks(sq: Square) -> SquareSet {
    PHOENIX_ATTACKS[sq.to_usize()]
}

/// Looks up attacks for a lion on `sq`: every square within Chebyshev
/// distance two, regardless of occupancy.
#[inline]
pub fn lion_attacks(sq: Square) -> SquareSet {
    LION_ATTACKS[sq.to_usize()]
}

/// Looks up attacks for a lance of `color` on `sq` with `occupied`
/// squares.
pub fn lance_attacks(color: Color, sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) & forward_ranks(color, sq.rank())
}

/// Looks up attacks for a bishop on `sq` with `occupied` squares.
pub fn bishop_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    diag_attacks(sq, occupied) | anti_diag_attacks(sq, occupied)
}

/// Looks up attacks for a rook on `sq` with `occupied` squares.
pub fn rook_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | rank_attacks(sq, occupied)
}

/// Looks up attacks for a queen (free king) on `sq` with `occupied`
/// squares.
pub fn queen_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Looks up attacks for a horse (promoted bishop) on `sq`.
pub fn horse_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupied) | ORTHO_STEPS[sq.to_usize()]
}

/// Looks up attacks for a dragon (promoted rook) on `sq`.
pub fn dragon_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    rook_attacks(sq, occupied) | DIAG_STEPS[sq.to_usize()]
}

/// Looks up attacks for a reverse chariot on `sq`.
pub fn chariot_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied)
}

/// Looks up attacks for a side mover on `sq`.
pub fn side_mover_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    rank_attacks(sq, occupied) | VERTICAL_STEPS[sq.to_usize()]
}

/// Looks up attacks for a vertical mover on `sq`.
pub fn vertical_mover_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | HORIZONTAL_STEPS[sq.to_usize()]
}

/// Looks up attacks for a white horse (promoted lance) of `color` on
/// `sq`.
pub fn white_horse_attacks(color: Color, sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | (bishop_attacks(sq, occupied) & forward_ranks(color, sq.rank()))
}

/// Looks up attacks for a whale (promoted reverse chariot) of `color`
/// on `sq`.
pub fn whale_attacks(color: Color, sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | (bishop_attacks(sq, occupied) & backward_ranks(color, sq.rank()))
}

/// Looks up attacks for a flying stag (promoted blind tiger) on `sq`.
pub fn stag_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | KING_ATTACKS[sq.to_usize()]
}

/// Looks up attacks for a free boar (promoted side mover) on `sq`.
pub fn boar_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    rank_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Looks up attacks for a flying ox (promoted vertical mover) on `sq`.
pub fn ox_attacks(sq: Square, occupied: SquareSet) -> SquareSet {
    file_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Looks up attacks for a horned falcon of `color` on `sq`: full slides
/// everywhere but straight ahead, where it has lion power limited to
/// distance two.
pub fn falcon_attacks(color: Color, sq: Square, occupied: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupied)
        | rank_attacks(sq, occupied)
        | (file_attacks(sq, occupied) & backward_ranks(color, sq.rank()))
        | FALCON_POWER.get(color)[sq.to_usize()]
}

/// Looks up attacks for a soaring eagle of `color` on `sq`: rook slides
/// plus backward diagonals, with lion power limited to distance two on
/// the forward diagonals.
pub fn eagle_attacks(color: Color, sq: Square, occupied: SquareSet) -> SquareSet {
    rook_attacks(sq, occupied)
        | (bishop_attacks(sq, occupied) & backward_ranks(color, sq.rank()))
        | EAGLE_POWER.get(color)[sq.to_usize()]
}

/// Looks up the squares threatened by `piece` on `sq` with `occupied`
/// squares. Squares reached by lion power are included regardless of
/// occupancy.
pub fn attacks(piece: Piece, sq: Square, occupied: SquareSet) -> SquareSet {
    let Piece { color, role } = piece;
    match role {
        Role::Pawn => pawn_attacks(color, sq),
        Role::Lance => lance_attacks(color, sq, occupied),
        Role::Knight => knight_attacks(color, sq),
        Role::Silver => silver_attacks(color, sq),
        Role::Gold
        | Role::Tokin
        | Role::PromotedLance
        | Role::PromotedKnight
        | Role::PromotedSilver => gold_attacks(color, sq),
        Role::King | Role::Prince => king_attacks(sq),
        Role::Bishop | Role::BishopPromoted => bishop_attacks(sq, occupied),
        Role::Rook | Role::RookPromoted => rook_attacks(sq, occupied),
        Role::Horse | Role::HorsePromoted => horse_attacks(sq, occupied),
        Role::Dragon | Role::DragonPromoted => dragon_attacks(sq, occupied),
        Role::GoBetween => go_between_attacks(sq),
        Role::Copper => copper_attacks(color, sq),
        Role::Leopard => leopard_attacks(color, sq),
        Role::Elephant | Role::ElephantPromoted => elephant_attacks(color, sq),
        Role::Tiger => tiger_attacks(color, sq),
        Role::Kirin => kirin_attacks(sq),
        Role::Phoenix => phoenix_attacks(sq),
        Role::Chariot => chariot_attacks(sq, occupied),
        Role::SideMover | Role::SideMoverPromoted => side_mover_attacks(sq, occupied),
        Role::VerticalMover | Role::VerticalMoverPromoted => vertical_mover_attacks(sq, occupied),
        Role::Queen | Role::QueenPromoted => queen_attacks(sq, occupied),
        Role::Lion | Role::LionPromoted => lion_attacks(sq),
        Role::WhiteHorse => white_horse_attacks(color, sq, occupied),
        Role::Whale => whale_attacks(color, sq, occupied),
        Role::Stag => stag_attacks(sq, occupied),
        Role::Boar => boar_attacks(sq, occupied),
        Role::Ox => ox_attacks(sq, occupied),
        Role::Falcon => falcon_attacks(color, sq, occupied),
        Role::Eagle => eagle_attacks(color, sq, occupied),
    }
}

/// The four diagonal neighbour squares.
#[inline]
pub(crate) fn diag_steps(sq: Square) -> SquareSet {
    DIAG_STEPS[sq.to_usize()]
}

/// The sliding rays of `piece` on an otherwise empty board, used to
/// find potential pinners. Step moves and lion power are excluded.
pub(crate) fn sniper_rays(piece: Piece, sq: Square) -> SquareSet {
    let Piece { color, role } = piece;
    let empty = SquareSet::EMPTY;
    match role {
        Role::Lance => lance_attacks(color, sq, empty),
        Role::Bishop | Role::BishopPromoted | Role::Horse | Role::HorsePromoted => {
            bishop_attacks(sq, empty)
        }
        Role::Rook | Role::RookPromoted | Role::Dragon | Role::DragonPromoted => {
            rook_attacks(sq, empty)
        }
        Role::Queen | Role::QueenPromoted => queen_attacks(sq, empty),
        Role::Chariot => chariot_attacks(sq, empty),
        Role::SideMover | Role::SideMoverPromoted => rank_attacks(sq, empty),
        Role::VerticalMover | Role::VerticalMoverPromoted | Role::Stag => file_attacks(sq, empty),
        Role::WhiteHorse => white_horse_attacks(color, sq, empty),
        Role::Whale => whale_attacks(color, sq, empty),
        Role::Boar => boar_attacks(sq, empty),
        Role::Ox => ox_attacks(sq, empty),
        Role::Falcon => {
            bishop_attacks(sq, empty)
                | rank_attacks(sq, empty)
                | (file_attacks(sq, empty) & backward_ranks(color, sq.rank()))
        }
        Role::Eagle => {
            rook_attacks(sq, empty) | (bishop_attacks(sq, empty) & backward_ranks(color, sq.rank()))
        }
        _ => SquareSet::EMPTY,
    }
}

/// The file, rank or diagonal with the two squares (or an empty set if
/// they are not aligned).
pub fn ray(a: Square, b: Square) -> SquareSet {
    if a == b {
        SquareSet::EMPTY
    } else if a.file() == b.file() {
        FILE_RANGE[a.to_usize()].with(a)
    } else if a.rank() == b.rank() {
        RANK_RANGE[a.to_usize()].with(a)
    } else if a.file() as i32 - a.rank() as i32 == b.file() as i32 - b.rank() as i32 {
        DIAG_RANGE[a.to_usize()].with(a)
    } else if a.file() + a.rank() == b.file() + b.rank() {
        ANTI_DIAG_RANGE[a.to_usize()].with(a)
    } else {
        SquareSet::EMPTY
    }
}

/// The squares between the two squares (bounds not included), or an
/// empty set if they are not on the same file, rank or diagonal.
pub fn between(a: Square, b: Square) -> SquareSet {
    let line = ray(a, b);
    if line.is_empty() {
        return SquareSet::EMPTY;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    line & (SquareSet::FULL << (lo.index() + 1)) & !(SquareSet::FULL << hi.index())
}

/// Tests if all three squares are aligned on a file, rank or diagonal.
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    ray(a, b).contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_pawn_attacks() {
        assert_eq!(
            pawn_attacks(Color::Sente, sq("7g")),
            SquareSet::from_square(sq("7f"))
        );
        assert_eq!(
            pawn_attacks(Color::Gote, sq("7c")),
            SquareSet::from_square(sq("7d"))
        );
        // Off the far edge there is nothing to attack.
        assert_eq!(pawn_attacks(Color::Sente, sq("7a")), SquareSet::EMPTY);
    }

    #[test]
    fn test_knight_attacks() {
        assert_eq!(
            knight_attacks(Color::Sente, sq("5e")),
            SquareSet::from_square(sq("4c")).with(sq("6c"))
        );
        assert_eq!(
            knight_attacks(Color::Gote, sq("5e")),
            SquareSet::from_square(sq("4g")).with(sq("6g"))
        );
        // No wrap-around at the board edge.
        assert_eq!(
            knight_attacks(Color::Sente, sq("1e")),
            SquareSet::from_square(sq("2c"))
        );
    }

    #[test]
    fn test_lance_attacks() {
        let occupied = SquareSet::from_square(sq("5c"));
        let attacks = lance_attacks(Color::Sente, sq("5g"), occupied);
        assert!(attacks.contains(sq("5f")));
        assert!(attacks.contains(sq("5c")));
        assert!(!attacks.contains(sq("5b")));
        assert!(!attacks.contains(sq("5h")));
    }

    #[test]
    fn test_rook_attacks_blocked() {
        let occupied = SquareSet::from_square(sq("5e")).with(sq("2h")).with(sq("8h"));
        let attacks = rook_attacks(sq("5h"), occupied);
        assert!(attacks.contains(sq("5e")));
        assert!(!attacks.contains(sq("5d")));
        assert!(attacks.contains(sq("2h")));
        assert!(!attacks.contains(sq("1h")));
        assert!(attacks.contains(sq("8h")));
        assert!(!attacks.contains(sq("9h")));
        assert!(attacks.contains(sq("5i")));
    }

    #[test]
    fn test_bishop_attacks_blocked() {
        let occupied = SquareSet::from_square(sq("3c"));
        let attacks = bishop_attacks(sq("5e"), occupied);
        assert!(attacks.contains(sq("4d")));
        assert!(attacks.contains(sq("3c")));
        assert!(!attacks.contains(sq("2b")));
        assert!(attacks.contains(sq("6d")));
        assert!(attacks.contains(sq("6f")));
        assert!(attacks.contains(sq("4f")));
    }

    #[test]
    fn test_lion_attacks() {
        let attacks = lion_attacks(sq("5e"));
        assert_eq!(attacks.count(), 24);
        assert!(attacks.contains(sq("3c")));
        assert!(attacks.contains(sq("5d")));
        assert!(!attacks.contains(sq("5e")));
        assert!(!attacks.contains(sq("8e")));
    }

    #[test]
    fn test_falcon_power_jumps_blockers() {
        // The two squares straight ahead are attacked even if the first
        // one is occupied.
        let occupied = SquareSet::from_square(sq("5d"));
        let attacks = falcon_attacks(Color::Sente, sq("5e"), occupied);
        assert!(attacks.contains(sq("5d")));
        assert!(attacks.contains(sq("5c")));
        assert!(!attacks.contains(sq("5b")));
        // Backwards it slides like a rook.
        assert!(attacks.contains(sq("5i")));
    }

    #[test]
    fn test_eagle_attacks() {
        let attacks = eagle_attacks(Color::Sente, sq("5e"), SquareSet::EMPTY);
        assert!(attacks.contains(sq("5a")));
        assert!(attacks.contains(sq("4d")));
        assert!(attacks.contains(sq("3c")));
        assert!(!attacks.contains(sq("2b")));
        assert!(attacks.contains(sq("9i")));
    }

    #[test]
    fn test_ray_and_between() {
        assert!(ray(sq("1a"), sq("1i")).contains(sq("1e")));
        assert!(ray(sq("1a"), sq("9i")).contains(sq("5e")));
        assert_eq!(ray(sq("1a"), sq("2c")), SquareSet::EMPTY);
        assert_eq!(
            between(sq("5e"), sq("5h")),
            SquareSet::from_square(sq("5f")).with(sq("5g"))
        );
        assert_eq!(
            between(sq("9i"), sq("6f")),
            SquareSet::from_square(sq("8h")).with(sq("7g"))
        );
        assert_eq!(between(sq("5e"), sq("5f")), SquareSet::EMPTY);
        assert!(aligned(sq("9a"), sq("8b"), sq("7c")));
        assert!(!aligned(sq("9a"), sq("8b"), sq("7d")));
    }

    #[test]
    fn test_attack_symmetry() {
        // If a piece on `a` attacks `b`, the same piece of the other
        // color on `b` attacks `a`. The attackers computation relies on
        // this reflection.
        for role in Role::ALL {
            for a in SquareSet::board_area(12, 12) {
                let from_a = attacks(role.of(Color::Sente), a, SquareSet::EMPTY);
                for b in from_a & SquareSet::board_area(12, 12) {
                    assert!(
                        attacks(role.of(Color::Gote), b, SquareSet::EMPTY).contains(a),
                        "{role:?} on {a} attacks {b}, but not mirrored"
                    );
                }
            }
        }
    }
}
