//! Parse and write SFEN, the compact position notation of the USI
//! protocol.
//!
//! # Examples
//!
//! ```
//! use banmen::{sfen, FromSetup, Shogi, Variant, Position};
//!
//! let setup = sfen::parse_sfen(Variant::Standard, Variant::Standard.initial_sfen())?;
//! let pos = Shogi::from_setup(setup).expect("legal setup");
//! assert_eq!(sfen::make_sfen(&pos), Variant::Standard.initial_sfen());
//! # Ok::<_, sfen::SfenError>(())
//! ```

use std::{error::Error, fmt, num::NonZeroU32};

use crate::{
    board::Board,
    color::{ByColor, Color},
    hand::Hand,
    position::Position,
    role::Role,
    setup::Setup,
    square::Square,
    variant::Variant,
};

/// Errors that can occur when parsing an SFEN.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SfenError {
    /// The board part has the wrong number of rows or columns.
    InvalidBoard,
    /// A piece glyph does not exist in the variant.
    InvalidPiece,
    /// The hand section is malformed or holds impossible pieces.
    InvalidHands,
    /// The side to move is neither `b` nor `w`.
    InvalidTurn,
    /// The move number is not a number.
    InvalidMoveNumber,
    /// The chushogi lion-capture square is not a valid square.
    InvalidLionCapture,
}

impl fmt::Display for SfenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SfenError::InvalidBoard => "invalid sfen board",
            SfenError::InvalidPiece => "invalid piece in sfen",
            SfenError::InvalidHands => "invalid hands in sfen",
            SfenError::InvalidTurn => "invalid side to move in sfen",
            SfenError::InvalidMoveNumber => "invalid move number in sfen",
            SfenError::InvalidLionCapture => "invalid lion capture square in sfen",
        })
    }
}

impl Error for SfenError {}

/// The SFEN letter of a role in the given variant, with a flag for the
/// `+` promotion prefix. Lowercase; uppercased for Sente pieces.
pub(crate) fn role_to_sfen(variant: Variant, role: Role) -> Option<(bool, char)> {
    Some(match variant {
        Variant::Standard | Variant::Minishogi => match role {
            Role::Pawn => (false, 'p'),
            Role::Lance => (false, 'l'),
            Role::Knight => (false, 'n'),
            Role::Silver => (false, 's'),
            Role::Gold => (false, 'g'),
            Role::King => (false, 'k'),
            Role::Bishop => (false, 'b'),
            Role::Rook => (false, 'r'),
            Role::Tokin => (true, 'p'),
            Role::PromotedLance => (true, 'l'),
            Role::PromotedKnight => (true, 'n'),
            Role::PromotedSilver => (true, 's'),
            Role::Horse => (true, 'b'),
            Role::Dragon => (true, 'r'),
            _ => return None,
        },
        Variant::Chushogi => match role {
            Role::Pawn => (false, 'p'),
            Role::GoBetween => (false, 'i'),
            Role::Lance => (false, 'l'),
            Role::Chariot => (false, 'a'),
            Role::Copper => (false, 'c'),
            Role::Silver => (false, 's'),
            Role::Gold => (false, 'g'),
            Role::Leopard => (false, 'f'),
            Role::Tiger => (false, 't'),
            Role::Elephant => (false, 'e'),
            Role::Phoenix => (false, 'x'),
            Role::Kirin => (false, 'o'),
            Role::SideMover => (false, 'm'),
            Role::VerticalMover => (false, 'v'),
            Role::Bishop => (false, 'b'),
            Role::Rook => (false, 'r'),
            Role::Horse => (false, 'h'),
            Role::Dragon => (false, 'd'),
            Role::Queen => (false, 'q'),
            Role::Lion => (false, 'n'),
            Role::King => (false, 'k'),
            Role::Tokin => (true, 'p'),
            Role::ElephantPromoted => (true, 'i'),
            Role::WhiteHorse => (true, 'l'),
            Role::Whale => (true, 'a'),
            Role::SideMoverPromoted => (true, 'c'),
            Role::VerticalMoverPromoted => (true, 's'),
            Role::RookPromoted => (true, 'g'),
            Role::BishopPromoted => (true, 'f'),
            Role::Stag => (true, 't'),
            Role::Prince => (true, 'e'),
            Role::QueenPromoted => (true, 'x'),
            Role::LionPromoted => (true, 'o'),
            Role::Boar => (true, 'm'),
            Role::Ox => (true, 'v'),
            Role::HorsePromoted => (true, 'b'),
            Role::DragonPromoted => (true, 'r'),
            Role::Falcon => (true, 'h'),
            Role::Eagle => (true, 'd'),
            _ => return None,
        },
    })
}

/// The role for a lowercase SFEN letter in the given variant.
pub(crate) fn role_from_sfen(variant: Variant, promoted: bool, ch: char) -> Option<Role> {
    variant
        .roles()
        .iter()
        .copied()
        .find(|&role| role_to_sfen(variant, role) == Some((promoted, ch)))
}

fn parse_board(variant: Variant, part: &str) -> Result<Board, SfenError> {
    let ranks = variant.ranks();
    let files = variant.files();
    let mut board = Board::empty();
    let mut rows = 0;
    for (rank, row) in part.split('/').enumerate() {
        rows += 1;
        if rank as u32 >= ranks {
            return Err(SfenError::InvalidBoard);
        }
        let mut file = files as i32;
        let mut chars = row.chars().peekable();
        while let Some(ch) = chars.next() {
            if let Some(digit) = ch.to_digit(10) {
                let mut skip = digit;
                if let Some(more) = chars.peek().and_then(|next| next.to_digit(10)) {
                    chars.next();
                    skip = skip * 10 + more;
                }
                file -= skip as i32;
            } else {
                let promoted = ch == '+';
                let letter = if promoted {
                    chars.next().ok_or(SfenError::InvalidPiece)?
                } else {
                    ch
                };
                let color = Color::from_sente(letter.is_ascii_uppercase());
                let role = role_from_sfen(variant, promoted, letter.to_ascii_lowercase())
                    .ok_or(SfenError::InvalidPiece)?;
                file -= 1;
                let sq = u32::try_from(file)
                    .ok()
                    .and_then(|file| Square::from_coords(file, rank as u32))
                    .ok_or(SfenError::InvalidBoard)?;
                board.set(sq, role.of(color));
            }
            if file < 0 {
                return Err(SfenError::InvalidBoard);
            }
        }
        if file != 0 {
            return Err(SfenError::InvalidBoard);
        }
    }
    if rows != ranks {
        return Err(SfenError::InvalidBoard);
    }
    Ok(board)
}

fn parse_hands(variant: Variant, part: &str) -> Result<ByColor<Hand>, SfenError> {
    let mut hands = ByColor::<Hand>::default();
    if part == "-" {
        return Ok(hands);
    }
    let mut count: u32 = 0;
    for ch in part.chars() {
        if let Some(digit) = ch.to_digit(10) {
            count = count * 10 + digit;
            if count > 255 {
                return Err(SfenError::InvalidHands);
            }
        } else {
            let color = Color::from_sente(ch.is_ascii_uppercase());
            let role = role_from_sfen(variant, false, ch.to_ascii_lowercase())
                .ok_or(SfenError::InvalidHands)?;
            if !variant.hand_roles().contains(&role) {
                return Err(SfenError::InvalidHands);
            }
            let n = if count == 0 { 1 } else { count };
            let hand = hands.get_mut(color);
            hand.set(role, hand.get(role).saturating_add(n as u8));
            count = 0;
        }
    }
    if count != 0 {
        return Err(SfenError::InvalidHands);
    }
    Ok(hands)
}

/// Parses an SFEN for the given variant into a raw [`Setup`].
///
/// In chushogi the third field holds the square of the last lion
/// capture instead of the hands.
///
/// # Errors
///
/// Returns [`SfenError`] for syntactically invalid input. Semantic
/// validity is checked separately by
/// [`FromSetup`](crate::FromSetup::from_setup).
pub fn parse_sfen(variant: Variant, sfen: &str) -> Result<Setup, SfenError> {
    let mut setup = Setup::empty();
    let mut parts = sfen.split(' ').filter(|part| !part.is_empty());

    setup.board = parse_board(variant, parts.next().unwrap_or(""))?;

    setup.turn = match parts.next() {
        None => Color::Sente,
        Some(part) => {
            let mut chars = part.chars();
            match (chars.next().and_then(Color::from_char), chars.next()) {
                (Some(color), None) => color,
                _ => return Err(SfenError::InvalidTurn),
            }
        }
    };

    match parts.next() {
        None | Some("-") => (),
        Some(part) => {
            if variant == Variant::Chushogi {
                let sq: Square = part.parse().map_err(|_| SfenError::InvalidLionCapture)?;
                if !variant.area().contains(sq) {
                    return Err(SfenError::InvalidLionCapture);
                }
                setup.last_lion_capture = Some(sq);
            } else {
                setup.hands = parse_hands(variant, part)?;
            }
        }
    }

    if let Some(part) = parts.next() {
        let number: u32 =
            btoi::btou(part.as_bytes()).map_err(|_| SfenError::InvalidMoveNumber)?;
        setup.move_number = NonZeroU32::new(number).unwrap_or(NonZeroU32::MIN);
    }

    Ok(setup)
}

/// Writes the board part of an SFEN.
pub(crate) fn make_board_sfen(variant: Variant, board: &Board) -> String {
    let mut sfen = String::new();
    for rank in 0..variant.ranks() {
        let mut empty = 0;
        for file in (0..variant.files()).rev() {
            let sq = Square::from_coords(file, rank).expect("board area within grid");
            match board.get(sq) {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        sfen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    // Roles foreign to the variant should have been
                    // rejected earlier; degrade gracefully anyway.
                    if let Some((promoted, letter)) = role_to_sfen(variant, piece.role) {
                        if promoted {
                            sfen.push('+');
                        }
                        sfen.push(if piece.color.is_sente() {
                            letter.to_ascii_uppercase()
                        } else {
                            letter
                        });
                    }
                }
            }
        }
        if empty > 0 {
            sfen.push_str(&empty.to_string());
        }
        if rank + 1 < variant.ranks() {
            sfen.push('/');
        }
    }
    sfen
}

fn make_hands_sfen(variant: Variant, hands: &ByColor<Hand>) -> String {
    let mut part = String::new();
    for color in Color::ALL {
        for (role, count) in hands.get(color).iter() {
            if count > 1 {
                part.push_str(&count.to_string());
            }
            if let Some((_, letter)) = role_to_sfen(variant, role) {
                part.push(if color.is_sente() {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                });
            }
        }
    }
    if part.is_empty() {
        part.push('-');
    }
    part
}

/// Writes the SFEN of a position.
pub fn make_sfen<P: Position>(pos: &P) -> String {
    let variant = pos.variant();
    let third = if variant == Variant::Chushogi {
        pos.last_lion_capture()
            .map_or("-".to_owned(), |sq| sq.to_string())
    } else {
        make_hands_sfen(variant, pos.hands())
    };
    format!(
        "{} {} {} {}",
        make_board_sfen(variant, pos.board()),
        pos.turn().char(),
        third,
        pos.move_number(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{position::FromSetup, variant::VariantPosition};

    #[test]
    fn test_initial_sfen_roundtrip() {
        for variant in Variant::ALL {
            let setup = parse_sfen(variant, variant.initial_sfen()).expect("initial sfen parses");
            assert_eq!(setup, variant.initial_setup(), "{}", variant.name());
            let pos = VariantPosition::from_setup(variant, setup).expect("initial sfen is legal");
            assert_eq!(make_sfen(&pos), variant.initial_sfen(), "{}", variant.name());
        }
    }

    #[test]
    fn test_parse_hands() {
        let setup = parse_sfen(
            Variant::Standard,
            "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL b 2RB3Pl12p 42",
        )
        .expect("valid sfen");
        assert_eq!(setup.hands.sente.get(Role::Rook), 2);
        assert_eq!(setup.hands.sente.get(Role::Bishop), 1);
        assert_eq!(setup.hands.sente.get(Role::Pawn), 3);
        assert_eq!(setup.hands.gote.get(Role::Lance), 1);
        assert_eq!(setup.hands.gote.get(Role::Pawn), 12);
        assert_eq!(setup.move_number.get(), 42);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_sfen(Variant::Standard, "9/9/9/9/9/9/9/9"),
            Err(SfenError::InvalidBoard)
        );
        assert_eq!(
            parse_sfen(Variant::Standard, "8/9/9/9/9/9/9/9/9"),
            Err(SfenError::InvalidBoard)
        );
        assert_eq!(
            parse_sfen(Variant::Standard, "qqqqqqqqq/9/9/9/9/9/9/9/9"),
            Err(SfenError::InvalidPiece)
        );
        assert_eq!(
            parse_sfen(Variant::Standard, "9/9/9/9/9/9/9/9/9 x"),
            Err(SfenError::InvalidTurn)
        );
        assert_eq!(
            parse_sfen(Variant::Standard, "9/9/9/9/9/9/9/9/9 b K"),
            Err(SfenError::InvalidHands)
        );
        assert_eq!(
            parse_sfen(Variant::Standard, "9/9/9/9/9/9/9/9/9 b - x"),
            Err(SfenError::InvalidMoveNumber)
        );
    }

    #[test]
    fn test_chushogi_lion_capture_square() {
        let sfen = "lfcsgekgscfl/a1b1txot1b1a/mvrhdqndhrvm/pppppppppppp/3i4i3/12/12/3I4I3/PPPPPPPPPPPP/MVRHDNQDHRVM/A1B1TOXT1B1A/LFCSGKEGSCFL b 7f 10";
        let setup = parse_sfen(Variant::Chushogi, sfen).expect("valid sfen");
        assert_eq!(setup.last_lion_capture, Some("7f".parse().unwrap()));
        let pos = crate::variant::Chushogi::from_setup(setup).expect("legal");
        assert_eq!(make_sfen(&pos), sfen);
    }

    #[test]
    fn test_minishogi_board() {
        let setup =
            parse_sfen(Variant::Minishogi, Variant::Minishogi.initial_sfen()).expect("parses");
        assert_eq!(setup.board.occupied().count(), 12);
        assert_eq!(
            setup.board.get("5e".parse().unwrap()),
            Some(Role::King.of(Color::Sente))
        );
        assert_eq!(
            setup.board.get("1a".parse().unwrap()),
            Some(Role::King.of(Color::Gote))
        );
    }
}
