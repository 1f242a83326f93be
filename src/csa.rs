//! Parse and write standard shogi positions and moves in CSA, the
//! computer shogi association's record format.
//!
//! Positions are written as `P1`..`P9` board rows with two-letter piece
//! codes (or `PI` for the full initial setup, with a removal list for
//! well-known handicaps), `P+`/`P-` lines for pieces in hand, and a
//! final `+` or `-` for the side to move. Moves look like `+7776FU`,
//! where the piece code is the role after the move, so a changed code
//! encodes promotion; drops use `00` as the origin.
//!
//! CSA only covers the standard 9×9 game.

use std::{error::Error, fmt, str};

use crate::{
    color::Color,
    hand::HAND_ROLES,
    kif,
    m::Move,
    position::Position,
    role::Role,
    setup::Setup,
    square::Square,
    variant::Variant,
};

/// Errors that can occur when parsing a CSA position.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CsaError {
    /// Missing or malformed board lines.
    InvalidBoard,
    /// An unknown piece code.
    InvalidPiece,
    /// A malformed hand line.
    InvalidHands,
    /// A missing or malformed side-to-move line.
    InvalidTurn,
}

impl fmt::Display for CsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CsaError::InvalidBoard => "invalid csa board",
            CsaError::InvalidPiece => "invalid piece in csa",
            CsaError::InvalidHands => "invalid hands in csa",
            CsaError::InvalidTurn => "invalid side to move in csa",
        })
    }
}

impl Error for CsaError {}

/// The two-letter CSA code of a role.
pub(crate) fn role_to_csa(role: Role) -> Option<&'static str> {
    Some(match role {
        Role::Pawn => "FU",
        Role::Lance => "KY",
        Role::Knight => "KE",
        Role::Silver => "GI",
        Role::Gold => "KI",
        Role::King => "OU",
        Role::Bishop => "KA",
        Role::Rook => "HI",
        Role::Tokin => "TO",
        Role::PromotedLance => "NY",
        Role::PromotedKnight => "NK",
        Role::PromotedSilver => "NG",
        Role::Horse => "UM",
        Role::Dragon => "RY",
        _ => return None,
    })
}

/// The role for a two-letter CSA code.
pub(crate) fn role_from_csa(code: &str) -> Option<Role> {
    Variant::Standard
        .roles()
        .iter()
        .copied()
        .find(|&role| role_to_csa(role) == Some(code))
}

fn csa_square(sq: Square) -> String {
    format!("{}{}", sq.file() + 1, sq.rank() + 1)
}

fn parse_csa_square(digits: &[u8]) -> Option<Square> {
    match digits {
        [file @ b'1'..=b'9', rank @ b'1'..=b'9'] => {
            Square::from_coords(u32::from(file - b'1'), u32::from(rank - b'1'))
        }
        _ => None,
    }
}

/// Writes a standard shogi position in CSA. The initial position and
/// well-known handicaps use the compact `PI` form with a removal list.
pub fn make_csa<P: Position>(pos: &P) -> String {
    debug_assert_eq!(pos.variant(), Variant::Standard);
    let mut csa = String::new();

    let initial = Variant::Standard.initial_setup().board;
    let removals: Vec<(Square, Role)> = initial
        .iter()
        .filter(|&(sq, _)| pos.board().get(sq).is_none())
        .map(|(sq, piece)| (sq, piece.role))
        .collect();
    let is_reduced_initial = pos
        .board()
        .iter()
        .all(|(sq, piece)| initial.get(sq) == Some(piece));

    if is_reduced_initial && kif::handicap_name(pos).is_some() {
        csa.push_str("PI");
        for (sq, role) in removals {
            csa.push_str(&csa_square(sq));
            if let Some(code) = role_to_csa(role) {
                csa.push_str(code);
            }
        }
        csa.push('\n');
    } else {
        for rank in 0..9 {
            csa.push('P');
            csa.push(char::from(b'1' + rank as u8));
            for file in (0..9).rev() {
                let sq = Square::from_coords(file, rank).expect("board area within grid");
                match pos.board().get(sq) {
                    None => csa.push_str(" * "),
                    Some(piece) => {
                        csa.push(if piece.color.is_sente() { '+' } else { '-' });
                        csa.push_str(role_to_csa(piece.role).unwrap_or("??"));
                    }
                }
            }
            csa.push('\n');
        }
    }

    for color in Color::ALL {
        let hand = pos.hands().get(color);
        if hand.is_empty() {
            continue;
        }
        csa.push('P');
        csa.push(color.fold('+', '-'));
        for role in HAND_ROLES {
            for _ in 0..hand.get(role) {
                csa.push_str("00");
                csa.push_str(role_to_csa(role).unwrap_or("??"));
            }
        }
        csa.push('\n');
    }

    csa.push(pos.turn().fold('+', '-'));
    csa.push('\n');
    csa
}

fn parse_placement_line(rest: &str, color: Color, setup: &mut Setup) -> Result<(), CsaError> {
    let bytes = rest.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(CsaError::InvalidHands);
    }
    for entry in bytes.chunks(4) {
        let code = str::from_utf8(&entry[2..]).map_err(|_| CsaError::InvalidPiece)?;
        let role = role_from_csa(code).ok_or(CsaError::InvalidPiece)?;
        if &entry[..2] == b"00" {
            if !Variant::Standard.hand_roles().contains(&role) {
                return Err(CsaError::InvalidHands);
            }
            let hand = setup.hands.get_mut(color);
            hand.set(role, hand.get(role).saturating_add(1));
        } else {
            let sq = parse_csa_square(&entry[..2]).ok_or(CsaError::InvalidBoard)?;
            setup.board.set(sq, role.of(color));
        }
    }
    Ok(())
}

/// Parses a standard shogi position in CSA into a raw [`Setup`].
///
/// Supports `PI` (with an optional removal list), `P1`..`P9` rows, and
/// `P+`/`P-` placement or hand lines, in any sensible combination.
pub fn parse_csa(csa: &str) -> Result<Setup, CsaError> {
    let mut setup = Setup::empty();
    let mut turn = None;
    let mut saw_board = false;

    for line in csa.lines() {
        let line = line.trim_end();
        if let Some(rest) = line.strip_prefix("PI") {
            setup.board = Variant::Standard.initial_setup().board;
            saw_board = true;
            let bytes = rest.as_bytes();
            if bytes.len() % 4 != 0 {
                return Err(CsaError::InvalidBoard);
            }
            for entry in bytes.chunks(4) {
                let sq = parse_csa_square(&entry[..2]).ok_or(CsaError::InvalidBoard)?;
                let code = str::from_utf8(&entry[2..]).map_err(|_| CsaError::InvalidPiece)?;
                let role = role_from_csa(code).ok_or(CsaError::InvalidPiece)?;
                match setup.board.take(sq) {
                    Some(piece) if piece.role == role => (),
                    _ => return Err(CsaError::InvalidBoard),
                }
            }
        } else if let Some(rank) = line
            .strip_prefix('P')
            .and_then(|rest| rest.chars().next())
            .and_then(|ch| ch.to_digit(10))
        {
            if !(1..=9).contains(&rank) {
                return Err(CsaError::InvalidBoard);
            }
            let row = &line[2..];
            let mut file = 9i32;
            let mut bytes = row.as_bytes();
            while !bytes.is_empty() {
                let entry = bytes.get(..3).ok_or(CsaError::InvalidBoard)?;
                bytes = &bytes[3..];
                file -= 1;
                if entry == b" * " {
                    continue;
                }
                let color = match entry[0] {
                    b'+' => Color::Sente,
                    b'-' => Color::Gote,
                    _ => return Err(CsaError::InvalidBoard),
                };
                let code = str::from_utf8(&entry[1..]).map_err(|_| CsaError::InvalidPiece)?;
                let role = role_from_csa(code).ok_or(CsaError::InvalidPiece)?;
                let sq = u32::try_from(file)
                    .ok()
                    .and_then(|file| Square::from_coords(file, rank - 1))
                    .ok_or(CsaError::InvalidBoard)?;
                setup.board.set(sq, role.of(color));
            }
            if file != 0 {
                return Err(CsaError::InvalidBoard);
            }
            saw_board = true;
        } else if let Some(rest) = line.strip_prefix("P+") {
            parse_placement_line(rest, Color::Sente, &mut setup)?;
        } else if let Some(rest) = line.strip_prefix("P-") {
            parse_placement_line(rest, Color::Gote, &mut setup)?;
        } else if line == "+" {
            turn = Some(Color::Sente);
        } else if line == "-" {
            turn = Some(Color::Gote);
        }
    }

    if !saw_board {
        return Err(CsaError::InvalidBoard);
    }
    setup.turn = turn.ok_or(CsaError::InvalidTurn)?;
    Ok(setup)
}

/// Writes a move in CSA style, e.g. `+7776FU`, `-0055KA` for a drop.
/// The position is needed to know the moving piece and the role after
/// promotion.
pub fn make_csa_move<P: Position>(pos: &P, m: Move) -> Option<String> {
    let sign = pos.turn().fold('+', '-');
    Some(match m {
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let piece = pos.board().get(from)?;
            let role = if promotion {
                Variant::Standard.promote(piece.role)?
            } else {
                piece.role
            };
            format!(
                "{sign}{}{}{}",
                csa_square(from),
                csa_square(to),
                role_to_csa(role)?
            )
        }
        Move::Drop { role, to } => {
            format!("{sign}00{}{}", csa_square(to), role_to_csa(role)?)
        }
        Move::Lion { .. } => return None,
    })
}

/// Parses a move in CSA style against a position. A piece code that
/// differs from the role on the origin square encodes promotion.
/// Returns `None` for anything malformed.
pub fn parse_csa_move<P: Position>(pos: &P, s: &str) -> Option<Move> {
    let bytes = s.as_bytes();
    let bytes = match bytes.first() {
        Some(b'+' | b'-') => &bytes[1..],
        _ => bytes,
    };
    if bytes.len() != 6 {
        return None;
    }
    let to = parse_csa_square(&bytes[2..4])?;
    let code = str::from_utf8(&bytes[4..]).ok()?;
    let role = role_from_csa(code)?;

    if &bytes[..2] == b"00" {
        return Some(Move::Drop { role, to });
    }

    let from = parse_csa_square(&bytes[..2])?;
    let piece = pos.board().get(from)?;
    let promotion = if piece.role == role {
        false
    } else if Variant::Standard.promote(piece.role) == Some(role) {
        true
    } else {
        return None;
    };
    Some(Move::Normal {
        from,
        to,
        promotion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        position::{FromSetup, Shogi},
        sfen,
    };

    #[test]
    fn test_initial_roundtrip() {
        let pos = Shogi::default();
        assert_eq!(make_csa(&pos), "PI\n+\n");
        let setup = parse_csa("PI\n+\n").expect("valid csa");
        assert_eq!(setup, pos.to_setup());
    }

    #[test]
    fn test_handicap_pi() {
        let setup = sfen::parse_sfen(
            Variant::Standard,
            "lnsgkgsnl/7b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
        )
        .expect("valid sfen");
        let pos = Shogi::from_setup(setup).expect("legal");
        let csa = make_csa(&pos);
        assert_eq!(csa, "PI82HI\n-\n");
        let parsed = parse_csa(&csa).expect("valid csa");
        assert_eq!(parsed, pos.to_setup());
    }

    #[test]
    fn test_explicit_board_roundtrip() {
        let setup = sfen::parse_sfen(Variant::Standard, "4k4/9/9/9/9/9/9/9/4K4 b 2RB3Pp 1")
            .expect("valid sfen");
        let pos = Shogi::from_setup(setup).expect("legal");
        let csa = make_csa(&pos);
        assert!(csa.contains("P1 *  *  *  * -OU *  *  *  * "));
        assert!(csa.contains("P+00HI00HI00KA00FU00FU00FU"));
        assert!(csa.contains("P-00FU"));
        let parsed = parse_csa(&csa).expect("valid csa");
        assert_eq!(parsed, pos.to_setup());
    }

    #[test]
    fn test_moves() {
        let pos = Shogi::default();
        let m = Move::Normal {
            from: "7g".parse().unwrap(),
            to: "7f".parse().unwrap(),
            promotion: false,
        };
        assert_eq!(make_csa_move(&pos, m).as_deref(), Some("+7776FU"));
        assert_eq!(parse_csa_move(&pos, "+7776FU"), Some(m));

        // A promoting bishop changes its code to UM.
        let setup = sfen::parse_sfen(Variant::Standard, "4k4/9/9/9/9/9/9/7B1/4K4 b - 1")
            .expect("valid sfen");
        let pos = Shogi::from_setup(setup).expect("legal");
        let m = Move::Normal {
            from: "2h".parse().unwrap(),
            to: "8b".parse().unwrap(),
            promotion: true,
        };
        assert_eq!(make_csa_move(&pos, m).as_deref(), Some("+2882UM"));
        assert_eq!(parse_csa_move(&pos, "+2882UM"), Some(m));
        assert_eq!(
            parse_csa_move(&pos, "+2882KA"),
            Some(Move::Normal {
                from: "2h".parse().unwrap(),
                to: "8b".parse().unwrap(),
                promotion: false,
            })
        );
        assert_eq!(parse_csa_move(&pos, "+2882RY"), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_csa("+\n"), Err(CsaError::InvalidBoard));
        assert_eq!(parse_csa("PI\n"), Err(CsaError::InvalidTurn));
        assert_eq!(parse_csa("PI99XX\n+\n"), Err(CsaError::InvalidPiece));
    }
}
