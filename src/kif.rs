//! Parse and write positions and moves in KIF, the human-readable kifu
//! format with a framed board diagram.
//!
//! A header is either a `手合割：` line naming a well-known (handicap)
//! starting position, or a full diagram:
//!
//! ```text
//! 後手の持駒：なし
//!  ９ ８ ７ ６ ５ ４ ３ ２ １
//! +---------------------------+
//! |v香v桂v銀v金v玉v金v銀v桂v香|一
//! | ・v飛 ・ ・ ・ ・ ・v角 ・|二
//! |v歩v歩v歩v歩v歩v歩v歩v歩v歩|三
//! | ・ ・ ・ ・ ・ ・ ・ ・ ・|四
//! | ・ ・ ・ ・ ・ ・ ・ ・ ・|五
//! | ・ ・ ・ ・ ・ ・ ・ ・ ・|六
//! | 歩 歩 歩 歩 歩 歩 歩 歩 歩|七
//! | ・ 角 ・ ・ ・ ・ ・ 飛 ・|八
//! | 香 桂 銀 金 玉 金 銀 桂 香|九
//! +---------------------------+
//! 先手の持駒：なし
//! 先手番
//! ```
//!
//! Moves are written like `７六歩(77)`, `同　銀(31)`, `４五角打` or
//! `２二角成(88)`; chushogi two-step moves spell out both steps,
//! e.g. `７八・７七獅(79)`.

use std::{error::Error, fmt, num::NonZeroU32};

use crate::{
    board::Board,
    color::Color,
    hand::Hand,
    m::Move,
    position::Position,
    role::Role,
    setup::Setup,
    sfen,
    square::Square,
    variant::Variant,
};

/// Errors that can occur when parsing a KIF header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KifError {
    /// No board diagram or handicap line, or malformed rows.
    InvalidBoard,
    /// A glyph in the diagram does not name a piece of the variant.
    InvalidPiece,
    /// A hand line could not be read.
    InvalidHands,
    /// The named handicap is not known.
    InvalidHandicap,
}

impl fmt::Display for KifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KifError::InvalidBoard => "invalid kif board",
            KifError::InvalidPiece => "invalid piece in kif",
            KifError::InvalidHands => "invalid hands in kif",
            KifError::InvalidHandicap => "unknown kif handicap",
        })
    }
}

impl Error for KifError {}

/// Common starting positions by their traditional names, used for the
/// `手合割` header line. Detection works by exact match of the SFEN
/// with the move number normalized to 1.
pub const HANDICAPS: &[(&str, &str)] = &[
    (
        "平手",
        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL b - 1",
    ),
    (
        "香落ち",
        "lnsgkgsn1/1r5b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "右香落ち",
        "1nsgkgsnl/1r5b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "角落ち",
        "lnsgkgsnl/1r7/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "飛車落ち",
        "lnsgkgsnl/7b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "飛香落ち",
        "lnsgkgsn1/7b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "二枚落ち",
        "lnsgkgsnl/9/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "四枚落ち",
        "1nsgkgsn1/9/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "六枚落ち",
        "2sgkgs2/9/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "八枚落ち",
        "3gkg3/9/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
    (
        "十枚落ち",
        "4k4/9/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL w - 1",
    ),
];

/// The handicap name for a position, if its SFEN (with the move number
/// normalized to 1) matches a well-known starting position.
pub fn handicap_name<P: Position>(pos: &P) -> Option<&'static str> {
    if pos.variant() != Variant::Standard {
        return None;
    }
    let sfen = sfen::make_sfen(pos);
    let normalized = sfen.rsplit_once(' ').map_or(sfen.as_str(), |(head, _)| head);
    HANDICAPS
        .iter()
        .find(|(_, handicap)| handicap.strip_suffix(" 1") == Some(normalized))
        .map(|&(name, _)| name)
}

const KANJI_DIGITS: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
const FULLWIDTH_DIGITS: [char; 10] = ['０', '１', '２', '３', '４', '５', '６', '７', '８', '９'];

/// A number in kanji numerals, e.g. `7` → `七`, `12` → `十二`.
pub(crate) fn kanji_number(n: u32) -> String {
    debug_assert!((1..=19).contains(&n));
    if n >= 10 {
        let mut s = String::from("十");
        s.push_str(KANJI_DIGITS[(n % 10) as usize]);
        s
    } else {
        KANJI_DIGITS[n as usize].to_owned()
    }
}

/// A number in full-width digits, e.g. `7` → `７`, `12` → `１２`.
pub(crate) fn fullwidth_number(n: u32) -> String {
    let mut s = String::new();
    if n >= 10 {
        s.push(FULLWIDTH_DIGITS[(n / 10) as usize]);
    }
    s.push(FULLWIDTH_DIGITS[(n % 10) as usize]);
    s
}

fn fullwidth_digit(ch: char) -> Option<u32> {
    FULLWIDTH_DIGITS
        .iter()
        .position(|&digit| digit == ch)
        .map(|digit| digit as u32)
        .or_else(|| ch.to_digit(10))
}

fn kanji_digit(ch: char) -> Option<u32> {
    KANJI_DIGITS
        .iter()
        .position(|&digit| !digit.is_empty() && digit.chars().next() == Some(ch))
        .map(|digit| digit as u32)
}

/// A destination square in KIF style: full-width file, kanji rank.
pub(crate) fn kif_square(sq: Square) -> String {
    format!(
        "{}{}",
        fullwidth_number(sq.file() + 1),
        kanji_number(sq.rank() + 1)
    )
}

/// The single-cell glyph of a role for board diagrams.
pub(crate) fn role_kanji(variant: Variant, role: Role) -> Option<&'static str> {
    Some(match variant {
        Variant::Standard | Variant::Minishogi => match role {
            Role::Pawn => "歩",
            Role::Lance => "香",
            Role::Knight => "桂",
            Role::Silver => "銀",
            Role::Gold => "金",
            Role::King => "玉",
            Role::Bishop => "角",
            Role::Rook => "飛",
            Role::Tokin => "と",
            Role::PromotedLance => "杏",
            Role::PromotedKnight => "圭",
            Role::PromotedSilver => "全",
            Role::Horse => "馬",
            Role::Dragon => "龍",
            _ => return None,
        },
        Variant::Chushogi => match role {
            Role::Pawn => "歩",
            Role::GoBetween => "仲",
            Role::Lance => "香",
            Role::Chariot => "反",
            Role::Copper => "銅",
            Role::Silver => "銀",
            Role::Gold => "金",
            Role::Leopard => "豹",
            Role::Tiger => "虎",
            Role::Elephant => "象",
            Role::Kirin => "麒",
            Role::Phoenix => "鳳",
            Role::SideMover => "横",
            Role::VerticalMover => "竪",
            Role::Bishop => "角",
            Role::Rook => "飛",
            Role::Horse => "馬",
            Role::Dragon => "龍",
            Role::Queen => "奔",
            Role::Lion => "獅",
            Role::King => "玉",
            Role::Tokin => "と",
            Role::ElephantPromoted => "成仲",
            Role::WhiteHorse => "成香",
            Role::Whale => "成反",
            Role::SideMoverPromoted => "成銅",
            Role::VerticalMoverPromoted => "成銀",
            Role::RookPromoted => "成金",
            Role::BishopPromoted => "成豹",
            Role::Stag => "成虎",
            Role::Prince => "成象",
            Role::LionPromoted => "成麒",
            Role::QueenPromoted => "成鳳",
            Role::Boar => "成横",
            Role::Ox => "成竪",
            Role::HorsePromoted => "成角",
            Role::DragonPromoted => "成飛",
            Role::Falcon => "成馬",
            Role::Eagle => "成龍",
            _ => return None,
        },
    })
}

/// The glyph of a role in move lines: like [`role_kanji`], but the
/// standard promoted minors are spelled out (`成香`, `成桂`, `成銀`).
pub(crate) fn role_kanji_move(variant: Variant, role: Role) -> Option<&'static str> {
    match (variant, role) {
        (Variant::Standard | Variant::Minishogi, Role::PromotedLance) => Some("成香"),
        (Variant::Standard | Variant::Minishogi, Role::PromotedKnight) => Some("成桂"),
        (Variant::Standard | Variant::Minishogi, Role::PromotedSilver) => Some("成銀"),
        _ => role_kanji(variant, role),
    }
}

/// The role for a diagram or move-line glyph.
pub(crate) fn role_from_kanji(variant: Variant, glyph: &str) -> Option<Role> {
    variant.roles().iter().copied().find(|&role| {
        role_kanji(variant, role) == Some(glyph) || role_kanji_move(variant, role) == Some(glyph)
    })
}

fn make_hand_line(variant: Variant, color: Color, hand: &Hand) -> String {
    let mut line = String::from(match color {
        Color::Sente => "先手の持駒：",
        Color::Gote => "後手の持駒：",
    });
    if hand.is_empty() {
        line.push_str("なし");
        return line;
    }
    let mut first = true;
    for (role, count) in hand.iter() {
        if !first {
            line.push('　');
        }
        first = false;
        line.push_str(role_kanji(variant, role).unwrap_or("？"));
        if count > 1 {
            line.push_str(&kanji_number(u32::from(count)));
        }
    }
    line
}

/// Writes a KIF header for the position: a `手合割` line for
/// well-known starting positions, a full board diagram otherwise.
pub fn make_kif_header<P: Position>(pos: &P) -> String {
    if let Some(name) = handicap_name(pos) {
        return format!("手合割：{name}\n");
    }

    let variant = pos.variant();
    let files = variant.files();
    let mut kif = String::new();

    kif.push_str(&make_hand_line(variant, Color::Gote, &pos.hands().gote));
    kif.push('\n');

    for file in (1..=files).rev() {
        kif.push(' ');
        if file < 10 {
            kif.push(FULLWIDTH_DIGITS[file as usize]);
        } else {
            kif.push_str(&fullwidth_number(file));
        }
    }
    kif.push('\n');

    let frame: String = format!("+{}+\n", "-".repeat(files as usize * 3));
    kif.push_str(&frame);
    for rank in 0..variant.ranks() {
        kif.push('|');
        for file in (0..files).rev() {
            let sq = Square::from_coords(file, rank).expect("board area within grid");
            match pos.board().get(sq) {
                None => kif.push_str(" ・"),
                Some(piece) => {
                    kif.push(if piece.color.is_gote() { 'v' } else { ' ' });
                    kif.push_str(role_kanji(variant, piece.role).unwrap_or("？"));
                }
            }
        }
        kif.push('|');
        kif.push_str(&kanji_number(rank + 1));
        kif.push('\n');
    }
    kif.push_str(&frame);

    kif.push_str(&make_hand_line(variant, Color::Sente, &pos.hands().sente));
    kif.push('\n');
    kif.push_str(pos.turn().fold("先手番", "後手番"));
    kif.push('\n');
    kif
}

fn parse_hand_line(variant: Variant, rest: &str) -> Result<Hand, KifError> {
    let mut hand = Hand::empty();
    for entry in rest.split(|ch: char| ch.is_whitespace()) {
        if entry.is_empty() || entry == "なし" {
            continue;
        }
        let mut chars = entry.chars().peekable();
        let glyph = chars.next().ok_or(KifError::InvalidHands)?;
        let role =
            role_from_kanji(variant, &glyph.to_string()).ok_or(KifError::InvalidHands)?;
        let mut count = 0;
        if chars.peek() == Some(&'十') {
            chars.next();
            count = 10;
        }
        if let Some(&ch) = chars.peek() {
            let digit = kanji_digit(ch).ok_or(KifError::InvalidHands)?;
            chars.next();
            count += digit;
        }
        if chars.next().is_some() {
            return Err(KifError::InvalidHands);
        }
        hand.set(role, hand.get(role).saturating_add(count.max(1) as u8));
    }
    Ok(hand)
}

fn parse_board_row(
    variant: Variant,
    row: &str,
    rank: u32,
    board: &mut Board,
) -> Result<u32, KifError> {
    let inner = row
        .strip_prefix('|')
        .and_then(|rest| rest.split_once('|'))
        .map(|(cells, _)| cells)
        .ok_or(KifError::InvalidBoard)?;
    let mut chars = inner.chars().peekable();
    let mut cells = Vec::new();
    while let Some(ch) = chars.next() {
        let (gote, glyph) = match ch {
            ' ' | '　' | 'v' | 'V' => {
                let glyph = chars.next().ok_or(KifError::InvalidBoard)?;
                (ch == 'v' || ch == 'V', glyph)
            }
            glyph => (false, glyph),
        };
        if glyph == '・' {
            cells.push(None);
            continue;
        }
        let mut name = glyph.to_string();
        if glyph == '成' {
            name.push(chars.next().ok_or(KifError::InvalidPiece)?);
        }
        let role = role_from_kanji(variant, &name).ok_or(KifError::InvalidPiece)?;
        cells.push(Some(role.of(Color::from_sente(!gote))));
    }
    let files = cells.len() as u32;
    for (i, cell) in cells.into_iter().enumerate() {
        if let Some(piece) = cell {
            let file = files - 1 - i as u32;
            let sq = Square::from_coords(file, rank).ok_or(KifError::InvalidBoard)?;
            board.set(sq, piece);
        }
    }
    Ok(files)
}

/// Parses a KIF header (either a `手合割` line or a full diagram with
/// hand lines) back into a variant and a raw [`Setup`]. The variant is
/// inferred from the board size.
pub fn parse_kif_header(kif: &str) -> Result<(Variant, Setup), KifError> {
    let mut setup = Setup::empty();
    let mut rows: Vec<&str> = Vec::new();
    let mut handicap: Option<&'static str> = None;
    let mut sente_hand = None;
    let mut gote_hand = None;
    let mut turn = None;

    for line in kif.lines() {
        let line = line.trim_end();
        if let Some(name) = line.strip_prefix("手合割：") {
            let (_, sfen) = HANDICAPS
                .iter()
                .find(|(known, _)| *known == name.trim())
                .ok_or(KifError::InvalidHandicap)?;
            handicap = Some(sfen);
        } else if let Some((owner, hand)) = line.split_once("の持駒：") {
            if owner.contains("後手") || owner.contains("上手") {
                gote_hand = Some(hand.to_owned());
            } else {
                sente_hand = Some(hand.to_owned());
            }
        } else if line.starts_with('|') {
            rows.push(line);
        } else if line.contains("先手番") || line.contains("下手番") {
            turn = Some(Color::Sente);
        } else if line.contains("後手番") || line.contains("上手番") {
            turn = Some(Color::Gote);
        }
    }

    let variant = if let Some(sfen) = handicap {
        setup = sfen::parse_sfen(Variant::Standard, sfen).map_err(|_| KifError::InvalidBoard)?;
        Variant::Standard
    } else {
        let variant = match rows.len() {
            9 => Variant::Standard,
            5 => Variant::Minishogi,
            12 => Variant::Chushogi,
            _ => return Err(KifError::InvalidBoard),
        };
        let mut board = Board::empty();
        for (rank, row) in rows.iter().enumerate() {
            let files = parse_board_row(variant, row, rank as u32, &mut board)?;
            if files != variant.files() {
                return Err(KifError::InvalidBoard);
            }
        }
        setup.board = board;
        setup.move_number = NonZeroU32::MIN;
        variant
    };

    if let Some(hand) = sente_hand {
        setup.hands.sente = parse_hand_line(variant, &hand)?;
    }
    if let Some(hand) = gote_hand {
        setup.hands.gote = parse_hand_line(variant, &hand)?;
    }
    if let Some(turn) = turn {
        setup.turn = turn;
    }
    if variant == Variant::Chushogi && !setup.hands.is_empty() {
        return Err(KifError::InvalidHands);
    }

    Ok((variant, setup))
}

fn origin_digits(variant: Variant, sq: Square) -> String {
    if variant.files() > 9 {
        format!("{:02}{:02}", sq.file() + 1, sq.rank() + 1)
    } else {
        format!("{}{}", sq.file() + 1, sq.rank() + 1)
    }
}

fn parse_origin_digits(digits: &str) -> Option<Square> {
    let bytes = digits.as_bytes();
    let (file, rank): (u32, u32) = match bytes.len() {
        2 => (btoi::btou(&bytes[..1]).ok()?, btoi::btou(&bytes[1..]).ok()?),
        4 => (btoi::btou(&bytes[..2]).ok()?, btoi::btou(&bytes[2..]).ok()?),
        _ => return None,
    };
    Square::from_coords(file.checked_sub(1)?, rank.checked_sub(1)?)
}

/// Writes a move in KIF style. Requires the position the move is about
/// to be played in, both for the piece glyph and for the `同` shorthand
/// when the destination repeats.
pub fn make_kif_move<P: Position>(pos: &P, m: Move) -> Option<String> {
    let variant = pos.variant();
    Some(match m {
        Move::Drop { role, to } => format!(
            "{}{}打",
            kif_square(to),
            role_kanji_move(variant, role)?
        ),
        Move::Normal {
            from,
            to,
            promotion,
        } => {
            let piece = pos.board().get(from)?;
            let mut s = if pos.last_move().map(Move::to) == Some(to) {
                "同　".to_owned()
            } else {
                kif_square(to)
            };
            s.push_str(role_kanji_move(variant, piece.role)?);
            if promotion {
                s.push('成');
            } else if variant.can_promote(piece, from, to, pos.board().has(to)) {
                s.push_str("不成");
            }
            s.push('(');
            s.push_str(&origin_digits(variant, from));
            s.push(')');
            s
        }
        Move::Lion { from, mid, to } => {
            let piece = pos.board().get(from)?;
            format!(
                "{}・{}{}({})",
                kif_square(mid),
                kif_square(to),
                role_kanji_move(variant, piece.role)?,
                origin_digits(variant, from),
            )
        }
    })
}

struct MoveReader {
    chars: Vec<char>,
    at: usize,
}

impl MoveReader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.at).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.at += 1;
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.at += 1;
            true
        } else {
            false
        }
    }

    fn read_kif_square(&mut self) -> Option<Square> {
        let mut file = fullwidth_digit(self.bump()?)?;
        if let Some(more) = self.peek().and_then(fullwidth_digit) {
            self.at += 1;
            file = file * 10 + more;
        }
        let mut rank = if self.eat('十') { 10 } else { 0 };
        if let Some(digit) = self.peek().and_then(kanji_digit) {
            self.at += 1;
            rank += digit;
        }
        if rank == 0 {
            return None;
        }
        Square::from_coords(file.checked_sub(1)?, rank - 1)
    }

    fn read_glyph(&mut self, variant: Variant) -> Option<Role> {
        let ch = self.bump()?;
        let mut name = ch.to_string();
        if ch == '成' {
            name.push(self.bump()?);
        }
        role_from_kanji(variant, &name)
    }
}

/// Parses a move in KIF style. `last_dest` resolves the `同`
/// shorthand. Returns `None` for anything malformed.
pub fn parse_kif_move(variant: Variant, s: &str, last_dest: Option<Square>) -> Option<Move> {
    let mut reader = MoveReader {
        chars: s.trim().chars().collect(),
        at: 0,
    };

    let first = if reader.eat('同') {
        let _ = reader.eat('　') || reader.eat(' ');
        last_dest?
    } else {
        reader.read_kif_square()?
    };

    let (mid, to) = if reader.eat('・') {
        (Some(first), reader.read_kif_square()?)
    } else {
        (None, first)
    };

    let role = reader.read_glyph(variant)?;

    if let Some(mid) = mid {
        if !reader.eat('(') {
            return None;
        }
        let digits: String = std::iter::from_fn(|| {
            reader.peek().filter(char::is_ascii_digit).inspect(|_| {
                reader.at += 1;
            })
        })
        .collect();
        let from = parse_origin_digits(&digits)?;
        return reader.eat(')').then_some(Move::Lion { from, mid, to });
    }

    let promotion = if reader.eat('成') {
        true
    } else {
        if reader.eat('不') && !reader.eat('成') {
            return None;
        }
        false
    };

    if reader.eat('打') {
        return (reader.peek().is_none() && !promotion).then_some(Move::Drop { role, to });
    }

    if !reader.eat('(') {
        return None;
    }
    let digits: String = std::iter::from_fn(|| {
        reader.peek().filter(char::is_ascii_digit).inspect(|_| {
            reader.at += 1;
        })
    })
    .collect();
    let from = parse_origin_digits(&digits)?;
    reader
        .eat(')')
        .then_some(Move::Normal {
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
        variant::{Chushogi, Minishogi, VariantPosition},
    };

    #[test]
    fn test_header_roundtrip() {
        for variant in Variant::ALL {
            let pos = VariantPosition::new(variant);
            let kif = make_kif_header(&pos);
            let (parsed_variant, setup) = parse_kif_header(&kif).expect("header parses");
            assert_eq!(parsed_variant, variant);
            assert_eq!(setup.board, variant.initial_setup().board, "{}", variant.name());
            assert_eq!(setup.turn, Color::Sente);
        }
    }

    #[test]
    fn test_initial_is_hirate() {
        let pos = Shogi::default();
        assert_eq!(handicap_name(&pos), Some("平手"));
        assert_eq!(make_kif_header(&pos), "手合割：平手\n");
    }

    #[test]
    fn test_handicap_roundtrip() {
        for &(name, sfen) in HANDICAPS {
            let setup = sfen::parse_sfen(Variant::Standard, sfen).expect("handicap sfen");
            let pos = Shogi::from_setup(setup).expect("handicap is legal");
            assert_eq!(handicap_name(&pos), Some(name));
            let (variant, parsed) =
                parse_kif_header(&format!("手合割：{name}\n")).expect("parses");
            assert_eq!(variant, Variant::Standard);
            assert_eq!(parsed.board, pos.to_setup().board);
            assert_eq!(parsed.turn, pos.turn());
        }
    }

    #[test]
    fn test_diagram_with_hands() {
        let setup = sfen::parse_sfen(Variant::Standard, "4k4/9/9/9/9/9/9/9/4K4 b 2RB3Pp 1")
            .expect("valid sfen");
        let pos = Shogi::from_setup(setup).expect("legal");
        let kif = make_kif_header(&pos);
        assert!(kif.contains("先手の持駒：飛二　角　歩三"));
        assert!(kif.contains("後手の持駒：歩"));
        let (_, parsed) = parse_kif_header(&kif).expect("parses");
        assert_eq!(parsed.hands, pos.to_setup().hands);
        assert_eq!(parsed.board, pos.to_setup().board);
    }

    #[test]
    fn test_minishogi_header() {
        let pos = Minishogi::default();
        let kif = make_kif_header(&pos);
        let (variant, setup) = parse_kif_header(&kif).expect("parses");
        assert_eq!(variant, Variant::Minishogi);
        assert_eq!(setup.board, pos.to_setup().board);
    }

    #[test]
    fn test_moves() {
        let pos = Shogi::default();
        let m = Move::Normal {
            from: "7g".parse().unwrap(),
            to: "7f".parse().unwrap(),
            promotion: false,
        };
        assert_eq!(make_kif_move(&pos, m).as_deref(), Some("７六歩(77)"));
        assert_eq!(parse_kif_move(Variant::Standard, "７六歩(77)", None), Some(m));

        let drop = Move::Drop {
            role: Role::Bishop,
            to: "4e".parse().unwrap(),
        };
        assert_eq!(
            parse_kif_move(Variant::Standard, "４五角打", None),
            Some(drop)
        );

        assert_eq!(
            parse_kif_move(Variant::Standard, "同　銀(31)", Some("2b".parse().unwrap())),
            Some(Move::Normal {
                from: "3a".parse().unwrap(),
                to: "2b".parse().unwrap(),
                promotion: false,
            })
        );

        assert_eq!(
            parse_kif_move(Variant::Standard, "２二角成(88)", None),
            Some(Move::Normal {
                from: "8h".parse().unwrap(),
                to: "2b".parse().unwrap(),
                promotion: true,
            })
        );
        assert_eq!(
            parse_kif_move(Variant::Standard, "２二角不成(88)", None),
            Some(Move::Normal {
                from: "8h".parse().unwrap(),
                to: "2b".parse().unwrap(),
                promotion: false,
            })
        );

        assert_eq!(parse_kif_move(Variant::Standard, "７六歩", None), None);
        assert_eq!(parse_kif_move(Variant::Standard, "同　歩(76)", None), None);
    }

    #[test]
    fn test_chushogi_lion_move() {
        let pos = Chushogi::default();
        // Not legal from the start; formatting is still well-defined.
        let m = Move::Lion {
            from: "7j".parse().unwrap(),
            mid: "7i".parse().unwrap(),
            to: "7h".parse().unwrap(),
        };
        let s = make_kif_move(&pos, m).expect("formats");
        assert_eq!(s, "７九・７八獅(0710)");
        assert_eq!(parse_kif_move(Variant::Chushogi, &s, None), Some(m));
    }

    #[test]
    fn test_chushogi_wide_square() {
        let m = Move::Normal {
            from: "12l".parse().unwrap(),
            to: "12k".parse().unwrap(),
            promotion: false,
        };
        let pos = Chushogi::default();
        let s = make_kif_move(&pos, m).expect("formats");
        assert_eq!(s, "１２十一香(1212)");
        assert_eq!(parse_kif_move(Variant::Chushogi, &s, None), Some(m));
    }
}
