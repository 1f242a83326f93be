//! Piece positions on a board.

use std::{fmt, fmt::Write as _};

use crate::{
    color::{ByColor, Color},
    role::Role,
    square::Square,
    square_set::SquareSet,
    types::Piece,
};

/// Piece positions on a board.
///
/// The board is represented as a set of occupied squares, one set per
/// color and one set per role. `occupied` is always the union of the
/// two color sets, which in turn is the union of all role sets; every
/// mutation maintains this.
///
/// A `Board` is pure placement: it knows nothing about whose turn it
/// is, hands, or which variant it belongs to.
#[derive(Clone, Eq, PartialEq)]
pub struct Board {
    occupied: SquareSet,
    color: ByColor<SquareSet>,
    roles: [SquareSet; Role::ALL.len()],
}

impl Board {
    pub const fn empty() -> Board {
        Board {
            occupied: SquareSet::EMPTY,
            color: ByColor {
                sente: SquareSet::EMPTY,
                gote: SquareSet::EMPTY,
            },
            roles: [SquareSet::EMPTY; Role::ALL.len()],
        }
    }

    pub fn from_pieces<I>(pieces: I) -> Board
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        let mut board = Board::empty();
        for (sq, piece) in pieces {
            board.set(sq, piece);
        }
        board
    }

    #[inline]
    pub const fn occupied(&self) -> SquareSet {
        self.occupied
    }

    #[inline]
    pub const fn by_color(&self, color: Color) -> SquareSet {
        *self.color.get(color)
    }

    #[inline]
    pub const fn by_role(&self, role: Role) -> SquareSet {
        self.roles[role.index()]
    }

    #[inline]
    pub fn by_piece(&self, piece: Piece) -> SquareSet {
        self.by_color(piece.color) & self.by_role(piece.role)
    }

    #[inline]
    pub fn has(&self, sq: Square) -> bool {
        self.occupied.contains(sq)
    }

    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.color.sente.contains(sq) {
            Some(Color::Sente)
        } else if self.color.gote.contains(sq) {
            Some(Color::Gote)
        } else {
            None
        }
    }

    pub fn role_at(&self, sq: Square) -> Option<Role> {
        if !self.occupied.contains(sq) {
            return None;
        }
        Role::ALL
            .into_iter()
            .find(|role| self.roles[role.index()].contains(sq))
    }

    /// The piece at the given square, if any.
    pub fn get(&self, sq: Square) -> Option<Piece> {
        let color = self.color_at(sq)?;
        self.role_at(sq).map(|role| Piece { color, role })
    }

    /// Puts a piece on the given square, returning the previous
    /// occupant (the captured piece, if any).
    pub fn set(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let captured = self.take(sq);
        self.occupied.add(sq);
        self.color.get_mut(piece.color).add(sq);
        self.roles[piece.role.index()].add(sq);
        captured
    }

    /// Removes and returns the piece on the given square, if any.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.get(sq)?;
        self.occupied.toggle(sq);
        self.color.get_mut(piece.color).toggle(sq);
        self.roles[piece.role.index()].toggle(sq);
        Some(piece)
    }

    /// The royal pieces (kings and chushogi princes) of the given
    /// color.
    pub fn royals(&self, color: Color) -> SquareSet {
        (self.by_role(Role::King) | self.by_role(Role::Prince)) & self.by_color(color)
    }

    /// The king (or, failing that, the prince) of the given color.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        (self.by_role(Role::King) & self.by_color(color))
            .first()
            .or_else(|| self.royals(color).first())
    }

    /// Iterates over all pieces by ascending square index.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied
            .into_iter()
            .filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..16 {
            for file in (0..16).rev() {
                let sq = Square::new(rank * 16 + file);
                f.write_char(match self.get(sq) {
                    Some(piece) if piece.color.is_sente() => 'X',
                    Some(_) => 'x',
                    None => '.',
                })?;
                f.write_char(if file > 0 { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    #[test]
    fn test_set_and_take() {
        let mut board = Board::empty();
        assert_eq!(board.set(sq("5e"), Role::Silver.of(Color::Sente)), None);
        assert_eq!(board.get(sq("5e")), Some(Role::Silver.of(Color::Sente)));

        let captured = board.set(sq("5e"), Role::Gold.of(Color::Gote));
        assert_eq!(captured, Some(Role::Silver.of(Color::Sente)));
        assert_eq!(board.get(sq("5e")), Some(Role::Gold.of(Color::Gote)));

        assert_eq!(board.take(sq("5e")), Some(Role::Gold.of(Color::Gote)));
        assert_eq!(board.take(sq("5e")), None);
        assert!(board.occupied().is_empty());
    }

    #[test]
    fn test_occupied_invariant() {
        let mut board = Board::empty();
        board.set(sq("1a"), Role::Lance.of(Color::Gote));
        board.set(sq("5i"), Role::King.of(Color::Sente));
        board.set(sq("5i"), Role::Rook.of(Color::Sente));

        assert_eq!(
            board.occupied(),
            board.by_color(Color::Sente) | board.by_color(Color::Gote)
        );
        let role_union = Role::ALL
            .into_iter()
            .fold(SquareSet::EMPTY, |acc, role| acc | board.by_role(role));
        assert_eq!(board.occupied(), role_union);
    }

    #[test]
    fn test_royals() {
        let mut board = Board::empty();
        board.set(sq("5i"), Role::King.of(Color::Sente));
        board.set(sq("6f"), Role::Prince.of(Color::Sente));
        assert_eq!(board.royals(Color::Sente).count(), 2);
        assert_eq!(board.king_of(Color::Sente), Some(sq("5i")));
        board.take(sq("5i"));
        assert_eq!(board.king_of(Color::Sente), Some(sq("6f")));
        assert_eq!(board.king_of(Color::Gote), None);
    }
}
