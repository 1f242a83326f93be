use std::num::NonZeroU32;

use crate::{
    board::Board,
    color::{ByColor, Color},
    hand::Hand,
    square::Square,
    variant::Variant,
};

/// A not necessarily legal position.
///
/// This is the raw material a notation parser produces and a
/// [`Position`](crate::Position) is validated from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Setup {
    /// Piece positions on the board.
    pub board: Board,

    /// Captured pieces per side. Conceptually absent in chushogi, where
    /// both hands stay empty.
    pub hands: ByColor<Hand>,

    /// Side to move.
    pub turn: Color,

    /// Current move number. Starts at 1 and increases with every move
    /// played by either side.
    pub move_number: NonZeroU32,

    /// The square on which a lion was last captured by a non-lion
    /// piece, if that happened on the previous move. Only meaningful in
    /// chushogi, where it drives the counterstrike rule.
    pub last_lion_capture: Option<Square>,
}

impl Setup {
    pub fn empty() -> Setup {
        Setup {
            board: Board::empty(),
            hands: ByColor::default(),
            turn: Color::Sente,
            move_number: NonZeroU32::MIN,
            last_lion_capture: None,
        }
    }
}

impl Default for Setup {
    fn default() -> Setup {
        Variant::Standard.initial_setup()
    }
}
