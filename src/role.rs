use std::num;

use crate::{color::Color, types::Piece, util::out_of_range_error};

/// Piece types across all supported variants.
///
/// The first block covers standard shogi and minishogi. The second
/// block covers the chushogi pieces; chushogi promotions whose movement
/// duplicates another role still get a role of their own (for example
/// [`Role::RookPromoted`], a promoted gold general: it moves like a
/// rook but serializes as `+g` and is a different piece from a rook).
#[allow(missing_docs)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Role {
    // Standard shogi and minishogi.
    Pawn = 0,
    Lance,
    Knight,
    Silver,
    Gold,
    King,
    Bishop,
    Rook,
    Tokin,
    PromotedLance,
    PromotedKnight,
    PromotedSilver,
    Horse,
    Dragon,
    // Chushogi.
    GoBetween,
    Copper,
    Leopard,
    Elephant,
    Tiger,
    Kirin,
    Phoenix,
    Chariot,
    SideMover,
    VerticalMover,
    Queen,
    Lion,
    WhiteHorse,
    Whale,
    Stag,
    Prince,
    Boar,
    Ox,
    Falcon,
    Eagle,
    ElephantPromoted,
    SideMoverPromoted,
    VerticalMoverPromoted,
    RookPromoted,
    BishopPromoted,
    HorsePromoted,
    DragonPromoted,
    LionPromoted,
    QueenPromoted,
}

impl Role {
    /// Gets a [`Piece`] of the given color.
    #[inline]
    pub const fn of(self, color: Color) -> Piece {
        Piece { color, role: self }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the role is a royal piece (king, or the chushogi crown
    /// prince).
    #[inline]
    pub const fn is_royal(self) -> bool {
        matches!(self, Role::King | Role::Prince)
    }

    /// Whether the role has the full lion move (the chushogi lion and
    /// the promoted kirin).
    #[inline]
    pub const fn is_lion(self) -> bool {
        matches!(self, Role::Lion | Role::LionPromoted)
    }

    /// All roles, in discriminant order.
    pub const ALL: [Role; 43] = [
        Role::Pawn,
        Role::Lance,
        Role::Knight,
        Role::Silver,
        Role::Gold,
        Role::King,
        Role::Bishop,
        Role::Rook,
        Role::Tokin,
        Role::PromotedLance,
        Role::PromotedKnight,
        Role::PromotedSilver,
        Role::Horse,
        Role::Dragon,
        Role::GoBetween,
        Role::Copper,
        Role::Leopard,
        Role::Elephant,
        Role::Tiger,
        Role::Kirin,
        Role::Phoenix,
        Role::Chariot,
        Role::SideMover,
        Role::VerticalMover,
        Role::Queen,
        Role::Lion,
        Role::WhiteHorse,
        Role::Whale,
        Role::Stag,
        Role::Prince,
        Role::Boar,
        Role::Ox,
        Role::Falcon,
        Role::Eagle,
        Role::ElephantPromoted,
        Role::SideMoverPromoted,
        Role::VerticalMoverPromoted,
        Role::RookPromoted,
        Role::BishopPromoted,
        Role::HorsePromoted,
        Role::DragonPromoted,
        Role::LionPromoted,
        Role::QueenPromoted,
    ];
}

macro_rules! int_from_role_impl {
    ($($t:ty)+) => {
        $(impl From<Role> for $t {
            #[inline]
            fn from(role: Role) -> Self {
                role as Self
            }
        })+
    }
}

int_from_role_impl! { u8 i8 u16 i16 u32 i32 u64 i64 usize isize }

macro_rules! try_role_from_int_impl {
    ($($t:ty)+) => {
        $(impl TryFrom<$t> for Role {
            type Error = num::TryFromIntError;

            #[inline]
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                let index = usize::try_from(value).map_err(|_| out_of_range_error())?;
                Role::ALL.get(index).copied().ok_or_else(out_of_range_error)
            }
        })+
    }
}

try_role_from_int_impl! { u8 i8 u16 i16 u32 i32 u64 i64 usize isize }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_indexes() {
        for (index, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), index);
            assert_eq!(Role::try_from(index).unwrap(), role);
        }
        assert!(Role::try_from(Role::ALL.len()).is_err());
    }
}
