//! A library for shogi vocabulary, move generation and notation.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use banmen::{Shogi, Position};
//!
//! let pos = Shogi::default();
//! let legals = pos.legal_moves();
//! assert_eq!(legals.len(), 30);
//! ```
//!
//! Play moves:
//!
//! ```
//! # use banmen::{Shogi, Position};
//! use banmen::Move;
//! #
//! # let pos = Shogi::default();
//!
//! // 1. ７六歩
//! let pos = pos.play(Move::Normal {
//!     from: "7g".parse()?,
//!     to: "7f".parse()?,
//!     promotion: false,
//! })?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! # use banmen::{Shogi, Position};
//! # let pos = Shogi::default();
//! assert!(!pos.is_checkmate());
//! assert_eq!(pos.outcome(), None); // no winner yet
//! ```
//!
//! Also supports [SFEN](sfen), [USI](usi), [KIF](kif) and [CSA](csa)
//! notations for positions and moves, and the [`minishogi`](Minishogi)
//! and [`chushogi`](Chushogi) variants.
//!
//! # Feature flags
//!
//! * `arbitrary`: Implements [`arbitrary::Arbitrary`](https://docs.rs/arbitrary/1/arbitrary/trait.Arbitrary.html)
//!   for vocabulary types.
//! * `serde`: Implements [`serde`](https://docs.rs/serde/1)
//!   serialization/deserialization for types with unique natural
//!   representations.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![warn(missing_debug_implementations)]
#![allow(clippy::too_many_arguments)]

mod board;
mod color;
mod hand;
mod m;
mod perft;
mod position;
mod role;
mod setup;
mod square;
mod types;
mod util;
mod variant;

pub mod attacks;
pub mod square_set;
pub mod csa;
pub mod japanese;
pub mod kif;
pub mod sfen;
pub mod usi;
pub mod western;

pub use board::Board;
pub use color::{ByColor, Color, ParseColorError};
pub use hand::{Hand, HAND_ROLES};
pub use m::{Move, MoveList};
pub use perft::perft;
pub use position::{
    Context, FromSetup, Outcome, PlayError, Position, PositionError, PositionErrorKinds, Shogi,
};
pub use role::Role;
pub use setup::Setup;
pub use square::{ParseSquareError, Square};
pub use square_set::SquareSet;
pub use types::Piece;
pub use variant::{Chushogi, Minishogi, Variant, VariantPosition};

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Role {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
