use std::{error::Error, fmt, num::NonZeroU32};

use crate::{
    attacks,
    board::Board,
    color::{ByColor, Color},
    hand::{Hand, HAND_ROLES},
    m::{Move, MoveList},
    role::Role,
    setup::Setup,
    square::Square,
    square_set::SquareSet,
    types::Piece,
    variant::Variant,
};

/// The king of the side to move, the pieces giving check and the pieces
/// pinned to the king, as computed by [`Position::ctx()`].
#[derive(Clone, Debug)]
pub struct Context {
    /// The king (or other royal) of the side to move, if on the board.
    pub king: Option<Square>,
    /// Enemy pieces currently attacking the king.
    pub checkers: SquareSet,
    /// Pieces that stand alone between the king and an enemy sniper.
    pub blockers: SquareSet,
}

impl Context {
    pub(crate) fn undefended() -> Context {
        Context {
            king: None,
            checkers: SquareSet::EMPTY,
            blockers: SquareSet::EMPTY,
        }
    }
}

/// The reason a game is over, and the winner where there is one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The side to move is in check without a legal move.
    Checkmate { winner: Color },
    /// The side to move has no legal move but is not in check. In shogi
    /// this is a loss for the stalemated player, not a draw.
    Stalemate { winner: Color },
    /// Dead position, e.g. two lone kings.
    Draw,
    /// Chushogi: a side is reduced to its royals and at most one other
    /// piece while the opponent retains material.
    BareKing { winner: Color },
    /// Chushogi: a side has lost all of its royal pieces.
    KingLost { winner: Color },
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner }
            | Outcome::Stalemate { winner }
            | Outcome::BareKing { winner }
            | Outcome::KingLost { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }
}

bitflags::bitflags! {
    /// Reasons for a [`Setup`] not being a legal [`Position`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PositionErrorKinds: u32 {
        /// There are no pieces on the board.
        const EMPTY_BOARD = 1 << 0;

        /// Pieces are placed outside the variant's board area.
        const OUT_OF_RANGE = 1 << 1;

        /// The board or the hands contain pieces that do not exist in
        /// the variant.
        const INVALID_PIECES = 1 << 2;

        /// A side has more royal pieces than the variant allows.
        const TOO_MANY_KINGS = 1 << 3;

        /// The side not to move is in check, so the previous move must
        /// have been illegal.
        const OPPOSITE_CHECK = 1 << 4;

        /// The side to move is checked by more pieces than any chain of
        /// legal moves could produce.
        const IMPOSSIBLE_CHECK = 1 << 5;

        /// An unpromoted piece sits on a rank from which it could never
        /// move again.
        const IMMOBILE_PIECES = 1 << 6;
    }
}

/// Error when trying to create a [`Position`] from an illegal [`Setup`].
#[derive(Clone)]
pub struct PositionError<P> {
    pub(crate) pos: P,
    pub(crate) errors: PositionErrorKinds,
}

impl<P> PositionError<P> {
    pub fn kinds(&self) -> PositionErrorKinds {
        self.errors
    }

    fn ignore(self, ignored: PositionErrorKinds) -> Result<P, PositionError<P>> {
        let errors = self.errors - ignored;
        if errors.is_empty() {
            Ok(self.pos)
        } else {
            Err(PositionError { errors, ..self })
        }
    }

    /// Get the position, even if the side to move appears to be checked
    /// by an impossible combination of pieces.
    pub fn ignore_impossible_check(self) -> Result<P, PositionError<P>> {
        self.ignore(PositionErrorKinds::IMPOSSIBLE_CHECK)
    }

    /// Get the position, even if pieces sit on ranks from which they
    /// could never move.
    pub fn ignore_immobile_pieces(self) -> Result<P, PositionError<P>> {
        self.ignore(PositionErrorKinds::IMMOBILE_PIECES)
    }

    /// Get the position, even with more royals per side than the
    /// variant allows.
    pub fn ignore_too_many_kings(self) -> Result<P, PositionError<P>> {
        self.ignore(PositionErrorKinds::TOO_MANY_KINGS)
    }
}

impl<P> fmt::Debug for PositionError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionError")
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl<P> fmt::Display for PositionError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal position: {:?}", self.errors)
    }
}

impl<P> Error for PositionError<P> {}

/// Error when playing an illegal move on a [`Position`].
#[derive(Clone)]
pub struct PlayError<P> {
    pub m: Move,
    pub(crate) pos: P,
}

impl<P> PlayError<P> {
    /// Returns the unchanged position.
    pub fn into_inner(self) -> P {
        self.pos
    }
}

impl<P> fmt::Debug for PlayError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayError").field("m", &self.m).finish_non_exhaustive()
    }
}

impl<P> fmt::Display for PlayError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal move: {}", self.m)
    }
}

impl<P> Error for PlayError<P> {}

/// Validate and set up an arbitrary position.
pub trait FromSetup: Sized {
    /// Tries to set up a position from the given material.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if the setup does not meet the
    /// variant's basic validity requirements. The error can be
    /// inspected and selectively ignored.
    fn from_setup(setup: Setup) -> Result<Self, PositionError<Self>>;
}

/// A playable position with the rules of one of the supported variants.
///
/// # Equivalence
///
/// Positions of the same variant are equivalent if their
/// [`Setup`](Position::to_setup)s are equal.
pub trait Position {
    /// The variant whose rules the position follows.
    fn variant(&self) -> Variant;

    /// Piece positions on the board.
    fn board(&self) -> &Board;

    /// Captured pieces per side. Always empty in chushogi.
    fn hands(&self) -> &ByColor<Hand>;

    /// The side to move.
    fn turn(&self) -> Color;

    /// The current move number, starting at 1 and increasing with every
    /// move of either side.
    fn move_number(&self) -> NonZeroU32;

    /// The move that produced this position, if it was produced by
    /// [`Position::play_unchecked`].
    fn last_move(&self) -> Option<Move>;

    /// The square on which a lion was captured by a non-lion piece on
    /// the previous move. Only ever `Some` in chushogi.
    fn last_lion_capture(&self) -> Option<Square> {
        None
    }

    /// Converts the position back to material for serialization.
    fn to_setup(&self) -> Setup;

    /// The pieces of `attacker` that attack `sq` on a board with the
    /// given occupancy.
    fn square_attackers(&self, sq: Square, attacker: Color, occupied: SquareSet) -> SquareSet;

    /// The sliding pieces of `attacker` that would attack `sq` on an
    /// empty board: the potential pinners.
    fn square_snipers(&self, sq: Square, attacker: Color) -> SquareSet;

    /// King location, checkers and pinned pieces for the side to move.
    fn ctx(&self) -> Context;

    /// Legal destination squares for the piece on `from`.
    fn move_dests(&self, from: Square, ctx: &Context) -> SquareSet;

    /// Legal drop squares for a hand piece. The hand count itself is
    /// not consulted; callers check `hands().get(color).get(role) > 0`.
    fn drop_dests(&self, piece: Piece, ctx: &Context) -> SquareSet;

    /// Generates all legal moves.
    fn legal_moves(&self) -> MoveList;

    /// Tests a caller-supplied move for full legality, including
    /// promotion rules.
    fn is_legal(&self, m: Move) -> bool;

    /// Plays a move without any validation.
    ///
    /// The caller is responsible for ensuring the move is legal, by
    /// membership in [`Position::legal_moves`] or via
    /// [`Position::is_legal`]. Playing an illegal move silently
    /// corrupts the position.
    fn play_unchecked(&mut self, m: Move);

    /// The outcome of the game, or `None` if the game is ongoing.
    fn outcome(&self) -> Option<Outcome>;

    /// The king (or other royal piece) of the given color.
    fn king_of(&self, color: Color) -> Option<Square> {
        self.board().king_of(color)
    }

    /// Tests if the given side is in check.
    fn is_check(&self, color: Color) -> bool {
        self.king_of(color).is_some_and(|king| {
            self.square_attackers(king, !color, self.board().occupied()).any()
        })
    }

    /// Tests for checkmate.
    fn is_checkmate(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Checkmate { .. }))
    }

    /// Tests if the game is over.
    fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Plays a move after checking its legality.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayError`] with the unchanged position if the move
    /// is illegal.
    fn play(mut self, m: Move) -> Result<Self, PlayError<Self>>
    where
        Self: Sized,
    {
        if self.is_legal(m) {
            self.play_unchecked(m);
            Ok(self)
        } else {
            Err(PlayError { m, pos: self })
        }
    }

    /// Legal destinations for every piece of the side to move, for
    /// rendering move hints and validating submitted moves.
    fn all_move_dests(&self) -> Vec<(Square, SquareSet)> {
        let ctx = self.ctx();
        self.board()
            .by_color(self.turn())
            .into_iter()
            .map(|from| (from, self.move_dests(from, &ctx)))
            .filter(|(_, dests)| dests.any())
            .collect()
    }

    /// Legal drop destinations for every piece in the hand of the side
    /// to move.
    fn all_drop_dests(&self) -> Vec<(Piece, SquareSet)> {
        let ctx = self.ctx();
        let color = self.turn();
        self.variant()
            .hand_roles()
            .iter()
            .filter(|&&role| self.hands().get(color).get(role) > 0)
            .map(|&role| {
                let piece = role.of(color);
                (piece, self.drop_dests(piece, &ctx))
            })
            .filter(|(_, dests)| dests.any())
            .collect()
    }
}

/// Common state and rules machinery shared by the variants with hands.
///
/// All methods take the variant as a parameter so that standard shogi
/// and minishogi can share every code path; chushogi keeps its own
/// rules in [`crate::variant::Chushogi`] and reuses only the parts that
/// carry over.
#[derive(Clone, Debug)]
pub(crate) struct Core {
    pub board: Board,
    pub hands: ByColor<Hand>,
    pub turn: Color,
    pub move_number: NonZeroU32,
    pub last_move: Option<Move>,
}

impl Core {
    pub fn from_setup(setup: Setup) -> Core {
        Core {
            board: setup.board,
            hands: setup.hands,
            turn: setup.turn,
            move_number: setup.move_number,
            last_move: None,
        }
    }

    pub fn to_setup(&self) -> Setup {
        Setup {
            board: self.board.clone(),
            hands: self.hands,
            turn: self.turn,
            move_number: self.move_number,
            last_lion_capture: None,
        }
    }

    pub fn attackers(
        &self,
        variant: Variant,
        sq: Square,
        attacker: Color,
        occupied: SquareSet,
    ) -> SquareSet {
        let mut attackers = SquareSet::EMPTY;
        for &role in variant.roles() {
            let candidates = self.board.by_piece(role.of(attacker));
            if candidates.any() {
                // A piece on `s` attacks `sq` exactly if the mirrored
                // piece on `sq` attacks `s`.
                attackers |= attacks::attacks(role.of(!attacker), sq, occupied) & candidates;
            }
        }
        attackers
    }

    pub fn snipers(&self, variant: Variant, sq: Square, attacker: Color) -> SquareSet {
        let mut snipers = SquareSet::EMPTY;
        for &role in variant.roles() {
            let candidates = self.board.by_piece(role.of(attacker));
            if candidates.any() {
                snipers |= attacks::sniper_rays(role.of(!attacker), sq) & candidates;
            }
        }
        snipers
    }

    pub fn ctx(&self, variant: Variant) -> Context {
        let Some(king) = self.board.king_of(self.turn) else {
            return Context::undefended();
        };
        let checkers = self.attackers(variant, king, !self.turn, self.board.occupied());
        let mut blockers = SquareSet::EMPTY;
        for sniper in self.snipers(variant, king, !self.turn) {
            let b = attacks::between(king, sniper) & self.board.occupied();
            if !b.more_than_one() {
                blockers |= b;
            }
        }
        Context {
            king: Some(king),
            checkers,
            blockers,
        }
    }

    pub fn move_dests(&self, variant: Variant, from: Square, ctx: &Context) -> SquareSet {
        let piece = match self.board.get(from) {
            Some(piece) if piece.color == self.turn => piece,
            _ => return SquareSet::EMPTY,
        };
        let occupied = self.board.occupied();
        let mut pseudo = attacks::attacks(piece, from, occupied)
            & !self.board.by_color(self.turn)
            & variant.area();

        let Some(king) = ctx.king else {
            return pseudo;
        };

        if from == king {
            // The king must not move to an attacked square, with its
            // own square already vacated for sliders behind it.
            let occupied = occupied.without(from);
            let mut safe = SquareSet::EMPTY;
            for to in pseudo {
                if self.attackers(variant, to, !self.turn, occupied).is_empty() {
                    safe.add(to);
                }
            }
            pseudo = safe;
        } else {
            if ctx.checkers.any() {
                // In double check only the king can move.
                let Some(checker) = ctx.checkers.single_square() else {
                    return SquareSet::EMPTY;
                };
                pseudo &= attacks::between(king, checker).with(checker);
            }
            if ctx.blockers.contains(from) {
                pseudo &= attacks::ray(from, king);
            }
        }
        pseudo
    }

    pub fn drop_dests(&self, variant: Variant, piece: Piece, ctx: &Context) -> SquareSet {
        if piece.color != self.turn {
            return SquareSet::EMPTY;
        }
        let mut pseudo = variant.drop_zone(piece) & !self.board.occupied();

        if piece.role == Role::Pawn {
            // Nifu: at most one unpromoted pawn per file and side.
            let mut doubled = SquareSet::EMPTY;
            for pawn in self.board.by_piece(piece) {
                doubled |= SquareSet::from_file(pawn.file());
            }
            pseudo &= !doubled;
        }

        if let (Some(king), true) = (ctx.king, ctx.checkers.any()) {
            // A drop cannot capture the checker, it can only block.
            let Some(checker) = ctx.checkers.single_square() else {
                return SquareSet::EMPTY;
            };
            pseudo &= attacks::between(king, checker);
        }

        if piece.role == Role::Pawn {
            // Uchifuzume: a pawn may not be dropped to deliver mate,
            // although dropping it to deliver plain check is fine.
            if let Some(their_king) = self.board.king_of(!self.turn) {
                let checking_square = attacks::pawn_attacks(!self.turn, their_king);
                if let Some(to) = (checking_square & pseudo).first() {
                    if self.is_pawn_drop_mate(variant, to) {
                        pseudo.remove(to);
                    }
                }
            }
        }

        pseudo
    }

    fn is_pawn_drop_mate(&self, variant: Variant, to: Square) -> bool {
        let mut after = self.clone();
        after.play_unchecked(
            variant,
            Move::Drop {
                role: Role::Pawn,
                to,
            },
        );
        matches!(after.outcome(variant), Some(Outcome::Checkmate { .. }))
    }

    pub fn is_legal(&self, variant: Variant, m: Move) -> bool {
        let ctx = self.ctx(variant);
        match m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                let Some(piece) = self.board.get(from) else {
                    return false;
                };
                if piece.color != self.turn || !self.move_dests(variant, from, &ctx).contains(to) {
                    return false;
                }
                if promotion {
                    variant.can_promote(piece, from, to, self.board.has(to))
                } else {
                    !variant.forced_promotion(piece, to)
                }
            }
            Move::Drop { role, to } => {
                self.hands.get(self.turn).get(role) > 0
                    && variant.hand_roles().contains(&role)
                    && self.drop_dests(variant, role.of(self.turn), &ctx).contains(to)
            }
            Move::Lion { .. } => false,
        }
    }

    pub fn play_unchecked(&mut self, variant: Variant, m: Move) {
        let color = self.turn;
        match m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                if let Some(piece) = self.board.take(from) {
                    let role = if promotion || variant.forced_promotion(piece, to) {
                        variant.promote(piece.role).unwrap_or(piece.role)
                    } else {
                        piece.role
                    };
                    if let Some(captured) = self.board.set(to, role.of(color)) {
                        let unpromoted =
                            variant.unpromote(captured.role).unwrap_or(captured.role);
                        self.hands.get_mut(color).capture(unpromoted);
                    }
                }
            }
            Move::Drop { role, to } => {
                self.hands.get_mut(color).drop(role);
                self.board.set(to, role.of(color));
            }
            Move::Lion { .. } => (),
        }
        self.last_move = Some(m);
        self.turn = !color;
        self.move_number = self
            .move_number
            .checked_add(1)
            .unwrap_or(self.move_number);
    }

    pub fn legal_moves(&self, variant: Variant) -> MoveList {
        let mut moves = MoveList::new();
        let ctx = self.ctx(variant);
        for from in self.board.by_color(self.turn) {
            let Some(piece) = self.board.get(from) else {
                continue;
            };
            for to in self.move_dests(variant, from, &ctx) {
                if variant.can_promote(piece, from, to, self.board.has(to)) {
                    moves.push(Move::Normal {
                        from,
                        to,
                        promotion: true,
                    });
                    if !variant.forced_promotion(piece, to) {
                        moves.push(Move::Normal {
                            from,
                            to,
                            promotion: false,
                        });
                    }
                } else {
                    moves.push(Move::Normal {
                        from,
                        to,
                        promotion: false,
                    });
                }
            }
        }
        for &role in variant.hand_roles() {
            if self.hands.get(self.turn).get(role) > 0 {
                for to in self.drop_dests(variant, role.of(self.turn), &ctx) {
                    moves.push(Move::Drop { role, to });
                }
            }
        }
        moves
    }

    pub fn has_dests(&self, variant: Variant, ctx: &Context) -> bool {
        for from in self.board.by_color(self.turn) {
            if self.move_dests(variant, from, ctx).any() {
                return true;
            }
        }
        for &role in variant.hand_roles() {
            if self.hands.get(self.turn).get(role) > 0
                && self.drop_dests(variant, role.of(self.turn), ctx).any()
            {
                return true;
            }
        }
        false
    }

    pub fn outcome(&self, variant: Variant) -> Option<Outcome> {
        let ctx = self.ctx(variant);
        if !self.has_dests(variant, &ctx) {
            Some(if ctx.checkers.any() {
                Outcome::Checkmate { winner: !self.turn }
            } else {
                Outcome::Stalemate { winner: !self.turn }
            })
        } else if self.board.occupied().count() <= 2 && self.hands.is_empty() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Material validity: everything that can be checked without move
    /// generation.
    pub fn validate_material(&self, variant: Variant) -> PositionErrorKinds {
        let mut errors = PositionErrorKinds::empty();

        if self.board.occupied().is_empty() {
            errors |= PositionErrorKinds::EMPTY_BOARD;
        }

        if (self.board.occupied() & !variant.area()).any() {
            errors |= PositionErrorKinds::OUT_OF_RANGE;
        }

        for (sq, piece) in self.board.iter() {
            if !variant.roles().contains(&piece.role) {
                errors |= PositionErrorKinds::INVALID_PIECES;
            }
            if variant.forced_promotion(piece, sq) {
                errors |= PositionErrorKinds::IMMOBILE_PIECES;
            }
        }

        for color in Color::ALL {
            for role in HAND_ROLES {
                if self.hands.get(color).get(role) > 0
                    && !variant.hand_roles().contains(&role)
                {
                    errors |= PositionErrorKinds::INVALID_PIECES;
                }
            }
            if (self.board.by_role(Role::King) & self.board.by_color(color)).more_than_one()
                || (self.board.by_role(Role::Prince) & self.board.by_color(color)).more_than_one()
            {
                errors |= PositionErrorKinds::TOO_MANY_KINGS;
            }
        }

        errors
    }

    /// Check-based validity for the variants that enforce king safety.
    pub fn validate_checks(&self, variant: Variant) -> PositionErrorKinds {
        let mut errors = PositionErrorKinds::empty();

        if let Some(their_king) = self.board.king_of(!self.turn) {
            if self
                .attackers(variant, their_king, self.turn, self.board.occupied())
                .any()
            {
                errors |= PositionErrorKinds::OPPOSITE_CHECK;
            }
        }

        let ctx = self.ctx(variant);
        if let Some(king) = ctx.king {
            if ctx.checkers.count() > 2 {
                errors |= PositionErrorKinds::IMPOSSIBLE_CHECK;
            } else if let Some((first, second)) = {
                let mut checkers = ctx.checkers.into_iter();
                checkers.next().zip(checkers.next())
            } {
                // Two checkers on one line through the king cannot be
                // reached by any legal previous move.
                if attacks::aligned(first, second, king) {
                    errors |= PositionErrorKinds::IMPOSSIBLE_CHECK;
                }
            }
        }

        errors
    }
}

/// A standard 9×9 shogi position.
///
/// # Examples
///
/// ```
/// use banmen::{Shogi, Position};
///
/// let pos = Shogi::default();
/// assert_eq!(pos.legal_moves().len(), 30);
/// ```
#[derive(Clone, Debug)]
pub struct Shogi {
    pub(crate) core: Core,
}

impl Default for Shogi {
    fn default() -> Shogi {
        Shogi {
            core: Core::from_setup(Variant::Standard.initial_setup()),
        }
    }
}

impl FromSetup for Shogi {
    fn from_setup(setup: Setup) -> Result<Shogi, PositionError<Shogi>> {
        let core = Core::from_setup(setup);
        let errors = core.validate_material(Variant::Standard)
            | core.validate_checks(Variant::Standard);
        let pos = Shogi { core };
        if errors.is_empty() {
            Ok(pos)
        } else {
            Err(PositionError { pos, errors })
        }
    }
}

impl Position for Shogi {
    fn variant(&self) -> Variant {
        Variant::Standard
    }

    fn board(&self) -> &Board {
        &self.core.board
    }

    fn hands(&self) -> &ByColor<Hand> {
        &self.core.hands
    }

    fn turn(&self) -> Color {
        self.core.turn
    }

    fn move_number(&self) -> NonZeroU32 {
        self.core.move_number
    }

    fn last_move(&self) -> Option<Move> {
        self.core.last_move
    }

    fn to_setup(&self) -> Setup {
        self.core.to_setup()
    }

    fn square_attackers(&self, sq: Square, attacker: Color, occupied: SquareSet) -> SquareSet {
        self.core.attackers(Variant::Standard, sq, attacker, occupied)
    }

    fn square_snipers(&self, sq: Square, attacker: Color) -> SquareSet {
        self.core.snipers(Variant::Standard, sq, attacker)
    }

    fn ctx(&self) -> Context {
        self.core.ctx(Variant::Standard)
    }

    fn move_dests(&self, from: Square, ctx: &Context) -> SquareSet {
        self.core.move_dests(Variant::Standard, from, ctx)
    }

    fn drop_dests(&self, piece: Piece, ctx: &Context) -> SquareSet {
        self.core.drop_dests(Variant::Standard, piece, ctx)
    }

    fn legal_moves(&self) -> MoveList {
        self.core.legal_moves(Variant::Standard)
    }

    fn is_legal(&self, m: Move) -> bool {
        self.core.is_legal(Variant::Standard, m)
    }

    fn play_unchecked(&mut self, m: Move) {
        self.core.play_unchecked(Variant::Standard, m);
    }

    fn outcome(&self) -> Option<Outcome> {
        self.core.outcome(Variant::Standard)
    }
}
