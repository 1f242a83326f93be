//! Shogi variants.
//!
//! Every variant implements [`FromSetup`] and [`Position`]. Standard
//! shogi and minishogi share their rules machinery; chushogi has its
//! own move generation with lion moves, no drops and no check
//! enforcement.

use std::num::NonZeroU32;

use crate::{
    attacks,
    board::Board,
    color::{ByColor, Color},
    hand::Hand,
    m::{Move, MoveList},
    position::{Context, Core, FromSetup, Outcome, Position, PositionError},
    role::Role,
    setup::Setup,
    square::Square,
    square_set::SquareSet,
    types::Piece,
};

pub use crate::position::Shogi;

/// Discriminant of [`VariantPosition`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Variant {
    /// Standard shogi on the 9×9 board, with drops.
    Standard,
    /// Minishogi on the 5×5 board, with drops and a reduced role set.
    Minishogi,
    /// Chushogi on the 12×12 board: no drops, lion-class pieces with
    /// two-step moves, and royal capture instead of checkmate.
    Chushogi,
}

const STANDARD_ROLES: &[Role] = &[
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
];

const MINISHOGI_ROLES: &[Role] = &[
    Role::Pawn,
    Role::Silver,
    Role::Gold,
    Role::King,
    Role::Bishop,
    Role::Rook,
    Role::Tokin,
    Role::PromotedSilver,
    Role::Horse,
    Role::Dragon,
];

const CHUSHOGI_ROLES: &[Role] = &[
    Role::Pawn,
    Role::Lance,
    Role::Silver,
    Role::Gold,
    Role::King,
    Role::Bishop,
    Role::Rook,
    Role::Tokin,
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

const STANDARD_HAND_ROLES: &[Role] = &[
    Role::Pawn,
    Role::Lance,
    Role::Knight,
    Role::Silver,
    Role::Gold,
    Role::Bishop,
    Role::Rook,
];

const MINISHOGI_HAND_ROLES: &[Role] = &[
    Role::Pawn,
    Role::Silver,
    Role::Gold,
    Role::Bishop,
    Role::Rook,
];

const fn zone(ranks: u32, depth: u32, files: u32, gote: bool) -> SquareSet {
    let area = SquareSet::board_area(files, ranks);
    if gote {
        area.intersect(SquareSet::first_ranks(ranks - depth).complement())
    } else {
        area.intersect(SquareSet::first_ranks(depth))
    }
}

static PROMOTION_ZONES: [ByColor<SquareSet>; 3] = [
    ByColor {
        sente: zone(9, 3, 9, false),
        gote: zone(9, 3, 9, true),
    },
    ByColor {
        sente: zone(5, 1, 5, false),
        gote: zone(5, 1, 5, true),
    },
    ByColor {
        sente: zone(12, 4, 12, false),
        gote: zone(12, 4, 12, true),
    },
];

impl Variant {
    /// All supported variants.
    pub const ALL: [Variant; 3] = [Variant::Standard, Variant::Minishogi, Variant::Chushogi];

    /// The lowercase variant name: `standard`, `minishogi` or
    /// `chushogi`.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Minishogi => "minishogi",
            Variant::Chushogi => "chushogi",
        }
    }

    /// Selects a variant by name.
    pub fn from_name(s: &str) -> Option<Variant> {
        Some(match s {
            "standard" | "shogi" => Variant::Standard,
            "minishogi" => Variant::Minishogi,
            "chushogi" => Variant::Chushogi,
            _ => return None,
        })
    }

    pub const fn files(self) -> u32 {
        match self {
            Variant::Standard => 9,
            Variant::Minishogi => 5,
            Variant::Chushogi => 12,
        }
    }

    pub const fn ranks(self) -> u32 {
        self.files()
    }

    const fn index(self) -> usize {
        match self {
            Variant::Standard => 0,
            Variant::Minishogi => 1,
            Variant::Chushogi => 2,
        }
    }

    /// The legal square range of the variant on the 16×16 grid.
    pub const fn area(self) -> SquareSet {
        match self {
            Variant::Standard => SquareSet::board_area(9, 9),
            Variant::Minishogi => SquareSet::board_area(5, 5),
            Variant::Chushogi => SquareSet::board_area(12, 12),
        }
    }

    /// The promotion zone for the given color.
    pub fn promotion_zone(self, color: Color) -> SquareSet {
        *PROMOTION_ZONES[self.index()].get(color)
    }

    /// The roles that exist in this variant.
    pub const fn roles(self) -> &'static [Role] {
        match self {
            Variant::Standard => STANDARD_ROLES,
            Variant::Minishogi => MINISHOGI_ROLES,
            Variant::Chushogi => CHUSHOGI_ROLES,
        }
    }

    /// The roles that can be dropped from hand. Empty for chushogi.
    pub const fn hand_roles(self) -> &'static [Role] {
        match self {
            Variant::Standard => STANDARD_HAND_ROLES,
            Variant::Minishogi => MINISHOGI_HAND_ROLES,
            Variant::Chushogi => &[],
        }
    }

    /// The rank of a square counted from the far side as seen by
    /// `color`, so 0 is the farthest rank.
    pub fn relative_rank(self, color: Color, sq: Square) -> u32 {
        match color {
            Color::Sente => sq.rank(),
            Color::Gote => self.ranks() - 1 - sq.rank(),
        }
    }

    /// The promoted form of the role, if it has one in this variant.
    pub fn promote(self, role: Role) -> Option<Role> {
        Some(match self {
            Variant::Standard => match role {
                Role::Pawn => Role::Tokin,
                Role::Lance => Role::PromotedLance,
                Role::Knight => Role::PromotedKnight,
                Role::Silver => Role::PromotedSilver,
                Role::Bishop => Role::Horse,
                Role::Rook => Role::Dragon,
                _ => return None,
            },
            Variant::Minishogi => match role {
                Role::Pawn => Role::Tokin,
                Role::Silver => Role::PromotedSilver,
                Role::Bishop => Role::Horse,
                Role::Rook => Role::Dragon,
                _ => return None,
            },
            Variant::Chushogi => match role {
                Role::Pawn => Role::Tokin,
                Role::GoBetween => Role::ElephantPromoted,
                Role::Lance => Role::WhiteHorse,
                Role::Chariot => Role::Whale,
                Role::Copper => Role::SideMoverPromoted,
                Role::Silver => Role::VerticalMoverPromoted,
                Role::Gold => Role::RookPromoted,
                Role::Leopard => Role::BishopPromoted,
                Role::Tiger => Role::Stag,
                Role::Elephant => Role::Prince,
                Role::Kirin => Role::LionPromoted,
                Role::Phoenix => Role::QueenPromoted,
                Role::SideMover => Role::Boar,
                Role::VerticalMover => Role::Ox,
                Role::Bishop => Role::HorsePromoted,
                Role::Rook => Role::DragonPromoted,
                Role::Horse => Role::Falcon,
                Role::Dragon => Role::Eagle,
                _ => return None,
            },
        })
    }

    /// The unpromoted form of the role, or `None` if the role is not a
    /// promoted piece in this variant.
    pub fn unpromote(self, role: Role) -> Option<Role> {
        self.roles()
            .iter()
            .copied()
            .find(|&unpromoted| self.promote(unpromoted) == Some(role))
    }

    /// Whether a move of `piece` from `from` to `to` may promote.
    ///
    /// In standard shogi and minishogi a move may promote whenever it
    /// starts or ends in the promotion zone. In chushogi a move may
    /// promote when it enters the zone from outside, or when it starts
    /// inside the zone and captures.
    pub fn can_promote(self, piece: Piece, from: Square, to: Square, capture: bool) -> bool {
        if self.promote(piece.role).is_none() {
            return false;
        }
        let zone = self.promotion_zone(piece.color);
        match self {
            Variant::Standard | Variant::Minishogi => zone.contains(from) || zone.contains(to),
            Variant::Chushogi => {
                (zone.contains(to) && !zone.contains(from))
                    || (zone.contains(from) && capture)
                    // A piece that would be stranded promotes in any case.
                    || self.forced_promotion(piece, to)
            }
        }
    }

    /// Whether an unpromoted `piece` arriving on `to` must promote
    /// because it could never move again.
    pub fn forced_promotion(self, piece: Piece, to: Square) -> bool {
        let rel = self.relative_rank(piece.color, to);
        match self {
            Variant::Standard => match piece.role {
                Role::Pawn | Role::Lance => rel == 0,
                Role::Knight => rel <= 1,
                _ => false,
            },
            Variant::Minishogi => piece.role == Role::Pawn && rel == 0,
            Variant::Chushogi => matches!(piece.role, Role::Pawn | Role::Lance) && rel == 0,
        }
    }

    /// The squares a piece of the given role may be dropped on, before
    /// occupancy, nifu and drop-mate restrictions.
    pub fn drop_zone(self, piece: Piece) -> SquareSet {
        let depth = match (self, piece.role) {
            (Variant::Standard, Role::Pawn | Role::Lance) => 1,
            (Variant::Standard, Role::Knight) => 2,
            (Variant::Minishogi, Role::Pawn) => 1,
            _ => 0,
        };
        let forbidden = match piece.color {
            Color::Sente => SquareSet::first_ranks(depth),
            Color::Gote => !SquareSet::first_ranks(self.ranks() - depth),
        };
        self.area() & !forbidden
    }

    /// The SFEN of the variant's starting position.
    pub const fn initial_sfen(self) -> &'static str {
        match self {
            Variant::Standard => {
                "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/9/1B5R1/LNSGKGSNL b - 1"
            }
            Variant::Minishogi => "rbsgk/4p/5/P4/KGSBR b - 1",
            Variant::Chushogi => {
                "lfcsgekgscfl/a1b1txot1b1a/mvrhdqndhrvm/pppppppppppp/3i4i3/12/12/3I4I3/PPPPPPPPPPPP/MVRHDNQDHRVM/A1B1TOXT1B1A/LFCSGKEGSCFL b - 1"
            }
        }
    }

    /// The starting position of the variant as raw material.
    pub fn initial_setup(self) -> Setup {
        let files = self.files();
        let ranks = self.ranks();
        let mut board = Board::empty();
        let mut place = |file: u32, rank: u32, role: Role| {
            if let Some(sq) = Square::from_coords(file, rank) {
                board.set(sq, role.of(Color::Sente));
            }
            if let Some(sq) = Square::from_coords(files - 1 - file, ranks - 1 - rank) {
                board.set(sq, role.of(Color::Gote));
            }
        };
        match self {
            Variant::Standard => {
                const BACK: [Role; 9] = [
                    Role::Lance,
                    Role::Knight,
                    Role::Silver,
                    Role::Gold,
                    Role::King,
                    Role::Gold,
                    Role::Silver,
                    Role::Knight,
                    Role::Lance,
                ];
                for (file, role) in BACK.into_iter().enumerate() {
                    place(file as u32, 8, role);
                }
                place(1, 7, Role::Rook);
                place(7, 7, Role::Bishop);
                for file in 0..9 {
                    place(file, 6, Role::Pawn);
                }
            }
            Variant::Minishogi => {
                const BACK: [Role; 5] = [
                    Role::Rook,
                    Role::Bishop,
                    Role::Silver,
                    Role::Gold,
                    Role::King,
                ];
                for (file, role) in BACK.into_iter().enumerate() {
                    place(file as u32, 4, role);
                }
                place(4, 3, Role::Pawn);
            }
            Variant::Chushogi => {
                const BACK: [Role; 12] = [
                    Role::Lance,
                    Role::Leopard,
                    Role::Copper,
                    Role::Silver,
                    Role::Gold,
                    Role::Elephant,
                    Role::King,
                    Role::Gold,
                    Role::Silver,
                    Role::Copper,
                    Role::Leopard,
                    Role::Lance,
                ];
                const SECOND: [Option<Role>; 12] = [
                    Some(Role::Chariot),
                    None,
                    Some(Role::Bishop),
                    None,
                    Some(Role::Tiger),
                    Some(Role::Phoenix),
                    Some(Role::Kirin),
                    Some(Role::Tiger),
                    None,
                    Some(Role::Bishop),
                    None,
                    Some(Role::Chariot),
                ];
                const THIRD: [Role; 12] = [
                    Role::SideMover,
                    Role::VerticalMover,
                    Role::Rook,
                    Role::Horse,
                    Role::Dragon,
                    Role::Queen,
                    Role::Lion,
                    Role::Dragon,
                    Role::Horse,
                    Role::Rook,
                    Role::VerticalMover,
                    Role::SideMover,
                ];
                for (file, role) in BACK.into_iter().enumerate() {
                    place(file as u32, 11, role);
                }
                for (file, role) in SECOND.into_iter().enumerate() {
                    if let Some(role) = role {
                        place(file as u32, 10, role);
                    }
                }
                for (file, role) in THIRD.into_iter().enumerate() {
                    place(file as u32, 9, role);
                }
                for file in 0..12 {
                    place(file, 8, Role::Pawn);
                }
                place(3, 7, Role::GoBetween);
                place(8, 7, Role::GoBetween);
            }
        }
        Setup {
            board,
            hands: ByColor::default(),
            turn: Color::Sente,
            move_number: NonZeroU32::MIN,
            last_lion_capture: None,
        }
    }
}

impl Default for Variant {
    fn default() -> Variant {
        Variant::Standard
    }
}

/// A minishogi position on the 5×5 board.
///
/// Same mechanics as standard shogi: drops, nifu, drop-pawn-mate, a
/// one-rank promotion zone.
#[derive(Clone, Debug)]
pub struct Minishogi {
    pub(crate) core: Core,
}

impl Default for Minishogi {
    fn default() -> Minishogi {
        Minishogi {
            core: Core::from_setup(Variant::Minishogi.initial_setup()),
        }
    }
}

impl FromSetup for Minishogi {
    fn from_setup(setup: Setup) -> Result<Minishogi, PositionError<Minishogi>> {
        let core = Core::from_setup(setup);
        let errors = core.validate_material(Variant::Minishogi)
            | core.validate_checks(Variant::Minishogi);
        let pos = Minishogi { core };
        if errors.is_empty() {
            Ok(pos)
        } else {
            Err(PositionError { pos, errors })
        }
    }
}

impl Position for Minishogi {
    fn variant(&self) -> Variant {
        Variant::Minishogi
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
        self.core.attackers(Variant::Minishogi, sq, attacker, occupied)
    }

    fn square_snipers(&self, sq: Square, attacker: Color) -> SquareSet {
        self.core.snipers(Variant::Minishogi, sq, attacker)
    }

    fn ctx(&self) -> Context {
        self.core.ctx(Variant::Minishogi)
    }

    fn move_dests(&self, from: Square, ctx: &Context) -> SquareSet {
        self.core.move_dests(Variant::Minishogi, from, ctx)
    }

    fn drop_dests(&self, piece: Piece, ctx: &Context) -> SquareSet {
        self.core.drop_dests(Variant::Minishogi, piece, ctx)
    }

    fn legal_moves(&self) -> MoveList {
        self.core.legal_moves(Variant::Minishogi)
    }

    fn is_legal(&self, m: Move) -> bool {
        self.core.is_legal(Variant::Minishogi, m)
    }

    fn play_unchecked(&mut self, m: Move) {
        self.core.play_unchecked(Variant::Minishogi, m);
    }

    fn outcome(&self) -> Option<Outcome> {
        self.core.outcome(Variant::Minishogi)
    }
}

/// A chushogi position on the 12×12 board.
///
/// Chushogi is played without drops; captured pieces leave the game.
/// Check is not enforced: a move may leave or place a royal en prise,
/// and the game is decided by capturing the opponent's royals
/// ([`Outcome::KingLost`]) or by baring the opposing king
/// ([`Outcome::BareKing`]).
#[derive(Clone, Debug)]
pub struct Chushogi {
    pub(crate) core: Core,
    pub(crate) last_lion_capture: Option<Square>,
}

impl Chushogi {
    fn them(&self) -> SquareSet {
        self.core.board.by_color(!self.core.turn)
    }

    fn enemy_lions(&self) -> SquareSet {
        (self.core.board.by_role(Role::Lion) | self.core.board.by_role(Role::LionPromoted))
            & self.them()
    }

    /// Whether the enemy lion on `to` is defended, disregarding a
    /// defender on `ignore` that is captured en route.
    fn lion_protected(&self, to: Square, ignore: Option<Square>) -> bool {
        let mut defenders = self.core.attackers(
            Variant::Chushogi,
            to,
            !self.core.turn,
            self.core.board.occupied(),
        );
        if let Some(ignore) = ignore {
            defenders.remove(ignore);
        }
        defenders.any()
    }

    /// The adjacent squares a lion-powered piece may take as the first
    /// of two steps.
    fn lion_first_steps(&self, piece: Piece, from: Square) -> SquareSet {
        match piece.role {
            Role::Lion | Role::LionPromoted => attacks::king_attacks(from),
            Role::Falcon => attacks::pawn_attacks(piece.color, from),
            Role::Eagle => {
                attacks::diag_steps(from) & attacks::forward_ranks(piece.color, from.rank())
            }
            _ => SquareSet::EMPTY,
        }
    }

    /// The squares reachable as the second step, given the first step
    /// landed on `mid`. Always includes the origin (the stationary
    /// "igui" capture).
    fn lion_second_steps(&self, piece: Piece, from: Square, mid: Square) -> SquareSet {
        let back = SquareSet::from_square(from);
        match piece.role {
            Role::Lion | Role::LionPromoted => attacks::king_attacks(mid) | back,
            Role::Falcon | Role::Eagle => {
                // Straight on in the same direction, or back home.
                let file_delta = mid.file() as i32 - from.file() as i32;
                let rank_delta = mid.rank() as i32 - from.rank() as i32;
                let onward = Square::from_coords(
                    (mid.file() as i32 + file_delta) as u32,
                    (mid.rank() as i32 + rank_delta) as u32,
                );
                onward.map_or(back, |sq| back.with(sq))
            }
            _ => SquareSet::EMPTY,
        }
    }

    /// Appends the legal two-step moves of the piece on `from`.
    ///
    /// A double step over an empty intermediate square would be the
    /// same displacement as the direct jump, so two-step moves are only
    /// generated when the first step captures.
    fn two_step_moves(&self, piece: Piece, from: Square, moves: &mut MoveList) {
        let area = Variant::Chushogi.area();
        let counterstruck = self.last_lion_capture.is_some() && !piece.role.is_lion();
        for mid in self.lion_first_steps(piece, from) & self.them() & area {
            let Some(mid_piece) = self.core.board.get(mid) else {
                continue;
            };
            if counterstruck && mid_piece.role.is_lion() {
                continue;
            }
            for to in self.lion_second_steps(piece, from, mid) & area {
                if to != from && self.core.board.by_color(self.core.turn).contains(to) {
                    continue;
                }
                if to != from {
                    if let Some(victim) = self.core.board.get(to) {
                        if counterstruck && victim.role.is_lion() {
                            continue;
                        }
                        // A distant protected lion may only be taken
                        // together with a real piece.
                        if piece.role.is_lion()
                            && victim.role.is_lion()
                            && from.distance(to) > 1
                            && matches!(mid_piece.role, Role::Pawn | Role::GoBetween)
                            && self.lion_protected(to, Some(mid))
                        {
                            continue;
                        }
                    }
                }
                moves.push(Move::Lion { from, mid, to });
            }
        }
    }
}

impl Default for Chushogi {
    fn default() -> Chushogi {
        Chushogi {
            core: Core::from_setup(Variant::Chushogi.initial_setup()),
            last_lion_capture: None,
        }
    }
}

impl FromSetup for Chushogi {
    fn from_setup(setup: Setup) -> Result<Chushogi, PositionError<Chushogi>> {
        let last_lion_capture = setup.last_lion_capture;
        let core = Core::from_setup(setup);
        let errors = core.validate_material(Variant::Chushogi);
        let pos = Chushogi {
            core,
            last_lion_capture,
        };
        if errors.is_empty() {
            Ok(pos)
        } else {
            Err(PositionError { pos, errors })
        }
    }
}

impl Position for Chushogi {
    fn variant(&self) -> Variant {
        Variant::Chushogi
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

    fn last_lion_capture(&self) -> Option<Square> {
        self.last_lion_capture
    }

    fn to_setup(&self) -> Setup {
        Setup {
            last_lion_capture: self.last_lion_capture,
            ..self.core.to_setup()
        }
    }

    fn square_attackers(&self, sq: Square, attacker: Color, occupied: SquareSet) -> SquareSet {
        self.core.attackers(Variant::Chushogi, sq, attacker, occupied)
    }

    fn square_snipers(&self, sq: Square, attacker: Color) -> SquareSet {
        self.core.snipers(Variant::Chushogi, sq, attacker)
    }

    fn ctx(&self) -> Context {
        // Chushogi does not restrict moves by check; the context is
        // informational only.
        let Some(king) = self.core.board.king_of(self.core.turn) else {
            return Context::undefended();
        };
        Context {
            king: Some(king),
            checkers: self.core.attackers(
                Variant::Chushogi,
                king,
                !self.core.turn,
                self.core.board.occupied(),
            ),
            blockers: SquareSet::EMPTY,
        }
    }

    fn move_dests(&self, from: Square, _ctx: &Context) -> SquareSet {
        let piece = match self.core.board.get(from) {
            Some(piece) if piece.color == self.core.turn => piece,
            _ => return SquareSet::EMPTY,
        };
        let mut pseudo = attacks::attacks(piece, from, self.core.board.occupied())
            & !self.core.board.by_color(self.core.turn)
            & Variant::Chushogi.area();

        if self.last_lion_capture.is_some() && !piece.role.is_lion() {
            // Counterstrike: after losing a lion to a non-lion piece,
            // the opponent may not take a lion with a non-lion piece.
            pseudo &= !self.enemy_lions();
        }

        if piece.role.is_lion() {
            // A protected lion cannot be taken by a lion from afar.
            for to in pseudo & self.enemy_lions() {
                if from.distance(to) > 1 && self.lion_protected(to, None) {
                    pseudo.remove(to);
                }
            }
        }

        pseudo
    }

    fn drop_dests(&self, _piece: Piece, _ctx: &Context) -> SquareSet {
        SquareSet::EMPTY
    }

    fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let ctx = self.ctx();
        for from in self.core.board.by_color(self.core.turn) {
            let Some(piece) = self.core.board.get(from) else {
                continue;
            };
            for to in self.move_dests(from, &ctx) {
                let capture = self.core.board.has(to);
                if Variant::Chushogi.can_promote(piece, from, to, capture) {
                    moves.push(Move::Normal {
                        from,
                        to,
                        promotion: true,
                    });
                    if !Variant::Chushogi.forced_promotion(piece, to) {
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
            self.two_step_moves(piece, from, &mut moves);
        }
        moves
    }

    fn is_legal(&self, m: Move) -> bool {
        match m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                let Some(piece) = self.core.board.get(from) else {
                    return false;
                };
                if piece.color != self.core.turn
                    || !self.move_dests(from, &Context::undefended()).contains(to)
                {
                    return false;
                }
                if promotion {
                    Variant::Chushogi.can_promote(piece, from, to, self.core.board.has(to))
                } else {
                    !Variant::Chushogi.forced_promotion(piece, to)
                }
            }
            Move::Lion { from, .. } => {
                let Some(piece) = self.core.board.get(from) else {
                    return false;
                };
                if piece.color != self.core.turn {
                    return false;
                }
                let mut moves = MoveList::new();
                self.two_step_moves(piece, from, &mut moves);
                moves.contains(&m)
            }
            Move::Drop { .. } => false,
        }
    }

    fn play_unchecked(&mut self, m: Move) {
        let color = self.core.turn;
        let mut lion_capture = None;
        let mut record = |attacker: Piece, victim: Piece, sq: Square| {
            if victim.role.is_lion() && !attacker.role.is_lion() {
                lion_capture = Some(sq);
            }
        };
        match m {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                if let Some(piece) = self.core.board.take(from) {
                    let role = if promotion || Variant::Chushogi.forced_promotion(piece, to) {
                        Variant::Chushogi.promote(piece.role).unwrap_or(piece.role)
                    } else {
                        piece.role
                    };
                    if let Some(captured) = self.core.board.set(to, role.of(color)) {
                        record(piece, captured, to);
                    }
                }
            }
            Move::Lion { from, mid, to } => {
                if let Some(piece) = self.core.board.take(from) {
                    if let Some(captured) = self.core.board.take(mid) {
                        record(piece, captured, mid);
                    }
                    if to == from {
                        self.core.board.set(from, piece);
                    } else if let Some(captured) = self.core.board.set(to, piece) {
                        record(piece, captured, to);
                    }
                }
            }
            Move::Drop { .. } => (),
        }
        self.last_lion_capture = lion_capture;
        self.core.last_move = Some(m);
        self.core.turn = !color;
        self.core.move_number = self
            .core
            .move_number
            .checked_add(1)
            .unwrap_or(self.core.move_number);
    }

    fn outcome(&self) -> Option<Outcome> {
        let turn = self.core.turn;
        if self.core.board.royals(turn).is_empty() {
            return Some(Outcome::KingLost { winner: !turn });
        }
        if self.core.board.royals(!turn).is_empty() {
            return Some(Outcome::KingLost { winner: turn });
        }

        let bare = ByColor::new_with(|color| {
            (self.core.board.by_color(color) & !self.core.board.royals(color)).count() <= 1
        });
        match (bare.sente, bare.gote) {
            (true, true) => return Some(Outcome::Draw),
            (true, false) => {
                return Some(Outcome::BareKing {
                    winner: Color::Gote,
                })
            }
            (false, true) => {
                return Some(Outcome::BareKing {
                    winner: Color::Sente,
                })
            }
            (false, false) => (),
        }

        let ctx = Context::undefended();
        let has_moves = self
            .core
            .board
            .by_color(turn)
            .into_iter()
            .any(|from| self.move_dests(from, &ctx).any());
        if !has_moves {
            return Some(Outcome::Stalemate { winner: !turn });
        }
        None
    }
}

/// Dynamically dispatched variant [`Position`].
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum VariantPosition {
    Standard(Shogi),
    Minishogi(Minishogi),
    Chushogi(Chushogi),
}

impl From<Shogi> for VariantPosition {
    fn from(pos: Shogi) -> VariantPosition {
        VariantPosition::Standard(pos)
    }
}

impl From<Minishogi> for VariantPosition {
    fn from(pos: Minishogi) -> VariantPosition {
        VariantPosition::Minishogi(pos)
    }
}

impl From<Chushogi> for VariantPosition {
    fn from(pos: Chushogi) -> VariantPosition {
        VariantPosition::Chushogi(pos)
    }
}

impl VariantPosition {
    /// The starting position of the given variant.
    pub fn new(variant: Variant) -> VariantPosition {
        match variant {
            Variant::Standard => Shogi::default().into(),
            Variant::Minishogi => Minishogi::default().into(),
            Variant::Chushogi => Chushogi::default().into(),
        }
    }

    /// Tries to set up a position of the given variant.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] exactly as the variant's
    /// [`FromSetup`] implementation does.
    pub fn from_setup(
        variant: Variant,
        setup: Setup,
    ) -> Result<VariantPosition, PositionError<VariantPosition>> {
        fn wrap<P, U, F>(result: Result<P, PositionError<P>>, f: F) -> Result<U, PositionError<U>>
        where
            F: FnOnce(P) -> U,
        {
            match result {
                Ok(pos) => Ok(f(pos)),
                Err(PositionError { pos, errors }) => Err(PositionError {
                    pos: f(pos),
                    errors,
                }),
            }
        }

        match variant {
            Variant::Standard => wrap(Shogi::from_setup(setup), VariantPosition::Standard),
            Variant::Minishogi => wrap(Minishogi::from_setup(setup), VariantPosition::Minishogi),
            Variant::Chushogi => wrap(Chushogi::from_setup(setup), VariantPosition::Chushogi),
        }
    }

    fn borrow(&self) -> &dyn Position {
        match self {
            VariantPosition::Standard(pos) => pos,
            VariantPosition::Minishogi(pos) => pos,
            VariantPosition::Chushogi(pos) => pos,
        }
    }

    fn borrow_mut(&mut self) -> &mut dyn Position {
        match self {
            VariantPosition::Standard(pos) => pos,
            VariantPosition::Minishogi(pos) => pos,
            VariantPosition::Chushogi(pos) => pos,
        }
    }
}

impl Position for VariantPosition {
    fn variant(&self) -> Variant {
        self.borrow().variant()
    }

    fn board(&self) -> &Board {
        self.borrow().board()
    }

    fn hands(&self) -> &ByColor<Hand> {
        self.borrow().hands()
    }

    fn turn(&self) -> Color {
        self.borrow().turn()
    }

    fn move_number(&self) -> NonZeroU32 {
        self.borrow().move_number()
    }

    fn last_move(&self) -> Option<Move> {
        self.borrow().last_move()
    }

    fn last_lion_capture(&self) -> Option<Square> {
        self.borrow().last_lion_capture()
    }

    fn to_setup(&self) -> Setup {
        self.borrow().to_setup()
    }

    fn square_attackers(&self, sq: Square, attacker: Color, occupied: SquareSet) -> SquareSet {
        self.borrow().square_attackers(sq, attacker, occupied)
    }

    fn square_snipers(&self, sq: Square, attacker: Color) -> SquareSet {
        self.borrow().square_snipers(sq, attacker)
    }

    fn ctx(&self) -> Context {
        self.borrow().ctx()
    }

    fn move_dests(&self, from: Square, ctx: &Context) -> SquareSet {
        self.borrow().move_dests(from, ctx)
    }

    fn drop_dests(&self, piece: Piece, ctx: &Context) -> SquareSet {
        self.borrow().drop_dests(piece, ctx)
    }

    fn legal_moves(&self) -> MoveList {
        self.borrow().legal_moves()
    }

    fn is_legal(&self, m: Move) -> bool {
        self.borrow().is_legal(m)
    }

    fn play_unchecked(&mut self, m: Move) {
        self.borrow_mut().play_unchecked(m);
    }

    fn outcome(&self) -> Option<Outcome> {
        self.borrow().outcome()
    }
}
