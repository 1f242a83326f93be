use banmen::{
    sfen::{make_sfen, parse_sfen},
    usi::parse_usi,
    Chushogi, FromSetup, Move, Position, PositionErrorKinds, Role, Shogi, Square, SquareSet,
    Variant, VariantPosition,
};

fn sq(name: &str) -> Square {
    name.parse().expect("valid square")
}

fn position(variant: Variant, s: &str) -> VariantPosition {
    VariantPosition::from_setup(variant, parse_sfen(variant, s).expect("valid sfen"))
        .expect("legal position")
}

fn shogi(s: &str) -> Shogi {
    Shogi::from_setup(parse_sfen(Variant::Standard, s).expect("valid sfen"))
        .expect("legal position")
}

fn chushogi(s: &str) -> Chushogi {
    Chushogi::from_setup(parse_sfen(Variant::Chushogi, s).expect("valid sfen"))
        .expect("legal position")
}

#[test]
fn test_default_sfen_roundtrip() {
    for variant in Variant::ALL {
        let pos = position(variant, variant.initial_sfen());
        assert_eq!(make_sfen(&pos), variant.initial_sfen());
    }
}

#[test]
fn test_occupancy_invariant_along_a_game() {
    for variant in Variant::ALL {
        let mut pos = VariantPosition::new(variant);
        for _ in 0..40 {
            let moves = pos.legal_moves();
            let Some(&m) = moves.first() else { break };
            pos.play_unchecked(m);

            let board = pos.board();
            assert_eq!(
                board.occupied(),
                board.by_color(banmen::Color::Sente) | board.by_color(banmen::Color::Gote)
            );
            let role_union = Role::ALL
                .into_iter()
                .fold(SquareSet::EMPTY, |acc, role| acc | board.by_role(role));
            assert_eq!(board.occupied(), role_union);
        }
    }
}

#[test]
fn test_no_self_check_after_generated_moves() {
    let positions = [
        position(Variant::Standard, Variant::Standard.initial_sfen()),
        position(Variant::Minishogi, Variant::Minishogi.initial_sfen()),
        // In check: every generated evasion must resolve it.
        position(Variant::Standard, "4k4/9/9/9/4R4/9/9/9/4K4 w - 1"),
    ];
    for pos in positions {
        let us = pos.turn();
        for m in pos.legal_moves() {
            let mut child = pos.clone();
            child.play_unchecked(m);
            assert!(!child.is_check(us), "{m} leaves the king in check");
        }
    }
}

#[test]
fn test_check_evasions_only() {
    // A rook gives check along the file; only four king moves evade.
    let pos = position(Variant::Standard, "4k4/9/9/9/4R4/9/9/9/4K4 w - 1");
    let moves = pos.legal_moves();
    assert_eq!(moves.len(), 4);
    assert!(moves.iter().all(|m| m.from() == Some(sq("5a"))));
}

#[test]
fn test_opening_dests() {
    // In the standard starting position the rook and bishop are walled
    // in by their own pawns, while every pawn has exactly one push.
    let pos = Shogi::default();
    let ctx = pos.ctx();
    assert_eq!(pos.move_dests(sq("2h"), &ctx).count(), 6);
    assert_eq!(pos.move_dests(sq("8h"), &ctx), SquareSet::EMPTY);
    for file in 1..=9 {
        let pawn = format!("{file}g").parse().expect("valid square");
        assert_eq!(pos.move_dests(pawn, &ctx).count(), 1);
    }
}

#[test]
fn test_nifu() {
    // A pawn in hand may not be dropped on a file that already has an
    // unpromoted friendly pawn.
    let pos = shogi("4k4/9/9/9/9/9/4P4/9/4K4 b P 1");
    let ctx = pos.ctx();
    let dests = pos.drop_dests(Role::Pawn.of(pos.turn()), &ctx);
    assert!((dests & SquareSet::from_file(sq("5e").file())).is_empty());
    assert!(dests.contains(sq("4e")));

    // A tokin does not block the file.
    let pos = shogi("4k4/9/9/9/9/9/4+P4/9/4K4 b P 1");
    let ctx = pos.ctx();
    let dests = pos.drop_dests(Role::Pawn.of(pos.turn()), &ctx);
    assert!(dests.contains(sq("5e")));
}

#[test]
fn test_drop_rank_restrictions() {
    let pos = shogi("4k4/9/9/9/9/9/9/9/4K4 b NLP 1");
    let ctx = pos.ctx();
    let knight = pos.drop_dests(Role::Knight.of(pos.turn()), &ctx);
    assert!(!knight.contains(sq("5a")));
    assert!(!knight.contains(sq("5b")));
    assert!(knight.contains(sq("5c")));
    let lance = pos.drop_dests(Role::Lance.of(pos.turn()), &ctx);
    assert!(!lance.contains(sq("5a")));
    assert!(lance.contains(sq("5b")));
    let pawn = pos.drop_dests(Role::Pawn.of(pos.turn()), &ctx);
    assert!(!pawn.contains(sq("5a")));
    assert!(pawn.contains(sq("5b")));
}

#[test]
fn test_drop_pawn_mate() {
    // Dropping the pawn on 5b would be mate: the king is boxed in by
    // its own pieces and 5b is defended by the gold. The drop is
    // forbidden.
    let pos = shogi("3lkl3/3p1p3/4G4/9/9/9/9/9/4K4 b P 1");
    let ctx = pos.ctx();
    let dests = pos.drop_dests(Role::Pawn.of(pos.turn()), &ctx);
    assert!(!dests.contains(sq("5b")));
    assert!(!pos.is_legal(Move::Drop {
        role: Role::Pawn,
        to: sq("5b"),
    }));

    // With an escape square the same drop is an ordinary check and
    // perfectly legal.
    let pos = shogi("4kl3/3p1p3/4G4/9/9/9/9/9/4K4 b P 1");
    let ctx = pos.ctx();
    let dests = pos.drop_dests(Role::Pawn.of(pos.turn()), &ctx);
    assert!(dests.contains(sq("5b")));
}

#[test]
fn test_drop_updates_hand_and_board() {
    let pos = shogi("4k4/9/9/9/9/9/9/9/4K4 b 2P 1");
    let pos = pos
        .play(Move::Drop {
            role: Role::Pawn,
            to: sq("5e"),
        })
        .expect("legal drop");
    assert_eq!(pos.hands().sente.get(Role::Pawn), 1);
    assert_eq!(pos.board().get(sq("5e")), Some(Role::Pawn.of(banmen::Color::Sente)));
    assert_eq!(make_sfen(&pos), "4k4/9/9/9/4P4/9/9/9/4K4 w P 2");
}

#[test]
fn test_all_dests_map() {
    let pos = shogi("4k4/9/9/9/9/9/9/9/4K4 b P 1");
    let moves = pos.all_move_dests();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].0, sq("5i"));
    assert_eq!(moves[0].1.count(), 5);

    let drops = pos.all_drop_dests();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].0.role, Role::Pawn);
    // 81 squares, minus the forbidden back rank (which covers the gote
    // king's square) and the sente king.
    assert_eq!(drops[0].1.count(), 71);
}

#[test]
fn test_validation_idempotent() {
    let setup = parse_sfen(Variant::Standard, "4k4/4R4/9/9/9/9/9/9/4K4 b - 1").expect("parses");
    let first = Shogi::from_setup(setup.clone()).expect_err("side not to move in check");
    let second = Shogi::from_setup(setup).expect_err("side not to move in check");
    assert_eq!(first.kinds(), second.kinds());
    assert_eq!(first.kinds(), PositionErrorKinds::OPPOSITE_CHECK);
}

#[test]
fn test_validation_kinds() {
    // Unpromoted pawn on the last rank can never move.
    let setup = parse_sfen(Variant::Standard, "P3k4/9/9/9/9/9/9/9/4K4 b - 1").expect("parses");
    let err = Shogi::from_setup(setup).expect_err("immobile pawn");
    assert_eq!(err.kinds(), PositionErrorKinds::IMMOBILE_PIECES);
    assert!(err.ignore_immobile_pieces().is_ok());

    // Two kings of one side.
    let setup = parse_sfen(Variant::Standard, "4k4/9/9/9/9/9/9/3KK4/9 b - 1").expect("parses");
    let err = Shogi::from_setup(setup).expect_err("two kings");
    assert_eq!(err.kinds(), PositionErrorKinds::TOO_MANY_KINGS);

    // A missing king is fine (tsume positions).
    let setup = parse_sfen(Variant::Standard, "4k4/9/9/9/9/9/9/9/9 b G 1").expect("parses");
    assert!(Shogi::from_setup(setup).is_ok());
}

#[test]
fn test_forced_promotion() {
    // A pawn reaching the last rank must promote.
    let pos = shogi("k8/4P4/9/9/9/9/9/9/4K4 b - 1");
    assert!(pos.is_legal(parse_usi("5b5a+").expect("valid usi")));
    assert!(!pos.is_legal(parse_usi("5b5a").expect("valid usi")));
    let moves = pos.legal_moves();
    assert!(moves.contains(&parse_usi("5b5a+").unwrap()));
    assert!(!moves.contains(&parse_usi("5b5a").unwrap()));
}

#[test]
fn test_chushogi_royals_not_sheltered() {
    // Chushogi does not enforce check: the king may step onto an
    // attacked square, and the game instead ends when the royals are
    // captured.
    let pos = chushogi("6r3k1/12/12/12/12/12/12/12/12/12/12/5K6 b - 1");
    let ctx = pos.ctx();
    assert!(pos.move_dests(sq("7l"), &ctx).contains(sq("6l")));
}

#[test]
fn test_chushogi_king_capture_wins() {
    // The sente king steps onto the open rook file; the rook takes it
    // outright and the game is over.
    let pos = chushogi("5r4k1/12/12/12/12/12/12/12/12/12/5K6/12 b - 1");
    let pos = pos
        .play(parse_usi("7k7l").expect("valid usi"))
        .expect("stepping into the rook's file is allowed");
    let pos = pos
        .play(parse_usi("7a7l").expect("valid usi"))
        .expect("rook takes the king");
    assert!(matches!(
        pos.outcome(),
        Some(banmen::Outcome::KingLost { winner: banmen::Color::Gote })
    ));
}

#[test]
fn test_chushogi_igui() {
    // A lion may capture an adjacent piece without moving (igui).
    let pos = chushogi("6k5/12/12/12/12/7p4/7N4/12/12/12/12/6K5 b - 1");
    let igui = Move::Lion {
        from: sq("5g"),
        mid: sq("5f"),
        to: sq("5g"),
    };
    assert!(pos.legal_moves().contains(&igui));
    assert!(pos.is_legal(igui));
    let pos = pos.play(igui).expect("legal igui");
    assert_eq!(
        pos.board().get(sq("5g")),
        Some(Role::Lion.of(banmen::Color::Sente))
    );
    assert_eq!(pos.board().get(sq("5f")), None);
}

#[test]
fn test_chushogi_counterstrike() {
    // After a lion fell to a non-lion piece, the opponent may not
    // immediately take a lion with a non-lion piece.
    let blocked = chushogi("6k5/12/12/12/7R4/12/12/7n4/12/12/12/6K5 b 5f 1");
    let ctx = blocked.ctx();
    assert!(!blocked.move_dests(sq("5e"), &ctx).contains(sq("5h")));

    let free = chushogi("6k5/12/12/12/7R4/12/12/7n4/12/12/12/6K5 b - 1");
    let ctx = free.ctx();
    assert!(free.move_dests(sq("5e"), &ctx).contains(sq("5h")));
}

#[test]
fn test_chushogi_protected_lion() {
    // A lion may not jump onto a defended enemy lion from distance two.
    let protected = chushogi("6k5/12/12/7p4/7n4/12/7N4/12/12/12/12/6K5 b - 1");
    let ctx = protected.ctx();
    assert!(!protected.move_dests(sq("5g"), &ctx).contains(sq("5e")));

    // Undefended, the jump is fine.
    let bare = chushogi("6k5/12/12/12/7n4/12/7N4/12/12/12/12/6K5 b - 1");
    let ctx = bare.ctx();
    assert!(bare.move_dests(sq("5g"), &ctx).contains(sq("5e")));
}

#[test]
fn test_chushogi_lion_capture_sets_marker() {
    // A rook taking a lion raises the counterstrike marker; any other
    // capture clears it.
    let pos = chushogi("6k5/12/12/12/7R4/12/12/7n4/12/12/12/6K5 b - 1");
    let pos = pos
        .play(parse_usi("5e5h").expect("valid usi"))
        .expect("rook takes lion");
    assert_eq!(pos.last_lion_capture(), Some(sq("5h")));
    assert!(make_sfen(&pos).contains(" 5h "));
}
