//! Legality rules exercised through the public board API

use kifuban_core::{
    AppliedMove, Board, BoardPiece, MoveError, Piece, PieceKind, Side, Square,
};

fn sq(file: u8, rank: u8) -> Square {
    Square::new(file, rank).unwrap()
}

fn place(board: &mut Board, file: u8, rank: u8, side: Side, piece: Piece) {
    board
        .set_piece(sq(file, rank), Some(BoardPiece::new(side, piece)))
        .unwrap();
}

fn kings_only() -> Board {
    let mut board = Board::empty();
    place(&mut board, 5, 9, Side::Black, Piece::KING);
    place(&mut board, 5, 1, Side::White, Piece::KING);
    board
}

/// Edge king that a pawn on 1二 mates: gold on 3二 covers 2一/2二, knight on 2四 protects 1二
fn drop_pawn_mate_position() -> Board {
    let mut board = Board::empty();
    place(&mut board, 1, 1, Side::White, Piece::KING);
    place(&mut board, 3, 2, Side::Black, Piece::GOLD);
    place(&mut board, 2, 4, Side::Black, Piece::KNIGHT);
    place(&mut board, 9, 9, Side::Black, Piece::KING);
    board.set_hand_count(Side::Black, PieceKind::Pawn, 1).unwrap();
    board
}

#[test]
fn test_startpos_is_quiet() {
    let board = Board::startpos();
    assert!(!board.is_checked(Side::Black));
    assert!(!board.is_checked(Side::White));
    assert!(!board.is_checkmated());
    assert!(board.is_valid());
}

#[test]
fn test_pawn_76_scenario() {
    let mut board = Board::startpos();
    let mv = AppliedMove::normal(Side::Black, sq(7, 7), sq(7, 6), Piece::PAWN, false);
    board.do_move(mv).unwrap();

    assert_eq!(board.turn(), Side::White);
    assert_eq!(board.piece_at(sq(7, 7)), None);
    assert_eq!(
        board.piece_at(sq(7, 6)),
        Some(BoardPiece::new(Side::Black, Piece::PAWN))
    );
    let pawns_on_file_7 = (1..=9)
        .filter(|&rank| {
            board.piece_at(sq(7, rank)) == Some(BoardPiece::new(Side::Black, Piece::PAWN))
        })
        .count();
    assert_eq!(pawns_on_file_7, 1);
}

#[test]
fn test_do_undo_roundtrip_for_every_opening_move() {
    let mut board = Board::startpos();
    let before = board.clone();
    for mv in board.legal_moves() {
        board.do_move(mv).unwrap();
        assert_ne!(board, before);
        assert_eq!(board.undo(), Some(mv));
        assert_eq!(board, before, "undo of {mv} did not restore the position");
        assert_eq!(board.position_hash(), before.position_hash());
    }
}

#[test]
fn test_do_undo_roundtrip_with_captures_and_drops() {
    // ▲7六歩 △3四歩 ▲2二角成 △同銀 の後の局面
    let mut board = Board::startpos();
    let moves = [
        AppliedMove::normal(Side::Black, sq(7, 7), sq(7, 6), Piece::PAWN, false),
        AppliedMove::normal(Side::White, sq(3, 3), sq(3, 4), Piece::PAWN, false),
        AppliedMove::normal(Side::Black, sq(8, 8), sq(2, 2), Piece::BISHOP, true),
        AppliedMove::normal(Side::White, sq(3, 1), sq(2, 2), Piece::SILVER, false),
    ];
    for mv in moves {
        board.do_move(mv).unwrap();
    }
    assert_eq!(board.hand_count(Side::Black, PieceKind::Bishop), 1);
    assert_eq!(board.hand_count(Side::White, PieceKind::Bishop), 1);
    assert_eq!(board.last_moved_square(), Some(sq(2, 2)));

    let before = board.clone();
    let legal = board.legal_moves();
    assert!(legal.iter().any(AppliedMove::is_drop));
    for mv in legal {
        board.do_move(mv).unwrap();
        board.undo().unwrap();
        assert_eq!(board, before, "undo of {mv} did not restore the position");
    }
}

#[test]
fn test_double_pawn_drop_rejected_on_every_file() {
    for side in Side::ALL {
        for file in 1..=9 {
            let mut board = Board::empty();
            place(&mut board, file, 5, side, Piece::PAWN);
            board.set_hand_count(side, PieceKind::Pawn, 1).unwrap();
            board.set_turn(side);

            let rank = match side {
                Side::Black => 3,
                Side::White => 7,
            };
            let drop = AppliedMove::drop(side, sq(file, rank), PieceKind::Pawn);
            assert_eq!(board.do_move(drop), Err(MoveError::DoublePawn(file)));
            assert!(!board.can_drop(side, sq(file, rank), PieceKind::Pawn));

            // と金なら二歩にならない
            let tokin = Piece::PAWN.promote().unwrap();
            place(&mut board, file, 5, side, tokin);
            assert_eq!(board.do_move(drop), Ok(()));
        }
    }
}

#[test]
fn test_lance_drop_on_farthest_rank_rejected() {
    for side in Side::ALL {
        let farthest = match side {
            Side::Black => 1,
            Side::White => 9,
        };
        for file in 1..=9 {
            let mut board = Board::empty();
            board.set_hand_count(side, PieceKind::Lance, 4).unwrap();
            board.set_turn(side);
            let drop = AppliedMove::drop(side, sq(file, farthest), PieceKind::Lance);
            assert!(matches!(
                board.do_move(drop),
                Err(MoveError::DeadDrop {
                    kind: PieceKind::Lance,
                    ..
                })
            ));
            assert_eq!(board.hand_count(side, PieceKind::Lance), 4);
        }
    }
}

#[test]
fn test_knight_drop_on_farthest_two_ranks_rejected() {
    let board = Board::empty();
    for file in 1..=9 {
        assert!(!board.can_drop(Side::Black, sq(file, 1), PieceKind::Knight));
        assert!(!board.can_drop(Side::Black, sq(file, 2), PieceKind::Knight));
        assert!(board.can_drop(Side::Black, sq(file, 3), PieceKind::Knight));
        assert!(!board.can_drop(Side::White, sq(file, 8), PieceKind::Knight));
        assert!(board.can_drop(Side::White, sq(file, 7), PieceKind::Knight));
    }
}

#[test]
fn test_drop_pawn_mate_rejected_only_on_mating_square() {
    let mut board = drop_pawn_mate_position();
    assert!(board.is_valid());
    assert!(!board.is_checked(Side::White));

    let mating = AppliedMove::drop(Side::Black, sq(1, 2), PieceKind::Pawn);
    assert_eq!(board.do_move(mating), Err(MoveError::DropPawnMate(sq(1, 2))));
    assert_eq!(board.hand_count(Side::Black, PieceKind::Pawn), 1);
    assert_eq!(board.piece_at(sq(1, 2)), None);

    // 同じ歩を他の升には打てる
    for to in [sq(1, 3), sq(1, 5), sq(5, 5), sq(9, 2)] {
        assert!(board.can_drop(Side::Black, to, PieceKind::Pawn), "drop on {to}");
    }
    let elsewhere = AppliedMove::drop(Side::Black, sq(1, 3), PieceKind::Pawn);
    board.do_move(elsewhere).unwrap();
}

#[test]
fn test_pawn_drop_check_that_can_be_captured_is_legal() {
    let mut board = drop_pawn_mate_position();
    // 支えの桂がなければ玉で取れる
    board.set_piece(sq(2, 4), None).unwrap();
    let drop = AppliedMove::drop(Side::Black, sq(1, 2), PieceKind::Pawn);
    board.do_move(drop).unwrap();
    assert!(board.is_checked(Side::White));
    assert!(!board.is_checkmated());
}

#[test]
fn test_moving_into_check_rejected() {
    let mut board = kings_only();
    place(&mut board, 4, 5, Side::White, Piece::ROOK);
    // 4筋には飛車が利いている
    let mv = AppliedMove::normal(Side::Black, sq(5, 9), sq(4, 9), Piece::KING, false);
    assert_eq!(board.do_move(mv), Err(MoveError::LeavesKingInCheck));
    assert_eq!(board.piece_at(sq(5, 9)), Some(BoardPiece::new(Side::Black, Piece::KING)));
    assert_eq!(board.turn(), Side::Black);
}

#[test]
fn test_pinned_piece_cannot_move() {
    let mut board = kings_only();
    place(&mut board, 5, 7, Side::Black, Piece::SILVER);
    place(&mut board, 5, 3, Side::White, Piece::LANCE);
    let mv = AppliedMove::normal(Side::Black, sq(5, 7), sq(4, 6), Piece::SILVER, false);
    assert_eq!(board.do_move(mv), Err(MoveError::LeavesKingInCheck));
    let along_pin = AppliedMove::normal(Side::Black, sq(5, 7), sq(5, 6), Piece::SILVER, false);
    board.do_move(along_pin).unwrap();
}

#[test]
fn test_legal_moves_when_checked_only_escape() {
    let mut board = kings_only();
    place(&mut board, 5, 5, Side::White, Piece::ROOK);
    assert!(board.is_checked(Side::Black));
    for mv in board.legal_moves() {
        let mut after = board.clone();
        after.do_move(mv).unwrap();
        assert!(!after.is_checked(Side::Black), "{mv} leaves the king in check");
    }
}
