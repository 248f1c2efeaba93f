//! Undo/redo stacks and special moves

use kifuban_core::{
    AppliedMove, Board, MoveError, MoveFlags, Piece, Side, SpecialMoveType, Square,
};

fn sq(file: u8, rank: u8) -> Square {
    Square::new(file, rank).unwrap()
}

fn opening() -> Vec<AppliedMove> {
    vec![
        AppliedMove::normal(Side::Black, sq(7, 7), sq(7, 6), Piece::PAWN, false),
        AppliedMove::normal(Side::White, sq(3, 3), sq(3, 4), Piece::PAWN, false),
        AppliedMove::normal(Side::Black, sq(2, 7), sq(2, 6), Piece::PAWN, false),
        AppliedMove::normal(Side::White, sq(8, 3), sq(8, 4), Piece::PAWN, false),
    ]
}

#[test]
fn test_undo_redo_walks_the_record() {
    let mut board = Board::startpos();
    let mut positions = vec![board.clone()];
    for mv in opening() {
        board.do_move(mv).unwrap();
        positions.push(board.clone());
    }

    for expected in positions.iter().rev().skip(1) {
        board.undo().unwrap();
        assert_eq!(&board, expected);
    }
    assert!(!board.can_undo());
    assert_eq!(board.undo(), None);

    for (i, expected) in positions.iter().enumerate().skip(1) {
        let mv = board.redo().unwrap();
        assert_eq!(mv, opening()[i - 1]);
        assert_eq!(&board, expected);
    }
    assert!(!board.can_redo());
}

#[test]
fn test_interleaved_undo_and_same_move_keeps_redo() {
    let mut board = Board::startpos();
    for mv in opening() {
        board.do_move(mv).unwrap();
    }
    board.undo_all();
    assert_eq!(board.redo_stack().len(), 4);

    // 記録どおりの手を指し直すと、残りのやり直しは保たれる
    board.do_move(opening()[0]).unwrap();
    board.do_move(opening()[1]).unwrap();
    assert_eq!(board.redo_stack().len(), 2);
    assert_eq!(board.redo_all(), Ok(2));
    assert_eq!(board.history(), opening().as_slice());
}

#[test]
fn test_redo_against_diverged_position_fails() {
    let mut board = Board::startpos();
    board.do_move(opening()[0]).unwrap();
    board.undo().unwrap();
    board.set_turn(Side::White);

    assert_eq!(board.redo(), Err(MoveError::WrongTurn(Side::Black)));
    assert!(!board.can_redo());
    assert_eq!(board.move_count(), 0);
}

#[test]
fn test_special_move_does_not_touch_grid() {
    let mut board = Board::startpos();
    board.do_move(opening()[0]).unwrap();
    let before = board.clone();

    let interrupt = AppliedMove::special(Side::White, SpecialMoveType::Interrupt);
    board.do_move(interrupt).unwrap();
    assert_eq!(board, before);
    assert_eq!(board.last_move(), Some(&interrupt));

    assert_eq!(board.undo(), Some(interrupt));
    assert_eq!(board, before);
    assert_eq!(board.redo(), Ok(interrupt));
    assert_eq!(board.move_count(), 2);
}

#[test]
fn test_game_end_blocks_further_moves() {
    let mut board = Board::startpos();
    board
        .do_move(AppliedMove::special(Side::Black, SpecialMoveType::Resign))
        .unwrap();
    let err = board.do_move(opening()[0]).unwrap_err();
    assert_eq!(err, MoveError::GameAlreadyEnded(SpecialMoveType::Resign));

    let flags = MoveFlags::DEFAULT | MoveFlags::AUTO_REMOVE_SPECIAL_MOVE;
    board.do_move_with(opening()[0], flags).unwrap();
    assert_eq!(board.history(), &opening()[..1]);
}

#[test]
fn test_move_codes_survive_a_game() {
    let mut board = Board::startpos();
    for mv in opening() {
        board.do_move(mv).unwrap();
    }
    for mv in board.history() {
        assert_eq!(AppliedMove::from_code(mv.to_code()), Ok(*mv));
    }
}
