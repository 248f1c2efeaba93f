//! Random legal games from the opening keep the position consistent

use kifuban_core::{Board, PieceKind};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]

    #[test]
    fn prop_supply_and_invariants_hold(seed in any::<u64>(), plies in 10usize..60) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut board = Board::startpos();

        for _ in 0..plies {
            let moves = board.legal_moves();
            if moves.is_empty() {
                prop_assert!(board.is_checkmated());
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];
            let before = board.clone();
            prop_assert!(board.do_move(mv).is_ok(), "legal move {} rejected", mv);

            for kind in PieceKind::ALL {
                prop_assert!(board.total_piece_count(kind) <= kind.supply() as u32);
            }
            prop_assert_eq!(board.validate(), Ok(()));
            prop_assert!(!board.is_checked(mv.side));

            board.undo();
            prop_assert_eq!(&board, &before);
            prop_assert!(board.redo().is_ok());
        }

        board.undo_all();
        prop_assert_eq!(board, Board::startpos());
    }
}
