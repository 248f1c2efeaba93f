//! Zobrist hashing for position identification
//!
//! The hash covers exactly the fields that take part in `Board` equality:
//! grid, hands, side to move and the last-moved square.

use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::{BoardPiece, PieceKind, Side, Square};

use super::Board;

/// Upper bound of the per-side hand count axis (all 18 pawns)
const MAX_HAND_COUNT: usize = 18;

/// Distinct 5-bit piece codes
const PIECE_CODES: usize = 32;

/// Zobrist hash tables
pub struct ZobristTable {
    /// \[side\]\[piece code\]\[square\]
    pub piece_square: [[[u64; Square::NUM]; PIECE_CODES]; Side::NUM],
    /// \[side\]\[hand kind\]\[count\]
    pub hand: [[[u64; MAX_HAND_COUNT + 1]; 7]; Side::NUM],
    /// XOR-ed in when White is to move
    pub side_to_move: u64,
    /// \[square index\]
    pub last_moved: [u64; Square::NUM],
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristTable {
    /// Create the table from a fixed seed so hashes are stable across runs
    pub fn new() -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x4B49_4655_4241_4E00);

        let mut table = ZobristTable {
            piece_square: [[[0; Square::NUM]; PIECE_CODES]; Side::NUM],
            hand: [[[0; MAX_HAND_COUNT + 1]; 7]; Side::NUM],
            side_to_move: rng.random(),
            last_moved: [0; Square::NUM],
        };

        for side in 0..Side::NUM {
            // code 0 (no piece) stays zero
            for code in 1..PIECE_CODES {
                for sq in 0..Square::NUM {
                    table.piece_square[side][code][sq] = rng.random();
                }
            }
        }

        for side in 0..Side::NUM {
            for kind in 0..7 {
                // count 0 stays zero so an empty hand hashes to nothing
                for count in 1..=MAX_HAND_COUNT {
                    table.hand[side][kind][count] = rng.random();
                }
            }
        }

        for sq in 0..Square::NUM {
            table.last_moved[sq] = rng.random();
        }

        table
    }

    #[inline]
    pub fn piece_square_hash(&self, piece: BoardPiece, sq: Square) -> u64 {
        self.piece_square[piece.side.index()][piece.piece.to_code() as usize][sq.index()]
    }

    #[inline]
    pub fn hand_hash(&self, side: Side, kind: PieceKind, count: u8) -> u64 {
        let Some(slot) = PieceKind::HAND.iter().position(|&k| k == kind) else {
            return 0;
        };
        self.hand[side.index()][slot][(count as usize).min(MAX_HAND_COUNT)]
    }
}

/// Global Zobrist table, built on first use
pub static ZOBRIST: Lazy<ZobristTable> = Lazy::new(ZobristTable::new);

impl Board {
    /// Position hash (grid, hands, turn, last-moved square)
    pub fn position_hash(&self) -> u64 {
        let table = &*ZOBRIST;
        let mut hash = 0u64;

        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                hash ^= table.piece_square_hash(piece, sq);
            }
        }

        for side in Side::ALL {
            for (kind, count) in self.hand(side).iter() {
                hash ^= table.hand_hash(side, kind, count);
            }
        }

        if self.turn() == Side::White {
            hash ^= table.side_to_move;
        }

        if let Some(sq) = self.last_moved_square() {
            hash ^= table.last_moved[sq.index()];
        }

        hash
    }
}
