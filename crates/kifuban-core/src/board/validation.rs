//! 局面の整合性検査

use crate::error::InvariantViolation;
use crate::types::{PieceKind, Side, Square};

use super::Board;

impl Board {
    /// 局面の不変条件を検査し、最初に破られたものを返す
    ///
    /// 1. 各升の駒が構造的に正しい
    /// 2. 玉は各手番1枚まで
    /// 3. 駒種ごとの総数（盤上＋持ち駒）が上限以下
    /// 4. 二歩がない
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                piece
                    .validate()
                    .map_err(|source| InvariantViolation::MalformedCell { square: sq, source })?;
            }
        }

        for side in Side::ALL {
            let kings = self
                .pieces(side)
                .iter()
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count();
            if kings > 1 {
                return Err(InvariantViolation::TooManyKings(side));
            }
        }

        for kind in PieceKind::ALL {
            let count = self.total_piece_count(kind);
            if count > kind.supply() as u32 {
                return Err(InvariantViolation::SupplyExceeded {
                    kind,
                    count,
                    supply: kind.supply(),
                });
            }
        }

        for side in Side::ALL {
            for file in 1..=9 {
                if self.unpromoted_pawns_on_file(side, file) > 1 {
                    return Err(InvariantViolation::DoublePawn { side, file });
                }
            }
        }

        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// 筋にある未成の歩の数
    pub(crate) fn unpromoted_pawns_on_file(&self, side: Side, file: u8) -> usize {
        (1..=9)
            .filter_map(|rank| Square::new(file, rank).ok())
            .filter_map(|sq| self.piece_at(sq))
            .filter(|p| p.side == side && p.piece.kind == PieceKind::Pawn && !p.piece.promoted)
            .count()
    }
}
