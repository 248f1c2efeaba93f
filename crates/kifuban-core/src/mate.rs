//! 王手・詰みの判定

use smallvec::SmallVec;

use crate::apply::MoveFlags;
use crate::board::Board;
use crate::types::{Side, Square};

impl Board {
    /// `side` の玉に王手がかかっているか
    pub fn is_checked(&self, side: Side) -> bool {
        let Some(king) = self.king_square(side) else {
            return false;
        };
        self.is_attacked_by(king, side.flip())
    }

    /// `side` の玉に利いている相手の駒の升
    pub fn attackers(&self, side: Side) -> SmallVec<[Square; 4]> {
        let Some(king) = self.king_square(side) else {
            return SmallVec::new();
        };
        let enemy = side.flip();
        Square::all()
            .filter(|&from| {
                self.piece_at(from)
                    .is_some_and(|p| p.side == enemy && self.attacks(from, p, king))
            })
            .collect()
    }

    /// `sq` に `by` の駒が利いているか
    pub fn is_attacked_by(&self, sq: Square, by: Side) -> bool {
        Square::all().any(|from| {
            self.piece_at(from)
                .is_some_and(|p| p.side == by && self.attacks(from, p, sq))
        })
    }

    /// 手番側が詰んでいるか
    ///
    /// 王手がかかっていなければ偽。王手なら候補手（全ての駒打ちと、全ての駒の移動範囲への
    /// 成・不成）を作業用の局面で実際に指し、王手が解けるものが1つでもあれば詰みではない。
    pub fn is_checkmated(&self) -> bool {
        let side = self.turn;
        if !self.is_checked(side) {
            return false;
        }

        let mut scratch = self.scratch();
        let candidates = self.candidate_moves(side);
        let mut tried = 0usize;
        for mv in candidates {
            if scratch.do_move_with(mv, MoveFlags::CHECK_TURN).is_err() {
                continue;
            }
            tried += 1;
            let escaped = !scratch.is_checked(side);
            scratch.undo();
            if escaped {
                log::trace!("not mate: {mv} escapes after {tried} tries");
                return false;
            }
        }
        log::trace!("mate: {tried} applicable moves, no escape for {side}");
        true
    }
}
