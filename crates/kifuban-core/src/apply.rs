//! 指し手の適用・取り消し・やり直し
//!
//! 全ての変更は `Board::do_move_with` を通る。`redo` も同じ入口で再検証する。

use crate::board::Board;
use crate::error::MoveError;
use crate::rules::{can_promote, is_promote_force};
use crate::types::{AppliedMove, BoardPiece, MoveAction, PieceKind, Square};

/// `do_move_with` の検査・動作フラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// 手番と指し手の手番が一致すること
    pub const CHECK_TURN: MoveFlags = MoveFlags(1 << 0);
    /// 自玉に王手がかかったままになる手を拒否する
    pub const CHECK_CHECKED: MoveFlags = MoveFlags(1 << 1);
    /// 検査のみ行い、局面を変更しない
    pub const CHECK_ONLY: MoveFlags = MoveFlags(1 << 2);
    /// 末尾の特殊な指し手（投了など）を取り除いてから指す
    pub const AUTO_REMOVE_SPECIAL_MOVE: MoveFlags = MoveFlags(1 << 3);

    pub const DEFAULT: MoveFlags = MoveFlags(Self::CHECK_TURN.0 | Self::CHECK_CHECKED.0);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn without(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 & !other.0)
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = MoveFlags;

    #[inline]
    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for MoveFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: MoveFlags) {
        self.0 |= rhs.0;
    }
}

impl Board {
    /// 既定のフラグ（手番・王手放置を検査）で指す
    pub fn do_move(&mut self, mv: AppliedMove) -> Result<(), MoveError> {
        self.do_move_with(mv, MoveFlags::DEFAULT)
    }

    /// 指し手を検査し、`CHECK_ONLY` でなければ局面に適用する
    pub fn do_move_with(&mut self, mv: AppliedMove, flags: MoveFlags) -> Result<(), MoveError> {
        mv.validate()?;

        let trailing = self
            .history
            .last()
            .and_then(|last| last.special_move().map(|ended| (*last, ended)));
        if let Some((last, ended)) = trailing {
            if last == mv {
                // 同じ終局を重ねて記録しない
                return Ok(());
            }
            if !flags.contains(MoveFlags::AUTO_REMOVE_SPECIAL_MOVE) {
                log::debug!("rejected {mv}: game already ended by {}", ended.name());
                return Err(MoveError::GameAlreadyEnded(ended));
            }
        }

        let recorded = if mv.is_special() {
            mv
        } else {
            if flags.contains(MoveFlags::CHECK_TURN) && mv.side != self.turn {
                return Err(MoveError::WrongTurn(mv.side));
            }
            self.check_board_move(&mv)?
        };

        if flags.contains(MoveFlags::CHECK_ONLY) && !flags.contains(MoveFlags::CHECK_CHECKED) {
            return Ok(());
        }

        let prev_last_moved = self.last_moved;
        if !recorded.is_special() {
            self.make(&recorded)?;
            if flags.contains(MoveFlags::CHECK_CHECKED) && self.is_checked(recorded.side) {
                self.unmake(&recorded, prev_last_moved);
                return Err(MoveError::LeavesKingInCheck);
            }
            if flags.contains(MoveFlags::CHECK_ONLY) {
                self.unmake(&recorded, prev_last_moved);
                return Ok(());
            }
        } else if flags.contains(MoveFlags::CHECK_ONLY) {
            return Ok(());
        }

        if trailing.is_some() {
            self.history.pop();
            self.prev_last_moved.pop();
        }

        self.history.push(recorded);
        self.prev_last_moved.push(prev_last_moved);
        if self.redo.last() == Some(&recorded) {
            self.redo.pop();
        } else {
            self.redo.clear();
        }
        Ok(())
    }

    /// 盤上の手・駒打ちを検査し、取った駒を埋めた記録用の指し手を返す
    fn check_board_move(&self, mv: &AppliedMove) -> Result<AppliedMove, MoveError> {
        match mv.action {
            MoveAction::Drop { to, kind } => {
                if self.hand_count(mv.side, kind) == 0 {
                    return Err(MoveError::NotInHand(kind));
                }
                self.check_drop(mv.side, to, kind)?;
                Ok(*mv)
            }
            MoveAction::Normal { to, promote, .. } => {
                self.check_move_piece(mv)?;
                let captured = self.piece_at(to).map(|p| p.piece);
                if captured.is_some_and(|p| p.kind == PieceKind::King) {
                    return Err(MoveError::KingCapture(to));
                }
                if promote && !can_promote(mv) {
                    return Err(MoveError::CannotPromote);
                }
                if !promote && is_promote_force(mv) {
                    return Err(MoveError::PromotionRequired);
                }
                Ok(mv.with_captured(captured))
            }
            MoveAction::Special(_) => Ok(*mv),
        }
    }

    /// 検査済みの指し手で盤面・持ち駒・手番・直前の移動先を更新する
    fn make(&mut self, mv: &AppliedMove) -> Result<(), MoveError> {
        match mv.action {
            MoveAction::Normal {
                from,
                to,
                piece,
                promote,
                captured,
            } => {
                let moved = if promote {
                    piece.promote().ok_or(MoveError::CannotPromote)?
                } else {
                    piece
                };
                if let Some(captured) = captured {
                    self.hands[mv.side.index()].increment(captured.kind)?;
                }
                self.grid[from.index()] = None;
                self.grid[to.index()] = Some(BoardPiece::new(mv.side, moved));
                self.finish_make(to);
            }
            MoveAction::Drop { to, kind } => {
                self.hands[mv.side.index()].decrement(kind)?;
                self.grid[to.index()] = Some(BoardPiece::new(mv.side, kind.into()));
                self.finish_make(to);
            }
            MoveAction::Special(_) => {}
        }
        Ok(())
    }

    fn finish_make(&mut self, to: Square) {
        self.turn = self.turn.flip();
        self.last_moved = Some(to);
    }

    /// `make` の逆操作。記録された内容だけから戻す
    fn unmake(&mut self, mv: &AppliedMove, prev_last_moved: Option<Square>) {
        match mv.action {
            MoveAction::Normal {
                from,
                to,
                piece,
                captured,
                ..
            } => {
                self.grid[from.index()] = Some(BoardPiece::new(mv.side, piece));
                self.grid[to.index()] = captured.map(|p| BoardPiece::new(mv.side.flip(), p));
                if let Some(captured) = captured {
                    let restored = self.hands[mv.side.index()].decrement(captured.kind);
                    debug_assert!(restored.is_ok(), "captured piece missing from hand");
                }
            }
            MoveAction::Drop { to, kind } => {
                self.grid[to.index()] = None;
                let restored = self.hands[mv.side.index()].increment(kind);
                debug_assert!(restored.is_ok(), "dropped piece does not fit in hand");
            }
            MoveAction::Special(_) => return,
        }
        self.turn = self.turn.flip();
        self.last_moved = prev_last_moved;
    }

    /// 最後の手を取り消し、やり直しスタックに積む
    pub fn undo(&mut self) -> Option<AppliedMove> {
        let mv = self.history.pop()?;
        let prev_last_moved = self.prev_last_moved.pop().flatten();
        self.unmake(&mv, prev_last_moved);
        self.redo.push(mv);
        Some(mv)
    }

    /// やり直しスタックの先頭を指し直す
    ///
    /// 局面が変わっていて指せない場合はやり直しスタックを空にしてエラーを返す。
    pub fn redo(&mut self) -> Result<AppliedMove, MoveError> {
        let mv = *self.redo.last().ok_or(MoveError::NothingToRedo)?;
        match self.do_move_with(mv, MoveFlags::DEFAULT) {
            Ok(()) => Ok(mv),
            Err(err) => {
                log::debug!("redo of {mv} failed ({err}); clearing {} entries", self.redo.len());
                self.redo.clear();
                Err(err)
            }
        }
    }

    /// 全ての手を取り消す。取り消した手数を返す
    pub fn undo_all(&mut self) -> usize {
        let mut count = 0;
        while self.undo().is_some() {
            count += 1;
        }
        count
    }

    /// やり直せる手を全て指し直す。指し直した手数を返す
    pub fn redo_all(&mut self) -> Result<usize, MoveError> {
        let mut count = 0;
        while self.can_redo() {
            self.redo()?;
            count += 1;
        }
        Ok(count)
    }
}
