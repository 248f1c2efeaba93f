//! 指し手の合法性判定
//!
//! - 盤上の駒の移動: `check_move_piece` / `can_move_piece`
//! - 駒打ち: `check_drop` / `can_drop`（二歩・行き所のない駒・打ち歩詰め）
//! - 成り: `can_promote` / `is_promote_force`
//! - 移動範囲の列挙: `can_move_range`（走り駒は遮りを無視した過大評価）
//! - 合法手生成: `Board::legal_moves`

mod tables;

use smallvec::SmallVec;

pub(crate) use tables::{Movement, oriented};

use crate::apply::MoveFlags;
use crate::board::Board;
use crate::error::{Error, MoveError};
use crate::types::{AppliedMove, BoardPiece, MoveAction, Piece, PieceKind, Side, Square};

/// 移動範囲の升リスト
pub type SquareList = SmallVec<[Square; 32]>;

/// 合法手リスト
pub type MoveList = SmallVec<[AppliedMove; 128]>;

/// 成れる指し手か（未成の成れる駒で、移動元か移動先が敵陣3段以内）
pub fn can_promote(mv: &AppliedMove) -> bool {
    match mv.action {
        MoveAction::Normal { from, to, piece, .. } => {
            promotion_allowed(mv.side, piece, from, to)
        }
        _ => false,
    }
}

/// 成りが必須の指し手か
pub fn is_promote_force(mv: &AppliedMove) -> bool {
    match mv.action {
        MoveAction::Normal { to, piece, .. } => !piece.promoted && promotion_forced(mv.side, piece.kind, to),
        _ => false,
    }
}

/// 駒・移動元・移動先から成れるかを判定する
#[inline]
pub fn promotion_allowed(side: Side, piece: Piece, from: Square, to: Square) -> bool {
    piece.can_promote() && (from.in_promotion_zone(side) || to.in_promotion_zone(side))
}

/// 未成のまま `to` に置くと以後動けなくなる駒か（成りの強制と打てない升の判定に共用）
#[inline]
pub fn promotion_forced(side: Side, kind: PieceKind, to: Square) -> bool {
    let rank = to.relative_rank(side);
    match kind {
        PieceKind::Pawn | PieceKind::Lance => rank == 1,
        PieceKind::Knight => rank <= 2,
        _ => false,
    }
}

/// 駒が動ける升（走り駒は盤端まで。遮りは考慮しない）
///
/// 候補の列挙用。実際に動けるかは `Board::can_move_piece` で再確認すること。
pub fn can_move_range(side: Side, from: Square, piece: Piece) -> SquareList {
    let movement = Movement::of(piece);
    let mut squares = SquareList::new();

    for &step in movement.steps {
        let (df, dr) = oriented(side, step);
        if let Some(sq) = from.offset(df, dr) {
            squares.push(sq);
        }
    }

    for &ray in movement.rays {
        let (df, dr) = oriented(side, ray);
        let mut cur = from;
        while let Some(next) = cur.offset(df, dr) {
            if !squares.contains(&next) {
                squares.push(next);
            }
            cur = next;
        }
    }

    squares
}

impl Board {
    /// `from` にある駒が `to` に利いているか（`to` の駒は問わない）
    pub fn attacks(&self, from: Square, piece: BoardPiece, to: Square) -> bool {
        let movement = Movement::of(piece.piece);
        let dfile = to.file() as i8 - from.file() as i8;
        let drank = to.rank() as i8 - from.rank() as i8;

        if movement
            .steps
            .iter()
            .any(|&step| oriented(piece.side, step) == (dfile, drank))
        {
            return true;
        }

        for &ray in movement.rays {
            let (df, dr) = oriented(piece.side, ray);
            let mut cur = from;
            while let Some(next) = cur.offset(df, dr) {
                if next == to {
                    return true;
                }
                if self.piece_at(next).is_some() {
                    break;
                }
                cur = next;
            }
        }

        false
    }

    /// 盤上の駒の移動として正しいかを検査する（成り・王手放置は見ない）
    ///
    /// 移動元に自分の駒があり、宣言した駒と一致し、移動先に自分の駒がなく、
    /// 駒の動きとして到達できること。
    pub fn check_move_piece(&self, mv: &AppliedMove) -> Result<(), MoveError> {
        let MoveAction::Normal { from, to, piece, .. } = mv.action else {
            return Err(MoveError::Malformed(Error::InvalidMove(*mv)));
        };
        let actual = self.piece_at(from).ok_or(MoveError::NoPieceAtSource(from))?;
        if actual.side != mv.side {
            return Err(MoveError::NotOwnPiece(from));
        }
        if actual.piece != piece {
            return Err(MoveError::PieceMismatch {
                declared: piece,
                actual: actual.piece,
            });
        }
        if self.piece_at(to).is_some_and(|p| p.side == mv.side) {
            return Err(MoveError::OwnPieceAtDestination(to));
        }
        if !self.attacks(from, actual, to) {
            return Err(MoveError::Unreachable { piece, from, to });
        }
        Ok(())
    }

    #[inline]
    pub fn can_move_piece(&self, mv: &AppliedMove) -> bool {
        self.check_move_piece(mv).is_ok()
    }

    /// 駒打ちとして正しいかを検査する（持ち駒の有無は見ない）
    pub fn check_drop(&self, side: Side, to: Square, kind: PieceKind) -> Result<(), MoveError> {
        if kind == PieceKind::King {
            return Err(MoveError::Malformed(Error::NotHandPiece(kind)));
        }
        if self.piece_at(to).is_some() {
            return Err(MoveError::Occupied(to));
        }
        if promotion_forced(side, kind, to) {
            return Err(MoveError::DeadDrop { kind, to });
        }
        if kind == PieceKind::Pawn {
            if self.unpromoted_pawns_on_file(side, to.file()) > 0 {
                return Err(MoveError::DoublePawn(to.file()));
            }
            if self.is_drop_pawn_mate(side, to) {
                return Err(MoveError::DropPawnMate(to));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn can_drop(&self, side: Side, to: Square, kind: PieceKind) -> bool {
        self.check_drop(side, to, kind).is_ok()
    }

    /// 歩を打って詰むか。使い捨ての局面に歩を置き、手番を渡して詰み判定する
    fn is_drop_pawn_mate(&self, side: Side, to: Square) -> bool {
        let enemy = side.flip();
        let Some(king) = self.king_square(enemy) else {
            return false;
        };
        // 玉の正面以外に打った歩は王手にならない
        if to.offset(0, side.forward()) != Some(king) {
            return false;
        }
        let mut scratch = self.scratch();
        scratch.grid[to.index()] = Some(BoardPiece::new(side, Piece::PAWN));
        scratch.turn = enemy;
        let mate = scratch.is_checkmated();
        if mate {
            log::debug!("drop pawn mate: {side} on {to}");
        }
        mate
    }

    /// 履歴を持たない作業用の複製
    pub(crate) fn scratch(&self) -> Board {
        let mut board = Board::empty();
        board.grid = self.grid;
        board.hands = self.hands;
        board.turn = self.turn;
        board.last_moved = self.last_moved;
        board
    }

    /// 指定手番の候補手（幾何と持ち駒のみで絞ったもの。王手放置などは未検査）
    pub(crate) fn candidate_moves(&self, side: Side) -> MoveList {
        let mut moves = MoveList::new();

        for (from, piece) in self.pieces(side) {
            for to in can_move_range(side, from, piece) {
                let mv = AppliedMove::normal(side, from, to, piece, false);
                if !self.can_move_piece(&mv) {
                    continue;
                }
                if promotion_allowed(side, piece, from, to) {
                    moves.push(AppliedMove::normal(side, from, to, piece, true));
                }
                if !promotion_forced(side, piece.kind, to) || piece.promoted {
                    moves.push(mv);
                }
            }
        }

        for (kind, _) in self.hand(side).iter() {
            for to in Square::all() {
                if self.piece_at(to).is_none() {
                    moves.push(AppliedMove::drop(side, to, kind));
                }
            }
        }

        moves
    }

    /// 手番側の合法手（王手放置・打ち歩詰めなどを除いた全ての手）
    pub fn legal_moves(&self) -> MoveList {
        let side = self.turn;
        let mut scratch = self.scratch();
        let flags = MoveFlags::DEFAULT | MoveFlags::CHECK_ONLY;
        self.candidate_moves(side)
            .into_iter()
            .filter(|mv| scratch.do_move_with(*mv, flags).is_ok())
            .map(|mv| mv.with_captured(self.piece_at_to(&mv)))
            .collect()
    }

    fn piece_at_to(&self, mv: &AppliedMove) -> Option<Piece> {
        match mv.action {
            MoveAction::Normal { to, .. } => self.piece_at(to).map(|p| p.piece),
            _ => None,
        }
    }
}
