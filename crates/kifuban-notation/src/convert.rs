//! 局面に基づく指し手と棋譜表記の相互変換
//!
//! - 局面 → 表記: 同じ駒で同じ升に行ける合法手が複数あれば、上/引/寄、左/右/直、
//!   その両方の順で区別を足し、それでも絞れなければ移動元を付ける。
//! - 表記 → 局面: 合法手を移動元・上/引/寄・左/右/直・成/不成/打の順で絞り込む。

use smallvec::SmallVec;

use kifuban_core::{
    ActionType, AppliedMove, Board, MoveAction, MoveError, MoveFlags, Piece, Side, Square,
    can_promote, is_promote_force,
};

use crate::error::NotationError;
use crate::format::MoveTextStyle;
use crate::literal::{LiteralMove, RankMoveType, RelFileType};

type Candidates = SmallVec<[AppliedMove; 8]>;

/// `to_literal_with` の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiteralOptions {
    /// 区別が要らなくても移動元を付ける（KIF 出力用）
    pub with_source: bool,
}

/// 局面を使った表記変換
pub trait BoardNotationExt {
    /// 最小限の表記に変換する
    fn to_literal(&self, mv: &AppliedMove) -> LiteralMove {
        self.to_literal_with(mv, LiteralOptions::default())
    }

    fn to_literal_with(&self, mv: &AppliedMove, options: LiteralOptions) -> LiteralMove;

    /// 表記を合法手に変換する
    ///
    /// 候補が複数残った場合、`fail_on_ambiguity` なら `NotationError::Ambiguous`、
    /// そうでなければ最初の候補を返す。
    fn convert_move(
        &self,
        literal: &LiteralMove,
        fail_on_ambiguity: bool,
    ) -> Result<AppliedMove, NotationError>;

    /// 指し手を書式どおりの文字列にする
    fn move_text(&self, mv: &AppliedMove, style: MoveTextStyle) -> String {
        let options = LiteralOptions {
            with_source: style == MoveTextStyle::KifFile,
        };
        self.to_literal_with(mv, options).to_text(style)
    }
}

/// 縦方向の動き（指す側から見た前後）
pub fn rank_move_of(side: Side, from: Square, to: Square) -> RankMoveType {
    let advance = (to.rank() as i8 - from.rank() as i8) * side.forward();
    match advance {
        a if a > 0 => RankMoveType::Up,
        a if a < 0 => RankMoveType::Back,
        _ => RankMoveType::Sideways,
    }
}

/// 横方向の区別
///
/// 龍・馬は同じ駒のもう1枚との位置関係で左右を決め、直は使わない。
/// それ以外は移動の向きで決める（右から来た駒が「右」、真っ直ぐ上がる駒が「直」）。
pub fn rel_file_of(
    side: Side,
    piece: Piece,
    from: Square,
    to: Square,
    other_sources: &[Square],
) -> RelFileType {
    // 先手から見て筋の数が小さいほど右
    let toward_left = |a: u8, b: u8| -> i8 {
        let d = b as i8 - a as i8;
        match side {
            Side::Black => d,
            Side::White => -d,
        }
    };

    if piece.is_dragon_or_horse() {
        let mut others = other_sources.iter().filter(|&&sq| sq != from);
        return match (others.next(), others.next()) {
            (Some(other), None) => match toward_left(from.file(), other.file()) {
                d if d > 0 => RelFileType::Right,
                d if d < 0 => RelFileType::Left,
                _ => RelFileType::None,
            },
            _ => RelFileType::None,
        };
    }

    match toward_left(from.file(), to.file()) {
        d if d > 0 => RelFileType::Right,
        d if d < 0 => RelFileType::Left,
        _ if rank_move_of(side, from, to) == RankMoveType::Up => RelFileType::Straight,
        _ => RelFileType::None,
    }
}

fn normal_parts(mv: &AppliedMove) -> Option<(Square, Square, Piece)> {
    match mv.action {
        MoveAction::Normal { from, to, piece, .. } => Some((from, to, piece)),
        _ => None,
    }
}

fn literal_action(mv: &AppliedMove) -> ActionType {
    match mv.action_type() {
        ActionType::None if can_promote(mv) && !is_promote_force(mv) => ActionType::Unpromote,
        action => action,
    }
}

/// 同じ駒で `to` に行ける盤上の合法手
fn board_candidates(board: &Board, side: Side, piece: Piece, to: Square) -> Candidates {
    board
        .legal_moves()
        .into_iter()
        .filter(|m| m.side == side && m.to() == Some(to))
        .filter(|m| normal_parts(m).is_some_and(|(_, _, p)| p == piece))
        .collect()
}

/// 盤上にある同じ駒の升。龍・馬の左右はこの位置関係で決まる
fn same_piece_squares(board: &Board, side: Side, piece: Piece) -> SmallVec<[Square; 8]> {
    board
        .pieces(side)
        .into_iter()
        .filter(|&(_, p)| p == piece)
        .map(|(sq, _)| sq)
        .collect()
}

fn sources(candidates: &[AppliedMove]) -> SmallVec<[Square; 8]> {
    let mut froms: SmallVec<[Square; 8]> = SmallVec::new();
    for from in candidates.iter().filter_map(AppliedMove::from) {
        if !froms.contains(&from) {
            froms.push(from);
        }
    }
    froms
}

impl BoardNotationExt for Board {
    fn to_literal_with(&self, mv: &AppliedMove, options: LiteralOptions) -> LiteralMove {
        let side = mv.side;
        let Some(to) = mv.to() else {
            return match mv.special_move() {
                Some(special) => LiteralMove::special(Some(side), special),
                None => LiteralMove::default(),
            };
        };

        let mut literal = LiteralMove {
            side: Some(side),
            dst: Some(to),
            same_as_old: self.last_moved_square() == Some(to),
            piece: mv.moved_piece(),
            ..LiteralMove::default()
        };

        let (from, piece, promote) = match mv.action {
            MoveAction::Normal {
                from,
                piece,
                promote,
                ..
            } => (from, piece, promote),
            MoveAction::Drop { kind, .. } => {
                // KIF では常に、それ以外は盤上の駒も行けるときだけ「打」を付ける
                if options.with_source || !board_candidates(self, side, kind.into(), to).is_empty()
                {
                    literal.action = ActionType::Drop;
                }
                return literal;
            }
            MoveAction::Special(_) => return literal,
        };

        literal.action = literal_action(mv);
        if options.with_source {
            literal.src = Some(from);
        }

        let all = board_candidates(self, side, piece, to);
        let same_action: Candidates = all
            .iter()
            .filter(|m| m.is_promote() == promote)
            .copied()
            .collect();
        let froms = sources(&same_action);
        if froms.len() <= 1 {
            return literal;
        }

        let all_froms = same_piece_squares(self, side, piece);
        let rank_move = rank_move_of(side, from, to);
        let rel_file = rel_file_of(side, piece, from, to, &all_froms);

        let by_rank = froms
            .iter()
            .filter(|&&f| rank_move_of(side, f, to) == rank_move)
            .count();
        let by_file = froms
            .iter()
            .filter(|&&f| rel_file_of(side, piece, f, to, &all_froms) == rel_file)
            .count();
        let by_both = froms
            .iter()
            .filter(|&&f| {
                rank_move_of(side, f, to) == rank_move
                    && rel_file_of(side, piece, f, to, &all_froms) == rel_file
            })
            .count();

        if by_rank == 1 {
            literal.rank_move = rank_move;
        } else if by_file == 1 && rel_file != RelFileType::None {
            literal.rel_file = rel_file;
        } else if by_both == 1 && rel_file != RelFileType::None {
            literal.rank_move = rank_move;
            literal.rel_file = rel_file;
        } else {
            literal.src = Some(from);
        }
        literal
    }

    fn convert_move(
        &self,
        literal: &LiteralMove,
        fail_on_ambiguity: bool,
    ) -> Result<AppliedMove, NotationError> {
        let text = || literal.to_string();
        let side = literal.side.unwrap_or(self.turn());

        if let Some(special) = literal.special {
            return Ok(AppliedMove::special(side, special));
        }

        let piece = literal.piece.ok_or_else(|| NotationError::MissingPiece(text()))?;
        let Some(to) = literal.destination(self.last_moved_square()) else {
            return Err(if literal.same_as_old {
                NotationError::NoPreviousMove(text())
            } else {
                NotationError::MissingDestination(text())
            });
        };

        let illegal = |reason| NotationError::Illegal {
            text: text(),
            reason,
        };
        if side != self.turn() {
            return Err(illegal(Some(MoveError::WrongTurn(side))));
        }

        let legal: Candidates = self
            .legal_moves()
            .into_iter()
            .filter(|m| m.to() == Some(to) && m.moved_piece() == Some(piece))
            .collect();
        let reachable_on_board = legal.iter().any(|m| !m.is_drop());
        let piece_squares = same_piece_squares(self, side, piece);

        let survivors: Candidates = legal
            .iter()
            .filter(|m| match (literal.src, m.from()) {
                (Some(src), Some(from)) => src == from,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .filter(|m| match (literal.rank_move, m.from()) {
                (RankMoveType::None, _) => true,
                (rank_move, Some(from)) => rank_move_of(side, from, to) == rank_move,
                (_, None) => false,
            })
            .filter(|m| match (literal.rel_file, m.from()) {
                (RelFileType::None, _) => true,
                (rel_file, Some(from)) => {
                    rel_file_of(side, piece, from, to, &piece_squares) == rel_file
                }
                (_, None) => false,
            })
            .filter(|m| match literal.action {
                ActionType::Promote => m.is_promote(),
                ActionType::Unpromote => !m.is_drop() && !m.is_promote(),
                ActionType::Drop => m.is_drop(),
                ActionType::None if m.is_drop() => !reachable_on_board,
                ActionType::None => !m.is_promote(),
            })
            .copied()
            .collect();

        match survivors.as_slice() {
            [] => {
                let reason = rejection_reason(self, side, to, piece, literal);
                log::debug!("no legal move for {}: {:?}", text(), reason);
                Err(illegal(reason))
            }
            [only] => Ok(*only),
            [first, ..] if !fail_on_ambiguity => Ok(*first),
            many => Err(NotationError::Ambiguous {
                text: text(),
                candidates: many.len(),
            }),
        }
    }
}

/// 表記が1つの手を指していれば、その手が指せない理由
fn rejection_reason(
    board: &Board,
    side: Side,
    to: Square,
    piece: Piece,
    literal: &LiteralMove,
) -> Option<MoveError> {
    let mv = match (literal.src, literal.action) {
        (Some(from), action) => {
            AppliedMove::normal(side, from, to, piece, action == ActionType::Promote)
        }
        (None, ActionType::Drop) if !piece.promoted => AppliedMove::drop(side, to, piece.kind),
        _ => return None,
    };
    let mut scratch = board.clone();
    scratch
        .do_move_with(mv, MoveFlags::DEFAULT | MoveFlags::CHECK_ONLY)
        .err()
}
