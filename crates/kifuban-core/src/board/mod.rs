//! 局面（Board）
//!
//! 盤面81升・両者の持ち駒・手番・直前の移動先と、指し手の履歴/やり直しスタックを持つ。
//! 局面の変更は `apply` の `do_move` / `undo` / `redo` と、局面編集用の setter のみで行う。

mod validation;
mod zobrist;

pub use zobrist::{ZOBRIST, ZobristTable};

use smallvec::SmallVec;
use std::fmt;

use crate::error::Error;
use crate::hand::Hand;
use crate::types::{AppliedMove, BoardPiece, Piece, PieceKind, Side, Square};

/// 局面
///
/// 等価比較とハッシュは盤面・持ち駒・手番・直前の移動先のみが対象で、
/// 履歴とやり直しスタックは含まない。
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) grid: [Option<BoardPiece>; Square::NUM],
    pub(crate) hands: [Hand; Side::NUM],
    pub(crate) turn: Side,
    pub(crate) last_moved: Option<Square>,
    pub(crate) history: Vec<AppliedMove>,
    /// `history` と同じ長さ。各手を指す直前の `last_moved`
    pub(crate) prev_last_moved: Vec<Option<Square>>,
    pub(crate) redo: Vec<AppliedMove>,
}

impl Board {
    /// 駒のない局面（先手番）
    pub fn empty() -> Board {
        Board {
            grid: [None; Square::NUM],
            hands: [Hand::EMPTY; Side::NUM],
            turn: Side::Black,
            last_moved: None,
            history: Vec::new(),
            prev_last_moved: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// 平手の初期局面
    pub fn startpos() -> Board {
        const BACK_RANK: [PieceKind; 9] = [
            PieceKind::Lance,
            PieceKind::Knight,
            PieceKind::Silver,
            PieceKind::Gold,
            PieceKind::King,
            PieceKind::Gold,
            PieceKind::Silver,
            PieceKind::Knight,
            PieceKind::Lance,
        ];

        let mut board = Board::empty();
        for (i, kind) in BACK_RANK.into_iter().enumerate() {
            let file = i as u8 + 1;
            board.put(file, 1, Side::White, kind);
            board.put(file, 9, Side::Black, kind);
            board.put(file, 3, Side::White, PieceKind::Pawn);
            board.put(file, 7, Side::Black, PieceKind::Pawn);
        }
        board.put(2, 2, Side::White, PieceKind::Bishop);
        board.put(8, 2, Side::White, PieceKind::Rook);
        board.put(8, 8, Side::Black, PieceKind::Bishop);
        board.put(2, 8, Side::Black, PieceKind::Rook);
        board
    }

    fn put(&mut self, file: u8, rank: u8, side: Side, kind: PieceKind) {
        let index = (file as usize - 1) * 9 + (rank as usize - 1);
        self.grid[index] = Some(BoardPiece::new(side, Piece::new(kind)));
    }

    // ---------------------------------------------------------------
    // 盤面
    // ---------------------------------------------------------------

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<BoardPiece> {
        self.grid[sq.index()]
    }

    /// 升に駒を置く（`None` で取り除く）。局面編集用
    pub fn set_piece(&mut self, sq: Square, piece: Option<BoardPiece>) -> Result<(), Error> {
        sq.validate()?;
        if let Some(piece) = piece {
            piece.validate()?;
        }
        self.grid[sq.index()] = piece;
        Ok(())
    }

    /// 玉の位置
    pub fn king_square(&self, side: Side) -> Option<Square> {
        Square::all().find(|&sq| {
            self.piece_at(sq)
                .is_some_and(|p| p.side == side && p.piece.kind == PieceKind::King)
        })
    }

    /// 指定手番の盤上の駒
    pub fn pieces(&self, side: Side) -> SmallVec<[(Square, Piece); 40]> {
        Square::all()
            .filter_map(|sq| match self.piece_at(sq) {
                Some(p) if p.side == side => Some((sq, p.piece)),
                _ => None,
            })
            .collect()
    }

    /// 盤上と両者の持ち駒を合わせた枚数
    pub fn total_piece_count(&self, kind: PieceKind) -> u32 {
        let on_board = self
            .grid
            .iter()
            .flatten()
            .filter(|p| p.piece.kind == kind)
            .count() as u32;
        let in_hand: u32 = self.hands.iter().map(|h| h.count(kind) as u32).sum();
        on_board + in_hand
    }

    // ---------------------------------------------------------------
    // 持ち駒
    // ---------------------------------------------------------------

    #[inline]
    pub fn hand(&self, side: Side) -> Hand {
        self.hands[side.index()]
    }

    #[inline]
    pub fn hand_count(&self, side: Side, kind: PieceKind) -> u8 {
        self.hands[side.index()].count(kind)
    }

    pub fn set_hand_count(&mut self, side: Side, kind: PieceKind, count: u8) -> Result<(), Error> {
        self.hands[side.index()].set(kind, count)
    }

    pub fn increment_hand(&mut self, side: Side, kind: PieceKind) -> Result<(), Error> {
        self.hands[side.index()].increment(kind)
    }

    pub fn decrement_hand(&mut self, side: Side, kind: PieceKind) -> Result<(), Error> {
        self.hands[side.index()].decrement(kind)
    }

    // ---------------------------------------------------------------
    // 手番・直前の手
    // ---------------------------------------------------------------

    #[inline]
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn set_turn(&mut self, side: Side) {
        self.turn = side;
    }

    /// 直前の手の移動先（「同」の解決に使う）
    #[inline]
    pub fn last_moved_square(&self) -> Option<Square> {
        self.last_moved
    }

    pub fn set_last_moved_square(&mut self, sq: Option<Square>) {
        self.last_moved = sq;
    }

    // ---------------------------------------------------------------
    // 履歴
    // ---------------------------------------------------------------

    /// 適用済みの手（特殊な指し手を含む）
    #[inline]
    pub fn history(&self) -> &[AppliedMove] {
        &self.history
    }

    /// やり直し可能な手。末尾が次に `redo` される手
    #[inline]
    pub fn redo_stack(&self) -> &[AppliedMove] {
        &self.redo
    }

    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn last_move(&self) -> Option<&AppliedMove> {
        self.history.last()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::startpos()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.hands == other.hands
            && self.turn == other.turn
            && self.last_moved == other.last_moved
    }
}

impl Eq for Board {}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.position_hash());
    }
}

/// BOD 形式に近い盤面図
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::types::KANJI_NUMBERS;

        writeln!(f, "後手の持駒：{}", self.hand(Side::White))?;
        writeln!(f, "  ９ ８ ７ ６ ５ ４ ３ ２ １")?;
        writeln!(f, "+---------------------------+")?;
        for rank in 1..=9u8 {
            f.write_str("|")?;
            for file in (1..=9u8).rev() {
                let index = (file as usize - 1) * 9 + (rank as usize - 1);
                match self.grid[index] {
                    Some(p) => {
                        let mark = if p.side == Side::White { "v" } else { " " };
                        write!(f, "{mark}{}", p.piece.short_name())?;
                    }
                    None => f.write_str(" ・")?,
                }
            }
            writeln!(f, "|{}", KANJI_NUMBERS[rank as usize - 1])?;
        }
        writeln!(f, "+---------------------------+")?;
        writeln!(f, "先手の持駒：{}", self.hand(Side::Black))?;
        write!(f, "手番：{}", self.turn)
    }
}
