//! 局面の JSON 表現
//!
//! 盤面を読むだけの外部ツール向け。`Board` 自体は serde を実装しない。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::Error;
use crate::hand::Hand;
use crate::types::{BoardPiece, Piece, PieceKind, Side, Square};

/// 駒の JSON 表現
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieceJson {
    /// "sente" | "gote"
    pub owner: String,
    /// "K" | "R" | "B" | "G" | "S" | "N" | "L" | "P"
    #[serde(rename = "type")]
    pub piece_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<bool>,
}

/// 盤面の1マス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellJson {
    /// "76" 形式（筋・段）
    pub square: String,
    pub piece: Option<PieceJson>,
}

/// 持ち駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandJson {
    #[serde(rename = "P", skip_serializing_if = "Option::is_none")]
    pub pawn: Option<u32>,
    #[serde(rename = "L", skip_serializing_if = "Option::is_none")]
    pub lance: Option<u32>,
    #[serde(rename = "N", skip_serializing_if = "Option::is_none")]
    pub knight: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub silver: Option<u32>,
    #[serde(rename = "G", skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    pub bishop: Option<u32>,
    #[serde(rename = "R", skip_serializing_if = "Option::is_none")]
    pub rook: Option<u32>,
}

/// 両者の持ち駒
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandsJson {
    pub sente: HandJson,
    pub gote: HandJson,
}

/// 盤面全体の状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardStateJson {
    /// 9x9 のセル。外側が段（一段目から）、内側が筋（9筋から）
    pub cells: Vec<Vec<CellJson>>,
    pub hands: HandsJson,
    /// "sente" | "gote"
    pub turn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ply: Option<i32>,
    /// 直前の手の移動先（"76" 形式）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_moved: Option<String>,
}

/// 棋譜再生の結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayResultJson {
    pub applied: Vec<String>,
    #[serde(rename = "last_ply")]
    pub last_ply: i32,
    pub board: BoardStateJson,
    pub error: Option<String>,
}

fn owner_str(side: Side) -> &'static str {
    match side {
        Side::Black => "sente",
        Side::White => "gote",
    }
}

fn parse_owner(s: &str) -> Option<Side> {
    match s {
        "sente" => Some(Side::Black),
        "gote" => Some(Side::White),
        _ => None,
    }
}

fn kind_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::King => "K",
        PieceKind::Rook => "R",
        PieceKind::Bishop => "B",
        PieceKind::Gold => "G",
        PieceKind::Silver => "S",
        PieceKind::Knight => "N",
        PieceKind::Lance => "L",
        PieceKind::Pawn => "P",
    }
}

fn parse_kind(s: &str) -> Option<PieceKind> {
    PieceKind::ALL.into_iter().find(|&k| kind_letter(k) == s)
}

fn parse_square(s: &str) -> Option<Square> {
    let mut digits = s.chars().map(|c| c.to_digit(10));
    match (digits.next(), digits.next(), digits.next()) {
        (Some(Some(file)), Some(Some(rank)), None) => Square::new(file as u8, rank as u8).ok(),
        _ => None,
    }
}

impl From<Hand> for HandJson {
    fn from(hand: Hand) -> Self {
        let count = |kind| Some(hand.count(kind) as u32).filter(|&n| n > 0);
        HandJson {
            pawn: count(PieceKind::Pawn),
            lance: count(PieceKind::Lance),
            knight: count(PieceKind::Knight),
            silver: count(PieceKind::Silver),
            gold: count(PieceKind::Gold),
            bishop: count(PieceKind::Bishop),
            rook: count(PieceKind::Rook),
        }
    }
}

impl HandJson {
    fn to_hand(&self) -> Result<Hand, Error> {
        let mut hand = Hand::EMPTY;
        for (kind, count) in [
            (PieceKind::Pawn, self.pawn),
            (PieceKind::Lance, self.lance),
            (PieceKind::Knight, self.knight),
            (PieceKind::Silver, self.silver),
            (PieceKind::Gold, self.gold),
            (PieceKind::Bishop, self.bishop),
            (PieceKind::Rook, self.rook),
        ] {
            let count = count.unwrap_or(0);
            let count = u8::try_from(count).map_err(|_| Error::HandOverflow {
                kind,
                count: u8::MAX,
                supply: kind.supply(),
            })?;
            hand.set(kind, count)?;
        }
        Ok(hand)
    }
}

impl From<BoardPiece> for PieceJson {
    fn from(piece: BoardPiece) -> Self {
        PieceJson {
            owner: owner_str(piece.side).to_string(),
            piece_type: kind_letter(piece.piece.kind).to_string(),
            promoted: piece.piece.promoted.then_some(true),
        }
    }
}

impl PieceJson {
    fn to_board_piece(&self) -> Result<BoardPiece, Error> {
        let side = parse_owner(&self.owner)
            .ok_or_else(|| Error::InvalidSideName(self.owner.clone()))?;
        let kind = parse_kind(&self.piece_type)
            .ok_or_else(|| Error::InvalidPieceName(self.piece_type.clone()))?;
        let piece = Piece::try_new(kind, self.promoted.unwrap_or(false))?;
        Ok(BoardPiece::new(side, piece))
    }
}

impl From<&Board> for BoardStateJson {
    fn from(board: &Board) -> Self {
        let cells = (1..=9u8)
            .map(|rank| {
                (1..=9u8)
                    .rev()
                    .filter_map(|file| Square::new(file, rank).ok())
                    .map(|sq| CellJson {
                        square: sq.to_string(),
                        piece: board.piece_at(sq).map(PieceJson::from),
                    })
                    .collect()
            })
            .collect();

        BoardStateJson {
            cells,
            hands: HandsJson {
                sente: board.hand(Side::Black).into(),
                gote: board.hand(Side::White).into(),
            },
            turn: owner_str(board.turn()).to_string(),
            ply: Some(board.move_count() as i32),
            last_moved: board.last_moved_square().map(|sq| sq.to_string()),
        }
    }
}

impl BoardStateJson {
    /// 局面に戻す（履歴は持たない）
    pub fn to_board(&self) -> Result<Board, Error> {
        let mut board = Board::empty();
        for cell in self.cells.iter().flatten() {
            let sq = parse_square(&cell.square)
                .ok_or_else(|| Error::InvalidSquareName(cell.square.clone()))?;
            let piece = cell.piece.as_ref().map(PieceJson::to_board_piece).transpose()?;
            board.set_piece(sq, piece)?;
        }
        board.hands = [self.hands.sente.to_hand()?, self.hands.gote.to_hand()?];
        board.turn =
            parse_owner(&self.turn).ok_or_else(|| Error::InvalidSideName(self.turn.clone()))?;
        board.last_moved = self
            .last_moved
            .as_deref()
            .map(|s| parse_square(s).ok_or_else(|| Error::InvalidSquareName(s.to_string())))
            .transpose()?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_json_shape() {
        let json = BoardStateJson::from(&Board::startpos());
        assert_eq!(json.cells.len(), 9);
        assert_eq!(json.cells[0][0].square, "91");
        let king = json.cells[8][4].piece.as_ref().unwrap();
        assert_eq!(king.owner, "sente");
        assert_eq!(king.piece_type, "K");
        assert_eq!(json.turn, "sente");
        assert_eq!(json.hands.sente, HandJson::default());
    }

    #[test]
    fn test_json_restores_position() {
        let mut board = Board::startpos();
        board.set_hand_count(Side::White, PieceKind::Pawn, 0).unwrap();
        let sq = Square::new(2, 2).unwrap();
        board
            .set_piece(sq, Some(BoardPiece::new(Side::White, Piece::HORSE)))
            .unwrap();
        let text = serde_json::to_string(&BoardStateJson::from(&board)).unwrap();
        let back: BoardStateJson = serde_json::from_str(&text).unwrap();
        assert_eq!(back.to_board().unwrap(), board);
    }

    #[test]
    fn test_malformed_names_are_rejected() {
        let good = BoardStateJson::from(&Board::startpos());

        let mut json = good.clone();
        json.turn = "nobody".to_string();
        assert_eq!(json.to_board().err(), Some(Error::InvalidSideName("nobody".to_string())));

        let mut json = good.clone();
        json.last_moved = Some("0x".to_string());
        assert_eq!(json.to_board().err(), Some(Error::InvalidSquareName("0x".to_string())));

        let mut json = good.clone();
        json.cells[0][0].square = "a1".to_string();
        assert_eq!(json.to_board().err(), Some(Error::InvalidSquareName("a1".to_string())));

        let mut json = good.clone();
        json.cells[0][0].piece.as_mut().unwrap().owner = "black".to_string();
        assert_eq!(json.to_board().err(), Some(Error::InvalidSideName("black".to_string())));

        let mut json = good;
        json.cells[0][0].piece.as_mut().unwrap().piece_type = "Q".to_string();
        assert_eq!(json.to_board().err(), Some(Error::InvalidPieceName("Q".to_string())));
    }

    #[test]
    fn test_missing_last_moved_is_allowed() {
        let mut json = BoardStateJson::from(&Board::startpos());
        json.last_moved = None;
        assert_eq!(json.to_board().unwrap().last_moved_square(), None);
    }

    #[test]
    fn test_promoted_flag_is_omitted_when_false() {
        let json = BoardStateJson::from(&Board::startpos());
        let text = serde_json::to_string(&json.cells[0][0]).unwrap();
        assert!(!text.contains("promoted"));
    }
}
