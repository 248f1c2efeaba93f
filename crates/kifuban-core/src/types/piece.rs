//! 駒種（PieceKind）・駒（Piece）・盤上の駒（BoardPiece）

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;
use crate::error::Error;

/// 駒種（8種類）
///
/// 数値は 5bit/7bit パック表現で使うコード。0 は「駒なし」として予約している。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    King = 1,
    Rook = 2,
    Bishop = 3,
    Gold = 4,
    Silver = 5,
    Knight = 6,
    Lance = 7,
    Pawn = 8,
}

impl PieceKind {
    /// 全ての駒種
    pub const ALL: [PieceKind; 8] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    /// 持ち駒になり得る駒種（King 以外の7種）
    pub const HAND: [PieceKind; 7] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    /// コード（1〜8）
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// コードから駒種を得る（0 や範囲外は `None`）
    #[inline]
    pub const fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::King),
            2 => Some(PieceKind::Rook),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Gold),
            5 => Some(PieceKind::Silver),
            6 => Some(PieceKind::Knight),
            7 => Some(PieceKind::Lance),
            8 => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// 成れる駒種か
    #[inline]
    pub const fn can_promote(self) -> bool {
        !matches!(self, PieceKind::King | PieceKind::Gold)
    }

    /// 1局に存在する枚数（両者・盤上・持ち駒の合計の上限）
    #[inline]
    pub const fn supply(self) -> u8 {
        match self {
            PieceKind::King => 2,
            PieceKind::Rook | PieceKind::Bishop => 2,
            PieceKind::Gold | PieceKind::Silver | PieceKind::Knight | PieceKind::Lance => 4,
            PieceKind::Pawn => 18,
        }
    }

    /// 漢字一文字の名前
    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::King => "玉",
            PieceKind::Rook => "飛",
            PieceKind::Bishop => "角",
            PieceKind::Gold => "金",
            PieceKind::Silver => "銀",
            PieceKind::Knight => "桂",
            PieceKind::Lance => "香",
            PieceKind::Pawn => "歩",
        }
    }
}

/// 駒（駒種 × 成り）
///
/// 玉と金は成れないので `promoted == true` は不正値。
/// フィールドは公開しているため、外部から来た値は `validate` で検査すること。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub promoted: bool,
}

impl Piece {
    pub const KING: Piece = Piece::new(PieceKind::King);
    pub const ROOK: Piece = Piece::new(PieceKind::Rook);
    pub const BISHOP: Piece = Piece::new(PieceKind::Bishop);
    pub const GOLD: Piece = Piece::new(PieceKind::Gold);
    pub const SILVER: Piece = Piece::new(PieceKind::Silver);
    pub const KNIGHT: Piece = Piece::new(PieceKind::Knight);
    pub const LANCE: Piece = Piece::new(PieceKind::Lance);
    pub const PAWN: Piece = Piece::new(PieceKind::Pawn);
    /// 龍
    pub const DRAGON: Piece = Piece::new(PieceKind::Rook).promoted_unchecked();
    /// 馬
    pub const HORSE: Piece = Piece::new(PieceKind::Bishop).promoted_unchecked();

    /// 成っていない駒を作る
    #[inline]
    pub const fn new(kind: PieceKind) -> Piece {
        Piece {
            kind,
            promoted: false,
        }
    }

    /// 成りを指定して作る。成れない駒種の成りは `Error::InvalidPiece`
    pub fn try_new(kind: PieceKind, promoted: bool) -> Result<Piece, Error> {
        let piece = Piece { kind, promoted };
        piece.validate()?;
        Ok(piece)
    }

    #[inline]
    const fn promoted_unchecked(self) -> Piece {
        Piece {
            kind: self.kind,
            promoted: true,
        }
    }

    /// 値の整合性を検査する
    pub fn validate(self) -> Result<(), Error> {
        if self.promoted && !self.kind.can_promote() {
            return Err(Error::InvalidPiece { kind: self.kind });
        }
        Ok(())
    }

    /// さらに成れる駒か（未成かつ成れる駒種）
    #[inline]
    pub const fn can_promote(self) -> bool {
        !self.promoted && self.kind.can_promote()
    }

    /// 成った駒。成れない場合は `None`
    #[inline]
    pub fn promote(self) -> Option<Piece> {
        self.can_promote().then(|| self.promoted_unchecked())
    }

    /// 成りを戻した駒（持ち駒になるときの形）
    #[inline]
    pub const fn unpromote(self) -> Piece {
        Piece::new(self.kind)
    }

    /// 龍・馬か
    #[inline]
    pub const fn is_dragon_or_horse(self) -> bool {
        self.promoted && matches!(self.kind, PieceKind::Rook | PieceKind::Bishop)
    }

    /// 金と同じ動きをする成駒か
    #[inline]
    pub const fn moves_like_gold(self) -> bool {
        match self.kind {
            PieceKind::Gold => true,
            PieceKind::Silver | PieceKind::Knight | PieceKind::Lance | PieceKind::Pawn => {
                self.promoted
            }
            _ => false,
        }
    }

    /// 5bit コード（bit0-3: 駒種, bit4: 成り）
    #[inline]
    pub const fn to_code(self) -> u8 {
        self.kind.code() | ((self.promoted as u8) << 4)
    }

    /// 5bit コードから復元する。0 は `Ok(None)`（駒なし）
    pub fn from_code(code: u8) -> Result<Option<Piece>, Error> {
        if code == 0 {
            return Ok(None);
        }
        if code >= 1 << 5 {
            return Err(Error::InvalidPieceCode(code));
        }
        let kind = PieceKind::from_code(code & 0x0F).ok_or(Error::InvalidPieceCode(code))?;
        Piece::try_new(kind, code & 0x10 != 0).map(Some)
    }

    /// 5bit コード（駒なしは 0）
    #[inline]
    pub fn code_of(piece: Option<Piece>) -> u8 {
        piece.map_or(0, Piece::to_code)
    }

    /// 棋譜で使う名前（成香・成桂・成銀は2文字）
    pub const fn name(self) -> &'static str {
        if !self.promoted {
            return self.kind.name();
        }
        match self.kind {
            PieceKind::Rook => "龍",
            PieceKind::Bishop => "馬",
            PieceKind::Silver => "成銀",
            PieceKind::Knight => "成桂",
            PieceKind::Lance => "成香",
            PieceKind::Pawn => "と",
            // validate 済みの値では到達しない
            PieceKind::King | PieceKind::Gold => self.kind.name(),
        }
    }

    /// 盤面図で使う一文字表記
    pub const fn short_name(self) -> &'static str {
        if !self.promoted {
            return self.kind.name();
        }
        match self.kind {
            PieceKind::Rook => "龍",
            PieceKind::Bishop => "馬",
            PieceKind::Silver => "全",
            PieceKind::Knight => "圭",
            PieceKind::Lance => "杏",
            PieceKind::Pawn => "と",
            PieceKind::King | PieceKind::Gold => self.kind.name(),
        }
    }
}

impl From<PieceKind> for Piece {
    fn from(kind: PieceKind) -> Self {
        Piece::new(kind)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 盤上の駒（持ち主 × 駒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPiece {
    pub side: Side,
    pub piece: Piece,
}

impl BoardPiece {
    #[inline]
    pub const fn new(side: Side, piece: Piece) -> BoardPiece {
        BoardPiece { side, piece }
    }

    /// 値の整合性を検査する
    pub fn validate(self) -> Result<(), Error> {
        self.piece.validate()
    }

    /// 7bit コード（bit0-1: 手番, bit2-5: 駒種, bit6: 成り）
    #[inline]
    pub const fn to_code(self) -> u8 {
        self.side.code() | (self.piece.kind.code() << 2) | ((self.piece.promoted as u8) << 6)
    }

    /// 7bit コードから復元する。0 は `Ok(None)`（空き升）
    pub fn from_code(code: u8) -> Result<Option<BoardPiece>, Error> {
        if code == 0 {
            return Ok(None);
        }
        if code >= 1 << 7 {
            return Err(Error::InvalidBoardPieceCode(code));
        }
        let side = match Side::from_code(code & 0x03) {
            Some(Some(side)) => side,
            _ => return Err(Error::InvalidBoardPieceCode(code)),
        };
        let kind =
            PieceKind::from_code((code >> 2) & 0x0F).ok_or(Error::InvalidBoardPieceCode(code))?;
        let piece = Piece::try_new(kind, code & 0x40 != 0)?;
        Ok(Some(BoardPiece { side, piece }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promoted_king_and_gold_are_invalid() {
        assert!(Piece::try_new(PieceKind::King, true).is_err());
        assert!(Piece::try_new(PieceKind::Gold, true).is_err());
        assert!(Piece::try_new(PieceKind::Silver, true).is_ok());
        let raw = Piece {
            kind: PieceKind::Gold,
            promoted: true,
        };
        assert_eq!(raw.validate(), Err(Error::InvalidPiece { kind: PieceKind::Gold }));
    }

    #[test]
    fn test_promote_unpromote() {
        assert_eq!(Piece::ROOK.promote(), Some(Piece::DRAGON));
        assert_eq!(Piece::DRAGON.promote(), None);
        assert_eq!(Piece::GOLD.promote(), None);
        assert_eq!(Piece::HORSE.unpromote(), Piece::BISHOP);
        assert!(Piece::HORSE.is_dragon_or_horse());
        assert!(!Piece::ROOK.is_dragon_or_horse());
    }

    #[test]
    fn test_piece_code() {
        for kind in PieceKind::ALL {
            for promoted in [false, true] {
                let Ok(piece) = Piece::try_new(kind, promoted) else {
                    continue;
                };
                assert!(piece.to_code() < 32);
                assert_eq!(Piece::from_code(piece.to_code()), Ok(Some(piece)));
            }
        }
        assert_eq!(Piece::from_code(0), Ok(None));
        // 成金は不正
        assert!(Piece::from_code(PieceKind::Gold.code() | 0x10).is_err());
        assert!(Piece::from_code(0x09).is_err());
    }

    #[test]
    fn test_board_piece_code() {
        let bp = BoardPiece::new(Side::White, Piece::DRAGON);
        let code = bp.to_code();
        assert!(code < 128);
        assert_eq!(code & 0x03, 2);
        assert_eq!((code >> 2) & 0x0F, PieceKind::Rook.code());
        assert_eq!(code & 0x40, 0x40);
        assert_eq!(BoardPiece::from_code(code), Ok(Some(bp)));
        assert_eq!(BoardPiece::from_code(0), Ok(None));
        // 手番なしの駒は盤上に置けない
        assert!(BoardPiece::from_code(PieceKind::Pawn.code() << 2).is_err());
    }

    #[test]
    fn test_piece_names() {
        assert_eq!(Piece::PAWN.promote().unwrap().name(), "と");
        assert_eq!(Piece::LANCE.promote().unwrap().name(), "成香");
        assert_eq!(Piece::DRAGON.name(), "龍");
        assert_eq!(Piece::KING.to_string(), "玉");
    }
}
