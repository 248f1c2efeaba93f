//! 持ち駒（Hand）
//!
//! 1手番分の持ち駒を u32 1つに詰めて保持する。局面のコピーとハッシュを安く保つため。
//!
//! | 駒種 | bit  | 幅 | 上限 |
//! |------|------|----|------|
//! | 飛   | 0-1  | 2  | 2    |
//! | 角   | 2-3  | 2  | 2    |
//! | 金   | 4-6  | 3  | 4    |
//! | 銀   | 7-9  | 3  | 4    |
//! | 桂   | 10-12| 3  | 4    |
//! | 香   | 13-15| 3  | 4    |
//! | 歩   | 16-20| 5  | 18   |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::types::PieceKind;

/// (shift, mask)
#[inline]
const fn layout(kind: PieceKind) -> Option<(u32, u32)> {
    match kind {
        PieceKind::King => None,
        PieceKind::Rook => Some((0, 0b11)),
        PieceKind::Bishop => Some((2, 0b11)),
        PieceKind::Gold => Some((4, 0b111)),
        PieceKind::Silver => Some((7, 0b111)),
        PieceKind::Knight => Some((10, 0b111)),
        PieceKind::Lance => Some((13, 0b111)),
        PieceKind::Pawn => Some((16, 0b1_1111)),
    }
}

/// 持ち駒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand(u32);

impl Hand {
    pub const EMPTY: Hand = Hand(0);

    /// パックされた生の値
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// 枚数。玉は常に 0
    #[inline]
    pub fn count(self, kind: PieceKind) -> u8 {
        match layout(kind) {
            Some((shift, mask)) => ((self.0 >> shift) & mask) as u8,
            None => 0,
        }
    }

    /// 枚数を設定する。駒の総数を超える値や玉は拒否する
    pub fn set(&mut self, kind: PieceKind, count: u8) -> Result<(), Error> {
        let (shift, mask) = layout(kind).ok_or(Error::NotHandPiece(kind))?;
        if count > kind.supply() {
            return Err(Error::HandOverflow {
                kind,
                count,
                supply: kind.supply(),
            });
        }
        self.0 = (self.0 & !(mask << shift)) | ((count as u32) << shift);
        Ok(())
    }

    /// 1枚増やす
    pub fn increment(&mut self, kind: PieceKind) -> Result<(), Error> {
        let count = self.count(kind);
        self.set(kind, count + 1)
    }

    /// 1枚減らす。0 枚からは減らせない
    pub fn decrement(&mut self, kind: PieceKind) -> Result<(), Error> {
        if kind == PieceKind::King {
            return Err(Error::NotHandPiece(kind));
        }
        match self.count(kind) {
            0 => Err(Error::HandUnderflow(kind)),
            n => self.set(kind, n - 1),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 持っている駒種と枚数（飛・角・金・銀・桂・香・歩の順）
    pub fn iter(self) -> impl Iterator<Item = (PieceKind, u8)> {
        PieceKind::HAND
            .into_iter()
            .map(move |kind| (kind, self.count(kind)))
            .filter(|&(_, n)| n > 0)
    }
}

/// 棋譜の持ち駒表記（例: "飛 角二 歩三"、空なら "なし"）
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("なし");
        }
        const COUNTS: [&str; 18] = [
            "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二", "十三",
            "十四", "十五", "十六", "十七", "十八",
        ];
        let mut first = true;
        for (kind, n) in self.iter() {
            if !first {
                f.write_str("　")?;
            }
            first = false;
            f.write_str(kind.name())?;
            if n > 1 {
                f.write_str(COUNTS[n as usize - 1])?;
            }
        }
        Ok(())
    }
}
