//! 駒の利きの相対座標表
//!
//! 先手から見た (筋の増分, 段の増分)。段は負の方向が前。
//! 後手は段の増分の符号を反転して使う。

use crate::types::{Piece, PieceKind, Side};

pub(crate) type Offset = (i8, i8);

const KING_STEPS: &[Offset] = &[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const GOLD_STEPS: &[Offset] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];

const SILVER_STEPS: &[Offset] = &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];

const KNIGHT_STEPS: &[Offset] = &[(-1, -2), (1, -2)];

const PAWN_STEPS: &[Offset] = &[(0, -1)];

const ROOK_RAYS: &[Offset] = &[(0, -1), (0, 1), (-1, 0), (1, 0)];

const BISHOP_RAYS: &[Offset] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];

const LANCE_RAYS: &[Offset] = &[(0, -1)];

/// 1つの駒の動き（1マスの移動と走り）
#[derive(Debug, Clone, Copy)]
pub(crate) struct Movement {
    pub steps: &'static [Offset],
    pub rays: &'static [Offset],
}

impl Movement {
    /// 駒の動き。龍・馬は走りに玉の1マス移動を加える
    pub fn of(piece: Piece) -> Movement {
        if piece.moves_like_gold() {
            return Movement {
                steps: GOLD_STEPS,
                rays: &[],
            };
        }
        match (piece.kind, piece.promoted) {
            (PieceKind::King, _) => Movement {
                steps: KING_STEPS,
                rays: &[],
            },
            (PieceKind::Rook, promoted) => Movement {
                steps: if promoted { KING_STEPS } else { &[] },
                rays: ROOK_RAYS,
            },
            (PieceKind::Bishop, promoted) => Movement {
                steps: if promoted { KING_STEPS } else { &[] },
                rays: BISHOP_RAYS,
            },
            (PieceKind::Silver, _) => Movement {
                steps: SILVER_STEPS,
                rays: &[],
            },
            (PieceKind::Knight, _) => Movement {
                steps: KNIGHT_STEPS,
                rays: &[],
            },
            (PieceKind::Lance, _) => Movement {
                steps: &[],
                rays: LANCE_RAYS,
            },
            (PieceKind::Pawn, _) => Movement {
                steps: PAWN_STEPS,
                rays: &[],
            },
            // 金は moves_like_gold で処理済み
            (PieceKind::Gold, _) => Movement {
                steps: GOLD_STEPS,
                rays: &[],
            },
        }
    }
}

/// 手番に合わせて向きを変える
#[inline]
pub(crate) const fn oriented(side: Side, (dfile, drank): Offset) -> Offset {
    match side {
        Side::Black => (dfile, drank),
        Side::White => (dfile, -drank),
    }
}
