//! 棋譜表記の文字列化

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use kifuban_core::ActionType;

use crate::error::NotationError;
use crate::literal::LiteralMove;

/// 文字列化の書式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTextStyle {
    /// "▲７六歩"、"△同歩"
    #[default]
    Normal,
    /// 手番記号なし "７六歩"
    NoTeban,
    /// KIF ファイルの指し手欄 "７六歩(77)"、"同　歩(77)"、"５五角打"
    KifFile,
    /// 半角数字 "76歩"
    Simple,
}

/// 設定ファイルと同じ snake_case の名前。コマンドライン向けに `-` 区切りも受け付ける
impl FromStr for MoveTextStyle {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "normal" => Ok(MoveTextStyle::Normal),
            "no_teban" => Ok(MoveTextStyle::NoTeban),
            "kif_file" => Ok(MoveTextStyle::KifFile),
            "simple" => Ok(MoveTextStyle::Simple),
            _ => Err(NotationError::UnknownStyle(s.to_string())),
        }
    }
}

impl LiteralMove {
    /// 書式に従って文字列化する
    pub fn to_text(&self, style: MoveTextStyle) -> String {
        let mut out = String::new();

        if style == MoveTextStyle::Normal {
            if let Some(side) = self.side {
                out.push_str(side.mark());
            }
        }

        if let Some(special) = self.special {
            out.push_str(special.name());
            return out;
        }

        if self.same_as_old {
            out.push('同');
            if style == MoveTextStyle::KifFile {
                out.push('　');
            }
        } else if let Some(dst) = self.dst {
            if style == MoveTextStyle::Simple {
                let _ = write!(out, "{dst}");
            } else {
                out.push_str(&dst.to_kanji());
            }
        }

        if let Some(piece) = self.piece {
            out.push_str(piece.name());
        }

        if style == MoveTextStyle::KifFile {
            // KIF は左右上引の代わりに移動元を書く
            out.push_str(action_text(self.action));
            if let Some(src) = self.src {
                let _ = write!(out, "({src})");
            }
            return out;
        }

        out.push_str(self.rel_file.text());
        out.push_str(self.rank_move.text());
        out.push_str(action_text(self.action));
        if let Some(src) = self.src {
            let _ = write!(out, "({src})");
        }
        out
    }
}

fn action_text(action: ActionType) -> &'static str {
    match action {
        ActionType::None => "",
        ActionType::Promote => "成",
        ActionType::Unpromote => "不成",
        ActionType::Drop => "打",
    }
}

impl fmt::Display for LiteralMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(MoveTextStyle::Normal))
    }
}
