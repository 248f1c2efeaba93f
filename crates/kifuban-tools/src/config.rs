//! `kifuban` の設定ファイル（TOML）
//!
//! ```toml
//! style = "kif_file"
//! fail_on_ambiguity = true
//! check_checked = true
//! ```
//!
//! コマンドラインで指定した値が設定ファイルより優先される。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use kifuban_core::MoveFlags;
use kifuban_notation::MoveTextStyle;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// 指し手の出力書式
    pub style: Option<MoveTextStyle>,
    /// 表記に合う手が複数あったら失敗にする
    pub fail_on_ambiguity: Option<bool>,
    /// 手番を検査する
    pub check_turn: Option<bool>,
    /// 王手放置を検査する
    pub check_checked: Option<bool>,
    /// 終局後の指し手で終局の記録を取り除く
    pub auto_remove_special_move: Option<bool>,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<ToolConfig> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<ToolConfig> {
        Ok(toml::from_str(data)?)
    }

    /// `overrides` で指定された項目を上書きする
    pub fn merge(self, overrides: ToolConfig) -> ToolConfig {
        ToolConfig {
            style: overrides.style.or(self.style),
            fail_on_ambiguity: overrides.fail_on_ambiguity.or(self.fail_on_ambiguity),
            check_turn: overrides.check_turn.or(self.check_turn),
            check_checked: overrides.check_checked.or(self.check_checked),
            auto_remove_special_move: overrides
                .auto_remove_special_move
                .or(self.auto_remove_special_move),
        }
    }

    pub fn style(&self) -> MoveTextStyle {
        self.style.unwrap_or_default()
    }

    pub fn fail_on_ambiguity(&self) -> bool {
        self.fail_on_ambiguity.unwrap_or(false)
    }

    pub fn move_flags(&self) -> MoveFlags {
        let mut flags = MoveFlags::NONE;
        if self.check_turn.unwrap_or(true) {
            flags |= MoveFlags::CHECK_TURN;
        }
        if self.check_checked.unwrap_or(true) {
            flags |= MoveFlags::CHECK_CHECKED;
        }
        if self.auto_remove_special_move.unwrap_or(false) {
            flags |= MoveFlags::AUTO_REMOVE_SPECIAL_MOVE;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.style(), MoveTextStyle::Normal);
        assert!(!config.fail_on_ambiguity());
        assert_eq!(config.move_flags(), MoveFlags::DEFAULT);
    }

    #[test]
    fn test_parse_toml() {
        let config = ToolConfig::from_toml_str(
            r#"
style = "kif_file"
fail_on_ambiguity = true
check_checked = false
"#,
        )
        .unwrap();
        assert_eq!(config.style(), MoveTextStyle::KifFile);
        assert!(config.fail_on_ambiguity());
        assert_eq!(config.move_flags(), MoveFlags::CHECK_TURN);

        assert!(ToolConfig::from_toml_str("colour = \"red\"").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let file = ToolConfig {
            style: Some(MoveTextStyle::KifFile),
            fail_on_ambiguity: Some(true),
            ..ToolConfig::default()
        };
        let cli = ToolConfig {
            style: Some(MoveTextStyle::Simple),
            ..ToolConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.style(), MoveTextStyle::Simple);
        assert!(merged.fail_on_ambiguity());
    }
}
