//! `kifuban` コマンドの実装
//!
//! - `config`: TOML 設定ファイルとコマンドライン指定の統合
//! - `replay`: 自由入力の棋譜の再生

pub mod config;
pub mod replay;

pub use config::ToolConfig;
pub use replay::{Replay, ReplayOptions, ReplayedMove, replay, replay_from};
