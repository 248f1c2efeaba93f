//! 将棋の指し手表記の解析と棋譜の再生
//!
//! # 使用例
//!
//! ```bash
//! # 自由入力の指し手を解析して JSON で出力
//! cargo run -p kifuban-tools --bin kifuban -- parse "▲７六歩△同歩" "どう角"
//!
//! # 平手から再生して KIF 形式で表示
//! cargo run -p kifuban-tools --bin kifuban -- --style kif-file replay "76歩 34歩 22角成 同銀"
//!
//! # 再生後の局面の合法手を一覧
//! cargo run -p kifuban-tools --bin kifuban -- moves "76歩 34歩"
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use kifuban_core::Board;
use kifuban_notation::{BoardNotationExt, MoveTextStyle, parse_moves};
use kifuban_tools::{ReplayOptions, ToolConfig, replay};

#[derive(Parser, Debug)]
#[command(name = "kifuban", version, about = "将棋の指し手表記の解析・棋譜の再生")]
struct Cli {
    /// 設定ファイル (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 指し手の出力書式（normal, no-teban, kif-file, simple）
    #[arg(long, global = true)]
    style: Option<MoveTextStyle>,

    /// 表記に合う手が複数あったら失敗にする
    #[arg(long, global = true)]
    strict: bool,

    /// 王手放置を検査しない
    #[arg(long, global = true)]
    no_check_checked: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// 指し手の文字列を解析して JSON で出力する（局面は使わない）
    Parse {
        /// 解析する文字列（省略時は標準入力）
        text: Vec<String>,
    },
    /// 平手の初期局面から指し手を再生する
    Replay {
        /// 指し手の並び（省略時は --file または標準入力）
        text: Option<String>,
        /// 指し手を読むファイル
        #[arg(long)]
        file: Option<PathBuf>,
        /// 結果を JSON で出力する
        #[arg(long)]
        json: bool,
    },
    /// 指し手を再生した後の局面の合法手を一覧する
    Moves {
        /// 指し手の並び（省略時は初期局面）
        text: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<ToolConfig> {
    let base = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    let overrides = ToolConfig {
        style: cli.style,
        fail_on_ambiguity: cli.strict.then_some(true),
        check_checked: cli.no_check_checked.then_some(false),
        ..ToolConfig::default()
    };
    Ok(base.merge(overrides))
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn run_parse(texts: Vec<String>) -> Result<()> {
    let input = if texts.is_empty() {
        read_input(None, None)?
    } else {
        texts.join("\n")
    };
    let literals = parse_moves(&input);
    if literals.is_empty() {
        bail!("no move found in input");
    }
    println!("{}", serde_json::to_string_pretty(&literals)?);
    Ok(())
}

fn run_replay(input: &str, options: &ReplayOptions, json: bool) -> Result<()> {
    let replay = replay(input, options);
    if json {
        println!("{}", serde_json::to_string_pretty(&replay.to_json())?);
    } else {
        for mv in &replay.moves {
            let note = if mv.checkmate {
                "  詰み"
            } else if mv.check {
                "  王手"
            } else {
                ""
            };
            println!("{:>4} {}{}", mv.ply, mv.text, note);
        }
        println!();
        println!("{}", replay.board);
    }
    if let Some(error) = replay.error {
        bail!("replay stopped: {error}");
    }
    Ok(())
}

fn run_moves(input: &str, options: &ReplayOptions) -> Result<()> {
    let board = if input.trim().is_empty() {
        Board::startpos()
    } else {
        let replay = replay(input, options);
        if let Some(error) = replay.error {
            bail!("replay stopped: {error}");
        }
        replay.board
    };

    let moves = board.legal_moves();
    for mv in &moves {
        println!("{}", board.move_text(mv, options.style));
    }
    log::info!("{} legal moves", moves.len());
    if moves.is_empty() && board.is_checkmated() {
        println!("詰み");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let options = ReplayOptions::from(&config);
    log::debug!("config: {config:?}");

    match cli.cmd {
        Cmd::Parse { text } => run_parse(text),
        Cmd::Replay { text, file, json } => {
            let input = read_input(text, file.as_deref())?;
            run_replay(&input, &options, json)
        }
        Cmd::Moves { text } => {
            let input = text.unwrap_or_default();
            run_moves(&input, &options)
        }
    }
}
