//! 自由入力の棋譜を平手の初期局面から再生する

use serde::Serialize;

use kifuban_core::json::{BoardStateJson, ReplayResultJson};
use kifuban_core::{Board, MoveFlags};
use kifuban_notation::{BoardNotationExt, LiteralMove, MoveTextStyle, parse_moves};

use crate::config::ToolConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    pub style: MoveTextStyle,
    pub fail_on_ambiguity: bool,
    pub flags: MoveFlags,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        ReplayOptions {
            style: MoveTextStyle::Normal,
            fail_on_ambiguity: false,
            flags: MoveFlags::DEFAULT,
        }
    }
}

impl From<&ToolConfig> for ReplayOptions {
    fn from(config: &ToolConfig) -> Self {
        ReplayOptions {
            style: config.style(),
            fail_on_ambiguity: config.fail_on_ambiguity(),
            flags: config.move_flags(),
        }
    }
}

/// 再生した1手
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayedMove {
    pub ply: usize,
    pub text: String,
    /// 指した後に相手玉に王手がかかっている
    pub check: bool,
    /// 指した後に相手が詰んでいる
    pub checkmate: bool,
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub board: Board,
    pub moves: Vec<ReplayedMove>,
    /// 再生を止めた手とその理由
    pub error: Option<String>,
}

impl Replay {
    pub fn to_json(&self) -> ReplayResultJson {
        ReplayResultJson {
            applied: self.moves.iter().map(|m| m.text.clone()).collect(),
            last_ply: self.board.move_count() as i32,
            board: BoardStateJson::from(&self.board),
            error: self.error.clone(),
        }
    }
}

/// `text` に含まれる指し手を順に指す。指せない手があればそこで止める
pub fn replay(text: &str, options: &ReplayOptions) -> Replay {
    replay_from(Board::startpos(), &parse_moves(text), options)
}

pub fn replay_from(mut board: Board, literals: &[LiteralMove], options: &ReplayOptions) -> Replay {
    let mut moves = Vec::with_capacity(literals.len());
    let mut error = None;

    for literal in literals {
        let mv = match board.convert_move(literal, options.fail_on_ambiguity) {
            Ok(mv) => mv,
            Err(e) => {
                log::warn!("stopped at {literal}: {e}");
                error = Some(format!("{literal}: {e}"));
                break;
            }
        };
        // 「同」は指す前の局面で決まる
        let text = board.move_text(&mv, options.style);
        if let Err(e) = board.do_move_with(mv, options.flags) {
            log::warn!("stopped at {text}: {e}");
            error = Some(format!("{text}: {e}"));
            break;
        }

        let (check, checkmate) = if mv.is_special() {
            (false, false)
        } else {
            let checked = board.is_checked(board.turn());
            (checked, checked && board.is_checkmated())
        };
        log::debug!("{} {}", board.move_count(), text);
        moves.push(ReplayedMove {
            ply: board.move_count(),
            text,
            check,
            checkmate,
        });
    }

    Replay {
        board,
        moves,
        error,
    }
}
