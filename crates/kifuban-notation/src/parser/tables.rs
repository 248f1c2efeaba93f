//! 表記の同義語テーブルと、そこから組み立てる正規表現
//!
//! 基本テーブルは宣言的なデータとして持ち、成駒の同義語は「成」「なり」と
//! 基本の駒の同義語を組み合わせて導出する。構築は最初の利用時に一度だけ行い、以後は変更しない。
//! 同義語は正規化後の文字列（半角・ひらがな・小文字）で書く。

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use kifuban_core::{ActionType, Piece, PieceKind, Side, SpecialMoveType};

use crate::literal::{RankMoveType, RelFileType};

const DIGITS: &[(u8, &[&str])] = &[
    (1, &["1", "一", "壱", "壹", "いち", "ichi"]),
    (2, &["2", "二", "弐", "貳", "に", "ni"]),
    (3, &["3", "三", "参", "參", "さん", "san"]),
    (4, &["4", "四", "よん", "し", "yon"]),
    (5, &["5", "五", "ご", "go"]),
    (6, &["6", "六", "ろく", "roku"]),
    (7, &["7", "七", "なな", "しち", "nana"]),
    (8, &["8", "八", "はち", "hachi"]),
    (9, &["9", "九", "きゅう", "きゅー", "く", "kyu", "kyuu"]),
];

const PIECES: &[(PieceKind, &[&str])] = &[
    (PieceKind::King, &["玉", "王", "玉将", "王将", "ぎょく", "おう", "gyoku", "ou"]),
    (PieceKind::Rook, &["飛", "飛車", "ひしゃ", "ひ", "hisha"]),
    // 各: かな漢字変換の誤り
    (PieceKind::Bishop, &["角", "角行", "各", "かく", "kaku"]),
    (PieceKind::Gold, &["金", "金将", "きん", "kin"]),
    (PieceKind::Silver, &["銀", "銀将", "ぎん", "gin"]),
    (PieceKind::Knight, &["桂", "桂馬", "けい", "けいま", "kei", "keima"]),
    (PieceKind::Lance, &["香", "香車", "きょう", "きょうしゃ", "kyo", "kyou"]),
    (PieceKind::Pawn, &["歩", "步", "歩兵", "ふ", "ふひょう", "fu"]),
];

/// 成駒だけの呼び名
const PROMOTED_PIECES: &[(PieceKind, &[&str])] = &[
    (
        PieceKind::Rook,
        &["龍", "竜", "龍王", "竜王", "りゅう", "りゅうおう", "ryu", "ryuu"],
    ),
    (PieceKind::Bishop, &["馬", "龍馬", "竜馬", "うま", "uma"]),
    (PieceKind::Silver, &["全"]),
    (PieceKind::Knight, &["圭"]),
    (PieceKind::Lance, &["杏"]),
    (PieceKind::Pawn, &["と", "と金", "ときん", "tokin"]),
];

/// 基本の呼び名の前に付けて成駒を表す語
const PROMOTE_PREFIXES: &[&str] = &["成", "なり", "nari"];

const REL_FILES: &[(RelFileType, &[&str])] = &[
    (RelFileType::Left, &["左", "ひだり", "hidari"]),
    (RelFileType::Right, &["右", "みぎ", "migi"]),
    (RelFileType::Straight, &["直", "すぐ", "ちょく", "sugu", "choku"]),
];

const RANK_MOVES: &[(RankMoveType, &[&str])] = &[
    (RankMoveType::Up, &["上", "行", "入", "あがる", "あがり", "うえ", "agaru"]),
    (RankMoveType::Back, &["引", "ひく", "ひき", "hiku"]),
    (RankMoveType::Sideways, &["寄", "よる", "より", "yoru", "yori"]),
];

const ACTIONS: &[(ActionType, &[&str])] = &[
    (ActionType::Promote, &["成", "成り", "なり", "なる", "nari", "naru"]),
    (ActionType::Unpromote, &["不成", "不成り", "ならず", "生", "narazu"]),
    (ActionType::Drop, &["打", "打つ", "うつ", "うち", "utsu"]),
];

const SAME_MARKERS: &[&str] = &["同", "仝", "どう", "dou"];

const SIDES: &[(Side, &[&str])] = &[
    (Side::Black, &["▲", "☗", "先手", "せんて", "sente"]),
    (Side::White, &["△", "▽", "☖", "後手", "ごて", "gote"]),
];

const SPECIALS: &[(SpecialMoveType, &[&str])] = &[
    (SpecialMoveType::Interrupt, &["中断", "ちゅうだん"]),
    (
        SpecialMoveType::Resign,
        &["投了", "負けました", "参りました", "とうりょう", "まけました", "まいりました", "resign", "toryo"],
    ),
    (SpecialMoveType::Sennichite, &["千日手", "せんにちて", "sennichite"]),
    (
        SpecialMoveType::TimeUp,
        &["切れ負け", "時間切れ", "時間切れ負け", "きれまけ", "じかんぎれ", "timeup"],
    ),
    (SpecialMoveType::IllegalMove, &["反則負け", "反則", "はんそくまけ", "はんそく"]),
    (SpecialMoveType::Jishogi, &["持将棋", "じしょうぎ", "jishogi"]),
    (SpecialMoveType::CheckMate, &["詰み", "つみ", "tsumi"]),
    (
        SpecialMoveType::EnteringKing,
        &["入玉勝ち", "入玉宣言", "にゅうぎょくかち", "にゅうぎょくせんげん"],
    ),
];

/// 構築済みのテーブル
pub(crate) struct Tables {
    pub digits: HashMap<&'static str, u8>,
    pub pieces: HashMap<String, Piece>,
    pub rel_files: HashMap<&'static str, RelFileType>,
    pub rank_moves: HashMap<&'static str, RankMoveType>,
    pub actions: HashMap<&'static str, ActionType>,
    pub sides: HashMap<&'static str, Side>,
    pub specials: HashMap<&'static str, SpecialMoveType>,
    pub move_re: Regex,
    pub special_re: Regex,
}

pub(crate) static TABLES: Lazy<Tables> = Lazy::new(Tables::build);

fn lookup<T: Copy>(table: &[(T, &'static [&'static str])]) -> HashMap<&'static str, T> {
    let mut map = HashMap::new();
    for &(value, words) in table {
        for &word in words {
            map.entry(word).or_insert(value);
        }
    }
    map
}

/// 長い語から順に並べた選択肢。正規表現は先に書いた選択肢を優先するため
fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    words.dedup();
    words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// 基本の呼び名と成駒の呼び名、および導出した「成＋基本の呼び名」
fn piece_lookup() -> HashMap<String, Piece> {
    let mut map = HashMap::new();
    for &(kind, words) in PIECES {
        for &word in words {
            map.entry(word.to_string()).or_insert(Piece::new(kind));
        }
    }
    for &(kind, words) in PROMOTED_PIECES {
        let Some(promoted) = Piece::new(kind).promote() else {
            continue;
        };
        for &word in words {
            map.entry(word.to_string()).or_insert(promoted);
        }
    }
    for &(kind, words) in PIECES {
        let Some(promoted) = Piece::new(kind).promote() else {
            continue;
        };
        for &prefix in PROMOTE_PREFIXES {
            for &word in words {
                map.entry(format!("{prefix}{word}")).or_insert(promoted);
            }
        }
    }
    map
}

impl Tables {
    fn build() -> Tables {
        let digits = lookup(DIGITS);
        let pieces = piece_lookup();
        let rel_files = lookup(REL_FILES);
        let rank_moves = lookup(RANK_MOVES);
        let actions = lookup(ACTIONS);
        let sides = lookup(SIDES);
        let specials = lookup(SPECIALS);

        let side = alternation(sides.keys().copied());
        let digit = alternation(digits.keys().copied());
        let move_pattern = format!(
            "^(?P<side>{side})?(?:(?P<file>{digit})(?P<rank>{digit}))?(?P<same>{same})?\
             (?P<piece>{piece})(?P<rel>{rel})?(?P<vert>{vert})?(?P<action>{action})?\
             (?:\\((?P<src>[1-9][1-9])\\))?",
            same = alternation(SAME_MARKERS.iter().copied()),
            piece = alternation(pieces.keys().map(String::as_str)),
            rel = alternation(rel_files.keys().copied()),
            vert = alternation(rank_moves.keys().copied()),
            action = alternation(actions.keys().copied()),
        );
        let special_pattern = format!(
            "^(?P<side>{side})?(?P<special>{special})",
            special = alternation(specials.keys().copied()),
        );

        // パターンは上の定数だけから組み立て、各語はエスケープ済み
        let move_re = Regex::new(&move_pattern).expect("valid move pattern");
        let special_re = Regex::new(&special_pattern).expect("valid special pattern");

        log::debug!(
            "notation tables built: {} digits, {} pieces, {} specials",
            digits.len(),
            pieces.len(),
            specials.len()
        );

        Tables {
            digits,
            pieces,
            rel_files,
            rank_moves,
            actions,
            sides,
            specials,
            move_re,
            special_re,
        }
    }
}
