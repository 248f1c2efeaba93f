//! 自由入力の指し手文字列の解析
//!
//! 「▲７六歩」「どう角」「２三銀不成(14)」「投了」のような文字列を `LiteralMove` にする。
//! 局面は見ないので、移動元の特定や合法性の確認は `BoardNotationExt::convert_move` で行う。
//!
//! 解釈できない文字列は `None` を返す（エラーではない）。

mod normalize;
mod tables;

use regex::Captures;

use kifuban_core::{ActionType, Side, Square};

use crate::literal::{LiteralMove, RankMoveType, RelFileType};
use normalize::Normalized;
use tables::{TABLES, Tables};

/// 先頭の1手を解析する。後ろに続く文字列は無視する
pub fn parse_move(text: &str) -> Option<LiteralMove> {
    parse_move_prefix(text).map(|(mv, _)| mv)
}

/// 先頭の1手を解析し、消費した元の文字列のバイト数と一緒に返す
pub fn parse_move_prefix(text: &str) -> Option<(LiteralMove, usize)> {
    let normalized = Normalized::new(text);
    let (mv, consumed) = match_at(normalized.as_str())?;
    Some((mv, normalized.original_len(consumed)))
}

/// 先頭の1手を解析し、「同」の移動先を `prev` で埋める
pub fn parse_move_after(text: &str, prev: Option<Square>) -> Option<LiteralMove> {
    parse_move(text).map(|mv| fill_same(mv, prev))
}

/// 文字列中の指し手をすべて取り出す
///
/// 指し手として読めない文字は1文字ずつ読み飛ばす。
/// 「同」の移動先は直前に取り出した手の移動先で埋める。
pub fn parse_moves(text: &str) -> Vec<LiteralMove> {
    let normalized = Normalized::new(text);
    let text = normalized.as_str();
    let mut moves = Vec::new();
    let mut prev: Option<Square> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match match_at(rest) {
            Some((mv, consumed)) if consumed > 0 => {
                let mv = fill_same(mv, prev);
                if !mv.is_special() {
                    prev = mv.dst;
                }
                moves.push(mv);
                pos += consumed;
            }
            _ => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    moves
}

fn fill_same(mut mv: LiteralMove, prev: Option<Square>) -> LiteralMove {
    if mv.same_as_old && mv.dst.is_none() {
        mv.dst = prev;
    }
    mv
}

/// 正規化済みの文字列の先頭を解析する。消費したバイト数は正規化後のもの
fn match_at(text: &str) -> Option<(LiteralMove, usize)> {
    let tables = &*TABLES;

    // 「投了」などを先に見る
    if let Some(caps) = tables.special_re.captures(text) {
        let special = *tables.specials.get(caps.name("special")?.as_str())?;
        let side = side_of(tables, &caps);
        let end = caps.get(0)?.end();
        return Some((LiteralMove::special(side, special), end));
    }

    let caps = tables.move_re.captures(text)?;
    let dst = match (caps.name("file"), caps.name("rank")) {
        (Some(file), Some(rank)) => {
            let file = *tables.digits.get(file.as_str())?;
            let rank = *tables.digits.get(rank.as_str())?;
            Some(Square::new(file, rank).ok()?)
        }
        _ => None,
    };
    let same_as_old = caps.name("same").is_some();
    if dst.is_none() && !same_as_old {
        return None;
    }

    let piece = *tables.pieces.get(caps.name("piece")?.as_str())?;
    let rel_file = caps
        .name("rel")
        .and_then(|m| tables.rel_files.get(m.as_str()).copied())
        .unwrap_or(RelFileType::None);
    let rank_move = caps
        .name("vert")
        .and_then(|m| tables.rank_moves.get(m.as_str()).copied())
        .unwrap_or(RankMoveType::None);
    let action = caps
        .name("action")
        .and_then(|m| tables.actions.get(m.as_str()).copied())
        .unwrap_or(ActionType::None);
    let src = match caps.name("src") {
        Some(m) => {
            let digits = m.as_str().as_bytes();
            Some(Square::new(digits[0] - b'0', digits[1] - b'0').ok()?)
        }
        None => None,
    };

    let mv = LiteralMove {
        side: side_of(tables, &caps),
        dst,
        same_as_old,
        piece: Some(piece),
        rel_file,
        rank_move,
        action,
        src,
        special: None,
    };
    Some((mv, caps.get(0)?.end()))
}

fn side_of(tables: &Tables, caps: &Captures<'_>) -> Option<Side> {
    caps.name("side")
        .and_then(|m| tables.sides.get(m.as_str()).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kifuban_core::{Piece, SpecialMoveType};

    fn sq(file: u8, rank: u8) -> Square {
        Square::new(file, rank).unwrap()
    }

    #[test]
    fn test_parse_basic_move() {
        let mv = parse_move("▲７六歩").unwrap();
        assert_eq!(mv.side, Some(Side::Black));
        assert_eq!(mv.dst, Some(sq(7, 6)));
        assert_eq!(mv.piece, Some(Piece::PAWN));
        assert_eq!(mv.action, ActionType::None);
        assert!(!mv.same_as_old);
    }

    #[test]
    fn test_parse_numeral_systems() {
        for text in ["76歩", "７六歩", "七六歩", "ななろくふ", "ナナロクフ", "76fu"] {
            let mv = parse_move(text).unwrap_or_else(|| panic!("{text} not parsed"));
            assert_eq!(mv.dst, Some(sq(7, 6)), "{text}");
            assert_eq!(mv.piece, Some(Piece::PAWN), "{text}");
        }
        let mv = parse_move("参弐銀").unwrap();
        assert_eq!(mv.dst, Some(sq(3, 2)));
    }

    #[test]
    fn test_parse_qualifiers_in_order() {
        let mv = parse_move("△５二金左上").unwrap();
        assert_eq!(mv.side, Some(Side::White));
        assert_eq!(mv.rel_file, RelFileType::Left);
        assert_eq!(mv.rank_move, RankMoveType::Up);

        let mv = parse_move("２三銀不成").unwrap();
        assert_eq!(mv.action, ActionType::Unpromote);
        let mv = parse_move("２三銀成").unwrap();
        assert_eq!(mv.action, ActionType::Promote);
        assert_eq!(mv.piece, Some(Piece::SILVER));
        let mv = parse_move("２三成銀").unwrap();
        assert_eq!(mv.piece, Piece::SILVER.promote());
        assert_eq!(mv.action, ActionType::None);

        let mv = parse_move("５五角打").unwrap();
        assert_eq!(mv.action, ActionType::Drop);
    }

    #[test]
    fn test_parse_same_and_source() {
        let mv = parse_move("同　銀(31)").unwrap();
        assert!(mv.same_as_old);
        assert_eq!(mv.dst, None);
        assert_eq!(mv.src, Some(sq(3, 1)));

        let mv = parse_move_after("どう角", Some(sq(3, 3))).unwrap();
        assert!(mv.same_as_old);
        assert_eq!(mv.piece, Some(Piece::BISHOP));
        assert_eq!(mv.dst, Some(sq(3, 3)));
    }

    #[test]
    fn test_special_keywords_come_first() {
        let mv = parse_move("△投了").unwrap();
        assert_eq!(mv.special, Some(SpecialMoveType::Resign));
        assert_eq!(mv.side, Some(Side::White));
        assert_eq!(parse_move("まけました").unwrap().special, Some(SpecialMoveType::Resign));
        assert_eq!(parse_move("千日手").unwrap().special, Some(SpecialMoveType::Sennichite));
    }

    #[test]
    fn test_parse_failure_is_none() {
        assert_eq!(parse_move(""), None);
        assert_eq!(parse_move("歩"), None);
        assert_eq!(parse_move("こんにちは"), None);
        // 0 筋は存在しない
        assert_eq!(parse_move("06歩"), None);
    }

    #[test]
    fn test_prefix_reports_original_bytes() {
        let text = "７六歩　△３四歩";
        let (mv, consumed) = parse_move_prefix(text).unwrap();
        assert_eq!(mv.dst, Some(sq(7, 6)));
        assert_eq!(&text[..consumed], "７六歩");

        let (mv, _) = parse_move_prefix(&text[consumed..]).unwrap();
        assert_eq!(mv.side, Some(Side::White));
        assert_eq!(mv.dst, Some(sq(3, 4)));
    }

    #[test]
    fn test_parse_moves_in_commentary() {
        let moves = parse_moves("ここで▲２四歩△同歩▲同飛なら先手よし");
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].dst, Some(sq(2, 4)));
        assert!(moves[1].same_as_old);
        assert_eq!(moves[1].dst, Some(sq(2, 4)));
        assert_eq!(moves[2].piece, Some(Piece::ROOK));
        assert_eq!(moves[2].dst, Some(sq(2, 4)));
    }
}
