//! 入力文字列の正規化
//!
//! 全角英数字は半角に、カタカナはひらがなに、英字は小文字にそろえる。
//! 空白と区切りの記号は捨てる。正規化後の位置から元の文字列のバイト位置を引けるようにしておく。

/// 読み飛ばす区切り記号
const DECORATIONS: [char; 7] = ['・', '「', '」', '『', '』', '〔', '〕'];

pub(crate) struct Normalized {
    text: String,
    /// (正規化後の文字の終端, 元の文字の終端) の昇順列
    ends: Vec<(usize, usize)>,
}

impl Normalized {
    pub(crate) fn new(input: &str) -> Normalized {
        let mut text = String::with_capacity(input.len());
        let mut ends = Vec::with_capacity(input.len());
        for (offset, c) in input.char_indices() {
            if let Some(n) = normalize_char(c) {
                text.push(n);
                ends.push((text.len(), offset + c.len_utf8()));
            }
        }
        Normalized { text, ends }
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// 正規化後の先頭 `consumed` バイトに対応する元の文字列のバイト数
    pub(crate) fn original_len(&self, consumed: usize) -> usize {
        let idx = self.ends.partition_point(|&(end, _)| end <= consumed);
        match idx {
            0 => 0,
            i => self.ends[i - 1].1,
        }
    }
}

fn normalize_char(c: char) -> Option<char> {
    if c.is_whitespace() || DECORATIONS.contains(&c) {
        return None;
    }
    let mapped = match c {
        // 全角 ASCII
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        // カタカナ → ひらがな
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    };
    Some(mapped.to_ascii_lowercase())
}
