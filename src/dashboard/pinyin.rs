//! Latin search keys for Chinese tile names.

use pinyin::ToPinyin;

/// Transliterates `text` to tone-free pinyin with syllables concatenated,
/// e.g. `百度` becomes `baidu`. Characters without a reading (Latin letters,
/// digits, punctuation) are kept as they are, so mixed names stay searchable.
pub fn to_pinyin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch.to_pinyin() {
            Some(reading) => out.push_str(reading.plain()),
            None => out.push(ch),
        }
    }
    out
}
