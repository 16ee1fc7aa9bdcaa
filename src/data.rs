//! Static code tables
//!
//! Root keys map a single letter to its root glyph. Word entries carry the
//! full code typed for a character (head root + tail root in most cases).

use serde::{Deserialize, Serialize};

/// A single-letter key and the root glyph it types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RootMapping {
    pub key: char,
    pub root: &'static str,
}

/// Word table categories, in the order the word pages introduce them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordCategory {
    HighFreq,
    Common,
    Pronoun,
    Family,
    Time,
    Question,
    Verb,
    Adjective,
    Difficult,
    School,
    Food,
    Nature,
    Punct,
}

impl WordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordCategory::HighFreq => "HighFreq",
            WordCategory::Common => "Common",
            WordCategory::Pronoun => "Pronoun",
            WordCategory::Family => "Family",
            WordCategory::Time => "Time",
            WordCategory::Question => "Question",
            WordCategory::Verb => "Verb",
            WordCategory::Adjective => "Adjective",
            WordCategory::Difficult => "Difficult",
            WordCategory::School => "School",
            WordCategory::Food => "Food",
            WordCategory::Nature => "Nature",
            WordCategory::Punct => "Punct",
        }
    }
}

/// A character (or short word) with its code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordEntry {
    pub glyph: &'static str,
    pub code: &'static str,
    pub category: WordCategory,
    /// Human-readable decomposition, e.g. "竹 + 戈"
    pub hint: &'static str,
}

const fn root(key: char, root: &'static str) -> RootMapping {
    RootMapping { key, root }
}

const fn word(
    glyph: &'static str,
    code: &'static str,
    category: WordCategory,
    hint: &'static str,
) -> WordEntry {
    WordEntry {
        glyph,
        code,
        category,
        hint,
    }
}

/// Root table, ordered A..Z so a key indexes it directly
pub const ROOT_TABLE: [RootMapping; 26] = [
    root('A', "日"),
    root('B', "月"),
    root('C', "金"),
    root('D', "木"),
    root('E', "水"),
    root('F', "火"),
    root('G', "土"),
    root('H', "竹"),
    root('I', "戈"),
    root('J', "十"),
    root('K', "大"),
    root('L', "中"),
    root('M', "一"),
    root('N', "弓"),
    root('O', "人"),
    root('P', "心"),
    root('Q', "手"),
    root('R', "口"),
    root('S', "尸"),
    root('T', "廿"),
    root('U', "山"),
    root('V', "女"),
    root('W', "田"),
    root('X', "難"),
    root('Y', "卜"),
    root('Z', "重"),
];

use WordCategory::*;

pub const WORD_TABLE: &[WordEntry] = &[
    // High frequency
    word("我", "HI", HighFreq, "竹 + 戈"),
    word("你", "OF", HighFreq, "人 + 火"),
    word("他", "OD", HighFreq, "人 + 木"),
    word("的", "HI", HighFreq, "竹 + 戈 (選)"),
    word("是", "AO", HighFreq, "日 + 人"),
    // Common
    word("在", "KG", Common, "大 + 土"),
    word("不", "MF", Common, "一 + 火"),
    word("了", "NN", Common, "弓 + 弓"),
    word("有", "KB", Common, "大 + 月"),
    word("和", "HR", Common, "竹 + 口"),
    word("好", "VD", Common, "女 + 木"),
    word("要", "MV", Common, "一 + 女"),
    word("這", "YR", Common, "卜 + 口"),
    word("那", "SL", Common, "尸 + 中"),
    word("會", "OA", Common, "人 + 日"),
    word("對", "TI", Common, "廿 + 戈"),
    word("說", "YU", Common, "卜 + 山"),
    word("做", "OK", Common, "人 + 大"),
    word("想", "DP", Common, "木 + 心"),
    word("愛", "BE", Common, "月 + 水"),
    // Pronouns & family
    word("們", "ON", Pronoun, "人弓"),
    word("誰", "YG", Pronoun, "卜土"),
    word("大", "K", Pronoun, "大"),
    word("家", "JO", Family, "十人"),
    word("爸", "CU", Family, "金山"),
    word("媽", "VM", Family, "女一"),
    // Time
    word("時", "AI", Time, "日戈"),
    word("間", "AA", Time, "日日"),
    word("今", "ON", Time, "人弓"),
    word("天", "MK", Time, "一大"),
    word("年", "OQ", Time, "人手"),
    word("早", "AJ", Time, "日十"),
    word("晚", "AU", Time, "日山"),
    // Questions
    word("嗎", "RF", Question, "口火"),
    word("什麼", "OJ", Question, "人十"),
    word("為", "BF", Question, "月火"),
    word("吧", "RU", Question, "口山"),
    word("呢", "RP", Question, "口心"),
    // Verbs
    word("看", "HU", Verb, "竹山"),
    word("聽", "SP", Verb, "尸心"),
    word("寫", "JF", Verb, "十火"),
    word("吃", "RN", Verb, "口弓"),
    word("喝", "RV", Verb, "口女"),
    word("去", "GI", Verb, "土戈"),
    word("來", "DO", Verb, "木人"),
    word("走", "GO", Verb, "土人"),
    word("打", "QN", Verb, "手弓"),
    // Adjectives
    word("多", "NI", Adjective, "弓戈"),
    word("少", "FH", Adjective, "火竹"),
    word("美", "TK", Adjective, "廿大"),
    word("快", "PK", Adjective, "心大"),
    word("慢", "PE", Adjective, "心水"),
    word("高", "YB", Adjective, "卜月"),
    word("興", "HC", Adjective, "竹金"),
    // Difficult / special
    word("身", "HH", Difficult, "竹竹"),
    word("齊", "YX", Difficult, "卜難"),
    word("龜", "NX", Difficult, "弓難"),
    word("謝", "YI", Difficult, "卜戈"),
    word("灣", "EN", Difficult, "水弓"),
    word("餐", "YV", Difficult, "卜女"),
    // School & daily life
    word("學", "HD", School, "竹木"),
    word("校", "DK", School, "木大"),
    word("師", "LB", School, "中月"),
    word("生", "HM", School, "竹一"),
    word("書", "LA", School, "中日"),
    word("筆", "HQ", School, "竹手"),
    word("課", "YD", School, "卜木"),
    word("文", "YK", School, "卜大"),
    word("英", "TK", School, "廿大"),
    word("數", "FK", School, "火大"),
    // Food & nature
    word("水", "E", Nature, "水"),
    word("果", "WD", Food, "田木"),
    word("飯", "OE", Food, "人水"),
    word("麵", "JW", Food, "十田"),
    word("貓", "BT", Nature, "月廿"),
    word("狗", "KR", Nature, "大口"),
    word("花", "TP", Nature, "廿心"),
    word("草", "TJ", Nature, "廿十"),
    // Punctuation
    word("，", "ZA", Punct, "ZA"),
    word("。", "ZB", Punct, "ZB"),
    word("？", "ZI", Punct, "ZI"),
    word("！", "ZJ", Punct, "ZJ"),
];

/// Look up a root mapping by key (case-insensitive)
#[inline]
pub fn root_mapping(key: char) -> Option<&'static RootMapping> {
    let key = key.to_ascii_uppercase();
    if key.is_ascii_uppercase() {
        Some(&ROOT_TABLE[(key as u8 - b'A') as usize])
    } else {
        None
    }
}

/// Root glyph typed by `key`, e.g. 'A' -> "日"
#[inline]
pub fn root_glyph(key: char) -> Option<&'static str> {
    root_mapping(key).map(|m| m.root)
}

/// All word entries in the given categories, in table order
pub fn words_in(categories: &[WordCategory]) -> Vec<&'static WordEntry> {
    WORD_TABLE
        .iter()
        .filter(|w| categories.contains(&w.category))
        .collect()
}

/// Reference-browser search: substring match on the glyph, or a
/// case-insensitive match on the code or category name.
pub fn search(filter: &str) -> Vec<&'static WordEntry> {
    let needle = filter.to_lowercase();
    WORD_TABLE
        .iter()
        .filter(|w| {
            w.glyph.contains(filter)
                || w.code.to_lowercase().contains(&needle)
                || w.category.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Root glyphs for each letter of `code`; unknown letters are passed through
pub fn decompose(code: &str) -> Vec<String> {
    code.chars()
        .map(|c| root_glyph(c).map(str::to_string).unwrap_or_else(|| c.to_string()))
        .collect()
}
