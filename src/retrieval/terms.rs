//! Query term extraction.
//!
//! Course subtitles are Chinese text without word boundaries, so instead of
//! tokenizing, every short substring of the question becomes a candidate term.
//! Known domain keywords found in the question are always added as well.

use std::collections::HashSet;

/// Shortest generated term, in characters.
pub const MIN_TERM_CHARS: usize = 2;

/// Longest generated term, in characters.
pub const MAX_TERM_CHARS: usize = 6;

/// Built-in domain vocabulary.
pub const DOMAIN_VOCABULARY: &[&str] = &[
    "八门", "九星", "八神", "用神", "值符", "值使", "开门", "休门", "生门", "死门", "伤门",
    "杜门", "景门", "惊门", "天蓬", "天任", "天冲", "天辅", "天英", "天芮", "天柱", "天心",
    "天禽", "腾蛇", "太阴", "六合", "勾陈", "白虎", "朱雀", "玄武", "九地", "九天", "感情",
    "婚姻", "财运", "工作", "事业", "升职", "疾病", "案例", "五行", "生克", "九宫", "天干",
    "地支", "排盘", "解卦", "单宫", "落宫", "旺相", "休囚", "吉凶", "宫位", "坎", "坤", "震",
    "巽", "乾", "兑", "艮", "离", "奇门", "遁甲", "用神取法", "断事", "应期", "格局",
];

/// Unique candidate terms of one question.
pub type TermSet = HashSet<String>;

/// Turns questions into term sets.
#[derive(Debug, Clone)]
pub struct TermExtractor {
    vocabulary: Vec<String>,
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self {
            vocabulary: DOMAIN_VOCABULARY.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TermExtractor {
    /// Create an extractor with the built-in vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keywords to the vocabulary. Blank and duplicate keywords are ignored.
    pub fn with_extra_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            let keyword: String = keyword.into();
            let keyword = keyword.trim();
            if !keyword.is_empty() && !self.vocabulary.iter().any(|k| k == keyword) {
                self.vocabulary.push(keyword.to_string());
            }
        }
        self
    }

    /// The keywords this extractor matches.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Extract the candidate terms of a question.
    pub fn extract(&self, question: &str) -> TermSet {
        let mut terms = TermSet::new();
        let stripped: String = question.chars().filter(|&c| !is_blank(c)).collect();
        if stripped.is_empty() {
            return terms;
        }

        for keyword in &self.vocabulary {
            if stripped.contains(keyword.as_str()) {
                terms.insert(keyword.clone());
            }
        }

        let chars: Vec<char> = stripped.chars().collect();
        for len in MIN_TERM_CHARS..=MAX_TERM_CHARS {
            if len > chars.len() {
                break;
            }
            for window in chars.windows(len) {
                terms.insert(window.iter().collect());
            }
        }

        terms
    }
}

/// White space as stripped from questions; U+FEFF counts as blank too.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Extract terms with the built-in vocabulary.
pub fn extract_query_terms(question: &str) -> TermSet {
    TermExtractor::default().extract(question)
}
