//! Markup stripping and character-set restriction for raw corpus text.
//!
//! The normalizer removes wiki/HTML noise, keeps only characters of the
//! target scripts and collapses whitespace. Every removed span becomes a
//! single space so neighbouring words never get glued together. Output never
//! contains `<`, `{` or `[`, which is what makes a second pass a no-op.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<...>` tags.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// `{{...}}` templates, non-greedy, allowed to span lines.
static WIKI_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("valid template regex"));

/// `[[...]]` internal links (single line).
static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[.*?\]\]").expect("valid link regex"));

/// `[http://...]` / `[https://...]` external links.
static EXTERNAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[https?://[^\]]*\]").expect("valid external link regex"));

/// Inclusive range of extra allowed code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub start: char,
    pub end: char,
}

impl CharRange {
    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.start <= ch && ch <= self.end
    }
}

/// Arabic block.
pub const ARABIC: CharRange = CharRange::new('\u{0600}', '\u{06FF}');
/// Tifinagh block.
pub const TIFINAGH: CharRange = CharRange::new('\u{2D30}', '\u{2D7F}');

/// Characters kept on top of ASCII alphanumerics and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Script blocks to keep (e.g. Arabic, Tifinagh).
    pub extra_ranges: Vec<CharRange>,
    /// Individual characters to keep: quote marks, glottal stop, `_`, `-`.
    pub extra_chars: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            extra_ranges: vec![ARABIC, TIFINAGH],
            extra_chars: "\u{2019}'\u{02BF}_-".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    ranges: Vec<CharRange>,
    chars: Vec<char>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        let mut chars: Vec<char> = config.extra_chars.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        Self {
            ranges: config.extra_ranges.clone(),
            chars,
        }
    }

    /// Whether `ch` survives the character filter.
    pub fn is_allowed(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric()
            || ch.is_whitespace()
            || self.chars.binary_search(&ch).is_ok()
            || self.ranges.iter().any(|r| r.contains(ch))
    }

    /// Clean raw text.
    ///
    /// Markup must be removed before the character filter runs, since the
    /// filter drops the brackets the markup patterns match on.
    pub fn normalize(&self, raw: &str) -> String {
        let text = HTML_TAG.replace_all(raw, " ");
        let text = WIKI_TEMPLATE.replace_all(&text, " ");
        let text = WIKI_LINK.replace_all(&text, " ");
        let text = EXTERNAL_LINK.replace_all(&text, " ");

        let filtered: String = text
            .chars()
            .map(|ch| if self.is_allowed(ch) { ch } else { ' ' })
            .collect();

        collapse_whitespace(&filtered)
    }
}

/// Collapse whitespace runs to one ASCII space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        Normalizer::default().normalize(s)
    }

    #[test]
    fn strips_html_tags() {
        assert_eq!(norm("azul<br/>fellawen <b>akk</b>"), "azul fellawen akk");
    }

    #[test]
    fn strips_multiline_templates_non_greedy() {
        let raw = "tazwara {{Infobox\n| name = x\n}} tagrumma {{cite|y}} taggara";
        assert_eq!(norm(raw), "tazwara tagrumma taggara");
    }

    #[test]
    fn strips_internal_and_external_links() {
        let raw = "deg [[Lezzayer|Lezzayer]] d [https://example.org Asmel] tamurt";
        assert_eq!(norm(raw), "deg d tamurt");
    }

    #[test]
    fn internal_links_do_not_span_lines() {
        // Unclosed on the first line: brackets are dropped by the filter instead.
        assert_eq!(norm("a [[b\nc]] d"), "a b c d");
    }

    #[test]
    fn keeps_target_scripts_and_marks() {
        let raw = "ⴰⵣⵓⵍ مرحبا l’ɛmer aʿli d-wi tala_n";
        // ɛ (U+025B) is outside every allowed set.
        assert_eq!(norm(raw), "ⴰⵣⵓⵍ مرحبا l’ mer aʿli d-wi tala_n");
    }

    #[test]
    fn removes_punctuation_and_symbols() {
        assert_eq!(norm("Azul, a yemma! (1990) «ok» 5€"), "Azul a yemma 1990 ok 5");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(norm("  a \t\n b\u{00A0} c  "), "a b c");
        assert_eq!(norm(""), "");
        assert_eq!(norm(" \n\t "), "");
    }

    #[test]
    fn custom_ranges_replace_defaults() {
        let cfg = NormalizerConfig {
            extra_ranges: vec![CharRange::new('\u{00C0}', '\u{00FF}')],
            extra_chars: String::new(),
        };
        let n = Normalizer::new(&cfg);
        assert_eq!(n.normalize("café مرحبا l'eau"), "café l eau");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "<p>Azul {{x}} [[y]] [http://z w]</p>  fellawen",
            "<<a>b> {{ {{nested}} }} [[a]]]",
            "a\u{0651}\u{064E} ⵜⴰ’ ʿ - _ ¡hola! <unclosed",
            "{{unclosed template\nline two",
            "[https://broken link without end",
            "\u{2028}mixed\u{3000}spaces\r\n",
        ];
        let n = Normalizer::default();
        for s in samples {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn output_only_contains_allowed_chars_and_single_spaces() {
        let n = Normalizer::default();
        let out = n.normalize("Tizi-Wezzu, 2024: <i>ⵜⴰⵎⴰⵣⵉⵖⵜ</i>  &amp; العربية!!  x");
        assert!(out.chars().all(|c| n.is_allowed(c)));
        assert!(!out.contains("  "));
        assert_eq!(out, out.trim());
        assert!(out.chars().filter(|c| c.is_whitespace()).all(|c| c == ' '));
    }
}
