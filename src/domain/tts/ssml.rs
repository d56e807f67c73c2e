//! Prosody markup for coaching scripts.

use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]+)\s+").expect("valid sentence pattern"));

#[derive(Debug, Clone)]
pub struct SsmlOptions {
    pub sentence_pause_ms: u32,
    pub paragraph_pause_ms: u32,
    pub emphasis_words: Vec<String>,
}

impl Default for SsmlOptions {
    fn default() -> Self {
        Self {
            sentence_pause_ms: 300,
            paragraph_pause_ms: 1000,
            emphasis_words: Vec::new(),
        }
    }
}

/// Wrap a plain script in `<speak>` with pauses and emphasis.
///
/// Pauses go after every sentence inside a paragraph and between
/// paragraphs. Emphasis matches whole words, ignoring case.
pub fn enhance_script_with_ssml(script: &str, options: &SsmlOptions) -> String {
    let sentence_break = format!(r#"$1<break time="{}"/> "#, format_pause(options.sentence_pause_ms));
    let paragraph_break = format!(r#"<break time="{}"/>"#, format_pause(options.paragraph_pause_ms));

    let emphasis = emphasis_pattern(&options.emphasis_words);

    let paragraphs: Vec<String> = PARAGRAPH_SPLIT
        .split(script.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|paragraph| {
            let text = mark_emphasis(paragraph, emphasis.as_ref());
            SENTENCE_END
                .replace_all(&text, sentence_break.as_str())
                .into_owned()
        })
        .collect();

    format!("<speak>{}</speak>", paragraphs.join(&paragraph_break))
}

/// One case-insensitive whole-word alternation, longest keyword first
fn emphasis_pattern(words: &[String]) -> Option<Regex> {
    let mut alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()));

    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
}

/// Escape a raw paragraph, wrapping keyword matches in `<emphasis>`.
/// Matching runs on the raw text so tags and entities are never rewritten.
fn mark_emphasis(paragraph: &str, pattern: Option<&Regex>) -> String {
    let Some(pattern) = pattern else {
        return escape_xml(paragraph);
    };

    let mut marked = String::with_capacity(paragraph.len() * 2);
    let mut last_end = 0;
    for mat in pattern.find_iter(paragraph) {
        marked.push_str(&escape_xml(&paragraph[last_end..mat.start()]));
        marked.push_str(r#"<emphasis level="moderate">"#);
        marked.push_str(&escape_xml(mat.as_str()));
        marked.push_str("</emphasis>");
        last_end = mat.end();
    }
    marked.push_str(&escape_xml(&paragraph[last_end..]));
    marked
}

fn format_pause(ms: u32) -> String {
    if ms >= 1000 && ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{}ms", ms)
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
