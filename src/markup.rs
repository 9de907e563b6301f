//! Light markup used in assistant turns: `**bold**` and paragraph breaks

use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph pattern is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

pub type Paragraph = Vec<Span>;

pub fn parse(text: &str) -> Vec<Paragraph> {
    PARAGRAPH_BREAK.split(text).map(parse_paragraph).collect()
}

fn parse_paragraph(paragraph: &str) -> Paragraph {
    let mut plain = BOLD.split(paragraph);
    let mut spans = Vec::new();

    if let Some(head) = plain.next().filter(|s| !s.is_empty()) {
        spans.push(Span::plain(head));
    }
    for caps in BOLD.captures_iter(paragraph) {
        spans.push(Span::bold(&caps[1]));
        if let Some(tail) = plain.next().filter(|s| !s.is_empty()) {
            spans.push(Span::plain(tail));
        }
    }
    spans
}
