//! Line-oriented block formatting
//!
//! An alternative to [`crate::markdown::render`] for front ends that build
//! their own widgets: each line of a reply is classified into one [`Block`],
//! first matching rule wins. Text is kept raw; escaping is the renderer's job.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NUMBERED: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^\d+[.)]\s.+").expect("numbered regex is valid"));
static BULLET: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[-•]\s.+").expect("bullet regex is valid"));
static EMOJI_HEADER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^\p{Extended_Pictographic}\x{FE0F}?\s.+").expect("emoji header regex is valid")
});
static BOLD: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Span {
  Plain(String),
  Strong(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Block {
  /// `1. item` or `1) item`, numbering kept
  Numbered(String),
  /// `- item` or `• item`, marker kept
  Bullet(String),
  /// Line opening with an emoji, numbered or not
  SectionHeader(String),
  /// Line with bold spans
  Rich(Vec<Span>),
  Spacer,
  Paragraph(String),
}

pub fn format_blocks(content: &str) -> Vec<Block> {
  content.split('\n').map(|line| classify(line.strip_suffix('\r').unwrap_or(line))).collect()
}

fn classify(line: &str) -> Block {
  if NUMBERED.is_match(line) {
    Block::Numbered(line.to_string())
  } else if BULLET.is_match(line) {
    Block::Bullet(line.to_string())
  } else if EMOJI_HEADER.is_match(line) {
    Block::SectionHeader(line.to_string())
  } else if line.contains("**") {
    Block::Rich(spans(line))
  } else if line.trim().is_empty() {
    Block::Spacer
  } else {
    Block::Paragraph(line.to_string())
  }
}

/// Split a line into plain and bold runs; an unpaired `**` stays as text
fn spans(line: &str) -> Vec<Span> {
  let mut spans = Vec::new();
  let mut cursor = 0;

  for caps in BOLD.captures_iter(line) {
    let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    if whole.start() > cursor {
      spans.push(Span::Plain(line[cursor..whole.start()].to_string()));
    }
    spans.push(Span::Strong(inner.as_str().to_string()));
    cursor = whole.end();
  }

  if cursor < line.len() {
    spans.push(Span::Plain(line[cursor..].to_string()));
  }
  spans
}
