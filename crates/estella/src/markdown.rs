//! Markdown-subset rendering for assistant replies
//!
//! Model output is untrusted, so the whole reply is HTML-escaped before any
//! formatting rule runs. The rules then apply in a fixed order, each over
//! the output of the previous one: headers, bold spans, bullets, numbered
//! lines, emoji section headers, and finally line breaks.

use once_cell::sync::Lazy;
use regex::Regex;

pub const LINE_BREAK: &str = "<br />";

static HEADER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^###[ \t]+(.+)$").expect("header regex is valid"));
static BOLD: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex is valid"));
static BULLET: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^-[ \t]+(.+)$").expect("bullet regex is valid"));
static NUMBERED: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^(\d+)\. (.+)$").expect("numbered regex is valid"));
static SECTION: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?m)^(🔎|🏠|💰|📍)[ \t]+(\d+\. .+)$").expect("section regex is valid")
});

/// Escape the characters that carry meaning in markup
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(ch),
    }
  }
  escaped
}

pub fn render(content: &str) -> String {
  // a trailing `\r` would otherwise end up inside elements
  let html = escape_html(&content.replace("\r\n", "\n"));
  let html = HEADER.replace_all(&html, r#"<h3 class="text-lg font-bold mb-2 mt-3">${1}</h3>"#);
  let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
  let html = BULLET.replace_all(&html, r#"<div class="ml-4 my-1">• ${1}</div>"#);
  let html = NUMBERED.replace_all(&html, r#"<div class="ml-4 my-1">${1}. ${2}</div>"#);
  let html = SECTION
    .replace_all(&html, r#"<div class="font-bold text-blue-800 mt-3 mb-2">${1} ${2}</div>"#);
  html.replace('\n', LINE_BREAK)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_text_unchanged() {
    assert_eq!(render("Hello"), "Hello");
    assert_eq!(render(""), "");
  }

  #[test]
  fn test_line_breaks() {
    assert_eq!(render("Line1\nLine2"), "Line1<br />Line2");
  }

  #[test]
  fn test_bold_span() {
    assert_eq!(render("**Hello**"), "<strong>Hello</strong>");
    assert_eq!(
      render("**a** and **b**"),
      "<strong>a</strong> and <strong>b</strong>"
    );
  }

  #[test]
  fn test_bullet() {
    let html = render("- Item");
    assert_eq!(html, r#"<div class="ml-4 my-1">• Item</div>"#);
  }

  #[test]
  fn test_bullet_does_not_join_lines() {
    let html = render("-\nItem");
    assert!(!html.contains("•"));
  }

  #[test]
  fn test_header() {
    let html = render("### Buying Guide");
    assert_eq!(html, r#"<h3 class="text-lg font-bold mb-2 mt-3">Buying Guide</h3>"#);
  }

  #[test]
  fn test_header_only_at_line_start() {
    assert_eq!(render("see ### notes"), "see ### notes");
  }

  #[test]
  fn test_numbered_keeps_numbering() {
    let html = render("12. Check eligibility");
    assert_eq!(html, r#"<div class="ml-4 my-1">12. Check eligibility</div>"#);
  }

  #[test]
  fn test_emoji_section_header() {
    let html = render("🔎 1. Eligibility Check");
    assert_eq!(
      html,
      r#"<div class="font-bold text-blue-800 mt-3 mb-2">🔎 1. Eligibility Check</div>"#
    );

    // other glyphs are plain text
    assert_eq!(render("✅ 1. Done"), "✅ 1. Done");
  }

  #[test]
  fn test_crlf_line_endings() {
    assert_eq!(render("- Item\r\nNext"), r#"<div class="ml-4 my-1">• Item</div><br />Next"#);
    assert_eq!(render("Line1\r\nLine2"), "Line1<br />Line2");
    assert!(!render("### Title\r\n1. One\r\n").contains('\r'));
  }

  #[test]
  fn test_bold_inside_bullet() {
    let html = render("- **Grant**: up to $80,000");
    assert_eq!(html, r#"<div class="ml-4 my-1">• <strong>Grant</strong>: up to $80,000</div>"#);
  }

  #[test]
  fn test_markup_in_content_is_escaped() {
    let html = render("<script>alert('x')</script>");
    assert_eq!(html, "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;");
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn test_full_reply() {
    let reply = "### HDB Options\n💰 1. Budget\n- **BTO** flats\n2. Resale flats\nAsk away!";
    let html = render(reply);
    let segments: Vec<&str> = html.split(LINE_BREAK).collect();
    assert_eq!(segments.len(), 5);
    assert!(segments[0].starts_with("<h3"));
    assert!(segments[1].contains("💰 1. Budget"));
    assert!(segments[2].contains("• <strong>BTO</strong> flats"));
    assert_eq!(segments[3], r#"<div class="ml-4 my-1">2. Resale flats</div>"#);
    assert_eq!(segments[4], "Ask away!");
  }
}
