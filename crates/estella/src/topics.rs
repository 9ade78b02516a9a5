//! Topic extraction
//!
//! Scans text for vocabulary mentions and accumulates them into ordered tag
//! sets. Matching is plain substring search over lower-cased text.

use std::collections::BTreeSet;

use crate::conversation::{self, ConversationTurn};
use crate::vocabulary::{self, Signal, TagKind, Term, PROFILE_SIGNALS};

/// Number of trailing turns scanned for conversation tags
pub const DEFAULT_HISTORY_WINDOW: usize = 4;

/// Tags in first-discovery order, each at most once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
  terms: Vec<&'static Term>,
}

impl TagSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a term; returns false if its tag was already present
  pub fn insert(&mut self, term: &'static Term) -> bool {
    if self.contains(term.tag) {
      return false;
    }
    self.terms.push(term);
    true
  }

  pub fn contains(&self, tag: &str) -> bool {
    self.terms.iter().any(|term| term.tag == tag)
  }

  pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.terms.iter().map(|term| term.tag)
  }

  pub fn of_kind(&self, kind: TagKind) -> impl Iterator<Item = &'static str> + '_ {
    self.terms.iter().filter(move |term| term.kind == kind).map(|term| term.tag)
  }

  /// The area discovered last, which stands in for the most recently discussed one
  pub fn latest_area(&self) -> Option<&'static str> {
    self.of_kind(TagKind::Area).last()
  }

  /// Tags of `self` followed by any new tags of `other`
  pub fn union(&self, other: &TagSet) -> TagSet {
    let mut merged = self.clone();
    for term in other.terms.iter().copied() {
      merged.insert(term);
    }
    merged
  }

  pub fn len(&self) -> usize {
    self.terms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.terms.is_empty()
  }

  fn scan(&mut self, lowered: &str) {
    for term in vocabulary::terms() {
      if term.is_mentioned_in(lowered) {
        self.insert(term);
      }
    }
  }
}

pub fn extract_tags(text: &str) -> TagSet {
  let mut tags = TagSet::new();
  tags.scan(&text.to_lowercase());
  tags
}

/// Tags from the last `window_size` turns, scanned oldest first
pub fn extract_history_tags(turns: &[ConversationTurn], window_size: usize) -> TagSet {
  let mut tags = TagSet::new();
  for turn in conversation::recent(turns, window_size) {
    tags.scan(&turn.content.to_lowercase());
  }
  tags
}

/// Conversation-wide signals for the property-specific rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSignals {
  signals: BTreeSet<Signal>,
}

impl ProfileSignals {
  pub fn has(&self, signal: Signal) -> bool {
    self.signals.contains(&signal)
  }

  pub fn has_any(&self, signals: &[Signal]) -> bool {
    signals.iter().any(|signal| self.has(*signal))
  }
}

/// Signals across every turn plus the latest reply, joined into one text
pub fn extract_profile_signals(turns: &[ConversationTurn], latest_text: &str) -> ProfileSignals {
  let mut content = turns.iter().map(|turn| turn.content.as_str()).collect::<Vec<_>>().join(" ");
  content.push(' ');
  content.push_str(latest_text);
  let content = content.to_lowercase();

  let signals = PROFILE_SIGNALS
    .iter()
    .filter(|(_, patterns)| patterns.iter().any(|pattern| content.contains(pattern)))
    .map(|(signal, _)| *signal)
    .collect();

  ProfileSignals { signals }
}

/// Whether `needle` appears in the latest text or in any turn at all
pub fn mentioned_anywhere(needle: &str, turns: &[ConversationTurn], latest_text: &str) -> bool {
  latest_text.to_lowercase().contains(needle)
    || turns.iter().any(|turn| turn.content.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_tags_basic() {
    let tags = extract_tags("Thinking about a BTO flat from HDB in Punggol");
    assert!(tags.contains("hdb"));
    assert!(tags.contains("bto"));
    assert!(tags.contains("punggol"));
    assert!(!tags.contains("condo"));
  }

  #[test]
  fn test_extract_tags_is_deterministic() {
    let text = "Mortgage rates for a condominium near Orchard";
    assert_eq!(extract_tags(text), extract_tags(text));
    assert_eq!(extract_tags(text), extract_tags(&text.to_uppercase()));
  }

  #[test]
  fn test_extract_tags_empty() {
    assert!(extract_tags("").is_empty());
    assert!(extract_tags("hello there").is_empty());
  }

  #[test]
  fn test_synonyms_map_to_one_tag() {
    let tags = extract_tags("condo or condominium, loan or mortgage");
    assert_eq!(tags.tags().filter(|tag| *tag == "condo").count(), 1);
    assert!(tags.contains("loan"));
  }

  #[test]
  fn test_substring_matching_without_word_boundaries() {
    // "current" contains "rent"
    let tags = extract_tags("the current market");
    assert!(tags.contains("rental"));
    // "northern" contains "north"
    assert!(extract_tags("northern districts").contains("north"));
  }

  #[test]
  fn test_history_window_limits_scan() {
    let turns = vec![
      ConversationTurn::user("I like Tampines"),
      ConversationTurn::assistant("ok"),
      ConversationTurn::user("ok"),
      ConversationTurn::assistant("ok"),
      ConversationTurn::user("what about bedok?"),
    ];

    let tags = extract_history_tags(&turns, DEFAULT_HISTORY_WINDOW);
    assert!(!tags.contains("tampines"));
    assert!(tags.contains("bedok"));

    let everything = extract_history_tags(&turns, 10);
    assert!(everything.contains("tampines"));
  }

  #[test]
  fn test_latest_area_is_last_discovered() {
    let turns = vec![
      ConversationTurn::user("Compare Bishan and Punggol"),
      ConversationTurn::assistant("Tampines is also popular"),
    ];
    let tags = extract_history_tags(&turns, 4);
    // vocabulary order within a turn, turn order across turns
    let areas: Vec<&str> = tags.of_kind(TagKind::Area).collect();
    assert_eq!(areas, vec!["punggol", "bishan", "tampines"]);
    assert_eq!(tags.latest_area(), Some("tampines"));
  }

  #[test]
  fn test_union_keeps_order() {
    let history = extract_tags("hdb in bedok");
    let latest = extract_tags("condo in bedok and yishun");
    let merged = history.union(&latest);
    assert_eq!(merged.latest_area(), Some("yishun"));
    assert!(merged.contains("hdb"));
    assert!(merged.contains("condo"));
    assert_eq!(merged.of_kind(TagKind::Area).count(), 2);
  }

  #[test]
  fn test_profile_signals() {
    let turns = vec![
      ConversationTurn::user("Can a permanent resident buy an executive condo?"),
      ConversationTurn::assistant("Yes, with some conditions on the loan."),
    ];
    let signals = extract_profile_signals(&turns, "");
    assert!(signals.has(Signal::PermanentResident));
    assert!(signals.has(Signal::ExecutiveCondo));
    assert!(signals.has(Signal::Loan));
    assert!(!signals.has(Signal::Cpf));
  }

  #[test]
  fn test_profile_signal_pr_is_loose() {
    let signals = extract_profile_signals(&[ConversationTurn::user("what is the price")], "");
    assert!(signals.has(Signal::PermanentResident));
    assert!(signals.has(Signal::Price));
  }

  #[test]
  fn test_mentioned_anywhere() {
    let turns = vec![ConversationTurn::user("HDB or not?"), ConversationTurn::assistant("Sure")];
    assert!(mentioned_anywhere("hdb", &turns, ""));
    assert!(mentioned_anywhere("condo", &turns, "A Condo could work"));
    assert!(!mentioned_anywhere("condo", &turns, "landed"));
  }
}
