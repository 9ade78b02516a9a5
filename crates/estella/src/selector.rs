//! Candidate ranking and selection

use rand::Rng;

use crate::pool::Candidate;

pub const DEFAULT_SUGGESTIONS: usize = 3;
pub const DEFAULT_WINDOW: usize = 7;

/// Candidates by priority, highest first; ties keep their pool order
pub fn rank(candidates: &[Candidate]) -> Vec<&Candidate> {
  let mut ranked: Vec<&Candidate> = candidates.iter().collect();
  ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
  ranked
}

/// Sample up to `k` distinct questions from the top `window` candidates
///
/// Each draw removes a uniformly random entry from the window; a question
/// already chosen is dropped rather than redrawn, so fewer than `k` come back
/// only when the window holds fewer than `k` distinct texts.
pub fn select<R: Rng + ?Sized>(
  candidates: &[Candidate],
  k: usize,
  window: usize,
  rng: &mut R,
) -> Vec<String> {
  let mut remaining: Vec<&str> =
    rank(candidates).into_iter().take(window).map(|c| c.question.as_str()).collect();
  let mut chosen: Vec<String> = Vec::with_capacity(k);

  while chosen.len() < k && !remaining.is_empty() {
    let index = rng.random_range(0..remaining.len());
    let question = remaining.remove(index);
    if !chosen.iter().any(|existing| existing == question) {
      chosen.push(question.to_string());
    }
  }

  chosen
}

/// The `k` highest-priority distinct questions, deterministically
pub fn top(candidates: &[Candidate], k: usize) -> Vec<String> {
  let mut chosen: Vec<String> = Vec::with_capacity(k);
  for candidate in rank(candidates) {
    if chosen.len() == k {
      break;
    }
    if !chosen.contains(&candidate.question) {
      chosen.push(candidate.question.clone());
    }
  }
  chosen
}
