//! Follow-up suggestion pipeline
//!
//! Composes extraction, the two rule groups and selection into one call made
//! after every assistant reply.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{Strategy, SuggestionConfig};
use crate::conversation::ConversationTurn;
use crate::{pool, selector, topics};

/// Offered when there is no reply text or no conversation to work from
pub const DEFAULT_FOLLOW_UPS: [&str; 3] = [
  "What are the steps to buy a property in Singapore?",
  "Can PRs or foreigners buy property in Singapore?",
  "How much downpayment do I need for a condo or HDB?",
];

#[derive(Debug, Clone, Default)]
pub struct FollowUpEngine {
  config: SuggestionConfig,
}

impl FollowUpEngine {
  pub fn new(config: SuggestionConfig) -> Self {
    Self { config }
  }

  /// Follow-ups for `latest_reply`, drawing randomness from `rng`
  pub fn follow_ups_with<R: Rng + ?Sized>(
    &self,
    latest_reply: &str,
    history: Option<&[ConversationTurn]>,
    rng: &mut R,
  ) -> Vec<String> {
    let k = self.config.max_suggestions;

    let history = match history {
      Some(turns) if !turns.is_empty() && !latest_reply.trim().is_empty() => turns,
      _ => {
        debug!("no reply or history, using default follow-ups");
        return defaults(k);
      }
    };

    if self.config.strategy == Strategy::PropertyFirst {
      let candidates = pool::build_profile_candidates(latest_reply, history);
      if !candidates.is_empty() {
        debug!(candidates = candidates.len(), "ranking property-specific follow-ups");
        return selector::top(&candidates, k);
      }
    }

    let history_tags = topics::extract_history_tags(history, self.config.history_window);
    let latest_tags = topics::extract_tags(latest_reply);
    let candidates = pool::build_candidates(latest_reply, &history_tags, &latest_tags);
    debug!(
      candidates = candidates.len(),
      history_tags = history_tags.len(),
      latest_tags = latest_tags.len(),
      "sampling conversation follow-ups"
    );

    selector::select(&candidates, k, self.config.sample_window, rng)
  }

  /// Follow-ups using the configured seed, or thread-local randomness without one
  pub fn follow_ups(
    &self,
    latest_reply: &str,
    history: Option<&[ConversationTurn]>,
  ) -> Vec<String> {
    match self.config.seed {
      Some(seed) => self.follow_ups_with(latest_reply, history, &mut StdRng::seed_from_u64(seed)),
      None => self.follow_ups_with(latest_reply, history, &mut rand::rng()),
    }
  }
}

fn defaults(k: usize) -> Vec<String> {
  DEFAULT_FOLLOW_UPS.iter().take(k).map(|q| q.to_string()).collect()
}

/// Follow-ups with default settings
pub fn get_follow_ups(latest_reply: &str, history: Option<&[ConversationTurn]>) -> Vec<String> {
  FollowUpEngine::default().follow_ups(latest_reply, history)
}
