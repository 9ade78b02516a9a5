//! Chat session driving a reply source
//!
//! The session owns the conversation history and turns every exchange into
//! an [`AssistantView`]: the reply, its markup and blocks, and the follow-up
//! questions to offer next. A failed reply never surfaces as an error; the
//! user sees a fixed apology instead and can try again.

use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::blocks::{format_blocks, Block};
use crate::conversation::ConversationTurn;
use crate::followups::FollowUpEngine;
use crate::markdown::render;
use crate::{EstellaError, Result};

/// Shown when the reply source refuses the request
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request. Please try again.";

/// Shown when the reply source could not be reached or its answer was unreadable
pub const UNAVAILABLE_REPLY: &str =
  "Sorry, there was an error processing your request. Please try again later.";

/// Anything that can answer a user message, usually a model endpoint
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait ReplySource {
  /// Answer `message`; `history` holds the turns exchanged before it
  async fn reply(&mut self, message: &str, history: &[ConversationTurn]) -> Result<String>;
}

/// Everything a front end needs to display one assistant turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantView {
  pub reply: String,
  pub markup: String,
  pub blocks: Vec<Block>,
  pub follow_ups: Vec<String>,
  /// Set when the reply source failed and an apology was shown instead
  pub fallback: bool,
}

impl AssistantView {
  fn answered(reply: String, follow_ups: Vec<String>) -> Self {
    Self {
      markup: render(&reply),
      blocks: format_blocks(&reply),
      reply,
      follow_ups,
      fallback: false,
    }
  }

  fn fallback(apology: &str) -> Self {
    Self {
      reply: apology.to_string(),
      markup: render(apology),
      blocks: vec![Block::Paragraph(apology.to_string())],
      follow_ups: Vec::new(),
      fallback: true,
    }
  }
}

pub struct ChatSession<R: ReplySource> {
  source: R,
  history: Vec<ConversationTurn>,
  engine: FollowUpEngine,
}

impl<R: ReplySource> ChatSession<R> {
  pub fn new(source: R, engine: FollowUpEngine) -> Self {
    Self { source, history: Vec::new(), engine }
  }

  pub fn history(&self) -> &[ConversationTurn] {
    &self.history
  }

  /// Send a user message and wait for the assistant's turn
  ///
  /// Only blank input is an error. Reply failures are logged and answered
  /// with [`FALLBACK_REPLY`] when the source refused the request, or
  /// [`UNAVAILABLE_REPLY`] for any other failure; both turns are recorded
  /// either way.
  pub async fn send(&mut self, message: &str) -> Result<AssistantView> {
    let message = message.trim();
    if message.is_empty() {
      return Err(EstellaError::EmptyMessage);
    }

    let outcome = self.source.reply(message, &self.history).await;
    self.history.push(ConversationTurn::user(message));

    match outcome {
      Ok(reply) => {
        self.history.push(ConversationTurn::assistant(reply.clone()));
        let follow_ups = self.engine.follow_ups(&reply, Some(&self.history));
        debug!(turns = self.history.len(), follow_ups = follow_ups.len(), "reply received");
        Ok(AssistantView::answered(reply, follow_ups))
      }
      Err(e) => {
        warn!("Reply source failed: {}", e);
        let apology = match e {
          EstellaError::ReplyFailed { .. } => FALLBACK_REPLY,
          _ => UNAVAILABLE_REPLY,
        };
        self.history.push(ConversationTurn::assistant(apology));
        Ok(AssistantView::fallback(apology))
      }
    }
  }
}

/// Replies served from a fixed queue, for replaying recorded conversations
#[derive(Debug, Clone, Default)]
pub struct ScriptedReplies {
  replies: VecDeque<String>,
}

impl ScriptedReplies {
  pub fn new<I, S>(replies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { replies: replies.into_iter().map(Into::into).collect() }
  }

  /// Assistant turns of a transcript, in order
  pub fn from_transcript(turns: &[ConversationTurn]) -> Self {
    Self::new(turns.iter().filter(|turn| turn.is_assistant()).map(|turn| turn.content.clone()))
  }

  pub fn remaining(&self) -> usize {
    self.replies.len()
  }
}

impl ReplySource for ScriptedReplies {
  async fn reply(&mut self, _message: &str, _history: &[ConversationTurn]) -> Result<String> {
    self.replies.pop_front().ok_or_else(|| EstellaError::reply_failed("no scripted reply left"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conversation::Role;
  use mockall::predicate::*;

  const REPLY: &str = "**BTO** flats in Tampines:\n- Launches every quarter";

  #[tokio::test]
  async fn test_send_returns_rendered_view() {
    let mut source = MockReplySource::new();
    source
      .expect_reply()
      .with(eq("Tell me about BTO"), always())
      .times(1)
      .returning(|_, _| Ok(REPLY.to_string()));

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    let view = session.send("  Tell me about BTO ").await.unwrap();

    assert!(!view.fallback);
    assert_eq!(view.reply, REPLY);
    assert_eq!(view.markup, render(REPLY));
    assert_eq!(view.blocks.len(), 2);
    assert_eq!(view.follow_ups.len(), 3);

    let roles: Vec<Role> = session.history().iter().map(|turn| turn.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(session.history()[0].content, "Tell me about BTO");
  }

  #[tokio::test]
  async fn test_reply_sees_prior_turns_only() {
    let mut source = MockReplySource::new();
    source.expect_reply().times(2).returning(|message, history| {
      Ok(format!("{} after {} turns", message, history.len()))
    });

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    assert_eq!(session.send("first").await.unwrap().reply, "first after 0 turns");
    assert_eq!(session.send("second").await.unwrap().reply, "second after 2 turns");
    assert_eq!(session.history().len(), 4);
  }

  #[tokio::test]
  async fn test_failed_reply_falls_back() {
    let mut source = MockReplySource::new();
    source
      .expect_reply()
      .times(1)
      .returning(|_, _| Err(EstellaError::reply_failed("upstream returned 500")));

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    let view = session.send("Hello").await.unwrap();

    assert!(view.fallback);
    assert_eq!(view.reply, FALLBACK_REPLY);
    assert_eq!(view.blocks, vec![Block::Paragraph(FALLBACK_REPLY.to_string())]);
    assert!(view.follow_ups.is_empty());
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1].content, FALLBACK_REPLY);
  }

  #[tokio::test]
  async fn test_transport_failure_uses_later_apology() {
    let mut source = MockReplySource::new();
    source.expect_reply().times(1).returning(|_, _| {
      Err(EstellaError::Io(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")))
    });

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    let view = session.send("Hello").await.unwrap();

    assert!(view.fallback);
    assert_eq!(view.reply, UNAVAILABLE_REPLY);
    assert_eq!(view.blocks, vec![Block::Paragraph(UNAVAILABLE_REPLY.to_string())]);
    assert!(view.follow_ups.is_empty());
    assert_eq!(session.history()[1].content, UNAVAILABLE_REPLY);
  }

  #[tokio::test]
  async fn test_blank_message_is_rejected() {
    let mut source = MockReplySource::new();
    source.expect_reply().times(0);

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    let result = session.send("   ").await;

    assert!(matches!(result, Err(EstellaError::EmptyMessage)));
    assert!(session.history().is_empty());
  }

  #[tokio::test]
  async fn test_scripted_replies_run_out() {
    let transcript = vec![
      ConversationTurn::user("Hi"),
      ConversationTurn::assistant("Hello! Looking for a condo or HDB?"),
    ];
    let source = ScriptedReplies::from_transcript(&transcript);
    assert_eq!(source.remaining(), 1);

    let mut session = ChatSession::new(source, FollowUpEngine::default());
    let first = session.send("Hi").await.unwrap();
    assert!(!first.fallback);
    assert_eq!(first.reply, "Hello! Looking for a condo or HDB?");

    let second = session.send("Condo please").await.unwrap();
    assert!(second.fallback);
  }
}
