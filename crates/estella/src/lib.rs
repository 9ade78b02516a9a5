//! Follow-up suggestions and reply formatting for a property sales assistant

pub mod blocks;
pub mod config;
pub mod conversation;
pub mod error;
pub mod followups;
pub mod markdown;
pub mod pool;
pub mod selector;
pub mod session;
pub mod topics;
pub mod vocabulary;

pub use blocks::{format_blocks, Block, Span};
pub use config::{Strategy, SuggestionConfig};
pub use conversation::{load_transcript, ConversationTurn, Role};
pub use error::{EstellaError, Result};
pub use followups::{get_follow_ups, FollowUpEngine, DEFAULT_FOLLOW_UPS};
pub use markdown::render;
pub use session::{
  AssistantView, ChatSession, ReplySource, ScriptedReplies, FALLBACK_REPLY, UNAVAILABLE_REPLY,
};
