use thiserror::Error;

pub type Result<T> = std::result::Result<T, EstellaError>;

#[derive(Error, Debug)]
pub enum EstellaError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid configuration: {message}")]
  InvalidConfig { message: String },

  #[error("Message is empty")]
  EmptyMessage,

  #[error("Reply failed: {message}")]
  ReplyFailed { message: String },
}

impl EstellaError {
  pub fn invalid_config(message: impl Into<String>) -> Self {
    Self::InvalidConfig { message: message.into() }
  }

  pub fn reply_failed(message: impl Into<String>) -> Self {
    Self::ReplyFailed { message: message.into() }
  }
}
