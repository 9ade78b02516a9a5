use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use estella::conversation::{latest_reply, load_transcript, Role};
use estella::{
  format_blocks, render, ChatSession, FollowUpEngine, ScriptedReplies, Strategy, SuggestionConfig,
};

#[derive(Parser)]
#[command(name = "estella")]
#[command(
  about = "Estella - Property Sales Assistant Toolkit\nFollow-up suggestions and reply formatting"
)]
#[command(version)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Settings shared by the commands that suggest follow-ups
#[derive(Args)]
struct SuggestOptions {
  /// Seed for reproducible suggestions
  #[arg(long)]
  seed: Option<u64>,
  /// Configuration file (defaults to .estella.json or estella.json if present)
  #[arg(short, long, value_name = "PATH")]
  config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Suggest follow-up questions for the last reply of a transcript
  Suggest {
    /// JSON array of {"role", "content"} turns
    transcript: PathBuf,
    #[command(flatten)]
    options: SuggestOptions,
    /// Always sample from the conversation pool
    #[arg(long)]
    sampled: bool,
    /// Print the suggestions as a JSON array
    #[arg(long)]
    json: bool,
  },
  /// Render a reply file as markup
  Render {
    /// Text file holding the reply
    file: PathBuf,
    /// Print classified lines as JSON instead of markup
    #[arg(long)]
    blocks: bool,
  },
  /// Replay a transcript through a chat session
  Replay {
    /// JSON array of {"role", "content"} turns
    transcript: PathBuf,
    #[command(flatten)]
    options: SuggestOptions,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter =
    if cli.verbose { EnvFilter::new("estella=debug") } else { EnvFilter::new("estella=warn") };
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .init();

  match cli.command {
    Commands::Suggest { transcript, options, sampled, json } => {
      suggest(&transcript, &options, sampled, json)?;
    }
    Commands::Render { file, blocks } => {
      render_file(&file, blocks)?;
    }
    Commands::Replay { transcript, options } => {
      replay(&transcript, &options).await?;
    }
  }

  Ok(())
}

fn load_config(options: &SuggestOptions) -> Result<SuggestionConfig> {
  let mut config = match &options.config {
    Some(path) => SuggestionConfig::load_from_file(path)
      .with_context(|| format!("Failed to load config from {}", path.display()))?,
    None => SuggestionConfig::load().context("Failed to load config")?,
  };

  if options.seed.is_some() {
    config.seed = options.seed;
  }
  debug!(?config, "configuration loaded");
  Ok(config)
}

fn suggest(path: &Path, options: &SuggestOptions, sampled: bool, json: bool) -> Result<()> {
  let mut config = load_config(options)?;
  if sampled {
    config.strategy = Strategy::Sampled;
  }

  let turns = load_transcript(path)
    .with_context(|| format!("Failed to read transcript {}", path.display()))?;
  let latest = latest_reply(&turns).map(|turn| turn.content.as_str()).unwrap_or_default();

  let follow_ups = FollowUpEngine::new(config).follow_ups(latest, Some(&turns));

  if json {
    println!("{}", serde_json::to_string_pretty(&follow_ups)?);
    return Ok(());
  }

  println!("{}", "Suggested follow-ups:".cyan().bold());
  for (i, question) in follow_ups.iter().enumerate() {
    println!("  {}. {}", i + 1, question);
  }
  Ok(())
}

fn render_file(path: &Path, blocks: bool) -> Result<()> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read {}", path.display()))?;

  if blocks {
    println!("{}", serde_json::to_string_pretty(&format_blocks(&content))?);
  } else {
    println!("{}", render(&content));
  }
  Ok(())
}

async fn replay(path: &Path, options: &SuggestOptions) -> Result<()> {
  let config = load_config(options)?;
  let turns = load_transcript(path)
    .with_context(|| format!("Failed to read transcript {}", path.display()))?;

  let source = ScriptedReplies::from_transcript(&turns);
  let mut session = ChatSession::new(source, FollowUpEngine::new(config));

  for turn in turns.iter().filter(|turn| turn.role == Role::User) {
    let Ok(view) = session.send(&turn.content).await else {
      println!("{} {}", "skipped".yellow(), "(empty message)".dimmed());
      continue;
    };

    println!("{} {}", "you:".blue().bold(), turn.content.trim());
    if view.fallback {
      println!("{} {}", "assistant:".red().bold(), view.reply);
    } else {
      println!("{} {}", "assistant:".green().bold(), view.markup);
    }
    for question in &view.follow_ups {
      println!("  {} {}", "→".dimmed(), question);
    }
    println!();
  }

  println!("{} {} turns", "Replayed".cyan().bold(), session.history().len());
  Ok(())
}
