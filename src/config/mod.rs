pub mod cli;
pub mod toml_config;

use crate::core::chat::MAX_CHAT_PATTERNS;
use crate::core::engine::{DEFAULT_REPLY, NOT_PLAYING_REPLY};
use crate::core::ChatSettings;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::model::{Move, SearchSnapshot, Stone};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pachi-chat")]
#[command(about = "Answers KGS chat for a Go engine from a pattern file")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Chat pattern file (minwin;maxwin;from;regex;reply lines)
    #[arg(long)]
    pub chat_file: Option<String>,

    /// Seed for reply selection, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Side to move; without it the engine is not playing
    #[arg(long)]
    pub color: Option<Stone>,

    #[arg(long, default_value = "pass")]
    pub best_move: Move,

    #[arg(long, default_value = "0.5")]
    pub winrate: f64,

    #[arg(long, default_value = "0")]
    pub playouts: u32,

    #[arg(long, default_value = "1")]
    pub machines: u32,

    #[arg(long, default_value = "1")]
    pub threads: u32,

    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub extra_komi: f64,

    /// Print the loaded chat table as JSON and exit
    #[arg(long)]
    pub dump_table: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn snapshot(&self) -> Option<SearchSnapshot> {
        self.color.map(|color| SearchSnapshot {
            color,
            best_move: self.best_move,
            playouts: self.playouts,
            machines: self.machines,
            threads: self.threads,
            winrate: self.winrate,
            extra_komi: self.extra_komi,
        })
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(path) = &self.chat_file {
            validate_path("chat_file", path)?;
        }
        crate::utils::validation::validate_range("winrate", self.winrate, 0.0, 1.0)?;
        validate_positive_number("machines", self.machines as usize, 1)?;
        validate_positive_number("threads", self.threads as usize, 1)?;
        Ok(())
    }
}

/// Settings after merging the TOML file and the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub chat_file: Option<String>,
    pub default_reply: String,
    pub not_playing_reply: String,
    pub max_patterns: usize,
    pub reply_to_observers: bool,
    pub seed: Option<u64>,
    pub json_logs: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chat_file: None,
            default_reply: DEFAULT_REPLY.to_string(),
            not_playing_reply: NOT_PLAYING_REPLY.to_string(),
            max_patterns: MAX_CHAT_PATTERNS,
            reply_to_observers: true,
            seed: None,
            json_logs: false,
        }
    }
}

impl ChatConfig {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut resolved = Self::default();

        if let Some(chat) = &config.chat {
            resolved.chat_file = chat.file.clone();
            if let Some(reply) = &chat.default_reply {
                resolved.default_reply = reply.clone();
            }
            if let Some(reply) = &chat.not_playing_reply {
                resolved.not_playing_reply = reply.clone();
            }
            resolved.max_patterns = chat.max_patterns.unwrap_or(MAX_CHAT_PATTERNS);
            resolved.reply_to_observers = chat.reply_to_observers.unwrap_or(true);
            resolved.seed = chat.seed;
        }
        resolved.json_logs = config.json_logs();

        resolved
    }

    /// Command line flags win over the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(path) = &cli.chat_file {
            self.chat_file = Some(path.clone());
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.json_logs {
            self.json_logs = true;
        }
    }
}

impl ChatSettings for ChatConfig {
    fn default_reply(&self) -> &str {
        &self.default_reply
    }

    fn not_playing_reply(&self) -> &str {
        &self.not_playing_reply
    }

    fn max_patterns(&self) -> usize {
        self.max_patterns
    }

    fn reply_to_observers(&self) -> bool {
        self.reply_to_observers
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Validate for ChatConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.chat_file {
            validate_path("chat.file", path)?;
        }
        validate_non_empty_string("chat.default_reply", &self.default_reply)?;
        validate_non_empty_string("chat.not_playing_reply", &self.not_playing_reply)?;
        validate_positive_number("chat.max_patterns", self.max_patterns, 1)?;
        Ok(())
    }
}
