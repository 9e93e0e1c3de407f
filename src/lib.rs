pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, ChatConfig};

pub use core::{chat::ChatTable, engine::ChatEngine};
pub use domain::model::{ChatEntry, ChatRequest, Move, SearchSnapshot, Stone};
pub use utils::error::{ChatError, Result};
