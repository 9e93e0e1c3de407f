pub mod chat;
pub mod engine;
pub mod gtp;
pub mod template;

pub use crate::domain::model::{ChatEntry, ChatRequest, SearchSnapshot};
pub use crate::domain::ports::{ChatSettings, Storage};
pub use crate::utils::error::Result;
