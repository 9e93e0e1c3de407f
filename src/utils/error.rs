use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid regular expression: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Chat pattern error on line {line}: {reason}")]
    PatternError { line: usize, reason: String },

    #[error("GTP error: {message}")]
    GtpError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Pattern,
    Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::IoError(_) | ChatError::SerializationError(_) => ErrorCategory::Io,
            ChatError::ConfigValidationError { .. } | ChatError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            ChatError::CsvError(_) | ChatError::RegexError(_) | ChatError::PatternError { .. } => {
                ErrorCategory::Pattern
            }
            ChatError::GtpError { .. } => ErrorCategory::Protocol,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a bad line costs one pattern, the rest of the table still loads
            ChatError::PatternError { .. } | ChatError::RegexError(_) => ErrorSeverity::Low,
            ChatError::GtpError { .. } => ErrorSeverity::Medium,
            ChatError::CsvError(_)
            | ChatError::ConfigValidationError { .. }
            | ChatError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ChatError::IoError(_) | ChatError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ChatError::IoError(_) => "Check that the chat file exists and is readable",
            ChatError::CsvError(_) => {
                "Chat file lines must look like minwin;maxwin;from;regex;reply"
            }
            ChatError::RegexError(_) | ChatError::PatternError { .. } => {
                "Fix or remove the offending line in the chat file"
            }
            ChatError::SerializationError(_) => "Retry without --dump-table",
            ChatError::ConfigValidationError { .. } | ChatError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration and command line flags"
            }
            ChatError::GtpError { .. } => {
                "Send commands as: [id] kgs-chat (game|private) <name> <message>"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ChatError::IoError(e) => format!("Could not read a file: {}", e),
            ChatError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
