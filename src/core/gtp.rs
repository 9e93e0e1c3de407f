//! The slice of the Go Text Protocol needed to deliver chat to the engine.
//!
//! KGS forwards chat as `kgs-chat (game|private) <from> <message...>`; the
//! reply goes back as an ordinary GTP success response.

use crate::core::engine::ChatEngine;
use crate::core::{ChatRequest, ChatSettings, SearchSnapshot};
use crate::utils::error::{ChatError, Result};

pub const KNOWN_COMMANDS: &[&str] = &[
    "protocol_version",
    "name",
    "version",
    "known_command",
    "list_commands",
    "quit",
    "kgs-chat",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtpCommand {
    KgsChat(ChatRequest),
    ProtocolVersion,
    Name,
    Version,
    KnownCommand(String),
    ListCommands,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtpLine {
    pub id: Option<u32>,
    pub command: GtpCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtpResponse {
    Success(String),
    Failure(String),
}

impl GtpResponse {
    /// Frames the response. A blank line ends a GTP response, so blank lines
    /// inside the text are dropped.
    pub fn render(&self, id: Option<u32>) -> String {
        let (prefix, text) = match self {
            GtpResponse::Success(text) => ('=', text),
            GtpResponse::Failure(text) => ('?', text),
        };
        let text = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let id = id.map(|id| id.to_string()).unwrap_or_default();
        if text.is_empty() {
            format!("{}{}\n\n", prefix, id)
        } else {
            format!("{}{} {}\n\n", prefix, id, text)
        }
    }
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<GtpLine>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (first, rest) = next_token(trimmed);
    let (id, name, rest) = match first.parse::<u32>() {
        Ok(id) => {
            let (name, rest) = next_token(rest);
            (Some(id), name, rest)
        }
        Err(_) => (None, first, rest),
    };

    if name.is_empty() {
        return Err(ChatError::GtpError {
            message: "missing command name".to_string(),
        });
    }

    let command = match name.to_ascii_lowercase().as_str() {
        "kgs-chat" => GtpCommand::KgsChat(parse_chat_args(rest)?),
        "protocol_version" => GtpCommand::ProtocolVersion,
        "name" => GtpCommand::Name,
        "version" => GtpCommand::Version,
        "known_command" => GtpCommand::KnownCommand(next_token(rest).0.to_string()),
        "list_commands" => GtpCommand::ListCommands,
        "quit" => GtpCommand::Quit,
        _ => GtpCommand::Unknown(name.to_string()),
    };

    Ok(Some(GtpLine { id, command }))
}

fn parse_chat_args(args: &str) -> Result<ChatRequest> {
    let (location, rest) = next_token(args);
    let (from, message) = next_token(rest);

    if location.is_empty() || from.is_empty() {
        return Err(ChatError::GtpError {
            message: "usage: kgs-chat (game|private) <from> <message>".to_string(),
        });
    }

    Ok(ChatRequest {
        opponent: location.eq_ignore_ascii_case("game"),
        from: from.to_string(),
        message: message.trim_start().to_string(),
    })
}

fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// A GTP conversation bound to one chat engine and one game state.
pub struct GtpSession<C: ChatSettings> {
    engine: ChatEngine<C>,
    snapshot: Option<SearchSnapshot>,
    finished: bool,
}

impl<C: ChatSettings> GtpSession<C> {
    pub fn new(engine: ChatEngine<C>, snapshot: Option<SearchSnapshot>) -> Self {
        Self {
            engine,
            snapshot,
            finished: false,
        }
    }

    pub fn engine(&self) -> &ChatEngine<C> {
        &self.engine
    }

    pub fn set_snapshot(&mut self, snapshot: Option<SearchSnapshot>) {
        self.snapshot = snapshot;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handles one input line and returns the framed response, if any.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let parsed = match parse_command(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Rejected GTP line '{}': {}", line.trim_end(), e);
                let id = next_token(line).0.parse().ok();
                let message = match e {
                    ChatError::GtpError { message } => message,
                    other => other.to_string(),
                };
                return Some(GtpResponse::Failure(message).render(id));
            }
        };

        let response = self.execute(parsed.command);
        Some(response.render(parsed.id))
    }

    fn execute(&mut self, command: GtpCommand) -> GtpResponse {
        match command {
            GtpCommand::KgsChat(request) => {
                tracing::debug!(
                    "kgs-chat from {} ({}): {}",
                    request.from,
                    if request.opponent { "game" } else { "private" },
                    request.message
                );
                match self.engine.generic_chat(&request, self.snapshot.as_ref()) {
                    Some(reply) => GtpResponse::Success(reply),
                    None => GtpResponse::Failure("unknown chat command".to_string()),
                }
            }
            GtpCommand::ProtocolVersion => GtpResponse::Success("2".to_string()),
            GtpCommand::Name => GtpResponse::Success(env!("CARGO_PKG_NAME").to_string()),
            GtpCommand::Version => GtpResponse::Success(env!("CARGO_PKG_VERSION").to_string()),
            GtpCommand::KnownCommand(name) => {
                let known = KNOWN_COMMANDS.contains(&name.to_ascii_lowercase().as_str());
                GtpResponse::Success(known.to_string())
            }
            GtpCommand::ListCommands => GtpResponse::Success(KNOWN_COMMANDS.join("\n")),
            GtpCommand::Quit => {
                self.finished = true;
                self.engine.done();
                GtpResponse::Success(String::new())
            }
            GtpCommand::Unknown(name) => {
                tracing::debug!("Unknown GTP command: {}", name);
                GtpResponse::Failure("unknown command".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kgs_chat_with_id() {
        let parsed = parse_command("12 kgs-chat game pasky  when do we play?\n")
            .unwrap()
            .unwrap();

        assert_eq!(parsed.id, Some(12));
        assert_eq!(
            parsed.command,
            GtpCommand::KgsChat(ChatRequest::new(true, "pasky", "when do we play?"))
        );
    }

    #[test]
    fn test_parse_private_chat() {
        let parsed = parse_command("kgs-chat private kibitzer hi").unwrap().unwrap();

        assert_eq!(parsed.id, None);
        assert_eq!(
            parsed.command,
            GtpCommand::KgsChat(ChatRequest::new(false, "kibitzer", "hi"))
        );
    }

    #[test]
    fn test_parse_chat_with_empty_message() {
        let parsed = parse_command("kgs-chat game bob").unwrap().unwrap();
        assert_eq!(
            parsed.command,
            GtpCommand::KgsChat(ChatRequest::new(true, "bob", ""))
        );
    }

    #[test]
    fn test_parse_rejects_incomplete_chat() {
        assert!(parse_command("kgs-chat game").is_err());
        assert!(parse_command("7").is_err());
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \r\n").unwrap(), None);
        assert_eq!(parse_command("# kgs-chat game bob hi").unwrap(), None);
    }

    #[test]
    fn test_parse_other_commands() {
        let parsed = parse_command("3 known_command kgs-chat").unwrap().unwrap();
        assert_eq!(
            parsed.command,
            GtpCommand::KnownCommand("kgs-chat".to_string())
        );

        let parsed = parse_command("genmove b").unwrap().unwrap();
        assert_eq!(parsed.command, GtpCommand::Unknown("genmove".to_string()));
    }

    #[test]
    fn test_render_responses() {
        assert_eq!(
            GtpResponse::Success("Today".to_string()).render(Some(4)),
            "=4 Today\n\n"
        );
        assert_eq!(GtpResponse::Success(String::new()).render(None), "=\n\n");
        assert_eq!(
            GtpResponse::Failure("unknown chat command".to_string()).render(None),
            "? unknown chat command\n\n"
        );
    }

    #[test]
    fn test_render_drops_blank_lines_inside_text() {
        assert_eq!(
            GtpResponse::Success("first\n\nsecond\r\n\n".to_string()).render(Some(9)),
            "=9 first\nsecond\n\n"
        );
        assert_eq!(GtpResponse::Success("\n\n".to_string()).render(None), "=\n\n");
        assert_eq!(
            GtpResponse::Success("a\nb".to_string()).render(None),
            "= a\nb\n\n"
        );
    }
}
