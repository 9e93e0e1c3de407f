use crate::utils::error::{ChatError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column letters in GTP vertex notation. `I` is skipped.
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "B"),
            Stone::White => write!(f, "W"),
        }
    }
}

impl FromStr for Stone {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Stone::Black),
            "w" | "white" => Ok(Stone::White),
            _ => Err(ChatError::InvalidConfigValueError {
                field: "color".to_string(),
                value: s.to_string(),
                reason: "Expected one of: b, black, w, white".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Pass,
    Resign,
    /// 1-based, `col` from the left and `row` from the bottom.
    Point { col: u8, row: u8 },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
            Move::Point { col, row } => {
                let letter = COLUMN_LETTERS
                    .get(usize::from(*col).wrapping_sub(1))
                    .copied()
                    .unwrap_or(b'?');
                write!(f, "{}{}", letter as char, row)
            }
        }
    }
}

impl FromStr for Move {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ChatError::InvalidConfigValueError {
            field: "move".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "pass" => return Ok(Move::Pass),
            "resign" => return Ok(Move::Resign),
            _ => {}
        }

        let mut chars = lower.chars();
        let letter = chars
            .next()
            .ok_or_else(|| invalid("Vertex cannot be empty"))?
            .to_ascii_uppercase();
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(|| invalid("Unknown column letter"))?;
        let row: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| invalid("Row must be a number"))?;
        if row == 0 || usize::from(row) > COLUMN_LETTERS.len() {
            return Err(invalid("Row out of range"));
        }

        Ok(Move::Point {
            col: (col + 1) as u8,
            row,
        })
    }
}

/// What the search knows about the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    pub color: Stone,
    pub best_move: Move,
    pub playouts: u32,
    pub machines: u32,
    pub threads: u32,
    pub winrate: f64,
    pub extra_komi: f64,
}

impl SearchSnapshot {
    pub fn new(color: Stone, best_move: Move, winrate: f64) -> Self {
        Self {
            color,
            best_move,
            playouts: 0,
            machines: 1,
            threads: 1,
            winrate,
            extra_komi: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Sent on the game channel by the opponent, as opposed to an observer.
    pub opponent: bool,
    pub from: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(opponent: bool, from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            opponent,
            from: from.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub min_winrate: f64,
    pub max_winrate: f64,
    /// `None` answers anyone.
    pub from: Option<String>,
    pub pattern: String,
    /// printf template, one parameter: 100 * winrate.
    pub reply: String,
    pub displayed: bool,
    #[serde(skip)]
    pub(crate) regex: Regex,
}

impl ChatEntry {
    pub fn new(
        min_winrate: f64,
        max_winrate: f64,
        from: Option<String>,
        pattern: &str,
        reply: &str,
    ) -> Result<Self> {
        let regex = regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            min_winrate,
            max_winrate,
            from,
            pattern: pattern.to_string(),
            reply: reply.to_string(),
            displayed: false,
            regex,
        })
    }

    pub fn matches(&self, request: &ChatRequest, winrate: Option<f64>) -> bool {
        if let Some(winrate) = winrate {
            if winrate < self.min_winrate || winrate > self.max_winrate {
                return false;
            }
        }

        if let Some(from) = &self.from {
            if *from != request.from {
                return false;
            }
        }

        self.regex.is_match(&request.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display_skips_i() {
        assert_eq!(Move::Point { col: 8, row: 3 }.to_string(), "H3");
        assert_eq!(Move::Point { col: 9, row: 3 }.to_string(), "J3");
        assert_eq!(Move::Point { col: 19, row: 19 }.to_string(), "T19");
        assert_eq!(Move::Pass.to_string(), "pass");
    }

    #[test]
    fn test_move_parse() {
        assert_eq!("d4".parse::<Move>().unwrap(), Move::Point { col: 4, row: 4 });
        assert_eq!("J10".parse::<Move>().unwrap(), Move::Point { col: 9, row: 10 });
        assert_eq!("PASS".parse::<Move>().unwrap(), Move::Pass);
        assert!("i5".parse::<Move>().is_err());
        assert!("d0".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn test_stone_parse() {
        assert_eq!("White".parse::<Stone>().unwrap(), Stone::White);
        assert_eq!("b".parse::<Stone>().unwrap(), Stone::Black);
        assert!("x".parse::<Stone>().is_err());
    }

    #[test]
    fn test_entry_matching() {
        let entry = ChatEntry::new(-1.0, 0.3, None, "winning", "%.1f%%").unwrap();
        let request = ChatRequest::new(true, "bob", "Are you WINNING?");

        assert!(entry.matches(&request, Some(0.2)));
        assert!(entry.matches(&request, Some(0.3)));
        assert!(!entry.matches(&request, Some(0.31)));
        // bounds do not apply when not playing
        assert!(entry.matches(&request, None));

        let other = ChatRequest::new(true, "bob", "hello");
        assert!(!entry.matches(&other, Some(0.2)));
    }

    #[test]
    fn test_entry_sender_filter() {
        let entry =
            ChatEntry::new(-1.0, 2.0, Some("pasky".to_string()), "^when ", "Today").unwrap();

        assert!(entry.matches(&ChatRequest::new(false, "pasky", "when is it"), None));
        assert!(!entry.matches(&ChatRequest::new(false, "Pasky", "when is it"), None));
        assert!(!entry.matches(&ChatRequest::new(false, "pasky", "so when is it"), None));
    }
}
