use crate::core::template::format_reply;
use crate::domain::model::{ChatEntry, ChatRequest, SearchSnapshot};
use crate::utils::error::{ChatError, Result};
use crate::utils::validation::validate_max_length;
use rand::Rng;
use serde::Serialize;

pub const MAX_CHAT_PATTERNS: usize = 500;
pub const MAX_FROM_LEN: usize = 20;
pub const MAX_REGEX_LEN: usize = 100;
pub const MAX_REPLY_LEN: usize = 300;

/// Win rate assumed when formatting a reply outside of a game.
const IDLE_WINRATE: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    /// The file held more patterns than allowed and the tail was ignored.
    pub truncated: bool,
}

/// Pattern table read from a chat file of `minwin;maxwin;from;regex;reply` lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatTable {
    entries: Vec<ChatEntry>,
}

impl ChatTable {
    pub fn parse(content: &str, max_patterns: usize) -> Result<(Self, LoadReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(content.as_bytes());

        let mut entries = Vec::new();
        let mut report = LoadReport::default();

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            // lines without a separator are comments, as are lines starting with '#'
            if record.len() < 2 {
                continue;
            }

            if entries.len() >= max_patterns {
                tracing::warn!(
                    "max chat patterns reached ({}), ignoring the rest from line {}",
                    max_patterns,
                    line
                );
                report.truncated = true;
                break;
            }

            match parse_entry(&record, line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Skipping chat line: {}", e);
                    report.skipped += 1;
                }
            }
        }

        report.loaded = entries.len();
        tracing::debug!(
            "Parsed chat table: {} loaded, {} skipped",
            report.loaded,
            report.skipped
        );
        Ok((Self { entries }, report))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn reset_displayed(&mut self) {
        for entry in &mut self.entries {
            entry.displayed = false;
        }
    }

    /// Picks a reply among the entries matching `request`.
    ///
    /// Entries that have not been displayed yet are preferred. Once every
    /// matching entry has been shown, the choice is made among all of them.
    /// Win-rate bounds are only checked when `snapshot` is present.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        request: &ChatRequest,
        snapshot: Option<&SearchSnapshot>,
        rng: &mut R,
    ) -> Option<String> {
        let winrate = snapshot.map(|s| s.winrate);

        let matched: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(request, winrate))
            .map(|(i, _)| i)
            .collect();

        if matched.is_empty() {
            return None;
        }

        let fresh: Vec<usize> = matched
            .iter()
            .copied()
            .filter(|&i| !self.entries[i].displayed)
            .collect();
        let choices = if fresh.is_empty() { &matched } else { &fresh };

        tracing::debug!(
            "{} chat entries match '{}' ({} not yet displayed)",
            matched.len(),
            request.message,
            fresh.len()
        );

        let index = choices[rng.gen_range(0..choices.len())];
        let entry = &mut self.entries[index];
        entry.displayed = true;

        Some(format_reply(
            &entry.reply,
            100.0 * winrate.unwrap_or(IDLE_WINRATE),
        ))
    }
}

fn parse_entry(record: &csv::StringRecord, line: usize) -> Result<ChatEntry> {
    let pattern_error = |reason: String| ChatError::PatternError { line, reason };

    if record.len() < 5 {
        return Err(pattern_error(format!(
            "expected 5 fields (minwin;maxwin;from;regex;reply), found {}",
            record.len()
        )));
    }

    let parse_bound = |name: &str, raw: &str| {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(|| pattern_error(format!("{} '{}' is not a number", name, raw)))
    };
    let min_winrate = parse_bound("minwin", &record[0])?;
    let max_winrate = parse_bound("maxwin", &record[1])?;
    if min_winrate > max_winrate {
        return Err(pattern_error(format!(
            "minwin {} is above maxwin {}",
            min_winrate, max_winrate
        )));
    }

    let from = &record[2];
    let pattern = &record[3];
    let reply = &record[4];

    validate_max_length("from", from, MAX_FROM_LEN)
        .and_then(|_| validate_max_length("regex", pattern, MAX_REGEX_LEN))
        .and_then(|_| validate_max_length("reply", reply, MAX_REPLY_LEN))
        .map_err(|e| pattern_error(e.to_string()))?;

    if pattern.is_empty() {
        return Err(pattern_error("regex cannot be empty".to_string()));
    }

    let from = if from.trim().is_empty() {
        None
    } else {
        Some(from.to_string())
    };

    ChatEntry::new(min_winrate, max_winrate, from, pattern, reply)
        .map_err(|e| pattern_error(e.to_string()))
}
