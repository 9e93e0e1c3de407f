use crate::core::chat::{ChatTable, LoadReport};
use crate::core::{ChatRequest, ChatSettings, SearchSnapshot, Storage};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_REPLY: &str = "I know all those words, but that sentence makes no sense to me";
pub const NOT_PLAYING_REPLY: &str = "I'm winning big without playing";

/// Extra komi below this magnitude is not worth mentioning.
const EXTRA_KOMI_THRESHOLD: f64 = 0.5;

pub struct ChatEngine<C: ChatSettings> {
    settings: C,
    table: Option<ChatTable>,
    rng: StdRng,
}

impl<C: ChatSettings> ChatEngine<C> {
    pub fn new(settings: C) -> Self {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            settings,
            table: None,
            rng,
        }
    }

    /// Loads the chat file. Without a file the engine only answers `winrate`.
    pub async fn init<S: Storage>(
        &mut self,
        storage: &S,
        chat_file: Option<&str>,
    ) -> Result<LoadReport> {
        let Some(path) = chat_file else {
            tracing::debug!("No chat file configured");
            self.table = None;
            return Ok(LoadReport::default());
        };

        tracing::debug!("Reading chat file: {}", path);
        let bytes = storage.read_file(path).await?;
        let content = String::from_utf8_lossy(&bytes);

        let (table, report) = ChatTable::parse(&content, self.settings.max_patterns())?;
        tracing::info!(
            "Loaded {} chat patterns from {} ({} skipped)",
            report.loaded,
            path,
            report.skipped
        );

        self.table = Some(table);
        Ok(report)
    }

    pub fn done(&mut self) {
        if self.table.take().is_some() {
            tracing::debug!("Chat table released");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&ChatTable> {
        self.table.as_ref()
    }

    /// Answers a chat message. `snapshot` is `None` when not playing.
    ///
    /// Returns `None` when the engine has nothing to say, in which case the
    /// caller reports an unknown chat command.
    pub fn generic_chat(
        &mut self,
        request: &ChatRequest,
        snapshot: Option<&SearchSnapshot>,
    ) -> Option<String> {
        let message = request.message.trim_start();

        if starts_with_ignore_case(message, "winrate") {
            return Some(match snapshot {
                Some(snapshot) => winrate_reply(snapshot),
                None => self.settings.not_playing_reply().to_string(),
            });
        }

        if !request.opponent && !self.settings.reply_to_observers() {
            tracing::debug!("Ignoring observer chat from {}", request.from);
            return None;
        }

        let table = self.table.as_mut()?;

        let request = ChatRequest {
            message: message.to_string(),
            ..request.clone()
        };
        let reply = table
            .select(&request, snapshot, &mut self.rng)
            .unwrap_or_else(|| self.settings.default_reply().to_string());

        tracing::debug!("Reply to {}: {}", request.from, reply);
        Some(reply)
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn winrate_reply(snapshot: &SearchSnapshot) -> String {
    let mut reply = format!(
        "In {} playouts at {} machines, {} {} can win with {:.1}% probability",
        snapshot.playouts,
        snapshot.machines,
        snapshot.color,
        snapshot.best_move,
        100.0 * snapshot.winrate
    );
    if snapshot.extra_komi.abs() >= EXTRA_KOMI_THRESHOLD {
        reply.push_str(&format!(
            ", while self-imposing extra komi {:.1}",
            snapshot.extra_komi
        ));
    }
    reply.push('.');
    reply
}
