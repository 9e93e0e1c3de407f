use clap::Parser;
use pachi_chat::core::gtp::GtpSession;
use pachi_chat::utils::error::{ChatError, ErrorSeverity};
use pachi_chat::utils::{logger, validation::Validate};
use pachi_chat::{ChatConfig, ChatEngine, CliConfig, LocalStorage, TomlConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn exit_code(e: &ChatError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: ChatError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(exit_code(&e).max(1));
}

fn load_config(cli: &CliConfig) -> Result<ChatConfig, ChatError> {
    cli.validate()?;

    let mut config = match &cli.config {
        Some(path) => {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            ChatConfig::from_toml(&file)
        }
        None => ChatConfig::default(),
    };
    config.apply_cli(cli);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            fail(e);
        }
    };

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pachi-chat");
    tracing::debug!("Resolved config: {:?}", config);

    let chat_file = config.chat_file.clone();
    let mut engine = ChatEngine::new(config);
    let storage = LocalStorage::default();

    match engine.init(&storage, chat_file.as_deref()).await {
        Ok(report) if report.truncated => {
            tracing::warn!("Chat file truncated after {} patterns", report.loaded);
        }
        Ok(_) => {}
        Err(e) if cli.dump_table => fail(e),
        Err(e) => {
            // keep serving: without a table only winrate is answered
            tracing::error!("❌ Failed to load chat file: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        }
    }

    if cli.dump_table {
        let json = match engine.table().map(|table| table.to_json()) {
            Some(Ok(json)) => json,
            Some(Err(e)) => fail(e),
            None => "null".to_string(),
        };
        println!("{}", json);
        return Ok(());
    }

    let snapshot = cli.snapshot();
    match &snapshot {
        Some(s) => tracing::info!(
            "Answering as {} with best move {} at {:.1}%",
            s.color,
            s.best_move,
            100.0 * s.winrate
        ),
        None => tracing::info!("Answering while not playing"),
    }

    let mut session = GtpSession::new(engine, snapshot);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if let Some(response) = session.handle_line(&line) {
            stdout.write_all(response.as_bytes()).await?;
            stdout.flush().await?;
        }
        if session.is_finished() {
            break;
        }
    }

    tracing::info!("pachi-chat finished");
    Ok(())
}
