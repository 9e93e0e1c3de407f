use anyhow::Result;
use pachi_chat::core::engine::DEFAULT_REPLY;
use pachi_chat::core::gtp::GtpSession;
use pachi_chat::{ChatConfig, ChatEngine, LocalStorage, Move, SearchSnapshot, Stone};
use tempfile::TempDir;

async fn session_with(content: &str, snapshot: Option<SearchSnapshot>) -> Result<GtpSession<ChatConfig>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("chat.txt");
    std::fs::write(&path, content)?;

    let config = ChatConfig {
        seed: Some(1),
        ..ChatConfig::default()
    };
    let mut engine = ChatEngine::new(config);
    engine
        .init(&LocalStorage::default(), path.to_str())
        .await?;
    Ok(GtpSession::new(engine, snapshot))
}

#[tokio::test]
async fn test_kgs_chat_round_trip() -> Result<()> {
    let mut session = session_with("-1.0;2.0;pasky;^when ;Today\n", None).await?;

    assert_eq!(
        session.handle_line("5 kgs-chat game pasky when is the next game?"),
        Some("=5 Today\n\n".to_string())
    );
    assert_eq!(
        session.handle_line("kgs-chat private stranger nonsense"),
        Some(format!("= {}\n\n", DEFAULT_REPLY))
    );
    Ok(())
}

#[tokio::test]
async fn test_winrate_over_gtp() -> Result<()> {
    let snapshot = SearchSnapshot {
        color: Stone::White,
        best_move: Move::Pass,
        playouts: 100,
        machines: 1,
        threads: 1,
        winrate: 0.5,
        extra_komi: 3.0,
    };
    let mut session = session_with("", Some(snapshot)).await?;

    assert_eq!(
        session.handle_line("kgs-chat game bob winrate"),
        Some(
            "= In 100 playouts at 1 machines, W pass can win with 50.0% probability, \
             while self-imposing extra komi 3.0.\n\n"
                .to_string()
        )
    );

    session.set_snapshot(None);
    assert_eq!(
        session.handle_line("kgs-chat game bob winrate"),
        Some("= I'm winning big without playing\n\n".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_protocol_commands_and_quit() -> Result<()> {
    let mut session = session_with("-1.0;2.0; ;hi;Hello\n", None).await?;

    assert_eq!(session.handle_line(""), None);
    assert_eq!(session.handle_line("# comment"), None);
    assert_eq!(
        session.handle_line("1 protocol_version"),
        Some("=1 2\n\n".to_string())
    );
    assert_eq!(
        session.handle_line("2 known_command kgs-chat"),
        Some("=2 true\n\n".to_string())
    );
    assert_eq!(
        session.handle_line("3 genmove b"),
        Some("?3 unknown command\n\n".to_string())
    );
    assert_eq!(
        session.handle_line("4 kgs-chat game"),
        Some("?4 usage: kgs-chat (game|private) <from> <message>\n\n".to_string())
    );

    assert!(session.engine().is_loaded());
    assert_eq!(session.handle_line("quit"), Some("=\n\n".to_string()));
    assert!(session.is_finished());
    assert!(!session.engine().is_loaded());

    // after quit the table is released
    assert_eq!(
        session.handle_line("kgs-chat game bob hi"),
        Some("? unknown chat command\n\n".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_multiline_default_reply_keeps_framing() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("chat.txt");
    std::fs::write(&path, "-1.0;2.0; ;hi;Hello\n")?;

    let config = ChatConfig {
        default_reply: "Pardon?\n\nTry again.\n".to_string(),
        seed: Some(1),
        ..ChatConfig::default()
    };
    let mut engine = ChatEngine::new(config);
    engine.init(&LocalStorage::default(), path.to_str()).await?;
    let mut session = GtpSession::new(engine, None);

    let response = session.handle_line("8 kgs-chat game bob gibberish").unwrap();
    assert_eq!(response, "=8 Pardon?\nTry again.\n\n");
    assert_eq!(response.matches("\n\n").count(), 1);

    // the next command is still answered in step
    assert_eq!(
        session.handle_line("9 kgs-chat game bob hi"),
        Some("=9 Hello\n\n".to_string())
    );
    Ok(())
}
