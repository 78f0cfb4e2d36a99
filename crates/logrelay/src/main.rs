use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;

use logrelay_core::{
    config::RelayConfig,
    logging,
    messaging::registry::SessionMap,
    relay::{ChatRelayLayer, Dispatcher, PatternLayout, RelaySink},
};
use logrelay_telegram::TelegramSession;

/// Relays every stdin line to the configured chats (and echoes it to the console).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = RelayConfig::load()?;
    let layout = Arc::new(PatternLayout::parse(&cfg.layout)?);

    let sessions = Arc::new(SessionMap::new());
    let dispatcher = Dispatcher::new(sessions.clone(), Handle::current());
    let sink = Arc::new(RelaySink::new(cfg.targets.clone(), dispatcher.clone()).with_layout(layout));
    logging::init("logrelay", Some(ChatRelayLayer::new(sink)), cfg.level)?;
    if !cfg.targets.is_active() {
        tracing::warn!("no LOG_RELAY_* destination configured; nothing will reach chat");
    }

    for account in &cfg.bots {
        let session = Arc::new(TelegramSession::from_token(account.token.clone()));
        if let Err(e) = session.connect().await {
            // Stays registered; the relay skips disconnected sessions.
            tracing::warn!(bot = %account.name, error = %e, "telegram session failed to connect");
        }
        sessions.insert(account.name.clone(), session);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        tracing::info!(target: "stdin", "{line}");
    }

    dispatcher.flush().await;
    Ok(())
}
