use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::{errors::Error, relay::ChatRelayLayer, relay::DIAGNOSTICS_TARGET, Result};

/// Targets never relayed to chat: the HTTP/TLS stacks chat transports run on. Relaying
/// them would let every delivery log a record that is delivered again.
pub const MUTED_TARGETS: &[&str] = &[
    DIAGNOSTICS_TARGET,
    "h2",
    "hyper",
    "hyper_util",
    "reqwest",
    "rustls",
    "teloxide",
    "teloxide_core",
];

/// Initialize logging for a service.
///
/// Console output is filtered by `RUST_LOG` (default: info). When `relay` is given it is
/// installed next to the console layer with its own filter, see [`relay_filter`].
pub fn init(service_name: &str, relay: Option<ChatRelayLayer>, relay_level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,logrelay=info,logrelay_core=info,{service_name}=info"
        ))
    });

    let console = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .with_filter(filter);
    let relay = relay.map(|layer| layer.with_filter(relay_filter(relay_level)));

    tracing_subscriber::registry()
        .with(console)
        .with(relay)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))
}

/// Filter for the relay layer: `level` and above, minus [`MUTED_TARGETS`].
pub fn relay_filter(level: Level) -> Targets {
    MUTED_TARGETS.iter().fold(
        Targets::new().with_default(LevelFilter::from_level(level)),
        |targets, muted| targets.with_target(*muted, LevelFilter::OFF),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_filter_applies_level() {
        let f = relay_filter(Level::WARN);
        assert!(f.would_enable("app::jobs", &Level::ERROR));
        assert!(f.would_enable("app::jobs", &Level::WARN));
        assert!(!f.would_enable("app::jobs", &Level::INFO));
    }

    #[test]
    fn relay_filter_mutes_transport_and_diagnostics() {
        let f = relay_filter(Level::TRACE);
        assert!(!f.would_enable("hyper::client::pool", &Level::ERROR));
        assert!(!f.would_enable("teloxide_core::requests", &Level::ERROR));
        assert!(!f.would_enable(DIAGNOSTICS_TARGET, &Level::ERROR));
        assert!(f.would_enable("stdin", &Level::TRACE));
    }
}
