use crate::domain::Route;

/// Target of the relay's own log lines. The relay layer never forwards events with this target.
pub const DIAGNOSTICS_TARGET: &str = "logrelay::diagnostics";

/// Non-fatal conditions inside the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The sink was handed no record.
    NullRecord,
    /// Nothing to send after rendering; `route` is set when a delivery task saw it.
    EmptyMessage { route: Option<Route> },
    SendFailed { route: Route, error: String },
    /// A session's send panicked; the panic was contained in its delivery task.
    SendPanicked { route: Route },
}

/// Internal diagnostics channel.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Reports through `tracing` under [`DIAGNOSTICS_TARGET`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::NullRecord => {
                tracing::warn!(target: DIAGNOSTICS_TARGET, "log record was null");
            }
            Diagnostic::EmptyMessage { route: None } => {
                tracing::debug!(target: DIAGNOSTICS_TARGET, "rendered message is empty");
            }
            Diagnostic::EmptyMessage { route: Some(route) } => {
                tracing::warn!(target: DIAGNOSTICS_TARGET, %route, "refusing to send empty message");
            }
            Diagnostic::SendFailed { route, error } => {
                tracing::warn!(target: DIAGNOSTICS_TARGET, %route, %error, "chat delivery failed");
            }
            Diagnostic::SendPanicked { route } => {
                tracing::error!(target: DIAGNOSTICS_TARGET, %route, "chat delivery panicked");
            }
        }
    }
}
