//! Log-to-chat relay: gating and routing records, then fire-and-forget delivery.

pub mod diagnostics;
pub mod dispatcher;
pub mod layer;
pub mod layout;
pub mod record;
pub mod sink;

pub use diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics, DIAGNOSTICS_TARGET};
pub use dispatcher::Dispatcher;
pub use layer::ChatRelayLayer;
pub use layout::{Layout, PatternLayout};
pub use record::LogRecord;
pub use sink::RelaySink;
