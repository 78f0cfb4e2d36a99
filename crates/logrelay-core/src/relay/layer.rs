use std::sync::Arc;

use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

use crate::relay::{diagnostics::DIAGNOSTICS_TARGET, record::LogRecord, sink::RelaySink};

/// `tracing-subscriber` layer feeding every event into a [`RelaySink`].
///
/// It observes events without filtering them, so the other layers of the subscriber
/// (console output, files) keep receiving everything.
#[derive(Clone)]
pub struct ChatRelayLayer {
    sink: Arc<RelaySink>,
}

impl ChatRelayLayer {
    pub fn new(sink: Arc<RelaySink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<RelaySink> {
        &self.sink
    }
}

impl<S: Subscriber> Layer<S> for ChatRelayLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Our own diagnostics must not be relayed (delivery failures would feed back into delivery).
        if event.metadata().target() == DIAGNOSTICS_TARGET {
            return;
        }
        let record = LogRecord::from_event(event);
        self.sink.write(Some(&record));
    }
}
