use std::sync::Arc;

use crate::{
    config::TargetConfig,
    relay::{
        diagnostics::Diagnostic,
        dispatcher::Dispatcher,
        layout::{Layout, PatternLayout},
        record::LogRecord,
    },
};

/// Log target that forwards rendered records to chat.
///
/// `write` decides synchronously whether and where a record goes, then leaves delivery to
/// the [`Dispatcher`]. It never blocks on the network and never fails.
pub struct RelaySink {
    config: TargetConfig,
    layout: Arc<dyn Layout>,
    dispatcher: Dispatcher,
}

impl RelaySink {
    pub fn new(config: TargetConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            layout: Arc::new(PatternLayout::default()),
            dispatcher,
        }
    }

    pub fn with_layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn write(&self, record: Option<&LogRecord>) {
        let diagnostics = self.dispatcher.diagnostics();
        let Some(record) = record else {
            diagnostics.report(Diagnostic::NullRecord);
            return;
        };

        let group = self.config.group_target();
        let direct = self.config.direct_target();
        if group.is_none() && direct.is_none() {
            return;
        }

        let message = self.layout.render(record);
        if message.is_empty() {
            diagnostics.report(Diagnostic::EmptyMessage { route: None });
            return;
        }

        let pinned = match self.config.session_name() {
            Some(name) => match self.dispatcher.registry().lookup(name) {
                Some(session) if session.is_connected() => Some(session),
                _ => return,
            },
            None => None,
        };

        let message: Arc<str> = Arc::from(message);

        if let Some(target) = group {
            self.dispatcher
                .send_group(target, message.clone(), pinned.clone());
        }

        if let Some(recipient) = direct {
            let is_self = pinned
                .as_ref()
                .is_some_and(|s| s.identity() == recipient);
            if !is_self {
                self.dispatcher.send_direct(recipient, message, pinned);
            }
        }
    }
}
