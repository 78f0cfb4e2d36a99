use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::{
    domain::{GroupTarget, RecipientId, Route},
    messaging::{port::ChatSession, registry::SessionRegistry},
    relay::diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics},
    Result,
};

/// Fire-and-forget delivery of relayed messages.
///
/// Every send runs as its own task on the runtime captured at construction, so callers
/// on any thread (inside a runtime or not) return immediately.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<dyn SessionRegistry>,
    diagnostics: Arc<dyn Diagnostics>,
    runtime: Handle,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(registry: Arc<dyn SessionRegistry>, runtime: Handle) -> Self {
        Self {
            registry,
            diagnostics: Arc::new(TracingDiagnostics),
            runtime,
            tracker: TaskTracker::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn registry(&self) -> &Arc<dyn SessionRegistry> {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Arc<dyn Diagnostics> {
        &self.diagnostics
    }

    /// Deliver `message` to a group channel via `pinned`, or any connected session.
    pub fn send_group(
        &self,
        target: GroupTarget,
        message: Arc<str>,
        pinned: Option<Arc<dyn ChatSession>>,
    ) {
        let registry = self.registry.clone();
        self.spawn(Route::Group(target), message, move |message| async move {
            let Some(session) = pinned.or_else(|| registry.find_connected(&|_| true)) else {
                return Ok(());
            };
            session.send_group_message(target, &message).await
        });
    }

    /// Deliver `message` to one recipient via `pinned`, or any connected session that
    /// is not the recipient itself.
    pub fn send_direct(
        &self,
        recipient: RecipientId,
        message: Arc<str>,
        pinned: Option<Arc<dyn ChatSession>>,
    ) {
        let registry = self.registry.clone();
        self.spawn(Route::Direct(recipient), message, move |message| async move {
            let Some(session) =
                pinned.or_else(|| registry.find_connected(&|s| s.identity() != recipient))
            else {
                return Ok(());
            };
            session.send_direct_message(recipient, &message).await
        });
    }

    /// Wait for every delivery scheduled so far. Never called on the logging path.
    pub async fn flush(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn spawn<F, Fut>(&self, route: Route, message: Arc<str>, deliver: F)
    where
        F: FnOnce(Arc<str>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let diagnostics = self.diagnostics.clone();
        if message.is_empty() {
            diagnostics.report(Diagnostic::EmptyMessage { route: Some(route) });
            return;
        }

        let delivery = self.runtime.spawn(deliver(message));
        // Second task observes the first so a panicking transport is diagnosed, not just dropped.
        self.runtime.spawn(self.tracker.track_future(async move {
            match delivery.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => diagnostics.report(Diagnostic::SendFailed {
                    route,
                    error: e.to_string(),
                }),
                Err(join) if join.is_panic() => {
                    diagnostics.report(Diagnostic::SendPanicked { route })
                }
                Err(_) => {}
            }
        }));
    }
}
