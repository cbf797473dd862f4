//! Debounced explanation trigger with stale-response suppression.
//!
//! Listens to position changes, waits for the timeline to settle, then
//! fires exactly one provider request per settled position. Responses are
//! asynchronous with real latency; any response whose request key no
//! longer matches the currently settled position is dropped. Provider
//! failures degrade to an `Unavailable` event and never block playback.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::explain::provider::{ExplainRequest, ExplanationProvider};
use crate::playback::scheduler::PlaybackEvent;
use crate::trace::step::AlgorithmFamily;

/// Stable identity of one explanation request
pub type RequestKey = (AlgorithmFamily, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationEvent {
    Ready { key: RequestKey, text: String },
    Unavailable { key: RequestKey },
}

struct PendingRequest {
    key: RequestKey,
    request: ExplainRequest,
    settle_at: Instant,
}

pub struct ExplanationTrigger {
    worker: JoinHandle<()>,
}

impl ExplanationTrigger {
    /// Attach to a playback subscription. Returns the trigger handle and
    /// the channel of settled explanation outcomes.
    pub fn spawn(
        provider: Arc<dyn ExplanationProvider>,
        positions: mpsc::UnboundedReceiver<PlaybackEvent>,
        settle: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ExplanationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(provider, positions, settle, tx));
        (Self { worker }, rx)
    }
}

impl Drop for ExplanationTrigger {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    provider: Arc<dyn ExplanationProvider>,
    mut positions: mpsc::UnboundedReceiver<PlaybackEvent>,
    settle: Duration,
    tx: mpsc::UnboundedSender<ExplanationEvent>,
) {
    // Key of the most recently settled position, shared with in-flight
    // response tasks for staleness checks
    let settled: Arc<Mutex<Option<RequestKey>>> = Arc::new(Mutex::new(None));
    let mut pending: Option<PendingRequest> = None;

    loop {
        let settle_deadline = pending
            .as_ref()
            .map(|p| p.settle_at)
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            event = positions.recv() => {
                match event {
                    Some(PlaybackEvent::PositionChanged { run, index, .. }) => {
                        let Some(step) = run.steps.get(index) else {
                            continue;
                        };
                        // Restart the settle window on every change
                        pending = Some(PendingRequest {
                            key: (run.family, index),
                            request: ExplainRequest {
                                family: run.family,
                                step_index: index,
                                state: step.state.clone(),
                                source_code_lines: Vec::new(),
                            },
                            settle_at: Instant::now() + settle,
                        });
                    }
                    None => break,
                }
            }
            _ = tokio::time::sleep_until(settle_deadline), if pending.is_some() => {
                let Some(p) = pending.take() else {
                    continue;
                };
                *settled.lock() = Some(p.key);
                dispatch(provider.clone(), p.key, p.request, settled.clone(), tx.clone());
            }
        }
    }
}

fn dispatch(
    provider: Arc<dyn ExplanationProvider>,
    key: RequestKey,
    request: ExplainRequest,
    settled: Arc<Mutex<Option<RequestKey>>>,
    tx: mpsc::UnboundedSender<ExplanationEvent>,
) {
    // No true cancellation of an in-flight call, only response-side
    // suppression once the key is stale
    tokio::spawn(async move {
        let outcome = provider.explain(request).await;
        if *settled.lock() != Some(key) {
            tracing::debug!(family = %key.0, step = key.1, "dropping stale explanation response");
            return;
        }
        let event = match outcome {
            Ok(text) => ExplanationEvent::Ready { key, text },
            Err(err) => {
                tracing::warn!(family = %key.0, step = key.1, error = %err, "explanation unavailable");
                ExplanationEvent::Unavailable { key }
            }
        };
        let _ = tx.send(event);
    });
}
