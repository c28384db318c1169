use super::client::{BackendClient, SearchClient};
use super::policy::{ForwardTargets, should_forward};
use super::{ForwardError, ForwardRecord};
use crate::config::ForwardingConfig;
use crate::domain::{Payload, Severity};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
pub struct ForwardStats {
    queued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardStatsSnapshot {
    pub queued: u64,
    pub delivered: u64,
    pub failed: u64,
}

impl ForwardStatsSnapshot {
    /// Records queued but not yet delivered or failed.
    pub fn pending(&self) -> u64 {
        self.queued.saturating_sub(self.delivered + self.failed)
    }
}

impl ForwardStats {
    fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ForwardStatsSnapshot {
        ForwardStatsSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Fire-and-forget pusher of [`ForwardRecord`]s.
///
/// Records go through an unbounded channel to a dedicated thread running a
/// current-thread tokio runtime; each record is delivered by its own task
/// under `timeout`. Dropping the forwarder closes the channel and lets
/// in-flight deliveries finish on that thread.
pub struct Forwarder {
    targets: ForwardTargets,
    redact_forwarded: bool,
    tx: mpsc::UnboundedSender<ForwardRecord>,
    stats: Arc<ForwardStats>,
}

impl Forwarder {
    pub fn new(config: &ForwardingConfig) -> Result<Self, ForwardError> {
        let client = SearchClient::new(config)?;
        Self::with_client(config, Arc::new(client))
    }

    /// Build a forwarder around any backend client.
    pub fn with_client(
        config: &ForwardingConfig,
        client: Arc<dyn BackendClient>,
    ) -> Result<Self, ForwardError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(ForwardStats::default());
        spawn_delivery_thread(rx, client, config.timeout, Arc::clone(&stats))?;

        Ok(Self {
            targets: config.targets.clone(),
            redact_forwarded: config.redact_forwarded,
            tx,
            stats,
        })
    }

    pub fn targets(&self) -> &ForwardTargets {
        &self.targets
    }

    pub fn redacts_forwarded(&self) -> bool {
        self.redact_forwarded
    }

    /// Evaluate the policy for one content item and queue it when it passes.
    ///
    /// `raw` is forwarded unless the forwarder was configured to redact, in
    /// which case `sanitized` is. Returns whether a record was queued.
    pub fn forward(
        &self,
        severity: Severity,
        raw: &Payload,
        sanitized: &Payload,
        force: bool,
    ) -> bool {
        if !should_forward(severity, Some(&self.targets), force) {
            return false;
        }
        let content = if self.redact_forwarded { sanitized } else { raw };
        self.enqueue(ForwardRecord::new(severity, content))
    }

    fn enqueue(&self, record: ForwardRecord) -> bool {
        self.stats.record_queued();
        match self.tx.send(record) {
            Ok(()) => true,
            Err(mpsc::error::SendError(record)) => {
                self.stats.record_failed();
                warn!(index = %record.index, "Forwarder thread is gone, dropping record");
                false
            }
        }
    }

    pub fn stats(&self) -> ForwardStatsSnapshot {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("targets", &self.targets)
            .field("redact_forwarded", &self.redact_forwarded)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

fn spawn_delivery_thread(
    rx: mpsc::UnboundedReceiver<ForwardRecord>,
    client: Arc<dyn BackendClient>,
    timeout: Duration,
    stats: Arc<ForwardStats>,
) -> Result<(), ForwardError> {
    let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<Result<(), String>>(1);

    std::thread::Builder::new()
        .name("rask-log-forwarder".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));
            runtime.block_on(drain(rx, client, timeout, stats));
            debug!("Forwarder thread stopped");
        })
        .map_err(|e| ForwardError::Runtime(format!("Failed to spawn forwarder thread: {e}")))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ForwardError::Runtime(format!(
            "Failed to build forwarder runtime: {e}"
        ))),
        Err(_) => Err(ForwardError::Runtime(
            "Forwarder thread exited during startup".to_string(),
        )),
    }
}

async fn drain(
    mut rx: mpsc::UnboundedReceiver<ForwardRecord>,
    client: Arc<dyn BackendClient>,
    timeout: Duration,
    stats: Arc<ForwardStats>,
) {
    let mut inflight = JoinSet::new();

    while let Some(record) = rx.recv().await {
        let client = Arc::clone(&client);
        let stats = Arc::clone(&stats);
        inflight.spawn(async move { deliver(client.as_ref(), record, timeout, &stats).await });

        // Reap finished deliveries so the set does not grow unbounded
        while let Some(result) = inflight.try_join_next() {
            if let Err(e) = result {
                error!("Forward task panicked: {e}");
            }
        }
    }

    while let Some(result) = inflight.join_next().await {
        if let Err(e) = result {
            error!("Forward task panicked: {e}");
        }
    }
}

/// Deliver one record; failures are counted and reported, never returned.
pub(crate) async fn deliver(
    client: &dyn BackendClient,
    record: ForwardRecord,
    timeout: Duration,
    stats: &ForwardStats,
) {
    let index = record.index.clone();
    let outcome = match tokio::time::timeout(timeout, client.index(record)).await {
        Ok(result) => result,
        Err(_) => Err(ForwardError::Timeout(timeout)),
    };

    match outcome {
        Ok(()) => {
            stats.record_delivered();
            debug!(index = %index, "Forwarded log record");
        }
        Err(e) => {
            stats.record_failed();
            warn!(index = %index, error = %e, "Failed to forward log record");
        }
    }
}
