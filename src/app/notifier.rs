//! The report notifier: lifecycle, background loops, and triggers.
//!
//! One instance owns two periodic loops (performance report, status
//! snapshot) and a single-consumer drain worker feeding the outbound
//! message sink. Public triggers are safe to call from any thread: they
//! either enqueue onto the chunk queue or run against thread-safe ports,
//! never mutating worker state directly.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::app::aggregator::ReportAggregator;
use crate::app::batcher::chunk_lines;
use crate::app::checks::StatusChecks;
use crate::app::scheduler::{spawn_periodic, PeriodicTask};
use crate::config::{Config, ReportingConfig, StrategyConfig};
use crate::domain::state::NotifierState;
use crate::error::Result;
use crate::port::outbound::balances::BalanceRegistry;
use crate::port::outbound::connector::Connector;
use crate::port::outbound::performance::PerformanceEngine;
use crate::port::outbound::sink::MessageSink;
use crate::port::outbound::snapshot::{ReportRecord, SnapshotStore};
use crate::port::outbound::status::{ConnectionCheck, SecurityGate, StrategyStatus};
use crate::port::outbound::trades::TradeSource;

/// Everything the notifier reaches through ports, grouped so the
/// constructor stays readable.
pub struct NotifierDeps {
    pub trades: Arc<dyn TradeSource>,
    pub store: Arc<dyn SnapshotStore>,
    pub engine: Arc<dyn PerformanceEngine>,
    pub sink: Arc<dyn MessageSink>,
    pub balances: BalanceRegistry,
    pub markets: Vec<Arc<dyn Connector>>,
    pub security: Arc<dyn SecurityGate>,
    pub connections: Arc<dyn ConnectionCheck>,
    /// Present once a strategy is running; switches the status tick from
    /// preliminary checks to formatted strategy status.
    pub strategy_status: Option<Arc<dyn StrategyStatus>>,
}

pub struct ReportNotifier {
    strategy: Option<StrategyConfig>,
    reporting: ReportingConfig,
    trades: Arc<dyn TradeSource>,
    store: Arc<dyn SnapshotStore>,
    sink: Arc<dyn MessageSink>,
    aggregator: ReportAggregator,
    strategy_status: Option<Arc<dyn StrategyStatus>>,
    checks: StatusChecks,

    state: Mutex<NotifierState>,
    queue_tx: mpsc::UnboundedSender<String>,
    /// Held until `start()` hands it to the drain worker.
    queue_rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    tasks: Mutex<Vec<PeriodicTask>>,
    drain: Mutex<Option<DrainWorker>>,
    /// Fallback report window start when no lookback is configured.
    init_time_ms: i64,
}

impl ReportNotifier {
    #[must_use]
    pub fn new(config: &Config, deps: NotifierDeps) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        let strategy_key = config
            .strategy
            .as_ref()
            .map(|s| (s.name.clone(), s.config_path.clone()));
        let checks = StatusChecks::new(
            strategy_key,
            deps.security,
            deps.connections,
            deps.markets,
        );
        let aggregator = ReportAggregator::new(
            deps.balances,
            deps.engine,
            config.reporting.derivatives.iter().cloned(),
        );

        Self {
            strategy: config.strategy.clone(),
            reporting: config.reporting.clone(),
            trades: deps.trades,
            store: deps.store,
            sink: deps.sink,
            aggregator,
            strategy_status: deps.strategy_status,
            checks,
            state: Mutex::new(NotifierState::Idle),
            queue_tx,
            queue_rx: Mutex::new(Some(queue_rx)),
            tasks: Mutex::new(Vec::new()),
            drain: Mutex::new(None),
            init_time_ms: Utc::now().timestamp_millis(),
        }
    }

    #[must_use]
    pub fn state(&self) -> NotifierState {
        *self.state.lock()
    }

    /// Launch the background loops. A no-op when already running; a
    /// stopped instance stays stopped.
    pub fn start(self: &Arc<Self>) {
        {
            let mut state = self.state.lock();
            match *state {
                NotifierState::Running => {
                    debug!("Notifier already running");
                    return;
                }
                NotifierState::Stopped => {
                    warn!("Stopped notifier cannot be restarted");
                    return;
                }
                NotifierState::Idle => *state = NotifierState::Running,
            }
        }
        info!("Report notifier starting");

        let report_task = {
            let this = Arc::clone(self);
            spawn_periodic(
                "report",
                Duration::from_secs(self.reporting.report_interval_secs),
                move || {
                    let this = Arc::clone(&this);
                    async move {
                        this.report_once(this.reporting.lookback_days, this.reporting.precision)
                            .await
                    }
                },
            )
        };
        let status_task = {
            let this = Arc::clone(self);
            spawn_periodic(
                "status",
                Duration::from_secs(self.reporting.status_interval_secs),
                move || {
                    let this = Arc::clone(&this);
                    async move {
                        this.status_once().await;
                        Ok(())
                    }
                },
            )
        };
        self.tasks.lock().extend([report_task, status_task]);

        if let Some(queue_rx) = self.queue_rx.lock().take() {
            *self.drain.lock() = Some(spawn_drain(
                queue_rx,
                Arc::clone(&self.sink),
                Duration::from_secs(self.reporting.drain_delay_secs),
            ));
        }
    }

    /// Cancel the background loops cooperatively and enter the terminal
    /// `Stopped` state. A tick or delivery already in progress finishes
    /// its unit of work first. A no-op unless running.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock();
            if !state.is_running() {
                debug!("Notifier not running, nothing to stop");
                return;
            }
            *state = NotifierState::Stopped;
        }

        let tasks: Vec<PeriodicTask> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            task.shutdown().await;
        }
        let drain = self.drain.lock().take();
        if let Some(worker) = drain {
            worker.shutdown().await;
        }
        info!("Report notifier stopped");
    }

    /// Queue a freeform status message for chunked delivery to the sink.
    /// Empty messages are ignored. Safe from any thread.
    pub fn submit(&self, msg: &str) {
        if msg.is_empty() {
            return;
        }
        for chunk in chunk_lines(msg, self.reporting.chunk_max_lines) {
            if self.queue_tx.send(chunk).is_err() {
                warn!("Status queue closed, dropping message");
                return;
            }
        }
    }

    /// Persist a status snapshot through the singleton key.
    ///
    /// # Errors
    /// Returns the store error; callers inside background tasks log it.
    pub async fn persist_status(&self, status: &str) -> Result<()> {
        self.store
            .upsert_status(status, Utc::now().timestamp_millis())
            .await
    }

    /// One report cycle: pull the window's fills, aggregate, persist.
    ///
    /// `days` selects the lookback window; 0 means "since this notifier
    /// was created". An empty window or missing strategy is a logged
    /// no-op, not an error.
    ///
    /// # Errors
    /// Returns trade-source, serialization, or store errors; the periodic
    /// loop logs and swallows them.
    pub async fn report_once(&self, days: f64, precision: Option<u32>) -> Result<()> {
        let Some(strategy) = &self.strategy else {
            debug!("No strategy imported, skipping report");
            return Ok(());
        };

        let start_ms = if days > 0.0 {
            Utc::now().timestamp_millis() - (days * 86_400_000.0) as i64
        } else {
            self.init_time_ms
        };

        let fills = self
            .trades
            .fills_since(&strategy.config_path, start_ms)
            .await?;
        let Some(report) = self.aggregator.aggregate(start_ms / 1000, &fills).await else {
            debug!("No past trades to report");
            return Ok(());
        };

        let record = ReportRecord {
            config_path: strategy.config_path.clone(),
            strategy: strategy.name.clone(),
            payload: report.to_payload(precision)?,
            timestamp_ms: Utc::now().timestamp_millis(),
        };
        self.store.upsert_report(&record).await?;

        info!(
            config_path = %strategy.config_path,
            sections = report.sections.len(),
            "Report snapshot persisted"
        );
        Ok(())
    }

    /// One status cycle. With a running strategy, its formatted status is
    /// both queued for delivery and persisted; otherwise the preliminary
    /// checks run and their diagnostic lines are queued. Returns the
    /// all-checks-passed flag.
    pub async fn status_once(&self) -> bool {
        if let Some(status) = &self.strategy_status {
            match status.format_status().await {
                Ok(text) => {
                    self.submit(&text);
                    if let Err(e) = self.persist_status(&text).await {
                        error!(error = %e, "Failed to persist status snapshot");
                    }
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Strategy status unavailable");
                    false
                }
            }
        } else {
            let outcome = self.checks.run().await;
            for line in &outcome.lines {
                self.submit(line);
            }
            outcome.passed
        }
    }

    #[cfg(test)]
    fn background_task_count(&self) -> usize {
        self.tasks.lock().len()
    }
}

/// Single consumer pulling chunks off the queue, one per `delay`.
struct DrainWorker {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl DrainWorker {
    async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}

fn spawn_drain(
    mut queue: mpsc::UnboundedReceiver<String>,
    sink: Arc<dyn MessageSink>,
    delay: Duration,
) -> DrainWorker {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let handle = tokio::spawn(async move {
        info!("Status drain started");
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                chunk = queue.recv() => {
                    let Some(chunk) = chunk else { break };
                    if !chunk.is_empty() {
                        if let Err(e) = sink.deliver(&chunk).await {
                            error!(error = %e, "Failed to deliver status chunk");
                        }
                    }
                    // Throttle outbound sends independent of producer speed.
                    tokio::select! {
                        _ = shutdown_rx.recv() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
        info!("Status drain stopped");
    });

    DrainWorker {
        shutdown_tx,
        handle,
    }
}
