//! Shutdown coordination.
//!
//! # State Machine
//! ```text
//! Running ──terminate──▶ Draining ──drain + stop done──▶ Finished
//!                           │
//!                           └──stop_timeout elapsed────▶ TimedOut
//! ```
//!
//! On entering `Draining` two tasks are spawned side by side:
//! - the HTTP listener drain, handed its own deadline (`drain_timeout`)
//! - `stop()` on every lifecycle component
//!
//! The orchestrator waits for the first of "both tasks done" or
//! `stop_timeout`. The two timers are independent. Work still running at
//! `TimedOut` is abandoned, not cancelled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::ShutdownConfig;
use crate::lifecycle::component::Component;

/// Terminate trigger shared between the signal listener and the orchestrator.
///
/// Backed by a watch channel, so a trigger fired before anyone waits is
/// still observed.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the terminate flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Fire the terminate event. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the terminate event has fired.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let closed = rx.wait_for(|triggered| *triggered).await.is_err();
            // Every sender dropped without a trigger: shutdown can no longer be requested.
            if closed {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Draining,
    Finished,
    TimedOut,
}

impl ShutdownState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ShutdownState::Finished | ShutdownState::TimedOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShutdownState::Running => "running",
            ShutdownState::Draining => "draining",
            ShutdownState::Finished => "finished",
            ShutdownState::TimedOut => "timed_out",
        }
    }
}

/// Something that stops accepting connections and finishes in-flight work,
/// force-closing whatever is left once `deadline` passes.
pub trait Drain: Send + 'static {
    fn drain(self, deadline: Duration) -> impl Future<Output = ()> + Send;
}

/// Races HTTP drain and component teardown against a fixed ceiling.
pub struct ShutdownOrchestrator {
    drain_timeout: Duration,
    stop_timeout: Duration,
    state: watch::Sender<ShutdownState>,
}

impl ShutdownOrchestrator {
    pub fn new(drain_timeout: Duration, stop_timeout: Duration) -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self {
            drain_timeout,
            stop_timeout,
            state,
        }
    }

    pub fn from_config(config: &ShutdownConfig) -> Self {
        Self::new(
            Duration::from_secs(config.drain_timeout_secs),
            Duration::from_secs(config.stop_timeout_secs),
        )
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// Wait for `terminate`, then shut down.
    pub async fn run<F, D>(
        &self,
        terminate: F,
        http: D,
        components: Vec<Arc<dyn Component>>,
    ) -> ShutdownState
    where
        F: Future<Output = ()>,
        D: Drain,
    {
        terminate.await;
        tracing::info!("Terminate signal received");
        self.shutdown(http, components).await
    }

    /// Enter `Draining` immediately and return the terminal state.
    pub async fn shutdown<D: Drain>(
        &self,
        http: D,
        components: Vec<Arc<dyn Component>>,
    ) -> ShutdownState {
        self.state.send_replace(ShutdownState::Draining);
        let started = Instant::now();

        tracing::info!(
            drain_timeout_ms = self.drain_timeout.as_millis() as u64,
            stop_timeout_ms = self.stop_timeout.as_millis() as u64,
            components = components.len(),
            "Shutting down"
        );

        let drain = tokio::spawn(http.drain(self.drain_timeout));
        let teardown = tokio::spawn(stop_components(components));

        let outcome = tokio::select! {
            (drained, stopped) = async { tokio::join!(drain, teardown) } => {
                if let Err(e) = drained {
                    tracing::error!(error = %e, "HTTP drain task failed");
                }
                if let Err(e) = stopped {
                    tracing::error!(error = %e, "Component teardown task failed");
                }
                ShutdownState::Finished
            }
            _ = tokio::time::sleep(self.stop_timeout) => {
                tracing::warn!(
                    stop_timeout_ms = self.stop_timeout.as_millis() as u64,
                    "Shutdown deadline reached, abandoning remaining teardown"
                );
                ShutdownState::TimedOut
            }
        };

        self.state.send_replace(outcome);
        tracing::info!(
            outcome = outcome.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Shutdown complete"
        );
        outcome
    }
}

/// Stop every component concurrently. Failures are logged and swallowed.
async fn stop_components(components: Vec<Arc<dyn Component>>) {
    let stops = components.iter().map(|component| async move {
        match component.stop().await {
            Ok(()) => tracing::info!(component = component.name(), "Component stopped"),
            Err(e) => tracing::warn!(
                component = component.name(),
                error = %e,
                "Component stop failed"
            ),
        }
    });
    join_all(stops).await;
}
