//! Two-phase connection handling
//!
//! The network layer hands each finished handshake to
//! [`ConnectionMonitor::on_connection`]. The first phase only awaits the
//! retrieval of the connection's security info and returns as soon as the
//! evaluation task is spawned, so the request itself is held up no longer
//! than that retrieval. The second phase runs the full evaluation on the
//! runtime.

use super::evaluator::{ConnectionEvaluator, Evaluation};
use crate::models::{ConnectionEvent, SecurityInfo};
use crate::utils::EvaluationError;
use std::future::Future;
use tokio::task::JoinHandle;

/// Dispatches connection events to background evaluations
#[derive(Clone)]
pub struct ConnectionMonitor {
    evaluator: ConnectionEvaluator,
}

impl ConnectionMonitor {
    pub fn new(evaluator: ConnectionEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &ConnectionEvaluator {
        &self.evaluator
    }

    /// Handle one connection event
    ///
    /// `security_info` retrieves the platform's security data for the
    /// connection; it is not polled for cached responses. Returns the
    /// handle of the spawned evaluation, or `None` if nothing was spawned.
    pub async fn on_connection<F>(
        &self,
        event: ConnectionEvent,
        security_info: F,
    ) -> Option<JoinHandle<Evaluation>>
    where
        F: Future<Output = SecurityInfo>,
    {
        if event.from_cache {
            return None;
        }

        let info = security_info.await;
        let evaluator = self.evaluator.clone();

        Some(tokio::spawn(async move {
            evaluator.check_connection(&event, &info).await
        }))
    }

    /// Wait for a spawned evaluation
    ///
    /// A task that panicked or was cancelled is reported as a failure with
    /// an unknown host.
    pub async fn join(handle: JoinHandle<Evaluation>) -> Evaluation {
        match handle.await {
            Ok(evaluation) => evaluation,
            Err(e) => Evaluation::Failed {
                host: String::new(),
                error: EvaluationError::Aborted {
                    message: e.to_string(),
                },
            },
        }
    }
}
