//! Transaction lifecycle tracker
//!
//! Drives one submission at a time through
//! `idle -> sending -> confirming -> success | error` and exposes the
//! current state for presentation. Faults from the submission or
//! confirmation services never escape [`TransactionTracker::execute`];
//! they end up as the `error` state with a message.

use super::TransactionStatus;
use crate::constants::endpoints;
use crate::error::TransactionError;
use crate::metrics::Metrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Message recorded when a fault carries no text of its own
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Recent block the confirmation is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReference {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// What the confirmation service concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Finalized,
    /// Rejected on-chain; carries the reported reason
    Failed(String),
}

/// Accepts a payload and returns its transaction signature
#[async_trait]
pub trait TransactionSubmitter<P: Send + 'static>: Send + Sync {
    async fn submit(&self, payload: P) -> Result<String, TransactionError>;
}

/// Waits for a submitted transaction to finalize
#[async_trait]
pub trait TransactionConfirmer: Send + Sync {
    /// Reference state the confirmation is measured against
    async fn latest_reference(&self) -> Result<BlockReference, TransactionError>;

    async fn confirm(
        &self,
        txid: &str,
        reference: &BlockReference,
    ) -> Result<ConfirmationOutcome, TransactionError>;
}

/// Point-in-time view of a tracker
///
/// `txid` is `None` in `idle`; `error` is `Some` exactly in `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackerSnapshot {
    pub status: TransactionStatus,
    pub txid: Option<String>,
    pub error: Option<String>,
}

/// Tracks a single in-flight transaction
///
/// The tracker does not stop a second `execute` while one is running;
/// callers hide the trigger while [`TransactionStatus::is_in_flight`].
pub struct TransactionTracker<P: Send + 'static> {
    submitter: Arc<dyn TransactionSubmitter<P>>,
    confirmer: Arc<dyn TransactionConfirmer>,
    state: watch::Sender<TrackerSnapshot>,
    /// Bumped by every `execute` and `reset`; writes from an older run are dropped
    generation: AtomicU64,
    metrics: Option<Arc<Metrics>>,
}

impl<P: Send + 'static> TransactionTracker<P> {
    /// Create a tracker in `idle`
    pub fn new(
        submitter: Arc<dyn TransactionSubmitter<P>>,
        confirmer: Arc<dyn TransactionConfirmer>,
    ) -> Self {
        let (state, _) = watch::channel(TrackerSnapshot::default());
        Self {
            submitter,
            confirmer,
            state,
            generation: AtomicU64::new(0),
            metrics: None,
        }
    }

    /// Create a tracker whose submitter and confirmer are the same service
    pub fn with_network<N>(network: Arc<N>) -> Self
    where
        N: TransactionSubmitter<P> + TransactionConfirmer + 'static,
    {
        Self::new(network.clone(), network)
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn status(&self) -> TransactionStatus {
        self.state.borrow().status
    }

    pub fn txid(&self) -> Option<String> {
        self.state.borrow().txid.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.state.borrow().clone()
    }

    /// Explorer link for the recorded signature
    pub fn explorer_url(&self) -> Option<String> {
        self.state
            .borrow()
            .txid
            .as_ref()
            .map(|txid| format!("{}/{}", endpoints::SOLSCAN_TX, txid))
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.state.subscribe()
    }

    /// Return to `idle`, clearing the signature and error
    ///
    /// A run still awaiting its collaborators keeps going, but its later
    /// state writes are discarded.
    pub fn reset(&self) {
        self.state.send_modify(|snapshot| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *snapshot = TrackerSnapshot::default();
        });
        tracing::debug!("Transaction tracker reset");
    }

    /// Submit `payload` and follow it to success or error
    ///
    /// Submission happens exactly once; confirmation is attempted only after
    /// a signature came back. The outcome is read through the accessors.
    pub async fn execute(&self, payload: P) {
        let previous = self.status();
        if previous.is_in_flight() {
            tracing::warn!(
                status = %previous,
                "execute called while a transaction is in flight"
            );
        }

        let mut generation = 0;
        self.state.send_modify(|snapshot| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *snapshot = TrackerSnapshot {
                status: TransactionStatus::Sending,
                txid: None,
                error: None,
            };
        });

        let started = Instant::now();
        tracing::info!("Sending transaction");

        let outcome = match self.run(generation, payload).await {
            Ok(txid) => {
                if self.apply(generation, TransactionStatus::Success, |_| {}) {
                    tracing::info!(
                        txid = %txid,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Transaction confirmed"
                    );
                }
                TransactionStatus::Success
            }
            Err(e) => {
                let message = if e.has_message() {
                    e.to_string()
                } else {
                    DEFAULT_ERROR_MESSAGE.to_string()
                };
                let recorded = self.apply(generation, TransactionStatus::Error, |snapshot| {
                    snapshot.error = Some(message.clone());
                });
                if recorded {
                    tracing::error!(error = %message, kind = ?e, "Transaction failed");
                }
                TransactionStatus::Error
            }
        };

        if self.is_current(generation) {
            if let Some(metrics) = &self.metrics {
                metrics.record_transaction(
                    outcome.as_str(),
                    started.elapsed().as_secs_f64() * 1000.0,
                );
            }
        } else {
            tracing::debug!(outcome = %outcome, "Tracker was reset during execution");
        }
    }

    /// Submit and confirm, returning the signature of a finalized transaction
    async fn run(&self, generation: u64, payload: P) -> Result<String, TransactionError> {
        let txid = self.submitter.submit(payload).await?;
        tracing::info!(txid = %txid, "Transaction submitted");

        self.apply(generation, TransactionStatus::Confirming, |snapshot| {
            snapshot.txid = Some(txid.clone());
        });
        tracing::debug!(txid = %txid, "Waiting for confirmation");

        let reference = self.confirmer.latest_reference().await?;
        match self.confirmer.confirm(&txid, &reference).await? {
            ConfirmationOutcome::Finalized => Ok(txid),
            ConfirmationOutcome::Failed(reason) => Err(TransactionError::NotFinalized(reason)),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Move to `status` if this run is still current and the edge is allowed
    fn apply(
        &self,
        generation: u64,
        status: TransactionStatus,
        update: impl FnOnce(&mut TrackerSnapshot),
    ) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            if !snapshot.status.can_transition_to(status) {
                tracing::warn!(
                    from = %snapshot.status,
                    to = %status,
                    "Rejected invalid transaction status transition"
                );
                return false;
            }
            snapshot.status = status;
            update(snapshot);
            true
        })
    }
}
