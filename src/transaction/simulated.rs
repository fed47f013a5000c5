//! Simulated network for demos
//!
//! Stands in for a wallet and RPC node: submission waits, then hands back a
//! fixed fake signature; confirmation waits, then fails at random with
//! probability `failure_rate`.

use super::{BlockReference, ConfirmationOutcome, TransactionConfirmer, TransactionSubmitter};
use crate::config::SimulationConfig;
use crate::error::TransactionError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Signature returned by every simulated submission
pub const SIMULATED_SIGNATURE: &str = "5y5tC6jC2f7g2gK8d...FAKE_SIGNATURE...gHjJkL9mNn2pQrS";

/// Message of a simulated confirmation failure
pub const SIMULATED_FAILURE: &str = "Simulation: Transaction not confirmed by the network.";

#[derive(Debug, Clone)]
pub struct SimulatedNetwork {
    send_delay: Duration,
    confirm_delay: Duration,
    /// Clamped to [0, 1]
    failure_rate: f64,
}

impl SimulatedNetwork {
    pub fn new(send_delay: Duration, confirm_delay: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            send_delay,
            confirm_delay,
            failure_rate,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            Duration::from_millis(config.send_delay_ms),
            Duration::from_millis(config.confirm_delay_ms),
            config.failure_rate,
        )
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl Default for SimulatedNetwork {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[async_trait]
impl<P: Send + 'static> TransactionSubmitter<P> for SimulatedNetwork {
    async fn submit(&self, _payload: P) -> Result<String, TransactionError> {
        tracing::debug!(delay_ms = self.send_delay.as_millis() as u64, "Simulating submission");
        tokio::time::sleep(self.send_delay).await;
        Ok(SIMULATED_SIGNATURE.to_string())
    }
}

#[async_trait]
impl TransactionConfirmer for SimulatedNetwork {
    async fn latest_reference(&self) -> Result<BlockReference, TransactionError> {
        Ok(BlockReference {
            blockhash: "11111111111111111111111111111111".to_string(),
            last_valid_block_height: 0,
        })
    }

    async fn confirm(
        &self,
        txid: &str,
        _reference: &BlockReference,
    ) -> Result<ConfirmationOutcome, TransactionError> {
        tokio::time::sleep(self.confirm_delay).await;

        let should_fail = rand::thread_rng().gen_bool(self.failure_rate);
        if should_fail {
            tracing::debug!(txid = txid, "Simulated confirmation failure");
            return Err(TransactionError::Confirmation(SIMULATED_FAILURE.to_string()));
        }
        Ok(ConfirmationOutcome::Finalized)
    }
}
