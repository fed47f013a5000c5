//! Transaction status - the states a tracked submission moves through

use serde::{Deserialize, Serialize};

/// Transaction status representing the state machine
///
/// State transitions:
/// ```text
/// IDLE -> SENDING -> CONFIRMING -> SUCCESS
///            |           |
///            v           v
///          ERROR <-------+
///
/// any state -> IDLE (explicit reset only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the submission service to return a signature
    Sending,
    /// Signature recorded, waiting for finality
    Confirming,
    /// Confirmed without error
    Success,
    /// Submission or confirmation failed
    Error,
}

impl TransactionStatus {
    /// Check if transition to new status is valid
    pub fn can_transition_to(&self, new_status: TransactionStatus) -> bool {
        use TransactionStatus::*;

        matches!(
            (self, new_status),
            // Forward flow
            (Idle, Sending)
                | (Sending, Confirming)
                | (Confirming, Success)
                // Failure flow
                | (Sending, Error)
                | (Confirming, Error)
                // Reset
                | (_, Idle)
        )
    }

    /// Success and error stay put until reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Error)
    }

    /// An external call is outstanding; the trigger control should be hidden
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Sending | TransactionStatus::Confirming
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Idle => "idle",
            TransactionStatus::Sending => "sending",
            TransactionStatus::Confirming => "confirming",
            TransactionStatus::Success => "success",
            TransactionStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Idle => write!(f, "IDLE"),
            TransactionStatus::Sending => write!(f, "SENDING"),
            TransactionStatus::Confirming => write!(f, "CONFIRMING"),
            TransactionStatus::Success => write!(f, "SUCCESS"),
            TransactionStatus::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IDLE" => Ok(TransactionStatus::Idle),
            "SENDING" => Ok(TransactionStatus::Sending),
            "CONFIRMING" => Ok(TransactionStatus::Confirming),
            "SUCCESS" => Ok(TransactionStatus::Success),
            "ERROR" => Ok(TransactionStatus::Error),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}
