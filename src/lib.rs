//! solkit
//!
//! Core logic behind a catalog of Solana UI widgets: the transaction
//! lifecycle tracker, token trust classification, and the TTL cache that
//! memoizes metadata lookups.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod token;
pub mod transaction;

// Re-export commonly used types for tests
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use config::AppConfig;
pub use error::{AppError, AppResult, TransactionError};
pub use metrics::Metrics;
pub use token::{FavoritesStore, TokenDescriptor, TrustClassifier, TrustLevel, TrustLists};
pub use transaction::{TransactionSettings, TransactionStatus, TransactionTracker};
