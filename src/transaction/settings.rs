//! Priority fee and slippage settings
//!
//! Backs the fee-calculator popover: preset buttons plus free-form inputs.
//! Invalid input leaves the current value untouched.

use crate::config::TransactionConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 0.1%, 0.5%, 1%
pub const SLIPPAGE_PRESETS_BPS: [u16; 3] = [10, 50, 100];
/// Low, medium, high (micro-lamports)
pub const PRIORITY_FEE_PRESETS: [u64; 3] = [10_000, 50_000, 100_000];

/// Slippage cannot exceed 100%
pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub fn fee(&self) -> u64 {
        match self {
            PriorityLevel::Low => PRIORITY_FEE_PRESETS[0],
            PriorityLevel::Medium => PRIORITY_FEE_PRESETS[1],
            PriorityLevel::High => PRIORITY_FEE_PRESETS[2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSettings {
    /// Micro-lamports per compute unit
    pub priority_fee: u64,
    pub slippage_bps: u16,
}

impl TransactionSettings {
    pub fn from_config(config: &TransactionConfig) -> Self {
        Self {
            priority_fee: config.priority_fee,
            slippage_bps: config.slippage_bps.min(MAX_SLIPPAGE_BPS),
        }
    }

    /// Slippage as a percentage, e.g. 50 bps -> 0.5
    pub fn slippage_percent(&self) -> f64 {
        self.slippage_bps as f64 / 100.0
    }

    /// `0.5%` style rendering
    pub fn slippage_display(&self) -> String {
        format!("{}%", self.slippage_percent())
    }

    /// Which preset the current fee matches, if any
    pub fn priority_level(&self) -> Option<PriorityLevel> {
        [PriorityLevel::Low, PriorityLevel::Medium, PriorityLevel::High]
            .into_iter()
            .find(|level| level.fee() == self.priority_fee)
    }

    pub fn set_priority_level(&mut self, level: PriorityLevel) {
        self.priority_fee = level.fee();
    }

    /// Apply a slippage typed as a percentage ("0.5" -> 50 bps)
    pub fn set_slippage_percent(&mut self, input: &str) -> AppResult<u16> {
        let bps = parse_slippage_percent(input)?;
        self.slippage_bps = bps;
        Ok(bps)
    }

    /// Apply a priority fee typed in micro-lamports
    pub fn set_priority_fee(&mut self, input: &str) -> AppResult<u64> {
        let fee = parse_priority_fee(input)?;
        self.priority_fee = fee;
        Ok(fee)
    }
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self::from_config(&TransactionConfig::default())
    }
}

/// Convert a percentage string to basis points, rounding to the nearest bp
pub fn parse_slippage_percent(input: &str) -> AppResult<u16> {
    let percent: f64 = input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid slippage: '{}'", input)))?;

    if !percent.is_finite() || percent < 0.0 {
        return Err(AppError::Validation(format!(
            "Slippage must be a non-negative number, got '{}'",
            input
        )));
    }

    let bps = (percent * 100.0).round();
    if bps > MAX_SLIPPAGE_BPS as f64 {
        return Err(AppError::Validation(format!(
            "Slippage must not exceed 100%, got {}%",
            percent
        )));
    }
    Ok(bps as u16)
}

pub fn parse_priority_fee(input: &str) -> AppResult<u64> {
    input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid priority fee: '{}'", input)))
}
