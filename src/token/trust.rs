//! Token trust classification
//!
//! Assigns each token exactly one [`TrustLevel`], first match wins:
//! 1. Verified list member, or tagged `verified` / `community-verified`
//! 2. Known list member, or tagged `known`
//! 3. Warning list member, or tagged `warning`
//! 4. Unverified
//!
//! Tag sets and lists can overlap, so the order above is load-bearing.

use super::TokenDescriptor;
use crate::config::TrustConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Tags that influence classification
pub mod tags {
    pub const VERIFIED: &str = "verified";
    pub const COMMUNITY_VERIFIED: &str = "community-verified";
    pub const KNOWN: &str = "known";
    pub const WARNING: &str = "warning";
}

/// Trust bucket for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Verified,
    Known,
    Warning,
    Unverified,
}

/// Static presentation text for a trust level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustInfo {
    pub level: TrustLevel,
    pub label: &'static str,
    pub description: &'static str,
    /// Footer line for the detailed badge, if the level has one
    pub note: Option<&'static str>,
}

static TRUST_TABLE: [TrustInfo; 4] = [
    TrustInfo {
        level: TrustLevel::Verified,
        label: "Verified",
        description: "This token has been verified as authentic by Solana ecosystem validators.",
        note: Some("Official token validated by ecosystem"),
    },
    TrustInfo {
        level: TrustLevel::Known,
        label: "Known",
        description: "This token is recognized in the ecosystem but not officially verified.",
        note: None,
    },
    TrustInfo {
        level: TrustLevel::Warning,
        label: "Warning",
        description:
            "This token has been flagged as potentially suspicious. Exercise extreme caution.",
        note: Some("Do not interact with this token"),
    },
    TrustInfo {
        level: TrustLevel::Unverified,
        label: "Unverified",
        description:
            "This token has not been verified. Always do your own research before interacting.",
        note: Some("Always verify token details before trading"),
    },
];

impl TrustLevel {
    pub const ALL: [TrustLevel; 4] = [
        TrustLevel::Verified,
        TrustLevel::Known,
        TrustLevel::Warning,
        TrustLevel::Unverified,
    ];

    /// Label, description and note for this level
    pub fn info(&self) -> &'static TrustInfo {
        match self {
            TrustLevel::Verified => &TRUST_TABLE[0],
            TrustLevel::Known => &TRUST_TABLE[1],
            TrustLevel::Warning => &TRUST_TABLE[2],
            TrustLevel::Unverified => &TRUST_TABLE[3],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLevel::Verified => "verified",
            TrustLevel::Known => "known",
            TrustLevel::Warning => "warning",
            TrustLevel::Unverified => "unverified",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrustLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verified" => Ok(TrustLevel::Verified),
            "known" => Ok(TrustLevel::Known),
            "warning" => Ok(TrustLevel::Warning),
            "unverified" => Ok(TrustLevel::Unverified),
            _ => Err(format!("Unknown trust level: {}", s)),
        }
    }
}

/// Membership lists consulted by the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustLists {
    pub verified: HashSet<String>,
    pub known: HashSet<String>,
    pub warning: HashSet<String>,
}

impl TrustLists {
    pub fn new<V, K, W>(verified: V, known: K, warning: W) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            verified: verified.into_iter().map(Into::into).collect(),
            known: known.into_iter().map(Into::into).collect(),
            warning: warning.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &TrustConfig) -> Self {
        Self::new(
            config.verified.iter().cloned(),
            config.known.iter().cloned(),
            config.warning.iter().cloned(),
        )
    }

    /// Addresses listed in more than one set, sorted
    pub fn overlaps(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        for address in self.verified.iter().chain(&self.known) {
            if self.warning.contains(address) {
                seen.insert(address.clone());
            }
        }
        for address in &self.verified {
            if self.known.contains(address) {
                seen.insert(address.clone());
            }
        }
        seen.into_iter().collect()
    }
}

/// Classifies tokens against a fixed set of trust lists
#[derive(Debug, Clone)]
pub struct TrustClassifier {
    lists: TrustLists,
}

impl TrustClassifier {
    pub fn new(lists: TrustLists) -> Self {
        let overlaps = lists.overlaps();
        if !overlaps.is_empty() {
            tracing::warn!(
                count = overlaps.len(),
                addresses = ?overlaps,
                "Trust lists overlap; verified > known > warning decides"
            );
        }
        Self { lists }
    }

    pub fn from_config(config: &TrustConfig) -> Self {
        Self::new(TrustLists::from_config(config))
    }

    pub fn lists(&self) -> &TrustLists {
        &self.lists
    }

    /// Classify a token descriptor
    pub fn classify(&self, token: &TokenDescriptor) -> TrustLevel {
        self.classify_parts(&token.address, &token.tags)
    }

    /// Classify from an address and its tags
    pub fn classify_parts<S: AsRef<str>>(&self, address: &str, token_tags: &[S]) -> TrustLevel {
        let has = |tag: &str| token_tags.iter().any(|t| t.as_ref() == tag);

        if self.lists.verified.contains(address)
            || has(tags::VERIFIED)
            || has(tags::COMMUNITY_VERIFIED)
        {
            TrustLevel::Verified
        } else if self.lists.known.contains(address) || has(tags::KNOWN) {
            TrustLevel::Known
        } else if self.lists.warning.contains(address) || has(tags::WARNING) {
            TrustLevel::Warning
        } else {
            TrustLevel::Unverified
        }
    }

    /// Classify a token that may not have been found
    ///
    /// `None` means there is nothing to badge, which is distinct from
    /// [`TrustLevel::Unverified`].
    pub fn classify_optional(&self, token: Option<&TokenDescriptor>) -> Option<TrustLevel> {
        token.map(|t| self.classify(t))
    }
}

impl Default for TrustClassifier {
    fn default() -> Self {
        Self::from_config(&TrustConfig::default())
    }
}
