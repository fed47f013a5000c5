//! Token descriptor and address helpers

use serde::{Deserialize, Deserializer, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// A fungible token as described by a token list
///
/// Field names follow the Jupiter token list shape so list responses
/// deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Mint address
    pub address: String,
    /// Display symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Free-text tags (`verified`, `community-verified`, `known`, ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl TokenDescriptor {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            name: name.into(),
            tags: Vec::new(),
            logo_uri: None,
            decimals: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether `query` names this token by address or symbol, ignoring case
    pub fn matches(&self, query: &str) -> bool {
        self.address.eq_ignore_ascii_case(query) || self.symbol.eq_ignore_ascii_case(query)
    }
}

/// Check that `address` is a base58-encoded 32-byte public key
pub fn validate_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

/// `ABCD...WXYZ` form of an address
pub fn short_address(address: &str) -> String {
    elide(address, 4)
}

/// Transaction signature trimmed to its first and last 10 characters
pub fn short_txid(txid: &str) -> String {
    elide(txid, 10)
}

fn elide(value: &str, keep: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= keep * 2 {
        return value.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{}...{}", head, tail)
}
