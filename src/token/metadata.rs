//! Token metadata lookups
//!
//! Provides:
//! - Single-token lookup by mint address (Jupiter strict list)
//! - The verified token list
//! - A caching wrapper that memoizes both through [`TtlCache`]

use super::TokenDescriptor;
use crate::cache::{TtlCache, METADATA_TTL, TOKEN_LIST_TTL};
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Cache key for the verified token list
pub const TOKEN_LIST_KEY: &str = "jupiter-tokens";

/// Cache key for a single token
pub fn token_cache_key(address: &str) -> String {
    format!("token-{}", address)
}

/// Remote source of token descriptors
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch one token by mint address
    async fn fetch_token(&self, address: &str) -> AppResult<TokenDescriptor>;

    /// Fetch the full verified token list
    async fn fetch_token_list(&self) -> AppResult<Vec<TokenDescriptor>>;
}

/// Fetches token descriptors from the Jupiter token API
pub struct JupiterTokenClient {
    http: reqwest::Client,
    token_url: String,
    token_list_url: String,
}

impl JupiterTokenClient {
    /// Create a new client
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, config))
    }

    /// Create from an existing HTTP client
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http,
            token_url: config.jupiter_token_url.trim_end_matches('/').to_string(),
            token_list_url: config.jupiter_token_list_url.clone(),
        }
    }
}

#[async_trait]
impl TokenSource for JupiterTokenClient {
    async fn fetch_token(&self, address: &str) -> AppResult<TokenDescriptor> {
        let url = format!("{}/{}", self.token_url, address);
        tracing::debug!(token = address, "Fetching token metadata");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(token = address, status = %response.status(), "Token lookup failed");
            return Err(AppError::NotFound("Token not found".to_string()));
        }

        Ok(response.json::<TokenDescriptor>().await?)
    }

    async fn fetch_token_list(&self) -> AppResult<Vec<TokenDescriptor>> {
        let response = self.http.get(&self.token_list_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Token list API returned error: {}",
                response.status()
            )));
        }

        let tokens: Vec<TokenDescriptor> = response.json().await?;
        tracing::debug!(count = tokens.len(), "Fetched token list");
        Ok(tokens)
    }
}

/// Memoizes a [`TokenSource`]
///
/// Single tokens live for [`METADATA_TTL`], the list for [`TOKEN_LIST_TTL`]
/// unless overridden. Failed lookups are never cached.
pub struct CachedTokenSource<S> {
    source: S,
    tokens: Arc<TtlCache<TokenDescriptor>>,
    lists: Arc<TtlCache<Vec<TokenDescriptor>>>,
    token_ttl: Duration,
    list_ttl: Duration,
}

impl<S: TokenSource> CachedTokenSource<S> {
    pub fn new(source: S) -> Self {
        Self::with_caches(
            source,
            Arc::new(TtlCache::new()),
            Arc::new(TtlCache::new()),
        )
    }

    /// Share caches with other lookups
    pub fn with_caches(
        source: S,
        tokens: Arc<TtlCache<TokenDescriptor>>,
        lists: Arc<TtlCache<Vec<TokenDescriptor>>>,
    ) -> Self {
        Self {
            source,
            tokens,
            lists,
            token_ttl: METADATA_TTL,
            list_ttl: TOKEN_LIST_TTL,
        }
    }

    pub fn ttls(mut self, token_ttl: Duration, list_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self.list_ttl = list_ttl;
        self
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get one token, using the cache if available
    pub async fn token(&self, address: &str) -> AppResult<TokenDescriptor> {
        let key = token_cache_key(address);
        if let Some(token) = self.tokens.get(&key) {
            return Ok(token);
        }

        let token = self.source.fetch_token(address).await?;
        self.tokens.set_with_ttl(key, token.clone(), self.token_ttl);
        Ok(token)
    }

    /// Look up a token for an address that may be absent
    ///
    /// No address means no lookup and no error.
    pub async fn lookup(&self, address: Option<&str>) -> AppResult<Option<TokenDescriptor>> {
        match address.map(str::trim).filter(|a| !a.is_empty()) {
            Some(address) => self.token(address).await.map(Some),
            None => Ok(None),
        }
    }

    /// Get the verified token list
    ///
    /// A failed fetch yields an empty list so pickers still render.
    pub async fn token_list(&self) -> Vec<TokenDescriptor> {
        if let Some(tokens) = self.lists.get(TOKEN_LIST_KEY) {
            return tokens;
        }

        match self.source.fetch_token_list().await {
            Ok(tokens) => {
                self.lists
                    .set_with_ttl(TOKEN_LIST_KEY, tokens.clone(), self.list_ttl);
                tokens
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch token list");
                Vec::new()
            }
        }
    }

    /// Find a token in the list by address or symbol, ignoring case
    pub async fn find_token(&self, address_or_symbol: &str) -> Option<TokenDescriptor> {
        self.token_list()
            .await
            .into_iter()
            .find(|t| t.matches(address_or_symbol))
    }

    /// Drop cached entries so the next lookups hit the source
    pub fn invalidate(&self) {
        self.tokens.clear();
        self.lists.delete(TOKEN_LIST_KEY);
    }
}
