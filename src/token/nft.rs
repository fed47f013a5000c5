//! NFT metadata via the Helius DAS `getAsset` method

use crate::cache::{TtlCache, METADATA_TTL};
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Name used when an asset carries none
pub const UNKNOWN_NFT_NAME: &str = "Unknown NFT";

/// Cache key for an NFT mint
pub fn nft_cache_key(mint: &str) -> String {
    format!("nft-{}", mint)
}

/// A single trait of an NFT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftCollection {
    pub name: Option<String>,
    /// Collection family, taken from the metadata symbol
    pub family: Option<String>,
}

/// Display metadata for an NFT card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub external_url: Option<String>,
    pub attributes: Vec<NftAttribute>,
    pub collection: NftCollection,
}

// Helius response shapes; every field is optional upstream.

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Asset>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Asset {
    #[serde(default)]
    content: Option<AssetContent>,
    #[serde(default)]
    grouping: Vec<Grouping>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetContent {
    #[serde(default)]
    metadata: Option<AssetMetadata>,
    #[serde(default)]
    files: Vec<AssetFile>,
    #[serde(default)]
    links: Option<AssetLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetMetadata {
    name: Option<String>,
    description: Option<String>,
    symbol: Option<String>,
    #[serde(default)]
    attributes: Vec<NftAttribute>,
}

#[derive(Debug, Deserialize)]
struct AssetFile {
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetLinks {
    image: Option<String>,
    external_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Grouping {
    group_key: String,
    group_value: String,
}

impl From<Asset> for NftMetadata {
    fn from(asset: Asset) -> Self {
        let content = asset.content.unwrap_or_default();
        let metadata = content.metadata.unwrap_or_default();
        let links = content.links.unwrap_or_default();

        let image = content
            .files
            .into_iter()
            .next()
            .and_then(|f| f.uri)
            .filter(|uri| !uri.is_empty())
            .or(links.image);

        let collection_name = asset
            .grouping
            .into_iter()
            .find(|g| g.group_key == "collection")
            .map(|g| g.group_value);

        Self {
            name: metadata
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_NFT_NAME.to_string()),
            description: metadata.description,
            image,
            external_url: links.external_url,
            attributes: metadata.attributes,
            collection: NftCollection {
                name: collection_name,
                family: metadata.symbol,
            },
        }
    }
}

/// Fetches and caches NFT metadata
pub struct NftMetadataClient {
    http: reqwest::Client,
    rpc_url: String,
    api_key: Option<String>,
    cache: Arc<TtlCache<NftMetadata>>,
    ttl: Duration,
}

impl NftMetadataClient {
    pub fn new(config: &ApiConfig, cache: Arc<TtlCache<NftMetadata>>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, config, cache))
    }

    /// Create from an existing HTTP client
    pub fn with_client(
        http: reqwest::Client,
        config: &ApiConfig,
        cache: Arc<TtlCache<NftMetadata>>,
    ) -> Self {
        Self {
            http,
            rpc_url: config.helius_rpc_url.trim_end_matches('/').to_string(),
            api_key: config.helius_api_key.clone().filter(|k| !k.is_empty()),
            cache,
            ttl: METADATA_TTL,
        }
    }

    /// Override how long fetched metadata stays cached
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Get metadata for `mint`, using the cache if available
    ///
    /// `Ok(None)` means the node knows no asset under that mint.
    pub async fn get(&self, mint: &str) -> AppResult<Option<NftMetadata>> {
        let key = nft_cache_key(mint);
        if let Some(metadata) = self.cache.get(&key) {
            return Ok(Some(metadata));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Helius API key not configured".to_string()))?;

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "getAsset",
            "params": { "id": mint },
        });

        let response = self
            .http
            .post(format!("{}/?api-key={}", self.rpc_url, api_key))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Helius returned HTTP status {}",
                response.status()
            )));
        }

        let body: RpcResponse = response.json().await?;
        let metadata = parse_rpc_response(body)?;

        if let Some(metadata) = &metadata {
            self.cache.set_with_ttl(key, metadata.clone(), self.ttl);
        } else {
            tracing::debug!(mint = mint, "No asset found");
        }
        Ok(metadata)
    }
}

fn parse_rpc_response(body: RpcResponse) -> AppResult<Option<NftMetadata>> {
    if let Some(error) = body.error {
        return Err(AppError::Rpc(error.message));
    }
    Ok(body.result.map(NftMetadata::from))
}
