//! solkit showcase
//!
//! Classifies the demo tokens shown on the badge page, resolves a token
//! through the cached Jupiter lookup, and runs one simulated
//! token transfer through the transaction tracker, logging every step.

use solkit::cache::TtlCache;
use solkit::config::AppConfig;
use solkit::constants::mints;
use solkit::logging;
use solkit::metrics::Metrics;
use solkit::token::{
    CachedTokenSource, FavoritesStore, JupiterTokenClient, SortOption, TokenDescriptor,
    TrustClassifier,
};
use solkit::transaction::{SimulatedNetwork, TransactionSettings, TransactionTracker};
use std::sync::Arc;

/// A token transfer request; opaque to the tracker
#[derive(Debug, Clone)]
struct Transfer {
    mint: String,
    amount: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init_tracing(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Starting solkit showcase v{}", env!("CARGO_PKG_VERSION"));

    let metrics = Arc::new(Metrics::new());

    // Trust badges
    let classifier = TrustClassifier::from_config(&config.trust);
    for token in demo_tokens() {
        let level = classifier.classify(&token);
        let info = level.info();
        tracing::info!(
            symbol = %token.symbol,
            address = %token.address,
            level = %level,
            label = info.label,
            description = info.description,
            "Token classified"
        );
    }
    if classifier.classify_optional(None).is_none() {
        tracing::info!("No token data provided");
    }

    // Token lookup
    let tokens = CachedTokenSource::with_caches(
        JupiterTokenClient::new(&config.api)?,
        Arc::new(TtlCache::from_config(&config.cache).instrumented("tokens", metrics.clone())),
        Arc::new(TtlCache::from_config(&config.cache).instrumented("token_list", metrics.clone())),
    )
    .ttls(config.cache.metadata_ttl(), config.cache.token_list_ttl());

    match tokens.lookup(Some(mints::USDC)).await {
        Ok(Some(token)) => tracing::info!(
            symbol = %token.symbol,
            level = %classifier.classify(&token),
            "Token metadata resolved"
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Token metadata unavailable"),
    }
    if let Some(jup) = tokens.find_token("JUP").await {
        tracing::info!(address = %jup.address, "Found JUP in token list");
    }

    // Favorites
    let favorites = FavoritesStore::new();
    let mut favorite_events = favorites.subscribe();
    for token in demo_tokens().into_iter().take(3) {
        favorites.add(token);
    }
    while let Ok(event) = favorite_events.try_recv() {
        tracing::debug!(event = ?event, "Favorites changed");
    }
    let recent: Vec<String> = favorites
        .sorted(SortOption::Recent)
        .into_iter()
        .map(|t| t.symbol)
        .collect();
    tracing::info!(favorites = ?recent, "Favorites loaded");

    // Transaction settings
    let settings = TransactionSettings::from_config(&config.transaction);
    tracing::info!(
        priority_fee = settings.priority_fee,
        slippage = %settings.slippage_display(),
        "Transaction settings"
    );

    // Simulated transfer
    let network = Arc::new(SimulatedNetwork::from_config(&config.simulation));
    let tracker =
        TransactionTracker::<Transfer>::with_network(network).with_metrics(metrics.clone());

    let mut updates = tracker.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            tracing::info!(
                status = %snapshot.status,
                txid = ?snapshot.txid,
                error = ?snapshot.error,
                "Transaction status changed"
            );
        }
    });

    let transfer = Transfer {
        mint: mints::USDC.to_string(),
        amount: 0.01,
    };
    tracing::info!(mint = %transfer.mint, amount = transfer.amount, "Sending demo transfer");
    tracker.execute(transfer).await;

    let outcome = tracker.snapshot();
    tracing::info!(
        status = %outcome.status,
        explorer = ?tracker.explorer_url(),
        error = ?outcome.error,
        "Transfer finished"
    );

    tracker.reset();
    drop(tracker);
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "Status watcher ended abnormally");
    }

    tracing::debug!(metrics = %metrics.gather()?, "Metrics snapshot");
    Ok(())
}

/// Load and validate configuration
fn load_config() -> anyhow::Result<AppConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}

/// Tokens covering every trust level
fn demo_tokens() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor::new(mints::SOL, "SOL", "Solana"),
        TokenDescriptor::new(
            "C4t5t3dDdD5t5t3DdD5t5t3DdD5t5t3DdD5t5t3DdD5",
            "VTAG",
            "Verified Tagged Token",
        )
        .with_tags(["community-verified", "stablecoin"]),
        TokenDescriptor::new(mints::SBR, "SBR", "Saber"),
        TokenDescriptor::new(
            "KnoWnDdD5t5t3DdD5t5t3DdD5t5t3DdD5t5t3DdD5t5",
            "KTAG",
            "Known Tagged Token",
        )
        .with_tags(["known"]),
        TokenDescriptor::new(mints::FLAGGED_SENTINEL, "SCAM", "Suspicious Token"),
        TokenDescriptor::new(
            "UnV3r1f13ddD5t5t3DdD5t5t3DdD5t5t3DdD5t5t3D5t",
            "NEW",
            "New Project Coin",
        )
        .with_tags(["new"]),
    ]
}
