//! Favorite tokens store
//!
//! An injected, observable list of tokens. Components share one store via
//! `Arc` and learn about changes through [`FavoritesStore::subscribe`]
//! instead of a global event.

use super::TokenDescriptor;
use parking_lot::RwLock;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    Added(TokenDescriptor),
    /// Address of the removed token
    Removed(String),
    Cleared,
}

/// Ordering for [`FavoritesStore::sorted`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    Name,
    Symbol,
    /// Most recently added first
    #[default]
    Recent,
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortOption::Name),
            "symbol" => Ok(SortOption::Symbol),
            "recent" => Ok(SortOption::Recent),
            _ => Err(format!("Unknown sort option: {}", s)),
        }
    }
}

pub struct FavoritesStore {
    /// Insertion order, oldest first
    tokens: RwLock<Vec<TokenDescriptor>>,
    events: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tokens: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Receive every change made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.events.subscribe()
    }

    /// Add a token unless its address is already present
    ///
    /// Returns whether the token was added.
    pub fn add(&self, token: TokenDescriptor) -> bool {
        {
            let mut tokens = self.tokens.write();
            if tokens.iter().any(|t| t.address == token.address) {
                return false;
            }
            tokens.push(token.clone());
        }

        tracing::debug!(token = %token.address, symbol = %token.symbol, "Favorite added");
        self.notify(FavoritesEvent::Added(token));
        true
    }

    /// Remove a token by address, returning whether anything was removed
    pub fn remove(&self, address: &str) -> bool {
        let removed = {
            let mut tokens = self.tokens.write();
            let before = tokens.len();
            tokens.retain(|t| t.address != address);
            tokens.len() != before
        };

        if removed {
            tracing::debug!(token = address, "Favorite removed");
            self.notify(FavoritesEvent::Removed(address.to_string()));
        }
        removed
    }

    pub fn is_favorite(&self, address: &str) -> bool {
        self.tokens.read().iter().any(|t| t.address == address)
    }

    /// Favorites in insertion order
    pub fn list(&self) -> Vec<TokenDescriptor> {
        self.tokens.read().clone()
    }

    pub fn sorted(&self, by: SortOption) -> Vec<TokenDescriptor> {
        let mut tokens = self.list();
        match by {
            // Case-insensitive; ties keep insertion order
            SortOption::Name => tokens.sort_by_cached_key(|t| t.name.to_lowercase()),
            SortOption::Symbol => tokens.sort_by_cached_key(|t| t.symbol.to_lowercase()),
            SortOption::Recent => tokens.reverse(),
        }
        tokens
    }

    pub fn clear(&self) {
        let was_empty = {
            let mut tokens = self.tokens.write();
            let was_empty = tokens.is_empty();
            tokens.clear();
            was_empty
        };

        if !was_empty {
            self.notify(FavoritesEvent::Cleared);
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }

    fn notify(&self, event: FavoritesEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}
