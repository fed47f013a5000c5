//! Token domain logic
//!
//! - Descriptors and address helpers
//! - Trust classification for verification badges
//! - Cached metadata lookups (Jupiter tokens, Helius NFTs)
//! - Favorites store

mod descriptor;
mod favorites;
mod metadata;
mod nft;
mod trust;

pub use descriptor::*;
pub use favorites::*;
pub use metadata::*;
pub use nft::*;
pub use trust::*;
