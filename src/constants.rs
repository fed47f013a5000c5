/// Solana token mint addresses used by the default trust lists
pub mod mints {
    /// Wrapped SOL (native SOL wrapped as SPL token)
    pub const SOL: &str = "So11111111111111111111111111111111111111112";
    /// USDC (Circle USD Coin)
    pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    /// USDT (Tether USD)
    pub const USDT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
    /// Marinade staked SOL
    pub const MSOL: &str = "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So";
    /// Lido staked SOL
    pub const STSOL: &str = "7dHbWXmci3dT8UFYWYZweBLXgycu7Y3iL6trKn1Y7ARj";
    /// Bonk
    pub const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
    /// Jupiter
    pub const JUP: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";
    /// BONK listing under its alternative mint
    pub const BONK_ALT: &str = "7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs";
    /// Saber
    pub const SBR: &str = "Saber2gLauYim4Mvftnrasomsv6NvAuncvMEZwcLpD1";
    /// Sentinel address flagged in the default warning list
    pub const FLAGGED_SENTINEL: &str = "DEADDEADDEADDEADDEADDEADDEADDEADDEADDEADDEAD";
}

/// External endpoints
pub mod endpoints {
    /// Jupiter strict token lookup, `/{address}` is appended
    pub const JUPITER_TOKEN: &str = "https://token.jup.ag/strict";
    /// Jupiter verified token list
    pub const JUPITER_TOKEN_LIST: &str = "https://tokens.jup.ag/tokens?tags=verified";
    /// Helius mainnet RPC, `?api-key=` is appended
    pub const HELIUS_RPC: &str = "https://mainnet.helius-rpc.com";
    /// Transaction explorer, `/{signature}` is appended
    pub const SOLSCAN_TX: &str = "https://solscan.io/tx";
}
