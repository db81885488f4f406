//! Nexus - NFT gallery, mint, and transfer desktop app
//!
//! Core logic for the Nexus desktop front end. Wallet connection, NFT
//! listings, and transaction execution are all simulated; the traits in
//! [`tx`], [`nft`], and [`wallet`] mark the seams where real chain
//! integrations would plug in.

pub mod nft;
pub mod tx;
pub mod validation;
pub mod wallet;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use nft::{GalleryView, MockNftSource, Nft, NftSource, gallery_view};
pub use tx::{
    AttemptId, ChainExecutor, ConfirmationGate, ExecutionError, LifecycleError, MockChainExecutor,
    SubmitError, TransactionStatus, TxKind, TxLifecycle, TxPayload, TxReceipt, run_transaction,
};
pub use validation::{MintQuantity, ValidationError, is_valid_eth_address, mint_total};
pub use wallet::{MockWalletProvider, WalletError, WalletSession, truncate_address};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Default simulation values
pub mod defaults {
    use std::time::Duration;

    /// Simulated wallet connection delay
    pub const CONNECT_LATENCY: Duration = Duration::from_millis(1500);

    /// Simulated confirmation delay for mint transactions
    pub const MINT_LATENCY: Duration = Duration::from_millis(2000);

    /// Simulated confirmation delay for transfer transactions
    pub const TRANSFER_LATENCY: Duration = Duration::from_millis(2500);

    /// Fraction of mint attempts that succeed (70%)
    pub const MINT_SUCCESS_RATE: f64 = 0.7;

    /// Fraction of transfer attempts that succeed (80%)
    pub const TRANSFER_SUCCESS_RATE: f64 = 0.8;

    /// Price per minted token in ETH
    pub const MINT_PRICE_ETH: f64 = 0.08;

    /// Flat estimated network fee in ETH
    pub const NETWORK_FEE_ETH: f64 = 0.002;

    /// Mint quantity bounds
    pub const MIN_MINT_QUANTITY: u8 = 1;
    pub const MAX_MINT_QUANTITY: u8 = 10;

    /// Display balance reported by the mock wallet provider
    pub const MOCK_BALANCE_ETH: &str = "2.847";
}
