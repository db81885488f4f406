//! Simulated wallet connection
//!
//! The provider hands back a session after a fixed delay. The address
//! is derived from a throwaway secp256k1 key so every session looks
//! like a real checksummed Ethereum account; the key itself is
//! discarded, nothing is ever signed.

use std::error::Error as StdError;
use std::fmt;

use rand::rngs::OsRng;
use secp256k1::{PublicKey, SecretKey};
use sha3::{Digest, Keccak256};

use crate::defaults;

#[derive(Debug, Clone)]
pub enum WalletError {
    ConnectionFailed(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::ConnectionFailed(msg) => write!(f, "Wallet connection failed: {}", msg),
        }
    }
}

impl StdError for WalletError {}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletSession {
    pub address: String,
    pub balance: String,
}

#[derive(Debug, Clone)]
pub struct MockWalletProvider {
    latency: std::time::Duration,
}

impl MockWalletProvider {
    pub fn new() -> Self {
        Self {
            latency: defaults::CONNECT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn connect_async(&self) -> Result<WalletSession, WalletError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(WalletSession {
            address: generate_display_address(),
            balance: defaults::MOCK_BALANCE_ETH.to_string(),
        })
    }

    /// Blocking wrapper for callers outside an async context.
    pub fn connect_blocking(&self) -> Result<WalletSession, WalletError> {
        let provider = self.clone();
        let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
        rt.block_on(async move { provider.connect_async().await })
    }
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Fresh random key, keccak256 of the uncompressed public key, last 20
// bytes, EIP-55 checksummed for display.
fn generate_display_address() -> String {
    let mut rng = OsRng;
    let secret_key = SecretKey::new(&mut rng);
    let public_key = PublicKey::from_secret_key(&secp256k1::Secp256k1::new(), &secret_key);
    let public_key_bytes = public_key.serialize_uncompressed();

    let mut hasher = Keccak256::new();
    hasher.update(&public_key_bytes[1..]); // Skip recovery id byte
    let result = hasher.finalize();
    let address = hex::encode(&result[12..]); // Take last 20 bytes

    format!("0x{}", to_checksum_address(&address))
}

// EIP-55 Ethereum address checksumming
fn to_checksum_address(address: &str) -> String {
    let address = address.to_lowercase();
    let hash = {
        let mut hasher = Keccak256::new();
        hasher.update(address.as_bytes());
        hex::encode(hasher.finalize())
    };

    let mut result = String::new();
    for (i, c) in address.chars().enumerate() {
        if c.is_ascii_hexdigit() && c.is_alphabetic() {
            if let Some(hash_char) = hash.chars().nth(i) {
                if hash_char >= '8' {
                    result.push(c.to_ascii_uppercase());
                } else {
                    result.push(c);
                }
            } else {
                result.push(c);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// "0x1234...5678" style truncation for header and card display.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Longer form used in the transfer confirmation panel.
pub fn truncate_recipient(address: &str) -> String {
    if address.len() <= 18 {
        return address.to_string();
    }
    format!("{}...{}", &address[..10], &address[address.len() - 8..])
}
