//! Input validation for mint and transfer forms

use std::error::Error as StdError;
use std::fmt;

use crate::defaults;
use crate::tx::TxPayload;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    QuantityOutOfRange(u8),
    NoTokenSelected,
    InvalidAddress,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::QuantityOutOfRange(quantity) => write!(
                f,
                "Quantity {} is out of range ({}-{})",
                quantity,
                defaults::MIN_MINT_QUANTITY,
                defaults::MAX_MINT_QUANTITY
            ),
            ValidationError::NoTokenSelected => write!(f, "Please select an NFT to transfer"),
            ValidationError::InvalidAddress => {
                write!(f, "Please enter a valid Ethereum address")
            }
        }
    }
}

impl StdError for ValidationError {}

/// Checks the basic Ethereum address shape: a lowercase "0x" prefix
/// followed by exactly 40 hex digits of either case. No EIP-55 checksum
/// verification.
pub fn is_valid_eth_address(address: &str) -> bool {
    address.starts_with("0x")
        && address.len() == 42
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Mint quantity, always within the allowed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintQuantity(u8);

impl MintQuantity {
    pub fn new(raw: u8) -> Self {
        Self(raw.clamp(defaults::MIN_MINT_QUANTITY, defaults::MAX_MINT_QUANTITY))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Saturates at the upper bound.
    pub fn increment(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Saturates at the lower bound.
    pub fn decrement(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for MintQuantity {
    fn default() -> Self {
        Self(defaults::MIN_MINT_QUANTITY)
    }
}

impl fmt::Display for MintQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Total mint cost in ETH: per-token price plus the flat network fee.
pub fn mint_total(quantity: u8) -> f64 {
    quantity as f64 * defaults::MINT_PRICE_ETH + defaults::NETWORK_FEE_ETH
}

/// Validates a payload before it is allowed to enter the pending state.
pub fn validate_payload(payload: &TxPayload) -> Result<(), ValidationError> {
    match payload {
        TxPayload::Mint { quantity } => {
            if *quantity < defaults::MIN_MINT_QUANTITY || *quantity > defaults::MAX_MINT_QUANTITY {
                return Err(ValidationError::QuantityOutOfRange(*quantity));
            }
            Ok(())
        }
        TxPayload::Transfer {
            token_id,
            recipient,
        } => {
            if token_id.is_empty() {
                return Err(ValidationError::NoTokenSelected);
            }
            if !is_valid_eth_address(recipient) {
                return Err(ValidationError::InvalidAddress);
            }
            Ok(())
        }
    }
}
