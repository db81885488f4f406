//! Transaction lifecycle and execution
//!
//! Every mint or transfer moves through the same lifecycle:
//! idle -> pending -> success or error -> (reset) -> idle. A
//! [`TxLifecycle`] owns one lifecycle at a time; the executor that
//! actually confirms the transaction is injected behind the
//! [`ChainExecutor`] trait so the UI never assumes a fixed delay or
//! outcome.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use bevy::log::{error, info, warn};
use rand::Rng;
use sha3::{Digest, Keccak256};

use crate::defaults;
use crate::validation::{ValidationError, validate_payload};

/// Shown while a transaction is pending, regardless of flow.
pub const PENDING_MESSAGE: &str = "Awaiting confirmation...";

/// Shown when an executor rejects a transaction. The structured reason
/// is logged but never surfaced to the user.
pub const FAILURE_MESSAGE: &str = "Transaction failed. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionStatus {
    Idle,
    Pending { message: String },
    Success { message: String, hash: String },
    Error { message: String },
}

impl TransactionStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, TransactionStatus::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            TransactionStatus::Idle => None,
            TransactionStatus::Pending { message }
            | TransactionStatus::Success { message, .. }
            | TransactionStatus::Error { message } => Some(message),
        }
    }

    /// Present only on successful completion.
    pub fn hash(&self) -> Option<&str> {
        match self {
            TransactionStatus::Success { hash, .. } => Some(hash),
            _ => None,
        }
    }
}

/// The two transaction flows the app supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Mint,
    Transfer,
}

impl TxKind {
    pub fn success_message(self) -> &'static str {
        match self {
            TxKind::Mint => "NFT minted successfully!",
            TxKind::Transfer => "Transfer completed successfully!",
        }
    }

    fn default_latency(self) -> Duration {
        match self {
            TxKind::Mint => defaults::MINT_LATENCY,
            TxKind::Transfer => defaults::TRANSFER_LATENCY,
        }
    }

    fn default_success_rate(self) -> f64 {
        match self {
            TxKind::Mint => defaults::MINT_SUCCESS_RATE,
            TxKind::Transfer => defaults::TRANSFER_SUCCESS_RATE,
        }
    }
}

/// What the user asked to do, in the shape an executor needs.
#[derive(Debug, Clone, PartialEq)]
pub enum TxPayload {
    Mint { quantity: u8 },
    Transfer { token_id: String, recipient: String },
}

impl TxPayload {
    pub fn kind(&self) -> TxKind {
        match self {
            TxPayload::Mint { .. } => TxKind::Mint,
            TxPayload::Transfer { .. } => TxKind::Transfer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub hash: String,
}

#[derive(Debug, Clone)]
pub enum ExecutionError {
    Rejected(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Rejected(reason) => write!(f, "Transaction rejected: {}", reason),
        }
    }
}

impl StdError for ExecutionError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    NotConnected,
    Invalid(ValidationError),
    TransactionPending,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NotConnected => write!(f, "Wallet is not connected"),
            SubmitError::Invalid(e) => write!(f, "{}", e),
            SubmitError::TransactionPending => {
                write!(f, "A transaction is already pending")
            }
        }
    }
}

impl StdError for SubmitError {}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    InvalidTransition,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::InvalidTransition => {
                write!(f, "Cannot reset while a transaction is pending")
            }
        }
    }
}

impl StdError for LifecycleError {}

/// Identifies one submit generation. Resolutions carrying a stale id
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptId(u64);

/// State machine driving one transaction flow.
///
/// Each form owns its own lifecycle, so a pending mint never blocks a
/// transfer. Outcomes are applied through [`resolve`](Self::resolve)
/// with the [`AttemptId`] returned by [`submit`](Self::submit); an
/// outcome from a superseded attempt is dropped on the floor.
#[derive(Debug, Clone)]
pub struct TxLifecycle {
    kind: TxKind,
    status: TransactionStatus,
    attempt: u64,
}

impl TxLifecycle {
    pub fn new(kind: TxKind) -> Self {
        Self {
            kind,
            status: TransactionStatus::Idle,
            attempt: 0,
        }
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Validates the request and enters the pending state. While a
    /// transaction is pending this is a rejected no-op; submitting over
    /// a finished success or error starts a fresh attempt.
    pub fn submit(
        &mut self,
        payload: &TxPayload,
        connected: bool,
    ) -> Result<AttemptId, SubmitError> {
        if self.status.is_pending() {
            return Err(SubmitError::TransactionPending);
        }
        if !connected {
            return Err(SubmitError::NotConnected);
        }
        validate_payload(payload).map_err(SubmitError::Invalid)?;

        self.attempt += 1;
        self.status = TransactionStatus::Pending {
            message: PENDING_MESSAGE.to_string(),
        };
        info!("{:?} transaction submitted (attempt {})", self.kind, self.attempt);
        Ok(AttemptId(self.attempt))
    }

    /// Applies an executor outcome. Returns false when the outcome is
    /// stale (wrong attempt id) or arrives while not pending; the state
    /// is left untouched in both cases.
    pub fn resolve(
        &mut self,
        attempt: AttemptId,
        outcome: Result<TxReceipt, ExecutionError>,
    ) -> bool {
        if !self.status.is_pending() || attempt.0 != self.attempt {
            warn!(
                "Dropping stale {:?} resolution (attempt {} vs current {})",
                self.kind, attempt.0, self.attempt
            );
            return false;
        }

        match outcome {
            Ok(receipt) => {
                info!("{:?} transaction confirmed: {}", self.kind, receipt.hash);
                self.status = TransactionStatus::Success {
                    message: self.kind.success_message().to_string(),
                    hash: receipt.hash,
                };
            }
            Err(e) => {
                error!("{:?} transaction failed: {}", self.kind, e);
                self.status = TransactionStatus::Error {
                    message: FAILURE_MESSAGE.to_string(),
                };
            }
        }
        true
    }

    /// Returns to idle from a finished state. Rejected while pending.
    pub fn reset(&mut self) -> Result<(), LifecycleError> {
        if self.status.is_pending() {
            return Err(LifecycleError::InvalidTransition);
        }
        self.status = TransactionStatus::Idle;
        Ok(())
    }
}

/// Two-step confirmation used by the transfer flow. The first submit
/// gesture arms the gate; only a confirmed gate reaches the executor.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    awaiting: bool,
}

impl ConfirmationGate {
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn request(&mut self) {
        self.awaiting = true;
    }

    /// Consumes the armed state. Returns false if nothing was armed.
    pub fn confirm(&mut self) -> bool {
        let armed = self.awaiting;
        self.awaiting = false;
        armed
    }

    pub fn cancel(&mut self) {
        self.awaiting = false;
    }
}

/// Seam for transaction execution. A real implementation would sign
/// and broadcast; the mock one sleeps and rolls a die.
pub trait ChainExecutor: Send + Sync {
    fn execute(&self, payload: &TxPayload) -> Result<TxReceipt, ExecutionError>;
}

/// Simulated executor with per-flow default latency and success rate,
/// both overridable for tests.
#[derive(Debug, Clone, Default)]
pub struct MockChainExecutor {
    latency: Option<Duration>,
    success_rate: Option<f64>,
}

impl MockChainExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = Some(rate);
        self
    }

    pub async fn execute_async(&self, payload: &TxPayload) -> Result<TxReceipt, ExecutionError> {
        let kind = payload.kind();
        let latency = self.latency.unwrap_or_else(|| kind.default_latency());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let rate = self.success_rate.unwrap_or_else(|| kind.default_success_rate());
        if rand::thread_rng().r#gen::<f64>() < rate {
            Ok(TxReceipt {
                hash: synthesize_tx_hash(payload),
            })
        } else {
            Err(ExecutionError::Rejected(format!(
                "simulated network rejection of {:?}",
                kind
            )))
        }
    }

    // Blocking wrapper that creates its own Tokio runtime, for callers
    // outside an async context.
    fn run_with_tokio<F, R>(&self, future: F) -> R
    where
        F: std::future::Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
        rt.block_on(future)
    }
}

impl ChainExecutor for MockChainExecutor {
    fn execute(&self, payload: &TxPayload) -> Result<TxReceipt, ExecutionError> {
        let executor = self.clone();
        let payload = payload.clone();
        self.run_with_tokio(async move { executor.execute_async(&payload).await })
    }
}

// Keccak-256 of the payload plus a random nonce, so every simulated
// confirmation gets a plausible unique hash.
fn synthesize_tx_hash(payload: &TxPayload) -> String {
    let nonce: u64 = rand::thread_rng().r#gen();
    let mut hasher = Keccak256::new();
    hasher.update(format!("{:?}:{}", payload, nonce).as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// Drives a full submit -> execute -> resolve cycle synchronously.
/// The Bevy app splits these steps across frames instead.
pub fn run_transaction(
    lifecycle: &mut TxLifecycle,
    executor: &dyn ChainExecutor,
    payload: &TxPayload,
    connected: bool,
) -> Result<AttemptId, SubmitError> {
    let attempt = lifecycle.submit(payload, connected)?;
    let outcome = executor.execute(payload);
    lifecycle.resolve(attempt, outcome);
    Ok(attempt)
}
