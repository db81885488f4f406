//! Test modules for the Nexus desktop app
//!
//! This module contains test coverage for:
//! - Transaction lifecycle (submit, resolve, reset, confirmation gate)
//! - Input validation (addresses, quantities, cost calculation)
//! - Gallery view selection and the NFT fixture

#[cfg(test)]
pub mod lifecycle;


#[cfg(test)]
pub mod gallery;
