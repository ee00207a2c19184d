//! Core services implementing the ledger adapter contract.
//!
//! This module contains the main service components:
//! - `blockchain`: Ledger adapters, transports and the adapter factory
//! - `identity`: Transaction identity and deduplication store

pub mod blockchain;
pub mod identity;
