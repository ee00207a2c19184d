//! Ledger-agnostic adapters for blockchain node APIs.
//!
//! Normalizes a UTXO chain (Bitcoin Core), an account chain (Ethereum) and a
//! slot chain (Solana) behind a single capability trait so that callers can
//! query health, chain head, blocks, transactions and fees, and broadcast or
//! preflight signed transactions without branching on chain type.
//!
//! - `models`: identifiers, normalized DTOs, transaction instances and config
//! - `services`: the adapter contract, per-chain adapters, transports and the
//!   transaction identity store
//! - `utils`: logging setup

pub mod models;
pub mod services;
pub mod utils;
