//! # Duel Ledger
//!
//! A personal ladder match tracker with season win-rate analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, deck templates, seasons, stats)
//! - **calculate**: Season statistics aggregation engine
//! - **storage**: JSONL persistence under the data directory
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
