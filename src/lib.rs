//! Core library for the arb-scanner project.
//!
//! Polls EVM chains and a DEX-aggregator quote API, and reports simulated
//! round-trip arbitrage opportunities. Nothing is ever signed or broadcast.

pub mod arbitrage;
pub mod chain;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod quote;
pub mod scanner;
pub mod utils;
pub mod wallet;
