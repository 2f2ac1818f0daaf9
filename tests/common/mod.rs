//! Common test utilities for ICE integration tests
//!
//! Shared fixtures: parsed contexts, causal paths and enriched sources for the
//! semiconductor supply-chain scenario used throughout the suite.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::{
    hop, nvidia_context, nvidia_paths, random_context, random_path, sample_sources, TICKERS,
};
