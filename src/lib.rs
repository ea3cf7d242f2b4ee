//! Shortmap - a small URL shortener service
//!
//! Maps long URLs to compact base-62 codes and resolves them back, with
//! custom aliases, optional expiry and per-link click accounting.
//!
//! # Architecture
//! - `codec`: base-62 code allocation derived from store-assigned ids
//! - `storage`: record store contract and backends (sqlite, memory)
//! - `services`: mapping lifecycle (create / resolve / stats / sweep)
//! - `api`: actix-web HTTP boundary
//! - `config`: configuration loading and process-wide access
//! - `logging`: tracing initialization

pub mod api;
pub mod codec;
pub mod config;
pub mod errors;
pub mod logging;
pub mod services;
pub mod storage;
pub mod utils;
