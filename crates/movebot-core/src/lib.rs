//! Core domain + application logic for the move bot.
//!
//! This crate is intentionally framework-agnostic. Telegram, PokeAPI and SQLite
//! live behind ports (traits) implemented in adapter crates.

pub mod classifier;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod memory_store;
pub mod messaging;
pub mod ports;
pub mod security;
pub mod service;

pub use errors::{Error, Result};
