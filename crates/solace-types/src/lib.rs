//! Shared domain types for Solace.
//!
//! This crate contains the core domain types used across the Solace memory
//! companion: personas, memory chunks, conversation turns, reply contracts,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror,
//! and toml for config parsing.

pub mod chat;
pub mod config;
pub mod error;
pub mod interview;
pub mod llm;
pub mod memory;
pub mod persona;
pub mod style;
