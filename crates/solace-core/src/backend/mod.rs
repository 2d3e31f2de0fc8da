//! Model backend abstractions for Solace.
//!
//! This module defines the port the reply pipeline talks through:
//! - `ModelBackend`: RPITIT trait for concrete backend implementations
//! - `BoxModelBackend`: Object-safe wrapper for dynamic dispatch

pub mod box_backend;
pub mod provider;
