//! Memory handling for Solace.
//!
//! This module owns the text side of remembering: chunk normalization,
//! similarity search over a context's chunk store (embedding-ranked with
//! a keyword fallback), and extraction of concrete details from the
//! retrieved snippets.

pub mod chunks;
pub mod details;
pub mod search;
