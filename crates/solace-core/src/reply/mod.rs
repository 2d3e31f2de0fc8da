//! Reply generation pipeline for Solace.
//!
//! Everything between a user message and the returned text: question
//! classification and length selection, communication-style derivation,
//! prompt assembly, the model/fallback orchestrator, the deterministic
//! templated reply, and final post-processing.

pub mod classify;
pub mod fallback;
pub mod orchestrator;
pub mod postprocess;
pub mod prompt;
pub mod rng;
pub mod style;
