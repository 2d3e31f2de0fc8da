//! Memory, style, and reply orchestration logic for Solace.
//!
//! This crate holds the whole reply pipeline: the per-context chunk store
//! and similarity search, detail extraction, communication-style inference,
//! prompt assembly, and the multi-model fallback orchestrator. It depends
//! only on `solace-types` -- never on any network or IO crate. The model
//! backend is a trait ("port") that the infrastructure layer implements.

pub mod backend;
pub mod context;
pub mod engine;
pub mod interview;
pub mod memory;
pub mod reply;
pub mod session;
