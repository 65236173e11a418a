//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the dispatcher to the rest of the host.
//!
//! ## Architecture Compliance
//!
//! - Adapters implement domain ports
//! - The dispatcher never depends on a concrete adapter

pub mod router;
pub mod state_adapter;

pub use router::*;
pub use state_adapter::*;
