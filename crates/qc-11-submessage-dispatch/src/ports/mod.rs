//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for submessage dispatch.
//! These are the interfaces between the domain and the outside world.
//!
//! ## Architecture Compliance
//!
//! - **Driving Ports (Inbound)**: `SubmessageDispatchApi`
//! - **Driven Ports (Outbound)**: `KvStore`, `Messenger`, `Replyer`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
