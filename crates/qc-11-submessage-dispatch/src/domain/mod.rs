//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for submessage dispatch.
//! NO I/O, NO state access, NO external collaborators.
//!
//! ## Architecture Compliance
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - All types here are pure domain concepts.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod entities;
pub mod invariants;
pub mod policy;
pub mod redaction;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use policy::*;
pub use redaction::*;
pub use services::*;
pub use value_objects::*;
