//! # QC-11 Submessage Dispatch - Contract Callback Coordination
//!
//! **Subsystem ID:** 11
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! After a contract call returns, the contract may ask the host to run a list
//! of submessages on its behalf and to call it back with the outcome. This
//! crate runs that list: each submessage in its own cached scope, optionally
//! under its own gas limit, with the reply policy deciding whether the
//! contract hears about the result. Every node replaying the same batch must
//! reach the same state, gas and events, so error text and routing metadata
//! are kept out of anything consensus can see.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Bounded Gas Charge | `domain/invariants.rs` - `check_gas_charge_invariant()` |
//! | INVARIANT-2 | No Routing Events | `domain/invariants.rs` - `check_no_routing_events()` |
//! | INVARIANT-3 | Redacted Replies | `domain/invariants.rs` - `check_reply_redacted()` |
//!
//! ## Reply Policy
//!
//! | Outcome | Success | Never | Always | Error |
//! |---------|---------|-------|--------|-------|
//! | success | reply `Ok` | continue | reply `Ok` | continue |
//! | failure | abort with the original error | abort with the original error | reply redacted `Err` | reply redacted `Err` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `KvStore` | Ledger state behind an execution context |
//! | `Messenger` | Execute one outbound message |
//! | `Replyer` | Call the contract's reply entry point |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Dispatcher | `dispatch/mod.rs` | Batch loop and reply delivery |
//! | Gas limiter | `dispatch/gas_limit.rs` | Bounded sub-execution |
//! | Scope | `context/scope.rs` | Commit / discard of one submessage |
//! | Redaction | `domain/redaction.rs` | Deterministic reply errors |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_11_submessage_dispatch::prelude::*;
//!
//! let dispatcher = MessageDispatcher::new(router, keeper);
//! let data = dispatcher.dispatch_submessages(&mut ctx, request)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod context;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BankMsg, Coin, ContractEvent, CosmosMsg, CosmosMsgVersion, DispatchOutput, Event,
        EventAttribute, KvGasConfig, LogAttribute, MsgRoute, Reply, ReplyOn, SignMode, SubMsg,
        SubMsgResponse, SubMsgResult, VerificationInfo, WasmMsg,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, Bytes, GasError, GasMeter};

    // Domain services
    pub use crate::domain::policy::{decide, ReplyDecision, SubMsgState};
    pub use crate::domain::redaction::{classify, redact_error, ErrorClass};
    pub use crate::domain::services::{
        filter_events, is_reply_encrypted, to_contract_events, ROUTING_EVENT_TYPE,
    };

    // Context
    pub use crate::context::{CacheStore, EventManager, ExecutionContext, Scope};

    // Dispatch
    pub use crate::dispatch::{dispatch_with_gas_limit, MessageDispatcher};

    // Ports
    pub use crate::ports::inbound::{DispatchRequest, SubmessageDispatchApi};
    pub use crate::ports::outbound::{KvStore, Messenger, Replyer};

    // Events
    pub use crate::events::{
        decode_submessages, DispatchFailurePayload, DispatchSubmessagesRequestPayload,
        DispatchSubmessagesResponsePayload,
    };

    // Errors
    pub use crate::errors::{CodedError, DispatchError, Fault, ServiceError, SystemError};

    // Adapters
    pub use crate::adapters::{MemStore, MessageRouter, MsgHandler};

    // Service
    pub use crate::service::{ServiceConfig, ServiceStats, SubmessageService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID for IPC.
pub const SUBSYSTEM_ID: u8 = 11;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Submessage Dispatch";

// =============================================================================
// TESTS
// =============================================================================
