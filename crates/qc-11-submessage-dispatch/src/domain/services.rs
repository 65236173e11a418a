//! # Domain Services
//!
//! Pure functions over domain entities: event filtering and conversion, and
//! reply confidentiality.

use crate::domain::entities::{
    ContractEvent, CosmosMsg, Event, EventAttribute, LogAttribute, Reply,
};

/// Event type used purely for internal message routing.
///
/// Never surfaced to the parent ledger or to a reply.
pub const ROUTING_EVENT_TYPE: &str = "message";

// =============================================================================
// EVENT FILTER / CONVERTER
// =============================================================================

/// Drops every routing event, keeping the order of the rest.
#[must_use]
pub fn filter_events<I>(events: I) -> Vec<Event>
where
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .filter(|event| event.kind != ROUTING_EVENT_TYPE)
        .collect()
}

/// Converts ledger-native events into the contract-visible representation.
///
/// Keys and values are decoded as UTF-8; invalid sequences are replaced with
/// U+FFFD, which is the same on every node.
#[must_use]
pub fn to_contract_events(events: &[Event]) -> Vec<ContractEvent> {
    events
        .iter()
        .map(|event| ContractEvent {
            kind: event.kind.clone(),
            attributes: event.attributes.iter().map(to_log_attribute).collect(),
        })
        .collect()
}

fn to_log_attribute(attr: &EventAttribute) -> LogAttribute {
    LogAttribute {
        key: String::from_utf8_lossy(attr.key.as_slice()).into_owned(),
        value: String::from_utf8_lossy(attr.value.as_slice()).into_owned(),
    }
}

// =============================================================================
// REPLY CONFIDENTIALITY
// =============================================================================

/// A reply carries the original signing metadata only if it reports a
/// successful contract call. Errors are always redacted strings, so they go
/// out as plaintext.
#[must_use]
pub fn is_reply_encrypted(msg: &CosmosMsg, reply: &Reply) -> bool {
    msg.is_contract() && reply.result.is_ok()
}

// =============================================================================
// TESTS
// =============================================================================
