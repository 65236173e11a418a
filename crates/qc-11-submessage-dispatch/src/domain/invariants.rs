//! # Domain Invariants
//!
//! Invariants that MUST hold across every node replaying the same batch.
//!
//! - INVARIANT-1: Bounded Gas Charge (a limited submessage charges the parent
//!   at most its declared limit)
//! - INVARIANT-2: No Routing Events (routing events never reach the parent or a
//!   reply)
//! - INVARIANT-3: Redacted Replies (a reply error is either a system error or a
//!   redacted one)

use crate::domain::entities::{ContractEvent, Event, Reply, SubMsgResult};
use crate::domain::services::ROUTING_EVENT_TYPE;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Bounded Gas Charge
#[must_use]
pub fn check_gas_charge_invariant(charged: u64, limit: u64) -> bool {
    charged <= limit
}

/// INVARIANT-2: No Routing Events (ledger-native events)
#[must_use]
pub fn check_no_routing_events(events: &[Event]) -> bool {
    events.iter().all(|event| event.kind != ROUTING_EVENT_TYPE)
}

/// INVARIANT-2: No Routing Events (contract-visible events)
#[must_use]
pub fn check_no_routing_contract_events(events: &[ContractEvent]) -> bool {
    events.iter().all(|event| event.kind != ROUTING_EVENT_TYPE)
}

/// INVARIANT-3: Redacted Replies
///
/// `system_messages` are the rendered system errors that may legitimately
/// appear verbatim.
#[must_use]
pub fn check_reply_redacted(reply: &Reply, system_messages: &[String]) -> bool {
    match &reply.result {
        SubMsgResult::Ok(response) => check_no_routing_contract_events(&response.events),
        SubMsgResult::Err(message) => {
            is_redacted_shape(message) || system_messages.iter().any(|m| m == message)
        }
    }
}

/// Returns true for strings of the form `codespace: <cs>, code: <n>`.
#[must_use]
pub fn is_redacted_shape(message: &str) -> bool {
    let Some(rest) = message.strip_prefix("codespace: ") else {
        return false;
    };
    let Some((codespace, code)) = rest.rsplit_once(", code: ") else {
        return false;
    };
    !codespace.is_empty() && !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SubMsgResponse;

    #[test]
    fn test_gas_charge_invariant() {
        assert!(check_gas_charge_invariant(0, 100));
        assert!(check_gas_charge_invariant(100, 100));
        assert!(!check_gas_charge_invariant(101, 100));
    }

    #[test]
    fn test_no_routing_events() {
        assert!(check_no_routing_events(&[Event::new("transfer")]));
        assert!(!check_no_routing_events(&[
            Event::new("transfer"),
            Event::new(ROUTING_EVENT_TYPE),
        ]));
    }

    #[test]
    fn test_redacted_shape() {
        assert!(is_redacted_shape("codespace: sdk, code: 11"));
        assert!(is_redacted_shape("codespace: wasm, code: 4"));
        assert!(!is_redacted_shape("insufficient funds: 3uscrt < 5uscrt"));
        assert!(!is_redacted_shape("codespace: sdk, code: eleven"));
        assert!(!is_redacted_shape("codespace: , code: 1"));
    }

    #[test]
    fn test_reply_redacted() {
        let redacted = Reply {
            id: 1,
            result: SubMsgResult::Err("codespace: sdk, code: 5".to_string()),
        };
        assert!(check_reply_redacted(&redacted, &[]));

        let leaked = Reply {
            id: 1,
            result: SubMsgResult::Err("account sequence mismatch".to_string()),
        };
        assert!(!check_reply_redacted(&leaked, &[]));

        let system = "unknown system error".to_string();
        let passthrough = Reply {
            id: 1,
            result: SubMsgResult::Err(system.clone()),
        };
        assert!(check_reply_redacted(&passthrough, &[system]));

        let ok = Reply {
            id: 1,
            result: SubMsgResult::Ok(SubMsgResponse::default()),
        };
        assert!(check_reply_redacted(&ok, &[]));
    }
}
