//! # Submessage Dispatcher
//!
//! Runs a contract's submessages one at a time, in order. Each submessage
//! executes in its own cached scope:
//!
//! 1. Validate the reply policy (an invalid value stops the batch here).
//! 2. Open a scope; apply the gas limiter if the declared limit is below
//!    what the parent has left.
//! 3. On success commit the scope and emit the filtered events on the
//!    parent. On failure discard it.
//! 4. Ask the reply policy what happens next: skip, reply or abort.
//! 5. On reply, send the (possibly redacted) outcome to the contract on the
//!    parent context and remember any non-empty payload it returns.
//!
//! Faults are never turned into replies: they leave the batch immediately.

pub mod gas_limit;

pub use gas_limit::dispatch_with_gas_limit;

use crate::context::ExecutionContext;
use crate::domain::entities::{Reply, SubMsg, SubMsgResponse, SubMsgResult, VerificationInfo};
use crate::domain::invariants::{check_no_routing_events, check_reply_redacted};
use crate::domain::policy::{decide, ReplyDecision, SubMsgState};
use crate::domain::redaction::redact_error;
use crate::domain::services::{filter_events, is_reply_encrypted, to_contract_events};
use crate::domain::value_objects::Bytes;
use crate::errors::DispatchError;
use crate::ports::inbound::{DispatchRequest, SubmessageDispatchApi};
use crate::ports::outbound::{Messenger, Replyer};
use tracing::{info, instrument, trace};

/// Dispatches submessage batches through a [`Messenger`] and delivers
/// replies through a [`Replyer`].
pub struct MessageDispatcher<M, R> {
    messenger: M,
    keeper: R,
    log_redactions: bool,
}

impl<M: Messenger, R: Replyer> MessageDispatcher<M, R> {
    /// Creates a dispatcher.
    pub fn new(messenger: M, keeper: R) -> Self {
        Self {
            messenger,
            keeper,
            log_redactions: true,
        }
    }

    /// Turns the `info` record of every redacted error on or off.
    #[must_use]
    pub fn with_redaction_logging(mut self, enabled: bool) -> Self {
        self.log_redactions = enabled;
        self
    }

    /// The messenger.
    #[must_use]
    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// The reply keeper.
    #[must_use]
    pub fn keeper(&self) -> &R {
        &self.keeper
    }

    /// Dispatches one submessage and, if the policy asks for it, its reply.
    ///
    /// Returns the reply payload when a reply returned a non-empty one.
    fn dispatch_one(
        &self,
        ctx: &mut ExecutionContext<'_>,
        request: &DispatchRequest<'_>,
        sub: &SubMsg,
    ) -> Result<Option<Bytes>, DispatchError> {
        let reply_on = sub.reply_policy()?;

        let gas_remaining = ctx.gas_remaining();
        let mut state = SubMsgState::Dispatching;
        trace!(id = sub.id, ?reply_on, gas_limit = ?sub.gas_limit, ?state, "Submessage transition");

        let mut scope = ctx.begin_scope();
        let result = {
            let mut child = scope.context();
            match sub.gas_limit {
                Some(limit) if limit < gas_remaining => {
                    dispatch_with_gas_limit(&mut child, limit, |limited| {
                        self.messenger.dispatch_msg(
                            limited,
                            request.contract,
                            request.ibc_port,
                            &sub.msg,
                            request.msg_version,
                        )
                    })
                }
                _ => self.messenger.dispatch_msg(
                    &mut child,
                    request.contract,
                    request.ibc_port,
                    &sub.msg,
                    request.msg_version,
                ),
            }
        };

        let outcome = match result {
            Ok(output) => {
                let scope_events = scope.commit();
                let events = filter_events(scope_events.into_iter().chain(output.events));
                debug_assert!(check_no_routing_events(&events));
                let response = SubMsgResponse {
                    events: to_contract_events(&events),
                    data: output.data.into_iter().next(),
                };
                ctx.emit_events(events);
                Ok(response)
            }
            Err(err) => {
                drop(scope);
                if err.is_fatal() {
                    info!(id = sub.id, cause = %err, "Re-raising fault from submessage");
                    return Err(err);
                }
                Err(err)
            }
        };

        state = state.dispatched(outcome.is_ok());
        trace!(id = sub.id, ?state, "Submessage transition");

        let decision = decide(reply_on, outcome.is_ok());
        state = state.resolve(decision);
        trace!(id = sub.id, ?state, "Submessage transition");
        debug_assert!(state.is_terminal());

        // Rendered system errors, the only text allowed into a reply verbatim
        let mut verbatim = Vec::new();
        let result = match (decision, outcome) {
            (ReplyDecision::Skip, _) => return Ok(None),
            (ReplyDecision::Abort, Err(err)) => return Err(err),
            (_, Ok(response)) => SubMsgResult::Ok(response),
            (_, Err(err)) => {
                let redacted = redact_error(&err);
                if self.log_redactions {
                    info!(id = sub.id, cause = %err, "Redacting submessage error");
                }
                if let Some(system) = redacted.as_system_error() {
                    verbatim.push(system.to_string());
                }
                SubMsgResult::Err(redacted.to_string())
            }
        };

        let reply = Reply {
            id: sub.id,
            result,
        };
        debug_assert!(check_reply_redacted(&reply, &verbatim));
        let sig_info = if is_reply_encrypted(&sub.msg, &reply) {
            request.og_sig_info.clone()
        } else {
            VerificationInfo::plaintext()
        };

        let data = self
            .keeper
            .reply(ctx, request.contract, reply, request.og_tx, &sig_info)?;

        Ok((!data.is_empty()).then_some(data))
    }
}

impl<M: Messenger, R: Replyer> SubmessageDispatchApi for MessageDispatcher<M, R> {
    #[instrument(
        skip_all,
        fields(contract = %request.contract, batch_size = request.messages.len())
    )]
    fn dispatch_submessages(
        &self,
        ctx: &mut ExecutionContext<'_>,
        request: DispatchRequest<'_>,
    ) -> Result<Bytes, DispatchError> {
        let mut rsp = Bytes::new();
        for sub in request.messages {
            if let Some(data) = self.dispatch_one(ctx, &request, sub)? {
                rsp = data;
            }
        }
        Ok(rsp)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::KvStore;
    use crate::adapters::MemStore;
    use crate::context::EventManager;
    use crate::domain::entities::{
        BankMsg, Coin, CosmosMsg, CosmosMsgVersion, DispatchOutput, Event, ReplyOn, WasmMsg,
    };
    use crate::domain::value_objects::{Address, GasMeter};
    use crate::errors::CodedError;
    use parking_lot::Mutex;

    /// Succeeds for bank messages, fails for contract messages.
    struct BankOnly;

    impl Messenger for BankOnly {
        fn dispatch_msg(
            &self,
            ctx: &mut ExecutionContext<'_>,
            _contract: &Address,
            _ibc_port: &str,
            msg: &CosmosMsg,
            _msg_version: CosmosMsgVersion,
        ) -> Result<DispatchOutput, DispatchError> {
            ctx.kv_set(b"touched", b"1")?;
            match msg {
                CosmosMsg::Bank(_) => Ok(DispatchOutput::new()
                    .with_event(Event::new("message").add_attribute("module", "bank"))
                    .with_event(Event::new("transfer"))),
                _ => Err(CodedError::new("wasm", 4, "contract failed: panic at 0x1f").into()),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        replies: Mutex<Vec<(Reply, VerificationInfo)>>,
    }

    impl Replyer for Recorder {
        fn reply(
            &self,
            _ctx: &mut ExecutionContext<'_>,
            _contract: &Address,
            reply: Reply,
            _og_tx: &[u8],
            sig_info: &VerificationInfo,
        ) -> Result<Bytes, DispatchError> {
            self.replies.lock().push((reply, sig_info.clone()));
            Ok(Bytes::new())
        }
    }

    fn bank() -> CosmosMsg {
        CosmosMsg::Bank(BankMsg::Send {
            to_address: "secret1to".to_string(),
            amount: vec![Coin::new(1, "uscrt")],
        })
    }

    fn wasm() -> CosmosMsg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: "secret1c".to_string(),
            code_hash: String::new(),
            msg: Bytes::new(),
            send: Vec::new(),
        })
    }

    fn dispatch(messages: &[SubMsg], recorder: &Recorder, store: &mut MemStore) -> Result<Bytes, DispatchError> {
        let dispatcher = MessageDispatcher::new(BankOnly, recorder);
        let mut gas = GasMeter::infinite();
        let mut events = EventManager::new();
        let mut ctx = ExecutionContext::new(store, &mut gas, &mut events);
        let contract = Address::new([9u8; 20]);
        let sig_info = VerificationInfo::default();
        dispatcher.dispatch_submessages(
            &mut ctx,
            DispatchRequest {
                contract: &contract,
                ibc_port: "",
                messages,
                og_tx: b"tx",
                og_sig_info: &sig_info,
                msg_version: CosmosMsgVersion::V1,
            },
        )
    }

    #[test]
    fn test_failure_with_error_policy_is_rolled_back_and_redacted() {
        let recorder = Recorder::default();
        let mut store = MemStore::new();

        let rsp = dispatch(&[SubMsg::new(1, wasm(), ReplyOn::Error)], &recorder, &mut store).unwrap();

        assert!(rsp.is_empty());
        assert!(store.is_empty());
        let replies = recorder.replies.lock();
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0].0.result,
            SubMsgResult::Err("codespace: wasm, code: 4".to_string())
        );
        assert!(replies[0].1.is_plaintext());
    }

    #[test]
    fn test_success_reply_hides_routing_events() {
        let recorder = Recorder::default();
        let mut store = MemStore::new();

        dispatch(&[SubMsg::new(7, bank(), ReplyOn::Always)], &recorder, &mut store).unwrap();

        assert!(store.has(b"touched"));
        let replies = recorder.replies.lock();
        let SubMsgResult::Ok(response) = &replies[0].0.result else {
            panic!("expected success reply");
        };
        assert_eq!(response.events.len(), 1);
        assert_eq!(response.events[0].kind, "transfer");
    }

    #[test]
    fn test_every_reply_passes_redaction_check() {
        let recorder = Recorder::default();
        let mut store = MemStore::new();

        dispatch(
            &[
                SubMsg::new(1, bank(), ReplyOn::Always),
                SubMsg::new(2, wasm(), ReplyOn::Always),
                SubMsg::new(3, wasm(), ReplyOn::Error),
                SubMsg::new(4, bank(), ReplyOn::Success),
            ],
            &recorder,
            &mut store,
        )
        .unwrap();

        let replies = recorder.replies.lock();
        assert_eq!(replies.len(), 4);
        for (reply, _) in replies.iter() {
            assert!(check_reply_redacted(reply, &[]), "{reply:?}");
        }
    }

    #[test]
    fn test_never_policy_failure_returns_original_error() {
        let recorder = Recorder::default();
        let mut store = MemStore::new();

        let err = dispatch(&[SubMsg::new(1, wasm(), ReplyOn::Never)], &recorder, &mut store).unwrap_err();

        assert_eq!(err.to_string(), "contract failed: panic at 0x1f");
        assert!(recorder.replies.lock().is_empty());
    }
}
