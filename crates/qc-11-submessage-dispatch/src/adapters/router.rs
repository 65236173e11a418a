//! # Message Router
//!
//! [`Messenger`] adapter that forwards each message to the handler registered
//! for its module, and tags the result with a routing event naming that
//! module. The dispatcher strips routing events again before anything reaches
//! the parent or a reply.

use crate::context::ExecutionContext;
use crate::domain::entities::{CosmosMsg, CosmosMsgVersion, DispatchOutput, Event, MsgRoute};
use crate::domain::services::ROUTING_EVENT_TYPE;
use crate::domain::value_objects::Address;
use crate::errors::{DispatchError, SystemError};
use crate::ports::outbound::Messenger;
use std::collections::BTreeMap;
use tracing::debug;

/// Attribute key of the routing event.
pub const ROUTING_MODULE_KEY: &str = "module";

/// Executes messages of one module.
pub trait MsgHandler {
    /// Executes `msg` on behalf of `contract`.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`].
    fn handle(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        ibc_port: &str,
        msg: &CosmosMsg,
        msg_version: CosmosMsgVersion,
    ) -> Result<DispatchOutput, DispatchError>;
}

/// Route table of module handlers.
#[derive(Default)]
pub struct MessageRouter {
    handlers: BTreeMap<MsgRoute, Box<dyn MsgHandler + Send + Sync>>,
}

impl MessageRouter {
    /// Creates a router with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `route`, replacing any previous one.
    #[must_use]
    pub fn with_route<H>(mut self, route: MsgRoute, handler: H) -> Self
    where
        H: MsgHandler + Send + Sync + 'static,
    {
        if self.has_route(route) {
            debug!(route = route.as_str(), "Replacing message handler");
        }
        self.handlers.insert(route, Box::new(handler));
        self
    }

    /// Returns true if a handler is registered for `route`.
    #[must_use]
    pub fn has_route(&self, route: MsgRoute) -> bool {
        self.handlers.contains_key(&route)
    }
}

impl Messenger for MessageRouter {
    fn dispatch_msg(
        &self,
        ctx: &mut ExecutionContext<'_>,
        contract: &Address,
        ibc_port: &str,
        msg: &CosmosMsg,
        msg_version: CosmosMsgVersion,
    ) -> Result<DispatchOutput, DispatchError> {
        let route = msg.route();
        let Some(handler) = self.handlers.get(&route) else {
            debug!(route = route.as_str(), "No handler registered");
            return Err(SystemError::UnsupportedRequest {
                kind: route.as_str().to_string(),
            }
            .into());
        };

        let output = handler.handle(ctx, contract, ibc_port, msg, msg_version)?;

        let mut events = Vec::with_capacity(output.events.len() + 1);
        events.push(Event::new(ROUTING_EVENT_TYPE).add_attribute(ROUTING_MODULE_KEY, route.as_str()));
        events.extend(output.events);

        Ok(DispatchOutput {
            events,
            data: output.data,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
