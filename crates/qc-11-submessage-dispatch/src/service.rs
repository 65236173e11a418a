//! # Submessage Service
//!
//! Service wrapper around the [`MessageDispatcher`]: configuration, batch
//! admission, correlation-id tracing and statistics.
//!
//! ## Architecture Compliance
//!
//! - Receives `DispatchSubmessagesRequestPayload` from the contract engine
//! - Answers with `DispatchSubmessagesResponsePayload`
//! - Dispatch errors are reported in the response; only admission failures
//!   are returned as `ServiceError`

use crate::context::ExecutionContext;
use crate::dispatch::MessageDispatcher;
use crate::domain::entities::KvGasConfig;
use crate::domain::value_objects::Bytes;
use crate::errors::ServiceError;
use crate::events::{
    DispatchFailurePayload, DispatchSubmessagesRequestPayload, DispatchSubmessagesResponsePayload,
};
use crate::ports::inbound::{DispatchRequest, SubmessageDispatchApi};
use crate::ports::outbound::{Messenger, Replyer};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Submessage Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Largest batch accepted.
    pub max_batch_size: usize,
    /// Log every redacted error at `info`.
    pub log_redactions: bool,
    /// Gas schedule for state access.
    pub kv_gas: KvGasConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 64,
            log_redactions: true,
            kv_gas: KvGasConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// `ServiceError::InvalidConfig` if `max_batch_size` is 0.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.max_batch_size == 0 {
            return Err(ServiceError::InvalidConfig(
                "max_batch_size cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Statistics for the Submessage Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Batches handed to the dispatcher.
    pub batches_processed: u64,
    /// Batches that completed.
    pub batches_succeeded: u64,
    /// Batches that aborted.
    pub batches_failed: u64,
    /// Batches refused before dispatch.
    pub rejected_batches: u64,
    /// Submessages in processed batches.
    pub submessages_received: u64,
    /// Gas charged by processed batches.
    pub total_gas_used: u64,
}

/// The main Submessage Service.
///
/// This service:
/// 1. Admits a batch against the configured limits
/// 2. Runs it through the dispatcher on the caller's context
/// 3. Reports the outcome and maintains statistics
pub struct SubmessageService<M, R> {
    /// Service configuration.
    config: ServiceConfig,
    /// Dispatcher.
    dispatcher: MessageDispatcher<M, R>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<M: Messenger, R: Replyer> SubmessageService<M, R> {
    /// Create a new Submessage Service.
    ///
    /// # Errors
    ///
    /// `ServiceError::InvalidConfig` if `config` does not validate.
    pub fn new(messenger: M, keeper: R, config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let dispatcher =
            MessageDispatcher::new(messenger, keeper).with_redaction_logging(config.log_redactions);
        Ok(Self {
            config,
            dispatcher,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The underlying dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &MessageDispatcher<M, R> {
        &self.dispatcher
    }

    /// Get current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Handle a dispatch request.
    ///
    /// The context's KV gas schedule is replaced by the configured one for
    /// the duration of the batch.
    ///
    /// # Errors
    ///
    /// `ServiceError::BatchTooLarge` if the batch exceeds `max_batch_size`.
    #[instrument(skip(self, ctx, payload), fields(correlation_id = %correlation_id))]
    pub fn handle_dispatch(
        &self,
        ctx: ExecutionContext<'_>,
        correlation_id: Uuid,
        payload: DispatchSubmessagesRequestPayload,
    ) -> Result<DispatchSubmessagesResponsePayload, ServiceError> {
        let size = payload.messages.len();
        if size > self.config.max_batch_size {
            warn!(
                size,
                max = self.config.max_batch_size,
                "Rejecting oversized submessage batch"
            );
            self.stats.write().rejected_batches += 1;
            return Err(ServiceError::BatchTooLarge {
                size,
                max: self.config.max_batch_size,
            });
        }

        info!(
            contract = %payload.contract,
            size,
            "Processing submessage batch"
        );

        let mut ctx = ctx.with_kv_gas(self.config.kv_gas);
        let gas_before = ctx.gas_consumed();

        let result = self.dispatcher.dispatch_submessages(
            &mut ctx,
            DispatchRequest {
                contract: &payload.contract,
                ibc_port: &payload.ibc_port,
                messages: &payload.messages,
                og_tx: payload.og_tx.as_slice(),
                og_sig_info: &payload.og_sig_info,
                msg_version: payload.msg_version,
            },
        );

        let gas_used = ctx.gas_consumed().saturating_sub(gas_before);

        // Update statistics
        {
            let mut stats = self.stats.write();
            stats.batches_processed += 1;
            stats.submessages_received += size as u64;
            stats.total_gas_used = stats.total_gas_used.saturating_add(gas_used);
            if result.is_ok() {
                stats.batches_succeeded += 1;
            } else {
                stats.batches_failed += 1;
            }
        }

        match result {
            Ok(data) => {
                debug!(gas_used, data_len = data.len(), "Submessage batch completed");
                Ok(DispatchSubmessagesResponsePayload {
                    success: true,
                    data,
                    gas_used,
                    error: None,
                })
            }
            Err(e) => {
                debug!(gas_used, error = %e, "Submessage batch aborted");
                Ok(DispatchSubmessagesResponsePayload {
                    success: false,
                    data: Bytes::new(),
                    gas_used,
                    error: Some(DispatchFailurePayload::from(&e)),
                })
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
