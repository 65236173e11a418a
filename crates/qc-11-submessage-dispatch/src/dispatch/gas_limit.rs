//! # Gas Limiter
//!
//! Runs one dispatch under its own gas meter and settles the bill with the
//! parent afterwards. This is the only place a gas exhaustion fault is caught.
//!
//! | Outcome of the limited run | Parent is charged | Returned |
//! |----------------------------|-------------------|----------|
//! | ok / ordinary error        | actual consumption | as-is |
//! | gas exhaustion             | the full limit     | `sdk/11` "SubMsg hit gas limit" |
//! | any other fault            | nothing            | the fault |

use crate::context::ExecutionContext;
use crate::domain::invariants::check_gas_charge_invariant;
use crate::domain::value_objects::GasMeter;
use crate::errors::{CodedError, DispatchError};
use tracing::{debug, info};

/// Descriptor of the full-limit charge after gas exhaustion.
pub const OUT_OF_GAS_DESCRIPTOR: &str = "Sub-Message OutOfGas panic";

/// Descriptor of the actual-consumption charge.
pub const LIMITED_CHARGE_DESCRIPTOR: &str = "From limited Sub-Message";

/// Context of the error returned after gas exhaustion.
pub const GAS_LIMIT_HIT: &str = "SubMsg hit gas limit";

/// Runs `op` against a child of `ctx` metered by a fresh meter of `limit`.
///
/// # Errors
///
/// - `DispatchError::Coded` (`sdk/11`) if `op` ran out of gas
/// - any non-gas fault raised by `op`, unchanged
/// - a fault from charging the parent
/// - otherwise whatever `op` returned
pub fn dispatch_with_gas_limit<T, F>(
    ctx: &mut ExecutionContext<'_>,
    limit: u64,
    op: F,
) -> Result<T, DispatchError>
where
    F: FnOnce(&mut ExecutionContext<'_>) -> Result<T, DispatchError>,
{
    let mut limited = GasMeter::new(limit);
    let result = {
        let mut sub = ctx.with_gas_meter(&mut limited);
        op(&mut sub)
    };

    let exhausted = limited.is_past_limit()
        || matches!(&result, Err(err) if err.is_out_of_gas_fault());

    if exhausted {
        debug!(
            limit,
            consumed = limited.consumed(),
            "Submessage ran out of gas"
        );
        ctx.consume_gas(limit, OUT_OF_GAS_DESCRIPTOR)?;
        return Err(CodedError::out_of_gas(GAS_LIMIT_HIT).into());
    }

    if let Err(err) = &result {
        if err.is_fatal() {
            info!(cause = %err, "Re-raising fault from limited submessage");
            return result;
        }
    }

    let charged = limited.consumed();
    debug_assert!(check_gas_charge_invariant(charged, limit));
    ctx.consume_gas(charged, LIMITED_CHARGE_DESCRIPTOR)?;
    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemStore;
    use crate::context::EventManager;
    use crate::domain::entities::KvGasConfig;
    use crate::errors::Fault;

    fn run<T>(
        parent_limit: u64,
        limit: u64,
        op: impl FnOnce(&mut ExecutionContext<'_>) -> Result<T, DispatchError>,
    ) -> (Result<T, DispatchError>, u64) {
        let mut store = MemStore::new();
        let mut gas = GasMeter::new(parent_limit);
        let mut events = EventManager::new();
        let mut ctx = ExecutionContext::new(&mut store, &mut gas, &mut events)
            .with_kv_gas(KvGasConfig::free());
        let result = dispatch_with_gas_limit(&mut ctx, limit, op);
        (result, ctx.gas_consumed())
    }

    #[test]
    fn test_charges_actual_consumption() {
        let (result, charged) = run(500, 100, |ctx| ctx.consume_gas(60, "work"));
        assert!(result.is_ok());
        assert_eq!(charged, 60);
    }

    #[test]
    fn test_ordinary_error_charges_actual_consumption() {
        let (result, charged) = run(500, 100, |ctx| -> Result<(), DispatchError> {
            ctx.consume_gas(30, "work")?;
            Err(CodedError::insufficient_funds("send").into())
        });
        assert!(matches!(result, Err(DispatchError::Coded(ref e)) if e.code == 5));
        assert_eq!(charged, 30);
    }

    #[test]
    fn test_exact_limit_is_not_exhaustion() {
        let (result, charged) = run(500, 100, |ctx| ctx.consume_gas(100, "work"));
        assert!(result.is_ok());
        assert_eq!(charged, 100);
    }

    #[test]
    fn test_exhaustion_charges_full_limit() {
        let (result, charged) = run(500, 100, |ctx| ctx.consume_gas(150, "work"));

        let err = result.unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "SubMsg hit gas limit: out of gas");
        assert_eq!(err.abci_info(), ("sdk", 11));
        assert_eq!(charged, 100);
    }

    #[test]
    fn test_swallowed_exhaustion_still_charges_full_limit() {
        let (result, charged) = run(500, 100, |ctx| {
            let _ = ctx.consume_gas(150, "work");
            Ok(())
        });
        assert_eq!(result.unwrap_err().abci_info(), ("sdk", 11));
        assert_eq!(charged, 100);
    }

    #[test]
    fn test_other_fault_is_reraised_without_charge() {
        let (result, charged) = run(500, 100, |ctx| -> Result<(), DispatchError> {
            ctx.consume_gas(40, "work")?;
            Err(Fault::System("stack overflow".to_string()).into())
        });
        assert_eq!(
            result.unwrap_err(),
            DispatchError::Fault(Fault::System("stack overflow".to_string()))
        );
        assert_eq!(charged, 0);
    }
}
