//! Transaction lifecycle tests
//!
//! These tests cover the state machine behind the mint and transfer
//! forms:
//! - Submission guards (connection, validation, pending exclusivity)
//! - Resolution into success and error states
//! - Stale resolution handling
//! - Reset rules and the two-step confirmation gate

use super::test_utils::*;
use crate::tx::{
    ChainExecutor, ConfirmationGate, ExecutionError, LifecycleError, SubmitError,
    TransactionStatus, TxKind, TxLifecycle, TxPayload, TxReceipt, run_transaction,
};
use crate::validation::ValidationError;

#[cfg(test)]
mod submit_tests {
    use super::*;

    #[test]
    fn test_new_lifecycle_is_idle() {
        let lifecycle = TxLifecycle::new(TxKind::Mint);
        assert!(lifecycle.status().is_idle());
        assert_eq!(lifecycle.kind(), TxKind::Mint);
    }

    #[test]
    fn test_submit_enters_pending_with_message() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let result = lifecycle.submit(&TxPayload::Mint { quantity: 3 }, true);

        assert!(result.is_ok());
        assert!(lifecycle.status().is_pending());
        assert_eq!(lifecycle.status().message(), Some("Awaiting confirmation..."));
    }

    #[test]
    fn test_submit_rejected_when_disconnected() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let result = lifecycle.submit(&TxPayload::Mint { quantity: 1 }, false);

        assert_eq!(result, Err(SubmitError::NotConnected));
        assert!(lifecycle.status().is_idle());
    }

    #[test]
    fn test_invalid_payload_leaves_lifecycle_idle() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let result = lifecycle.submit(&TxPayload::Mint { quantity: 0 }, true);

        assert_eq!(
            result,
            Err(SubmitError::Invalid(ValidationError::QuantityOutOfRange(0)))
        );
        assert!(lifecycle.status().is_idle());
    }

    #[test]
    fn test_second_submit_rejected_while_pending() {
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);
        let payload = valid_transfer_payload();

        let first = lifecycle.submit(&payload, true);
        assert!(first.is_ok());

        let second = lifecycle.submit(&payload, true);
        assert_eq!(second, Err(SubmitError::TransactionPending));
        assert!(lifecycle.status().is_pending());
    }

    #[test]
    fn test_pending_check_precedes_validation() {
        // A pending lifecycle rejects even an invalid payload with the
        // pending error, never the validation one
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let _ = lifecycle.submit(&TxPayload::Mint { quantity: 2 }, true);

        let result = lifecycle.submit(&TxPayload::Mint { quantity: 0 }, true);
        assert_eq!(result, Err(SubmitError::TransactionPending));
    }

    #[test]
    fn test_executor_not_invoked_for_rejected_submit() {
        let executor = CountingExecutor::new();
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);

        let rejected = run_transaction(
            &mut lifecycle,
            &executor,
            &valid_transfer_payload(),
            false,
        );
        assert_eq!(rejected, Err(SubmitError::NotConnected));
        assert_eq!(executor.call_count(), 0);

        let accepted = run_transaction(&mut lifecycle, &executor, &valid_transfer_payload(), true);
        assert!(accepted.is_ok());
        assert_eq!(executor.call_count(), 1);
    }

    #[test]
    fn test_submit_allowed_after_terminal_state() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let payload = TxPayload::Mint { quantity: 1 };

        let first = lifecycle.submit(&payload, true).unwrap();
        lifecycle.resolve(first, Err(ExecutionError::Rejected("boom".to_string())));
        assert!(matches!(
            lifecycle.status(),
            TransactionStatus::Error { .. }
        ));

        // No reset needed; a new submit replaces the error state
        assert!(lifecycle.submit(&payload, true).is_ok());
        assert!(lifecycle.status().is_pending());
    }
}

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn test_accepted_outcome_becomes_success_with_hash() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let attempt = lifecycle
            .submit(&TxPayload::Mint { quantity: 2 }, true)
            .unwrap();

        let applied = lifecycle.resolve(
            attempt,
            Ok(TxReceipt {
                hash: "0xabc123".to_string(),
            }),
        );

        assert!(applied);
        assert_eq!(lifecycle.status().message(), Some("NFT minted successfully!"));
        assert_eq!(lifecycle.status().hash(), Some("0xabc123"));
    }

    #[test]
    fn test_transfer_success_message() {
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);
        let attempt = lifecycle.submit(&valid_transfer_payload(), true).unwrap();

        lifecycle.resolve(
            attempt,
            Ok(TxReceipt {
                hash: "0xdef456".to_string(),
            }),
        );
        assert_eq!(
            lifecycle.status().message(),
            Some("Transfer completed successfully!")
        );
    }

    #[test]
    fn test_rejected_outcome_becomes_static_error() {
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);
        let attempt = lifecycle.submit(&valid_transfer_payload(), true).unwrap();

        let applied = lifecycle.resolve(
            attempt,
            Err(ExecutionError::Rejected(
                "insufficient gas, nonce reused, mercury retrograde".to_string(),
            )),
        );

        assert!(applied);
        // The structured reason never leaks into the user-facing message
        assert_eq!(
            lifecycle.status().message(),
            Some("Transaction failed. Please try again.")
        );
        assert_eq!(lifecycle.status().hash(), None);
    }

    #[test]
    fn test_stale_resolution_is_ignored() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let payload = TxPayload::Mint { quantity: 1 };

        let first = lifecycle.submit(&payload, true).unwrap();
        lifecycle.resolve(first, Err(ExecutionError::Rejected("late".to_string())));

        let second = lifecycle.submit(&payload, true).unwrap();

        // The first attempt reports again after being superseded
        let applied = lifecycle.resolve(
            first,
            Ok(TxReceipt {
                hash: "0xstale".to_string(),
            }),
        );
        assert!(!applied);
        assert!(lifecycle.status().is_pending());

        // The live attempt still resolves normally
        assert!(lifecycle.resolve(
            second,
            Ok(TxReceipt {
                hash: "0xfresh".to_string(),
            })
        ));
        assert_eq!(lifecycle.status().hash(), Some("0xfresh"));
    }

    #[test]
    fn test_resolution_without_pending_is_ignored() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let attempt = lifecycle
            .submit(&TxPayload::Mint { quantity: 1 }, true)
            .unwrap();
        lifecycle.resolve(
            attempt,
            Ok(TxReceipt {
                hash: "0x1".to_string(),
            }),
        );

        // Same attempt id, but the lifecycle already settled
        let applied = lifecycle.resolve(
            attempt,
            Err(ExecutionError::Rejected("duplicate".to_string())),
        );
        assert!(!applied);
        assert_eq!(lifecycle.status().hash(), Some("0x1"));
    }
}

#[cfg(test)]
mod reset_tests {
    use super::*;

    #[test]
    fn test_reset_rejected_while_pending() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let _ = lifecycle.submit(&TxPayload::Mint { quantity: 1 }, true);

        assert_eq!(lifecycle.reset(), Err(LifecycleError::InvalidTransition));
        assert!(lifecycle.status().is_pending());
    }

    #[test]
    fn test_reset_from_terminal_states() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let attempt = lifecycle
            .submit(&TxPayload::Mint { quantity: 1 }, true)
            .unwrap();
        lifecycle.resolve(
            attempt,
            Ok(TxReceipt {
                hash: "0x1".to_string(),
            }),
        );

        assert!(lifecycle.reset().is_ok());
        assert!(lifecycle.status().is_idle());

        // Reset from idle is a harmless no-op
        assert!(lifecycle.reset().is_ok());
    }
}

#[cfg(test)]
mod confirmation_gate_tests {
    use super::*;

    #[test]
    fn test_gate_starts_disarmed() {
        let gate = ConfirmationGate::default();
        assert!(!gate.is_awaiting());
    }

    #[test]
    fn test_confirm_requires_a_prior_request() {
        let mut gate = ConfirmationGate::default();
        assert!(!gate.confirm());

        gate.request();
        assert!(gate.is_awaiting());
        assert!(gate.confirm());

        // Confirming consumed the armed state
        assert!(!gate.is_awaiting());
        assert!(!gate.confirm());
    }

    #[test]
    fn test_cancel_disarms_the_gate() {
        let mut gate = ConfirmationGate::default();
        gate.request();
        gate.cancel();
        assert!(!gate.confirm());
    }

    #[test]
    fn test_gated_transfer_executes_exactly_once() {
        let executor = CountingExecutor::new();
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);
        let mut gate = ConfirmationGate::default();
        let payload = valid_transfer_payload();

        // First gesture only arms the gate
        gate.request();
        assert_eq!(executor.call_count(), 0);

        // Confirmation performs the submit
        if gate.confirm() {
            let result = run_transaction(&mut lifecycle, &executor, &payload, true);
            assert!(result.is_ok());
        }
        assert_eq!(executor.call_count(), 1);
        assert!(lifecycle.status().hash().is_some());
    }
}

#[cfg(test)]
mod executor_tests {
    use super::*;

    #[test]
    fn test_stub_success_flows_through_run_transaction() {
        let mut lifecycle = TxLifecycle::new(TxKind::Mint);
        let executor = StubExecutor::succeeding("0xfeedface");

        let result = run_transaction(
            &mut lifecycle,
            &executor,
            &TxPayload::Mint { quantity: 3 },
            true,
        );

        assert!(result.is_ok());
        assert_eq!(lifecycle.status().hash(), Some("0xfeedface"));
    }

    #[test]
    fn test_stub_failure_flows_through_run_transaction() {
        let mut lifecycle = TxLifecycle::new(TxKind::Transfer);
        let executor = StubExecutor::failing("network down");

        let result = run_transaction(&mut lifecycle, &executor, &valid_transfer_payload(), true);

        assert!(result.is_ok());
        assert!(matches!(
            lifecycle.status(),
            TransactionStatus::Error { .. }
        ));
    }
}
