//! Order status machine
//!
//! Legality is encoded as an explicit edge set rather than free-form string
//! comparison, so the valid-transition set is testable on its own and both
//! creation validation and status updates consult the same table. The
//! machine is pure: same inputs, same verdict, no hidden state. Timestamp
//! side effects (completed_at, updated_at) are the caller's responsibility.

use shared::models::OrderStatus;
use thiserror::Error;

/// Transition rejection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Whether `(current, requested)` is in the allowed edge set
///
/// Forward edges: Placed → Accepted → Preparing → Ready → Completed.
/// Any non-terminal state may also move to Cancelled. Everything else —
/// backward edges, skip-ahead edges, and any move out of Completed or
/// Cancelled — is rejected.
pub fn can_transition(current: OrderStatus, requested: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (current, requested),
        (Placed, Accepted)
            | (Accepted, Preparing)
            | (Preparing, Ready)
            | (Ready, Completed)
            | (Placed, Cancelled)
            | (Accepted, Cancelled)
            | (Preparing, Cancelled)
            | (Ready, Cancelled)
    )
}

/// Validate a transition, returning the next state or a typed rejection
pub fn transition(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<OrderStatus, InvalidTransition> {
    if can_transition(current, requested) {
        Ok(requested)
    } else {
        Err(InvalidTransition {
            from: current,
            to: requested,
        })
    }
}

/// Terminal states admit no further transitions
pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Completed | OrderStatus::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus::*;

    const ALLOWED: [(OrderStatus, OrderStatus); 8] = [
        (Placed, Accepted),
        (Accepted, Preparing),
        (Preparing, Ready),
        (Ready, Completed),
        (Placed, Cancelled),
        (Accepted, Cancelled),
        (Preparing, Cancelled),
        (Ready, Cancelled),
    ];

    #[test]
    fn test_allowed_edges_succeed() {
        for (from, to) in ALLOWED {
            assert_eq!(transition(from, to), Ok(to), "{from} -> {to} should pass");
        }
    }

    #[test]
    fn test_every_other_pair_rejected() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                if ALLOWED.contains(&(from, to)) {
                    continue;
                }
                let result = transition(from, to);
                assert_eq!(
                    result,
                    Err(InvalidTransition { from, to }),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_backward_edge_rejected() {
        assert!(transition(Ready, Preparing).is_err());
        assert!(transition(Accepted, Placed).is_err());
    }

    #[test]
    fn test_skip_ahead_rejected() {
        assert!(transition(Placed, Preparing).is_err());
        assert!(transition(Placed, Completed).is_err());
        assert!(transition(Accepted, Ready).is_err());
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for to in OrderStatus::ALL {
            assert!(transition(Completed, to).is_err());
            assert!(transition(Cancelled, to).is_err());
        }
        assert!(is_terminal(Completed));
        assert!(is_terminal(Cancelled));
        assert!(!is_terminal(Ready));
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in OrderStatus::ALL {
            assert!(transition(status, status).is_err());
        }
    }
}
