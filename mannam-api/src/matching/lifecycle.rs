use uuid::Uuid;

use crate::models::MatchStatus;

/// Canonically ordered user pair: `a < b`, always. The single place the
/// ordering invariant is established; everything downstream (the unique
/// constraint, the CHECK, role resolution) relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairKey {
    pub a: Uuid,
    pub b: Uuid,
}

impl PairKey {
    pub fn new(x: Uuid, y: Uuid) -> Self {
        if x < y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Which side of the ordered pair a user occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    UserA,
    UserB,
}

impl Role {
    pub fn of(user_a_id: Uuid, user_b_id: Uuid, user_id: Uuid) -> Option<Self> {
        if user_id == user_a_id {
            Some(Self::UserA)
        } else if user_id == user_b_id {
            Some(Self::UserB)
        } else {
            None
        }
    }
}

/// The mutable slice of a match row, read and written as one aggregate under
/// a row lock so concurrent responses serialize.
#[derive(Debug, Clone, Copy)]
pub struct AcceptanceView {
    pub status: MatchStatus,
    pub user_a_accepted: Option<bool>,
    pub user_b_accepted: Option<bool>,
}

/// Outcome of a valid response. The caller persists the flag + status change
/// and runs the matching side effects after commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// One rejection is terminal; no need to wait for the other side.
    Rejected,
    /// This user accepted, the partner has not yet; status stays pending.
    AcceptedPendingPartner,
    /// Both sides accepted; the match is made and a mission follows.
    MutualAccept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    AlreadyResolved,
    AlreadyResponded,
}

/// Pure transition function for `Respond`. No transition is reversible and
/// scores never change; only the caller's flag and the status move.
pub fn apply_response(
    view: AcceptanceView,
    role: Role,
    accept: bool,
) -> Result<Transition, ResponseError> {
    if view.status != MatchStatus::Pending {
        return Err(ResponseError::AlreadyResolved);
    }

    let (mine, partners) = match role {
        Role::UserA => (view.user_a_accepted, view.user_b_accepted),
        Role::UserB => (view.user_b_accepted, view.user_a_accepted),
    };

    if mine.is_some() {
        return Err(ResponseError::AlreadyResponded);
    }

    if !accept {
        return Ok(Transition::Rejected);
    }

    if partners == Some(true) {
        Ok(Transition::MutualAccept)
    } else {
        Ok(Transition::AcceptedPendingPartner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn pending(a: Option<bool>, b: Option<bool>) -> AcceptanceView {
        AcceptanceView {
            status: MatchStatus::Pending,
            user_a_accepted: a,
            user_b_accepted: b,
        }
    }

    #[test]
    fn pair_key_orders_ids() {
        let low = uuid(1);
        let high = uuid(9);
        assert_eq!(PairKey::new(high, low), PairKey { a: low, b: high });
        assert_eq!(PairKey::new(low, high), PairKey { a: low, b: high });
    }

    #[test]
    fn role_resolution() {
        assert_eq!(Role::of(uuid(1), uuid(2), uuid(1)), Some(Role::UserA));
        assert_eq!(Role::of(uuid(1), uuid(2), uuid(2)), Some(Role::UserB));
        assert_eq!(Role::of(uuid(1), uuid(2), uuid(3)), None);
    }

    #[test]
    fn single_rejection_is_terminal() {
        let t = apply_response(pending(None, None), Role::UserA, false).unwrap();
        assert_eq!(t, Transition::Rejected);
    }

    #[test]
    fn first_accept_keeps_pending() {
        let t = apply_response(pending(None, None), Role::UserA, true).unwrap();
        assert_eq!(t, Transition::AcceptedPendingPartner);
    }

    #[test]
    fn second_accept_is_mutual() {
        let t = apply_response(pending(Some(true), None), Role::UserB, true).unwrap();
        assert_eq!(t, Transition::MutualAccept);
    }

    #[test]
    fn partner_rejection_already_resolved_the_match() {
        // A rejected match is no longer pending; the other side's late
        // response surfaces as AlreadyResolved, not a double transition.
        let view = AcceptanceView {
            status: MatchStatus::Rejected,
            user_a_accepted: Some(false),
            user_b_accepted: None,
        };
        assert_eq!(
            apply_response(view, Role::UserB, true),
            Err(ResponseError::AlreadyResolved)
        );
    }

    #[test]
    fn double_response_from_same_user_is_rejected() {
        assert_eq!(
            apply_response(pending(Some(true), None), Role::UserA, true),
            Err(ResponseError::AlreadyResponded)
        );
        assert_eq!(
            apply_response(pending(Some(true), None), Role::UserA, false),
            Err(ResponseError::AlreadyResponded)
        );
    }

    #[test]
    fn resolved_states_reject_everything() {
        for status in [
            MatchStatus::Accepted,
            MatchStatus::Rejected,
            MatchStatus::Expired,
            MatchStatus::Completed,
        ] {
            let view = AcceptanceView {
                status,
                user_a_accepted: None,
                user_b_accepted: None,
            };
            assert_eq!(
                apply_response(view, Role::UserA, true),
                Err(ResponseError::AlreadyResolved)
            );
        }
    }
}
