//! Caller authorization checks shared by the services.

use souq_core::{Actor, UserId};

use crate::error::EngineError;

/// Reject anonymous callers.
pub(crate) fn require_actor(actor: Option<&Actor>) -> Result<&Actor, EngineError> {
    actor.ok_or(EngineError::Unauthenticated)
}

/// Only the owning user or an admin may manage a shop's records.
pub(crate) fn ensure_owner_or_admin(actor: &Actor, owner_id: &UserId) -> Result<(), EngineError> {
    if actor.is_admin() || actor.user_id == *owner_id {
        Ok(())
    } else {
        Err(EngineError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_callers_are_rejected() {
        assert!(matches!(
            require_actor(None),
            Err(EngineError::Unauthenticated)
        ));

        let actor = Actor::regular("u1");
        assert!(require_actor(Some(&actor)).is_ok());
    }

    #[test]
    fn owners_and_admins_pass_the_ownership_check() {
        let owner = UserId::new("owner-1");

        assert!(ensure_owner_or_admin(&Actor::regular("owner-1"), &owner).is_ok());
        assert!(ensure_owner_or_admin(&Actor::admin("staff-1"), &owner).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&Actor::regular("someone-else"), &owner),
            Err(EngineError::Forbidden)
        ));
    }
}
