//! Caller identity and capability role.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Capability role attached to an authenticated caller.
///
/// Supplied by the external identity provider alongside the user id and
/// checked once at the service boundary. Administrators may manage any shop;
/// regular users only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator with access to every shop.
    Admin,
    /// Regular merchant or buyer.
    #[default]
    Regular,
}

impl Role {
    /// Whether this role carries administrative capability.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Regular => write!(f, "regular"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "regular" => Ok(Self::Regular),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// An authenticated caller: identity plus capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity-provider subject.
    pub user_id: UserId,
    /// Capability role.
    pub role: Role,
}

impl Actor {
    /// Create an actor with an explicit role.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// A regular (non-administrative) caller.
    #[must_use]
    pub fn regular(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Regular)
    }

    /// An administrative caller.
    #[must_use]
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Whether this caller carries administrative capability.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capability() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Regular.is_admin());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("regular".parse::<Role>().unwrap(), Role::Regular);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_actor_constructors() {
        let actor = Actor::regular("u-1");
        assert_eq!(actor.user_id.as_str(), "u-1");
        assert!(!actor.is_admin());

        assert!(Actor::admin("u-2").is_admin());
    }
}
