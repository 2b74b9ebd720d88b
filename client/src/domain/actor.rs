//! The authenticated actor driving the application.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Closed set of roles the service assigns to actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full visibility across every shop and ledger.
    Admin,
    /// Visibility restricted to the actor's assigned resources.
    Manager,
    /// Shop-floor staff.
    Staff,
}

impl Role {
    /// Wire name used in query strings and JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role {:?}; expected admin, manager, or staff", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// Identity record of an authenticated (or listed) actor.
///
/// ## Invariants
/// - `assigned_resources` holds each id at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Actor {
    id: EntityId,
    name: String,
    email: String,
    role: Role,
    #[serde(default, alias = "assignedResources", alias = "assigned_shops")]
    assigned_resources: BTreeSet<EntityId>,
}

impl Actor {
    /// Build an actor from its parts.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        assigned_resources: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            assigned_resources: assigned_resources.into_iter().collect(),
        }
    }

    /// Stable actor identifier.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Resource ids this actor is scoped to.
    pub fn assigned_resources(&self) -> &BTreeSet<EntityId> {
        &self.assigned_resources
    }

    /// Whether `id` is part of this actor's assignment.
    pub fn is_assigned(&self, id: EntityId) -> bool {
        self.assigned_resources.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case(" Manager ", Role::Manager)]
    #[case("STAFF", Role::Staff)]
    fn parses_role_names(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>().expect("known role"), expected);
    }

    #[rstest]
    fn rejects_unknown_roles() {
        let err = "owner".parse::<Role>().expect_err("unknown role");
        assert_eq!(err, UnknownRole("owner".to_owned()));
    }

    #[rstest]
    fn decodes_actor_with_camel_case_assignment() {
        let actor: Actor = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Mina",
            "email": "mina@example.com",
            "role": "manager",
            "assignedResources": [2, "5"]
        }))
        .expect("actor payload");

        assert_eq!(actor.role(), Role::Manager);
        assert!(actor.is_assigned(EntityId::new(5).expect("id")));
        assert_eq!(actor.assigned_resources().len(), 2);
    }

    #[rstest]
    fn missing_assignment_defaults_to_empty() {
        let actor: Actor = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Root",
            "email": "root@example.com",
            "role": "admin"
        }))
        .expect("actor payload");

        assert!(actor.assigned_resources().is_empty());
    }
}
