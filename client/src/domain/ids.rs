//! Entity identifiers shared by every resource.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`EntityId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityIdError {
    /// The identifier was zero.
    Zero,
    /// The identifier text was not an unsigned integer.
    NotNumeric(String),
}

impl fmt::Display for EntityIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "entity id must be greater than zero"),
            Self::NotNumeric(raw) => write!(f, "entity id must be numeric, got {raw:?}"),
        }
    }
}

impl std::error::Error for EntityIdError {}

/// Server-assigned identifier of a resource entity or actor.
///
/// ## Invariants
/// - Never zero.
///
/// The service is inconsistent about sending ids as numbers or numeric
/// strings, so both decode; encoding always produces a JSON number.
///
/// # Examples
/// ```
/// use shopdesk::domain::EntityId;
///
/// let id: EntityId = serde_json::from_str("\"42\"").unwrap();
/// assert_eq!(id, EntityId::new(42).unwrap());
/// assert_eq!(serde_json::to_string(&id).unwrap(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawEntityId", into = "u64")]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Validate and construct an identifier.
    pub fn new(raw: u64) -> Result<Self, EntityIdError> {
        NonZeroU64::new(raw).map(Self).ok_or(EntityIdError::Zero)
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let raw = trimmed
            .parse::<u64>()
            .map_err(|_| EntityIdError::NotNumeric(trimmed.to_owned()))?;
        Self::new(raw)
    }
}

impl From<EntityId> for u64 {
    fn from(value: EntityId) -> Self {
        value.get()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawEntityId> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: RawEntityId) -> Result<Self, Self::Error> {
        match value {
            RawEntityId::Number(raw) => Self::new(raw),
            RawEntityId::Text(raw) => raw.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", 7)]
    #[case("\"7\"", 7)]
    #[case("\" 12 \"", 12)]
    fn decodes_numbers_and_numeric_strings(#[case] json: &str, #[case] expected: u64) {
        let id: EntityId = serde_json::from_str(json).expect("valid id");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("\"0\"")]
    #[case("\"shop-1\"")]
    #[case("-3")]
    fn rejects_zero_and_non_numeric_ids(#[case] json: &str) {
        let result = serde_json::from_str::<EntityId>(json);
        assert!(result.is_err(), "{json} must not decode");
    }

    #[rstest]
    fn display_matches_raw_value() {
        let id = EntityId::new(99).expect("non-zero id");
        assert_eq!(id.to_string(), "99");
    }
}
