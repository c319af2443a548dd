use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Unique identifier for a fragment.
///
/// Generated as a random UUID at creation when the caller does not supply
/// one; immutable thereafter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(Uuid);

impl FragmentId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidFragmentId(e.to_string()))
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FragmentId({})", self.0)
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the owning principal.
///
/// The embedding application authenticates the principal and hands the core
/// an already-opaque id (e.g. a hashed email). The core never interprets it
/// beyond requiring it to be non-empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an opaque principal identifier. Fails if it is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyOwnerId);
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(FragmentId::generate(), FragmentId::generate());
    }

    #[test]
    fn fragment_id_string_round_trip() {
        let id = FragmentId::generate();
        let parsed = FragmentId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn malformed_fragment_id_is_rejected() {
        let err = FragmentId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, TypeError::InvalidFragmentId(_)));
    }

    #[test]
    fn fragment_id_serde_round_trip() {
        let id = FragmentId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: FragmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn empty_owner_id_is_rejected() {
        assert_eq!(OwnerId::new("").unwrap_err(), TypeError::EmptyOwnerId);
    }

    #[test]
    fn owner_id_is_opaque() {
        let owner = OwnerId::new("0a1b2c3d").unwrap();
        assert_eq!(owner.as_str(), "0a1b2c3d");
        assert_eq!(owner.to_string(), "0a1b2c3d");
    }
}
