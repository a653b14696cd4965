//! PHI entity type identifier
//!
//! Entity types are configuration-defined categories such as `SSN` or
//! `DATE_OF_BIRTH`. They are stored upper-case and compared by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PHI category newtype wrapper
///
/// Names are normalized to upper case and may only contain ASCII letters,
/// digits and underscores.
///
/// # Examples
///
/// ```
/// use phi_redactor::domain::EntityType;
/// use std::str::FromStr;
///
/// let ssn = EntityType::from_str("ssn").unwrap();
/// assert_eq!(ssn.as_str(), "SSN");
/// assert_eq!(ssn.placeholder(), "[SSN]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityType(String);

impl EntityType {
    /// Creates a new EntityType from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(EntityType)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into().trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err("Entity type cannot be empty".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!(
                "Entity type '{name}' may only contain letters, digits and underscores"
            ));
        }
        Ok(Self(name))
    }

    /// Entity type from a compile-time constant that is already upper-case
    pub(crate) fn builtin(name: &'static str) -> Self {
        debug_assert!(Self::new(name).map(|t| t.0 == name).unwrap_or(false));
        Self(name.to_string())
    }

    /// Returns the entity type name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder token used by the replace strategy
    pub fn placeholder(&self) -> String {
        format!("[{}]", self.0)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.0
    }
}

impl AsRef<str> for EntityType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_normalizes_case() {
        let t = EntityType::new(" date_of_birth ").unwrap();
        assert_eq!(t.as_str(), "DATE_OF_BIRTH");
        assert_eq!(t.to_string(), "DATE_OF_BIRTH");
    }

    #[test]
    fn test_entity_type_rejects_empty_and_symbols() {
        assert!(EntityType::new("").is_err());
        assert!(EntityType::new("   ").is_err());
        assert!(EntityType::new("SSN-9").is_err());
        assert!(EntityType::new("[SSN]").is_err());
    }

    #[test]
    fn test_entity_type_ordering_is_by_name() {
        let a = EntityType::new("ADDRESS").unwrap();
        let b = EntityType::new("DATE").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_entity_type_serde() {
        let t: EntityType = serde_json::from_str("\"mrn\"").unwrap();
        assert_eq!(t.as_str(), "MRN");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"MRN\"");
        assert!(serde_json::from_str::<EntityType>("\"bad type\"").is_err());
    }
}
