//! Placeholder strategy

use crate::domain::EntityType;

/// Replacement token for `entity_type`, e.g. `[SSN]`
pub fn tag(entity_type: &EntityType) -> String {
    entity_type.placeholder()
}
