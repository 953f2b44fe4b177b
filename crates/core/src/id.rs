//! Unique identifiers for Brig entities.
//!
//! Identifiers are [`domain-key`](https://crates.io/crates/domain-key) `Uuid<D>`
//! wrappers, so an instance id cannot be mixed up with any other UUID.
//! They are `Copy`, serialize as UUID strings and support `v4()`, `nil()`
//! and `parse(&str)`.

use domain_key::define_uuid;

// Re-export for downstream parse error handling
pub use domain_key::UuidParseError;

define_uuid!(pub InstanceIdDomain => InstanceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_id_v4_creates_non_nil_uuid() {
        let id = InstanceId::v4();
        assert!(!id.is_nil());
    }

    #[test]
    fn instance_id_parse_roundtrips_display() {
        let id = InstanceId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn instance_id_parse_rejects_garbage() {
        assert!(InstanceId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn instance_id_serializes_as_string() {
        let id = InstanceId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
    }
}
