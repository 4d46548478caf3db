//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// value objects with the same values are interchangeable. Contrast with
/// [`crate::Entity`], where identity is the key and attribute state may
/// change over time.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
