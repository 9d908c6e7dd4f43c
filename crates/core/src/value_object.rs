//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. They are
/// constructed only through validating constructors, so holding one means the
/// value already passed validation.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
