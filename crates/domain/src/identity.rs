//! Structural identity for domain objects.
//!
//! Domain objects are compared by the ordered list of components that
//! constitute their identity, not by memory location or by field-for-field
//! derive semantics. Each identity-bearing type declares its components
//! explicitly through [`DomainObject::identity_components`]; the kernel
//! functions [`identity_eq`] and [`identity_hash`] then apply uniform,
//! component-kind-specific comparison rules.

use std::any::Any;
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};
use common::AggregateId;
use uuid::Uuid;

/// Seed of the polynomial hash fold.
const HASH_SEED: u64 = 17;
/// Multiplier of the polynomial hash fold.
const HASH_MULTIPLIER: u64 = 23;

/// One value contributing to a domain object's structural identity.
///
/// The variants carry their own comparison rules:
/// - [`Text`](Self::Text) compares ordinally (byte-exact, not locale-aware)
/// - [`Moment`](Self::Moment) compares truncated to whole milliseconds;
///   sub-millisecond precision and zone metadata are ignored
/// - [`Composite`](Self::Composite) compares recursively, for value objects
///   embedded in other value objects
/// - [`Absent`](Self::Absent) equals only another absent component and
///   contributes `0` to the hash
#[derive(Debug, Clone)]
pub enum IdentityComponent {
    /// A missing component (the domain object has no value in this slot).
    Absent,
    Boolean(bool),
    Integer(i64),
    Text(String),
    Id(Uuid),
    Moment(DateTime<Utc>),
    /// The identity components of an embedded domain object.
    Composite(Vec<IdentityComponent>),
}

impl IdentityComponent {
    /// Compares two components under the kind-specific rules.
    ///
    /// Components of different kinds never match.
    pub fn matches(&self, other: &Self) -> bool {
        use IdentityComponent::*;
        match (self, other) {
            (Absent, Absent) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Id(a), Id(b)) => a == b,
            (Moment(a), Moment(b)) => a.timestamp_millis() == b.timestamp_millis(),
            (Composite(a), Composite(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.matches(y))
            }
            _ => false,
        }
    }

    /// Hash of a single component, consistent with [`matches`](Self::matches):
    /// components that match always produce the same hash.
    fn component_hash(&self) -> u64 {
        use IdentityComponent::*;
        match self {
            Absent => 0,
            Boolean(v) => hash_value(v),
            Integer(v) => hash_value(v),
            Text(v) => hash_value(&v.as_bytes()),
            Id(v) => hash_value(v.as_bytes()),
            // Hash the millisecond truncation so moments that compare equal
            // hash equal regardless of sub-millisecond precision.
            Moment(v) => hash_value(&v.timestamp_millis()),
            Composite(components) => fold_components(components),
        }
    }
}

fn hash_value<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn fold_components(components: &[IdentityComponent]) -> u64 {
    components.iter().fold(HASH_SEED, |acc, component| {
        acc.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(component.component_hash())
    })
}

impl From<bool> for IdentityComponent {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for IdentityComponent {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for IdentityComponent {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for IdentityComponent {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for IdentityComponent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for IdentityComponent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Uuid> for IdentityComponent {
    fn from(value: Uuid) -> Self {
        Self::Id(value)
    }
}

impl From<AggregateId> for IdentityComponent {
    fn from(value: AggregateId) -> Self {
        Self::Id(value.as_uuid())
    }
}

impl From<DateTime<Utc>> for IdentityComponent {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Moment(value)
    }
}

impl From<Vec<IdentityComponent>> for IdentityComponent {
    fn from(value: Vec<IdentityComponent>) -> Self {
        Self::Composite(value)
    }
}

impl<T: Into<IdentityComponent>> From<Option<T>> for IdentityComponent {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// An object having meaning in the domain.
///
/// Implementors declare the ordered list of values that constitute their
/// identity. Two domain objects are structurally equal when they have the
/// same runtime type and pairwise-matching components; see [`identity_eq`].
pub trait DomainObject: Any + Send + Sync {
    /// Returns all components which constitute identity, in a fixed order.
    fn identity_components(&self) -> Vec<IdentityComponent>;
}

/// Structural equality over domain objects.
///
/// Returns `false` when either side is absent (never panics), `true` for
/// the same reference, `false` for differing runtime types, and otherwise
/// compares identity components pairwise in order. A component-count
/// mismatch yields `false`; it should not occur for two values of the same
/// type.
pub fn identity_eq(a: Option<&dyn DomainObject>, b: Option<&dyn DomainObject>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    // Type identity first: zero-sized values of different types can share
    // an address, so the same-reference shortcut alone is not conclusive.
    let a_any: &dyn Any = a;
    let b_any: &dyn Any = b;
    if a_any.type_id() != b_any.type_id() {
        return false;
    }
    if std::ptr::addr_eq(a as *const dyn DomainObject, b as *const dyn DomainObject) {
        return true;
    }
    let lhs = a.identity_components();
    let rhs = b.identity_components();
    lhs.len() == rhs.len() && lhs.iter().zip(&rhs).all(|(x, y)| x.matches(y))
}

/// Structural hash over a domain object's identity components.
///
/// Folds component hashes with a polynomial accumulator (seed 17,
/// multiplier 23, wrapping). Objects equal under [`identity_eq`] always
/// hash equal; the converse is not guaranteed.
pub fn identity_hash(object: &dyn DomainObject) -> u64 {
    fold_components(&object.identity_components())
}
