//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities are identified by a numeric key assigned at persistence time, so
/// the identifier is `None` until the repository has stored the record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;
}

/// Identity-based equality for two entities of the same concrete type.
///
/// Equal iff both identifiers are assigned and equal. When either side has no
/// identifier yet, the entities are equal only if they are the same instance.
/// Concrete entities implement `PartialEq` through this helper, which keeps
/// equality independent of mutable attribute state.
pub fn same_identity<E: Entity>(a: &E, b: &E) -> bool {
    match (a.id(), b.id()) {
        (Some(left), Some(right)) => left == right,
        _ => core::ptr::eq(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AccountId;

    struct Probe {
        id: Option<AccountId>,
        label: String,
    }

    impl Entity for Probe {
        type Id = AccountId;

        fn id(&self) -> Option<AccountId> {
            self.id
        }
    }

    fn probe(id: Option<i64>, label: &str) -> Probe {
        Probe {
            id: id.map(AccountId::from_raw),
            label: label.to_string(),
        }
    }

    #[test]
    fn entities_with_equal_ids_are_equal_regardless_of_state() {
        let a = probe(Some(7), "first");
        let b = probe(Some(7), "second");

        assert!(same_identity(&a, &b));
        assert_ne!(a.label, b.label);
    }

    #[test]
    fn entities_with_different_ids_are_not_equal() {
        let a = probe(Some(7), "x");
        let b = probe(Some(8), "x");

        assert!(!same_identity(&a, &b));
    }

    #[test]
    fn unassigned_ids_are_equal_only_for_the_same_instance() {
        let a = probe(None, "x");
        let b = probe(None, "x");

        assert!(same_identity(&a, &a));
        assert!(!same_identity(&a, &b));
    }

    #[test]
    fn assigned_and_unassigned_are_never_equal() {
        let a = probe(Some(7), "x");
        let b = probe(None, "x");

        assert!(!same_identity(&a, &b));
        assert!(!same_identity(&b, &a));
    }
}
