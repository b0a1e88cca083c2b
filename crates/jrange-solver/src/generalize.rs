//! Generalization: the join of two lower bounds.
//!
//! `generalize(A, B)` is the smallest type-set containing both `A` and `B`.
//! Outside the fast paths it is computed from candidates: every supertype of
//! `A` that `B` is definitely a subtype of, reduced to the most specific ones.
//! Candidates that are only *possibly* supertypes of `B` are discarded, so an
//! incomplete hierarchy widens the answer toward `Object` rather than
//! guessing.

use crate::lattice::TypeLattice;
use crate::types::{TypeData, TypeId, TypeKind};
use jrange_common::Atom;
use tracing::trace;

impl<'a> TypeLattice<'a> {
    /// Join of two type-sets.
    pub fn generalize(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == TypeId::UNKNOWN || b == TypeId::UNKNOWN {
            return TypeId::UNKNOWN;
        }
        if a == TypeId::ERROR || a == TypeId::NULL {
            return b;
        }
        if b == TypeId::ERROR || b == TypeId::NULL || a == b {
            return a;
        }

        match (self.interner.data(a), self.interner.data(b)) {
            (
                TypeData::Integer { possible: pa, hint: ha },
                TypeData::Integer { possible: pb, hint: hb },
            ) => self.interner.integer(pa | pb, ha | hb),
            (da, db) if da.is_reference() && db.is_reference() => {
                let a = self.upper_bound(a);
                let b = self.upper_bound(b);
                let result = self.generalize_references(a, b);
                trace!(a = a.0, b = b.0, result = result.0, "TypeLattice::generalize");
                result
            }
            _ => TypeId::UNKNOWN,
        }
    }

    fn generalize_references(&self, a: TypeId, b: TypeId) -> TypeId {
        if self.is_subtype_of(a, b) {
            return b;
        }
        if self.is_subtype_of(b, a) {
            return a;
        }

        if let (TypeData::Array(ea), TypeData::Array(eb)) =
            (self.interner.data(a), self.interner.data(b))
        {
            if self.interner.kind(ea) == TypeKind::Reference
                && self.interner.kind(eb) == TypeKind::Reference
            {
                return self.interner.array(self.generalize(ea, eb));
            }
        }

        let mut candidates: Vec<TypeId> = Vec::new();
        for member in self.members(a) {
            for candidate in self.supertype_candidates(member) {
                if !candidates.contains(&candidate) && self.is_subtype_of(b, candidate) {
                    candidates.push(candidate);
                }
            }
        }

        let minimal: Vec<TypeId> = candidates
            .iter()
            .copied()
            .filter(|&c| {
                !candidates
                    .iter()
                    .any(|&other| other != c && self.is_subtype_of(other, c))
            })
            .collect();

        match minimal.len() {
            0 => TypeId::OBJECT,
            1 => minimal[0],
            _ => self.interner.intersection(minimal),
        }
    }

    /// `member` and all its nominal supertypes.
    fn supertype_candidates(&self, member: TypeId) -> Vec<TypeId> {
        match self.interner.data(member) {
            TypeData::Class(atom) => self
                .hierarchy
                .ancestry(atom)
                .supertypes
                .iter()
                .map(|&sup: &Atom| self.interner.class_from_atom(sup))
                .collect(),
            TypeData::Array(_) => vec![
                member,
                TypeId::CLONEABLE,
                TypeId::SERIALIZABLE,
                TypeId::OBJECT,
            ],
            _ => vec![TypeId::OBJECT],
        }
    }
}

#[cfg(test)]
#[path = "../tests/generalize_tests.rs"]
mod tests;
