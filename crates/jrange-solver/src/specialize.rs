//! Specialization: the meet of two upper bounds.
//!
//! `specialize(A, B)` is the largest type-set contained in both `A` and `B`.
//! For reference types the members of both sides are pooled and reduced:
//!
//! 1. all arrays merge into one array of the intersected element types
//! 2. a member implied by another member is dropped (`Object` always is)
//! 3. incompatible survivors make the result empty
//!
//! What remains is a single class/array or an intersection-of-classes.

use crate::lattice::TypeLattice;
use crate::subtype::SubtypeResult;
use crate::types::{TypeData, TypeId, TypeKind, TypeList};
use jrange_common::Atom;
use tracing::trace;

impl<'a> TypeLattice<'a> {
    /// Meet of two type-sets.
    pub fn specialize(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == TypeId::ERROR || b == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if a == TypeId::UNKNOWN {
            return b;
        }
        if b == TypeId::UNKNOWN || a == b {
            return a;
        }
        if a == TypeId::NULL || b == TypeId::NULL {
            return match (self.interner.kind(a), self.interner.kind(b)) {
                (TypeKind::Reference, TypeKind::Reference) => TypeId::NULL,
                _ => TypeId::ERROR,
            };
        }

        match (self.interner.kind(a), self.interner.kind(b)) {
            (TypeKind::Reference, TypeKind::Reference) => {
                let a = self.upper_bound(a);
                let b = self.upper_bound(b);
                let result = self.specialize_references(a, b);
                trace!(a = a.0, b = b.0, result = result.0, "TypeLattice::specialize");
                result
            }
            (TypeKind::Integer, TypeKind::Integer) => self.intersect(a, b),
            _ => TypeId::ERROR,
        }
    }

    /// Members of a class/array/intersection type-set.
    pub(crate) fn members(&self, ty: TypeId) -> TypeList {
        match self.interner.data(ty) {
            TypeData::Intersection(members) => members,
            _ => std::iter::once(ty).collect(),
        }
    }

    fn specialize_references(&self, a: TypeId, b: TypeId) -> TypeId {
        let mut classes: Vec<(TypeId, Atom)> = Vec::new();
        let mut array: Option<TypeId> = None;

        for member in self.members(a).into_iter().chain(self.members(b)) {
            match self.interner.data(member) {
                TypeData::Class(atom) => {
                    if !classes.iter().any(|&(id, _)| id == member) {
                        classes.push((member, atom));
                    }
                }
                TypeData::Array(elem) => {
                    array = Some(match array {
                        None => member,
                        Some(prev) => {
                            let prev_elem = self.interner.array_element(prev).unwrap_or(TypeId::UNKNOWN);
                            let merged = self.intersect(prev_elem, elem);
                            if merged == TypeId::ERROR {
                                return TypeId::ERROR;
                            }
                            self.interner.array(merged)
                        }
                    });
                    if array == Some(TypeId::ERROR) {
                        return TypeId::ERROR;
                    }
                }
                _ => return TypeId::ERROR,
            }
        }

        if let Some(array) = array {
            // An array's only nominal supertypes are fixed by the VM.
            if classes.iter().all(|&(_, atom)| self.is_array_supertype(atom)) {
                return array;
            }
            return TypeId::ERROR;
        }

        // Drop every class implied by another.
        let survivors: Vec<(TypeId, Atom)> = classes
            .iter()
            .copied()
            .filter(|&(id, atom)| {
                !classes.iter().any(|&(other, other_atom)| {
                    other != id && self.class_subtype(other_atom, atom).is_true()
                })
            })
            .collect();
        if survivors.is_empty() {
            // Only a cyclic hierarchy makes every member imply another.
            return classes.first().map_or(TypeId::ERROR, |&(id, _)| id);
        }

        if let Some(&(final_id, final_atom)) = survivors
            .iter()
            .find(|&&(_, atom)| self.hierarchy.is_final(atom))
        {
            // Nothing but the final class itself can satisfy it; every other
            // survivor must at least possibly be one of its supertypes.
            for &(other, other_atom) in &survivors {
                if other != final_id && self.class_subtype(final_atom, other_atom) == SubtypeResult::False {
                    return TypeId::ERROR;
                }
            }
            return final_id;
        }

        for (i, &(_, x)) in survivors.iter().enumerate() {
            for &(_, y) in &survivors[i + 1..] {
                if self.unrelated_classes(x, y) {
                    return TypeId::ERROR;
                }
            }
        }

        self.interner.intersection(survivors.into_iter().map(|(id, _)| id))
    }

    /// Two non-interface classes with no subclass relation either way can
    /// share no instance.
    fn unrelated_classes(&self, x: Atom, y: Atom) -> bool {
        let ax = self.hierarchy.ancestry(x);
        let ay = self.hierarchy.ancestry(y);
        if !ax.known || !ay.known || ax.is_interface || ay.is_interface {
            return false;
        }
        self.class_subtype(x, y).is_false() && self.class_subtype(y, x).is_false()
    }
}

#[cfg(test)]
#[path = "../tests/specialize_tests.rs"]
mod tests;
