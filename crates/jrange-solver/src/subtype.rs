//! Three-valued subtype queries.
//!
//! Hierarchy facts can be partial, so the lattice never answers a subtype
//! question with a bare `bool`. `check_subtype` returns `SubtypeResult`, and
//! callers pick the projection they need:
//!
//! - `is_subtype_of` (definitely a subtype) when dropping an implied member
//!   or collapsing a range
//! - `may_be_subtype_of` (not definitely unrelated) when deciding whether a
//!   cast can succeed
//!
//! ## Rules
//!
//! | Left | Right | Answer |
//! |------|-------|--------|
//! | any | `Object` (class) | `True` |
//! | `null` | any reference | `True` |
//! | class `A` | final class `F` | `A == F` |
//! | class `A` | class `B` | `B` in ancestry of `A`; `Unknown` if ancestry incomplete |
//! | array | `Object` / `Cloneable` / `Serializable` | `True` |
//! | `E1[]` | `E2[]` | `E1 <: E2` for references, inclusion for integer sets |
//! | `A1 & A2` | `B` | some `Ai <: B` |
//! | `A` | `B1 & B2` | `A <: Bi` for all `i` |
//! | range | any | compares by the top |

use crate::lattice::TypeLattice;
use crate::types::{TypeData, TypeId};
use jrange_common::Atom;
use jrange_common::limits::MAX_SUBTYPE_DEPTH;

/// Answer of a subtype query under possibly-incomplete hierarchy facts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubtypeResult {
    True,
    False,
    /// Facts needed to decide are missing.
    Unknown,
}

impl SubtypeResult {
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }

    #[inline]
    pub fn is_true(self) -> bool {
        self == Self::True
    }

    #[inline]
    pub fn is_false(self) -> bool {
        self == Self::False
    }

    /// Three-valued conjunction.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Three-valued disjunction.
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }
}

impl<'a> TypeLattice<'a> {
    /// Whether every type in `a` is a type in `b`.
    pub fn check_subtype(&self, a: TypeId, b: TypeId) -> SubtypeResult {
        self.check_subtype_at(a, b, 0)
    }

    /// `a` is definitely a subtype of `b`.
    #[inline]
    pub fn is_subtype_of(&self, a: TypeId, b: TypeId) -> bool {
        self.check_subtype(a, b).is_true()
    }

    /// `a` is not definitely unrelated to `b`.
    #[inline]
    pub fn may_be_subtype_of(&self, a: TypeId, b: TypeId) -> bool {
        !self.check_subtype(a, b).is_false()
    }

    fn check_subtype_at(&self, a: TypeId, b: TypeId, depth: u32) -> SubtypeResult {
        if a == b || b == TypeId::UNKNOWN || a == TypeId::ERROR {
            return SubtypeResult::True;
        }
        if a == TypeId::UNKNOWN || b == TypeId::ERROR {
            return SubtypeResult::False;
        }
        if depth >= MAX_SUBTYPE_DEPTH {
            return SubtypeResult::Unknown;
        }
        let depth = depth + 1;

        let da = self.interner.data(a);
        let db = self.interner.data(b);
        match (da, db) {
            (TypeData::Range { top, .. }, _) => self.check_subtype_at(top, b, depth),
            (_, TypeData::Range { top, .. }) => self.check_subtype_at(a, top, depth),

            (TypeData::Null, other) => SubtypeResult::from_bool(other.is_reference()),
            (_, TypeData::Null) => SubtypeResult::False,

            (TypeData::Integer { possible: pa, .. }, TypeData::Integer { possible: pb, .. }) => {
                let cone = pb.subtype_cone();
                if cone.contains(pa) {
                    SubtypeResult::True
                } else if !cone.intersects(pa) {
                    SubtypeResult::False
                } else {
                    SubtypeResult::Unknown
                }
            }

            (_, TypeData::Intersection(members)) => members
                .iter()
                .fold(SubtypeResult::True, |acc, &m| acc.and(self.check_subtype_at(a, m, depth))),
            (TypeData::Intersection(members), _) => members
                .iter()
                .fold(SubtypeResult::False, |acc, &m| acc.or(self.check_subtype_at(m, b, depth))),

            (TypeData::Class(ca), TypeData::Class(cb)) => self.class_subtype(ca, cb),
            (TypeData::Array(_), TypeData::Class(cb)) => {
                SubtypeResult::from_bool(self.is_array_supertype(cb))
            }
            (TypeData::Class(_), TypeData::Array(_)) => SubtypeResult::False,
            (TypeData::Array(ea), TypeData::Array(eb)) => self.array_element_subtype(ea, eb, depth),

            _ => SubtypeResult::False,
        }
    }

    fn array_element_subtype(&self, ea: TypeId, eb: TypeId, depth: u32) -> SubtypeResult {
        if eb == TypeId::UNKNOWN {
            return SubtypeResult::True;
        }
        match (self.interner.data(ea), self.interner.data(eb)) {
            (a, b) if a.is_reference() && b.is_reference() => self.check_subtype_at(ea, eb, depth),
            // Integer elements do not widen: `byte[]` is not a `short[]`.
            (TypeData::Integer { possible: pa, .. }, TypeData::Integer { possible: pb, .. }) => {
                if pb.contains(pa) {
                    SubtypeResult::True
                } else if !pb.intersects(pa) {
                    SubtypeResult::False
                } else {
                    SubtypeResult::Unknown
                }
            }
            (TypeData::Unknown, _) => SubtypeResult::Unknown,
            _ => SubtypeResult::from_bool(ea == eb),
        }
    }

    /// `Object`, `Cloneable` and `Serializable`: the nominal supertypes of
    /// every array.
    pub(crate) fn is_array_supertype(&self, class: Atom) -> bool {
        let names = self.interner.well_known();
        class == names.object || class == names.cloneable || class == names.serializable
    }

    /// Nominal subtype check between two classes.
    pub fn class_subtype(&self, a: Atom, b: Atom) -> SubtypeResult {
        let object = self.interner.well_known().object;
        if a == b || b == object {
            return SubtypeResult::True;
        }
        let ancestry = self.hierarchy.ancestry(a);
        if ancestry.contains(b) {
            return SubtypeResult::True;
        }
        let target = self.hierarchy.ancestry(b);
        if target.known && target.is_final {
            return SubtypeResult::False;
        }
        if ancestry.complete {
            return SubtypeResult::False;
        }
        self.note_incomplete(&ancestry);
        SubtypeResult::Unknown
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
