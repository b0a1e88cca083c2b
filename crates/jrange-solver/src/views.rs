//! Presentation views.
//!
//! Once propagation has narrowed a belief, the printer needs one concrete
//! type to declare. These views pick it; none of them narrows anything.

use crate::integer::IntKinds;
use crate::lattice::TypeLattice;
use crate::types::{TypeData, TypeId};
use jrange_common::interner::internal_name;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// =============================================================================
// Type views
// =============================================================================

impl<'a> TypeLattice<'a> {
    /// The most natural source type for `ty`.
    ///
    /// Integer sets pick from their hint mask by priority (boolean, int, char,
    /// short, byte); ranges pick their bottom; intersections their primary
    /// member; `null` reads as `Object`.
    pub fn hint(&self, ty: TypeId) -> TypeId {
        match self.interner.data(ty) {
            TypeData::Integer { possible, hint } => (hint & possible)
                .preferred()
                .or_else(|| possible.preferred())
                .and_then(TypeId::from_int_kind)
                .unwrap_or(TypeId::ERROR),
            TypeData::Range { bottom, .. } => self.hint(bottom),
            TypeData::Intersection(_) => self.primary_member(ty),
            TypeData::Array(elem) => self.interner.array(self.hint(elem)),
            TypeData::Null => TypeId::OBJECT,
            _ => ty,
        }
    }

    /// The type a compiler would statically assign to an expression of `ty`.
    pub fn canonic(&self, ty: TypeId) -> TypeId {
        match self.interner.data(ty) {
            TypeData::Integer { possible, .. } => possible
                .canonic()
                .and_then(TypeId::from_int_kind)
                .unwrap_or(TypeId::ERROR),
            TypeData::Range { bottom, .. } => self.canonic(bottom),
            TypeData::Intersection(_) => self.primary_member(ty),
            TypeData::Array(elem) => self.interner.array(self.canonic(elem)),
            TypeData::Null => TypeId::OBJECT,
            _ => ty,
        }
    }

    /// First non-interface member of an intersection, else its first member.
    pub fn primary_member(&self, ty: TypeId) -> TypeId {
        let members = self.members(ty);
        members
            .iter()
            .copied()
            .find(|&m| match self.interner.data(m) {
                TypeData::Array(_) => true,
                TypeData::Class(atom) => {
                    let ancestry = self.hierarchy.ancestry(atom);
                    ancestry.known && !ancestry.is_interface
                }
                _ => false,
            })
            .or_else(|| members.first().copied())
            .unwrap_or(ty)
    }

    /// Every type a value of `ty` could have been widened from.
    pub fn subtype_cone(&self, ty: TypeId) -> TypeId {
        match self.interner.data(ty) {
            TypeData::Integer { possible, hint } => {
                self.interner.integer(possible.subtype_cone(), hint)
            }
            TypeData::Range { top, .. } => top,
            _ => ty,
        }
    }

    /// Every type a value of `ty` could be widened to.
    pub fn supertype_cone(&self, ty: TypeId) -> TypeId {
        match self.interner.data(ty) {
            TypeData::Integer { possible, hint } => {
                self.interner.integer(possible.supertype_cone(), hint)
            }
            TypeData::Range { bottom, .. } => self.create_range(bottom, TypeId::OBJECT),
            data if data.is_reference() => self.create_range(ty, TypeId::OBJECT),
            _ => ty,
        }
    }

    /// Intermediate type needed to cast a value of `from` to `to`.
    ///
    /// Returns `Some(Object)` when the source language would reject the
    /// direct cast as provably failing, `None` when the cast is legal as is.
    pub fn cast_helper(&self, from: TypeId, to: TypeId) -> Option<TypeId> {
        let from = self.primary_member(self.upper_bound(from));
        let to = self.primary_member(self.upper_bound(to));
        if from == to || from == TypeId::NULL || to == TypeId::OBJECT || from == TypeId::OBJECT {
            return None;
        }

        let needs_object = match (self.interner.data(from), self.interner.data(to)) {
            (TypeData::Array(ef), TypeData::Array(et)) => {
                if self.interner.is_reference(ef) && self.interner.is_reference(et) {
                    return self.cast_helper(ef, et).map(|_| TypeId::OBJECT);
                }
                ef != et
            }
            (TypeData::Array(_), TypeData::Class(atom)) | (TypeData::Class(atom), TypeData::Array(_)) => {
                !self.is_array_supertype(atom)
            }
            (TypeData::Class(f), TypeData::Class(t)) => {
                if self.class_subtype(f, t).is_false() && self.class_subtype(t, f).is_false() {
                    let fa = self.hierarchy.ancestry(f);
                    let ta = self.hierarchy.ancestry(t);
                    // Only a non-final class against an interface may meet
                    // in an unseen subclass.
                    fa.is_final || ta.is_final || fa.is_interface == ta.is_interface
                } else {
                    false
                }
            }
            _ => false,
        };
        needs_object.then_some(TypeId::OBJECT)
    }
}

// =============================================================================
// Hint policy
// =============================================================================

/// A call site argument whose integer kind a `HintPolicy` may favour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgumentSite<'s> {
    /// Internal name of the declaring class.
    pub owner: Option<&'s str>,
    pub method: Option<&'s str>,
    pub descriptor: &'s str,
    pub index: usize,
}

/// Decides which integer kind to favour for a method argument.
pub trait HintPolicy {
    fn argument_hint(&self, site: &ArgumentSite<'_>) -> Option<IntKinds>;
}

/// No preferences: argument hints come from the descriptor alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHintPolicy;

impl HintPolicy for DefaultHintPolicy {
    fn argument_hint(&self, _site: &ArgumentSite<'_>) -> Option<IntKinds> {
        None
    }
}

type MethodKey = (String, String, String);

/// Favours `char` for library parameters declared `int` that carry
/// characters, such as `String.indexOf(int)`.
#[derive(Clone, Debug, Default)]
pub struct LibraryCharHints {
    params: FxHashMap<MethodKey, SmallVec<[usize; 2]>>,
}

impl LibraryCharHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform methods known to take characters as `int`.
    pub fn platform() -> Self {
        let mut hints = Self::new();
        for name in ["indexOf", "lastIndexOf"] {
            hints.add("java/lang/String", name, "(I)I", 0);
            hints.add("java/lang/String", name, "(II)I", 0);
        }
        hints.add("java/io/Writer", "write", "(I)V", 0);
        hints.add("java/io/PrintStream", "write", "(I)V", 0);
        hints
    }

    pub fn add(&mut self, owner: &str, method: &str, descriptor: &str, index: usize) {
        let params = self
            .params
            .entry((internal_name(owner).into_owned(), method.to_string(), descriptor.to_string()))
            .or_default();
        if !params.contains(&index) {
            params.push(index);
        }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl HintPolicy for LibraryCharHints {
    fn argument_hint(&self, site: &ArgumentSite<'_>) -> Option<IntKinds> {
        let (Some(owner), Some(method)) = (site.owner, site.method) else {
            return None;
        };
        let key = (owner.to_string(), method.to_string(), site.descriptor.to_string());
        self.params
            .get(&key)
            .filter(|params| params.contains(&site.index))
            .map(|_| IntKinds::CHAR)
    }
}

#[cfg(test)]
#[path = "../tests/views_tests.rs"]
mod tests;
