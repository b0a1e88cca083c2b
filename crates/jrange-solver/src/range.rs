//! Range construction.
//!
//! `create_range(bottom, top)` is the only place where a `Range` type-set is
//! checked for legality. The raw `TypeInterner::range` constructor only
//! normalizes trivial shapes.

use crate::lattice::TypeLattice;
use crate::subtype::SubtypeResult;
use crate::types::{TypeData, TypeId, TypeKind};
use tracing::trace;

impl<'a> TypeLattice<'a> {
    /// The type-sets `T` with `bottom <: T <: top`, or `ERROR` if there are
    /// none.
    pub fn create_range(&self, bottom: TypeId, top: TypeId) -> TypeId {
        if bottom == TypeId::ERROR || top == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if bottom == TypeId::NULL || bottom == TypeId::UNKNOWN {
            return top;
        }
        if top == TypeId::NULL {
            return TypeId::ERROR;
        }
        let top = if top == TypeId::UNKNOWN { TypeId::OBJECT } else { top };
        if bottom == top {
            return top;
        }
        if self.interner.kind(bottom) != TypeKind::Reference
            || self.interner.kind(top) != TypeKind::Reference
        {
            return TypeId::ERROR;
        }

        if let (TypeData::Array(eb), TypeData::Array(et)) =
            (self.interner.data(bottom), self.interner.data(top))
        {
            return self.create_array_range(bottom, top, eb, et);
        }

        let result = match self.check_subtype(bottom, top) {
            SubtypeResult::True if self.is_subtype_of(top, bottom) => top,
            SubtypeResult::True | SubtypeResult::Unknown => self.interner.range(bottom, top),
            SubtypeResult::False => TypeId::ERROR,
        };
        trace!(bottom = bottom.0, top = top.0, result = result.0, "TypeLattice::create_range");
        result
    }

    fn create_array_range(&self, bottom: TypeId, top: TypeId, eb: TypeId, et: TypeId) -> TypeId {
        if self.interner.kind(eb) == TypeKind::Reference && self.interner.kind(et) == TypeKind::Reference {
            let elem = self.create_range(eb, et);
            return self.interner.array(elem);
        }
        // Primitive element arrays do not widen.
        if self.is_subtype_of(bottom, top) {
            bottom
        } else {
            TypeId::ERROR
        }
    }
}

#[cfg(test)]
#[path = "../tests/range_tests.rs"]
mod tests;
