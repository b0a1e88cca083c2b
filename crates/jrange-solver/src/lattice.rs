//! The type-set lattice.
//!
//! `TypeLattice` is the per-analysis entry point. It borrows the shared
//! `TypeInterner` (through the `HierarchyCache`) and owns a diagnostic sink.
//! The algebra is split across files:
//!
//! - `subtype.rs`: three-valued subtype queries
//! - `specialize.rs`: meet of upper bounds
//! - `generalize.rs`: join of lower bounds
//! - `range.rs`: interval construction and legality
//!
//! and this file ties them together in [`TypeLattice::intersect`].
//!
//! ## Reference intersection
//!
//! Every reference type-set is read as an interval `[bottom, top]`; plain
//! classes, arrays and intersections have bottom `null`. Intersecting two
//! intervals tightens both ends:
//!
//! ```text
//! [b1, t1] ∩ [b2, t2] = [generalize(b1, b2), specialize(t1, t2)]
//! ```
//!
//! `null` is therefore absorbing for `specialize` and the identity for
//! `generalize`.

use crate::hierarchy::{Ancestry, HierarchyCache};
use crate::integer::meet_hints;
use crate::intern::TypeInterner;
use crate::options::SolverOptions;
use crate::types::{TypeData, TypeId};
use jrange_common::diagnostics::diagnostic_codes;
use jrange_common::{Atom, Diagnostic};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use tracing::{trace, warn};

pub struct TypeLattice<'a> {
    pub(crate) interner: &'a TypeInterner,
    pub(crate) hierarchy: &'a HierarchyCache<'a>,
    options: SolverOptions,
    diagnostics: RefCell<Vec<Diagnostic>>,
    reported: RefCell<FxHashSet<Atom>>,
}

impl<'a> TypeLattice<'a> {
    pub fn new(hierarchy: &'a HierarchyCache<'a>) -> Self {
        Self::with_options(hierarchy, SolverOptions::default())
    }

    pub fn with_options(hierarchy: &'a HierarchyCache<'a>, options: SolverOptions) -> Self {
        TypeLattice {
            interner: hierarchy.interner(),
            hierarchy,
            options,
            diagnostics: RefCell::new(Vec::new()),
            reported: RefCell::new(FxHashSet::default()),
        }
    }

    #[inline]
    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    #[inline]
    pub fn hierarchy(&self) -> &'a HierarchyCache<'a> {
        self.hierarchy
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Drain the diagnostics collected so far.
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Record, once per class, that a subtype answer was a guess.
    pub(crate) fn note_incomplete(&self, ancestry: &Ancestry) {
        let subject = ancestry.first_gap.unwrap_or(ancestry.class);
        if !self.reported.borrow_mut().insert(subject) {
            return;
        }
        let name = self.interner.resolve_name(subject);
        warn!(class = %name, truncated = ancestry.truncated, "incomplete class hierarchy");
        if !self.options.report_incomplete_hierarchy {
            return;
        }
        let diagnostic = if ancestry.truncated {
            let limit = self.hierarchy.max_depth().to_string();
            Diagnostic::from_code(diagnostic_codes::HIERARCHY_DEPTH_EXCEEDED, &[&*name, limit.as_str()])
        } else {
            Diagnostic::from_code(diagnostic_codes::INCOMPLETE_HIERARCHY, &[&*name])
        };
        self.report(diagnostic.with_subject(&*name));
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Interval view of a reference type-set: `(bottom, top)`.
    ///
    /// Non-reference type-sets are their own bounds.
    pub fn bounds(&self, ty: TypeId) -> (TypeId, TypeId) {
        match self.interner.data(ty) {
            TypeData::Range { bottom, top } => (bottom, top),
            TypeData::Null => (TypeId::NULL, TypeId::NULL),
            TypeData::Class(_) | TypeData::Array(_) | TypeData::Intersection(_) => {
                (TypeId::NULL, ty)
            }
            _ => (ty, ty),
        }
    }

    #[inline]
    pub fn upper_bound(&self, ty: TypeId) -> TypeId {
        self.bounds(ty).1
    }

    #[inline]
    pub fn lower_bound(&self, ty: TypeId) -> TypeId {
        self.bounds(ty).0
    }

    // =========================================================================
    // Intersection
    // =========================================================================

    /// Narrow `x` by `y`: the set of types in both.
    ///
    /// Commutative, idempotent and monotone. `ERROR` means the two
    /// constraints contradict each other.
    pub fn intersect(&self, x: TypeId, y: TypeId) -> TypeId {
        if x == TypeId::ERROR || y == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if x == TypeId::UNKNOWN {
            return y;
        }
        if y == TypeId::UNKNOWN || x == y {
            return x;
        }

        let result = match (self.interner.data(x), self.interner.data(y)) {
            (
                TypeData::Integer { possible: p1, hint: h1 },
                TypeData::Integer { possible: p2, hint: h2 },
            ) => {
                let possible = p1 & p2;
                self.interner.integer(possible, meet_hints(h1, h2, possible))
            }
            (dx, dy) if dx.is_reference() && dy.is_reference() => self.intersect_references(x, y),
            _ => TypeId::ERROR,
        };
        trace!(x = x.0, y = y.0, result = result.0, "TypeLattice::intersect");
        result
    }

    fn intersect_references(&self, x: TypeId, y: TypeId) -> TypeId {
        let (bottom_x, top_x) = self.bounds(x);
        let (bottom_y, top_y) = self.bounds(y);

        let top = self.specialize(top_x, top_y);
        if top == TypeId::ERROR {
            return TypeId::ERROR;
        }
        let bottom = self.generalize(bottom_x, bottom_y);
        if bottom == top {
            return top;
        }
        self.create_range(bottom, top)
    }
}

impl std::fmt::Debug for TypeLattice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeLattice")
            .field("options", &self.options)
            .field("diagnostics", &self.diagnostics.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/lattice_tests.rs"]
mod tests;
