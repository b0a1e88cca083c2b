//! Method-signature types.
//!
//! A `MethodType` is the decoded form of a method descriptor in a calling
//! context. It is not a member of the lattice: it only supplies the
//! constraints a call pushes onto its arguments and result.

use crate::lattice::TypeLattice;
use crate::types::{TypeData, TypeId};
use crate::views::{ArgumentSite, HintPolicy};
use jrange_common::Atom;

/// Handle to an interned method type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodTypeId(pub u32);

/// Where a descriptor was seen. Two identical descriptors on different
/// owners intern to different method types so hint policies can tell them
/// apart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MethodContext {
    /// Declaring class.
    pub owner: Option<TypeId>,
    /// Method name.
    pub name: Option<Atom>,
}

impl MethodContext {
    pub fn new(owner: TypeId, name: Atom) -> Self {
        MethodContext {
            owner: Some(owner),
            name: Some(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodType {
    pub descriptor: Atom,
    pub context: MethodContext,
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
}

impl MethodType {
    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn returns_void(&self) -> bool {
        self.return_type == TypeId::VOID
    }

    /// Constraint pushed onto argument `index` of a call.
    ///
    /// The argument may be anything assignable to the parameter: the
    /// parameter's subtype cone. For integer parameters the hint mask is
    /// replaced by the policy's preference, if it has one.
    pub fn argument_constraint(
        &self,
        index: usize,
        lattice: &TypeLattice<'_>,
        policy: &dyn HintPolicy,
    ) -> Option<TypeId> {
        let param = *self.params.get(index)?;
        let cone = lattice.subtype_cone(param);
        let TypeData::Integer { possible, .. } = lattice.interner().data(cone) else {
            return Some(cone);
        };

        let interner = lattice.interner();
        let owner = self.context.owner.and_then(|owner| interner.class_name(owner));
        let method = self.context.name.map(|name| interner.resolve_name(name));
        let descriptor = interner.resolve_name(self.descriptor);
        let site = ArgumentSite {
            owner: owner.as_deref(),
            method: method.as_deref(),
            descriptor: &descriptor,
            index,
        };
        Some(match policy.argument_hint(&site) {
            Some(hint) if possible.intersects(hint) => interner.integer(possible, hint),
            _ => cone,
        })
    }
}
