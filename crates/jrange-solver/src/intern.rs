//! Type interning.
//!
//! `TypeInterner` is the caller-owned hash-consing table for one decompilation
//! run. Every constructor builds the structural `TypeData` key, normalizes it,
//! and either returns the id already stored for that key or appends a new
//! entry. Entries live as long as the interner; there is no eviction.
//!
//! The interner is `Sync`: the key table is a sharded `DashMap` and each
//! insert happens under that key's shard lock, so concurrent analyses of
//! different methods agree on every id.
//!
//! Normalizations:
//! - integer hints are masked to the possible set (empty mask → possible set)
//! - `array(ERROR)` / `array(VOID)` → `ERROR`
//! - `array(Range(b, t))` → `Range(array(b), array(t))`
//! - intersections are flattened, deduplicated and sorted; one member
//!   collapses to that member
//! - `range(NULL, t)` → `t`, `range(x, x)` → `x`

use crate::integer::IntKinds;
use crate::method::{MethodContext, MethodType, MethodTypeId};
use crate::types::{PrimitiveKind, TypeData, TypeId, TypeKind, TypeList};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use jrange_common::limits::TYPE_TABLE_INITIAL_CAPACITY;
use jrange_common::{Atom, ShardedInterner};
use rustc_hash::FxBuildHasher;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

pub(crate) const OBJECT_NAME: &str = "java/lang/Object";
pub(crate) const CLONEABLE_NAME: &str = "java/lang/Cloneable";
pub(crate) const SERIALIZABLE_NAME: &str = "java/io/Serializable";
pub(crate) const STRING_NAME: &str = "java/lang/String";

/// Atoms of the classes the lattice reasons about intrinsically.
#[derive(Copy, Clone, Debug)]
pub struct WellKnownNames {
    pub object: Atom,
    pub cloneable: Atom,
    pub serializable: Atom,
    pub string: Atom,
}

type MethodKey = (Atom, MethodContext);

pub struct TypeInterner {
    names: ShardedInterner,
    well_known: WellKnownNames,
    types: RwLock<Vec<TypeData>>,
    lookup: DashMap<TypeData, TypeId, FxBuildHasher>,
    methods: RwLock<Vec<Arc<MethodType>>>,
    method_lookup: DashMap<MethodKey, MethodTypeId, FxBuildHasher>,
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("types", &self.len())
            .finish_non_exhaustive()
    }
}

impl TypeInterner {
    /// Create an interner with the well-known types registered at their
    /// fixed `TypeId` constants.
    pub fn new() -> Self {
        let names = ShardedInterner::new();
        names.intern_common();
        let well_known = WellKnownNames {
            object: names.intern(OBJECT_NAME),
            cloneable: names.intern(CLONEABLE_NAME),
            serializable: names.intern(SERIALIZABLE_NAME),
            string: names.intern(STRING_NAME),
        };

        let interner = TypeInterner {
            names,
            well_known,
            types: RwLock::new(Vec::with_capacity(TYPE_TABLE_INITIAL_CAPACITY)),
            lookup: DashMap::with_hasher(FxBuildHasher),
            methods: RwLock::new(Vec::new()),
            method_lookup: DashMap::with_hasher(FxBuildHasher),
        };
        interner.register_well_known();
        interner
    }

    fn register_well_known(&self) {
        let fixed = [
            (TypeId::UNKNOWN, TypeData::Unknown),
            (TypeId::ERROR, TypeData::Error),
            (TypeId::VOID, TypeData::Primitive(PrimitiveKind::Void)),
            (TypeId::LONG, TypeData::Primitive(PrimitiveKind::Long)),
            (TypeId::FLOAT, TypeData::Primitive(PrimitiveKind::Float)),
            (TypeId::DOUBLE, TypeData::Primitive(PrimitiveKind::Double)),
            (TypeId::NULL, TypeData::Null),
            (TypeId::BOOLEAN, Self::int_data(IntKinds::BOOLEAN, IntKinds::BOOLEAN)),
            (TypeId::BYTE, Self::int_data(IntKinds::BYTE, IntKinds::BYTE)),
            (TypeId::CHAR, Self::int_data(IntKinds::CHAR, IntKinds::CHAR)),
            (TypeId::SHORT, Self::int_data(IntKinds::SHORT, IntKinds::SHORT)),
            (TypeId::INT, Self::int_data(IntKinds::INT, IntKinds::INT)),
            (TypeId::UINT, Self::int_data(IntKinds::NUMERIC, IntKinds::INT)),
            (TypeId::ANY_INT, Self::int_data(IntKinds::all(), IntKinds::INT)),
            (TypeId::OBJECT, TypeData::Class(self.well_known.object)),
            (TypeId::CLONEABLE, TypeData::Class(self.well_known.cloneable)),
            (TypeId::SERIALIZABLE, TypeData::Class(self.well_known.serializable)),
            (TypeId::STRING, TypeData::Class(self.well_known.string)),
        ];
        for (expected, data) in fixed {
            let id = self.intern(data);
            debug_assert_eq!(id, expected, "well-known type registered out of order");
        }
        debug_assert_eq!(self.len(), TypeId::FIRST_DYNAMIC as usize);
    }

    fn int_data(possible: IntKinds, hint: IntKinds) -> TypeData {
        TypeData::Integer { possible, hint }
    }

    /// Intern a normalized key. Only the constructors below call this.
    fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.lookup.get(&data) {
            return *id;
        }
        match self.lookup.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                trace!(type_id = id.0, data = ?entry.key(), "TypeInterner::intern");
                entry.insert(id);
                id
            }
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Structure behind an id, if the id belongs to this interner.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).cloned()
    }

    /// Structure behind an id; foreign ids read as the empty set.
    pub fn data(&self, id: TypeId) -> TypeData {
        self.lookup(id).unwrap_or(TypeData::Error)
    }

    pub fn kind(&self, id: TypeId) -> TypeKind {
        match id {
            TypeId::UNKNOWN => TypeKind::Universal,
            TypeId::ERROR => TypeKind::Empty,
            _ => self.data(id).kind(),
        }
    }

    #[inline]
    pub fn is_reference(&self, id: TypeId) -> bool {
        self.kind(id) == TypeKind::Reference
    }

    /// Number of interned type-sets.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn well_known(&self) -> WellKnownNames {
        self.well_known
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Intern a class name. Dotted source names are accepted and stored in
    /// internal (`java/lang/Object`) form.
    pub fn intern_name(&self, name: &str) -> Atom {
        self.names.intern_class(name)
    }

    pub fn resolve_name(&self, atom: Atom) -> Arc<str> {
        self.names.resolve(atom)
    }

    /// Internal name of a class type-set.
    pub fn class_name(&self, id: TypeId) -> Option<Arc<str>> {
        self.class_atom(id).map(|atom| self.resolve_name(atom))
    }

    pub fn class_atom(&self, id: TypeId) -> Option<Atom> {
        match self.data(id) {
            TypeData::Class(atom) => Some(atom),
            _ => None,
        }
    }

    /// Element of an array type-set.
    pub fn array_element(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Array(elem) => Some(elem),
            _ => None,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// The nominal type `name` (and its subtypes).
    pub fn class(&self, name: &str) -> TypeId {
        self.class_from_atom(self.intern_name(name))
    }

    pub fn class_from_atom(&self, atom: Atom) -> TypeId {
        self.intern(TypeData::Class(atom))
    }

    /// Array of `elem`.
    pub fn array(&self, elem: TypeId) -> TypeId {
        match self.data(elem) {
            TypeData::Error | TypeData::Primitive(PrimitiveKind::Void) => TypeId::ERROR,
            TypeData::Range { bottom, top } => {
                let bottom = self.array(bottom);
                let top = self.array(top);
                self.range(bottom, top)
            }
            _ => self.intern(TypeData::Array(elem)),
        }
    }

    /// Integer-set with the given possible kinds and hint mask.
    pub fn integer(&self, possible: IntKinds, hint: IntKinds) -> TypeId {
        if possible.is_empty() {
            return TypeId::ERROR;
        }
        let hint = if possible.is_single() {
            possible
        } else {
            let masked = hint & possible;
            if masked.is_empty() { possible } else { masked }
        };
        self.intern(TypeData::Integer { possible, hint })
    }

    /// Type-set of an integer literal pushed by the bytecode.
    pub fn int_constant(&self, value: i32) -> TypeId {
        self.integer(IntKinds::for_constant(value), IntKinds::INT)
    }

    /// Intersection of class/array members.
    ///
    /// Nested intersections are flattened. The caller is responsible for
    /// having removed members implied by others; this only canonicalizes.
    pub fn intersection(&self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat = TypeList::new();
        for member in members {
            match self.data(member) {
                TypeData::Intersection(inner) => flat.extend(inner),
                TypeData::Error => return TypeId::ERROR,
                TypeData::Unknown => {}
                _ => flat.push(member),
            }
        }
        flat.sort_by_cached_key(|id| self.member_sort_key(*id));
        flat.dedup();
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeData::Intersection(flat)),
        }
    }

    fn member_sort_key(&self, id: TypeId) -> (u8, Arc<str>, u32) {
        match self.data(id) {
            TypeData::Class(atom) => (1, self.resolve_name(atom), id.0),
            _ => (0, Arc::from(""), id.0),
        }
    }

    /// Interval `[bottom, top]`. Legality is the lattice's business; this
    /// only normalizes the trivial shapes.
    pub fn range(&self, bottom: TypeId, top: TypeId) -> TypeId {
        if bottom == TypeId::ERROR || top == TypeId::ERROR {
            return TypeId::ERROR;
        }
        if bottom == TypeId::NULL || bottom == TypeId::UNKNOWN || bottom == top {
            return top;
        }
        self.intern(TypeData::Range { bottom, top })
    }

    // =========================================================================
    // Method types
    // =========================================================================

    /// Intern the method type for `descriptor` in `context`.
    ///
    /// The descriptor is parsed before the method table is touched, so a
    /// malformed descriptor never receives an id.
    pub fn method(
        &self,
        descriptor: &str,
        context: MethodContext,
    ) -> Result<MethodTypeId, crate::DescriptorError> {
        let atom = self.names.intern(descriptor);
        let key = (atom, context);
        if let Some(id) = self.method_lookup.get(&key) {
            return Ok(*id);
        }
        let (params, return_type) = crate::descriptor::parse_method_descriptor(self, descriptor)?;
        let id = match self.method_lookup.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut methods = self.methods.write().unwrap_or_else(PoisonError::into_inner);
                let id = MethodTypeId(methods.len() as u32);
                methods.push(Arc::new(MethodType {
                    descriptor: atom,
                    context,
                    params,
                    return_type,
                }));
                trace!(method_id = id.0, descriptor, "TypeInterner::method");
                entry.insert(id);
                id
            }
        };
        Ok(id)
    }

    pub fn method_type(&self, id: MethodTypeId) -> Option<Arc<MethodType>> {
        let methods = self.methods.read().unwrap_or_else(PoisonError::into_inner);
        methods.get(id.0 as usize).cloned()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
