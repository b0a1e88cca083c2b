//! Type-set representation.
//!
//! Every value handled by the lattice is a `TypeId`: a `u32` handle into the
//! `TypeInterner`. The structure behind a handle is a `TypeData`, a closed
//! enum of all type-set variants. Because the interner hash-conses `TypeData`,
//! two structurally equal type-sets always share a `TypeId`, and `==` on ids
//! is set equality.
//!
//! ## Reading a reference type-set
//!
//! | Variant | Denotes |
//! |---------|---------|
//! | `Null` | `{ null }` |
//! | `Class(C)` | `C` and every subtype of `C` |
//! | `Array(E)` | arrays whose element type-set lies in `E` |
//! | `Intersection([A, B])` | types that are subtypes of both `A` and `B` |
//! | `Range { bottom, top }` | types `T` with `bottom <: T <: top` |
//!
//! Non-range reference variants are ranges whose bottom is `null`; the
//! interner never materializes `Range { bottom: NULL, .. }`.

use crate::integer::IntKinds;
use jrange_common::Atom;
use jrange_common::limits::INTERSECTION_INLINE_CAPACITY;
use smallvec::SmallVec;

/// Member list of an intersection type-set.
pub type TypeList = SmallVec<[TypeId; INTERSECTION_INLINE_CAPACITY]>;

// =============================================================================
// TypeId
// =============================================================================

/// Handle to an interned type-set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The universal set: nothing is known yet.
    pub const UNKNOWN: TypeId = TypeId(0);
    /// The empty set: the constraints contradict each other.
    pub const ERROR: TypeId = TypeId(1);

    pub const VOID: TypeId = TypeId(2);
    pub const LONG: TypeId = TypeId(3);
    pub const FLOAT: TypeId = TypeId(4);
    pub const DOUBLE: TypeId = TypeId(5);

    pub const NULL: TypeId = TypeId(6);

    pub const BOOLEAN: TypeId = TypeId(7);
    pub const BYTE: TypeId = TypeId(8);
    pub const CHAR: TypeId = TypeId(9);
    pub const SHORT: TypeId = TypeId(10);
    pub const INT: TypeId = TypeId(11);
    /// `{int, char, short, byte}`: anything a numeric int slot may hold.
    pub const UINT: TypeId = TypeId(12);
    /// `{boolean, byte, char, short, int}`: anything an int slot may hold.
    pub const ANY_INT: TypeId = TypeId(13);

    pub const OBJECT: TypeId = TypeId(14);
    pub const CLONEABLE: TypeId = TypeId(15);
    pub const SERIALIZABLE: TypeId = TypeId(16);
    pub const STRING: TypeId = TypeId(17);

    /// First id handed out for types interned on demand.
    pub const FIRST_DYNAMIC: u32 = 18;

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The canonical singleton for one integer kind.
    pub fn from_int_kind(kind: IntKinds) -> Option<TypeId> {
        const SINGLETONS: [(IntKinds, TypeId); 5] = [
            (IntKinds::BOOLEAN, TypeId::BOOLEAN),
            (IntKinds::BYTE, TypeId::BYTE),
            (IntKinds::CHAR, TypeId::CHAR),
            (IntKinds::SHORT, TypeId::SHORT),
            (IntKinds::INT, TypeId::INT),
        ];
        SINGLETONS
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
    }
}

// =============================================================================
// TypeData
// =============================================================================

/// Primitive kinds the bytecode already distinguishes exactly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

/// Structure of an interned type-set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Unknown,
    Error,
    Primitive(PrimitiveKind),
    /// Integer kinds the value may have, plus the kinds usage has favoured.
    Integer {
        possible: IntKinds,
        hint: IntKinds,
    },
    Null,
    Class(Atom),
    Array(TypeId),
    Intersection(TypeList),
    Range {
        bottom: TypeId,
        top: TypeId,
    },
}

/// Coarse classification used to pick an algebra branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Universal,
    Empty,
    Primitive,
    Integer,
    Reference,
}

impl TypeData {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeData::Unknown => TypeKind::Universal,
            TypeData::Error => TypeKind::Empty,
            TypeData::Primitive(_) => TypeKind::Primitive,
            TypeData::Integer { .. } => TypeKind::Integer,
            TypeData::Null
            | TypeData::Class(_)
            | TypeData::Array(_)
            | TypeData::Intersection(_)
            | TypeData::Range { .. } => TypeKind::Reference,
        }
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        self.kind() == TypeKind::Reference
    }
}
