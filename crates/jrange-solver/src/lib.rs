//! Type-Set Lattice Solver
//!
//! Recovers source-level types for values whose bytecode representation is
//! ambiguous (an `int` slot that may hold a `boolean`, a `null` with no class).
//! Every type is a *set* of candidate types; constraints from every use site
//! are intersected until one type, or a minimal range of them, remains.
//!
//! - **`TypeInterner`**: hash-consed type-sets, O(1) equality via `TypeId`
//! - **`HierarchyCache`**: memoized, three-valued view of external class facts
//! - **`TypeLattice`**: intersect / specialize / generalize / range algebra
//! - **`Propagator`**: worklist driver over an external `TypeNetwork`
//!
//! ```
//! use jrange_solver::{HierarchyCache, MemoryHierarchy, TypeId, TypeInterner, TypeLattice};
//!
//! let interner = TypeInterner::new();
//! let facts = MemoryHierarchy::with_platform_core();
//! let cache = HierarchyCache::new(&interner, &facts);
//! let lattice = TypeLattice::new(&cache);
//!
//! // A value used both as an int slot and as a `char` argument is a `char`.
//! assert_eq!(lattice.intersect(TypeId::ANY_INT, TypeId::CHAR), TypeId::CHAR);
//! ```
pub mod descriptor;
mod format;
mod generalize;
pub mod hierarchy;
pub mod integer;
mod intern;
pub mod lattice;
pub mod method;
pub mod options;
pub mod propagate;
mod range;
pub mod recursion;
mod specialize;
pub mod subtype;
pub mod types;
pub mod views;

pub use descriptor::{DescriptorError, return_type_from_descriptor, type_from_descriptor};
pub use format::TypeFormatter;
pub use hierarchy::{Ancestry, ClassFacts, ClassHierarchy, HierarchyCache, MemoryHierarchy};
pub use integer::IntKinds;
pub use intern::{TypeInterner, WellKnownNames};
pub use lattice::TypeLattice;
pub use method::{MethodContext, MethodType, MethodTypeId};
pub use options::SolverOptions;
pub use propagate::{NodeId, NodeList, PropagationOutcome, Propagator, TypeConflict, TypeNetwork};
pub use subtype::SubtypeResult;
pub use types::{PrimitiveKind, TypeData, TypeId, TypeKind, TypeList};
pub use views::{ArgumentSite, DefaultHintPolicy, HintPolicy, LibraryCharHints};
