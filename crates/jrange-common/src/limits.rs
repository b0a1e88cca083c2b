//! Centralized limits and thresholds for the lattice.
//!
//! These values are the defaults behind `SolverOptions` in `jrange-solver`;
//! callers that need different bounds override them there rather than
//! editing the constants.

// =============================================================================
// Hierarchy Walks
// =============================================================================

/// Maximum number of superclass/interface edges followed from one class.
///
/// Real class hierarchies are shallow (the platform library rarely exceeds a
/// depth of ten), so hitting this limit means the hierarchy facts contain a
/// cycle the collaborator failed to reject, or adversarial input. The walk
/// stops and the ancestry is marked incomplete.
pub const MAX_HIERARCHY_DEPTH: u32 = 64;

/// Upper bound on classes visited while collecting one ancestry set.
pub const MAX_ANCESTRY_NODES: u32 = 4_096;

// =============================================================================
// Structural Recursion
// =============================================================================

/// Maximum nesting followed by subtype checks over arrays and intersections.
///
/// The JVM caps array dimensions at 255; one extra level leaves room for the
/// intersection wrapper around the outermost component.
pub const MAX_SUBTYPE_DEPTH: u32 = 256;

// =============================================================================
// Propagation
// =============================================================================

/// Maximum node evaluations in one propagation run.
///
/// Every evaluation either narrows a belief or drains the worklist, and a
/// belief can only narrow a bounded number of times, so in practice a run
/// finishes after a small multiple of the node count. The limit guards against
/// a `TypeNetwork` implementation whose `pull_up`/`push_down` are not
/// monotone.
pub const MAX_PROPAGATION_STEPS: u32 = 100_000;

// =============================================================================
// Capacity
// =============================================================================

/// Inline capacity for intersection member lists.
///
/// Intersections almost always combine one class with one or two interfaces.
pub const INTERSECTION_INLINE_CAPACITY: usize = 4;

/// Initial capacity of the type table.
pub const TYPE_TABLE_INITIAL_CAPACITY: usize = 1024;
