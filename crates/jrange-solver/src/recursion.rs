//! Guard for ancestry walks.
//!
//! Class facts are supplied from outside and are not trusted: a broken class
//! path can produce `A extends B` next to `B extends A`, or a chain deeper
//! than any real program. `HierarchyCache` walks supertypes recursively, so
//! each walk carries a `RecursionGuard` that refuses to re-enter a class
//! already on the current path, caps the path length and caps the number of
//! classes visited in total.

use jrange_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Limits for one walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// `MAX_HIERARCHY_DEPTH` levels, `MAX_ANCESTRY_NODES` visits.
    HierarchyWalk,
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::HierarchyWalk => limits::MAX_HIERARCHY_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::HierarchyWalk => limits::MAX_ANCESTRY_NODES,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The class is already on the current path.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

/// Path and budget of one ancestry walk.
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    path: FxHashSet<K>,
    depth: u32,
    visits: u32,
    profile: RecursionProfile,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self::with_profile(RecursionProfile::Custom {
            max_depth,
            max_iterations,
        })
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            path: FxHashSet::default(),
            depth: 0,
            visits: 0,
            profile,
        }
    }

    /// Push `key` onto the path. Only an `Entered` result must be paired
    /// with [`leave`](Self::leave).
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.visits = self.visits.saturating_add(1);
        if self.visits > self.profile.max_iterations() {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.profile.max_depth() {
            return RecursionResult::DepthExceeded;
        }
        if !self.path.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_on_path = self.path.remove(&key);
        debug_assert!(was_on_path, "leave() without a matching enter()");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_on_path(&self, key: &K) -> bool {
        self.path.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
