//! Class-hierarchy facts and the memoized ancestry cache.
//!
//! The lattice never owns class metadata. It asks a `ClassHierarchy`
//! implementation (the bytecode reader's class store, or `MemoryHierarchy` in
//! tests) five questions per class and memoizes the answers as one
//! `Ancestry` record per class in a `HierarchyCache`.
//!
//! An ancestry is the reflexive-transitive closure of superclass and interface
//! edges. `java/lang/Object` is an implicit ancestor of everything. Missing
//! classes, classes flagged as incomplete, cycles and over-deep chains all make
//! the ancestry *incomplete*: subtype answers that would need the missing part
//! become `Unknown` rather than `False`.

use crate::intern::TypeInterner;
use crate::options::SolverOptions;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use dashmap::DashMap;
use indexmap::IndexSet;
use jrange_common::Atom;
use jrange_common::interner::internal_name;
use jrange_common::limits::MAX_ANCESTRY_NODES;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// Collaborator contract
// =============================================================================

/// Read-only class metadata.
///
/// Names are in internal form (`java/lang/String`).
pub trait ClassHierarchy: Send + Sync {
    /// Whether facts for `name` are available at all.
    fn contains(&self, name: &str) -> bool;
    /// Direct superclass. `None` for `java/lang/Object`, interfaces and
    /// unknown classes.
    fn superclass_of(&self, name: &str) -> Option<String>;
    /// Directly implemented (or, for interfaces, extended) interfaces.
    fn interfaces_of(&self, name: &str) -> Vec<String>;
    fn is_interface(&self, name: &str) -> bool;
    fn is_final(&self, name: &str) -> bool;
    /// `false` when the loader only guessed part of this class's supertypes.
    fn hierarchy_is_complete(&self, name: &str) -> bool;
}

/// Facts about one class, as stored by `MemoryHierarchy`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassFacts {
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub is_interface: bool,
    pub is_final: bool,
    pub complete: bool,
}

/// In-memory `ClassHierarchy`.
///
/// Names may be given in dotted or internal form; they are stored internal.
#[derive(Debug, Default)]
pub struct MemoryHierarchy {
    classes: DashMap<String, ClassFacts, FxBuildHasher>,
}

impl MemoryHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hierarchy pre-populated with the core platform classes the lattice
    /// and the library hint tables refer to.
    pub fn with_platform_core() -> Self {
        let hierarchy = Self::new();
        hierarchy.add_class("java/lang/Object", None, &[]);

        for iface in [
            "java/lang/Cloneable",
            "java/io/Serializable",
            "java/lang/Comparable",
            "java/lang/CharSequence",
            "java/lang/Runnable",
            "java/lang/AutoCloseable",
            "java/lang/Appendable",
            "java/io/Flushable",
        ] {
            hierarchy.add_interface(iface, &[]);
        }
        hierarchy.add_interface("java/io/Closeable", &["java/lang/AutoCloseable"]);

        let value_ifaces = ["java/io/Serializable", "java/lang/Comparable"];
        hierarchy.add_final_class(
            "java/lang/String",
            Some("java/lang/Object"),
            &["java/io/Serializable", "java/lang/Comparable", "java/lang/CharSequence"],
        );
        hierarchy.add_class("java/lang/Number", Some("java/lang/Object"), &["java/io/Serializable"]);
        hierarchy.add_final_class("java/lang/Integer", Some("java/lang/Number"), &["java/lang/Comparable"]);
        hierarchy.add_final_class("java/lang/Long", Some("java/lang/Number"), &["java/lang/Comparable"]);
        hierarchy.add_final_class("java/lang/Character", Some("java/lang/Object"), &value_ifaces);
        hierarchy.add_final_class("java/lang/Boolean", Some("java/lang/Object"), &value_ifaces);
        hierarchy.add_final_class("java/lang/Class", Some("java/lang/Object"), &["java/io/Serializable"]);

        hierarchy.add_class("java/lang/Throwable", Some("java/lang/Object"), &["java/io/Serializable"]);
        hierarchy.add_class("java/lang/Exception", Some("java/lang/Throwable"), &[]);
        hierarchy.add_class("java/lang/RuntimeException", Some("java/lang/Exception"), &[]);
        hierarchy.add_class("java/lang/Error", Some("java/lang/Throwable"), &[]);

        hierarchy.add_class("java/lang/Thread", Some("java/lang/Object"), &["java/lang/Runnable"]);
        hierarchy.add_class(
            "java/io/Writer",
            Some("java/lang/Object"),
            &["java/lang/Appendable", "java/io/Closeable", "java/io/Flushable"],
        );
        hierarchy.add_class("java/io/InputStream", Some("java/lang/Object"), &["java/io/Closeable"]);
        hierarchy
    }

    pub fn insert(&self, name: &str, facts: ClassFacts) {
        self.classes.insert(internal_name(name).into_owned(), facts);
    }

    fn build(superclass: Option<&str>, interfaces: &[&str]) -> ClassFacts {
        ClassFacts {
            superclass: superclass.map(|s| internal_name(s).into_owned()),
            interfaces: interfaces.iter().map(|s| internal_name(s).into_owned()).collect(),
            is_interface: false,
            is_final: false,
            complete: true,
        }
    }

    pub fn add_class(&self, name: &str, superclass: Option<&str>, interfaces: &[&str]) {
        self.insert(name, Self::build(superclass, interfaces));
    }

    pub fn add_final_class(&self, name: &str, superclass: Option<&str>, interfaces: &[&str]) {
        let mut facts = Self::build(superclass, interfaces);
        facts.is_final = true;
        self.insert(name, facts);
    }

    pub fn add_interface(&self, name: &str, extends: &[&str]) {
        let mut facts = Self::build(None, extends);
        facts.is_interface = true;
        self.insert(name, facts);
    }

    /// Flag a class whose supertypes were only partially loaded.
    pub fn mark_incomplete(&self, name: &str) {
        if let Some(mut facts) = self.classes.get_mut(internal_name(name).as_ref()) {
            facts.complete = false;
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn with_facts<T>(&self, name: &str, f: impl FnOnce(&ClassFacts) -> T) -> Option<T> {
        self.classes.get(name).map(|facts| f(&facts))
    }
}

impl ClassHierarchy for MemoryHierarchy {
    fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    fn superclass_of(&self, name: &str) -> Option<String> {
        self.with_facts(name, |f| f.superclass.clone()).flatten()
    }

    fn interfaces_of(&self, name: &str) -> Vec<String> {
        self.with_facts(name, |f| f.interfaces.clone())
            .unwrap_or_default()
    }

    fn is_interface(&self, name: &str) -> bool {
        self.with_facts(name, |f| f.is_interface).unwrap_or(false)
    }

    fn is_final(&self, name: &str) -> bool {
        self.with_facts(name, |f| f.is_final).unwrap_or(false)
    }

    fn hierarchy_is_complete(&self, name: &str) -> bool {
        self.with_facts(name, |f| f.complete).unwrap_or(false)
    }
}

// =============================================================================
// Ancestry
// =============================================================================

pub type AtomSet = IndexSet<Atom, FxBuildHasher>;

/// Memoized supertype closure of one class.
#[derive(Clone, Debug)]
pub struct Ancestry {
    pub class: Atom,
    /// Facts for the class itself were available.
    pub known: bool,
    pub is_interface: bool,
    pub is_final: bool,
    /// Every class on every path to `Object` is known and flagged complete.
    pub complete: bool,
    /// The walk hit a cycle or a depth/node limit.
    pub truncated: bool,
    /// The class itself, then its ancestors in walk order; always ends in
    /// `Object` (or is `[Object]`).
    pub supertypes: AtomSet,
    /// Direct superclass (or implicit `Object`) followed by direct interfaces.
    pub direct: SmallVec<[Atom; 4]>,
    /// First class encountered whose facts are missing or incomplete.
    pub first_gap: Option<Atom>,
}

impl Ancestry {
    #[inline]
    pub fn contains(&self, atom: Atom) -> bool {
        self.supertypes.contains(&atom)
    }

    fn stub(class: Atom, object: Atom, truncated: bool) -> Self {
        let mut supertypes = AtomSet::default();
        supertypes.insert(class);
        supertypes.insert(object);
        Ancestry {
            class,
            known: false,
            is_interface: false,
            is_final: false,
            complete: false,
            truncated,
            supertypes,
            direct: SmallVec::new(),
            first_gap: Some(class),
        }
    }
}

// =============================================================================
// HierarchyCache
// =============================================================================

/// Memoizing view of a `ClassHierarchy`, shared by every lattice of a run.
pub struct HierarchyCache<'a> {
    interner: &'a TypeInterner,
    facts: &'a dyn ClassHierarchy,
    profile: RecursionProfile,
    ancestry: DashMap<Atom, Arc<Ancestry>, FxBuildHasher>,
}

impl<'a> HierarchyCache<'a> {
    pub fn new(interner: &'a TypeInterner, facts: &'a dyn ClassHierarchy) -> Self {
        HierarchyCache {
            interner,
            facts,
            profile: RecursionProfile::HierarchyWalk,
            ancestry: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// A cache whose walks stop at `options.max_hierarchy_depth`.
    pub fn with_options(
        interner: &'a TypeInterner,
        facts: &'a dyn ClassHierarchy,
        options: &SolverOptions,
    ) -> Self {
        Self::new(interner, facts).with_max_depth(options.max_hierarchy_depth)
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.profile = RecursionProfile::Custom {
            max_depth,
            max_iterations: MAX_ANCESTRY_NODES,
        };
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.profile.max_depth()
    }

    #[inline]
    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    pub fn facts(&self) -> &'a dyn ClassHierarchy {
        self.facts
    }

    /// Number of memoized ancestries.
    pub fn len(&self) -> usize {
        self.ancestry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestry.is_empty()
    }

    /// Supertype closure of `class`, computed on first request.
    pub fn ancestry(&self, class: Atom) -> Arc<Ancestry> {
        if let Some(found) = self.ancestry.get(&class) {
            return Arc::clone(&found);
        }
        let mut guard = RecursionGuard::with_profile(self.profile);
        self.walk(class, &mut guard)
    }

    pub fn is_interface(&self, class: Atom) -> bool {
        self.ancestry(class).is_interface
    }

    pub fn is_final(&self, class: Atom) -> bool {
        self.ancestry(class).is_final
    }

    pub fn is_known(&self, class: Atom) -> bool {
        self.ancestry(class).known
    }

    fn walk(&self, class: Atom, guard: &mut RecursionGuard<Atom>) -> Arc<Ancestry> {
        if let Some(found) = self.ancestry.get(&class) {
            return Arc::clone(&found);
        }
        let object = self.interner.well_known().object;
        let is_root = guard.depth() == 0;
        match guard.enter(class) {
            RecursionResult::Entered => {}
            denied => {
                trace!(class = class.0, reason = ?denied, "HierarchyCache::walk denied");
                return Arc::new(Ancestry::stub(class, object, true));
            }
        }

        let computed = Arc::new(self.compute(class, object, guard));
        guard.leave(class);

        // A truncation below the root came from the root's budget, not from
        // this class; a direct query may still see the whole chain.
        if computed.truncated && !is_root {
            return computed;
        }

        // Insert without recursing: the shard lock is held only for the
        // lookup-or-insert itself.
        let stored = Arc::clone(&self.ancestry.entry(class).or_insert(computed));
        debug!(
            class = %self.interner.resolve_name(class),
            supertypes = stored.supertypes.len(),
            complete = stored.complete,
            "HierarchyCache: ancestry computed"
        );
        stored
    }

    fn compute(&self, class: Atom, object: Atom, guard: &mut RecursionGuard<Atom>) -> Ancestry {
        let name = self.interner.resolve_name(class);
        if class == object {
            let mut supertypes = AtomSet::default();
            supertypes.insert(object);
            return Ancestry {
                class,
                known: true,
                is_interface: false,
                is_final: false,
                complete: true,
                truncated: false,
                supertypes,
                direct: SmallVec::new(),
                first_gap: None,
            };
        }
        if !self.facts.contains(&name) {
            return Ancestry::stub(class, object, false);
        }

        let is_interface = self.facts.is_interface(&name);
        let is_final = self.facts.is_final(&name);
        let mut complete = self.facts.hierarchy_is_complete(&name);
        let mut first_gap = if complete { None } else { Some(class) };
        let mut truncated = false;

        let mut direct: SmallVec<[Atom; 4]> = SmallVec::new();
        match self.facts.superclass_of(&name) {
            Some(sup) if !sup.is_empty() => direct.push(self.interner.intern_name(&sup)),
            _ => direct.push(object),
        }
        for iface in self.facts.interfaces_of(&name) {
            let atom = self.interner.intern_name(&iface);
            if !direct.contains(&atom) {
                direct.push(atom);
            }
        }

        let mut supertypes = AtomSet::default();
        supertypes.insert(class);
        for &sup in &direct {
            let parent = self.walk(sup, guard);
            supertypes.extend(parent.supertypes.iter().copied());
            complete &= parent.complete;
            truncated |= parent.truncated;
            if first_gap.is_none() {
                first_gap = parent.first_gap;
            }
        }
        supertypes.insert(object);

        Ancestry {
            class,
            known: true,
            is_interface,
            is_final,
            complete: complete && !truncated,
            truncated,
            supertypes,
            direct,
            first_gap,
        }
    }
}

impl std::fmt::Debug for HierarchyCache<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyCache")
            .field("profile", &self.profile)
            .field("memoized", &self.ancestry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
