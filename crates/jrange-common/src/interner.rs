//! Class-name pool.
//!
//! Hierarchy walks and the type interner's structural keys compare class
//! names constantly. Names are pooled once per analysis run and handed out as
//! `Atom`s, so comparing two names is comparing two `u32`s.
//!
//! Names are stored in internal form (`java/lang/Object`). Source-form input
//! (`java.lang.Object`) is converted on the way in.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A pooled class or descriptor name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty name.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Platform classes that show up in nearly every analysed method.
const COMMON_CLASS_NAMES: &[&str] = &[
    "java/lang/Object",
    "java/lang/Cloneable",
    "java/io/Serializable",
    "java/lang/String",
    "java/lang/Class",
    "java/lang/Throwable",
    "java/lang/Exception",
    "java/lang/RuntimeException",
    "java/lang/Error",
    "java/lang/Comparable",
    "java/lang/CharSequence",
    "java/lang/Runnable",
    "java/lang/AutoCloseable",
    "java/io/Closeable",
    "java/lang/Number",
    "java/lang/Integer",
    "java/lang/Long",
    "java/lang/Character",
    "java/lang/Boolean",
    "java/lang/StringBuffer",
    "java/lang/StringBuilder",
    "java/lang/System",
    "java/util/List",
    "java/util/Map",
    "java/util/Collection",
    "java/util/Iterator",
];

/// Internal form of a class name: `java.lang.String` becomes
/// `java/lang/String`. Already-internal names are returned unchanged.
pub fn internal_name(name: &str) -> std::borrow::Cow<'_, str> {
    if name.contains('.') {
        std::borrow::Cow::Owned(name.replace('.', "/"))
    } else {
        std::borrow::Cow::Borrowed(name)
    }
}

#[derive(Default)]
struct Shard {
    atoms: FxHashMap<Arc<str>, Atom>,
    names: Vec<Arc<str>>,
}

/// Concurrent name pool.
///
/// The low `SHARD_BITS` of an atom select the shard and the rest index into
/// it. `intern` holds the shard's write lock across lookup and insert, so
/// concurrent callers interning the same name agree on its atom.
pub struct ShardedInterner {
    shards: [RwLock<Shard>; SHARD_COUNT],
}

impl ShardedInterner {
    pub fn new() -> Self {
        let shards: [RwLock<Shard>; SHARD_COUNT] = std::array::from_fn(|_| RwLock::default());
        let interner = ShardedInterner { shards };
        // Slot 0 of shard 0 is `Atom::NONE`.
        {
            let mut shard = interner.write_shard(0);
            let empty: Arc<str> = Arc::from("");
            shard.names.push(Arc::clone(&empty));
            shard.atoms.insert(empty, Atom::NONE);
        }
        interner
    }

    // Poisoning is ignored: a shard is written only after every check in
    // `intern` has passed.
    fn write_shard(&self, idx: usize) -> RwLockWriteGuard<'_, Shard> {
        self.shards[idx].write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_shard(&self, idx: usize) -> RwLockReadGuard<'_, Shard> {
        self.shards[idx].read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pool `name` exactly as given.
    pub fn intern(&self, name: &str) -> Atom {
        if name.is_empty() {
            return Atom::NONE;
        }
        let shard_idx = Self::shard_for(name);
        let mut shard = self.write_shard(shard_idx);
        if let Some(&atom) = shard.atoms.get(name) {
            return atom;
        }
        let local = shard.names.len() as u32;
        if local > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }
        let atom = Atom((local << SHARD_BITS) | shard_idx as u32);
        let owned: Arc<str> = Arc::from(name);
        shard.names.push(Arc::clone(&owned));
        shard.atoms.insert(owned, atom);
        atom
    }

    /// Pool a class name given in source or internal form.
    pub fn intern_class(&self, name: &str) -> Atom {
        self.intern(&internal_name(name))
    }

    /// Atom of an already-pooled name, without inserting.
    pub fn get(&self, name: &str) -> Option<Atom> {
        if name.is_empty() {
            return Some(Atom::NONE);
        }
        self.read_shard(Self::shard_for(name)).atoms.get(name).copied()
    }

    /// Name behind `atom`; the empty string for an atom this pool never issued.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let shard_idx = (atom.0 & SHARD_MASK) as usize;
        let local = (atom.0 >> SHARD_BITS) as usize;
        self.read_shard(shard_idx).names.get(local).cloned()
    }

    /// Number of pooled names, counting the empty name.
    pub fn len(&self) -> usize {
        (0..SHARD_COUNT).map(|idx| self.read_shard(idx).names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pool the platform classes most analyses touch.
    pub fn intern_common(&self) {
        for name in COMMON_CLASS_NAMES {
            self.intern(name);
        }
    }

    #[inline]
    fn shard_for(name: &str) -> usize {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
