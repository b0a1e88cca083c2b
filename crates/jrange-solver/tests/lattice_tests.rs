use super::*;
use crate::hierarchy::MemoryHierarchy;
use crate::integer::IntKinds;

fn zoo() -> MemoryHierarchy {
    let facts = MemoryHierarchy::with_platform_core();
    facts.add_interface("zoo/Pet", &[]);
    facts.add_class("zoo/Animal", Some("java/lang/Object"), &[]);
    facts.add_class("zoo/Dog", Some("zoo/Animal"), &["zoo/Pet"]);
    facts.add_final_class("zoo/Cat", Some("zoo/Animal"), &[]);
    facts
}

struct Zoo {
    animal: TypeId,
    dog: TypeId,
    cat: TypeId,
    pet: TypeId,
    runnable: TypeId,
    closeable: TypeId,
}

impl Zoo {
    fn new(interner: &TypeInterner) -> Self {
        Zoo {
            animal: interner.class("zoo/Animal"),
            dog: interner.class("zoo/Dog"),
            cat: interner.class("zoo/Cat"),
            pet: interner.class("zoo/Pet"),
            runnable: interner.class("java/lang/Runnable"),
            closeable: interner.class("java/io/Closeable"),
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_any_int_slot_narrowed_by_char() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    let all = interner.integer(IntKinds::all(), IntKinds::all());
    assert_eq!(lattice.intersect(all, TypeId::CHAR), TypeId::CHAR);
    assert_eq!(lattice.intersect(TypeId::ANY_INT, TypeId::CHAR), TypeId::CHAR);
}

#[test]
fn test_subclass_narrows_superclass() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    assert_eq!(lattice.intersect(z.dog, z.animal), z.dog);
    assert_eq!(lattice.intersect(z.animal, z.dog), z.dog);
}

#[test]
fn test_unrelated_interfaces_form_intersection() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    let both = lattice.intersect(z.runnable, z.closeable);
    assert_eq!(both, interner.intersection([z.runnable, z.closeable]));
    assert!(matches!(interner.data(both), TypeData::Intersection(ref m) if m.len() == 2));
}

#[test]
fn test_final_unrelated_class_is_empty() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    assert_eq!(lattice.intersect(z.dog, z.cat), TypeId::ERROR);
    assert_eq!(lattice.intersect(z.cat, z.pet), TypeId::ERROR);
}

#[test]
fn test_successive_narrowing_converges() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    let b1 = lattice.intersect(TypeId::UNKNOWN, z.animal);
    assert_eq!(b1, z.animal);
    let b2 = lattice.intersect(b1, z.pet);
    assert_eq!(b2, interner.intersection([z.animal, z.pet]));
    let b3 = lattice.intersect(b2, z.dog);
    assert_eq!(b3, z.dog);
    let b4 = lattice.intersect(b3, z.dog);
    assert_eq!(b4, b3);
}

// =============================================================================
// Absorption and kinds
// =============================================================================

#[test]
fn test_absorbing_elements() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    for ty in [z.dog, TypeId::INT, TypeId::LONG, TypeId::NULL, TypeId::UNKNOWN] {
        assert_eq!(lattice.intersect(ty, TypeId::UNKNOWN), ty);
        assert_eq!(lattice.intersect(TypeId::UNKNOWN, ty), ty);
        assert_eq!(lattice.intersect(ty, TypeId::ERROR), TypeId::ERROR);
        assert_eq!(lattice.intersect(TypeId::ERROR, ty), TypeId::ERROR);
    }
}

#[test]
fn test_mismatched_kinds_are_empty() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    assert_eq!(lattice.intersect(TypeId::LONG, TypeId::DOUBLE), TypeId::ERROR);
    assert_eq!(lattice.intersect(TypeId::LONG, TypeId::INT), TypeId::ERROR);
    assert_eq!(lattice.intersect(TypeId::INT, TypeId::OBJECT), TypeId::ERROR);
    assert_eq!(lattice.intersect(TypeId::NULL, TypeId::ANY_INT), TypeId::ERROR);
    assert_eq!(lattice.intersect(TypeId::BOOLEAN, TypeId::UINT), TypeId::ERROR);
}

#[test]
fn test_null_narrows_every_reference() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);
    let dogs = interner.array(z.dog);

    for ty in [z.dog, z.cat, TypeId::OBJECT, dogs, interner.intersection([z.runnable, z.closeable])] {
        assert_eq!(lattice.intersect(TypeId::NULL, ty), TypeId::NULL);
    }
    // A range excludes null: its bottom is a real class.
    let range = lattice.create_range(z.dog, z.animal);
    assert_eq!(lattice.intersect(range, TypeId::NULL), TypeId::ERROR);
}

#[test]
fn test_integer_hints_are_combined() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    let char_hinted = interner.integer(IntKinds::NUMERIC, IntKinds::CHAR);
    let narrowed = lattice.intersect(char_hinted, interner.int_constant(65));
    assert_eq!(
        interner.data(narrowed),
        TypeData::Integer {
            possible: IntKinds::NUMERIC,
            hint: IntKinds::INT | IntKinds::CHAR,
        }
    );

    let shorts = interner.integer(IntKinds::SHORT | IntKinds::BYTE, IntKinds::SHORT);
    assert_eq!(lattice.intersect(shorts, TypeId::CHAR), TypeId::ERROR);
}

#[test]
fn test_competing_hints_settle() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    let char_hinted = interner.integer(IntKinds::NUMERIC, IntKinds::CHAR);
    let once = lattice.intersect(TypeId::UINT, char_hinted);
    let again = lattice.intersect(once, TypeId::UINT);
    let thrice = lattice.intersect(again, char_hinted);

    assert_eq!(again, once);
    assert_eq!(thrice, once);
    assert_eq!(
        interner.data(once),
        TypeData::Integer {
            possible: IntKinds::NUMERIC,
            hint: IntKinds::INT | IntKinds::CHAR,
        }
    );
}

// =============================================================================
// Ranges through intersect
// =============================================================================

#[test]
fn test_range_bounds_tighten() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);

    let dog_or_super = lattice.supertype_cone(z.dog);
    assert_eq!(lattice.bounds(dog_or_super), (z.dog, TypeId::OBJECT));

    let narrowed = lattice.intersect(dog_or_super, z.animal);
    assert_eq!(lattice.bounds(narrowed), (z.dog, z.animal));

    // Cat is below Animal but not above Dog.
    assert_eq!(lattice.intersect(narrowed, z.cat), TypeId::ERROR);
    // Dog is both the bottom and within the top.
    assert_eq!(lattice.intersect(narrowed, z.dog), z.dog);
}

// =============================================================================
// Algebraic properties
// =============================================================================

fn sample(interner: &TypeInterner, lattice: &TypeLattice<'_>, z: &Zoo) -> Vec<TypeId> {
    vec![
        TypeId::UNKNOWN,
        TypeId::ERROR,
        TypeId::NULL,
        TypeId::OBJECT,
        TypeId::STRING,
        TypeId::SERIALIZABLE,
        TypeId::LONG,
        TypeId::BOOLEAN,
        TypeId::CHAR,
        TypeId::UINT,
        TypeId::ANY_INT,
        z.animal,
        z.dog,
        z.cat,
        z.pet,
        z.runnable,
        z.closeable,
        interner.integer(IntKinds::NUMERIC, IntKinds::CHAR),
        interner.integer(IntKinds::CHAR | IntKinds::SHORT, IntKinds::SHORT),
        interner.integer(IntKinds::all(), IntKinds::BOOLEAN),
        interner.int_constant(65),
        interner.array(TypeId::INT),
        interner.array(z.dog),
        interner.array(z.animal),
        lattice.create_range(z.dog, z.animal),
    ]
}

#[test]
fn test_intersect_is_commutative_and_idempotent() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);
    let types = sample(&interner, &lattice, &z);

    for &x in &types {
        assert_eq!(lattice.intersect(x, x), x);
        for &y in &types {
            assert_eq!(
                lattice.intersect(x, y),
                lattice.intersect(y, x),
                "intersect not commutative for {x:?} and {y:?}"
            );
        }
    }
}

#[test]
fn test_intersect_only_narrows() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let z = Zoo::new(&interner);
    let types = sample(&interner, &lattice, &z);

    for &x in &types {
        for &y in &types {
            let r = lattice.intersect(x, y);
            assert!(lattice.is_subtype_of(r, x), "{r:?} escapes {x:?}");
            assert!(lattice.is_subtype_of(r, y), "{r:?} escapes {y:?}");
            // Narrowing again by either side is a no-op.
            assert_eq!(lattice.intersect(r, x), r, "re-narrowing {r:?} by {x:?}");
            assert_eq!(lattice.intersect(r, y), r, "re-narrowing {r:?} by {y:?}");
        }
    }
}

#[test]
fn test_diagnostics_are_drained() {
    let interner = TypeInterner::new();
    let facts = zoo();
    facts.add_class("app/Widget", Some("lib/Missing"), &[]);
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let widget = interner.class("app/Widget");
    let z = Zoo::new(&interner);

    // Widget might extend Animal through the missing superclass.
    assert_eq!(
        lattice.intersect(widget, z.animal),
        interner.intersection([widget, z.animal])
    );
    assert_eq!(lattice.diagnostic_count(), 1);
    let drained = lattice.take_diagnostics();
    assert_eq!(drained[0].subject.as_deref(), Some("lib/Missing"));
    assert_eq!(lattice.diagnostic_count(), 0);
}
