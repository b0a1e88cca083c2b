use super::*;
use crate::hierarchy::{HierarchyCache, MemoryHierarchy};
use crate::intern::TypeInterner;

fn zoo() -> MemoryHierarchy {
    let facts = MemoryHierarchy::with_platform_core();
    facts.add_interface("zoo/Pet", &[]);
    facts.add_class("zoo/Animal", Some("java/lang/Object"), &[]);
    facts.add_class("zoo/Dog", Some("zoo/Animal"), &["zoo/Pet"]);
    facts.add_final_class("zoo/Cat", Some("zoo/Animal"), &[]);
    facts
}

// =============================================================================
// hint / canonic
// =============================================================================

#[test]
fn test_hint_prefers_hinted_kind() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    assert_eq!(lattice.hint(TypeId::ANY_INT), TypeId::INT);
    assert_eq!(lattice.hint(TypeId::UINT), TypeId::INT);
    assert_eq!(lattice.hint(TypeId::CHAR), TypeId::CHAR);
    let char_hinted = interner.integer(IntKinds::CHAR | IntKinds::SHORT, IntKinds::CHAR);
    assert_eq!(lattice.hint(char_hinted), TypeId::CHAR);
    let bool_or_int = interner.integer(IntKinds::BOOLEAN | IntKinds::INT, IntKinds::empty());
    assert_eq!(lattice.hint(bool_or_int), TypeId::BOOLEAN);
    let two_hints = interner.integer(IntKinds::NUMERIC, IntKinds::INT | IntKinds::CHAR);
    assert_eq!(lattice.hint(two_hints), TypeId::INT);
}

#[test]
fn test_hint_of_references() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let dog = interner.class("zoo/Dog");
    let animal = interner.class("zoo/Animal");

    assert_eq!(lattice.hint(dog), dog);
    assert_eq!(lattice.hint(TypeId::NULL), TypeId::OBJECT);
    assert_eq!(lattice.hint(lattice.create_range(dog, animal)), dog);
    assert_eq!(
        lattice.hint(interner.array(TypeId::ANY_INT)),
        interner.array(TypeId::INT)
    );
    assert_eq!(lattice.hint(TypeId::LONG), TypeId::LONG);
}

#[test]
fn test_canonic_promotes() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);

    let short_or_byte = interner.integer(IntKinds::SHORT | IntKinds::BYTE, IntKinds::BYTE);
    assert_eq!(lattice.canonic(short_or_byte), TypeId::SHORT);
    let char_or_byte = interner.integer(IntKinds::CHAR | IntKinds::BYTE, IntKinds::CHAR);
    assert_eq!(lattice.canonic(char_or_byte), TypeId::INT);
    let bool_or_byte = interner.integer(IntKinds::BOOLEAN | IntKinds::BYTE, IntKinds::BOOLEAN);
    assert_eq!(lattice.canonic(bool_or_byte), TypeId::BYTE);
    assert_eq!(lattice.canonic(TypeId::BOOLEAN), TypeId::BOOLEAN);
    assert_eq!(
        lattice.canonic(interner.array(char_or_byte)),
        interner.array(TypeId::INT)
    );
}

#[test]
fn test_primary_member() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let animal = interner.class("zoo/Animal");
    let runnable = interner.class("java/lang/Runnable");
    let closeable = interner.class("java/io/Closeable");

    let mixed = interner.intersection([runnable, animal]);
    assert_eq!(lattice.primary_member(mixed), animal);
    assert_eq!(lattice.hint(mixed), animal);
    assert_eq!(lattice.canonic(mixed), animal);

    let interfaces = interner.intersection([runnable, closeable]);
    assert_eq!(lattice.primary_member(interfaces), closeable);
    assert_eq!(lattice.primary_member(animal), animal);
}

// =============================================================================
// Cones
// =============================================================================

#[test]
fn test_subtype_cone() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let dog = interner.class("zoo/Dog");
    let animal = interner.class("zoo/Animal");

    assert_eq!(lattice.subtype_cone(TypeId::INT), TypeId::UINT);
    assert_eq!(
        interner.data(lattice.subtype_cone(TypeId::SHORT)),
        TypeData::Integer {
            possible: IntKinds::SHORT | IntKinds::BYTE,
            hint: IntKinds::SHORT,
        }
    );
    assert_eq!(lattice.subtype_cone(TypeId::BOOLEAN), TypeId::BOOLEAN);
    assert_eq!(lattice.subtype_cone(dog), dog);
    assert_eq!(lattice.subtype_cone(lattice.create_range(dog, animal)), animal);
}

#[test]
fn test_supertype_cone() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let dog = interner.class("zoo/Dog");
    let animal = interner.class("zoo/Animal");

    assert_eq!(
        interner.data(lattice.supertype_cone(TypeId::BYTE)),
        TypeData::Integer {
            possible: IntKinds::BYTE | IntKinds::SHORT | IntKinds::INT,
            hint: IntKinds::BYTE,
        }
    );
    assert_eq!(lattice.supertype_cone(TypeId::INT), TypeId::INT);
    assert_eq!(lattice.bounds(lattice.supertype_cone(dog)), (dog, TypeId::OBJECT));
    let range = lattice.create_range(dog, animal);
    assert_eq!(lattice.bounds(lattice.supertype_cone(range)), (dog, TypeId::OBJECT));
    assert_eq!(lattice.supertype_cone(TypeId::OBJECT), TypeId::OBJECT);
    assert_eq!(lattice.supertype_cone(TypeId::LONG), TypeId::LONG);
}

// =============================================================================
// cast_helper
// =============================================================================

#[test]
fn test_legal_casts_need_no_helper() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let dog = interner.class("zoo/Dog");
    let animal = interner.class("zoo/Animal");
    let runnable = interner.class("java/lang/Runnable");
    let ints = interner.array(TypeId::INT);

    assert_eq!(lattice.cast_helper(animal, dog), None);
    assert_eq!(lattice.cast_helper(dog, animal), None);
    assert_eq!(lattice.cast_helper(animal, runnable), None);
    assert_eq!(lattice.cast_helper(TypeId::OBJECT, ints), None);
    assert_eq!(lattice.cast_helper(ints, TypeId::CLONEABLE), None);
    assert_eq!(lattice.cast_helper(TypeId::NULL, TypeId::STRING), None);
    assert_eq!(
        lattice.cast_helper(interner.array(animal), interner.array(dog)),
        None
    );
}

#[test]
fn test_provably_failing_casts_go_through_object() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let dog = interner.class("zoo/Dog");
    let cat = interner.class("zoo/Cat");
    let runnable = interner.class("java/lang/Runnable");
    let thread = interner.class("java/lang/Thread");
    let integer = interner.class("java/lang/Integer");
    let ints = interner.array(TypeId::INT);

    assert_eq!(lattice.cast_helper(TypeId::STRING, integer), Some(TypeId::OBJECT));
    assert_eq!(lattice.cast_helper(dog, cat), Some(TypeId::OBJECT));
    assert_eq!(lattice.cast_helper(cat, runnable), Some(TypeId::OBJECT));
    assert_eq!(lattice.cast_helper(dog, thread), Some(TypeId::OBJECT));
    assert_eq!(lattice.cast_helper(ints, TypeId::STRING), Some(TypeId::OBJECT));
    assert_eq!(lattice.cast_helper(dog, ints), Some(TypeId::OBJECT));
    assert_eq!(
        lattice.cast_helper(ints, interner.array(TypeId::LONG)),
        Some(TypeId::OBJECT)
    );
    assert_eq!(
        lattice.cast_helper(interner.array(dog), interner.array(cat)),
        Some(TypeId::OBJECT)
    );
}

#[test]
fn test_unknown_classes_cast_directly() {
    let interner = TypeInterner::new();
    let facts = zoo();
    let cache = HierarchyCache::new(&interner, &facts);
    let lattice = TypeLattice::new(&cache);
    let ghost = interner.class("com/example/Ghost");
    let animal = interner.class("zoo/Animal");

    assert_eq!(lattice.cast_helper(ghost, animal), None);
}

// =============================================================================
// Hint policies
// =============================================================================

fn site<'s>(owner: &'s str, method: &'s str, descriptor: &'s str, index: usize) -> ArgumentSite<'s> {
    ArgumentSite {
        owner: Some(owner),
        method: Some(method),
        descriptor,
        index,
    }
}

#[test]
fn test_default_policy_has_no_preferences() {
    let policy = DefaultHintPolicy;
    assert_eq!(policy.argument_hint(&site("java/lang/String", "indexOf", "(I)I", 0)), None);
}

#[test]
fn test_platform_char_hints() {
    let hints = LibraryCharHints::platform();
    assert_eq!(hints.len(), 6);
    assert!(!hints.is_empty());

    assert_eq!(
        hints.argument_hint(&site("java/lang/String", "indexOf", "(I)I", 0)),
        Some(IntKinds::CHAR)
    );
    assert_eq!(
        hints.argument_hint(&site("java/lang/String", "lastIndexOf", "(II)I", 0)),
        Some(IntKinds::CHAR)
    );
    // The second argument of indexOf(int, int) is a position.
    assert_eq!(hints.argument_hint(&site("java/lang/String", "indexOf", "(II)I", 1)), None);
    assert_eq!(hints.argument_hint(&site("java/lang/String", "substring", "(I)Ljava/lang/String;", 0)), None);
    assert_eq!(hints.argument_hint(&site("java/io/Writer", "write", "(I)V", 0)), Some(IntKinds::CHAR));

    let anonymous = ArgumentSite {
        owner: None,
        method: Some("indexOf"),
        descriptor: "(I)I",
        index: 0,
    };
    assert_eq!(hints.argument_hint(&anonymous), None);
}

#[test]
fn test_custom_char_hints_accept_dotted_owner() {
    let mut hints = LibraryCharHints::new();
    assert!(hints.is_empty());
    hints.add("java.lang.StringBuilder", "append", "(C)Ljava/lang/StringBuilder;", 0);
    hints.add("java.lang.StringBuilder", "append", "(C)Ljava/lang/StringBuilder;", 0);
    assert_eq!(hints.len(), 1);
    assert_eq!(
        hints.argument_hint(&site(
            "java/lang/StringBuilder",
            "append",
            "(C)Ljava/lang/StringBuilder;",
            0
        )),
        Some(IntKinds::CHAR)
    );
}
