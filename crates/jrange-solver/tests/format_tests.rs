use super::*;

#[test]
fn test_special_sets() {
    let interner = TypeInterner::new();
    let fmt = TypeFormatter::new(&interner);
    assert_eq!(fmt.format(TypeId::UNKNOWN), "?");
    assert_eq!(fmt.format(TypeId::ERROR), "<error>");
    assert_eq!(fmt.format(TypeId::NULL), "null");
    assert_eq!(fmt.format(TypeId(4_242)), "<type#4242>");
}

#[test]
fn test_primitives_and_integer_sets() {
    let interner = TypeInterner::new();
    let fmt = TypeFormatter::new(&interner);
    assert_eq!(fmt.format(TypeId::VOID), "void");
    assert_eq!(fmt.format(TypeId::LONG), "long");
    assert_eq!(fmt.format(TypeId::DOUBLE), "double");
    assert_eq!(fmt.format(TypeId::CHAR), "char");
    assert_eq!(fmt.format(TypeId::BOOLEAN), "boolean");
    assert_eq!(fmt.format(TypeId::UINT), "{byte|char|short|int}");
    assert_eq!(fmt.format(TypeId::ANY_INT), "{boolean|byte|char|short|int}");
    let small = interner.integer(IntKinds::SHORT | IntKinds::BYTE, IntKinds::SHORT);
    assert_eq!(fmt.format(small), "{byte|short}");
}

#[test]
fn test_reference_shapes() {
    let interner = TypeInterner::new();
    let fmt = TypeFormatter::new(&interner);
    let dog = interner.class("zoo/Dog");
    let animal = interner.class("zoo/Animal");
    let runnable = interner.class("java/lang/Runnable");
    let closeable = interner.class("java/io/Closeable");

    assert_eq!(fmt.format(TypeId::STRING), "java.lang.String");
    assert_eq!(fmt.format(interner.array(interner.array(TypeId::INT))), "int[][]");
    assert_eq!(fmt.format(interner.array(dog)), "zoo.Dog[]");
    assert_eq!(
        fmt.format(interner.intersection([runnable, closeable])),
        "java.io.Closeable & java.lang.Runnable"
    );
    assert_eq!(fmt.format(interner.range(dog, animal)), "[zoo.Dog .. zoo.Animal]");
}

#[test]
fn test_internal_names() {
    let interner = TypeInterner::new();
    let fmt = TypeFormatter::new(&interner).with_internal_names();
    assert_eq!(fmt.format(TypeId::STRING), "java/lang/String");
    assert_eq!(fmt.format(interner.array(TypeId::OBJECT)), "java/lang/Object[]");
}
