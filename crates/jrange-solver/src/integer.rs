//! Integer-set kinds.
//!
//! The JVM stores `boolean`, `byte`, `char`, `short` and `int` in the same
//! int-sized slot, so a value loaded from a local or produced by `iadd` could
//! be any of them. `IntKinds` is the set of kinds still possible.
//!
//! Bit order doubles as hint priority: when several kinds remain, the lowest
//! set bit is the one shown to the user.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct IntKinds: u8 {
        const BOOLEAN = 1 << 0;
        const INT = 1 << 1;
        const CHAR = 1 << 2;
        const SHORT = 1 << 3;
        const BYTE = 1 << 4;
    }
}

impl IntKinds {
    /// Every kind except boolean.
    pub const NUMERIC: IntKinds = IntKinds::INT
        .union(IntKinds::CHAR)
        .union(IntKinds::SHORT)
        .union(IntKinds::BYTE);

    /// Kinds in hint priority order.
    pub const PRIORITY: [IntKinds; 5] = [
        IntKinds::BOOLEAN,
        IntKinds::INT,
        IntKinds::CHAR,
        IntKinds::SHORT,
        IntKinds::BYTE,
    ];

    /// Kinds in source declaration order, used for display.
    pub const DISPLAY_ORDER: [IntKinds; 5] = [
        IntKinds::BOOLEAN,
        IntKinds::BYTE,
        IntKinds::CHAR,
        IntKinds::SHORT,
        IntKinds::INT,
    ];

    #[inline]
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Iterate over the single kinds in priority order.
    pub fn kinds(self) -> impl Iterator<Item = IntKinds> {
        Self::PRIORITY.into_iter().filter(move |k| self.contains(*k))
    }

    /// Kinds that widen to `kind` by an implicit primitive conversion.
    fn widened_from_single(kind: IntKinds) -> IntKinds {
        if kind == IntKinds::INT {
            IntKinds::NUMERIC
        } else if kind == IntKinds::SHORT {
            IntKinds::SHORT | IntKinds::BYTE
        } else {
            kind
        }
    }

    /// Kinds that `kind` widens to by an implicit primitive conversion.
    fn widens_to_single(kind: IntKinds) -> IntKinds {
        if kind == IntKinds::BYTE {
            IntKinds::BYTE | IntKinds::SHORT | IntKinds::INT
        } else if kind == IntKinds::SHORT || kind == IntKinds::CHAR {
            kind | IntKinds::INT
        } else {
            kind
        }
    }

    /// Every kind assignable to some member of `self`.
    pub fn subtype_cone(self) -> IntKinds {
        self.kinds()
            .fold(IntKinds::empty(), |acc, k| acc | Self::widened_from_single(k))
    }

    /// Every kind some member of `self` is assignable to.
    pub fn supertype_cone(self) -> IntKinds {
        self.kinds()
            .fold(IntKinds::empty(), |acc, k| acc | Self::widens_to_single(k))
    }

    /// Highest-priority member.
    pub fn preferred(self) -> Option<IntKinds> {
        self.kinds().next()
    }

    /// The kind a compiler would statically give an expression of this set.
    ///
    /// A lone kind is itself. Otherwise boolean is ignored when numeric kinds
    /// remain; `short` covers `{short, byte}`; everything else promotes to
    /// `int`.
    pub fn canonic(self) -> Option<IntKinds> {
        if self.is_empty() {
            return None;
        }
        if self.is_single() {
            return Some(self);
        }
        let numeric = self & IntKinds::NUMERIC;
        if numeric.is_empty() {
            return Some(IntKinds::BOOLEAN);
        }
        if numeric.is_single() {
            return Some(numeric);
        }
        if (IntKinds::SHORT | IntKinds::BYTE).contains(numeric) {
            return Some(IntKinds::SHORT);
        }
        Some(IntKinds::INT)
    }

    /// Kinds an `iconst`/`bipush`/`sipush`/`ldc` operand of this value fits.
    pub fn for_constant(value: i32) -> IntKinds {
        let mut kinds = IntKinds::INT;
        if (0..=i32::from(u16::MAX)).contains(&value) {
            kinds |= IntKinds::CHAR;
        }
        if i16::try_from(value).is_ok() {
            kinds |= IntKinds::SHORT;
        }
        if i8::try_from(value).is_ok() {
            kinds |= IntKinds::BYTE;
        }
        if value == 0 || value == 1 {
            kinds |= IntKinds::BOOLEAN;
        }
        kinds
    }

    /// Source name of a single kind.
    pub fn name(self) -> Option<&'static str> {
        let name = if self == IntKinds::BOOLEAN {
            "boolean"
        } else if self == IntKinds::BYTE {
            "byte"
        } else if self == IntKinds::CHAR {
            "char"
        } else if self == IntKinds::SHORT {
            "short"
        } else if self == IntKinds::INT {
            "int"
        } else {
            return None;
        };
        Some(name)
    }

    /// Descriptor letter of a single kind.
    pub fn descriptor_char(self) -> Option<char> {
        let c = if self == IntKinds::BOOLEAN {
            'Z'
        } else if self == IntKinds::BYTE {
            'B'
        } else if self == IntKinds::CHAR {
            'C'
        } else if self == IntKinds::SHORT {
            'S'
        } else if self == IntKinds::INT {
            'I'
        } else {
            return None;
        };
        Some(c)
    }
}

/// Combine two hint masks for an intersected possible set.
///
/// Every kind either side favoured is kept, masked to what is still possible.
/// While the possible set stays the same the mask only grows, so re-narrowing
/// by a constraint already applied returns the same set.
pub(crate) fn meet_hints(a: IntKinds, b: IntKinds, possible: IntKinds) -> IntKinds {
    (a | b) & possible
}

#[cfg(test)]
#[path = "../tests/integer_tests.rs"]
mod tests;
