//! Type formatting for diagnostics and debugging.
//!
//! Renders type-sets in Java source syntax where one exists:
//!
//! | Type-set | Rendering |
//! |----------|-----------|
//! | class | `java.lang.String` |
//! | array | `int[]` |
//! | intersection | `java.lang.Runnable & java.io.Closeable` |
//! | range | `[Dog .. Animal]` |
//! | integer set | `{boolean|int}` |
//! | universal / empty | `?` / `<error>` |

use crate::integer::IntKinds;
use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId};
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
    /// Print `java/lang/String` instead of `java.lang.String`.
    internal_names: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter {
            interner,
            internal_names: false,
        }
    }

    #[must_use]
    pub fn with_internal_names(mut self) -> Self {
        self.internal_names = true;
        self
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, ty);
        out
    }

    fn write(&self, out: &mut String, ty: TypeId) {
        match self.interner.lookup(ty) {
            None => {
                let _ = write!(out, "<type#{}>", ty.0);
            }
            Some(TypeData::Unknown) => out.push('?'),
            Some(TypeData::Error) => out.push_str("<error>"),
            Some(TypeData::Null) => out.push_str("null"),
            Some(TypeData::Primitive(kind)) => out.push_str(kind.name()),
            Some(TypeData::Integer { possible, .. }) => self.write_integer(out, possible),
            Some(TypeData::Class(atom)) => {
                let name = self.interner.resolve_name(atom);
                if self.internal_names {
                    out.push_str(&name);
                } else {
                    out.extend(name.chars().map(|c| if c == '/' { '.' } else { c }));
                }
            }
            Some(TypeData::Array(elem)) => {
                self.write(out, elem);
                out.push_str("[]");
            }
            Some(TypeData::Intersection(members)) => {
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    self.write(out, member);
                }
            }
            Some(TypeData::Range { bottom, top }) => {
                out.push('[');
                self.write(out, bottom);
                out.push_str(" .. ");
                self.write(out, top);
                out.push(']');
            }
        }
    }

    fn write_integer(&self, out: &mut String, possible: IntKinds) {
        if let Some(name) = possible.name() {
            out.push_str(name);
            return;
        }
        out.push('{');
        let mut first = true;
        for kind in IntKinds::DISPLAY_ORDER {
            if !possible.contains(kind) {
                continue;
            }
            if !first {
                out.push('|');
            }
            first = false;
            out.push_str(kind.name().unwrap_or("?"));
        }
        out.push('}');
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
