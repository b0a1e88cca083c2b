//! Field and method descriptor decoding.
//!
//! Descriptors are the class-file encoding of types:
//!
//! | Descriptor | Type-set |
//! |------------|----------|
//! | `B C D F I J S Z` | the primitive singletons |
//! | `Ljava/lang/String;` | class `java/lang/String` |
//! | `[I` | `int[]` (at most 255 dimensions) |
//! | `V` | `void`, return position only |
//! | `(IJ)V` | method taking `int, long`, returning `void` |

use crate::intern::TypeInterner;
use crate::types::TypeId;
use jrange_common::Diagnostic;
use jrange_common::diagnostics::diagnostic_codes;
use thiserror::Error;

const MAX_ARRAY_DIMENSIONS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("empty descriptor")]
    Empty,
    #[error("unexpected '{found}' at offset {offset} in descriptor `{descriptor}`")]
    UnexpectedChar {
        descriptor: String,
        offset: usize,
        found: char,
    },
    #[error("descriptor `{descriptor}` ends in the middle of a type")]
    UnexpectedEnd { descriptor: String },
    #[error("unterminated class name in descriptor `{descriptor}`")]
    UnterminatedClass { descriptor: String },
    #[error("empty class name in descriptor `{descriptor}`")]
    EmptyClassName { descriptor: String },
    #[error("array type in descriptor `{descriptor}` has more than 255 dimensions")]
    TooManyDimensions { descriptor: String },
    #[error("trailing characters at offset {offset} in descriptor `{descriptor}`")]
    Trailing { descriptor: String, offset: usize },
    #[error("method descriptor `{descriptor}` does not start with '('")]
    MissingParams { descriptor: String },
    #[error("method descriptor `{descriptor}` has no return type")]
    MissingReturn { descriptor: String },
}

impl DescriptorError {
    /// The offending descriptor text.
    pub fn descriptor(&self) -> &str {
        match self {
            DescriptorError::Empty => "",
            DescriptorError::UnexpectedChar { descriptor, .. }
            | DescriptorError::UnexpectedEnd { descriptor }
            | DescriptorError::UnterminatedClass { descriptor }
            | DescriptorError::EmptyClassName { descriptor }
            | DescriptorError::TooManyDimensions { descriptor }
            | DescriptorError::Trailing { descriptor, .. }
            | DescriptorError::MissingParams { descriptor }
            | DescriptorError::MissingReturn { descriptor } => descriptor,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::from_code(diagnostic_codes::MALFORMED_DESCRIPTOR, &[self.descriptor()])
            .with_related(self.to_string())
    }
}

struct DescriptorParser<'d, 'i> {
    interner: &'i TypeInterner,
    descriptor: &'d str,
    pos: usize,
}

impl<'d, 'i> DescriptorParser<'d, 'i> {
    fn new(interner: &'i TypeInterner, descriptor: &'d str) -> Self {
        DescriptorParser {
            interner,
            descriptor,
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.descriptor.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.descriptor.len()
    }

    fn owned(&self) -> String {
        self.descriptor.to_string()
    }

    fn unexpected(&self) -> DescriptorError {
        match self.descriptor[self.pos..].chars().next() {
            Some(found) => DescriptorError::UnexpectedChar {
                descriptor: self.owned(),
                offset: self.pos,
                found,
            },
            None => DescriptorError::UnexpectedEnd {
                descriptor: self.owned(),
            },
        }
    }

    fn field_type(&mut self) -> Result<TypeId, DescriptorError> {
        let mut dimensions = 0usize;
        while self.peek() == Some(b'[') {
            dimensions += 1;
            self.pos += 1;
        }
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(DescriptorError::TooManyDimensions {
                descriptor: self.owned(),
            });
        }

        let base = match self.peek() {
            Some(b'B') => TypeId::BYTE,
            Some(b'C') => TypeId::CHAR,
            Some(b'D') => TypeId::DOUBLE,
            Some(b'F') => TypeId::FLOAT,
            Some(b'I') => TypeId::INT,
            Some(b'J') => TypeId::LONG,
            Some(b'S') => TypeId::SHORT,
            Some(b'Z') => TypeId::BOOLEAN,
            Some(b'L') => return self.class_type(dimensions),
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        Ok(self.wrap(base, dimensions))
    }

    fn class_type(&mut self, dimensions: usize) -> Result<TypeId, DescriptorError> {
        let start = self.pos + 1;
        let Some(len) = self.descriptor[start..].find(';') else {
            return Err(DescriptorError::UnterminatedClass {
                descriptor: self.owned(),
            });
        };
        if len == 0 {
            return Err(DescriptorError::EmptyClassName {
                descriptor: self.owned(),
            });
        }
        let class = self.interner.class(&self.descriptor[start..start + len]);
        self.pos = start + len + 1;
        Ok(self.wrap(class, dimensions))
    }

    fn wrap(&self, mut ty: TypeId, dimensions: usize) -> TypeId {
        for _ in 0..dimensions {
            ty = self.interner.array(ty);
        }
        ty
    }

    fn return_type(&mut self) -> Result<TypeId, DescriptorError> {
        if self.peek() == Some(b'V') {
            self.pos += 1;
            return Ok(TypeId::VOID);
        }
        self.field_type()
    }

    fn finish(&self) -> Result<(), DescriptorError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(DescriptorError::Trailing {
                descriptor: self.owned(),
                offset: self.pos,
            })
        }
    }
}

/// Decode a field descriptor.
pub fn type_from_descriptor(
    interner: &TypeInterner,
    descriptor: &str,
) -> Result<TypeId, DescriptorError> {
    if descriptor.is_empty() {
        return Err(DescriptorError::Empty);
    }
    let mut parser = DescriptorParser::new(interner, descriptor);
    let ty = parser.field_type()?;
    parser.finish()?;
    Ok(ty)
}

/// Decode a return descriptor: a field descriptor or `V`.
pub fn return_type_from_descriptor(
    interner: &TypeInterner,
    descriptor: &str,
) -> Result<TypeId, DescriptorError> {
    if descriptor.is_empty() {
        return Err(DescriptorError::Empty);
    }
    let mut parser = DescriptorParser::new(interner, descriptor);
    let ty = parser.return_type()?;
    parser.finish()?;
    Ok(ty)
}

/// Decode `(<params>)<return>` into parameter and return type-sets.
pub fn parse_method_descriptor(
    interner: &TypeInterner,
    descriptor: &str,
) -> Result<(Vec<TypeId>, TypeId), DescriptorError> {
    if descriptor.is_empty() {
        return Err(DescriptorError::Empty);
    }
    let mut parser = DescriptorParser::new(interner, descriptor);
    if parser.peek() != Some(b'(') {
        return Err(DescriptorError::MissingParams {
            descriptor: parser.owned(),
        });
    }
    parser.pos += 1;

    let mut params = Vec::new();
    loop {
        match parser.peek() {
            Some(b')') => {
                parser.pos += 1;
                break;
            }
            None => {
                return Err(DescriptorError::UnexpectedEnd {
                    descriptor: parser.owned(),
                });
            }
            Some(_) => params.push(parser.field_type()?),
        }
    }

    if parser.at_end() {
        return Err(DescriptorError::MissingReturn {
            descriptor: parser.owned(),
        });
    }
    let return_type = parser.return_type()?;
    parser.finish()?;
    Ok((params, return_type))
}

#[cfg(test)]
#[path = "../tests/descriptor_tests.rs"]
mod tests;
