//! Recursive-descent parser for type strings.
//!
//! See [`TypeAnnotation`](crate::TypeAnnotation) for the grammar.

use crate::cursor::{Cursor, is_ident_continue, is_ident_start};
use crate::{PrimitiveKind, TypeAnnotation, TypeSyntaxError, TypeSyntaxErrorKind};

/// Deepest `[` nesting a type string may use.
pub const MAX_TYPE_DEPTH: usize = 64;

/// Parse a type string into a [`TypeAnnotation`].
///
/// Spaces and tabs around members and brackets are ignored. Sequences
/// nested more than [`MAX_TYPE_DEPTH`] levels deep are rejected.
///
/// # Examples
///
/// ```
/// use formula_schema_core::{parse_type, TypeAnnotation};
///
/// let ty = parse_type("null|[int]").unwrap();
/// assert!(ty.is_nullable());
/// assert_eq!(ty.to_string(), "null|[int]");
/// assert!(parse_type("[int").is_err());
/// ```
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_type(source: &str) -> Result<TypeAnnotation, TypeSyntaxError> {
    TypeParser::new(source).parse()
}

struct TypeParser<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    depth: usize,
}

impl<'src> TypeParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<TypeAnnotation, TypeSyntaxError> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            return Err(self.error(TypeSyntaxErrorKind::Empty));
        }

        let ty = self.parse_union()?;

        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Ok(ty),
            Some(ch) => Err(self.error(TypeSyntaxErrorKind::UnexpectedChar(ch))),
        }
    }

    fn parse_union(&mut self) -> Result<TypeAnnotation, TypeSyntaxError> {
        let mut members = vec![self.parse_member()?];

        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.eat('|') {
                break;
            }
            members.push(self.parse_member()?);
        }

        Ok(TypeAnnotation::union(members))
    }

    fn parse_member(&mut self) -> Result<TypeAnnotation, TypeSyntaxError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Err(self.error(TypeSyntaxErrorKind::UnexpectedEnd)),
            Some('|') => Err(self.error(TypeSyntaxErrorKind::EmptyUnion)),
            Some('[') => {
                if self.depth == MAX_TYPE_DEPTH {
                    return Err(self.error(TypeSyntaxErrorKind::TooDeep));
                }
                self.cursor.advance();
                self.depth += 1;
                let element = self.parse_union();
                self.depth -= 1;
                let element = element?;
                self.cursor.skip_whitespace();
                match self.cursor.peek() {
                    Some(']') => {
                        self.cursor.advance();
                        Ok(TypeAnnotation::sequence(element))
                    }
                    None => Err(self.error(TypeSyntaxErrorKind::UnclosedSequence)),
                    Some(ch) => Err(self.error(TypeSyntaxErrorKind::UnexpectedChar(ch))),
                }
            }
            Some(ch) if is_ident_start(ch) => {
                let name = self.parse_ident()?;
                Ok(match PrimitiveKind::from_keyword(name) {
                    Some(kind) => TypeAnnotation::Primitive(kind),
                    None => TypeAnnotation::nominal(name),
                })
            }
            Some(ch) => Err(self.error(TypeSyntaxErrorKind::UnexpectedChar(ch))),
        }
    }

    fn parse_ident(&mut self) -> Result<&'src str, TypeSyntaxError> {
        let start = self.cursor.offset();
        self.cursor.eat_while(is_ident_continue);

        while self.cursor.check_str("::") {
            self.cursor.advance_str("::");
            match self.cursor.peek() {
                Some(ch) if is_ident_start(ch) => {
                    self.cursor.eat_while(is_ident_continue);
                }
                Some(ch) => return Err(self.error(TypeSyntaxErrorKind::UnexpectedChar(ch))),
                None => return Err(self.error(TypeSyntaxErrorKind::UnexpectedEnd)),
            }
        }

        Ok(self.cursor.slice_from(start))
    }

    fn error(&self, kind: TypeSyntaxErrorKind) -> TypeSyntaxError {
        TypeSyntaxError::new(self.source, self.cursor.offset(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NominalType;

    fn kind_of(source: &str) -> TypeSyntaxErrorKind {
        parse_type(source).unwrap_err().kind
    }

    #[test]
    fn parse_primitives() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(parse_type(kind.name()).unwrap(), TypeAnnotation::Primitive(kind));
        }
    }

    #[test]
    fn parse_sequence() {
        assert_eq!(
            parse_type("[decimal]").unwrap(),
            TypeAnnotation::sequence(PrimitiveKind::Decimal.into())
        );
        assert_eq!(
            parse_type("[[int]]").unwrap(),
            TypeAnnotation::sequence(TypeAnnotation::sequence(TypeAnnotation::int()))
        );
    }

    #[test]
    fn parse_nullable_nominal() {
        let ty = parse_type("null|custom_obj").unwrap();
        assert_eq!(
            ty,
            TypeAnnotation::union([
                TypeAnnotation::null(),
                TypeAnnotation::Nominal(NominalType::custom_object()),
            ])
        );
    }

    #[test]
    fn parse_three_way_union() {
        let ty = parse_type("null|bool|custom_obj").unwrap();
        match ty {
            TypeAnnotation::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn parse_union_inside_sequence() {
        let ty = parse_type("[int|string]").unwrap();
        assert_eq!(ty.to_string(), "[int|string]");
    }

    #[test]
    fn parse_qualified_nominal() {
        let ty = parse_type("game::level").unwrap();
        assert_eq!(ty, TypeAnnotation::nominal("game::level"));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(
            parse_type(" null | [ int ] ").unwrap(),
            parse_type("null|[int]").unwrap()
        );
    }

    #[test]
    fn reparse_of_display_is_identical() {
        let sources = [
            "any",
            "[string]",
            "null|custom_obj",
            "null|bool|custom_obj",
            "null|[int]",
            "[custom_obj]",
            "int|int",
            "[[int|null]]",
        ];
        for source in sources {
            let first = parse_type(source).unwrap();
            let second = parse_type(&first.to_string()).unwrap();
            assert_eq!(first, second, "round trip of {}", source);
        }
    }

    #[test]
    fn malformed_strings() {
        assert_eq!(kind_of(""), TypeSyntaxErrorKind::Empty);
        assert_eq!(kind_of("   "), TypeSyntaxErrorKind::Empty);
        assert_eq!(kind_of("[int"), TypeSyntaxErrorKind::UnclosedSequence);
        assert_eq!(kind_of("[]"), TypeSyntaxErrorKind::UnexpectedChar(']'));
        assert_eq!(kind_of("int]"), TypeSyntaxErrorKind::UnexpectedChar(']'));
        assert_eq!(kind_of("null|"), TypeSyntaxErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("|int"), TypeSyntaxErrorKind::EmptyUnion);
        assert_eq!(kind_of("int||bool"), TypeSyntaxErrorKind::EmptyUnion);
        assert_eq!(kind_of("3d"), TypeSyntaxErrorKind::UnexpectedChar('3'));
        assert_eq!(kind_of("int bool"), TypeSyntaxErrorKind::UnexpectedChar('b'));
        assert_eq!(kind_of("game::"), TypeSyntaxErrorKind::UnexpectedEnd);
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let depth = MAX_TYPE_DEPTH;
        let source = format!("{}int{}", "[".repeat(depth), "]".repeat(depth));
        let ty = parse_type(&source).unwrap();
        assert_eq!(ty.to_string(), source);
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let depth = MAX_TYPE_DEPTH + 1;
        let source = format!("{}int{}", "[".repeat(depth), "]".repeat(depth));
        let err = parse_type(&source).unwrap_err();
        assert_eq!(err.kind, TypeSyntaxErrorKind::TooDeep);
        assert_eq!(err.offset, MAX_TYPE_DEPTH);
    }

    #[test]
    fn huge_nesting_fails_without_overflow() {
        let balanced = format!("{}int{}", "[".repeat(200_000), "]".repeat(200_000));
        assert_eq!(kind_of(&balanced), TypeSyntaxErrorKind::TooDeep);
        assert_eq!(kind_of(&"[".repeat(100_000)), TypeSyntaxErrorKind::TooDeep);
        let in_union = format!("null|{}", "[".repeat(100_000));
        assert_eq!(kind_of(&in_union), TypeSyntaxErrorKind::TooDeep);
    }

    #[test]
    fn error_reports_offset() {
        let err = parse_type("[int").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.input, "[int");
    }
}
