//! Primitive value kinds recognised by the formula type grammar.

use std::fmt;

/// Primitive type kinds.
///
/// `Null` only appears as a member of a union (`null|T`); the other kinds
/// can stand alone as a slot's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Any,
    Null,
    Bool,
    Int,
    Decimal,
    String,
    Object,
    List,
}

impl PrimitiveKind {
    /// Every primitive kind, in grammar order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Any,
        PrimitiveKind::Null,
        PrimitiveKind::Bool,
        PrimitiveKind::Int,
        PrimitiveKind::Decimal,
        PrimitiveKind::String,
        PrimitiveKind::Object,
        PrimitiveKind::List,
    ];

    /// Get the keyword for this primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Any => "any",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
            PrimitiveKind::List => "list",
        }
    }

    /// Look up a primitive by keyword.
    ///
    /// Returns `None` for anything else; the parser then treats the
    /// identifier as a nominal type.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == keyword)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_keyword(kind.name()), Some(kind));
        }
    }

    #[test]
    fn unknown_keyword_is_not_primitive() {
        assert_eq!(PrimitiveKind::from_keyword("custom_obj"), None);
        assert_eq!(PrimitiveKind::from_keyword("Int"), None);
    }
}
