//! Declared value types for schema slots.
//!
//! A [`TypeAnnotation`] is the parsed form of a type string such as `int`,
//! `[string]`, `null|custom_obj` or `null|bool|custom_obj`. Annotations are
//! immutable values; the only way to "change" a slot's type is to replace
//! the annotation stored in the slot.
//!
//! # Grammar
//!
//! ```text
//! type   := member ('|' member)*
//! member := '[' type ']' | ident
//! ident  := [A-Za-z_][A-Za-z0-9_]* ('::' [A-Za-z_][A-Za-z0-9_]*)*
//! ```
//!
//! Identifiers that are primitive keywords (`any`, `null`, `bool`, `int`,
//! `decimal`, `string`, `object`, `list`) become [`TypeAnnotation::Primitive`];
//! any other identifier is a [`NominalType`].

use std::fmt;
use std::str::FromStr;

use crate::type_parser::parse_type;
use crate::{NominalType, PrimitiveKind, TypeHash, TypeSyntaxError};

/// A parsed type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeAnnotation {
    /// A built-in value kind.
    Primitive(PrimitiveKind),
    /// A homogeneous sequence, `[T]`.
    Sequence(Box<TypeAnnotation>),
    /// A reference to a named type (an entity type, the level, ...).
    Nominal(NominalType),
    /// Two or more alternatives, `A|B|...`.
    ///
    /// Only [`TypeAnnotation::union`] can build the members, so a union is
    /// never empty, never has a single member and never nests.
    Union(UnionMembers),
}

/// The members of a [`TypeAnnotation::Union`], in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionMembers(Vec<TypeAnnotation>);

impl UnionMembers {
    pub fn iter(&self) -> std::slice::Iter<'_, TypeAnnotation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TypeAnnotation] {
        &self.0
    }

    /// Number of alternatives; at least two.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a UnionMembers {
    type Item = &'a TypeAnnotation;
    type IntoIter = std::slice::Iter<'a, TypeAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for UnionMembers {
    type Item = TypeAnnotation;
    type IntoIter = std::vec::IntoIter<TypeAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl TypeAnnotation {
    /// Parse a type string.
    pub fn parse(source: &str) -> Result<Self, TypeSyntaxError> {
        parse_type(source)
    }

    /// The `any` annotation.
    pub const fn any() -> Self {
        TypeAnnotation::Primitive(PrimitiveKind::Any)
    }

    /// The `int` annotation.
    pub const fn int() -> Self {
        TypeAnnotation::Primitive(PrimitiveKind::Int)
    }

    /// The `null` annotation.
    pub const fn null() -> Self {
        TypeAnnotation::Primitive(PrimitiveKind::Null)
    }

    /// A primitive annotation.
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        TypeAnnotation::Primitive(kind)
    }

    /// A sequence of `element`.
    pub fn sequence(element: TypeAnnotation) -> Self {
        TypeAnnotation::Sequence(Box::new(element))
    }

    /// A nominal type annotation.
    pub fn nominal(name: impl Into<String>) -> Self {
        TypeAnnotation::Nominal(NominalType::new(name))
    }

    /// `null|inner`.
    pub fn nullable(inner: TypeAnnotation) -> Self {
        Self::union([Self::null(), inner])
    }

    /// Build a union from its members.
    ///
    /// Nested unions are flattened, duplicates dropped (first occurrence
    /// wins), and a union left with one member collapses to that member.
    pub fn union(members: impl IntoIterator<Item = TypeAnnotation>) -> Self {
        let mut flat: Vec<TypeAnnotation> = Vec::new();
        for member in members {
            match member {
                TypeAnnotation::Union(inner) => {
                    for m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        match flat.len() {
            0 => Self::null(),
            1 => flat.remove(0),
            _ => TypeAnnotation::Union(UnionMembers(flat)),
        }
    }

    /// Whether this is exactly `any`.
    pub fn is_any(&self) -> bool {
        matches!(self, TypeAnnotation::Primitive(PrimitiveKind::Any))
    }

    /// Whether a value of this type may be null.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeAnnotation::Primitive(PrimitiveKind::Null | PrimitiveKind::Any) => true,
            TypeAnnotation::Union(members) => members.iter().any(|m| m.is_nullable()),
            _ => false,
        }
    }

    /// This type with `null` removed from it.
    ///
    /// Returns `None` when nothing but `null` remains.
    pub fn without_null(&self) -> Option<TypeAnnotation> {
        match self {
            TypeAnnotation::Primitive(PrimitiveKind::Null) => None,
            TypeAnnotation::Union(members) => {
                let rest: Vec<_> = members
                    .iter()
                    .filter(|m| !matches!(m, TypeAnnotation::Primitive(PrimitiveKind::Null)))
                    .cloned()
                    .collect();
                if rest.is_empty() {
                    None
                } else {
                    Some(Self::union(rest))
                }
            }
            other => Some(other.clone()),
        }
    }

    /// The nominal type, if this annotation is exactly one.
    pub fn as_nominal(&self) -> Option<&NominalType> {
        match self {
            TypeAnnotation::Nominal(ty) => Some(ty),
            _ => None,
        }
    }

    /// Every nominal type referenced anywhere in this annotation.
    pub fn nominal_references(&self) -> Vec<&NominalType> {
        let mut out = Vec::new();
        self.collect_nominals(&mut out);
        out
    }

    fn collect_nominals<'a>(&'a self, out: &mut Vec<&'a NominalType>) {
        match self {
            TypeAnnotation::Primitive(_) => {}
            TypeAnnotation::Sequence(element) => element.collect_nominals(out),
            TypeAnnotation::Nominal(ty) => out.push(ty),
            TypeAnnotation::Union(members) => {
                for m in members {
                    m.collect_nominals(out);
                }
            }
        }
    }

    /// Whether this annotation mentions the nominal type `hash`.
    pub fn references(&self, hash: TypeHash) -> bool {
        self.nominal_references()
            .iter()
            .any(|ty| ty.type_hash() == hash)
    }
}

impl From<PrimitiveKind> for TypeAnnotation {
    fn from(kind: PrimitiveKind) -> Self {
        TypeAnnotation::Primitive(kind)
    }
}

impl From<NominalType> for TypeAnnotation {
    fn from(ty: NominalType) -> Self {
        TypeAnnotation::Nominal(ty)
    }
}

impl FromStr for TypeAnnotation {
    type Err = TypeSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Primitive(kind) => write!(f, "{}", kind),
            TypeAnnotation::Sequence(element) => write!(f, "[{}]", element),
            TypeAnnotation::Nominal(ty) => write!(f, "{}", ty),
            TypeAnnotation::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", m)?;
                }
                Ok(())
            }
        }
    }
}
