//! Error types for schema construction.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SchemaError
//! ├── MalformedTypeSyntax   - a slot's type string does not parse (wraps TypeSyntaxError)
//! ├── BuiltinCountMismatch  - built-in slot constants and definition table disagree
//! ├── BuiltinSlotMismatch   - a designated slot constant names the wrong table entry
//! ├── UnknownNominalType    - a nominal type the environment never registered
//! ├── DuplicateNominalType  - a nominal type registered twice
//! ├── ShadowsBuiltin        - a custom property reuses a built-in name
//! ├── DuplicateProperty     - a custom property added twice
//! ├── SelfTypeAlreadyBound  - `set_object_type` called a second time
//! ├── SchemaFinalized       - mutation after the schema was handed to the compiler
//! ├── UnknownSchema         - a schema id that no registry slot holds
//! ├── DuplicateEntityType   - an entity-type name defined twice
//! └── TooManySchemas        - schema ids exhausted
//! ```
//!
//! Unresolvable names and out-of-range slots are not errors; the query
//! surface reports them as `None`.

use thiserror::Error;

/// What went wrong while parsing a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntaxErrorKind {
    /// The string is empty or only whitespace.
    Empty,
    /// A character that cannot appear at this position.
    UnexpectedChar(char),
    /// The string ended where a type was expected.
    UnexpectedEnd,
    /// A `[` without its closing `]`.
    UnclosedSequence,
    /// A `|` with nothing on one side.
    EmptyUnion,
    /// Sequences nested deeper than [`MAX_TYPE_DEPTH`](crate::MAX_TYPE_DEPTH).
    TooDeep,
}

impl std::fmt::Display for TypeSyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSyntaxErrorKind::Empty => f.write_str("empty type"),
            TypeSyntaxErrorKind::UnexpectedChar(ch) => write!(f, "unexpected character '{}'", ch),
            TypeSyntaxErrorKind::UnexpectedEnd => f.write_str("unexpected end of type"),
            TypeSyntaxErrorKind::UnclosedSequence => f.write_str("unclosed '['"),
            TypeSyntaxErrorKind::EmptyUnion => f.write_str("empty union member"),
            TypeSyntaxErrorKind::TooDeep => {
                write!(f, "nesting deeper than {} levels", crate::MAX_TYPE_DEPTH)
            }
        }
    }
}

/// A type string that does not match the type grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed type '{input}' at offset {offset}: {kind}")]
pub struct TypeSyntaxError {
    /// The full type string.
    pub input: String,
    /// Byte offset where parsing stopped.
    pub offset: usize,
    /// The failure category.
    pub kind: TypeSyntaxErrorKind,
}

impl TypeSyntaxError {
    /// Create a new syntax error.
    pub fn new(input: impl Into<String>, offset: usize, kind: TypeSyntaxErrorKind) -> Self {
        Self {
            input: input.into(),
            offset,
            kind,
        }
    }
}

/// Errors raised while building or extending a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A slot's declared type does not parse.
    #[error("property '{property}' has a malformed type: {source}")]
    MalformedTypeSyntax {
        property: String,
        #[source]
        source: TypeSyntaxError,
    },

    /// The compiled-in built-in slot count disagrees with the definition table.
    #[error("built-in slot count mismatch: {expected} slot constants but {actual} table entries")]
    BuiltinCountMismatch { expected: usize, actual: usize },

    /// A designated built-in slot does not hold the entry its constant names.
    #[error("built-in slot {slot} should be '{expected}' but the table has '{found}'")]
    BuiltinSlotMismatch {
        slot: usize,
        expected: &'static str,
        found: String,
    },

    /// A nominal type was referenced but never registered.
    #[error("unknown nominal type '{name}'")]
    UnknownNominalType { name: String },

    /// A nominal type name registered twice.
    #[error("nominal type '{name}' is already registered")]
    DuplicateNominalType { name: String },

    /// A custom property would shadow a built-in slot.
    #[error("property '{name}' shadows built-in slot {slot}")]
    ShadowsBuiltin { name: String, slot: usize },

    /// A custom property with this name already exists on the schema.
    #[error("property '{name}' already exists at slot {slot}")]
    DuplicateProperty { name: String, slot: usize },

    /// The self type was already bound on this schema.
    #[error("object type already bound")]
    SelfTypeAlreadyBound,

    /// The schema no longer accepts mutation.
    #[error("schema '{schema}' is finalized")]
    SchemaFinalized { schema: String },

    /// No schema with this id exists.
    #[error("unknown schema id {id}")]
    UnknownSchema { id: u32 },

    /// An entity type with this name was already defined.
    #[error("entity type '{name}' is already defined")]
    DuplicateEntityType { name: String },

    /// The registry already holds as many schemas as a [`u32`] id can name.
    #[error("cannot define more than {limit} schemas")]
    TooManySchemas { limit: u64 },
}

impl SchemaError {
    /// Whether this error indicates the compiled-in tables drifted out of sync.
    ///
    /// These are startup-fatal; the embedding application should abort.
    pub fn is_internal_consistency(&self) -> bool {
        matches!(
            self,
            SchemaError::BuiltinCountMismatch { .. } | SchemaError::BuiltinSlotMismatch { .. }
        )
    }
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
