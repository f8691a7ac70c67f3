//! Property schemas and slot resolution for the formula scripting language.
//!
//! Scripted entities expose a large, semi-fixed set of named attributes.
//! The compiler resolves each attribute name to an integer slot once, when
//! an expression is compiled; evaluation then indexes entity storage by
//! slot instead of hashing names every frame.
//!
//! ## Crates
//!
//! - `formula-schema-core`: type annotations, the type grammar, errors
//! - `formula-schema-registry`: base registry, entity-type schemas, slot queries
//!
//! This crate re-exports both and adds [`SchemaContext`], which wires the
//! environment's nominal types, the base registry and the entity-type
//! schemas together.

mod context;

pub use context::{ContextError, SchemaContext};

pub use formula_schema_core::{
    CUSTOM_OBJECT_TYPE, LEVEL_TYPE, LIBRARY_TYPE, MAX_TYPE_DEPTH, NominalType, PrimitiveKind,
    SchemaError, SchemaResult, TypeAnnotation, TypeHash, TypeSyntaxError, TypeSyntaxErrorKind,
    UnionMembers, parse_type,
};
pub use formula_schema_registry::{
    BUILTIN_PROPERTIES, BaseSchemaRegistry, BuiltinProperty, BuiltinSlot, EntityTypeRegistry,
    EntityTypeSchema, EntryFlags, NominalKind, NominalTypeEntry, NominalTypeRegistry,
    ParentBinding, PathResolution, SchemaEntry, SchemaId, SchemaOptions, SchemaRef, ShadowPolicy,
    SlotResolver,
};

// Re-export main types
pub mod prelude {
    pub use crate::context::{ContextError, SchemaContext};
    pub use formula_schema_core::{NominalType, SchemaError, SchemaResult, TypeAnnotation};
    pub use formula_schema_registry::{
        BaseSchemaRegistry, BuiltinSlot, EntityTypeRegistry, EntityTypeSchema, SchemaEntry,
        SchemaId, SchemaOptions, ShadowPolicy, SlotResolver,
    };
}
