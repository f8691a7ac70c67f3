//! Property schemas and slot resolution for scripted entities.
//!
//! - [`BaseSchemaRegistry`] - the built-in slot table shared by every entity type
//! - [`EntityTypeSchema`] - one entity type's copy of that table plus its custom slots
//! - [`EntityTypeRegistry`] - owner of the canonical schema and all entity-type schemas
//! - [`NominalTypeRegistry`] - the environment's named types (level, library, entities)
//! - [`SlotResolver`] - name → slot and slot → entry queries for the compiler
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use formula_schema_registry::{
//!     BaseSchemaRegistry, EntityTypeRegistry, NominalTypeRegistry, SchemaOptions, SlotResolver,
//! };
//!
//! let mut types = NominalTypeRegistry::with_builtins();
//! let base = Arc::new(BaseSchemaRegistry::build(&types).unwrap());
//! let mut registry = EntityTypeRegistry::new(Arc::clone(&base), &types, SchemaOptions::default());
//!
//! let id = registry.define_entity("frogatto", &mut types).unwrap();
//! let schema = registry.schema_mut(id).unwrap();
//! let coins = schema.add_property("coins", "int").unwrap();
//! schema.finalize();
//!
//! assert!(coins >= base.len());
//! assert_eq!(schema.resolve_slot("coins"), Some(coins));
//! assert_eq!(schema.resolve_slot("x"), base.get_key_slot("x"));
//! ```

mod base;
pub mod builtin;
mod entity_types;
mod entry;
mod nominal_registry;
mod resolver;
mod schema;

pub use base::BaseSchemaRegistry;
pub use builtin::{BUILTIN_PROPERTIES, BuiltinProperty, BuiltinSlot};
pub use entity_types::{EntityTypeRegistry, PathResolution};
pub use entry::{EntryFlags, SchemaEntry, SchemaId, SchemaRef};
pub use nominal_registry::{NominalKind, NominalTypeEntry, NominalTypeRegistry};
pub use resolver::SlotResolver;
pub use schema::{EntityTypeSchema, ParentBinding, SchemaOptions, ShadowPolicy};
