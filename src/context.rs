//! Schema context for an embedding application.
//!
//! A `SchemaContext` owns the nominal type environment and, once sealed, the
//! base registry handle and every entity-type schema.
//!
//! # Example
//!
//! ```
//! use formula_schema::{NominalKind, SchemaContext, SlotResolver};
//!
//! let mut ctx = SchemaContext::new();
//! ctx.register_type("tile_map", NominalKind::External).unwrap();
//! ctx.seal().unwrap();
//!
//! let id = ctx.define_entity_type("frogatto").unwrap();
//! let schema = ctx.entity_types_mut().unwrap().schema_mut(id).unwrap();
//! schema.add_property("coins", "int").unwrap();
//! schema.finalize();
//!
//! let schema = ctx.entity_types().unwrap().get(id).unwrap();
//! assert!(schema.resolve_slot("coins").is_some());
//! ```

use std::sync::Arc;
use thiserror::Error;

use formula_schema_core::{SchemaError, TypeHash};
use formula_schema_registry::{
    BaseSchemaRegistry, EntityTypeRegistry, NominalKind, NominalTypeRegistry, SchemaId,
    SchemaOptions,
};

/// Owns the type environment and the schemas built against it.
///
/// Two phases: while unsealed, the environment registers its nominal types;
/// [`seal`](Self::seal) builds the base registry and the canonical schema,
/// after which entity types can be defined.
#[derive(Debug)]
pub struct SchemaContext {
    types: NominalTypeRegistry,
    options: SchemaOptions,
    /// Base registry handle (available after seal)
    base: Option<Arc<BaseSchemaRegistry>>,
    /// Entity-type schemas (available after seal)
    entity_types: Option<EntityTypeRegistry>,
}

impl SchemaContext {
    /// Create a context whose environment holds the built-in nominal types.
    pub fn new() -> Self {
        Self::with_options(SchemaOptions::default())
    }

    /// Create a context with non-default schema options.
    pub fn with_options(options: SchemaOptions) -> Self {
        Self {
            types: NominalTypeRegistry::with_builtins(),
            options,
            base: None,
            entity_types: None,
        }
    }

    /// Register an environment-provided nominal type.
    pub fn register_type(
        &mut self,
        name: impl Into<String>,
        kind: NominalKind,
    ) -> Result<TypeHash, ContextError> {
        Ok(self.types.register(name, kind)?)
    }

    /// Publish the process-wide base registry and create the canonical schema.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::AlreadySealed` on a second call, and
    /// `ContextError::Schema` if the built-in tables are inconsistent.
    pub fn seal(&mut self) -> Result<(), ContextError> {
        if self.is_sealed() {
            return Err(ContextError::AlreadySealed);
        }

        let base = Arc::clone(BaseSchemaRegistry::initialize(&self.types)?);
        log::debug!(
            "sealing schema context: {} built-in slots, {} nominal types",
            base.len(),
            self.types.len()
        );
        self.entity_types = Some(EntityTypeRegistry::new(
            Arc::clone(&base),
            &self.types,
            self.options,
        ));
        self.base = Some(base);
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        self.base.is_some()
    }

    /// Define an entity type and bind its self type.
    pub fn define_entity_type(
        &mut self,
        name: impl Into<String>,
    ) -> Result<SchemaId, ContextError> {
        let registry = self.entity_types.as_mut().ok_or(ContextError::NotSealed)?;
        Ok(registry.define_entity(name, &mut self.types)?)
    }

    /// The nominal type environment.
    pub fn types(&self) -> &NominalTypeRegistry {
        &self.types
    }

    /// The base registry handle.
    pub fn base(&self) -> Option<&Arc<BaseSchemaRegistry>> {
        self.base.as_ref()
    }

    /// The entity-type schemas.
    pub fn entity_types(&self) -> Option<&EntityTypeRegistry> {
        self.entity_types.as_ref()
    }

    /// The entity-type schemas, for extension.
    pub fn entity_types_mut(&mut self) -> Option<&mut EntityTypeRegistry> {
        self.entity_types.as_mut()
    }
}

impl Default for SchemaContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from context operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The context was already sealed.
    #[error("schema context is already sealed")]
    AlreadySealed,

    /// Entity types need a sealed context.
    #[error("schema context is not sealed")]
    NotSealed,

    /// A schema operation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
