//! EntityTypeRegistry - owner of every entity-type schema.
//!
//! The registry creates the canonical singleton schema (the generic
//! `custom_obj` type) when it is constructed, then one independent schema per
//! entity type as definitions load. Schemas reference each other only by
//! [`SchemaId`], so nothing here is reference counted: every schema lives as
//! long as the registry, and the base registry they copy from is shared
//! through an `Arc`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use formula_schema_core::{CUSTOM_OBJECT_TYPE, NominalType, SchemaError, SchemaResult, TypeHash};

use crate::{
    BaseSchemaRegistry, EntityTypeSchema, NominalKind, NominalTypeRegistry, ParentBinding,
    SchemaId, SchemaOptions, SchemaRef, SlotResolver,
};

/// Where an attribute path ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResolution {
    /// The schema holding the final attribute.
    pub schema: SchemaId,
    /// The final attribute's slot in that schema.
    pub slot: usize,
}

/// Owns the canonical schema and every entity-type schema.
#[derive(Debug)]
pub struct EntityTypeRegistry {
    base: Arc<BaseSchemaRegistry>,
    schemas: Vec<EntityTypeSchema>,
    by_name: FxHashMap<String, SchemaId>,
    options: SchemaOptions,
}

impl EntityTypeRegistry {
    /// Create a registry and its canonical singleton schema.
    pub fn new(
        base: Arc<BaseSchemaRegistry>,
        types: &NominalTypeRegistry,
        options: SchemaOptions,
    ) -> Self {
        let mut canonical = EntityTypeSchema::create(
            SchemaId::CANONICAL,
            CUSTOM_OBJECT_TYPE,
            Arc::clone(&base),
            ParentBinding::Singleton,
            types,
            options,
        );
        canonical.finalize();

        let mut by_name = FxHashMap::default();
        by_name.insert(CUSTOM_OBJECT_TYPE.to_string(), SchemaId::CANONICAL);

        Self {
            base,
            schemas: vec![canonical],
            by_name,
            options,
        }
    }

    /// The shared base registry.
    pub fn base(&self) -> &Arc<BaseSchemaRegistry> {
        &self.base
    }

    /// The canonical singleton schema.
    pub fn canonical(&self) -> &EntityTypeSchema {
        &self.schemas[SchemaId::CANONICAL.index()]
    }

    /// Create the schema for a new entity type.
    ///
    /// `me`/`self` keep the generic entity type until
    /// [`EntityTypeSchema::set_object_type`] is called.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        types: &NominalTypeRegistry,
    ) -> SchemaResult<SchemaId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(SchemaError::DuplicateEntityType { name });
        }

        let id = schema_id_for(self.schemas.len())?;
        let schema = EntityTypeSchema::create(
            id,
            name.clone(),
            Arc::clone(&self.base),
            ParentBinding::Canonical(SchemaId::CANONICAL),
            types,
            self.options,
        );
        self.schemas.push(schema);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Define an entity type, register its nominal type and bind it as the
    /// schema's object type in one step.
    ///
    /// A name already registered as a non-entity type (the level, the
    /// library, an external type) is rejected before any schema is created.
    pub fn define_entity(
        &mut self,
        name: impl Into<String>,
        types: &mut NominalTypeRegistry,
    ) -> SchemaResult<SchemaId> {
        let name = name.into();
        let existing = match types.get(TypeHash::from_name(&name)) {
            Some(entry) if entry.kind != NominalKind::Entity => {
                return Err(SchemaError::DuplicateNominalType { name });
            }
            Some(entry) => Some(entry.ty.clone()),
            None => None,
        };

        let id = self.define(name.clone(), types)?;
        let object_type = match existing {
            Some(ty) => ty,
            None => {
                types.register(name.clone(), NominalKind::Entity)?;
                NominalType::new(name)
            }
        };
        self.schema_mut(id)?.set_object_type(object_type)?;
        Ok(id)
    }

    /// Get a schema by id.
    pub fn get(&self, id: SchemaId) -> Option<&EntityTypeSchema> {
        self.schemas.get(id.index())
    }

    /// Get a schema by id for extension.
    pub fn schema_mut(&mut self, id: SchemaId) -> SchemaResult<&mut EntityTypeSchema> {
        self.schemas
            .get_mut(id.index())
            .ok_or(SchemaError::UnknownSchema { id: id.0 })
    }

    /// The id of the schema for an entity-type name.
    pub fn id_of(&self, name: &str) -> Option<SchemaId> {
        self.by_name.get(name).copied()
    }

    /// Get a schema by entity-type name.
    pub fn lookup(&self, name: &str) -> Option<&EntityTypeSchema> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Resolve a dotted attribute path such as `parent.x`.
    ///
    /// Each segment but the last must be a slot whose nested schema is an
    /// entity-type schema in this registry. Returns `None` for an empty
    /// path, an unknown segment, or a segment that cannot be followed.
    pub fn resolve_path(&self, start: SchemaId, path: &[&str]) -> Option<PathResolution> {
        let (last, prefix) = path.split_last()?;
        let mut current = start;

        for segment in prefix {
            let schema = self.get(current)?;
            let entry = schema.entry_named(segment)?;
            match entry.nested_schema()? {
                SchemaRef::Schema(next) => current = next,
                SchemaRef::Definition(_) => return None,
            }
        }

        let slot = self.get(current)?.resolve_slot(last)?;
        Some(PathResolution {
            schema: current,
            slot,
        })
    }

    /// Number of schemas, including the canonical one.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate over all schemas in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityTypeSchema> {
        self.schemas.iter()
    }
}

/// The id for the schema stored at `index`.
fn schema_id_for(index: usize) -> SchemaResult<SchemaId> {
    u32::try_from(index)
        .map(SchemaId)
        .map_err(|_| SchemaError::TooManySchemas {
            limit: u64::from(u32::MAX) + 1,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_schema_core::TypeAnnotation;

    fn registry() -> (EntityTypeRegistry, NominalTypeRegistry) {
        let types = NominalTypeRegistry::with_builtins();
        let base = Arc::new(BaseSchemaRegistry::build(&types).unwrap());
        (
            EntityTypeRegistry::new(base, &types, SchemaOptions::default()),
            types,
        )
    }

    #[test]
    fn canonical_schema_exists() {
        let (registry, _) = registry();
        let canonical = registry.canonical();
        assert_eq!(canonical.id(), SchemaId::CANONICAL);
        assert!(canonical.is_singleton());
        assert!(canonical.is_finalized());
        assert_eq!(registry.id_of("custom_obj"), Some(SchemaId::CANONICAL));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn define_assigns_sequential_ids() {
        let (mut registry, types) = registry();
        let a = registry.define("frogatto", &types).unwrap();
        let b = registry.define("ant", &types).unwrap();
        assert_eq!(a, SchemaId(1));
        assert_eq!(b, SchemaId(2));
        assert_eq!(registry.lookup("ant").map(|s| s.id()), Some(b));
        assert!(!registry.get(a).unwrap().is_singleton());
    }

    #[test]
    fn define_rejects_duplicate_names() {
        let (mut registry, types) = registry();
        registry.define("frogatto", &types).unwrap();
        assert_eq!(
            registry.define("frogatto", &types),
            Err(SchemaError::DuplicateEntityType {
                name: "frogatto".into()
            })
        );
    }

    #[test]
    fn define_entity_binds_self_type() {
        let (mut registry, mut types) = registry();
        let id = registry.define_entity("frogatto", &mut types).unwrap();
        assert!(types.lookup_type_by_name("frogatto").is_some());
        assert_eq!(
            registry.get(id).unwrap().type_of("me"),
            Some(&TypeAnnotation::nominal("frogatto"))
        );
    }

    #[test]
    fn define_entity_rejects_non_entity_names() {
        let (mut registry, mut types) = registry();
        types.register("tile_map", NominalKind::External).unwrap();

        for name in ["level", "library", "tile_map"] {
            assert_eq!(
                registry.define_entity(name, &mut types),
                Err(SchemaError::DuplicateNominalType { name: name.into() })
            );
            assert_eq!(registry.id_of(name), None);
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(
            types.get(TypeHash::from_name("level")).map(|e| e.kind),
            Some(NominalKind::Level)
        );
    }

    #[test]
    fn define_entity_reuses_registered_entity_type() {
        let (mut registry, mut types) = registry();
        types.register("frogatto", NominalKind::Entity).unwrap();
        let id = registry.define_entity("frogatto", &mut types).unwrap();
        assert_eq!(
            registry.get(id).unwrap().type_of("self"),
            Some(&TypeAnnotation::nominal("frogatto"))
        );
    }

    #[test]
    fn schema_ids_are_checked() {
        assert_eq!(schema_id_for(7), Ok(SchemaId(7)));
        assert_eq!(schema_id_for(u32::MAX as usize), Ok(SchemaId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            schema_id_for(u32::MAX as usize + 1),
            Err(SchemaError::TooManySchemas {
                limit: 1 << 32
            })
        );
    }

    #[test]
    fn schema_mut_unknown_id() {
        let (mut registry, _) = registry();
        assert!(matches!(
            registry.schema_mut(SchemaId(42)),
            Err(SchemaError::UnknownSchema { id: 42 })
        ));
    }

    #[test]
    fn resolve_path_through_parent() {
        let (mut registry, types) = registry();
        let id = registry.define("frogatto", &types).unwrap();
        registry
            .schema_mut(id)
            .unwrap()
            .add_property("coins", "int")
            .unwrap();

        let resolved = registry.resolve_path(id, &["parent", "x"]).unwrap();
        assert_eq!(resolved.schema, SchemaId::CANONICAL);
        assert_eq!(resolved.slot, registry.base().get_key_slot("x").unwrap());

        let own = registry.resolve_path(id, &["coins"]).unwrap();
        assert_eq!(own.schema, id);

        // custom properties of the child are not visible through the parent
        assert_eq!(registry.resolve_path(id, &["parent", "coins"]), None);
    }

    #[test]
    fn resolve_path_stops_at_external_definitions() {
        let (mut registry, types) = registry();
        let id = registry.define("frogatto", &types).unwrap();
        assert_eq!(registry.resolve_path(id, &["lib", "anything"]), None);
        assert_eq!(registry.resolve_path(id, &["x", "y"]), None);
        assert_eq!(registry.resolve_path(id, &[]), None);
    }
}
