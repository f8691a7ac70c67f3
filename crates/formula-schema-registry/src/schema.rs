//! EntityTypeSchema - the slot table of one scripted entity type.
//!
//! Each schema starts as a value copy of the base registry's table, so the
//! first `base.len()` slots are the built-ins in base order. Designers may
//! append custom properties after them; each lands on the next free slot and
//! is recorded in the schema's private overlay map.
//!
//! # Lifecycle
//!
//! 1. [`EntityTypeSchema::create`] copies the base table and points `parent`
//!    and `lib` at their definitions.
//! 2. [`EntityTypeSchema::set_object_type`] closes the self-reference once the
//!    entity's nominal type exists (at most once).
//! 3. [`EntityTypeSchema::add_property`] appends custom slots (any number of
//!    times, never removed).
//! 4. [`EntityTypeSchema::finalize`] ends the mutation phase before the schema
//!    is handed to the compiler.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use formula_schema_core::{SchemaError, SchemaResult, TypeAnnotation, parse_type};

use crate::base::SELF_SLOT_NAMES;
use crate::{
    BaseSchemaRegistry, EntryFlags, NominalTypeRegistry, SchemaEntry, SchemaId, SchemaRef,
    SlotResolver,
};

/// How `add_property` treats a name that already resolves on the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowPolicy {
    /// Fail with [`SchemaError::ShadowsBuiltin`] or [`SchemaError::DuplicateProperty`].
    #[default]
    Reject,
    /// Log a warning, drop the new definition and keep the existing slot.
    Ignore,
    /// Log a warning and append a new slot that the name resolves to from
    /// then on. The old slot stays in the table but is unreachable by name.
    Shadow,
}

/// Schema construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaOptions {
    pub shadow_policy: ShadowPolicy,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shadow_policy(mut self, shadow_policy: ShadowPolicy) -> Self {
        self.shadow_policy = shadow_policy;
        self
    }
}

/// Where a new schema's `parent` slot points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentBinding {
    /// The schema is the canonical singleton; `parent` points at itself.
    Singleton,
    /// `parent` points at the canonical singleton.
    Canonical(SchemaId),
}

/// The slot table of one entity type.
#[derive(Debug, Clone)]
pub struct EntityTypeSchema {
    id: SchemaId,
    type_name: String,
    base: Arc<BaseSchemaRegistry>,
    entries: Vec<SchemaEntry>,
    /// Custom property name -> appended slot.
    properties: FxHashMap<String, usize>,
    is_singleton: bool,
    object_type: Option<TypeAnnotation>,
    finalized: bool,
    options: SchemaOptions,
}

impl EntityTypeSchema {
    /// Create a schema from a copy of `base`.
    pub fn create(
        id: SchemaId,
        type_name: impl Into<String>,
        base: Arc<BaseSchemaRegistry>,
        parent: ParentBinding,
        types: &NominalTypeRegistry,
        options: SchemaOptions,
    ) -> Self {
        let type_name = type_name.into();
        let mut entries = base.entries().to_vec();

        let (parent_id, is_singleton) = match parent {
            ParentBinding::Singleton => (id, true),
            ParentBinding::Canonical(canonical) => (canonical, false),
        };
        if let Some(slot) = base.get_key_slot("parent") {
            entries[slot].set_nested_schema(Some(SchemaRef::Schema(parent_id)));
        }

        if let Some(slot) = base.get_key_slot("lib") {
            match types.library_definition() {
                Some(library) => {
                    entries[slot].set_nested_schema(Some(SchemaRef::Definition(library)))
                }
                None => log::warn!(
                    "no library definition registered; 'lib' on '{}' has no nested schema",
                    type_name
                ),
            }
        }

        log::debug!(
            "created {} schema {} for '{}'",
            if is_singleton { "singleton" } else { "instance" },
            id,
            type_name
        );

        Self {
            id,
            type_name,
            base,
            entries,
            properties: FxHashMap::default(),
            is_singleton,
            object_type: None,
            finalized: false,
            options,
        }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Name of the entity type this schema describes.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether this is the canonical singleton schema.
    pub fn is_singleton(&self) -> bool {
        self.is_singleton
    }

    /// The base registry this schema was copied from.
    pub fn base(&self) -> &Arc<BaseSchemaRegistry> {
        &self.base
    }

    /// The type bound by [`set_object_type`](Self::set_object_type), if any.
    pub fn object_type(&self) -> Option<&TypeAnnotation> {
        self.object_type.as_ref()
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    /// Whether the schema has stopped accepting mutation.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Bind `me` and `self` to the concrete entity type.
    ///
    /// Slot numbers do not change. May be called once.
    pub fn set_object_type(&mut self, object_type: impl Into<TypeAnnotation>) -> SchemaResult<()> {
        self.ensure_mutable()?;
        if self.object_type.is_some() {
            return Err(SchemaError::SelfTypeAlreadyBound);
        }

        let object_type = object_type.into();
        for name in SELF_SLOT_NAMES {
            if let Some(slot) = self.base.get_key_slot(name) {
                self.entries[slot].rebind_type(object_type.clone())?;
            }
        }
        self.object_type = Some(object_type);
        Ok(())
    }

    /// Append a custom property declared with a type string.
    ///
    /// Returns the slot the name resolves to afterwards.
    pub fn add_property(&mut self, name: &str, type_string: &str) -> SchemaResult<usize> {
        let data_type = parse_type(type_string).map_err(|source| SchemaError::MalformedTypeSyntax {
            property: name.to_string(),
            source,
        })?;
        self.add_property_type(name, data_type)
    }

    /// Append a custom property with an already parsed type.
    ///
    /// Returns the slot the name resolves to afterwards. A name that is a
    /// built-in or an existing custom property is handled according to the
    /// schema's [`ShadowPolicy`].
    pub fn add_property_type(
        &mut self,
        name: &str,
        data_type: TypeAnnotation,
    ) -> SchemaResult<usize> {
        self.ensure_mutable()?;

        // overlay first: under `Shadow` it may already hold a built-in name
        let existing = match self.properties.get(name) {
            Some(&slot) => Some((slot, false)),
            None => self.base.get_key_slot(name).map(|slot| (slot, true)),
        };

        if let Some((slot, builtin)) = existing {
            match self.options.shadow_policy {
                ShadowPolicy::Reject if builtin => {
                    return Err(SchemaError::ShadowsBuiltin {
                        name: name.to_string(),
                        slot,
                    });
                }
                ShadowPolicy::Reject => {
                    return Err(SchemaError::DuplicateProperty {
                        name: name.to_string(),
                        slot,
                    });
                }
                ShadowPolicy::Ignore => {
                    log::warn!(
                        "ignoring custom property '{}' on '{}': already resolves to slot {}",
                        name,
                        self.type_name,
                        slot
                    );
                    return Ok(slot);
                }
                ShadowPolicy::Shadow => {
                    log::warn!(
                        "custom property '{}' on '{}' shadows slot {}",
                        name,
                        self.type_name,
                        slot
                    );
                }
            }
        }

        let slot = self.entries.len();
        log::trace!(
            "'{}': custom property '{}: {}' at slot {}",
            self.type_name,
            name,
            data_type,
            slot
        );
        self.entries
            .push(SchemaEntry::new(name, data_type, EntryFlags::CUSTOM));
        self.properties.insert(name.to_string(), slot);
        Ok(slot)
    }

    /// End the mutation phase.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Number of custom properties.
    pub fn custom_property_count(&self) -> usize {
        self.properties.len()
    }

    /// Custom property entries as `(name, slot)`, in slot order.
    ///
    /// Includes entries a later [`ShadowPolicy::Shadow`] definition replaced.
    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, usize)> {
        let base_len = self.base.len();
        self.entries[base_len..]
            .iter()
            .enumerate()
            .map(move |(offset, entry)| (entry.id(), base_len + offset))
    }

    fn ensure_mutable(&self) -> SchemaResult<()> {
        if self.finalized {
            return Err(SchemaError::SchemaFinalized {
                schema: self.type_name.clone(),
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn entry_mut(&mut self, slot: usize) -> Option<&mut SchemaEntry> {
        self.entries.get_mut(slot)
    }
}

impl SlotResolver for EntityTypeSchema {
    /// Overlay first: custom slot numbers are only known to this schema.
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn resolve_slot(&self, name: &str) -> Option<usize> {
        match self.properties.get(name) {
            Some(&slot) => Some(slot),
            None => self.base.get_key_slot(name),
        }
    }

    fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BuiltinSlot;
    use formula_schema_core::{NominalType, PrimitiveKind, TypeHash};

    fn base() -> Arc<BaseSchemaRegistry> {
        let _ = env_logger::builder().is_test(true).try_init();
        Arc::new(BaseSchemaRegistry::build(&NominalTypeRegistry::with_builtins()).unwrap())
    }

    fn instance(base: &Arc<BaseSchemaRegistry>, options: SchemaOptions) -> EntityTypeSchema {
        EntityTypeSchema::create(
            SchemaId(1),
            "frogatto",
            Arc::clone(base),
            ParentBinding::Canonical(SchemaId::CANONICAL),
            &NominalTypeRegistry::with_builtins(),
            options,
        )
    }

    #[test]
    fn copies_base_table() {
        let base = base();
        let schema = instance(&base, SchemaOptions::default());
        assert_eq!(schema.num_slots(), base.len());
        for (slot, entry) in base.entries().iter().enumerate() {
            assert_eq!(schema.entry_at(slot).map(|e| e.id()), Some(entry.id()));
        }
    }

    #[test]
    fn parent_binding() {
        let base = base();
        let types = NominalTypeRegistry::with_builtins();
        let canonical = EntityTypeSchema::create(
            SchemaId::CANONICAL,
            "custom_obj",
            Arc::clone(&base),
            ParentBinding::Singleton,
            &types,
            SchemaOptions::default(),
        );
        let parent = BuiltinSlot::Parent.index();
        assert!(canonical.is_singleton());
        assert_eq!(
            canonical.entry_at(parent).unwrap().nested_schema(),
            Some(SchemaRef::Schema(SchemaId::CANONICAL))
        );

        let child = instance(&base, SchemaOptions::default());
        assert!(!child.is_singleton());
        assert_eq!(
            child.entry_at(parent).unwrap().nested_schema(),
            Some(SchemaRef::Schema(SchemaId::CANONICAL))
        );
        assert_eq!(base.builtin(BuiltinSlot::Parent).unwrap().nested_schema(), None);
    }

    #[test]
    fn lib_points_at_library_definition() {
        let schema = instance(&base(), SchemaOptions::default());
        assert_eq!(
            schema.entry_named("lib").unwrap().nested_schema(),
            Some(SchemaRef::Definition(TypeHash::from_name("library")))
        );
    }

    #[test]
    fn set_object_type_rebinds_self_slots() {
        let base = base();
        let mut schema = instance(&base, SchemaOptions::default());
        let me = schema.resolve_slot("me");
        let this = schema.resolve_slot("self");

        schema.set_object_type(NominalType::new("frogatto")).unwrap();

        let expected = TypeAnnotation::nominal("frogatto");
        assert_eq!(schema.type_of("me"), Some(&expected));
        assert_eq!(schema.type_of("self"), Some(&expected));
        assert_eq!(schema.resolve_slot("me"), me);
        assert_eq!(schema.resolve_slot("self"), this);
        assert_eq!(schema.object_type(), Some(&expected));
        // the shared base is untouched
        assert_eq!(base.declared_type("me"), Some(&TypeAnnotation::nominal("custom_obj")));
    }

    #[test]
    fn set_object_type_only_once() {
        let mut schema = instance(&base(), SchemaOptions::default());
        schema.set_object_type(NominalType::new("frogatto")).unwrap();
        assert_eq!(
            schema.set_object_type(NominalType::new("other")),
            Err(SchemaError::SelfTypeAlreadyBound)
        );
    }

    #[test]
    fn rebound_entry_rejects_second_rebind() {
        let mut schema = instance(&base(), SchemaOptions::default());
        schema.set_object_type(NominalType::new("frogatto")).unwrap();
        let me = schema.resolve_slot("me").unwrap();
        let entry = schema.entry_mut(me).unwrap();
        assert!(entry.flags().contains(EntryFlags::REBOUND));
        assert!(entry.rebind_type(TypeAnnotation::any()).is_err());
    }

    #[test]
    fn add_property_appends() {
        let base = base();
        let mut schema = instance(&base, SchemaOptions::default());
        let slot = schema.add_property("custom_field", "int").unwrap();
        assert_eq!(slot, base.len());
        assert_eq!(schema.resolve_slot("custom_field"), Some(slot));
        let entry = schema.entry_at(slot).unwrap();
        assert_eq!(entry.data_type(), &TypeAnnotation::Primitive(PrimitiveKind::Int));
        assert!(entry.is_custom());

        let second = schema.add_property("jump_power", "decimal").unwrap();
        assert_eq!(second, slot + 1);
        assert_eq!(
            schema.custom_properties().collect::<Vec<_>>(),
            [("custom_field", slot), ("jump_power", slot + 1)]
        );
        assert_eq!(schema.custom_property_count(), 2);
    }

    #[test]
    fn add_property_malformed_type() {
        let mut schema = instance(&base(), SchemaOptions::default());
        let err = schema.add_property("broken", "[int").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedTypeSyntax { .. }));
        assert_eq!(schema.resolve_slot("broken"), None);
    }

    #[test]
    fn reject_policy() {
        let mut schema = instance(&base(), SchemaOptions::default());
        assert_eq!(
            schema.add_property("x", "decimal"),
            Err(SchemaError::ShadowsBuiltin {
                name: "x".into(),
                slot: BuiltinSlot::X.index()
            })
        );
        let slot = schema.add_property("coins", "int").unwrap();
        assert_eq!(
            schema.add_property("coins", "string"),
            Err(SchemaError::DuplicateProperty {
                name: "coins".into(),
                slot
            })
        );
    }

    #[test]
    fn ignore_policy_keeps_existing_slot() {
        let base = base();
        let options = SchemaOptions::new().with_shadow_policy(ShadowPolicy::Ignore);
        let mut schema = instance(&base, options);
        assert_eq!(schema.add_property("x", "decimal"), Ok(BuiltinSlot::X.index()));
        assert_eq!(schema.type_of("x"), Some(&TypeAnnotation::int()));
        assert_eq!(schema.num_slots(), base.len());

        let slot = schema.add_property("coins", "int").unwrap();
        assert_eq!(schema.add_property("coins", "string"), Ok(slot));
        assert_eq!(schema.type_of("coins"), Some(&TypeAnnotation::int()));
    }

    #[test]
    fn shadow_policy_moves_name_to_newest_slot() {
        let base = base();
        let options = SchemaOptions::new().with_shadow_policy(ShadowPolicy::Shadow);
        let mut schema = instance(&base, options);

        let x = schema.add_property("x", "decimal").unwrap();
        assert_eq!(x, base.len());
        assert_eq!(schema.resolve_slot("x"), Some(x));
        assert_eq!(
            schema.type_of("x"),
            Some(&TypeAnnotation::primitive(PrimitiveKind::Decimal))
        );
        assert_eq!(schema.entry_at(BuiltinSlot::X.index()).unwrap().id(), "x");

        let first = schema.add_property("coins", "int").unwrap();
        let second = schema.add_property("coins", "string").unwrap();
        assert_eq!(second, first + 1);
        assert_eq!(schema.resolve_slot("coins"), Some(second));
        assert_eq!(schema.custom_property_count(), 2);
        assert_eq!(schema.custom_properties().count(), 3);

        // the base registry is untouched
        assert_eq!(base.get_key_slot("x"), Some(BuiltinSlot::X.index()));
    }

    #[test]
    fn missing_library_leaves_lib_unbound() {
        let mut types = NominalTypeRegistry::new();
        types
            .register("custom_obj", crate::NominalKind::Entity)
            .unwrap();
        types.register("level", crate::NominalKind::Level).unwrap();
        assert_eq!(types.library_definition(), None);

        let base = Arc::new(BaseSchemaRegistry::build(&types).unwrap());
        let schema = EntityTypeSchema::create(
            SchemaId(1),
            "frogatto",
            Arc::clone(&base),
            ParentBinding::Canonical(SchemaId::CANONICAL),
            &types,
            SchemaOptions::default(),
        );
        assert_eq!(schema.entry_named("lib").unwrap().nested_schema(), None);
        assert_eq!(
            schema.entry_named("parent").unwrap().nested_schema(),
            Some(SchemaRef::Schema(SchemaId::CANONICAL))
        );
    }

    #[test]
    fn finalized_schema_is_frozen() {
        let mut schema = instance(&base(), SchemaOptions::default());
        schema.finalize();
        assert!(schema.is_finalized());
        assert!(matches!(
            schema.add_property("late", "int"),
            Err(SchemaError::SchemaFinalized { .. })
        ));
        assert!(matches!(
            schema.set_object_type(NominalType::new("frogatto")),
            Err(SchemaError::SchemaFinalized { .. })
        ));
    }

    #[test]
    fn out_of_range_slots() {
        let schema = instance(&base(), SchemaOptions::default());
        assert!(schema.entry_at(-1).is_none());
        assert!(schema.entry_at(schema.num_slots()).is_none());
        assert!(schema.entry_at(schema.num_slots() - 1).is_some());
    }
}
