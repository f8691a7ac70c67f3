//! BaseSchemaRegistry - the built-in slot table shared by every entity type.
//!
//! The base registry turns the compiled-in [`BUILTIN_PROPERTIES`] table into
//! parsed [`SchemaEntry`] values, assigns each its slot (its position in the
//! table) and indexes the names. Every [`EntityTypeSchema`](crate::EntityTypeSchema)
//! starts from a copy of this table, so built-in slot numbers are identical
//! across all entity types for the life of the process.
//!
//! # Process-wide handle
//!
//! [`BaseSchemaRegistry::initialize`] builds the registry once and publishes
//! it through a `OnceLock`; later calls return the already published handle.
//! Schemas are handed the `Arc` explicitly rather than reaching for the
//! global themselves, so tests can build private registries with
//! [`BaseSchemaRegistry::from_definitions`].
//!
//! # Thread Safety
//!
//! Immutable once built. Build it before any concurrent scripting begins;
//! afterwards it can be read from any thread.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use formula_schema_core::{
    LEVEL_TYPE, NominalType, SchemaError, SchemaResult, TypeAnnotation, parse_type,
};

use crate::builtin::{BUILTIN_PROPERTIES, BuiltinProperty, BuiltinSlot};
use crate::{EntryFlags, NominalTypeRegistry, SchemaEntry, SlotResolver};

/// Attribute names that denote the entity itself.
pub(crate) const SELF_SLOT_NAMES: [&str; 2] = ["me", "self"];

static GLOBAL_BASE: OnceLock<Arc<BaseSchemaRegistry>> = OnceLock::new();

/// The built-in slot table.
#[derive(Debug, Clone)]
pub struct BaseSchemaRegistry {
    entries: Vec<SchemaEntry>,
    slots: FxHashMap<String, usize>,
}

impl BaseSchemaRegistry {
    /// Build the process-wide registry once and publish it.
    ///
    /// Later calls return the already published handle and ignore `types`.
    /// An error here means the compiled-in tables are inconsistent or the
    /// environment lacks a required type; startup should abort.
    pub fn initialize(types: &NominalTypeRegistry) -> SchemaResult<&'static Arc<Self>> {
        if let Some(existing) = GLOBAL_BASE.get() {
            return Ok(existing);
        }
        let built = Arc::new(Self::build(types)?);
        Ok(GLOBAL_BASE.get_or_init(|| built))
    }

    /// The process-wide registry, initializing it against
    /// [`NominalTypeRegistry::with_builtins`] on first use.
    pub fn instance() -> SchemaResult<&'static Arc<Self>> {
        match GLOBAL_BASE.get() {
            Some(existing) => Ok(existing),
            None => Self::initialize(&NominalTypeRegistry::with_builtins()),
        }
    }

    /// The process-wide registry, if it has been initialized.
    pub fn global() -> Option<&'static Arc<Self>> {
        GLOBAL_BASE.get()
    }

    /// Build a registry from the compiled-in built-in table.
    pub fn build(types: &NominalTypeRegistry) -> SchemaResult<Self> {
        check_builtin_table(BUILTIN_PROPERTIES)?;
        Self::from_definitions(BUILTIN_PROPERTIES.iter().map(|p| (p.name, p.type_name)), types)
    }

    /// Build a registry from an arbitrary `(name, type)` definition table.
    ///
    /// Slots are assigned in iteration order. `me` and `self` are rebound
    /// to the generic entity type and `level` to the environment's level
    /// type, when present.
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = (&'a str, &'a str)>,
        types: &NominalTypeRegistry,
    ) -> SchemaResult<Self> {
        let mut entries = Vec::new();
        let mut slots = FxHashMap::default();

        for (name, type_name) in definitions {
            let data_type =
                parse_type(type_name).map_err(|source| SchemaError::MalformedTypeSyntax {
                    property: name.to_string(),
                    source,
                })?;

            if let Some(&slot) = slots.get(name) {
                return Err(SchemaError::DuplicateProperty {
                    name: name.to_string(),
                    slot,
                });
            }

            let mut flags = EntryFlags::BUILTIN;
            if SELF_SLOT_NAMES.contains(&name) {
                flags |= EntryFlags::SELF_TYPE;
            }
            slots.insert(name.to_string(), entries.len());
            entries.push(SchemaEntry::new(name, data_type, flags));
        }

        for name in SELF_SLOT_NAMES {
            if let Some(&slot) = slots.get(name) {
                entries[slot].set_initial_type(NominalType::custom_object().into());
            }
        }

        if let Some(&slot) = slots.get(LEVEL_TYPE) {
            let level = types.lookup_type_by_name(LEVEL_TYPE).cloned().ok_or_else(|| {
                SchemaError::UnknownNominalType {
                    name: LEVEL_TYPE.to_string(),
                }
            })?;
            entries[slot].set_initial_type(level.into());
        }

        for entry in &entries {
            types.validate(entry.data_type())?;
        }

        log::debug!("built base schema registry with {} slots", entries.len());
        Ok(Self { entries, slots })
    }

    /// Look up the slot of a built-in name.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_key_slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    /// The entry at a built-in slot.
    pub fn builtin(&self, slot: BuiltinSlot) -> Option<&SchemaEntry> {
        self.entries.get(slot.index())
    }

    /// Whether `name` is a built-in attribute.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Number of built-in slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The declared type of a built-in attribute.
    pub fn declared_type(&self, name: &str) -> Option<&TypeAnnotation> {
        self.get_key_slot(name).map(|slot| self.entries[slot].data_type())
    }
}

impl SlotResolver for BaseSchemaRegistry {
    fn resolve_slot(&self, name: &str) -> Option<usize> {
        self.get_key_slot(name)
    }

    fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }
}

/// Check a definition table against the compiled-in slot constants.
pub(crate) fn check_builtin_table(table: &[BuiltinProperty]) -> SchemaResult<()> {
    if table.len() != BuiltinSlot::COUNT {
        return Err(SchemaError::BuiltinCountMismatch {
            expected: BuiltinSlot::COUNT,
            actual: table.len(),
        });
    }

    for (slot, expected) in BuiltinSlot::DESIGNATED {
        let found = table[slot.index()].name;
        if found != expected {
            return Err(SchemaError::BuiltinSlotMismatch {
                slot: slot.index(),
                expected,
                found: found.to_string(),
            });
        }
    }
    Ok(())
}
