//! Schema slot entries.
//!
//! A [`SchemaEntry`] is one named, typed slot. Entries that describe a
//! schema-typed value (`parent`, `lib`) also carry a [`SchemaRef`]: a
//! non-owning key into whichever registry owns the referenced definition.

use std::fmt;

use bitflags::bitflags;
use formula_schema_core::{SchemaError, TypeAnnotation, TypeHash};

/// Identifier of an entity-type schema inside an
/// [`EntityTypeRegistry`](crate::EntityTypeRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub u32);

impl SchemaId {
    /// The canonical singleton schema every registry creates first.
    pub const CANONICAL: SchemaId = SchemaId(0);

    /// Index into the owning registry's schema table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A non-owning reference from a slot to the definition describing its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRef {
    /// An entity-type schema in the same [`EntityTypeRegistry`](crate::EntityTypeRegistry).
    Schema(SchemaId),
    /// A definition owned by the environment (e.g. the library), keyed by
    /// its nominal type hash in the [`NominalTypeRegistry`](crate::NominalTypeRegistry).
    Definition(TypeHash),
}

bitflags! {
    /// Provenance and rebinding state of a slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u8 {
        /// Comes from the base registry.
        const BUILTIN = 1 << 0;
        /// Appended by `add_property`.
        const CUSTOM = 1 << 1;
        /// Denotes the entity itself (`me`, `self`).
        const SELF_TYPE = 1 << 2;
        /// The declared type was replaced after construction.
        const REBOUND = 1 << 3;
    }
}

/// One named slot in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    id: String,
    data_type: TypeAnnotation,
    nested: Option<SchemaRef>,
    flags: EntryFlags,
}

impl SchemaEntry {
    /// Create an entry.
    pub fn new(id: impl Into<String>, data_type: TypeAnnotation, flags: EntryFlags) -> Self {
        Self {
            id: id.into(),
            data_type,
            nested: None,
            flags,
        }
    }

    /// The attribute name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The declared type.
    pub fn data_type(&self) -> &TypeAnnotation {
        &self.data_type
    }

    /// The definition describing this slot's value, if it is schema-typed.
    pub fn nested_schema(&self) -> Option<SchemaRef> {
        self.nested
    }

    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn is_builtin(&self) -> bool {
        self.flags.contains(EntryFlags::BUILTIN)
    }

    pub fn is_custom(&self) -> bool {
        self.flags.contains(EntryFlags::CUSTOM)
    }

    /// Replace the declared type of a freshly built entry.
    ///
    /// Only used while a table is being populated; does not count as the
    /// one post-construction rebind.
    pub(crate) fn set_initial_type(&mut self, data_type: TypeAnnotation) {
        self.data_type = data_type;
    }

    /// Replace the declared type after construction.
    ///
    /// Allowed exactly once per entry.
    pub(crate) fn rebind_type(&mut self, data_type: TypeAnnotation) -> Result<(), SchemaError> {
        if self.flags.contains(EntryFlags::REBOUND) {
            return Err(SchemaError::SelfTypeAlreadyBound);
        }
        self.data_type = data_type;
        self.flags.insert(EntryFlags::REBOUND);
        Ok(())
    }

    pub(crate) fn set_nested_schema(&mut self, nested: Option<SchemaRef>) {
        self.nested = nested;
    }

    pub(crate) fn insert_flags(&mut self, flags: EntryFlags) {
        self.flags.insert(flags);
    }
}

impl fmt::Display for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.data_type)
    }
}
