//! The slot query surface consulted by the formula compiler.
//!
//! The compiler resolves an attribute name to a slot once, when it compiles
//! the expression, and evaluates against the slot number from then on.
//! Neither an unknown name nor a stale slot number is an error: both come
//! back as `None` and the caller reports "unknown attribute".

use formula_schema_core::TypeAnnotation;

use crate::SchemaEntry;

/// Name and slot lookups over an ordered slot table.
pub trait SlotResolver {
    /// Resolve an attribute name to its slot.
    fn resolve_slot(&self, name: &str) -> Option<usize>;

    /// The slot table, indexed by slot number.
    fn entries(&self) -> &[SchemaEntry];

    /// Number of slots.
    fn num_slots(&self) -> usize {
        self.entries().len()
    }

    /// The entry at `slot`.
    ///
    /// Accepts any integer type; negative and out-of-range slots give `None`.
    fn entry_at<S>(&self, slot: S) -> Option<&SchemaEntry>
    where
        S: TryInto<usize>,
        Self: Sized,
    {
        let index = slot.try_into().ok()?;
        self.entries().get(index)
    }

    /// The entry an attribute name resolves to.
    fn entry_named(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries().get(self.resolve_slot(name)?)
    }

    /// The declared type of an attribute.
    fn type_of(&self, name: &str) -> Option<&TypeAnnotation> {
        self.entry_named(name).map(SchemaEntry::data_type)
    }

    /// Attribute names starting with `prefix`, sorted, for autocomplete.
    fn completions(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries()
            .iter()
            .map(SchemaEntry::id)
            .filter(|id| id.starts_with(prefix))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
