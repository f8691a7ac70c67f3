//! Named, non-primitive types referenced from type annotations.

use std::fmt;

use crate::TypeHash;

/// Name of the generic entity type every scripted object satisfies.
pub const CUSTOM_OBJECT_TYPE: &str = "custom_obj";

/// Name of the level (world) type supplied by the environment.
pub const LEVEL_TYPE: &str = "level";

/// Name of the library/globals definition supplied by the environment.
pub const LIBRARY_TYPE: &str = "library";

/// A nominal type reference.
///
/// Carries the name for diagnostics and the derived [`TypeHash`] as the
/// identity. Two nominal types are equal iff their hashes are equal.
#[derive(Clone, Eq)]
pub struct NominalType {
    name: String,
    hash: TypeHash,
}

impl NominalType {
    /// Create a nominal type reference from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = TypeHash::from_name(&name);
        Self { name, hash }
    }

    /// The generic entity type (`custom_obj`).
    pub fn custom_object() -> Self {
        Self::new(CUSTOM_OBJECT_TYPE)
    }

    /// The type's name as written in type strings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type's identity hash.
    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }
}

impl PartialEq for NominalType {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl std::hash::Hash for NominalType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NominalType({})", self.name)
    }
}

impl fmt::Display for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
