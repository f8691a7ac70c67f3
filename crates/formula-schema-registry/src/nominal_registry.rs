//! NominalTypeRegistry - the environment's table of named types.
//!
//! Schemas never embed the definitions of the level, the library or other
//! entity types. They refer to them by [`TypeHash`], and this registry is
//! where the surrounding environment publishes which of those names exist.
//!
//! # Thread Safety
//!
//! Populated single-threaded while the environment starts up, then only
//! read. Wrap it in a lock if registration has to continue later.

use rustc_hash::FxHashMap;

use formula_schema_core::{
    CUSTOM_OBJECT_TYPE, LEVEL_TYPE, LIBRARY_TYPE, NominalType, SchemaError, TypeAnnotation,
    TypeHash,
};

/// What a registered nominal type stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NominalKind {
    /// A scripted entity type (including the generic `custom_obj`).
    Entity,
    /// The level/world object.
    Level,
    /// The library/globals definition that the `lib` slot describes.
    Library,
    /// Any other environment-provided type.
    External,
}

/// A registered nominal type.
#[derive(Debug, Clone, PartialEq)]
pub struct NominalTypeEntry {
    pub ty: NominalType,
    pub kind: NominalKind,
}

/// Registry of nominal types, keyed by [`TypeHash`].
#[derive(Debug, Default)]
pub struct NominalTypeRegistry {
    types: FxHashMap<TypeHash, NominalTypeEntry>,
    library: Option<TypeHash>,
}

impl NominalTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `custom_obj`, `level` and `library`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, kind) in [
            (CUSTOM_OBJECT_TYPE, NominalKind::Entity),
            (LEVEL_TYPE, NominalKind::Level),
            (LIBRARY_TYPE, NominalKind::Library),
        ] {
            registry.types.insert(
                TypeHash::from_name(name),
                NominalTypeEntry {
                    ty: NominalType::new(name),
                    kind,
                },
            );
        }
        registry.library = Some(TypeHash::from_name(LIBRARY_TYPE));
        registry
    }

    /// Register a nominal type.
    ///
    /// The first [`NominalKind::Library`] registered becomes the library
    /// definition.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: NominalKind,
    ) -> Result<TypeHash, SchemaError> {
        let ty = NominalType::new(name);
        let hash = ty.type_hash();
        if self.types.contains_key(&hash) {
            return Err(SchemaError::DuplicateNominalType {
                name: ty.name().to_string(),
            });
        }

        if kind == NominalKind::Library && self.library.is_none() {
            self.library = Some(hash);
        }
        self.types.insert(hash, NominalTypeEntry { ty, kind });
        Ok(hash)
    }

    /// Look up a type by name.
    pub fn lookup_type_by_name(&self, name: &str) -> Option<&NominalType> {
        self.get(TypeHash::from_name(name)).map(|e| &e.ty)
    }

    /// Get a registered type by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&NominalTypeEntry> {
        self.types.get(&hash)
    }

    /// Check if a type exists by hash.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// The definition the `lib` slot describes.
    pub fn library_definition(&self) -> Option<TypeHash> {
        self.library
    }

    /// Check that every nominal type `annotation` mentions is registered.
    pub fn validate(&self, annotation: &TypeAnnotation) -> Result<(), SchemaError> {
        match annotation
            .nominal_references()
            .into_iter()
            .find(|ty| !self.contains(ty.type_hash()))
        {
            Some(missing) => Err(SchemaError::UnknownNominalType {
                name: missing.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types.
    pub fn iter(&self) -> impl Iterator<Item = &NominalTypeEntry> {
        self.types.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = NominalTypeRegistry::with_builtins();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.lookup_type_by_name("level"),
            Some(&NominalType::new("level"))
        );
        assert_eq!(
            registry.library_definition(),
            Some(TypeHash::from_name(LIBRARY_TYPE))
        );
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = NominalTypeRegistry::with_builtins();
        let hash = registry.register("frogatto", NominalKind::Entity).unwrap();
        assert_eq!(hash, TypeHash::from_name("frogatto"));
        assert_eq!(
            registry.register("frogatto", NominalKind::Entity),
            Err(SchemaError::DuplicateNominalType {
                name: "frogatto".into()
            })
        );
    }

    #[test]
    fn first_library_wins() {
        let mut registry = NominalTypeRegistry::new();
        assert_eq!(registry.library_definition(), None);
        let first = registry.register("globals", NominalKind::Library).unwrap();
        registry.register("other_globals", NominalKind::Library).unwrap();
        assert_eq!(registry.library_definition(), Some(first));
    }

    #[test]
    fn validate_finds_unknown_types() {
        let registry = NominalTypeRegistry::with_builtins();
        let known = TypeAnnotation::parse("null|[custom_obj]").unwrap();
        assert!(registry.validate(&known).is_ok());

        let unknown = TypeAnnotation::parse("null|ghost").unwrap();
        assert_eq!(
            registry.validate(&unknown),
            Err(SchemaError::UnknownNominalType {
                name: "ghost".into()
            })
        );
    }

    #[test]
    fn lookup_missing_is_none() {
        let registry = NominalTypeRegistry::new();
        assert!(registry.lookup_type_by_name("level").is_none());
        assert!(registry.is_empty());
    }
}
