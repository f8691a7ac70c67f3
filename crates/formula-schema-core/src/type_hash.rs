//! Deterministic hash-based identity for nominal types.
//!
//! A nominal type (an entity type, the level, the library) is identified by a
//! [`TypeHash`] computed from its name. Because the hash is derived and never
//! allocated, a type annotation can reference a nominal type before the
//! environment has registered it:
//!
//! - Forward references (hash computed before registration)
//! - Same name = same hash across every schema
//! - A `Copy` handle instead of a pointer into another schema
//!
//! # Examples
//!
//! ```
//! use formula_schema_core::TypeHash;
//!
//! let a = TypeHash::from_name("custom_obj");
//! let b = TypeHash::from_name("custom_obj");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("level"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for nominal type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for entity-type schema names
    pub const SCHEMA: u64 = 0x6b1d9e3f40c2a857;
}

/// A deterministic 64-bit hash identifying a nominal type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a nominal type name.
    ///
    /// The same name always produces the same hash.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for an entity-type schema name.
    ///
    /// Uses a separate domain so a schema called `level` never collides with
    /// the `level` nominal type.
    #[inline]
    pub fn from_schema_name(name: &str) -> Self {
        TypeHash(hash_constants::SCHEMA ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
