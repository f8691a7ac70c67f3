//! Core types for the formula property schema.
//!
//! This crate holds the leaf types every other schema crate depends on:
//!
//! - [`TypeHash`] - deterministic identity for nominal types
//! - [`PrimitiveKind`] / [`NominalType`] - the building blocks of annotations
//! - [`TypeAnnotation`] and [`parse_type`] - declared slot types and their grammar
//! - [`SchemaError`] / [`TypeSyntaxError`] - the error taxonomy

mod cursor;
mod error;
mod nominal;
mod primitive_kind;
mod type_annotation;
mod type_hash;
mod type_parser;

pub use error::{SchemaError, SchemaResult, TypeSyntaxError, TypeSyntaxErrorKind};
pub use nominal::{CUSTOM_OBJECT_TYPE, LEVEL_TYPE, LIBRARY_TYPE, NominalType};
pub use primitive_kind::PrimitiveKind;
pub use type_annotation::{TypeAnnotation, UnionMembers};
pub use type_hash::{TypeHash, hash_constants};
pub use type_parser::{MAX_TYPE_DEPTH, parse_type};
