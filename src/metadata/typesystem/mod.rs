//! Type model the resolver works against.
//!
//! The resolver never owns types. It sees them through [`TypeRef`], a cheap shared handle to
//! anything implementing [`TypeMetadata`], and obtains them from a host through
//! [`TypeProvider`]. Hosts with their own class model implement these two traits; everyone else
//! can use [`TypeRegistry`], a concurrent in-memory implementation.
//!
//! # Key Components
//!
//! - [`TypeRef`] / [`WeakTypeRef`] - Strong and weak handles with identity semantics
//! - [`MethodHandle`] - A declared method: owner, [`MethodShape`], return type, flags and
//!   annotations
//! - [`TypeProvider`] - Name-based type lookup plus access to compiled class bytes
//! - [`TypeRegistry`] / [`JavaTypeBuilder`] / [`MethodSpec`] - The bundled provider
//! - [`hierarchy`] - Bounded superclass walks: [`find_declared_method`], [`find_annotation`],
//!   [`ancestors`]
//!
//! # Naming
//!
//! Types are named the way Java source names them (`int`, `void`, `java.lang.String`) except
//! that nested classes keep their binary `$` separator, as in `java.util.Map$Entry`. Arrays
//! append `[]` per dimension.
//!
//! # Examples
//!
//! ```rust
//! use bridgescope::metadata::typesystem::{
//!     find_annotation, hierarchy::DEFAULT_MAX_HIERARCHY_DEPTH, Annotation, TypeRegistry,
//! };
//!
//! let registry = TypeRegistry::new();
//! registry
//!     .define_class("com.example.Base")
//!     .annotation(Annotation::new("com.example.Managed"))
//!     .build()?;
//! let derived = registry
//!     .define_class("com.example.Derived")
//!     .extends("com.example.Base")
//!     .build()?;
//!
//! let managed = find_annotation(&derived, "com.example.Managed", DEFAULT_MAX_HIERARCHY_DEPTH)?;
//! assert!(managed.is_some());
//! # Ok::<(), bridgescope::Error>(())
//! ```

mod base;
mod builder;
pub mod hierarchy;
mod registry;

pub use base::{
    Annotation, AnnotationValue, MethodHandle, MethodShape, TypeMetadata, TypeProvider, TypeRef,
    WeakTypeRef, ROOT_TYPE_NAME,
};
pub use builder::{JavaTypeBuilder, MethodSpec};
pub use hierarchy::{ancestors, find_annotation, find_declared_method, Ancestors};
pub use registry::{JavaType, TypeFlavor, TypeRegistry};
