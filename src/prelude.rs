//! # bridgescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the bridgescope library. Import this module to get quick access to everything needed
//! to describe types and resolve forwarding stubs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all bridgescope operations
pub use crate::Error;

/// The result type used throughout bridgescope
pub use crate::Result;

/// Bounds applied while resolving forwarding stubs
pub use crate::ResolverConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Resolves forwarding stubs to the methods they delegate to
pub use crate::BridgeResolver;

/// Low-level byte parsing
pub use crate::Parser;

// ================================================================================================
// Type System
// ================================================================================================

/// Host-facing type model
pub use crate::metadata::typesystem::{
    Annotation, AnnotationValue, MethodHandle, MethodShape, TypeMetadata, TypeProvider, TypeRef,
    WeakTypeRef,
};

/// Bundled in-memory type provider
pub use crate::metadata::typesystem::{JavaTypeBuilder, MethodSpec, TypeRegistry};

/// Hierarchy lookups
pub use crate::metadata::typesystem::{ancestors, find_annotation, find_declared_method};

// ================================================================================================
// Class Files and Descriptors
// ================================================================================================

/// Method access flags and visibility
pub use crate::metadata::classfile::{AccessLevel, MethodAccessFlags};

/// Class file reading
pub use crate::metadata::classfile::{ClassFile, ConstantPool, MethodInfo};

/// Descriptor parsing and encoding
pub use crate::metadata::descriptor::{
    encode_method_descriptor, parameter_count, parse_field_descriptor, parse_method_descriptor,
    BaseType, FieldType, MethodDescriptor, ReturnType,
};

// ================================================================================================
// Stub Scanning and Caching
// ================================================================================================

/// Stub scanning
pub use crate::resolver::{find_delegation, StubDelegation};

/// Resolution cache
pub use crate::resolver::{ResolutionCache, StubKey};

// ================================================================================================
// Disassembler
// ================================================================================================

/// Instruction decoding
pub use crate::disassembler::{decode_instruction, decode_stream, Instruction, Operand};
