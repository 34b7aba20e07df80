//! Class file, descriptor and type model support.
//!
//! # Key Components
//!
//! - [`classfile`] - Class file header, constant pool and method table reading
//! - [`descriptor`] - JVM field and method descriptor parsing and encoding
//! - [`typesystem`] - The type model the resolver queries, plus an in-memory registry

/// Implementation of the class file format
pub mod classfile;
/// Implementation of field and method descriptors
pub mod descriptor;
/// Implementation of the Java type model
pub mod typesystem;
