//! JVM method and field descriptor parsing.
//!
//! Descriptors are the compact strings the class file format uses to describe the types of
//! fields and methods (JVMS §4.3). A method descriptor lists the parameter types in order,
//! followed by the return type:
//!
//! ```text
//! (ILjava/lang/String;[[J)V
//!  │ │                 │   └─ return type: void
//!  │ │                 └─ long[][]
//!  │ └─ java.lang.String
//!  └─ int
//! ```
//!
//! # Key Components
//!
//! - [`DescriptorParser`] - Single-pass parser reporting the byte offset of the first error
//! - [`parameter_count`] - Allocation-free parameter counting, used when scanning method tables
//! - [`encode_method_descriptor`] / [`encode_field_descriptor`] - Inverse of parsing
//! - [`MethodDescriptor`], [`FieldType`], [`ReturnType`], [`BaseType`] - The parsed form
//!
//! Type names in the parsed form follow source-level conventions (`int`, `java.lang.String`,
//! `long[][]`, `void`), which is the vocabulary a
//! [`crate::metadata::typesystem::TypeProvider`] is queried with.
//!
//! # Examples
//!
//! ```rust
//! use bridgescope::metadata::descriptor::{parse_method_descriptor, parameter_count};
//!
//! let descriptor = parse_method_descriptor("(I)Ljava/lang/String;")?;
//! assert_eq!(descriptor.parameter_type_names(), ["int"]);
//! assert_eq!(descriptor.return_type_name(), "java.lang.String");
//! assert_eq!(parameter_count("(I)Ljava/lang/String;")?, 1);
//! # Ok::<(), bridgescope::Error>(())
//! ```

mod encoder;
mod parser;
mod types;

pub use encoder::{encode_field_descriptor, encode_method_descriptor};
pub use parser::{parameter_count, DescriptorParser, MAX_ARRAY_DIMENSIONS};
pub use types::*;

use crate::Result;

/// Parse a method descriptor, e.g. `(ILjava/lang/String;)V`
///
/// # Errors
/// Returns [`crate::Error::MalformedDescriptor`] if the input does not match the grammar.
pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodDescriptor> {
    DescriptorParser::new(descriptor).parse_method_descriptor()
}

/// Parse a field descriptor, e.g. `[Ljava/lang/String;`
///
/// # Errors
/// Returns [`crate::Error::MalformedDescriptor`] if the input is not exactly one field type.
pub fn parse_field_descriptor(descriptor: &str) -> Result<FieldType> {
    DescriptorParser::new(descriptor).parse_field_descriptor()
}
