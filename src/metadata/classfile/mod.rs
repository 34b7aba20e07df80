//! Class file reading (JVMS §4).
//!
//! Only the parts of the format needed to locate a method's bytecode are decoded: the header,
//! the constant pool, the class/superclass/interface indices and the method table together
//! with each method's `Code` attribute. Fields and all other attributes are skipped by length.
//!
//! # Key Components
//!
//! - [`ClassFile`] - Parsed header with a lazily walked method table
//! - [`ConstantPool`] - Tagged constant pool with typed accessors
//! - [`MethodInfo`] / [`CodeAttribute`] - One `method_info` and its bytecode
//! - [`MethodAccessFlags`] / [`AccessLevel`] - Method flags and derived visibility
//!
//! # Examples
//!
//! ```rust,no_run
//! use bridgescope::metadata::classfile::ClassFile;
//!
//! let bytes = std::fs::read("IntBox.class")?;
//! let class = ClassFile::parse(&bytes)?;
//! for method in class.methods()? {
//!     let method = method?;
//!     println!("{}{} {:?}", method.name, method.descriptor, method.access_flags);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod constantpool;
mod flags;
mod reader;

pub use constantpool::{
    decode_modified_utf8, ConstantPool, ConstantPoolEntry, MemberRef, MemberRefKind,
    CONSTANT_TAG,
};
pub use flags::{AccessLevel, MethodAccessFlags, METHOD_VISIBILITY_MASK};
pub use reader::{
    ClassFile, CodeAttribute, MethodInfo, MethodIter, ACC_INTERFACE, CLASS_MAGIC, CODE_ATTRIBUTE,
};
