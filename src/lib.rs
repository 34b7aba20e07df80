// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # bridgescope
//!
//! Resolve compiler-generated JVM forwarding stubs ("bridge methods") back to the methods they
//! forward to.
//!
//! When a class specialises a generic supertype, javac keeps the erased signature alive by
//! emitting a synthetic stub that casts its arguments and calls the specialised method.
//! Reflection-driven frameworks that look methods up by their erased signature land on that
//! stub, which carries none of the user's annotations. `bridgescope` finds the method the stub
//! calls by reading the compiled class file, and memoizes the answer for concurrent callers.
//!
//! ## Features
//!
//! - **Class file reading** - Constant pool, lazily walked method table and `Code` attributes
//! - **Descriptor parsing** - Method and field descriptors with exact error positions
//! - **Bytecode walking** - Full JVM opcode table, including switches and `wide`
//! - **Bounded hierarchy walks** - Method and annotation lookup that cannot hang on cycles
//! - **Concurrent memoization** - Each stub is resolved at most once per resolver
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bridgescope::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! registry.define_class("java.lang.Integer").build()?;
//! registry.define_class_file(std::fs::read("Box.class")?)?;
//! registry.define_class_file(std::fs::read("IntBox.class")?)?;
//!
//! let resolver = BridgeResolver::new(&registry);
//! let int_box = registry.load_type("com.example.IntBox")?;
//!
//! // `set(Object)` is the stub; the resolver returns `set(Integer)`
//! let set = resolver.resolve(&int_box, "set", &[registry.root()])?.unwrap();
//! assert_eq!(set.parameter_types()[0].name(), "java.lang.Integer");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Class files, descriptors and the type model
//! - [`disassembler`] - JVM instruction decoding
//! - [`resolver`] - Stub scanning, caching and the [`BridgeResolver`]
//! - [`Error`] and [`Result`] - Error handling
//!
//! Hosts with their own class model implement
//! [`TypeMetadata`](metadata::typesystem::TypeMetadata) and
//! [`TypeProvider`](metadata::typesystem::TypeProvider); [`TypeRegistry`] is a ready-made
//! in-memory provider.
//!
//! ## Logging
//!
//! Events are emitted through [`tracing`]: `debug` for resolved stubs and found delegations,
//! `trace` for hierarchy steps and cache hits, `warn` when a hierarchy exceeds its bound. No
//! subscriber is installed by the library.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use bridgescope::{Error, metadata::descriptor::parse_method_descriptor};
//!
//! match parse_method_descriptor("(I") {
//!     Ok(_) => println!("parsed"),
//!     Err(Error::MalformedDescriptor { message, position }) => {
//!         println!("bad descriptor at {position}: {message}")
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use bridgescope::prelude::*;
///
/// let descriptor = parse_method_descriptor("(Ljava/lang/Object;)V")?;
/// assert_eq!(descriptor.parameter_type_names(), ["java.lang.Object"]);
/// # Ok::<(), bridgescope::Error>(())
/// ```
pub mod prelude;

/// JVM instruction decoding
///
/// Decodes the bytecode of a `Code` attribute so that it can be walked instruction by
/// instruction. See [`disassembler::decode_instruction`] and [`disassembler::decode_stream`].
pub mod disassembler;

/// Class file, descriptor and type model support
pub mod metadata;

/// Forwarding stub resolution
pub mod resolver;

/// `bridgescope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `bridgescope` Error type
pub use error::Error;

/// Byte cursor used for class files, descriptors and bytecode.
///
/// # Example
///
/// ```rust
/// use bridgescope::{Parser, disassembler::decode_instruction};
/// let code = [0xB1]; // return
/// let mut parser = Parser::new(&code);
/// let instr = decode_instruction(&mut parser)?;
/// assert_eq!(instr.mnemonic, "return");
/// # Ok::<(), bridgescope::Error>(())
/// ```
pub use file::parser::Parser;

/// Main entry points
pub use metadata::typesystem::TypeRegistry;
pub use resolver::{BridgeResolver, ResolverConfig};
