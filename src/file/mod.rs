//! Byte-level access to compiled class representations.
//!
//! - [`io`] - Bounds-checked big-endian primitive reads
//! - [`parser`] - [`parser::Parser`], the cursor every decoder in this crate is built on

pub mod io;
pub mod parser;
