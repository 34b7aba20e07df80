//! Bounds-checked big-endian reads for class file parsing.
//!
//! Every multi-byte quantity in a JVM class file is stored big-endian. This module provides
//! the [`crate::file::io::ClassIO`] trait, implemented for the primitive integer types that
//! occur in class files, and [`crate::file::io::read_be_at`], which reads a value at an offset and
//! advances the offset.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::file::io::read_be_at;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34];
//! let mut offset = 0;
//!
//! let magic: u32 = read_be_at(&data, &mut offset)?;
//! let major: u16 = read_be_at(&data, &mut offset)?;
//! assert_eq!(magic, 0xCAFE_BABE);
//! assert_eq!(major, 52);
//! assert_eq!(offset, 6);
//! # Ok::<(), bridgescope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Reads that would run past the end of the buffer return [`crate::Error::OutOfBounds`]
//! and leave the offset untouched.

use crate::{Error::OutOfBounds, Result};

/// Trait for types that can be decoded from a fixed-size big-endian byte array.
///
/// Each implementation names the byte array it is decoded from through the `Bytes`
/// associated type (e.g. `[u8; 4]` for `u32`).
pub trait ClassIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_class_io {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl ClassIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_class_io!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
);

/// Safely reads a value of type `T` in big-endian byte order at `offset`, advancing the
/// offset by the number of bytes read.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_be_at<T: ClassIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u8() {
        let result = read_be_at::<u8>(&TEST_BUFFER, &mut 0).unwrap();
        assert_eq!(result, 0x1);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be_at::<u16>(&TEST_BUFFER, &mut 0).unwrap();
        assert_eq!(result, 0x102);
    }

    #[test]
    fn read_be_i16() {
        let result = read_be_at::<i16>(&[0xFF, 0xFE], &mut 0).unwrap();
        assert_eq!(result, -2);
    }

    #[test]
    fn read_be_u32() {
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut 0).unwrap();
        assert_eq!(result, 0x0102_0304);
    }

    #[test]
    fn read_be_i32() {
        let result = read_be_at::<i32>(&[0xFF, 0xFF, 0xFF, 0xF6], &mut 0).unwrap();
        assert_eq!(result, -10);
    }

    #[test]
    fn read_be_u64() {
        let result = read_be_at::<u64>(&TEST_BUFFER, &mut 0).unwrap();
        assert_eq!(result, 0x0102_0304_0506_0708);
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 2;
        let result = read_be_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0304);
        assert_eq!(offset, 4);
    }

    #[test]
    fn errors() {
        let buffer = [0xFF, 0xFF, 0xFF];

        let result = read_be_at::<u32>(&buffer, &mut 0);
        assert!(matches!(result, Err(OutOfBounds)));

        let mut offset = 2;
        let result = read_be_at::<u16>(&buffer, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
        assert_eq!(offset, 2);

        let mut offset = usize::MAX;
        let result = read_be_at::<u8>(&buffer, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
    }
}
