//! The class file constant pool (JVMS §4.4).
//!
//! The pool is a 1-based table of tagged entries. `long` and `double` constants occupy two
//! slots; the second slot, like slot `0`, holds [`ConstantPoolEntry::Unusable`]. Strings are
//! stored in modified UTF-8 and decoded once while the pool is parsed.

use crate::{file::parser::Parser, Result};

#[allow(non_snake_case, dead_code, missing_docs)]
/// Tag bytes of constant pool entries
pub mod CONSTANT_TAG {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELDREF: u8 = 9;
    pub const METHODREF: u8 = 10;
    pub const INTERFACE_METHODREF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

/// A single constant pool slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    /// Slot `0` and the slot following a `long` or `double`
    Unusable,
    /// Decoded string data
    Utf8(String),
    /// `int` constant
    Integer(i32),
    /// `float` constant
    Float(f32),
    /// `long` constant
    Long(i64),
    /// `double` constant
    Double(f64),
    /// Class or interface, pointing at its internal name
    Class {
        /// Index of a `Utf8` entry
        name_index: u16,
    },
    /// `String` literal
    String {
        /// Index of a `Utf8` entry
        string_index: u16,
    },
    /// Field reference
    FieldRef {
        /// Index of a `Class` entry
        class_index: u16,
        /// Index of a `NameAndType` entry
        name_and_type_index: u16,
    },
    /// Method reference on a class
    MethodRef {
        /// Index of a `Class` entry
        class_index: u16,
        /// Index of a `NameAndType` entry
        name_and_type_index: u16,
    },
    /// Method reference on an interface
    InterfaceMethodRef {
        /// Index of a `Class` entry
        class_index: u16,
        /// Index of a `NameAndType` entry
        name_and_type_index: u16,
    },
    /// Name plus descriptor of a member
    NameAndType {
        /// Index of a `Utf8` entry holding the name
        name_index: u16,
        /// Index of a `Utf8` entry holding the descriptor
        descriptor_index: u16,
    },
    /// Method handle constant
    MethodHandle {
        /// One of the `REF_*` kinds
        reference_kind: u8,
        /// Index of the referenced member
        reference_index: u16,
    },
    /// Method type constant
    MethodType {
        /// Index of a `Utf8` entry holding a method descriptor
        descriptor_index: u16,
    },
    /// Dynamically computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Index of a `NameAndType` entry
        name_and_type_index: u16,
    },
    /// Call site of an `invokedynamic` instruction
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method_attr_index: u16,
        /// Index of a `NameAndType` entry
        name_and_type_index: u16,
    },
    /// Module name
    Module {
        /// Index of a `Utf8` entry
        name_index: u16,
    },
    /// Package name
    Package {
        /// Index of a `Utf8` entry
        name_index: u16,
    },
}

/// Which kind of member a [`MemberRef`] was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRefKind {
    /// `CONSTANT_Fieldref`
    Field,
    /// `CONSTANT_Methodref`
    Method,
    /// `CONSTANT_InterfaceMethodref`
    InterfaceMethod,
}

/// A fully resolved member reference, borrowing its strings from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'cp> {
    /// Entry kind the reference came from
    pub kind: MemberRefKind,
    /// Owner in internal form, e.g. `java/lang/Object`
    pub class_name: &'cp str,
    /// Member name
    pub name: &'cp str,
    /// Member descriptor
    pub descriptor: &'cp str,
}

/// A parsed constant pool.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<ConstantPoolEntry>,
}

impl ConstantPool {
    /// Parse `constant_pool_count` followed by the pool entries.
    ///
    /// # Arguments
    /// * `parser` - Positioned at the `constant_pool_count` field
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unknown tags or undecodable strings, and
    /// [`crate::Error::OutOfBounds`] if the pool is truncated.
    pub fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let count = parser.read_be::<u16>()?;
        if count == 0 {
            return Err(malformed_error!("constant_pool_count must be at least 1"));
        }

        let mut entries = Vec::with_capacity(count as usize);
        entries.push(ConstantPoolEntry::Unusable);

        while entries.len() < count as usize {
            let index = entries.len();
            let tag = parser.read_be::<u8>()?;
            let entry = match tag {
                CONSTANT_TAG::UTF8 => {
                    let length = parser.read_be::<u16>()?;
                    let bytes = parser.read_bytes(length as usize)?;
                    ConstantPoolEntry::Utf8(decode_modified_utf8(bytes)?)
                }
                CONSTANT_TAG::INTEGER => ConstantPoolEntry::Integer(parser.read_be::<i32>()?),
                CONSTANT_TAG::FLOAT => {
                    ConstantPoolEntry::Float(f32::from_bits(parser.read_be::<u32>()?))
                }
                CONSTANT_TAG::LONG => ConstantPoolEntry::Long(parser.read_be::<i64>()?),
                CONSTANT_TAG::DOUBLE => {
                    ConstantPoolEntry::Double(f64::from_bits(parser.read_be::<u64>()?))
                }
                CONSTANT_TAG::CLASS => ConstantPoolEntry::Class {
                    name_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::STRING => ConstantPoolEntry::String {
                    string_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::FIELDREF => ConstantPoolEntry::FieldRef {
                    class_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::METHODREF => ConstantPoolEntry::MethodRef {
                    class_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::INTERFACE_METHODREF => ConstantPoolEntry::InterfaceMethodRef {
                    class_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::NAME_AND_TYPE => ConstantPoolEntry::NameAndType {
                    name_index: parser.read_be::<u16>()?,
                    descriptor_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::METHOD_HANDLE => ConstantPoolEntry::MethodHandle {
                    reference_kind: parser.read_be::<u8>()?,
                    reference_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::METHOD_TYPE => ConstantPoolEntry::MethodType {
                    descriptor_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::DYNAMIC => ConstantPoolEntry::Dynamic {
                    bootstrap_method_attr_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::INVOKE_DYNAMIC => ConstantPoolEntry::InvokeDynamic {
                    bootstrap_method_attr_index: parser.read_be::<u16>()?,
                    name_and_type_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::MODULE => ConstantPoolEntry::Module {
                    name_index: parser.read_be::<u16>()?,
                },
                CONSTANT_TAG::PACKAGE => ConstantPoolEntry::Package {
                    name_index: parser.read_be::<u16>()?,
                },
                _ => {
                    return Err(malformed_error!(
                        "Invalid constant pool tag {} at index {}",
                        tag,
                        index
                    ))
                }
            };

            let wide = matches!(
                entry,
                ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_)
            );
            entries.push(entry);
            if wide {
                if entries.len() >= count as usize {
                    return Err(malformed_error!(
                        "8-byte constant at index {} overflows the pool",
                        index
                    ));
                }
                entries.push(ConstantPoolEntry::Unusable);
            }
        }

        Ok(ConstantPool { entries })
    }

    /// Number of slots, including the unusable slot `0`
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the pool has no usable entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Look up an entry by index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or unusable.
    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry> {
        match self.entries.get(index as usize) {
            Some(ConstantPoolEntry::Unusable) | None => {
                Err(malformed_error!("Invalid constant pool index {}", index))
            }
            Some(entry) => Ok(entry),
        }
    }

    /// Resolve a `Utf8` entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is missing or of a different kind.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(value) => Ok(value),
            other => Err(malformed_error!(
                "Constant pool index {} is not Utf8 - {:?}",
                index,
                other
            )),
        }
    }

    /// Resolve a `Class` entry to its internal name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is missing or of a different kind.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantPoolEntry::Class { name_index } => self.utf8(*name_index),
            other => Err(malformed_error!(
                "Constant pool index {} is not a Class - {:?}",
                index,
                other
            )),
        }
    }

    /// Resolve a `NameAndType` entry to `(name, descriptor)`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry is missing or of a different kind.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.get(index)? {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            other => Err(malformed_error!(
                "Constant pool index {} is not a NameAndType - {:?}",
                index,
                other
            )),
        }
    }

    /// Resolve a field, method or interface method reference.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the entry or anything it points at is invalid.
    pub fn member_ref(&self, index: u16) -> Result<MemberRef<'_>> {
        let (kind, class_index, name_and_type_index) = match self.get(index)? {
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            } => (MemberRefKind::Field, *class_index, *name_and_type_index),
            ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            } => (MemberRefKind::Method, *class_index, *name_and_type_index),
            ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => (
                MemberRefKind::InterfaceMethod,
                *class_index,
                *name_and_type_index,
            ),
            other => {
                return Err(malformed_error!(
                    "Constant pool index {} is not a member reference - {:?}",
                    index,
                    other
                ))
            }
        };

        let (name, descriptor) = self.name_and_type(name_and_type_index)?;
        Ok(MemberRef {
            kind,
            class_name: self.class_name(class_index)?,
            name,
            descriptor,
        })
    }
}

/// Decode a modified UTF-8 string (JVMS §4.4.7).
///
/// Modified UTF-8 differs from standard UTF-8 in two ways: `U+0000` is written as `C0 80`,
/// and supplementary characters are written as two 3-byte encoded surrogates.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the bytes are not valid modified UTF-8.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    // Plain UTF-8 without NUL or 4-byte sequences decodes identically
    if !bytes.iter().any(|&byte| byte == 0 || byte >= 0xF0) {
        if let Ok(value) = std::str::from_utf8(bytes) {
            return Ok(value.to_string());
        }
    }

    let continuation = |offset: usize| -> Result<u16> {
        match bytes.get(offset) {
            Some(byte) if byte & 0xC0 == 0x80 => Ok(u16::from(byte & 0x3F)),
            _ => Err(malformed_error!(
                "Invalid modified UTF-8 continuation at offset {}",
                offset
            )),
        }
    };

    let mut units = Vec::with_capacity(bytes.len());
    let mut offset = 0;
    while let Some(&lead) = bytes.get(offset) {
        if lead & 0x80 == 0 && lead != 0 {
            units.push(u16::from(lead));
            offset += 1;
        } else if lead & 0xE0 == 0xC0 {
            units.push((u16::from(lead & 0x1F) << 6) | continuation(offset + 1)?);
            offset += 2;
        } else if lead & 0xF0 == 0xE0 {
            units.push(
                (u16::from(lead & 0x0F) << 12)
                    | (continuation(offset + 1)? << 6)
                    | continuation(offset + 2)?,
            );
            offset += 3;
        } else {
            return Err(malformed_error!(
                "Invalid modified UTF-8 lead byte {:#04x} at offset {}",
                lead,
                offset
            ));
        }
    }

    String::from_utf16(&units)
        .map_err(|_| malformed_error!("Modified UTF-8 string contains unpaired surrogates"))
}
