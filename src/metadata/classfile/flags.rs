//! Method access flags and the access level derived from them.
//!
//! # Key Types
//! - [`MethodAccessFlags`]: The `access_flags` word of a `method_info` structure
//! - [`AccessLevel`]: Visibility extracted from the flags

use bitflags::bitflags;

/// Bitmask for visibility extraction
pub const METHOD_VISIBILITY_MASK: u16 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method access and property flags (JVMS §4.6)
    pub struct MethodAccessFlags: u16 {
        /// Accessible from outside its package
        const PUBLIC = 0x0001;
        /// Accessible only within the defining class
        const PRIVATE = 0x0002;
        /// Accessible within subclasses and the package
        const PROTECTED = 0x0004;
        /// Not bound to an instance
        const STATIC = 0x0008;
        /// Must not be overridden
        const FINAL = 0x0010;
        /// Invocation is wrapped by a monitor
        const SYNCHRONIZED = 0x0020;
        /// Generated by the compiler to forward to another method
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments
        const VARARGS = 0x0080;
        /// Implemented outside the JVM
        const NATIVE = 0x0100;
        /// No implementation is provided
        const ABSTRACT = 0x0400;
        /// Floating-point mode is FP-strict
        const STRICT = 0x0800;
        /// Not present in the source code
        const SYNTHETIC = 0x1000;
    }
}

impl MethodAccessFlags {
    /// Extract the known flags from a raw `access_flags` word
    #[must_use]
    pub fn from_raw(flags: u16) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// A forwarding stub carries both `BRIDGE` and `SYNTHETIC`
    #[must_use]
    pub fn is_forwarding_stub(self) -> bool {
        self.contains(Self::BRIDGE | Self::SYNTHETIC)
    }

    /// The visibility encoded in these flags
    #[must_use]
    pub fn access_level(self) -> AccessLevel {
        AccessLevel::from_flags(self)
    }
}

/// Source-level visibility of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// No modifier, visible within the package
    Package,
}

impl AccessLevel {
    /// Derive the access level from method flags.
    ///
    /// Class files produced by a conforming compiler set at most one visibility bit;
    /// should several be present, the most permissive one wins.
    #[must_use]
    pub fn from_flags(flags: MethodAccessFlags) -> Self {
        if flags.contains(MethodAccessFlags::PUBLIC) {
            AccessLevel::Public
        } else if flags.contains(MethodAccessFlags::PROTECTED) {
            AccessLevel::Protected
        } else if flags.contains(MethodAccessFlags::PRIVATE) {
            AccessLevel::Private
        } else {
            AccessLevel::Package
        }
    }

    /// The source keyword, empty for package visibility
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Protected => "protected",
            AccessLevel::Private => "private",
            AccessLevel::Package => "",
        }
    }
}
