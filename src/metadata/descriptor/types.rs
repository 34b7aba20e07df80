use std::fmt;

use strum::{EnumCount, EnumIter};

/// Name used for the `V` return code
pub const VOID_NAME: &str = "void";

/// Descriptor code of the `void` return type
pub const VOID_CODE: u8 = b'V';

/// Marker that opens a class reference (`Ljava/lang/String;`)
pub const CLASS_MARKER: u8 = b'L';

/// Marker that terminates a class reference
pub const CLASS_TERMINATOR: u8 = b';';

/// Prefix for one array dimension
pub const ARRAY_MARKER: u8 = b'[';

/// The eight primitive types a descriptor can encode with a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum BaseType {
    /// `B` - signed byte
    Byte,
    /// `C` - UTF-16 code unit
    Char,
    /// `D` - double-precision float
    Double,
    /// `F` - single-precision float
    Float,
    /// `I` - 32-bit integer
    Int,
    /// `J` - 64-bit integer
    Long,
    /// `S` - signed short
    Short,
    /// `Z` - boolean
    Boolean,
}

impl BaseType {
    /// Map a descriptor code to its primitive, `None` for anything that is not one of `BCDFIJSZ`
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'B' => Some(BaseType::Byte),
            b'C' => Some(BaseType::Char),
            b'D' => Some(BaseType::Double),
            b'F' => Some(BaseType::Float),
            b'I' => Some(BaseType::Int),
            b'J' => Some(BaseType::Long),
            b'S' => Some(BaseType::Short),
            b'Z' => Some(BaseType::Boolean),
            _ => None,
        }
    }

    /// The single-letter descriptor code
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            BaseType::Byte => b'B',
            BaseType::Char => b'C',
            BaseType::Double => b'D',
            BaseType::Float => b'F',
            BaseType::Int => b'I',
            BaseType::Long => b'J',
            BaseType::Short => b'S',
            BaseType::Boolean => b'Z',
        }
    }

    /// The source-level keyword, e.g. `int`
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }

    /// Inverse of [`BaseType::name`]
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "byte" => Some(BaseType::Byte),
            "char" => Some(BaseType::Char),
            "double" => Some(BaseType::Double),
            "float" => Some(BaseType::Float),
            "int" => Some(BaseType::Int),
            "long" => Some(BaseType::Long),
            "short" => Some(BaseType::Short),
            "boolean" => Some(BaseType::Boolean),
            _ => None,
        }
    }

    /// Qualified name of the wrapper class a value of this primitive is boxed into.
    #[must_use]
    pub fn boxed_name(self) -> &'static str {
        match self {
            BaseType::Byte => "java.lang.Byte",
            BaseType::Char => "java.lang.Character",
            BaseType::Double => "java.lang.Double",
            BaseType::Float => "java.lang.Float",
            BaseType::Int => "java.lang.Integer",
            BaseType::Long => "java.lang.Long",
            BaseType::Short => "java.lang.Short",
            BaseType::Boolean => "java.lang.Boolean",
        }
    }
}

/// A single field type as it appears in a descriptor.
///
/// Class names are stored in their qualified, dot-separated form (`java.lang.String`);
/// the slash form only exists on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// One of the primitive codes
    Base(BaseType),
    /// `L<name>;`
    Object(String),
    /// `[<component>`
    Array(Box<FieldType>),
}

impl FieldType {
    /// Number of array dimensions, `0` for non-array types
    #[must_use]
    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut current = self;
        while let FieldType::Array(component) = current {
            dims += 1;
            current = component;
        }
        dims
    }

    /// The innermost non-array component
    #[must_use]
    pub fn element(&self) -> &FieldType {
        let mut current = self;
        while let FieldType::Array(component) = current {
            current = component;
        }
        current
    }

    /// Source-level type name: `int`, `java.lang.String`, `long[][]`.
    ///
    /// This is the name under which a [`crate::metadata::typesystem::TypeProvider`] is
    /// asked to load the type.
    #[must_use]
    pub fn type_name(&self) -> String {
        let mut name = match self.element() {
            FieldType::Base(base) => base.name().to_string(),
            FieldType::Object(class) => class.clone(),
            FieldType::Array(_) => unreachable!("element() never returns an array"),
        };
        for _ in 0..self.dimensions() {
            name.push_str("[]");
        }
        name
    }

    /// Parse a source-level type name back into a field type.
    ///
    /// Returns `None` for `void`, for empty names and for names containing characters that
    /// cannot appear in a qualified class name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let mut element = name;
        let mut dims = 0;
        while let Some(rest) = element.strip_suffix("[]") {
            element = rest;
            dims += 1;
        }

        let mut field_type = if let Some(base) = BaseType::from_name(element) {
            FieldType::Base(base)
        } else if element.is_empty()
            || element == VOID_NAME
            || element.split('.').any(str::is_empty)
            || element.contains(['/', ';', '[', ']'])
        {
            return None;
        } else {
            FieldType::Object(element.to_string())
        };

        for _ in 0..dims {
            field_type = FieldType::Array(Box::new(field_type));
        }
        Some(field_type)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// The return slot of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// `V`
    Void,
    /// Any field type
    Value(FieldType),
}

impl ReturnType {
    /// Source-level name, `void` for [`ReturnType::Void`]
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            ReturnType::Void => VOID_NAME.to_string(),
            ReturnType::Value(field_type) => field_type.type_name(),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// A parsed method descriptor: ordered parameter types plus return type.
///
/// Encoding a parsed descriptor with
/// [`crate::metadata::descriptor::encode_method_descriptor`] reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub parameters: Vec<FieldType>,
    /// The return type
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    /// Source-level names of all parameter types, in order
    #[must_use]
    pub fn parameter_type_names(&self) -> Vec<String> {
        self.parameters.iter().map(FieldType::type_name).collect()
    }

    /// Source-level name of the return type
    #[must_use]
    pub fn return_type_name(&self) -> String {
        self.return_type.type_name()
    }

    /// Number of declared parameters
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn base_type_tables_agree() {
        assert_eq!(BaseType::COUNT, 8);
        for base in BaseType::iter() {
            assert_eq!(BaseType::from_code(base.code()), Some(base));
            assert_eq!(BaseType::from_name(base.name()), Some(base));
            assert!(base.boxed_name().starts_with("java.lang."));
        }
        assert_eq!(BaseType::from_code(VOID_CODE), None);
        assert_eq!(BaseType::Char.boxed_name(), "java.lang.Character");
    }

    #[test]
    fn type_names() {
        let string_matrix = FieldType::Array(Box::new(FieldType::Array(Box::new(
            FieldType::Object("java.lang.String".to_string()),
        ))));

        assert_eq!(string_matrix.dimensions(), 2);
        assert_eq!(string_matrix.type_name(), "java.lang.String[][]");
        assert_eq!(string_matrix.to_string(), "java.lang.String[][]");
        assert_eq!(
            FieldType::from_type_name("java.lang.String[][]"),
            Some(string_matrix)
        );

        assert_eq!(
            FieldType::from_type_name("int"),
            Some(FieldType::Base(BaseType::Int))
        );
        assert_eq!(ReturnType::Void.type_name(), "void");
    }

    #[test]
    fn rejects_invalid_type_names() {
        assert_eq!(FieldType::from_type_name(""), None);
        assert_eq!(FieldType::from_type_name("[]"), None);
        assert_eq!(FieldType::from_type_name("void"), None);
        assert_eq!(FieldType::from_type_name("java/lang/String"), None);
        assert_eq!(FieldType::from_type_name("java..String"), None);
        assert_eq!(FieldType::from_type_name("Foo;"), None);
    }
}
