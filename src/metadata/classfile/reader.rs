use crate::{
    file::parser::Parser,
    metadata::classfile::{ConstantPool, MethodAccessFlags},
    Error::NotSupported,
    Result,
};

/// The `0xCAFEBABE` magic every class file starts with
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// Class access flag marking an interface
pub const ACC_INTERFACE: u16 = 0x0200;

/// Name of the attribute holding a method's bytecode
pub const CODE_ATTRIBUTE: &str = "Code";

/// The header portion of a class file, with a lazily walked method table.
///
/// Parsing stops after the field table; [`ClassFile::methods`] then decodes `method_info`
/// structures one at a time, so a scan that finds what it needs early never touches the
/// remainder of the file.
pub struct ClassFile<'a> {
    data: &'a [u8],
    /// Minor version of the class file format
    pub minor_version: u16,
    /// Major version of the class file format, e.g. `52` for Java 8
    pub major_version: u16,
    /// The parsed constant pool
    pub constant_pool: ConstantPool,
    /// Raw class access flags
    pub access_flags: u16,
    /// Index of the `Class` entry naming this class
    pub this_class: u16,
    /// Index of the `Class` entry naming the superclass, `0` for `java/lang/Object`
    pub super_class: u16,
    /// Indices of the `Class` entries naming the direct superinterfaces
    pub interfaces: Vec<u16>,
    methods_offset: usize,
}

impl<'a> ClassFile<'a> {
    /// Parse the class file header, constant pool and field table.
    ///
    /// # Arguments
    /// * `data` - The complete class file
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the magic does not match, and
    /// [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] for damaged input.
    pub fn parse(data: &'a [u8]) -> Result<ClassFile<'a>> {
        let mut parser = Parser::new(data);
        if parser.read_be::<u32>()? != CLASS_MAGIC {
            return Err(NotSupported);
        }

        let minor_version = parser.read_be::<u16>()?;
        let major_version = parser.read_be::<u16>()?;
        let constant_pool = ConstantPool::parse(&mut parser)?;

        let access_flags = parser.read_be::<u16>()?;
        let this_class = parser.read_be::<u16>()?;
        let super_class = parser.read_be::<u16>()?;

        let interface_count = parser.read_be::<u16>()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(parser.read_be::<u16>()?);
        }

        let field_count = parser.read_be::<u16>()?;
        for _ in 0..field_count {
            // access_flags, name_index, descriptor_index
            parser.advance_by(6)?;
            skip_attributes(&mut parser)?;
        }

        Ok(ClassFile {
            data,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            methods_offset: parser.pos(),
        })
    }

    /// Internal name of this class, e.g. `com/example/IntBox`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `this_class` does not point at a `Class` entry.
    pub fn class_name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    /// Whether the class file declares an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    /// Internal name of the superclass, `None` for `java/lang/Object` and modules
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `super_class` is set but invalid.
    pub fn super_class_name(&self) -> Result<Option<&str>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.constant_pool.class_name(self.super_class).map(Some)
    }

    /// Iterate the method table.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the class file ends before `methods_count`.
    pub fn methods(&self) -> Result<MethodIter<'a, '_>> {
        let mut parser = Parser::new(self.data);
        parser.advance_by(self.methods_offset)?;
        let remaining = parser.read_be::<u16>()?;

        Ok(MethodIter {
            parser,
            constant_pool: &self.constant_pool,
            remaining,
        })
    }
}

/// Skip an `attributes_count` followed by that many attributes
fn skip_attributes(parser: &mut Parser<'_>) -> Result<()> {
    let count = parser.read_be::<u16>()?;
    for _ in 0..count {
        // attribute_name_index
        parser.advance_by(2)?;
        let length = parser.read_be::<u32>()?;
        parser.advance_by(length as usize)?;
    }
    Ok(())
}

/// The `Code` attribute of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeAttribute<'a> {
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local variable slots
    pub max_locals: u16,
    /// The bytecode, starting at the first instruction
    pub code: &'a [u8],
}

impl<'a> CodeAttribute<'a> {
    fn parse(body: &'a [u8]) -> Result<CodeAttribute<'a>> {
        let mut parser = Parser::new(body);
        let max_stack = parser.read_be::<u16>()?;
        let max_locals = parser.read_be::<u16>()?;
        let code_length = parser.read_be::<u32>()?;
        if code_length == 0 {
            return Err(malformed_error!("Code attribute with empty bytecode"));
        }

        let code = parser.read_bytes(code_length as usize).map_err(|_| {
            malformed_error!(
                "Code length {} exceeds attribute size {}",
                code_length,
                body.len()
            )
        })?;

        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
        })
    }
}

/// A single decoded `method_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInfo<'a, 'cp> {
    /// Access and property flags
    pub access_flags: MethodAccessFlags,
    /// Method name
    pub name: &'cp str,
    /// Method descriptor
    pub descriptor: &'cp str,
    /// Bytecode, `None` for abstract and native methods
    pub code: Option<CodeAttribute<'a>>,
}

/// Lazy iterator over the method table of a [`ClassFile`].
///
/// Yields `Err` once and then stops if a `method_info` cannot be decoded.
pub struct MethodIter<'a, 'cp> {
    parser: Parser<'a>,
    constant_pool: &'cp ConstantPool,
    remaining: u16,
}

impl<'a, 'cp> MethodIter<'a, 'cp> {
    fn parse_method(&mut self) -> Result<MethodInfo<'a, 'cp>> {
        let access_flags = MethodAccessFlags::from_raw(self.parser.read_be::<u16>()?);
        let name = self.constant_pool.utf8(self.parser.read_be::<u16>()?)?;
        let descriptor = self.constant_pool.utf8(self.parser.read_be::<u16>()?)?;

        let mut code = None;
        let attribute_count = self.parser.read_be::<u16>()?;
        for _ in 0..attribute_count {
            let attribute_name = self.constant_pool.utf8(self.parser.read_be::<u16>()?)?;
            let length = self.parser.read_be::<u32>()?;
            let body = self.parser.read_bytes(length as usize)?;

            if attribute_name == CODE_ATTRIBUTE {
                if code.is_some() {
                    return Err(malformed_error!(
                        "Method {}{} has more than one Code attribute",
                        name,
                        descriptor
                    ));
                }
                code = Some(CodeAttribute::parse(body)?);
            }
        }

        Ok(MethodInfo {
            access_flags,
            name,
            descriptor,
            code,
        })
    }
}

impl<'a, 'cp> Iterator for MethodIter<'a, 'cp> {
    type Item = Result<MethodInfo<'a, 'cp>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match self.parse_method() {
            Ok(method) => {
                self.remaining -= 1;
                Some(Ok(method))
            }
            Err(error) => {
                self.remaining = 0;
                Some(Err(error))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
