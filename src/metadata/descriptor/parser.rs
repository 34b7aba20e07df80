use crate::{
    file::parser::Parser,
    metadata::descriptor::{
        BaseType, FieldType, MethodDescriptor, ReturnType, ARRAY_MARKER, CLASS_MARKER,
        CLASS_TERMINATOR, VOID_CODE,
    },
    Result,
};

/// Maximum number of array dimensions a JVM type may have
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Single-pass parser for JVM method and field descriptors
///
/// # Example
///
/// ```rust
/// use bridgescope::metadata::descriptor::DescriptorParser;
/// let mut parser = DescriptorParser::new("(ILjava/lang/String;)V");
/// let descriptor = parser.parse_method_descriptor()?;
/// assert_eq!(descriptor.parameter_type_names(), ["int", "java.lang.String"]);
/// # Ok::<(), bridgescope::Error>(())
/// ```
///
/// ## Notes:
/// - The grammar is the one from JVMS §4.3; generic signatures (the `Signature` attribute)
///   are a different language and are rejected.
/// - A parser instance consumes its input; create a new one per descriptor.
pub struct DescriptorParser<'a> {
    input: &'a str,
    parser: Parser<'a>,
}

impl<'a> DescriptorParser<'a> {
    /// Create a new `DescriptorParser` over a descriptor string
    ///
    /// ## Arguments
    /// * 'input' - The descriptor to parse
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        DescriptorParser {
            input,
            parser: Parser::new(input.as_bytes()),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.parser.peek_byte().ok()
    }

    fn bump(&mut self) -> Result<()> {
        self.parser.advance()
    }

    fn expect_end(&self) -> Result<()> {
        if self.parser.has_more_data() {
            return Err(descriptor_error!(
                self.parser.pos(),
                "unexpected trailing data '{}'",
                &self.input[self.parser.pos()..]
            ));
        }
        Ok(())
    }

    /// Parse a single field type at the current position
    fn parse_field_type(&mut self) -> Result<FieldType> {
        let mut dimensions = 0;
        while self.peek() == Some(ARRAY_MARKER) {
            dimensions += 1;
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(descriptor_error!(
                    self.parser.pos(),
                    "array type exceeds {} dimensions",
                    MAX_ARRAY_DIMENSIONS
                ));
            }
            self.bump()?;
        }

        let position = self.parser.pos();
        let mut field_type = match self.peek() {
            None => {
                return Err(descriptor_error!(
                    position,
                    "expected a field type, found end of input"
                ))
            }
            Some(CLASS_MARKER) => {
                self.bump()?;
                FieldType::Object(self.parse_class_name()?)
            }
            Some(VOID_CODE) => {
                return Err(descriptor_error!(
                    position,
                    "'V' is only valid as a return type"
                ))
            }
            Some(code) => match BaseType::from_code(code) {
                Some(base) => {
                    self.bump()?;
                    FieldType::Base(base)
                }
                None => {
                    return Err(descriptor_error!(
                        position,
                        "invalid type code '{}'",
                        char::from(code)
                    ))
                }
            },
        };

        for _ in 0..dimensions {
            field_type = FieldType::Array(Box::new(field_type));
        }
        Ok(field_type)
    }

    /// Parse `name;` after an `L` marker and return the qualified dotted name
    fn parse_class_name(&mut self) -> Result<String> {
        let start = self.parser.pos();
        let mut segment_start = start;

        loop {
            let position = self.parser.pos();
            match self.peek() {
                None => {
                    return Err(descriptor_error!(
                        position,
                        "unterminated class name, expected ';'"
                    ))
                }
                Some(CLASS_TERMINATOR) => {
                    if position == start {
                        return Err(descriptor_error!(position, "empty class name"));
                    }
                    if position == segment_start {
                        return Err(descriptor_error!(position, "empty class name segment"));
                    }
                    break;
                }
                Some(b'/') => {
                    if position == segment_start {
                        return Err(descriptor_error!(position, "empty class name segment"));
                    }
                    segment_start = position + 1;
                }
                Some(illegal @ (b'.' | b'[')) => {
                    return Err(descriptor_error!(
                        position,
                        "illegal character '{}' in class name",
                        char::from(illegal)
                    ))
                }
                Some(_) => {}
            }
            self.bump()?;
        }

        let end = self.parser.pos();
        // Skip the terminator
        self.bump()?;

        Ok(self.input[start..end].replace('/', "."))
    }

    /// Parse a complete method descriptor, `(params)ret`
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedDescriptor`] carrying the cursor offset at which the
    /// input stopped matching the grammar.
    pub fn parse_method_descriptor(&mut self) -> Result<MethodDescriptor> {
        if self.peek() != Some(b'(') {
            return Err(descriptor_error!(self.parser.pos(), "expected '('"));
        }
        self.bump()?;

        let mut parameters = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(descriptor_error!(
                        self.parser.pos(),
                        "unterminated parameter list, expected ')'"
                    ))
                }
                Some(b')') => {
                    self.bump()?;
                    break;
                }
                Some(_) => parameters.push(self.parse_field_type()?),
            }
        }

        let return_type = match self.peek() {
            None => {
                return Err(descriptor_error!(
                    self.parser.pos(),
                    "missing return type"
                ))
            }
            Some(VOID_CODE) => {
                self.bump()?;
                ReturnType::Void
            }
            Some(_) => ReturnType::Value(self.parse_field_type()?),
        };

        self.expect_end()?;

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }

    /// Parse a complete field descriptor, e.g. `[Ljava/lang/String;`
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedDescriptor`] if the input is not exactly one field type.
    pub fn parse_field_descriptor(&mut self) -> Result<FieldType> {
        let field_type = self.parse_field_type()?;
        self.expect_end()?;
        Ok(field_type)
    }
}

/// Count the parameters of a method descriptor without building its types.
///
/// Class names are skipped by searching for their terminator, so nothing is allocated.
/// Structural problems are still reported.
///
/// # Errors
/// Returns [`crate::Error::MalformedDescriptor`] if the parameter list is malformed.
pub fn parameter_count(descriptor: &str) -> Result<usize> {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(descriptor_error!(0, "expected '('"));
    }

    let mut position = 1;
    let mut count = 0;
    let mut dimensions = 0;
    loop {
        match bytes.get(position) {
            None => {
                return Err(descriptor_error!(
                    position,
                    "unterminated parameter list, expected ')'"
                ))
            }
            Some(b')') if dimensions > 0 => {
                return Err(descriptor_error!(position, "array type without component"))
            }
            Some(b')') => return Ok(count),
            Some(&ARRAY_MARKER) => {
                dimensions += 1;
                if dimensions > MAX_ARRAY_DIMENSIONS {
                    return Err(descriptor_error!(
                        position,
                        "array type exceeds {} dimensions",
                        MAX_ARRAY_DIMENSIONS
                    ));
                }
                position += 1;
            }
            Some(&CLASS_MARKER) => {
                match bytes[position..].iter().position(|&b| b == CLASS_TERMINATOR) {
                    Some(offset) if offset > 1 => position += offset + 1,
                    Some(offset) => {
                        return Err(descriptor_error!(position + offset, "empty class name"))
                    }
                    None => {
                        return Err(descriptor_error!(
                            bytes.len(),
                            "unterminated class name, expected ';'"
                        ))
                    }
                }
                count += 1;
                dimensions = 0;
            }
            Some(&code) if BaseType::from_code(code).is_some() => {
                position += 1;
                count += 1;
                dimensions = 0;
            }
            Some(&code) => {
                return Err(descriptor_error!(
                    position,
                    "invalid type code '{}'",
                    char::from(code)
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn position_of(result: Result<MethodDescriptor>) -> usize {
        match result {
            Err(Error::MalformedDescriptor { position, .. }) => position,
            other => panic!("expected MalformedDescriptor, got {other:?}"),
        }
    }

    #[test]
    fn parse_primitives_and_objects() {
        let mut parser = DescriptorParser::new("(ILjava/lang/String;[[J)V");
        let descriptor = parser.parse_method_descriptor().unwrap();

        assert_eq!(
            descriptor.parameter_type_names(),
            ["int", "java.lang.String", "long[][]"]
        );
        assert_eq!(descriptor.return_type, ReturnType::Void);
    }

    #[test]
    fn parse_object_return() {
        let mut parser = DescriptorParser::new("(I)Ljava/lang/String;");
        let descriptor = parser.parse_method_descriptor().unwrap();

        assert_eq!(descriptor.parameter_type_names(), ["int"]);
        assert_eq!(descriptor.return_type_name(), "java.lang.String");
    }

    #[test]
    fn parse_no_parameters() {
        let mut parser = DescriptorParser::new("()[Z");
        let descriptor = parser.parse_method_descriptor().unwrap();

        assert!(descriptor.parameters.is_empty());
        assert_eq!(descriptor.return_type_name(), "boolean[]");
    }

    #[test]
    fn parse_field() {
        let mut parser = DescriptorParser::new("[Ljava/util/List;");
        let field = parser.parse_field_descriptor().unwrap();
        assert_eq!(field.type_name(), "java.util.List[]");

        let mut parser = DescriptorParser::new("II");
        assert!(parser.parse_field_descriptor().is_err());
    }

    #[test]
    fn truncated_input_reports_length() {
        assert_eq!(
            position_of(DescriptorParser::new("(I").parse_method_descriptor()),
            2
        );
        assert_eq!(
            position_of(DescriptorParser::new("(I)").parse_method_descriptor()),
            3
        );
        assert_eq!(
            position_of(DescriptorParser::new("(Ljava/lang").parse_method_descriptor()),
            11
        );
        assert_eq!(
            position_of(DescriptorParser::new("").parse_method_descriptor()),
            0
        );
    }

    #[test]
    fn invalid_class_names() {
        assert_eq!(
            position_of(DescriptorParser::new("(L;)V").parse_method_descriptor()),
            2
        );
        assert_eq!(
            position_of(DescriptorParser::new("(Ljava//Foo;)V").parse_method_descriptor()),
            7
        );
        assert_eq!(
            position_of(DescriptorParser::new("(Ljava/lang/;)V").parse_method_descriptor()),
            12
        );
        assert_eq!(
            position_of(DescriptorParser::new("(Ljava.lang.String;)V").parse_method_descriptor()),
            6
        );
    }

    #[test]
    fn invalid_codes() {
        assert_eq!(
            position_of(DescriptorParser::new("(Q)V").parse_method_descriptor()),
            1
        );
        assert_eq!(
            position_of(DescriptorParser::new("(V)V").parse_method_descriptor()),
            1
        );
        assert_eq!(
            position_of(DescriptorParser::new("(I)VV").parse_method_descriptor()),
            4
        );
        assert_eq!(
            position_of(DescriptorParser::new("([)V").parse_method_descriptor()),
            2
        );
    }

    #[test]
    fn array_dimension_limit() {
        let ok = format!("({}I)V", "[".repeat(MAX_ARRAY_DIMENSIONS));
        assert!(DescriptorParser::new(&ok).parse_method_descriptor().is_ok());

        let too_deep = format!("({}I)V", "[".repeat(MAX_ARRAY_DIMENSIONS + 1));
        assert_eq!(
            position_of(DescriptorParser::new(&too_deep).parse_method_descriptor()),
            MAX_ARRAY_DIMENSIONS + 1
        );
    }

    #[test]
    fn count_parameters() {
        assert_eq!(parameter_count("()V").unwrap(), 0);
        assert_eq!(parameter_count("(I)Ljava/lang/String;").unwrap(), 1);
        assert_eq!(parameter_count("(ILjava/lang/String;[[J)V").unwrap(), 3);
        assert_eq!(parameter_count("([Ljava/lang/Object;DZ)I").unwrap(), 3);
    }

    #[test]
    fn count_parameters_malformed() {
        assert!(matches!(
            parameter_count("(I"),
            Err(Error::MalformedDescriptor { position: 2, .. })
        ));
        assert!(matches!(
            parameter_count("I)V"),
            Err(Error::MalformedDescriptor { position: 0, .. })
        ));
        assert!(matches!(
            parameter_count("(Ljava/lang/String"),
            Err(Error::MalformedDescriptor { position: 18, .. })
        ));
        assert!(matches!(
            parameter_count("([)V"),
            Err(Error::MalformedDescriptor { position: 2, .. })
        ));
        assert!(matches!(
            parameter_count("(L;)V"),
            Err(Error::MalformedDescriptor { position: 2, .. })
        ));
    }
}
