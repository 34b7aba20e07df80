//! Descriptor encoders, the inverse of [`crate::metadata::descriptor::DescriptorParser`].
//!
//! - [`encode_method_descriptor`] - `(params)ret` for a [`MethodDescriptor`]
//! - [`encode_field_descriptor`] - a single [`FieldType`]
//!
//! For every well-formed descriptor `d`, encoding the parsed form yields `d` again.

use crate::metadata::descriptor::{
    FieldType, MethodDescriptor, ReturnType, ARRAY_MARKER, CLASS_MARKER, CLASS_TERMINATOR,
    VOID_CODE,
};

fn encode_field_type(field_type: &FieldType, buffer: &mut String) {
    for _ in 0..field_type.dimensions() {
        buffer.push(char::from(ARRAY_MARKER));
    }

    match field_type.element() {
        FieldType::Base(base) => buffer.push(char::from(base.code())),
        FieldType::Object(name) => {
            buffer.push(char::from(CLASS_MARKER));
            buffer.extend(name.chars().map(|c| if c == '.' { '/' } else { c }));
            buffer.push(char::from(CLASS_TERMINATOR));
        }
        FieldType::Array(_) => unreachable!("element() never returns an array"),
    }
}

/// Encode a single field type into its descriptor form.
///
/// # Examples
///
/// ```rust
/// use bridgescope::metadata::descriptor::{encode_field_descriptor, FieldType};
///
/// let field = FieldType::from_type_name("java.lang.String[]").unwrap();
/// assert_eq!(encode_field_descriptor(&field), "[Ljava/lang/String;");
/// ```
#[must_use]
pub fn encode_field_descriptor(field_type: &FieldType) -> String {
    let mut buffer = String::new();
    encode_field_type(field_type, &mut buffer);
    buffer
}

/// Encode a method descriptor into its `(params)ret` form.
#[must_use]
pub fn encode_method_descriptor(descriptor: &MethodDescriptor) -> String {
    let mut buffer = String::with_capacity(2 + descriptor.parameters.len() * 4);
    buffer.push('(');
    for parameter in &descriptor.parameters {
        encode_field_type(parameter, &mut buffer);
    }
    buffer.push(')');

    match &descriptor.return_type {
        ReturnType::Void => buffer.push(char::from(VOID_CODE)),
        ReturnType::Value(field_type) => encode_field_type(field_type, &mut buffer),
    }
    buffer
}
