//! Forwarding stub scanning.
//!
//! A forwarding stub is a method flagged `ACC_BRIDGE | ACC_SYNTHETIC` whose body loads its
//! arguments, casts them and calls the method it stands in for. [`find_delegation`] locates the
//! stub in a compiled class and reports that call.
//!
//! The scan is a single forward pass: the method table is walked lazily until the first
//! candidate, and the candidate's bytecode is decoded only up to its first call instruction.
//! Everything after that point is never touched.

use std::fmt;

use tracing::debug;

use crate::{
    disassembler::decode_instruction,
    file::parser::Parser,
    metadata::{
        classfile::{ClassFile, MemberRefKind, MethodInfo},
        descriptor::parameter_count,
    },
    Error::{NoDelegationFound, StubNotFound},
    Result,
};

/// The call a forwarding stub delegates to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StubDelegation {
    /// Owner of the callee in internal form, e.g. `com/example/IntBox`
    pub callee_owner: String,
    /// Name of the callee
    pub callee_name: String,
    /// Method descriptor of the callee
    pub callee_descriptor: String,
    /// Whether the call goes through an interface method reference
    pub interface: bool,
    /// Offset of the call instruction within the stub's bytecode
    pub offset: u32,
}

impl StubDelegation {
    /// Qualified, dot-separated name of the callee owner
    #[must_use]
    pub fn callee_type_name(&self) -> String {
        self.callee_owner.replace('/', ".")
    }
}

impl fmt::Display for StubDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{}",
            self.callee_owner, self.callee_name, self.callee_descriptor
        )
    }
}

fn is_candidate(
    method: &MethodInfo<'_, '_>,
    stub_name: &str,
    stub_param_count: usize,
) -> Result<bool> {
    if !method.access_flags.is_forwarding_stub() || method.name != stub_name {
        return Ok(false);
    }
    Ok(parameter_count(method.descriptor)? == stub_param_count)
}

/// Find the call the forwarding stub `stub_name` with `stub_param_count` parameters delegates to.
///
/// Only methods flagged both `ACC_BRIDGE` and `ACC_SYNTHETIC` are considered, and only the first
/// of them matching name and parameter count is scanned. Within its bytecode the first
/// `invokevirtual`, `invokespecial`, `invokestatic` or `invokeinterface` wins; `invokedynamic`
/// is not a delegation.
///
/// # Arguments
/// * `class_bytes` - The complete class file declaring the stub
/// * `stub_name` - Name of the stub
/// * `stub_param_count` - Number of parameters the stub declares
///
/// # Errors
/// - [`crate::Error::StubNotFound`] if no candidate method exists
/// - [`crate::Error::NoDelegationFound`] if the candidate has no bytecode or no call in it
/// - [`crate::Error::NotSupported`], [`crate::Error::Malformed`] or
///   [`crate::Error::OutOfBounds`] if the class file cannot be read up to the call
///
/// # Examples
///
/// ```rust,no_run
/// use bridgescope::resolver::find_delegation;
///
/// let bytes = std::fs::read("IntBox.class")?;
/// let delegation = find_delegation(&bytes, "set", 1)?;
/// assert_eq!(delegation.callee_descriptor, "(Ljava/lang/Integer;)V");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn find_delegation(
    class_bytes: &[u8],
    stub_name: &str,
    stub_param_count: usize,
) -> Result<StubDelegation> {
    let class = ClassFile::parse(class_bytes)?;

    let mut candidate = None;
    for method in class.methods()? {
        let method = method?;
        if is_candidate(&method, stub_name, stub_param_count)? {
            candidate = Some(method);
            break;
        }
    }

    let Some(stub) = candidate else {
        return Err(StubNotFound {
            name: stub_name.to_string(),
            param_count: stub_param_count,
        });
    };

    let Some(code) = stub.code else {
        return Err(NoDelegationFound {
            name: stub_name.to_string(),
        });
    };

    let mut parser = Parser::new(code.code);
    while parser.has_more_data() {
        let instruction = decode_instruction(&mut parser)?;
        if !instruction.is_method_call() {
            continue;
        }

        let Some(index) = instruction.constant_pool_index() else {
            continue;
        };
        let callee = class.constant_pool.member_ref(index)?;
        if callee.kind == MemberRefKind::Field {
            return Err(malformed_error!(
                "{} at offset {} in {}{} references field {}",
                instruction.mnemonic,
                instruction.offset,
                stub.name,
                stub.descriptor,
                callee.name
            ));
        }

        let delegation = StubDelegation {
            callee_owner: callee.class_name.to_string(),
            callee_name: callee.name.to_string(),
            callee_descriptor: callee.descriptor.to_string(),
            interface: callee.kind == MemberRefKind::InterfaceMethod,
            offset: instruction.offset,
        };
        debug!(
            stub = %format_args!("{}{}", stub.name, stub.descriptor),
            target = %delegation,
            "found stub delegation"
        );
        return Ok(delegation);
    }

    Err(NoDelegationFound {
        name: stub_name.to_string(),
    })
}
