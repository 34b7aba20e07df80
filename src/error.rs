use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! descriptor_error {
    ($pos:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        crate::Error::MalformedDescriptor {
            message: format!($fmt $(, $arg)*),
            position: $pos,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into three groups: failures while decoding binary input (class files and
/// descriptors), failures while walking a type hierarchy, and failures while resolving a
/// forwarding stub. Every failure that happens while a stub is being resolved reaches the caller
/// of [`crate::BridgeResolver::resolve`] wrapped in [`Error::BridgeResolution`], so interception
/// layers can tell "could not resolve the concrete method" apart from everything else.
///
/// # Error Categories
///
/// ## Binary Input Errors
/// - [`Error::Malformed`] - Corrupted or invalid class file structure
/// - [`Error::MalformedDescriptor`] - A method or field descriptor violates the grammar
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the input
/// - [`Error::NotSupported`] - Input is not a class file
///
/// ## Hierarchy Errors
/// - [`Error::HierarchyCycle`] - The ancestor walk exceeded its configured bound
/// - [`Error::TypeLoad`] - A referenced type could not be located
///
/// ## Resolution Errors
/// - [`Error::StubNotFound`] - No forwarding stub with the requested name and arity exists
/// - [`Error::NoDelegationFound`] - The stub body contains no call instruction
/// - [`Error::TargetNotFound`] - The delegation target is not declared on its owner
/// - [`Error::StubChainLimit`] - Stubs delegating to stubs exceeded the configured bound
/// - [`Error::BridgeResolution`] - Wraps any of the above when raised by the resolver
///
/// # Examples
///
/// ```rust
/// use bridgescope::{Error, metadata::descriptor::parse_method_descriptor};
///
/// match parse_method_descriptor("(I") {
///     Ok(_) => unreachable!(),
///     Err(Error::MalformedDescriptor { position, .. }) => assert_eq!(position, 2),
///     Err(e) => panic!("unexpected error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The class file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A descriptor string does not match the descriptor grammar.
    ///
    /// `position` is the byte offset of the parse cursor at the point the problem
    /// was detected, which for truncated input equals the input length.
    #[error("Malformed descriptor at position {position}: {message}")]
    MalformedDescriptor {
        /// What was expected or found
        message: String,
        /// Cursor offset into the descriptor
        position: usize,
    },

    /// An out of bound access was attempted while parsing the input.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The input does not start with the class file magic.
    #[error("This file type is not supported")]
    NotSupported,

    /// The ancestor chain of a type did not terminate within the configured bound.
    ///
    /// Ancestor chains are acyclic in a well-formed host, so hitting this limit means the
    /// host handed out a cyclic or absurdly deep hierarchy.
    #[error("Hierarchy of '{type_name}' exceeds {limit} ancestors, the chain is likely cyclic")]
    HierarchyCycle {
        /// Type the walk started from
        type_name: String,
        /// The bound that was exceeded
        limit: usize,
    },

    /// A referenced type (parameter type, callee owner, ...) could not be located.
    #[error("Failed to load type - {0}")]
    TypeLoad(String),

    /// No method flagged as bridge and synthetic with this name and parameter count exists
    /// in the scanned class.
    #[error("No forwarding stub '{name}' with {param_count} parameters found")]
    StubNotFound {
        /// Name of the stub that was searched for
        name: String,
        /// Parameter count of the stub that was searched for
        param_count: usize,
    },

    /// A matching forwarding stub exists but its body contains no call instruction.
    #[error("Forwarding stub '{name}' contains no call instruction")]
    NoDelegationFound {
        /// Name of the stub
        name: String,
    },

    /// The method a stub delegates to is not declared on the callee owner or its ancestors.
    #[error("Delegation target '{owner}.{name}' could not be found")]
    TargetNotFound {
        /// Qualified name of the callee owner
        owner: String,
        /// Name of the callee
        name: String,
    },

    /// Forwarding stubs delegating to further stubs exceeded the configured bound.
    #[error("Forwarding stub chain exceeds {0} hops")]
    StubChainLimit(usize),

    /// Resolving a forwarding stub failed.
    ///
    /// Wraps the underlying cause. Callers must treat this as "unable to resolve the
    /// concrete method" and fail the enclosing operation.
    #[error("Failed to resolve forwarding stub {method}: {source}")]
    BridgeResolution {
        /// Display form of the stub, `Owner.name(Params)`
        method: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}
