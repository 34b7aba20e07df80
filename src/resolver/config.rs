//! Resolver configuration
//!
//! Bounds applied while resolving forwarding stubs. Both limits exist to turn corrupt input
//! into an error instead of unbounded work; well-formed hierarchies and stubs never get close.

use crate::metadata::typesystem::hierarchy::DEFAULT_MAX_HIERARCHY_DEPTH;

/// Default bound on stubs delegating to further stubs
pub const DEFAULT_MAX_STUB_CHAIN: usize = 8;

/// Configuration for a [`crate::BridgeResolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum number of types a single hierarchy walk may visit (default: 1000)
    pub max_hierarchy_depth: usize,

    /// Maximum number of forwarding stubs followed while resolving one method (default: 8).
    /// javac never emits a stub that delegates to another stub, so `1` is enough for
    /// compiler output
    pub max_stub_chain: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            max_stub_chain: DEFAULT_MAX_STUB_CHAIN,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration accepting only what javac produces
    ///
    /// Stubs must delegate directly to a non-stub method and hierarchies are capped at a depth
    /// no real class library reaches.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_hierarchy_depth: 256,
            max_stub_chain: 1,
        }
    }

    /// Creates a configuration for bytecode rewritten by other tools
    ///
    /// Allows long stub chains and very deep hierarchies.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            max_hierarchy_depth: 65_536,
            max_stub_chain: 64,
        }
    }

    /// Replace the hierarchy depth bound
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, max_hierarchy_depth: usize) -> Self {
        self.max_hierarchy_depth = max_hierarchy_depth;
        self
    }

    /// Replace the stub chain bound
    #[must_use]
    pub fn with_max_stub_chain(mut self, max_stub_chain: usize) -> Self {
        self.max_stub_chain = max_stub_chain;
        self
    }
}
