//! Forwarding stub resolution.
//!
//! When a generic class is specialised, javac emits a forwarding stub ("bridge method") for
//! every inherited method whose erased signature changed. The stub has the erased signature,
//! is flagged `ACC_BRIDGE | ACC_SYNTHETIC` and does nothing but cast its arguments and call the
//! specialised method. Annotations and other metadata live on that target, not on the stub.
//!
//! ```text
//! class Box<T>    { void set(T value) }        // erased: set(Object)
//! class IntBox extends Box<Integer> {
//!     void set(Integer value) { ... }          // user-written target
//!     /* bridge synthetic */ void set(Object v) { set((Integer) v); }
//! }
//! ```
//!
//! # Key Components
//!
//! - [`BridgeResolver`] - Entry point: hierarchy lookup followed by stub resolution
//! - [`find_delegation`] / [`StubDelegation`] - Scan a class file for the call a stub makes
//! - [`ResolutionCache`] / [`StubKey`] - Concurrent at-most-once memoization
//! - [`ResolverConfig`] - Hierarchy and stub chain bounds
//!
//! # Thread Safety
//!
//! [`BridgeResolver`] is `Send + Sync` whenever its provider is. Share it by reference or
//! through an `Arc`; concurrent requests for the same stub compute its resolution once.

mod bridge;
mod cache;
mod config;
mod scanner;

pub use bridge::BridgeResolver;
pub use cache::{ResolutionCache, StubKey};
pub use config::{ResolverConfig, DEFAULT_MAX_STUB_CHAIN};
pub use scanner::{find_delegation, StubDelegation};
