//! Memoization of forwarding stub resolutions.
//!
//! # Architecture
//!
//! Resolved handles live in a `DashMap` of their own, which is consulted first: a cache hit
//! never takes a lock beyond the map's shard lock. A miss goes through a per-key gate, an
//! `Arc<Mutex<()>>` held in a second map, so that:
//!
//! - at most one computation per key runs at a time, and waiters re-check the resolved map
//!   once they get the gate
//! - different keys never wait on each other, even when they hash to the same shard
//! - failures are never stored: the next caller computes again
//!
//! A gate is dropped from the map by the last caller holding it. A gate poisoned by a panicking
//! computation guards no data and is taken over by the next caller.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use dashmap::DashMap;
use tracing::trace;

use crate::{
    metadata::typesystem::{MethodHandle, MethodShape, TypeRef},
    Result,
};

/// Identifies a forwarding stub: its declaring type and its shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StubKey {
    /// Type declaring the stub
    pub owner: TypeRef,
    /// Name and parameter types of the stub
    pub shape: MethodShape,
}

impl StubKey {
    /// Create a new key
    #[must_use]
    pub fn new(owner: TypeRef, shape: MethodShape) -> Self {
        StubKey { owner, shape }
    }

    /// The key identifying the stub `handle`
    #[must_use]
    pub fn for_handle(handle: &MethodHandle) -> Self {
        StubKey::new(handle.owner().clone(), handle.shape().clone())
    }
}

impl fmt::Display for StubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.name(), self.shape)
    }
}

type Gate = Arc<Mutex<()>>;

/// Thread-safe cache of resolved forwarding stubs.
///
/// Entries live as long as the cache and are never invalidated.
#[derive(Default)]
pub struct ResolutionCache {
    resolved: DashMap<StubKey, MethodHandle>,
    pending: DashMap<StubKey, Gate>,
}

impl ResolutionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, key: &StubKey) -> Option<MethodHandle> {
        self.resolved.get(key).map(|entry| entry.value().clone())
    }

    fn release(&self, key: &StubKey, gate: &Gate) {
        // The map and this caller hold the only references when nobody is waiting
        self.pending.remove_if(key, |_, held| {
            Arc::ptr_eq(held, gate) && Arc::strong_count(held) == 2
        });
    }

    /// Return the cached resolution of `key`, computing and storing it on a miss.
    ///
    /// Concurrent callers on the same key wait for a running computation instead of starting
    /// their own. A failed or panicking computation is seen by its caller only and leaves the
    /// key unresolved, so the next caller computes again.
    ///
    /// # Errors
    /// Returns whatever `compute` returns.
    pub fn get_or_compute<F>(&self, key: &StubKey, compute: F) -> Result<MethodHandle>
    where
        F: FnOnce() -> Result<MethodHandle>,
    {
        if let Some(resolved) = self.lookup(key) {
            trace!(stub = %key, "resolution cache hit");
            return Ok(resolved);
        }

        let gate = self.pending.entry(key.clone()).or_default().clone();
        let result = {
            let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            match self.lookup(key) {
                Some(resolved) => {
                    trace!(stub = %key, "resolution cache hit after wait");
                    Ok(resolved)
                }
                None => compute().inspect(|resolved| {
                    self.resolved.insert(key.clone(), resolved.clone());
                }),
            }
        };

        self.release(key, &gate);
        result
    }

    /// The cached resolution of `key`, if one is stored
    ///
    /// Never waits; a computation still running for `key` is reported as `None`.
    #[must_use]
    pub fn get(&self, key: &StubKey) -> Option<MethodHandle> {
        self.lookup(key)
    }

    /// Whether a resolution of `key` is stored
    #[must_use]
    pub fn contains(&self, key: &StubKey) -> bool {
        self.resolved.contains_key(key)
    }

    /// Number of stored resolutions
    ///
    /// Keys whose computation is running or has failed are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns `true` if no resolution is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Barrier,
        },
        thread,
    };

    use super::*;
    use crate::{
        metadata::typesystem::{TypeProvider, TypeRegistry},
        test::int_box_registry,
        Error,
    };

    fn int_box_handles(registry: &TypeRegistry) -> (StubKey, MethodHandle) {
        let int_box = registry.load_type("com.example.IntBox").unwrap();
        let methods = int_box.declared_methods();
        let stub = methods
            .iter()
            .find(|m| m.is_forwarding_stub() && m.name() == "set")
            .unwrap();
        let target = methods
            .iter()
            .find(|m| !m.is_forwarding_stub() && m.name() == "set")
            .unwrap();
        (StubKey::for_handle(stub), target.clone())
    }

    #[test]
    fn stores_success() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let cache = ResolutionCache::new();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&key), None);

        let first = cache.get_or_compute(&key, || Ok(target.clone())).unwrap();
        let second = cache
            .get_or_compute(&key, || panic!("cached value must be reused"))
            .unwrap();

        assert_eq!(first, target);
        assert_eq!(second, target);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key), Some(target));
        assert!(cache.pending.is_empty());
        assert_eq!(key.to_string(), "com.example.IntBox.set(java.lang.Object)");
    }

    #[test]
    fn does_not_store_failure() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let cache = ResolutionCache::new();

        let failed = cache.get_or_compute(&key, || Err(Error::TypeLoad("x".to_string())));
        assert!(matches!(failed, Err(Error::TypeLoad(_))));
        assert!(cache.is_empty());
        assert!(!cache.contains(&key));
        assert!(cache.pending.is_empty());

        let retried = cache.get_or_compute(&key, || Ok(target.clone())).unwrap();
        assert_eq!(retried, target);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn computes_at_most_once() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let cache = ResolutionCache::new();
        let computations = AtomicUsize::new(0);
        let barrier = Barrier::new(16);

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get_or_compute(&key, || {
                            computations.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok(target.clone())
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(computations.load(Ordering::SeqCst), 1);
        for result in results {
            assert_eq!(result.unwrap(), target);
        }
    }

    #[test]
    fn distinct_keys_do_not_wait_on_each_other() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let other = StubKey::new(key.owner.clone(), MethodShape::new("other", Vec::new()));
        let cache = ResolutionCache::new();
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            scope.spawn(|| {
                cache
                    .get_or_compute(&key, || {
                        // Blocks until the other key has been computed
                        barrier.wait();
                        barrier.wait();
                        Ok(target.clone())
                    })
                    .unwrap();
            });

            barrier.wait();
            cache.get_or_compute(&other, || Ok(target.clone())).unwrap();
            barrier.wait();
        });

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn panicking_computation_is_retried() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let cache = ResolutionCache::new();

        let panicked = thread::scope(|scope| {
            scope
                .spawn(|| cache.get_or_compute(&key, || panic!("computation failed")))
                .join()
        });
        assert!(panicked.is_err());
        assert!(cache.is_empty());

        for _ in 0..3 {
            let retried = cache.get_or_compute(&key, || Ok(target.clone())).unwrap();
            assert_eq!(retried, target);
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.pending.is_empty());
    }

    #[test]
    fn reads_do_not_wait_for_computation() {
        let registry = int_box_registry();
        let (key, target) = int_box_handles(&registry);
        let cache = ResolutionCache::new();
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            scope.spawn(|| {
                cache
                    .get_or_compute(&key, || {
                        barrier.wait();
                        barrier.wait();
                        Ok(target.clone())
                    })
                    .unwrap();
            });

            barrier.wait();
            assert_eq!(cache.get(&key), None);
            assert!(!cache.contains(&key));
            assert_eq!(cache.len(), 0);
            barrier.wait();
        });

        assert_eq!(cache.get(&key), Some(target));
        assert_eq!(cache.len(), 1);
    }
}
