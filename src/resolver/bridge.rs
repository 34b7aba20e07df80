use tracing::debug;

use crate::{
    metadata::{
        descriptor::parse_method_descriptor,
        typesystem::{find_declared_method, MethodHandle, TypeProvider, TypeRef},
    },
    resolver::{find_delegation, ResolutionCache, ResolverConfig, StubKey},
    Error::{BridgeResolution, StubChainLimit, TargetNotFound},
    Result,
};

/// Resolves forwarding stubs to the methods they delegate to.
///
/// The resolver owns a [`ResolutionCache`]; each stub is resolved at most once per resolver and
/// the result is shared by all threads using it. Types and class bytes come from the
/// [`TypeProvider`] the resolver was created with.
///
/// # Examples
///
/// ```rust,no_run
/// use bridgescope::{BridgeResolver, TypeRegistry};
/// use bridgescope::metadata::typesystem::TypeProvider;
///
/// let registry = TypeRegistry::new();
/// registry.define_class("java.lang.Integer").build()?;
/// registry.define_class_file(std::fs::read("Box.class")?)?;
/// registry.define_class_file(std::fs::read("IntBox.class")?)?;
///
/// let resolver = BridgeResolver::new(&registry);
/// let int_box = registry.load_type("com.example.IntBox")?;
/// let object = registry.load_type("java.lang.Object")?;
///
/// let set = resolver.resolve(&int_box, "set", &[object])?.unwrap();
/// assert_eq!(set.parameter_types()[0].name(), "java.lang.Integer");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct BridgeResolver<P: TypeProvider> {
    provider: P,
    config: ResolverConfig,
    cache: ResolutionCache,
}

impl<P: TypeProvider> BridgeResolver<P> {
    /// Create a resolver with the default [`ResolverConfig`]
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ResolverConfig::default())
    }

    /// Create a resolver with an explicit configuration
    pub fn with_config(provider: P, config: ResolverConfig) -> Self {
        BridgeResolver {
            provider,
            config,
            cache: ResolutionCache::new(),
        }
    }

    /// Find the method `name(parameter_types)` visible on `ty` and, if it is a forwarding stub,
    /// the method the stub delegates to.
    ///
    /// Returns `Ok(None)` if neither `ty` nor any ancestor below `java.lang.Object` declares a
    /// matching method. The returned handle is never a forwarding stub. Methods that are not
    /// stubs are returned as found, without touching the cache.
    ///
    /// # Errors
    /// - [`crate::Error::HierarchyCycle`] if the hierarchy of `ty` exceeds the configured depth
    /// - [`crate::Error::BridgeResolution`] wrapping the cause if a stub was found but could
    ///   not be resolved
    #[tracing::instrument(level = "debug", skip_all, fields(type_name = %ty, method = name))]
    pub fn resolve(
        &self,
        ty: &TypeRef,
        name: &str,
        parameter_types: &[TypeRef],
    ) -> Result<Option<MethodHandle>> {
        let Some(handle) =
            find_declared_method(ty, name, parameter_types, self.config.max_hierarchy_depth)?
        else {
            return Ok(None);
        };

        self.resolve_handle(&handle).map(Some)
    }

    /// Resolve an already located method: stubs are replaced by their target, anything else is
    /// returned unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::BridgeResolution`] wrapping the cause if `handle` is a stub that
    /// could not be resolved.
    pub fn resolve_handle(&self, handle: &MethodHandle) -> Result<MethodHandle> {
        if !handle.is_forwarding_stub() {
            return Ok(handle.clone());
        }

        self.cache
            .get_or_compute(&StubKey::for_handle(handle), || self.follow_stubs(handle))
            .map_err(|source| BridgeResolution {
                method: handle.to_string(),
                source: Box::new(source),
            })
    }

    fn follow_stubs(&self, stub: &MethodHandle) -> Result<MethodHandle> {
        let mut current = stub.clone();
        for hop in 1..=self.config.max_stub_chain {
            let target = self.delegation_target(&current)?;
            if !target.is_forwarding_stub() {
                debug!(stub = %stub, target = %target, hops = hop, "resolved forwarding stub");
                return Ok(target);
            }
            current = target;
        }

        Err(StubChainLimit(self.config.max_stub_chain))
    }

    fn delegation_target(&self, stub: &MethodHandle) -> Result<MethodHandle> {
        let class_bytes = self.provider.class_bytes(stub.owner())?;
        let delegation = find_delegation(&class_bytes, stub.name(), stub.parameter_types().len())?;

        let descriptor = parse_method_descriptor(&delegation.callee_descriptor)?;
        let owner = self.provider.load_type(&delegation.callee_type_name())?;
        let parameter_types = descriptor
            .parameter_type_names()
            .iter()
            .map(|name| self.provider.load_type(name))
            .collect::<Result<Vec<_>>>()?;

        find_declared_method(
            &owner,
            &delegation.callee_name,
            &parameter_types,
            self.config.max_hierarchy_depth,
        )?
        .ok_or_else(|| TargetNotFound {
            owner: owner.name().to_string(),
            name: delegation.callee_name.clone(),
        })
    }

    /// Resolutions stored so far
    #[must_use]
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The type provider in use
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
