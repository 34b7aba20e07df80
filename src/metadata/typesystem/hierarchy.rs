//! Bounded walks over a type's superclass chain.
//!
//! All lookups here visit a type first and then its ancestors, most-derived first, and stop
//! before `java.lang.Object`. Members declared on the root are never reported. A well-formed
//! host hands out acyclic chains; the walk is nevertheless bounded by a step limit so that a
//! cyclic or corrupt host surfaces as [`crate::Error::HierarchyCycle`] instead of a hang.
//!
//! # Examples
//!
//! ```rust
//! use bridgescope::metadata::typesystem::{
//!     find_declared_method, hierarchy::DEFAULT_MAX_HIERARCHY_DEPTH, MethodSpec, TypeRegistry,
//! };
//!
//! let registry = TypeRegistry::new();
//! registry
//!     .define_class("com.example.Base")
//!     .method(MethodSpec::new("size", &[], "int"))
//!     .build()?;
//! let derived = registry.define_class("com.example.Derived")
//!     .extends("com.example.Base")
//!     .build()?;
//!
//! let size = find_declared_method(&derived, "size", &[], DEFAULT_MAX_HIERARCHY_DEPTH)?;
//! assert_eq!(size.unwrap().owner().name(), "com.example.Base");
//! # Ok::<(), bridgescope::Error>(())
//! ```

use tracing::{trace, warn};

use crate::{
    metadata::typesystem::{Annotation, MethodHandle, TypeRef},
    Error::HierarchyCycle,
    Result,
};

/// Default bound on the number of types a walk may visit
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 1000;

/// Iterator over a type and its ancestors, excluding the root type.
///
/// Yields a single `Err(HierarchyCycle)` and then stops once more than `max_depth` types
/// would be visited.
pub struct Ancestors {
    next: Option<TypeRef>,
    origin: String,
    steps: usize,
    max_depth: usize,
}

impl Ancestors {
    /// Start a walk at `start`, visiting at most `max_depth` types
    #[must_use]
    pub fn new(start: &TypeRef, max_depth: usize) -> Self {
        Ancestors {
            next: Some(start.clone()),
            origin: start.name().to_string(),
            steps: 0,
            max_depth,
        }
    }

    /// Number of types visited so far
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Iterator for Ancestors {
    type Item = Result<TypeRef>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if current.is_root() {
            return None;
        }

        if self.steps >= self.max_depth {
            warn!(
                type_name = %self.origin,
                limit = self.max_depth,
                "type hierarchy exceeds depth limit"
            );
            return Some(Err(HierarchyCycle {
                type_name: self.origin.clone(),
                limit: self.max_depth,
            }));
        }

        self.steps += 1;
        trace!(type_name = current.name(), depth = self.steps, "hierarchy step");
        self.next = current.ancestor();
        Some(Ok(current))
    }
}

/// Find the method with the given name and parameter types declared on `ty` or the nearest
/// ancestor that declares it.
///
/// If one type declares several methods of the same shape, which is what a covariant-return
/// override compiles to, the method that is not a forwarding stub is returned.
///
/// # Errors
/// Returns [`crate::Error::HierarchyCycle`] if the walk exceeds `max_depth` types.
pub fn find_declared_method(
    ty: &TypeRef,
    name: &str,
    parameter_types: &[TypeRef],
    max_depth: usize,
) -> Result<Option<MethodHandle>> {
    for current in Ancestors::new(ty, max_depth) {
        let current = current?;

        let mut stub = None;
        for method in current.declared_methods() {
            if !method.shape().matches(name, parameter_types) {
                continue;
            }
            if !method.is_forwarding_stub() {
                return Ok(Some(method));
            }
            stub.get_or_insert(method);
        }

        if stub.is_some() {
            return Ok(stub);
        }
    }

    Ok(None)
}

/// All supertypes of `ty`, nearest first, excluding `ty` itself and the root type.
///
/// # Errors
/// Returns [`crate::Error::HierarchyCycle`] if the walk exceeds `max_depth` types.
pub fn ancestors(ty: &TypeRef, max_depth: usize) -> Result<Vec<TypeRef>> {
    Ancestors::new(ty, max_depth).skip(1).collect()
}

/// Find an annotation of the given kind on `ty` or the nearest ancestor carrying one.
///
/// # Errors
/// Returns [`crate::Error::HierarchyCycle`] if the walk exceeds `max_depth` types.
pub fn find_annotation(ty: &TypeRef, kind: &str, max_depth: usize) -> Result<Option<Annotation>> {
    for current in Ancestors::new(ty, max_depth) {
        let current = current?;
        if let Some(annotation) = current
            .declared_annotations()
            .into_iter()
            .find(|annotation| annotation.kind() == kind)
        {
            return Ok(Some(annotation));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        metadata::{
            classfile::MethodAccessFlags,
            typesystem::{
                AnnotationValue, MethodShape, MethodSpec, TypeMetadata, TypeProvider,
                TypeRegistry, WeakTypeRef, ROOT_TYPE_NAME,
            },
        },
        Error,
    };

    /// Type whose ancestor can be pointed anywhere, including at itself
    struct Looping {
        name: String,
        ancestor: Mutex<Option<WeakTypeRef>>,
    }

    impl TypeMetadata for Looping {
        fn name(&self) -> &str {
            &self.name
        }

        fn ancestor(&self) -> Option<TypeRef> {
            self.ancestor
                .lock()
                .ok()
                .and_then(|a| a.as_ref().and_then(WeakTypeRef::upgrade))
        }

        fn declared_methods(&self) -> Vec<MethodHandle> {
            Vec::new()
        }

        fn declared_annotations(&self) -> Vec<Annotation> {
            Vec::new()
        }
    }

    fn looping(name: &str) -> (Arc<Looping>, TypeRef) {
        let metadata = Arc::new(Looping {
            name: name.to_string(),
            ancestor: Mutex::new(None),
        });
        let type_ref = TypeRef::new(metadata.clone());
        (metadata, type_ref)
    }

    fn chain(registry: &TypeRegistry, length: usize) -> TypeRef {
        let mut parent = ROOT_TYPE_NAME.to_string();
        for i in 0..length {
            let name = format!("chain.T{i}");
            registry.define_class(&name).extends(&parent).build().unwrap();
            parent = name;
        }
        registry.load_type(&parent).unwrap()
    }

    #[test]
    fn walk_is_bounded_by_chain_length() {
        let registry = TypeRegistry::new();
        let leaf = chain(&registry, 5);

        let mut walk = Ancestors::new(&leaf, DEFAULT_MAX_HIERARCHY_DEPTH);
        let names: Vec<_> = walk
            .by_ref()
            .map(|t| t.unwrap().name().to_string())
            .collect();

        assert_eq!(names.first().map(String::as_str), Some("chain.T4"));
        assert_eq!(names.last().map(String::as_str), Some("chain.T0"));
        assert_eq!(walk.steps(), 5);

        let supertypes = ancestors(&leaf, DEFAULT_MAX_HIERARCHY_DEPTH).unwrap();
        assert_eq!(supertypes.len(), 4);
        assert_eq!(supertypes[0].name(), "chain.T3");
    }

    #[test]
    fn walk_exact_limit() {
        let registry = TypeRegistry::new();
        let leaf = chain(&registry, 3);

        assert!(ancestors(&leaf, 3).is_ok());
        assert!(matches!(
            ancestors(&leaf, 2),
            Err(Error::HierarchyCycle { limit: 2, .. })
        ));
    }

    #[test]
    fn cyclic_hierarchy_fails() {
        let (a_meta, a) = looping("cycle.A");
        let (b_meta, b) = looping("cycle.B");
        *a_meta.ancestor.lock().unwrap() = Some(b.downgrade());
        *b_meta.ancestor.lock().unwrap() = Some(a.downgrade());

        let result = find_declared_method(&a, "missing", &[], 50);
        match result {
            Err(Error::HierarchyCycle { type_name, limit }) => {
                assert_eq!(type_name, "cycle.A");
                assert_eq!(limit, 50);
            }
            other => panic!("expected HierarchyCycle, got {other:?}"),
        }

        let (self_meta, self_loop) = looping("cycle.Self");
        *self_meta.ancestor.lock().unwrap() = Some(self_loop.downgrade());
        assert!(find_annotation(&self_loop, "any", 10).is_err());
    }

    #[test]
    fn nearest_declaration_wins() {
        let registry = TypeRegistry::new();
        registry
            .define_class("shapes.Base")
            .method(MethodSpec::new("area", &["int"], "long"))
            .method(MethodSpec::new("name", &[], "java.lang.Object"))
            .build()
            .unwrap();
        let derived = registry
            .define_class("shapes.Derived")
            .extends("shapes.Base")
            .method(MethodSpec::new("area", &["int"], "long"))
            .build()
            .unwrap();
        let int = registry.load_type("int").unwrap();

        let area = find_declared_method(&derived, "area", &[int.clone()], 10)
            .unwrap()
            .unwrap();
        assert_eq!(area.owner(), &derived);

        let name = find_declared_method(&derived, "name", &[], 10)
            .unwrap()
            .unwrap();
        assert_eq!(name.owner().name(), "shapes.Base");

        assert!(find_declared_method(&derived, "area", &[], 10)
            .unwrap()
            .is_none());
        assert!(find_declared_method(&derived, "missing", &[int], 10)
            .unwrap()
            .is_none());
    }

    #[test]
    fn root_is_never_searched() {
        let registry = TypeRegistry::new();
        let leaf = chain(&registry, 1);
        let object = registry.load_type(ROOT_TYPE_NAME).unwrap();

        assert!(find_declared_method(&leaf, "hashCode", &[], 10)
            .unwrap()
            .is_none());
        assert_eq!(Ancestors::new(&object, 10).count(), 0);
    }

    #[test]
    fn covariant_stub_loses_to_real_method() {
        let registry = TypeRegistry::new();
        let stub_flags =
            MethodAccessFlags::PUBLIC | MethodAccessFlags::BRIDGE | MethodAccessFlags::SYNTHETIC;
        let ty = registry
            .define_class("covariant.Impl")
            .method(MethodSpec::new("copy", &[], "java.lang.Object").flags(stub_flags))
            .method(MethodSpec::new("copy", &[], "covariant.Impl"))
            .build()
            .unwrap();

        let copy = find_declared_method(&ty, "copy", &[], 10).unwrap().unwrap();
        assert!(!copy.is_forwarding_stub());
        assert_eq!(copy.return_type(), &ty);

        let only_stub = registry
            .define_class("covariant.OnlyStub")
            .method(MethodSpec::new("copy", &[], "java.lang.Object").flags(stub_flags))
            .build()
            .unwrap();
        let copy = find_declared_method(&only_stub, "copy", &[], 10)
            .unwrap()
            .unwrap();
        assert!(copy.is_forwarding_stub());
    }

    #[test]
    fn annotations_most_derived_first() {
        let registry = TypeRegistry::new();
        registry
            .define_class("audit.Base")
            .annotation(
                Annotation::new("audit.Table")
                    .with_element("name", AnnotationValue::String("base".to_string())),
            )
            .annotation(Annotation::new("audit.Cached"))
            .build()
            .unwrap();
        let derived = registry
            .define_class("audit.Derived")
            .extends("audit.Base")
            .annotation(
                Annotation::new("audit.Table")
                    .with_element("name", AnnotationValue::String("derived".to_string())),
            )
            .build()
            .unwrap();

        let table = find_annotation(&derived, "audit.Table", 10).unwrap().unwrap();
        assert_eq!(
            table.element("name"),
            Some(&AnnotationValue::String("derived".to_string()))
        );
        assert!(find_annotation(&derived, "audit.Cached", 10)
            .unwrap()
            .is_some());
        assert!(find_annotation(&derived, "audit.Missing", 10)
            .unwrap()
            .is_none());
    }

    #[test]
    fn shape_requires_exact_parameter_order() {
        let registry = TypeRegistry::new();
        let ty = registry
            .define_class("order.Pair")
            .method(MethodSpec::new("put", &["int", "long"], "void"))
            .build()
            .unwrap();
        let int = registry.load_type("int").unwrap();
        let long = registry.load_type("long").unwrap();

        let shape = MethodShape::new("put", vec![int.clone(), long.clone()]);
        let found = find_declared_method(&ty, "put", &shape.parameter_types, 10)
            .unwrap()
            .unwrap();
        assert_eq!(found.shape(), &shape);

        assert!(find_declared_method(&ty, "put", &[long, int], 10)
            .unwrap()
            .is_none());
    }
}
