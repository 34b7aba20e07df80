use std::sync::Arc;

use crate::{
    metadata::{
        classfile::MethodAccessFlags,
        descriptor::{parse_method_descriptor, FieldType},
        typesystem::{
            registry::{JavaType, MethodDef, TypeFlavor},
            Annotation, TypeProvider, TypeRef, TypeRegistry, WeakTypeRef,
        },
    },
    Error::TypeLoad,
    Result,
};

/// Declaration of a method, by type names, for [`JavaTypeBuilder::method`].
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    parameter_types: Vec<String>,
    return_type: String,
    access_flags: MethodAccessFlags,
    annotations: Vec<Annotation>,
}

impl MethodSpec {
    /// A public method with the given parameter and return type names
    pub fn new(
        name: impl Into<String>,
        parameter_types: &[&str],
        return_type: impl Into<String>,
    ) -> Self {
        MethodSpec {
            name: name.into(),
            parameter_types: parameter_types.iter().map(ToString::to_string).collect(),
            return_type: return_type.into(),
            access_flags: MethodAccessFlags::PUBLIC,
            annotations: Vec::new(),
        }
    }

    /// A public method whose types are taken from a JVM method descriptor
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedDescriptor`] if the descriptor is malformed.
    pub fn from_descriptor(name: impl Into<String>, descriptor: &str) -> Result<Self> {
        let parsed = parse_method_descriptor(descriptor)?;
        Ok(MethodSpec {
            name: name.into(),
            parameter_types: parsed.parameter_type_names(),
            return_type: parsed.return_type_name(),
            access_flags: MethodAccessFlags::PUBLIC,
            annotations: Vec::new(),
        })
    }

    /// Replace the access flags
    #[must_use]
    pub fn flags(mut self, access_flags: MethodAccessFlags) -> Self {
        self.access_flags = access_flags;
        self
    }

    /// Add an annotation
    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A type name resolved before the type it appears in exists
enum Resolved {
    Declaring,
    Known(TypeRef),
}

impl Resolved {
    fn downgrade(&self, declaring: &WeakTypeRef) -> WeakTypeRef {
        match self {
            Resolved::Declaring => declaring.clone(),
            Resolved::Known(type_ref) => type_ref.downgrade(),
        }
    }
}

/// Builder for types registered in a [`TypeRegistry`].
///
/// Every type a method mentions must already be registered, with the exception of the type
/// being built. Defining a name that already exists replaces the earlier definition for
/// subsequent lookups.
///
/// # Example
///
/// ```rust
/// use bridgescope::metadata::typesystem::{Annotation, MethodSpec, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let node = registry
///     .define_class("com.example.Node")
///     .annotation(Annotation::new("com.example.Entity"))
///     .method(MethodSpec::new("next", &[], "com.example.Node"))
///     .build()?;
///
/// assert_eq!(node.declared_methods()[0].return_type(), &node);
/// # Ok::<(), bridgescope::Error>(())
/// ```
pub struct JavaTypeBuilder<'r> {
    registry: &'r TypeRegistry,
    name: String,
    flavor: TypeFlavor,
    ancestor: Option<String>,
    methods: Vec<MethodSpec>,
    annotations: Vec<Annotation>,
    class_bytes: Option<Arc<[u8]>>,
}

impl<'r> JavaTypeBuilder<'r> {
    pub(crate) fn new(registry: &'r TypeRegistry, name: String, flavor: TypeFlavor) -> Self {
        JavaTypeBuilder {
            registry,
            name,
            flavor,
            ancestor: None,
            methods: Vec::new(),
            annotations: Vec::new(),
            class_bytes: None,
        }
    }

    /// Set the superclass, `java.lang.Object` if never called
    #[must_use]
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        self.ancestor = Some(name.into());
        self
    }

    /// Declare a method
    #[must_use]
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Annotate the type
    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Attach the compiled class file
    #[must_use]
    pub fn class_bytes(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.class_bytes = Some(bytes.into());
        self
    }

    fn resolve(&self, name: &str) -> Result<Resolved> {
        if name == self.name {
            return Ok(Resolved::Declaring);
        }
        self.registry.load_type(name).map(Resolved::Known)
    }

    /// Register the type and return a reference to it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeLoad`] if the name is not a valid class name, or if the
    /// superclass or a type named by a method is unknown.
    pub fn build(self) -> Result<TypeRef> {
        if !matches!(
            FieldType::from_type_name(&self.name),
            Some(FieldType::Object(_))
        ) {
            return Err(TypeLoad(format!("invalid class name '{}'", self.name)));
        }

        let ancestor = match &self.ancestor {
            Some(name) => self.registry.load_type(name)?,
            None => self.registry.root(),
        };

        let mut resolved = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            let parameter_types = method
                .parameter_types
                .iter()
                .map(|name| self.resolve(name))
                .collect::<Result<Vec<_>>>()?;
            let return_type = self.resolve(&method.return_type)?;
            resolved.push((method, parameter_types, return_type));
        }

        let java_type = JavaType::create(
            self.name.clone(),
            self.flavor.clone(),
            Some(ancestor),
            self.annotations.clone(),
            |declaring| {
                resolved
                    .iter()
                    .map(|(method, parameter_types, return_type)| MethodDef {
                        name: method.name.clone(),
                        parameter_types: parameter_types
                            .iter()
                            .map(|t| t.downgrade(declaring))
                            .collect(),
                        return_type: return_type.downgrade(declaring),
                        access_flags: method.access_flags,
                        annotations: Arc::from(method.annotations.clone()),
                    })
                    .collect()
            },
        );

        let type_ref = self.registry.insert(java_type);
        if let Some(bytes) = self.class_bytes {
            self.registry.register_class_bytes(&self.name, bytes)?;
        }
        Ok(type_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::AnnotationValue;

    #[test]
    fn method_spec_from_descriptor() {
        let spec = MethodSpec::from_descriptor("put", "(ILjava/lang/Object;[J)Z").unwrap();
        assert_eq!(spec.parameter_types, ["int", "java.lang.Object", "long[]"]);
        assert_eq!(spec.return_type, "boolean");
        assert_eq!(spec.access_flags, MethodAccessFlags::PUBLIC);

        assert!(MethodSpec::from_descriptor("bad", "(I").is_err());
    }

    #[test]
    fn build_with_methods_and_annotations() {
        let registry = TypeRegistry::new();
        let ty = registry
            .define_class("svc.Service")
            .annotation(Annotation::new("svc.Component"))
            .method(
                MethodSpec::new("handle", &["java.lang.Object[]", "int"], "void")
                    .flags(MethodAccessFlags::PROTECTED)
                    .annotation(
                        Annotation::new("svc.Timed")
                            .with_element("millis", AnnotationValue::Long(250)),
                    ),
            )
            .build()
            .unwrap();

        assert_eq!(ty.ancestor(), Some(registry.root()));
        assert_eq!(ty.declared_annotations()[0].kind(), "svc.Component");

        let handle = &ty.declared_methods()[0];
        assert_eq!(handle.parameter_types()[0].name(), "java.lang.Object[]");
        assert_eq!(handle.return_type().name(), "void");
        assert_eq!(
            handle.access_level(),
            crate::metadata::classfile::AccessLevel::Protected
        );
        assert_eq!(
            handle.annotation("svc.Timed").unwrap().element("millis"),
            Some(&AnnotationValue::Long(250))
        );
    }

    #[test]
    fn build_rejects_unknown_and_invalid() {
        let registry = TypeRegistry::new();

        assert!(matches!(
            registry
                .define_class("a.B")
                .extends("a.Missing")
                .build(),
            Err(TypeLoad(_))
        ));
        assert!(matches!(
            registry
                .define_class("a.B")
                .method(MethodSpec::new("m", &["a.Missing"], "void"))
                .build(),
            Err(TypeLoad(_))
        ));
        assert!(!registry.contains("a.B"));

        for invalid in ["", "int", "a.B[]", "a/B", "void"] {
            assert!(registry.define_class(invalid).build().is_err(), "{invalid}");
        }
    }

    #[test]
    fn redefinition_replaces_lookup() {
        let registry = TypeRegistry::new();
        let first = registry.define_class("re.Def").build().unwrap();
        let second = registry
            .define_class("re.Def")
            .method(MethodSpec::new("m", &[], "void"))
            .build()
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.load_type("re.Def").unwrap(), second);
        assert!(first.declared_methods().is_empty());
    }

    #[test]
    fn redefinition_drops_stale_class_bytes() {
        let registry = TypeRegistry::new();
        let first = registry
            .define_class("re.Bytes")
            .class_bytes(vec![0xCA, 0xFE])
            .build()
            .unwrap();
        assert_eq!(&*registry.class_bytes(&first).unwrap(), &[0xCA, 0xFE]);

        let second = registry.define_class("re.Bytes").build().unwrap();
        assert!(matches!(registry.class_bytes(&second), Err(TypeLoad(_))));

        let third = registry
            .define_class("re.Bytes")
            .class_bytes(vec![0xBA, 0xBE])
            .build()
            .unwrap();
        assert_eq!(&*registry.class_bytes(&third).unwrap(), &[0xBA, 0xBE]);
    }

    #[test]
    fn interfaces() {
        let registry = TypeRegistry::new();
        registry.define_interface("java.lang.Comparable").build().unwrap();

        let flavor = registry
            .java_type("java.lang.Comparable")
            .unwrap()
            .flavor()
            .clone();
        assert!(matches!(flavor, TypeFlavor::Interface));
    }
}
