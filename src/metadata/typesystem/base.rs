use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use crate::{
    metadata::classfile::{AccessLevel, MethodAccessFlags},
    Result,
};

/// Qualified name of the root of every class hierarchy
pub const ROOT_TYPE_NAME: &str = "java.lang.Object";

/// Read-only view of a type, as supplied by a host.
///
/// This is the only capability the lookup and resolution code needs from a type. Hosts
/// either implement it over their own type model or use
/// [`crate::metadata::typesystem::TypeRegistry`].
pub trait TypeMetadata: Send + Sync {
    /// Qualified, dot-separated name, e.g. `java.util.List` or `int[]`
    fn name(&self) -> &str;

    /// The direct superclass; `None` for the root type, primitives and `void`
    fn ancestor(&self) -> Option<TypeRef>;

    /// All methods declared directly by this type, in declaration order
    fn declared_methods(&self) -> Vec<MethodHandle>;

    /// Annotations declared directly on this type
    fn declared_annotations(&self) -> Vec<Annotation>;
}

/// A cheap, cloneable reference to a type.
///
/// Equality and hashing use the identity of the referenced type, not its name: two distinct
/// types that share a name (e.g. loaded by different hosts) never compare equal.
#[derive(Clone)]
pub struct TypeRef(Arc<dyn TypeMetadata>);

impl TypeRef {
    /// Wrap a host type
    pub fn new<T: TypeMetadata + 'static>(metadata: Arc<T>) -> Self {
        TypeRef(metadata)
    }

    /// Qualified name of the type
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The direct superclass
    #[must_use]
    pub fn ancestor(&self) -> Option<TypeRef> {
        self.0.ancestor()
    }

    /// Methods declared directly by this type
    #[must_use]
    pub fn declared_methods(&self) -> Vec<MethodHandle> {
        self.0.declared_methods()
    }

    /// Annotations declared directly on this type
    #[must_use]
    pub fn declared_annotations(&self) -> Vec<Annotation> {
        self.0.declared_annotations()
    }

    /// Whether this is `java.lang.Object`
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name() == ROOT_TYPE_NAME
    }

    /// Access the underlying metadata
    #[must_use]
    pub fn metadata(&self) -> &dyn TypeMetadata {
        self.0.as_ref()
    }

    /// Create a non-owning reference to the same type
    #[must_use]
    pub fn downgrade(&self) -> WeakTypeRef {
        WeakTypeRef(Arc::downgrade(&self.0))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name()).finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-owning [`TypeRef`], used for references between types so that type graphs with
/// cycles (a class declaring a method that takes itself) do not leak.
#[derive(Clone)]
pub struct WeakTypeRef(Weak<dyn TypeMetadata>);

impl WeakTypeRef {
    /// Wrap a weak reference to a host type
    pub fn new<T: TypeMetadata + 'static>(weak: Weak<T>) -> Self {
        WeakTypeRef(weak)
    }

    /// Upgrade to a [`TypeRef`], `None` if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeRef> {
        self.0.upgrade().map(TypeRef)
    }
}

impl fmt::Debug for WeakTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(type_ref) => write!(f, "WeakTypeRef({})", type_ref.name()),
            None => f.write_str("WeakTypeRef(<dropped>)"),
        }
    }
}

/// Method name plus ordered parameter types.
///
/// Two shapes are equal iff the names are equal and the parameter types are pairwise equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodShape {
    /// Method name
    pub name: String,
    /// Parameter types in declaration order
    pub parameter_types: Vec<TypeRef>,
}

impl MethodShape {
    /// Create a new shape
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeRef>) -> Self {
        MethodShape {
            name: name.into(),
            parameter_types,
        }
    }

    /// Compare against a name and parameter list without building a shape
    #[must_use]
    pub fn matches(&self, name: &str, parameter_types: &[TypeRef]) -> bool {
        self.name == name && self.parameter_types == parameter_types
    }
}

impl fmt::Display for MethodShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(parameter.name())?;
        }
        f.write_str(")")
    }
}

/// A method declared on a type.
///
/// Handles are immutable. Two handles are equal iff owner, shape and return type are equal;
/// the return type takes part so that a covariant-return forwarding stub never compares equal
/// to the method it forwards to.
#[derive(Debug, Clone)]
pub struct MethodHandle {
    owner: TypeRef,
    shape: MethodShape,
    return_type: TypeRef,
    access_flags: MethodAccessFlags,
    annotations: Arc<[Annotation]>,
}

impl MethodHandle {
    /// Create a new handle without annotations
    #[must_use]
    pub fn new(
        owner: TypeRef,
        shape: MethodShape,
        return_type: TypeRef,
        access_flags: MethodAccessFlags,
    ) -> Self {
        MethodHandle {
            owner,
            shape,
            return_type,
            access_flags,
            annotations: Arc::from(Vec::new()),
        }
    }

    /// Attach annotations to the handle
    #[must_use]
    pub fn with_annotations(mut self, annotations: impl Into<Arc<[Annotation]>>) -> Self {
        self.annotations = annotations.into();
        self
    }

    /// The declaring type
    #[must_use]
    pub fn owner(&self) -> &TypeRef {
        &self.owner
    }

    /// Name and parameter types
    #[must_use]
    pub fn shape(&self) -> &MethodShape {
        &self.shape
    }

    /// Method name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shape.name
    }

    /// Parameter types in declaration order
    #[must_use]
    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.shape.parameter_types
    }

    /// Return type, `void` included
    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Access and property flags
    #[must_use]
    pub fn access_flags(&self) -> MethodAccessFlags {
        self.access_flags
    }

    /// Visibility derived from the flags
    #[must_use]
    pub fn access_level(&self) -> AccessLevel {
        self.access_flags.access_level()
    }

    /// `true` iff the method is flagged both `BRIDGE` and `SYNTHETIC`
    #[must_use]
    pub fn is_forwarding_stub(&self) -> bool {
        self.access_flags.is_forwarding_stub()
    }

    /// All annotations on the method
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Look up an annotation by its qualified type name.
    ///
    /// Forwarding stubs carry no user annotations, so this should be asked of the handle a
    /// stub resolves to.
    #[must_use]
    pub fn annotation(&self, kind: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.kind() == kind)
    }
}

impl PartialEq for MethodHandle {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.shape == other.shape
            && self.return_type == other.return_type
    }
}

impl Eq for MethodHandle {}

impl Hash for MethodHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.shape.hash(state);
        self.return_type.hash(state);
    }
}

impl fmt::Display for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.name(), self.shape)
    }
}

/// A constant value carried by an annotation element
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// `String` constant
    String(String),
    /// `int` (and narrower) constant
    Int(i32),
    /// `long` constant
    Long(i64),
    /// `boolean` constant
    Bool(bool),
    /// Class literal, by qualified name
    Class(String),
    /// Enum constant
    Enum {
        /// Qualified name of the enum type
        type_name: String,
        /// Name of the constant
        constant: String,
    },
    /// Array of values
    Array(Vec<AnnotationValue>),
}

/// An annotation instance: its type plus named element values
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    kind: String,
    elements: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    /// Create an annotation of the given qualified type name, without elements
    pub fn new(kind: impl Into<String>) -> Self {
        Annotation {
            kind: kind.into(),
            elements: Vec::new(),
        }
    }

    /// Add an element value
    #[must_use]
    pub fn with_element(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.elements.push((name.into(), value));
        self
    }

    /// Qualified name of the annotation type
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// All element values in declaration order
    #[must_use]
    pub fn elements(&self) -> &[(String, AnnotationValue)] {
        &self.elements
    }

    /// Look up an element value by name
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, value)| value)
    }
}

/// Source of types and compiled class bytes.
///
/// Implemented by hosts to give the resolver access to their loaded types. Names are
/// source-level, qualified names: `int`, `java.lang.String`, `long[][]`.
pub trait TypeProvider {
    /// Locate a type by name.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeLoad`] if no type with that name is known.
    fn load_type(&self, name: &str) -> Result<TypeRef>;

    /// The compiled class file of a type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeLoad`] if no class bytes are available for the type.
    fn class_bytes(&self, type_ref: &TypeRef) -> Result<Arc<[u8]>>;
}

impl<T: TypeProvider + ?Sized> TypeProvider for Arc<T> {
    fn load_type(&self, name: &str) -> Result<TypeRef> {
        (**self).load_type(name)
    }

    fn class_bytes(&self, type_ref: &TypeRef) -> Result<Arc<[u8]>> {
        (**self).class_bytes(type_ref)
    }
}

impl<T: TypeProvider + ?Sized> TypeProvider for &T {
    fn load_type(&self, name: &str) -> Result<TypeRef> {
        (**self).load_type(name)
    }

    fn class_bytes(&self, type_ref: &TypeRef) -> Result<Arc<[u8]>> {
        (**self).class_bytes(type_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(&'static str);

    impl TypeMetadata for Plain {
        fn name(&self) -> &str {
            self.0
        }

        fn ancestor(&self) -> Option<TypeRef> {
            None
        }

        fn declared_methods(&self) -> Vec<MethodHandle> {
            Vec::new()
        }

        fn declared_annotations(&self) -> Vec<Annotation> {
            Vec::new()
        }
    }

    #[test]
    fn type_ref_identity() {
        let first = TypeRef::new(Arc::new(Plain("a.Same")));
        let second = TypeRef::new(Arc::new(Plain("a.Same")));

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_eq!(first.to_string(), "a.Same");

        let weak = first.downgrade();
        assert_eq!(weak.upgrade(), Some(first.clone()));
        drop(first);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn handle_equality_includes_return_type() {
        let owner = TypeRef::new(Arc::new(Plain("a.Box")));
        let object = TypeRef::new(Arc::new(Plain(ROOT_TYPE_NAME)));
        let integer = TypeRef::new(Arc::new(Plain("java.lang.Integer")));
        let shape = MethodShape::new("get", Vec::new());

        let target = MethodHandle::new(
            owner.clone(),
            shape.clone(),
            integer,
            MethodAccessFlags::PUBLIC,
        );
        let stub = MethodHandle::new(
            owner.clone(),
            shape.clone(),
            object.clone(),
            MethodAccessFlags::PUBLIC | MethodAccessFlags::BRIDGE | MethodAccessFlags::SYNTHETIC,
        );
        let flags_differ =
            MethodHandle::new(owner, shape, object, MethodAccessFlags::PRIVATE);

        assert_ne!(target, stub);
        assert_eq!(stub, flags_differ);
        assert!(stub.is_forwarding_stub());
        assert!(!target.is_forwarding_stub());
        assert_eq!(target.to_string(), "a.Box.get()");
    }

    #[test]
    fn annotations() {
        let annotation = Annotation::new("com.example.Audit")
            .with_element("value", AnnotationValue::String("write".to_string()))
            .with_element("level", AnnotationValue::Int(3));

        assert_eq!(annotation.kind(), "com.example.Audit");
        assert_eq!(annotation.element("level"), Some(&AnnotationValue::Int(3)));
        assert!(annotation.element("missing").is_none());

        let owner = TypeRef::new(Arc::new(Plain("a.Box")));
        let handle = MethodHandle::new(
            owner.clone(),
            MethodShape::new("set", vec![owner.clone()]),
            owner,
            MethodAccessFlags::PUBLIC,
        )
        .with_annotations(vec![annotation.clone()]);

        assert_eq!(handle.annotation("com.example.Audit"), Some(&annotation));
        assert!(handle.annotation("com.example.Other").is_none());
        assert_eq!(handle.shape().to_string(), "set(a.Box)");
    }
}
