//! Concurrent in-memory type registry.
//!
//! [`TypeRegistry`] is a ready-made [`TypeProvider`] for hosts that do not bring their own
//! type model. It owns every type it hands out and indexes them by qualified name.
//!
//! # Architecture
//!
//! - Strong references live in a `DashMap<String, Arc<JavaType>>`; lookups from many threads
//!   never block each other outside of shard locks
//! - Method parameter and return types refer to other types through [`WeakTypeRef`], so
//!   self-referential types do not form reference cycles
//! - A type's superclass is held strongly; superclasses must be defined before their
//!   subclasses, which makes ancestor chains acyclic by construction
//!
//! # Pre-registered Types
//!
//! The eight primitives, `void` and `java.lang.Object` exist from construction. Array types
//! (`int[]`, `java.lang.String[][]`) are created on first request, provided their element type
//! is known.
//!
//! # Examples
//!
//! ```rust
//! use bridgescope::metadata::typesystem::{MethodSpec, TypeProvider, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! registry.define_class("java.lang.Number").build()?;
//! let integer = registry
//!     .define_class("java.lang.Integer")
//!     .extends("java.lang.Number")
//!     .method(MethodSpec::new("intValue", &[], "int"))
//!     .build()?;
//!
//! assert_eq!(integer.ancestor().unwrap().name(), "java.lang.Number");
//! assert_eq!(registry.load_type("java.lang.Integer[]")?.name(), "java.lang.Integer[]");
//! # Ok::<(), bridgescope::Error>(())
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use strum::IntoEnumIterator;
use tracing::trace;

use crate::{
    metadata::{
        classfile::{ClassFile, MethodAccessFlags},
        descriptor::{BaseType, VOID_NAME},
        typesystem::{
            Annotation, JavaTypeBuilder, MethodHandle, MethodShape, MethodSpec, TypeMetadata,
            TypeProvider, TypeRef, WeakTypeRef, ROOT_TYPE_NAME,
        },
    },
    Error::TypeLoad,
    Result,
};

/// What kind of type a [`JavaType`] is
#[derive(Debug, Clone)]
pub enum TypeFlavor {
    /// One of the eight primitives
    Primitive(BaseType),
    /// The `void` pseudo-type
    Void,
    /// A class
    Class,
    /// An interface
    Interface,
    /// An array of the given component type
    Array(WeakTypeRef),
}

/// A method as stored by a [`JavaType`]
pub(crate) struct MethodDef {
    pub(crate) name: String,
    pub(crate) parameter_types: Vec<WeakTypeRef>,
    pub(crate) return_type: WeakTypeRef,
    pub(crate) access_flags: MethodAccessFlags,
    pub(crate) annotations: Arc<[Annotation]>,
}

impl MethodDef {
    fn to_handle(&self, owner: &TypeRef) -> Option<MethodHandle> {
        let parameter_types = self
            .parameter_types
            .iter()
            .map(WeakTypeRef::upgrade)
            .collect::<Option<Vec<_>>>()?;

        Some(
            MethodHandle::new(
                owner.clone(),
                MethodShape::new(self.name.clone(), parameter_types),
                self.return_type.upgrade()?,
                self.access_flags,
            )
            .with_annotations(self.annotations.clone()),
        )
    }
}

/// A type owned by a [`TypeRegistry`].
pub struct JavaType {
    name: String,
    flavor: TypeFlavor,
    ancestor: Option<TypeRef>,
    methods: Vec<MethodDef>,
    annotations: Vec<Annotation>,
    self_ref: WeakTypeRef,
}

impl JavaType {
    /// Create a type; `methods` receives a weak reference to the type under construction so
    /// that methods can mention their own declaring type.
    pub(crate) fn create(
        name: String,
        flavor: TypeFlavor,
        ancestor: Option<TypeRef>,
        annotations: Vec<Annotation>,
        methods: impl FnOnce(&WeakTypeRef) -> Vec<MethodDef>,
    ) -> Arc<JavaType> {
        Arc::new_cyclic(|weak| {
            let self_ref = WeakTypeRef::new(weak.clone());
            JavaType {
                methods: methods(&self_ref),
                name,
                flavor,
                ancestor,
                annotations,
                self_ref,
            }
        })
    }

    fn leaf(name: &str, flavor: TypeFlavor) -> Arc<JavaType> {
        Self::create(name.to_string(), flavor, None, Vec::new(), |_| Vec::new())
    }

    /// What kind of type this is
    #[must_use]
    pub fn flavor(&self) -> &TypeFlavor {
        &self.flavor
    }

    /// `true` for the eight primitives and `void`
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Primitive(_) | TypeFlavor::Void)
    }
}

impl TypeMetadata for JavaType {
    fn name(&self) -> &str {
        &self.name
    }

    fn ancestor(&self) -> Option<TypeRef> {
        self.ancestor.clone()
    }

    fn declared_methods(&self) -> Vec<MethodHandle> {
        let Some(owner) = self.self_ref.upgrade() else {
            return Vec::new();
        };

        self.methods
            .iter()
            .filter_map(|method| method.to_handle(&owner))
            .collect()
    }

    fn declared_annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }
}

/// Concurrent registry of [`JavaType`]s, indexed by qualified name.
///
/// Types returned from the registry stay valid as long as they are referenced, but the
/// methods they declare can only be listed while the types those methods mention are still
/// owned by the registry.
pub struct TypeRegistry {
    types: DashMap<String, Arc<JavaType>>,
    class_bytes: DashMap<String, Arc<[u8]>>,
    root: Arc<JavaType>,
}

impl TypeRegistry {
    /// Create a registry holding the primitives, `void` and `java.lang.Object`
    #[must_use]
    pub fn new() -> Self {
        let root = JavaType::leaf(ROOT_TYPE_NAME, TypeFlavor::Class);
        let registry = TypeRegistry {
            types: DashMap::new(),
            class_bytes: DashMap::new(),
            root: root.clone(),
        };

        for base in BaseType::iter() {
            registry.insert(JavaType::leaf(base.name(), TypeFlavor::Primitive(base)));
        }
        registry.insert(JavaType::leaf(VOID_NAME, TypeFlavor::Void));
        registry.insert(root);

        registry
    }

    /// Start defining a class. It extends `java.lang.Object` unless
    /// [`JavaTypeBuilder::extends`] says otherwise.
    pub fn define_class(&self, name: impl Into<String>) -> JavaTypeBuilder<'_> {
        JavaTypeBuilder::new(self, name.into(), TypeFlavor::Class)
    }

    /// Start defining an interface
    pub fn define_interface(&self, name: impl Into<String>) -> JavaTypeBuilder<'_> {
        JavaTypeBuilder::new(self, name.into(), TypeFlavor::Interface)
    }

    /// Define a type from a compiled class file and attach the bytes to it.
    ///
    /// The superclass and every type mentioned in a method descriptor must already be
    /// known to the registry. Constructors and static initializers are not recorded as
    /// methods.
    ///
    /// # Errors
    /// Returns class file parsing errors, [`crate::Error::MalformedDescriptor`] for bad method
    /// descriptors and [`crate::Error::TypeLoad`] for unknown referenced types.
    pub fn define_class_file(&self, bytes: impl Into<Arc<[u8]>>) -> Result<TypeRef> {
        let bytes: Arc<[u8]> = bytes.into();
        let class = ClassFile::parse(&bytes)?;

        let name = class.class_name()?.replace('/', ".");
        let mut builder = if class.is_interface() {
            self.define_interface(name)
        } else {
            self.define_class(name)
        };

        if let Some(super_class) = class.super_class_name()? {
            builder = builder.extends(super_class.replace('/', "."));
        }

        for method in class.methods()? {
            let method = method?;
            if method.name.starts_with('<') {
                continue;
            }
            builder = builder.method(
                MethodSpec::from_descriptor(method.name, method.descriptor)?
                    .flags(method.access_flags),
            );
        }

        builder.class_bytes(bytes.clone()).build()
    }

    /// Attach compiled class bytes to an already defined type, replacing earlier bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeLoad`] if no type with that name is defined.
    pub fn register_class_bytes(&self, type_name: &str, bytes: impl Into<Arc<[u8]>>) -> Result<()> {
        if !self.types.contains_key(type_name) {
            return Err(TypeLoad(type_name.to_string()));
        }

        self.class_bytes.insert(type_name.to_string(), bytes.into());
        Ok(())
    }

    pub(crate) fn insert(&self, java_type: Arc<JavaType>) -> TypeRef {
        trace!(type_name = %java_type.name, "registering type");
        let type_ref = TypeRef::new(java_type.clone());
        // Bytes belong to the definition they were registered with
        self.class_bytes.remove(&java_type.name);
        self.types.insert(java_type.name.clone(), java_type);
        type_ref
    }

    /// Look up a type without creating array types
    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeRef> {
        self.types
            .get(name)
            .map(|entry| TypeRef::new(entry.value().clone()))
    }

    /// Look up the concrete registry type, e.g. to inspect its [`TypeFlavor`]
    #[must_use]
    pub fn java_type(&self, name: &str) -> Option<Arc<JavaType>> {
        self.types.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a type with that name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// `java.lang.Object`
    #[must_use]
    pub fn root(&self) -> TypeRef {
        TypeRef::new(self.root.clone())
    }

    /// Number of registered types, pre-registered ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeProvider for TypeRegistry {
    fn load_type(&self, name: &str) -> Result<TypeRef> {
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }

        if let Some(component_name) = name.strip_suffix("[]") {
            if component_name == VOID_NAME {
                return Err(TypeLoad(name.to_string()));
            }
            let component = self.load_type(component_name)?;

            let array = self
                .types
                .entry(name.to_string())
                .or_insert_with(|| {
                    JavaType::create(
                        name.to_string(),
                        TypeFlavor::Array(component.downgrade()),
                        Some(TypeRef::new(self.root.clone())),
                        Vec::new(),
                        |_| Vec::new(),
                    )
                })
                .value()
                .clone();
            return Ok(TypeRef::new(array));
        }

        Err(TypeLoad(name.to_string()))
    }

    fn class_bytes(&self, type_ref: &TypeRef) -> Result<Arc<[u8]>> {
        self.class_bytes
            .get(type_ref.name())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TypeLoad(format!("no class bytes for {}", type_ref.name())))
    }
}
