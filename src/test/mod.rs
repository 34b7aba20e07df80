
pub use builders::*;

use crate::metadata::typesystem::TypeRegistry;

/// Internal name of the generic base class in the IntBox fixture
pub const BOX: &str = "com/example/Box";
/// Internal name of the subclass binding `T` to `Integer`
pub const INT_BOX: &str = "com/example/IntBox";

/// Class file of `class Box<T> { void set(T value); T get(); }` after erasure
pub fn box_class() -> Vec<u8> {
    ClassFileBuilder::new(BOX)
        .method(0x0001, "<init>", "()V", Some(vec![0x2A, 0xB1]))
        .method(0x0001, "set", "(Ljava/lang/Object;)V", Some(vec![0xB1]))
        .method(0x0001, "get", "()Ljava/lang/Object;", Some(vec![0x01, 0xB0]))
        .build()
}

/// Class file of `class IntBox extends Box<Integer>` overriding both methods, including the
/// two forwarding stubs javac adds for it
pub fn int_box_class() -> Vec<u8> {
    ClassFileBuilder::new(INT_BOX)
        .super_class(BOX)
        .method(0x0001, "set", "(Ljava/lang/Integer;)V", Some(vec![0xB1]))
        .method(0x0001, "get", "()Ljava/lang/Integer;", Some(vec![0x01, 0xB0]))
        .forwarding_stub(
            "set",
            "(Ljava/lang/Object;)V",
            INT_BOX,
            "set",
            "(Ljava/lang/Integer;)V",
        )
        .forwarding_stub(
            "get",
            "()Ljava/lang/Object;",
            INT_BOX,
            "get",
            "()Ljava/lang/Integer;",
        )
        .build()
}

/// Registry holding `java.lang.Integer`, `Box` and `IntBox`, with class bytes attached
pub fn int_box_registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry.define_class("java.lang.Number").build().unwrap();
    registry
        .define_class("java.lang.Integer")
        .extends("java.lang.Number")
        .build()
        .unwrap();
    registry.define_class_file(box_class()).unwrap();
    registry.define_class_file(int_box_class()).unwrap();
    registry
}
