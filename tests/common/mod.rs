//! Minimal class file emitter shared by the integration tests.
//!
//! Produces just enough of the format for the resolver: a constant pool without deduplication,
//! the class header and methods whose `Code` is either a bare `return` or a forwarding call.

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STUB: u16 = 0x1041;

enum Body {
    Return,
    Forward { method_ref: u16 },
}

pub struct ClassBytes {
    pool: Vec<u8>,
    pool_count: u16,
    this_class: u16,
    super_class: u16,
    code_name: u16,
    methods: Vec<(u16, u16, u16, Body)>,
}

impl ClassBytes {
    pub fn new(internal_name: &str, super_name: &str) -> Self {
        let mut class = ClassBytes {
            pool: Vec::new(),
            pool_count: 1,
            this_class: 0,
            super_class: 0,
            code_name: 0,
            methods: Vec::new(),
        };
        class.this_class = class.class(internal_name);
        class.super_class = class.class(super_name);
        class.code_name = class.utf8("Code");
        class
    }

    fn entry(&mut self, bytes: &[u8]) -> u16 {
        self.pool.extend_from_slice(bytes);
        self.pool_count += 1;
        self.pool_count - 1
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut bytes = vec![1];
        bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        bytes.extend_from_slice(value.as_bytes());
        self.entry(&bytes)
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        let [hi, lo] = name.to_be_bytes();
        self.entry(&[7, hi, lo])
    }

    fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let [n_hi, n_lo] = name.to_be_bytes();
        let [d_hi, d_lo] = descriptor.to_be_bytes();
        let name_and_type = self.entry(&[12, n_hi, n_lo, d_hi, d_lo]);
        let [c_hi, c_lo] = class.to_be_bytes();
        let [t_hi, t_lo] = name_and_type.to_be_bytes();
        self.entry(&[10, c_hi, c_lo, t_hi, t_lo])
    }

    pub fn method(mut self, flags: u16, name: &str, descriptor: &str) -> Self {
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.methods.push((flags, name, descriptor, Body::Return));
        self
    }

    /// A bridge stub whose body is `aload_0; invokevirtual owner.callee; return`
    pub fn stub(
        mut self,
        name: &str,
        descriptor: &str,
        owner: &str,
        callee: &str,
        callee_descriptor: &str,
    ) -> Self {
        let method_ref = self.method_ref(owner, callee, callee_descriptor);
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        self.methods.push((ACC_STUB, name, descriptor, Body::Forward { method_ref }));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&[0, 0, 0, 52]);
        out.extend_from_slice(&self.pool_count.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        // interfaces, fields
        out.extend_from_slice(&[0, 0, 0, 0]);

        out.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for (flags, name, descriptor, body) in &self.methods {
            let code = match body {
                Body::Return => vec![0xB1],
                Body::Forward { method_ref } => {
                    let [hi, lo] = method_ref.to_be_bytes();
                    vec![0x2A, 0xB6, hi, lo, 0xB1]
                }
            };
            out.extend_from_slice(&flags.to_be_bytes());
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&descriptor.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&self.code_name.to_be_bytes());
            out.extend_from_slice(&(12 + code.len() as u32).to_be_bytes());
            out.extend_from_slice(&[0, 4, 0, 4]);
            out.extend_from_slice(&(code.len() as u32).to_be_bytes());
            out.extend_from_slice(&code);
            out.extend_from_slice(&[0, 0, 0, 0]);
        }

        // class attributes
        out.extend_from_slice(&[0, 0]);
        out
    }
}
