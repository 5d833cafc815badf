//! Test-only class-file writer.
//!
//! Produces real class-file bytes so tests can exercise the parser, the class path
//! and the collector without a JDK on the machine.

use std::collections::HashMap;

use crate::Result;
use crate::classfile::{ClassFile, internal_name};
use crate::classpath::ClassSource;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;

#[derive(Debug, Clone)]
pub enum ValueSpec {
    Str(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Char(char),
    Double(f64),
    /// Type descriptor and constant name.
    Enum(String, String),
    /// Return descriptor of the class literal.
    Class(String),
    Annotation(String, Vec<(&'static str, ValueSpec)>),
    Array(Vec<ValueSpec>),
}

pub type AnnotationSpec = (&'static str, Vec<(&'static str, ValueSpec)>);

struct MethodSpec {
    access: u16,
    name: String,
    descriptor: String,
    annotations: Vec<AnnotationSpec>,
}

pub struct ClassBuilder {
    access: u16,
    name: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<(String, String)>,
    methods: Vec<MethodSpec>,
}

impl ClassBuilder {
    pub fn new(binary_name: &str) -> Self {
        ClassBuilder {
            access: 0x0021,
            name: binary_name.to_string(),
            super_class: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn super_class(mut self, binary_name: &str) -> Self {
        self.super_class = Some(binary_name.to_string());
        self
    }

    pub fn no_super_class(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn interface(mut self, binary_name: &str) -> Self {
        self.interfaces.push(binary_name.to_string());
        self
    }

    /// Marks the class as a public interface.
    pub fn as_interface(mut self) -> Self {
        self.access = 0x0601;
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_string(), descriptor.to_string()));
        self
    }

    pub fn method(self, access: u16, name: &str, descriptor: &str) -> Self {
        self.annotated_method(access, name, descriptor, Vec::new())
    }

    pub fn annotated_method(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        annotations: Vec<AnnotationSpec>,
    ) -> Self {
        self.methods.push(MethodSpec {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            annotations,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();

        // Everything after the constant pool is written first so the pool is complete.
        let mut body = Vec::new();
        put_u2(&mut body, self.access);
        put_u2(&mut body, pool.class(&self.name));
        let super_index = self.super_class.as_deref().map_or(0, |name| pool.class(name));
        put_u2(&mut body, super_index);

        put_u2(&mut body, self.interfaces.len() as u16);
        for interface in &self.interfaces {
            put_u2(&mut body, pool.class(interface));
        }

        put_u2(&mut body, self.fields.len() as u16);
        for (name, descriptor) in &self.fields {
            put_u2(&mut body, ACC_PRIVATE);
            put_u2(&mut body, pool.utf8(name));
            put_u2(&mut body, pool.utf8(descriptor));
            put_u2(&mut body, 0);
        }

        put_u2(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            put_u2(&mut body, method.access);
            put_u2(&mut body, pool.utf8(&method.name));
            put_u2(&mut body, pool.utf8(&method.descriptor));

            let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
            if method.access & ACC_ABSTRACT == 0 {
                // return; with max_stack, max_locals and empty tables
                let code = vec![0, 1, 0, 1, 0, 0, 0, 1, 0xB1, 0, 0, 0, 0];
                attributes.push((pool.utf8("Code"), code));
            }
            if !method.annotations.is_empty() {
                let mut payload = Vec::new();
                put_u2(&mut payload, method.annotations.len() as u16);
                for (type_descriptor, elements) in &method.annotations {
                    write_annotation(&mut payload, &mut pool, type_descriptor, elements);
                }
                attributes.push((pool.utf8("RuntimeVisibleAnnotations"), payload));
            }

            put_u2(&mut body, attributes.len() as u16);
            for (name_index, payload) in attributes {
                put_u2(&mut body, name_index);
                put_u4(&mut body, payload.len() as u32);
                body.extend_from_slice(&payload);
            }
        }

        // SourceFile
        let source_name = pool.utf8("SourceFile");
        let source_value = pool.utf8("Generated.java");
        put_u2(&mut body, 1);
        put_u2(&mut body, source_name);
        put_u4(&mut body, 2);
        put_u2(&mut body, source_value);

        let mut out = Vec::new();
        put_u4(&mut out, 0xCAFE_BABE);
        put_u2(&mut out, 0);
        put_u2(&mut out, 61);
        put_u2(&mut out, pool.next_index);
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }

    pub fn parse(&self) -> ClassFile {
        ClassFile::parse(&self.build()).expect("fixture produced an invalid class file")
    }

    pub fn binary_name(&self) -> &str {
        &self.name
    }
}

fn write_annotation(
    out: &mut Vec<u8>,
    pool: &mut PoolWriter,
    type_descriptor: &str,
    elements: &[(&'static str, ValueSpec)],
) {
    put_u2(out, pool.utf8(type_descriptor));
    put_u2(out, elements.len() as u16);
    for (name, value) in elements {
        put_u2(out, pool.utf8(name));
        write_value(out, pool, value);
    }
}

fn write_value(out: &mut Vec<u8>, pool: &mut PoolWriter, value: &ValueSpec) {
    match value {
        ValueSpec::Str(s) => {
            out.push(b's');
            put_u2(out, pool.utf8(s));
        }
        ValueSpec::Int(i) => {
            out.push(b'I');
            put_u2(out, pool.integer(*i));
        }
        ValueSpec::Long(l) => {
            out.push(b'J');
            put_u2(out, pool.long(*l));
        }
        ValueSpec::Bool(b) => {
            out.push(b'Z');
            put_u2(out, pool.integer(i32::from(*b)));
        }
        ValueSpec::Char(c) => {
            out.push(b'C');
            put_u2(out, pool.integer(*c as i32));
        }
        ValueSpec::Double(d) => {
            out.push(b'D');
            put_u2(out, pool.double(*d));
        }
        ValueSpec::Enum(type_descriptor, constant) => {
            out.push(b'e');
            put_u2(out, pool.utf8(type_descriptor));
            put_u2(out, pool.utf8(constant));
        }
        ValueSpec::Class(descriptor) => {
            out.push(b'c');
            put_u2(out, pool.utf8(descriptor));
        }
        ValueSpec::Annotation(type_descriptor, elements) => {
            out.push(b'@');
            write_annotation(out, pool, type_descriptor, elements);
        }
        ValueSpec::Array(values) => {
            out.push(b'[');
            put_u2(out, values.len() as u16);
            for value in values {
                write_value(out, pool, value);
            }
        }
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for PoolWriter {
    fn default() -> Self {
        PoolWriter {
            bytes: Vec::new(),
            next_index: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }
}

impl PoolWriter {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        self.bytes.push(1);
        put_u2(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        let index = self.take(1);
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        let internal = internal_name(binary_name);
        if let Some(index) = self.classes.get(&internal) {
            return *index;
        }
        let name_index = self.utf8(&internal);
        self.bytes.push(7);
        put_u2(&mut self.bytes, name_index);
        let index = self.take(1);
        self.classes.insert(internal, index);
        index
    }

    fn integer(&mut self, value: i32) -> u16 {
        self.bytes.push(3);
        put_u4(&mut self.bytes, value as u32);
        self.take(1)
    }

    fn long(&mut self, value: i64) -> u16 {
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.take(2)
    }

    fn double(&mut self, value: f64) -> u16 {
        self.bytes.push(6);
        self.bytes.extend_from_slice(&value.to_bits().to_be_bytes());
        self.take(2)
    }

    fn take(&mut self, slots: u16) -> u16 {
        let index = self.next_index;
        self.next_index += slots;
        index
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// In-memory class source keyed by binary name.
#[derive(Default)]
pub struct MemorySource {
    classes: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn with(mut self, builder: ClassBuilder) -> Self {
        self.classes
            .insert(builder.binary_name().to_string(), builder.build());
        self
    }
}

impl ClassSource for MemorySource {
    fn find_class(&self, binary_name: &str) -> Result<Option<ClassFile>> {
        self.classes
            .get(binary_name)
            .map(|bytes| ClassFile::parse(bytes))
            .transpose()
    }
}
