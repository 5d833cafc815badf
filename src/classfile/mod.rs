//! Reader for the JVM class-file format.
//!
//! Only the parts needed to describe a class's methods are kept: the class's own
//! name, its superclass and interfaces, and for every method its flags, name,
//! descriptor and runtime-visible annotations. Fields and all other attributes are
//! skipped over.
//!
//! ```no_run
//! use jdesc::classfile::ClassFile;
//!
//! let bytes = std::fs::read("out/com/example/Greeter.class")?;
//! let class = ClassFile::parse(&bytes)?;
//! for method in &class.methods {
//!     println!("{}{}", method.name, method.descriptor);
//! }
//! # Ok::<(), jdesc::Error>(())
//! ```

mod access;
mod annotation;
mod constant_pool;
mod descriptor;
mod parser;

pub use access::{ClassAccess, MethodAccess};
pub use annotation::{Annotation, ElementValue};
pub use constant_pool::{Constant, ConstantPool, decode_modified_utf8};
pub use descriptor::{FieldType, MethodDescriptor, ReturnType, binary_name, internal_name};
pub use parser::Parser;

use crate::error::malformed_error;
use crate::{Error, Result};

pub const MAGIC: u32 = 0xCAFE_BABE;

const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: ClassAccess,
    /// Binary name, e.g. `com.example.Greeter`.
    pub this_class: String,
    /// Binary name of the direct superclass; `None` only for `java.lang.Object`.
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: MethodAccess,
    pub name: String,
    pub descriptor: MethodDescriptor,
    pub annotations: Vec<Annotation>,
}

impl MethodInfo {
    /// `<init>` and `<clinit>` are not methods as far as reflection is concerned.
    pub fn is_initializer(&self) -> bool {
        self.name.starts_with('<')
    }

    pub fn is_public(&self) -> bool {
        self.access_flags.contains(MethodAccess::PUBLIC)
    }
}

impl ClassFile {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(data);

        let magic = parser.read_u4()?;
        if magic != MAGIC {
            return Err(Error::NotAClassFile(magic));
        }
        let minor_version = parser.read_u2()?;
        let major_version = parser.read_u2()?;

        let pool = ConstantPool::parse(&mut parser)?;

        let access_flags = ClassAccess::from_bits_retain(parser.read_u2()?);
        let this_class = binary_name(pool.class_name(parser.read_u2()?)?);
        let super_class = match parser.read_u2()? {
            0 => None,
            index => Some(binary_name(pool.class_name(index)?)),
        };

        let interface_count = parser.read_u2()?;
        let mut interfaces = Vec::with_capacity(usize::from(interface_count));
        for _ in 0..interface_count {
            interfaces.push(binary_name(pool.class_name(parser.read_u2()?)?));
        }

        let field_count = parser.read_u2()?;
        for _ in 0..field_count {
            // access_flags, name_index, descriptor_index
            parser.skip(6)?;
            skip_attributes(&mut parser)?;
        }

        let method_count = parser.read_u2()?;
        let mut methods = Vec::with_capacity(usize::from(method_count));
        for _ in 0..method_count {
            methods.push(parse_method(&mut parser, &pool)?);
        }

        skip_attributes(&mut parser)?;

        if parser.remaining() != 0 {
            return Err(malformed_error!(
                "{} trailing bytes after class attributes",
                parser.remaining()
            ));
        }

        Ok(ClassFile {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            methods,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccess::INTERFACE)
    }

    /// Methods in declaration order, without constructors and static initializers.
    pub fn declared_methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().filter(|method| !method.is_initializer())
    }
}

fn parse_method(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<MethodInfo> {
    let access_flags = MethodAccess::from_bits_retain(parser.read_u2()?);
    let name = pool.utf8(parser.read_u2()?)?.to_string();
    let descriptor = MethodDescriptor::parse(pool.utf8(parser.read_u2()?)?)?;

    let mut annotations = Vec::new();
    let attribute_count = parser.read_u2()?;
    for _ in 0..attribute_count {
        let attribute_name = pool.utf8(parser.read_u2()?)?;
        let length = parser.read_u4()? as usize;
        let body = parser.read_bytes(length)?;

        if attribute_name == RUNTIME_VISIBLE_ANNOTATIONS {
            let mut body_parser = Parser::new(body);
            annotations.extend(annotation::parse_annotations(&mut body_parser, pool)?);
            if body_parser.remaining() != 0 {
                return Err(malformed_error!(
                    "{} length does not match its contents in method {}",
                    RUNTIME_VISIBLE_ANNOTATIONS,
                    name
                ));
            }
        }
    }

    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
        annotations,
    })
}

fn skip_attributes(parser: &mut Parser<'_>) -> Result<()> {
    let count = parser.read_u2()?;
    for _ in 0..count {
        parser.skip(2)?;
        let length = parser.read_u4()? as usize;
        parser.skip(length)?;
    }
    Ok(())
}
