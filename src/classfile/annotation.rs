//! `RuntimeVisibleAnnotations` decoding (JVMS §4.7.16) and string rendering.
//!
//! Annotations are resolved against the constant pool while parsing, so a parsed
//! [`Annotation`] owns all of its data and can be rendered on its own.
//!
//! Rendering:
//! - `@a.b.Marker` when there are no elements;
//! - `@a.b.Single("x")` when the only element is `value`;
//! - `@a.b.Multi(name="x", count=3)` otherwise.
//!
//! Only elements present in the class file are shown; defaults declared on the
//! annotation interface are not looked up.

use std::fmt::{self, Write as _};

use super::constant_pool::{Constant, ConstantPool};
use super::descriptor::FieldType;
use super::parser::Parser;
use crate::error::malformed_error;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Binary name of the annotation interface.
    pub type_name: String,
    pub elements: Vec<(String, ElementValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Byte(i8),
    Char(u16),
    Double(f64),
    Float(f32),
    Int(i32),
    Long(i64),
    Short(i16),
    Boolean(bool),
    String(String),
    Enum { type_name: String, constant: String },
    /// Source-style class name (`int[]`, `java.lang.String`, `void`).
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

/// Parses the body of a `RuntimeVisibleAnnotations` attribute.
pub fn parse_annotations(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Vec<Annotation>> {
    let count = parser.read_u2()?;
    (0..count).map(|_| parse_annotation(parser, pool)).collect()
}

fn parse_annotation(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<Annotation> {
    let type_name = object_type_name(pool.utf8(parser.read_u2()?)?)?;

    let pairs = parser.read_u2()?;
    let mut elements = Vec::with_capacity(usize::from(pairs));
    for _ in 0..pairs {
        let name = pool.utf8(parser.read_u2()?)?.to_string();
        let value = parse_element_value(parser, pool)?;
        elements.push((name, value));
    }

    Ok(Annotation {
        type_name,
        elements,
    })
}

fn parse_element_value(parser: &mut Parser<'_>, pool: &ConstantPool) -> Result<ElementValue> {
    let tag = parser.read_u1()?;
    let value = match tag {
        b'B' => ElementValue::Byte(int_constant(pool, parser.read_u2()?)? as i8),
        b'C' => ElementValue::Char(int_constant(pool, parser.read_u2()?)? as u16),
        b'I' => ElementValue::Int(int_constant(pool, parser.read_u2()?)?),
        b'S' => ElementValue::Short(int_constant(pool, parser.read_u2()?)? as i16),
        b'Z' => ElementValue::Boolean(int_constant(pool, parser.read_u2()?)? != 0),
        b'D' => match pool.get(parser.read_u2()?)? {
            Constant::Double(value) => ElementValue::Double(*value),
            other => return Err(malformed_error!("expected Double, found {:?}", other)),
        },
        b'F' => match pool.get(parser.read_u2()?)? {
            Constant::Float(value) => ElementValue::Float(*value),
            other => return Err(malformed_error!("expected Float, found {:?}", other)),
        },
        b'J' => match pool.get(parser.read_u2()?)? {
            Constant::Long(value) => ElementValue::Long(*value),
            other => return Err(malformed_error!("expected Long, found {:?}", other)),
        },
        b's' => ElementValue::String(pool.utf8(parser.read_u2()?)?.to_string()),
        b'e' => {
            let type_name = object_type_name(pool.utf8(parser.read_u2()?)?)?;
            let constant = pool.utf8(parser.read_u2()?)?.to_string();
            ElementValue::Enum {
                type_name,
                constant,
            }
        }
        b'c' => {
            let descriptor = pool.utf8(parser.read_u2()?)?;
            if descriptor == "V" {
                ElementValue::Class("void".to_string())
            } else {
                ElementValue::Class(FieldType::parse(descriptor)?.source_name())
            }
        }
        b'@' => ElementValue::Annotation(parse_annotation(parser, pool)?),
        b'[' => {
            let count = parser.read_u2()?;
            let values = (0..count)
                .map(|_| parse_element_value(parser, pool))
                .collect::<Result<Vec<_>>>()?;
            ElementValue::Array(values)
        }
        other => {
            return Err(malformed_error!(
                "unknown element_value tag {:?}",
                char::from(other)
            ));
        }
    };

    Ok(value)
}

fn int_constant(pool: &ConstantPool, index: u16) -> Result<i32> {
    match pool.get(index)? {
        Constant::Integer(value) => Ok(*value),
        other => Err(malformed_error!("expected Integer, found {:?}", other)),
    }
}

fn object_type_name(descriptor: &str) -> Result<String> {
    let field_type = FieldType::parse(descriptor)?;
    match field_type {
        FieldType::Object(_) => Ok(field_type.runtime_name()),
        _ => Err(malformed_error!(
            "expected a class type descriptor, found {:?}",
            descriptor
        )),
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        match self.elements.as_slice() {
            [] => Ok(()),
            [(name, value)] if name == "value" => write!(f, "({})", value),
            elements => {
                f.write_char('(')?;
                for (i, (name, value)) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                f.write_char(')')
            }
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Byte(value) => write!(f, "(byte)0x{:02x}", *value as u8),
            ElementValue::Char(value) => {
                f.write_char('\'')?;
                let c = char::from_u32(u32::from(*value)).unwrap_or('\u{FFFD}');
                write_escaped(f, c, '\'')?;
                f.write_char('\'')
            }
            ElementValue::Double(value) => {
                if value.is_nan() {
                    f.write_str("0.0/0.0")
                } else if value.is_infinite() {
                    let sign = if *value < 0.0 { "-" } else { "" };
                    write!(f, "{}1.0/0.0", sign)
                } else {
                    write!(f, "{:?}", value)
                }
            }
            ElementValue::Float(value) => {
                if value.is_nan() {
                    f.write_str("0.0f/0.0f")
                } else if value.is_infinite() {
                    let sign = if *value < 0.0 { "-" } else { "" };
                    write!(f, "{}1.0f/0.0f", sign)
                } else {
                    write!(f, "{:?}f", value)
                }
            }
            ElementValue::Int(value) => write!(f, "{}", value),
            ElementValue::Long(value) => write!(f, "{}L", value),
            ElementValue::Short(value) => write!(f, "(short){}", value),
            ElementValue::Boolean(value) => write!(f, "{}", value),
            ElementValue::String(value) => {
                f.write_char('"')?;
                for c in value.chars() {
                    write_escaped(f, c, '"')?;
                }
                f.write_char('"')
            }
            ElementValue::Enum {
                type_name,
                constant,
            } => write!(f, "{}.{}", type_name, constant),
            ElementValue::Class(name) => write!(f, "{}.class", name),
            ElementValue::Annotation(annotation) => write!(f, "{}", annotation),
            ElementValue::Array(values) => {
                f.write_char('{')?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, c: char, quote: char) -> fmt::Result {
    match c {
        '\\' => f.write_str("\\\\"),
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\t' => f.write_str("\\t"),
        '\u{8}' => f.write_str("\\b"),
        '\u{c}' => f.write_str("\\f"),
        c if c == quote => write!(f, "\\{}", c),
        c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c)),
        c => f.write_char(c),
    }
}
