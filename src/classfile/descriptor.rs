//! Field and method descriptors (JVMS §4.3).
//!
//! Descriptors are rendered the way the JVM reports `Class#getName`: primitive keywords,
//! dotted binary names for classes, and descriptor syntax with dots for arrays.

use std::fmt;

use crate::error::malformed_error;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn parse(descriptor: &str) -> Result<Self> {
        let (field_type, rest) = parse_field_type(descriptor)?;
        if !rest.is_empty() {
            return Err(malformed_error!(
                "trailing characters in field descriptor {:?}",
                descriptor
            ));
        }
        Ok(field_type)
    }

    /// Name as reported by the runtime: `int`, `java.lang.String`, `[Ljava.lang.String;`.
    pub fn runtime_name(&self) -> String {
        match self {
            FieldType::Byte => "byte".to_string(),
            FieldType::Char => "char".to_string(),
            FieldType::Double => "double".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Int => "int".to_string(),
            FieldType::Long => "long".to_string(),
            FieldType::Short => "short".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Object(name) => binary_name(name),
            FieldType::Array(_) => self.descriptor().replace('/', "."),
        }
    }

    /// Name as written in source: `java.lang.String[]`.
    pub fn source_name(&self) -> String {
        match self {
            FieldType::Array(component) => format!("{}[]", component.source_name()),
            other => other.runtime_name(),
        }
    }

    pub fn descriptor(&self) -> String {
        match self {
            FieldType::Byte => "B".to_string(),
            FieldType::Char => "C".to_string(),
            FieldType::Double => "D".to_string(),
            FieldType::Float => "F".to_string(),
            FieldType::Int => "I".to_string(),
            FieldType::Long => "J".to_string(),
            FieldType::Short => "S".to_string(),
            FieldType::Boolean => "Z".to_string(),
            FieldType::Object(name) => format!("L{};", name),
            FieldType::Array(component) => format!("[{}", component.descriptor()),
        }
    }
}

/// Most array dimensions a JVM type may have.
const MAX_ARRAY_DIMENSIONS: usize = 255;

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let component = input.trim_start_matches('[');
    let dimensions = input.len() - component.len();
    if dimensions > MAX_ARRAY_DIMENSIONS {
        return Err(malformed_error!(
            "array type with {} dimensions exceeds the limit of {}",
            dimensions,
            MAX_ARRAY_DIMENSIONS
        ));
    }

    let (mut field_type, rest) = parse_non_array_type(component, input)?;
    for _ in 0..dimensions {
        field_type = FieldType::Array(Box::new(field_type));
    }
    Ok((field_type, rest))
}

fn parse_non_array_type<'a>(input: &'a str, descriptor: &str) -> Result<(FieldType, &'a str)> {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return Err(malformed_error!("empty field descriptor"));
    };
    let rest = chars.as_str();

    let field_type = match first {
        'B' => FieldType::Byte,
        'C' => FieldType::Char,
        'D' => FieldType::Double,
        'F' => FieldType::Float,
        'I' => FieldType::Int,
        'J' => FieldType::Long,
        'S' => FieldType::Short,
        'Z' => FieldType::Boolean,
        'L' => {
            let Some(end) = rest.find(';') else {
                return Err(malformed_error!("unterminated class type in {:?}", descriptor));
            };
            let name = &rest[..end];
            if name.is_empty() {
                return Err(malformed_error!("empty class name in {:?}", descriptor));
            }
            return Ok((FieldType::Object(name.to_string()), &rest[end + 1..]));
        }
        other => {
            return Err(malformed_error!(
                "unexpected {:?} in descriptor {:?}",
                other,
                descriptor
            ));
        }
    };

    Ok((field_type, rest))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Value(FieldType),
}

impl ReturnType {
    pub fn runtime_name(&self) -> String {
        match self {
            ReturnType::Void => "void".to_string(),
            ReturnType::Value(field_type) => field_type.runtime_name(),
        }
    }
}

/// A parsed method descriptor such as `(ILjava/lang/String;)V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    pub fn parse(descriptor: &str) -> Result<Self> {
        let Some(mut rest) = descriptor.strip_prefix('(') else {
            return Err(malformed_error!(
                "method descriptor {:?} does not start with '('",
                descriptor
            ));
        };

        let mut parameters = Vec::new();
        loop {
            if let Some(after) = rest.strip_prefix(')') {
                rest = after;
                break;
            }
            let (parameter, after) = parse_field_type(rest)?;
            parameters.push(parameter);
            rest = after;
        }

        let return_type = if rest == "V" {
            ReturnType::Void
        } else {
            ReturnType::Value(FieldType::parse(rest)?)
        };

        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }

    /// The parameter part of the descriptor, e.g. `(ILjava/lang/String;)`.
    pub fn parameter_descriptor(&self) -> String {
        let params: String = self.parameters.iter().map(FieldType::descriptor).collect();
        format!("({})", params)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parameter_descriptor())?;
        match &self.return_type {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Value(field_type) => f.write_str(&field_type.descriptor()),
        }
    }
}

/// `java/util/Map$Entry` to `java.util.Map$Entry`.
pub fn binary_name(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

/// `java.util.Map$Entry` to `java/util/Map$Entry`.
pub fn internal_name(binary_name: &str) -> String {
    binary_name.replace('.', "/")
}
