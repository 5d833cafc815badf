use super::parser::Parser;
use crate::error::malformed_error;
use crate::Result;

/// One constant-pool entry. Only the entries the describer needs keep their payload;
/// the rest are parsed for their size and kept as [`Constant::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    Other { tag: u8 },
    /// Second slot of a `Long` or `Double`, and index 0.
    Unusable,
}

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let count = parser.read_u2()?;
        if count == 0 {
            return Err(malformed_error!("constant_pool_count must be at least 1"));
        }

        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(Constant::Unusable);

        while entries.len() < usize::from(count) {
            let tag = parser.read_u1()?;
            let constant = match tag {
                TAG_UTF8 => {
                    let len = parser.read_u2()?;
                    Constant::Utf8(decode_modified_utf8(parser.read_bytes(usize::from(len))?))
                }
                TAG_INTEGER => Constant::Integer(parser.read_u4()? as i32),
                TAG_FLOAT => Constant::Float(f32::from_bits(parser.read_u4()?)),
                TAG_LONG => Constant::Long(parser.read_u8()? as i64),
                TAG_DOUBLE => Constant::Double(f64::from_bits(parser.read_u8()?)),
                TAG_CLASS => Constant::Class {
                    name_index: parser.read_u2()?,
                },
                TAG_STRING => Constant::String {
                    string_index: parser.read_u2()?,
                },
                TAG_FIELDREF
                | TAG_METHODREF
                | TAG_INTERFACE_METHODREF
                | TAG_NAME_AND_TYPE
                | TAG_DYNAMIC
                | TAG_INVOKE_DYNAMIC => {
                    parser.skip(4)?;
                    Constant::Other { tag }
                }
                TAG_METHOD_HANDLE => {
                    parser.skip(3)?;
                    Constant::Other { tag }
                }
                TAG_METHOD_TYPE | TAG_MODULE | TAG_PACKAGE => {
                    parser.skip(2)?;
                    Constant::Other { tag }
                }
                _ => {
                    return Err(malformed_error!(
                        "unknown constant pool tag {} at index {}",
                        tag,
                        entries.len()
                    ));
                }
            };

            let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            if wide {
                entries.push(Constant::Unusable);
            }
        }

        if entries.len() != usize::from(count) {
            return Err(malformed_error!(
                "eight-byte constant overruns constant_pool_count {}",
                count
            ));
        }

        Ok(ConstantPool { entries })
    }

    pub fn get(&self, index: u16) -> Result<&Constant> {
        match self.entries.get(usize::from(index)) {
            Some(Constant::Unusable) | None => Err(malformed_error!(
                "invalid constant pool index {}",
                index
            )),
            Some(constant) => Ok(constant),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            other => Err(malformed_error!(
                "expected Utf8 at index {}, found {:?}",
                index,
                other
            )),
        }
    }

    /// Resolves a `CONSTANT_Class` entry to its internal name (`java/lang/String`).
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            other => Err(malformed_error!(
                "expected Class at index {}, found {:?}",
                index,
                other
            )),
        }
    }
}

/// Decodes the JVM's modified UTF-8.
///
/// NUL is stored as `C0 80` and supplementary characters as two three-byte
/// surrogates, so the bytes are decoded to UTF-16 units first. Invalid sequences
/// become U+FFFD.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| *b != 0 && *b < 0x80) {
        return bytes.iter().map(|b| char::from(*b)).collect();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        if b0 & 0x80 == 0 {
            units.push(u16::from(b0));
            i += 1;
        } else if b0 & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            let b1 = bytes[i + 1];
            units.push((u16::from(b0 & 0x1F) << 6) | u16::from(b1 & 0x3F));
            i += 2;
        } else if b0 & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            let b1 = bytes[i + 1];
            let b2 = bytes[i + 2];
            units.push(
                (u16::from(b0 & 0x0F) << 12) | (u16::from(b1 & 0x3F) << 6) | u16::from(b2 & 0x3F),
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }

    String::from_utf16_lossy(&units)
}
