//! Tagged-property decoding: the self-describing field scheme used inside
//! checkpoint records.
//!
//! Each serialized property carries a name, a type tag string, a declared
//! payload size and an array index.  A property list is read until the
//! "None" sentinel name or until the declared byte range is exhausted.
//! Consecutive same-named entries with increasing indices were written by
//! the game as a static array; they are coalesced back into one
//! [`PropertyValue::StaticArray`] here, since the stream never tags them
//! explicitly.

use serde::{Serialize, Serializer};

use crate::err::{Error, Result};
use crate::reader::SaveReader;

/// Name that terminates a property list.
pub const SENTINEL: &str = "None";

fn hex_blob<S: Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}

/// One named, typed field from a property list.  Order within a list is
/// serialization order and must be preserved for re-encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValue {
    /// Opaque object reference blob of the declared size.
    Object(#[serde(serialize_with = "hex_blob")] Vec<u8>),
    Int(i32),
    /// Enum-valued byte property.
    Byte {
        enum_type: String,
        enum_value: String,
        extra: i32,
    },
    Bool(bool),
    /// Dynamic array.  Elements cannot be decoded without type knowledge the
    /// stream does not carry, so the payload is kept opaque.
    Array {
        element_count: u32,
        /// Payload bytes per element; 0 when the array is empty.
        element_size: u32,
        #[serde(serialize_with = "hex_blob")]
        data: Vec<u8>,
    },
    Float(f32),
    Struct {
        struct_type: String,
        data: StructData,
    },
    Str(String),
    /// Synthesized by coalescing; never read from a type tag.
    StaticArray(Vec<Property>),
    /// A tag this decoder does not recognise.  The declared payload is
    /// consumed and retained so no data is lost and the cursor stays in sync.
    Unknown {
        type_name: String,
        #[serde(serialize_with = "hex_blob")]
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructData {
    /// Verbatim bytes of the two recognised geometry structs
    /// (Vector2D = 8 bytes, Vector = 12 bytes).
    Native(#[serde(serialize_with = "hex_blob")] Vec<u8>),
    /// Any other struct type: a nested property list.
    Properties(Vec<Property>),
}

/// Decode an ordered property list from the next `data_len` bytes.
///
/// The loop runs while the cursor is strictly inside the declared range and
/// exits early on the "None" sentinel.  Struct properties recurse with their
/// declared size as the new sub-range.
pub fn read_properties(r: &mut SaveReader, data_len: usize) -> Result<Vec<Property>> {
    let end = r.offset() + data_len;
    let mut props: Vec<Property> = Vec::new();

    while r.offset() < end {
        let name = r.read_string()?;
        let reserved = r.read_u32()?;
        if reserved != 0 {
            log::debug!(
                "nonzero reserved field {reserved:#x} after property name at offset {:#x}",
                r.offset()
            );
        }
        if name == SENTINEL {
            break;
        }

        let type_name = r.read_string()?;
        let reserved = r.read_u32()?;
        if reserved != 0 {
            log::debug!(
                "nonzero reserved field {reserved:#x} after property type at offset {:#x}",
                r.offset()
            );
        }
        let size = r.read_u32()?;
        let array_index = r.read_u32()?;

        let value = read_property_value(r, &type_name, size)?;
        push_property(&mut props, Property { name, value }, array_index, r.offset())?;
    }

    Ok(props)
}

fn read_property_value(r: &mut SaveReader, type_name: &str, size: u32) -> Result<PropertyValue> {
    match type_name {
        "ObjectProperty" => Ok(PropertyValue::Object(r.read_bytes(size as usize)?)),
        "IntProperty" => {
            expect_size(r, "IntProperty", 4, size)?;
            Ok(PropertyValue::Int(r.read_i32()?))
        }
        "ByteProperty" => {
            let enum_type = r.read_string()?;
            let reserved = r.read_u32()?;
            if reserved != 0 {
                log::debug!(
                    "nonzero reserved field {reserved:#x} inside ByteProperty at offset {:#x}",
                    r.offset()
                );
            }
            let enum_value = r.read_string()?;
            let extra = r.read_i32()?;
            Ok(PropertyValue::Byte {
                enum_type,
                enum_value,
                extra,
            })
        }
        "BoolProperty" => {
            // The flag byte is inline and not counted in the declared size.
            expect_size(r, "BoolProperty", 0, size)?;
            Ok(PropertyValue::Bool(r.read_u8()? != 0))
        }
        "ArrayProperty" => {
            let element_count = r.read_u32()?;
            let data = if size > 4 {
                r.read_bytes(size as usize - 4)?
            } else {
                Vec::new()
            };
            let element_size = if element_count > 0 {
                data.len() as u32 / element_count
            } else {
                0
            };
            Ok(PropertyValue::Array {
                element_count,
                element_size,
                data,
            })
        }
        "FloatProperty" => Ok(PropertyValue::Float(r.read_f32()?)),
        "StructProperty" => {
            let struct_type = r.read_string()?;
            let reserved = r.read_u32()?;
            if reserved != 0 {
                log::debug!(
                    "nonzero reserved field {reserved:#x} inside StructProperty at offset {:#x}",
                    r.offset()
                );
            }
            let data = match struct_type.as_str() {
                // Two geometry structs carry native float data rather than a
                // nested property list.  Copied verbatim, never interpreted.
                "Vector2D" => {
                    expect_size(r, "StructProperty", 8, size)?;
                    StructData::Native(r.read_bytes(8)?)
                }
                "Vector" => {
                    expect_size(r, "StructProperty", 12, size)?;
                    StructData::Native(r.read_bytes(12)?)
                }
                _ => StructData::Properties(read_properties(r, size as usize)?),
            };
            Ok(PropertyValue::Struct { struct_type, data })
        }
        "StrProperty" => Ok(PropertyValue::Str(r.read_string()?)),
        _ => {
            log::warn!(
                "unknown property type {type_name:?} at offset {:#x}; keeping {size} raw bytes",
                r.offset()
            );
            Ok(PropertyValue::Unknown {
                type_name: type_name.to_owned(),
                data: r.read_bytes(size as usize)?,
            })
        }
    }
}

fn expect_size(r: &SaveReader, type_name: &'static str, expected: u32, found: u32) -> Result<()> {
    if found != expected {
        return Err(Error::PropertySizeMismatch {
            offset: r.offset(),
            type_name,
            expected,
            found,
        });
    }
    Ok(())
}

/// Append a decoded property, applying the static-array coalescing rule.
///
/// Index 0 appends normally.  Index 1 replaces the immediately preceding
/// same-named property with a [`PropertyValue::StaticArray`] holding both;
/// later strictly-increasing indices append to that array.  A name mismatch
/// against the predecessor is tolerated and logged (observed in the wild);
/// an out-of-sequence index is fatal, since it means the cursor can no
/// longer be trusted.
fn push_property(
    props: &mut Vec<Property>,
    prop: Property,
    array_index: u32,
    offset: usize,
) -> Result<()> {
    if array_index == 0 {
        props.push(prop);
        return Ok(());
    }

    let expected = match props.last() {
        Some(last) => {
            if last.name != prop.name {
                log::warn!(
                    "static array index for {:?} at offset {offset:#x} does not match preceding property {:?}",
                    prop.name,
                    last.name
                );
            }
            match &last.value {
                PropertyValue::StaticArray(elems) => elems.len() as u32,
                _ => 1,
            }
        }
        None => 0,
    };
    if array_index != expected {
        return Err(Error::StaticArrayIndexOutOfSequence {
            offset,
            name: prop.name,
            index: array_index,
            expected,
        });
    }

    match props.last_mut() {
        Some(Property {
            value: PropertyValue::StaticArray(elems),
            ..
        }) => elems.push(prop),
        _ => {
            if let Some(first) = props.pop() {
                props.push(Property {
                    name: prop.name.clone(),
                    value: PropertyValue::StaticArray(vec![first, prop]),
                });
            }
        }
    }
    Ok(())
}
