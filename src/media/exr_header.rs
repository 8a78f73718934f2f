use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::error::{CatalogError, Result};
use crate::media::attribute::{Attribute, AttributeValue};
use crate::media::ImageAccessor;

const MAGIC: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];
const LONG_NAMES_FLAG: u32 = 0x400;
const SHORT_NAME_LIMIT: usize = 31;
const LONG_NAME_LIMIT: usize = 255;
// Previews can be large, anything past this is a corrupt size field.
const MAX_ATTRIBUTE_SIZE: i32 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
enum HeaderError {
    #[error("not an OpenEXR file")]
    BadMagic,
    #[error("unsupported OpenEXR version {0}")]
    UnsupportedVersion(u32),
    #[error("attribute name longer than {0} bytes")]
    NameTooLong(usize),
    #[error("attribute `{name}` has invalid size {size}")]
    BadSize { name: String, size: i64 },
    #[error("header read failed: {0}")]
    Io(#[from] io::Error),
}

/// Reads attributes straight from the header of an OpenEXR file, without
/// touching pixel data. Only the first part of a multi-part file is read.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExrHeaderReader;

impl ImageAccessor for ExrHeaderReader {
    fn read_attributes(&self, path: &Path) -> Result<Vec<Attribute>> {
        let file = File::open(path).map_err(|source| CatalogError::CannotOpen {
            path: path.to_path_buf(),
            source,
        })?;

        read_header(&mut BufReader::new(file)).map_err(|e| CatalogError::NoSpec {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn read_header<R: Read>(reader: &mut R) -> std::result::Result<Vec<Attribute>, HeaderError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(HeaderError::BadMagic);
    }

    let version = read_u32(reader)?;
    if version & 0xff != 2 {
        return Err(HeaderError::UnsupportedVersion(version & 0xff));
    }
    let name_limit = if version & LONG_NAMES_FLAG != 0 {
        LONG_NAME_LIMIT
    } else {
        SHORT_NAME_LIMIT
    };

    let mut attributes = Vec::new();
    loop {
        let name = read_name(reader, name_limit)?;
        if name.is_empty() {
            break;
        }
        let type_name = read_name(reader, name_limit)?;

        let size = read_u32(reader)? as i32;
        if !(0..=MAX_ATTRIBUTE_SIZE).contains(&size) {
            return Err(HeaderError::BadSize {
                name,
                size: size.into(),
            });
        }
        let mut bytes = vec![0u8; size as usize];
        reader.read_exact(&mut bytes)?;

        let value = decode_value(&name, &type_name, &bytes)?;
        attributes.push(Attribute::new(name, value));
    }

    Ok(attributes)
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut word = [0u8; 4];
    reader.read_exact(&mut word)?;
    Ok(u32::from_le_bytes(word))
}

fn read_name<R: Read>(reader: &mut R, limit: usize) -> std::result::Result<String, HeaderError> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        if byte[0] == 0 {
            break;
        }
        if bytes.len() == limit {
            return Err(HeaderError::NameTooLong(limit));
        }
        bytes.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_value(
    name: &str,
    type_name: &str,
    bytes: &[u8],
) -> std::result::Result<AttributeValue, HeaderError> {
    let value = match type_name {
        "int" => {
            check_size(name, bytes, 4)?;
            AttributeValue::Integer(i32::from_le_bytes(word(bytes, 0)))
        }
        "float" => {
            check_size(name, bytes, 4)?;
            AttributeValue::Float(f32::from_le_bytes(word(bytes, 0)).into())
        }
        "double" => {
            check_size(name, bytes, 8)?;
            let mut double = [0u8; 8];
            double.copy_from_slice(bytes);
            AttributeValue::Float(f64::from_le_bytes(double))
        }
        "rational" => {
            check_size(name, bytes, 8)?;
            AttributeValue::Rational {
                numerator: i32::from_le_bytes(word(bytes, 0)),
                denominator: u32::from_le_bytes(word(bytes, 4)),
            }
        }
        "string" => AttributeValue::String(String::from_utf8_lossy(bytes).into_owned()),
        "chromaticities" => {
            check_size(name, bytes, 32)?;
            let mut values = [0f64; 8];
            for (i, v) in values.iter_mut().enumerate() {
                *v = f32::from_le_bytes(word(bytes, i * 4)).into();
            }
            AttributeValue::Chromaticity(values)
        }
        "compression" | "lineOrder" => {
            check_size(name, bytes, 1)?;
            let label = if type_name == "compression" {
                compression_name(bytes[0])
            } else {
                line_order_name(bytes[0])
            };
            match label {
                Some(label) => AttributeValue::String(label.to_string()),
                None => unsupported(type_name, bytes),
            }
        }
        _ => unsupported(type_name, bytes),
    };
    Ok(value)
}

fn unsupported(type_name: &str, bytes: &[u8]) -> AttributeValue {
    AttributeValue::Unsupported {
        type_name: type_name.to_string(),
        size: bytes.len(),
    }
}

fn check_size(name: &str, bytes: &[u8], expected: usize) -> std::result::Result<(), HeaderError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(HeaderError::BadSize {
            name: name.to_string(),
            size: bytes.len() as i64,
        })
    }
}

fn word(bytes: &[u8], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}

fn compression_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0 => "none",
        1 => "rle",
        2 => "zips",
        3 => "zip",
        4 => "piz",
        5 => "pxr24",
        6 => "b44",
        7 => "b44a",
        8 => "dwaa",
        9 => "dwab",
        _ => return None,
    };
    Some(name)
}

fn line_order_name(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("increasingY"),
        1 => Some("decreasingY"),
        2 => Some("randomY"),
        _ => None,
    }
}
