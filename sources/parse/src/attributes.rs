use anyhow::{anyhow, Result};
use bytes::Bytes;
use support::bytes_ext::SafeBuf;

use crate::pool::ConstantPool;

/// One attribute as it appears in the file: a name index into the constant
/// pool and an opaque payload. Attributes the runtime does not understand
/// (`StackMapTable` and friends) stay in this raw form.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name_index: u16,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Attributes {
    pub values: Vec<Attribute>,
}

impl Attributes {
    pub fn parse(bytes: &mut Bytes) -> Result<Self> {
        let length = bytes.try_get_u16()?;
        let mut attributes = Attributes {
            values: Vec::with_capacity(length.into()),
        };

        for _ in 0..length {
            let name_index = bytes.try_get_u16()?;
            let attr_length = bytes.try_get_u32()?;
            let mut info: Vec<u8> = Vec::with_capacity(attr_length as usize);

            for _ in 0..attr_length {
                info.push(bytes.try_get_u8()?);
            }

            attributes.values.push(Attribute {
                name_index,
                data: info,
            });
        }

        Ok(attributes)
    }

    /// Decode the attribute named by `T::id()`, if present.
    pub fn known_attribute<T>(&self, pool: &ConstantPool) -> Result<T>
    where
        T: KnownAttribute,
    {
        for attr in &self.values {
            let name = pool.utf8_at(attr.name_index)?.try_string()?;
            if name == T::id() {
                return T::decode(Bytes::copy_from_slice(&attr.data));
            }
        }

        Err(anyhow!("could not locate known attribute {}", T::id()))
    }

    /// Whether an attribute with the given name is present. Marker
    /// attributes such as `Deprecated` carry no payload worth decoding.
    pub fn contains(&self, pool: &ConstantPool, name: &str) -> bool {
        self.values.iter().any(|attr| {
            matches!(
                pool.utf8_at(attr.name_index).and_then(|u| u.try_string()),
                Ok(n) if n == name
            )
        })
    }
}

pub trait KnownAttribute
where
    Self: Sized,
{
    fn decode(bytes: Bytes) -> Result<Self>;
    fn id() -> &'static str;
}

#[derive(Debug, Clone)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionEntry>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone)]
pub struct ExceptionEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type_index: u16,
}

impl KnownAttribute for CodeAttribute {
    fn decode(mut bytes: Bytes) -> Result<Self> {
        let max_stack = bytes.try_get_u16()?;
        let max_locals = bytes.try_get_u16()?;

        let code_length = bytes.try_get_u32()?;
        let mut code: Vec<u8> = Vec::with_capacity(code_length as usize);
        for _ in 0..code_length {
            code.push(bytes.try_get_u8()?);
        }

        let exception_length = bytes.try_get_u16()?;
        let mut exception_table: Vec<ExceptionEntry> = Vec::with_capacity(exception_length.into());
        for _ in 0..exception_length {
            exception_table.push(ExceptionEntry {
                start_pc: bytes.try_get_u16()?,
                end_pc: bytes.try_get_u16()?,
                handler_pc: bytes.try_get_u16()?,
                catch_type_index: bytes.try_get_u16()?,
            })
        }
        let attributes = Attributes::parse(&mut bytes)?;

        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    fn id() -> &'static str {
        "Code"
    }
}

#[derive(Debug, Clone)]
pub struct SourceFileAttribute {
    pub source_file_index: u16,
}

impl KnownAttribute for SourceFileAttribute {
    fn decode(mut bytes: Bytes) -> Result<Self> {
        Ok(SourceFileAttribute {
            source_file_index: bytes.try_get_u16()?,
        })
    }

    fn id() -> &'static str {
        "SourceFile"
    }
}
