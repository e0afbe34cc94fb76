use bytes::Bytes;
use support::bytes_ext::SafeBuf;

use crate::{
    attributes::Attributes,
    cfe,
    classfile::{ClassFile, Field, Fields, Method, Methods},
    constants::{MAGIC, MAX_SUPPORTED_MAJOR},
    flags::{ClassFlags, FieldFlags, MethodFlags},
    pool::{
        tags, ConstantClass, ConstantDynamic, ConstantEntry, ConstantNameAndType, ConstantPool,
        ConstantRef, ConstantUtf8,
    },
    result::ParseResult,
};

/// Streaming decoder for one class file. The cursor walks the sections in
/// file order; every multi-byte quantity is big-endian.
pub struct Parser {
    bytes: Bytes,
}

impl Parser {
    pub fn new(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    fn parse_constant_pool(&mut self) -> ParseResult<ConstantPool> {
        let count = self.bytes.try_get_u16()?;
        if count == 0 {
            return Err(cfe!("constant pool count must be at least 1"));
        }

        let mut pool = ConstantPool::new();

        let mut i = 0;
        while i < (count - 1) {
            let tag = self.bytes.try_get_u8()?;
            let entry = match tag {
                tags::UTF8 => {
                    let length = self.bytes.try_get_u16()?;
                    let mut bytes: Vec<u8> = Vec::with_capacity(length.into());

                    for _ in 0..length {
                        bytes.push(self.bytes.try_get_u8()?);
                    }

                    ConstantEntry::Utf8(ConstantUtf8 { bytes })
                }
                tags::INTEGER => ConstantEntry::Integer(self.bytes.try_get_u32()?),
                tags::FLOAT => ConstantEntry::Float(self.bytes.try_get_f32()?),
                tags::LONG => ConstantEntry::Long(self.bytes.try_get_u64()?),
                tags::DOUBLE => ConstantEntry::Double(self.bytes.try_get_f64()?),
                tags::CLASS => ConstantEntry::Class(ConstantClass {
                    name_index: self.bytes.try_get_u16()?,
                }),
                tags::STRING => ConstantEntry::String {
                    string_index: self.bytes.try_get_u16()?,
                },
                tags::FIELD => ConstantEntry::Field(ConstantRef {
                    class_index: self.bytes.try_get_u16()?,
                    name_and_type_index: self.bytes.try_get_u16()?,
                }),
                tags::METHOD => ConstantEntry::Method(ConstantRef {
                    class_index: self.bytes.try_get_u16()?,
                    name_and_type_index: self.bytes.try_get_u16()?,
                }),
                tags::INTERFACE_METHOD => ConstantEntry::InterfaceMethod(ConstantRef {
                    class_index: self.bytes.try_get_u16()?,
                    name_and_type_index: self.bytes.try_get_u16()?,
                }),
                tags::NAME_AND_TYPE => ConstantEntry::NameAndType(ConstantNameAndType {
                    name_index: self.bytes.try_get_u16()?,
                    descriptor_index: self.bytes.try_get_u16()?,
                }),
                tags::METHOD_HANDLE => ConstantEntry::MethodHandle {
                    kind: self.bytes.try_get_u8()?,
                    reference_index: self.bytes.try_get_u16()?,
                },
                tags::METHOD_TYPE => ConstantEntry::MethodType {
                    descriptor_index: self.bytes.try_get_u16()?,
                },
                tags::DYNAMIC => ConstantEntry::Dynamic(ConstantDynamic {
                    bootstrap_method_index: self.bytes.try_get_u16()?,
                    name_and_type_index: self.bytes.try_get_u16()?,
                }),
                tags::INVOKE_DYNAMIC => ConstantEntry::InvokeDynamic(ConstantDynamic {
                    bootstrap_method_index: self.bytes.try_get_u16()?,
                    name_and_type_index: self.bytes.try_get_u16()?,
                }),
                unknown => return Err(cfe!("unknown constant pool tag {}", unknown)),
            };

            let reserve_next =
                matches!(entry, ConstantEntry::Long(_) | ConstantEntry::Double(_));
            pool.push(entry);

            // 64 bit constants take up two slots; the second is a ghost that
            // nothing may reference
            if reserve_next {
                pool.push(ConstantEntry::Reserved);
                i += 1;
            }

            i += 1;
        }

        Ok(pool)
    }

    fn class_name_at(&self, pool: &ConstantPool, index: u16) -> ParseResult<String> {
        pool.class_name_at(index)
            .map_err(|e| cfe!("index {} does not resolve to a class name: {}", index, e))
    }

    fn parse_interfaces(&mut self, pool: &ConstantPool) -> ParseResult<Vec<String>> {
        let length = self.bytes.try_get_u16()?;
        let mut interfaces = Vec::with_capacity(length.into());

        for _ in 0..length {
            let index = self.bytes.try_get_u16()?;
            interfaces.push(self.class_name_at(pool, index)?);
        }

        Ok(interfaces)
    }

    fn parse_fields(&mut self) -> ParseResult<Fields> {
        let length = self.bytes.try_get_u16()?;
        let mut fields = Fields {
            values: Vec::with_capacity(length.into()),
        };

        for _ in 0..length {
            fields.values.push(Field {
                flags: FieldFlags::decode(self.bytes.try_get_u16()?),
                name_index: self.bytes.try_get_u16()?,
                descriptor_index: self.bytes.try_get_u16()?,
                attributes: Attributes::parse(&mut self.bytes)?,
            });
        }

        Ok(fields)
    }

    fn parse_methods(&mut self, pool: &ConstantPool) -> ParseResult<Methods> {
        let length = self.bytes.try_get_u16()?;
        let mut methods = Methods {
            values: Vec::with_capacity(length.into()),
        };

        for _ in 0..length {
            let flags = MethodFlags::decode(self.bytes.try_get_u16()?);
            let name_index = self.bytes.try_get_u16()?;
            let descriptor_index = self.bytes.try_get_u16()?;
            let attributes = Attributes::parse(&mut self.bytes)?;
            let deprecated = attributes.contains(pool, "Deprecated");

            methods.values.push(Method {
                flags,
                name_index,
                descriptor_index,
                attributes,
                deprecated,
            });
        }

        Ok(methods)
    }

    pub fn parse(&mut self) -> ParseResult {
        let magic = self.bytes.try_get_u32()?;
        if magic != MAGIC {
            return Err(cfe!("invalid magic value {:#010x}", magic));
        }

        let _minor = self.bytes.try_get_u16()?;
        let major = self.bytes.try_get_u16()?;
        if major > MAX_SUPPORTED_MAJOR {
            return Err(cfe!(
                "unsupported class file major version {} (max {})",
                major,
                MAX_SUPPORTED_MAJOR
            ));
        }

        let constant_pool = self.parse_constant_pool()?;

        let access_flags = ClassFlags::decode(self.bytes.try_get_u16()?);

        let this_class = self.bytes.try_get_u16()?;
        let class_name = self.class_name_at(&constant_pool, this_class)?;

        // java/lang/Object is the only class with no super class; its index
        // on the wire is 0 and its resolved name stays empty
        let super_class = self.bytes.try_get_u16()?;
        let super_class_name = if super_class == 0 {
            String::new()
        } else {
            self.class_name_at(&constant_pool, super_class)?
        };

        let interfaces = self.parse_interfaces(&constant_pool)?;
        let fields = self.parse_fields()?;
        let methods = self.parse_methods(&constant_pool)?;
        let attributes = Attributes::parse(&mut self.bytes)?;

        if !self.bytes.is_empty() {
            return Err(cfe!(
                "class file has {} extra byte(s) at the end",
                self.bytes.len()
            ));
        }

        Ok(ClassFile {
            java_version: major,
            constant_pool,
            access_flags,
            class_name,
            super_class_name,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}
