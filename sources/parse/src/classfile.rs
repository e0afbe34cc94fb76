use crate::{
    attributes::Attributes,
    flags::{ClassFlags, FieldFlags, MethodFlags},
    pool::ConstantPool,
};

/// A fully parsed class file.
///
/// The class, super class and interface names are resolved through the
/// constant pool while parsing; `super_class_name` is empty for
/// `java/lang/Object`, which is the only class without a super class.
/// Members keep the raw name and descriptor indices from the wire and
/// resolve them through the pool on demand.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub java_version: u16,
    pub constant_pool: ConstantPool,

    pub access_flags: ClassFlags,
    pub class_name: String,
    pub super_class_name: String,
    pub interfaces: Vec<String>,

    pub fields: Fields,
    pub methods: Methods,
    pub attributes: Attributes,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub flags: FieldFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}

#[derive(Debug, Clone)]
pub struct Fields {
    pub values: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub flags: MethodFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
    pub deprecated: bool,
}

#[derive(Debug, Clone)]
pub struct Methods {
    pub values: Vec<Method>,
}

impl Methods {
    /// Index of a method by name and raw descriptor. Methods whose name or
    /// descriptor index fails to resolve simply never match.
    pub fn locate_index(&self, pool: &ConstantPool, name: &str, descriptor: &str) -> Option<usize> {
        self.values.iter().position(|m| {
            let m_name = pool.utf8_at(m.name_index).and_then(|u| u.try_string());
            let m_desc = pool.utf8_at(m.descriptor_index).and_then(|u| u.try_string());

            matches!((m_name, m_desc), (Ok(n), Ok(d)) if n == name && d == descriptor)
        })
    }
}
