use anyhow::{anyhow, Result};

/// Raw constant tag bytes as they appear on the wire.
pub mod tags {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD: u8 = 9;
    pub const METHOD: u8 = 10;
    pub const INTERFACE_METHOD: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
}

/// The constant pool of one class file, in file order.
///
/// Entries refer to each other by the raw 1-based indices from the wire;
/// index 0 is reserved and never resolves. Long and double constants occupy
/// two logical slots, the second being a [`ConstantEntry::Reserved`] ghost
/// that nothing may reference. The typed accessors check both range and
/// entry kind, so a dangling or mistyped index surfaces as an error at the
/// point of use.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<ConstantEntry>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ConstantEntry) {
        self.entries.push(entry);
    }

    /// The declared `constant_pool_count`: one more than the number of
    /// logical slots, ghosts included.
    pub fn count(&self) -> u16 {
        self.entries.len() as u16 + 1
    }

    pub fn entry_at(&self, index: u16) -> Result<&ConstantEntry> {
        if index == 0 {
            return Err(anyhow!("constant pool index 0 is reserved"));
        }

        self.entries
            .get(index as usize - 1)
            .ok_or_else(|| anyhow!("no constant pool entry @ {}", index))
    }

    pub fn utf8_at(&self, index: u16) -> Result<&ConstantUtf8> {
        match self.entry_at(index)? {
            ConstantEntry::Utf8(utf8) => Ok(utf8),
            other => Err(anyhow!("expected Utf8 @ {}, found {:?}", index, other)),
        }
    }

    pub fn class_at(&self, index: u16) -> Result<&ConstantClass> {
        match self.entry_at(index)? {
            ConstantEntry::Class(class) => Ok(class),
            other => Err(anyhow!("expected Class @ {}, found {:?}", index, other)),
        }
    }

    pub fn name_and_type_at(&self, index: u16) -> Result<&ConstantNameAndType> {
        match self.entry_at(index)? {
            ConstantEntry::NameAndType(nat) => Ok(nat),
            other => Err(anyhow!(
                "expected NameAndType @ {}, found {:?}",
                index,
                other
            )),
        }
    }

    /// Walk class index -> Class entry -> Utf8 entry to an interned name.
    pub fn class_name_at(&self, index: u16) -> Result<String> {
        let class = self.class_at(index)?;
        self.utf8_at(class.name_index)?.try_string()
    }
}

#[derive(Debug, Clone)]
pub struct ConstantUtf8 {
    pub bytes: Vec<u8>,
}

impl ConstantUtf8 {
    pub fn try_string(&self) -> Result<String> {
        Ok(String::from_utf8(self.bytes.clone())?)
    }
}

#[derive(Debug, Clone)]
pub struct ConstantClass {
    pub name_index: u16,
}

/// A symbolic member reference; fields, methods and interface methods all
/// share this shape and differ only by tag.
#[derive(Debug, Clone)]
pub struct ConstantRef {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, Clone)]
pub struct ConstantNameAndType {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, Clone)]
pub struct ConstantDynamic {
    pub bootstrap_method_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, Clone)]
pub enum ConstantEntry {
    Utf8(ConstantUtf8),
    Integer(u32),
    Float(f32),
    Long(u64),
    Double(f64),
    Class(ConstantClass),
    String { string_index: u16 },
    Field(ConstantRef),
    Method(ConstantRef),
    InterfaceMethod(ConstantRef),
    NameAndType(ConstantNameAndType),
    MethodHandle { kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic(ConstantDynamic),
    InvokeDynamic(ConstantDynamic),
    /// Ghost slot following a long or double entry.
    Reserved,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(content: &str) -> ConstantEntry {
        ConstantEntry::Utf8(ConstantUtf8 {
            bytes: content.as_bytes().to_vec(),
        })
    }

    #[test]
    fn it_reports_the_declared_count() {
        let mut pool = ConstantPool::new();
        pool.push(ConstantEntry::Long(1));
        pool.push(ConstantEntry::Reserved);

        // one long plus its ghost slot: two logical entries, count three
        assert_eq!(pool.count(), 3);
    }

    #[test]
    fn it_never_resolves_index_zero() {
        let pool = ConstantPool::new();

        assert!(pool.entry_at(0).is_err());
        assert!(pool.utf8_at(0).is_err());
    }

    #[test]
    fn it_checks_the_entry_kind_on_access() {
        let mut pool = ConstantPool::new();
        pool.push(ConstantEntry::Integer(7));

        assert!(pool.entry_at(1).is_ok());
        let err = pool.utf8_at(1).unwrap_err();
        assert!(err.to_string().contains("expected Utf8"));
    }

    #[test]
    fn it_walks_class_entries_to_their_names() {
        let mut pool = ConstantPool::new();
        pool.push(utf8("java/lang/Object"));
        pool.push(ConstantEntry::Class(ConstantClass { name_index: 1 }));

        assert_eq!(pool.class_name_at(2).unwrap(), "java/lang/Object");
        assert!(pool.class_name_at(1).is_err());
    }
}
