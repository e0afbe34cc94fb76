use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{error::VmError, frames::Frame, natives, value::Value};

/// A host function standing in for a bytecoded method. It consumes the
/// argument slots popped for it and delivers any result by pushing onto the
/// calling frame's operand stack; nothing is returned to the caller.
pub type GFunction = fn(frame: &mut Frame, args: Vec<Value>);

#[derive(Debug, Clone)]
pub struct GMeth {
    pub param_slots: usize,
    pub func: GFunction,
}

#[derive(Debug, Clone)]
pub enum MTableEntry {
    /// A bytecoded method, recorded lazily on first resolution: the owning
    /// class (as keyed in its loader) and the method's index in that class.
    Java {
        class_name: String,
        method_index: usize,
    },

    /// A host stand-in registered at startup.
    Native(GMeth),
}

/// The runtime method table: canonical method key
/// (`java/io/PrintStream.println(Ljava/lang/String;)V`) to entry. Lookups
/// vastly outnumber inserts, so the map sits behind a reader/writer lock;
/// entries are never removed.
#[derive(Debug, Default)]
pub struct MethodTable {
    entries: RwLock<HashMap<String, MTableEntry>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: String, entry: MTableEntry) {
        self.entries.write().insert(key, entry);
    }

    pub fn lookup(&self, key: &str) -> Option<MTableEntry> {
        self.entries.read().get(key).cloned()
    }

    /// Lookup that reports a miss as a resolution error.
    pub fn lookup_required(&self, key: &str) -> Result<MTableEntry, VmError> {
        self.lookup(key).ok_or_else(|| VmError::Resolution {
            key: key.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Seed the table with every host-provided library shipped in-tree.
    pub fn register_natives(&self) {
        self.load_lib(natives::load_print_stream());
    }

    fn load_lib(&self, lib: HashMap<String, GMeth>) {
        for (key, gmeth) in lib {
            self.insert(key, MTableEntry::Native(gmeth));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_registers_the_shipped_natives() {
        let table = MethodTable::new();
        table.register_natives();

        let entry = table
            .lookup("java/io/PrintStream.println(Ljava/lang/String;)V")
            .unwrap();

        match entry {
            MTableEntry::Native(gmeth) => assert_eq!(gmeth.param_slots, 1),
            other => panic!("expected a native entry, got {other:?}"),
        }
    }

    #[test]
    fn it_misses_unknown_keys() {
        let table = MethodTable::new();

        assert!(table.lookup("Nope.nothing()V").is_none());
        let err = table.lookup_required("Nope.nothing()V").unwrap_err();
        assert!(matches!(err, VmError::Resolution { .. }));
    }

    #[test]
    fn it_records_java_methods() {
        let table = MethodTable::new();
        table.insert(
            "Main.main([Ljava/lang/String;)V".to_string(),
            MTableEntry::Java {
                class_name: "Main".to_string(),
                method_index: 1,
            },
        );

        assert_eq!(table.len(), 1);
        match table.lookup("Main.main([Ljava/lang/String;)V").unwrap() {
            MTableEntry::Java {
                class_name,
                method_index,
            } => {
                assert_eq!(class_name, "Main");
                assert_eq!(method_index, 1);
            }
            other => panic!("expected a bytecoded entry, got {other:?}"),
        }
    }
}
