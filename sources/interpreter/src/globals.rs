use parking_lot::Mutex;

use crate::arrays::ArrayRef;

/// Host-owned process state, built once at startup and passed by reference
/// into the interpreter. Arrays live here until process exit; the thread
/// table records every thread created against this VM instance.
#[derive(Debug)]
pub struct Globals {
    pub vm_name: String,

    array_list: Mutex<Vec<ArrayRef>>,
    thread_ids: Mutex<Vec<usize>>,
}

impl Globals {
    pub fn new(vm_name: impl Into<String>) -> Self {
        Self {
            vm_name: vm_name.into(),
            array_list: Mutex::new(Vec::new()),
            thread_ids: Mutex::new(Vec::new()),
        }
    }

    /// Record a fresh allocation in the array address list. Entries are
    /// never removed.
    pub fn register_array(&self, array: ArrayRef) {
        self.array_list.lock().push(array);
    }

    pub fn array_count(&self) -> usize {
        self.array_list.lock().len()
    }

    pub fn array_at(&self, index: usize) -> Option<ArrayRef> {
        self.array_list.lock().get(index).cloned()
    }

    /// Allocate and record the next thread id.
    pub fn register_thread(&self) -> usize {
        let mut ids = self.thread_ids.lock();
        let id = ids.len();
        ids.push(id);

        id
    }

    pub fn thread_count(&self) -> usize {
        self.thread_ids.lock().len()
    }
}
