use crate::{frames::FrameStack, globals::Globals};

/// An execution thread: an identifier plus the frame stack it runs.
/// Threads execute one at a time in this runtime; creating one registers it
/// in the process-wide thread table.
#[derive(Debug)]
pub struct VmThread {
    pub id: usize,
    pub stack: FrameStack,
}

impl VmThread {
    pub fn create(globals: &Globals) -> Self {
        Self {
            id: globals.register_thread(),
            stack: FrameStack::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_registers_itself_at_creation() {
        let globals = Globals::new("test");

        let first = VmThread::create(&globals);
        let second = VmThread::create(&globals);

        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(globals.thread_count(), 2);
        assert!(first.stack.is_empty());
    }
}
