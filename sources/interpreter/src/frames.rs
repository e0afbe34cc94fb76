use std::{collections::VecDeque, rc::Rc};

use parking_lot::Mutex;
use parse::attributes::CodeAttribute;

use crate::{error::VmError, internal, value::Value};

/// How the method behind a frame is executed: from bytecode, or by a host
/// function standing in for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Bytecode,
    Native,
}

/// One method activation: the method's code, a local variable array, an
/// operand stack and a program counter, plus the class and method names for
/// diagnostic attribution.
#[derive(Debug)]
pub struct Frame {
    pub class_name: String,
    pub method_name: String,
    pub kind: FrameKind,

    pub pc: i32,
    pub code: Vec<u8>,
    pub locals: Vec<Value>,
    stack: Vec<Value>,
}

impl Frame {
    pub fn new(max_stack: usize) -> Self {
        Self {
            class_name: String::new(),
            method_name: String::new(),
            kind: FrameKind::Bytecode,
            pc: 0,
            code: Vec::new(),
            locals: Vec::new(),
            stack: Vec::with_capacity(max_stack),
        }
    }

    /// Activation record for a parsed method's `Code` attribute. Locals are
    /// pre-sized to the declared maximum.
    pub fn from_code(class_name: &str, method_name: &str, code: &CodeAttribute) -> Self {
        Self {
            class_name: class_name.to_string(),
            method_name: method_name.to_string(),
            kind: FrameKind::Bytecode,
            pc: 0,
            code: code.code.clone(),
            locals: vec![Value::Null; code.max_locals as usize],
            stack: Vec::with_capacity(code.max_stack as usize),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, VmError> {
        self.stack.pop().ok_or_else(|| {
            internal!(
                "operand stack underflow in {}.{}",
                self.class_name,
                self.method_name
            )
        })
    }

    pub fn pop_integer(&mut self) -> Result<i64, VmError> {
        let value = self.pop()?;
        value
            .integer()
            .ok_or_else(|| internal!("expected an integer slot, got {:?}", value))
    }

    pub fn pop_floating(&mut self) -> Result<f64, VmError> {
        let value = self.pop()?;
        value
            .floating()
            .ok_or_else(|| internal!("expected a floating slot, got {:?}", value))
    }

    /// Index of the topmost valid stack slot, -1 when the stack is empty.
    pub fn tos(&self) -> isize {
        self.stack.len() as isize - 1
    }

    pub fn local(&self, index: usize) -> Result<Value, VmError> {
        self.locals
            .get(index)
            .cloned()
            .ok_or_else(|| internal!("no local @ {}", index))
    }

    /// Store into a local slot, widening the array with nulls if needed.
    pub fn set_local(&mut self, index: usize, value: Value) {
        while self.locals.len() <= index {
            self.locals.push(Value::Null);
        }

        self.locals[index] = value;
    }

    /// Operand byte at `pc + offset`.
    pub fn operand_u8(&self, offset: usize) -> Result<u8, VmError> {
        self.code
            .get(self.pc as usize + offset)
            .copied()
            .ok_or_else(|| {
                internal!(
                    "code ends inside the operands of the instruction at {}",
                    self.pc
                )
            })
    }

    pub fn operand_i8(&self, offset: usize) -> Result<i8, VmError> {
        Ok(self.operand_u8(offset)? as i8)
    }

    /// Signed big-endian 16 bit operand at `pc + offset`.
    pub fn operand_i16(&self, offset: usize) -> Result<i16, VmError> {
        let hi = self.operand_u8(offset)?;
        let lo = self.operand_u8(offset + 1)?;

        Ok(((u16::from(hi) << 8) | u16::from(lo)) as i16)
    }
}

pub type FrameRef = Rc<Mutex<Frame>>;

/// Per-thread stack of activation records; the front frame is the one being
/// executed.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: VecDeque<FrameRef>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }

    pub fn push_front(&mut self, frame: FrameRef) {
        self.frames.push_front(frame);
    }

    pub fn pop_front(&mut self) -> Option<FrameRef> {
        self.frames.pop_front()
    }

    pub fn front(&self) -> Option<FrameRef> {
        self.frames.front().map(Rc::clone)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parse::attributes::Attributes;

    #[test]
    fn it_builds_a_frame_from_a_code_attribute() {
        let code = CodeAttribute {
            max_stack: 2,
            max_locals: 3,
            code: vec![0xB1],
            exception_table: vec![],
            attributes: Attributes { values: vec![] },
        };

        let frame = Frame::from_code("Main", "main", &code);

        assert_eq!(frame.class_name, "Main");
        assert_eq!(frame.kind, FrameKind::Bytecode);
        assert_eq!(frame.code, vec![0xB1]);
        assert_eq!(frame.locals.len(), 3);
        assert_eq!(frame.tos(), -1);
    }

    #[test]
    fn it_tracks_the_top_of_stack() {
        let mut frame = Frame::new(6);
        assert_eq!(frame.tos(), -1);

        frame.push(Value::Int(1));
        frame.push(Value::Int(2));
        assert_eq!(frame.tos(), 1);

        assert_eq!(frame.pop().unwrap().integer(), Some(2));
        assert_eq!(frame.tos(), 0);
    }

    #[test]
    fn it_reports_stack_underflow() {
        let mut frame = Frame::new(6);

        assert!(frame.pop().is_err());
    }

    #[test]
    fn it_widens_locals_on_store() {
        let mut frame = Frame::new(6);
        frame.set_local(3, Value::Int(7));

        assert_eq!(frame.locals.len(), 4);
        assert_eq!(frame.local(3).unwrap().integer(), Some(7));
        assert!(frame.local(0).unwrap().is_null());
    }

    #[test]
    fn it_reads_signed_operands() {
        let mut frame = Frame::new(6);
        frame.code = vec![0x00, 0xFF, 0xFF];

        assert_eq!(frame.operand_i8(1).unwrap(), -1);
        assert_eq!(frame.operand_i16(1).unwrap(), -1);
        assert!(frame.operand_u8(3).is_err());
    }

    #[test]
    fn it_stacks_frames_front_first() {
        let mut stack = FrameStack::new();
        assert!(stack.is_empty());

        let first = Rc::new(Mutex::new(Frame::new(2)));
        let second = Rc::new(Mutex::new(Frame::new(2)));

        stack.push_front(first);
        stack.push_front(Rc::clone(&second));

        assert_eq!(stack.len(), 2);
        assert!(Rc::ptr_eq(&stack.front().unwrap(), &second));

        stack.pop_front();
        assert_eq!(stack.len(), 1);
    }
}
