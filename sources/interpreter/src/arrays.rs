use std::rc::Rc;

use parking_lot::Mutex;

use crate::opcodes as op;

/// Internal storage families for primitive arrays. The JDK element types
/// collapse: boolean shares the byte family, char/short/long share the int
/// family, and float/double share one floating family. The width lost for
/// char, short and long is a known trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Byte,
    Int,
    Float,
    Error,
}

/// Map a `NEWARRAY` element type tag onto the internal storage family.
pub fn kind_for_jdk_tag(tag: u8) -> ArrayKind {
    match tag {
        op::T_BOOLEAN | op::T_BYTE => ArrayKind::Byte,
        op::T_CHAR | op::T_SHORT | op::T_INT | op::T_LONG => ArrayKind::Int,
        op::T_FLOAT | op::T_DOUBLE => ArrayKind::Float,
        _ => ArrayKind::Error,
    }
}

/// A primitive array. Referenced from operand stack slots by a shared
/// handle whose identity is stable for the life of the process; the global
/// array address list keeps every allocation alive (there is no collector).
#[derive(Debug)]
pub enum JavaArray {
    Byte(Vec<i8>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

pub type ArrayRef = Rc<Mutex<JavaArray>>;

impl JavaArray {
    /// Zero-initialised array of the given family, or `None` for
    /// [`ArrayKind::Error`].
    pub fn zeroed(kind: ArrayKind, count: usize) -> Option<Self> {
        match kind {
            ArrayKind::Byte => Some(JavaArray::Byte(vec![0; count])),
            ArrayKind::Int => Some(JavaArray::Int(vec![0; count])),
            ArrayKind::Float => Some(JavaArray::Float(vec![0.0; count])),
            ArrayKind::Error => None,
        }
    }

    pub fn kind(&self) -> ArrayKind {
        match self {
            JavaArray::Byte(_) => ArrayKind::Byte,
            JavaArray::Int(_) => ArrayKind::Int,
            JavaArray::Float(_) => ArrayKind::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            JavaArray::Byte(values) => values.len(),
            JavaArray::Int(values) => values.len(),
            JavaArray::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_collapses_jdk_element_types() {
        assert_eq!(kind_for_jdk_tag(op::T_BOOLEAN), ArrayKind::Byte);
        assert_eq!(kind_for_jdk_tag(op::T_BYTE), ArrayKind::Byte);
        assert_eq!(kind_for_jdk_tag(op::T_CHAR), ArrayKind::Int);
        assert_eq!(kind_for_jdk_tag(op::T_SHORT), ArrayKind::Int);
        assert_eq!(kind_for_jdk_tag(op::T_INT), ArrayKind::Int);
        assert_eq!(kind_for_jdk_tag(op::T_LONG), ArrayKind::Int);
        assert_eq!(kind_for_jdk_tag(op::T_FLOAT), ArrayKind::Float);
        assert_eq!(kind_for_jdk_tag(op::T_DOUBLE), ArrayKind::Float);
        assert_eq!(kind_for_jdk_tag(99), ArrayKind::Error);
    }

    #[test]
    fn it_zero_initialises_allocations() {
        let array = JavaArray::zeroed(ArrayKind::Int, 13).unwrap();

        assert_eq!(array.len(), 13);
        assert_eq!(array.kind(), ArrayKind::Int);
        match array {
            JavaArray::Int(values) => assert!(values.iter().all(|v| *v == 0)),
            other => panic!("expected an int array, got {other:?}"),
        }
    }

    #[test]
    fn it_refuses_the_error_kind() {
        assert!(JavaArray::zeroed(ArrayKind::Error, 4).is_none());
    }
}
