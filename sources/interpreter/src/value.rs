use std::fmt;

use enum_as_inner::EnumAsInner;

use crate::arrays::ArrayRef;

/// One operand stack or local variable slot.
///
/// Every slot is 64 bits wide: the integer family and the long family share
/// a signed 64 bit representation, floats and doubles share an f64, and
/// references are opaque handles onto the array registry. Long and double
/// values notionally occupy two slots; this runtime stores one wide value
/// per slot and preserves the two-slot convention only in the local variable
/// array (see the long/double store instructions).
#[derive(Debug, Clone, EnumAsInner)]
pub enum Value {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Ref(ArrayRef),
    Null,
}

impl Value {
    /// Integer-family view of this slot, erasing the int/long distinction.
    pub fn integer(&self) -> Option<i64> {
        match self {
            Value::Int(v) | Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Floating-family view of this slot.
    pub fn floating(&self) -> Option<f64> {
        match self {
            Value::Float(v) | Value::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) | Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) | Value::Double(v) => write!(f, "{v}"),
            Value::Ref(array) => write!(f, "array[{}]", array.lock().len()),
            Value::Null => write!(f, "null"),
        }
    }
}
