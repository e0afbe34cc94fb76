use thiserror::Error;

/// Errors raised while executing bytecode. All of these unwind the dispatch
/// loop; the host decides whether to terminate the process.
#[derive(Error, Debug)]
pub enum VmError {
    #[error("Arithmetic Exception: division by zero in {class_name}.{method_name}")]
    Arithmetic {
        class_name: String,
        method_name: String,
    },

    #[error("Invalid bytecode {opcode:#04x} in {class_name}.{method_name}")]
    InvalidBytecode {
        opcode: u8,
        class_name: String,
        method_name: String,
    },

    #[error("no method table entry for {key}")]
    Resolution { key: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Build a [`VmError::Internal`] from a format string, for malformed-frame
/// conditions such as stack underflow or type confusion.
#[macro_export]
macro_rules! internal {
    ($msg:literal $(,)?) => {
        $crate::error::VmError::Internal(anyhow::anyhow!($msg))
    };
    ($err:expr $(,)?) => {
        $crate::error::VmError::Internal(anyhow::anyhow!($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::VmError::Internal(anyhow::anyhow!($fmt, $($arg)*))
    };
}
