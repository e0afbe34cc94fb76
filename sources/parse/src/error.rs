use thiserror::Error;

/// Errors surfaced by the class file parser and format checker.
///
/// `Format` carries the source location of the check that rejected the file,
/// so a malformed class can be traced back to the exact validation that
/// tripped. Truncated streams and failed constant resolutions flow through
/// the transparent variant.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Class Format Error: {message}\n  detected by file: {file}, line: {line}")]
    Format {
        message: String,
        file: &'static str,
        line: u32,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Build a [`ParseError::Format`], logging it at error severity and stamping
/// it with the file and line of the detecting check.
#[macro_export]
macro_rules! cfe {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        tracing::error!("Class Format Error: {}", message);
        $crate::error::ParseError::Format {
            message,
            file: file!(),
            line: line!(),
        }
    }};
}
