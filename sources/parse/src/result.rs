use crate::{classfile::ClassFile, error::ParseError};

pub type ParseResult<T = ClassFile> = std::result::Result<T, ParseError>;
