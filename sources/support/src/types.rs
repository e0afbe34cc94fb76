use std::fmt;

/// Fully qualified identity of a method: class, name and raw descriptor.
/// Rendered as `java/io/PrintStream.println(Ljava/lang/String;)V`, which is
/// the canonical key format used by the runtime method table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub class_name: String,
    pub method_name: String,
    pub descriptor: String,
}

impl MethodKey {
    pub fn new<C, M, D>(class_name: C, method_name: M, descriptor: D) -> Self
    where
        C: Into<String>,
        M: Into<String>,
        D: Into<String>,
    {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{}",
            self.class_name, self.method_name, self.descriptor
        )
    }
}
