use bitflags::bitflags;
use tracing::warn;

// Wraps a decoded access mask together with the raw flags word from the
// file. Decoding never fails: bits with no assigned meaning are dropped
// from the decoded set, with a warning naming exactly which bits were
// dropped, while the raw word survives untouched for diagnostics.
macro_rules! access_flags {
    ( $wrapper:ident over $flag:ident ) => {
        #[derive(Clone, Debug)]
        pub struct $wrapper {
            decoded: $flag,
            raw: u16,
        }

        impl $wrapper {
            pub fn decode(raw: u16) -> Self {
                let decoded = <$flag>::from_bits_truncate(raw);
                let dropped = raw & !decoded.bits();
                if dropped != 0 {
                    warn!(
                        "{} mask {:#06x} sets unassigned bits {:#06x}, ignoring them",
                        stringify!($flag),
                        raw,
                        dropped
                    );
                }

                Self { decoded, raw }
            }

            pub fn has(&self, flag: $flag) -> bool {
                self.decoded.contains(flag)
            }

            /// The flags word exactly as it appeared in the class file,
            /// unassigned bits included.
            pub fn raw(&self) -> u16 {
                self.raw
            }
        }
    };
}

bitflags! {
    pub struct ClassFlag: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

bitflags! {
    pub struct FieldFlag: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    pub struct MethodFlag: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT_FP = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

access_flags!(ClassFlags over ClassFlag);
access_flags!(FieldFlags over FieldFlag);
access_flags!(MethodFlags over MethodFlag);
