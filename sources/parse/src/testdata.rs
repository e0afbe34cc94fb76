//! A complete, well-formed class file used by parser and format checker
//! tests. `HaveInterface` implements `java/io/Serializable` and
//! `java/lang/Runnable`, declares five methods and no fields, and carries a
//! single `SourceFile` class attribute. Compare with `javap -v` output when
//! extending the assertions.

pub(crate) const HAVE_INTERFACE: &[u8] = &[
    0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x37, 0x00, 0x28, 0x0A, 0x00, 0x0A, 0x00, 0x1C, 0x07,
    0x00, 0x1D, 0x0A, 0x00, 0x02, 0x00, 0x1C, 0x07, 0x00, 0x1E, 0x0A, 0x00, 0x04, 0x00, 0x1C, 0x07,
    0x00, 0x1F, 0x08, 0x00, 0x20, 0x0A, 0x00, 0x06, 0x00, 0x21, 0x07, 0x00, 0x22, 0x07, 0x00, 0x23,
    0x07, 0x00, 0x24, 0x07, 0x00, 0x25, 0x01, 0x00, 0x06, 0x3C, 0x69, 0x6E, 0x69, 0x74, 0x3E, 0x01,
    0x00, 0x03, 0x28, 0x29, 0x56, 0x01, 0x00, 0x04, 0x43, 0x6F, 0x64, 0x65, 0x01, 0x00, 0x0F, 0x4C,
    0x69, 0x6E, 0x65, 0x4E, 0x75, 0x6D, 0x62, 0x65, 0x72, 0x54, 0x61, 0x62, 0x6C, 0x65, 0x01, 0x00,
    0x0B, 0x77, 0x72, 0x69, 0x74, 0x65, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, 0x01, 0x00, 0x1F, 0x28,
    0x4C, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x69, 0x6F, 0x2F, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, 0x4F,
    0x75, 0x74, 0x70, 0x75, 0x74, 0x53, 0x74, 0x72, 0x65, 0x61, 0x6D, 0x3B, 0x29, 0x56, 0x01, 0x00,
    0x0A, 0x45, 0x78, 0x63, 0x65, 0x70, 0x74, 0x69, 0x6F, 0x6E, 0x73, 0x01, 0x00, 0x0A, 0x72, 0x65,
    0x61, 0x64, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, 0x01, 0x00, 0x1E, 0x28, 0x4C, 0x6A, 0x61, 0x76,
    0x61, 0x2F, 0x69, 0x6F, 0x2F, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, 0x49, 0x6E, 0x70, 0x75, 0x74,
    0x53, 0x74, 0x72, 0x65, 0x61, 0x6D, 0x3B, 0x29, 0x56, 0x01, 0x00, 0x0D, 0x53, 0x74, 0x61, 0x63,
    0x6B, 0x4D, 0x61, 0x70, 0x54, 0x61, 0x62, 0x6C, 0x65, 0x01, 0x00, 0x03, 0x72, 0x75, 0x6E, 0x01,
    0x00, 0x10, 0x72, 0x65, 0x61, 0x64, 0x4F, 0x62, 0x6A, 0x65, 0x63, 0x74, 0x4E, 0x6F, 0x44, 0x61,
    0x74, 0x61, 0x07, 0x00, 0x26, 0x01, 0x00, 0x0A, 0x53, 0x6F, 0x75, 0x72, 0x63, 0x65, 0x46, 0x69,
    0x6C, 0x65, 0x01, 0x00, 0x12, 0x48, 0x61, 0x76, 0x65, 0x49, 0x6E, 0x74, 0x65, 0x72, 0x66, 0x61,
    0x63, 0x65, 0x2E, 0x6A, 0x61, 0x76, 0x61, 0x0C, 0x00, 0x0D, 0x00, 0x0E, 0x01, 0x00, 0x13, 0x6A,
    0x61, 0x76, 0x61, 0x2F, 0x69, 0x6F, 0x2F, 0x49, 0x4F, 0x45, 0x78, 0x63, 0x65, 0x70, 0x74, 0x69,
    0x6F, 0x6E, 0x01, 0x00, 0x20, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, 0x67, 0x2F, 0x43,
    0x6C, 0x61, 0x73, 0x73, 0x4E, 0x6F, 0x74, 0x46, 0x6F, 0x75, 0x6E, 0x64, 0x45, 0x78, 0x63, 0x65,
    0x70, 0x74, 0x69, 0x6F, 0x6E, 0x01, 0x00, 0x1D, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x69, 0x6F, 0x2F,
    0x49, 0x6E, 0x76, 0x61, 0x6C, 0x69, 0x64, 0x43, 0x6C, 0x61, 0x73, 0x73, 0x45, 0x78, 0x63, 0x65,
    0x70, 0x74, 0x69, 0x6F, 0x6E, 0x01, 0x00, 0x04, 0x74, 0x65, 0x73, 0x74, 0x0C, 0x00, 0x0D, 0x00,
    0x27, 0x01, 0x00, 0x0D, 0x48, 0x61, 0x76, 0x65, 0x49, 0x6E, 0x74, 0x65, 0x72, 0x66, 0x61, 0x63,
    0x65, 0x01, 0x00, 0x10, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, 0x67, 0x2F, 0x4F, 0x62,
    0x6A, 0x65, 0x63, 0x74, 0x01, 0x00, 0x14, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x69, 0x6F, 0x2F, 0x53,
    0x65, 0x72, 0x69, 0x61, 0x6C, 0x69, 0x7A, 0x61, 0x62, 0x6C, 0x65, 0x01, 0x00, 0x12, 0x6A, 0x61,
    0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, 0x67, 0x2F, 0x52, 0x75, 0x6E, 0x6E, 0x61, 0x62, 0x6C, 0x65,
    0x01, 0x00, 0x1D, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x69, 0x6F, 0x2F, 0x4F, 0x62, 0x6A, 0x65, 0x63,
    0x74, 0x53, 0x74, 0x72, 0x65, 0x61, 0x6D, 0x45, 0x78, 0x63, 0x65, 0x70, 0x74, 0x69, 0x6F, 0x6E,
    0x01, 0x00, 0x15, 0x28, 0x4C, 0x6A, 0x61, 0x76, 0x61, 0x2F, 0x6C, 0x61, 0x6E, 0x67, 0x2F, 0x53,
    0x74, 0x72, 0x69, 0x6E, 0x67, 0x3B, 0x29, 0x56, 0x00, 0x21, 0x00, 0x09, 0x00, 0x0A, 0x00, 0x02,
    0x00, 0x0B, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x05, 0x00, 0x01, 0x00, 0x0D, 0x00, 0x0E, 0x00, 0x01,
    0x00, 0x0F, 0x00, 0x00, 0x00, 0x1D, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x05, 0x2A, 0xB7,
    0x00, 0x01, 0xB1, 0x00, 0x00, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00,
    0x00, 0x00, 0x08, 0x00, 0x02, 0x00, 0x11, 0x00, 0x12, 0x00, 0x02, 0x00, 0x0F, 0x00, 0x00, 0x00,
    0x20, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00, 0x08, 0xBB, 0x00, 0x02, 0x59, 0xB7, 0x00, 0x03,
    0xBF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x0A, 0x00, 0x13, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x02, 0x00, 0x02, 0x00, 0x14, 0x00,
    0x15, 0x00, 0x02, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x47, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00,
    0x17, 0x06, 0x3D, 0x1C, 0x05, 0xA4, 0x00, 0x0B, 0xBB, 0x00, 0x02, 0x59, 0xB7, 0x00, 0x03, 0xBF,
    0xBB, 0x00, 0x04, 0x59, 0xB7, 0x00, 0x05, 0xBF, 0x00, 0x00, 0x00, 0x02, 0x00, 0x10, 0x00, 0x00,
    0x00, 0x12, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0D, 0x00, 0x02, 0x00, 0x0E, 0x00, 0x07, 0x00, 0x0F,
    0x00, 0x0F, 0x00, 0x11, 0x00, 0x16, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0xFC, 0x00, 0x0F, 0x01,
    0x00, 0x13, 0x00, 0x00, 0x00, 0x06, 0x00, 0x02, 0x00, 0x02, 0x00, 0x04, 0x00, 0x01, 0x00, 0x17,
    0x00, 0x0E, 0x00, 0x01, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x19, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
    0x00, 0x01, 0xB1, 0x00, 0x00, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00,
    0x00, 0x00, 0x15, 0x00, 0x02, 0x00, 0x18, 0x00, 0x0E, 0x00, 0x02, 0x00, 0x0F, 0x00, 0x00, 0x00,
    0x22, 0x00, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0A, 0xBB, 0x00, 0x06, 0x59, 0x12, 0x07, 0xB7,
    0x00, 0x08, 0xBF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00,
    0x00, 0x00, 0x19, 0x00, 0x13, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x19, 0x00, 0x01, 0x00,
    0x1A, 0x00, 0x00, 0x00, 0x02, 0x00, 0x1B,
];
