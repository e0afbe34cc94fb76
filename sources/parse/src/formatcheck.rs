use crate::{
    attributes::Attributes,
    cfe,
    classfile::ClassFile,
    pool::{ConstantEntry, ConstantPool},
    result::ParseResult,
};

/// Cross-reference checks the streaming parser could not enforce.
///
/// Verifies that every symbolic entry in the constant pool points at an
/// in-range slot of the right kind, that the slot after each long or double
/// holds the reserved ghost, and that every name and descriptor referenced
/// by fields, methods and attributes is a valid Utf8 entry.
pub fn format_check(class: &ClassFile) -> ParseResult<()> {
    let pool = &class.constant_pool;
    check_constant_pool(pool)?;

    for field in &class.fields.values {
        pool.utf8_at(field.name_index)
            .map_err(|e| cfe!("field name does not resolve to Utf8: {}", e))?;
        pool.utf8_at(field.descriptor_index)
            .map_err(|e| cfe!("field descriptor does not resolve to Utf8: {}", e))?;

        check_attribute_names(pool, &field.attributes)?;
    }

    for method in &class.methods.values {
        pool.utf8_at(method.name_index)
            .map_err(|e| cfe!("method name does not resolve to Utf8: {}", e))?;
        pool.utf8_at(method.descriptor_index)
            .map_err(|e| cfe!("method descriptor does not resolve to Utf8: {}", e))?;

        check_attribute_names(pool, &method.attributes)?;
    }

    check_attribute_names(pool, &class.attributes)?;

    Ok(())
}

fn check_attribute_names(pool: &ConstantPool, attributes: &Attributes) -> ParseResult<()> {
    for attr in &attributes.values {
        pool.utf8_at(attr.name_index)
            .map_err(|e| cfe!("attribute name does not resolve to Utf8: {}", e))?;
    }

    Ok(())
}

fn check_constant_pool(pool: &ConstantPool) -> ParseResult<()> {
    for index in 1..pool.count() {
        // in range per the loop bound
        let entry = pool.entry_at(index).unwrap();

        match entry {
            ConstantEntry::Class(class) => {
                pool.utf8_at(class.name_index)
                    .map_err(|e| cfe!("Class entry @ {}: {}", index, e))?;
            }
            ConstantEntry::Field(member)
            | ConstantEntry::Method(member)
            | ConstantEntry::InterfaceMethod(member) => {
                pool.class_at(member.class_index)
                    .map_err(|e| cfe!("member reference @ {}: {}", index, e))?;
                pool.name_and_type_at(member.name_and_type_index)
                    .map_err(|e| cfe!("member reference @ {}: {}", index, e))?;
            }
            ConstantEntry::String { string_index } => {
                pool.utf8_at(*string_index)
                    .map_err(|e| cfe!("String entry @ {}: {}", index, e))?;
            }
            ConstantEntry::NameAndType(nat) => {
                pool.utf8_at(nat.name_index)
                    .map_err(|e| cfe!("NameAndType entry @ {}: {}", index, e))?;
                pool.utf8_at(nat.descriptor_index)
                    .map_err(|e| cfe!("NameAndType entry @ {}: {}", index, e))?;
            }
            ConstantEntry::MethodType { descriptor_index } => {
                pool.utf8_at(*descriptor_index)
                    .map_err(|e| cfe!("MethodType entry @ {}: {}", index, e))?;
            }
            ConstantEntry::Dynamic(dynamic) | ConstantEntry::InvokeDynamic(dynamic) => {
                pool.name_and_type_at(dynamic.name_and_type_index)
                    .map_err(|e| cfe!("dynamic entry @ {}: {}", index, e))?;
            }
            ConstantEntry::Long(_) | ConstantEntry::Double(_) => {
                // the second slot of a 64 bit constant is unusable
                match pool.entry_at(index + 1) {
                    Ok(ConstantEntry::Reserved) => {}
                    _ => {
                        return Err(cfe!(
                            "64 bit constant @ {} is not followed by its reserved slot",
                            index
                        ))
                    }
                }
            }
            ConstantEntry::Utf8(_)
            | ConstantEntry::Integer(_)
            | ConstantEntry::Float(_)
            | ConstantEntry::MethodHandle { .. }
            | ConstantEntry::Reserved => {}
        }
    }

    Ok(())
}
