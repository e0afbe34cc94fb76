//! Fixed per-opcode metadata: mnemonic, operand byte count, net stack
//! effect, and whether the byte names a defined instruction at all.
//!
//! The dispatch loop reads exactly `operands` bytes after each opcode and
//! uses the mnemonic in diagnostics. `stack_effect` is the net change in
//! operand stack depth; instructions whose effect depends on their operands
//! (invocations, the switch family, WIDE) declare zero here, as do the two
//! variable-length switch encodings for their operand count.

use crate::opcodes as op;

#[derive(Debug, Clone, Copy)]
pub struct BytecodeInfo {
    pub mnemonic: &'static str,
    pub operands: u8,
    pub stack_effect: i8,
    pub valid: bool,
}

const INVALID: BytecodeInfo = BytecodeInfo {
    mnemonic: "(invalid)",
    operands: 0,
    stack_effect: 0,
    valid: false,
};

const fn bc(mnemonic: &'static str, operands: u8, stack_effect: i8) -> BytecodeInfo {
    BytecodeInfo {
        mnemonic,
        operands,
        stack_effect,
        valid: true,
    }
}

pub fn info_for(opcode: u8) -> &'static BytecodeInfo {
    &BYTECODES[opcode as usize]
}

pub static BYTECODES: [BytecodeInfo; 256] = build_table();

const fn build_table() -> [BytecodeInfo; 256] {
    let mut t = [INVALID; 256];

    t[op::NOP as usize] = bc("NOP", 0, 0);
    t[op::ACONST_NULL as usize] = bc("ACONST_NULL", 0, 1);
    t[op::ICONST_M1 as usize] = bc("ICONST_M1", 0, 1);
    t[op::ICONST_0 as usize] = bc("ICONST_0", 0, 1);
    t[op::ICONST_1 as usize] = bc("ICONST_1", 0, 1);
    t[op::ICONST_2 as usize] = bc("ICONST_2", 0, 1);
    t[op::ICONST_3 as usize] = bc("ICONST_3", 0, 1);
    t[op::ICONST_4 as usize] = bc("ICONST_4", 0, 1);
    t[op::ICONST_5 as usize] = bc("ICONST_5", 0, 1);
    t[op::LCONST_0 as usize] = bc("LCONST_0", 0, 1);
    t[op::LCONST_1 as usize] = bc("LCONST_1", 0, 1);
    t[op::FCONST_0 as usize] = bc("FCONST_0", 0, 1);
    t[op::FCONST_1 as usize] = bc("FCONST_1", 0, 1);
    t[op::FCONST_2 as usize] = bc("FCONST_2", 0, 1);
    t[op::DCONST_0 as usize] = bc("DCONST_0", 0, 1);
    t[op::DCONST_1 as usize] = bc("DCONST_1", 0, 1);
    t[op::BIPUSH as usize] = bc("BIPUSH", 1, 1);
    t[op::SIPUSH as usize] = bc("SIPUSH", 2, 1);
    t[op::LDC as usize] = bc("LDC", 1, 1);
    t[op::LDC_W as usize] = bc("LDC_W", 2, 1);
    t[op::LDC2_W as usize] = bc("LDC2_W", 2, 1);

    t[op::ILOAD as usize] = bc("ILOAD", 1, 1);
    t[op::LLOAD as usize] = bc("LLOAD", 1, 1);
    t[op::FLOAD as usize] = bc("FLOAD", 1, 1);
    t[op::DLOAD as usize] = bc("DLOAD", 1, 1);
    t[op::ALOAD as usize] = bc("ALOAD", 1, 1);
    t[op::ILOAD_0 as usize] = bc("ILOAD_0", 0, 1);
    t[op::ILOAD_1 as usize] = bc("ILOAD_1", 0, 1);
    t[op::ILOAD_2 as usize] = bc("ILOAD_2", 0, 1);
    t[op::ILOAD_3 as usize] = bc("ILOAD_3", 0, 1);
    t[op::LLOAD_0 as usize] = bc("LLOAD_0", 0, 1);
    t[op::LLOAD_1 as usize] = bc("LLOAD_1", 0, 1);
    t[op::LLOAD_2 as usize] = bc("LLOAD_2", 0, 1);
    t[op::LLOAD_3 as usize] = bc("LLOAD_3", 0, 1);
    t[op::FLOAD_0 as usize] = bc("FLOAD_0", 0, 1);
    t[op::FLOAD_1 as usize] = bc("FLOAD_1", 0, 1);
    t[op::FLOAD_2 as usize] = bc("FLOAD_2", 0, 1);
    t[op::FLOAD_3 as usize] = bc("FLOAD_3", 0, 1);
    t[op::DLOAD_0 as usize] = bc("DLOAD_0", 0, 1);
    t[op::DLOAD_1 as usize] = bc("DLOAD_1", 0, 1);
    t[op::DLOAD_2 as usize] = bc("DLOAD_2", 0, 1);
    t[op::DLOAD_3 as usize] = bc("DLOAD_3", 0, 1);
    t[op::ALOAD_0 as usize] = bc("ALOAD_0", 0, 1);
    t[op::ALOAD_1 as usize] = bc("ALOAD_1", 0, 1);
    t[op::ALOAD_2 as usize] = bc("ALOAD_2", 0, 1);
    t[op::ALOAD_3 as usize] = bc("ALOAD_3", 0, 1);

    t[op::IALOAD as usize] = bc("IALOAD", 0, -1);
    t[op::LALOAD as usize] = bc("LALOAD", 0, -1);
    t[op::FALOAD as usize] = bc("FALOAD", 0, -1);
    t[op::DALOAD as usize] = bc("DALOAD", 0, -1);
    t[op::AALOAD as usize] = bc("AALOAD", 0, -1);
    t[op::BALOAD as usize] = bc("BALOAD", 0, -1);
    t[op::CALOAD as usize] = bc("CALOAD", 0, -1);
    t[op::SALOAD as usize] = bc("SALOAD", 0, -1);

    t[op::ISTORE as usize] = bc("ISTORE", 1, -1);
    t[op::LSTORE as usize] = bc("LSTORE", 1, -1);
    t[op::FSTORE as usize] = bc("FSTORE", 1, -1);
    t[op::DSTORE as usize] = bc("DSTORE", 1, -1);
    t[op::ASTORE as usize] = bc("ASTORE", 1, -1);
    t[op::ISTORE_0 as usize] = bc("ISTORE_0", 0, -1);
    t[op::ISTORE_1 as usize] = bc("ISTORE_1", 0, -1);
    t[op::ISTORE_2 as usize] = bc("ISTORE_2", 0, -1);
    t[op::ISTORE_3 as usize] = bc("ISTORE_3", 0, -1);
    t[op::LSTORE_0 as usize] = bc("LSTORE_0", 0, -1);
    t[op::LSTORE_1 as usize] = bc("LSTORE_1", 0, -1);
    t[op::LSTORE_2 as usize] = bc("LSTORE_2", 0, -1);
    t[op::LSTORE_3 as usize] = bc("LSTORE_3", 0, -1);
    t[op::FSTORE_0 as usize] = bc("FSTORE_0", 0, -1);
    t[op::FSTORE_1 as usize] = bc("FSTORE_1", 0, -1);
    t[op::FSTORE_2 as usize] = bc("FSTORE_2", 0, -1);
    t[op::FSTORE_3 as usize] = bc("FSTORE_3", 0, -1);
    t[op::DSTORE_0 as usize] = bc("DSTORE_0", 0, -1);
    t[op::DSTORE_1 as usize] = bc("DSTORE_1", 0, -1);
    t[op::DSTORE_2 as usize] = bc("DSTORE_2", 0, -1);
    t[op::DSTORE_3 as usize] = bc("DSTORE_3", 0, -1);
    t[op::ASTORE_0 as usize] = bc("ASTORE_0", 0, -1);
    t[op::ASTORE_1 as usize] = bc("ASTORE_1", 0, -1);
    t[op::ASTORE_2 as usize] = bc("ASTORE_2", 0, -1);
    t[op::ASTORE_3 as usize] = bc("ASTORE_3", 0, -1);

    t[op::IASTORE as usize] = bc("IASTORE", 0, -3);
    t[op::LASTORE as usize] = bc("LASTORE", 0, -3);
    t[op::FASTORE as usize] = bc("FASTORE", 0, -3);
    t[op::DASTORE as usize] = bc("DASTORE", 0, -3);
    t[op::AASTORE as usize] = bc("AASTORE", 0, -3);
    t[op::BASTORE as usize] = bc("BASTORE", 0, -3);
    t[op::CASTORE as usize] = bc("CASTORE", 0, -3);
    t[op::SASTORE as usize] = bc("SASTORE", 0, -3);

    t[op::POP as usize] = bc("POP", 0, -1);
    t[op::POP2 as usize] = bc("POP2", 0, -2);
    t[op::DUP as usize] = bc("DUP", 0, 1);
    t[op::DUP_X1 as usize] = bc("DUP_X1", 0, 1);
    t[op::DUP_X2 as usize] = bc("DUP_X2", 0, 1);
    t[op::DUP2 as usize] = bc("DUP2", 0, 2);
    t[op::DUP2_X1 as usize] = bc("DUP2_X1", 0, 2);
    t[op::DUP2_X2 as usize] = bc("DUP2_X2", 0, 2);
    t[op::SWAP as usize] = bc("SWAP", 0, 0);

    t[op::IADD as usize] = bc("IADD", 0, -1);
    t[op::LADD as usize] = bc("LADD", 0, -1);
    t[op::FADD as usize] = bc("FADD", 0, -1);
    t[op::DADD as usize] = bc("DADD", 0, -1);
    t[op::ISUB as usize] = bc("ISUB", 0, -1);
    t[op::LSUB as usize] = bc("LSUB", 0, -1);
    t[op::FSUB as usize] = bc("FSUB", 0, -1);
    t[op::DSUB as usize] = bc("DSUB", 0, -1);
    t[op::IMUL as usize] = bc("IMUL", 0, -1);
    t[op::LMUL as usize] = bc("LMUL", 0, -1);
    t[op::FMUL as usize] = bc("FMUL", 0, -1);
    t[op::DMUL as usize] = bc("DMUL", 0, -1);
    t[op::IDIV as usize] = bc("IDIV", 0, -1);
    t[op::LDIV as usize] = bc("LDIV", 0, -1);
    t[op::FDIV as usize] = bc("FDIV", 0, -1);
    t[op::DDIV as usize] = bc("DDIV", 0, -1);
    t[op::IREM as usize] = bc("IREM", 0, -1);
    t[op::LREM as usize] = bc("LREM", 0, -1);
    t[op::FREM as usize] = bc("FREM", 0, -1);
    t[op::DREM as usize] = bc("DREM", 0, -1);
    t[op::INEG as usize] = bc("INEG", 0, 0);
    t[op::LNEG as usize] = bc("LNEG", 0, 0);
    t[op::FNEG as usize] = bc("FNEG", 0, 0);
    t[op::DNEG as usize] = bc("DNEG", 0, 0);

    t[op::ISHL as usize] = bc("ISHL", 0, -1);
    t[op::LSHL as usize] = bc("LSHL", 0, -1);
    t[op::ISHR as usize] = bc("ISHR", 0, -1);
    t[op::LSHR as usize] = bc("LSHR", 0, -1);
    t[op::IUSHR as usize] = bc("IUSHR", 0, -1);
    t[op::LUSHR as usize] = bc("LUSHR", 0, -1);
    t[op::IAND as usize] = bc("IAND", 0, -1);
    t[op::LAND as usize] = bc("LAND", 0, -1);
    t[op::IOR as usize] = bc("IOR", 0, -1);
    t[op::LOR as usize] = bc("LOR", 0, -1);
    t[op::IXOR as usize] = bc("IXOR", 0, -1);
    t[op::LXOR as usize] = bc("LXOR", 0, -1);
    t[op::IINC as usize] = bc("IINC", 2, 0);

    t[op::I2L as usize] = bc("I2L", 0, 0);
    t[op::I2F as usize] = bc("I2F", 0, 0);
    t[op::I2D as usize] = bc("I2D", 0, 0);
    t[op::L2I as usize] = bc("L2I", 0, 0);
    t[op::L2F as usize] = bc("L2F", 0, 0);
    t[op::L2D as usize] = bc("L2D", 0, 0);
    t[op::F2I as usize] = bc("F2I", 0, 0);
    t[op::F2L as usize] = bc("F2L", 0, 0);
    t[op::F2D as usize] = bc("F2D", 0, 0);
    t[op::D2I as usize] = bc("D2I", 0, 0);
    t[op::D2L as usize] = bc("D2L", 0, 0);
    t[op::D2F as usize] = bc("D2F", 0, 0);
    t[op::I2B as usize] = bc("I2B", 0, 0);
    t[op::I2C as usize] = bc("I2C", 0, 0);
    t[op::I2S as usize] = bc("I2S", 0, 0);

    t[op::LCMP as usize] = bc("LCMP", 0, -1);
    t[op::FCMPL as usize] = bc("FCMPL", 0, -1);
    t[op::FCMPG as usize] = bc("FCMPG", 0, -1);
    t[op::DCMPL as usize] = bc("DCMPL", 0, -1);
    t[op::DCMPG as usize] = bc("DCMPG", 0, -1);
    t[op::IFEQ as usize] = bc("IFEQ", 2, -1);
    t[op::IFNE as usize] = bc("IFNE", 2, -1);
    t[op::IFLT as usize] = bc("IFLT", 2, -1);
    t[op::IFGE as usize] = bc("IFGE", 2, -1);
    t[op::IFGT as usize] = bc("IFGT", 2, -1);
    t[op::IFLE as usize] = bc("IFLE", 2, -1);
    t[op::IF_ICMPEQ as usize] = bc("IF_ICMPEQ", 2, -2);
    t[op::IF_ICMPNE as usize] = bc("IF_ICMPNE", 2, -2);
    t[op::IF_ICMPLT as usize] = bc("IF_ICMPLT", 2, -2);
    t[op::IF_ICMPGE as usize] = bc("IF_ICMPGE", 2, -2);
    t[op::IF_ICMPGT as usize] = bc("IF_ICMPGT", 2, -2);
    t[op::IF_ICMPLE as usize] = bc("IF_ICMPLE", 2, -2);
    t[op::IF_ACMPEQ as usize] = bc("IF_ACMPEQ", 2, -2);
    t[op::IF_ACMPNE as usize] = bc("IF_ACMPNE", 2, -2);

    t[op::GOTO as usize] = bc("GOTO", 2, 0);
    t[op::JSR as usize] = bc("JSR", 2, 1);
    t[op::RET as usize] = bc("RET", 1, 0);
    t[op::TABLESWITCH as usize] = bc("TABLESWITCH", 0, -1);
    t[op::LOOKUPSWITCH as usize] = bc("LOOKUPSWITCH", 0, -1);
    t[op::IRETURN as usize] = bc("IRETURN", 0, -1);
    t[op::LRETURN as usize] = bc("LRETURN", 0, -1);
    t[op::FRETURN as usize] = bc("FRETURN", 0, -1);
    t[op::DRETURN as usize] = bc("DRETURN", 0, -1);
    t[op::ARETURN as usize] = bc("ARETURN", 0, -1);
    t[op::RETURN as usize] = bc("RETURN", 0, 0);

    t[op::GETSTATIC as usize] = bc("GETSTATIC", 2, 1);
    t[op::PUTSTATIC as usize] = bc("PUTSTATIC", 2, -1);
    t[op::GETFIELD as usize] = bc("GETFIELD", 2, 0);
    t[op::PUTFIELD as usize] = bc("PUTFIELD", 2, -2);
    t[op::INVOKEVIRTUAL as usize] = bc("INVOKEVIRTUAL", 2, 0);
    t[op::INVOKESPECIAL as usize] = bc("INVOKESPECIAL", 2, 0);
    t[op::INVOKESTATIC as usize] = bc("INVOKESTATIC", 2, 0);
    t[op::INVOKEINTERFACE as usize] = bc("INVOKEINTERFACE", 4, 0);
    t[op::INVOKEDYNAMIC as usize] = bc("INVOKEDYNAMIC", 4, 0);
    t[op::NEW as usize] = bc("NEW", 2, 1);
    t[op::NEWARRAY as usize] = bc("NEWARRAY", 1, 0);
    t[op::ANEWARRAY as usize] = bc("ANEWARRAY", 2, 0);
    t[op::ARRAYLENGTH as usize] = bc("ARRAYLENGTH", 0, 0);
    t[op::ATHROW as usize] = bc("ATHROW", 0, 0);
    t[op::CHECKCAST as usize] = bc("CHECKCAST", 2, 0);
    t[op::INSTANCEOF as usize] = bc("INSTANCEOF", 2, 0);
    t[op::MONITORENTER as usize] = bc("MONITORENTER", 0, -1);
    t[op::MONITOREXIT as usize] = bc("MONITOREXIT", 0, -1);

    t[op::WIDE as usize] = bc("WIDE", 0, 0);
    t[op::MULTIANEWARRAY as usize] = bc("MULTIANEWARRAY", 3, 0);
    t[op::IFNULL as usize] = bc("IFNULL", 2, -1);
    t[op::IFNONNULL as usize] = bc("IFNONNULL", 2, -1);
    t[op::GOTO_W as usize] = bc("GOTO_W", 4, 0);
    t[op::JSR_W as usize] = bc("JSR_W", 4, 1);
    t[op::BREAKPOINT as usize] = bc("BREAKPOINT", 0, 0);

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defines_the_full_instruction_range() {
        for opcode in 0x00..=0xCA_usize {
            assert!(BYTECODES[opcode].valid, "opcode {opcode:#04x} undefined");
        }
    }

    #[test]
    fn it_marks_everything_else_invalid() {
        for opcode in 0xCB..=0xFF_usize {
            assert!(!BYTECODES[opcode].valid, "opcode {opcode:#04x} defined");
        }
    }

    #[test]
    fn it_declares_operand_widths() {
        assert_eq!(info_for(op::BIPUSH).operands, 1);
        assert_eq!(info_for(op::SIPUSH).operands, 2);
        assert_eq!(info_for(op::GOTO).operands, 2);
        assert_eq!(info_for(op::IINC).operands, 2);
        assert_eq!(info_for(op::IADD).operands, 0);
        assert_eq!(info_for(op::MULTIANEWARRAY).operands, 3);
    }

    #[test]
    fn it_names_instructions() {
        assert_eq!(info_for(op::NEWARRAY).mnemonic, "NEWARRAY");
        assert_eq!(info_for(0xFC).mnemonic, "(invalid)");
    }
}
