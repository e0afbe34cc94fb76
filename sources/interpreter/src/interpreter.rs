use std::rc::Rc;

use parking_lot::Mutex;
use tracing::error;

use crate::{
    arrays::{self, JavaArray},
    bytecode,
    error::VmError,
    frames::{Frame, FrameStack},
    globals::Globals,
    internal,
    mtable::GMeth,
    opcodes as op,
    value::Value,
};

/// What one executed instruction does to control flow.
enum Progression {
    /// Fall through: advance past this instruction and its operands.
    Next,
    /// Transfer relative to the opcode's own address.
    JumpRel(i32),
    /// Pop this frame; a carried value lands on the caller's operand stack.
    Return(Option<Value>),
}

/// Drive the frontmost frame of `fs` until the stack empties, the front
/// frame runs off the end of its code, or an unrecoverable error surfaces.
///
/// Each iteration fetches the byte at `pc`, consults the bytecode table for
/// validity and operand width, executes the instruction, and advances `pc`
/// by one plus the operand count unless the instruction transferred control
/// itself.
pub fn run_frame(globals: &Globals, fs: &mut FrameStack) -> Result<(), VmError> {
    loop {
        let Some(frame_ref) = fs.front() else {
            return Ok(());
        };
        let mut frame = frame_ref.lock();

        if frame.pc < 0 || frame.pc as usize >= frame.code.len() {
            return Ok(());
        }

        let opcode = frame.code[frame.pc as usize];
        let info = bytecode::info_for(opcode);
        if !info.valid {
            error!(
                "Invalid bytecode {:#04x} in {}.{}",
                opcode, frame.class_name, frame.method_name
            );
            return Err(VmError::InvalidBytecode {
                opcode,
                class_name: frame.class_name.clone(),
                method_name: frame.method_name.clone(),
            });
        }

        match execute(globals, &mut frame, opcode)? {
            Progression::Next => frame.pc += 1 + i32::from(info.operands),
            Progression::JumpRel(offset) => frame.pc += offset,
            Progression::Return(value) => {
                drop(frame);
                fs.pop_front();

                if let Some(value) = value {
                    match fs.front() {
                        Some(caller) => caller.lock().push(value),
                        None => return Ok(()),
                    }
                }
            }
        }
    }
}

/// Pop the stand-in's argument slots and hand them to the host function.
/// The topmost slot becomes the last argument. Any result is delivered by
/// the host pushing onto `frame`'s operand stack; nothing comes back here.
pub fn run_native(frame: &mut Frame, gmeth: &GMeth) -> Result<(), VmError> {
    let mut args = Vec::with_capacity(gmeth.param_slots);
    for _ in 0..gmeth.param_slots {
        args.push(frame.pop()?);
    }
    args.reverse();

    (gmeth.func)(frame, args);
    Ok(())
}

fn arithmetic_exception(frame: &Frame) -> VmError {
    error!(
        "Arithmetic Exception: division by zero in {}.{}",
        frame.class_name, frame.method_name
    );

    VmError::Arithmetic {
        class_name: frame.class_name.clone(),
        method_name: frame.method_name.clone(),
    }
}

fn execute(globals: &Globals, frame: &mut Frame, opcode: u8) -> Result<Progression, VmError> {
    Ok(match opcode {
        op::NOP => Progression::Next,

        // ---- constants ----
        op::ACONST_NULL => {
            frame.push(Value::Null);
            Progression::Next
        }
        op::ICONST_M1 => {
            frame.push(Value::Int(-1));
            Progression::Next
        }
        op::ICONST_0 => {
            frame.push(Value::Int(0));
            Progression::Next
        }
        op::ICONST_1 => {
            frame.push(Value::Int(1));
            Progression::Next
        }
        op::ICONST_2 => {
            frame.push(Value::Int(2));
            Progression::Next
        }
        op::ICONST_3 => {
            frame.push(Value::Int(3));
            Progression::Next
        }
        op::ICONST_4 => {
            frame.push(Value::Int(4));
            Progression::Next
        }
        op::ICONST_5 => {
            frame.push(Value::Int(5));
            Progression::Next
        }
        op::LCONST_0 => {
            frame.push(Value::Long(0));
            Progression::Next
        }
        op::LCONST_1 => {
            frame.push(Value::Long(1));
            Progression::Next
        }
        op::FCONST_0 => {
            frame.push(Value::Float(0.0));
            Progression::Next
        }
        op::FCONST_1 => {
            frame.push(Value::Float(1.0));
            Progression::Next
        }
        op::FCONST_2 => {
            frame.push(Value::Float(2.0));
            Progression::Next
        }
        op::DCONST_0 => {
            frame.push(Value::Double(0.0));
            Progression::Next
        }
        op::DCONST_1 => {
            frame.push(Value::Double(1.0));
            Progression::Next
        }
        op::BIPUSH => {
            let value = frame.operand_i8(1)?;
            frame.push(Value::Int(i64::from(value)));
            Progression::Next
        }
        op::SIPUSH => {
            let value = frame.operand_i16(1)?;
            frame.push(Value::Int(i64::from(value)));
            Progression::Next
        }
        op::LDC => {
            // TODO: resolve through the constant pool; for now the index
            // byte itself is pushed as an int
            let index = frame.operand_u8(1)?;
            frame.push(Value::Int(i64::from(index)));
            Progression::Next
        }

        // ---- loads ----
        op::ILOAD | op::LLOAD | op::FLOAD | op::DLOAD | op::ALOAD => {
            let index = frame.operand_u8(1)? as usize;
            let local = frame.local(index)?;
            frame.push(local);
            Progression::Next
        }
        op::ILOAD_0 | op::LLOAD_0 | op::FLOAD_0 | op::DLOAD_0 | op::ALOAD_0 => {
            let local = frame.local(0)?;
            frame.push(local);
            Progression::Next
        }
        op::ILOAD_1 | op::LLOAD_1 | op::FLOAD_1 | op::DLOAD_1 | op::ALOAD_1 => {
            let local = frame.local(1)?;
            frame.push(local);
            Progression::Next
        }
        op::ILOAD_2 | op::LLOAD_2 | op::FLOAD_2 | op::DLOAD_2 | op::ALOAD_2 => {
            let local = frame.local(2)?;
            frame.push(local);
            Progression::Next
        }
        op::ILOAD_3 | op::LLOAD_3 | op::FLOAD_3 | op::DLOAD_3 | op::ALOAD_3 => {
            let local = frame.local(3)?;
            frame.push(local);
            Progression::Next
        }

        // ---- stores ----
        // long and double stores fill two consecutive local slots with the
        // same wide value
        op::ISTORE | op::FSTORE | op::ASTORE => {
            let index = frame.operand_u8(1)? as usize;
            let value = frame.pop()?;
            frame.set_local(index, value);
            Progression::Next
        }
        op::LSTORE | op::DSTORE => {
            let index = frame.operand_u8(1)? as usize;
            let value = frame.pop()?;
            frame.set_local(index, value.clone());
            frame.set_local(index + 1, value);
            Progression::Next
        }
        op::ISTORE_0 | op::FSTORE_0 | op::ASTORE_0 => {
            let value = frame.pop()?;
            frame.set_local(0, value);
            Progression::Next
        }
        op::ISTORE_1 | op::FSTORE_1 | op::ASTORE_1 => {
            let value = frame.pop()?;
            frame.set_local(1, value);
            Progression::Next
        }
        op::ISTORE_2 | op::FSTORE_2 | op::ASTORE_2 => {
            let value = frame.pop()?;
            frame.set_local(2, value);
            Progression::Next
        }
        op::ISTORE_3 | op::FSTORE_3 | op::ASTORE_3 => {
            let value = frame.pop()?;
            frame.set_local(3, value);
            Progression::Next
        }
        op::LSTORE_0 | op::DSTORE_0 => {
            let value = frame.pop()?;
            frame.set_local(0, value.clone());
            frame.set_local(1, value);
            Progression::Next
        }
        op::LSTORE_1 | op::DSTORE_1 => {
            let value = frame.pop()?;
            frame.set_local(1, value.clone());
            frame.set_local(2, value);
            Progression::Next
        }
        op::LSTORE_2 | op::DSTORE_2 => {
            let value = frame.pop()?;
            frame.set_local(2, value.clone());
            frame.set_local(3, value);
            Progression::Next
        }
        op::LSTORE_3 | op::DSTORE_3 => {
            let value = frame.pop()?;
            frame.set_local(3, value.clone());
            frame.set_local(4, value);
            Progression::Next
        }

        // ---- operand stack manipulation ----
        op::POP => {
            frame.pop()?;
            Progression::Next
        }
        op::POP2 => {
            frame.pop()?;
            frame.pop()?;
            Progression::Next
        }
        op::DUP => {
            let a = frame.pop()?;
            frame.push(a.clone());
            frame.push(a);
            Progression::Next
        }
        op::DUP_X1 => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            frame.push(a.clone());
            frame.push(b);
            frame.push(a);
            Progression::Next
        }
        op::DUP_X2 => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            let c = frame.pop()?;
            frame.push(a.clone());
            frame.push(c);
            frame.push(b);
            frame.push(a);
            Progression::Next
        }
        op::DUP2 => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            frame.push(b.clone());
            frame.push(a.clone());
            frame.push(b);
            frame.push(a);
            Progression::Next
        }
        op::DUP2_X1 => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            let c = frame.pop()?;
            frame.push(b.clone());
            frame.push(a.clone());
            frame.push(c);
            frame.push(b);
            frame.push(a);
            Progression::Next
        }
        op::DUP2_X2 => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            let c = frame.pop()?;
            let d = frame.pop()?;
            frame.push(b.clone());
            frame.push(a.clone());
            frame.push(d);
            frame.push(c);
            frame.push(b);
            frame.push(a);
            Progression::Next
        }
        op::SWAP => {
            let a = frame.pop()?;
            let b = frame.pop()?;
            frame.push(a);
            frame.push(b);
            Progression::Next
        }

        // ---- arithmetic ----
        op::IADD => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1.wrapping_add(v2)));
            Progression::Next
        }
        op::LADD => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1.wrapping_add(v2)));
            Progression::Next
        }
        op::ISUB => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1.wrapping_sub(v2)));
            Progression::Next
        }
        op::LSUB => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1.wrapping_sub(v2)));
            Progression::Next
        }
        op::IMUL => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1.wrapping_mul(v2)));
            Progression::Next
        }
        op::LMUL => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1.wrapping_mul(v2)));
            Progression::Next
        }
        op::IDIV => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            if v2 == 0 {
                return Err(arithmetic_exception(frame));
            }
            frame.push(Value::Int(v1.wrapping_div(v2)));
            Progression::Next
        }
        op::LDIV => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            if v2 == 0 {
                return Err(arithmetic_exception(frame));
            }
            frame.push(Value::Long(v1.wrapping_div(v2)));
            Progression::Next
        }
        op::IREM => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            if v2 == 0 {
                return Err(arithmetic_exception(frame));
            }
            frame.push(Value::Int(v1.wrapping_rem(v2)));
            Progression::Next
        }
        op::LREM => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            if v2 == 0 {
                return Err(arithmetic_exception(frame));
            }
            frame.push(Value::Long(v1.wrapping_rem(v2)));
            Progression::Next
        }
        op::INEG => {
            let value = frame.pop_integer()?;
            frame.push(Value::Int(value.wrapping_neg()));
            Progression::Next
        }
        op::LNEG => {
            let value = frame.pop_integer()?;
            frame.push(Value::Long(value.wrapping_neg()));
            Progression::Next
        }

        // ---- shifts and boolean logic ----
        // int shifts mask the distance to 5 bits and work on the 32 bit
        // view; long shifts mask to 6 bits
        op::ISHL => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            let result = (v1 as i32).wrapping_shl((v2 & 0x1f) as u32);
            frame.push(Value::Int(i64::from(result)));
            Progression::Next
        }
        op::ISHR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            let result = (v1 as i32).wrapping_shr((v2 & 0x1f) as u32);
            frame.push(Value::Int(i64::from(result)));
            Progression::Next
        }
        op::IUSHR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            let result = ((v1 as i32 as u32) >> ((v2 & 0x1f) as u32)) as i32;
            frame.push(Value::Int(i64::from(result)));
            Progression::Next
        }
        op::LSHL => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1.wrapping_shl((v2 & 0x3f) as u32)));
            Progression::Next
        }
        op::LSHR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1.wrapping_shr((v2 & 0x3f) as u32)));
            Progression::Next
        }
        op::LUSHR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            let result = ((v1 as u64) >> ((v2 & 0x3f) as u64)) as i64;
            frame.push(Value::Long(result));
            Progression::Next
        }
        op::IAND => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1 & v2));
            Progression::Next
        }
        op::LAND => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1 & v2));
            Progression::Next
        }
        op::IOR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1 | v2));
            Progression::Next
        }
        op::LOR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1 | v2));
            Progression::Next
        }
        op::IXOR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Int(v1 ^ v2));
            Progression::Next
        }
        op::LXOR => {
            let v2 = frame.pop_integer()?;
            let v1 = frame.pop_integer()?;
            frame.push(Value::Long(v1 ^ v2));
            Progression::Next
        }
        op::IINC => {
            let index = frame.operand_u8(1)? as usize;
            let delta = i64::from(frame.operand_i8(2)?);
            let value = frame
                .local(index)?
                .integer()
                .ok_or_else(|| internal!("IINC on a non-integer local @ {}", index))?;
            frame.set_local(index, Value::Int(value.wrapping_add(delta)));
            Progression::Next
        }

        // ---- control transfer ----
        op::GOTO => {
            let offset = frame.operand_i16(1)?;
            Progression::JumpRel(i32::from(offset))
        }
        op::IF_ICMPEQ => branch_icmp(frame, |v1, v2| v1 == v2)?,
        op::IF_ICMPNE => branch_icmp(frame, |v1, v2| v1 != v2)?,
        op::IF_ICMPLT => branch_icmp(frame, |v1, v2| v1 < v2)?,
        op::IF_ICMPGE => branch_icmp(frame, |v1, v2| v1 >= v2)?,
        op::IF_ICMPGT => branch_icmp(frame, |v1, v2| v1 > v2)?,
        op::IF_ICMPLE => branch_icmp(frame, |v1, v2| v1 <= v2)?,

        // ---- returns ----
        op::RETURN => Progression::Return(None),
        op::IRETURN | op::LRETURN | op::FRETURN | op::DRETURN | op::ARETURN => {
            let value = frame.pop()?;
            Progression::Return(Some(value))
        }

        // ---- arrays ----
        op::NEWARRAY => {
            let tag = frame.operand_u8(1)?;
            let count = frame.pop_integer()?;
            if count < 0 {
                return Err(internal!("negative array size {}", count));
            }

            let kind = arrays::kind_for_jdk_tag(tag);
            let array = JavaArray::zeroed(kind, count as usize)
                .ok_or_else(|| internal!("unknown array element type tag {}", tag))?;

            let array = Rc::new(Mutex::new(array));
            globals.register_array(Rc::clone(&array));
            frame.push(Value::Ref(array));
            Progression::Next
        }
        op::ARRAYLENGTH => {
            let value = frame.pop()?;
            let array = value
                .as_ref()
                .ok_or_else(|| internal!("ARRAYLENGTH on a non-array slot"))?;
            let length = array.lock().len() as i64;
            frame.push(Value::Int(length));
            Progression::Next
        }

        _ => {
            return Err(internal!(
                "bytecode {} is not implemented",
                bytecode::info_for(opcode).mnemonic
            ))
        }
    })
}

/// Pop val2 then val1, branch by the opcode's offset when `predicate(val1,
/// val2)` holds, fall through otherwise.
fn branch_icmp(
    frame: &mut Frame,
    predicate: fn(i64, i64) -> bool,
) -> Result<Progression, VmError> {
    let v2 = frame.pop_integer()?;
    let v1 = frame.pop_integer()?;

    if predicate(v1, v2) {
        let offset = frame.operand_i16(1)?;
        Ok(Progression::JumpRel(i32::from(offset)))
    } else {
        Ok(Progression::Next)
    }
}
