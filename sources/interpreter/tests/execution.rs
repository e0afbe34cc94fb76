use std::rc::Rc;

use parking_lot::Mutex;

use interpreter::{
    frames::{Frame, FrameStack},
    globals::Globals,
    interpreter::{run_frame, run_native},
    mtable::{MTableEntry, MethodTable},
    opcodes as op,
    thread::VmThread,
    value::Value,
};

/// Sum the integers 1..=5 with a counting loop, then leave the total on the
/// operand stack:
///
/// ```text
///  0: iconst_0        // sum = 0
///  1: istore_0
///  2: iconst_1        // i = 1
///  3: istore_1
///  4: iload_0         // loop: sum += i
///  5: iload_1
///  6: iadd
///  7: istore_0
///  8: iinc 1, 1       // i += 1
/// 11: iload_1
/// 12: bipush 5
/// 14: if_icmple -10   // while i <= 5
/// 17: iload_0
/// 18: return
/// ```
#[test]
fn it_runs_a_counting_loop_to_completion() {
    let code = vec![
        op::ICONST_0,
        op::ISTORE_0,
        op::ICONST_1,
        op::ISTORE_1,
        op::ILOAD_0,
        op::ILOAD_1,
        op::IADD,
        op::ISTORE_0,
        op::IINC,
        1,
        1,
        op::ILOAD_1,
        op::BIPUSH,
        5,
        op::IF_ICMPLE,
        0xFF,
        0xF6, // offset -10, back to the loop head
        op::ILOAD_0,
        op::RETURN,
    ];

    let globals = Globals::new("test");
    let mut thread = VmThread::create(&globals);

    let mut frame = Frame::new(4);
    frame.class_name = "LoopTest".to_string();
    frame.method_name = "sum".to_string();
    frame.code = code;
    frame.locals = vec![Value::Int(0), Value::Int(0)];

    let frame = Rc::new(Mutex::new(frame));
    thread.stack.push_front(Rc::clone(&frame));

    run_frame(&globals, &mut thread.stack).unwrap();

    // RETURN popped the frame off the stack
    assert!(thread.stack.is_empty());

    let mut frame = frame.lock();
    assert_eq!(frame.pop().unwrap().integer(), Some(15));
    assert_eq!(frame.locals[0].integer(), Some(15));
    assert_eq!(frame.locals[1].integer(), Some(6));
}

/// A callee frame computes a quotient and returns it into its caller, which
/// keeps running afterwards.
#[test]
fn it_threads_return_values_through_the_frame_stack() {
    let globals = Globals::new("test");
    let mut fs = FrameStack::new();

    // caller doubles whatever lands on its stack
    let mut caller = Frame::new(4);
    caller.code = vec![op::ICONST_2, op::IMUL, op::RETURN];
    let caller = Rc::new(Mutex::new(caller));
    fs.push_front(Rc::clone(&caller));

    // callee pushes 10 and returns it
    let mut callee = Frame::new(4);
    callee.code = vec![op::BIPUSH, 10, op::IRETURN];
    fs.push_front(Rc::new(Mutex::new(callee)));

    run_frame(&globals, &mut fs).unwrap();

    assert!(fs.is_empty());
    let mut caller = caller.lock();
    assert_eq!(caller.pop().unwrap().integer(), Some(20));
}

#[test]
fn it_invokes_registered_natives_against_a_live_frame() {
    let table = MethodTable::new();
    table.register_natives();

    let entry = table
        .lookup_required("java/io/PrintStream.println(I)V")
        .unwrap();

    let mut frame = Frame::new(2);
    frame.push(Value::Int(42));

    match entry {
        MTableEntry::Native(gmeth) => run_native(&mut frame, &gmeth).unwrap(),
        other => panic!("expected a native stand-in, got {other:?}"),
    }

    // println consumed its argument and pushed nothing back
    assert_eq!(frame.tos(), -1);
}
