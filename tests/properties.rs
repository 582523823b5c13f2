mod common;

use hackvm::{
    event::Event,
    ErrorKind,
};

use common::ram;

use std::cell::RefCell;
use std::rc::Rc;

const BASES: &[(u16, i16)] = &[(1, 300), (2, 400), (3, 3000), (4, 3010)];

#[test]
fn test_push_constant_grows_stack() {
    for k in &[0, 1, 7, 1000, 32767] {
        let emulator = common::run(&format!("push constant {}", k), "Main", &[]);

        assert_eq!(ram(&emulator, 0), 257, "push constant {}", k);
        assert_eq!(ram(&emulator, 256), *k as i16, "push constant {}", k);
    }
}

#[test]
fn test_push_then_pop_is_noop() {
    for segment in &["local", "argument", "this", "that"] {
        for index in &[0, 2, 5] {
            let base = match *segment {
                "local" => 300,
                "argument" => 400,
                "this" => 3000,
                _ => 3010,
            };

            let mut setup = BASES.to_vec();
            setup.push((base + index, 1234));

            let source = format!("push {0} {1}\npop {0} {1}\n", segment, index);
            let emulator = common::run(&source, "Main", &setup);

            assert_eq!(ram(&emulator, 0), 256, "{}", source);
            assert_eq!(ram(&emulator, base + index), 1234, "{}", source);

            for (address, value) in BASES {
                assert_eq!(ram(&emulator, *address), *value, "{}", source);
            }
        }
    }
}

#[test]
fn test_binary_ops_touch_only_sp_and_new_top() {
    for (op, expected) in &[("add", 9), ("sub", -1), ("and", 4), ("or", 5)] {
        let program = common::build(op, "Main");

        // Stack holds [3, 4, 5]
        let mut emulator = common::load(&program, &[(0, 259), (256, 3), (257, 4), (258, 5)]);

        let written = Rc::new(RefCell::new(Vec::new()));
        let sink = written.clone();

        emulator.add_listener(move |event: &Event| {
            if let Event::MemoryChange { address, .. } = event {
                sink.borrow_mut().push(*address);
            }
        });

        emulator.run(common::MAX_CYCLES).unwrap();

        assert_eq!(ram(&emulator, 0), 258, "{}", op);
        assert_eq!(ram(&emulator, 257), *expected, "{}", op);
        assert_eq!(ram(&emulator, 256), 3, "{}", op);

        for address in written.borrow().iter() {
            assert!(*address == 0 || *address == 257, "{} wrote to {}", op, address);
        }
    }
}

#[test]
fn test_comparisons() {
    let cases = &[
        ("push constant 5\npush constant 5\neq", -1),
        ("push constant 5\npush constant 6\neq", 0),
        ("push constant 3\npush constant 9\nlt", -1),
        ("push constant 9\npush constant 3\nlt", 0),
        ("push constant 9\npush constant 3\ngt", -1),
        ("push constant 3\npush constant 3\ngt", 0),
    ];

    for (source, expected) in cases {
        let emulator = common::run(source, "Main", &[]);

        assert_eq!(ram(&emulator, 0), 257, "{}", source);
        assert_eq!(ram(&emulator, 256), *expected, "{}", source);
    }
}

#[test]
fn test_unary_ops() {
    let emulator = common::run("push constant 5\nneg\npush constant 0\nnot", "Main", &[]);

    assert_eq!(emulator.stack(), &[-5, -1]);
}

#[test]
fn test_temp_and_static_round_trip() {
    let source = "
        push constant 42
        pop temp 7
        push temp 7
        pop static 0
        push static 0
    ";

    let emulator = common::run(source, "Main", &[]);

    assert_eq!(ram(&emulator, 12), 42);
    assert_eq!(ram(&emulator, 16), 42);
    assert_eq!(emulator.stack(), &[42]);
}

#[test]
fn test_pop_constant_fails() {
    let err = hackvm::translate("push constant 1\npop constant 3\n").unwrap_err();

    match err.kind {
        ErrorKind::InvalidOperation => (),
        ref kind => panic!("unexpected error kind {:?}", kind),
    }

    assert_eq!(err.location.map(|location| location.line), Some(2));
}

#[test]
fn test_pop_constant_fails_for_any_index() {
    match hackvm::translate("pop constant 40000\n").unwrap_err().kind {
        ErrorKind::InvalidOperation => (),
        kind => panic!("unexpected error kind {:?}", kind),
    }
}

#[test]
fn test_error_display() {
    let err = hackvm::translate("push constant 1\n\npush temp 8\n").unwrap_err();

    assert_eq!(
        err.to_string(),
        "line 3 (`push temp 8`): index 8 is out of range for segment temp",
    );
}
