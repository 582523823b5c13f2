mod common;

use common::ram;

#[test]
fn test_basic_test() {
    let emulator = common::run(include_str!("BasicTest.vm"), "BasicTest", &[
        (1, 300),  // LCL
        (2, 400),  // ARG
        (3, 3000), // THIS
        (4, 3010), // THAT
    ]);

    assert_eq!(ram(&emulator, 0), 257);
    assert_eq!(ram(&emulator, 256), 472);
    assert_eq!(ram(&emulator, 300), 10);
    assert_eq!(ram(&emulator, 401), 21);
    assert_eq!(ram(&emulator, 402), 22);
    assert_eq!(ram(&emulator, 3006), 36);
    assert_eq!(ram(&emulator, 3012), 42);
    assert_eq!(ram(&emulator, 3015), 45);
    assert_eq!(ram(&emulator, 11), 510);
}

#[test]
fn test_pointer_test() {
    let emulator = common::run(include_str!("PointerTest.vm"), "PointerTest", &[]);

    assert_eq!(ram(&emulator, 256), 6084);
    assert_eq!(ram(&emulator, 3), 3030);
    assert_eq!(ram(&emulator, 4), 3040);
    assert_eq!(ram(&emulator, 3032), 32);
    assert_eq!(ram(&emulator, 3046), 46);
}

#[test]
fn test_static_test() {
    let program = common::build(include_str!("StaticTest.vm"), "StaticTest");

    assert_eq!(program.symbol("StaticTest.8"), Some(16));
    assert_eq!(program.symbol("StaticTest.3"), Some(17));
    assert_eq!(program.symbol("StaticTest.1"), Some(18));

    let mut emulator = common::load(&program, &[]);
    emulator.run(common::MAX_CYCLES).unwrap();

    assert_eq!(ram(&emulator, 256), 1110);
    assert_eq!(ram(&emulator, 16), 888);
    assert_eq!(ram(&emulator, 17), 333);
    assert_eq!(ram(&emulator, 18), 111);
}

#[test]
fn test_static_without_file_name() {
    let asm = hackvm::translate(include_str!("StaticTest.vm")).unwrap();

    assert!(asm.contains("@STATIC_8\n"));
    assert!(!asm.contains("StaticTest."));
}
