use hackvm::{
    hack::Program,
    translator::Translator,
    emulator::{Emulator, SP, STACK_BASE},
};

use slog::{Logger, Drain, o};
use slog_term::{TermDecorator, FullFormat};

pub const MAX_CYCLES: usize = 10_000;

#[allow(dead_code)]
pub fn logger() -> Logger {
    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

/// Translates and assembles a VM program, naming its statics after `file_name`.
pub fn build(source: &str, file_name: &str) -> Program {
    let asm = Translator::new()
        .file_name(file_name)
        .translate_str(source)
        .expect("could not translate the program");

    Program::parse(&asm)
        .expect("translator produced invalid assembly")
}

/// Creates an emulator for `program` with SP at the stack base and `setup` applied on top.
pub fn load(program: &Program, setup: &[(u16, i16)]) -> Emulator {
    let mut emulator = Emulator::new(program);

    emulator.set_data(SP, STACK_BASE as i16).unwrap();

    for (address, value) in setup {
        emulator.set_data(*address, *value).unwrap();
    }

    emulator
}

/// Builds, loads and runs a VM program to completion.
#[allow(dead_code)]
pub fn run(source: &str, file_name: &str, setup: &[(u16, i16)]) -> Emulator {
    let program = build(source, file_name);
    let mut emulator = load(&program, setup);

    emulator.run(MAX_CYCLES)
        .expect("error while executing the program");

    emulator
}

#[allow(dead_code)]
pub fn ram(emulator: &Emulator, address: u16) -> i16 {
    emulator.get_data(address)
        .expect("address outside of RAM")
}
