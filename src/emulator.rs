//! [Emulator] for executing assembled [Hack programs](crate::hack::Program).

use std::convert::TryFrom;
use std::fmt;

use slog::{debug, o, trace, Discard, Logger};

use crate::event::{Event, EventDispatcher, EventListener};
use crate::hack::{MachineInstruction, Program};
use crate::source_map::SourceMap;

/// Number of words in the data memory.
pub const RAM_SIZE: usize = 0x8000;

/// Address of the stack pointer.
pub const SP: u16 = 0;

/// Address of the first stack cell under the usual VM conventions.
pub const STACK_BASE: u16 = 256;

/// The registers of the Hack CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    D,
    PC,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Register::A => "A",
            Register::D => "D",
            Register::PC => "PC",
        };

        write!(f, "{}", name)
    }
}

/// Contains the execution environment of the Hack CPU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Address of the next instruction to be executed.
    pub pc: u16,

    /// The address register. Doubles as a data register.
    pub a: i16,

    /// The data register.
    pub d: i16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmulatorError {
    /// The word at `address` in ROM is not a valid instruction.
    InvalidInstruction { address: u16, word: u16 },

    /// The instruction at `pc` accessed memory outside of RAM.
    InvalidAddress { pc: u16, address: u16 },

    /// The program was still running after the given number of cycles.
    CycleLimit { cycles: usize },
}

impl fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmulatorError::InvalidInstruction { address, word } =>
                write!(f, "invalid instruction {:#018b} at ROM address {}", word, address),
            EmulatorError::InvalidAddress { pc, address } =>
                write!(f, "instruction at {} accessed invalid RAM address {}", pc, address),
            EmulatorError::CycleLimit { cycles } =>
                write!(f, "program did not finish within {} cycles", cycles),
        }
    }
}

impl std::error::Error for EmulatorError {}

/// The emulator contains the ROM, the RAM and the registers of a Hack computer.
///
/// Execution finishes when the program counter leaves the loaded program.
pub struct Emulator {
    rom: Vec<u16>,
    memory: Vec<i16>,

    /// The registers of the CPU.
    pub context: Context,

    source_map: SourceMap,
    dispatcher: EventDispatcher,
    logger: Logger,
}

impl Emulator {
    /// Creates an emulator with `program` loaded in ROM and zeroed RAM.
    pub fn new(program: &Program) -> Emulator {
        Emulator {
            rom: program.code.clone(),
            memory: vec![0; RAM_SIZE],
            context: Context::default(),
            source_map: program.source_map.clone(),
            dispatcher: EventDispatcher::new(),
            logger: Logger::root(Discard, o!()),
        }
    }

    pub fn with_logger<L: Into<Option<Logger>>>(program: &Program, logger: L) -> Emulator {
        let mut emulator = Emulator::new(program);

        if let Some(logger) = logger.into() {
            emulator.logger = logger.new(o!("stage" => "emulation"));
        }

        emulator
    }

    /// Registers a listener which is notified of every memory and register write made by the
    /// program.
    pub fn add_listener<L: EventListener + 'static>(&mut self, listener: L) {
        self.dispatcher.add_listener(listener);
    }

    /// True once the program counter points past the last instruction.
    pub fn is_finished(&self) -> bool {
        self.context.pc as usize >= self.rom.len()
    }

    /// Fetches and decodes the instruction pointed to by the program counter.
    pub fn get_current_instruction(&self) -> Result<MachineInstruction, EmulatorError> {
        let address = self.context.pc;
        let word = self.rom
            .get(address as usize)
            .cloned()
            .unwrap_or(0);

        MachineInstruction::try_from(word)
            .map_err(|_| EmulatorError::InvalidInstruction { address, word })
    }

    /// Source line of the instruction pointed to by the program counter.
    pub fn current_source_line(&self) -> Option<usize> {
        self.source_map.get_source_line(self.context.pc)
    }

    /// Reads a word of RAM.
    pub fn get_data(&self, address: u16) -> Result<i16, EmulatorError> {
        self.memory
            .get(address as usize)
            .cloned()
            .ok_or(EmulatorError::InvalidAddress { pc: self.context.pc, address })
    }

    /// Writes a word of RAM. Meant for setting up the machine, no events are dispatched.
    pub fn set_data(&mut self, address: u16, data: i16) -> Result<(), EmulatorError> {
        let pc = self.context.pc;

        match self.memory.get_mut(address as usize) {
            Some(cell) => {
                *cell = data;
                Ok(())
            },
            None => Err(EmulatorError::InvalidAddress { pc, address }),
        }
    }

    /// The contents of the stack from [STACK_BASE] up to, but not including, `RAM[SP]`.
    pub fn stack(&self) -> &[i16] {
        let top = self.memory[SP as usize] as usize;

        if top < STACK_BASE as usize || top > RAM_SIZE {
            return &[];
        }

        &self.memory[STACK_BASE as usize..top]
    }

    fn write_memory(&mut self, address: i16, data: i16) -> Result<(), EmulatorError> {
        self.set_data(address as u16, data)?;
        self.dispatcher.dispatch(Event::MemoryChange { address: address as u16, data });

        Ok(())
    }

    fn write_register(&mut self, register: Register, data: i16) {
        match register {
            Register::A => self.context.a = data,
            Register::D => self.context.d = data,
            Register::PC => self.context.pc = data as u16,
        }

        self.dispatcher.dispatch(Event::RegisterChange { register, data });
    }

    /// Executes a single instruction.
    ///
    /// Does not increment the program counter, but does set it when a jump is taken.
    pub fn emulate_instruction(&mut self, ins: &MachineInstruction) -> Result<(), EmulatorError> {
        match *ins {
            MachineInstruction::Load(value) => self.write_register(Register::A, value as i16),
            MachineInstruction::Compute { dest, comp, jump } => {
                let address = self.context.a;

                let y = if comp.reads_memory() {
                    self.get_data(address as u16)?
                } else {
                    address
                };

                let out = comp.compute(self.context.d, y);

                // All destinations see the value of A from before this instruction.
                if dest.m {
                    self.write_memory(address, out)?;
                }

                if dest.a {
                    self.write_register(Register::A, out);
                }

                if dest.d {
                    self.write_register(Register::D, out);
                }

                if jump.test(out) {
                    self.write_register(Register::PC, address);
                }
            },
        }

        Ok(())
    }

    /// Fetches the next instruction, increments the program counter and executes the
    /// instruction. Does nothing once the program has finished.
    pub fn step(&mut self) -> Result<(), EmulatorError> {
        if self.is_finished() {
            return Ok(());
        }

        let ins = self.get_current_instruction()?;

        trace!(self.logger, "execute";
            "pc" => self.context.pc,
            "line" => self.current_source_line(),
            "instruction" => %ins);

        self.context.pc += 1;

        self.emulate_instruction(&ins)
    }

    /// Executes the program until it finishes, returning the number of executed instructions.
    ///
    /// # Errors
    /// Returns [EmulatorError::CycleLimit] if the program is still running after
    /// `max_cycles` instructions.
    pub fn run(&mut self, max_cycles: usize) -> Result<usize, EmulatorError> {
        let mut cycles = 0;

        while !self.is_finished() {
            if cycles == max_cycles {
                return Err(EmulatorError::CycleLimit { cycles });
            }

            self.step()?;
            cycles += 1;
        }

        debug!(self.logger, "program finished"; "cycles" => cycles, "sp" => self.memory[SP as usize]);

        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn run_source(source: &str) -> Emulator {
        let program = Program::parse(source).expect("could not assemble program");
        let mut emulator = Emulator::new(&program);

        emulator.run(1000).expect("error while executing the program");
        emulator
    }

    #[test]
    fn test_add_constants() {
        let emulator = run_source("@2\nD=A\n@3\nD=D+A\n@0\nM=D\n");

        assert_eq!(emulator.get_data(0), Ok(5));
        assert_eq!(emulator.context.d, 5);
        assert_eq!(emulator.context.a, 0);
        assert!(emulator.is_finished());
    }

    #[test]
    fn test_loop() {
        // RAM[17] = 5 + 4 + 3 + 2 + 1
        let emulator = run_source("
            @5
            D=A
            @i
            M=D
            (LOOP)
            @i
            D=M
            @END
            D;JEQ
            @sum
            M=D+M
            @i
            M=M-1
            @LOOP
            0;JMP
            (END)
        ");

        assert_eq!(emulator.get_data(16), Ok(0));
        assert_eq!(emulator.get_data(17), Ok(15));
    }

    #[test]
    fn test_destinations_use_previous_a() {
        let program = Program::parse("@100\nAM=A+1\n").unwrap();
        let mut emulator = Emulator::new(&program);

        emulator.run(10).unwrap();

        assert_eq!(emulator.get_data(100), Ok(101));
        assert_eq!(emulator.context.a, 101);
    }

    #[test]
    fn test_cycle_limit() {
        let program = Program::parse("(HALT)\n@HALT\n0;JMP\n").unwrap();
        let mut emulator = Emulator::new(&program);

        assert_eq!(emulator.run(50), Err(EmulatorError::CycleLimit { cycles: 50 }));
    }

    #[test]
    fn test_invalid_address() {
        let program = Program::parse("D=-1\nA=D\nM=1\n").unwrap();
        let mut emulator = Emulator::new(&program);

        match emulator.run(10) {
            Err(EmulatorError::InvalidAddress { pc: 3, address: 0xFFFF }) => (),
            result => panic!("unexpected result {:?}", result),
        }
    }

    #[test]
    fn test_invalid_instruction() {
        let program = Program {
            code: vec![0b1000_0000_0000_0000],
            ..Program::default()
        };

        let mut emulator = Emulator::new(&program);

        assert_eq!(
            emulator.step(),
            Err(EmulatorError::InvalidInstruction { address: 0, word: 0x8000 }),
        );
    }

    #[test]
    fn test_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();

        let program = Program::parse("@7\nD=A\n@20\nM=D\n").unwrap();
        let mut emulator = Emulator::new(&program);
        emulator.add_listener(move |event: &Event| sink.borrow_mut().push(event.clone()));

        emulator.run(10).unwrap();

        assert_eq!(*events.borrow(), vec![
            Event::RegisterChange { register: Register::A, data: 7 },
            Event::RegisterChange { register: Register::D, data: 7 },
            Event::RegisterChange { register: Register::A, data: 20 },
            Event::MemoryChange { address: 20, data: 7 },
        ]);
    }

    #[test]
    fn test_stack_view() {
        let program = Program::parse("").unwrap();
        let mut emulator = Emulator::new(&program);

        assert!(emulator.stack().is_empty());

        emulator.set_data(SP, 258).unwrap();
        emulator.set_data(256, 4).unwrap();
        emulator.set_data(257, -2).unwrap();

        assert_eq!(emulator.stack(), &[4, -2]);
    }
}
