//! Two-pass assembler from Hack assembly text to machine words.

use std::collections::HashMap;
use std::convert::TryFrom;

use slog::{debug, o, trace, Discard, Logger};

use crate::source_map::SourceMap;

use super::instruction::{Address, Instruction, MachineInstruction};
use super::parser::{parse_program, Statement};
use super::Error;

/// First RAM address handed out to variables.
pub const VARIABLE_BASE: u16 = 16;

/// Start of the memory mapped screen. Variables must stay below it.
pub const SCREEN: u16 = 0x4000;

/// Start of the memory mapped keyboard.
pub const KBD: u16 = 0x6000;

/// Number of addressable ROM words.
pub const ROM_SIZE: usize = 0x8000;

const PREDEFINED: &[(&str, u16)] = &[
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", SCREEN),
    ("KBD", KBD),
];

/// An assembled program ready to be loaded into ROM.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Machine words, one per instruction.
    pub code: Vec<u16>,

    /// Every symbol known after assembly: predefined ones, labels and variables.
    pub symbol_table: HashMap<String, u16>,

    /// ROM address to assembly line.
    pub source_map: SourceMap,
}

impl Program {
    /// Assembles `source` without logging.
    pub fn parse(source: &str) -> Result<Program, Error> {
        assemble(source, None)
    }

    /// Decodes the machine words back into instructions.
    pub fn instructions(&self) -> Vec<Option<MachineInstruction>> {
        self.code
            .iter()
            .map(|word| MachineInstruction::try_from(*word).ok())
            .collect()
    }

    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbol_table.get(name).cloned()
    }
}

fn predefined_symbols() -> HashMap<String, u16> {
    let registers = (0..16).map(|i| (format!("R{}", i), i));

    PREDEFINED
        .iter()
        .map(|(name, address)| (name.to_string(), *address))
        .chain(registers)
        .collect()
}

/// Assembles `source` into a [Program].
///
/// The first pass assigns ROM addresses to labels. The second pass encodes instructions and
/// allocates RAM for every symbol that is neither predefined nor a label, starting from
/// [VARIABLE_BASE] in order of first use.
pub fn assemble<L>(source: &str, logger: L) -> Result<Program, Error>
where
    L: Into<Option<Logger>>,
{
    let logger = logger
        .into()
        .unwrap_or(Logger::root(Discard, o!()))
        .new(o!("stage" => "assembly"));

    let statements = parse_program(source)?;

    let mut symbol_table = predefined_symbols();
    let mut rom_address = 0usize;

    for Statement { line, instruction } in &statements {
        match instruction {
            Instruction::Label(label) => {
                if symbol_table.contains_key(label) {
                    return Err(Error::DuplicateLabel { line: *line, label: label.clone() });
                }

                trace!(logger, "add a label to the symbol table"; "label" => label, "address" => rom_address);
                symbol_table.insert(label.clone(), rom_address as u16);
            },
            _ => rom_address += 1,
        }
    }

    if rom_address > ROM_SIZE {
        return Err(Error::ProgramTooLarge { size: rom_address });
    }

    let mut program = Program {
        code: Vec::with_capacity(rom_address),
        symbol_table,
        source_map: SourceMap::default(),
    };

    let mut next_variable = VARIABLE_BASE;

    for Statement { line, instruction } in statements {
        let ins = match instruction {
            Instruction::Label(_) => continue,
            Instruction::Address(Address::Literal(value)) => MachineInstruction::Load(value),
            Instruction::Address(Address::Symbol(symbol)) => {
                let value = match program.symbol_table.get(&symbol) {
                    Some(value) => *value,
                    None => {
                        if next_variable >= SCREEN {
                            return Err(Error::TooManyVariables { symbol });
                        }

                        trace!(logger, "allocate a variable"; "symbol" => &symbol, "address" => next_variable);

                        let address = next_variable;
                        program.symbol_table.insert(symbol, address);
                        next_variable += 1;
                        address
                    },
                };

                MachineInstruction::Load(value)
            },
            Instruction::Compute { dest, comp, jump } =>
                MachineInstruction::Compute { dest, comp, jump },
        };

        program.source_map.insert(program.code.len() as u16, line);
        program.code.push(ins.into());
    }

    debug!(logger, "assembly finished";
        "instructions" => program.code.len(),
        "variables" => next_variable - VARIABLE_BASE);

    Ok(program)
}
