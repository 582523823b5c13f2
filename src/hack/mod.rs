//! The Hack machine language: instruction model, assembly parser and assembler.
//!
//! The translator output is checked by assembling it with [assemble] and running the
//! resulting [Program] on the [Emulator](crate::emulator::Emulator).

use std::fmt;

pub mod assembler;
pub mod instruction;
pub mod parser;

pub use assembler::{assemble, Program};
pub use instruction::{Address, Comp, Dest, Instruction, Jump, MachineInstruction};
pub use parser::{ParseError, Statement};

/// Errors produced while assembling a program.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A line could not be parsed.
    Parse(ParseError),

    /// The same label was declared twice, or a label shadows a predefined symbol.
    DuplicateLabel { line: usize, label: String },

    /// Variables ran into the memory mapped screen.
    TooManyVariables { symbol: String },

    /// The program does not fit in the addressable ROM.
    ProgramTooLarge { size: usize },
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Error {
        Error::Parse(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(error) => write!(f, "{}", error),
            Error::DuplicateLabel { line, label } =>
                write!(f, "at line {}: label '{}' is already defined", line, label),
            Error::TooManyVariables { symbol } =>
                write!(f, "no free memory left for variable '{}'", symbol),
            Error::ProgramTooLarge { size } =>
                write!(f, "program of {} instructions does not fit in ROM", size),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(error) => Some(error),
            _ => None,
        }
    }
}
