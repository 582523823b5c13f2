//! Parsing VM source into classified commands.

pub mod command;
pub mod parser;
pub mod token;

pub use self::command::{ArithmeticOp, Category, Mnemonic, Segment};
pub use self::parser::Parser;
