//! Types for representing VM commands and their parts.

use std::fmt;
use std::str::FromStr;

use super::token::{classify, Token};

/// Broad class of a VM command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    /// A bare arithmetic or logical command operating on the top of the stack.
    Arithmetic,
    /// `push <segment> <index>`
    Push,
    /// `pop <segment> <index>`
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Return,
    Call,
}

impl Category {
    /// Number of whitespace separated tokens a well-formed line of this category has.
    pub fn arity(&self) -> usize {
        match self {
            Category::Arithmetic | Category::Return => 1,
            Category::Label | Category::Goto | Category::IfGoto => 2,
            Category::Push | Category::Pop | Category::Function | Category::Call => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Category::Arithmetic => "arithmetic",
            Category::Push => "push",
            Category::Pop => "pop",
            Category::Label => "label",
            Category::Goto => "goto",
            Category::IfGoto => "if-goto",
            Category::Function => "function",
            Category::Return => "return",
            Category::Call => "call",
        })
    }
}

/// Commands that take no operands and work on the values at the top of the stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// `x + y`
    Add,
    /// `x - y`
    Sub,
    /// `-y`
    Neg,
    /// `x == y`
    Eq,
    /// `x > y`
    Gt,
    /// `x < y`
    Lt,
    /// Bitwise `x & y`
    And,
    /// Bitwise `x | y`
    Or,
    /// Bitwise `!y`
    Not,
}

impl ArithmeticOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for ArithmeticOp {
    type Err = ();

    fn from_str(input: &str) -> Result<ArithmeticOp, ()> {
        match classify(input) {
            Token::Mnemonic(Mnemonic::Arithmetic(op)) => Ok(op),
            _ => Err(()),
        }
    }
}

/// The leading word of a VM command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    Arithmetic(ArithmeticOp),
    Push,
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Return,
    Call,
}

impl Mnemonic {
    /// Every mnemonic in the order the lexer lists them.
    pub const ALL: [Mnemonic; 17] = [
        Mnemonic::Push,
        Mnemonic::Pop,
        Mnemonic::Arithmetic(ArithmeticOp::Add),
        Mnemonic::Arithmetic(ArithmeticOp::Sub),
        Mnemonic::Arithmetic(ArithmeticOp::Neg),
        Mnemonic::Arithmetic(ArithmeticOp::Eq),
        Mnemonic::Arithmetic(ArithmeticOp::Gt),
        Mnemonic::Arithmetic(ArithmeticOp::Lt),
        Mnemonic::Arithmetic(ArithmeticOp::And),
        Mnemonic::Arithmetic(ArithmeticOp::Or),
        Mnemonic::Arithmetic(ArithmeticOp::Not),
        Mnemonic::Label,
        Mnemonic::Goto,
        Mnemonic::IfGoto,
        Mnemonic::Function,
        Mnemonic::Return,
        Mnemonic::Call,
    ];

    pub fn category(&self) -> Category {
        match self {
            Mnemonic::Arithmetic(_) => Category::Arithmetic,
            Mnemonic::Push => Category::Push,
            Mnemonic::Pop => Category::Pop,
            Mnemonic::Label => Category::Label,
            Mnemonic::Goto => Category::Goto,
            Mnemonic::IfGoto => Category::IfGoto,
            Mnemonic::Function => Category::Function,
            Mnemonic::Return => Category::Return,
            Mnemonic::Call => Category::Call,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mnemonic::Arithmetic(op) => op.mnemonic(),
            Mnemonic::Push => "push",
            Mnemonic::Pop => "pop",
            Mnemonic::Label => "label",
            Mnemonic::Goto => "goto",
            Mnemonic::IfGoto => "if-goto",
            Mnemonic::Function => "function",
            Mnemonic::Return => "return",
            Mnemonic::Call => "call",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named memory regions of the VM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
    Constant,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
            Segment::Constant => "constant",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Segment {
    type Err = ();

    fn from_str(input: &str) -> Result<Segment, ()> {
        match classify(input) {
            Token::Segment(segment) => Ok(segment),
            _ => Err(()),
        }
    }
}

#[test]
fn test_segment_from_str() {
    assert_eq!("local".parse::<Segment>(), Ok(Segment::Local));
    assert_eq!("constant".parse::<Segment>(), Ok(Segment::Constant));
    assert_eq!("locals".parse::<Segment>(), Err(()));
    assert_eq!("LOCAL".parse::<Segment>(), Err(()));
}

#[test]
fn test_mnemonic_round_trips_through_lexer() {
    for mnemonic in Mnemonic::ALL.iter() {
        assert_eq!(classify(mnemonic.as_str()), Token::Mnemonic(*mnemonic));
    }
}
