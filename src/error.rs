//! Errors produced while loading and translating VM source.

use std::fmt;
use std::io;

use itertools::Itertools;

use crate::vm::Segment;

/// Reason of a translation failure.
#[derive(Debug)]
pub enum ErrorKind {
    /// The source could not be read or the sink could not be written.
    Io(io::Error),

    /// The first word of a line is not a known command.
    UnknownCommand {
        word: String,
        /// The closest known command, if one is close enough to be a likely typo.
        suggestion: Option<&'static str>,
    },

    /// A field was requested while the parser had no current line.
    UnexpectedEnd,

    /// The line has fewer tokens than its command requires.
    MalformedInstruction {
        expected: usize,
        got: usize,
    },

    /// The index field is not a non-negative 16-bit integer.
    NotANumber {
        word: String,
    },

    /// The segment name is not one of the eight known segments.
    InvalidSegment {
        name: String,
    },

    /// The index is outside of the range the segment accepts.
    InvalidIndex {
        segment: Segment,
        index: u16,
    },

    /// The operation makes no sense for its operands, e.g. popping into `constant`.
    InvalidOperation,

    /// The command is recognized but has no translation.
    UnsupportedOperator {
        mnemonic: String,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Io(err) => write!(f, "io error: {}", err),
            ErrorKind::UnknownCommand { word, suggestion: Some(suggestion) } =>
                write!(f, "unknown command '{}', did you mean '{}'?", word, suggestion),
            ErrorKind::UnknownCommand { word, suggestion: None } =>
                write!(f, "unknown command '{}'", word),
            ErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            ErrorKind::MalformedInstruction { expected, got } =>
                write!(f, "malformed instruction: expected {} tokens, got {}", expected, got),
            ErrorKind::NotANumber { word } => write!(f, "'{}' is not a valid index", word),
            ErrorKind::InvalidSegment { name } => write!(f, "invalid segment '{}'", name),
            ErrorKind::InvalidIndex { segment, index } =>
                write!(f, "index {} is out of range for segment {}", index, segment),
            ErrorKind::InvalidOperation => write!(f, "invalid operation"),
            ErrorKind::UnsupportedOperator { mnemonic } =>
                write!(f, "'{}' has no translation", mnemonic),
        }
    }
}

/// Position of the offending line in the raw source.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// 1-based line number in the raw input.
    pub line: usize,
    /// The cleaned text of the line.
    pub text: String,
}

/// Error type that carries the reason of the failure, the offending line when it is known and
/// a stack of context messages.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub location: Option<Location>,
    pub context: Vec<&'static str>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            kind,
            location: None,
            context: Vec::new(),
        }
    }

    /// Attaches `location` unless the error already has one.
    pub fn at(mut self, location: Location) -> Error {
        if self.location.is_none() {
            self.location = Some(location);
        }

        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Io(err))
    }
}

pub trait ErrorExt {
    fn context(self, ctx: &'static str) -> Self;
}

impl<T> ErrorExt for std::result::Result<T, Error> {
    fn context(mut self, ctx: &'static str) -> Self {
        if let Err(ref mut err) = self {
            err.context.push(ctx);
        }

        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "line {} (`{}`): ", location.line, location.text)?;
        }

        if !self.context.is_empty() {
            write!(f, "{}: ", self.context.iter().rev().join(": "))?;
        }

        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_display_with_location_and_context() {
    let err: Result<()> = Err(Error::new(ErrorKind::InvalidOperation));
    let err = err
        .context("cannot pop into constant")
        .context("push/pop")
        .unwrap_err()
        .at(Location { line: 3, text: "pop constant 3".to_string() });

    assert_eq!(
        err.to_string(),
        "line 3 (`pop constant 3`): push/pop: cannot pop into constant: invalid operation",
    );
}

#[test]
fn test_location_is_not_overwritten() {
    let err = Error::new(ErrorKind::UnexpectedEnd)
        .at(Location { line: 1, text: "a".to_string() })
        .at(Location { line: 2, text: "b".to_string() });

    assert_eq!(err.location.map(|l| l.line), Some(1));
}
