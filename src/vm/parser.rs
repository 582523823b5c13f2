//! Cursor based access to the cleaned lines of a VM source file.

use std::io::Read;

use edit_distance::edit_distance;
use slog::Logger;

use crate::error::{Error, ErrorKind, Result};
use crate::source::{self, SourceLine};

use super::command::{Category, Mnemonic};
use super::token::{classify, Token};

/// Largest edit distance for which an unknown command gets a suggestion.
const SUGGESTION_DISTANCE: usize = 2;

/// Holds the cleaned source lines and a cursor pointing at the line being translated.
///
/// Fields of the current line are recomputed on every call, nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    lines: Vec<SourceLine>,
    position: usize,
}

impl Parser {
    pub fn new(lines: Vec<SourceLine>) -> Parser {
        Parser {
            lines,
            position: 0,
        }
    }

    pub fn parse_source(input: &str) -> Parser {
        Parser::new(source::clean(input))
    }

    /// Reads and cleans the whole of `reader` before returning.
    pub fn load<R, L>(reader: R, logger: L) -> Result<Parser>
    where
        R: Read,
        L: Into<Option<Logger>>,
    {
        Ok(Parser::new(source::load(reader, logger)?))
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines[..]
    }

    /// True while the cursor points at a line.
    pub fn has_next(&self) -> bool {
        self.position < self.lines.len()
    }

    /// Moves the cursor to the next line. Does nothing once all lines have been consumed.
    pub fn advance(&mut self) {
        if self.has_next() {
            self.position += 1;
        }
    }

    pub fn current(&self) -> Option<&SourceLine> {
        self.lines.get(self.position)
    }

    fn current_line(&self) -> Result<&SourceLine> {
        self.current()
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEnd))
    }

    /// Classifies the first word of the current line.
    pub fn current_mnemonic(&self) -> Result<Mnemonic> {
        let line = self.current_line()?;
        let word = line.text.split_whitespace().next().unwrap_or("");

        match classify(word) {
            Token::Mnemonic(mnemonic) => Ok(mnemonic),
            _ => Err(Error::new(ErrorKind::UnknownCommand {
                word: word.to_string(),
                suggestion: suggest(word),
            })
            .at(line.location())),
        }
    }

    pub fn current_category(&self) -> Result<Category> {
        self.current_mnemonic().map(|mnemonic| mnemonic.category())
    }

    /// Returns the whole line for arithmetic commands and the second word for every other
    /// command.
    pub fn current_segment(&self) -> Result<&str> {
        let line = self.current_line()?;
        let category = self.current_category()?;

        if category == Category::Arithmetic {
            return Ok(&line.text);
        }

        let mut words = line.text.split_whitespace();

        match words.nth(1) {
            Some(word) => Ok(word),
            None => Err(Error::new(ErrorKind::MalformedInstruction {
                expected: std::cmp::max(category.arity(), 2),
                got: line.text.split_whitespace().count(),
            })
            .at(line.location())),
        }
    }

    /// Parses the third word of the current line as a base-10 number.
    pub fn current_index(&self) -> Result<u16> {
        let line = self.current_line()?;

        let word = match line.text.split_whitespace().nth(2) {
            Some(word) => word,
            None => {
                let error = Error::new(ErrorKind::MalformedInstruction {
                    expected: 3,
                    got: line.text.split_whitespace().count(),
                });

                return Err(error.at(line.location()));
            }
        };

        match classify(word) {
            Token::Number(index) => Ok(index),
            _ => Err(Error::new(ErrorKind::NotANumber { word: word.to_string() })
                .at(line.location())),
        }
    }
}

impl Iterator for Parser {
    type Item = SourceLine;

    fn next(&mut self) -> Option<SourceLine> {
        let line = self.current().cloned();
        self.advance();
        line
    }
}

/// Finds the known mnemonic closest to `word`, if it is close enough to be a typo.
fn suggest(word: &str) -> Option<&'static str> {
    if word.is_empty() {
        return None;
    }

    Mnemonic::ALL
        .iter()
        .map(|mnemonic| (edit_distance(word, mnemonic.as_str()), mnemonic.as_str()))
        .filter(|(distance, candidate)| *distance <= SUGGESTION_DISTANCE && *distance < candidate.len())
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}
