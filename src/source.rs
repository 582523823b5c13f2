//! Loading and cleaning VM source text.

use std::fmt;
use std::io::Read;

use slog::{debug, o, Discard, Logger};

use crate::error::{Error, ErrorExt, Location, Result};

/// Marker that starts a whole-line comment.
pub const COMMENT_MARKER: &str = "//";

/// A single instruction line after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    /// 1-based line number in the raw input.
    pub number: usize,
    /// The trimmed text of the line.
    pub text: String,
}

impl SourceLine {
    pub fn location(&self) -> Location {
        Location {
            line: self.number,
            text: self.text.clone(),
        }
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Splits `input` into lines, strips carriage returns and surrounding whitespace and drops blank
/// lines and lines starting with [COMMENT_MARKER]. Comments after an instruction are kept as part
/// of the line.
pub fn clean(input: &str) -> Vec<SourceLine> {
    input
        .split('\n')
        .enumerate()
        .filter_map(|(i, line)| {
            let text = line.trim_end_matches('\r').trim();

            if text.is_empty() || text.starts_with(COMMENT_MARKER) {
                return None;
            }

            Some(SourceLine {
                number: i + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Reads the whole of `reader` and cleans it with [clean].
pub fn load<R, L>(mut reader: R, logger: L) -> Result<Vec<SourceLine>>
where
    R: Read,
    L: Into<Option<Logger>>,
{
    let logger = logger
        .into()
        .unwrap_or(Logger::root(Discard, o!()))
        .new(o!("stage" => "load"));

    let mut input = String::new();

    reader
        .read_to_string(&mut input)
        .map_err(Error::from)
        .context("could not read the source")?;

    let lines = clean(&input);

    debug!(logger, "loaded source"; "raw" => input.lines().count(), "instructions" => lines.len());

    Ok(lines)
}
