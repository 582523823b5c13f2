//! The translation loop tying the [Parser] and the [CodeGenerator] together.

use std::io::Write;

use slog::{debug, o, Discard, Logger};

use crate::codegen::CodeGenerator;
use crate::error::{Error, ErrorKind, Result};
use crate::vm::{Category, Parser};

/// Drives a translation run. Configured with a builder style API.
///
/// ```
/// use hackvm::translator::Translator;
///
/// let asm = Translator::new()
///     .file_name("Main")
///     .translate_str("push constant 1\npush static 0\nadd\n")
///     .unwrap();
///
/// assert!(asm.contains("@Main.0"));
/// ```
#[derive(Clone)]
pub struct Translator {
    file_name: Option<String>,
    logger: Logger,
}

impl Default for Translator {
    fn default() -> Translator {
        Translator::new()
    }
}

impl Translator {
    pub fn new() -> Translator {
        Translator {
            file_name: None,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Name used to derive the symbols of the `static` segment, usually the source file stem.
    pub fn file_name<S: Into<String>>(mut self, name: S) -> Translator {
        self.file_name = Some(name.into());
        self
    }

    pub fn logger<L: Into<Option<Logger>>>(mut self, logger: L) -> Translator {
        self.logger = logger.into().unwrap_or(Logger::root(Discard, o!()));
        self
    }

    /// Translates every remaining line of `parser` into `sink`.
    ///
    /// Stops at the first error. Whatever was written to `sink` before the error is not valid
    /// output and should be discarded by the caller.
    pub fn translate<W: Write>(&self, parser: &mut Parser, sink: W) -> Result<W> {
        let logger = self.logger.new(o!("stage" => "translation"));

        let mut generator = CodeGenerator::with_logger(sink, logger.clone());

        if let Some(ref name) = self.file_name {
            generator.set_file_name(name.as_str());
        }

        let mut count = 0;

        while let Some(line) = parser.current() {
            let location = line.location();
            generator.set_source_text(line.text.as_str());

            translate_current(parser, &mut generator)
                .map_err(|err| err.at(location))?;

            parser.advance();
            count += 1;
        }

        generator.flush()?;

        debug!(logger, "translation finished"; "instructions" => count, "comparisons" => generator.label_counter());

        Ok(generator.into_inner())
    }

    /// Translates `input` into a string of assembly.
    pub fn translate_str(&self, input: &str) -> Result<String> {
        let mut parser = Parser::parse_source(input);
        let output = self.translate(&mut parser, Vec::new())?;

        // The generator writes only UTF-8 text.
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

fn translate_current<W: Write>(parser: &Parser, generator: &mut CodeGenerator<W>) -> Result<()> {
    let category = parser.current_category()?;

    match category {
        Category::Arithmetic => generator.emit_arithmetic(parser.current_segment()?),
        Category::Push | Category::Pop => {
            let segment = parser.current_segment()?;
            let index = parser.current_index()?;

            generator.emit_push_pop(category, segment, index)
        },
        Category::Label
        | Category::Goto
        | Category::IfGoto
        | Category::Function
        | Category::Return
        | Category::Call => Err(Error::new(ErrorKind::UnsupportedOperator {
            mnemonic: category.to_string(),
        })),
    }
}

/// Translates `input` with the default settings.
pub fn translate(input: &str) -> Result<String> {
    Translator::new().translate_str(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_echoes_each_command() {
        let asm = translate("push constant 7\npush constant 8\nadd\n").unwrap();

        let comments = asm
            .lines()
            .filter(|line| line.starts_with("//"))
            .collect::<Vec<_>>();

        assert_eq!(comments, ["// push constant 7", "// push constant 8", "// add"]);
    }

    #[test]
    fn test_comment_echoes_cleaned_line() {
        let asm = translate("  push   local\t2   extra  \nadd\n").unwrap();

        let comments = asm
            .lines()
            .filter(|line| line.starts_with("//"))
            .collect::<Vec<_>>();

        assert_eq!(comments, ["// push   local\t2   extra", "// add"]);
    }

    #[test]
    fn test_error_carries_raw_line_number() {
        let err = translate("push constant 1\n\n// comment\npop constant 3\n").unwrap_err();

        match err.kind {
            ErrorKind::InvalidOperation => (),
            ref kind => panic!("unexpected error kind {:?}", kind),
        }

        let location = err.location.expect("error has no location");
        assert_eq!(location.line, 4);
        assert_eq!(location.text, "pop constant 3");
    }

    #[test]
    fn test_failed_instruction_writes_nothing() {
        let mut parser = Parser::parse_source("push constant 1\npop constant 3\n");
        let mut sink = Vec::new();

        assert!(Translator::new().translate(&mut parser, &mut sink).is_err());

        let text = String::from_utf8(sink).unwrap();
        assert!(text.starts_with("// push constant 1\n"));
        assert!(!text.contains("pop"));
    }

    #[test]
    fn test_control_flow_is_unsupported() {
        for source in &["label LOOP", "goto LOOP", "if-goto LOOP", "function f 0", "call f 0", "return"] {
            match translate(source).unwrap_err().kind {
                ErrorKind::UnsupportedOperator { .. } => (),
                kind => panic!("unexpected error kind {:?} for {}", kind, source),
            }
        }
    }

    #[test]
    fn test_inline_comment_is_not_stripped() {
        match translate("add // sum").unwrap_err().kind {
            ErrorKind::UnsupportedOperator { ref mnemonic } => assert_eq!(mnemonic, "add // sum"),
            kind => panic!("unexpected error kind {:?}", kind),
        }
    }

    #[test]
    fn test_empty_input_translates_to_nothing() {
        assert_eq!(translate("// just a comment\n\n").unwrap(), "");
    }
}
