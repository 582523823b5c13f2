//! Generation of Hack assembly from classified VM commands.

use std::io::Write;

use slog::{o, trace, Discard, Logger};

use crate::error::{Error, ErrorExt, ErrorKind, Result};
use crate::vm::{ArithmeticOp, Category, Segment};

/// First RAM address of the `temp` segment.
pub const TEMP_BASE: u16 = 5;

/// Number of cells in the `temp` segment (`R5`-`R12`).
pub const TEMP_SIZE: u16 = 8;

/// Register used to hold the target address while popping into a `base + index` segment.
pub const SCRATCH_REGISTER: &str = "R13";

/// Largest literal an A-instruction can load.
pub const MAX_CONSTANT: u16 = 0x7FFF;

macro_rules! svec {
    ($($x:expr),* $(,)?) => (vec![$($x.to_string()),*]);
}

/// Where the value of a `segment index` pair lives.
#[derive(Debug, Clone, PartialEq)]
enum Address {
    /// The index itself is the value.
    Constant(u16),
    /// A named register or symbol holds the value.
    Fixed(String),
    /// The value is at `RAM[base] + index`.
    Based { base: &'static str, index: u16 },
}

/// Translates commands into Hack assembly and appends it to a sink.
///
/// Each comparison command allocates a fresh pair of labels from a counter owned by the
/// generator, so two generators never share label state.
pub struct CodeGenerator<W: Write> {
    sink: W,
    label_counter: usize,
    file_name: Option<String>,
    source_text: Option<String>,
    logger: Logger,
}

impl<W: Write> CodeGenerator<W> {
    pub fn new(sink: W) -> CodeGenerator<W> {
        CodeGenerator::with_logger(sink, None)
    }

    pub fn with_logger<L>(sink: W, logger: L) -> CodeGenerator<W>
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "codegen"));

        CodeGenerator {
            sink,
            label_counter: 0,
            file_name: None,
            source_text: None,
            logger,
        }
    }

    /// Names `static` cells `<name>.<index>` instead of `STATIC_<index>`.
    pub fn set_file_name<S: Into<String>>(&mut self, name: S) {
        self.file_name = Some(name.into());
    }

    /// Text echoed in the comment of the next block instead of the canonical form of the
    /// command. Applies to a single block.
    pub fn set_source_text<S: Into<String>>(&mut self, text: S) {
        self.source_text = Some(text.into());
    }

    fn comment(&mut self, canonical: String) -> String {
        format!("// {}", self.source_text.take().unwrap_or(canonical))
    }

    /// Number of comparisons emitted so far.
    pub fn label_counter(&self) -> usize {
        self.label_counter
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(Error::from)
    }

    /// Emits the block for an arithmetic or logical command given by its mnemonic.
    pub fn emit_arithmetic(&mut self, mnemonic: &str) -> Result<()> {
        let op = match mnemonic.parse::<ArithmeticOp>() {
            Ok(op) => op,
            Err(()) => {
                self.source_text = None;

                return Err(Error::new(ErrorKind::UnsupportedOperator {
                    mnemonic: mnemonic.to_string(),
                }));
            },
        };

        self.write_arithmetic(op)
    }

    pub fn write_arithmetic(&mut self, op: ArithmeticOp) -> Result<()> {
        let comment = self.comment(op.to_string());

        let block = match op {
            ArithmeticOp::Neg => unary_op(comment, '-'),
            ArithmeticOp::Not => unary_op(comment, '!'),
            ArithmeticOp::Add => binary_op(comment, '+'),
            ArithmeticOp::Sub => binary_op(comment, '-'),
            ArithmeticOp::And => binary_op(comment, '&'),
            ArithmeticOp::Or => binary_op(comment, '|'),
            ArithmeticOp::Eq => self.comparison(comment, "JEQ"),
            ArithmeticOp::Lt => self.comparison(comment, "JLT"),
            ArithmeticOp::Gt => self.comparison(comment, "JGT"),
        };

        self.write_block(block)
    }

    /// Emits the block for a `push` or `pop` command.
    ///
    /// The segment name is resolved here, so an unknown segment fails before anything is
    /// written.
    pub fn emit_push_pop(&mut self, category: Category, segment: &str, index: u16) -> Result<()> {
        let segment = segment.parse::<Segment>().map_err(|_| {
            Error::new(ErrorKind::InvalidSegment {
                name: segment.to_string(),
            })
        })?;

        match category {
            Category::Push => self.write_push(segment, index),
            Category::Pop => self.write_pop(segment, index),
            _ => Err(Error::new(ErrorKind::InvalidOperation))
                .context("only push and pop address memory segments"),
        }
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) -> Result<()> {
        let comment = self.comment(format!("push {} {}", segment, index));
        let address = self.resolve(segment, index)?;

        let mut block = match address {
            Address::Constant(value) => svec![comment, format!("@{}", value), "D=A"],
            Address::Fixed(symbol) => svec![comment, format!("@{}", symbol), "D=M"],
            Address::Based { base, index } => svec![
                comment,
                format!("@{}", index),
                "D=A",
                format!("@{}", base),
                "D=M+D", // D = base + index
                "A=D",
                "D=M"
            ],
        };

        // RAM[SP] = D; SP++
        block.extend(svec!["@SP", "A=M", "M=D", "@SP", "M=M+1"]);

        self.write_block(block)
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) -> Result<()> {
        let comment = self.comment(format!("pop {} {}", segment, index));

        // Rejected whatever the index, before the range check in `resolve`.
        if segment == Segment::Constant {
            return Err(Error::new(ErrorKind::InvalidOperation))
                .context("cannot pop into the constant segment");
        }

        let address = self.resolve(segment, index)?;

        let block = match address {
            Address::Constant(_) => return Err(Error::new(ErrorKind::InvalidOperation)),
            Address::Fixed(symbol) => svec![
                comment,
                "@SP",
                "M=M-1",
                "A=M",
                "D=M",
                format!("@{}", symbol),
                "M=D"
            ],
            Address::Based { base, index } => svec![
                comment,
                format!("@{}", index),
                "D=A",
                format!("@{}", base),
                "D=M+D",
                format!("@{}", SCRATCH_REGISTER),
                "M=D", // target address
                "@SP",
                "M=M-1",
                "A=M",
                "D=M",
                format!("@{}", SCRATCH_REGISTER),
                "A=M",
                "M=D"
            ],
        };

        self.write_block(block)
    }

    fn resolve(&self, segment: Segment, index: u16) -> Result<Address> {
        let out_of_range = || Err(Error::new(ErrorKind::InvalidIndex { segment, index }));

        let address = match segment {
            Segment::Constant if index > MAX_CONSTANT => return out_of_range(),
            Segment::Constant => Address::Constant(index),
            Segment::Local => Address::Based { base: "LCL", index },
            Segment::Argument => Address::Based { base: "ARG", index },
            Segment::This => Address::Based { base: "THIS", index },
            Segment::That => Address::Based { base: "THAT", index },
            Segment::Pointer => match index {
                0 => Address::Fixed("THIS".to_string()),
                1 => Address::Fixed("THAT".to_string()),
                _ => return out_of_range(),
            },
            Segment::Temp if index >= TEMP_SIZE => return out_of_range(),
            Segment::Temp => Address::Fixed(format!("R{}", TEMP_BASE + index)),
            Segment::Static => Address::Fixed(self.static_symbol(index)),
        };

        Ok(address)
    }

    fn static_symbol(&self, index: u16) -> String {
        match self.file_name {
            Some(ref name) => format!("{}.{}", name, index),
            None => format!("STATIC_{}", index),
        }
    }

    fn next_label(&mut self) -> usize {
        let label = self.label_counter;
        self.label_counter += 1;
        label
    }

    fn comparison(&mut self, comment: String, jump: &str) -> Vec<String> {
        let n = self.next_label();
        let true_label = format!("TRUE_{}", n);
        let end_label = format!("END_{}", n);

        trace!(self.logger, "allocate labels"; "true" => %true_label, "end" => %end_label);

        svec![
            comment,
            "@SP",
            "M=M-1",
            "A=M",
            "D=M", // y
            "A=A-1",
            "D=M-D", // x - y
            format!("@{}", true_label),
            format!("D;{}", jump),
            "@SP",
            "A=M-1",
            "M=0",
            format!("@{}", end_label),
            "0;JMP",
            format!("({})", true_label),
            "@SP",
            "A=M-1",
            "M=-1",
            format!("({})", end_label)
        ]
    }

    fn write_block(&mut self, block: Vec<String>) -> Result<()> {
        trace!(self.logger, "emit block"; "command" => ?block.first(), "lines" => block.len());

        for line in &block {
            writeln!(self.sink, "{}", line)?;
        }

        Ok(())
    }
}

fn unary_op(comment: String, operator: char) -> Vec<String> {
    svec![comment, "@SP", "A=M-1", format!("M={}M", operator)]
}

fn binary_op(comment: String, operator: char) -> Vec<String> {
    svec![
        comment,
        "@SP",
        "M=M-1",
        "A=M",
        "D=M", // y
        "A=A-1",
        format!("M=M{}D", operator)
    ]
}
