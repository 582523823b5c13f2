//! Parser for Hack assembly text.

use std::fmt;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize, verify},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use super::instruction::{Address, Comp, Dest, Instruction, Jump};

/// An instruction together with the 1-based line number it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub instruction: Instruction,
}

/// A line that is not valid Hack assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub text: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at line {}: invalid instruction '{}'", self.line, self.text)
    }
}

impl std::error::Error for ParseError {}

const SYMBOL_PUNCTUATION: &str = "_.$:";

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || SYMBOL_PUNCTUATION.contains(c)
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || SYMBOL_PUNCTUATION.contains(c)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_symbol_start), take_while(is_symbol_char)))(input)
}

fn literal(input: &str) -> IResult<&str, u16> {
    verify(
        map_res(digit1, |n: &str| n.parse::<u16>()),
        |n: &u16| *n <= 0x7FFF,
    )(input)
}

fn address(input: &str) -> IResult<&str, Instruction> {
    map(
        preceded(
            char('@'),
            alt((
                map(literal, Address::Literal),
                map(symbol, |s: &str| Address::Symbol(s.to_string())),
            )),
        ),
        Instruction::Address,
    )(input)
}

fn label(input: &str) -> IResult<&str, Instruction> {
    map(
        delimited(char('('), symbol, char(')')),
        |s: &str| Instruction::Label(s.to_string()),
    )(input)
}

fn dest(input: &str) -> IResult<&str, Dest> {
    terminated(
        map_opt(take_while1(|c: char| "ADM".contains(c)), Dest::from_mnemonic),
        char('='),
    )(input)
}

fn comp(input: &str) -> IResult<&str, Comp> {
    map_opt(take_while1(|c: char| "01-!+&|ADM".contains(c)), Comp::from_mnemonic)(input)
}

fn jump(input: &str) -> IResult<&str, Jump> {
    preceded(
        char(';'),
        map_opt(take_while1(|c: char| c.is_ascii_uppercase()), Jump::from_mnemonic),
    )(input)
}

fn compute(input: &str) -> IResult<&str, Instruction> {
    map(
        tuple((opt(dest), comp, opt(jump))),
        |(dest, comp, jump)| Instruction::Compute {
            dest: dest.unwrap_or_default(),
            comp,
            jump: jump.unwrap_or(Jump::Never),
        },
    )(input)
}

/// Parses a single line with comments and whitespace already removed.
pub fn parse_instruction(input: &str) -> Option<Instruction> {
    all_consuming(alt((address, label, compute)))(input)
        .ok()
        .map(|(_, instruction)| instruction)
}

/// Parses a whole assembly file. Whitespace anywhere on a line and `//` comments are ignored.
pub fn parse_program(input: &str) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();

    for (i, raw) in input.split('\n').enumerate() {
        let code = raw.split("//").next().unwrap_or("");
        let code = code.chars().filter(|c| !c.is_whitespace()).collect::<String>();

        if code.is_empty() {
            continue;
        }

        match parse_instruction(&code) {
            Some(instruction) => statements.push(Statement { line: i + 1, instruction }),
            None => return Err(ParseError {
                line: i + 1,
                text: raw.trim().to_string(),
            }),
        }
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute_ins(dest: &str, comp: &str, jump: Jump) -> Instruction {
        Instruction::Compute {
            dest: Dest::from_mnemonic(dest).unwrap(),
            comp: Comp::from_mnemonic(comp).unwrap(),
            jump,
        }
    }

    #[test]
    fn test_parse_instructions() {
        assert_eq!(parse_instruction("@17"), Some(Instruction::Address(Address::Literal(17))));
        assert_eq!(
            parse_instruction("@Main.loop$1"),
            Some(Instruction::Address(Address::Symbol("Main.loop$1".to_string()))),
        );
        assert_eq!(parse_instruction("(TRUE_0)"), Some(Instruction::Label("TRUE_0".to_string())));
        assert_eq!(parse_instruction("AM=M-1"), Some(compute_ins("AM", "M-1", Jump::Never)));
        assert_eq!(parse_instruction("D;JGT"), Some(compute_ins("", "D", Jump::Greater)));
        assert_eq!(parse_instruction("0;JMP"), Some(compute_ins("", "0", Jump::Always)));
        assert_eq!(parse_instruction("D=M+D"), Some(compute_ins("D", "D+M", Jump::Never)));
    }

    #[test]
    fn test_reject_invalid_instructions() {
        assert_eq!(parse_instruction("@32768"), None);
        assert_eq!(parse_instruction("@1abc"), None);
        assert_eq!(parse_instruction("D=D*A"), None);
        assert_eq!(parse_instruction("D;JXX"), None);
        assert_eq!(parse_instruction("(unclosed"), None);
        assert_eq!(parse_instruction("X=1"), None);
    }

    #[test]
    fn test_parse_program_skips_comments() {
        let source = "// header\n\n  @SP   // stack pointer\r\n  M = M + 1\n";
        let statements = parse_program(source).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].line, 3);
        assert_eq!(statements[1].instruction, compute_ins("M", "M+1", Jump::Never));
    }

    #[test]
    fn test_parse_program_reports_line() {
        let err = parse_program("@1\nD=A\nbogus\n").unwrap_err();

        assert_eq!(err.line, 3);
        assert_eq!(err.text, "bogus");
    }

    #[test]
    fn test_display_round_trip() {
        for line in &["@42", "@SP", "(LOOP)", "D=M", "AM=M-1", "0;JMP", "MD=D+1;JNE"] {
            let instruction = parse_instruction(line).unwrap();
            assert_eq!(instruction.to_string(), *line);
        }
    }
}
