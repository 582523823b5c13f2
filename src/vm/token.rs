//! Tokens and a tokenizer for VM source lines.

use logos::{Lexer, Logos};

use std::fmt;

use super::command::{ArithmeticOp, Mnemonic, Segment};

/// Enumeration of all tokens of the VM language.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    /// Errorneous token that could not be interpreted as any of the other variants.
    #[error]
    #[regex(r"[ \t\f\r\n]+", logos::skip)]
    Error,

    /// A command word.
    #[regex("push|pop|add|sub|neg|eq|gt|lt|and|or|not|label|goto|if-goto|function|return|call", mnemonic_callback)]
    Mnemonic(Mnemonic),

    /// A memory segment name.
    #[regex("local|argument|this|that|pointer|temp|static|constant", segment_callback)]
    Segment(Segment),

    /// A non-negative number literal that fits in a machine word.
    #[regex("[0-9]+", number_callback)]
    Number(u16),

    /// A symbol which begins with a letter or one of `_.:$` and can contain digits.
    #[regex("[A-Za-z_.:$][A-Za-z0-9_.:$]*", Lexer::slice)]
    Symbol(&'a str),
}

fn mnemonic_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> std::result::Result<Mnemonic, ()> {
    let mnemonic = match lex.slice() {
        "push" => Mnemonic::Push,
        "pop" => Mnemonic::Pop,
        "add" => Mnemonic::Arithmetic(ArithmeticOp::Add),
        "sub" => Mnemonic::Arithmetic(ArithmeticOp::Sub),
        "neg" => Mnemonic::Arithmetic(ArithmeticOp::Neg),
        "eq" => Mnemonic::Arithmetic(ArithmeticOp::Eq),
        "gt" => Mnemonic::Arithmetic(ArithmeticOp::Gt),
        "lt" => Mnemonic::Arithmetic(ArithmeticOp::Lt),
        "and" => Mnemonic::Arithmetic(ArithmeticOp::And),
        "or" => Mnemonic::Arithmetic(ArithmeticOp::Or),
        "not" => Mnemonic::Arithmetic(ArithmeticOp::Not),
        "label" => Mnemonic::Label,
        "goto" => Mnemonic::Goto,
        "if-goto" => Mnemonic::IfGoto,
        "function" => Mnemonic::Function,
        "return" => Mnemonic::Return,
        "call" => Mnemonic::Call,
        _ => return Err(()),
    };

    Ok(mnemonic)
}

fn segment_callback<'a>(lex: &mut Lexer<'a, Token<'a>>) -> std::result::Result<Segment, ()> {
    let segment = match lex.slice() {
        "local" => Segment::Local,
        "argument" => Segment::Argument,
        "this" => Segment::This,
        "that" => Segment::That,
        "pointer" => Segment::Pointer,
        "temp" => Segment::Temp,
        "static" => Segment::Static,
        "constant" => Segment::Constant,
        _ => return Err(()),
    };

    Ok(segment)
}

fn number_callback<'a>(
    lex: &mut Lexer<'a, Token<'a>>,
) -> std::result::Result<u16, std::num::ParseIntError> {
    lex.slice().parse()
}

/// Interprets a single whitespace-free word as one token.
///
/// Returns [Token::Error] unless the whole word lexes as exactly one token, so `12abc` or
/// `push2` are errors rather than two tokens.
pub fn classify(word: &str) -> Token<'_> {
    let mut lexer = Token::lexer(word);

    match lexer.next() {
        Some(token) if lexer.span() == (0..word.len()) => token,
        _ => Token::Error,
    }
}

impl<'t> fmt::Display for Token<'t> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Error => write!(f, "<error>"),
            Token::Mnemonic(mnemonic) => write!(f, "{}", mnemonic),
            Token::Segment(segment) => write!(f, "{}", segment),
            Token::Number(num) => write!(f, "{}", num),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_push_line() {
        let tokens = Token::lexer("push  local\t12").collect::<Vec<_>>();

        assert_eq!(tokens, vec![
            Token::Mnemonic(Mnemonic::Push),
            Token::Segment(Segment::Local),
            Token::Number(12),
        ]);
    }

    #[test]
    fn test_classify_keywords_and_symbols() {
        assert_eq!(classify("if-goto"), Token::Mnemonic(Mnemonic::IfGoto));
        assert_eq!(classify("eq"), Token::Mnemonic(Mnemonic::Arithmetic(ArithmeticOp::Eq)));
        assert_eq!(classify("equal"), Token::Symbol("equal"));
        assert_eq!(classify("Main.loop$1"), Token::Symbol("Main.loop$1"));
        assert_eq!(classify("that"), Token::Segment(Segment::That));
    }

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify("0"), Token::Number(0));
        assert_eq!(classify("65535"), Token::Number(65535));
        assert_eq!(classify("65536"), Token::Error);
        assert_eq!(classify("-1"), Token::Error);
        assert_eq!(classify("12abc"), Token::Error);
    }
}
