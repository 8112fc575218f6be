use crate::errors::InterpretError;
use crate::expression::BinaryOp;

/// One lexical element of calculator input.
///
/// Number tokens keep their raw lexeme; conversion to a scalar happens in
/// the parser, so precision decisions stay out of lexical code. The
/// variable name `x` is an ordinary identifier here; its reservation is
/// enforced by the parser.
#[derive(Clone, PartialEq, Debug)]
pub enum Token {
    Identifier(String),
    Number(String),
    Operator(BinaryOp),
    OpenBracket,
    CloseBracket,
}

// Shared with the facade's prettify: any whitespace code point vanishes
// before tokenization, so "1 2 3 . 4" and "123.4" are the same input.
pub(crate) fn strip_whitespace(raw_input: &str) -> String {
    raw_input
        .chars()
        .filter(|character| !character.is_whitespace())
        .collect()
}

/// Converts raw user input into a token stream.
///
/// Geared towards calculator input, not a general programming language:
/// single-character operators and brackets, identifiers of ASCII letters
/// then letters-or-digits, and decimal literals with at most one `.`.
/// The grammar is not known at this stage, so streams that cannot parse
/// (e.g. two literals in a row) are still emitted.
///
/// A lone `.` and any unrecognized character are lexical errors.
pub fn tokenize(raw_input: &str) -> Result<Vec<Token>, InterpretError> {
    let trimmed = strip_whitespace(raw_input);
    let mut tokens = Vec::new();
    let mut chars = trimmed.chars().peekable();

    while let Some(character) = chars.next() {
        let token = match character {
            '+' => Token::Operator(BinaryOp::Plus),
            '-' => Token::Operator(BinaryOp::Minus),
            '*' => Token::Operator(BinaryOp::Multiply),
            '/' => Token::Operator(BinaryOp::Divide),
            '(' => Token::OpenBracket,
            ')' => Token::CloseBracket,
            c if c.is_ascii_alphabetic() => {
                let mut identifier = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() || next.is_ascii_digit() {
                        identifier.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Identifier(identifier)
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut lexeme = String::from(c);
                let mut fractional = c == '.';
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() || (next == '.' && !fractional) {
                        fractional |= next == '.';
                        lexeme.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if lexeme == "." {
                    return Err(InterpretError::LexError);
                }
                Token::Number(lexeme)
            }
            _ => return Err(InterpretError::LexError),
        };
        tokens.push(token);
    }

    Ok(tokens)
}
