use crate::errors::InterpretError;
use crate::expression::{BinaryOp, Expression, Term, VARIABLE_NAME};
use crate::functions::FunctionRegistry;
use crate::lexer::Token;
use crate::scalar::Scalar;

/// Converts a token stream into an evaluable expression, enforcing the
/// calculator grammar (see the crate documentation).
///
/// The parser walks the tokens once, keeping a stack of the currently
/// open expressions (the root stays at the bottom) and a flag saying
/// whether the next token must start a new term. Tokens that start a term
/// are literals, function names and opening brackets; operators and
/// closing brackets may only appear once a term is complete. The unary
/// `-` is the one overlap between the two sets: where a term is expected
/// it negates the upcoming literal or sub-expression instead of
/// subtracting.
pub fn parse(functions: &FunctionRegistry, tokens: &[Token]) -> Result<Expression, InterpretError> {
    let mut stack = vec![Expression::new()];
    let mut expect_term = true;
    let mut position = 0;

    while position < tokens.len() {
        if expect_term {
            let negate = matches!(tokens[position], Token::Operator(BinaryOp::Minus));
            if negate {
                position += 1;
            }

            match tokens.get(position) {
                Some(Token::Identifier(name)) if name == VARIABLE_NAME => {
                    if negate {
                        // Negating the variable in place ("5 * -x") is not
                        // supported yet; "-(x)" is the spelling that works.
                        return Err(InterpretError::ParseError);
                    }
                    // The stack bottom always holds the root, so the
                    // unwraps on it cannot fail.
                    stack.last_mut().unwrap().push_term(Term::Variable);
                    expect_term = false;
                }
                Some(Token::Identifier(name)) => {
                    if !matches!(tokens.get(position + 1), Some(Token::OpenBracket)) {
                        return Err(InterpretError::ParseError);
                    }
                    let function = functions
                        .lookup(name)
                        .ok_or(InterpretError::ParseError)?;

                    let mut sub = Expression::new();
                    sub.set_negate(negate);
                    sub.set_function(function);
                    stack.push(sub);
                    position += 1;
                }
                Some(Token::OpenBracket) => {
                    let mut sub = Expression::new();
                    sub.set_negate(negate);
                    stack.push(sub);
                }
                Some(Token::Number(lexeme)) => {
                    let value = Scalar::new(lexeme);
                    stack
                        .last_mut()
                        .unwrap()
                        .push_term(Term::Number(if negate { -value } else { value }));
                    expect_term = false;
                }
                _ => return Err(InterpretError::ParseError),
            }
            position += 1;
        } else {
            match &tokens[position] {
                Token::Operator(operator) => {
                    stack.last_mut().unwrap().push_operator(*operator);
                    expect_term = true;
                }
                Token::CloseBracket if stack.len() > 1 => {
                    // Depth > 1 was just checked, so both calls succeed.
                    let sub = stack.pop().unwrap();
                    stack.last_mut().unwrap().push_term(Term::SubExpression(sub));
                }
                _ => return Err(InterpretError::ParseError),
            }
            position += 1;
        }
    }

    if expect_term || stack.len() != 1 {
        return Err(InterpretError::ParseError);
    }

    Ok(stack.pop().unwrap())
}
