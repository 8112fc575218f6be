//! Property-based tests over the public interpretation pipeline.

use quickcheck::{QuickCheck, TestResult};

use calq_lib::errors::InterpretError;
use calq_lib::interpret::Interpreter;
use calq_lib::lexer::{tokenize, Token};
use calq_lib::scalar::Scalar;

fn same_outcome(
    lhs: &Result<Scalar, InterpretError>,
    rhs: &Result<Scalar, InterpretError>,
) -> bool {
    match (lhs, rhs) {
        (Ok(a), Ok(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Err(a), Err(b)) => a == b,
        _ => false,
    }
}

// The canonical rendering of a token stream: relexing it must reproduce
// the stream exactly.
fn render_tokens(tokens: &[Token]) -> String {
    let mut output = String::new();
    for token in tokens {
        match token {
            Token::Identifier(name) => output.push_str(name),
            Token::Number(lexeme) => output.push_str(lexeme),
            Token::Operator(operator) => output.push(operator.symbol()),
            Token::OpenBracket => output.push('('),
            Token::CloseBracket => output.push(')'),
        }
    }
    output
}

#[test]
fn prop_interpret_never_panics() {
    fn no_panic(input: String) -> TestResult {
        let interpreter = Interpreter::default();
        let _ = interpreter.interpret_value(&input);
        let _ = interpreter.parse_expression(&input);
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(no_panic as fn(String) -> TestResult);
}

#[test]
fn prop_prettify_is_idempotent() {
    fn idempotent(input: String) -> bool {
        let once = Interpreter::prettify(&input);
        Interpreter::prettify(&once) == once
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(idempotent as fn(String) -> bool);
}

#[test]
fn prop_whitespace_is_invisible() {
    fn invariant(input: String, seed: usize) -> bool {
        let interpreter = Interpreter::default();

        // Sprinkle whitespace at a seed-dependent stride.
        let stride = seed % 3 + 1;
        let mut spaced = String::new();
        for (index, character) in input.chars().enumerate() {
            if index % stride == 0 {
                spaced.push(' ');
            }
            spaced.push(character);
            if index % 2 == 0 {
                spaced.push('\t');
            }
        }

        same_outcome(
            &interpreter.interpret_value(&input),
            &interpreter.interpret_value(&spaced),
        )
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(invariant as fn(String, usize) -> bool);
}

#[test]
fn prop_precedence_law() {
    fn law(operands: (u8, u8, u8, u8, u8)) -> bool {
        let (a, b, c, d, e) = operands;
        let interpreter = Interpreter::default();
        let input = format!("{a} + {b} * {c} - {d} / {e}");

        let expected = Scalar::new(&a.to_string())
            + Scalar::new(&b.to_string()) * Scalar::new(&c.to_string())
            - Scalar::new(&d.to_string()) / Scalar::new(&e.to_string());

        same_outcome(&interpreter.interpret_value(&input), &Ok(expected))
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(law as fn((u8, u8, u8, u8, u8)) -> bool);
}

#[test]
fn prop_lexer_is_idempotent() {
    fn idempotent(input: String) -> TestResult {
        let Ok(tokens) = tokenize(&input) else {
            return TestResult::discard();
        };
        TestResult::from_bool(tokenize(&render_tokens(&tokens)) == Ok(tokens))
    }
    QuickCheck::new()
        .tests(1000)
        .max_tests(5000)
        .quickcheck(idempotent as fn(String) -> TestResult);
}

#[test]
fn test_lexer_idempotent_on_corpus() {
    let corpus = [
        "0+1-2*3/4",
        "1.2.3",
        "sin123.456",
        "2.0 * (3.0 + 4.0)",
        "-id(-(x))",
        "123sin",
        ".5+5.",
        "((((1))))",
    ];
    for input in corpus {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokenize(&render_tokens(&tokens)), Ok(tokens), "input: {input:?}");
    }
}

#[test]
fn prop_formatter_round_trips() {
    fn round_trip(mantissa: u32, split: u8) -> bool {
        let digits = mantissa.to_string();
        let split = split as usize % (digits.len() + 1);
        let (integral, fraction) = digits.split_at(split);
        let literal = format!("{integral}.{fraction}");

        let value = Scalar::new(&literal);
        // The canonical form re-parses to the same value; digit group
        // separators are not part of the literal grammar.
        let canonical = value.to_string().replace('_', "");
        value == Scalar::new(&canonical)
    }
    QuickCheck::new()
        .tests(1000)
        .quickcheck(round_trip as fn(u32, u8) -> bool);
}

#[test]
fn prop_parsed_expressions_evaluate_at_any_point() {
    fn total(numerator: i32, denominator: i32, at: i32) -> bool {
        let interpreter = Interpreter::default();
        let expression = interpreter
            .parse_expression(&format!(
                "{} / ({} + x) * sin(x)",
                numerator.unsigned_abs(),
                denominator.unsigned_abs()
            ))
            .expect("well-formed input");

        // Whatever the sample point, evaluation yields a scalar; division
        // by zero and domain misses surface as Inf/NaN values.
        expression.evaluate_at(&Scalar::new(&at.to_string())).is_some()
    }
    QuickCheck::new()
        .tests(500)
        .quickcheck(total as fn(i32, i32, i32) -> bool);
}
