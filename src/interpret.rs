use crate::errors::InterpretError;
use crate::expression::Expression;
use crate::functions::FunctionRegistry;
use crate::lexer;
use crate::parser;
use crate::scalar::{self, Scalar};

/// Library frontend: chains lexer, parser and evaluator to get from raw
/// user input to a result or a stage-tagged error.
pub struct Interpreter {
    functions: FunctionRegistry,
}

impl Interpreter {
    pub fn new(functions: FunctionRegistry) -> Self {
        // The numeric backend wants its default precision installed
        // before the first scalar exists.
        scalar::initialize();
        Interpreter { functions }
    }

    /// Echoes user input in a standardized form: whitespace removed,
    /// nothing validated. The live preview shows this while typing.
    pub fn prettify(raw_input: &str) -> String {
        lexer::strip_whitespace(raw_input)
    }

    /// Parses user input into a reusable expression without evaluating
    /// it. The expression may contain the free variable `x` and can be
    /// evaluated repeatedly at different values, e.g. for plotting.
    pub fn parse_expression(&self, raw_input: &str) -> Result<Expression, InterpretError> {
        let tokens = lexer::tokenize(raw_input)?;
        parser::parse(&self.functions, &tokens)
    }

    /// Parses and evaluates user input as a mathematical expression.
    ///
    /// An expression containing the free variable has no single value and
    /// is rejected with [`InterpretError::EvaluationError`]. Backend NaN
    /// and infinities are results, not errors.
    pub fn interpret_value(&self, raw_input: &str) -> Result<Scalar, InterpretError> {
        let expression = self.parse_expression(raw_input)?;
        if expression.has_variable() {
            return Err(InterpretError::EvaluationError);
        }

        expression
            .evaluate(None)
            .ok_or(InterpretError::EvaluationError)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(FunctionRegistry::create_with_defaults())
    }
}
