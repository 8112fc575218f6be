//! # Calculator expression engine
//!
//! The engine turns textual arithmetic expressions into arbitrary-precision
//! results, or into reusable expression trees that can be re-evaluated at
//! different values of the free variable `x` (for plotting).
//!
//! Input is interpreted in three stages. The lexer removes all whitespace
//! and converts the remaining characters into tokens, so `1 2 3 . 4` and
//! `123.4` are the same literal. The parser enforces the calculator
//! grammar and builds an [`expression::Expression`] tree, binding function
//! names through a [`functions::FunctionRegistry`]. Evaluation reduces the
//! tree with standard PEMDAS ordering: multiplication and division
//! left-to-right first, then addition and subtraction.
//!
//! Numbers are [`scalar::Scalar`] values backed by MPFR, so results are
//! correctly rounded at a configurable default precision (500 bits unless
//! [`scalar::initialize_with_precision`] installed another one before the
//! first `Scalar` was created). Division by zero and out-of-domain
//! function arguments follow IEEE rules and yield infinities or NaN
//! instead of errors.
//!
//! The grammar:
//!
//! ```text
//! expression  := ['-'] [identifier] '(' inner ')'
//!              | inner                       (outermost only)
//! inner       := term { operator term }
//! term        := number | 'x' | ['-'] [identifier] '(' inner ')'
//! operator    := '+' | '-' | '*' | '/'
//! number      := ( {digit} ['.'] {digit} ) - '.'
//! ```
//!
//! Supported unary functions: `id`, `abs`, `ceil`, `floor`, `round`,
//! `roundeven`, `trunc`, `sqrt`, `cbrt`, `exp`, `log`, `log2`, `erf`,
//! `erfc`, `gamma`, `sin`, `csc`, `asin`, `cos`, `sec`, `acos`, `tan`,
//! `cot`, `atan`, `sinh`, `cosh`, `tanh`, `asinh`, `acosh`, `atanh`.
//! `log` is the natural logarithm. The identifier `x` is reserved for the
//! free variable and can never name a function.
//!
//! Known limitations, kept deliberately: no unary `+`, and no unary `-`
//! directly before `x` (write `-(x)` instead). There is no implicit
//! multiplication and no exponent operator.

pub mod errors;
pub mod expression;
pub mod functions;
pub mod interpret;
pub mod lexer;
pub mod parser;
pub mod scalar;
