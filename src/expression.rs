use std::fmt;

use crate::functions::FunctionRef;
use crate::scalar::Scalar;

/// Identifier of the free input variable. Reserved: the registry refuses
/// it as a function name and the parser recognizes it as a term.
pub const VARIABLE_NAME: &str = "x";

/// Binary operator between two terms. `Plus` and `Minus` form the
/// additive precedence class, `Multiply` and `Divide` the multiplicative
/// one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn is_multiplicative(self) -> bool {
        matches!(self, BinaryOp::Multiply | BinaryOp::Divide)
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Plus => '+',
            BinaryOp::Minus => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }
}

/// One leaf of the expression tree: a literal, the free variable, or a
/// parenthesized sub-expression owning its own subtree.
#[derive(Clone, PartialEq, Debug)]
pub enum Term {
    Number(Scalar),
    Variable,
    SubExpression(Expression),
}

/// A mathematical expression: terms interleaved with binary operators,
/// an optional unary function applied to the reduced value, and an
/// optional final negation.
///
/// For example in `1 + -sin(1 + 1)` the term `-sin(1 + 1)` is an
/// `Expression` whose function is the sine and whose negation is set;
/// negation applies after the function, so `-sin(1) = -(sin(1))`.
///
/// Produced by the parser and immutable afterwards; evaluation takes
/// `&self` and the backend is reentrant, so one expression can be sampled
/// from several threads at once. A well-formed expression always
/// satisfies `terms.len() == operators.len() + 1`; the empty state exists
/// only while the parser is still filling the tree in.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Expression {
    terms: Vec<Term>,
    operators: Vec<BinaryOp>,
    negate: bool,
    function: Option<FunctionRef>,
}

impl Expression {
    pub(crate) fn new() -> Self {
        Expression::default()
    }

    pub(crate) fn push_term(&mut self, term: Term) {
        debug_assert_eq!(self.terms.len(), self.operators.len());
        self.terms.push(term);
    }

    pub(crate) fn push_operator(&mut self, operator: BinaryOp) {
        debug_assert_eq!(self.terms.len(), self.operators.len() + 1);
        self.operators.push(operator);
    }

    /// Negate the reduced value as the final evaluation step.
    pub(crate) fn set_negate(&mut self, negate: bool) {
        self.negate = negate;
    }

    /// Unary function applied to the reduced value, before any negation.
    pub(crate) fn set_function(&mut self, function: FunctionRef) {
        self.function = Some(function);
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether every operator sits between two terms. Expressions that
    /// leave the parser always are; the empty tree is not.
    pub fn is_well_formed(&self) -> bool {
        self.terms.len() == self.operators.len() + 1
    }

    /// True when the free variable appears anywhere in the tree.
    pub fn has_variable(&self) -> bool {
        self.terms.iter().any(|term| match term {
            Term::Number(..) => false,
            Term::Variable => true,
            Term::SubExpression(sub) => sub.has_variable(),
        })
    }

    /// Evaluates the expression, substituting `variable` for the free
    /// variable if one is supplied.
    ///
    /// Reduction is PEMDAS with left-to-right associativity: one pass
    /// contracting `*` and `/`, then a left fold over `+` and `-`. NaN
    /// and infinities flow through as values. Returns `None` when the
    /// tree is malformed or when the free variable occurs and no value
    /// was supplied for it.
    ///
    /// No memoization; the calculation costs the same each time.
    pub fn evaluate(&self, variable: Option<&Scalar>) -> Option<Scalar> {
        if !self.is_well_formed() {
            return None;
        }

        let mut terms = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            terms.push(match term {
                Term::Number(number) => number.clone(),
                Term::Variable => variable?.clone(),
                Term::SubExpression(sub) => sub.evaluate(variable)?,
            });
        }
        let mut operators = self.operators.clone();

        // Multiplication and division first. The index stays put after a
        // contraction: the new value may sit to the left of another
        // multiplicative operator.
        let mut index = 0;
        while index < operators.len() {
            if !operators[index].is_multiplicative() {
                index += 1;
                continue;
            }

            let operator = operators.remove(index);
            let rhs = terms.remove(index + 1);
            let contracted = match operator {
                BinaryOp::Multiply => &terms[index] * &rhs,
                _ => &terms[index] / &rhs,
            };
            terms[index] = contracted;
        }

        // Addition and subtraction next, folding from the left.
        while !operators.is_empty() {
            let operator = operators.remove(0);
            let rhs = terms.remove(1);
            let contracted = match operator {
                BinaryOp::Plus => &terms[0] + &rhs,
                _ => &terms[0] - &rhs,
            };
            terms[0] = contracted;
        }

        debug_assert_eq!(terms.len(), 1);
        let mut result = terms.pop()?;

        if let Some(function) = self.function {
            result = function.apply(&result);
        }
        if self.negate {
            result = -result;
        }

        Some(result)
    }

    /// Evaluates with the free variable bound to `variable`. The plotting
    /// surface calls this once per sample point.
    pub fn evaluate_at(&self, variable: &Scalar) -> Option<Scalar> {
        self.evaluate(Some(variable))
    }

    fn fmt_term(&self, index: usize, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.terms[index] {
            Term::Number(number) => write!(f, "{number}"),
            Term::Variable => f.write_str(VARIABLE_NAME),
            Term::SubExpression(sub) => write!(f, "({sub})"),
        }
    }
}

impl fmt::Display for Expression {
    /// Canonical comma-delimited form: `term,op,term,…` with
    /// sub-expressions in parentheses and the unary function wrapping the
    /// whole rendering as `name(…)`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Empty");
        }
        if !self.is_well_formed() {
            return f.write_str("Invalid");
        }

        if self.negate {
            f.write_str("-")?;
        }
        if let Some(function) = &self.function {
            write!(f, "{}(", function.name())?;
        } else if self.negate {
            f.write_str("(")?;
        }

        self.fmt_term(0, f)?;
        for (index, operator) in self.operators.iter().enumerate() {
            write!(f, ",{},", operator.symbol())?;
            self.fmt_term(index + 1, f)?;
        }

        if self.function.is_some() || self.negate {
            f.write_str(")")?;
        }
        Ok(())
    }
}
