use std::cmp::Ordering;
use std::f64::consts;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use once_cell::sync::OnceCell;
use rug::float::{prec_max, prec_min, Special};
use rug::Float;

/// Default mantissa precision in bits. High enough that a calculator
/// session never runs into visible rounding; a user statement performs a
/// couple dozen operations at most, so the cost is irrelevant.
pub const DEFAULT_PRECISION: u32 = 500;

// Significant decimal digits extracted for stringification.
const FORMAT_DIGITS: usize = 10;

static DEFAULT_PRECISION_CELL: OnceCell<u32> = OnceCell::new();

fn clamp_precision(precision: u32) -> u32 {
    precision.clamp(prec_min(), prec_max())
}

/// Installs the stock default precision. Idempotent; constructing any
/// `Scalar` without an explicit precision has the same effect.
pub fn initialize() {
    let _ = DEFAULT_PRECISION_CELL.set(DEFAULT_PRECISION);
}

/// Installs a custom default precision (clamped to the backend limits).
///
/// The default can be installed exactly once per process. Returns `false`
/// and leaves the installed value untouched when a different default is
/// already in effect, which happens after any `Scalar` has been created.
pub fn initialize_with_precision(precision: u32) -> bool {
    let clamped = clamp_precision(precision);
    match DEFAULT_PRECISION_CELL.set(clamped) {
        Ok(()) => true,
        Err(..) => default_precision() == clamped,
    }
}

/// The precision used by `Scalar` constructors that do not take one.
pub fn default_precision() -> u32 {
    *DEFAULT_PRECISION_CELL.get_or_init(|| DEFAULT_PRECISION)
}

/// The default precision expressed in whole decimal digits.
pub fn decimal_precision() -> usize {
    (f64::from(default_precision()) * consts::LN_2 / consts::LN_10) as usize
}

/// Sign class of a finite or infinite scalar.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// An arbitrary-precision real number, possibly NaN or infinite.
///
/// Arithmetic is correctly rounded (round to nearest, ties to even) at a
/// precision of at least the wider operand. Division by zero and
/// out-of-domain function arguments produce infinities and NaN following
/// IEEE rules; they are ordinary values here, not errors.
///
/// Two scalars compare equal when the backend considers them numerically
/// equal, regardless of precision. NaN compares unequal to everything,
/// including itself.
#[derive(Clone)]
pub struct Scalar {
    value: Float,
}

// Correctly rounded unary functions, surfaced through the function
// registry. The result keeps the argument's precision.
macro_rules! unary_fns {
    ($($id:ident),+ $(,)?) => {
        $(pub fn $id(&self) -> Scalar {
            Scalar { value: self.value.clone().$id() }
        })+
    };
}

impl Scalar {
    pub const NAN_REPRESENTATION: &'static str = "NaN";
    pub const POSITIVE_INFINITY_REPRESENTATION: &'static str = "Inf";
    pub const NEGATIVE_INFINITY_REPRESENTATION: &'static str = "-Inf";
    pub const ZERO_REPRESENTATION: &'static str = "0";

    /// Creates a scalar from a decimal literal at the default precision.
    ///
    /// The literal is an optional sign followed by digits with at most one
    /// decimal point: `"123"`, `"-123.456"`, `"123."`, `".456"`. The lexer
    /// guarantees well-formed literals; anything else constructs NaN.
    pub fn new(decimal: &str) -> Self {
        Self::with_precision(decimal, default_precision())
    }

    /// Creates a scalar from a decimal literal at an explicit mantissa
    /// precision in bits, clamped to `[precision_min(), precision_max()]`.
    pub fn with_precision(decimal: &str, precision: u32) -> Self {
        let precision = clamp_precision(precision);
        let value = match Float::parse(normalize_decimal(decimal)) {
            Ok(parsed) => Float::with_val(precision, parsed),
            Err(..) => Float::with_val(precision, Special::Nan),
        };
        Scalar { value }
    }

    /// Converts a binary float exactly (within the default precision).
    pub fn from_f64(value: f64) -> Self {
        Self::from_f64_with_precision(value, default_precision())
    }

    pub fn from_f64_with_precision(value: f64, precision: u32) -> Self {
        Scalar {
            value: Float::with_val(clamp_precision(precision), value),
        }
    }

    pub fn zero() -> Self {
        Scalar {
            value: Float::with_val(default_precision(), Special::Zero),
        }
    }

    pub fn nan() -> Self {
        Scalar {
            value: Float::with_val(default_precision(), Special::Nan),
        }
    }

    pub fn positive_infinity() -> Self {
        Scalar {
            value: Float::with_val(default_precision(), Special::Infinity),
        }
    }

    pub fn negative_infinity() -> Self {
        Scalar {
            value: Float::with_val(default_precision(), Special::NegInfinity),
        }
    }

    /// Smallest mantissa precision the backend supports, in bits.
    pub fn precision_min() -> u32 {
        prec_min()
    }

    /// Largest mantissa precision the backend supports, in bits.
    pub fn precision_max() -> u32 {
        prec_max()
    }

    /// Mantissa precision of this value, in bits.
    pub fn precision(&self) -> u32 {
        self.value.prec()
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan()
    }

    pub fn is_infinite(&self) -> bool {
        self.value.is_infinite()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Sign class of the value. Meaningless for NaN; callers are expected
    /// to check [`Scalar::is_nan`] first.
    pub fn sign(&self) -> Sign {
        match self.value.cmp0() {
            Some(Ordering::Less) => Sign::Negative,
            Some(Ordering::Greater) => Sign::Positive,
            _ => Sign::Zero,
        }
    }

    /// Lossy conversion for the plotting surface.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64()
    }

    /// Decimal mantissa digits and exponent, such that the value equals
    /// `0.mantissa * 10^exponent` when the mantissa is non-empty.
    ///
    /// The mantissa holds at most ten significant digits (correctly
    /// rounded) with trailing zeros stripped and a leading `-` for
    /// negative values. Zero and non-finite values yield `("", 0)`.
    pub fn to_mantissa_exponent(&self) -> (String, i64) {
        if self.is_nan() || self.is_infinite() || self.is_zero() {
            return (String::new(), 0);
        }

        let (negative, digits, exponent) = self.value.to_sign_string_exp(10, Some(FORMAT_DIGITS));
        let digits = digits.trim_end_matches('0');
        let mantissa = if negative {
            format!("-{digits}")
        } else {
            digits.to_owned()
        };

        (mantissa, i64::from(exponent.unwrap_or(0)))
    }

    unary_fns!(
        abs, ceil, floor, round, round_even, trunc, sqrt, cbrt, exp, ln, log2, erf, erfc, gamma,
        sin, csc, asin, cos, sec, acos, tan, cot, atan, sinh, cosh, tanh, asinh, acosh, atanh,
    );
}

// MPFR wants a digit next to the decimal point, while the calculator
// grammar also allows "123." and ".456".
fn normalize_decimal(decimal: &str) -> String {
    let (sign, digits) = if let Some(rest) = decimal.strip_prefix('-') {
        ("-", rest)
    } else if let Some(rest) = decimal.strip_prefix('+') {
        ("", rest)
    } else {
        ("", decimal)
    };

    let digits = digits.strip_suffix('.').unwrap_or(digits);
    if let Some(fraction) = digits.strip_prefix('.') {
        format!("{sign}0.{fraction}")
    } else {
        format!("{sign}{digits}")
    }
}

impl Default for Scalar {
    fn default() -> Scalar {
        Scalar::zero()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.value == other.value
    }
}

macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for &Scalar {
            type Output = Scalar;

            fn $method(self, rhs: &Scalar) -> Scalar {
                let precision = self.value.prec().max(rhs.value.prec());
                Scalar {
                    value: Float::with_val(precision, &self.value $op &rhs.value),
                }
            }
        }

        impl $trait for Scalar {
            type Output = Scalar;

            fn $method(self, rhs: Scalar) -> Scalar {
                &self $op &rhs
            }
        }
    };
}

scalar_binop!(Add, add, +);
scalar_binop!(Sub, sub, -);
scalar_binop!(Mul, mul, *);
scalar_binop!(Div, div, /);

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar {
            value: Float::with_val(self.value.prec(), -&self.value),
        }
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        -&self
    }
}

struct Decomposition {
    negative: bool,
    pre_decimal: String,
    post_decimal: String,
    exponent: Option<i64>,
}

// Outside [-2, 8) the fixed form stops being readable and the scientific
// form M.ANTISSAeE takes over.
const READABLE_MIN: i64 = -2;
const READABLE_MAX: i64 = 8;

fn decompose(mantissa: String, exponent: i64) -> Decomposition {
    let mut decomposition = Decomposition {
        negative: false,
        pre_decimal: String::new(),
        post_decimal: String::new(),
        exponent: None,
    };

    let mut mantissa = mantissa;
    if let Some(unsigned) = mantissa.strip_prefix('-') {
        decomposition.negative = true;
        mantissa = unsigned.to_owned();
    }

    if mantissa.is_empty() {
        decomposition.pre_decimal.push('0');
        return decomposition;
    }

    if exponent <= READABLE_MIN || exponent >= READABLE_MAX {
        if mantissa.len() == 1 {
            mantissa.push('0');
        }
        decomposition.pre_decimal = mantissa[..1].to_owned();
        decomposition.post_decimal = mantissa[1..].to_owned();
        decomposition.exponent = Some(exponent - 1);
    } else if exponent <= 0 {
        // Numbers like 0.0000MANTISSA
        decomposition.post_decimal = "0".repeat(exponent.unsigned_abs() as usize) + &mantissa;
    } else if exponent as usize >= mantissa.len() {
        // Numbers like MANTISSA0000
        let padding = exponent as usize - mantissa.len();
        decomposition.pre_decimal = mantissa + &"0".repeat(padding);
    } else {
        // Numbers like MANT.ISSA
        let (integral, fraction) = mantissa.split_at(exponent as usize);
        decomposition.pre_decimal = integral.to_owned();
        decomposition.post_decimal = fraction.to_owned();
    }

    decomposition
}

fn group_digits(mut decomposition: Decomposition) -> Decomposition {
    const DIGIT_SEPARATOR: char = '_';

    // Threes before the decimal point, counted from the right.
    let mut offset = 3;
    while offset < decomposition.pre_decimal.len() {
        let at = decomposition.pre_decimal.len() - offset;
        decomposition.pre_decimal.insert(at, DIGIT_SEPARATOR);
        offset += 4;
    }

    // Threes after the decimal point, counted from the left.
    let mut at = 3;
    while at < decomposition.post_decimal.len() {
        decomposition.post_decimal.insert(at, DIGIT_SEPARATOR);
        at += 4;
    }

    decomposition
}

fn render(decomposition: Decomposition) -> String {
    let Decomposition {
        negative,
        pre_decimal,
        post_decimal,
        exponent,
    } = decomposition;
    let sign = if negative { "-" } else { "" };

    if let Some(exponent) = exponent {
        format!("{sign}{pre_decimal}.{post_decimal}e{exponent}")
    } else if pre_decimal.is_empty() {
        format!("{sign}0.{post_decimal}")
    } else if post_decimal.is_empty() {
        format!("{sign}{pre_decimal}")
    } else {
        format!("{sign}{pre_decimal}.{post_decimal}")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_nan() {
            return f.write_str(Self::NAN_REPRESENTATION);
        }
        if self.is_infinite() {
            return f.write_str(if self.value.is_sign_negative() {
                Self::NEGATIVE_INFINITY_REPRESENTATION
            } else {
                Self::POSITIVE_INFINITY_REPRESENTATION
            });
        }
        if self.is_zero() {
            return f.write_str(Self::ZERO_REPRESENTATION);
        }

        let (mantissa, exponent) = self.to_mantissa_exponent();
        f.write_str(&render(group_digits(decompose(mantissa, exponent))))
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scalar({self})")
    }
}
