use std::fmt;

use phf::phf_map;

use crate::expression::VARIABLE_NAME;
use crate::scalar::Scalar;

/// A named unary function over scalars, e.g. `sin`.
pub type UnaryFunction = fn(&Scalar) -> Scalar;

// The catalog is fixed at compile time. `log` is the natural logarithm,
// `round` rounds half away from zero, `roundeven` rounds half to even.
static DEFAULT_CATALOG: phf::Map<&'static str, UnaryFunction> = phf_map! {
    "id" => Scalar::clone,
    "abs" => Scalar::abs,
    "ceil" => Scalar::ceil,
    "floor" => Scalar::floor,
    "round" => Scalar::round,
    "roundeven" => Scalar::round_even,
    "trunc" => Scalar::trunc,
    "sqrt" => Scalar::sqrt,
    "cbrt" => Scalar::cbrt,
    "exp" => Scalar::exp,
    "log" => Scalar::ln,
    "log2" => Scalar::log2,
    "erf" => Scalar::erf,
    "erfc" => Scalar::erfc,
    "gamma" => Scalar::gamma,
    "sin" => Scalar::sin,
    "csc" => Scalar::csc,
    "asin" => Scalar::asin,
    "cos" => Scalar::cos,
    "sec" => Scalar::sec,
    "acos" => Scalar::acos,
    "tan" => Scalar::tan,
    "cot" => Scalar::cot,
    "atan" => Scalar::atan,
    "sinh" => Scalar::sinh,
    "cosh" => Scalar::cosh,
    "tanh" => Scalar::tanh,
    "asinh" => Scalar::asinh,
    "acosh" => Scalar::acosh,
    "atanh" => Scalar::atanh,
};

/// A shared reference to one catalog entry. Cheap to copy; expressions
/// store these instead of owning function objects, and the catalog they
/// point into outlives every expression.
#[derive(Clone, Copy)]
pub struct FunctionRef {
    name: &'static str,
    apply: UnaryFunction,
}

impl FunctionRef {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, argument: &Scalar) -> Scalar {
        (self.apply)(argument)
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &FunctionRef) -> bool {
        // Catalog names are unique, so the name identifies the entry.
        self.name == other.name
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FunctionRef({})", self.name)
    }
}

/// Lookup table consulted by the parser to bind function identifiers.
///
/// Immutable once constructed; the reserved variable name `x` can never
/// be a key.
pub struct FunctionRegistry {
    entries: &'static phf::Map<&'static str, UnaryFunction>,
}

impl FunctionRegistry {
    /// Creates the registry with every stock function loaded.
    pub fn create_with_defaults() -> Self {
        assert!(
            !DEFAULT_CATALOG.contains_key(VARIABLE_NAME),
            "the variable name is reserved and cannot name a function"
        );
        FunctionRegistry {
            entries: &DEFAULT_CATALOG,
        }
    }

    /// Looks up a unary function by its identifier, e.g. `"sin"` returns
    /// the trigonometric sine. Returns `None` for unknown identifiers.
    pub fn lookup(&self, identifier: &str) -> Option<FunctionRef> {
        self.entries
            .get_entry(identifier)
            .map(|(&name, &apply)| FunctionRef { name, apply })
    }

    /// Iterates over the loaded function names, for tests and
    /// auto-completion.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::create_with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_complete() {
        let registry = FunctionRegistry::create_with_defaults();
        let expected = [
            "id", "abs", "ceil", "floor", "round", "roundeven", "trunc", "sqrt", "cbrt", "exp",
            "log", "log2", "erf", "erfc", "gamma", "sin", "csc", "asin", "cos", "sec", "acos",
            "tan", "cot", "atan", "sinh", "cosh", "tanh", "asinh", "acosh", "atanh",
        ];

        assert_eq!(registry.len(), expected.len());
        for name in expected {
            assert!(registry.lookup(name).is_some(), "missing function '{name}'");
        }
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = FunctionRegistry::create_with_defaults();
        assert!(registry.lookup("nope").is_none());
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("Sin").is_none());
    }

    #[test]
    fn test_variable_name_is_not_a_function() {
        let registry = FunctionRegistry::create_with_defaults();
        assert!(registry.lookup(VARIABLE_NAME).is_none());
    }

    #[test]
    fn test_lookup_applies() {
        let registry = FunctionRegistry::create_with_defaults();
        let one = Scalar::new("1");

        let id = registry.lookup("id").unwrap();
        assert_eq!(id.name(), "id");
        assert_eq!(id.apply(&one), one);

        let log = registry.lookup("log").unwrap();
        assert_eq!(log.apply(&one), Scalar::new("0"));

        let sqrt = registry.lookup("sqrt").unwrap();
        assert_eq!(sqrt.apply(&Scalar::new("4")), Scalar::new("2"));
    }

    #[test]
    fn test_names_enumerate_catalog() {
        let registry = FunctionRegistry::create_with_defaults();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names.len(), registry.len());
        assert!(names.contains(&"sin"));
        assert!(!names.contains(&VARIABLE_NAME));
    }

    #[test]
    fn test_every_function_total_at_one() {
        let registry = FunctionRegistry::create_with_defaults();
        let one = Scalar::new("1.0");
        for name in registry.names() {
            let function = registry.lookup(name).unwrap();
            // Every catalog entry is defined at 1.0 and must not panic.
            let _ = function.apply(&one);
        }
    }
}
