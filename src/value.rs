//! The three-variant runtime value and its arithmetic/comparison algebra.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    TypeMismatch,
    DivisionByZero,
    NegativeSquareRoot,
}

impl ValueError {
    pub fn message(self) -> &'static str {
        match self {
            ValueError::TypeMismatch => "Tipuri incompatibile",
            ValueError::DivisionByZero => "Impartire la zero",
            ValueError::NegativeSquareRoot => "Nu se poate calcula radicalul unui numar negativ",
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValueError {}

pub type ValueResult = Result<Value, ValueError>;

impl Value {
    pub fn integer(v: i64) -> Value {
        Value::Integer(v)
    }

    pub fn real(v: f64) -> Value {
        Value::Real(v)
    }

    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Coerces to an integer. Numeric values convert directly; text yields 0.
    pub fn to_int(&self) -> i64 {
        match self {
            Value::Integer(v) => *v,
            Value::Real(v) => *v as i64,
            Value::Text(_) => 0,
        }
    }

    /// Coerces to a real. Numeric values convert directly; text yields 0.0.
    pub fn to_float(&self) -> f64 {
        match self {
            Value::Integer(v) => *v as f64,
            Value::Real(v) => *v,
            Value::Text(_) => 0.0,
        }
    }

    /// Textualizes for output: integers as decimal, reals as integral when
    /// they have no fractional part and fit under 1e15, text verbatim.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Integer(v) => v.to_string(),
            Value::Real(v) => {
                if *v == v.floor() && v.abs() < 1e15 {
                    format!("{:.0}", v)
                } else {
                    format!("{}", v)
                }
            }
            Value::Text(s) => s.clone(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(v) => *v != 0,
            Value::Real(v) => *v != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    fn needs_float_math(a: &Value, b: &Value) -> bool {
        a.is_real() || b.is_real()
    }

    pub fn add(&self, other: &Value) -> ValueResult {
        if let (Value::Text(a), Value::Text(b)) = (self, other) {
            let mut out = a.clone();
            out.push_str(b);
            return Ok(Value::Text(out));
        }
        if !self.is_numeric() || !other.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        if Self::needs_float_math(self, other) {
            Ok(Value::Real(self.to_float() + other.to_float()))
        } else {
            Ok(Value::Integer(self.to_int() + other.to_int()))
        }
    }

    pub fn sub(&self, other: &Value) -> ValueResult {
        if !self.is_numeric() || !other.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        if Self::needs_float_math(self, other) {
            Ok(Value::Real(self.to_float() - other.to_float()))
        } else {
            Ok(Value::Integer(self.to_int() - other.to_int()))
        }
    }

    pub fn mul(&self, other: &Value) -> ValueResult {
        if !self.is_numeric() || !other.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        if Self::needs_float_math(self, other) {
            Ok(Value::Real(self.to_float() * other.to_float()))
        } else {
            Ok(Value::Integer(self.to_int() * other.to_int()))
        }
    }

    /// Division always promotes to real; use `floor` for integer division.
    pub fn div(&self, other: &Value) -> ValueResult {
        if !self.is_numeric() || !other.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        let divisor = other.to_float();
        if divisor == 0.0 {
            return Err(ValueError::DivisionByZero);
        }
        Ok(Value::Real(self.to_float() / divisor))
    }

    pub fn rem(&self, other: &Value) -> ValueResult {
        if !self.is_numeric() || !other.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        let divisor = other.to_int();
        if divisor == 0 {
            return Err(ValueError::DivisionByZero);
        }
        Ok(Value::Integer(self.to_int() % divisor))
    }

    pub fn neg(&self) -> ValueResult {
        match self {
            Value::Integer(v) => Ok(Value::Integer(-v)),
            Value::Real(v) => Ok(Value::Real(-v)),
            Value::Text(_) => Err(ValueError::TypeMismatch),
        }
    }

    /// Perfect squares yield an integer; everything else yields a real.
    pub fn sqrt(&self) -> ValueResult {
        if !self.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        let d = self.to_float();
        if d < 0.0 {
            return Err(ValueError::NegativeSquareRoot);
        }
        let result = d.sqrt();
        if result == result.floor() {
            Ok(Value::Integer(result as i64))
        } else {
            Ok(Value::Real(result))
        }
    }

    /// Truncates toward negative infinity and always yields an integer.
    pub fn floor(&self) -> ValueResult {
        if !self.is_numeric() {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer(self.to_float().floor() as i64))
    }

    fn types_comparable(a: &Value, b: &Value) -> bool {
        (a.is_numeric() && b.is_numeric()) || (a.is_text() && b.is_text())
    }

    fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
        if let (Value::Text(a), Value::Text(b)) = (a, b) {
            return a.cmp(b);
        }
        a.to_float()
            .partial_cmp(&b.to_float())
            .unwrap_or(std::cmp::Ordering::Equal)
    }

    pub fn eq_value(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) == std::cmp::Ordering::Equal) as i64))
    }

    pub fn ne_value(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) != std::cmp::Ordering::Equal) as i64))
    }

    pub fn lt(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) == std::cmp::Ordering::Less) as i64))
    }

    pub fn le(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) != std::cmp::Ordering::Greater) as i64))
    }

    pub fn gt(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) == std::cmp::Ordering::Greater) as i64))
    }

    pub fn ge(&self, other: &Value) -> ValueResult {
        if !Self::types_comparable(self, other) {
            return Err(ValueError::TypeMismatch);
        }
        Ok(Value::Integer((Self::compare(self, other) != std::cmp::Ordering::Less) as i64))
    }

    pub fn and(&self, other: &Value) -> Value {
        Value::Integer((self.is_truthy() && other.is_truthy()) as i64)
    }

    pub fn or(&self, other: &Value) -> Value {
        Value::Integer((self.is_truthy() || other.is_truthy()) as i64)
    }

    pub fn not(&self) -> Value {
        Value::Integer(!self.is_truthy() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_addition_stays_integer() {
        let r = Value::integer(2).add(&Value::integer(3)).unwrap();
        assert_eq!(r, Value::Integer(5));
    }

    #[test]
    fn mixed_numeric_addition_promotes_to_real() {
        let r = Value::integer(2).add(&Value::real(0.5)).unwrap();
        assert_eq!(r, Value::Real(2.5));
    }

    #[test]
    fn text_concatenation() {
        let r = Value::text("ab").add(&Value::text("cd")).unwrap();
        assert_eq!(r, Value::Text("abcd".to_string()));
    }

    #[test]
    fn mixed_text_number_addition_is_type_error() {
        let r = Value::integer(1).add(&Value::text("x"));
        assert_eq!(r, Err(ValueError::TypeMismatch));
    }

    #[test]
    fn division_promotes_to_real() {
        let r = Value::integer(7).div(&Value::integer(2)).unwrap();
        assert_eq!(r, Value::Real(3.5));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let r = Value::integer(1).div(&Value::integer(0));
        assert_eq!(r, Err(ValueError::DivisionByZero));
    }

    #[test]
    fn modulo_is_integer_only() {
        let r = Value::integer(7).rem(&Value::integer(3)).unwrap();
        assert_eq!(r, Value::Integer(1));
    }

    #[test]
    fn floor_div_mod_identity() {
        for a in [-17i64, -1, 0, 1, 17, 100] {
            for b in [-5i64, -1, 1, 3, 7] {
                let divided = Value::integer(a).div(&Value::integer(b)).unwrap();
                let floored = divided.floor().unwrap();
                let remainder = Value::integer(a).rem(&Value::integer(b)).unwrap();
                if let (Value::Integer(f), Value::Integer(r)) = (floored, remainder) {
                    assert_eq!(f * b + r, a, "a={a} b={b}");
                } else {
                    panic!("expected integers");
                }
            }
        }
    }

    #[test]
    fn sqrt_of_perfect_square_is_integer() {
        let r = Value::integer(9).sqrt().unwrap();
        assert_eq!(r, Value::Integer(3));
    }

    #[test]
    fn sqrt_of_non_perfect_square_is_real() {
        let r = Value::integer(2).sqrt().unwrap();
        assert!(matches!(r, Value::Real(_)));
    }

    #[test]
    fn sqrt_round_trips_within_tolerance() {
        for x in [0.0, 1.0, 2.0, 17.25, 1e6] {
            let root = Value::real(x).sqrt().unwrap().to_float();
            let diff = (root * root - x).abs();
            let tolerance = if x == 0.0 { 1e-9 } else { x * 1e-9 };
            assert!(diff <= tolerance.max(1e-9), "x={x} diff={diff}");
        }
    }

    #[test]
    fn sqrt_of_negative_is_domain_error() {
        let r = Value::integer(-1).sqrt();
        assert_eq!(r, Err(ValueError::NegativeSquareRoot));
    }

    #[test]
    fn floor_truncates_toward_negative_infinity() {
        let r = Value::real(-1.5).floor().unwrap();
        assert_eq!(r, Value::Integer(-2));
    }

    #[test]
    fn text_comparison_is_lexicographic() {
        assert_eq!(Value::text("a").lt(&Value::text("b")).unwrap(), Value::Integer(1));
    }

    #[test]
    fn mixed_type_comparison_is_type_error() {
        assert_eq!(Value::integer(1).lt(&Value::text("b")), Err(ValueError::TypeMismatch));
    }

    #[test]
    fn not_not_matches_truthiness() {
        assert_eq!(Value::integer(0).not().not(), Value::Integer(0));
        assert_eq!(Value::integer(5).not().not(), Value::Integer(1));
    }

    #[test]
    fn display_string_integer() {
        assert_eq!(Value::integer(42).to_display_string(), "42");
    }

    #[test]
    fn display_string_integral_real_has_no_decimal_point() {
        assert_eq!(Value::real(4.0).to_display_string(), "4");
    }

    #[test]
    fn display_string_fractional_real() {
        assert_eq!(Value::real(3.5).to_display_string(), "3.5");
    }

    #[test]
    fn truthiness_rules() {
        assert!(Value::integer(1).is_truthy());
        assert!(!Value::integer(0).is_truthy());
        assert!(Value::real(0.1).is_truthy());
        assert!(!Value::real(0.0).is_truthy());
        assert!(Value::text("x").is_truthy());
        assert!(!Value::text("").is_truthy());
    }
}
