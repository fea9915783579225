use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Machine float which is compared and hashed by its bit pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Float(pub f64);

impl PartialEq for Float {
    fn eq(&self, other: &Float) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float {}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Numeric constant of an expression tree.
///
/// Exact rationals stay exact under every operation.
/// As soon as a float takes part the result is a float.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Rational(BigRational),
    Float(Float),
}

impl Number {
    pub fn integer(value: i64) -> Number {
        Number::Rational(BigRational::from_integer(BigInt::from(value)))
    }

    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Number {
        Number::Rational(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn float(value: f64) -> Number {
        Number::Float(Float(value))
    }

    pub fn zero() -> Number {
        Number::Rational(BigRational::zero())
    }

    pub fn one() -> Number {
        Number::Rational(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => f.0 == 0.0,
        }
    }

    /// Only the exact one. A float `1.0` is kept as a visible factor.
    pub fn is_one(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_one(),
            Number::Float(_) => false,
        }
    }

    pub fn is_minus_one(&self) -> bool {
        match self {
            Number::Rational(r) => (-r).is_one(),
            Number::Float(_) => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => f.0 < 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_positive(),
            Number::Float(f) => f.0 > 0.0,
        }
    }

    pub fn is_rational(&self) -> bool {
        match self {
            Number::Rational(_) => true,
            Number::Float(_) => false,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_integer(),
            Number::Float(_) => false,
        }
    }

    pub fn as_integer(&self) -> Option<BigInt> {
        match self {
            Number::Rational(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }

    pub fn is_even(&self) -> bool {
        self.as_integer()
            .map_or(false, |n| (n % BigInt::from(2)).is_zero())
    }

    /// Denominator of an exact rational, `None` for floats.
    pub fn denom(&self) -> Option<&BigInt> {
        match self {
            Number::Rational(r) => Some(r.denom()),
            Number::Float(_) => None,
        }
    }

    pub fn numer(&self) -> Option<&BigInt> {
        match self {
            Number::Rational(r) => Some(r.numer()),
            Number::Float(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => r.to_f64().unwrap_or(std::f64::NAN),
            Number::Float(f) => f.0,
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a + b),
            _ => Number::float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a * b),
            _ => Number::float(self.to_f64() * other.to_f64()),
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::float(-f.0),
        }
    }

    pub fn abs(&self) -> Number {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// `None` for an exact zero.
    pub fn recip(&self) -> Option<Number> {
        match self {
            Number::Rational(r) if r.is_zero() => None,
            Number::Rational(r) => Some(Number::Rational(r.recip())),
            Number::Float(f) => Some(Number::float(1.0 / f.0)),
        }
    }

    /// Integer power. `None` for `0**negative` and for exponents too large to evaluate.
    pub fn powi(&self, exp: &BigInt) -> Option<Number> {
        let magnitude = exp.abs().to_usize()?;
        match self {
            Number::Rational(r) => {
                if r.is_zero() && exp.is_negative() {
                    return None;
                }
                let raised = num_traits::pow(r.clone(), magnitude);
                if exp.is_negative() {
                    Some(Number::Rational(raised.recip()))
                } else {
                    Some(Number::Rational(raised))
                }
            }
            Number::Float(f) => {
                let e = exp.to_i32()?;
                Some(Number::float(f.0.powi(e)))
            }
        }
    }

    /// Exact `degree`-th root of a rational if one exists.
    pub fn root(&self, degree: u32) -> Option<Number> {
        let r = match self {
            Number::Rational(r) => r,
            Number::Float(_) => return None,
        };
        if degree == 0 {
            return None;
        }
        if r.is_negative() && degree % 2 == 0 {
            return None;
        }
        let numer = r.numer().abs();
        let denom = r.denom().abs();
        let numer_root = numer.nth_root(degree);
        let denom_root = denom.nth_root(degree);
        if num_traits::pow(numer_root.clone(), degree as usize) != numer
            || num_traits::pow(denom_root.clone(), degree as usize) != denom
        {
            return None;
        }
        let root = BigRational::new(numer_root, denom_root);
        if r.is_negative() {
            Some(Number::Rational(-root))
        } else {
            Some(Number::Rational(root))
        }
    }

    /// Evaluates `self**exp`, `None` when the result is not representable as a number.
    pub fn pow(&self, exp: &Number) -> Option<Number> {
        if let Some(n) = exp.as_integer() {
            return self.powi(&n);
        }
        match (self, exp) {
            (Number::Rational(base), Number::Rational(e)) => {
                if base.is_zero() {
                    return if e.is_positive() {
                        Some(Number::zero())
                    } else {
                        None
                    };
                }
                if base.is_negative() {
                    return None;
                }
                let degree = e.denom().to_u32()?;
                self.root(degree)?.powi(e.numer())
            }
            _ => {
                if self.is_negative() {
                    None
                } else {
                    Some(Number::float(self.to_f64().powf(exp.to_f64())))
                }
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Rational(r) => write!(f, "{}", r),
            Number::Float(v) => write!(f, "{:?}", v.0),
        }
    }
}

#[cfg(test)]
mod specs {
    use super::*;

    #[test]
    fn exact_arithmetic() {
        let a = Number::rational(1, 3);
        let b = Number::rational(2, 3);
        assert_eq!(a.add(&b), Number::one());
        assert_eq!(a.mul(&Number::integer(3)), Number::one());
        assert_eq!(Number::integer(4).recip(), Some(Number::rational(1, 4)));
        assert_eq!(Number::zero().recip(), None);
    }

    #[test]
    fn float_contaminates() {
        let a = Number::rational(1, 2);
        let b = Number::float(0.5);
        assert_eq!(a.add(&b), Number::float(1.0));
        assert!(!Number::float(1.0).is_one());
    }

    #[test]
    fn integer_powers() {
        let two = Number::integer(2);
        assert_eq!(two.powi(&BigInt::from(3)), Some(Number::integer(8)));
        assert_eq!(two.powi(&BigInt::from(-2)), Some(Number::rational(1, 4)));
        assert_eq!(Number::zero().powi(&BigInt::from(-1)), None);
    }

    #[test]
    fn parity() {
        assert!(Number::integer(-4).is_even());
        assert!(Number::zero().is_even());
        assert!(!Number::integer(3).is_even());
        assert!(!Number::rational(4, 3).is_even());
        assert!(!Number::float(2.0).is_even());
    }

    #[test]
    fn exact_roots() {
        assert_eq!(Number::integer(9).root(2), Some(Number::integer(3)));
        assert_eq!(Number::rational(4, 9).root(2), Some(Number::rational(2, 3)));
        assert_eq!(Number::integer(-8).root(3), Some(Number::integer(-2)));
        assert_eq!(Number::integer(3).root(2), None);
        assert_eq!(Number::integer(-4).root(2), None);
    }

    #[test]
    fn fractional_powers() {
        let half = Number::rational(1, 2);
        assert_eq!(Number::integer(4).pow(&half), Some(Number::integer(2)));
        assert_eq!(Number::integer(2).pow(&half), None);
        assert_eq!(
            Number::integer(8).pow(&Number::rational(-2, 3)),
            Some(Number::rational(1, 4))
        );
        assert_eq!(Number::integer(-8).pow(&Number::rational(1, 3)), None);
    }
}
