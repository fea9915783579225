//! Exclusion and consistency checks for wildcard candidates

use crate::bindings::Bindings;
use crate::expr::{flags, Exclusion, Expr, FlagType, Node, Number, Wildcard};

/// Extends `bindings` with `wildcard -> candidate` if the candidate passes `check`.
pub fn bind(wildcard: &Wildcard, candidate: &Expr, bindings: &Bindings) -> Option<Bindings> {
    if check(wildcard, candidate, bindings) {
        bindings.bind(&wildcard.name, candidate)
    } else {
        None
    }
}

pub fn check(wildcard: &Wildcard, candidate: &Expr, bindings: &Bindings) -> bool {
    if let Some(bound) = bindings.get(&wildcard.name) {
        return bound == candidate;
    }
    !excluded(wildcard, candidate) && satisfies(candidate, wildcard.properties)
}

pub fn excluded(wildcard: &Wildcard, candidate: &Expr) -> bool {
    wildcard.exclude.iter().any(|exclusion| match exclusion {
        Exclusion::Expr(expr) => candidate.has(expr),
        Exclusion::Head(name) => candidate.has_head(name),
    })
}

pub fn satisfies(candidate: &Expr, properties: FlagType) -> bool {
    let required = |flag: FlagType| properties & flag != 0;
    (!required(flags::NONCOMMUTATIVE) || !candidate.is_commutative())
        && (!required(flags::FUNCTION) || candidate.is_function())
        && (!required(flags::INTEGER) || is_integer(candidate))
        && (!required(flags::RATIONAL) || is_rational(candidate))
        && (!required(flags::REAL) || is_real(candidate))
        && (!required(flags::POSITIVE) || is_positive(candidate))
}

fn has_flag(expr: &Expr, flag: FlagType) -> bool {
    match expr.node() {
        Node::Symbol(s) => s.flags & flag != 0,
        Node::Wildcard(w) => w.properties & flag != 0,
        _ => false,
    }
}

pub fn is_integer(expr: &Expr) -> bool {
    match expr.node() {
        Node::Number(n) => n.is_integer(),
        Node::Add(terms) => terms.iter().all(is_integer),
        Node::Mul(product) => {
            product.coeff.is_integer()
                && product.commutative.iter().all(is_integer)
                && product.ordered.iter().all(is_integer)
        }
        Node::Pow(base, exp) => {
            is_integer(base)
                && exp
                    .as_number()
                    .map_or(false, |n| n.is_integer() && !n.is_negative())
        }
        _ => has_flag(expr, flags::INTEGER),
    }
}

pub fn is_rational(expr: &Expr) -> bool {
    match expr.node() {
        Node::Number(n) => n.is_rational(),
        Node::Add(terms) => terms.iter().all(is_rational),
        Node::Mul(product) => {
            product.coeff.is_rational()
                && product.commutative.iter().all(is_rational)
                && product.ordered.iter().all(is_rational)
        }
        Node::Pow(base, exp) => is_rational(base) && exp.is_integer_number(),
        _ => has_flag(expr, flags::RATIONAL | flags::INTEGER),
    }
}

pub fn is_real(expr: &Expr) -> bool {
    match expr.node() {
        Node::Number(_) => true,
        Node::Add(terms) => terms.iter().all(is_real),
        Node::Mul(product) => {
            product.commutative.iter().all(is_real) && product.ordered.iter().all(is_real)
        }
        Node::Pow(base, exp) => {
            (is_real(base) && exp.is_integer_number()) || (is_positive(base) && is_real(exp))
        }
        _ => has_flag(
            expr,
            flags::REAL | flags::RATIONAL | flags::INTEGER | flags::POSITIVE,
        ),
    }
}

pub fn is_positive(expr: &Expr) -> bool {
    match expr.node() {
        Node::Number(n) => n.is_positive(),
        Node::Add(terms) => terms.iter().all(is_positive),
        Node::Mul(product) => {
            product.coeff.is_positive()
                && product.commutative.iter().all(is_positive)
                && product.ordered.iter().all(is_positive)
        }
        Node::Pow(base, exp) => is_positive(base) && is_real(exp),
        _ => has_flag(expr, flags::POSITIVE),
    }
}

/// Whether the literal is a number below zero.
pub(crate) fn is_negative_number(expr: &Expr) -> bool {
    expr.as_number().map_or(false, Number::is_negative)
}

#[cfg(test)]
mod specs {
    use super::*;

    #[test]
    fn exclusion_at_any_depth() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let p = Wildcard::new("p").excluding(&x);
        let deep = Expr::function("f", vec![Expr::integer(2) * &x + &y]);
        assert!(excluded(&p, &deep));
        assert!(!excluded(&p, &y));
        assert_eq!(bind(&p, &deep, &Bindings::new()), None);
    }

    #[test]
    fn exclusion_of_function_heads() {
        let x = Expr::symbol("x");
        let r = Wildcard::new("r").excluding_head("sin");
        assert!(excluded(&r, &(Expr::function("sin", vec![x.clone()]) + &x)));
        assert!(!excluded(&r, &Expr::function("cos", vec![x])));
    }

    #[test]
    fn bound_wildcard_requires_equal_candidate() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let p = Wildcard::new("p");
        let bindings: Bindings = hashmap! {"p" => x.clone()}.into();
        assert!(check(&p, &x, &bindings));
        assert!(!check(&p, &y, &bindings));
    }

    #[test]
    fn noncommutative_wildcard_rejects_commutative_candidate() {
        let a = Expr::symbol_with_flags("A", flags::NONCOMMUTATIVE);
        let x = Expr::symbol("x");
        let w = Wildcard::new("w").noncommutative();
        assert!(check(&w, &(&x * &a), &Bindings::new()));
        assert!(!check(&w, &x, &Bindings::new()));
    }

    #[test]
    fn properties() {
        let n = Expr::symbol_with_flags("n", flags::INTEGER | flags::RATIONAL | flags::REAL);
        let x = Expr::symbol("x");
        assert!(satisfies(&(Expr::integer(2) * &n + Expr::integer(1)), flags::INTEGER));
        assert!(!satisfies(&x, flags::INTEGER));
        assert!(satisfies(&Expr::rational(1, 2), flags::RATIONAL | flags::POSITIVE));
        assert!(!satisfies(&Expr::float(0.5), flags::RATIONAL));
        assert!(satisfies(&Expr::float(0.5), flags::REAL));
        assert!(satisfies(&Expr::function("f", vec![x.clone()]), flags::FUNCTION));
        assert!(!satisfies(&x, flags::FUNCTION));
    }
}
