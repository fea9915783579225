//! Canonical ordering
//!
//! Numbers sort first, then symbols, wildcards and the compound kinds.
//! The order fixes the operand layout of sums and products and therefore
//! which of several valid bindings the matcher finds first.

use super::{Expr, Node, Number};
use std::cmp::Ordering;
use std::sync::Arc;

fn rank(node: &Node) -> u8 {
    match node {
        Node::Number(_) => 0,
        Node::Symbol(_) => 1,
        Node::Wildcard(_) => 2,
        Node::Pow(..) => 3,
        Node::Mul(_) => 4,
        Node::Add(_) => 5,
        Node::Function(..) => 6,
        Node::Derivative(..) => 7,
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.to_bits().cmp(&b.to_bits()))
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => compare_floats(a.0, b.0),
            (Number::Rational(_), Number::Float(_)) => {
                compare_floats(self.to_f64(), other.to_f64()).then(Ordering::Less)
            }
            (Number::Float(_), Number::Rational(_)) => {
                compare_floats(self.to_f64(), other.to_f64()).then(Ordering::Greater)
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Node) -> Ordering {
        match (self, other) {
            (Node::Number(a), Node::Number(b)) => a.cmp(b),
            (Node::Symbol(a), Node::Symbol(b)) => {
                a.name.cmp(&b.name).then(a.flags.cmp(&b.flags))
            }
            (Node::Wildcard(a), Node::Wildcard(b)) => a
                .name
                .cmp(&b.name)
                .then(a.properties.cmp(&b.properties))
                .then_with(|| a.exclude.cmp(&b.exclude)),
            (Node::Add(a), Node::Add(b)) => a.cmp(b),
            (Node::Mul(a), Node::Mul(b)) => a
                .commutative
                .cmp(&b.commutative)
                .then_with(|| a.ordered.cmp(&b.ordered))
                .then_with(|| a.coeff.cmp(&b.coeff)),
            (Node::Pow(a_base, a_exp), Node::Pow(b_base, b_exp)) => {
                a_base.cmp(b_base).then_with(|| a_exp.cmp(b_exp))
            }
            (Node::Function(a_name, a_args), Node::Function(b_name, b_args)) => {
                a_name.cmp(b_name).then_with(|| a_args.cmp(b_args))
            }
            (Node::Derivative(a_expr, a_symbols), Node::Derivative(b_expr, b_symbols)) => a_expr
                .cmp(b_expr)
                .then_with(|| a_symbols.cmp(b_symbols)),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Node) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Expr) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            Ordering::Equal
        } else {
            self.node().cmp(other.node())
        }
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Expr) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
