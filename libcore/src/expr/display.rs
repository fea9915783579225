use super::{Expr, Node, Number};
use std::fmt;

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    PLowest,
    PSum,
    PProduct,
    PPower,
    PHighest,
}

fn precedence(expr: &Expr) -> Precedence {
    match expr.node() {
        Node::Number(n) if n.is_negative() || (n.is_rational() && !n.is_integer()) => {
            Precedence::PProduct
        }
        Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => Precedence::PHighest,
        Node::Function(..) | Node::Derivative(..) => Precedence::PHighest,
        Node::Add(_) => Precedence::PSum,
        Node::Mul(_) => Precedence::PProduct,
        Node::Pow(..) => Precedence::PPower,
    }
}

fn dump_atomic(expr: &Expr, bracket: bool, string: &mut String) {
    if bracket {
        string.push('(');
        dump_base(expr, string);
        string.push(')');
    } else {
        dump_base(expr, string);
    }
}

fn dump_list(args: &[Expr], string: &mut String) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            string.push_str(", ");
        }
        dump_base(arg, string);
    }
}

/// Factors joined by `*`, each bracketed below product precedence.
fn dump_factors(factors: &[Expr], string: &mut String) {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            string.push('*');
        }
        dump_atomic(factor, precedence(factor) < Precedence::PProduct, string);
    }
}

fn dump_product(expr: &Expr, string: &mut String) {
    let (numer, denom) = expr.as_numer_denom();
    let numer_factors = numer.mul_args();
    dump_factors(&numer_factors, string);
    if !denom.is_one() {
        string.push('/');
        let denom_factors = denom.mul_args();
        if denom_factors.len() > 1 {
            string.push('(');
            dump_factors(&denom_factors, string);
            string.push(')');
        } else {
            dump_atomic(&denom, precedence(&denom) <= Precedence::PProduct, string);
        }
    }
}

fn dump_base(expr: &Expr, string: &mut String) {
    match expr.node() {
        Node::Number(n) => string.push_str(&n.to_string()),
        Node::Symbol(s) => string.push_str(&s.name),
        Node::Wildcard(w) => {
            string.push_str(&w.name);
            string.push('_');
        }
        Node::Add(terms) => {
            for (i, term) in terms.iter().enumerate() {
                if i == 0 {
                    dump_atomic(term, precedence(term) <= Precedence::PLowest, string);
                } else if term.is_negated() {
                    string.push_str(" - ");
                    let positive = term.neg();
                    dump_atomic(&positive, precedence(&positive) <= Precedence::PSum, string);
                } else {
                    string.push_str(" + ");
                    dump_atomic(term, precedence(term) <= Precedence::PSum, string);
                }
            }
        }
        Node::Mul(product) => {
            if product.coeff.is_negative() {
                string.push('-');
                dump_product(&expr.neg(), string);
            } else {
                dump_product(expr, string);
            }
        }
        Node::Pow(base, exp) => {
            if exp.as_number().map_or(false, Number::is_minus_one) {
                string.push_str("1/");
                dump_atomic(base, precedence(base) <= Precedence::PPower, string);
                return;
            }
            dump_atomic(base, precedence(base) <= Precedence::PPower, string);
            string.push_str("**");
            dump_atomic(exp, precedence(exp) <= Precedence::PPower, string);
        }
        Node::Function(name, args) => {
            string.push_str(name);
            string.push('(');
            dump_list(args, string);
            string.push(')');
        }
        Node::Derivative(inner, symbols) => {
            string.push_str("Derivative(");
            dump_base(inner, string);
            for symbol in symbols.iter() {
                string.push_str(", ");
                dump_base(symbol, string);
            }
            string.push(')');
        }
    }
}

pub fn dump_simple(expr: &Expr) -> String {
    let mut string = String::new();
    dump_base(expr, &mut string);
    string
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", dump_simple(self))
    }
}
