//! Immutable expression trees
//!
//! Every compound node is built through the canonical constructors in `construct`,
//! so sums and products are always flattened, sorted and never hold fewer than two operands.

use std::collections::BTreeSet;
use std::sync::Arc;

mod construct;
mod display;
pub mod number;
mod ops;
mod ordering;

pub use number::{Float, Number};

pub type FlagType = u32;

/// Property flags of symbols and required properties of wildcards.
pub mod flags {
    use super::FlagType;
    pub const NONCOMMUTATIVE: FlagType = 1;
    pub const REAL: FlagType = 1 << 1;
    pub const RATIONAL: FlagType = 1 << 2;
    pub const INTEGER: FlagType = 1 << 3;
    pub const POSITIVE: FlagType = 1 << 4;
    /// Wildcards only: the candidate must be a function application.
    pub const FUNCTION: FlagType = 1 << 5;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub flags: FlagType,
}

/// Something a wildcard binding must not contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exclusion {
    Expr(Expr),
    /// Any application of the function with this name.
    Head(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wildcard {
    pub name: String,
    pub exclude: Vec<Exclusion>,
    /// Flags every binding has to satisfy
    pub properties: FlagType,
}

impl Wildcard {
    pub fn new(name: &str) -> Wildcard {
        Wildcard {
            name: name.to_string(),
            exclude: vec![],
            properties: 0,
        }
    }

    pub fn excluding(mut self, expr: &Expr) -> Wildcard {
        self.exclude.push(Exclusion::Expr(expr.clone()));
        self
    }

    pub fn excluding_head(mut self, function: &str) -> Wildcard {
        self.exclude.push(Exclusion::Head(function.to_string()));
        self
    }

    pub fn with_property(mut self, flag: FlagType) -> Wildcard {
        self.properties |= flag;
        self
    }

    pub fn noncommutative(self) -> Wildcard {
        self.with_property(flags::NONCOMMUTATIVE)
    }

    #[inline]
    pub fn is_commutative(&self) -> bool {
        self.properties & flags::NONCOMMUTATIVE == 0
    }
}

impl From<Wildcard> for Expr {
    fn from(wildcard: Wildcard) -> Expr {
        Expr::from_node(Node::Wildcard(wildcard))
    }
}

/// A product split into its numeric coefficient, the commutative factors
/// (sorted, a multiset) and the noncommutative factors (in order).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub coeff: Number,
    pub commutative: Vec<Expr>,
    pub ordered: Vec<Expr>,
}

impl Product {
    /// All factors, the coefficient first if it is not one.
    pub fn factors(&self) -> Vec<Expr> {
        let mut factors = Vec::with_capacity(self.commutative.len() + self.ordered.len() + 1);
        if !self.coeff.is_one() {
            factors.push(Expr::number(self.coeff.clone()));
        }
        factors.extend(self.commutative.iter().cloned());
        factors.extend(self.ordered.iter().cloned());
        factors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Number(Number),
    Symbol(Symbol),
    Wildcard(Wildcard),
    /// Sorted multiset of at least two terms
    Add(Vec<Expr>),
    Mul(Product),
    Pow(Expr, Expr),
    Function(String, Vec<Expr>),
    /// Differentiated expression and the variables in order
    Derivative(Expr, Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expr(Arc<Node>);

/// Pre-order traversal over all sub-expressions including the root.
pub struct ExprIter {
    stack: Vec<Expr>,
}

impl ExprIter {
    pub fn new(root: &Expr) -> ExprIter {
        ExprIter {
            stack: vec![root.clone()],
        }
    }
}

impl Iterator for ExprIter {
    type Item = Expr;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stack.pop() {
            None => None,
            Some(current) => {
                for child in current.args().into_iter().rev() {
                    self.stack.push(child);
                }
                Some(current)
            }
        }
    }
}

impl Expr {
    pub(crate) fn from_node(node: Node) -> Expr {
        Expr(Arc::new(node))
    }

    #[inline]
    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn number(value: Number) -> Expr {
        Expr::from_node(Node::Number(value))
    }

    pub fn integer(value: i64) -> Expr {
        Expr::number(Number::integer(value))
    }

    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Expr {
        Expr::number(Number::rational(numer, denom))
    }

    pub fn float(value: f64) -> Expr {
        Expr::number(Number::float(value))
    }

    pub fn zero() -> Expr {
        Expr::integer(0)
    }

    pub fn one() -> Expr {
        Expr::integer(1)
    }

    pub fn minus_one() -> Expr {
        Expr::integer(-1)
    }

    pub fn symbol(name: &str) -> Expr {
        Expr::symbol_with_flags(name, 0)
    }

    pub fn symbol_with_flags(name: &str, flags: FlagType) -> Expr {
        Expr::from_node(Node::Symbol(Symbol {
            name: name.to_string(),
            flags,
        }))
    }

    /// Unconstrained commutative wildcard
    pub fn wild(name: &str) -> Expr {
        Wildcard::new(name).into()
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Expr {
        Expr::from_node(Node::Function(name.to_string(), args))
    }

    pub fn derivative(expr: Expr, symbols: Vec<Expr>) -> Expr {
        Expr::from_node(Node::Derivative(expr, symbols))
    }

    /// Direct children in a fixed order.
    pub fn args(&self) -> Vec<Expr> {
        match self.node() {
            Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => vec![],
            Node::Add(terms) => terms.clone(),
            Node::Mul(product) => product.factors(),
            Node::Pow(base, exp) => vec![base.clone(), exp.clone()],
            Node::Function(_, args) => args.clone(),
            Node::Derivative(expr, symbols) => {
                let mut args = Vec::with_capacity(symbols.len() + 1);
                args.push(expr.clone());
                args.extend(symbols.iter().cloned());
                args
            }
        }
    }

    pub fn parts(&self) -> ExprIter {
        ExprIter::new(self)
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self.node() {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&Wildcard> {
        match self.node() {
            Node::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.node() {
            Node::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| n.is_zero() && n.is_rational())
    }

    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, Number::is_one)
    }

    pub fn is_integer_number(&self) -> bool {
        self.as_number().map_or(false, Number::is_integer)
    }

    pub fn is_add(&self) -> bool {
        match self.node() {
            Node::Add(_) => true,
            _ => false,
        }
    }

    pub fn is_mul(&self) -> bool {
        match self.node() {
            Node::Mul(_) => true,
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        match self.node() {
            Node::Function(..) => true,
            _ => false,
        }
    }

    pub fn is_commutative(&self) -> bool {
        match self.node() {
            Node::Number(_) => true,
            Node::Symbol(s) => s.flags & flags::NONCOMMUTATIVE == 0,
            Node::Wildcard(w) => w.is_commutative(),
            Node::Add(terms) => terms.iter().all(Expr::is_commutative),
            Node::Mul(product) => product.ordered.is_empty(),
            Node::Pow(base, exp) => base.is_commutative() && exp.is_commutative(),
            Node::Function(_, args) => args.iter().all(Expr::is_commutative),
            Node::Derivative(expr, _) => expr.is_commutative(),
        }
    }

    /// Whether `sub` occurs anywhere in the tree.
    pub fn has(&self, sub: &Expr) -> bool {
        self.parts().any(|part| part == *sub)
    }

    /// Whether any application of the function `name` occurs in the tree.
    pub fn has_head(&self, name: &str) -> bool {
        self.parts().any(|part| match part.node() {
            Node::Function(head, _) => head == name,
            _ => false,
        })
    }

    pub fn has_wildcard(&self) -> bool {
        self.parts().any(|part| part.as_wildcard().is_some())
    }

    /// All wildcards in pre-order, duplicates included.
    pub fn wildcards(&self) -> Vec<Wildcard> {
        self.parts()
            .filter_map(|part| part.as_wildcard().cloned())
            .collect()
    }

    /// Leaves of the tree: numbers, symbols and wildcards.
    pub fn atoms(&self) -> BTreeSet<Expr> {
        self.parts()
            .filter(|part| match part.node() {
                Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => true,
                _ => false,
            })
            .collect()
    }

    /// Symbols and wildcards occurring in the tree
    pub fn free_symbols(&self) -> BTreeSet<Expr> {
        self.atoms()
            .into_iter()
            .filter(|atom| !atom.is_number())
            .collect()
    }

    /// Splits off the numeric summand: `x + y + 3 -> (3, [x, y])`.
    pub fn as_coeff_add(&self) -> (Number, Vec<Expr>) {
        match self.node() {
            Node::Number(n) => (n.clone(), vec![]),
            Node::Add(terms) => match terms[0].as_number() {
                Some(n) => (n.clone(), terms[1..].to_vec()),
                None => (Number::zero(), terms.clone()),
            },
            _ => (Number::zero(), vec![self.clone()]),
        }
    }

    /// Splits off the numeric factor: `3*x*y -> (3, x*y)`.
    pub fn as_coeff_mul(&self) -> (Number, Expr) {
        match self.node() {
            Node::Number(n) => (n.clone(), Expr::one()),
            Node::Mul(product) => {
                let rest = Product {
                    coeff: Number::one(),
                    commutative: product.commutative.clone(),
                    ordered: product.ordered.clone(),
                };
                (product.coeff.clone(), Expr::from_product(rest))
            }
            _ => (Number::one(), self.clone()),
        }
    }

    pub fn as_base_exp(&self) -> (Expr, Expr) {
        match self.node() {
            Node::Pow(base, exp) => (base.clone(), exp.clone()),
            _ => (self.clone(), Expr::one()),
        }
    }

    /// Operands of a sum, or the expression itself.
    pub fn add_args(&self) -> Vec<Expr> {
        match self.node() {
            Node::Add(terms) => terms.clone(),
            _ => vec![self.clone()],
        }
    }

    /// Factors of a product, or the expression itself.
    pub fn mul_args(&self) -> Vec<Expr> {
        match self.node() {
            Node::Mul(product) => product.factors(),
            _ => vec![self.clone()],
        }
    }

    /// Commutative and noncommutative factors of a product.
    pub fn args_cnc(&self) -> (Vec<Expr>, Vec<Expr>) {
        match self.node() {
            Node::Mul(product) => {
                let mut commutative = product.commutative.clone();
                if !product.coeff.is_one() {
                    commutative.insert(0, Expr::number(product.coeff.clone()));
                }
                (commutative, product.ordered.clone())
            }
            _ if self.is_commutative() => {
                if self.is_one() {
                    (vec![], vec![])
                } else {
                    (vec![self.clone()], vec![])
                }
            }
            _ => (vec![], vec![self.clone()]),
        }
    }

    /// Negative numbers and products with a negative coefficient.
    pub fn is_negated(&self) -> bool {
        match self.node() {
            Node::Number(n) => n.is_negative(),
            Node::Mul(product) => product.coeff.is_negative(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod specs {
    use super::*;

    #[test]
    fn parts_pre_order() {
        let x = Expr::symbol("x");
        let f = Expr::function("f", vec![x.clone(), Expr::integer(2)]);
        let actual = f.parts().collect::<Vec<_>>();
        assert_eq!(actual, vec![f.clone(), x, Expr::integer(2)]);
    }

    #[test]
    fn has_sub_expressions() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let e = Expr::function("sin", vec![&x * &y]) + Expr::integer(1);
        assert!(e.has(&x));
        assert!(e.has(&(&x * &y)));
        assert!(e.has(&Expr::integer(1)));
        assert!(!e.has(&Expr::integer(2)));
        assert!(e.has_head("sin"));
        assert!(!e.has_head("cos"));
    }

    #[test]
    fn free_symbols_include_wildcards() {
        let x = Expr::symbol("x");
        let p = Expr::wild("p");
        let e = &x * &p + Expr::integer(3);
        let expected = vec![x, p].into_iter().collect::<BTreeSet<_>>();
        assert_eq!(e.free_symbols(), expected);
    }

    #[test]
    fn commutativity() {
        let a = Expr::symbol_with_flags("A", flags::NONCOMMUTATIVE);
        let x = Expr::symbol("x");
        assert!(!a.is_commutative());
        assert!(!(&x * &a).is_commutative());
        assert!((&x * &x).is_commutative());
        assert!(!Expr::from(Wildcard::new("w").noncommutative()).is_commutative());
    }

    #[test]
    fn coefficient_splitting() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let e = Expr::integer(3) * &x * &y;
        assert_eq!(e.as_coeff_mul(), (Number::integer(3), &x * &y));
        let s = &x + &y + Expr::integer(4);
        assert_eq!(s.as_coeff_add(), (Number::integer(4), vec![x.clone(), y.clone()]));
        assert_eq!(x.as_coeff_add(), (Number::zero(), vec![x.clone()]));
    }

    #[test]
    fn splitting_noncommutative_factors() {
        let a = Expr::symbol_with_flags("A", flags::NONCOMMUTATIVE);
        let b = Expr::symbol_with_flags("B", flags::NONCOMMUTATIVE);
        let x = Expr::symbol("x");
        let e = -(&x * &a * &b);
        let (c, nc) = e.args_cnc();
        assert_eq!(c, vec![Expr::minus_one(), x]);
        assert_eq!(nc, vec![a, b]);
    }

    #[test]
    fn atoms_are_leaves() {
        let x = Expr::symbol("x");
        let p = Expr::wild("p");
        let e = Expr::function("f", vec![&x * &p]) + Expr::integer(3);
        let expected = vec![Expr::integer(3), x, p]
            .into_iter()
            .collect::<BTreeSet<_>>();
        assert_eq!(e.atoms(), expected);
    }
}
