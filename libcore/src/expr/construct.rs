use super::{Expr, Node, Number, Product};
use crate::bindings::Bindings;
use std::collections::BTreeMap;
use std::ops;

impl Expr {
    /// Canonical sum: nested sums are flattened, numbers folded and like terms collected.
    pub fn add(terms: Vec<Expr>) -> Expr {
        let mut constant = Number::zero();
        let mut collected: BTreeMap<Expr, Number> = BTreeMap::new();
        let mut pending = terms;
        while let Some(term) = pending.pop() {
            match term.node() {
                Node::Add(inner) => pending.extend(inner.iter().cloned()),
                Node::Number(n) => constant = constant.add(n),
                _ => {
                    let (coeff, rest) = term.as_coeff_mul();
                    let entry = collected.entry(rest).or_insert_with(Number::zero);
                    *entry = entry.add(&coeff);
                }
            }
        }
        let mut terms = collected
            .into_iter()
            .filter(|(_, coeff)| !coeff.is_zero())
            .map(|(rest, coeff)| Expr::scale(coeff, rest))
            .collect::<Vec<_>>();
        if !constant.is_zero() {
            terms.push(Expr::number(constant));
        }
        terms.sort();
        match terms.len() {
            0 => Expr::zero(),
            1 => terms.remove(0),
            _ => Expr::from_node(Node::Add(terms)),
        }
    }

    /// Canonical product.
    ///
    /// Commutative factors with the same base are combined by adding their exponents,
    /// adjacent noncommutative factors only if they share the base.
    pub fn mul(factors: Vec<Expr>) -> Expr {
        let mut coeff = Number::one();
        let mut powers: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut chain: Vec<(Expr, Expr)> = vec![];
        for factor in factors.iter() {
            gather(factor, &mut coeff, &mut powers, &mut chain);
        }
        if coeff.is_zero() {
            return Expr::number(coeff);
        }

        let mut commutative = vec![];
        let mut regroup = false;
        for (base, exps) in powers.into_iter() {
            let power = Expr::pow(base, Expr::add(exps));
            match power.node() {
                Node::Number(n) => coeff = coeff.mul(n),
                Node::Mul(_) => {
                    regroup = true;
                    commutative.push(power);
                }
                _ => commutative.push(power),
            }
        }
        let mut ordered = vec![];
        for (base, exp) in chain.into_iter() {
            let power = Expr::pow(base, exp);
            match power.node() {
                Node::Number(n) => coeff = coeff.mul(n),
                _ => ordered.push(power),
            }
        }
        if regroup {
            let mut factors = vec![Expr::number(coeff)];
            factors.extend(commutative);
            factors.extend(ordered);
            return Expr::mul(factors);
        }

        if ordered.is_empty() && commutative.len() == 1 && !coeff.is_one() && coeff.is_rational()
        {
            if let Node::Add(terms) = commutative[0].node() {
                return Expr::add(
                    terms
                        .iter()
                        .map(|term| Expr::mul(vec![Expr::number(coeff.clone()), term.clone()]))
                        .collect(),
                );
            }
        }

        commutative.sort();
        Expr::from_product(Product {
            coeff,
            commutative,
            ordered,
        })
    }

    /// Wraps already canonical factors without further simplification.
    pub(crate) fn from_product(mut product: Product) -> Expr {
        let factor_count = product.commutative.len() + product.ordered.len();
        if factor_count == 0 {
            return Expr::number(product.coeff);
        }
        if factor_count == 1 && product.coeff.is_one() {
            return match product.commutative.pop() {
                Some(factor) => factor,
                None => product.ordered.remove(0),
            };
        }
        Expr::from_node(Node::Mul(product))
    }

    fn scale(coeff: Number, rest: Expr) -> Expr {
        if coeff.is_one() {
            rest
        } else {
            Expr::mul(vec![Expr::number(coeff), rest])
        }
    }

    /// Canonical power.
    ///
    /// `0**negative` and roots without an exact rational value stay unevaluated.
    pub fn pow(base: Expr, exp: Expr) -> Expr {
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() || base.is_one() {
            return if exp.is_one() { base } else { Expr::one() };
        }
        if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
            return match b.pow(e) {
                Some(value) => Expr::number(value),
                None => Expr::from_node(Node::Pow(base, exp)),
            };
        }
        if exp.is_integer_number() {
            match base.node() {
                Node::Pow(inner_base, inner_exp) => {
                    return Expr::pow(
                        inner_base.clone(),
                        Expr::mul(vec![inner_exp.clone(), exp.clone()]),
                    );
                }
                Node::Mul(product) if product.ordered.is_empty() => {
                    return Expr::mul(
                        product
                            .factors()
                            .into_iter()
                            .map(|factor| Expr::pow(factor, exp.clone()))
                            .collect(),
                    );
                }
                _ => (),
            }
        }
        Expr::from_node(Node::Pow(base, exp))
    }

    pub fn neg(&self) -> Expr {
        Expr::mul(vec![Expr::minus_one(), self.clone()])
    }

    pub fn sub(&self, other: &Expr) -> Expr {
        Expr::add(vec![self.clone(), other.neg()])
    }

    pub fn recip(&self) -> Expr {
        Expr::pow(self.clone(), Expr::minus_one())
    }

    pub fn div(&self, other: &Expr) -> Expr {
        Expr::mul(vec![self.clone(), other.recip()])
    }

    pub fn sqrt(&self) -> Expr {
        Expr::pow(self.clone(), Expr::rational(1, 2))
    }

    /// Distributes products over sums, also inside nested sums and products.
    ///
    /// Powers of sums are left alone: `x*(y + 1) -> x*y + x`, but `(x + 1)**2` stays.
    pub fn expand_mul(&self) -> Expr {
        match self.node() {
            Node::Add(terms) => Expr::add(terms.iter().map(Expr::expand_mul).collect()),
            Node::Mul(product) => {
                let mut partials: Vec<Vec<Expr>> = vec![vec![]];
                for factor in product.factors().iter() {
                    let summands = factor.expand_mul().add_args();
                    partials = partials
                        .iter()
                        .flat_map(|partial| {
                            summands.iter().map(move |summand| {
                                let mut extended = partial.clone();
                                extended.push(summand.clone());
                                extended
                            })
                        })
                        .collect();
                }
                Expr::add(partials.into_iter().map(Expr::mul).collect())
            }
            _ => self.clone(),
        }
    }

    /// Replaces every bound wildcard and rebuilds the tree canonically.
    pub fn substitute(&self, bindings: &Bindings) -> Expr {
        if bindings.is_empty() || !self.has_wildcard() {
            return self.clone();
        }
        let rules = self
            .wildcards()
            .into_iter()
            .filter_map(|wildcard| {
                let bound = bindings.get(&wildcard.name)?.clone();
                Some((Expr::from(wildcard), bound))
            })
            .collect::<BTreeMap<_, _>>();
        self.xreplace(&rules)
    }

    /// Simultaneous replacement of whole sub-expressions.
    ///
    /// Replacements are not visited again and the result is canonical.
    pub fn xreplace(&self, rules: &BTreeMap<Expr, Expr>) -> Expr {
        if rules.is_empty() {
            return self.clone();
        }
        if let Some(replacement) = rules.get(self) {
            return replacement.clone();
        }
        let each = |args: &[Expr]| -> Vec<Expr> {
            args.iter().map(|arg| arg.xreplace(rules)).collect()
        };
        match self.node() {
            Node::Number(_) | Node::Symbol(_) | Node::Wildcard(_) => self.clone(),
            Node::Add(terms) => Expr::add(each(terms)),
            Node::Mul(product) => Expr::mul(each(&product.factors())),
            Node::Pow(base, exp) => Expr::pow(base.xreplace(rules), exp.xreplace(rules)),
            Node::Function(name, args) => Expr::function(name, each(args)),
            Node::Derivative(expr, symbols) => {
                Expr::derivative(expr.xreplace(rules), each(symbols))
            }
        }
    }
}

fn gather(
    factor: &Expr,
    coeff: &mut Number,
    powers: &mut BTreeMap<Expr, Vec<Expr>>,
    chain: &mut Vec<(Expr, Expr)>,
) {
    match factor.node() {
        Node::Number(n) => *coeff = coeff.mul(n),
        Node::Mul(product) => {
            *coeff = coeff.mul(&product.coeff);
            for inner in product.commutative.iter().chain(product.ordered.iter()) {
                gather(inner, coeff, powers, chain);
            }
        }
        _ if factor.is_commutative() => {
            let (base, exp) = factor.as_base_exp();
            powers.entry(base).or_insert_with(Vec::new).push(exp);
        }
        _ => {
            let (base, exp) = factor.as_base_exp();
            match chain.last_mut() {
                Some((last_base, last_exp)) if *last_base == base => {
                    *last_exp = Expr::add(vec![last_exp.clone(), exp]);
                }
                _ => chain.push((base, exp)),
            }
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $build:path) => {
        impl ops::$trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(&self, &rhs)
            }
        }

        impl<'a> ops::$trait<&'a Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &'a Expr) -> Expr {
                $build(&self, rhs)
            }
        }

        impl<'a> ops::$trait<Expr> for &'a Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self, &rhs)
            }
        }

        impl<'a, 'b> ops::$trait<&'b Expr> for &'a Expr {
            type Output = Expr;
            fn $method(self, rhs: &'b Expr) -> Expr {
                $build(self, rhs)
            }
        }
    };
}

fn add_pair(a: &Expr, b: &Expr) -> Expr {
    Expr::add(vec![a.clone(), b.clone()])
}

fn mul_pair(a: &Expr, b: &Expr) -> Expr {
    Expr::mul(vec![a.clone(), b.clone()])
}

binary_operator!(Add, add, add_pair);
binary_operator!(Sub, sub, Expr::sub);
binary_operator!(Mul, mul, mul_pair);
binary_operator!(Div, div, Expr::div);

impl ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg(&self)
    }
}

impl<'a> ops::Neg for &'a Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg(self)
    }
}

#[cfg(test)]
mod specs {
    use super::*;
    use crate::expr::flags;

    fn symbols() -> (Expr, Expr, Expr) {
        (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"))
    }

    #[test]
    fn sum_flattening_and_collecting() {
        let (x, y, _) = symbols();
        let e = &x + &y + &x + Expr::integer(2) + Expr::integer(3);
        let expected = Expr::add(vec![
            Expr::integer(5),
            Expr::mul(vec![Expr::integer(2), x.clone()]),
            y.clone(),
        ]);
        assert_eq!(e, expected);
        match e.node() {
            Node::Add(terms) => assert_eq!(terms.len(), 3, "Wrong number of terms"),
            _ => panic!("Expected a sum"),
        }
    }

    #[test]
    fn sum_collapses() {
        let (x, _, _) = symbols();
        assert_eq!(&x - &x, Expr::zero());
        assert_eq!(&x + Expr::zero(), x);
        assert_eq!(Expr::add(vec![]), Expr::zero());
    }

    #[test]
    fn sum_is_order_independent() {
        let (x, y, z) = symbols();
        assert_eq!(&x + &y + &z, &z + &x + &y);
    }

    #[test]
    fn product_combines_powers() {
        let (x, y, _) = symbols();
        let e = &x * &y * &x;
        let expected = Expr::pow(x.clone(), Expr::integer(2)) * &y;
        assert_eq!(e, expected);
        assert_eq!(&x / &x, Expr::one());
        assert_eq!(&x * Expr::zero(), Expr::zero());
    }

    #[test]
    fn product_distributes_number_over_sum() {
        let (x, y, _) = symbols();
        let e = Expr::integer(2) * (&x + &y);
        assert_eq!(e, Expr::integer(2) * &x + Expr::integer(2) * &y);
        assert_eq!(-(&x + &y), -&x - &y);
    }

    #[test]
    fn product_keeps_noncommutative_order() {
        let a = Expr::symbol_with_flags("A", flags::NONCOMMUTATIVE);
        let b = Expr::symbol_with_flags("B", flags::NONCOMMUTATIVE);
        assert_ne!(&a * &b, &b * &a);
        assert_eq!(&a * &a, Expr::pow(a.clone(), Expr::integer(2)));
        let x = Expr::symbol("x");
        assert_eq!(&a * &x * &b, &x * &a * &b);
    }

    #[test]
    fn power_rules() {
        let (x, y, _) = symbols();
        let two = Expr::integer(2);
        assert_eq!(Expr::pow(x.clone(), Expr::zero()), Expr::one());
        assert_eq!(Expr::pow(x.clone(), Expr::one()), x);
        assert_eq!(Expr::pow(Expr::one(), y.clone()), Expr::one());
        assert_eq!(Expr::pow(two.clone(), Expr::integer(3)), Expr::integer(8));
        assert_eq!(Expr::pow(Expr::integer(4), Expr::rational(1, 2)), two);
        assert_eq!(
            Expr::pow(Expr::pow(x.clone(), y.clone()), two.clone()),
            Expr::pow(x.clone(), &y * &two)
        );
        assert_eq!(
            Expr::pow(&two * &x, two.clone()),
            Expr::integer(4) * Expr::pow(x.clone(), two.clone())
        );
    }

    #[test]
    fn zero_to_negative_power_stays() {
        let e = Expr::pow(Expr::zero(), Expr::minus_one());
        match e.node() {
            Node::Pow(..) => (),
            _ => panic!("0**-1 must not be evaluated"),
        }
    }

    #[test]
    fn substitution_recanonicalizes() {
        let (x, _, _) = symbols();
        let p = Expr::wild("p");
        let pattern = &p * &x + &p;
        let bindings: Bindings = hashmap! {"p".to_string() => x.clone()}.into();
        assert_eq!(
            pattern.substitute(&bindings),
            Expr::pow(x.clone(), Expr::integer(2)) + &x
        );
    }

    #[test]
    fn xreplace_is_simultaneous() {
        let (x, y, _) = symbols();
        let rules = vec![(x.clone(), y.clone()), (y.clone(), x.clone())]
            .into_iter()
            .collect::<BTreeMap<_, _>>();
        let e = Expr::integer(2) * &x + Expr::function("f", vec![y.clone()]);
        assert_eq!(
            e.xreplace(&rules),
            Expr::integer(2) * &y + Expr::function("f", vec![x.clone()])
        );
    }

    #[test]
    fn xreplace_whole_sub_expressions() {
        let (x, y, z) = symbols();
        let rules = vec![(&x + &y, z.clone())].into_iter().collect::<BTreeMap<_, _>>();
        let e = Expr::pow(&x + &y, Expr::integer(2));
        assert_eq!(e.xreplace(&rules), Expr::pow(z, Expr::integer(2)));
    }

    #[test]
    fn expand_mul_distributes() {
        let (x, y, _) = symbols();
        let e = &x * (&y + Expr::one());
        assert_eq!(e.expand_mul(), &x * &y + &x);
        let nested = -(&x * (Expr::rational(1, 8) - &y));
        assert_eq!(nested.expand_mul(), &x * &y - &x / Expr::integer(8));
    }

    #[test]
    fn expand_mul_keeps_order_and_powers() {
        let a = Expr::symbol_with_flags("A", flags::NONCOMMUTATIVE);
        let b = Expr::symbol_with_flags("B", flags::NONCOMMUTATIVE);
        let (x, _, _) = symbols();
        let e = &a * (&x + Expr::one()) * &b;
        assert_eq!(e.expand_mul(), &x * &a * &b + &a * &b);
        let square = Expr::pow(&x + Expr::one(), Expr::integer(2));
        assert_eq!(square.expand_mul(), square);
    }
}
