use super::{Expr, Node, Number};

impl Expr {
    /// Number of elementary operations needed to write the expression down.
    ///
    /// Negation and division count as operations of their own,
    /// so `-x` counts one and `6/x**3` counts two.
    pub fn count_ops(&self) -> usize {
        match self.node() {
            Node::Number(n) => count_number(n),
            Node::Symbol(_) | Node::Wildcard(_) => 0,
            Node::Add(terms) => {
                let negated = terms.iter().filter(|term| term.is_negated()).count();
                let operands = terms
                    .iter()
                    .map(|term| {
                        if term.is_negated() {
                            term.neg().count_ops()
                        } else {
                            term.count_ops()
                        }
                    })
                    .sum::<usize>();
                let all_negated = if negated == terms.len() { 1 } else { 0 };
                terms.len() - 1 + operands + all_negated
            }
            Node::Mul(product) => {
                if product.coeff.is_negative() {
                    1 + self.neg().count_ops()
                } else {
                    count_positive_product(self)
                }
            }
            Node::Pow(base, exp) => {
                if exp.as_number().map_or(false, Number::is_minus_one) {
                    1 + base.count_ops()
                } else {
                    1 + base.count_ops() + exp.count_ops()
                }
            }
            Node::Function(_, args) => 1 + args.iter().map(Expr::count_ops).sum::<usize>(),
            Node::Derivative(expr, symbols) => {
                1 + expr.count_ops() + symbols.iter().map(Expr::count_ops).sum::<usize>()
            }
        }
    }

    /// Longest chain of nodes from the root to a leaf. A leaf has depth one.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.clone(), 1)];
        while let Some((current, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in current.args().into_iter() {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// Splits a product into numerator and denominator.
    pub fn as_numer_denom(&self) -> (Expr, Expr) {
        let mut numer = vec![];
        let mut denom = vec![];
        for factor in self.mul_args().into_iter() {
            if let Some(n) = factor.as_number() {
                match (n.numer(), n.denom()) {
                    (Some(p), Some(q)) => {
                        numer.push(Expr::number(Number::Rational(p.clone().into())));
                        denom.push(Expr::number(Number::Rational(q.clone().into())));
                    }
                    _ => numer.push(factor.clone()),
                }
                continue;
            }
            let (base, exp) = factor.as_base_exp();
            if exp.as_number().map_or(false, Number::is_negative) {
                denom.push(Expr::pow(base, exp.neg()));
            } else {
                numer.push(factor);
            }
        }
        (Expr::mul(numer), Expr::mul(denom))
    }
}

fn count_number(n: &Number) -> usize {
    match n {
        Number::Rational(_) => {
            let negative = if n.is_negative() { 1 } else { 0 };
            let fraction = if n.is_integer() { 0 } else { 1 };
            negative + fraction
        }
        Number::Float(_) => 0,
    }
}

fn count_positive_product(product: &Expr) -> usize {
    let (numer, denom) = product.as_numer_denom();
    if numer.is_integer_number() {
        return 1 + denom.count_ops();
    }
    if !denom.is_one() {
        let denom_ops = if denom.is_integer_number() {
            0
        } else {
            denom.count_ops()
        };
        return 1 + denom_ops + numer.count_ops();
    }
    let factors = numer.mul_args();
    factors.len() - 1 + factors.iter().map(Expr::count_ops).sum::<usize>()
}
