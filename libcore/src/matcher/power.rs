use super::{filter, Matcher, Outcome};
use crate::bindings::Bindings;
use crate::expr::{Expr, Node, Number};
use log::debug;

fn is_even_integer(expr: &Expr) -> bool {
    expr.as_number().map_or(false, Number::is_even)
}

impl Matcher {
    /// Matches `base**exp` patterns.
    ///
    /// A symbol or wildcard raised to an integer is matched by taking the root of the
    /// expression: `x**r` against `y**2` binds `y` to `x**(r/2)`. Only this one root is produced,
    /// and none for an even root of a negative number.
    pub(crate) fn matches_power(&self, pattern: &Expr, expr: &Expr, bindings: &Bindings) -> Outcome {
        let (pattern_base, pattern_exp) = pattern.as_base_exp();
        if expr.is_one() {
            if let Some(found) = self.matches(&pattern_exp, &Expr::zero(), bindings)? {
                return Ok(Some(found));
            }
        }

        let (base, exp) = expr.as_base_exp();
        let symbolic_base = match pattern_base.node() {
            Node::Symbol(_) | Node::Wildcard(_) => true,
            _ => false,
        };
        if symbolic_base && pattern_exp.is_integer_number() && !expr.is_zero() {
            if filter::is_negative_number(expr) && is_even_integer(&pattern_exp) {
                return Ok(None);
            }
            let root = if filter::is_rational(&exp) {
                Expr::pow(base, exp.div(&pattern_exp))
            } else {
                Expr::pow(expr.clone(), pattern_exp.recip())
            };
            debug!("Root of {} for {} is {}", expr, pattern, root);
            return self.matches(&pattern_base, &root, bindings);
        }

        if let Some(found) =
            self.matches_base_exp(&pattern_base, &pattern_exp, &base, &exp, bindings)?
        {
            return Ok(Some(found));
        }
        // (-b)**n == b**n for even n
        if base.is_add() && is_even_integer(&exp) {
            let negated = base.neg();
            debug!("Retrying {} with base {}", pattern, negated);
            if let Some(found) =
                self.matches_base_exp(&pattern_base, &pattern_exp, &negated, &exp, bindings)?
            {
                return Ok(Some(found));
            }
        }
        self.matches_structure(pattern, expr, bindings)
    }

    fn matches_base_exp(
        &self,
        pattern_base: &Expr,
        pattern_exp: &Expr,
        base: &Expr,
        exp: &Expr,
        bindings: &Bindings,
    ) -> Outcome {
        match self.matches(pattern_base, base, bindings)? {
            Some(partial) => self.matches(&pattern_exp.substitute(&partial), exp, &partial),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod specs {
    use super::*;
    use crate::expr::flags;
    use crate::expr::Wildcard;

    fn power_of(base: &Expr, exp: i64) -> Expr {
        Expr::pow(base.clone(), Expr::integer(exp))
    }

    #[test]
    fn exact_square_root_of_number() {
        let a = Expr::wild("a");
        let found = Matcher::default()
            .matches_power(&power_of(&a, 2), &Expr::integer(4), &Bindings::new())
            .unwrap();
        assert_eq!(found.and_then(|b| b.get("a").cloned()), Some(Expr::integer(2)));
    }

    #[test]
    fn root_of_power() {
        let x = Expr::symbol("x");
        let a = Expr::wild("a");
        let found = Matcher::default()
            .matches_power(&power_of(&a, 2), &power_of(&x, 4), &Bindings::new())
            .unwrap();
        assert_eq!(found.and_then(|b| b.get("a").cloned()), Some(power_of(&x, 2)));
    }

    #[test]
    fn root_with_rational_exponent() {
        let x = Expr::symbol("x");
        let r = Expr::symbol_with_flags("r", flags::RATIONAL);
        let y = Expr::wild("y");
        let expr = Expr::pow(x.clone(), r.clone());
        let found = Matcher::default()
            .matches_power(&power_of(&y, 2), &expr, &Bindings::new())
            .unwrap();
        let half = r.div(&Expr::integer(2));
        assert_eq!(found.and_then(|b| b.get("y").cloned()), Some(Expr::pow(x, half)));
    }

    #[test]
    fn zero_is_no_reciprocal() {
        let a = Expr::wild("a");
        let found = Matcher::default()
            .matches_power(&power_of(&a, -1), &Expr::zero(), &Bindings::new())
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn base_and_exponent() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let p: Expr = Wildcard::new("p").excluding(&x).into();
        let q = Expr::wild("q");
        let pattern = Expr::pow(&x + &p, q.clone());
        let expr = Expr::pow(&x + &y, y.clone());
        let found = Matcher::default()
            .matches_power(&pattern, &expr, &Bindings::new())
            .unwrap();
        let expected: Bindings = hashmap! {"p" => y.clone(), "q" => y.clone()}.into();
        assert_eq!(found, Some(expected));
    }

    #[test]
    fn no_even_root_of_negative_number() {
        let a = Expr::wild("a");
        let found = Matcher::default()
            .matches_power(&power_of(&a, 2), &Expr::integer(-4), &Bindings::new())
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn even_power_ignores_sign_of_sum() {
        let x = Expr::symbol("x");
        let a = Expr::wild("a");
        let two = Expr::integer(2);
        let expressions = vec![
            power_of(&(&x - &two), 2),
            power_of(&(&two - &x), 2),
        ];
        let patterns = vec![power_of(&(&x - &a), 2), power_of(&(&a - &x), 2)];
        for expr in expressions.iter() {
            for pattern in patterns.iter() {
                let found = Matcher::default()
                    .matches_power(pattern, expr, &Bindings::new())
                    .unwrap();
                let expected: Bindings = hashmap! {"a" => two.clone()}.into();
                assert_eq!(found, Some(expected), "{} against {}", pattern, expr);
            }
        }
    }

    #[test]
    fn odd_power_keeps_sign_of_sum() {
        let x = Expr::symbol("x");
        let a: Expr = Wildcard::new("a").excluding(&x).into();
        let two = Expr::integer(2);
        let found = Matcher::default()
            .matches_power(
                &power_of(&(&x - &a), 3),
                &power_of(&(&two - &x), 3),
                &Bindings::new(),
            )
            .unwrap();
        assert_eq!(found, None);
    }
}
