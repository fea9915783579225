//! Decomposition of sums and products
//!
//! A pattern `a + p + c` is matched against `a + b + c` by removing the
//! wildcard-free operands algebraically and matching the rest against the residual.
//! Only if every operand of the pattern contains an unbound wildcard do we search,
//! trying each wildcard against each operand of the expression.

use super::{filter, Matcher, Outcome};
use crate::bindings::Bindings;
use crate::expr::{Expr, Number};
use log::debug;
use num_traits::Signed;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Add,
    Mul,
}

impl Operation {
    pub fn identity(self) -> Expr {
        match self {
            Operation::Add => Expr::zero(),
            Operation::Mul => Expr::one(),
        }
    }

    pub fn build(self, operands: Vec<Expr>) -> Expr {
        match self {
            Operation::Add => Expr::add(operands),
            Operation::Mul => Expr::mul(operands),
        }
    }

    pub fn make_args(self, expr: &Expr) -> Vec<Expr> {
        match self {
            Operation::Add => expr.add_args(),
            Operation::Mul => expr.mul_args(),
        }
    }

    /// Removes `rhs` from `lhs`: the expanded difference for sums, the quotient for products.
    pub fn combine_inverse(self, lhs: &Expr, rhs: &Expr) -> Expr {
        if lhs == rhs {
            return self.identity();
        }
        match self {
            Operation::Add => lhs.sub(rhs).expand_mul(),
            Operation::Mul => lhs.div(rhs),
        }
    }

    /// Rewrites `x**3` as the operands `[x, x**2]` and `3*x` as `[x, 2*x]`.
    fn split(self, expr: &Expr) -> Option<Vec<Expr>> {
        match self {
            Operation::Mul => {
                let (base, exp) = expr.as_base_exp();
                let n = exp.as_number().and_then(Number::as_integer)?;
                if exp.is_one() {
                    return None;
                }
                if n.is_positive() {
                    Some(vec![
                        base.clone(),
                        Expr::pow(base, Expr::add(vec![exp, Expr::minus_one()])),
                    ])
                } else {
                    Some(vec![
                        base.recip(),
                        Expr::pow(base, Expr::add(vec![exp, Expr::one()])),
                    ])
                }
            }
            Operation::Add => {
                let (coeff, rest) = expr.as_coeff_mul();
                if coeff.abs().cmp(&Number::one()) != Ordering::Greater {
                    return None;
                }
                if coeff.is_positive() {
                    let remainder = coeff.add(&Number::integer(-1));
                    Some(vec![
                        rest.clone(),
                        Expr::mul(vec![Expr::number(remainder), rest]),
                    ])
                } else {
                    let remainder = coeff.add(&Number::one());
                    Some(vec![
                        rest.neg(),
                        Expr::mul(vec![Expr::number(remainder), rest]),
                    ])
                }
            }
        }
    }
}

/// Whether every operand of the pattern is an unbound wildcard excluding `operand`.
///
/// No binding of the search can then contain the operand.
fn excluded_by_all(operand: &Expr, wild_part: &[Expr], bindings: &Bindings) -> bool {
    !wild_part.is_empty()
        && wild_part.iter().all(|wild| match wild.as_wildcard() {
            Some(wildcard) => {
                !bindings.contains(&wildcard.name) && filter::excluded(wildcard, operand)
            }
            None => false,
        })
}

impl Matcher {
    /// Products of noncommutative factors keep their order,
    /// everything else goes through the commutative decomposition.
    ///
    /// The scalar part and the ordered chain are matched separately and their bindings merged.
    pub(crate) fn matches_product(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
    ) -> Outcome {
        let pattern_commutative = pattern.is_commutative();
        let expr_commutative = expr.is_commutative();
        if pattern_commutative && expr_commutative {
            return self.matches_commutative(pattern, expr, bindings, Operation::Mul);
        }
        if pattern_commutative != expr_commutative {
            return Ok(None);
        }

        let (pattern_scalars, pattern_chain) = pattern.args_cnc();
        let (expr_scalars, expr_chain) = expr.args_cnc();
        let scalars = if pattern_scalars.is_empty() {
            if !expr_scalars.is_empty() {
                return Ok(None);
            }
            bindings.clone()
        } else {
            let scalar_pattern = Expr::mul(pattern_scalars);
            let scalar = Expr::mul(expr_scalars);
            match self.matches(&scalar_pattern, &scalar, bindings)? {
                Some(found) => found,
                None => return Ok(None),
            }
        };
        // Wildcards shared with the scalar part are already resolved in the chain.
        let pattern_chain = pattern_chain
            .iter()
            .map(|factor| factor.substitute(&scalars))
            .collect::<Vec<_>>();
        let chain = match self.matches_sequence(&pattern_chain, &expr_chain, bindings)? {
            Some(found) => found,
            None => return Ok(None),
        };
        Ok(scalars.merge(&chain))
    }

    /// Ordered matching of noncommutative factors.
    ///
    /// An unbound wildcard absorbs a non-empty contiguous run, shortest first.
    /// Every other factor consumes exactly one operand.
    fn matches_sequence(&self, patterns: &[Expr], operands: &[Expr], bindings: &Bindings) -> Outcome {
        self.visit()?;
        let (first, rest) = match patterns.split_first() {
            None => {
                return Ok(if operands.is_empty() {
                    Some(bindings.clone())
                } else {
                    None
                })
            }
            Some(split) => split,
        };
        if operands.is_empty() {
            return Ok(None);
        }
        let longest = if first.as_wildcard().is_some() {
            operands.len()
        } else {
            1
        };
        for end in 1..=longest {
            let run = Expr::mul(operands[..end].to_vec());
            if let Some(partial) = self.matches(first, &run, bindings)? {
                let rest = rest
                    .iter()
                    .map(|factor| factor.substitute(&partial))
                    .collect::<Vec<_>>();
                if let Some(found) = self.matches_sequence(&rest, &operands[end..], &partial)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    pub(crate) fn matches_commutative(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
        operation: Operation,
    ) -> Outcome {
        if pattern == expr {
            return Ok(Some(bindings.clone()));
        }
        if let Some(found) = self.matches_simple(pattern, expr, bindings, operation)? {
            return Ok(Some(found));
        }

        let (wild_part, exact_part): (Vec<Expr>, Vec<Expr>) = operation
            .make_args(pattern)
            .into_iter()
            .partition(|arg| arg.has_wildcard() && !expr.has(arg));

        if !exact_part.is_empty() {
            return self.matches_residual(expr, bindings, operation, wild_part, exact_part);
        }
        self.search(pattern, expr, bindings, operation, &wild_part)
    }

    /// A pattern with a single non-numeric operand: `3*p` against `6*x` binds `p` to `2*x`.
    fn matches_simple(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
        operation: Operation,
    ) -> Outcome {
        let (coeff, terms) = match operation {
            Operation::Add => pattern.as_coeff_add(),
            Operation::Mul => {
                let (coeff, rest) = pattern.as_coeff_mul();
                (coeff, rest.mul_args())
            }
        };
        if terms.len() != 1 {
            return Ok(None);
        }
        let residual = operation.combine_inverse(expr, &Expr::number(coeff));
        self.matches(&terms[0], &residual, bindings)
    }

    /// Removes the wildcard-free operands from the expression and matches the rest.
    fn matches_residual(
        &self,
        expr: &Expr,
        bindings: &Bindings,
        operation: Operation,
        wild_part: Vec<Expr>,
        exact_part: Vec<Expr>,
    ) -> Outcome {
        let exact = operation.build(exact_part);
        let free = expr.free_symbols();
        if !free.is_empty() && !exact.free_symbols().is_subset(&free) {
            return Ok(None);
        }
        let residual = operation.combine_inverse(expr, &exact);
        if self.options.prune_by_ops
            && (expr.is_add() || expr.is_mul())
            && residual.count_ops() > expr.count_ops()
        {
            debug!("Residual {} of {} grew, pruned", residual, expr);
            return Ok(None);
        }
        let rest = operation.build(wild_part);
        self.matches(&rest, &residual, bindings)
    }

    fn search(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
        operation: Operation,
        wild_part: &[Expr],
    ) -> Outcome {
        let mut operands = operation.make_args(expr);
        if let Some(blocked) = operands
            .iter()
            .find(|operand| excluded_by_all(operand, wild_part, bindings))
        {
            debug!("No wildcard of {} can take {}", pattern, blocked);
            return Ok(None);
        }
        operands.sort();
        operands.insert(0, operation.identity());
        if let Some(found) = self.try_operands(pattern, expr, bindings, wild_part, &operands)? {
            return Ok(Some(found));
        }
        if !self.options.second_pass {
            return Ok(None);
        }
        match operation.split(expr) {
            Some(mut split) => {
                debug!("Retrying {} split into {} operands", expr, split.len());
                split.sort();
                split.insert(0, operation.identity());
                self.try_operands(pattern, expr, bindings, wild_part, &split)
            }
            None => Ok(None),
        }
    }

    /// Binds one wildcard operand to one expression operand,
    /// then matches the whole narrowed pattern again. The last operands are tried first.
    fn try_operands(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
        wild_part: &[Expr],
        operands: &[Expr],
    ) -> Outcome {
        for operand in operands.iter().rev() {
            for wild in wild_part.iter().rev() {
                if let Some(partial) = self.matches(wild, operand, bindings)? {
                    let narrowed = pattern.substitute(&partial);
                    if let Some(found) = self.matches(&narrowed, expr, &partial)? {
                        return Ok(Some(found));
                    }
                }
            }
        }
        Ok(None)
    }
}
