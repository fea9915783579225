//! Structural matching of patterns against expressions
//!
//! # Example
//!
//! ```
//! use matchcore::{match_expr, Expr, Wildcard};
//!
//! let x = Expr::symbol("x");
//! let p: Expr = Wildcard::new("p").excluding(&x).into();
//! let q: Expr = Wildcard::new("q").excluding(&x).into();
//!
//! let expr = Expr::integer(4) * &x + Expr::integer(5);
//! let bindings = match_expr(&expr, &(&p * &x + &q)).expect("matches");
//! assert_eq!(bindings.get("p"), Some(&Expr::integer(4)));
//! assert_eq!(bindings.get("q"), Some(&Expr::integer(5)));
//! ```

use crate::bindings::Bindings;
use crate::config::MatchOptions;
use crate::error::MatchError;
use crate::expr::{Expr, Node, Wildcard};
use log::{debug, trace};
use std::cell::Cell;
use std::collections::HashMap;

mod decompose;
pub mod filter;
mod power;

pub(crate) use decompose::Operation;

pub type Outcome = Result<Option<Bindings>, MatchError>;

/// Runs one matching attempt after another, counting visited nodes against the budget.
///
/// Keep one matcher per thread.
pub struct Matcher {
    options: MatchOptions,
    visited: Cell<usize>,
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::new(MatchOptions::default())
    }
}

impl Matcher {
    pub fn new(options: MatchOptions) -> Matcher {
        Matcher {
            options,
            visited: Cell::new(0),
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Nodes visited by the last call of `try_match`.
    pub fn visited(&self) -> usize {
        self.visited.get()
    }

    /// Matches `pattern` against `expr` under the already established `bindings`.
    ///
    /// Returns `Ok(None)` if there is no match and an error for malformed patterns,
    /// for patterns nested deeper than `max_depth` or when the search exceeds the budget.
    pub fn try_match(&self, expr: &Expr, pattern: &Expr, bindings: &Bindings) -> Outcome {
        self.visited.set(0);
        validate(pattern)?;
        let depth = pattern.depth();
        if depth > self.options.max_depth {
            return Err(MatchError::TooDeep {
                depth,
                limit: self.options.max_depth,
            });
        }
        let pattern = pattern.substitute(bindings);
        let result = self.matches(&pattern, expr, bindings)?;
        debug!(
            "{} against {}: {} after {} visits",
            pattern,
            expr,
            if result.is_some() { "match" } else { "no match" },
            self.visited()
        );
        Ok(result)
    }

    pub(crate) fn visit(&self) -> Result<(), MatchError> {
        let visited = self.visited.get() + 1;
        self.visited.set(visited);
        match self.options.budget {
            Some(budget) if visited > budget => {
                debug!("Search budget of {} exhausted", budget);
                Err(MatchError::SearchAborted { visited })
            }
            _ => Ok(()),
        }
    }

    /// Dispatches on the kind of the pattern node.
    pub(crate) fn matches(&self, pattern: &Expr, expr: &Expr, bindings: &Bindings) -> Outcome {
        self.visit()?;
        trace!("{} ~ {}", pattern, expr);
        match pattern.node() {
            Node::Wildcard(wildcard) => Ok(filter::bind(wildcard, expr, bindings)),
            Node::Number(_) | Node::Symbol(_) => Ok(if pattern == expr {
                Some(bindings.clone())
            } else {
                None
            }),
            Node::Add(_) => self.matches_commutative(pattern, expr, bindings, Operation::Add),
            Node::Mul(_) => self.matches_product(pattern, expr, bindings),
            Node::Pow(..) => self.matches_power(pattern, expr, bindings),
            Node::Function(..) | Node::Derivative(..) => {
                self.matches_structure(pattern, expr, bindings)
            }
        }
    }

    /// Same head and arity, then argument by argument under the growing bindings.
    pub(crate) fn matches_structure(
        &self,
        pattern: &Expr,
        expr: &Expr,
        bindings: &Bindings,
    ) -> Outcome {
        if pattern == expr {
            return Ok(Some(bindings.clone()));
        }
        let same_head = match (pattern.node(), expr.node()) {
            (Node::Function(a, _), Node::Function(b, _)) => a == b,
            (Node::Derivative(..), Node::Derivative(..)) => true,
            (Node::Pow(..), Node::Pow(..)) => true,
            _ => false,
        };
        if !same_head {
            return Ok(None);
        }
        let pattern_args = pattern.args();
        let expr_args = expr.args();
        if pattern_args.len() != expr_args.len() {
            return Ok(None);
        }
        let mut current = bindings.clone();
        for (pattern_arg, expr_arg) in pattern_args.iter().zip(expr_args.iter()) {
            if pattern_arg == expr_arg {
                continue;
            }
            match self.matches(&pattern_arg.substitute(&current), expr_arg, &current)? {
                Some(extended) => current = extended,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

/// Rejects patterns which can never be matched meaningfully.
pub fn validate(pattern: &Expr) -> Result<(), MatchError> {
    let mut seen: HashMap<String, Wildcard> = HashMap::new();
    for part in pattern.parts() {
        match part.node() {
            Node::Wildcard(wildcard) => match seen.get(&wildcard.name) {
                Some(previous) if previous != wildcard => {
                    return Err(MatchError::MalformedPattern(format!(
                        "wildcard {} is declared with conflicting constraints",
                        wildcard.name
                    )));
                }
                Some(_) => (),
                None => {
                    seen.insert(wildcard.name.clone(), wildcard.clone());
                }
            },
            Node::Pow(base, exp) if base.is_zero() && filter::is_negative_number(exp) => {
                return Err(MatchError::MalformedPattern(format!(
                    "{} divides by zero",
                    part
                )));
            }
            Node::Derivative(_, symbols) => {
                if let Some(symbol) = symbols
                    .iter()
                    .find(|s| s.as_symbol().is_none() && s.as_wildcard().is_none())
                {
                    return Err(MatchError::MalformedPattern(format!(
                        "cannot differentiate with respect to {}",
                        symbol
                    )));
                }
            }
            _ => (),
        }
    }
    Ok(())
}

/// Matches with empty initial bindings.
///
/// Malformed patterns yield `None` as well; use `Matcher::try_match` to tell them apart.
pub fn match_expr(expr: &Expr, pattern: &Expr) -> Option<Bindings> {
    match_with(expr, pattern, &Bindings::new())
}

/// Matches under already established bindings, which are part of every result.
pub fn match_with(expr: &Expr, pattern: &Expr, bindings: &Bindings) -> Option<Bindings> {
    match Matcher::default().try_match(expr, pattern, bindings) {
        Ok(result) => result,
        Err(error) => {
            debug!("{}", error);
            None
        }
    }
}
