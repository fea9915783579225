//! Structural pattern matching for symbolic expression trees
//!
//! A pattern is an expression containing wildcards.
//! Matching it against a concrete expression yields the bindings of the wildcards
//! which make both equal, honoring commutativity of sums and products,
//! exclusion constraints of wildcards and the algebra of powers.
//!
//! # Example
//!
//! ```
//! use matchcore::{match_expr, Expr};
//!
//! let (a, b, c) = (Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c"));
//! let p = Expr::wild("p");
//!
//! let bindings = match_expr(&(&a + &b + &c), &(&a + &p + &c)).expect("matches");
//! assert_eq!(bindings.get("p"), Some(&b));
//! ```

#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate maplit;

pub mod batch;
pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod matcher;

pub use bindings::Bindings;
pub use config::MatchOptions;
pub use context::{Context, Declaration};
pub use error::MatchError;
pub use expr::{flags, Exclusion, Expr, FlagType, Node, Number, Wildcard};
pub use matcher::{match_expr, match_with, Matcher, Outcome};
