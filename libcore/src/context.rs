use crate::error::MatchError;
use crate::expr::{flags, Expr, FlagType};
use std::collections::HashMap;
use std::fs::File;
extern crate serde_yaml;

fn default_true() -> bool {
    true
}

/// Assumptions about a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default = "default_true")]
    pub commutative: bool,
    #[serde(default)]
    pub real: bool,
    #[serde(default)]
    pub rational: bool,
    #[serde(default)]
    pub integer: bool,
    #[serde(default)]
    pub positive: bool,
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            commutative: true,
            real: false,
            rational: false,
            integer: false,
            positive: false,
        }
    }
}

impl Declaration {
    /// Integers are rational, rationals and positives are real.
    pub fn flags(&self) -> FlagType {
        let mut result = 0;
        if !self.commutative {
            result |= flags::NONCOMMUTATIVE;
        }
        if self.integer {
            result |= flags::INTEGER | flags::RATIONAL | flags::REAL;
        }
        if self.rational {
            result |= flags::RATIONAL | flags::REAL;
        }
        if self.positive {
            result |= flags::POSITIVE | flags::REAL;
        }
        if self.real {
            result |= flags::REAL;
        }
        result
    }
}

/// Symbol declarations, undeclared symbols are plain commutative symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub declarations: HashMap<String, Declaration>,
}

impl Context {
    pub fn load(filename: &str) -> Result<Context, MatchError> {
        let file = File::open(filename).map_err(|msg| MatchError::Config(msg.to_string()))?;
        serde_yaml::from_reader(file).map_err(|msg| MatchError::Config(msg.to_string()))
    }

    pub fn from_yaml(code: &str) -> Result<Context, MatchError> {
        serde_yaml::from_str(code).map_err(|msg| MatchError::Config(msg.to_string()))
    }

    pub fn declare(&mut self, ident: &str, declaration: Declaration) {
        self.declarations.insert(ident.to_string(), declaration);
    }

    pub fn is_commutative(&self, ident: &str) -> bool {
        match self.declarations.get(ident) {
            None => true,
            Some(declaration) => declaration.commutative,
        }
    }

    pub fn flags(&self, ident: &str) -> FlagType {
        match self.declarations.get(ident) {
            None => 0,
            Some(declaration) => declaration.flags(),
        }
    }

    pub fn symbol(&self, ident: &str) -> Expr {
        Expr::symbol_with_flags(ident, self.flags(ident))
    }

    pub fn symbols(&self, idents: &[&str]) -> Vec<Expr> {
        idents.iter().map(|ident| self.symbol(ident)).collect()
    }
}
