use crate::expr::Expr;
use itertools::Itertools;
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

/// Wildcard name to bound expression.
///
/// A name is bound at most once. Binding it again succeeds only with an equal expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bindings {
    map: HashMap<String, Expr>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Expr> {
        self.map.iter()
    }

    /// Returns the extended copy, `None` if `name` is bound to something else.
    pub fn bind(&self, name: &str, expr: &Expr) -> Option<Bindings> {
        match self.map.get(name) {
            Some(bound) if bound == expr => Some(self.clone()),
            Some(_) => None,
            None => {
                let mut extended = self.clone();
                extended.map.insert(name.to_string(), expr.clone());
                Some(extended)
            }
        }
    }

    /// Union of both maps, `None` if they disagree on a shared name.
    pub fn merge(&self, other: &Bindings) -> Option<Bindings> {
        let mut merged = self.clone();
        for (name, expr) in other.map.iter() {
            match merged.map.get(name) {
                Some(bound) if bound != expr => return None,
                Some(_) => continue,
                None => {
                    merged.map.insert(name.clone(), expr.clone());
                }
            }
        }
        Some(merged)
    }

    pub fn into_inner(self) -> HashMap<String, Expr> {
        self.map
    }
}

impl From<HashMap<String, Expr>> for Bindings {
    fn from(map: HashMap<String, Expr>) -> Bindings {
        Bindings { map }
    }
}

impl<'a> From<HashMap<&'a str, Expr>> for Bindings {
    fn from(map: HashMap<&'a str, Expr>) -> Bindings {
        Bindings {
            map: map
                .into_iter()
                .map(|(name, expr)| (name.to_string(), expr))
                .collect(),
        }
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let formatted = self
            .map
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(name, expr)| format!("{} => {}", name, expr))
            .join("\n");
        write!(f, "{}", formatted)
    }
}

#[cfg(test)]
mod specs {
    use super::*;

    #[test]
    fn bind_fresh_and_consistent() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let bindings = Bindings::new().bind("p", &x).expect("fresh name");
        assert_eq!(bindings.get("p"), Some(&x));
        assert_eq!(bindings.bind("p", &x), Some(bindings.clone()));
        assert_eq!(bindings.bind("p", &y), None);
    }

    #[test]
    fn merge_simple() {
        let first: Bindings = hashmap! {"a" => Expr::integer(1)}.into();
        let second: Bindings = hashmap! {"b" => Expr::integer(2)}.into();

        let actual = first.merge(&second);
        let expected: Bindings = hashmap! {"a" => Expr::integer(1), "b" => Expr::integer(2)}.into();
        assert_eq!(actual, Some(expected));
    }

    #[test]
    fn merge_contradiction() {
        let first: Bindings = hashmap! {"a" => Expr::integer(1)}.into();
        let second: Bindings = hashmap! {"a" => Expr::integer(2)}.into();
        assert_eq!(first.merge(&second), None);
        assert_eq!(first.merge(&first), Some(first.clone()));
    }

    #[test]
    fn format_mapping() {
        let bindings: Bindings =
            hashmap! {"q" => Expr::symbol("y"), "p" => Expr::symbol("x")}.into();
        assert_eq!(bindings.to_string(), "p => x\nq => y");
    }
}
