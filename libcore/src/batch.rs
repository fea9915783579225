use crate::bindings::Bindings;
use crate::config::MatchOptions;
use crate::expr::Expr;
use crate::matcher::{Matcher, Outcome};
use rayon::prelude::*;

/// Matches every `(expression, pattern)` pair in parallel.
/// The results keep the order of the input.
pub fn match_all(pairs: &[(Expr, Expr)], options: &MatchOptions) -> Vec<Outcome> {
    pairs
        .par_iter()
        .map(|(expr, pattern)| Matcher::new(options.clone()).try_match(expr, pattern, &Bindings::new()))
        .collect()
}

/// Index and bindings of the first pattern matching `expr`.
pub fn first_match(
    expr: &Expr,
    patterns: &[Expr],
    options: &MatchOptions,
) -> Option<(usize, Bindings)> {
    let matcher = Matcher::new(options.clone());
    patterns.iter().enumerate().find_map(|(i, pattern)| {
        match matcher.try_match(expr, pattern, &Bindings::new()) {
            Ok(Some(bindings)) => Some((i, bindings)),
            _ => None,
        }
    })
}

#[cfg(test)]
mod specs {
    use super::*;
    use crate::error::MatchError;

    #[test]
    fn keeps_input_order() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let p = Expr::wild("p");
        let pairs = vec![
            (&x + &y, &p + &y),
            (x.clone(), y.clone()),
            (Expr::integer(4) * &x, &p * &x),
        ];
        let actual = match_all(&pairs, &MatchOptions::default());
        let expected: Vec<Outcome> = vec![
            Ok(Some(hashmap! {"p" => x.clone()}.into())),
            Ok(None),
            Ok(Some(hashmap! {"p" => Expr::integer(4)}.into())),
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn reports_errors_per_pair() {
        let x = Expr::symbol("x");
        let p = Expr::wild("p");
        let broken = Expr::pow(Expr::zero(), Expr::minus_one()) * &p;
        let pairs = vec![(x.clone(), p.clone()), (x.clone(), broken)];
        let actual = match_all(&pairs, &MatchOptions::default());
        let expected: Bindings = hashmap! {"p" => x}.into();
        assert_eq!(actual[0], Ok(Some(expected)));
        match &actual[1] {
            Err(MatchError::MalformedPattern(_)) => (),
            other => panic!("Expected a malformed pattern, got {:?}", other),
        }
    }

    #[test]
    fn first_matching_pattern() {
        let x = Expr::symbol("x");
        let p = Expr::wild("p");
        let f = Expr::function("f", vec![x.clone()]);
        let patterns = vec![
            Expr::function("g", vec![p.clone()]),
            Expr::function("f", vec![p.clone()]),
            p.clone(),
        ];
        let actual = first_match(&f, &patterns, &MatchOptions::default());
        let expected: Bindings = hashmap! {"p" => x}.into();
        assert_eq!(actual, Some((1, expected)));
    }
}
