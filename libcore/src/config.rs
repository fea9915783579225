use crate::error::MatchError;
use std::fs::File;
extern crate serde_yaml;

/// Tuning of the matcher search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Maximal number of visited nodes before the search is aborted.
    pub budget: Option<usize>,
    /// Retry failed product and sum searches with split powers and coefficients.
    #[serde(rename = "second-pass")]
    pub second_pass: bool,
    /// Reject decompositions whose residual needs more operations than the input.
    #[serde(rename = "prune-by-ops")]
    pub prune_by_ops: bool,
    /// Deepest pattern nesting accepted before matching starts.
    #[serde(rename = "max-depth")]
    pub max_depth: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            budget: None,
            second_pass: true,
            prune_by_ops: true,
            max_depth: 500,
        }
    }
}

impl MatchOptions {
    pub fn load(filename: &str) -> Result<MatchOptions, MatchError> {
        let file = File::open(filename).map_err(|msg| MatchError::Config(msg.to_string()))?;
        serde_yaml::from_reader(file).map_err(|msg| MatchError::Config(msg.to_string()))
    }

    pub fn from_yaml(code: &str) -> Result<MatchOptions, MatchError> {
        serde_yaml::from_str(code).map_err(|msg| MatchError::Config(msg.to_string()))
    }

    pub fn with_budget(mut self, budget: usize) -> MatchOptions {
        self.budget = Some(budget);
        self
    }
}

#[cfg(test)]
mod specs {
    use super::*;

    #[test]
    fn defaults() {
        let options = MatchOptions::default();
        assert_eq!(options.budget, None);
        assert!(options.second_pass);
        assert!(options.prune_by_ops);
        assert_eq!(options.max_depth, 500);
    }

    #[test]
    fn from_yaml_partial() {
        let options = MatchOptions::from_yaml("budget: 100\nsecond-pass: false\n").expect("yaml");
        assert_eq!(
            options,
            MatchOptions {
                budget: Some(100),
                second_pass: false,
                prune_by_ops: true,
                max_depth: 500,
            }
        );
    }

    #[test]
    fn from_yaml_invalid() {
        match MatchOptions::from_yaml("budget: many") {
            Err(MatchError::Config(_)) => (),
            other => panic!("Expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn load_missing_file() {
        let result = MatchOptions::load("does/not/exist.yaml");
        assert!(result.is_err(), "Missing file must be reported");
    }
}
