use thiserror::Error;

/// Failures which are not an ordinary "no match".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("malformed pattern: {0}")]
    MalformedPattern(String),
    #[error("search aborted after visiting {visited} nodes")]
    SearchAborted { visited: usize },
    #[error("pattern nesting depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },
    #[error("configuration error: {0}")]
    Config(String),
}
