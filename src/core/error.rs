use thiserror::Error;

/// Failures reported by the projection engine. The engine has no transient
/// failure sources, so none of these are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A caller-supplied parameter is out of range or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A computation would divide by zero; the contract forbids silently
    /// producing infinity or NaN.
    #[error("division by zero: {0}")]
    DivisionByZero(String),
    /// The snowball schedule did not reach full payoff within the round cap.
    #[error("debt schedule did not reach payoff within {max_rounds} rounds")]
    NonConvergence { max_rounds: u32 },
}
