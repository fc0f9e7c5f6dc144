use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the optimizer.
///
/// Input errors (`InvalidPool`, `InvalidConstraints`, `InvalidGrid`) are
/// always raised before any combinatorial work starts. Budget and grid-count
/// errors are post-hoc contract checks on an algorithm's own output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizerError {
    #[error("invalid pool: {0}")]
    InvalidPool(String),

    #[error("invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("budget exceeded: {total} > {max}")]
    BudgetExceeded { total: Decimal, max: Decimal },

    #[error("grid count exceeded: {count} > {max}")]
    GridCountExceeded { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_reason() {
        let err = OptimizerError::InvalidPool("duplicate number 7".into());
        assert_eq!(err.to_string(), "invalid pool: duplicate number 7");

        let err = OptimizerError::GridCountExceeded { count: 4, max: 3 };
        assert_eq!(err.to_string(), "grid count exceeded: 4 > 3");
    }
}
