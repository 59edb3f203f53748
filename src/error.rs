use thiserror::Error;

/// Errors that can stop a BFLX run.
#[derive(Debug, Error)]
pub enum Error {
    /// A loop jump was taken from a bracket with no partner.
    #[error("unbalanced brackets: '{bracket}' at position {position} has no match")]
    UnbalancedBrackets { position: usize, bracket: char },
    /// Register selection outside the register bank.
    #[error("register index {0} out of range")]
    RegisterIndexOutOfRange(usize),
    /// `?` ran with no input left and the EOF policy is to fail.
    #[error("input exhausted at position {position}")]
    InputExhausted { position: usize },
    /// The configured step budget ran out before the program finished.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
