//! Front door and runtime errors.

use loka_eval::{EvalError, LoadError};

/// Input rejected before compilation started.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrontDoorError {
    #[error("compile input must be a string, found {found}")]
    NotText { found: &'static str },
}

/// Failure of `Runtime::eval` / `Runtime::execute`.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The source did not compile. Carries the first error message.
    #[error("Compilation failed: {0}")]
    Compilation(String),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl RuntimeError {
    /// The evaluation error, if this is one.
    pub fn as_eval(&self) -> Option<&EvalError> {
        match self {
            RuntimeError::Eval(err) => Some(err),
            _ => None,
        }
    }
}
