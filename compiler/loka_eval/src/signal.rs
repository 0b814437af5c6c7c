//! Non-local control flow: `halt`, `break`, `continue`, `return`, `exit`.
//!
//! The same five-way union exists in two forms:
//! - Result-typed: `Err(ControlAction::Break)` from `evaluate_with_result`
//! - exceptional: an `EvalError` whose `signal` is set, from `evaluate`
//!
//! Structural boundaries (`Boundary`) decide which signals they absorb.
//! Genuine errors are never absorbed, in either form.

use std::fmt;

use loka_ir::Node;

use crate::{EvalError, Value};

/// A control transfer, as carried inside an `EvalError`.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionSignal {
    Halt,
    Break,
    Continue,
    Return(Value),
    Exit(Value),
}

impl ExecutionSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            ExecutionSignal::Halt => SignalKind::Halt,
            ExecutionSignal::Break => SignalKind::Break,
            ExecutionSignal::Continue => SignalKind::Continue,
            ExecutionSignal::Return(_) => SignalKind::Return,
            ExecutionSignal::Exit(_) => SignalKind::Exit,
        }
    }
}

/// Fieldless signal discriminant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Halt,
    Break,
    Continue,
    Return,
    Exit,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalKind::Halt => "halt",
            SignalKind::Break => "break",
            SignalKind::Continue => "continue",
            SignalKind::Return => "return",
            SignalKind::Exit => "exit",
        })
    }
}

/// Outcome of evaluation other than a plain value.
#[derive(Clone, Debug)]
pub enum ControlAction {
    Halt,
    Break,
    Continue,
    Return(Value),
    Exit(Value),
    Error(Box<EvalError>),
}

impl ControlAction {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    pub fn signal_kind(&self) -> Option<SignalKind> {
        match self {
            ControlAction::Halt => Some(SignalKind::Halt),
            ControlAction::Break => Some(SignalKind::Break),
            ControlAction::Continue => Some(SignalKind::Continue),
            ControlAction::Return(_) => Some(SignalKind::Return),
            ControlAction::Exit(_) => Some(SignalKind::Exit),
            ControlAction::Error(_) => None,
        }
    }

    /// Convert to the exceptional form.
    pub fn into_eval_error(self) -> EvalError {
        let signal = match self {
            ControlAction::Error(err) => return *err,
            ControlAction::Halt => ExecutionSignal::Halt,
            ControlAction::Break => ExecutionSignal::Break,
            ControlAction::Continue => ExecutionSignal::Continue,
            ControlAction::Return(value) => ExecutionSignal::Return(value),
            ControlAction::Exit(value) => ExecutionSignal::Exit(value),
        };
        EvalError::signal(signal)
    }

    /// Attach `node`'s location to a genuine error; signals pass unchanged.
    #[must_use]
    pub fn at_node_if_error(self, node: &Node) -> Self {
        match self {
            ControlAction::Error(err) => ControlAction::Error(Box::new(err.at_node(node))),
            other => other,
        }
    }
}

/// Lifts a carried signal back into its variant.
impl From<EvalError> for ControlAction {
    fn from(err: EvalError) -> Self {
        match err.signal {
            Some(ExecutionSignal::Halt) => ControlAction::Halt,
            Some(ExecutionSignal::Break) => ControlAction::Break,
            Some(ExecutionSignal::Continue) => ControlAction::Continue,
            Some(ExecutionSignal::Return(value)) => ControlAction::Return(value),
            Some(ExecutionSignal::Exit(value)) => ControlAction::Exit(value),
            None => ControlAction::Error(Box::new(err)),
        }
    }
}

/// A structural point that absorbs some signals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// `repeat`/`for` bodies.
    Loop,
    /// The top-level command list of a handler or program.
    Sequence,
    /// `def` calls and event handler dispatch.
    Handler,
    /// The evaluation root.
    Program,
}

impl Boundary {
    /// The decision table shared by both signal forms.
    pub fn catches_kind(self, kind: SignalKind) -> bool {
        match self {
            Boundary::Loop | Boundary::Sequence => {
                matches!(kind, SignalKind::Break | SignalKind::Continue)
            }
            Boundary::Handler => matches!(kind, SignalKind::Return | SignalKind::Exit),
            Boundary::Program => kind == SignalKind::Halt,
        }
    }

    pub fn catches(self, action: &ControlAction) -> bool {
        action.signal_kind().is_some_and(|kind| self.catches_kind(kind))
    }

    /// Absorb a Result-form outcome. A caught `Return(v)` yields `v`; every
    /// other caught signal yields `undefined`.
    pub fn catch(self, outcome: Result<Value, ControlAction>) -> Result<Value, ControlAction> {
        match outcome {
            Err(action) if self.catches(&action) => Ok(match action {
                ControlAction::Return(value) => value,
                _ => Value::Undefined,
            }),
            other => other,
        }
    }

    /// Absorb an exceptional-form outcome, with the same table as `catch`.
    pub fn catch_error(self, outcome: Result<Value, EvalError>) -> Result<Value, EvalError> {
        match outcome {
            Err(err) if err.signal.as_ref().is_some_and(|s| self.catches_kind(s.kind())) => {
                Ok(match err.signal {
                    Some(ExecutionSignal::Return(value)) => value,
                    _ => Value::Undefined,
                })
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests;
