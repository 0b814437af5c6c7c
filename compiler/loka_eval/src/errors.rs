//! Runtime error types.
//!
//! `EvalErrorKind` carries the structured category; factory functions such as
//! `undefined_function()` build both the kind and the message, and are the
//! public way to construct errors.
//!
//! An `EvalError` may also carry an `ExecutionSignal`. That is the exceptional
//! form of non-local control flow: the signal rides the error channel until a
//! boundary catches it. `ControlAction` is the Result-typed form of the same
//! union; `From<EvalError>` and `ControlAction::into_eval_error` convert
//! between them.

use std::fmt;

use loka_ir::{Category, Location, Node, Span};

use crate::{ExecutionSignal, SignalKind, Value};

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Dispatch
    UnsupportedNodeType { tag: String },
    CategoryLoadFailed { category: Category, reason: String },

    // Names and calls
    UndefinedFunction { name: String },
    UnknownCommand { name: String },
    NotCallable { type_name: String },
    CannotCallMethod { method: String, type_name: String },
    WrongArgType { method: String, expected: String },
    StackOverflow { depth: usize },

    // Values
    InvalidAssignmentTarget { target: String },
    NotIterable { type_name: String },
    InvalidSelector { selector: String, reason: String },
    ElementRequired { what: String },

    /// A value raised with `throw`.
    Thrown { text: String },
    /// A control-flow signal carried in exceptional form.
    Signal { kind: SignalKind },

    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedNodeType { tag } => write!(f, "Unsupported node type: {tag}"),
            Self::CategoryLoadFailed { category, reason } => {
                write!(f, "Failed to load {category} implementations: {reason}")
            }
            Self::UndefinedFunction { name } => write!(f, "Unknown function: {name}"),
            Self::UnknownCommand { name } => write!(f, "Unknown command: {name}"),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::CannotCallMethod { method, type_name } => {
                write!(f, "Cannot call method `{method}` on {type_name}")
            }
            Self::WrongArgType { method, expected } => write!(f, "`{method}` expects {expected}"),
            Self::StackOverflow { depth } => {
                write!(f, "Maximum call depth of {depth} exceeded")
            }
            Self::InvalidAssignmentTarget { target } => write!(f, "Cannot assign to {target}"),
            Self::NotIterable { type_name } => write!(f, "Cannot iterate over {type_name}"),
            Self::InvalidSelector { selector, reason } => {
                write!(f, "Invalid selector `{selector}`: {reason}")
            }
            Self::ElementRequired { what } => write!(f, "{what} requires an element"),
            Self::Thrown { text } => f.write_str(text),
            Self::Signal { kind } => write!(f, "{kind}"),
            Self::Custom { message } => f.write_str(message),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Set when this error is a control-flow signal in exceptional form.
    pub signal: Option<ExecutionSignal>,
    /// The value passed to `throw`.
    pub thrown: Option<Value>,
    pub span: Option<Span>,
    pub location: Option<Location>,
}

impl EvalError {
    /// An error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            signal: None,
            thrown: None,
            span: None,
            location: None,
        }
    }

    /// A control-flow signal in exceptional form.
    pub fn signal(signal: ExecutionSignal) -> Self {
        let mut error = Self::from_kind(EvalErrorKind::Signal {
            kind: signal.kind(),
        });
        error.signal = Some(signal);
        error
    }

    /// Attach the span and location of `node`, unless already set.
    #[must_use]
    pub fn at_node(mut self, node: &Node) -> Self {
        if self.span.is_none() {
            self.span = Some(node.span);
            self.location = Some(node.loc);
        }
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[inline]
    pub fn is_control_flow(&self) -> bool {
        self.signal.is_some()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(loc) = self.location {
            write!(f, " at line {}, column {}", loc.line, loc.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Dispatch errors

#[cold]
pub fn unsupported_node_type(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedNodeType {
        tag: tag.to_string(),
    })
}

#[cold]
pub fn category_load_failed(category: Category, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CategoryLoadFailed {
        category,
        reason: reason.to_string(),
    })
}

// Name and call errors

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_command(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownCommand {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn cannot_call_method(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotCallMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn wrong_arg_type(method: &str, expected: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgType {
        method: method.to_string(),
        expected: expected.to_string(),
    })
}

// Value errors

#[cold]
pub fn invalid_assignment_target(target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignmentTarget {
        target: target.to_string(),
    })
}

#[cold]
pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_selector(err: &crate::SelectorError) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidSelector {
        selector: err.selector.clone(),
        reason: err.reason.clone(),
    })
}

#[cold]
pub fn element_required(what: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ElementRequired {
        what: what.to_string(),
    })
}

/// The error raised by `throw value`.
#[cold]
pub fn thrown(value: Value) -> EvalError {
    let mut error = EvalError::from_kind(EvalErrorKind::Thrown {
        text: value.to_string(),
    });
    error.thrown = Some(value);
    error
}
