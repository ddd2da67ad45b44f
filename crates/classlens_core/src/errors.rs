//! Errors raised by the type model when a constructor is invoked.

use thiserror::Error;

use crate::descriptor::Visibility;

/// Failure to run a constructor through a [`ConstructorHandle`](crate::ConstructorHandle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    /// The handle was not made accessible and the constructor is not public.
    #[error("constructor `{signature}` is {visibility} and has not been made accessible")]
    Inaccessible { signature: String, visibility: Visibility },

    #[error("constructor `{signature}` takes {expected} argument(s), {found} supplied")]
    ArityMismatch {
        signature: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} is not assignable to `{expected}` (found {found})")]
    ArgumentType {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("argument {index} is missing")]
    MissingArgument { index: usize },

    /// Raised by a constructor body for reasons of its own.
    #[error("{0}")]
    Custom(String),
}

impl InvokeError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
