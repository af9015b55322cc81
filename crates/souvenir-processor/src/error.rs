//! Error types for module processing.

use std::time::Duration;

use souvenir_access::{AccessError, ResolveError};
use thiserror::Error;

/// Reasons a module's processing is abandoned.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The module did not report itself solved in time.
    #[error("Module '{module}' was not solved within {duration:?}")]
    SolveTimeout { module: String, duration: Duration },

    /// The module went away before it was solved.
    #[error("Solve signal for module '{0}' closed before it was solved")]
    SolveSignalClosed(String),

    /// The module's state is readable but makes no sense for a question.
    #[error("Module '{module}': {message}")]
    Unusable { module: String, message: String },
}

pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors from handler registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Handler for module '{0}' already registered")]
    AlreadyRegistered(String),
}
