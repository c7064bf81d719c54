//! Error types for view authors

use thiserror::Error;

/// Errors a view constructor can return
#[derive(Error, Debug)]
pub enum ViewError {
    /// A resource the view needs is missing or unreadable
    #[error("Resource error: {0}")]
    Resource(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The view cannot be built in the current environment
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

impl ViewError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a resource error
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }
}
