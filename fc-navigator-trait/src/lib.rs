//! This crate provides the [`Navigator`] trait and its error type, and nothing else.
//!
//! It's structured like this so that the candle state machine and the navigator implementations
//! don't depend on each other.

use std::io;
use thiserror::Error;

/// The place a lit candle takes you to when it's clicked.
pub const DESTINATION_URL: &str = "https://www.52weeks.substack.com";

/// The error returned by [`Navigator::navigate`].
#[derive(Debug, Error)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum NavigationError {
    #[error("IO error: `{0:?}`")]
    Io(#[from] io::Error),

    #[error("The destination was empty")]
    EmptyDestination,

    #[error("The destination `{0}` is not an http or https URL")]
    NotHttp(String),
}

/// Check that a destination looks like something a browser can open.
pub fn validate_destination(destination: &str) -> Result<(), NavigationError> {
    let destination = destination.trim();

    if destination.is_empty() {
        Err(NavigationError::EmptyDestination)
    } else if destination.starts_with("https://") || destination.starts_with("http://") {
        Ok(())
    } else {
        Err(NavigationError::NotHttp(destination.to_string()))
    }
}

/// The trait implemented by all navigators.
///
/// Navigation is immediate and unconditional. There's no confirmation step and callers don't
/// retry a failed navigation.
pub trait Navigator: Send + Sync {
    /// Go to the given destination.
    fn navigate(&mut self, destination: &str) -> Result<(), NavigationError>;
}
