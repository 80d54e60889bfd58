//! Stream-level error taxonomy.
//!
//! Per-file errors (`OpenFailed`, `Corrupted`, `Empty`, `NoMatch`) never surface here -- they are
//! recovered locally by the Reader Set and turned into synthesized [`crate::stream::record::Record`]s
//! instead. `StreamError` carries only the stream-level failures that terminate `next_record`.
use crate::error::ParserErrorWithBytes;
use std::fmt::{self, Display, Formatter};
use std::io;

#[derive(Debug)]
pub enum StreamError {
    /// The Data Interface returned a non-empty error after having already produced data.
    BackendError(String),
    /// An illegal state transition, e.g. `add_filter` after `start`. Non-fatal: callers are
    /// expected to log a warning and leave state unchanged.
    ConfigError(String),
    /// Underlying I/O failure opening a backend resource (manifest file, catalog file, ...).
    Io(io::Error),
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::BackendError(s) => write!(f, "backend error: {s}"),
            StreamError::ConfigError(s) => write!(f, "config error: {s}"),
            StreamError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

impl From<ParserErrorWithBytes> for StreamError {
    fn from(e: ParserErrorWithBytes) -> Self {
        StreamError::BackendError(e.to_string())
    }
}
