use core::error;
use core::fmt;
use std::borrow::Cow;

// -----------------------------------------------------------------------------
// SyntaxError

/// A malformed-document error raised by a [`JsonReader`] or [`JsonWriter`].
///
/// The binding engine surfaces these unchanged; the reader/writer owns the
/// lexical context, so the message is expected to be self-contained.
///
/// [`JsonReader`]: crate::JsonReader
/// [`JsonWriter`]: crate::JsonWriter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: Cow<'static, str>,
}

impl SyntaxError {
    /// Creates an error from a static or owned message.
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed document: {}", self.message)
    }
}

impl error::Error for SyntaxError {}

impl From<&'static str> for SyntaxError {
    #[inline]
    fn from(message: &'static str) -> Self {
        Self::new(message)
    }
}

impl From<String> for SyntaxError {
    #[inline]
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
