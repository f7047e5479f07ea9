//! Error types for ESIS reading and writing.
//!
//! Reader and writer keep the first error they hit ("sticky" error).
//! Syntax errors are recorded and skipped; everything else aborts the
//! instance, and later calls short-circuit to the stored error.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Codes for malformed ESIS lines (or malformed writer input).
///
/// Copy enum rather than a message string so `Error` stays cheap to clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SyntaxCode {
    /// `A` line without the space after the attribute name
    MissingNameSeparator = 0,
    /// `A` line without the space between marker and value
    MissingValueSeparator,
    /// `A` line whose declared-value marker is not known
    UnknownMarker,
    /// Attribute name, element name or end-tag name is empty
    EmptyName,
    /// Name is not a valid element or attribute name (writer side)
    InvalidName,
    /// `)` line with no open element
    UnbalancedEnd,
    /// `)` name differs from the open element (only when end tags are checked)
    EndTagMismatch,
    /// Attributes staged but the element was closed before it started
    DanglingAttributes,
}

impl SyntaxCode {
    /// Get a human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingNameSeparator => "missing separator after attribute name",
            Self::MissingValueSeparator => "missing separator before attribute value",
            Self::UnknownMarker => "unknown attribute declared-value marker",
            Self::EmptyName => "empty name",
            Self::InvalidName => "invalid name",
            Self::UnbalancedEnd => "end tag without open element",
            Self::EndTagMismatch => "end tag does not match open element",
            Self::DanglingAttributes => "attributes without start tag",
        }
    }
}

impl std::fmt::Display for SyntaxCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors that can occur while decoding or encoding ESIS.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("out of memory: arena could not grow by {requested} bytes")]
    NoMemory { requested: usize },

    #[error("read failure: {0}")]
    Read(#[source] Arc<io::Error>),

    #[error("write failure: {0}")]
    Write(#[source] Arc<io::Error>),

    #[error("syntax error on line {line}: {code}")]
    Syntax { line: usize, code: SyntaxCode },

    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    pub(crate) fn read(err: io::Error) -> Self {
        Error::Read(Arc::new(err))
    }

    pub(crate) fn write(err: io::Error) -> Self {
        Error::Write(Arc::new(err))
    }

    /// Syntax errors are recoverable; everything else stops the instance.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Syntax { .. })
    }

    /// The syntax code, if this is a syntax error.
    pub fn syntax_code(&self) -> Option<SyntaxCode> {
        match self {
            Error::Syntax { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// First-error-wins slot shared by the reader and the writer.
#[derive(Debug, Default)]
pub(crate) struct Sticky(Option<Error>);

impl Sticky {
    /// Record `err` unless an error is already stored. A fatal error
    /// replaces a stored syntax error so the instance still stops.
    pub(crate) fn set(&mut self, err: Error) {
        let replace = match &self.0 {
            None => true,
            Some(old) => !old.is_fatal() && err.is_fatal(),
        };
        if replace {
            self.0 = Some(err);
        }
    }

    pub(crate) fn get(&self) -> Option<&Error> {
        self.0.as_ref()
    }

    /// The stored error, if it is one that stops the instance.
    pub(crate) fn fatal(&self) -> Option<&Error> {
        self.0.as_ref().filter(|e| e.is_fatal())
    }

    pub(crate) fn clear(&mut self) {
        self.0 = None;
    }
}
