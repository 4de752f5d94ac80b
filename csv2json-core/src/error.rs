use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::{Position, State};

/// The kind of a transduction error.
///
/// Every kind is detected inline, at the byte that makes the input invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorKind {
    /// A blank line was found while empty lines are not allowed.
    UnexpectedEmptyLine,
    /// The input held no bytes at all while empty lines are not allowed.
    UnexpectedEmptyInput,
    /// Something other than a separator, a terminator or another quote
    /// followed the quote that closed a quoted field.
    UnexpectedDoubleQuote,
    /// The input ended inside a quoted field.
    UnexpectedEndOfField,
    /// The output field separator of the text transducer was found in the
    /// input data.
    SeparatorInData,
    /// Data followed the blanks that ended an unquoted field in the text
    /// transducer.
    UnexpectedEndOfString,
}

impl ErrorKind {
    /// A short human readable description of this kind of error.
    pub fn message(&self) -> &'static str {
        match *self {
            ErrorKind::UnexpectedEmptyLine => "unexpected empty line",
            ErrorKind::UnexpectedEmptyInput => "unexpected empty input",
            ErrorKind::UnexpectedDoubleQuote => "unexpected double quote",
            ErrorKind::UnexpectedEndOfField => "unexpected end of field",
            ErrorKind::SeparatorInData => {
                "output field separator found in input data"
            }
            ErrorKind::UnexpectedEndOfString => "unexpected end of string",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A description of the first error found in a stream.
///
/// It records what went wrong, where in the input it went wrong and the
/// state the transducer was in at that point. The position is the one at the
/// offending byte: the closing output written afterwards does not move it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Error {
    kind: ErrorKind,
    pos: Position,
    state: State,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, pos: Position, state: State) -> Error {
        Error { kind, pos, state }
    }

    /// What went wrong.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where it went wrong.
    pub fn position(&self) -> Position {
        self.pos
    }

    /// The state of the transducer when the error was found.
    pub fn state(&self) -> State {
        self.state
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (record: {}; field: {}; line: {}; character: {})",
            self.kind,
            self.pos.record(),
            self.pos.field(),
            self.pos.line(),
            self.pos.character(),
        )
    }
}
