use std::error;
use std::fmt;
use std::io;
use std::result;

use csv2json_core::{ErrorKind, Position};

/// A type alias for `Result<T, csv2json::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when transcoding a stream.
///
/// There are exactly two sources of failure. Either the underlying reader or
/// writer failed, in which case the run was aborted on the spot, or the CSV
/// data was invalid, in which case the record that was being written was
/// closed and all output was flushed before returning.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading CSV data or writing output.
    Io(io::Error),
    /// The CSV data was invalid.
    ///
    /// The wrapped value says what was wrong and where.
    Parse(csv2json_core::Error),
}

impl Error {
    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            Error::Parse(_) => false,
        }
    }

    /// The kind of parse error, if this is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match *self {
            Error::Io(_) => None,
            Error::Parse(ref err) => Some(err.kind()),
        }
    }

    /// The position in the input at which parsing failed, if this is a
    /// parse error.
    pub fn position(&self) -> Option<Position> {
        match *self {
            Error::Io(_) => None,
            Error::Parse(ref err) => Some(err.position()),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<csv2json_core::Error> for Error {
    fn from(err: csv2json_core::Error) -> Error {
        Error::Parse(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(err) => err,
            Error::Parse(err) => {
                io::Error::new(io::ErrorKind::InvalidData, err.to_string())
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Parse(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Parse(ref err) => err.fmt(f),
        }
    }
}
