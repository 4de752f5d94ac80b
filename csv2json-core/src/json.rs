use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::pending::Pending;
use crate::state::{Counts, Position, State};
use crate::TransduceResult;

const OPEN_ARRAY: &[u8] = b"[";
const OPEN_STRING: &[u8] = b"\"";
const NULL_FIRST: &[u8] = b"[null,";
const NULL_FIELD: &[u8] = b"null,";
const NULL_LAST: &[u8] = b"null]\n";
const END_FIELD: &[u8] = b"\",";
const END_RECORD: &[u8] = b"\"]\n";
const ESCAPED_QUOTE: &[u8] = b"\\\"";
const ESCAPED_BACKSLASH: &[u8] = b"\\\\";
const ESCAPED_TAB: &[u8] = b"\\t";
const ESCAPED_LF: &[u8] = b"\\n";
const ESCAPED_CR: &[u8] = b"\\r";

/// What to do with the current byte once a transition has run.
enum Dispatch {
    /// The byte was consumed.
    Done,
    /// The state changed and the same byte must be evaluated again.
    Again,
}

/// A push based CSV to line-delimited JSON transducer.
///
/// Each CSV record becomes one JSON array of strings, with `null` standing
/// in for empty unquoted fields, followed by `\n`. Output is produced as
/// soon as the input that determines it is seen; nothing is buffered beyond
/// the output of the byte being processed.
///
/// The transducer is driven with [`transduce`](Transducer::transduce), which
/// accepts arbitrary slices of input and output. Fields and records may span
/// any number of calls.
///
/// # Input
///
/// Fields are separated by `,` and records by `\n`, optionally preceded by
/// `\r`. Fields may be quoted with `"`, in which case commas and line breaks
/// inside them are data and `""` is a literal quote. A backslash has no
/// special meaning in CSV.
///
/// Control bytes other than `\n` and `\t` are discarded, except for `\r`
/// inside a quoted field, which is kept (and written as `\r`). Outside of
/// quotes this makes `\r\n` and `\n` equivalent. Note that the `\r` of a
/// `\r\n` inside a quoted field is therefore preserved while the same pair
/// outside quotes collapses to a record terminator.
///
/// # Errors
///
/// The first error ends the stream. Before reporting it, the transducer
/// closes the record it was writing, so the output is valid line-delimited
/// JSON up to and including the failing record.
#[derive(Clone, Debug)]
pub struct Transducer {
    config: Config,
    state: State,
    counts: Counts,
    pending: Pending,
    /// Set once the end of input or an error was reached.
    outcome: Option<TransduceResult>,
}

impl Default for Transducer {
    fn default() -> Transducer {
        Transducer::new(Config::default())
    }
}

impl Transducer {
    /// Create a transducer with the given configuration.
    pub fn new(config: Config) -> Transducer {
        Transducer {
            config,
            state: State::StartRecord,
            counts: Counts::default(),
            pending: Pending::default(),
            outcome: None,
        }
    }

    /// The configuration this transducer was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The current position in the input.
    pub fn position(&self) -> Position {
        self.counts.pos
    }

    /// Reset the transducer such that it behaves as if it had never been
    /// used. The configuration is kept.
    pub fn reset(&mut self) {
        *self = Transducer::new(self.config);
    }

    /// Transduce CSV data in `input` to JSON written to `output`.
    ///
    /// This returns a result that tells the caller what to do next along
    /// with the number of bytes read from `input` and written to `output`.
    ///
    /// * `InputEmpty` means all of `input` was consumed. Call again with more.
    /// * `OutputFull` means `output` has no room left. Write it out and call
    ///   again with the unconsumed remainder of `input`. If nothing of
    ///   `input` remains, the staged output is handed over on the next call,
    ///   whatever input it carries.
    /// * `End` and `Error` mean the stream is finished. Calling again returns
    ///   the same value without reading or writing anything.
    ///
    /// # Termination
    ///
    /// An empty `input` signals the end of the stream. Callers should keep
    /// calling with an empty `input` until `End` or `Error` is returned,
    /// since the output that closes the last record may not fit in one call.
    pub fn transduce(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (TransduceResult, usize, usize) {
        let (mut nin, mut nout) = (0, 0);
        loop {
            nout += self.pending.drain(&mut output[nout..]);
            if !self.pending.is_empty() {
                return (TransduceResult::OutputFull, nin, nout);
            }
            if let Some(outcome) = self.outcome {
                return (outcome, nin, nout);
            }
            if input.is_empty() {
                self.outcome = Some(self.finish());
            } else if nin < input.len() {
                let b = input[nin];
                nin += 1;
                if let Err(kind) = self.step(b) {
                    self.outcome = Some(self.fail(kind));
                }
            } else {
                return (TransduceResult::InputEmpty, nin, nout);
            }
        }
    }

    fn step(&mut self, b: u8) -> Result<(), ErrorKind> {
        self.counts.pos.consume();
        if self.is_ignorable(b) {
            return Ok(());
        }
        while let Dispatch::Again = self.dispatch(b)? {}
        Ok(())
    }

    fn is_ignorable(&self, b: u8) -> bool {
        match b {
            b'\n' | b'\t' => false,
            b'\r' => self.state != State::Quoted,
            _ => b.is_ascii_control(),
        }
    }

    fn dispatch(&mut self, b: u8) -> Result<Dispatch, ErrorKind> {
        match self.state {
            State::StartRecord => match b {
                b'\n' => {
                    self.counts.pos.next_line();
                    if !self.config.allow_empty_lines() {
                        return Err(ErrorKind::UnexpectedEmptyLine);
                    }
                    self.pending.push(self.config.empty_line().token());
                    self.counts.empty_record();
                }
                b',' => {
                    self.pending.push(NULL_FIRST);
                    self.counts.end_field();
                    self.state = State::StartField;
                }
                _ => {
                    self.pending.push(OPEN_ARRAY);
                    self.state = State::StartField;
                    return Ok(Dispatch::Again);
                }
            },
            State::StartField => {
                if self.config.ignore_blanks_before_field() && is_blank(b) {
                    return Ok(Dispatch::Done);
                }
                match b {
                    b',' => {
                        self.pending.push(NULL_FIELD);
                        self.counts.end_field();
                    }
                    b'\n' => {
                        self.pending.push(NULL_LAST);
                        self.counts.pos.next_line();
                        self.end_record();
                    }
                    b'"' => {
                        self.pending.push(OPEN_STRING);
                        self.state = State::Quoted;
                    }
                    b'\\' => {
                        self.pending.push(OPEN_STRING);
                        self.pending.push(ESCAPED_BACKSLASH);
                        self.state = State::Plain;
                    }
                    b'\t' => {
                        self.pending.push(OPEN_STRING);
                        self.pending.push(ESCAPED_TAB);
                        self.state = State::Plain;
                    }
                    _ => {
                        self.pending.push(OPEN_STRING);
                        self.pending.push_byte(b);
                        self.state = State::Plain;
                    }
                }
            }
            State::Plain => match b {
                b',' => {
                    self.pending.push(END_FIELD);
                    self.counts.end_field();
                    self.state = State::StartField;
                }
                b'\n' => {
                    self.pending.push(END_RECORD);
                    self.counts.pos.next_line();
                    self.end_record();
                }
                b'"' => self.pending.push(ESCAPED_QUOTE),
                b'\\' => self.pending.push(ESCAPED_BACKSLASH),
                b'\t' => self.pending.push(ESCAPED_TAB),
                _ => self.pending.push_byte(b),
            },
            State::Quoted => match b {
                b'\n' => {
                    self.pending.push(ESCAPED_LF);
                    self.counts.pos.next_line();
                }
                b'\r' => self.pending.push(ESCAPED_CR),
                b'"' => self.state = State::Closing,
                b'\\' => self.pending.push(ESCAPED_BACKSLASH),
                b'\t' => self.pending.push(ESCAPED_TAB),
                _ => self.pending.push_byte(b),
            },
            State::Closing => {
                let skip = self.config.ignore_blanks_after_quoted_field();
                if skip && is_blank(b) {
                    return Ok(Dispatch::Done);
                }
                match b {
                    b',' => {
                        self.pending.push(END_FIELD);
                        self.counts.end_field();
                        self.state = State::StartField;
                    }
                    b'\n' => {
                        self.pending.push(END_RECORD);
                        self.counts.pos.next_line();
                        self.end_record();
                    }
                    b'"' => {
                        self.pending.push(ESCAPED_QUOTE);
                        self.state = State::Quoted;
                    }
                    _ => return Err(ErrorKind::UnexpectedDoubleQuote),
                }
            }
        }
        Ok(Dispatch::Done)
    }

    fn end_record(&mut self) {
        self.counts.end_record();
        self.state = State::StartRecord;
    }

    /// Write whatever closes the record in progress.
    ///
    /// This runs exactly once per stream, either at the end of input or
    /// right after an error.
    fn close(&mut self) -> Result<(), ErrorKind> {
        match self.state {
            State::StartRecord => {
                if self.counts.pos.character() > 0 {
                    return Ok(());
                }
                if !self.config.allow_empty_lines() {
                    return Err(ErrorKind::UnexpectedEmptyInput);
                }
                self.pending.push(self.config.empty_line().token());
                self.counts.empty_record();
            }
            State::StartField => {
                self.pending.push(NULL_LAST);
                self.end_record();
            }
            State::Plain | State::Closing => {
                self.pending.push(END_RECORD);
                self.end_record();
            }
            State::Quoted => {
                self.pending.push(END_RECORD);
                return Err(ErrorKind::UnexpectedEndOfField);
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> TransduceResult {
        // The state is captured before `close` so that an error reports
        // where the stream ended rather than where closing left it.
        let (pos, state) = (self.counts.pos, self.state);
        match self.close() {
            Ok(()) => TransduceResult::End(self.counts.stats()),
            Err(kind) => TransduceResult::Error(Error::new(kind, pos, state)),
        }
    }

    fn fail(&mut self, kind: ErrorKind) -> TransduceResult {
        let err = Error::new(kind, self.counts.pos, self.state);
        // Errors are only found in states whose closing cannot fail.
        let closed = self.close();
        debug_assert!(closed.is_ok());
        TransduceResult::Error(err)
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}
