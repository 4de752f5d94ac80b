use crate::error::{Error, ErrorKind};
use crate::pending::Pending;
use crate::state::{Counts, Position, State};
use crate::TransduceResult;

/// Builds a text transducer with various configuration knobs.
#[derive(Debug)]
pub struct TextTransducerBuilder {
    separator: u8,
    empty_field: Option<u8>,
}

impl Default for TextTransducerBuilder {
    fn default() -> TextTransducerBuilder {
        TextTransducerBuilder { separator: b'\t', empty_field: Some(b'0') }
    }
}

impl TextTransducerBuilder {
    /// Create a new builder.
    pub fn new() -> TextTransducerBuilder {
        TextTransducerBuilder::default()
    }

    /// Build a text transducer from this configuration.
    pub fn build(&self) -> TextTransducer {
        TextTransducer {
            separator: self.separator,
            empty_field: self.empty_field,
            state: State::StartRecord,
            quoted: false,
            counts: Counts::default(),
            pending: Pending::default(),
            outcome: None,
        }
    }

    /// The byte written between fields.
    ///
    /// The default is `b'\t'`. Finding this byte anywhere in the input is an
    /// error, since it could not be told apart from a field boundary.
    pub fn separator(&mut self, separator: u8) -> &mut TextTransducerBuilder {
        self.separator = separator;
        self
    }

    /// The byte written for an empty unquoted field, if any.
    ///
    /// The default is `Some(b'0')`. With `None`, empty fields are written as
    /// nothing at all.
    pub fn empty_field(
        &mut self,
        placeholder: Option<u8>,
    ) -> &mut TextTransducerBuilder {
        self.empty_field = placeholder;
        self
    }
}

/// A push based transducer from CSV to separated lines of text.
///
/// Every record becomes one line with its fields joined by the separator
/// byte. Quoted fields are written without their quotes and with doubled
/// quotes collapsed. Nothing is escaped, so a quoted field holding a line
/// break spans several output lines.
///
/// This dialect is stricter about blanks than the JSON transducer: blanks
/// in front of a field are skipped, but a blank after unquoted data ends
/// the field and only blanks, `,` or `\n` may follow it. Carriage returns
/// are dropped everywhere, including inside quotes.
///
/// It is driven exactly like a [`Transducer`](crate::Transducer).
#[derive(Clone, Debug)]
pub struct TextTransducer {
    separator: u8,
    empty_field: Option<u8>,
    state: State,
    /// Whether the field that `Closing` refers to was quoted.
    quoted: bool,
    counts: Counts,
    pending: Pending,
    outcome: Option<TransduceResult>,
}

impl Default for TextTransducer {
    fn default() -> TextTransducer {
        TextTransducerBuilder::new().build()
    }
}

impl TextTransducer {
    /// Create a text transducer with the default configuration.
    pub fn new() -> TextTransducer {
        TextTransducer::default()
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
        self.state = State::StartRecord;
        self.quoted = false;
        self.counts = Counts::default();
        self.pending.clear();
        self.outcome = None;
    }

    /// Transduce CSV data in `input` to text written to `output`.
    ///
    /// This follows the same protocol as
    /// [`Transducer::transduce`](crate::Transducer::transduce), including
    /// an empty `input` marking the end of the stream.
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
        if b == b'\r' {
            return Ok(());
        }
        if b == self.separator {
            return Err(ErrorKind::SeparatorInData);
        }
        match self.state {
            State::StartRecord | State::StartField => match b {
                b' ' | b'\t' => {}
                b'"' => self.state = State::Quoted,
                b',' => {
                    self.push_empty();
                    self.end_field();
                }
                b'\n' => {
                    self.push_empty();
                    self.end_record();
                }
                _ => {
                    self.pending.push_byte(b);
                    self.state = State::Plain;
                }
            },
            State::Plain => match b {
                b' ' | b'\t' => self.close_field(false),
                b',' => self.end_field(),
                b'\n' => self.end_record(),
                _ => self.pending.push_byte(b),
            },
            State::Quoted => match b {
                b'"' => self.close_field(true),
                b'\n' => {
                    self.counts.pos.next_line();
                    self.pending.push_byte(b);
                }
                _ => self.pending.push_byte(b),
            },
            State::Closing => match b {
                b',' => self.end_field(),
                b'\n' => self.end_record(),
                b'"' if self.quoted => {
                    self.pending.push_byte(b);
                    self.state = State::Quoted;
                }
                b' ' | b'\t' if !self.quoted => {}
                _ if self.quoted => {
                    return Err(ErrorKind::UnexpectedDoubleQuote);
                }
                _ => return Err(ErrorKind::UnexpectedEndOfString),
            },
        }
        Ok(())
    }

    fn push_empty(&mut self) {
        if let Some(placeholder) = self.empty_field {
            self.pending.push_byte(placeholder);
        }
    }

    fn close_field(&mut self, quoted: bool) {
        self.quoted = quoted;
        self.state = State::Closing;
    }

    fn end_field(&mut self) {
        self.pending.push_byte(self.separator);
        self.counts.end_field();
        self.state = State::StartField;
    }

    fn end_record(&mut self) {
        self.pending.push_byte(b'\n');
        self.counts.pos.next_line();
        self.counts.end_record();
        self.state = State::StartRecord;
    }

    fn close(&mut self) -> Result<(), ErrorKind> {
        match self.state {
            State::StartRecord => {}
            State::StartField => {
                self.push_empty();
                self.pending.push_byte(b'\n');
                self.counts.end_record();
            }
            State::Plain | State::Closing => {
                self.pending.push_byte(b'\n');
                self.counts.end_record();
            }
            State::Quoted => {
                self.pending.push_byte(b'\n');
                return Err(ErrorKind::UnexpectedEndOfField);
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> TransduceResult {
        let (pos, state) = (self.counts.pos, self.state);
        match self.close() {
            Ok(()) => TransduceResult::End(self.counts.stats()),
            Err(kind) => TransduceResult::Error(Error::new(kind, pos, state)),
        }
    }

    fn fail(&mut self, kind: ErrorKind) -> TransduceResult {
        let err = Error::new(kind, self.counts.pos, self.state);
        // A separator inside quotes leaves the quote open. Closing still
        // ends the line, and the error found first is the one reported.
        if let Err(superseded) = self.close() {
            debug_assert_eq!(superseded, ErrorKind::UnexpectedEndOfField);
        }
        TransduceResult::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use core::str;

    use arrayvec::ArrayVec;

    use super::{TextTransducer, TextTransducerBuilder};
    use crate::error::ErrorKind;
    use crate::state::State;
    use crate::TransduceResult;

    fn run(
        mut t: TextTransducer,
        data: &[u8],
        chunk: usize,
        outlen: usize,
    ) -> (ArrayVec<u8, 256>, TransduceResult) {
        let mut out = ArrayVec::new();
        let mut buf = [0u8; 8];
        let buf = &mut buf[..outlen];
        let mut chunks = data.chunks(chunk);
        let mut input: &[u8] = chunks.next().unwrap_or(&[]);
        loop {
            let (res, nin, nout) = t.transduce(input, buf);
            out.try_extend_from_slice(&buf[..nout]).unwrap();
            input = &input[nin..];
            match res {
                TransduceResult::InputEmpty => {
                    input = chunks.next().unwrap_or(&[]);
                }
                TransduceResult::OutputFull if input.is_empty() => {
                    input = chunks.next().unwrap_or(&[]);
                }
                TransduceResult::OutputFull => {}
                TransduceResult::End(_) | TransduceResult::Error(_) => {
                    return (out, res);
                }
            }
        }
    }

    macro_rules! transduces_to {
        ($name:ident, $data:expr, $expected:expr) => {
            transduces_to!($name, $data, $expected, |b| b);
        };
        ($name:ident, $data:expr, $expected:expr, $config:expr) => {
            #[test]
            fn $name() {
                for &(chunk, outlen) in &[(1, 1), (2, 3), (256, 8)] {
                    let mut builder = TextTransducerBuilder::new();
                    $config(&mut builder);
                    let (out, res) =
                        run(builder.build(), $data.as_bytes(), chunk, outlen);
                    assert!(
                        matches!(res, TransduceResult::End(_)),
                        "unexpected {:?}",
                        res
                    );
                    assert_eq!($expected, str::from_utf8(&out).unwrap());
                }
            }
        };
    }

    macro_rules! fails_with {
        (
            $name:ident, $data:expr, $expected:expr,
            $kind:expr, $pos:expr, $state:expr
        ) => {
            #[test]
            fn $name() {
                for &(chunk, outlen) in &[(1, 1), (256, 8)] {
                    let t = TextTransducer::new();
                    let (out, res) = run(t, $data.as_bytes(), chunk, outlen);
                    let err = match res {
                        TransduceResult::Error(err) => err,
                        res => panic!("unexpected {:?}", res),
                    };
                    assert_eq!($kind, err.kind());
                    let pos = err.position();
                    let got = (
                        pos.record(),
                        pos.field(),
                        pos.line(),
                        pos.character(),
                    );
                    assert_eq!($pos, got);
                    assert_eq!($state, err.state());
                    assert_eq!($expected, str::from_utf8(&out).unwrap());
                }
            }
        };
    }

    transduces_to!(empty, "", "");
    transduces_to!(one_record, "a,b", "a\tb\n");
    transduces_to!(many_records, "a,b\nc,d\n", "a\tb\nc\td\n");
    transduces_to!(crlf, "a\r\nb\r\n", "a\nb\n");
    transduces_to!(empty_line, "\n", "0\n");
    transduces_to!(leading_empty, ",a", "0\ta\n");
    transduces_to!(trailing_empty, "a,", "a\t0\n");
    transduces_to!(quoted_comma, "\"a,b\",c", "a,b\tc\n");
    transduces_to!(quoted_doubled, "\"a\"\"b\"", "a\"b\n");
    transduces_to!(quoted_lf, "\"a\nb\"", "a\nb\n");
    transduces_to!(quoted_empty, "\"\",x", "\tx\n");
    transduces_to!(blanks, " a ,  \"b\",c  \n", "a\tb\tc\n");
    transduces_to!(
        no_placeholder,
        "a,,b\n,",
        "a\t\tb\n\t\n",
        |b: &mut TextTransducerBuilder| {
            b.empty_field(None);
        }
    );
    transduces_to!(
        other_separator,
        "a,\"b\tc\"",
        "a;b\tc\n",
        |b: &mut TextTransducerBuilder| {
            b.separator(b';');
        }
    );

    fails_with!(
        separator_in_data,
        "a\tb",
        "a\n",
        ErrorKind::SeparatorInData,
        (1, 1, 1, 2),
        State::Plain
    );
    fails_with!(
        separator_in_quotes,
        "x,\"a\tb\"",
        "x\ta\n",
        ErrorKind::SeparatorInData,
        (1, 2, 1, 5),
        State::Quoted
    );
    fails_with!(
        inner_blank,
        "a b",
        "a\n",
        ErrorKind::UnexpectedEndOfString,
        (1, 1, 1, 3),
        State::Closing
    );
    fails_with!(
        data_after_quote,
        "\"a\"x",
        "a\n",
        ErrorKind::UnexpectedDoubleQuote,
        (1, 1, 1, 4),
        State::Closing
    );
    fails_with!(
        unterminated,
        "a\n\"abc",
        "a\nabc\n",
        ErrorKind::UnexpectedEndOfField,
        (2, 1, 2, 6),
        State::Quoted
    );

    #[test]
    fn stats_and_reset() {
        let mut t = TextTransducer::new();
        let mut out = [0u8; 32];
        let (res, _, nout) = t.transduce(b"a,b\nc", &mut out);
        assert_eq!(res, TransduceResult::InputEmpty);
        assert_eq!(&out[..nout], b"a\tb\nc");
        let (res, _, _) = t.transduce(&[], &mut out);
        let stats = match res {
            TransduceResult::End(stats) => stats,
            res => panic!("unexpected {:?}", res),
        };
        assert_eq!((stats.records(), stats.fields()), (2, 3));
        assert_eq!(stats.characters(), 5);

        t.reset();
        assert_eq!(t.position().character(), 0);
        let (res, nin, nout) = t.transduce(b"x", &mut out);
        assert_eq!((res, nin, nout), (TransduceResult::InputEmpty, 1, 1));
    }
}
