use std::cmp;
use std::io;

use csv2json_core::{
    Config, Stats, TextTransducer, TextTransducerBuilder, TransduceResult,
    Transducer,
};
use log::{debug, trace};

use crate::error::{Error, Result};

const BUF_SIZE: usize = 8 * (1 << 10);

/// Buffers smaller than this make no sense and a zero sized one would never
/// make progress.
const MIN_BUF_SIZE: usize = 16;

/// The push API shared by both transducers.
trait Machine {
    fn transduce(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (TransduceResult, usize, usize);

    fn reset(&mut self);
}

impl Machine for Transducer {
    fn transduce(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (TransduceResult, usize, usize) {
        Transducer::transduce(self, input, output)
    }

    fn reset(&mut self) {
        Transducer::reset(self)
    }
}

impl Machine for TextTransducer {
    fn transduce(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> (TransduceResult, usize, usize) {
        TextTransducer::transduce(self, input, output)
    }

    fn reset(&mut self) {
        TextTransducer::reset(self)
    }
}

#[derive(Debug)]
struct Buffers {
    input: Vec<u8>,
    output: Vec<u8>,
}

impl Buffers {
    fn new(capacity: usize) -> Buffers {
        let capacity = cmp::max(MIN_BUF_SIZE, capacity);
        Buffers { input: vec![0; capacity], output: vec![0; capacity] }
    }
}

/// Builds a JSON transcoder with various configuration knobs.
#[derive(Debug)]
pub struct TranscoderBuilder {
    config: Config,
    capacity: usize,
}

impl Default for TranscoderBuilder {
    fn default() -> TranscoderBuilder {
        TranscoderBuilder { config: Config::default(), capacity: BUF_SIZE }
    }
}

impl TranscoderBuilder {
    /// Create a new builder using the lenient configuration.
    pub fn new() -> TranscoderBuilder {
        TranscoderBuilder::default()
    }

    /// Build a transcoder from this configuration.
    pub fn build(&self) -> Transcoder {
        Transcoder {
            machine: Transducer::new(self.config),
            buffers: Buffers::new(self.capacity),
        }
    }

    /// The CSV dialect to accept.
    ///
    /// The default is [`Config::lenient`].
    pub fn config(&mut self, config: Config) -> &mut TranscoderBuilder {
        self.config = config;
        self
    }

    /// Set the size of the input and output buffers, in bytes.
    ///
    /// The default is 8 KB each. Tiny values are rounded up.
    pub fn buffer_capacity(
        &mut self,
        capacity: usize,
    ) -> &mut TranscoderBuilder {
        self.capacity = capacity;
        self
    }
}

/// Transcodes CSV from any `io::Read` into line-delimited JSON written to
/// any `io::Write`.
///
/// Reading and writing are buffered for you, so there's no need to wrap
/// either side in a `BufReader` or `BufWriter`. Memory use is bounded by the
/// two buffers no matter how long a record or field is.
///
/// A transcoder may be used for any number of streams, one after the other.
/// Each run starts from scratch and returns its own result.
///
/// # Example
///
/// ```
/// let data = "city,pop\n\"Boston, MA\",4628910\n";
/// let mut out = vec![];
/// let stats = csv2json::Transcoder::new()
///     .transcode(data.as_bytes(), &mut out)
///     .unwrap();
/// assert_eq!(stats.records(), 2);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "[\"city\",\"pop\"]\n[\"Boston, MA\",\"4628910\"]\n",
/// );
/// ```
#[derive(Debug)]
pub struct Transcoder {
    machine: Transducer,
    buffers: Buffers,
}

impl Default for Transcoder {
    fn default() -> Transcoder {
        TranscoderBuilder::new().build()
    }
}

impl Transcoder {
    /// Create a transcoder with the lenient configuration.
    pub fn new() -> Transcoder {
        Transcoder::default()
    }

    /// Create a transcoder for the given configuration.
    pub fn from_config(config: Config) -> Transcoder {
        TranscoderBuilder::new().config(config).build()
    }

    /// The configuration this transcoder was built with.
    pub fn config(&self) -> &Config {
        self.machine.config()
    }

    /// Transcode all of `rdr` into `wtr`.
    ///
    /// On success, the returned stats describe the whole stream. When the
    /// CSV data is invalid, everything up to and including the failing
    /// record is written and flushed before `Error::Parse` is returned.
    /// An I/O error aborts the run immediately.
    pub fn transcode<R: io::Read, W: io::Write>(
        &mut self,
        rdr: R,
        wtr: W,
    ) -> Result<Stats> {
        drive(&mut self.machine, &mut self.buffers, rdr, wtr)
    }
}

/// Builds a text transcoder with various configuration knobs.
#[derive(Debug)]
pub struct TextTranscoderBuilder {
    builder: TextTransducerBuilder,
    capacity: usize,
}

impl Default for TextTranscoderBuilder {
    fn default() -> TextTranscoderBuilder {
        TextTranscoderBuilder {
            builder: TextTransducerBuilder::new(),
            capacity: BUF_SIZE,
        }
    }
}

impl TextTranscoderBuilder {
    /// Create a new builder.
    pub fn new() -> TextTranscoderBuilder {
        TextTranscoderBuilder::default()
    }

    /// Build a text transcoder from this configuration.
    pub fn build(&self) -> TextTranscoder {
        TextTranscoder {
            machine: self.builder.build(),
            buffers: Buffers::new(self.capacity),
        }
    }

    /// The byte written between fields. The default is `b'\t'`.
    pub fn separator(&mut self, separator: u8) -> &mut TextTranscoderBuilder {
        self.builder.separator(separator);
        self
    }

    /// The byte written for an empty unquoted field, if any. The default is
    /// `Some(b'0')`.
    pub fn empty_field(
        &mut self,
        placeholder: Option<u8>,
    ) -> &mut TextTranscoderBuilder {
        self.builder.empty_field(placeholder);
        self
    }

    /// Set the size of the input and output buffers, in bytes.
    pub fn buffer_capacity(
        &mut self,
        capacity: usize,
    ) -> &mut TextTranscoderBuilder {
        self.capacity = capacity;
        self
    }
}

/// Transcodes CSV into lines of text with fields joined by a separator.
///
/// See [`TextTransducer`](csv2json_core::TextTransducer) for the dialect.
#[derive(Debug)]
pub struct TextTranscoder {
    machine: TextTransducer,
    buffers: Buffers,
}

impl Default for TextTranscoder {
    fn default() -> TextTranscoder {
        TextTranscoderBuilder::new().build()
    }
}

impl TextTranscoder {
    /// Create a text transcoder that separates fields with tabs.
    pub fn new() -> TextTranscoder {
        TextTranscoder::default()
    }

    /// Transcode all of `rdr` into `wtr`.
    ///
    /// Errors are reported the same way as
    /// [`Transcoder::transcode`](crate::Transcoder::transcode).
    pub fn transcode<R: io::Read, W: io::Write>(
        &mut self,
        rdr: R,
        wtr: W,
    ) -> Result<Stats> {
        drive(&mut self.machine, &mut self.buffers, rdr, wtr)
    }
}

fn drive<M: Machine, R: io::Read, W: io::Write>(
    machine: &mut M,
    buffers: &mut Buffers,
    mut rdr: R,
    mut wtr: W,
) -> Result<Stats> {
    machine.reset();
    let Buffers { input: ref mut inbuf, output: ref mut outbuf } = *buffers;
    loop {
        let n = fill(&mut rdr, inbuf)?;
        trace!("read {} bytes", n);
        let eof = n == 0;
        let mut input = &inbuf[..n];
        loop {
            let (res, nin, nout) = machine.transduce(input, outbuf);
            input = &input[nin..];
            wtr.write_all(&outbuf[..nout])?;
            match res {
                TransduceResult::InputEmpty => break,
                TransduceResult::OutputFull => {
                    // Staged output is handed over on the next call, so an
                    // exhausted input must not be mistaken for its end.
                    if input.is_empty() && !eof {
                        break;
                    }
                }
                TransduceResult::End(stats) => {
                    wtr.flush()?;
                    debug!(
                        "transcoded {} records, {} fields, {} lines \
                         from {} bytes",
                        stats.records(),
                        stats.fields(),
                        stats.lines(),
                        stats.characters(),
                    );
                    return Ok(stats);
                }
                TransduceResult::Error(err) => {
                    wtr.flush()?;
                    debug!("stopped in state {}: {}", err.state(), err);
                    return Err(Error::Parse(err));
                }
            }
        }
    }
}

/// Read into `buf`, retrying reads that were interrupted.
fn fill<R: io::Read>(rdr: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match rdr.read(buf) {
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
            res => return res,
        }
    }
}
