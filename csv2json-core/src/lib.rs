/*!
`csv2json-core` provides push based state machines that transcode CSV into
line-delimited JSON, or into lines of text joined by a single separator byte.

The machines never allocate and never read or write on their own. Callers
hand them slices of input and output and get back how much of each was used,
which makes them usable in `no_std` environments and trivial to drive from
any kind of I/O. The `csv2json` crate drives them over `std::io` streams.

# Example

This transduces an entire CSV document into line-delimited JSON with the
lenient configuration.

```
use csv2json_core::{Transducer, TransduceResult};

let data = "a,\"b,c\",\nd,\"e\"\"f\",g\n";
let mut t = Transducer::default();
let mut out = [0u8; 1024];
let (mut input, mut nout) = (data.as_bytes(), 0);
loop {
    let (res, nin, n) = t.transduce(input, &mut out[nout..]);
    input = &input[nin..];
    nout += n;
    match res {
        TransduceResult::InputEmpty | TransduceResult::OutputFull => {}
        TransduceResult::End(stats) => {
            assert_eq!(stats.records(), 2);
            break;
        }
        TransduceResult::Error(err) => panic!("{}", err),
    }
}
assert_eq!(
    &out[..nout],
    &b"[\"a\",\"b,c\",null]\n[\"d\",\"e\\\"f\",\"g\"]\n"[..],
);
```
*/

#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

pub use crate::config::{Config, ConfigBuilder, EmptyLine};
pub use crate::error::{Error, ErrorKind};
pub use crate::json::Transducer;
pub use crate::state::{Position, State, Stats};
pub use crate::text::{TextTransducer, TextTransducerBuilder};

mod config;
mod error;
mod json;
mod pending;
mod state;
mod text;

/// The result of feeding a slice of input to a transducer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransduceResult {
    /// All of the caller provided input was consumed. More input, or an
    /// empty slice to signal its end, is needed.
    InputEmpty,
    /// The caller provided output buffer was filled before all of the input
    /// could be processed.
    OutputFull,
    /// The end of input was reached and all output was written.
    End(Stats),
    /// An error was found. The output that closes the failing record was
    /// written.
    Error(Error),
}
