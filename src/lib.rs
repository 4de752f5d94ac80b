/*!
The `csv2json` crate transcodes CSV into line-delimited JSON, one JSON array
per CSV record, without ever holding more than a fixed amount of the stream
in memory.

```text
a,"b,c",            ["a","b,c",null]
d,"e""f",g    =>    ["d","e\"f","g"]
```

Empty unquoted fields become `null`, quoted fields become strings with `"`,
`\`, tab, line feed and carriage return escaped, and bytes outside of ASCII
are passed through untouched. A sibling transcoder writes plain lines of text
with fields joined by a separator byte instead.

The state machines doing the actual work live in the `csv2json-core` crate,
which has no dependencies and works without the standard library. This crate
drives them over `std::io` and turns their reports into a regular `Result`.

# Example

```
use csv2json::{Config, ErrorKind, Transcoder};

let mut out = vec![];
let mut tc = Transcoder::from_config(Config::rfc4180());
let err = tc.transcode(&b"a\n\"b\" \n"[..], &mut out).unwrap_err();
assert_eq!(err.kind(), Some(ErrorKind::UnexpectedDoubleQuote));
// The failing record is still closed.
assert_eq!(out, b"[\"a\"]\n[\"b\"]\n");
```

# Dialects

The JSON transcoder is configured with a [`Config`]. The default,
[`Config::lenient`], skips blanks around fields and writes empty lines as
`null`. [`Config::rfc4180`] rejects both.
*/

#![deny(missing_docs)]

use std::io;

pub use csv2json_core::{
    Config, ConfigBuilder, EmptyLine, Error as ParseError, ErrorKind,
    Position, State, Stats,
};

pub use crate::error::{Error, Result};
pub use crate::transcoder::{
    TextTranscoder, TextTranscoderBuilder, Transcoder, TranscoderBuilder,
};

mod error;
mod transcoder;

/// Transcode CSV from `rdr` into line-delimited JSON written to `wtr`, using
/// the lenient configuration.
pub fn to_json<R: io::Read, W: io::Write>(rdr: R, wtr: W) -> Result<Stats> {
    Transcoder::new().transcode(rdr, wtr)
}

/// Transcode CSV from `rdr` into tab separated lines written to `wtr`.
pub fn to_text<R: io::Read, W: io::Write>(rdr: R, wtr: W) -> Result<Stats> {
    TextTranscoder::new().transcode(rdr, wtr)
}
