use std::thread;

use bstr::ByteSlice;
use csv2json::{Config, ConfigBuilder, EmptyLine, ErrorKind, State, Transcoder};

/// Transcode `data`, returning the output and the result.
fn transcode(
    config: Config,
    data: &[u8],
) -> (Vec<u8>, csv2json::Result<csv2json::Stats>) {
    let mut out = vec![];
    let res = Transcoder::from_config(config).transcode(data, &mut out);
    (out, res)
}

/// Decode line-delimited JSON output into records.
fn decode(out: &[u8]) -> Vec<Option<Vec<Option<String>>>> {
    out.lines()
        .map(|line| {
            serde_json::from_slice(line).unwrap_or_else(|err| {
                panic!("invalid JSON line {:?}: {}", line.as_bstr(), err)
            })
        })
        .collect()
}

/// Quote a value the way a CSV writer would.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[test]
fn escapes_round_trip() {
    let values = [
        "plain",
        "with \"quotes\"",
        "back\\slash\\",
        "tab\there",
        "line\nbreak",
        "windows\r\nbreak",
        "all: \" \\ \t \n",
        "comma, inside",
        "",
    ];
    let data: Vec<String> = values.iter().map(|v| quote(v)).collect();
    let data = format!("{}\n", data.join(","));
    let (out, res) = transcode(Config::lenient(), data.as_bytes());
    res.unwrap();

    let records = decode(&out);
    assert_eq!(records.len(), 1);
    let got = records[0].as_ref().unwrap();
    let expected: Vec<Option<String>> =
        values.iter().map(|v| Some(v.to_string())).collect();
    assert_eq!(got, &expected);
}

#[test]
fn carriage_return_outside_quotes_is_dropped() {
    let (out, res) = transcode(Config::lenient(), b"a\rb,c\r\n");
    res.unwrap();
    assert_eq!(
        decode(&out),
        vec![Some(vec![Some("ab".to_string()), Some("c".to_string())])]
    );
}

#[test]
fn unquoted_records_match_lines() {
    let inputs = [
        "a\n",
        "a,b,c\nd,e,f\n",
        "x,,z\n,\n,,\nlast",
        "1,2\n3\n4,5,6,7\n",
    ];
    for input in &inputs {
        let (out, res) = transcode(Config::rfc4180(), input.as_bytes());
        let stats = res.unwrap();
        let records = decode(&out);
        let lines: Vec<&str> = input.lines().collect();
        assert_eq!(records.len(), lines.len(), "{:?}", input);
        assert_eq!(stats.records() as usize, lines.len());
        for (record, line) in records.iter().zip(&lines) {
            let record = record.as_ref().unwrap();
            assert_eq!(record.len(), line.matches(',').count() + 1);
            let fields: Vec<Option<String>> = line
                .split(',')
                .map(|f| if f.is_empty() { None } else { Some(f.to_string()) })
                .collect();
            assert_eq!(record, &fields);
        }
    }
}

#[test]
fn leniency_without_blanks_changes_nothing() {
    let data = b"a,\"b\",c\n\"d\"\"\",,\"\"\n";
    let relaxed = ConfigBuilder::new()
        .ignore_blanks_before_field(false)
        .ignore_blanks_after_quoted_field(false)
        .build();
    let (lenient, _) = transcode(Config::lenient(), data);
    let (strict, _) = transcode(relaxed, data);
    assert_eq!(lenient.as_bstr(), strict.as_bstr());
}

#[test]
fn empty_input() {
    let (out, res) = transcode(Config::lenient(), b"");
    assert_eq!(res.unwrap().records(), 1);
    assert_eq!(out, b"null\n");

    let array = ConfigBuilder::new().empty_line(EmptyLine::Array).build();
    let (out, _) = transcode(array, b"");
    assert_eq!(out, b"[]\n");

    let (out, res) = transcode(Config::rfc4180(), b"");
    let err = res.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::UnexpectedEmptyInput));
    let pos = err.position().unwrap();
    assert_eq!(
        (pos.record(), pos.field(), pos.line(), pos.character()),
        (1, 1, 1, 0)
    );
    assert!(out.is_empty());
}

#[test]
fn unterminated_quote_is_closed() {
    let (out, res) = transcode(Config::lenient(), b"\"unterminated");
    let err = match res.unwrap_err() {
        csv2json::Error::Parse(err) => err,
        err => panic!("unexpected {:?}", err),
    };
    assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfField);
    assert_eq!(err.state(), State::Quoted);
    assert_eq!(
        decode(&out),
        vec![Some(vec![Some("unterminated".to_string())])]
    );
}

#[test]
fn raw_bytes_pass_through() {
    let (out, res) = transcode(Config::lenient(), b"\xff\xfe,caf\xc3\xa9\n");
    res.unwrap();
    assert_eq!(out.as_bstr(), b"[\"\xff\xfe\",\"caf\xc3\xa9\"]\n".as_bstr());
}

#[test]
fn independent_runs_on_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let data = if i % 2 == 0 {
                    format!("{},x\n", i)
                } else {
                    format!("{},\"x\"y\n", i)
                };
                transcode(Config::lenient(), data.as_bytes())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let (out, res) = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(res.unwrap().records(), 1);
            assert_eq!(out, format!("[\"{}\",\"x\"]\n", i).into_bytes());
        } else {
            let err = res.unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::UnexpectedDoubleQuote));
            assert_eq!(err.position().unwrap().field(), 2);
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn config_from_json() {
    let config: Config =
        serde_json::from_str(r#"{"compliant": true}"#).unwrap();
    assert_eq!(config, Config::rfc4180());

    let config: Config = serde_json::from_str(
        r#"{"allow_empty_lines": false, "empty_line": "array"}"#,
    )
    .unwrap();
    assert!(!config.allow_empty_lines());
    assert!(config.ignore_blanks_before_field());
    assert_eq!(config.empty_line(), EmptyLine::Array);
}

#[cfg(feature = "serde")]
#[test]
fn error_serializes() {
    let (_, res) = transcode(Config::lenient(), b"a,\"b\"x");
    let err = match res.unwrap_err() {
        csv2json::Error::Parse(err) => err,
        err => panic!("unexpected {:?}", err),
    };
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["kind"], "UnexpectedDoubleQuote");
    assert_eq!(value["state"], "Closing");
    assert_eq!(value["pos"]["field"], 2);
    assert_eq!(value["pos"]["character"], 6);
}
