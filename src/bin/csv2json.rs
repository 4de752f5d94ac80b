use std::env;
use std::io;
use std::process;

use csv2json::{ConfigBuilder, EmptyLine, TranscoderBuilder};

const USAGE: &str = "\
Transforms CSV read from stdin into line-delimited JSON written to stdout.

Usage: csv2json [options] < input.csv > output.json

Options:
    --rfc4180       Turn off all leniency: keep blanks before fields as
                    data, reject blanks after quoted fields and empty lines.
    --empty-array   Write empty lines as [] instead of null.
    -h, --help      Show this message.
";

fn main() {
    env_logger::init();

    let mut config = ConfigBuilder::new();
    for arg in env::args().skip(1) {
        match &*arg {
            "--rfc4180" => {
                config.compliant(true);
            }
            "--empty-array" => {
                config.empty_line(EmptyLine::Array);
            }
            "-h" | "--help" => {
                print!("{}", USAGE);
                return;
            }
            _ => {
                eprint!(
                    "csv2json: unrecognized argument '{}'\n\n{}",
                    arg, USAGE
                );
                process::exit(2);
            }
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut tc = TranscoderBuilder::new().config(config.build()).build();
    if let Err(err) = tc.transcode(stdin.lock(), stdout.lock()) {
        eprintln!("csv2json: {}", err);
        process::exit(1);
    }
}
