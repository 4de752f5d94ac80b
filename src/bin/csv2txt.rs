use std::env;
use std::io;
use std::process;

use csv2json::TextTranscoderBuilder;

const USAGE: &str = "\
Transforms CSV read from stdin into lines with fields delimited by a single
separator (TAB by default), written to stdout.

Usage: csv2txt [SEPARATOR] < input.csv > output.txt

Only the first byte of SEPARATOR is used.
";

fn main() {
    env_logger::init();

    let mut builder = TextTranscoderBuilder::new();
    match env::args().nth(1) {
        None => {}
        Some(ref arg) if arg == "-h" || arg == "--help" => {
            print!("{}", USAGE);
            return;
        }
        Some(arg) => match arg.bytes().next() {
            Some(separator) => {
                builder.separator(separator);
            }
            None => {
                eprint!("csv2txt: empty separator\n\n{}", USAGE);
                process::exit(2);
            }
        },
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = builder.build().transcode(stdin.lock(), stdout.lock()) {
        eprintln!("csv2txt: {}", err);
        process::exit(1);
    }
}
