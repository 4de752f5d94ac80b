#![no_main]

use csv2json_core::{
    Config, TextTransducer, TransduceResult, Transducer,
};
use libfuzzer_sys::fuzz_target;

/// Feed `data` through `transduce` with a small output buffer and check
/// that the machine always makes progress and ends exactly once.
fn drive<F>(data: &[u8], mut transduce: F)
where
    F: FnMut(&[u8], &mut [u8]) -> (TransduceResult, usize, usize),
{
    let mut out = [0u8; 3];
    let mut input = data;
    loop {
        let (res, nin, nout) = transduce(input, &mut out);
        assert!(nin <= input.len());
        assert!(nout <= out.len());
        input = &input[nin..];
        match res {
            TransduceResult::InputEmpty => assert!(input.is_empty()),
            TransduceResult::OutputFull => assert_eq!(nout, out.len()),
            TransduceResult::End(_) | TransduceResult::Error(_) => {
                // Finished machines stay finished.
                let (again, nin, nout) = transduce(&[], &mut out);
                assert_eq!(again, res);
                assert_eq!((nin, nout), (0, 0));
                return;
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    for config in &[Config::lenient(), Config::rfc4180()] {
        let mut t = Transducer::new(*config);
        drive(data, |input, out| t.transduce(input, out));
    }
    let mut t = TextTransducer::default();
    drive(data, |input, out| t.transduce(input, out));
});
