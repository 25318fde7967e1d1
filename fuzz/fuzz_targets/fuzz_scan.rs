#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use typescan::{check_format, scan, scan_units, ArgKind, ErrorKind};

#[derive(Arbitrary, Debug)]
struct Input {
    format: String,
    source: String,
    raw: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let kinds = [ArgKind::I64, ArgKind::Str];
    let checked = check_format(&input.format, &kinds);

    let mut a = 0i64;
    let mut b = String::new();
    let result = scan(&input.source, &input.format, (&mut a, &mut b));

    // A scan that succeeded went through the full grammar, so the only
    // complaint the definition-time checker may still have is an
    // unreferenced argument.
    if result.is_ok() {
        if let Err(err) = checked {
            assert_eq!(
                err.kind,
                ErrorKind::InvalidFormatString("argument list not exhausted")
            );
        }
    }

    // Arbitrary bytes as a UTF-8 source must never panic either.
    let mut c = 0i64;
    let mut d = String::new();
    let _ = scan_units(&input.raw[..], &input.format, (&mut c, &mut d));
});
