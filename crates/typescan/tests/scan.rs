//! End-to-end scanning scenarios.

use typescan::{
    check_format, scan, scan_and_sync, scan_localized, scan_units, scan_value, ArgKind, ArgSlot,
    ByteStream, CustomScannable, ErrorKind, FormatSpec, Locale, ScanCursor, Scannable,
};

#[test]
fn two_integers_and_suffix() {
    let mut a = 0i32;
    let mut b = 0i32;
    let result = scan("42 -7 rest", "{} {}", (&mut a, &mut b));
    assert!(result.is_ok());
    assert_eq!((a, b), (42, -7));
    assert_eq!(*result.range(), " rest");
}

#[test]
fn bracket_class_reads_word() {
    let mut word = String::new();
    let result = scan("hello world", "{:[A-Za-z]}", (&mut word,));
    assert!(result.is_ok());
    assert_eq!(word, "hello");
    assert_eq!(*result.range(), " world");
}

#[test]
fn exact_width_read_runs_out() {
    let mut s = String::new();
    let result = scan("abc", "{:5c}", (&mut s,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::LengthTooShort);
    // Pre-advance position restored: nothing was consumed.
    assert_eq!(*result.range(), "abc");
    assert_eq!(s, "");
}

#[test]
fn exact_width_read_succeeds() {
    let mut s = String::new();
    let result = scan("abcde", "{:3c}", (&mut s,));
    assert!(result.is_ok());
    assert_eq!(s, "abc");
    assert_eq!(*result.range(), "de");
}

#[test]
fn manual_indexing_reorders_arguments() {
    let mut a = 0i32;
    let mut b = 0i32;
    let result = scan("1 2", "{1} {0}", (&mut a, &mut b));
    assert!(result.is_ok());
    assert_eq!((a, b), (2, 1));
    assert_eq!(*result.range(), "");
}

#[test]
fn mixed_indexing_is_rejected_and_preserves_earlier_writes() {
    let mut a = 0i32;
    let mut b = 0i32;
    let result = scan("1 2", "{} {0}", (&mut a, &mut b));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidFormatString("cannot mix automatic and manual argument indexing")
    );
    assert_eq!(a, 1);
    assert_eq!(b, 0);
}

#[test]
fn duplicate_argument_id_is_rejected() {
    let mut a = 0i32;
    let mut b = 0i32;
    let result = scan("1 2", "{0} {0}", (&mut a, &mut b));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::ArgumentAlreadyScanned
    );
    assert_eq!(a, 1);
}

#[test]
fn char_reads_one_code_point() {
    let mut c = '\0';
    let result = scan("日本", "{}", (&mut c,));
    assert!(result.is_ok());
    assert_eq!(c, '日');
    assert_eq!(*result.range(), "本");
}

#[test]
fn hex_presentation_accepts_prefix() {
    let mut v = 0i32;
    let result = scan("0xff", "{:x}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!(v, 255);
    assert_eq!(*result.range(), "");
}

#[test]
fn base_detection_with_i() {
    let mut v = 0i64;
    assert!(scan("0x20", "{:i}", (&mut v,)).is_ok());
    assert_eq!(v, 32);
    assert!(scan("0b101", "{:i}", (&mut v,)).is_ok());
    assert_eq!(v, 5);
    assert!(scan("017", "{:i}", (&mut v,)).is_ok());
    assert_eq!(v, 15);
    assert!(scan("17", "{:i}", (&mut v,)).is_ok());
    assert_eq!(v, 17);
}

#[test]
fn binary_and_octal_presentations() {
    let mut v = 0u32;
    assert!(scan("1010", "{:b}", (&mut v,)).is_ok());
    assert_eq!(v, 10);
    assert!(scan("0o755", "{:o}", (&mut v,)).is_ok());
    assert_eq!(v, 0o755);
    assert!(scan("755", "{:o}", (&mut v,)).is_ok());
    assert_eq!(v, 0o755);
}

#[test]
fn unsigned_presentation_rejects_sign() {
    let mut v = 0i32;
    let result = scan("-3", "{:u}", (&mut v,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("sign not allowed with 'u'")
    );
    assert_eq!(*result.range(), "-3");
}

#[test]
fn negative_into_unsigned_is_out_of_range() {
    let mut v = 0u16;
    let result = scan("-3", "{}", (&mut v,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::ValueOutOfRange);
    assert_eq!(*result.range(), "-3");
}

#[test]
fn integer_overflow_is_out_of_range() {
    let mut v = 0u8;
    let result = scan("300", "{}", (&mut v,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::ValueOutOfRange);
    assert_eq!(*result.range(), "300");

    let mut v = 0i64;
    let result = scan("99999999999999999999999999999999999999999", "{}", (&mut v,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::ValueOutOfRange);
}

#[test]
fn float_stops_at_locale_independent_separator() {
    let mut v = 0.0f64;
    let result = scan("1,5", "{}", (&mut v,));
    assert!(result.is_ok());
    assert!((v - 1.0).abs() < f64::EPSILON);
    assert_eq!(*result.range(), ",5");
}

struct CommaLocale;

impl Locale for CommaLocale {
    fn is_space(&self, cp: char) -> bool {
        cp.is_whitespace()
    }
    fn is_digit(&self, cp: char) -> bool {
        cp.is_ascii_digit()
    }
    fn decimal_point(&self) -> char {
        ','
    }
    fn thousands_sep(&self) -> Option<char> {
        Some('.')
    }
}

#[test]
fn locale_decimal_separator_under_l_flag() {
    let mut v = 0.0f64;
    let result = scan_localized(&CommaLocale, "1,5", "{:L}", (&mut v,));
    assert!(result.is_ok());
    assert!((v - 1.5).abs() < f64::EPSILON);
    assert_eq!(*result.range(), "");
}

#[test]
fn locale_ignored_without_l_flag() {
    let mut v = 0.0f64;
    let result = scan_localized(&CommaLocale, "1,5", "{}", (&mut v,));
    assert!(result.is_ok());
    assert!((v - 1.0).abs() < f64::EPSILON);
    assert_eq!(*result.range(), ",5");
}

#[test]
fn locale_grouping_separator_in_integers() {
    let mut v = 0i64;
    let result = scan_localized(&CommaLocale, "1.234.567", "{:Ld}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!(v, 1_234_567);
    assert_eq!(*result.range(), "");
}

#[test]
fn invalid_utf8_source_is_reported_at_offset_zero() {
    let mut s = String::new();
    let source: &[u8] = b"\xFFvalid";
    let result = scan_units(source, "{}", (&mut s,));
    let err = result.error().unwrap();
    assert_eq!(err.kind, ErrorKind::InvalidSourceEncoding);
    assert_eq!(err.offset, 0);
    assert_eq!(*result.range(), source);
}

#[test]
fn utf16_source() {
    // "42 日x"
    let source: &[u16] = &[0x0034, 0x0032, 0x0020, 0x65E5, 0x0078];
    let mut n = 0i32;
    let mut c = '\0';
    let result = scan_units(source, "{} {}", (&mut n, &mut c));
    assert!(result.is_ok());
    assert_eq!((n, c), (42, '日'));
    assert_eq!(*result.range(), &[0x0078][..]);
}

#[test]
fn utf32_source_with_astral_plane() {
    let source: &[u32] = &[0x1F600, 0x0021];
    let mut c = '\0';
    let result = scan_units(source, "{}", (&mut c,));
    assert!(result.is_ok());
    assert_eq!(c, '😀');
    assert_eq!(*result.range(), &[0x0021][..]);
}

#[test]
fn string_width_bounds_code_points_not_units() {
    let mut s = String::new();
    let result = scan("日本語のテスト", "{:3}", (&mut s,));
    assert!(result.is_ok());
    assert_eq!(s, "日本語");
    assert_eq!(*result.range(), "のテスト");
}

#[test]
fn utf16_string_destination() {
    let mut wide = Vec::<u16>::new();
    let result = scan("ab😀 x", "{}", (&mut wide,));
    assert!(result.is_ok());
    assert_eq!(wide, [0x0061, 0x0062, 0xD83D, 0xDE00]);
    assert_eq!(*result.range(), " x");
}

#[test]
fn code_point_list_destination() {
    let mut cps = Vec::<char>::new();
    let result = scan("日本 x", "{}", (&mut cps,));
    assert!(result.is_ok());
    assert_eq!(cps, ['日', '本']);
}

#[test]
fn bool_destinations() {
    let mut b = false;
    assert!(scan("true", "{}", (&mut b,)).is_ok());
    assert!(b);
    assert!(scan("0", "{}", (&mut b,)).is_ok());
    assert!(!b);
    assert!(scan("1", "{:d}", (&mut b,)).is_ok());
    assert!(b);
    let result = scan("yes", "{}", (&mut b,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("expected a boolean")
    );
}

#[test]
fn float_special_values_and_exponents() {
    let mut v = 0.0f64;
    assert!(scan("1.25e2", "{}", (&mut v,)).is_ok());
    assert!((v - 125.0).abs() < f64::EPSILON);

    assert!(scan("-inf", "{}", (&mut v,)).is_ok());
    assert!(v.is_infinite() && v.is_sign_negative());

    assert!(scan("NaN", "{}", (&mut v,)).is_ok());
    assert!(v.is_nan());

    // A dangling exponent letter is left unconsumed.
    let result = scan("3e", "{}", (&mut v,));
    assert!(result.is_ok());
    assert!((v - 3.0).abs() < f64::EPSILON);
    assert_eq!(*result.range(), "e");
}

#[test]
fn hex_floats() {
    let mut v = 0.0f64;
    assert!(scan("0x1.8p1", "{:a}", (&mut v,)).is_ok());
    assert!((v - 3.0).abs() < f64::EPSILON);

    assert!(scan("0x10", "{}", (&mut v,)).is_ok());
    assert!((v - 16.0).abs() < f64::EPSILON);
}

#[test]
fn literal_text_must_match() {
    let mut v = 0i32;
    let result = scan("value: 7", "value: {}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!(v, 7);

    let result = scan("count: 7", "value: {}", (&mut v,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("source does not match format literal")
    );

    // Whitespace in the format matches any run, including none.
    let result = scan("a7", "a {}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!(v, 7);
}

#[test]
fn brace_escapes_match_literally() {
    let mut v = 0i32;
    let result = scan("{7}", "{{{}}}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!(v, 7);
    assert_eq!(*result.range(), "");
}

#[test]
fn empty_source_where_value_required() {
    let mut v = 0i32;
    let result = scan("", "{}", (&mut v,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::EndOfInput);

    let result = scan("   ", "{}", (&mut v,));
    assert_eq!(result.error().unwrap().kind, ErrorKind::EndOfInput);
}

#[test]
fn scan_value_matches_default_format() {
    let mut a = 0i32;
    let mut b = 0i32;
    let via_value = scan_value("  19 tail", &mut a);
    let via_format = scan("  19 tail", "{}", (&mut b,));
    assert_eq!(via_value, via_format);
    assert_eq!(a, b);
    assert_eq!(a, 19);
}

#[test]
fn alignment_fill_trims_string_scan() {
    let mut s = String::new();
    let result = scan("***abc***,", "{:*^8}", (&mut s,));
    assert!(result.is_ok());
    assert_eq!(s, "abc");
    assert_eq!(*result.range(), ",");
}

#[test]
fn negated_class_with_posix_names() {
    let mut s = String::new();
    let result = scan("abc123 rest", "{:[^[:space:]]}", (&mut s,));
    assert!(result.is_ok());
    assert_eq!(s, "abc123");
    assert_eq!(*result.range(), " rest");
}

#[test]
fn class_width_bounds_match() {
    let mut s = String::new();
    let result = scan("aaaaab", "{:3[a]}", (&mut s,));
    assert!(result.is_ok());
    assert_eq!(s, "aaa");
    assert_eq!(*result.range(), "ab");
}

#[test]
fn class_that_matches_nothing_fails() {
    let mut s = String::new();
    let result = scan("123", "{:[a-z]}", (&mut s,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("no characters matched the set")
    );
    assert_eq!(*result.range(), "123");
}

#[test]
fn streaming_scan_and_resume() {
    let mut stream = ByteStream::from_slice(b"10 20 tail");
    let mut a = 0u32;
    let first = scan_and_sync(&mut stream, "{}", (&mut a,));
    assert!(first.is_ok());
    assert_eq!(*first.range(), 2);
    assert_eq!(a, 10);

    let mut b = 0u32;
    assert!(scan_and_sync(&mut stream, "{}", (&mut b,)).is_ok());
    assert_eq!(b, 20);

    let rest: Vec<u8> = stream.into_remaining().collect();
    assert_eq!(rest, b" tail");
}

#[test]
fn streaming_error_keeps_suffix_intact() {
    let mut stream = ByteStream::from_slice(b"  abc");
    let mut v = 0i32;
    let result = scan_and_sync(&mut stream, "{}", (&mut v,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("expected digits")
    );
    // The failed value parse was rolled back; only nothing is lost.
    let rest: Vec<u8> = stream.into_remaining().collect();
    assert_eq!(rest, b"  abc");
}

#[test]
fn streaming_over_non_slice_iterator() {
    let data = b"3 1 4 1 5".to_vec();
    let mut stream = ByteStream::new(data.into_iter());
    let mut digits = [0u8; 5];
    for d in &mut digits {
        assert!(scan_and_sync(&mut stream, "{}", (d,)).is_ok());
    }
    assert_eq!(digits, [3, 1, 4, 1, 5]);
}

#[derive(Default)]
struct Version {
    major: u32,
    minor: u32,
}

impl CustomScannable for Version {
    fn scan(&mut self, cursor: &mut dyn ScanCursor, _spec: &FormatSpec) -> Result<(), ErrorKind> {
        let mut read_number = |cursor: &mut dyn ScanCursor| -> Result<u32, ErrorKind> {
            let mut value: u32 = 0;
            let mut any = false;
            while let Some((cp, len)) = cursor.peek()? {
                let Some(d) = cp.to_digit(10) else { break };
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(d))
                    .ok_or(ErrorKind::ValueOutOfRange)?;
                cursor.advance(len);
                any = true;
            }
            if any {
                Ok(value)
            } else {
                Err(ErrorKind::InvalidScannedValue("expected a version number"))
            }
        };
        self.major = read_number(cursor)?;
        match cursor.peek()? {
            Some(('.', len)) => cursor.advance(len),
            _ => return Err(ErrorKind::InvalidScannedValue("expected '.'")),
        }
        self.minor = read_number(cursor)?;
        Ok(())
    }
}

impl Scannable for Version {
    fn kind() -> ArgKind {
        ArgKind::Custom
    }
    fn slot(&mut self) -> ArgSlot<'_> {
        ArgSlot::Custom(self)
    }
}

#[test]
fn custom_scannable_parses_and_surfaces_errors() {
    let mut v = Version::default();
    let result = scan("2.17-beta", "{}", (&mut v,));
    assert!(result.is_ok());
    assert_eq!((v.major, v.minor), (2, 17));
    assert_eq!(*result.range(), "-beta");

    let mut v = Version::default();
    let result = scan("nope", "{}", (&mut v,));
    assert_eq!(
        result.error().unwrap().kind,
        ErrorKind::InvalidScannedValue("expected a version number")
    );
    assert_eq!(*result.range(), "nope");
}

#[test]
fn checker_and_runtime_agree_on_format_validity() {
    let kinds = [ArgKind::I32, ArgKind::I32];

    // (format, source reaching the flaw) pairs that must be rejected by
    // both paths with the same error kind.
    let malformed: &[(&str, &str)] = &[
        ("{", "1 2"),
        ("{0:d", "1 2"),
        ("a } b", "a } b"),
        ("{} {0}", "1 2"),
        ("{0} {}", "1 2"),
        ("{2} {0}", "1 2"),
        ("{0} {0}", "1 2"),
        ("{:q} {}", "1 2"),
        ("{:0d} {}", "1 2"),
        ("{:e} {}", "1 2"),
    ];
    for &(format, source) in malformed {
        let checked = check_format(format, &kinds);
        let mut a = 0i32;
        let mut b = 0i32;
        let scanned = scan(source, format, (&mut a, &mut b));
        let check_err = checked.unwrap_err();
        let scan_err = scanned.error().expect(format);
        assert_eq!(check_err.kind, scan_err.kind, "format: {format:?}");
    }

    let wellformed: &[(&str, &str)] = &[
        ("{} {}", "1 2"),
        ("{1} {0}", "1 2"),
        ("{:d} {:x}", "1 ff"),
        ("a {} b {}", "a 1 b 2"),
        ("{{{}}} {}", "{1} 2"),
    ];
    for &(format, source) in wellformed {
        assert!(check_format(format, &kinds).is_ok(), "format: {format:?}");
        let mut a = 0i32;
        let mut b = 0i32;
        let scanned = scan(source, format, (&mut a, &mut b));
        assert!(scanned.is_ok(), "format: {format:?}");
    }
}

#[test]
fn error_offset_tracks_consumed_units() {
    let mut a = 0i32;
    let mut s = String::new();
    let result = scan("12 !", "{} {:[a-z]}", (&mut a, &mut s));
    let err = result.error().unwrap();
    assert_eq!(err.kind, ErrorKind::InvalidScannedValue("no characters matched the set"));
    assert_eq!(err.offset, 3);
    assert_eq!(*result.range(), "!");
    assert_eq!(a, 12);
}
