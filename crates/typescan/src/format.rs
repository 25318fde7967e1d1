//! The format-string parser.
//!
//! Single pass, no backtracking. The parser splits the format into literal
//! runs, `{{`/`}}` escapes, and replacement fields, resolves argument ids
//! (automatic or manual, never mixed), and hands each field's spec body to a
//! [`FormatHandler`]. The handler reports how far specifier parsing got;
//! the parser then insists on the closing `}`.
//!
//! Two handlers drive this grammar: the scan driver (which consumes source
//! text as fields are visited) and the definition-time checker (which only
//! sees kind tags). Running both through one parser is what keeps their
//! notion of validity identical.

use crate::error::ErrorKind;

pub(crate) trait FormatHandler {
    /// A literal run (escapes arrive as one-character runs of `{` or `}`).
    fn on_literal(&mut self, literal: &str) -> Result<(), ErrorKind>;

    /// A replacement field. `spec_body` is the remainder of the format
    /// string after the `:` (empty when no `:` was given); returns how many
    /// bytes of it the specifier occupied.
    fn on_field(&mut self, id: usize, spec_body: &str) -> Result<usize, ErrorKind>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdMode {
    Unknown,
    Automatic,
    Manual,
}

pub(crate) fn parse_format_string<H: FormatHandler>(
    format: &str,
    handler: &mut H,
) -> Result<(), ErrorKind> {
    let mut rest = format;
    let mut mode = IdMode::Unknown;
    let mut next_auto = 0usize;

    while !rest.is_empty() {
        let Some(brace) = rest.find(['{', '}']) else {
            handler.on_literal(rest)?;
            break;
        };
        if brace > 0 {
            handler.on_literal(&rest[..brace])?;
        }
        rest = &rest[brace..];

        if let Some(tail) = rest.strip_prefix("{{") {
            handler.on_literal("{")?;
            rest = tail;
            continue;
        }
        if let Some(tail) = rest.strip_prefix("}}") {
            handler.on_literal("}")?;
            rest = tail;
            continue;
        }
        if rest.starts_with('}') {
            return Err(ErrorKind::InvalidFormatString(
                "unmatched '}' in format string",
            ));
        }

        // A replacement field.
        rest = &rest[1..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let id = if digits > 0 {
            let id: usize = rest[..digits]
                .parse()
                .map_err(|_| ErrorKind::InvalidFormatString("argument id out of range"))?;
            rest = &rest[digits..];
            match mode {
                IdMode::Automatic => {
                    return Err(ErrorKind::InvalidFormatString(
                        "cannot mix automatic and manual argument indexing",
                    ))
                }
                _ => mode = IdMode::Manual,
            }
            id
        } else {
            match mode {
                IdMode::Manual => {
                    return Err(ErrorKind::InvalidFormatString(
                        "cannot mix automatic and manual argument indexing",
                    ))
                }
                _ => mode = IdMode::Automatic,
            }
            let id = next_auto;
            next_auto += 1;
            id
        };

        let spec_body = match rest.strip_prefix(':') {
            Some(tail) => {
                rest = tail;
                rest
            }
            None => "",
        };
        let used = handler.on_field(id, spec_body)?;
        rest = &rest[used..];

        match rest.strip_prefix('}') {
            Some(tail) => rest = tail,
            None if rest.is_empty() => {
                return Err(ErrorKind::InvalidFormatString(
                    "unterminated replacement field",
                ))
            }
            None => {
                return Err(ErrorKind::InvalidFormatString(
                    "unexpected character in format specifier",
                ))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;
    use crate::args::ArgKind;
    use crate::specifier::parse_spec_body;

    #[derive(Default, Debug)]
    struct Recorder {
        literals: String,
        fields: Vec<usize>,
    }

    impl FormatHandler for Recorder {
        fn on_literal(&mut self, literal: &str) -> Result<(), ErrorKind> {
            self.literals.push_str(literal);
            Ok(())
        }

        fn on_field(&mut self, id: usize, spec_body: &str) -> Result<usize, ErrorKind> {
            self.fields.push(id);
            let (_, used) = parse_spec_body(ArgKind::Str, spec_body)?;
            Ok(used)
        }
    }

    fn parse(format: &str) -> Result<Recorder, ErrorKind> {
        let mut rec = Recorder::default();
        parse_format_string(format, &mut rec)?;
        Ok(rec)
    }

    #[test]
    fn literals_and_escapes() {
        let rec = parse("a {{b}} c").unwrap();
        assert_eq!(rec.literals, "a {b} c");
        assert!(rec.fields.is_empty());
    }

    #[test]
    fn automatic_ids() {
        let rec = parse("{} {} {}").unwrap();
        assert_eq!(rec.fields, [0, 1, 2]);
    }

    #[test]
    fn manual_ids() {
        let rec = parse("{2} {0} {1}").unwrap();
        assert_eq!(rec.fields, [2, 0, 1]);
    }

    #[test]
    fn mixing_id_styles_fails() {
        assert_eq!(
            parse("{} {0}").unwrap_err(),
            ErrorKind::InvalidFormatString("cannot mix automatic and manual argument indexing")
        );
        assert_eq!(
            parse("{0} {}").unwrap_err(),
            ErrorKind::InvalidFormatString("cannot mix automatic and manual argument indexing")
        );
    }

    #[test]
    fn field_with_spec_body() {
        let rec = parse("x{0:>4s}y").unwrap();
        assert_eq!(rec.fields, [0]);
        assert_eq!(rec.literals, "xy");
    }

    #[test]
    fn class_may_contain_closing_brace() {
        let rec = parse("{:[}]}").unwrap();
        assert_eq!(rec.fields, [0]);
    }

    #[test]
    fn unterminated_field() {
        assert_eq!(
            parse("{").unwrap_err(),
            ErrorKind::InvalidFormatString("unterminated replacement field")
        );
        assert_eq!(
            parse("{0:s").unwrap_err(),
            ErrorKind::InvalidFormatString("unterminated replacement field")
        );
    }

    #[test]
    fn stray_closing_brace() {
        assert_eq!(
            parse("a } b").unwrap_err(),
            ErrorKind::InvalidFormatString("unmatched '}' in format string")
        );
    }

    #[test]
    fn junk_after_specifier() {
        assert_eq!(
            parse("{0:s?}").unwrap_err(),
            ErrorKind::InvalidFormatString("unexpected character in format specifier")
        );
    }
}
