//! Leaf coercion: one string into one typed [`Value`].
//!
//! Integer literals follow the usual base prefix rules: `0x` hex, `0o` or a
//! bare leading `0` octal, `0b` binary, decimal otherwise. Single `_`
//! separators are allowed between digits and after a prefix.

use crate::error::{ArgErrorKind, ParseCause};
use crate::schema::{EnumDescriptor, ScalarKind};
use crate::value::{EnumValue, Value};

fn split_radix(body: &str) -> (u32, &str) {
    match body.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => (16, &body[2..]),
        Some(prefix) if prefix.eq_ignore_ascii_case("0o") => (8, &body[2..]),
        Some(prefix) if prefix.eq_ignore_ascii_case("0b") => (2, &body[2..]),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..]),
        _ => (10, body),
    }
}

fn parse_magnitude(body: &str) -> Result<u64, ParseCause> {
    let (radix, digits) = split_radix(body);
    // from_str_radix tolerates a leading '+', which is never valid after a prefix
    if digits.starts_with(['+', '-']) {
        return Err(ParseCause::InvalidSign);
    }
    let prefixed = digits.len() < body.len();
    if digits.contains('_') && separators_ok(digits, prefixed) {
        return Ok(u64::from_str_radix(&digits.replace('_', ""), radix)?);
    }
    Ok(u64::from_str_radix(digits, radix)?)
}

/// `_` may only sit between digits or right after a base prefix.
fn separators_ok(digits: &str, prefixed: bool) -> bool {
    let digits = if prefixed {
        digits.strip_prefix('_').unwrap_or(digits)
    } else {
        digits
    };
    !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__")
}

/// Parse a signed integer literal into the full 64-bit range.
pub fn parse_signed(raw: &str) -> Result<i64, ParseCause> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let magnitude = i128::from(parse_magnitude(body)?);
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| ParseCause::OutOfRange("int64"))
}

/// Parse an unsigned integer literal. Any sign is rejected.
pub fn parse_unsigned(raw: &str) -> Result<u64, ParseCause> {
    if raw.starts_with(['+', '-']) {
        return Err(ParseCause::InvalidSign);
    }
    parse_magnitude(raw)
}

/// Parse a repeated-field index segment.
pub fn parse_index(token: &str) -> Result<usize, ParseCause> {
    let index = parse_unsigned(token)?;
    usize::try_from(index).map_err(|_| ParseCause::OutOfRange("index"))
}

/// Convert `raw` into a value of the given scalar kind.
pub fn coerce_scalar(kind: ScalarKind, raw: &str) -> Result<Value, ArgErrorKind> {
    let expected = kind.name();
    let fail = |cause: ParseCause| ArgErrorKind::parse(expected, raw, cause);

    match kind {
        ScalarKind::Int32 => parse_signed(raw)
            .and_then(|v| i32::try_from(v).map_err(|_| ParseCause::OutOfRange(expected)))
            .map(Value::Int32)
            .map_err(fail),
        ScalarKind::Int64 => parse_signed(raw).map(Value::Int64).map_err(fail),
        ScalarKind::Uint32 => parse_unsigned(raw)
            .and_then(|v| u32::try_from(v).map_err(|_| ParseCause::OutOfRange(expected)))
            .map(Value::Uint32)
            .map_err(fail),
        ScalarKind::Uint64 => parse_unsigned(raw).map(Value::Uint64).map_err(fail),
        ScalarKind::Double => raw
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|e| fail(e.into())),
        ScalarKind::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ArgErrorKind::InvalidBoolean {
                value: raw.to_string(),
            }),
        },
        ScalarKind::String => Ok(Value::String(raw.to_string())),
    }
}

/// Match `raw` against the declared value names of an enum.
pub fn coerce_enum(descriptor: &EnumDescriptor, raw: &str) -> Result<Value, ArgErrorKind> {
    descriptor
        .value_by_name(raw)
        .map(|value| {
            Value::Enum(EnumValue {
                name: value.name.clone(),
                number: value.number,
            })
        })
        .ok_or_else(|| ArgErrorKind::UnknownEnumValue {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(result: Result<Value, ArgErrorKind>) -> ParseCause {
        match result {
            Err(ArgErrorKind::Parse { source, .. }) => source,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn signed_literals_honor_prefixes() {
        assert_eq!(parse_signed("42").unwrap(), 42);
        assert_eq!(parse_signed("-42").unwrap(), -42);
        assert_eq!(parse_signed("+7").unwrap(), 7);
        assert_eq!(parse_signed("0x1F").unwrap(), 31);
        assert_eq!(parse_signed("-0X10").unwrap(), -16);
        assert_eq!(parse_signed("017").unwrap(), 15);
        assert_eq!(parse_signed("0o17").unwrap(), 15);
        assert_eq!(parse_signed("0b101").unwrap(), 5);
        assert_eq!(parse_signed("0").unwrap(), 0);
        assert_eq!(parse_signed("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn signed_literals_reject_garbage() {
        assert!(parse_signed("").is_err());
        assert!(parse_signed("0x").is_err());
        assert!(parse_signed("08").is_err());
        assert!(parse_signed("12abc").is_err());
        assert!(matches!(parse_signed("0x+5"), Err(ParseCause::InvalidSign)));
        assert!(matches!(parse_signed("--5"), Err(ParseCause::InvalidSign)));
        assert!(matches!(
            parse_signed("9223372036854775808"),
            Err(ParseCause::OutOfRange("int64"))
        ));
    }

    #[test]
    fn digit_separators() {
        assert_eq!(parse_signed("1_000").unwrap(), 1000);
        assert_eq!(parse_signed("-1_000_000").unwrap(), -1_000_000);
        assert_eq!(parse_unsigned("0x_ff_ff").unwrap(), 0xffff);
        assert_eq!(parse_unsigned("0b1_0").unwrap(), 2);
        assert_eq!(parse_unsigned("0_17").unwrap(), 15);
        for raw in ["_1", "1_", "1__0", "0x__1", "0x_", "_"] {
            assert!(matches!(parse_unsigned(raw), Err(ParseCause::Int(_))), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn unsigned_literals_reject_signs() {
        assert_eq!(parse_unsigned("0xff").unwrap(), 255);
        assert!(matches!(parse_unsigned("-1"), Err(ParseCause::InvalidSign)));
        assert!(matches!(parse_unsigned("+1"), Err(ParseCause::InvalidSign)));
        assert_eq!(parse_unsigned("18446744073709551615").unwrap(), u64::MAX);
        assert!(matches!(parse_unsigned("18446744073709551616"), Err(ParseCause::Int(_))));
    }

    #[test]
    fn index_accepts_decimal_and_hex() {
        assert_eq!(parse_index("0").unwrap(), 0);
        assert_eq!(parse_index("12").unwrap(), 12);
        assert_eq!(parse_index("0x2").unwrap(), 2);
        assert!(parse_index("first").is_err());
        assert!(parse_index("-1").is_err());
    }

    #[test]
    fn coerces_each_scalar_kind() {
        assert_eq!(coerce_scalar(ScalarKind::Int32, "32").unwrap(), Value::Int32(32));
        assert_eq!(coerce_scalar(ScalarKind::Int64, "64").unwrap(), Value::Int64(64));
        assert_eq!(coerce_scalar(ScalarKind::Uint32, "32").unwrap(), Value::Uint32(32));
        assert_eq!(coerce_scalar(ScalarKind::Uint64, "64").unwrap(), Value::Uint64(64));
        assert_eq!(coerce_scalar(ScalarKind::Double, "6.4").unwrap(), Value::Double(6.4));
        assert_eq!(coerce_scalar(ScalarKind::Double, "1e3").unwrap(), Value::Double(1000.0));
        assert_eq!(coerce_scalar(ScalarKind::Bool, "true").unwrap(), Value::Bool(true));
        assert_eq!(coerce_scalar(ScalarKind::Bool, "false").unwrap(), Value::Bool(false));
        assert_eq!(
            coerce_scalar(ScalarKind::String, " a=b ").unwrap(),
            Value::String(" a=b ".to_string())
        );
    }

    #[test]
    fn narrow_kinds_check_their_width() {
        assert!(matches!(
            parse_err(coerce_scalar(ScalarKind::Int32, "2147483648")),
            ParseCause::OutOfRange("int32")
        ));
        assert_eq!(
            coerce_scalar(ScalarKind::Int32, "-2147483648").unwrap(),
            Value::Int32(i32::MIN)
        );
        assert!(matches!(
            parse_err(coerce_scalar(ScalarKind::Uint32, "4294967296")),
            ParseCause::OutOfRange("uint32")
        ));
        assert!(matches!(
            parse_err(coerce_scalar(ScalarKind::Uint64, "-1")),
            ParseCause::InvalidSign
        ));
    }

    #[test]
    fn bool_is_strict() {
        for raw in ["True", "TRUE", "1", "0", "yes", "no", ""] {
            match coerce_scalar(ScalarKind::Bool, raw) {
                Err(ArgErrorKind::InvalidBoolean { value }) => assert_eq!(value, raw),
                other => panic!("{raw:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn double_failure_wraps_float_error() {
        assert!(matches!(
            parse_err(coerce_scalar(ScalarKind::Double, "six")),
            ParseCause::Float(_)
        ));
    }
}
