//! Conversion of raw SQL default-value text into literal expressions of the
//! generated entity layer.
//!
//! Every path either yields a syntactically valid literal or `None`; malformed
//! defaults never raise an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::types::CodeType;

const DATE_TIME_NOW: &str = "System.DateTime.Now";
const DATE_TIME_UTC_NOW: &str = "System.DateTime.UtcNow";
const DATE_TIME_OFFSET_NOW: &str = "System.DateTimeOffset.Now";
const NEW_GUID: &str = "System.Guid.NewGuid()";

/// Translate a raw default expression for a column of `code_type`.
pub fn to_literal(raw: &str, code_type: CodeType) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unwrapped = strip_enclosing_parens(trimmed);
    let value = unquote(unwrapped);
    let value = value.as_str();

    match code_type {
        CodeType::Bytes | CodeType::Geography | CodeType::Geometry => None,
        CodeType::Bool => Some(bool_literal(value).to_string()),
        CodeType::String => Some(string_literal(value)),
        CodeType::DateTime => date_time_literal(value),
        CodeType::DateTimeOffset => date_time_offset_literal(value),
        CodeType::TimeSpan => time_span_literal(value),
        CodeType::Guid => guid_literal(value),
        CodeType::Long => integer_literal::<i64>(value),
        CodeType::Int => integer_literal::<i32>(value),
        CodeType::Short => integer_literal::<i16>(value),
        CodeType::Byte => integer_literal::<u8>(value),
        CodeType::Double => float_literal::<f64>(value, ""),
        CodeType::Float => float_literal::<f32>(value, "f"),
        CodeType::Decimal => decimal_literal(value),
    }
}

/// Remove any number of parenthesis pairs that enclose the whole expression.
fn strip_enclosing_parens(text: &str) -> &str {
    let mut current = text.trim();
    while current.len() > 2
        && current.starts_with('(')
        && current.ends_with(')')
        && closes_at_end(current)
    {
        current = current[1..current.len() - 1].trim();
    }
    current
}

/// Returns true when the opening parenthesis at index 0 is matched by the
/// final character.
fn closes_at_end(text: &str) -> bool {
    let mut depth = 0usize;
    let last = text.len() - 1;
    for (idx, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return idx == last;
                }
            }
            _ => {}
        }
    }
    false
}

/// Drop enclosing single quotes, collapsing doubled quotes inside.
fn unquote(text: &str) -> String {
    let text = text
        .strip_prefix('N')
        .filter(|rest| rest.starts_with('\''))
        .unwrap_or(text);
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        text[1..text.len() - 1].replace("''", "'")
    } else {
        text.to_string()
    }
}

fn bool_literal(text: &str) -> &'static str {
    if text.trim() == "0" {
        "false"
    } else {
        "true"
    }
}

/// Quoted string literal; verbatim syntax when the value holds a backslash
/// or a line break.
fn string_literal(text: &str) -> String {
    if text.contains(['\\', '\n', '\r']) {
        return format!("@\"{}\"", text.replace('"', "\"\""));
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn date_time_literal(text: &str) -> Option<String> {
    if parse_date_time(text).is_some() {
        return Some(format!("System.DateTime.Parse({})", string_literal(text)));
    }
    let lower = text.to_lowercase();
    if lower.contains("getutcdate()") || lower.contains("sysutcdatetime()") {
        Some(DATE_TIME_UTC_NOW.to_string())
    } else if lower.contains("getdate()")
        || lower.contains("sysdatetime()")
        || lower.contains("current_timestamp")
    {
        Some(DATE_TIME_NOW.to_string())
    } else {
        None
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y%m%d %H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn date_time_offset_literal(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .or_else(|| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %:z").ok())
        .map(|_| ())
        .or_else(|| parse_date_time(trimmed).map(|_| ()));
    if parsed.is_some() {
        return Some(format!(
            "System.DateTimeOffset.Parse({})",
            string_literal(trimmed)
        ));
    }
    if trimmed.to_lowercase().contains("sysdatetimeoffset()") {
        Some(DATE_TIME_OFFSET_NOW.to_string())
    } else {
        None
    }
}

fn time_span_literal(text: &str) -> Option<String> {
    let trimmed = text.trim();
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .map(|_| format!("System.TimeSpan.Parse({})", string_literal(trimmed)))
}

fn guid_literal(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();
    if lower == "newid()" || lower == "newsequentialid()" {
        return Some(NEW_GUID.to_string());
    }
    Uuid::parse_str(trimmed.trim_start_matches('{').trim_end_matches('}'))
        .ok()
        .map(|uuid| format!("new System.Guid(\"{}\")", uuid.hyphenated()))
}

fn integer_literal<T: std::str::FromStr>(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<T>().ok().map(|_| trimmed.to_string())
}

fn float_literal<T>(text: &str, suffix: &str) -> Option<String>
where
    T: std::str::FromStr + Into<f64>,
{
    let trimmed = text.trim();
    if !is_real_literal(trimmed, true) {
        return None;
    }
    let value: f64 = trimmed.parse::<T>().ok()?.into();
    value.is_finite().then(|| format!("{trimmed}{suffix}"))
}

fn decimal_literal(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !is_real_literal(trimmed, false) {
        return None;
    }
    Some(format!("{trimmed}m"))
}

/// Shape check for `[+-]digits[.digits][e[+-]digits]`.
fn is_real_literal(text: &str, allow_exponent: bool) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) if allow_exponent => (&body[..idx], Some(&body[idx + 1..])),
        Some(_) => return false,
        None => (body, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let mantissa_ok = match fraction {
        Some(fraction) => {
            !fraction.is_empty() && all_digits(fraction) && all_digits(whole)
        }
        None => !whole.is_empty() && all_digits(whole),
    };
    let exponent_ok = exponent.is_none_or(|exp| {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        !digits.is_empty() && all_digits(digits)
    });
    mantissa_ok && exponent_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_default_has_no_literal() {
        assert_eq!(to_literal("", CodeType::Int), None);
        assert_eq!(to_literal("   ", CodeType::String), None);
    }

    #[test]
    fn strips_balanced_parentheses_only() {
        assert_eq!(to_literal("((42))", CodeType::Int), Some("42".to_string()));
        assert_eq!(to_literal("((1)+(2))", CodeType::Int), None);
        assert_eq!(strip_enclosing_parens("(1)+(2)"), "(1)+(2)");
    }

    #[test]
    fn getdate_resolves_to_current_timestamp() {
        assert_eq!(
            to_literal("(getdate())", CodeType::DateTime),
            Some("System.DateTime.Now".to_string())
        );
        assert_eq!(
            to_literal("(GETUTCDATE())", CodeType::DateTime),
            Some("System.DateTime.UtcNow".to_string())
        );
        assert_eq!(
            to_literal("(sysdatetimeoffset())", CodeType::DateTimeOffset),
            Some("System.DateTimeOffset.Now".to_string())
        );
    }

    #[test]
    fn parses_date_defaults() {
        assert_eq!(
            to_literal("('2020-01-31')", CodeType::DateTime),
            Some("System.DateTime.Parse(\"2020-01-31\")".to_string())
        );
        assert_eq!(to_literal("('not a date')", CodeType::DateTime), None);
        assert_eq!(
            to_literal("('12:30:00')", CodeType::TimeSpan),
            Some("System.TimeSpan.Parse(\"12:30:00\")".to_string())
        );
    }

    #[test]
    fn quotes_and_escapes_strings() {
        assert_eq!(
            to_literal("('O''Brien')", CodeType::String),
            Some("\"O'Brien\"".to_string())
        );
        assert_eq!(
            to_literal("(N'say \"hi\"')", CodeType::String),
            Some("\"say \\\"hi\\\"\"".to_string())
        );
        assert_eq!(
            to_literal("('C:\\temp')", CodeType::String),
            Some("@\"C:\\temp\"".to_string())
        );
        assert_eq!(to_literal("('')", CodeType::String), Some("\"\"".to_string()));
    }

    #[test]
    fn line_breaks_and_control_characters_stay_valid() {
        assert_eq!(
            to_literal("('a\nb')", CodeType::String),
            Some("@\"a\nb\"".to_string())
        );
        assert_eq!(
            to_literal("('say \"hi\"\r\nbye')", CodeType::String),
            Some("@\"say \"\"hi\"\"\r\nbye\"".to_string())
        );
        assert_eq!(
            to_literal("('a\tb\u{7}')", CodeType::String),
            Some("\"a\\tb\\u0007\"".to_string())
        );
    }

    #[test]
    fn floats_get_a_type_suffix() {
        assert_eq!(to_literal("((1.5))", CodeType::Float), Some("1.5f".to_string()));
        assert_eq!(to_literal("(2e3)", CodeType::Float), Some("2e3f".to_string()));
        assert_eq!(to_literal("(1.5)", CodeType::Double), Some("1.5".to_string()));
        assert_eq!(to_literal("(x)", CodeType::Float), None);
    }

    #[test]
    fn invalid_numbers_are_discarded() {
        assert_eq!(to_literal("abc", CodeType::Int), None);
        assert_eq!(to_literal("('12')", CodeType::Int), Some("12".to_string()));
        assert_eq!(to_literal("(300)", CodeType::Byte), None);
        assert_eq!(to_literal("(70000)", CodeType::Short), None);
        assert_eq!(to_literal("(1.5e3)", CodeType::Double), Some("1.5e3".to_string()));
        assert_eq!(to_literal("(1.)", CodeType::Double), None);
    }

    #[test]
    fn decimals_get_a_type_suffix() {
        assert_eq!(to_literal("((0.00))", CodeType::Decimal), Some("0.00m".to_string()));
        assert_eq!(to_literal("(1e5)", CodeType::Decimal), None);
    }

    #[test]
    fn booleans_map_zero_to_false() {
        assert_eq!(to_literal("((0))", CodeType::Bool), Some("false".to_string()));
        assert_eq!(to_literal("((1))", CodeType::Bool), Some("true".to_string()));
        assert_eq!(to_literal("('0')", CodeType::Bool), Some("false".to_string()));
    }

    #[test]
    fn guids_support_new_identifier_functions() {
        assert_eq!(
            to_literal("(newid())", CodeType::Guid),
            Some("System.Guid.NewGuid()".to_string())
        );
        assert_eq!(
            to_literal("(NEWSEQUENTIALID())", CodeType::Guid),
            Some("System.Guid.NewGuid()".to_string())
        );
        assert_eq!(
            to_literal("('6F9619FF-8B86-D011-B42D-00C04FC964FF')", CodeType::Guid),
            Some("new System.Guid(\"6f9619ff-8b86-d011-b42d-00c04fc964ff\")".to_string())
        );
        assert_eq!(to_literal("('nope')", CodeType::Guid), None);
    }

    #[test]
    fn binary_and_spatial_types_have_no_literal() {
        assert_eq!(to_literal("(0x00)", CodeType::Bytes), None);
        assert_eq!(to_literal("('POINT(1 1)')", CodeType::Geography), None);
    }
}
