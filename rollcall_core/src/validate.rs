//! Validation and coercion of submitted and extracted student fields.
//!
//! Inputs arrive as untyped `serde_json::Value`s: request bodies from the
//! capture surface and parsed model output alike. Nothing here deserializes
//! straight into [`NewStudent`]; each field is checked on its own.

use serde_json::Value;

use crate::error::{IntakeError, Result};
use crate::student::NewStudent;

/// Coerce a roll number to `i32` the way a lenient form would.
///
/// Floats are truncated toward zero. Strings yield their leading signed
/// integer after leading whitespace, so `"45th"` and `"12 A"` read as 45 and
/// 12. Values with no leading digits, or outside the `i32` range, yield
/// `None`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "value is truncated and range checked before the cast"
)]
pub fn coerce_rollno(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok();
            }
            let t = n.as_f64()?.trunc();
            let in_range = t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX);
            (t.is_finite() && in_range).then_some(t as i32)
        }
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

/// The signed integer prefix of `s`, ignoring leading whitespace.
fn leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// A field counts as present when it is a non-empty string.
fn present_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn rollno_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validate a manual form submission.
///
/// Strings are kept exactly as submitted.
pub fn validate_submission(body: &Value) -> Result<NewStudent> {
    let name = present_str(body, "name");
    let address = present_str(body, "address");
    let rollno = body.get("rollno");

    let (Some(name), Some(address)) = (name, address) else {
        return Err(IntakeError::MissingFields);
    };
    if rollno_missing(rollno) {
        return Err(IntakeError::MissingFields);
    }
    let rollno = rollno
        .and_then(coerce_rollno)
        .ok_or(IntakeError::InvalidRollNumber)?;

    Ok(NewStudent {
        name: name.to_string(),
        rollno,
        address: address.to_string(),
    })
}

/// Pull the transcript out of an `/ai` request body.
pub fn require_text(body: &Value) -> Result<&str> {
    present_str(body, "text").ok_or(IntakeError::MissingText)
}

/// Parse raw model output as JSON, keeping the raw text on failure.
pub fn parse_model_output(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|_| IntakeError::AiResponseInvalid {
        raw: raw.to_string(),
    })
}

/// Validate parsed model output and trim its string fields.
pub fn validate_extraction(parsed: Value) -> Result<NewStudent> {
    let trimmed = |key: &str| {
        parsed
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let name = trimmed("name");
    let address = trimmed("address");
    let rollno = parsed.get("rollno").and_then(coerce_rollno);

    match (name, rollno, address) {
        (Some(name), Some(rollno), Some(address)) => Ok(NewStudent {
            name,
            rollno,
            address,
        }),
        _ => Err(IntakeError::IncompleteAiData { data: parsed }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_accepts_integers_and_numeric_strings() {
        assert_eq!(coerce_rollno(&json!(45)), Some(45));
        assert_eq!(coerce_rollno(&json!(-3)), Some(-3));
        assert_eq!(coerce_rollno(&json!(12.0)), Some(12));
        assert_eq!(coerce_rollno(&json!("45")), Some(45));
        assert_eq!(coerce_rollno(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_rollno(&json!("+8")), Some(8));
        assert_eq!(coerce_rollno(&json!("-8")), Some(-8));
    }

    #[test]
    fn coerce_takes_leading_integer_prefix() {
        assert_eq!(coerce_rollno(&json!("45th")), Some(45));
        assert_eq!(coerce_rollno(&json!("12 A")), Some(12));
        assert_eq!(coerce_rollno(&json!("  45abc")), Some(45));
        assert_eq!(coerce_rollno(&json!("3.9")), Some(3));
    }

    #[test]
    fn coerce_truncates_floats() {
        assert_eq!(coerce_rollno(&json!(12.5)), Some(12));
        assert_eq!(coerce_rollno(&json!(-7.9)), Some(-7));
    }

    #[test]
    fn coerce_rejects_non_integers() {
        assert_eq!(coerce_rollno(&json!("forty five")), None);
        assert_eq!(coerce_rollno(&json!("roll 45")), None);
        assert_eq!(coerce_rollno(&json!("-")), None);
        assert_eq!(coerce_rollno(&json!("")), None);
        assert_eq!(coerce_rollno(&json!(true)), None);
        assert_eq!(coerce_rollno(&json!(null)), None);
        assert_eq!(coerce_rollno(&json!([1])), None);
        assert_eq!(coerce_rollno(&json!(i64::from(i32::MAX) + 1)), None);
        assert_eq!(coerce_rollno(&json!("99999999999")), None);
        assert_eq!(coerce_rollno(&json!(1e12)), None);
    }

    #[test]
    fn extraction_accepts_loose_rollno_replies() {
        for rollno in [json!("45th"), json!(45.5), json!("12 A"), json!("  45abc")] {
            let parsed = json!({"name": "Ravi", "rollno": rollno, "address": "MG Road"});
            assert!(
                validate_extraction(parsed).is_ok(),
                "expected {rollno} to be accepted"
            );
        }
    }

    #[test]
    fn submission_accepts_zero_rollno() {
        let body = json!({"name": "Asha", "rollno": 0, "address": "12 Lake Rd"});
        assert_eq!(validate_submission(&body).unwrap().rollno, 0);

        let body = json!({"name": "Asha", "rollno": "0", "address": "12 Lake Rd"});
        assert_eq!(validate_submission(&body).unwrap().rollno, 0);
    }

    #[test]
    fn submission_with_all_fields_passes_untrimmed() {
        let body = json!({"name": " Asha", "rollno": 12, "address": "12 Lake Rd"});
        let student = validate_submission(&body).unwrap();
        assert_eq!(student.name, " Asha");
        assert_eq!(student.rollno, 12);
        assert_eq!(student.address, "12 Lake Rd");
    }

    #[test]
    fn submission_coerces_string_rollno() {
        let body = json!({"name": "Asha", "rollno": "12", "address": "12 Lake Rd"});
        assert_eq!(validate_submission(&body).unwrap().rollno, 12);
    }

    #[test]
    fn submission_missing_any_field_is_rejected() {
        let cases = [
            json!({"rollno": 12, "address": "x"}),
            json!({"name": "Asha", "address": "x"}),
            json!({"name": "Asha", "rollno": 12}),
            json!({"name": "", "rollno": 12, "address": "x"}),
            json!({"name": "Asha", "rollno": "", "address": "x"}),
            json!({"name": "Asha", "rollno": null, "address": "x"}),
            json!({}),
            Value::Null,
        ];
        for body in cases {
            assert!(
                matches!(validate_submission(&body), Err(IntakeError::MissingFields)),
                "expected MissingFields for {body}"
            );
        }
    }

    #[test]
    fn submission_with_bad_rollno_is_rejected() {
        let body = json!({"name": "Asha", "rollno": "twelve", "address": "x"});
        assert!(matches!(
            validate_submission(&body),
            Err(IntakeError::InvalidRollNumber)
        ));
    }

    #[test]
    fn text_must_be_non_empty_string() {
        assert_eq!(require_text(&json!({"text": "hi"})).unwrap(), "hi");
        assert!(matches!(
            require_text(&json!({"text": ""})),
            Err(IntakeError::MissingText)
        ));
        assert!(matches!(
            require_text(&json!({"text": 5})),
            Err(IntakeError::MissingText)
        ));
        assert!(matches!(require_text(&json!({})), Err(IntakeError::MissingText)));
    }

    #[test]
    fn unparseable_output_keeps_raw_text() {
        let raw = "```json\n{\"name\": \"Ravi\"}\n```";
        match parse_model_output(raw) {
            Err(IntakeError::AiResponseInvalid { raw: kept }) => assert_eq!(kept, raw),
            other => panic!("expected AiResponseInvalid, got {other:?}"),
        }
    }

    #[test]
    fn extraction_trims_strings() {
        let parsed = json!({"name": "  Ravi ", "rollno": 45, "address": " MG Road\n"});
        let student = validate_extraction(parsed).unwrap();
        assert_eq!(student.name, "Ravi");
        assert_eq!(student.rollno, 45);
        assert_eq!(student.address, "MG Road");
    }

    #[test]
    fn extraction_accepts_numeric_string_rollno() {
        let parsed = json!({"name": "Ravi", "rollno": "45", "address": "MG Road"});
        assert_eq!(validate_extraction(parsed).unwrap().rollno, 45);
    }

    #[test]
    fn incomplete_extraction_echoes_parsed_value() {
        let parsed = json!({"name": "Ravi", "rollno": "unknown", "address": "MG Road"});
        match validate_extraction(parsed.clone()) {
            Err(IntakeError::IncompleteAiData { data }) => assert_eq!(data, parsed),
            other => panic!("expected IncompleteAiData, got {other:?}"),
        }
    }

    #[test]
    fn extraction_rejects_blank_or_missing_strings() {
        let cases = [
            json!({"rollno": 45, "address": "MG Road"}),
            json!({"name": "Ravi", "rollno": 45}),
            json!({"name": "   ", "rollno": 45, "address": "MG Road"}),
            json!({"name": 9, "rollno": 45, "address": "MG Road"}),
            json!([{"name": "Ravi", "rollno": 45, "address": "MG Road"}]),
        ];
        for parsed in cases {
            assert!(matches!(
                validate_extraction(parsed),
                Err(IntakeError::IncompleteAiData { .. })
            ));
        }
    }
}
