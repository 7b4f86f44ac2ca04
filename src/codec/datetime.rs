use crate::{
    codec,
    error::{Error, Result},
    kind::AttributeKind,
    value::Value,
};

use aws_sdk_dynamodb::types;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%f%z";

pub(super) fn encode_utc(value: &Value) -> Result<types::AttributeValue> {
    let instant = match value {
        Value::DateTime(instant) => *instant,
        Value::NaiveDateTime(naive) => naive.and_utc(),
        other => return Err(Error::type_mismatch("datetime", other.type_name())),
    };
    if !(1..=9999).contains(&instant.year()) {
        return Err(Error::type_mismatch(
            "datetime with a four digit year",
            instant.to_rfc3339(),
        ));
    }
    Ok(types::AttributeValue::S(format_utc(&instant)))
}

pub(super) fn decode_utc(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::S(text) => Ok(Value::DateTime(parse_utc(&text)?)),
        other => Err(codec::unexpected(location, AttributeKind::String, &other)),
    }
}

/// Format as `YYYY-MM-DDTHH:MM:SS.ffffff+0000` with a four digit year.
fn format_utc(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.6f+0000").to_string()
}

/// Parse the fixed-width UTC format; years shorter than four digits are
/// accepted for values written before the year was zero-padded.
fn parse_utc(text: &str) -> Result<DateTime<Utc>> {
    let invalid = || Error::format(text, DATETIME_FORMAT);
    let (date, time) = text.split_once('T').ok_or_else(invalid)?;
    let mut date_parts = date.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) =
        (date_parts.next(), date_parts.next(), date_parts.next())
    else {
        return Err(invalid());
    };
    if year.is_empty() || year.len() > 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid());
    }
    // HH:MM:SS.ffffff+0000
    if !time.is_ascii() {
        return Err(invalid());
    }
    let bytes = time.as_bytes();
    if bytes.len() != 20
        || bytes[2] != b':'
        || bytes[5] != b':'
        || bytes[8] != b'.'
        || &bytes[15..] != b"+0000"
    {
        return Err(invalid());
    }
    let field = |digits: &str| -> Result<u32> {
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse().map_err(|_| invalid())
    };
    let year = field(year)?;
    let date = NaiveDate::from_ymd_opt(year as i32, field(month)?, field(day)?)
        .ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_micro_opt(
        field(&time[0..2])?,
        field(&time[3..5])?,
        field(&time[6..8])?,
        field(&time[9..15])?,
    )
    .ok_or_else(invalid)?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

pub(super) fn encode_ttl(value: &Value) -> Result<types::AttributeValue> {
    let seconds = match value {
        Value::Duration(duration) => Utc::now().timestamp() + duration.num_seconds(),
        Value::DateTime(instant) => instant.timestamp(),
        Value::NaiveDateTime(_) => {
            return Err(Error::Configuration(
                "TTL datetime must be timezone-aware".to_string(),
            ));
        }
        other => return Err(Error::type_mismatch("datetime or duration", other.type_name())),
    };
    Ok(types::AttributeValue::N(seconds.to_string()))
}

pub(super) fn decode_ttl(value: types::AttributeValue, location: &str) -> Result<Value> {
    match value {
        types::AttributeValue::N(text) => {
            let seconds: i64 = text.parse().map_err(|_| Error::format(&text, "epoch seconds"))?;
            let instant = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| Error::format(&text, "epoch seconds"))?;
            Ok(Value::DateTime(instant))
        }
        other => Err(codec::unexpected(location, AttributeKind::Number, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};
    use rstest::rstest;

    #[rstest]
    #[case::modern(
        Utc.with_ymd_and_hms(2047, 1, 6, 8, 21, 30).unwrap() + TimeDelta::milliseconds(2),
        "2047-01-06T08:21:30.002000+0000"
    )]
    #[case::year_one(
        Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap(),
        "0001-01-01T00:00:00.000000+0000"
    )]
    #[case::microseconds(
        Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap() + TimeDelta::microseconds(999_999),
        "2020-12-31T23:59:59.999999+0000"
    )]
    fn test_format_and_parse(#[case] instant: DateTime<Utc>, #[case] expected: &str) {
        assert_eq!(format_utc(&instant), expected);
        assert_eq!(parse_utc(expected).unwrap(), instant);
    }

    #[test]
    fn test_parse_unpadded_year() {
        let expected = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_utc("1-01-01T00:00:00.000000+0000").unwrap(), expected);
    }

    #[rstest]
    #[case::naive("2047-01-06T08:21:30.002000")]
    #[case::missing_microseconds("2047-01-06T08:21:30+0000")]
    #[case::non_utc_offset("2047-01-06T08:21:30.002000+0100")]
    #[case::wrong_separator("2047-01-06 08:21:30.002000+0000")]
    #[case::wrong_time_separator("2047-01-06T08-21-30.002000+0000")]
    #[case::non_digit("2047-01-0xT08:21:30.002000+0000")]
    #[case::non_digit_time("2047-01-06T08:2x:30.002000+0000")]
    #[case::out_of_range("2047-13-06T08:21:30.002000+0000")]
    #[case::empty("")]
    fn test_parse_rejects(#[case] text: &str) {
        let error = parse_utc(text).unwrap_err();
        assert!(matches!(error, Error::Format { .. }));
        assert!(error.to_string().contains(DATETIME_FORMAT));
    }

    #[test]
    fn test_naive_utc_is_treated_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let actual = encode_utc(&Value::NaiveDateTime(naive)).unwrap();
        assert_eq!(
            actual,
            types::AttributeValue::S("2020-01-01T00:00:00.000000+0000".to_string())
        );
    }

    #[rstest]
    #[case::five_digit_year(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap())]
    #[case::year_zero(Utc.with_ymd_and_hms(0, 12, 31, 0, 0, 0).unwrap())]
    fn test_encode_rejects_year_out_of_range(#[case] instant: DateTime<Utc>) {
        let error = encode_utc(&Value::DateTime(instant)).unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_ttl_absolute() {
        let instant = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let encoded = encode_ttl(&Value::DateTime(instant)).unwrap();
        assert_eq!(encoded, types::AttributeValue::N("1893456000".to_string()));
        assert_eq!(decode_ttl(encoded, "a").unwrap(), Value::DateTime(instant));
    }

    #[test]
    fn test_ttl_relative() {
        let before = Utc::now().timestamp();
        let encoded = encode_ttl(&Value::Duration(TimeDelta::seconds(30))).unwrap();
        let after = Utc::now().timestamp();
        let types::AttributeValue::N(text) = encoded else {
            panic!("expected a number");
        };
        let seconds: i64 = text.parse().unwrap();
        assert!(before + 30 <= seconds && seconds <= after + 30);
    }

    #[test]
    fn test_ttl_rejects_naive() {
        let naive = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let error = encode_ttl(&Value::NaiveDateTime(naive)).unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));
    }
}
