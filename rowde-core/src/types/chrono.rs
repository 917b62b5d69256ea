use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::decode::{Decode, DecodeError};
use crate::value::RawValue;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

fn text<'v>(value: &'v RawValue, expected: &'static str) -> Result<&'v str, DecodeError> {
    match value {
        RawValue::Text(text) => Ok(text),
        _ => Err(DecodeError::mismatch(expected, value)),
    }
}

fn parse_naive_date_time(text: &str) -> Result<NaiveDateTime, DecodeError> {
    let mut last_error = None;

    for format in DATE_TIME_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(date_time) => return Ok(date_time),
            Err(error) => last_error = Some(error),
        }
    }

    Err(match last_error {
        Some(error) => DecodeError::other(error),
        None => DecodeError::other(format!("invalid date-time {:?}", text)),
    })
}

impl Decode for NaiveDate {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        NaiveDate::parse_from_str(text(value, "date")?, "%Y-%m-%d").map_err(DecodeError::other)
    }
}

impl Decode for NaiveTime {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        let text = text(value, "time")?;

        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
            .ok_or_else(|| DecodeError::other(format!("invalid time {:?}", text)))
    }
}

impl Decode for NaiveDateTime {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        parse_naive_date_time(text(value, "date-time")?)
    }
}

impl Decode for DateTime<Utc> {
    fn decode(value: &RawValue) -> Result<Self, DecodeError> {
        match *value {
            RawValue::Int(seconds) => Utc
                .timestamp_opt(seconds, 0)
                .single()
                .ok_or_else(|| DecodeError::other(format!("timestamp {} is out of range", seconds))),

            RawValue::Text(ref text) => match DateTime::parse_from_rfc3339(text) {
                Ok(date_time) => Ok(date_time.with_timezone(&Utc)),
                Err(_) => parse_naive_date_time(text).map(|naive| Utc.from_utc_datetime(&naive)),
            },

            _ => Err(DecodeError::mismatch("date-time", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::decode::{Decode, DecodeError};
    use crate::value::RawValue;

    fn text(value: &str) -> RawValue {
        RawValue::Text(value.into())
    }

    #[test]
    fn it_decodes_dates_and_times() {
        assert_eq!(
            NaiveDate::decode(&text("2020-03-14")).unwrap(),
            NaiveDate::from_ymd(2020, 3, 14)
        );
        assert_eq!(
            NaiveTime::decode(&text("12:30")).unwrap(),
            NaiveTime::from_hms(12, 30, 0)
        );
        assert_eq!(
            NaiveTime::decode(&text("12:30:15.250")).unwrap(),
            NaiveTime::from_hms_milli(12, 30, 15, 250)
        );
        assert!(matches!(
            NaiveDate::decode(&RawValue::Int(1)),
            Err(DecodeError::Mismatch { .. })
        ));
    }

    #[test]
    fn it_decodes_date_times_in_sqlite_formats() {
        let expected = NaiveDate::from_ymd(2020, 3, 14).and_hms(15, 9, 26);

        assert_eq!(
            NaiveDateTime::decode(&text("2020-03-14 15:09:26")).unwrap(),
            expected
        );
        assert_eq!(
            NaiveDateTime::decode(&text("2020-03-14T15:09:26")).unwrap(),
            expected
        );
        assert!(NaiveDateTime::decode(&text("yesterday")).is_err());
    }

    #[test]
    fn it_decodes_utc_date_times() {
        let expected = Utc.ymd(2020, 3, 14).and_hms(15, 9, 26);

        assert_eq!(
            DateTime::<Utc>::decode(&text("2020-03-14T16:09:26+01:00")).unwrap(),
            expected
        );
        assert_eq!(
            DateTime::<Utc>::decode(&text("2020-03-14 15:09:26")).unwrap(),
            expected
        );
        assert_eq!(
            DateTime::<Utc>::decode(&RawValue::Int(expected.timestamp())).unwrap(),
            expected
        );
    }
}
