use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::error::FieldError;
use crate::utils::sanitize::escape_html;

const TIMESTAMP_FORMAT_HINT: &str = "must be in format: YYYY-MM-DDTHH:mm:ss.000+05:00";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue: String,
    /// Id of the user who created the event; only they may delete it.
    pub creator: String,
    /// Id of the hosting club.
    pub of_club: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /addEvent/:clubId`.
///
/// Absent fields deserialize as empty strings so they fail their length or
/// format rule instead of being rejected by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateEventRequest {
    #[validate(length(min = 2, message = "min length is 2"))]
    pub title: String,
    #[validate(length(min = 5, message = "at least 5 characters"))]
    pub description: String,
    #[validate(custom(
        function = "validate_timestamp",
        message = "must be in format: YYYY-MM-DDTHH:mm:ss.000+05:00"
    ))]
    pub start_time: String,
    #[validate(custom(
        function = "validate_timestamp",
        message = "must be in format: YYYY-MM-DDTHH:mm:ss.000+05:00"
    ))]
    pub end_time: String,
    #[validate(length(min = 5, message = "at least 5 characters"))]
    pub venue: String,
}

impl CreateEventRequest {
    /// Builds the event record for a validated request. Text fields are
    /// HTML-escaped on the way in.
    pub fn into_event(self, creator: &str, club_id: &str) -> Result<Event, FieldError> {
        let start_time = parse_timestamp(&self.start_time)
            .ok_or_else(|| FieldError::body("startTime", TIMESTAMP_FORMAT_HINT))?;
        let end_time = parse_timestamp(&self.end_time)
            .ok_or_else(|| FieldError::body("endTime", TIMESTAMP_FORMAT_HINT))?;

        Ok(Event {
            id: Uuid::new_v4().to_string(),
            title: escape_html(&self.title),
            description: escape_html(&self.description),
            start_time,
            end_time,
            venue: escape_html(&self.venue),
            creator: creator.to_string(),
            of_club: club_id.to_string(),
            created_at: Utc::now(),
        })
    }
}

fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    match parse_timestamp(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("iso8601")),
    }
}

// Date-time layouts tried with and without a trailing UTC offset.
const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Parses ISO-8601 timestamps in extended or basic form.
///
/// Accepts `T` or a space between date and time, seconds and fractions
/// optional (`.` or `,`), and an offset of `Z`, `+hh`, `+hhmm` or `+hh:mm`.
/// A missing offset is read as UTC. Calendar dates (`YYYY-MM-DD`,
/// `YYYYMMDD`), year-month and bare years resolve to midnight UTC on the
/// first day they name.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim().replace(',', ".");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt.with_timezone(&Utc));
    }

    let zulu = value.strip_suffix('Z').or_else(|| value.strip_suffix('z'));
    let local = zulu.unwrap_or(&value);

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(local, format) {
            return Some(naive.and_utc());
        }
    }

    if zulu.is_none() {
        for format in DATE_TIME_FORMATS {
            let with_offset = format!("{}%#z", format);
            if let Ok(dt) = DateTime::parse_from_str(&value, &with_offset) {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    parse_date(&value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    let bytes = value.as_bytes();
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    match bytes.len() {
        // YYYY-MM
        7 if bytes[4] == b'-' && digits(0..4) && digits(5..7) => {
            NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok()
        }
        // YYYY
        4 if digits(0..4) => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Tech Talk".to_string(),
            description: "intro session".to_string(),
            start_time: "2024-05-01T10:00:00.000+05:00".to_string(),
            end_time: "2024-05-01T12:00:00.000+05:00".to_string(),
            venue: "Main Hall".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_short_fields_are_reported() {
        let req = CreateEventRequest {
            title: "T".to_string(),
            description: "tiny".to_string(),
            venue: "Hall".to_string(),
            ..request()
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("venue"));
        assert!(!fields.contains_key("start_time"));
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let req = CreateEventRequest {
            start_time: "next tuesday".to_string(),
            end_time: "2024-13-01T10:00:00Z".to_string(),
            ..request()
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        let start = &fields["start_time"][0];
        assert_eq!(start.message.as_deref(), Some(TIMESTAMP_FORMAT_HINT));
        assert!(fields.contains_key("end_time"));
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let cases = [
            ("2024-05-01T10:00:00.000+05:00", "2024-05-01T05:00:00+00:00"),
            ("2024-05-01T10:00:00.000+0500", "2024-05-01T05:00:00+00:00"),
            ("2024-05-01T10:00:00+05", "2024-05-01T05:00:00+00:00"),
            ("2024-05-01T10:00+05:30", "2024-05-01T04:30:00+00:00"),
            ("2024-05-01T10:00:00Z", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T10:00Z", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T10:00:00,5Z", "2024-05-01T10:00:00.500+00:00"),
            ("2024-05-01T10:00:00", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01T10:30", "2024-05-01T10:30:00+00:00"),
            ("2024-05-01 10:00:00", "2024-05-01T10:00:00+00:00"),
            ("2024-05-01 10:00", "2024-05-01T10:00:00+00:00"),
            ("20240501T100000Z", "2024-05-01T10:00:00+00:00"),
            ("20240501T100000+0500", "2024-05-01T05:00:00+00:00"),
            ("2024-05-01", "2024-05-01T00:00:00+00:00"),
            ("20240501", "2024-05-01T00:00:00+00:00"),
            ("2024-05", "2024-05-01T00:00:00+00:00"),
            ("2024", "2024-01-01T00:00:00+00:00"),
        ];

        for (input, expected) in cases {
            let parsed = parse_timestamp(input).unwrap_or_else(|| panic!("{} should parse", input));
            assert_eq!(
                parsed.to_rfc3339_opts(chrono::SecondsFormat::Millis, false),
                DateTime::parse_from_rfc3339(expected)
                    .unwrap()
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, false),
                "input {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_timestamp_rejects_non_iso() {
        for input in [
            "",
            "soon",
            "next tuesday",
            "01/05/2024",
            "01/05/2024 10:00",
            "2024-13-01T10:00:00Z",
            "2024-05-01T25:00:00Z",
            "2024-5",
            "2024-05-01T10",
        ] {
            assert!(parse_timestamp(input).is_none(), "input {:?}", input);
        }
    }

    #[test]
    fn test_into_event_sets_ownership_and_escapes() {
        let req = CreateEventRequest {
            title: "<b>Jam</b>".to_string(),
            ..request()
        };

        let event = req.into_event("U1", "C1").unwrap();
        assert_eq!(event.creator, "U1");
        assert_eq!(event.of_club, "C1");
        assert_eq!(event.title, "&lt;b&gt;Jam&lt;&#x2F;b&gt;");
        assert!(event.start_time < event.end_time);
        assert!(Uuid::parse_str(&event.id).is_ok());
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = request().into_event("U1", "C1").unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["ofClub"], "C1");
        assert_eq!(json["creator"], "U1");
        assert!(json.get("startTime").is_some());
        assert!(json.get("of_club").is_none());
    }
}
