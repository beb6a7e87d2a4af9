use serde::{Deserialize, Serialize};

use crate::icon::IconRef;

/// One cached location summary, exactly as the producer wrote it.
///
/// Every field is optional here even though the producer always fills them:
/// partial records must render with defaults instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub location_name: Option<String>,
    pub temperature: Option<f64>,
    pub weather_code: Option<i32>,
    pub is_day: Option<bool>,
    pub description: Option<String>,
}

/// A [`WeatherRecord`] after defaulting; nothing downstream sees an `Option`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub location_name: String,
    pub temperature: f64,
    pub weather_code: i32,
    pub is_day: bool,
    pub description: String,
}

impl WeatherRecord {
    pub fn resolve(&self, unknown_label: &str) -> ResolvedRecord {
        ResolvedRecord {
            location_name: self
                .location_name
                .clone()
                .unwrap_or_else(|| unknown_label.to_string()),
            temperature: self.temperature.unwrap_or(0.0),
            weather_code: self.weather_code.unwrap_or(0),
            is_day: self.is_day.unwrap_or(true),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Decode the cached payload into an ordered list of records.
///
/// A top-level `null` yields an empty list and a `null` element yields an
/// all-absent record. Any type mismatch or repeated key fails the whole payload.
pub fn decode_records(payload: &str) -> Result<Vec<WeatherRecord>, serde_json::Error> {
    let entries: Option<Vec<Option<WeatherRecord>>> = serde_json::from_str(payload)?;

    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

pub fn encode_records(records: &[WeatherRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Data merged into the click template when a row is tapped.
///
/// Always empty today; the location name is reserved for opening the app
/// directly on that location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPayload {
    pub location_name: Option<String>,
}

impl ClickPayload {
    pub fn is_empty(&self) -> bool {
        self.location_name.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Rendered from a record.
    Item,
    /// Rendering failed; labeled error row.
    Fallback,
    /// Out-of-range request from the host.
    Placeholder,
}

/// Display-ready projection of one list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDescriptor {
    pub kind: RowKind,
    pub display_name: String,
    pub display_temperature: String,
    pub display_description: String,
    pub icon: IconRef,
    pub click_payload: Option<ClickPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_payload() {
        let payload = r#"[
            {"locationName":"Lima","temperature":18.6,"weatherCode":3,"isDay":false,
             "description":"Cloudy"}
        ]"#;

        let records = decode_records(payload).expect("payload should decode");

        assert_eq!(
            records,
            vec![WeatherRecord {
                location_name: Some("Lima".into()),
                temperature: Some(18.6),
                weather_code: Some(3),
                is_day: Some(false),
                description: Some("Cloudy".into()),
            }]
        );
    }

    #[test]
    fn missing_and_null_fields_are_absent() {
        let records =
            decode_records(r#"[{"locationName":null},{"temperature":12}]"#).expect("should decode");

        assert_eq!(records[0], WeatherRecord::default());
        assert_eq!(records[1].temperature, Some(12.0));
        assert_eq!(records[1].location_name, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let records = decode_records(r#"[{"locationName":"Quito","humidity":80}]"#)
            .expect("extra fields should not fail decoding");
        assert_eq!(records[0].location_name.as_deref(), Some("Quito"));
    }

    #[test]
    fn null_payload_is_empty_list() {
        assert!(decode_records("null").expect("null is valid").is_empty());
        assert!(decode_records("[]").expect("empty array is valid").is_empty());
    }

    #[test]
    fn null_element_becomes_absent_record() {
        let records = decode_records(r#"[null, {"locationName":"Cusco"}]"#).expect("should decode");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], WeatherRecord::default());
    }

    #[test]
    fn type_mismatch_fails_whole_payload() {
        assert!(decode_records(r#"[{"locationName":"Lima"},{"temperature":"hot"}]"#).is_err());
        assert!(decode_records(r#"{"locationName":"Lima"}"#).is_err());
        assert!(decode_records("not json").is_err());
    }

    #[test]
    fn repeated_key_fails_whole_payload() {
        let payload = r#"[{"locationName":"Lima","locationName":"Cusco"}]"#;
        assert!(decode_records(payload).is_err());
    }

    #[test]
    fn resolve_applies_defaults() {
        let resolved = WeatherRecord::default().resolve("Unknown");

        assert_eq!(
            resolved,
            ResolvedRecord {
                location_name: "Unknown".into(),
                temperature: 0.0,
                weather_code: 0,
                is_day: true,
                description: String::new(),
            }
        );
    }

    #[test]
    fn encode_then_decode_preserves_records() {
        let records = vec![
            WeatherRecord {
                location_name: Some("Arequipa".into()),
                temperature: Some(-3.25),
                weather_code: Some(71),
                is_day: Some(true),
                description: Some("Snow".into()),
            },
            WeatherRecord {
                location_name: Some("Piura".into()),
                temperature: Some(31.0),
                weather_code: Some(0),
                is_day: Some(false),
                description: Some("Clear".into()),
            },
        ];

        let payload = encode_records(&records).expect("records should encode");
        assert!(payload.contains("\"locationName\""));
        assert_eq!(decode_records(&payload).expect("payload should decode"), records);
    }
}
