use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Scheme prepended to the protocol-relative icon path before fetching it.
pub const ICON_SCHEME: &str = "https:";

/// Success body of the current-weather endpoint. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherPayload {
    pub location: Option<PayloadLocation>,
    pub current: Option<PayloadCurrent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayloadLocation {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayloadCurrent {
    pub temp_c: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub humidity: Option<f64>,
    pub uv: Option<f64>,
    pub condition: Option<PayloadCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayloadCondition {
    /// Protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub icon: Option<String>,
}

/// Error body returned with any non-200 status: `{ "error": { "message", "code" } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    pub error: Option<ApiFailure>,
}

/// Structured error reported by the weather service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    #[serde(default, deserialize_with = "numeric_code")]
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl ApiFailure {
    /// No location given (`q` empty).
    pub const CODE_MISSING_QUERY: i64 = 1003;
    /// The search term matched nothing.
    pub const CODE_NO_MATCH: i64 = 1006;

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self.code {
            Some(Self::CODE_MISSING_QUERY) => {
                "You must provide a location to search view weather."
            }
            Some(Self::CODE_NO_MATCH) => {
                "The search term you entered didn't match a location in our records."
            }
            _ => "There was an error on our side. Please try again.",
        }
    }
}

/// Accepts `1006` as well as `1006.0`; fractional codes are truncated.
fn numeric_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|code| code.trunc() as i64))
}

/// Decoded outcome of a query that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQueryResult {
    Success(WeatherPayload),
    Failure(ApiFailure),
}

/// Display-ready snapshot of the last successful query; the unit that is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub location_name: String,
    pub temperature_celsius: i64,
    pub humidity_percent: i64,
    pub uv_index: i64,
    pub feels_like_celsius: i64,
    /// Raw protocol-relative path as sent by the service.
    pub icon_url: String,
    pub fetched_at_epoch_seconds: f64,
}

impl WeatherSummary {
    /// Build a summary from a success payload.
    ///
    /// Numbers are truncated toward zero, never rounded. Missing numbers become
    /// `0` and missing strings become empty.
    pub fn from_payload(payload: &WeatherPayload, fetched_at: DateTime<Utc>) -> Self {
        let current = payload.current.as_ref();
        let truncate = |value: Option<f64>| value.map(|v| v.trunc() as i64).unwrap_or(0);

        Self {
            location_name: payload
                .location
                .as_ref()
                .and_then(|l| l.name.clone())
                .unwrap_or_default(),
            temperature_celsius: truncate(current.and_then(|c| c.temp_c)),
            humidity_percent: truncate(current.and_then(|c| c.humidity)),
            uv_index: truncate(current.and_then(|c| c.uv)),
            feels_like_celsius: truncate(current.and_then(|c| c.feelslike_c)),
            icon_url: current
                .and_then(|c| c.condition.as_ref())
                .and_then(|c| c.icon.clone())
                .unwrap_or_default(),
            fetched_at_epoch_seconds: fetched_at.timestamp_millis() as f64 / 1000.0,
        }
    }

    /// Fetchable icon URL, or `None` when the service sent no icon.
    pub fn icon_https_url(&self) -> Option<String> {
        if self.icon_url.is_empty() {
            None
        } else {
            Some(format!("{ICON_SCHEME}{}", self.icon_url))
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        let millis = (self.fetched_at_epoch_seconds * 1000.0) as i64;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> WeatherPayload {
        serde_json::from_value(serde_json::json!({
            "location": { "name": "Paris" },
            "current": {
                "temp_c": 18.9,
                "feelslike_c": 17.2,
                "humidity": 64.0,
                "uv": 3.0,
                "condition": { "icon": "//cdn/icon.png" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn summary_truncates_instead_of_rounding() {
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let summary = WeatherSummary::from_payload(&paris(), at);

        assert_eq!(summary.location_name, "Paris");
        assert_eq!(summary.temperature_celsius, 18);
        assert_eq!(summary.feels_like_celsius, 17);
        assert_eq!(summary.humidity_percent, 64);
        assert_eq!(summary.uv_index, 3);
        assert_eq!(summary.icon_url, "//cdn/icon.png");
        assert_eq!(summary.fetched_at_epoch_seconds, 1_700_000_000.0);
    }

    #[test]
    fn negative_values_truncate_toward_zero() {
        let payload = WeatherPayload {
            location: None,
            current: Some(PayloadCurrent {
                temp_c: Some(-3.7),
                feelslike_c: Some(-0.4),
                ..Default::default()
            }),
        };
        let summary = WeatherSummary::from_payload(&payload, Utc::now());

        assert_eq!(summary.temperature_celsius, -3);
        assert_eq!(summary.feels_like_celsius, 0);
    }

    #[test]
    fn missing_fields_default_to_zero_and_empty() {
        let payload: WeatherPayload = serde_json::from_str("{}").unwrap();
        let summary = WeatherSummary::from_payload(&payload, Utc::now());

        assert_eq!(summary.location_name, "");
        assert_eq!(summary.temperature_celsius, 0);
        assert_eq!(summary.humidity_percent, 0);
        assert_eq!(summary.uv_index, 0);
        assert_eq!(summary.feels_like_celsius, 0);
        assert_eq!(summary.icon_url, "");
        assert_eq!(summary.icon_https_url(), None);
    }

    #[test]
    fn null_fields_decode_as_missing() {
        let payload: WeatherPayload = serde_json::from_value(serde_json::json!({
            "location": null,
            "current": { "temp_c": null, "condition": null }
        }))
        .unwrap();

        assert_eq!(payload.location, None);
        assert_eq!(payload.current.unwrap().temp_c, None);
    }

    #[test]
    fn icon_url_keeps_raw_path_and_prefixes_on_demand() {
        let summary = WeatherSummary::from_payload(&paris(), Utc::now());

        assert_eq!(summary.icon_url, "//cdn/icon.png");
        assert_eq!(summary.icon_https_url().as_deref(), Some("https://cdn/icon.png"));
    }

    #[test]
    fn summary_serializes_with_camel_case_keys() {
        let summary = WeatherSummary::from_payload(&paris(), Utc::now());
        let value = serde_json::to_value(&summary).unwrap();

        for key in [
            "locationName",
            "temperatureCelsius",
            "humidityPercent",
            "uvIndex",
            "feelsLikeCelsius",
            "iconUrl",
            "fetchedAtEpochSeconds",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn error_code_decodes_from_integer_or_float() {
        let decode = |body: serde_json::Value| -> ApiFailure {
            serde_json::from_value::<ApiErrorResponse>(body).unwrap().error.unwrap()
        };

        assert_eq!(decode(serde_json::json!({ "error": { "code": 1006 } })).code, Some(1006));
        assert_eq!(decode(serde_json::json!({ "error": { "code": 1003.0 } })).code, Some(1003));
        assert_eq!(decode(serde_json::json!({ "error": { "code": null } })).code, None);
        assert_eq!(decode(serde_json::json!({ "error": { "message": "x" } })).code, None);
    }

    #[test]
    fn failure_messages_follow_error_code() {
        let failure = |code| ApiFailure { code, message: None };

        assert_eq!(
            failure(Some(1003)).user_message(),
            "You must provide a location to search view weather."
        );
        assert_eq!(
            failure(Some(1006)).user_message(),
            "The search term you entered didn't match a location in our records."
        );
        assert_eq!(
            failure(Some(2006)).user_message(),
            "There was an error on our side. Please try again."
        );
        assert_eq!(
            failure(None).user_message(),
            "There was an error on our side. Please try again."
        );
    }
}
