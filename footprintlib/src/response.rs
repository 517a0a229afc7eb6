//! Calculator response envelopes.
//!
//! Every calculator endpoint answers with a JSON object carrying a boolean
//! `success` flag. On success the payload fields sit next to the flag; on
//! failure a `message` explains why:
//!
//! ```json
//! {"success": true, "results": {...}, "country_code": "FR"}
//! {"success": false, "message": "Country not found"}
//! ```
//!
//! [`ApiResponse`] decodes that shape into a tagged value so callers match on
//! the outcome instead of probing fields.

use std::io::Read;
use std::path::Path;

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::catalog::{Country, StatisticsResponse};
use crate::error::FootprintError;
use crate::model::FootprintResult;
use crate::recommend::Recommendation;
use crate::Result;

/// A decoded response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// `success: true` with its payload
    Success(T),
    /// `success: false` with the reported message
    Failure { message: String },
}

impl<T> ApiResponse<T> {
    /// Convert into a `Result`, turning a failure envelope into
    /// [`FootprintError::Api`].
    pub fn into_result(self) -> Result<T> {
        match self {
            ApiResponse::Success(payload) => Ok(payload),
            ApiResponse::Failure { message } => Err(FootprintError::Api(message)),
        }
    }

    /// Whether the envelope reported success
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(D::Error::custom("response must be a JSON object"));
        }

        match value.get("success").and_then(Value::as_bool) {
            Some(true) => T::deserialize(value)
                .map(ApiResponse::Success)
                .map_err(D::Error::custom),
            Some(false) => {
                let message = match value.get("message").and_then(Value::as_str) {
                    Some(message) => message.to_string(),
                    None => {
                        tracing::warn!("failure envelope without a message");
                        "unknown error".to_string()
                    }
                };
                Ok(ApiResponse::Failure { message })
            }
            None => Err(D::Error::custom("missing boolean `success` field")),
        }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let envelope = match self {
            ApiResponse::Success(payload) => {
                let mut value = serde_json::to_value(payload).map_err(S::Error::custom)?;
                match value.as_object_mut() {
                    Some(map) => {
                        map.insert("success".to_string(), Value::Bool(true));
                    }
                    None => return Err(S::Error::custom("payload must serialize to an object")),
                }
                value
            }
            ApiResponse::Failure { message } => serde_json::json!({
                "success": false,
                "message": message,
            }),
        };
        envelope.serialize(serializer)
    }
}

/// Payload of a footprint calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub results: FootprintResult,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Payload of a recommendations request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Payload of a single-country lookup.
pub type CountryResponse = Country;

/// Payload of the country list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountriesResponse {
    pub countries: Vec<Country>,
}

/// Decode a response envelope from a JSON string.
pub fn parse_response<T: DeserializeOwned>(json: &str) -> Result<ApiResponse<T>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a footprint result from JSON.
///
/// Accepts either a bare results object or a calculate envelope. A failure
/// envelope becomes [`FootprintError::Api`]; the decoded result is
/// validated before it is returned.
pub fn parse_results(json: &str) -> Result<FootprintResult> {
    let value: Value = serde_json::from_str(json)?;
    let result = if value.get("success").is_some() {
        let response: ApiResponse<CalculateResponse> = serde_json::from_value(value)?;
        response.into_result()?.results
    } else {
        serde_json::from_value(value)?
    };
    result.validate()?;
    Ok(result)
}

/// Read a footprint result from a file, or from stdin when `path` is `-`.
pub fn read_results(path: impl AsRef<Path>) -> Result<FootprintResult> {
    parse_results(&read_source(path.as_ref())?)
}

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(|source| FootprintError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const RESULTS: &str = r#"{
        "totals": {"monthly": 666.67, "annual": 8000, "vs_global": 66.7,
                   "trees_needed": 400, "flights_equivalent": 11.4, "cars_km": 38095},
        "transport": {"car": 210, "bus": 0, "train": 0, "flight": 90, "total": 300},
        "habitat": {"heating": 150, "electricity": 40, "water": 10, "total": 200},
        "food": {"meat": 135, "dairy": 27, "vegetables": 5, "total": 167}
    }"#;

    fn envelope() -> String {
        format!(
            r#"{{"success": true, "results": {}, "country_code": "FR", "timestamp": "2024-12-01T10:00:00"}}"#,
            RESULTS
        )
    }

    #[test]
    fn test_success_envelope() {
        let response: ApiResponse<CalculateResponse> = parse_response(&envelope()).unwrap();
        assert!(response.is_success());
        let payload = response.into_result().unwrap();
        assert_eq!(payload.country_code, "FR");
        assert_eq!(payload.results.totals.annual, 8000.0);
        assert_eq!(payload.timestamp.as_deref(), Some("2024-12-01T10:00:00"));
    }

    #[test]
    fn test_failure_envelope() {
        let json = r#"{"success": false, "message": "Country not found"}"#;
        let response: ApiResponse<CalculateResponse> = parse_response(json).unwrap();
        assert_eq!(
            response,
            ApiResponse::Failure {
                message: "Country not found".to_string()
            }
        );
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, FootprintError::Api(ref m) if m == "Country not found"));
    }

    #[test]
    fn test_missing_success_flag_is_rejected() {
        let json = r#"{"results": {}}"#;
        assert!(parse_response::<CalculateResponse>(json).is_err());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(parse_response::<CalculateResponse>("[1, 2]").is_err());
    }

    #[test]
    fn test_success_with_wrong_payload_is_rejected() {
        let json = r#"{"success": true, "country_code": "FR"}"#;
        assert!(parse_response::<CalculateResponse>(json).is_err());
    }

    #[test]
    fn test_serialize_envelope() {
        let response = ApiResponse::Success(CountriesResponse { countries: vec![] });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], Value::Bool(true));
        assert!(value["countries"].as_array().unwrap().is_empty());

        let failure: ApiResponse<CountriesResponse> = ApiResponse::Failure {
            message: "down".to_string(),
        };
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["success"], Value::Bool(false));
        assert_eq!(value["message"], "down");
    }

    #[test]
    fn test_parse_results_bare_and_envelope() {
        let bare = parse_results(RESULTS).unwrap();
        let wrapped = parse_results(&envelope()).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.food.meat, 135.0);
    }

    #[test]
    fn test_parse_results_failure_envelope() {
        let err = parse_results(r#"{"success": false, "message": "boom"}"#).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_parse_results_validates() {
        let json = RESULTS.replace(r#""total": 200"#, r#""total": -200"#);
        assert!(matches!(
            parse_results(&json),
            Err(FootprintError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_results_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, RESULTS).unwrap();

        let result = read_results(&path).unwrap();
        assert_eq!(result.transport.total, 300.0);
    }

    #[test]
    fn test_read_results_missing_file() {
        let err = read_results("/nonexistent/results.json").unwrap_err();
        assert!(matches!(err, FootprintError::FileRead { .. }));
    }
}
