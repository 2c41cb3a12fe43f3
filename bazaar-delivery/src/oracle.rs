use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// What the courier knows about a destination pincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PincodeRecord {
    pub cash_on_delivery: bool,
    pub district: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("courier API token is not configured")]
    MissingCredential,

    #[error("courier request failed: {0}")]
    Transport(String),

    #[error("courier responded with status {0}")]
    BadStatus(u16),
}

/// Courier-side serviceability lookup. `Ok(None)` means the courier
/// answered and does not cover the pincode; errors mean we could not get
/// an answer at all.
#[async_trait]
pub trait ServiceabilityOracle: Send + Sync {
    async fn lookup(&self, pincode: &str) -> Result<Option<PincodeRecord>, OracleError>;
}

/// Delhivery pincode-serviceability client.
///
/// One request per check, bounded by the client timeout. No retries; the
/// caller decides whether to retry or fall back.
pub struct DelhiveryClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DelhiveryClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl ServiceabilityOracle for DelhiveryClient {
    async fn lookup(&self, pincode: &str) -> Result<Option<PincodeRecord>, OracleError> {
        if self.token.is_empty() {
            return Err(OracleError::MissingCredential);
        }

        let url = format!(
            "{}/c/api/pin-codes/json/?filter_codes={}",
            self.base_url, pincode
        );

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::BadStatus(status.as_u16()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(parse_postal_code(&data))
    }
}

fn parse_postal_code(data: &Value) -> Option<PincodeRecord> {
    let code = data.get("delivery_codes")?.get(0)?.get("postal_code")?;

    Some(PincodeRecord {
        cash_on_delivery: code.get("cod").and_then(Value::as_str) == Some("Y"),
        district: string_field(code, "district").or_else(|| string_field(code, "district_name")),
        state: string_field(code, "state").or_else(|| string_field(code, "state_code")),
    })
}

fn string_field(code: &Value, key: &str) -> Option<String> {
    code.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_matched_postal_code() {
        let data = json!({
            "delivery_codes": [{
                "postal_code": {
                    "cod": "Y",
                    "district": "New Delhi",
                    "state_code": "DL"
                }
            }]
        });

        let record = parse_postal_code(&data).unwrap();
        assert!(record.cash_on_delivery);
        assert_eq!(record.district.as_deref(), Some("New Delhi"));
        assert_eq!(record.state.as_deref(), Some("DL"));
    }

    #[test]
    fn missing_match_is_none() {
        assert_eq!(parse_postal_code(&json!({ "delivery_codes": [] })), None);
        assert_eq!(parse_postal_code(&json!({})), None);
    }

    #[test]
    fn cod_flag_defaults_to_false() {
        let data = json!({
            "delivery_codes": [{ "postal_code": { "cod": "N", "district": "Pune" } }]
        });
        assert!(!parse_postal_code(&data).unwrap().cash_on_delivery);
    }
}
