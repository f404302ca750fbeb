//! IP geolocation lookup objects.

use serde::{Deserialize, Serialize};

/// Default lookup service root.
pub const IPAPI_BASE_URL: &str = "https://ipapi.co/";

/// The subset of the lookup reply the payment page consumes.
///
/// Every field is optional so that any shape mismatch surfaces as a missing
/// value rather than a decode failure. The service reports rate limiting
/// and reserved addresses in-band with `error: true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLookup {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_calling_code: Option<String>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl GeoLookup {
    /// The calling code, if the reply carried a usable one.
    pub fn calling_code(&self) -> Option<&str> {
        if self.error {
            return None;
        }
        self.country_calling_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calling_code_extraction() {
        let reply: GeoLookup = serde_json::from_str(
            r#"{"ip":"203.0.113.9","country_code":"PH","country_calling_code":"+63","currency":"PHP"}"#,
        )
        .unwrap();
        assert_eq!(reply.calling_code(), Some("+63"));
    }

    #[test]
    fn test_in_band_error_has_no_code() {
        let reply: GeoLookup =
            serde_json::from_str(r#"{"error":true,"reason":"RateLimited"}"#).unwrap();
        assert_eq!(reply.calling_code(), None);

        let reply: GeoLookup = serde_json::from_str(r#"{"country_calling_code":""}"#).unwrap();
        assert_eq!(reply.calling_code(), None);
    }
}
