//! Request signing for the dictation websocket.
//!
//! The service authenticates the upgrade request by an HMAC-SHA256 over
//! the host, date and request line, passed as query parameters.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;
use tripwise_core::voice::SpeechError;

type HmacSha256 = Hmac<Sha256>;

/// RFC 1123 date as the service expects it.
pub(crate) fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn signature(api_secret: &str, host: &str, path: &str, date: &str) -> Result<String, SpeechError> {
    let origin = format!("host: {host}\ndate: {date}\nGET {path} HTTP/1.1");
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| SpeechError::Protocol(format!("signing key rejected: {e}")))?;
    mac.update(origin.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Builds the signed `wss://` URL.
pub(crate) fn signed_url(
    host: &str,
    path: &str,
    api_key: &str,
    api_secret: &str,
    date: &str,
) -> Result<Url, SpeechError> {
    let signature = signature(api_secret, host, path, date)?;
    let authorization_origin = format!(
        "api_key=\"{api_key}\", algorithm=\"hmac-sha256\", headers=\"host date request-line\", signature=\"{signature}\""
    );
    let authorization = STANDARD.encode(authorization_origin.as_bytes());

    Url::parse_with_params(
        &format!("wss://{host}{path}"),
        &[
            ("authorization", authorization.as_str()),
            ("date", date),
            ("host", host),
        ],
    )
    .map_err(|e| SpeechError::Connection(format!("invalid speech endpoint: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DATE: &str = "Thu, 01 May 2025 08:30:00 GMT";

    #[test]
    fn test_http_date_format() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(http_date(now), DATE);
    }

    #[test]
    fn test_signature_is_stable() {
        let a = signature("secret", "iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();
        let b = signature("secret", "iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();
        let other = signature("other", "iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, other);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), 32);
    }

    #[test]
    fn test_signed_url_carries_auth_params() {
        let url = signed_url("iat-api.xfyun.cn", "/v2/iat", "key", "secret", DATE).unwrap();

        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.host_str(), Some("iat-api.xfyun.cn"));
        assert_eq!(url.path(), "/v2/iat");

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(params[1], ("date".to_string(), DATE.to_string()));
        assert_eq!(params[2], ("host".to_string(), "iat-api.xfyun.cn".to_string()));

        let authorization = STANDARD.decode(&params[0].1).unwrap();
        let authorization = String::from_utf8(authorization).unwrap();
        assert!(authorization.starts_with("api_key=\"key\", algorithm=\"hmac-sha256\""));
        assert!(authorization.contains("headers=\"host date request-line\""));
    }
}
