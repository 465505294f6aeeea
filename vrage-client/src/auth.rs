//! Request signing for the VRage Remote API.
//!
//! Every request carries a `Date` header, a fresh random nonce and an
//! HMAC-SHA1 over `path\r\nnonce\r\ndate\r\n`, sent as
//! `Authorization: <nonce>:<base64 signature>`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, DATE};
use ring::hmac;

use crate::credential::Credential;
use crate::error::Result;

/// Exclusive upper bound for generated nonces (2^31).
pub const NONCE_UPPER_BOUND: u32 = 1 << 31;

const RFC1123_GMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Everything that goes into one request's signature.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub path: String,
    pub nonce: u32,
    pub date: String,
    pub signature: String,
}

impl SignedRequest {
    /// Sign `path` with a new nonce and the current time.
    pub fn new(credential: &Credential, path: &str) -> Self {
        let nonce = generate_nonce();
        let date = format_date(Utc::now());
        let signature = sign(credential, path, nonce, &date);
        Self {
            path: path.to_string(),
            nonce,
            date,
            signature,
        }
    }

    pub fn authorization(&self) -> String {
        format!("{}:{}", self.nonce, self.signature)
    }

    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(DATE, HeaderValue::from_str(&self.date)?);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&self.authorization())?);
        Ok(headers)
    }
}

pub fn canonical_message(path: &str, nonce: u32, date: &str) -> String {
    format!("{}\r\n{}\r\n{}\r\n", path, nonce, date)
}

/// base64(HMAC-SHA1(key, canonical message)).
pub fn sign(credential: &Credential, path: &str, nonce: u32, date: &str) -> String {
    let message = canonical_message(path, nonce, date);
    let tag = hmac::sign(credential.hmac_key(), message.as_bytes());
    STANDARD.encode(tag.as_ref())
}

pub fn generate_nonce() -> u32 {
    rand::rng().random_range(0..NONCE_UPPER_BOUND)
}

/// RFC1123 with the zone spelled `GMT`, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
pub fn format_date(now: DateTime<Utc>) -> String {
    now.format(RFC1123_GMT).to_string()
}

/// Headers for a single request. Never reuse the result across requests.
pub fn build_headers(credential: &Credential, path: &str) -> Result<HeaderMap> {
    SignedRequest::new(credential, path).headers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DATE_SAMPLE: &str = "Mon, 02 Jan 2006 15:04:05 GMT";

    #[test]
    fn test_canonical_message_layout() {
        let msg = canonical_message("/vrageremote/v1/server", 42, DATE_SAMPLE);
        assert_eq!(
            msg,
            "/vrageremote/v1/server\r\n42\r\nMon, 02 Jan 2006 15:04:05 GMT\r\n"
        );
    }

    #[test]
    fn test_sign_known_vector() {
        // HMAC-SHA1("key", "The quick brown fox jumps over the lazy dog")
        // = de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9
        let credential = Credential::from_bytes(b"key");
        let tag = hmac::sign(
            credential.hmac_key(),
            b"The quick brown fox jumps over the lazy dog",
        );
        let hex: String = tag.as_ref().iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(hex, "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9");
    }

    #[test]
    fn test_sign_is_deterministic() {
        let credential = Credential::from_bytes(b"secret");
        let a = sign(&credential, "/v1/server", 7, DATE_SAMPLE);
        let b = sign(&credential, "/v1/server", 7, DATE_SAMPLE);
        assert_eq!(a, b);
        // 20-byte digest -> 28 base64 chars
        assert_eq!(a.len(), 28);
    }

    #[test]
    fn test_sign_depends_on_every_input() {
        let credential = Credential::from_bytes(b"secret");
        let other_key = Credential::from_bytes(b"secreT");
        let base = sign(&credential, "/v1/server", 7, DATE_SAMPLE);

        assert_ne!(base, sign(&other_key, "/v1/server", 7, DATE_SAMPLE));
        assert_ne!(base, sign(&credential, "/v1/server/ping", 7, DATE_SAMPLE));
        assert_ne!(base, sign(&credential, "/v1/server", 8, DATE_SAMPLE));
        assert_ne!(
            base,
            sign(&credential, "/v1/server", 7, "Mon, 02 Jan 2006 15:04:06 GMT")
        );
    }

    #[test]
    fn test_nonce_range() {
        for _ in 0..10_000 {
            assert!(generate_nonce() < NONCE_UPPER_BOUND);
        }
    }

    #[test]
    fn test_format_date_rfc1123() {
        let t = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(format_date(t), DATE_SAMPLE);
    }

    #[test]
    fn test_headers_are_fresh_per_request() {
        let credential = Credential::from_bytes(b"secret");
        let first = build_headers(&credential, "/v1/server").unwrap();
        assert_eq!(first.get(ACCEPT).unwrap(), "application/json");
        assert!(first.get(DATE).is_some());

        // Two requests sharing a nonce is a 1 in 2^31 event per pair; try a few.
        let auths: std::collections::HashSet<String> = (0..8)
            .map(|_| {
                build_headers(&credential, "/v1/server")
                    .unwrap()
                    .get(AUTHORIZATION)
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert!(auths.len() > 1);
    }

    #[test]
    fn test_authorization_matches_signature() {
        let credential = Credential::from_bytes(b"secret");
        let req = SignedRequest::new(&credential, "/vrageremote/v1/server");
        let authorization = req.authorization();
        let (nonce, signature) = authorization.split_once(':').unwrap();
        let nonce = nonce.parse::<u32>().unwrap();
        assert_eq!(nonce, req.nonce);
        assert_eq!(signature, sign(&credential, &req.path, nonce, &req.date));
    }
}
