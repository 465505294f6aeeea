//! Secret key used to sign requests to the remote API.
//!
//! The key is handed out by the dedicated server as a base64 string and is
//! decoded exactly once, either from an inline value or from a key file.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::hmac;
use std::fmt;
use std::path::Path;

use crate::error::CredentialError;

/// Decoded secret key. Immutable for the lifetime of the process.
pub struct Credential {
    key: hmac::Key,
    len: usize,
}

impl Credential {
    /// Resolve the key from a file path or an inline value.
    ///
    /// The file wins when both are given. Empty or blank values count as
    /// absent.
    pub fn resolve(
        inline: Option<&str>,
        key_file: Option<&Path>,
    ) -> Result<Self, CredentialError> {
        let key_file = key_file.filter(|p| !p.as_os_str().is_empty());
        let inline = inline.map(str::trim).filter(|k| !k.is_empty());

        match (key_file, inline) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(key)) => Self::from_base64(key),
            (None, None) => Err(CredentialError::NoKeySpecified),
        }
    }

    /// Read a key file, trim surrounding whitespace and decode it.
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            CredentialError::FileUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_base64(contents.trim())
    }

    /// Decode a base64 key. A key that decodes to zero bytes is rejected.
    pub fn from_base64(encoded: &str) -> Result<Self, CredentialError> {
        let bytes = decode_secret_key(encoded)?;
        if bytes.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, bytes),
            len: bytes.len(),
        }
    }

    pub(crate) fn hmac_key(&self) -> &hmac::Key {
        &self.key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Decode a standard, padded base64 secret key.
pub fn decode_secret_key(encoded: &str) -> Result<Vec<u8>, CredentialError> {
    Ok(STANDARD.decode(encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_round_trip() {
        let raw: Vec<u8> = (0u8..=255).collect();
        let encoded = STANDARD.encode(&raw);
        assert_eq!(decode_secret_key(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let err = Credential::from_base64("not*base64!").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedKey(_)));
    }

    #[test]
    fn test_no_source_fails() {
        let err = Credential::resolve(None, None).unwrap_err();
        assert!(matches!(err, CredentialError::NoKeySpecified));

        let err = Credential::resolve(Some(""), Some(Path::new(""))).unwrap_err();
        assert!(matches!(err, CredentialError::NoKeySpecified));

        let err = Credential::resolve(Some("  \t"), None).unwrap_err();
        assert!(matches!(err, CredentialError::NoKeySpecified));
    }

    #[test]
    fn test_blank_key_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let err = Credential::resolve(Some("c2VjcmV0"), Some(file.path())).unwrap_err();
        assert!(matches!(err, CredentialError::EmptyKey));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err = Credential::from_base64("").unwrap_err();
        assert!(matches!(err, CredentialError::EmptyKey));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.key");
        let err = Credential::resolve(Some("c2VjcmV0"), Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, CredentialError::FileUnreadable { .. }));
    }

    #[test]
    fn test_file_takes_precedence_and_is_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  c2VjcmV0  ").unwrap();

        // The inline value is garbage; only the file must be consulted.
        let credential = Credential::resolve(Some("***"), Some(file.path())).unwrap();
        assert_eq!(credential.len, 6);
    }

    #[test]
    fn test_debug_hides_key() {
        let credential = Credential::from_bytes(b"secret");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("secret"));
    }
}
