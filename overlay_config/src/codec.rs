//! Decoding of entry values marked `encrypt="true"`.
//!
//! Codecs are selected through the [`CodecKind`] tag so configuration can name
//! one by string; applications with their own scheme implement
//! [`SecretCodec`] and inject it directly.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::OverlayError;

/// Failure reported by a codec.
pub type CodecError = Box<dyn Error + Send + Sync>;

/// Turns an encoded entry value back into plain text.
pub trait SecretCodec: fmt::Debug + Send + Sync {
    /// Decode `encoded`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when `encoded` is not valid for this codec.
    fn decode(&self, encoded: &str) -> Result<String, CodecError>;
}

/// Standard base64 with UTF-8 payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl SecretCodec for Base64Codec {
    fn decode(&self, encoded: &str) -> Result<String, CodecError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Refuses every encoded value, for deployments that forbid them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectCodec;

impl SecretCodec for RejectCodec {
    fn decode(&self, _encoded: &str) -> Result<String, CodecError> {
        Err("encoded values are not accepted by this deployment".into())
    }
}

/// Built-in codecs addressable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// [`Base64Codec`].
    #[default]
    Base64,
    /// [`RejectCodec`].
    Reject,
}

impl CodecKind {
    /// Configuration spelling of this codec.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Reject => "reject",
        }
    }

    /// Instantiate the codec.
    #[must_use]
    pub fn build(self) -> Arc<dyn SecretCodec> {
        match self {
            Self::Base64 => Arc::new(Base64Codec),
            Self::Reject => Arc::new(RejectCodec),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(Self::Base64),
            "reject" => Ok(Self::Reject),
            _ => Err(OverlayError::UnknownCodec(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use rstest::rstest;

    use super::{CodecKind, SecretCodec};
    use crate::OverlayError;

    #[rstest]
    #[case("base64", CodecKind::Base64)]
    #[case(" Reject ", CodecKind::Reject)]
    fn parses_codec_tags(#[case] tag: &str, #[case] expected: CodecKind) {
        assert_eq!(tag.parse::<CodecKind>().ok(), Some(expected));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let err = "rot13".parse::<CodecKind>().expect_err("unknown codec");
        assert!(matches!(err, OverlayError::UnknownCodec(ref tag) if tag == "rot13"));
    }

    #[test]
    fn base64_decodes_utf8_payloads() {
        let codec = CodecKind::Base64.build();
        assert_eq!(codec.decode("c2VjcmV0").ok().as_deref(), Some("secret"));
        assert!(codec.decode("***").is_err());
    }

    #[test]
    fn reject_refuses_everything() {
        assert!(CodecKind::Reject.build().decode("c2VjcmV0").is_err());
    }
}
