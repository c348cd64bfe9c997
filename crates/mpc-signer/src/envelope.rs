use alloy_primitives::B256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::MpcError;

/// `R` as a SEC1 compressed point: a parity prefix byte followed by the
/// affine x-coordinate, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigR {
    pub affine_point: String,
}

/// The `s` scalar, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar {
    pub scalar: String,
}

/// The signer's response to a `sign` call.
///
/// `recovery_id` is advisory: the authoritative parity comes from local
/// recovery against the derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    pub big_r: BigR,
    pub s: Scalar,
    pub recovery_id: u8,
}

impl SignatureEnvelope {
    /// Decodes the base64 `SuccessValue` of a finished `sign` call.
    pub fn from_success_value(success_value: &str) -> Result<Self, MpcError> {
        let json = BASE64
            .decode(success_value.trim())
            .map_err(|e| MpcError::InvalidEnvelope(format!("invalid base64: {e}")))?;
        Self::from_json(&json)
    }

    /// Parses the UTF-8 JSON body of the response.
    pub fn from_json(json: &[u8]) -> Result<Self, MpcError> {
        let text = std::str::from_utf8(json)
            .map_err(|e| MpcError::InvalidEnvelope(format!("invalid utf-8: {e}")))?;
        serde_json::from_str(text)
            .map_err(|e| MpcError::InvalidEnvelope(format!("invalid json: {e}")))
    }

    /// `r`: the x-coordinate of `R` with its parity prefix stripped.
    pub fn r(&self) -> Result<B256, MpcError> {
        let point = strip_hex_prefix(&self.big_r.affine_point);
        if point.len() != 66 {
            return Err(MpcError::InvalidEnvelope(format!(
                "big_r must be 33 bytes of hex, got {} characters",
                point.len()
            )));
        }
        decode_word(&point[2..], "big_r")
    }

    /// `s`, left-padded to 32 bytes.
    pub fn s(&self) -> Result<B256, MpcError> {
        let scalar = strip_hex_prefix(&self.s.scalar);
        if scalar.is_empty() || scalar.len() > 64 {
            return Err(MpcError::InvalidEnvelope(format!(
                "s must be at most 32 bytes of hex, got {} characters",
                scalar.len()
            )));
        }
        decode_word(&format!("{scalar:0>64}"), "s")
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

fn decode_word(hex_str: &str, field: &str) -> Result<B256, MpcError> {
    let bytes = hex::decode(hex_str.to_lowercase())
        .map_err(|e| MpcError::InvalidEnvelope(format!("{field}: invalid hex: {e}")))?;
    if bytes.len() != 32 {
        return Err(MpcError::InvalidEnvelope(format!(
            "{field}: expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(B256::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const R_HEX: &str = "C9F4B0E27D1AB6F5A1F0E7E62E7E0F9A9A5B1C2D3E4F5061728394A5B6C7D8E9";
    const S_HEX: &str = "1A2B3C4D5E6F708192A3B4C5D6E7F8091A2B3C4D5E6F708192A3B4C5D6E7F809";

    fn envelope_json() -> String {
        format!(
            r#"{{"big_r":{{"affine_point":"03{R_HEX}"}},"s":{{"scalar":"{S_HEX}"}},"recovery_id":1}}"#
        )
    }

    #[test]
    fn parses_success_value() {
        let encoded = BASE64.encode(envelope_json());
        let envelope = SignatureEnvelope::from_success_value(&encoded).unwrap();

        assert_eq!(envelope.recovery_id, 1);
        assert_eq!(envelope.big_r.affine_point, format!("03{R_HEX}"));
        assert_eq!(envelope.s.scalar, S_HEX);
    }

    #[test]
    fn r_strips_parity_prefix_and_lowercases() {
        let envelope = SignatureEnvelope::from_json(envelope_json().as_bytes()).unwrap();
        let r = envelope.r().unwrap();
        assert_eq!(hex::encode(r), R_HEX.to_lowercase());
    }

    #[test]
    fn s_is_decoded_directly() {
        let envelope = SignatureEnvelope::from_json(envelope_json().as_bytes()).unwrap();
        assert_eq!(hex::encode(envelope.s().unwrap()), S_HEX.to_lowercase());
    }

    #[test]
    fn short_s_is_left_padded() {
        let mut envelope = SignatureEnvelope::from_json(envelope_json().as_bytes()).unwrap();
        envelope.s.scalar = "abcd".into();

        let s = envelope.s().unwrap();
        assert_eq!(&s[..30], &[0u8; 30]);
        assert_eq!(&s[30..], &[0xab, 0xcd]);
    }

    #[test]
    fn malformed_components_are_rejected() {
        let mut envelope = SignatureEnvelope::from_json(envelope_json().as_bytes()).unwrap();
        envelope.big_r.affine_point = R_HEX.into();
        assert!(matches!(envelope.r(), Err(MpcError::InvalidEnvelope(_))));

        envelope.s.scalar = "zz".into();
        assert!(envelope.s().is_err());

        envelope.s.scalar = format!("00{S_HEX}");
        assert!(envelope.s().is_err());
    }

    #[test]
    fn rejects_bad_base64_and_missing_fields() {
        assert!(SignatureEnvelope::from_success_value("not base64!").is_err());

        let missing = BASE64.encode(r#"{"big_r":{"affine_point":"02"}}"#);
        assert!(matches!(
            SignatureEnvelope::from_success_value(&missing),
            Err(MpcError::InvalidEnvelope(_))
        ));
    }
}
