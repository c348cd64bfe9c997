use serde::Serialize;

use crate::error::MpcError;

/// Signer contract method that starts a signature request.
pub const SIGN_METHOD: &str = "sign";

/// Signer contract view method returning the root public key.
pub const PUBLIC_KEY_METHOD: &str = "public_key";

/// Gas attached to a `sign` call: 300 Tgas.
pub const DEFAULT_SIGN_GAS: u64 = 300_000_000_000_000;

/// Deposit attached to a `sign` call, in NEAR display units.
pub const DEFAULT_SIGN_DEPOSIT: &str = "0.5";

/// Fractional digits of one NEAR expressed in yoctoNEAR.
const NEAR_NOMINATION_EXP: usize = 24;

/// A request for the MPC network to sign one 32-byte payload with the key
/// selected by `path`.
///
/// `payload` serializes as a JSON array of 32 integers in `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignRequest {
    pub payload: [u8; 32],
    pub path: String,
    pub key_version: u32,
}

#[derive(Serialize)]
struct SignArgs<'a> {
    request: &'a SignRequest,
}

impl SignRequest {
    pub fn new(payload: [u8; 32], path: impl Into<String>, key_version: u32) -> Self {
        Self {
            payload,
            path: path.into(),
            key_version,
        }
    }

    /// JSON arguments for the `sign` method: `{"request": {...}}`.
    pub fn to_args_json(&self) -> Result<Vec<u8>, MpcError> {
        serde_json::to_vec(&SignArgs { request: self })
            .map_err(|e| MpcError::EncodingError(format!("sign request: {e}")))
    }
}

/// Converts a NEAR amount in display units (e.g. `"0.5"`) to yoctoNEAR.
pub fn parse_near_amount(amount: &str) -> Result<u128, MpcError> {
    let amount = amount.trim().replace(',', "");
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount.as_str(), ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(MpcError::InvalidAmount("empty amount".into()));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(MpcError::InvalidAmount(format!("not a decimal number: {amount}")));
    }
    if fraction.len() > NEAR_NOMINATION_EXP {
        return Err(MpcError::InvalidAmount(format!(
            "more than {NEAR_NOMINATION_EXP} fractional digits: {amount}"
        )));
    }

    let digits = format!("{whole}{fraction:0<NEAR_NOMINATION_EXP$}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<u128>()
        .map_err(|_| MpcError::InvalidAmount(format!("amount overflows: {amount}")))
}
