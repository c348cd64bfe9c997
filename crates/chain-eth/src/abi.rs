//! Minimal ABI encoding for EVM function calls.
//!
//! Enough of the Solidity ABI to build calldata for simple contract calls
//! (static words plus `string`/`bytes` tails) without pulling in a full ABI
//! parser.

use alloy_primitives::Address;
use sha3::{Digest, Keccak256};

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte address, left-padded to 32 bytes.
    Address(Address),
    /// A 256-bit unsigned integer as a big-endian 32-byte array.
    Uint256([u8; 32]),
    Bool(bool),
    /// Dynamic UTF-8 string.
    String(String),
    /// Dynamic byte array.
    Bytes(Vec<u8>),
}

impl AbiParam {
    fn is_dynamic(&self) -> bool {
        matches!(self, AbiParam::String(_) | AbiParam::Bytes(_))
    }
}

/// Computes the 4-byte selector of a canonical function signature such as
/// `storeMessage(string)`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Encodes a call to `signature` with `params`.
pub fn encode_call(signature: &str, params: &[AbiParam]) -> Vec<u8> {
    encode_function_call(function_selector(signature), params)
}

/// Encodes a function call with the given 4-byte selector and ABI parameters.
///
/// Static parameters are written in place in the head. Dynamic parameters
/// write an offset word in the head and their length-prefixed, right-padded
/// body in the tail.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let head_len = params.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for param in params {
        if param.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
            tail.extend_from_slice(&encode_dynamic(param));
        } else {
            head.extend_from_slice(&encode_static(param));
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

fn encode_static(param: &AbiParam) -> [u8; 32] {
    match param {
        AbiParam::Address(addr) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr.as_slice());
            word
        }
        AbiParam::Uint256(value) => *value,
        AbiParam::Bool(flag) => uint_word(u64::from(*flag)),
        AbiParam::String(_) | AbiParam::Bytes(_) => [0u8; 32],
    }
}

fn encode_dynamic(param: &AbiParam) -> Vec<u8> {
    let body: &[u8] = match param {
        AbiParam::String(s) => s.as_bytes(),
        AbiParam::Bytes(b) => b,
        _ => &[],
    };

    let padded_len = body.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded_len);
    out.extend_from_slice(&uint_word(body.len() as u64));
    out.extend_from_slice(body);
    out.resize(32 + padded_len, 0);
    out
}

fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
