use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};
use sha3::{Digest, Keccak256};

use crate::address::parse_address;
use crate::error::EthError;
use crate::signature::{eip155_v, ChainSignature, MAX_CHAIN_ID};

/// EIP-2718 type byte of an EIP-1559 transaction.
pub const TX_TYPE_EIP1559: u8 = 0x02;

/// An EIP-2930 access list entry.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct AccessListItem {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

/// Gas limit and EIP-1559 fee caps for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
}

/// An unsigned EIP-1559 (type 2) transaction.
///
/// Field order is the canonical RLP order; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct Eip1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub to: Address,
    /// Transfer value in wei.
    pub value: U256,
    /// Calldata (empty for plain value transfers).
    pub data: Bytes,
    pub access_list: Vec<AccessListItem>,
}

/// A signed EIP-1559 transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEip1559Transaction {
    pub tx: Eip1559Transaction,
    pub signature: ChainSignature,
    /// `0x02 || rlp(signed fields)`.
    pub raw_tx: Vec<u8>,
    /// Keccak-256 of `raw_tx`, 0x-prefixed.
    pub tx_hash: String,
}

/// Builds an unsigned EIP-1559 contract call (or plain transfer when `data`
/// is empty).
pub fn build_call(
    chain_id: u64,
    nonce: u64,
    to: &str,
    value: U256,
    data: Vec<u8>,
    fees: FeeParams,
    access_list: Vec<AccessListItem>,
) -> Result<Eip1559Transaction, EthError> {
    let to = parse_address(to)?;

    if chain_id == 0 || chain_id > MAX_CHAIN_ID {
        return Err(EthError::TransactionBuildError(format!(
            "chain id {chain_id} is outside 1..={MAX_CHAIN_ID}"
        )));
    }

    if fees.max_priority_fee_per_gas > fees.max_fee_per_gas {
        return Err(EthError::TransactionBuildError(format!(
            "max priority fee {} exceeds max fee {}",
            fees.max_priority_fee_per_gas, fees.max_fee_per_gas
        )));
    }
    if fees.gas_limit == 0 {
        return Err(EthError::TransactionBuildError("gas limit must be non-zero".into()));
    }

    Ok(Eip1559Transaction {
        chain_id,
        nonce,
        max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        max_fee_per_gas: fees.max_fee_per_gas,
        gas_limit: fees.gas_limit,
        to,
        value,
        data: data.into(),
        access_list,
    })
}

/// Encodes the unsigned transaction as `0x02 || rlp(fields)`.
///
/// The RLP-encoded fields are:
/// `[chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to,
///   value, data, access_list]`
pub fn encode_unsigned(tx: &Eip1559Transaction) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + tx.length());
    payload.push(TX_TYPE_EIP1559);
    tx.encode(&mut payload);
    payload
}

/// Keccak-256 of the unsigned encoding: the 32 bytes that get signed.
pub fn signing_hash(tx: &Eip1559Transaction) -> [u8; 32] {
    Keccak256::digest(encode_unsigned(tx)).into()
}

/// Attaches a signature and produces the broadcastable encoding
/// `0x02 || rlp([..unsigned fields, y_parity, r, s])`.
///
/// `signature.v` must be an EIP-155 value for `tx.chain_id`; typed
/// transactions only carry the parity bit on the wire.
pub fn attach_signature(
    tx: &Eip1559Transaction,
    signature: ChainSignature,
) -> Result<SignedEip1559Transaction, EthError> {
    let y_parity = signature.y_parity(tx.chain_id)?;

    let fields = SignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
        max_fee_per_gas: tx.max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        access_list: tx.access_list.clone(),
        y_parity: y_parity == 1,
        r: U256::from_be_bytes(signature.r.0),
        s: U256::from_be_bytes(signature.s.0),
    };

    let mut raw_tx = Vec::with_capacity(1 + fields.length());
    raw_tx.push(TX_TYPE_EIP1559);
    fields.encode(&mut raw_tx);

    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));

    Ok(SignedEip1559Transaction {
        tx: tx.clone(),
        signature,
        raw_tx,
        tx_hash,
    })
}

/// Decodes a broadcastable signed transaction back into its parts.
pub fn decode_signed(bytes: &[u8]) -> Result<SignedEip1559Transaction, EthError> {
    let mut body = strip_type_byte(bytes)?;
    let fields = SignedTxFields::decode(&mut body)?;
    ensure_consumed(body)?;

    let signature = ChainSignature {
        r: B256::from(fields.r.to_be_bytes::<32>()),
        s: B256::from(fields.s.to_be_bytes::<32>()),
        v: eip155_v(fields.y_parity as u8, fields.chain_id)?,
    };
    let tx = Eip1559Transaction {
        chain_id: fields.chain_id,
        nonce: fields.nonce,
        max_priority_fee_per_gas: fields.max_priority_fee_per_gas,
        max_fee_per_gas: fields.max_fee_per_gas,
        gas_limit: fields.gas_limit,
        to: fields.to,
        value: fields.value,
        data: fields.data,
        access_list: fields.access_list,
    };

    Ok(SignedEip1559Transaction {
        tx,
        signature,
        raw_tx: bytes.to_vec(),
        tx_hash: format!("0x{}", hex::encode(Keccak256::digest(bytes))),
    })
}

/// Signed EIP-1559 transaction fields for RLP encoding.
#[derive(RlpEncodable, RlpDecodable)]
struct SignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: Address,
    value: U256,
    data: Bytes,
    access_list: Vec<AccessListItem>,
    y_parity: bool,
    r: U256,
    s: U256,
}

fn strip_type_byte(bytes: &[u8]) -> Result<&[u8], EthError> {
    match bytes.split_first() {
        Some((&TX_TYPE_EIP1559, body)) => Ok(body),
        Some((ty, _)) => Err(EthError::DecodingError(format!(
            "expected transaction type 0x02, got {ty:#04x}"
        ))),
        None => Err(EthError::DecodingError("empty transaction bytes".into())),
    }
}

fn ensure_consumed(rest: &[u8]) -> Result<(), EthError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(EthError::DecodingError(format!(
            "{} trailing bytes after transaction",
            rest.len()
        )))
    }
}
