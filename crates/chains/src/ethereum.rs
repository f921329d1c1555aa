//! Ethereum side of the fundraiser: rate lookup and donation call encoding.
//!
//! Nothing here signs or sends. The donor pastes the encoded call into their
//! own wallet.

use std::time::Duration;

use async_trait::async_trait;
use common::{EthTransaction, EthereumService, FundraiserError};
use serde::Deserialize;
use serde_json::json;
use sha3::{Digest, Keccak256};
use tracing::debug;

/// Signature of the contract's donation entry point.
pub const DONATE_SIGNATURE: &str = "donate(address,address,bytes4)";

/// Signature of the contract's price getter.
pub const WEI_PER_ATOM_SIGNATURE: &str = "weiPerAtom()";

/// Default gas limit for the donation call.
pub const DEFAULT_GAS_LIMIT: u64 = 150_000;

const WORD_LEN: usize = 32;
const ADDRESS_LEN: usize = 20;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// First four bytes of the keccak256 of a function signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Parse a 20-byte address, with or without `0x`.
pub fn parse_address(address: &str) -> Result<[u8; ADDRESS_LEN], FundraiserError> {
    let raw = hex::decode(address.trim().trim_start_matches("0x"))
        .map_err(|e| FundraiserError::Instruction(format!("Invalid address {}: {}", address, e)))?;

    raw.try_into().map_err(|raw: Vec<u8>| {
        FundraiserError::Instruction(format!(
            "Address {} must be {} bytes, got {}",
            address,
            ADDRESS_LEN,
            raw.len()
        ))
    })
}

/// Checksum binding the claim address to the return address.
pub fn donation_checksum(claim: &[u8; ADDRESS_LEN], ret: &[u8; ADDRESS_LEN]) -> [u8; 4] {
    let mut preimage = Vec::with_capacity(ADDRESS_LEN * 2);
    preimage.extend_from_slice(claim);
    preimage.extend_from_slice(ret);
    let hash = keccak256(&preimage);
    [hash[0], hash[1], hash[2], hash[3]]
}

fn left_pad(bytes: &[u8]) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - bytes.len()..].copy_from_slice(bytes);
    word
}

fn right_pad(bytes: &[u8]) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[..bytes.len()].copy_from_slice(bytes);
    word
}

/// ABI-encode `donate(claim, return, checksum)`, `0x`-prefixed.
pub fn encode_donate_call(claim_address: &str, return_address: &str) -> Result<String, FundraiserError> {
    if claim_address.trim().is_empty() {
        return Err(FundraiserError::Instruction("claim address is missing".to_string()));
    }
    let claim = parse_address(claim_address)?;
    let ret = parse_address(return_address)?;
    let checksum = donation_checksum(&claim, &ret);

    let mut data = Vec::with_capacity(4 + 3 * WORD_LEN);
    data.extend_from_slice(&function_selector(DONATE_SIGNATURE));
    data.extend_from_slice(&left_pad(&claim));
    data.extend_from_slice(&left_pad(&ret));
    data.extend_from_slice(&right_pad(&checksum));

    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode a uint256 return value that must fit in a u128.
pub fn decode_uint(result: &str) -> Result<u128, FundraiserError> {
    let digits = result.trim().trim_start_matches("0x").trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 32 {
        return Err(FundraiserError::ExchangeRate(format!("Value out of range: {}", result)));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| FundraiserError::ExchangeRate(format!("Invalid uint {}: {}", result, e)))
}

/// Decode the `weiPerAtom()` return value. A zero price cannot be inverted.
fn parse_wei_per_atom(result: &str) -> Result<u128, FundraiserError> {
    let wei = decode_uint(result)?;
    if wei == 0 {
        return Err(FundraiserError::Contract(
            "Contract reports a zero price".to_string(),
        ));
    }
    Ok(wei)
}

// ============================================================================
// JSON-RPC client
// ============================================================================

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Minimal Ethereum JSON-RPC client (read-only calls).
#[derive(Clone)]
pub struct EthereumRpcClient {
    url: String,
    client: reqwest::Client,
}

impl EthereumRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FundraiserError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FundraiserError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// `eth_call` against the latest block, returning the raw hex result.
    pub async fn call(&self, to: &str, data: &str) -> Result<String, FundraiserError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| FundraiserError::ExchangeRate(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FundraiserError::ExchangeRate(format!(
                "RPC error {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| FundraiserError::ExchangeRate(format!("Invalid RPC response: {}", e)))?;

        parse_rpc_response(body)
    }
}

/// RPC-level errors are rejections by the contract, not transport failures.
fn parse_rpc_response(body: RpcResponse) -> Result<String, FundraiserError> {
    if let Some(err) = body.error {
        return Err(FundraiserError::Contract(format!(
            "RPC error {}: {}",
            err.code, err.message
        )));
    }
    body.result
        .ok_or_else(|| FundraiserError::ExchangeRate("RPC response has no result".to_string()))
}

// ============================================================================
// Fundraiser contract
// ============================================================================

/// The campaign's donation contract.
pub struct FundraiserContract {
    rpc: EthereumRpcClient,
    address: String,
    gas_limit: u64,
}

impl FundraiserContract {
    pub fn new(rpc: EthereumRpcClient, address: impl Into<String>) -> Self {
        Self {
            rpc,
            address: address.into(),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }
}

#[async_trait]
impl EthereumService for FundraiserContract {
    async fn fetch_wei_per_atom(&self) -> Result<u128, FundraiserError> {
        let data = format!("0x{}", hex::encode(function_selector(WEI_PER_ATOM_SIGNATURE)));
        let result = self.rpc.call(&self.address, &data).await?;
        let wei = parse_wei_per_atom(&result)?;
        debug!("weiPerAtom = {}", wei);
        Ok(wei)
    }

    fn build_payload(
        &self,
        claim_address: &str,
        return_address: &str,
    ) -> Result<EthTransaction, FundraiserError> {
        Ok(EthTransaction {
            to: self.address.clone(),
            gas: self.gas_limit,
            data: encode_donate_call(claim_address, return_address)?,
        })
    }
}
