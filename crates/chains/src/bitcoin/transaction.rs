//! Final transaction building and signing for the BTC rail.
//!
//! The final transaction spends every UTXO received at the intermediate
//! address and creates two outputs:
//! 1. the campaign (exodus) address, receiving everything minus the fee
//! 2. an OP_RETURN carrying the donor's 20-byte claim address

use std::str::FromStr;

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{
    absolute, Address, Amount, CompressedPublicKey, OutPoint, ScriptBuf, Sequence, Transaction,
    TxIn, TxOut, Txid, Witness,
};
use common::{FeeRate, FinalTransaction, FundraiserError, PaymentInputs, SignedTransaction, Utxo, Wallet};

use super::client::BitcoinNetwork;

/// Maximum size for OP_RETURN data (standardness rule).
pub const MAX_OP_RETURN_SIZE: usize = 80;

/// Dust limit in satoshis (546 sats for P2WPKH).
pub const DUST_LIMIT: u64 = 546;

/// Length of a claim address in bytes.
pub const CLAIM_ADDRESS_LEN: usize = 20;

// P2WPKH size estimates in vbytes
const BASE_SIZE: u64 = 10; // version + locktime + overhead
const INPUT_SIZE: u64 = 68; // P2WPKH input (witness data)
const OUTPUT_OVERHEAD: u64 = 9; // value + script length
const OP_RETURN_OVERHEAD: u64 = 11; // value + script length + OP_RETURN + push

/// Campaign-side parameters of the final transaction.
#[derive(Debug, Clone)]
pub struct FinalTxParams {
    /// Campaign address receiving the donation.
    pub exodus_address: String,
    pub network: BitcoinNetwork,
    /// Suggested allocation rate, atoms per whole BTC.
    pub atoms_per_btc: u64,
}

/// Estimated virtual size of the final transaction.
///
/// `destination_script_len` is the campaign output's script length: 22 for
/// P2WPKH, 23 for P2SH, 25 for P2PKH, 34 for P2TR.
pub fn estimate_vsize(num_inputs: usize, destination_script_len: usize, op_return_len: usize) -> u64 {
    BASE_SIZE
        + num_inputs as u64 * INPUT_SIZE
        + OUTPUT_OVERHEAD
        + destination_script_len as u64
        + OP_RETURN_OVERHEAD
        + op_return_len as u64
}

/// Decode a hex claim address into its raw 20 bytes.
pub fn claim_address_bytes(claim_address: &str) -> Result<[u8; CLAIM_ADDRESS_LEN], FundraiserError> {
    let raw = hex::decode(claim_address.trim().trim_start_matches("0x"))
        .map_err(|e| FundraiserError::TransactionBuild(format!("Invalid claim address: {}", e)))?;

    raw.try_into().map_err(|raw: Vec<u8>| {
        FundraiserError::TransactionBuild(format!(
            "Claim address must be {} bytes, got {}",
            CLAIM_ADDRESS_LEN,
            raw.len()
        ))
    })
}

/// Build the unsigned final transaction.
///
/// Deterministic: inputs are put in canonical (txid, vout) order, so the same
/// UTXO set and fee rate always produce the same transaction.
pub fn build_final_transaction(
    inputs: &PaymentInputs,
    fee_rate: FeeRate,
    params: &FinalTxParams,
    claim_address: &str,
) -> Result<FinalTransaction, FundraiserError> {
    if inputs.utxos.is_empty() {
        return Err(FundraiserError::TransactionBuild("No UTXOs available".to_string()));
    }

    let claim = claim_address_bytes(claim_address)?;

    let mut utxos: Vec<Utxo> = inputs.utxos.clone();
    utxos.sort_by(|a, b| a.txid.cmp(&b.txid).then(a.vout.cmp(&b.vout)));

    let destination = Address::from_str(&params.exodus_address)
        .map_err(|e| FundraiserError::TransactionBuild(format!("Invalid exodus address: {}", e)))?
        .require_network(params.network.to_bitcoin_network())
        .map_err(|e| FundraiserError::TransactionBuild(format!("Invalid exodus address: {}", e)))?;
    let destination_script = destination.script_pubkey();

    let total_input: u64 = utxos.iter().map(|u| u.value).sum();
    let vsize = estimate_vsize(utxos.len(), destination_script.len(), claim.len());
    let fee_sats = fee_rate.sat_per_vb().saturating_mul(vsize);

    let paid_sats = total_input.checked_sub(fee_sats).ok_or_else(|| {
        FundraiserError::TransactionBuild(format!(
            "Insufficient funds: have {} sats, fee is {} sats",
            total_input, fee_sats
        ))
    })?;

    if paid_sats < DUST_LIMIT {
        return Err(FundraiserError::TransactionBuild(format!(
            "Donation of {} sats after fees is below the dust limit",
            paid_sats
        )));
    }

    let mut tx_inputs = Vec::with_capacity(utxos.len());
    for utxo in &utxos {
        let txid = Txid::from_str(&utxo.txid)
            .map_err(|e| FundraiserError::TransactionBuild(format!("Invalid txid: {}", e)))?;

        tx_inputs.push(TxIn {
            previous_output: OutPoint {
                txid,
                vout: utxo.vout,
            },
            script_sig: ScriptBuf::new(), // Empty for SegWit
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::default(), // Filled during signing
        });
    }

    let tx_outputs = vec![
        TxOut {
            value: Amount::from_sat(paid_sats),
            script_pubkey: destination_script,
        },
        TxOut {
            value: Amount::ZERO,
            script_pubkey: create_op_return_script(&claim)?,
        },
    ];

    let tx = Transaction {
        version: Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input: tx_inputs,
        output: tx_outputs,
    };

    let suggested_atoms = paid_sats as f64 / common::SATS_PER_BTC as f64 * params.atoms_per_btc as f64;

    tracing::debug!(
        "Built final transaction: {} inputs, paid {} sats, fee {} sats ({} vB)",
        utxos.len(),
        paid_sats,
        fee_sats,
        vsize
    );

    Ok(FinalTransaction {
        paid_sats,
        fee_sats,
        suggested_atoms,
        destination: destination.to_string(),
        claim_address: claim_address.to_string(),
        inputs: utxos,
        tx,
    })
}

/// Create an OP_RETURN script embedding `data`.
fn create_op_return_script(data: &[u8]) -> Result<ScriptBuf, FundraiserError> {
    use bitcoin::opcodes;
    use bitcoin::script::PushBytesBuf;

    if data.len() > MAX_OP_RETURN_SIZE {
        return Err(FundraiserError::TransactionBuild(format!(
            "OP_RETURN data too large: {} bytes (max {})",
            data.len(),
            MAX_OP_RETURN_SIZE
        )));
    }

    let push_bytes = PushBytesBuf::try_from(data.to_vec())
        .map_err(|e| FundraiserError::TransactionBuild(format!("OP_RETURN data: {}", e)))?;

    Ok(bitcoin::script::Builder::new()
        .push_opcode(opcodes::all::OP_RETURN)
        .push_slice(&push_bytes)
        .into_script())
}

/// Sign every input of the final transaction with the wallet's intermediate key.
pub fn sign_final_transaction(
    wallet: &Wallet,
    final_tx: &FinalTransaction,
    network: BitcoinNetwork,
) -> Result<SignedTransaction, FundraiserError> {
    let secp = Secp256k1::new();
    let secret = wallet.bitcoin_key().inner;
    let public_key = CompressedPublicKey(secret.public_key(&secp));

    let own_address = Address::p2wpkh(&public_key, network.to_bitcoin_network());
    if own_address.to_string() != wallet.addresses().bitcoin {
        return Err(FundraiserError::Signing(
            "Wallet key does not control the intermediate address".to_string(),
        ));
    }
    let script_pubkey = own_address.script_pubkey();

    if final_tx.inputs.len() != final_tx.tx.input.len() {
        return Err(FundraiserError::Signing(format!(
            "Input count mismatch: {} UTXOs for {} inputs",
            final_tx.inputs.len(),
            final_tx.tx.input.len()
        )));
    }

    let mut tx = final_tx.tx.clone();
    let mut sighasher = SighashCache::new(&mut tx);

    for (i, utxo) in final_tx.inputs.iter().enumerate() {
        let sighash = sighasher
            .p2wpkh_signature_hash(
                i,
                &script_pubkey,
                Amount::from_sat(utxo.value),
                EcdsaSighashType::All,
            )
            .map_err(|e| FundraiserError::Signing(format!("Sighash error: {}", e)))?;

        let signature = bitcoin::ecdsa::Signature {
            signature: secp.sign_ecdsa(&Message::from(sighash), &secret),
            sighash_type: EcdsaSighashType::All,
        };

        let witness = sighasher
            .witness_mut(i)
            .ok_or_else(|| FundraiserError::Signing(format!("Missing input {}", i)))?;
        *witness = Witness::p2wpkh(&signature, &public_key.0);
    }

    let signed = sighasher.into_transaction();

    Ok(SignedTransaction {
        txid: signed.compute_txid().to_string(),
        hex: serialize_hex(&*signed),
    })
}
