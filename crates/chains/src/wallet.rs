//! Credential generation and per-rail wallet derivation.
//!
//! All three addresses come from a single BIP39 seed:
//!
//! | Rail | Path | Encoding |
//! |------|------|----------|
//! | Bitcoin intermediate | `m/84'/{0,1}'/0'/0/0` | P2WPKH |
//! | Ethereum return | `m/44'/60'/0'/0/0` | keccak256(pubkey)[12..], `0x` hex |
//! | Cosmos claim | `m/44'/118'/0'/0/0` | hash160(pubkey), hex |

use std::str::FromStr;

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, PublicKey, Secp256k1};
use bitcoin::{Address, CompressedPublicKey};
use common::{Credential, FundraiserError, VerifiedCredential, Wallet, WalletAddresses, WalletService};
use rand::RngCore;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::bitcoin::BitcoinNetwork;
use crate::ethereum::keccak256;

/// Entropy for a 12-word mnemonic.
const ENTROPY_BYTES: usize = 16;

const ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";
const COSMOS_PATH: &str = "m/44'/118'/0'/0/0";

/// HASH160: RIPEMD160(SHA256(data)).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha256_hash = Sha256::digest(data);
    let ripemd_hash = Ripemd160::digest(sha256_hash);

    let mut output = [0u8; 20];
    output.copy_from_slice(&ripemd_hash);
    output
}

/// Ethereum address of an uncompressed secp256k1 public key, lower-case.
pub fn ethereum_address(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Cosmos claim address (hash160 of the compressed key), hex without prefix.
pub fn cosmos_address(public_key: &PublicKey) -> String {
    hex::encode(hash160(&public_key.serialize()))
}

/// BIP39 wallets for the fundraiser.
pub struct Bip39WalletService {
    network: BitcoinNetwork,
    secp: Secp256k1<All>,
}

impl Bip39WalletService {
    pub fn new(network: BitcoinNetwork) -> Self {
        Self {
            network,
            secp: Secp256k1::new(),
        }
    }

    fn bitcoin_path(&self) -> String {
        format!("m/84'/{}'/0'/0/0", self.network.coin_type())
    }

    fn derive_key(&self, master: &Xpriv, path: &str) -> Result<Xpriv, FundraiserError> {
        let path = DerivationPath::from_str(path)
            .map_err(|e| FundraiserError::Derivation(format!("Invalid path {}: {}", path, e)))?;
        master
            .derive_priv(&self.secp, &path)
            .map_err(|e| FundraiserError::Derivation(e.to_string()))
    }
}

impl WalletService for Bip39WalletService {
    fn generate_credential(&self) -> Result<Credential, FundraiserError> {
        let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
        rand::thread_rng().fill_bytes(&mut entropy[..]);

        let mnemonic = bip39::Mnemonic::from_entropy(&entropy[..])
            .map_err(|e| FundraiserError::Derivation(format!("Mnemonic generation: {}", e)))?;

        Ok(Credential::new(mnemonic.to_string()))
    }

    fn derive_wallet(&self, credential: &VerifiedCredential) -> Result<Wallet, FundraiserError> {
        let mnemonic = bip39::Mnemonic::parse(credential.phrase())
            .map_err(|e| FundraiserError::Derivation(format!("Invalid mnemonic: {}", e)))?;
        let seed = Zeroizing::new(mnemonic.to_seed(""));

        let master = Xpriv::new_master(self.network.to_bitcoin_network(), &seed[..])
            .map_err(|e| FundraiserError::Derivation(e.to_string()))?;

        let btc = self.derive_key(&master, &self.bitcoin_path())?;
        let btc_key = btc.to_priv();
        let btc_pubkey = CompressedPublicKey(btc.private_key.public_key(&self.secp));
        let bitcoin_address = Address::p2wpkh(&btc_pubkey, self.network.to_bitcoin_network());

        let eth = self.derive_key(&master, ETHEREUM_PATH)?;
        let cosmos = self.derive_key(&master, COSMOS_PATH)?;

        let addresses = WalletAddresses {
            bitcoin: bitcoin_address.to_string(),
            ethereum: ethereum_address(&eth.private_key.public_key(&self.secp)),
            cosmos: cosmos_address(&cosmos.private_key.public_key(&self.secp)),
        };

        tracing::debug!("Derived wallet addresses: {:?}", addresses);

        Ok(Wallet::new(addresses, btc_key))
    }
}
