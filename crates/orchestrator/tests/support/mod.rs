//! Fakes shared by the orchestrator integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use common::{
    BitcoinService, CampaignStatus, Credential, EthTransaction, EthereumService, FeeRate,
    FinalTransaction, FundraiserError, PaymentInputs, RetryPolicy, SignedTransaction,
    StatusService, Utxo, UtxoStatus, VerifiedCredential, Wallet, WalletAddresses, WalletService,
};
use orchestrator::{Console, DonationError, DonationParams, DonationSession, Services};

pub const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const CLAIM: &str = "00112233445566778899aabbccddeeff00112233";
pub const RETURN: &str = "0x9858effd232b4033e47d90003d41ec34ecaeda94";
pub const INTERMEDIATE: &str = "tb1qintermediate";
pub const EXODUS: &str = "tb1qexodus";
pub const TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

// ============================================================================
// Console
// ============================================================================

/// A scripted answer to the next prompt.
#[derive(Debug, Clone)]
pub enum Answer {
    Confirm(bool),
    Select(usize),
    Input(String),
    Acknowledge,
}

/// Everything the flow did to the console, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Prompt(String),
    Info(String),
    Warning(String),
    Success(String),
    Field(String, String),
    Highlight(String),
    SecretShown(String),
    SecretConcealed,
    ProgressStarted(String),
    ProgressFinished(Option<String>),
}

/// Console that replays scripted answers and records a transcript.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<Answer>,
    pub events: Vec<Event>,
}

impl ScriptedConsole {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            events: Vec::new(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Prompt(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Warning(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn field(&self, label: &str) -> Option<String> {
        self.events.iter().find_map(|e| match e {
            Event::Field(l, v) if l == label => Some(v.clone()),
            _ => None,
        })
    }

    /// All displayed text, for substring checks.
    pub fn output(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            match event {
                Event::Info(s) | Event::Warning(s) | Event::Success(s) | Event::Highlight(s) => {
                    out.push_str(s);
                }
                Event::Field(l, v) => {
                    out.push_str(l);
                    out.push_str(": ");
                    out.push_str(v);
                }
                _ => continue,
            }
            out.push('\n');
        }
        out
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer, DonationError> {
        self.events.push(Event::Prompt(prompt.to_string()));
        self.answers
            .pop_front()
            .ok_or_else(|| DonationError::Prompt(format!("no scripted answer for {:?}", prompt)))
    }

    fn unexpected(prompt: &str, answer: Answer) -> DonationError {
        DonationError::Prompt(format!("scripted {:?} does not fit {:?}", answer, prompt))
    }
}

impl Console for ScriptedConsole {
    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, DonationError> {
        match self.next(prompt)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(Self::unexpected(prompt, other)),
        }
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, DonationError> {
        match self.next(prompt)? {
            Answer::Select(index) if index < items.len() => Ok(index),
            other => Err(Self::unexpected(prompt, other)),
        }
    }

    fn input(&mut self, prompt: &str) -> Result<String, DonationError> {
        match self.next(prompt)? {
            Answer::Input(text) => Ok(text),
            other => Err(Self::unexpected(prompt, other)),
        }
    }

    fn acknowledge(&mut self, prompt: &str) -> Result<(), DonationError> {
        match self.next(prompt)? {
            Answer::Acknowledge | Answer::Input(_) => Ok(()),
            other => Err(Self::unexpected(prompt, other)),
        }
    }

    fn info(&mut self, message: &str) {
        self.events.push(Event::Info(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.events.push(Event::Warning(message.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.events.push(Event::Success(message.to_string()));
    }

    fn field(&mut self, label: &str, value: &str) {
        self.events
            .push(Event::Field(label.to_string(), value.to_string()));
    }

    fn highlight(&mut self, value: &str) {
        self.events.push(Event::Highlight(value.to_string()));
    }

    fn reveal_secret(&mut self, secret: &str, _warnings: &[&str]) {
        self.events.push(Event::SecretShown(secret.to_string()));
    }

    fn conceal_secret(&mut self) {
        self.events.push(Event::SecretConcealed);
    }

    fn start_progress(&mut self, message: &str) {
        self.events.push(Event::ProgressStarted(message.to_string()));
    }

    fn finish_progress(&mut self, message: Option<&str>) {
        self.events
            .push(Event::ProgressFinished(message.map(str::to_string)));
    }
}

// ============================================================================
// Services
// ============================================================================

/// Status endpoint that can fail a number of times before answering.
pub struct FakeStatus {
    status: CampaignStatus,
    failures: AtomicU32,
    pub calls: AtomicU32,
}

impl FakeStatus {
    pub fn new(started: bool, ended: bool) -> Self {
        Self {
            status: CampaignStatus { started, ended },
            failures: AtomicU32::new(0),
            calls: AtomicU32::new(0),
        }
    }

    pub fn active() -> Self {
        Self::new(true, false)
    }

    pub fn failing(mut self, times: u32) -> Self {
        self.failures = AtomicU32::new(times);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusService for FakeStatus {
    async fn fetch_status(&self) -> Result<CampaignStatus, FundraiserError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(FundraiserError::Status("503 Service Unavailable".into()));
        }
        Ok(self.status)
    }
}

/// Wallet service with a fixed credential and recorded derivations.
pub struct FakeWallet {
    phrase: String,
    pub generated: AtomicU32,
    pub derived: Mutex<Vec<String>>,
}

impl FakeWallet {
    pub fn new() -> Self {
        Self {
            phrase: PHRASE.to_string(),
            generated: AtomicU32::new(0),
            derived: Mutex::new(Vec::new()),
        }
    }

    pub fn generated(&self) -> u32 {
        self.generated.load(Ordering::SeqCst)
    }

    pub fn derived(&self) -> Vec<String> {
        self.derived.lock().unwrap().clone()
    }
}

pub fn test_wallet() -> Wallet {
    let secret = bitcoin::secp256k1::SecretKey::from_slice(&[1u8; 32]).unwrap();
    Wallet::new(
        WalletAddresses {
            bitcoin: INTERMEDIATE.to_string(),
            ethereum: RETURN.to_string(),
            cosmos: CLAIM.to_string(),
        },
        bitcoin::PrivateKey::new(secret, bitcoin::Network::Testnet),
    )
}

impl WalletService for FakeWallet {
    fn generate_credential(&self) -> Result<Credential, FundraiserError> {
        self.generated.fetch_add(1, Ordering::SeqCst);
        Ok(Credential::new(self.phrase.clone()))
    }

    fn derive_wallet(&self, credential: &VerifiedCredential) -> Result<Wallet, FundraiserError> {
        self.derived
            .lock()
            .unwrap()
            .push(credential.phrase().to_string());
        if credential.phrase().split_whitespace().count() != 12 {
            return Err(FundraiserError::Derivation("expected 12 words".into()));
        }
        Ok(test_wallet())
    }
}

/// Bitcoin rail that records every call in order.
pub struct FakeBitcoin {
    payment: Result<u64, u64>,
    fee_rate: FeeRate,
    broadcast_fails: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

/// Virtual size used by the fake transaction builder.
pub const FAKE_VSIZE: u64 = 141;

impl FakeBitcoin {
    pub fn paying(amount_sats: u64) -> Self {
        Self {
            payment: Ok(amount_sats),
            fee_rate: FeeRate(10),
            broadcast_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Payment wait that gives up after `secs`.
    pub fn never_paying(secs: u64) -> Self {
        Self {
            payment: Err(secs),
            ..Self::paying(0)
        }
    }

    pub fn with_broadcast_failure(mut self) -> Self {
        self.broadcast_fails = true;
        self
    }

    pub fn fee_sats(&self) -> u64 {
        self.fee_rate.sat_per_vb() * FAKE_VSIZE
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BitcoinService for FakeBitcoin {
    async fn wait_for_payment(&self, address: &str) -> Result<PaymentInputs, FundraiserError> {
        self.record("wait_for_payment");
        let amount = self
            .payment
            .map_err(|secs| FundraiserError::PaymentTimeout(Duration::from_secs(secs)))?;
        Ok(PaymentInputs::new(
            address,
            vec![Utxo {
                txid: TXID.to_string(),
                vout: 0,
                value: amount,
                status: UtxoStatus::default(),
            }],
        ))
    }

    async fn fetch_fee_rate(&self) -> Result<FeeRate, FundraiserError> {
        self.record("fetch_fee_rate");
        Ok(self.fee_rate)
    }

    fn build_final_transaction(
        &self,
        inputs: &PaymentInputs,
        fee_rate: FeeRate,
        claim_address: &str,
    ) -> Result<FinalTransaction, FundraiserError> {
        self.record("build_final_transaction");
        let fee_sats = fee_rate.sat_per_vb() * FAKE_VSIZE;
        let paid_sats = inputs
            .amount_sats
            .checked_sub(fee_sats)
            .ok_or_else(|| FundraiserError::TransactionBuild("insufficient funds".into()))?;

        Ok(FinalTransaction {
            paid_sats,
            fee_sats,
            suggested_atoms: paid_sats as f64 / 10_000.0,
            destination: EXODUS.to_string(),
            claim_address: claim_address.to_string(),
            inputs: inputs.utxos.clone(),
            tx: bitcoin::Transaction {
                version: Version::TWO,
                lock_time: LockTime::ZERO,
                input: vec![],
                output: vec![],
            },
        })
    }

    fn sign(
        &self,
        _wallet: &Wallet,
        _final_tx: &FinalTransaction,
    ) -> Result<SignedTransaction, FundraiserError> {
        self.record("sign");
        Ok(SignedTransaction {
            txid: TXID.to_string(),
            hex: "0200000000".to_string(),
        })
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> Result<String, FundraiserError> {
        self.record("broadcast");
        if self.broadcast_fails {
            return Err(FundraiserError::Broadcast("400 bad-txns-inputs-missingorspent".into()));
        }
        Ok(signed.txid.clone())
    }
}

/// Ethereum rail with a fixed contract price.
pub struct FakeEthereum {
    wei_per_atom: u128,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeEthereum {
    pub fn new(wei_per_atom: u128) -> Self {
        Self {
            wei_per_atom,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EthereumService for FakeEthereum {
    async fn fetch_wei_per_atom(&self) -> Result<u128, FundraiserError> {
        self.calls.lock().unwrap().push("fetch_wei_per_atom");
        Ok(self.wei_per_atom)
    }

    fn build_payload(
        &self,
        claim_address: &str,
        return_address: &str,
    ) -> Result<EthTransaction, FundraiserError> {
        self.calls.lock().unwrap().push("build_payload");
        Ok(EthTransaction {
            to: "0xfundraiser".to_string(),
            gas: 150_000,
            data: format!(
                "0xdeadbeef{:0>64}{:0>64}",
                claim_address,
                return_address.trim_start_matches("0x")
            ),
        })
    }
}

// ============================================================================
// Session harness
// ============================================================================

pub struct Harness {
    pub status: Arc<FakeStatus>,
    pub wallet: Arc<FakeWallet>,
    pub bitcoin: Arc<FakeBitcoin>,
    pub ethereum: Arc<FakeEthereum>,
}

impl Harness {
    pub fn new(status: FakeStatus, bitcoin: FakeBitcoin) -> Self {
        Self {
            status: Arc::new(status),
            wallet: Arc::new(FakeWallet::new()),
            bitcoin: Arc::new(bitcoin),
            ethereum: Arc::new(FakeEthereum::new(1_000_000_000_000_000)),
        }
    }

    pub fn session(&self) -> DonationSession {
        self.session_with(params())
    }

    pub fn session_with(&self, params: DonationParams) -> DonationSession {
        let services = Services {
            status: self.status.clone(),
            wallet: self.wallet.clone(),
            bitcoin: self.bitcoin.clone(),
            ethereum: self.ethereum.clone(),
        };
        DonationSession::new(services, params)
    }
}

pub fn params() -> DonationParams {
    DonationParams {
        atoms_per_btc: 10_000,
        btc_minimum_sats: 1_000_000,
        eth_minimum: "0.01".to_string(),
        terms_url: "https://example.org/terms.pdf".to_string(),
        explorer_url: "https://blockstream.info/testnet".to_string(),
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::ZERO,
        },
    }
}
