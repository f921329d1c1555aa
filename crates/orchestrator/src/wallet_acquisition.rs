//! Wallet acquisition: generate a credential and prove it was recorded, or
//! accept one the donor already holds.

use common::{Credential, VerifiedCredential, Wallet, WalletService};
use tracing::{debug, info};

use crate::console::Console;
use crate::error::DonationError;

pub const CHOICE_PROMPT: &str = "Generate a new wallet, or use an existing one?";
pub const REENTRY_PROMPT: &str = "Please re-enter your 12-word wallet phrase:";
pub const EXISTING_PROMPT: &str = "Please enter your 12-word wallet phrase:";
pub const ACKNOWLEDGE_PROMPT: &str = "Please write down your wallet, then continue.";
pub const MISMATCH_NOTICE: &str = "Incorrect. Try again or exit and restart";

const SECRET_WARNINGS: &[&str] = &[
    "WRITE THIS DOWN AND DO NOT LOSE IT!",
    "IF YOU LOSE THIS WALLET YOU LOSE YOUR ATOMS!",
    "WARNING: DO NOT LOSE YOUR WALLET!",
    "WARNING: DO NOT LOSE YOUR WALLET!",
    "WARNING: DO NOT LOSE YOUR WALLET!",
];

/// How the donor obtains a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletChoice {
    Generate,
    InputExisting,
}

impl WalletChoice {
    pub const ALL: [WalletChoice; 2] = [WalletChoice::Generate, WalletChoice::InputExisting];

    pub fn label(&self) -> &'static str {
        match self {
            WalletChoice::Generate => "Generate wallet",
            WalletChoice::InputExisting => "Input existing wallet",
        }
    }
}

/// Ask which branch to take, run it, and derive the wallet.
pub fn acquire_wallet(
    service: &dyn WalletService,
    console: &mut dyn Console,
) -> Result<Wallet, DonationError> {
    let labels: Vec<&str> = WalletChoice::ALL.iter().map(|c| c.label()).collect();
    let index = console.select(CHOICE_PROMPT, &labels)?;
    let choice = WalletChoice::ALL
        .get(index)
        .copied()
        .ok_or_else(|| DonationError::Prompt(format!("No wallet option {}", index)))?;

    let verified = match choice {
        WalletChoice::Generate => generate_and_verify(service, console)?,
        WalletChoice::InputExisting => {
            let phrase = console.input(EXISTING_PROMPT)?;
            VerifiedCredential::from_existing(&phrase)
        }
    };

    let wallet = service.derive_wallet(&verified)?;
    info!("Wallet ready: {}", wallet.addresses().cosmos);
    Ok(wallet)
}

/// Generate a credential, show it once, then run the recall check.
pub fn generate_and_verify(
    service: &dyn WalletService,
    console: &mut dyn Console,
) -> Result<VerifiedCredential, DonationError> {
    let credential = service.generate_credential()?;

    console.info(
        "Let's generate your Cosmos wallet. You will need this in the future to\n\
         access your Atoms.\n\nHere is your wallet:",
    );
    console.reveal_secret(credential.phrase(), SECRET_WARNINGS);
    console.acknowledge(ACKNOWLEDGE_PROMPT)?;
    console.conceal_secret();

    verify_recall(&credential, console)
}

/// Prompt for the phrase until a re-entry matches.
///
/// There is no attempt limit; the donor leaves by terminating the program.
pub fn verify_recall(
    credential: &Credential,
    console: &mut dyn Console,
) -> Result<VerifiedCredential, DonationError> {
    let mut attempts = 0u32;
    loop {
        let reentry = console.input(REENTRY_PROMPT)?;
        attempts += 1;

        if let Some(verified) = credential.confirm(&reentry) {
            debug!("Recall verified after {} attempt(s)", attempts);
            return Ok(verified);
        }
        console.warning(MISMATCH_NOTICE);
    }
}
