//! Recall verification and wallet acquisition.

mod support;

use common::Credential;
use orchestrator::wallet_acquisition::{
    acquire_wallet, verify_recall, EXISTING_PROMPT, MISMATCH_NOTICE, REENTRY_PROMPT,
};
use orchestrator::DonationError;
use support::*;

fn inputs(entries: &[&str]) -> ScriptedConsole {
    ScriptedConsole::new(
        entries
            .iter()
            .map(|e| Answer::Input(e.to_string()))
            .collect(),
    )
}

#[test]
fn test_returns_on_first_matching_entry() {
    let credential = Credential::new(PHRASE);
    let mut console = inputs(&["abandon", PHRASE, PHRASE]);

    let verified = verify_recall(&credential, &mut console).unwrap();

    assert_eq!(verified.phrase(), PHRASE);
    assert_eq!(console.prompts().len(), 2);
    assert_eq!(console.remaining_answers(), 1);
    assert_eq!(console.warnings(), vec![MISMATCH_NOTICE.to_string()]);
}

#[test]
fn test_never_returns_without_a_match() {
    let credential = Credential::new(PHRASE);
    let wrong_case = PHRASE.to_uppercase();
    let double_spaced = PHRASE.replace(' ', "  ");
    let mut console = inputs(&["", "abandon about", &wrong_case, &double_spaced]);

    let result = verify_recall(&credential, &mut console);

    // The loop only ends because the script ran out.
    assert!(matches!(result, Err(DonationError::Prompt(_))));
    assert_eq!(console.prompts().len(), 5);
    assert!(console.prompts().iter().all(|p| p == REENTRY_PROMPT));
    assert_eq!(console.warnings().len(), 4);
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    let credential = Credential::new(PHRASE);
    let padded = format!("   {}\t\n", PHRASE);
    let mut console = inputs(&[&padded]);

    assert!(verify_recall(&credential, &mut console).is_ok());
    assert!(console.warnings().is_empty());
}

#[test]
fn test_generate_branch_derives_only_after_recall() {
    let wallet_service = FakeWallet::new();
    let mut console = ScriptedConsole::new(vec![
        Answer::Select(0),
        Answer::Acknowledge,
        Answer::Input("wrong".to_string()),
        Answer::Input("still wrong".to_string()),
        Answer::Input(PHRASE.to_string()),
    ]);

    let wallet = acquire_wallet(&wallet_service, &mut console).unwrap();

    assert_eq!(wallet.addresses().cosmos, CLAIM);
    assert_eq!(wallet_service.generated(), 1);
    assert_eq!(wallet_service.derived(), vec![PHRASE.to_string()]);
}

#[test]
fn test_abandoned_recall_derives_nothing() {
    let wallet_service = FakeWallet::new();
    let mut console = ScriptedConsole::new(vec![
        Answer::Select(0),
        Answer::Acknowledge,
        Answer::Input("wrong".to_string()),
    ]);

    assert!(acquire_wallet(&wallet_service, &mut console).is_err());
    assert!(wallet_service.derived().is_empty());
}

#[test]
fn test_input_branch_skips_recall() {
    let wallet_service = FakeWallet::new();
    let mut console = ScriptedConsole::new(vec![
        Answer::Select(1),
        Answer::Input(format!(" {} ", PHRASE)),
    ]);

    acquire_wallet(&wallet_service, &mut console).unwrap();

    assert_eq!(console.prompts().last().map(String::as_str), Some(EXISTING_PROMPT));
    assert!(!console.prompts().contains(&REENTRY_PROMPT.to_string()));
    assert_eq!(wallet_service.generated(), 0);
    assert_eq!(wallet_service.derived(), vec![PHRASE.to_string()]);
}
