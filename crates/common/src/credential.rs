//! The recoverable secret a wallet is derived from.
//!
//! A [`Credential`] is what the generator hands out. It only becomes a
//! [`VerifiedCredential`] once the donor has typed it back correctly, or when
//! the donor supplies a phrase they already hold. Wallet derivation accepts the
//! verified form only, so no transaction can be built from a phrase that skipped
//! the recall check.

use std::fmt;

use zeroize::Zeroizing;

/// A freshly generated, not yet confirmed mnemonic phrase.
pub struct Credential {
    phrase: Zeroizing<String>,
}

impl Credential {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: Zeroizing::new(phrase.into()),
        }
    }

    /// The phrase, for the single on-screen rendering during generation.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    /// Compare a re-entry against the generated phrase.
    ///
    /// Only surrounding whitespace is trimmed. Case and internal spacing must
    /// match exactly.
    pub fn matches(&self, reentry: &str) -> bool {
        reentry.trim() == self.phrase.as_str()
    }

    /// Promote to a verified credential if the re-entry matches.
    pub fn confirm(&self, reentry: &str) -> Option<VerifiedCredential> {
        if self.matches(reentry) {
            Some(VerifiedCredential {
                phrase: self.phrase.clone(),
            })
        } else {
            None
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}

/// A phrase the donor has demonstrated they possess.
pub struct VerifiedCredential {
    phrase: Zeroizing<String>,
}

impl VerifiedCredential {
    /// Accept a phrase the donor already holds.
    pub fn from_existing(phrase: &str) -> Self {
        Self {
            phrase: Zeroizing::new(phrase.trim().to_string()),
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

impl fmt::Debug for VerifiedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerifiedCredential(<redacted>)")
    }
}
