//! The interactive surface the donation flow talks to.
//!
//! Every prompt and message goes through [`Console`], so the flow can be
//! driven by a terminal in the binary and by a scripted fake in tests.

use crate::error::DonationError;

/// Prompts and display for a donation session.
pub trait Console {
    /// Yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, DonationError>;

    /// Single choice from `items`; returns the chosen index.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, DonationError>;

    /// Free-text answer.
    fn input(&mut self, prompt: &str) -> Result<String, DonationError>;

    /// Wait for the user to continue. Any input is accepted.
    fn acknowledge(&mut self, prompt: &str) -> Result<(), DonationError>;

    fn info(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn success(&mut self, message: &str);

    /// Labelled value in a summary block.
    fn field(&mut self, label: &str, value: &str);

    /// Value the user needs to copy (address, transaction payload).
    fn highlight(&mut self, value: &str);

    /// Show a secret once, surrounded by `warnings`.
    fn reveal_secret(&mut self, secret: &str, warnings: &[&str]);

    /// Best-effort removal of what [`Console::reveal_secret`] printed.
    ///
    /// Terminal scrollback may still hold it.
    fn conceal_secret(&mut self);

    /// Show an activity indicator until [`Console::finish_progress`].
    fn start_progress(&mut self, message: &str);

    /// Stop the indicator, optionally replacing it with a success line.
    fn finish_progress(&mut self, message: Option<&str>);
}
