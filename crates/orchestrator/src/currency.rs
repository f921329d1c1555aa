//! Settlement rail selection.

use common::Currency;

use crate::console::Console;
use crate::error::DonationError;

pub const CURRENCY_PROMPT: &str = "Which currency will you make your donation in?";

pub fn select_currency(console: &mut dyn Console) -> Result<Currency, DonationError> {
    let labels: Vec<String> = Currency::ALL.iter().map(|c| c.to_string()).collect();
    let items: Vec<&str> = labels.iter().map(String::as_str).collect();

    let index = console.select(CURRENCY_PROMPT, &items)?;
    Currency::ALL
        .get(index)
        .copied()
        .ok_or_else(|| DonationError::Prompt(format!("No currency option {}", index)))
}
