//! Terminal-backed [`Console`] using dialoguer prompts and indicatif spinners.

use std::time::Duration;

use dialoguer::console::{measure_text_width, Term};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use orchestrator::{Console, DonationError};

use crate::output::OutputFormatter;

pub struct TerminalConsole {
    formatter: OutputFormatter,
    term: Term,
    spinner: Option<ProgressBar>,
    /// Terminal rows printed since the secret was revealed.
    secret_lines: usize,
}

impl TerminalConsole {
    pub fn new(formatter: OutputFormatter) -> Self {
        Self {
            formatter,
            term: Term::stdout(),
            spinner: None,
            secret_lines: 0,
        }
    }

    fn prompt_error(e: dialoguer::Error) -> DonationError {
        DonationError::Prompt(e.to_string())
    }
}

/// Rows `lines` occupy on a terminal `width` columns wide, counting wraps.
fn wrapped_rows(lines: &[String], width: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            let visible = measure_text_width(line);
            if width == 0 || visible == 0 {
                1
            } else {
                visible.div_ceil(width)
            }
        })
        .sum()
}

impl Console for TerminalConsole {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, DonationError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_on(&self.term)
            .map_err(Self::prompt_error)
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize, DonationError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on(&self.term)
            .map_err(Self::prompt_error)
    }

    // Answers are wallet phrases, so the prompt is cleared without echoing them.
    fn input(&mut self, prompt: &str) -> Result<String, DonationError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .report(false)
            .interact_text_on(&self.term)
            .map_err(Self::prompt_error)
    }

    fn acknowledge(&mut self, prompt: &str) -> Result<(), DonationError> {
        self.input(prompt)?;
        Ok(())
    }

    fn info(&mut self, message: &str) {
        println!();
        self.formatter.info(message);
    }

    fn warning(&mut self, message: &str) {
        self.formatter.warning(message);
    }

    fn success(&mut self, message: &str) {
        self.formatter.success(message);
    }

    fn field(&mut self, label: &str, value: &str) {
        self.formatter.kv(label, value);
    }

    fn highlight(&mut self, value: &str) {
        println!("{}", self.formatter.highlight(value));
    }

    fn reveal_secret(&mut self, secret: &str, warnings: &[&str]) {
        let mut lines = vec![String::new(), self.formatter.secret(secret), String::new()];
        lines.extend(warnings.iter().map(|w| self.formatter.alarm(w)));
        lines.push(String::new());

        for line in &lines {
            println!("{}", line);
        }
        let (_, columns) = self.term.size();
        self.secret_lines = wrapped_rows(&lines, usize::from(columns));
    }

    fn conceal_secret(&mut self) {
        if self.secret_lines == 0 {
            return;
        }
        if let Err(e) = self.term.clear_last_lines(self.secret_lines) {
            tracing::warn!("Could not clear wallet phrase from terminal: {}", e);
        }
        self.secret_lines = 0;
    }

    fn start_progress(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.spinner.replace(spinner) {
            previous.finish_and_clear();
        }
    }

    fn finish_progress(&mut self, message: Option<&str>) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if let Some(message) = message {
            self.formatter.success(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_short_lines_take_one_row() {
        let lines = vec![String::new(), "WARNING".to_string()];
        assert_eq!(wrapped_rows(&lines, 80), 2);
    }

    #[test]
    fn test_phrase_wraps_on_narrow_terminal() {
        let lines = vec![String::new(), PHRASE.to_string(), String::new()];
        assert_eq!(PHRASE.len(), 93);
        assert_eq!(wrapped_rows(&lines, 80), 4);
        assert_eq!(wrapped_rows(&lines, 40), 5);
        assert_eq!(wrapped_rows(&lines, 200), 3);
    }

    #[test]
    fn test_color_codes_do_not_count() {
        let colored = format!("\x1b[1;32m{}\x1b[0m", "x".repeat(80));
        assert_eq!(wrapped_rows(&[colored], 80), 1);
    }
}
