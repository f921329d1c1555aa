//! Output formatting utilities for CLI.
//!
//! Plain or colorized messages, key-value summaries, and the banner.

use colored::Colorize;

const BANNER: &str = r#"
 .d8888b.   .d88888b.   .d8888b.  888b     d888  .d88888b.   .d8888b.
d88P  Y88b d88P" "Y88b d88P  Y88b 8888b   d8888 d88P" "Y88b d88P  Y88b
888    888 888     888 Y88b.      88888b.d88888 888     888 Y88b.
888        888     888  "Y888b.   888Y88888P888 888     888  "Y888b.
888        888     888     "Y88b. 888 Y888P 888 888     888     "Y88b.
888    888 888     888       "888 888  Y8P  888 888     888       "888
Y88b  d88P Y88b. .d88P Y88b  d88P 888   "   888 Y88b. .d88P Y88b  d88P
 "Y8888P"   "Y88888P"   "Y8888P"  888       888  "Y88888P"   "Y8888P"
"#;

/// Output formatter
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Print the welcome banner
    pub fn banner(&self) {
        if self.colored {
            println!("{}", BANNER.cyan());
        } else {
            println!("{}", BANNER);
        }
        println!(
            "\nWelcome to the Cosmos Fundraiser!\n\n\
             Thank you for your interest in donating funds for the development of The Cosmos Network.\n\
             Let's get started!\n"
        );
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("{} {}", "✓".green().bold(), message.green());
        } else {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("✗ {}", message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("{} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("⚠ {}", message);
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a header
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n{}", title.bold().underline());
        } else {
            println!("\n{}", title);
        }
    }

    /// Print key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("  {}: {}", key.bold(), value);
        } else {
            println!("  {}: {}", key, value);
        }
    }

    /// Render a value the user needs to copy
    pub fn highlight(&self, value: &str) -> String {
        if self.colored {
            value.cyan().to_string()
        } else {
            value.to_string()
        }
    }

    /// Render a secret
    pub fn secret(&self, value: &str) -> String {
        if self.colored {
            value.green().bold().to_string()
        } else {
            value.to_string()
        }
    }

    /// Render an alarming line
    pub fn alarm(&self, value: &str) -> String {
        if self.colored {
            value.red().bold().to_string()
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering_is_unchanged() {
        let formatter = OutputFormatter::new(false);
        assert_eq!(formatter.highlight("tb1qaddr"), "tb1qaddr");
        assert_eq!(formatter.secret("abandon"), "abandon");
        assert_eq!(formatter.alarm("WARNING"), "WARNING");
    }
}
