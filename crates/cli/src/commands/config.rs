//! Configuration commands.

use anyhow::Result;
use common::format_btc;

use crate::config::Config;
use crate::output::OutputFormatter;

/// Print the resolved configuration and where it is stored.
pub fn show(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "Not set".to_string()
        } else {
            value.to_string()
        }
    };

    formatter.header("Current Configuration");
    formatter.kv("Network", &config.network.to_string());
    formatter.kv("Status URL", &or_unset(&config.status_url));
    formatter.kv("Esplora URL", config.esplora_url());
    formatter.kv("Ethereum RPC", &config.eth_rpc_url);
    formatter.kv("Exodus address", &or_unset(&config.exodus_address));
    formatter.kv("Fundraiser contract", &or_unset(&config.fundraiser_contract));
    formatter.kv("Allocation rate", &format!("1 BTC : {} ATOM", config.atoms_per_btc));
    formatter.kv("BTC minimum", &format_btc(config.btc_minimum_sats));
    formatter.kv("ETH minimum", &format!("{} ETH", config.eth_minimum_donation));
    formatter.kv("ETH gas limit", &config.eth_gas_limit.to_string());
    formatter.kv("Payment poll", &format!("{}s", config.payment_poll_secs));
    formatter.kv(
        "Payment timeout",
        &config
            .payment_timeout_secs
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "None".to_string()),
    );
    formatter.kv(
        "Poll failure limit",
        &config.payment_poll_max_failures.to_string(),
    );
    formatter.kv(
        "Retry",
        &format!(
            "{} attempts, {}ms initial delay",
            config.retry_attempts, config.retry_initial_delay_ms
        ),
    );
    formatter.kv("Timeout", &format!("{}s", config.request_timeout_secs));
    formatter.kv("Colored Output", &config.colored.to_string());

    println!();
    let config_path = Config::config_path()?;
    formatter.info(&format!("Config file: {}", config_path.display()));

    if let Err(e) = config.validate() {
        formatter.warning(&e.to_string());
    }
    Ok(())
}
