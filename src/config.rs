use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub discord_token: String,
    pub discord_api_base: String,

    pub binance_api_base: String,
    pub quote_currency: String,

    pub alerts_file: String,
    pub check_interval_secs: u64,
    pub fetch_timeout_secs: u64,

    pub command_prefix: String,
}

impl Settings {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

fn secs_var(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    // older deployments only set TOKEN
    let discord_token = env::var("DISCORD_TOKEN")
        .or_else(|_| env::var("TOKEN"))
        .unwrap_or_default();
    let discord_api_base = env::var("DISCORD_API_BASE")
        .unwrap_or_else(|_| "https://discord.com/api/v10".to_string());

    let binance_api_base = env::var("BINANCE_API_BASE")
        .unwrap_or_else(|_| "https://api.binance.com".to_string());
    let quote_currency = env::var("QUOTE_CURRENCY")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|_| "USDT".to_string());

    let alerts_file = env::var("ALERTS_FILE").unwrap_or_else(|_| "alerts.json".to_string());

    let command_prefix = env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string());

    Settings {
        host,
        port,
        discord_token,
        discord_api_base,
        binance_api_base,
        quote_currency,
        alerts_file,
        check_interval_secs: secs_var("CHECK_INTERVAL_SECS", 6),
        fetch_timeout_secs: secs_var("FETCH_TIMEOUT_SECS", 10),
        command_prefix,
    }
}
