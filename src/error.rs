use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("price request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unknown symbol {symbol}: {message}")]
    UnknownSymbol { symbol: String, message: String },

    #[error("price API returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("could not read price: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("DISCORD_TOKEN is missing in .env")]
    MissingToken,

    #[error("notification request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("chat API rejected the message: {status} {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("alert file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("alert file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("alert store is not running")]
    Closed,
}

/// Everything that can go wrong with a user command. The `Display` text is
/// what the user gets back, so keep it readable.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Missing argument `{missing}`. Usage: {usage}")]
    MissingArgument {
        missing: &'static str,
        usage: String,
    },

    #[error("`{0}` is not a valid symbol. Use a ticker such as BTC or ETH.")]
    InvalidSymbol(String),

    #[error("`{0}` is not a valid price. Use a positive number such as 50000 or 0.25.")]
    InvalidThreshold(String),

    #[error("`{0}` is not a valid action. Use `buy` or `sell`.")]
    InvalidAction(String),

    #[error("Unknown command `{0}`.")]
    UnknownCommand(String),

    #[error("Could not save your alerts, try again later.")]
    Store(#[from] StoreError),
}

impl CommandError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, CommandError::Store(_))
    }
}
