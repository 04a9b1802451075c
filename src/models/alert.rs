use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::CommandError;

pub type AlertId = String;

fn new_alert_id() -> AlertId {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Buy,
    Sell,
}

impl AlertAction {
    /// Sell alerts fire once the price climbs to the threshold, buy alerts
    /// once it drops to it.
    pub fn is_triggered(self, threshold: f64, price: f64) -> bool {
        match self {
            AlertAction::Sell => price >= threshold,
            AlertAction::Buy => price <= threshold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertAction::Buy => "buy",
            AlertAction::Sell => "sell",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertAction::Buy => "Buy",
            AlertAction::Sell => "Sell",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertAction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(AlertAction::Buy),
            "sell" => Ok(AlertAction::Sell),
            _ => Err(CommandError::InvalidAction(s.trim().to_string())),
        }
    }
}

// Older files were written by hand or by tools that did not normalise case.
impl<'de> Deserialize<'de> for AlertAction {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    // files written before ids existed get one on load
    #[serde(default = "new_alert_id")]
    pub id: AlertId,

    pub user_id: u64,
    pub threshold: f64,
    pub action: AlertAction,

    #[serde(default)]
    pub created_at: i64,
}

impl Alert {
    pub fn new(user_id: u64, threshold: f64, action: AlertAction) -> Self {
        Self {
            id: new_alert_id(),
            user_id,
            threshold,
            action,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn matches(&self, user_id: u64, threshold: f64, action: AlertAction) -> bool {
        self.user_id == user_id && self.threshold == threshold && self.action == action
    }
}
