use serde::{Deserialize, Serialize};

use super::{AlertAction, AlertId};

/// What the bot answers to a command. `actions` are follow-ups a chat
/// gateway can show as buttons; each one carries the values it acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReply {
    pub ok: bool,
    pub content: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ReplyAction>,
}

impl BotReply {
    pub fn text(content: String) -> Self {
        Self {
            ok: true,
            content,
            actions: Vec::new(),
        }
    }

    pub fn error(content: String) -> Self {
        Self {
            ok: false,
            content,
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplyAction {
    Remove {
        id: AlertId,
        symbol: String,
        threshold: f64,
        action: AlertAction,
        label: String,
    },
    Dismiss {
        label: String,
    },
}
