use uuid::Uuid;

use crate::{error::CommandError, models::AlertAction};

pub fn set_alert_usage(prefix: &str) -> String {
    format!("{prefix}set_alert <symbol> <price> <buy|sell>")
}

pub fn remove_alert_usage(prefix: &str) -> String {
    format!("{prefix}remove_alert <symbol> <price> <buy|sell> | {prefix}remove_alert <id>")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping,
    SetAlert {
        symbol: String,
        threshold: f64,
        action: AlertAction,
    },
    ShowAlerts,
    RemoveAlert {
        symbol: String,
        threshold: f64,
        action: AlertAction,
    },
    RemoveAlertById {
        id: String,
    },
}

pub fn parse_threshold(raw: &str) -> Result<f64, CommandError> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CommandError::InvalidThreshold(raw.to_string())),
    }
}

pub fn parse_symbol(raw: &str) -> Result<String, CommandError> {
    let sym = raw.trim().to_uppercase();
    if sym.is_empty() || !sym.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CommandError::InvalidSymbol(raw.trim().to_string()));
    }
    Ok(sym)
}

fn arg<'a>(
    args: &[&'a str],
    idx: usize,
    missing: &'static str,
    usage: impl FnOnce() -> String,
) -> Result<&'a str, CommandError> {
    args.get(idx)
        .copied()
        .ok_or_else(|| CommandError::MissingArgument {
            missing,
            usage: usage(),
        })
}

fn alert_args(
    args: &[&str],
    usage: impl Fn() -> String,
) -> Result<(String, f64, AlertAction), CommandError> {
    let symbol = parse_symbol(arg(args, 0, "symbol", &usage)?)?;
    let threshold = parse_threshold(arg(args, 1, "price", &usage)?)?;
    let action = arg(args, 2, "action", &usage)?.parse::<AlertAction>()?;
    Ok((symbol, threshold, action))
}

/// Turns a chat message into a command. Messages without `prefix` are not
/// meant for the bot and give `Ok(None)`.
pub fn parse(prefix: &str, content: &str) -> Result<Option<Command>, CommandError> {
    let Some(rest) = content.trim().strip_prefix(prefix) else {
        return Ok(None);
    };

    let mut words = rest.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let cmd = match name.to_lowercase().as_str() {
        "ping" => Command::Ping,
        "set_alert" => {
            let (symbol, threshold, action) = alert_args(&args, || set_alert_usage(prefix))?;
            Command::SetAlert {
                symbol,
                threshold,
                action,
            }
        }
        "show_alerts" => Command::ShowAlerts,
        "remove_alert" => {
            // a lone argument is only an id if it looks like one; `BTC` alone
            // is a remove with missing price and action
            let by_id = match args.as_slice() {
                [one] => Uuid::parse_str(one).ok(),
                _ => None,
            };

            if let Some(id) = by_id {
                Command::RemoveAlertById { id: id.to_string() }
            } else {
                let (symbol, threshold, action) =
                    alert_args(&args, || remove_alert_usage(prefix))?;
                Command::RemoveAlert {
                    symbol,
                    threshold,
                    action,
                }
            }
        }
        other => return Err(CommandError::UnknownCommand(format!("{prefix}{other}"))),
    };

    Ok(Some(cmd))
}
