use serde_json::json;

use crate::{
    error::CommandError,
    models::{Alert, AlertAction, BotReply, ReplyAction},
    services::commands::Command,
    templates, AppState,
};

/// Prices are shown the way users type them: `50000`, not `50000.0`.
pub fn fmt_price(x: f64) -> String {
    x.to_string()
}

pub async fn register_alert(
    state: &AppState,
    user_id: u64,
    symbol: &str,
    threshold: f64,
    action: AlertAction,
) -> Result<BotReply, CommandError> {
    let sym = symbol.to_uppercase();
    let alert = state
        .store
        .register(&sym, Alert::new(user_id, threshold, action))
        .await?;

    tracing::info!(user_id, symbol = %sym, id = %alert.id, "alert registered");

    let content = templates::render(
        &state.hbs,
        "messages/alert_created",
        &json!({
            "symbol": sym,
            "threshold": fmt_price(threshold),
            "quote": state.settings.quote_currency,
            "action": action.as_str(),
            "user_id": user_id,
        }),
    );

    Ok(BotReply::text(content))
}

pub async fn list_alerts(state: &AppState, user_id: u64) -> Result<BotReply, CommandError> {
    let alerts = state.store.list_for_owner(user_id).await?;

    if alerts.is_empty() {
        return Ok(BotReply::text(templates::render(
            &state.hbs,
            "messages/no_alerts",
            &json!({}),
        )));
    }

    let quote = state.settings.quote_currency.as_str();

    let rows: Vec<serde_json::Value> = alerts
        .iter()
        .map(|(sym, a)| {
            json!({
                "symbol": sym,
                "threshold": fmt_price(a.threshold),
                "action": a.action.as_str(),
            })
        })
        .collect();

    let content = templates::render(
        &state.hbs,
        "messages/alert_list",
        &json!({ "alerts": rows, "quote": quote }),
    );

    // one removal per alert, bound to that alert's own values
    let mut actions: Vec<ReplyAction> = alerts
        .into_iter()
        .map(|(sym, a)| {
            let label = templates::render(
                &state.hbs,
                "buttons/remove",
                &json!({
                    "symbol": sym,
                    "threshold": fmt_price(a.threshold),
                    "quote": quote,
                    "action": a.action.as_str(),
                }),
            );
            ReplyAction::Remove {
                id: a.id,
                symbol: sym,
                threshold: a.threshold,
                action: a.action,
                label,
            }
        })
        .collect();

    actions.push(ReplyAction::Dismiss {
        label: templates::render(&state.hbs, "buttons/dismiss", &json!({})),
    });

    Ok(BotReply {
        ok: true,
        content,
        actions,
    })
}

pub async fn remove_alert(
    state: &AppState,
    user_id: u64,
    symbol: &str,
    threshold: f64,
    action: AlertAction,
) -> Result<BotReply, CommandError> {
    let sym = symbol.to_uppercase();
    let removed = state
        .store
        .remove_matching(user_id, &sym, threshold, action)
        .await?;

    if removed == 0 {
        return Ok(BotReply::text(templates::render(
            &state.hbs,
            "messages/alert_not_found",
            &json!({}),
        )));
    }

    tracing::info!(user_id, symbol = %sym, removed, "alerts removed");

    let content = templates::render(
        &state.hbs,
        "messages/alert_removed",
        &json!({
            "count": removed,
            "symbol": sym,
            "threshold": fmt_price(threshold),
            "quote": state.settings.quote_currency,
            "action": action.as_str(),
        }),
    );

    Ok(BotReply::text(content))
}

pub async fn remove_alert_by_id(
    state: &AppState,
    user_id: u64,
    id: &str,
) -> Result<BotReply, CommandError> {
    let Some((sym, alert)) = state.store.remove_by_id(user_id, id).await? else {
        return Ok(BotReply::text(templates::render(
            &state.hbs,
            "messages/alert_not_found",
            &json!({}),
        )));
    };

    tracing::info!(user_id, symbol = %sym, id = %alert.id, "alert removed");

    let content = templates::render(
        &state.hbs,
        "messages/alert_removed",
        &json!({
            "count": 1,
            "symbol": sym,
            "threshold": fmt_price(alert.threshold),
            "quote": state.settings.quote_currency,
            "action": alert.action.as_str(),
        }),
    );

    Ok(BotReply::text(content))
}

pub fn dismiss(state: &AppState) -> BotReply {
    BotReply::text(templates::render(&state.hbs, "messages/dismissed", &json!({})))
}

pub fn ping(state: &AppState) -> BotReply {
    BotReply::text(templates::render(&state.hbs, "messages/pong", &json!({})))
}

pub async fn handle_command(
    state: &AppState,
    user_id: u64,
    cmd: Command,
) -> Result<BotReply, CommandError> {
    match cmd {
        Command::Ping => Ok(ping(state)),
        Command::SetAlert {
            symbol,
            threshold,
            action,
        } => register_alert(state, user_id, &symbol, threshold, action).await,
        Command::ShowAlerts => list_alerts(state, user_id).await,
        Command::RemoveAlert {
            symbol,
            threshold,
            action,
        } => remove_alert(state, user_id, &symbol, threshold, action).await,
        Command::RemoveAlertById { id } => remove_alert_by_id(state, user_id, &id).await,
    }
}
