use std::collections::BTreeMap;

use serde_json::json;
use tokio::time;

use crate::{error::StoreError, services::alerts_service::fmt_price, templates, AppState};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    pub symbols_checked: usize,
    pub failed_symbols: Vec<String>,
    pub fired: usize,
    pub notify_failures: usize,
}

pub fn spawn_price_alert_monitor(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(state.settings.check_interval());
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match run_tick(&state).await {
                Ok(report) if report.fired > 0 => {
                    tracing::info!(?report, "alert tick fired alerts");
                }
                Ok(report) => tracing::debug!(?report, "alert tick"),
                Err(e) => tracing::error!("[alert-monitor] tick error: {}", e),
            }
        }
    });
}

pub async fn run_tick(state: &AppState) -> Result<TickReport, StoreError> {
    let symbols = state.store.active_symbols().await?;

    let mut report = TickReport::default();
    if symbols.is_empty() {
        return Ok(report);
    }

    // Sequential on purpose: one request per symbol per tick, each bounded by
    // the client timeout.
    let mut prices: BTreeMap<String, f64> = BTreeMap::new();
    for sym in symbols {
        report.symbols_checked += 1;

        match state.prices.fetch(&sym).await {
            Ok(price) => {
                prices.insert(sym, price);
            }
            Err(e) => {
                tracing::warn!(symbol = %sym, error = %e, "price check failed, skipping symbol");
                report.failed_symbols.push(sym);
            }
        }
    }

    if prices.is_empty() {
        return Ok(report);
    }

    let fired = state.store.apply_prices(prices).await?;
    report.fired = fired.len();

    // Alerts are already gone from the store; delivery is best effort.
    for f in fired {
        let message = templates::render(
            &state.hbs,
            "messages/alert_fired",
            &json!({
                "user_id": f.alert.user_id,
                "symbol": f.symbol,
                "price": fmt_price(f.price),
                "quote": state.settings.quote_currency,
                "label": f.alert.action.label(),
            }),
        );

        if let Err(e) = state.notifier.notify(f.alert.user_id, &message).await {
            report.notify_failures += 1;
            tracing::warn!(
                user_id = f.alert.user_id,
                symbol = %f.symbol,
                error = %e,
                "could not deliver alert notification"
            );
        }
    }

    Ok(report)
}
