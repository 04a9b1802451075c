use std::{net::SocketAddr, sync::Arc};

use kryptobot::{
    config, routes,
    services::{alert_monitor, alert_store, binance::BinanceClient, discord::DiscordClient},
    templates, AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    if settings.discord_token.trim().is_empty() {
        tracing::warn!("DISCORD_TOKEN is not set, alert notifications will fail");
    }

    let store = alert_store::spawn_alert_store(&settings.alerts_file)
        .await
        .expect("Failed to load alert file");

    let prices = BinanceClient::new(
        settings.binance_api_base.clone(),
        settings.quote_currency.clone(),
        settings.fetch_timeout(),
    )
    .expect("Failed to build price client");

    let notifier = DiscordClient::new(
        settings.discord_api_base.clone(),
        settings.discord_token.clone(),
    );

    let state = AppState {
        hbs: templates::build_handlebars(),
        settings: settings.clone(),
        store,
        prices: Arc::new(prices),
        notifier: Arc::new(notifier),
    };

    alert_monitor::spawn_price_alert_monitor(state.clone());

    let app = routes::app(state);

    let ip = settings
        .host
        .parse::<std::net::IpAddr>()
        .expect("HOST must be an IP address");
    let addr = SocketAddr::from((ip, settings.port));
    tracing::info!(
        "listening on http://{} (checking alerts every {}s)",
        addr,
        settings.check_interval_secs
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
