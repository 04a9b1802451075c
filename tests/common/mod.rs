#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::response::Response;
use http_body_util::BodyExt;
use kryptobot::{
    config,
    error::{NotifyError, PriceError},
    services::{alert_store, binance::PriceSource, discord::Notifier},
    templates, AppState,
};

/// Prices set by the test; symbols without one fail like a dead upstream.
#[derive(Default)]
pub struct FakePrices {
    prices: Mutex<HashMap<String, f64>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakePrices {
    pub fn set(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl PriceSource for FakePrices {
    async fn fetch(&self, symbol: &str) -> Result<f64, PriceError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceError::Parse(format!("no quote for {symbol}")))
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(u64, String)>>,
    pub fail: bool,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, user_id: u64, message: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::MissingToken);
        }
        self.sent.lock().unwrap().push((user_id, message.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub prices: Arc<FakePrices>,
    pub notifier: Arc<FakeNotifier>,
}

pub async fn test_app(alerts_file: &Path) -> TestApp {
    test_app_with_notifier(alerts_file, FakeNotifier::default()).await
}

pub async fn test_app_with_notifier(alerts_file: &Path, notifier: FakeNotifier) -> TestApp {
    let mut settings = config::load();
    settings.alerts_file = alerts_file.display().to_string();
    settings.quote_currency = "USDT".to_string();
    settings.command_prefix = "!".to_string();

    let store = alert_store::spawn_alert_store(alerts_file)
        .await
        .expect("alert store");

    let prices = Arc::new(FakePrices::default());
    let notifier = Arc::new(notifier);

    let state = AppState {
        hbs: templates::build_handlebars(),
        settings,
        store,
        prices: prices.clone(),
        notifier: notifier.clone(),
    };

    TestApp {
        state,
        prices,
        notifier,
    }
}

pub async fn response_body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}
