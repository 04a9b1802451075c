//! Library entrypoint for kryptobot.
//!
//! Everything the binary wires together lives here so integration tests
//! under `tests/` can build an `AppState` with fake price and chat clients.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

pub mod services;
pub mod templates;

pub mod controllers;
pub mod routes;

use services::{alert_store::StoreHandle, binance::PriceSource, discord::Notifier};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub store: StoreHandle,
    pub prices: Arc<dyn PriceSource>,
    pub notifier: Arc<dyn Notifier>,
}
