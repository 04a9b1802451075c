pub mod binance;
pub mod discord;
pub mod alert_store;
pub mod alert_monitor;

pub mod evaluator;
pub mod commands;
pub mod alerts_service;
