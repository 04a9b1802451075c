use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Alert, AlertAction};

/// Every alert, grouped by uppercase symbol.
///
/// Serialized as a plain `{ "BTC": [...], ... }` object. Buckets that become
/// empty are kept so the file keeps listing every symbol ever watched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertBook {
    buckets: BTreeMap<String, Vec<Alert>>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, alert: Alert) {
        self.buckets
            .entry(symbol.to_uppercase())
            .or_default()
            .push(alert);
    }

    /// Makes sure `symbol` is listed, even with no alerts.
    pub fn add_symbol(&mut self, symbol: &str) {
        self.buckets.entry(symbol.to_uppercase()).or_default();
    }

    pub fn bucket(&self, symbol: &str) -> &[Alert] {
        self.buckets
            .get(&symbol.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn bucket_mut(&mut self, symbol: &str) -> Option<&mut Vec<Alert>> {
        self.buckets.get_mut(&symbol.to_uppercase())
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&String, &Vec<Alert>)> {
        self.buckets.iter()
    }

    /// Symbols that still have at least one alert waiting.
    pub fn active_symbols(&self) -> Vec<String> {
        self.buckets
            .iter()
            .filter(|(_, alerts)| !alerts.is_empty())
            .map(|(sym, _)| sym.clone())
            .collect()
    }

    pub fn alerts_for_owner(&self, user_id: u64) -> Vec<(String, Alert)> {
        self.buckets
            .iter()
            .flat_map(|(sym, alerts)| {
                alerts
                    .iter()
                    .filter(move |a| a.user_id == user_id)
                    .map(move |a| (sym.clone(), a.clone()))
            })
            .collect()
    }

    /// Drops every alert of `user_id` in `symbol` matching threshold and action.
    /// Returns how many were removed.
    pub fn remove_matching(
        &mut self,
        user_id: u64,
        symbol: &str,
        threshold: f64,
        action: AlertAction,
    ) -> usize {
        let Some(alerts) = self.bucket_mut(symbol) else {
            return 0;
        };

        let before = alerts.len();
        alerts.retain(|a| !a.matches(user_id, threshold, action));
        before - alerts.len()
    }

    pub fn remove_by_id(&mut self, user_id: u64, id: &str) -> Option<(String, Alert)> {
        for (sym, alerts) in self.buckets.iter_mut() {
            if let Some(pos) = alerts.iter().position(|a| a.id == id && a.user_id == user_id) {
                return Some((sym.clone(), alerts.remove(pos)));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
