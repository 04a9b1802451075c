use std::collections::BTreeMap;

use crate::models::{Alert, AlertBook};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Evaluation {
    pub fired: Vec<Alert>,
    pub kept: Vec<Alert>,
}

/// An alert that crossed its threshold, with the price that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredAlert {
    pub symbol: String,
    pub price: f64,
    pub alert: Alert,
}

/// Splits one symbol's alerts into those that fire at `price` and those that
/// keep waiting. Both halves keep their original order.
pub fn evaluate(alerts: Vec<Alert>, price: f64) -> Evaluation {
    let (fired, kept) = alerts
        .into_iter()
        .partition(|a| a.action.is_triggered(a.threshold, price));

    Evaluation { fired, kept }
}

/// Runs `evaluate` over every symbol that has a price and removes what fired.
/// Symbols missing from `prices` are left alone.
pub fn evaluate_book(book: &mut AlertBook, prices: &BTreeMap<String, f64>) -> Vec<FiredAlert> {
    let mut fired = Vec::new();

    for (sym, &price) in prices {
        let Some(bucket) = book.bucket_mut(sym) else {
            continue;
        };
        if bucket.is_empty() {
            continue;
        }

        let eval = evaluate(std::mem::take(bucket), price);
        *bucket = eval.kept;

        fired.extend(eval.fired.into_iter().map(|alert| FiredAlert {
            symbol: sym.to_uppercase(),
            price,
            alert,
        }));
    }

    fired
}
