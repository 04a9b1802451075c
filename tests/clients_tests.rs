use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use kryptobot::{
    error::{NotifyError, PriceError},
    services::{
        binance::{BinanceClient, PriceSource, TickerPrice},
        discord::{DiscordClient, Notifier},
    },
};
use serde_json::{json, Value};

/// Serves `app` on an ephemeral local port and returns its base url.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------- fake Binance ----------------

async fn ticker(Query(q): Query<HashMap<String, String>>) -> Response {
    let symbol = q.get("symbol").cloned().unwrap_or_default();

    match symbol.as_str() {
        "BTCUSDT" => Json(json!({ "symbol": "BTCUSDT", "price": "51000.50000000" })).into_response(),
        "NOPEUSDT" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": -1121, "msg": "Invalid symbol." })),
        )
            .into_response(),
        "BADUSDT" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": -1100, "msg": "Illegal characters found in parameter 'symbol'." })),
        )
            .into_response(),
        "DOWNUSDT" => (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response(),
        "SLOWUSDT" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "symbol": "SLOWUSDT", "price": "1.0" })).into_response()
        }
        // 200 without a price field
        _ => Json(json!({ "symbol": symbol })).into_response(),
    }
}

async fn binance() -> BinanceClient {
    let base = serve(Router::new().route("/api/v3/ticker/price", get(ticker))).await;
    BinanceClient::new(base, "USDT".to_string(), Duration::from_millis(300)).unwrap()
}

#[tokio::test]
async fn fetch_reads_price_for_pair() {
    let client = binance().await;
    assert_eq!(client.fetch("btc").await.unwrap(), 51000.5);
}

#[tokio::test]
async fn fetch_unknown_symbol() {
    let client = binance().await;
    match client.fetch("NOPE").await.unwrap_err() {
        PriceError::UnknownSymbol { symbol, message } => {
            assert_eq!(symbol, "NOPEUSDT");
            assert_eq!(message, "Invalid symbol.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_other_client_errors_are_upstream() {
    let client = binance().await;
    match client.fetch("BAD").await.unwrap_err() {
        PriceError::Upstream { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.contains("-1100"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_server_error_is_upstream() {
    let client = binance().await;
    match client.fetch("DOWN").await.unwrap_err() {
        PriceError::Upstream { status, body } => {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_without_price_field_is_parse_error() {
    let client = binance().await;
    assert!(matches!(client.fetch("EMPTY").await, Err(PriceError::Parse(_))));
}

#[tokio::test]
async fn fetch_times_out_as_network_error() {
    let client = binance().await;
    match client.fetch("SLOW").await.unwrap_err() {
        PriceError::Network(e) => assert!(e.is_timeout(), "{e}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ---------------- fake Discord ----------------

type Calls = Arc<Mutex<Vec<String>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bot secret")
        .unwrap_or(false)
}

async fn open_dm(State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "401: Unauthorized").into_response();
    }

    let recipient = body["recipient_id"].as_str().unwrap_or_default().to_string();
    calls.lock().unwrap().push(format!("open {recipient}"));
    Json(json!({ "id": format!("dm-{recipient}"), "type": 1 })).into_response()
}

async fn post_message(
    State(calls): State<Calls>,
    Path(channel): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "401: Unauthorized").into_response();
    }
    if channel == "dm-666" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Cannot send messages to this user", "code": 50007 })),
        )
            .into_response();
    }

    let content = body["content"].as_str().unwrap_or_default();
    calls.lock().unwrap().push(format!("send {channel} {content}"));
    Json(json!({ "id": "1" })).into_response()
}

async fn discord(token: &str) -> (DiscordClient, Calls) {
    let calls: Calls = Arc::default();
    let app = Router::new()
        .route("/users/@me/channels", post(open_dm))
        .route("/channels/:id/messages", post(post_message))
        .with_state(calls.clone());

    let base = serve(app).await;
    (DiscordClient::new(base, token.to_string()), calls)
}

#[tokio::test]
async fn notify_opens_dm_then_posts() {
    let (client, calls) = discord("secret").await;

    client.notify(42, "🚨 BTC at 51000").await.unwrap();

    assert_eq!(
        calls.lock().unwrap().clone(),
        vec!["open 42".to_string(), "send dm-42 🚨 BTC at 51000".to_string()]
    );
}

#[tokio::test]
async fn notify_rejected_message() {
    let (client, calls) = discord("secret").await;

    match client.notify(666, "hello").await.unwrap_err() {
        NotifyError::Rejected { status, body } => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert!(body.contains("50007"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(calls.lock().unwrap().clone(), vec!["open 666".to_string()]);
}

#[tokio::test]
async fn notify_with_bad_token_is_rejected_at_dm() {
    let (client, calls) = discord("wrong").await;

    match client.notify(42, "hello").await.unwrap_err() {
        NotifyError::Rejected { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn ticker_price_parses_decimal_strings() {
    let ticker: TickerPrice =
        serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"51000.01000000"}"#).unwrap();
    assert_eq!(ticker.value().unwrap(), 51000.01);
}

#[test]
fn ticker_price_rejects_unusable_values() {
    for raw in ["abc", "0", "-1", ""] {
        let ticker = TickerPrice {
            symbol: "BTCUSDT".to_string(),
            price: raw.to_string(),
        };
        assert!(matches!(ticker.value(), Err(PriceError::Parse(_))), "{raw}");
    }
}

#[test]
fn ticker_without_price_field_is_not_a_ticker() {
    assert!(serde_json::from_str::<TickerPrice>(r#"{"symbol":"BTCUSDT"}"#).is_err());
}

#[test]
fn pair_appends_quote_currency() {
    let client = BinanceClient::new(
        "https://api.binance.com/".to_string(),
        "USDT".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    assert_eq!(client.pair(" eth "), "ETHUSDT");
}

#[tokio::test]
async fn discord_without_token_refuses_to_send() {
    let client = DiscordClient::new("https://discord.com/api/v10".to_string(), "  ".to_string());
    let err = client.notify(1, "hello").await.unwrap_err();
    assert!(matches!(err, NotifyError::MissingToken));
}
