use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::sync::{mpsc, oneshot};

use crate::{
    error::StoreError,
    models::{Alert, AlertAction, AlertBook},
    services::evaluator::{self, FiredAlert},
};

/// Reads the alert file. A missing or empty file is an empty book; alerts
/// that cannot be read are logged and skipped.
pub async fn load(path: &Path) -> Result<AlertBook, StoreError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AlertBook::new()),
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(AlertBook::new());
    }

    // Entries are read one by one so a single bad alert (say an action the
    // bot never supported) does not take every other alert down with it.
    let raw_book: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(&raw)?;

    let mut book = AlertBook::new();
    for (symbol, entries) in raw_book {
        book.add_symbol(&symbol);

        for entry in entries {
            match serde_json::from_value::<Alert>(entry) {
                Ok(alert) => book.insert(&symbol, alert),
                Err(e) => tracing::warn!(
                    symbol = %symbol,
                    error = %e,
                    file = %path.display(),
                    "dropping unreadable alert"
                ),
            }
        }
    }

    Ok(book)
}

/// Rewrites the whole alert file. Goes through a temp file + rename so a
/// crash mid-write leaves the previous contents in place.
pub async fn save(path: &Path, book: &AlertBook) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(book)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

type Reply<T> = oneshot::Sender<T>;

enum StoreRequest {
    Register {
        symbol: String,
        alert: Alert,
        reply: Reply<Result<Alert, StoreError>>,
    },
    ListForOwner {
        user_id: u64,
        reply: Reply<Vec<(String, Alert)>>,
    },
    RemoveMatching {
        user_id: u64,
        symbol: String,
        threshold: f64,
        action: AlertAction,
        reply: Reply<Result<usize, StoreError>>,
    },
    RemoveById {
        user_id: u64,
        id: String,
        reply: Reply<Result<Option<(String, Alert)>, StoreError>>,
    },
    ActiveSymbols {
        reply: Reply<Vec<String>>,
    },
    ApplyPrices {
        prices: BTreeMap<String, f64>,
        reply: Reply<Result<Vec<FiredAlert>, StoreError>>,
    },
    Snapshot {
        reply: Reply<AlertBook>,
    },
}

/// Cheap, cloneable access to the store task. Every read and write goes
/// through its queue, so commands and the monitor tick never interleave
/// inside a load-modify-save.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreRequest>,
}

impl StoreHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    pub async fn register(&self, symbol: &str, alert: Alert) -> Result<Alert, StoreError> {
        let symbol = symbol.to_uppercase();
        self.request(|reply| StoreRequest::Register { symbol, alert, reply })
            .await?
    }

    pub async fn list_for_owner(&self, user_id: u64) -> Result<Vec<(String, Alert)>, StoreError> {
        self.request(|reply| StoreRequest::ListForOwner { user_id, reply })
            .await
    }

    pub async fn remove_matching(
        &self,
        user_id: u64,
        symbol: &str,
        threshold: f64,
        action: AlertAction,
    ) -> Result<usize, StoreError> {
        let symbol = symbol.to_uppercase();
        self.request(|reply| StoreRequest::RemoveMatching {
            user_id,
            symbol,
            threshold,
            action,
            reply,
        })
        .await?
    }

    pub async fn remove_by_id(
        &self,
        user_id: u64,
        id: &str,
    ) -> Result<Option<(String, Alert)>, StoreError> {
        let id = id.to_string();
        self.request(|reply| StoreRequest::RemoveById { user_id, id, reply })
            .await?
    }

    pub async fn active_symbols(&self) -> Result<Vec<String>, StoreError> {
        self.request(|reply| StoreRequest::ActiveSymbols { reply })
            .await
    }

    /// Evaluates the current book against `prices`, drops what fired and
    /// persists the result in one write.
    pub async fn apply_prices(
        &self,
        prices: BTreeMap<String, f64>,
    ) -> Result<Vec<FiredAlert>, StoreError> {
        self.request(|reply| StoreRequest::ApplyPrices { prices, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<AlertBook, StoreError> {
        self.request(|reply| StoreRequest::Snapshot { reply }).await
    }
}

struct AlertStore {
    path: PathBuf,
    book: AlertBook,
}

impl AlertStore {
    /// Applies `f` to a copy, saves it, and only then swaps it in.
    async fn commit<T>(&mut self, f: impl FnOnce(&mut AlertBook) -> T) -> Result<T, StoreError> {
        let mut next = self.book.clone();
        let out = f(&mut next);
        save(&self.path, &next).await?;
        self.book = next;
        Ok(out)
    }

    async fn handle(&mut self, req: StoreRequest) {
        match req {
            StoreRequest::Register { symbol, alert, reply } => {
                let res = self
                    .commit(|book| {
                        book.insert(&symbol, alert.clone());
                        alert
                    })
                    .await;
                let _ = reply.send(res);
            }
            StoreRequest::ListForOwner { user_id, reply } => {
                let _ = reply.send(self.book.alerts_for_owner(user_id));
            }
            StoreRequest::RemoveMatching {
                user_id,
                symbol,
                threshold,
                action,
                reply,
            } => {
                let res = self
                    .commit(|book| book.remove_matching(user_id, &symbol, threshold, action))
                    .await;
                let _ = reply.send(res);
            }
            StoreRequest::RemoveById { user_id, id, reply } => {
                let res = self.commit(|book| book.remove_by_id(user_id, &id)).await;
                let _ = reply.send(res);
            }
            StoreRequest::ActiveSymbols { reply } => {
                let _ = reply.send(self.book.active_symbols());
            }
            StoreRequest::ApplyPrices { prices, reply } => {
                let res = self
                    .commit(|book| evaluator::evaluate_book(book, &prices))
                    .await;
                let _ = reply.send(res);
            }
            StoreRequest::Snapshot { reply } => {
                let _ = reply.send(self.book.clone());
            }
        }
    }
}

/// Loads the alert file and starts the task that owns it from now on.
pub async fn spawn_alert_store(path: impl Into<PathBuf>) -> Result<StoreHandle, StoreError> {
    let path = path.into();
    let book = load(&path).await?;

    tracing::info!(
        "loaded {} alert(s) from {}",
        book.len(),
        path.display()
    );

    let (tx, mut rx) = mpsc::channel::<StoreRequest>(64);
    let mut store = AlertStore { path, book };

    tokio::spawn(async move {
        while let Some(req) = rx.recv().await {
            store.handle(req).await;
        }
        tracing::debug!("alert store stopped");
    });

    Ok(StoreHandle { tx })
}
