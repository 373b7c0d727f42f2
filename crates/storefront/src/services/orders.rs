//! Order submission and history.
//!
//! Converts cart lines (or a single product) into order records, appends
//! them to the local history and forwards one payload per line to the
//! external order sink. The sink is a third-party webhook; it either
//! accepts a payload or it doesn't - there is no retry.
//!
//! The history append happens before the sink calls, mirroring the
//! long-standing behavior of the store: a submission that fails on the wire
//! still leaves its records in the local history. Flagged in DESIGN.md.

use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::instrument;
use url::Url;

use souk_core::{OrderRecord, Price, ProductId};

use crate::services::auth::{ApiClient, AuthError};
use crate::store::{LocalStore, StoreError};

/// Placeholder contact values for anonymous submissions.
const FALLBACK_NAME: &str = "Client inconnu";
const FALLBACK_PHONE: &str = "Non fourni";
const FALLBACK_WILAYA: &str = "Non spécifiée";
const FALLBACK_ADDRESS: &str = "Non spécifiée";

/// Image recorded when a line has none.
const PLACEHOLDER_IMAGE: &str = "/placeholder-product.jpg";

/// Authenticated order history endpoint on the accounts service.
const REMOTE_ORDERS_PATH: &str = "orders/my-orders/";

/// Errors that can occur during order submission.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Submission with no line items.
    #[error("no items to order")]
    Empty,

    /// One or more sink calls failed; the history was already written.
    #[error("{failed} of {total} order sink calls failed")]
    Sink {
        /// Number of failed webhook calls.
        failed: usize,
        /// Total number of webhook calls issued.
        total: usize,
    },

    /// Local history write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Accounts API error while reading the remote history.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// One line of an order submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product name.
    pub productname: String,
    /// Product ID.
    pub id: ProductId,
    /// Unit price.
    pub price: Price,
    /// Ordered quantity.
    pub quantity: u32,
    /// Product image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// An order kept by the accounts service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    /// Order ID.
    pub id: i64,
    /// Submitting client's account ID.
    #[serde(default)]
    pub client: Option<i64>,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<Utc>,
    /// Whether the order has been dispatched.
    #[serde(default)]
    pub is_sent: bool,
    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<RemoteOrderItem>,
}

/// One line of a remote order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrderItem {
    /// Line ID.
    pub id: i64,
    /// Product ID.
    pub product: ProductId,
    /// Ordered quantity.
    pub quantity: u32,
}

/// Order submission service.
///
/// Borrows the shared clients and store; construct one per request.
pub struct OrderService<'a> {
    store: &'a LocalStore,
    api: &'a ApiClient,
    http: &'a reqwest::Client,
    webhook_url: &'a Url,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(
        store: &'a LocalStore,
        api: &'a ApiClient,
        http: &'a reqwest::Client,
        webhook_url: &'a Url,
    ) -> Self {
        Self {
            store,
            api,
            http,
            webhook_url,
        }
    }

    /// Submit one or more order lines.
    ///
    /// Every line is stamped with the same submission timestamp and
    /// recorded in the local history; then one webhook call per line is
    /// issued concurrently. The submission succeeds only if every call
    /// reports success.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Empty`] for an empty submission,
    /// [`OrderError::Store`] if the history write fails, and
    /// [`OrderError::Sink`] if any webhook call fails.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn submit(&self, lines: Vec<OrderLine>) -> Result<usize, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Empty);
        }

        let profile = self.store.profile().unwrap_or_default();
        let date = Utc::now();

        let records: Vec<OrderRecord> = lines
            .into_iter()
            .map(|line| OrderRecord {
                name: non_empty_or(&profile.name, FALLBACK_NAME),
                email: profile.email.clone(),
                phone: non_empty_or(&profile.phone, FALLBACK_PHONE),
                wilaya: non_empty_or(&profile.wilaya, FALLBACK_WILAYA),
                address: non_empty_or(&profile.address, FALLBACK_ADDRESS),
                productname: line.productname,
                id: line.id,
                price: line.price,
                quantity: line.quantity,
                date,
                image: line
                    .image
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned()),
            })
            .collect();

        // History first, sink second; see the module docs.
        self.store.append_orders(&records)?;

        let total = records.len();
        let mut calls = JoinSet::new();
        for record in &records {
            let http = self.http.clone();
            let url = self.webhook_url.clone();
            let payload = sink_payload(record);
            calls.spawn(async move { post_to_sink(&http, url, &payload).await });
        }

        let mut failed = 0;
        while let Some(joined) = calls.join_next().await {
            match joined {
                Ok(true) => {}
                Ok(false) => failed += 1,
                Err(e) => {
                    tracing::error!(error = %e, "order sink task panicked");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(OrderError::Sink { failed, total });
        }

        tracing::info!(total, "order submitted");
        Ok(total)
    }

    /// The local order history scoped to the current profile's email.
    ///
    /// Returns an empty list when no profile is stored or its email is
    /// empty. Prices come back numeric; they are normalized when the
    /// records are parsed.
    #[must_use]
    pub fn local_orders(&self) -> Vec<OrderRecord> {
        let Some(profile) = self.store.profile() else {
            return Vec::new();
        };
        if profile.email.is_empty() {
            return Vec::new();
        }

        self.store
            .orders()
            .into_iter()
            .filter(|record| record.belongs_to(&profile))
            .collect()
    }

    /// The authenticated order history kept by the accounts service.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Auth`] on API failure or an expired session.
    #[instrument(skip(self))]
    pub async fn remote_orders(&self) -> Result<Vec<RemoteOrder>, OrderError> {
        Ok(self.api.get_json(REMOTE_ORDERS_PATH).await?)
    }
}

/// Substitute a placeholder for an empty profile field.
fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        value.to_owned()
    }
}

/// The sink payload for one record: contact details plus the line, without
/// the timestamp or image (the sink keeps its own receive time).
fn sink_payload(record: &OrderRecord) -> serde_json::Value {
    json!({
        "name": record.name,
        "email": record.email,
        "phone": record.phone,
        "wilaya": record.wilaya,
        "address": record.address,
        "productname": record.productname,
        "id": record.id,
        "price": record.price,
        "quantity": record.quantity,
    })
}

/// POST one payload to the sink; true on a success status.
async fn post_to_sink(http: &reqwest::Client, url: Url, payload: &serde_json::Value) -> bool {
    match http.post(url).json(payload).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() || status == StatusCode::FOUND {
                true
            } else {
                tracing::warn!(%status, "order sink rejected payload");
                false
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "order sink call failed");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_or() {
        assert_eq!(non_empty_or("Amina", FALLBACK_NAME), "Amina");
        assert_eq!(non_empty_or("  ", FALLBACK_NAME), "Client inconnu");
        assert_eq!(non_empty_or("", FALLBACK_PHONE), "Non fourni");
    }

    #[test]
    fn test_sink_payload_shape() {
        let record = OrderRecord {
            name: "Amina B.".to_owned(),
            email: "amina@example.dz".to_owned(),
            phone: "0550 12 34 56".to_owned(),
            wilaya: "Alger".to_owned(),
            address: "12 rue Didouche Mourad".to_owned(),
            productname: "Huile d'argan".to_owned(),
            id: ProductId::new(7),
            price: Price::parse("1200,00").unwrap(),
            quantity: 2,
            date: Utc::now(),
            image: PLACEHOLDER_IMAGE.to_owned(),
        };

        let payload = sink_payload(&record);
        assert_eq!(payload["productname"], "Huile d'argan");
        assert_eq!(payload["price"], "1200,00");
        assert_eq!(payload["quantity"], 2);
        // Timestamp and image stay local.
        assert!(payload.get("date").is_none());
        assert!(payload.get("image").is_none());
    }

    #[test]
    fn test_order_error_display() {
        let err = OrderError::Sink {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 order sink calls failed");
    }
}
