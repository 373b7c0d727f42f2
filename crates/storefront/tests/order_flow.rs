//! Order submission against a throwaway webhook sink.

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::Value;

use souk_core::{Price, ProductId, UserProfile};
use souk_storefront::services::auth::ApiClient;
use souk_storefront::services::orders::{OrderError, OrderLine, OrderService};
use souk_storefront::store::LocalStore;

use support::{base_url, spawn_server};

/// Sink that accepts every payload, except product name "boom" (HTTP 500).
fn sink_router(hits: Arc<AtomicUsize>) -> Router {
    async fn handler(
        State(hits): State<Arc<AtomicUsize>>,
        Json(payload): Json<Value>,
    ) -> StatusCode {
        hits.fetch_add(1, Ordering::SeqCst);
        if payload["productname"] == "boom" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }

    Router::new().route("/exec", post(handler)).with_state(hits)
}

fn line(id: i64, name: &str, price: &str, quantity: u32) -> OrderLine {
    OrderLine {
        productname: name.to_owned(),
        id: ProductId::new(id),
        price: price.parse::<Price>().expect("valid price"),
        quantity,
        image: None,
    }
}

fn profile(email: &str) -> UserProfile {
    UserProfile {
        name: "Amina B.".to_owned(),
        email: email.to_owned(),
        phone: "0550 12 34 56".to_owned(),
        wilaya: "Alger".to_owned(),
        address: "12 rue Didouche Mourad".to_owned(),
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    store: LocalStore,
    api: ApiClient,
    http: reqwest::Client,
    webhook_url: url::Url,
    hits: Arc<AtomicUsize>,
}

async fn harness() -> Harness {
    let hits = Arc::new(AtomicUsize::new(0));
    let sink_addr = spawn_server(sink_router(Arc::clone(&hits))).await;
    let mut webhook_url = base_url(sink_addr);
    webhook_url.set_path("/exec");

    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open store");
    // The accounts API is unused in these tests; any address will do.
    let api = ApiClient::new(base_url(sink_addr), store.clone()).expect("api client");

    Harness {
        _dir: dir,
        store,
        api,
        http: reqwest::Client::new(),
        webhook_url,
        hits,
    }
}

#[tokio::test]
async fn submit_posts_every_line_and_appends_history() {
    let h = harness().await;
    h.store.save_profile(&profile("amina@example.dz")).expect("save profile");

    let orders = OrderService::new(&h.store, &h.api, &h.http, &h.webhook_url);
    let submitted = orders
        .submit(vec![
            line(1, "Huile d'argan", "1200,00", 2),
            line(2, "Savon noir", "350", 1),
            line(3, "Ghassoul", "420,50", 3),
        ])
        .await
        .expect("submission should succeed");

    assert_eq!(submitted, 3);
    assert_eq!(h.hits.load(Ordering::SeqCst), 3);

    let history = h.store.orders();
    assert_eq!(history.len(), 3);
    // All records share one submission timestamp and the buyer's contact.
    assert!(history.iter().all(|r| r.date == history[0].date));
    assert!(history.iter().all(|r| r.email == "amina@example.dz"));
}

#[tokio::test]
async fn partial_sink_failure_reports_error_but_keeps_history() {
    let h = harness().await;
    h.store.save_profile(&profile("amina@example.dz")).expect("save profile");

    let orders = OrderService::new(&h.store, &h.api, &h.http, &h.webhook_url);
    let err = orders
        .submit(vec![line(1, "Huile d'argan", "1200,00", 1), line(2, "boom", "10", 1)])
        .await
        .expect_err("one sink call fails");

    match err {
        OrderError::Sink { failed, total } => {
            assert_eq!(failed, 1);
            assert_eq!(total, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The history write happened before the sink calls: both records are
    // recorded even though the submission failed.
    assert_eq!(h.store.orders().len(), 2);
    assert_eq!(orders.local_orders().len(), 2);
}

#[tokio::test]
async fn empty_submission_is_rejected() {
    let h = harness().await;
    let orders = OrderService::new(&h.store, &h.api, &h.http, &h.webhook_url);

    assert!(matches!(
        orders.submit(Vec::new()).await,
        Err(OrderError::Empty)
    ));
    assert_eq!(h.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn anonymous_submission_uses_placeholders() {
    let h = harness().await;
    let orders = OrderService::new(&h.store, &h.api, &h.http, &h.webhook_url);

    orders
        .submit(vec![line(5, "Tapis berbère", "9 500,00 DA", 1)])
        .await
        .expect("submission should succeed");

    let history = h.store.orders();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Client inconnu");
    assert_eq!(history[0].phone, "Non fourni");
    assert_eq!(history[0].wilaya, "Non spécifiée");
    assert_eq!(history[0].email, "");
    assert_eq!(history[0].image, "/placeholder-product.jpg");

    // Anonymous records have no email, so the scoped history is empty.
    assert!(orders.local_orders().is_empty());
}

#[tokio::test]
async fn local_orders_filters_by_profile_email() {
    let h = harness().await;
    let orders = OrderService::new(&h.store, &h.api, &h.http, &h.webhook_url);

    h.store.save_profile(&profile("x@x.dz")).expect("save profile");
    orders
        .submit(vec![line(1, "Huile d'argan", "1200,00", 1)])
        .await
        .expect("first submission");

    h.store.save_profile(&profile("y@y.dz")).expect("switch profile");
    orders
        .submit(vec![line(2, "Savon noir", "350", 1)])
        .await
        .expect("second submission");

    // Two records in the raw history, one visible to the current profile.
    assert_eq!(h.store.orders().len(), 2);
    let visible = orders.local_orders();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ProductId::new(2));

    h.store.save_profile(&profile("x@x.dz")).expect("switch back");
    let visible = orders.local_orders();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ProductId::new(1));
}
