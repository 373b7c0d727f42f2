//! Session cart and checkout through the full router.

mod support;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};

use souk_core::Lang;
use souk_storefront::config::SoukConfig;
use souk_storefront::middleware::create_session_layer;
use souk_storefront::routes;
use souk_storefront::state::AppState;

use support::{base_url, spawn_server};

/// Sink that accepts everything.
fn sink_router(hits: Arc<AtomicUsize>) -> Router {
    async fn handler(State(hits): State<Arc<AtomicUsize>>, Json(_): Json<Value>) -> StatusCode {
        hits.fetch_add(1, Ordering::SeqCst);
        StatusCode::OK
    }

    Router::new().route("/exec", post(handler)).with_state(hits)
}

struct Harness {
    _dir: tempfile::TempDir,
    client: reqwest::Client,
    base: url::Url,
    sink_hits: Arc<AtomicUsize>,
}

async fn harness() -> Harness {
    let sink_hits = Arc::new(AtomicUsize::new(0));
    let sink_addr = spawn_server(sink_router(Arc::clone(&sink_hits))).await;
    let mut webhook_url = base_url(sink_addr);
    webhook_url.set_path("/exec");

    let dir = tempfile::tempdir().expect("tempdir");
    let config = SoukConfig {
        // The catalog/accounts API is not exercised by the cart flow.
        api_base_url: base_url(sink_addr),
        order_webhook_url: webhook_url,
        data_dir: PathBuf::from(dir.path()),
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        default_lang: Lang::Fr,
        sentry_dsn: None,
    };

    let state = AppState::new(config).expect("app state");
    let app = Router::new()
        .merge(routes::routes())
        .layer(create_session_layer())
        .with_state(state);

    let addr = spawn_server(app).await;
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client");

    Harness {
        _dir: dir,
        client,
        base: base_url(addr),
        sink_hits,
    }
}

impl Harness {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base.as_str().trim_end_matches('/'))
    }
}

fn argan_item() -> Value {
    json!({
        "id": 7,
        "name": "Huile d'argan",
        "price": "1 200,00 DA",
        "image": "/media/products/argan.jpg",
        "quantity": 1
    })
}

#[tokio::test]
async fn add_merges_and_update_clamps() {
    let h = harness().await;

    // Two adds of the same product merge into one line.
    for expected in 1..=2 {
        let response = h
            .client
            .post(h.url("/cart/items"))
            .json(&argan_item())
            .send()
            .await
            .expect("add to cart");
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("json body");
        assert_eq!(body["count"], expected);
    }

    let cart: Value = h
        .client
        .get(h.url("/cart"))
        .send()
        .await
        .expect("show cart")
        .json()
        .await
        .expect("json body");
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["subtotal"], "2400,00 DA");

    // Requesting quantity 0 clamps to 1.
    let cart: Value = h
        .client
        .patch(h.url("/cart/items/7"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("update quantity")
        .json()
        .await
        .expect("json body");
    assert_eq!(cart["items"][0]["quantity"], 1);
    assert_eq!(cart["count"], 1);
}

#[tokio::test]
async fn remove_and_clear_empty_the_cart() {
    let h = harness().await;

    h.client
        .post(h.url("/cart/items"))
        .json(&argan_item())
        .send()
        .await
        .expect("add to cart");
    h.client
        .post(h.url("/cart/items"))
        .json(&json!({ "id": 8, "name": "Savon noir", "price": "350", "quantity": 2 }))
        .send()
        .await
        .expect("add second product");

    let cart: Value = h
        .client
        .delete(h.url("/cart/items/7"))
        .send()
        .await
        .expect("remove line")
        .json()
        .await
        .expect("json body");
    assert_eq!(cart["count"], 2);
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);

    let cart: Value = h
        .client
        .post(h.url("/cart/clear"))
        .send()
        .await
        .expect("clear cart")
        .json()
        .await
        .expect("json body");
    assert_eq!(cart["count"], 0);

    let count: Value = h
        .client
        .get(h.url("/cart/count"))
        .send()
        .await
        .expect("count")
        .json()
        .await
        .expect("json body");
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn checkout_requires_contact_details() {
    let h = harness().await;

    h.client
        .post(h.url("/cart/items"))
        .json(&argan_item())
        .send()
        .await
        .expect("add to cart");

    // No stored profile and no contact payload: validation failure.
    let response = h
        .client
        .post(h.url("/cart/checkout"))
        .json(&json!({}))
        .send()
        .await
        .expect("checkout");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A contact payload missing the phone is rejected too.
    let response = h
        .client
        .post(h.url("/cart/checkout"))
        .json(&json!({ "contact": { "name": "Amina B.", "phone": "" } }))
        .send()
        .await
        .expect("checkout");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(h.sink_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn checkout_submits_clears_cart_and_records_history() {
    let h = harness().await;

    h.client
        .post(h.url("/cart/items"))
        .json(&argan_item())
        .send()
        .await
        .expect("add to cart");
    h.client
        .post(h.url("/cart/items"))
        .json(&json!({ "id": 8, "name": "Savon noir", "price": "350", "quantity": 2 }))
        .send()
        .await
        .expect("add second product");

    let response = h
        .client
        .post(h.url("/cart/checkout"))
        .json(&json!({
            "contact": {
                "name": "Amina B.",
                "email": "amina@example.dz",
                "phone": "0550 12 34 56",
                "wilaya": "Alger",
                "address": "12 rue Didouche Mourad"
            }
        }))
        .send()
        .await
        .expect("checkout");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["ok"], true);
    assert_eq!(body["submitted"], 2);
    assert_eq!(body["message"], "Commande(s) bien enregistrée(s) !");

    // One sink call per line.
    assert_eq!(h.sink_hits.load(Ordering::SeqCst), 2);

    // The cart is empty afterwards.
    let count: Value = h
        .client
        .get(h.url("/cart/count"))
        .send()
        .await
        .expect("count")
        .json()
        .await
        .expect("json body");
    assert_eq!(count["count"], 0);

    // Both lines landed in the email-scoped local history.
    let history: Value = h
        .client
        .get(h.url("/orders"))
        .send()
        .await
        .expect("orders")
        .json()
        .await
        .expect("json body");
    assert_eq!(history.as_array().expect("history").len(), 2);
}

#[tokio::test]
async fn empty_cart_checkout_is_rejected() {
    let h = harness().await;

    let response = h
        .client
        .post(h.url("/cart/checkout"))
        .json(&json!({}))
        .send()
        .await
        .expect("checkout");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Votre panier est vide.");
}

#[tokio::test]
async fn language_preference_roundtrip() {
    let h = harness().await;

    let body: Value = h
        .client
        .get(h.url("/language"))
        .send()
        .await
        .expect("show language")
        .json()
        .await
        .expect("json body");
    assert_eq!(body["language"], "fr");

    let body: Value = h
        .client
        .put(h.url("/language"))
        .json(&json!({ "language": "ar-DZ" }))
        .send()
        .await
        .expect("update language")
        .json()
        .await
        .expect("json body");
    assert_eq!(body["language"], "ar");
    assert_eq!(body["message"], "تم تحديث اللغة.");

    let body: Value = h
        .client
        .get(h.url("/language"))
        .send()
        .await
        .expect("show language")
        .json()
        .await
        .expect("json body");
    assert_eq!(body["language"], "ar");
}
