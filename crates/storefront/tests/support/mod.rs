//! Shared helpers for integration tests.

use std::net::SocketAddr;

use axum::Router;
use url::Url;

/// Serve a throwaway router on an ephemeral port and return its address.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    addr
}

/// `http://` URL for a spawned test server.
pub fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).expect("valid url")
}
