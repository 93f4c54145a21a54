//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use clear_router::config::AppConfig;
use clear_router::lifecycle::{startup, Shutdown};
use clear_router::HttpServer;
use tokio::net::TcpListener;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the HTTP front for `config` on 127.0.0.1:0.
pub async fn start_server(config: AppConfig) -> TestServer {
    let startup = startup::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(startup.config, startup.resolver).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Listener is bound already; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(20)).await;
    TestServer { addr, shutdown }
}

/// Client that does not follow redirects, so 3xx responses can be checked.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
