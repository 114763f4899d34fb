//! Shared utilities for integration tests.

use std::net::SocketAddr;

use qc_console::config::ConsoleConfig;
use qc_console::http::HttpServer;
use qc_console::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Small visit export covering every QC rule kind.
#[allow(dead_code)]
pub const VISITS_CSV: &str = "\
SUBJ_ID,LOCATION_NAME,VISIT_NM,SUBJ_STATUS,ENROLL_COPDNOTCOPD,AGE
S001,Seoul,V1,Screening,1,45
S002,Seoul,V2,Screening Fail,2,38
S003,Busan,V1,Completed,4,67
,Busan,V1,Drop,3,71
";

/// A running console bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    // Dropping the coordinator closes the channel and stops the server.
    _shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the server in the background and return once it is listening.
pub async fn start_server(config: ConsoleConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestServer {
        addr,
        _shutdown: shutdown,
    }
}

/// Client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
