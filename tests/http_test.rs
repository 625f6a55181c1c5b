//! End-to-end runs against a throwaway local HTTP server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use quickresearch::audit::Method;
use quickresearch::config::Config;
use quickresearch::consts::NO_RESULTS;
use quickresearch::coordinator::Coordinator;
use quickresearch::error::Error;

/// A request as the server saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = Arc<dyn Fn(&Seen) -> (u16, String) + Send + Sync>;

struct TestServer {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl TestServer {
    async fn start(handler: impl Fn(&Seen) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let log = Arc::clone(&seen);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = Arc::clone(&log);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let _ = serve(stream, log, handler).await;
                });
            }
        });

        Self { base_url, seen }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    log: Arc<Mutex<Vec<Seen>>>,
    handler: Handler,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let seen = Seen {
        method,
        path,
        headers,
        body,
    };
    let (status, reply) = handler(&seen);
    log.lock().unwrap().push(seen);

    let response = format!(
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn coordinator(base_url: &str) -> Coordinator {
    let mut config = Config::new("test-token", "test-app");
    config.base_url = base_url.to_string();
    config.fetch_delay = Duration::from_millis(10);
    config.timeout = Duration::from_secs(5);
    Coordinator::from_config(&config).unwrap()
}

#[tokio::test]
async fn full_round_trip_over_http() {
    let server = TestServer::start(|req| match req.method.as_str() {
        "POST" => (200, json!({"status": "queued"}).to_string()),
        "GET" => (200, json!({"text_value": "Paris is the capital..."}).to_string()),
        _ => (200, "{}".to_string()),
    })
    .await;
    let coord = coordinator(&server.base_url);

    let answer = coord.research("What is the capital of France?").await.unwrap();
    assert_eq!(answer.text, "Paris is the capital...");

    let seen = server.seen();
    assert_eq!(seen.len(), 2);

    let submit = &seen[0];
    assert_eq!(submit.method, "POST");
    assert_eq!(submit.path, "/api_tools/rapid_research");
    assert_eq!(submit.header("authorization"), Some("Bearer test-token"));
    assert_eq!(submit.header("x-generated-app-id"), Some("test-app"));
    assert_eq!(submit.header("content-type"), Some("application/json"));
    let body = submit.json();
    let name = body["created_object_name"].as_str().unwrap().to_string();
    assert!(body["goal"].as_str().unwrap().ends_with("What is the capital of France?"));

    let fetch = &seen[1];
    assert_eq!(fetch.method, "GET");
    assert_eq!(fetch.path, format!("/api_tools/return_data/{name}"));
    assert_eq!(fetch.header("authorization"), Some("Bearer test-token"));
    assert_eq!(fetch.header("x-generated-app-id"), Some("test-app"));

    let outcomes = coord.delete_all().await;
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_ok());

    let seen = server.seen();
    assert_eq!(seen[2].method, "DELETE");
    assert_eq!(seen[2].path, format!("/api_tools/objects/{name}"));
    assert_eq!(coord.audit_log().len(), 3);
    assert_eq!(coord.audit_log().entries()[0].method, Method::Delete);
}

#[tokio::test]
async fn http_rejection_carries_service_message() {
    let server = TestServer::start(|_| (500, json!({"message": "quota exceeded"}).to_string())).await;
    let coord = coordinator(&server.base_url);

    let err = coord.research("anything").await.unwrap_err();
    assert_eq!(err, Error::RemoteRejected("quota exceeded".into()));
    assert_eq!(server.seen().len(), 1);
    assert_eq!(coord.registry_len(), 1);
}

#[tokio::test]
async fn non_json_fetch_body_means_no_results() {
    let server = TestServer::start(|req| match req.method.as_str() {
        "POST" => (200, "{}".to_string()),
        _ => (200, "still working".to_string()),
    })
    .await;
    let coord = coordinator(&server.base_url);

    let answer = coord.research("q").await.unwrap();
    assert_eq!(answer.text, NO_RESULTS);
    assert_eq!(answer.raw, Value::Null);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let coord = coordinator(&base_url);
    let err = coord.research("q").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err:?}");

    // Deleting the never-created object fails quietly.
    let outcomes = coord.delete_all().await;
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_ok());
    assert_eq!(coord.registry_len(), 0);
    assert_eq!(coord.audit_log().len(), 2);
}

#[tokio::test]
async fn submit_body_goes_out_as_one_json_document() {
    let server = TestServer::start(|_| (200, "{}".to_string())).await;
    let coord = coordinator(&server.base_url);

    coord.research("  Why is the sky blue?  ").await.unwrap();

    let submit = &server.seen()[0];
    let content_types = submit
        .headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .count();
    assert_eq!(content_types, 1);

    let body = submit.json();
    let fields = body.as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert!(fields["goal"].as_str().unwrap().ends_with("Why is the sky blue?"));

    let fetch = &server.seen()[1];
    assert!(fetch.body.is_empty());
    assert!(fetch.header("content-type").is_none());
}

#[tokio::test]
async fn missing_object_on_fetch_is_a_retrieval_error() {
    let server = TestServer::start(|req| match req.method.as_str() {
        "POST" => (200, "{}".to_string()),
        _ => (404, json!({"message": "object not found"}).to_string()),
    })
    .await;
    let coord = coordinator(&server.base_url);

    let err = coord.research("q").await.unwrap_err();
    assert_eq!(
        err,
        Error::Retrieval(Box::new(Error::RemoteRejected("object not found".into())))
    );
    assert_eq!(server.seen().len(), 2);
}
