use axum::{Router, body::Body, http::Request, routing::get};
use bookscraper::middleware::{logger::JsonLinesSink, observe};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn hello_router() -> Router {
    Router::new().route("/hello", get(|| async { "hello" }))
}

#[tokio::test]
async fn json_lines_sink_writes_one_object_per_request() {
    let buffer = SharedBuffer::default();
    let app = observe(hello_router(), Arc::new(JsonLinesSink::new(buffer.clone())));

    for id in ["first", "second"] {
        let request = Request::builder()
            .uri("/hello")
            .header("x-request-id", id)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap();
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["trace_id"], "first");
    assert_eq!(lines[1]["trace_id"], "second");
    for line in &lines {
        assert_eq!(line["event"], "http_request");
        assert_eq!(line["status_code"], 200);
        assert!(line["duration_ms"].is_number());
        assert!(line["client_ip"].is_null());
        assert!(line["user_agent"].is_null());
        assert!(line["error"].is_null());
    }
}

#[tokio::test]
async fn broken_sink_does_not_affect_response() {
    let app = observe(hello_router(), Arc::new(JsonLinesSink::new(ClosedPipe)));

    let request = Request::builder()
        .uri("/hello")
        .header("x-request-id", "still-here")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "still-here");
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&body[..], b"hello");
}
