//! Private keys must not reach the log output, at any level, on any route.

mod common;

use common::{service_config, start_service, MockNode, KEY, RECEIVER};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_private_key_never_logged() {
    let capture = Capture::default();
    let writer = capture.clone();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .init();

    let node = MockNode::start().await;
    let base = start_service(service_config(&node.url())).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/fee?energy=1000&privateKey={}&type=1", base, KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = client
        .post(format!("{}/rent", base))
        .json(&json!({"receive": RECEIVER, "type": 1, "amount": 1000, "privateKey": KEY}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    // Failing node: exercises the warn paths as well.
    let down = start_service(service_config("http://127.0.0.1:9")).await;
    let res = client
        .get(format!("{}/fee?energy=1000&privateKey={}&type=1", down, KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);

    let logs = capture.text();
    assert!(logs.contains("http_request"));
    assert!(logs.contains("path=/fee"));
    assert!(logs.contains("Fee quoted"));
    assert!(!logs.contains(KEY), "private key found in logs:\n{}", logs);
}
