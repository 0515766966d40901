#![cfg(feature = "server")]

use std::{
    collections::BTreeMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use structview::{Explorer, Result, Snapshot, server};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

struct Running {
    addr: SocketAddr,
    cancel: CancellationToken,
    handle: JoinHandle<Result>,
}

async fn start() -> Running {
    let mut accounts = BTreeMap::new();
    accounts.insert("alice".to_string(), vec![10u32, 20]);
    accounts.insert("bob".to_string(), vec![]);
    start_with(Explorer::default().with_root("accounts", accounts).unwrap()).await
}

async fn start_with(explorer: Explorer) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(server::serve_with_listener(
        listener,
        explorer,
        cancel.clone(),
    ));
    Running {
        addr,
        cancel,
        handle,
    }
}

/// Sends a single request and returns the status code and body.
async fn request(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    let status = response[9..12].parse().unwrap();
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn test_snapshot_and_roots() {
    let running = start().await;

    let (status, body) = request(running.addr, "GET", "/", "").await;
    assert_eq!(status, 200);
    let snapshot: Snapshot = serde_json::from_str(&body).unwrap();
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0].cells[0].label, "accounts");

    let (status, body) = request(running.addr, "GET", "/roots", "").await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"["accounts"]"#);

    running.cancel.cancel();
    running.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_instructions() {
    let running = start().await;

    let (status, body) = request(
        running.addr,
        "POST",
        "/instructions",
        r#"{"row": 0, "column": 0, "selections": ["alice", "carol"], "action": "right"}"#,
    )
    .await;
    assert_eq!(status, 200);
    let navigation: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(navigation["placed"][0]["label"], "accounts.alice");
    assert_eq!(navigation["skipped"][0]["selection"], "carol");

    let (_, body) = request(running.addr, "GET", "/snapshot", "").await;
    let snapshot: Snapshot = serde_json::from_str(&body).unwrap();
    let alice = snapshot.cell(0, 1).unwrap();
    assert_eq!(alice.path, "alice");
    assert_eq!(alice.fields[1].value, "20");

    running.cancel.cancel();
    running.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bad_instructions_are_rejected() {
    let running = start().await;

    let (status, body) = request(
        running.addr,
        "POST",
        "/instructions",
        r#"{"row": 0, "column": 0, "selections": ["alice"], "action": "up"}"#,
    )
    .await;
    assert_eq!(status, 400);
    assert!(body.contains("Invalid action 'up'"));

    let (status, _) = request(running.addr, "POST", "/instructions", "{not json").await;
    assert_eq!(status, 400);

    let (status, _) = request(running.addr, "GET", "/instructions", "").await;
    assert_eq!(status, 405);

    let (_, body) = request(running.addr, "GET", "/", "").await;
    let snapshot: Snapshot = serde_json::from_str(&body).unwrap();
    assert_eq!(snapshot.occupied().count(), 1);

    running.cancel.cancel();
    running.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_held_lock_stalls_only_its_own_request() {
    let queue = Arc::new(Mutex::new(vec![1u32, 2]));
    let explorer = Explorer::default();
    explorer.register_shared("queue", queue.clone()).unwrap();
    let running = start_with(explorer).await;

    let guard = queue.lock().unwrap();
    let pending = tokio::spawn(request(running.addr, "GET", "/", ""));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!pending.is_finished());

    let (status, body) = tokio::time::timeout(
        Duration::from_secs(5),
        request(running.addr, "GET", "/roots", ""),
    )
    .await
    .expect("server stalled by a held lock");
    assert_eq!(status, 200);
    assert_eq!(body, r#"["queue"]"#);

    drop(guard);
    let (status, body) = pending.await.unwrap();
    assert_eq!(status, 200);
    let snapshot: Snapshot = serde_json::from_str(&body).unwrap();
    let values: Vec<_> = snapshot.rows[0].cells[0]
        .fields
        .iter()
        .map(|f| f.value.as_str())
        .collect();
    assert_eq!(values, vec!["1", "2"]);

    running.cancel.cancel();
    running.handle.await.unwrap().unwrap();
}
