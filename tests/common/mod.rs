//! Shared utilities for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use token_info::blockchain::{BlockchainError, BlockchainResult, NodeQuery, NodeStatus, PendingStatus};

/// One request received by the mock algod.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Handle to a running mock algod.
pub struct MockAlgod {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockAlgod {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock algod on an ephemeral port.
///
/// `handler` maps each request to `(status, json body)`.
pub async fn start_mock_algod<F>(handler: F) -> MockAlgod
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                recorded.lock().unwrap().push(request.clone());
                let (status, body) = handler(&request);
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockAlgod { addr, requests }
}

/// Accept connections and never answer them.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// Backend that reads each request in full, then closes the connection
/// without answering.
pub async fn start_dropping_backend() -> MockAlgod {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            if let Some(request) = read_request(&mut socket).await {
                recorded.lock().unwrap().push(request);
            }
        }
    });
    MockAlgod { addr, requests }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

pub fn status_json(last_round: u64) -> String {
    format!(
        r#"{{"last-round":{},"time-since-last-round":1000,"catchup-time":0,"last-version":"future"}}"#,
        last_round
    )
}

pub fn node_status(last_round: u64) -> NodeStatus {
    NodeStatus {
        last_round,
        time_since_last_round: 0,
        catchup_time: 0,
        last_version: String::new(),
    }
}

/// Scripted pending response, or a transport failure.
#[derive(Debug, Clone)]
pub enum Step {
    Pending(PendingStatus),
    Fail(String),
}

pub fn pending() -> Step {
    Step::Pending(PendingStatus::default())
}

pub fn confirmed(round: u64) -> Step {
    Step::Pending(PendingStatus {
        confirmed_round: Some(round),
        ..Default::default()
    })
}

pub fn rejected(message: &str) -> Step {
    Step::Pending(PendingStatus {
        pool_error: Some(message.to_string()),
        ..Default::default()
    })
}

/// In-memory node: serves scripted pending responses and advances one round
/// per wait. Once the script runs out the last step repeats.
pub struct ScriptedNode {
    round: Mutex<u64>,
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Step>,
    queried_at: Mutex<Vec<u64>>,
    waits: Mutex<Vec<u64>>,
}

impl ScriptedNode {
    pub fn new(baseline: u64, steps: Vec<Step>) -> Self {
        Self {
            round: Mutex::new(baseline),
            steps: Mutex::new(steps.into()),
            last: Mutex::new(pending()),
            queried_at: Mutex::new(Vec::new()),
            waits: Mutex::new(Vec::new()),
        }
    }

    /// Rounds at which pending info was queried.
    pub fn queried_at(&self) -> Vec<u64> {
        self.queried_at.lock().unwrap().clone()
    }

    /// Rounds passed to `wait_for_round_after`.
    pub fn waits(&self) -> Vec<u64> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeQuery for ScriptedNode {
    async fn status(&self) -> BlockchainResult<NodeStatus> {
        Ok(node_status(*self.round.lock().unwrap()))
    }

    async fn pending_transaction_information(&self, _tx_id: &str) -> BlockchainResult<PendingStatus> {
        let round = *self.round.lock().unwrap();
        self.queried_at.lock().unwrap().push(round);

        let step = match self.steps.lock().unwrap().pop_front() {
            Some(step) => {
                *self.last.lock().unwrap() = step.clone();
                step
            }
            None => self.last.lock().unwrap().clone(),
        };
        match step {
            Step::Pending(status) => Ok(status),
            Step::Fail(message) => Err(BlockchainError::Rpc(message)),
        }
    }

    async fn wait_for_round_after(&self, round: u64) -> BlockchainResult<NodeStatus> {
        self.waits.lock().unwrap().push(round);
        let mut current = self.round.lock().unwrap();
        *current = round + 1;
        Ok(node_status(*current))
    }
}

/// Node whose round never advances.
pub struct StalledNode;

#[async_trait]
impl NodeQuery for StalledNode {
    async fn status(&self) -> BlockchainResult<NodeStatus> {
        Ok(node_status(1))
    }

    async fn pending_transaction_information(&self, _tx_id: &str) -> BlockchainResult<PendingStatus> {
        Ok(PendingStatus::default())
    }

    async fn wait_for_round_after(&self, _round: u64) -> BlockchainResult<NodeStatus> {
        std::future::pending().await
    }
}
