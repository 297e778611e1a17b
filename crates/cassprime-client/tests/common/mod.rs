//! In-process stand-ins for the stub server's admin API.

#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request received by the admin server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

type Responder = dyn Fn(&RecordedCall) -> (u16, String) + Send + Sync;

/// HTTP server that records every call and answers through a responder
pub struct AdminServer {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    task: JoinHandle<()>,
}

impl AdminServer {
    /// Answer every call with the given status and an empty body
    pub async fn with_status(status: u16) -> Self {
        Self::start(move |_| (status, String::new())).await
    }

    /// Answer GET requests with the given body and everything else with 200
    pub async fn serving(body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |call| {
            if call.method == "GET" {
                (200, body.clone())
            } else {
                (200, String::new())
            }
        })
        .await
    }

    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedCall) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind admin server");
        let port = listener.local_addr().expect("No local address").port();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let responder: Arc<Responder> = Arc::new(responder);

        let recorded = calls.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();
                let responder = responder.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let recorded = recorded.clone();
                        let responder = responder.clone();
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let content_type = req
                                .headers()
                                .get(CONTENT_TYPE)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            let body = req.into_body().collect().await?.to_bytes();
                            let call = RecordedCall {
                                method,
                                path,
                                content_type,
                                body: String::from_utf8_lossy(&body).into_owned(),
                            };

                            let (status, reply) = responder(&call);
                            recorded.lock().push(call);

                            let mut response = Response::new(Full::new(Bytes::from(reply)));
                            *response.status_mut() = hyper::StatusCode::from_u16(status)
                                .expect("Invalid status code");
                            Ok::<_, hyper::Error>(response)
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            url: format!("http://127.0.0.1:{port}"),
            calls,
            task,
        }
    }

    /// All calls received so far, in arrival order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// The only call received, panicking if there were none or several
    pub fn single_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {calls:?}");
        calls.into_iter().next().unwrap()
    }
}

impl Drop for AdminServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Server that answers every connection with bytes that are not HTTP, then hangs up
pub struct GarbageServer {
    pub url: String,
    task: JoinHandle<()>,
}

impl GarbageServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind garbage server");
        let port = listener.local_addr().expect("No local address").port();

        let task = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let _ = stream.write_all(b"\x00\x7fnot http at all\r\n\r\n").await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            url: format!("http://127.0.0.1:{port}"),
            task,
        }
    }
}

impl Drop for GarbageServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
