//! Shared fixtures for the lastmile-core integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lastmile_core::{
    CircuitBreakerConfig, GeoPoint, GeoveloConfig, GeoveloConnector, HttpClient, HttpError,
    HttpRequest, HttpResponse, Place,
};

pub const HEADER: &str = r#"["start_reference","end_reference","duration"]"#;

/// Canned transport outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    Fail(HttpError),
    /// Never answers; the connector's own timeout has to fire.
    Hang,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Status(200, body.into())
    }
}

/// Transport that replays scripted replies and records every request.
///
/// Replies are consumed in order; the last one repeats forever.
#[derive(Debug)]
pub struct ScriptedHttpClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: Reply) -> Arc<Self> {
        Self::new(vec![reply])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().expect("reply script poisoned");
        if replies.len() > 1 {
            replies.pop_front().expect("non-empty script")
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::Fail(HttpError::new("no scripted reply")))
        }
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
        let reply = self.next_reply();
        Box::pin(async move {
            match reply {
                Reply::Status(status, body) => Ok(HttpResponse::with_status(status, body)),
                Reply::Fail(error) => Err(error),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Err(HttpError::new("hang reply resumed"))
                }
            }
        })
    }
}

pub fn config() -> GeoveloConfig {
    GeoveloConfig::new("https://geovelo.example.test", "test-key")
        .expect("valid test config")
        .with_timeout(Duration::from_millis(200))
}

pub fn connector(client: Arc<ScriptedHttpClient>) -> GeoveloConnector {
    GeoveloConnector::with_http_client(config(), client)
}

pub fn connector_with_breaker(
    client: Arc<ScriptedHttpClient>,
    fail_max: u32,
    reset_timeout: Duration,
) -> GeoveloConnector {
    GeoveloConnector::with_http_client(
        config().with_circuit_breaker(CircuitBreakerConfig {
            fail_max,
            reset_timeout,
        }),
        client,
    )
}

pub fn place(lat: f64, lon: f64) -> Place {
    Place::new(GeoPoint::new(lat, lon).expect("valid coordinate"))
}

pub fn named_place(lat: f64, lon: f64, uri: &str) -> Place {
    Place::with_uri(GeoPoint::new(lat, lon).expect("valid coordinate"), uri)
}

/// Builds a `routes_m2m` table with one data row per duration.
pub fn table(durations: &[Option<u32>]) -> String {
    let mut rows = vec![HEADER.to_owned()];
    for (index, duration) in durations.iter().enumerate() {
        let cell = duration.map_or_else(|| String::from("null"), |seconds| seconds.to_string());
        rows.push(format!(r#"["start","end_{index}",{cell}]"#));
    }
    format!("[{}]", rows.join(","))
}
