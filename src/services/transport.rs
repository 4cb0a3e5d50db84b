// src/services/transport.rs
use crate::error::TransportError;
use crate::models::{ApiResponse, SubmissionResult};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use url::Url;

/// One outbound submission: where to send it and the JSON object to send.
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub endpoint: Url,
    pub method: Method,
    pub body: HashMap<String, String>,
}

/// A completed exchange: the HTTP status plus the decoded envelope.
#[derive(Debug, Clone)]
pub struct FormResponse {
    pub status: StatusCode,
    pub envelope: ApiResponse,
}

impl FormResponse {
    pub fn new(status: StatusCode, envelope: ApiResponse) -> Self {
        Self { status, envelope }
    }

    /// Folds status and envelope into the submission outcome.
    pub fn into_result(self) -> SubmissionResult {
        SubmissionResult::from_envelope(self.status.is_success(), self.envelope)
    }
}

/// Sends form submissions to the backend. Production uses
/// [`HttpTransport`]; tests script exchanges with [`ScriptedTransport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &FormRequest) -> Result<FormResponse, TransportError>;
}

/// [`Transport`] over a shared reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Client without a request timeout; a submission runs until the
    /// server answers or the connection drops.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &FormRequest) -> Result<FormResponse, TransportError> {
        tracing::debug!("submitting {} {}", request.method, request.endpoint);

        let response = self
            .client
            .request(request.method.clone(), request.endpoint.clone())
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let envelope: ApiResponse = serde_json::from_slice(&bytes)?;

        Ok(FormResponse::new(status, envelope))
    }
}

/// Scripted [`Transport`]: replies are queued up front and handed out in
/// order, and every request is captured for later inspection.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<FormResponse, TransportError>>>,
    requests: Mutex<Vec<FormRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a completed exchange.
    pub fn respond(&self, response: FormResponse) {
        self.replies
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn fail(&self, error: TransportError) {
        self.replies
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push_back(Err(error));
    }

    /// Number of submissions sent so far.
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .len()
    }

    /// Copies of the captured requests, in send order.
    pub fn requests(&self) -> Vec<FormRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &FormRequest) -> Result<FormResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(request.clone());
        self.replies
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::General(
                    "no scripted reply remaining".to_string(),
                ))
            })
    }
}
