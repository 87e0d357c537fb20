//! REST client for the chat backend.
//!
//! Four endpoints, single-attempt semantics: GET /chat for history,
//! POST /chat to send, PUT /chat/{id} to edit, DELETE /chat/{id} to
//! remove. Every mutating response carries the server's canonical
//! message list, which each call extracts and returns.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::model::{Message, MessageId, SalesContext};

/// Errors from the chat backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected shape.
    #[error("malformed {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The addressed message has no server id yet.
    #[error("message is still pending and has no server id")]
    PendingId,
}

/// A message as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub id: i64,
    pub sender_id: i64,
    pub text: String,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self {
            id: MessageId::Confirmed(wire.id),
            sender_id: wire.sender_id,
            text: wire.text,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    user_id: i64,
    message: &'a str,
    context: SalesContext,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: i64,
    response: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    new_message: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    id: i64,
    updated_messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    id: i64,
    status: String,
    updated_messages: Vec<WireMessage>,
}

/// Client for the chat backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    customer_id: i64,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// The per-request timeout guarantees every call resolves, so the
    /// loading flag can never be left hanging by a stalled request.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            customer_id: config.customer_id,
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch the full message history.
    pub async fn fetch_history(&self) -> Result<Vec<Message>, ApiError> {
        let operation = "fetch history";
        tracing::debug!(url = %self.url("/chat"), "fetching history");

        let resp = self.http.get(self.url("/chat")).send().await?;
        let resp = check_status(resp, operation)?;
        let wire: Vec<WireMessage> = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { operation, source })?;

        Ok(wire.into_iter().map(Message::from).collect())
    }

    /// Send a customer message, returning the updated canonical list.
    pub async fn send_message(
        &self,
        text: &str,
        context: SalesContext,
    ) -> Result<Vec<Message>, ApiError> {
        let operation = "send";
        let body = SendRequest {
            user_id: self.customer_id,
            message: text,
            context,
        };
        tracing::debug!(%context, "sending message");

        let resp = self.http.post(self.url("/chat")).json(&body).send().await?;
        let resp = check_status(resp, operation)?;
        let parsed: SendResponse = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { operation, source })?;
        tracing::debug!(reply_id = parsed.id, reply = %parsed.response, "assistant replied");

        Ok(parsed.messages.into_iter().map(Message::from).collect())
    }

    /// Replace the text of an existing message.
    pub async fn update_message(
        &self,
        id: MessageId,
        new_text: &str,
    ) -> Result<Vec<Message>, ApiError> {
        let operation = "update";
        let id = id.confirmed().ok_or(ApiError::PendingId)?;
        let body = UpdateRequest { new_message: new_text };
        tracing::debug!(message_id = id, "updating message");

        let resp = self
            .http
            .put(self.url(&format!("/chat/{id}")))
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, operation)?;
        let parsed: UpdateResponse = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { operation, source })?;
        tracing::debug!(message_id = parsed.id, "message updated");

        Ok(parsed.updated_messages.into_iter().map(Message::from).collect())
    }

    /// Delete a message by id.
    pub async fn delete_message(&self, id: MessageId) -> Result<Vec<Message>, ApiError> {
        let operation = "delete";
        let id = id.confirmed().ok_or(ApiError::PendingId)?;
        tracing::debug!(message_id = id, "deleting message");

        let resp = self
            .http
            .delete(self.url(&format!("/chat/{id}")))
            .send()
            .await?;
        let resp = check_status(resp, operation)?;
        let parsed: DeleteResponse = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { operation, source })?;
        tracing::debug!(message_id = parsed.id, status = %parsed.status, "message deleted");

        Ok(parsed.updated_messages.into_iter().map(Message::from).collect())
    }
}

fn check_status(
    resp: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        tracing::warn!(%status, operation, "request failed");
        Err(ApiError::Status { operation, status })
    }
}
