//! Remote document store over HTTP
//!
//! Layout, relative to the base URL:
//! `GET/DELETE /notes`, `GET/PUT/DELETE /notes/{id}`, `GET /deletes`,
//! `PUT/DELETE /deletes/{id}`. Bodies are JSON notes.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::NoteNetworkDataSource;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::config::{is_http_url, non_blank};

const NOTES_COLLECTION: &str = "notes";
const DELETES_COLLECTION: &str = "deletes";
/// Plain-text error bodies are cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 180;

#[derive(Clone)]
pub struct HttpNoteNetwork {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpNoteNetwork {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpNoteNetwork")
            .field("base_url", &self.base_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpNoteNetwork {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.into())?,
            auth_token: auth_token.as_deref().and_then(non_blank),
            client: reqwest::Client::builder().build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.base_url)
    }

    fn document_url(&self, collection: &str, id: &NoteId) -> String {
        format!(
            "{}/{collection}/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Network(parse_api_error(status, &body)))
    }

    /// `DELETE` that treats 404 as already gone.
    async fn send_delete(&self, url: String) -> Result<()> {
        let response = self.authorized(self.client.delete(url)).send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Network(parse_api_error(status, &body)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Note>> {
        let response = self
            .send(self.client.get(self.collection_url(collection)))
            .await?;
        Ok(response.json::<Vec<Note>>().await?)
    }

    async fn put(&self, collection: &str, note: &Note) -> Result<()> {
        self.send(
            self.client
                .put(self.document_url(collection, &note.id))
                .json(note),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl NoteNetworkDataSource for HttpNoteNetwork {
    async fn insert_or_update_note(&self, note: &Note) -> Result<()> {
        self.put(NOTES_COLLECTION, note).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        self.send_delete(self.document_url(NOTES_COLLECTION, id))
            .await
    }

    async fn insert_deleted_note(&self, note: &Note) -> Result<()> {
        self.put(DELETES_COLLECTION, note).await
    }

    async fn delete_deleted_note(&self, note: &Note) -> Result<()> {
        self.send_delete(self.document_url(DELETES_COLLECTION, &note.id))
            .await
    }

    async fn get_deleted_notes(&self) -> Result<Vec<Note>> {
        self.list(DELETES_COLLECTION).await
    }

    async fn delete_all_notes(&self) -> Result<()> {
        self.send(self.client.delete(self.collection_url(NOTES_COLLECTION)))
            .await?;
        Ok(())
    }

    async fn search_note(&self, note: &Note) -> Result<Option<Note>> {
        let response = self
            .authorized(
                self.client
                    .get(self.document_url(NOTES_COLLECTION, &note.id)),
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(parse_api_error(status, &body)));
        }
        Ok(Some(response.json::<Note>().await?))
    }

    async fn get_all_notes(&self) -> Result<Vec<Note>> {
        self.list(NOTES_COLLECTION).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body
        .trim()
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect::<String>();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = non_blank(&raw)
        .ok_or_else(|| Error::InvalidInput("remote URL must not be empty".to_string()))?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "remote URL must include http:// or https://".to_string(),
        ))
    }
}
