//! HTTP backend for the remote schedule store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use daybook_core::calendar::{EventDraft, ScheduleEvent};
use daybook_core::date::format_local;

use super::wire::{WireEvent, WireEventRequest};
use super::{FetchQuery, ScheduleRemote};
use crate::config::ClientConfig;
use crate::error::{RemoteError, Result};
use crate::session::{Session, SessionProvider};

/// HTTP client for the remote schedule store.
#[derive(Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    collection_url: String,
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemote")
            .field("collection_url", &self.collection_url)
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    /// Create a client for the collection configured in `config`.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            collection_url: config.schedules_url(),
            session,
        })
    }

    /// Get the collection URL.
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn current_session(&self) -> Result<Session> {
        self.session.session().ok_or(RemoteError::SessionInvalid)
    }

    /// Maps non-2xx responses onto the error taxonomy.
    ///
    /// A 401 also drops the session so the host is sent back to sign-in. A 404
    /// on an item URL names the missing event id.
    async fn check_status(
        &self,
        operation: &str,
        event_id: Option<&str>,
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(operation, "Remote store rejected the session");
            self.session.invalidate();
            return Err(RemoteError::SessionInvalid);
        }

        let body = response.text().await.unwrap_or_default();
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, event_id) {
            return Err(RemoteError::NotFound {
                resource: id.to_string(),
            });
        }

        tracing::warn!(operation, status = status.as_u16(), body = %body, "Remote store request failed");
        Err(RemoteError::Transport {
            status: Some(status.as_u16()),
            message: error_detail(status, &body),
        })
    }

    async fn decode_event(&self, response: reqwest::Response) -> Result<ScheduleEvent> {
        let wire: WireEvent = response.json().await?;
        ScheduleEvent::try_from(wire)
    }
}

/// Detail of a failed response: the body, or the status reason when it is empty.
///
/// The operation and status code are added by the error layers above.
fn error_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("empty response")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl ScheduleRemote for HttpRemote {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<ScheduleEvent>> {
        let session = self.current_session()?;

        let mut params = vec![
            ("ownerId", query.owner_id.clone()),
            ("start_date", format_local(&query.range.start)),
            ("end_date", format_local(&query.range.end)),
        ];
        if let Some(category) = query.category {
            params.push(("category", category.as_str().to_string()));
        }

        let response = self
            .client
            .get(&self.collection_url)
            .bearer_auth(&session.token)
            .query(&params)
            .send()
            .await?;
        let response = self.check_status("fetch events", None, response).await?;

        let wire: Vec<WireEvent> = response.json().await?;
        tracing::debug!(
            count = wire.len(),
            start = %query.range.start,
            end = %query.range.end,
            "Fetched events"
        );
        wire.into_iter().map(ScheduleEvent::try_from).collect()
    }

    async fn create(&self, draft: &EventDraft) -> Result<ScheduleEvent> {
        let session = self.current_session()?;

        let response = self
            .client
            .post(&self.collection_url)
            .bearer_auth(&session.token)
            .json(&WireEventRequest::from(draft))
            .send()
            .await?;
        let response = self.check_status("create event", None, response).await?;
        self.decode_event(response).await
    }

    async fn update(&self, id: &str, event: &ScheduleEvent) -> Result<ScheduleEvent> {
        let session = self.current_session()?;

        let response = self
            .client
            .put(self.item_url(id))
            .bearer_auth(&session.token)
            .json(&WireEventRequest::from(event))
            .send()
            .await?;
        let response = self.check_status("update event", Some(id), response).await?;
        self.decode_event(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let session = self.current_session()?;

        let response = self
            .client
            .delete(self.item_url(id))
            .bearer_auth(&session.token)
            .send()
            .await?;
        self.check_status("delete event", Some(id), response).await?;
        Ok(())
    }
}
