//! Calendar provider client for read-only event listing.
//!
//! Talks to a Google-Calendar-shaped events API. The client is deliberately
//! thin: it is handed a bearer token by the caller per request and never
//! stores credentials or drives an OAuth flow itself. The base URL is
//! configurable so tests and alternate providers can point it elsewhere.

use crate::libs::config::CalendarConfig;
use anyhow::{bail, Result};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Calendar API client for retrieving upcoming events.
///
/// Stateless and thread-safe; suitable for reuse across requests.
#[derive(Debug)]
pub struct Calendar {
    /// HTTP client with connection pooling
    client: Client,
    /// Provider endpoint configuration
    config: CalendarConfig,
}

/// Events list response from the provider.
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

/// Single event as the provider returns it. Only the fields the task list
/// UI displays are deserialized.
#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    summary: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

/// Provider event times carry either a `dateTime` (timed event) or a `date`
/// (all-day event).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    fn into_value(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

/// Simplified event shape served to the frontend.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl Calendar {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    /// Lists upcoming events from the primary calendar, earliest first.
    ///
    /// `token` is the caller-supplied OAuth bearer token, passed through
    /// verbatim. Provider-side rejection surfaces as an error with the
    /// upstream status code.
    pub async fn list_events(&self, token: &str) -> Result<Vec<CalendarEvent>> {
        let url = format!("{}/calendars/primary/events", self.config.api_url);
        let time_min = Utc::now().to_rfc3339();
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("singleEvents", "true"), ("orderBy", "startTime"), ("timeMin", time_min.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("calendar provider returned status {}", response.status());
        }

        let events = response.json::<EventsResponse>().await?;
        Ok(events
            .items
            .into_iter()
            .map(|raw| CalendarEvent {
                id: raw.id,
                summary: raw.summary.unwrap_or_default(),
                start: raw.start.and_then(EventTime::into_value),
                end: raw.end.and_then(EventTime::into_value),
            })
            .collect())
    }
}
