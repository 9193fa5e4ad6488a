//! HTTP client for the planner API plus the background poll that keeps a
//! [`PlannerStore`] in step with the server.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

use crate::models::dish::{CreateDishRequest, Dish, UpdateDishRequest};
use crate::models::note::NoteContent;
use crate::planner::{calendar, store::PlannerStore};

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Session missing or expired; the user has to sign in again.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request failed with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub struct PlannerClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl PlannerClient {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            base_url: Url::parse(&base)?,
            token: token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn list_dishes(&self) -> Result<Vec<Dish>, GatewayError> {
        let response = self
            .http
            .get(self.endpoint("dishes")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_dish(&self, req: &CreateDishRequest) -> Result<Dish, GatewayError> {
        let response = self
            .http
            .post(self.endpoint("dishes")?)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_dish(&self, req: &UpdateDishRequest) -> Result<Dish, GatewayError> {
        let response = self
            .http
            .put(self.endpoint("dishes")?)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete_dish(&self, id: Uuid) -> Result<(), GatewayError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("dishes/{id}"))?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn week_note(&self, week_start: NaiveDate) -> Result<String, GatewayError> {
        let response = self
            .http
            .get(self.endpoint("notes")?)
            .query(&[("date", calendar::day_key(week_start))])
            .bearer_auth(&self.token)
            .send()
            .await?;
        read_json::<NoteContent>(response).await.map(|n| n.content)
    }

    pub async fn save_note(&self, week_start: NaiveDate, content: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.endpoint("notes")?)
            .bearer_auth(&self.token)
            .json(&json!({ "date": calendar::day_key(week_start), "content": content }))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(GatewayError::Unauthorized);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status { status, message });
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    Ok(check(response).await?.json::<T>().await?)
}

fn lock(store: &Mutex<PlannerStore>) -> MutexGuard<'_, PlannerStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Persist new ranks one dish at a time. Failures are logged and skipped;
/// the local order stays as is until the next poll. Returns the failure count.
pub async fn persist_orders(client: &PlannerClient, changes: &[(Uuid, i32)]) -> usize {
    let mut failures = 0;
    for (id, order) in changes {
        if let Err(e) = client.update_dish(&UpdateDishRequest::order(*id, *order)).await {
            tracing::warn!("Failed to persist order for dish {}: {}", id, e);
            failures += 1;
        }
    }
    failures
}

/// Fetch dishes and the current week's note once. Returns whether the dish
/// list changed.
pub async fn sync_once(client: &PlannerClient, store: &Mutex<PlannerStore>) -> Result<bool, GatewayError> {
    let dishes = client.list_dishes().await?;
    let week_start = lock(store).week_start();
    let note = client.week_note(week_start).await?;

    let mut guard = lock(store);
    let changed = guard.reconcile(dishes);
    // The user may have navigated away while the note was in flight.
    if guard.week_start() == week_start {
        guard.set_note(note);
    }
    Ok(changed)
}

/// Spawn the fixed-interval poll. Stops when the session is rejected.
pub fn start_polling(
    client: Arc<PlannerClient>,
    store: Arc<Mutex<PlannerStore>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match sync_once(&client, &store).await {
                Ok(true) => tracing::info!("Planner updated from server"),
                Ok(false) => {}
                Err(GatewayError::Unauthorized) => {
                    tracing::warn!("Session rejected, stopping planner sync");
                    break;
                }
                Err(e) => tracing::warn!("Planner sync failed: {}", e),
            }
            tokio::time::sleep(every).await;
        }
    })
}
