use std::time::Duration;

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};

/// Body of `GET /api/v1/databases/{id}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseStatus {
    connection_string: Option<String>,
}

/// HTTP side of provisioning: builds the verification link and polls the
/// status endpoint until the database is ready.
#[derive(Debug, Clone)]
pub struct InstagresClient {
    http: reqwest::Client,
    base_url: Url,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl InstagresClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("instagres/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            poll_interval: config.poll_interval,
            max_polls: config.max_polls,
        })
    }

    /// Browser-facing page, e.g. `https://www.instagres.com/databases/{id}?ref=my-app`
    pub fn verification_url(&self, id: &Uuid, source: &str) -> Url {
        let id = id.to_string();
        let mut url = self.endpoint(&["databases", id.as_str()]);
        url.query_pairs_mut().append_pair("ref", source);
        url
    }

    pub fn status_url(&self, id: &Uuid) -> Url {
        let id = id.to_string();
        self.endpoint(&["api", "v1", "databases", id.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Config::resolve rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Single status request. `None` means "not ready yet", whatever the reason.
    pub async fn poll_once(&self, id: &Uuid) -> Option<String> {
        let url = self.status_url(id);

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Status request for database {} failed: {}", id, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Database {} not ready yet (HTTP {})", id, status);
            return None;
        }

        match response.json::<DatabaseStatus>().await {
            Ok(body) => {
                let connection_string = body.connection_string.filter(|s| !s.is_empty());
                if connection_string.is_none() {
                    tracing::debug!("Database {} responded without a connection string", id);
                }
                connection_string
            }
            Err(e) => {
                tracing::warn!("Could not decode status of database {}: {}", id, e);
                None
            }
        }
    }

    /// Polls every `poll_interval`, starting one interval from now, until a
    /// connection string comes back. Without `max_polls` this never gives up.
    pub async fn wait_for_connection_string(&self, id: &Uuid) -> Result<String> {
        let mut attempts: u32 = 0;

        loop {
            tokio::time::sleep(self.poll_interval).await;
            attempts += 1;

            if let Some(connection_string) = self.poll_once(id).await {
                tracing::debug!("Database {} ready after {} polls", id, attempts);
                return Ok(connection_string);
            }

            if self.max_polls.is_some_and(|max| attempts >= max) {
                return Err(Error::PollLimitReached { attempts });
            }
        }
    }
}
