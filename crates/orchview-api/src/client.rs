//! Orchestrator client for orchview

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use orchview_types::{Folder, JobRecord, LogRecord, Release};

use crate::error::{ApiError, Result};
use crate::query::{JobQuery, LogQuery};
use crate::records::{FromEntity, parse_all};

/// Header carrying the folder (organization unit) scope
pub const SCOPE_HEADER: &str = "X-UiPath-OrganizationUnitId";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the orchestrator
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// OData root, e.g. `https://host/org/tenant/orchestrator_/odata`
    pub base_url: String,
    /// Bearer token
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Read-only client for the orchestrator OData API
#[derive(Clone)]
pub struct OrchestratorClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl OrchestratorClient {
    /// Create a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// GET one collection and return the entities of its `value` array.
    ///
    /// A failed call is returned as is; there is no retry.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        scope_id: Option<i64>,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        let mut request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(scope) = scope_id {
            request = request.header(SCOPE_HEADER, scope.to_string());
        }

        tracing::debug!(endpoint, ?scope_id, ?params, "GET {}", url);
        let start_time = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(
            endpoint,
            %status,
            "request completed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(endpoint, %status, "request failed: {}", body);
            return Err(ApiError::Status { url, status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let envelope: Value =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })?;

        Ok(match envelope {
            Value::Object(mut map) => match map.remove("value") {
                Some(Value::Array(values)) => values,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    async fn fetch_records<T: FromEntity>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        scope_id: Option<i64>,
    ) -> Result<Vec<T>> {
        let values = self.fetch(endpoint, params, scope_id).await?;
        let records = parse_all(values)?;
        tracing::info!(endpoint, count = records.len(), "fetched {}", T::ENTITY);
        Ok(records)
    }

    /// Fetch all folders visible to the token
    pub async fn folders(&self) -> Result<Vec<Folder>> {
        self.fetch_records("Folders", &[], None).await
    }

    /// Fetch the releases (processes) deployed to a folder
    pub async fn releases(&self, folder_id: i64) -> Result<Vec<Release>> {
        self.fetch_records("Releases", &[], Some(folder_id)).await
    }

    /// Distinct process keys of a folder, in first-seen order
    pub async fn process_keys(&self, folder_id: i64) -> Result<Vec<String>> {
        let releases = self.releases(folder_id).await?;
        Ok(distinct_process_keys(&releases))
    }

    /// Fetch jobs of a folder
    pub async fn jobs(&self, folder_id: i64, query: &JobQuery) -> Result<Vec<JobRecord>> {
        self.fetch_records("Jobs", &query.to_params(), Some(folder_id))
            .await
    }

    /// Look up a single job of a folder by key
    pub async fn job(&self, folder_id: i64, key: &str) -> Result<Option<JobRecord>> {
        let jobs = self.jobs(folder_id, &JobQuery::for_key(key)).await?;
        Ok(jobs.into_iter().next())
    }

    /// Fetch execution logs of a folder
    pub async fn robot_logs(&self, folder_id: i64, query: &LogQuery) -> Result<Vec<LogRecord>> {
        self.fetch_records("RobotLogs", &query.to_params(), Some(folder_id))
            .await
    }
}

/// Process keys of a release list without duplicates
pub fn distinct_process_keys(releases: &[Release]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for release in releases {
        if !keys.contains(&release.process_key) {
            keys.push(release.process_key.clone());
        }
    }
    keys
}
