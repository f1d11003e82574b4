//! HTTP client for the REST backend that owns courses and enrollments.
//!
//! Payloads are normalized through [`crate::wire`] before they are cached
//! or handed to the derivations.

use super::cache::{SessionKey, SnapshotCacheState};
use super::error::BackendError;
use crate::content::Course;
use crate::enrollment::EnrollmentSnapshot;
use crate::wire;
use rand::Rng;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://lms.example.edu/api`
    pub base_url: String,
    pub max_attempts: u32,
    /// First retry delay; doubles per attempt
    pub retry_base: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            max_attempts: 3,
            retry_base: Duration::from_millis(200),
            request_timeout: Duration::from_secs(15),
            user_agent: concat!("courseware/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub struct BackendClient {
    client: Client,
    base_url: Url,
    config: BackendConfig,
    cache_state: Arc<SnapshotCacheState>,
}

impl BackendClient {
    pub fn new(config: BackendConfig, cache_state: Arc<SnapshotCacheState>) -> Result<Self, BackendError> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            config,
            cache_state,
        })
    }

    pub fn cache_state(&self) -> &Arc<SnapshotCacheState> {
        &self.cache_state
    }

    /// Fetches and validates a course tree, serving from cache when fresh.
    pub async fn fetch_course(&self, course_id: &str) -> Result<Course, BackendError> {
        let correlation_id = generate_correlation_id();
        if let Some(course) = self.cache_state.courses.get(&course_id.to_string()) {
            debug!(correlation_id = %correlation_id, course_id = %course_id, "Course served from cache");
            return Ok(course);
        }

        let url = &self.endpoint(&["courses", course_id])?;
        let course = self
            .with_retries("fetch_course", &correlation_id, move || async move {
                let body = self.get_text(url, None, "course", course_id).await?;
                Ok(wire::course_from_json(&body)?)
            })
            .await?;

        self.cache_state.courses.insert(course_id.to_string(), course.clone());
        Ok(course)
    }

    /// Fetches the caller's enrollment in a course using their bearer token.
    pub async fn fetch_enrollment(&self, course_id: &str, token: &str) -> Result<EnrollmentSnapshot, BackendError> {
        let correlation_id = generate_correlation_id();
        let session = SessionKey::from_token(token);
        let key = (session.clone(), course_id.to_string());

        if let Some(snapshot) = self.cache_state.enrollments.get(&key) {
            debug!(
                correlation_id = %correlation_id,
                session = %session,
                course_id = %course_id,
                "Enrollment served from cache"
            );
            return Ok(snapshot);
        }

        let url = &self.endpoint(&["enrollments", "course", course_id])?;
        let snapshot = self
            .with_retries("fetch_enrollment", &correlation_id, move || async move {
                let body = self.get_text(url, Some(token), "enrollment", course_id).await?;
                Ok(wire::enrollment_from_json(&body)?)
            })
            .await?;

        self.cache_state.enrollments.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Url {
                message: format!("{} cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(
        &self,
        url: &Url,
        token: Option<&str>,
        entity: &'static str,
        id: &str,
    ) -> Result<String, BackendError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::from_status(status, url.as_str(), entity, id));
        }
        Ok(response.text().await?)
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    async fn with_retries<T, F, Fut>(&self, operation: &str, correlation_id: &str, op: F) -> Result<T, BackendError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        if self.cache_state.circuit_breaker.is_open() {
            warn!(correlation_id = %correlation_id, operation, "Circuit breaker is open, rejecting request");
            return Err(BackendError::Network {
                message: "backend temporarily unavailable".to_string(),
            });
        }

        let start = Instant::now();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    self.cache_state.circuit_breaker.record_success();
                    info!(
                        correlation_id = %correlation_id,
                        operation,
                        attempt,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Backend call succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        correlation_id = %correlation_id,
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Backend call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        self.cache_state.circuit_breaker.record_failure();
                    }
                    error!(
                        correlation_id = %correlation_id,
                        operation,
                        attempt,
                        error = %e,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Backend call failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Exponential backoff capped at 5s, plus up to 20% jitter.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let base = self.config.retry_base.as_millis() as u64;
        let capped = (base * 2u64.pow(attempt.saturating_sub(1).min(5))).min(5_000);
        let jitter = rand::thread_rng().gen_range(0..=(capped / 5));
        Duration::from_millis(capped + jitter)
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", micros & 0xFFFF_FFFF, random)
}
