// src/client.rs

use crate::config::{ApiClientConfig, DeletePolicy};
use crate::error::OidccError;
use crate::model::{Plan, PlanCreateResponse, PlanListQuery, PlanMetadataResponse};
use crate::paths::join_path;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// How many plans a bulk delete lists and removes in one call.
pub const BULK_DELETE_PAGE_LENGTH: u32 = 40;

/// A client for the conformance suite's plan API.
///
/// Every operation is a single request/response round trip; batch operations run their
/// requests one after another. No request is ever retried.
#[derive(Clone)]
pub struct PlanApiClient {
    // The client is internally ref-counted to allow for cheap cloning.
    inner: Arc<Inner>,
}

struct Inner {
    config: ApiClientConfig,
    http_client: reqwest::Client,
}

/// The result of submitting several plans.
///
/// Failures do not stop the batch: `created` holds every plan the suite accepted and
/// `last_error` the most recent failure, if any.
#[derive(Debug, Default)]
pub struct BatchCreateOutcome {
    pub created: Vec<PlanCreateResponse>,
    pub failed: usize,
    pub last_error: Option<OidccError>,
}

impl BatchCreateOutcome {
    pub fn is_complete(&self) -> bool {
        self.last_error.is_none()
    }

    /// Drops the partial successes if anything failed.
    pub fn into_result(self) -> Result<Vec<PlanCreateResponse>, OidccError> {
        match self.last_error {
            Some(e) => Err(e),
            None => Ok(self.created),
        }
    }
}

impl PlanApiClient {
    /// Creates a client with a transport built from `config.transport`.
    pub fn new(config: ApiClientConfig) -> Result<Self, OidccError> {
        let http_client = config.transport.build_client()?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Creates a client on top of a caller-configured transport.
    ///
    /// `config.transport` is ignored; the root URL, headers and delete policy still apply.
    pub fn with_http_client(config: ApiClientConfig, http_client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(Inner { config, http_client }),
        }
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.inner.config
    }

    /// Submits a plan for creation.
    ///
    /// The plan name and variant go into the query string, the config into the JSON body.
    ///
    /// # Errors
    ///
    /// `Validation` if the plan breaks its invariants (nothing is sent), `Remote` with the raw
    /// body on a non-2xx answer, and `Decode` if the answer does not look like a created plan.
    #[instrument(skip(self, plan), fields(plan_name = %plan.name), err)]
    pub async fn create_plan(&self, plan: &Plan) -> Result<PlanCreateResponse, OidccError> {
        plan.validate()?;

        let mut query = vec![("planName", plan.name.clone())];
        if let Some(variant) = &plan.variant {
            query.push(("variant", serde_json::to_string(variant)?));
        }

        let url = self.endpoint(&["plan"])?;
        debug!("Creating plan at: {}", url);
        let response = self
            .request(Method::POST, url)
            .query(&query)
            .json(&plan.config)
            .headers(json_content_type())
            .send()
            .await?;

        let body = success_body(response).await?;
        let created: PlanCreateResponse = serde_json::from_str(&body)?;
        debug!(plan_id = %created.id, modules = created.modules.len(), "Plan created.");
        Ok(created)
    }

    /// Submits each plan in turn, continuing past failures.
    pub async fn create_plans(&self, plans: &[Plan]) -> BatchCreateOutcome {
        let mut outcome = BatchCreateOutcome::default();

        for plan in plans {
            match self.create_plan(plan).await {
                Ok(created) => outcome.created.push(created),
                Err(e) => {
                    warn!(plan_name = %plan.name, "Failed to create plan: {}", e);
                    outcome.failed += 1;
                    outcome.last_error = Some(e);
                }
            }
        }

        debug!(created = outcome.created.len(), failed = outcome.failed, "Batch plan creation finished.");
        outcome
    }

    /// Fetches one page of the plan listing.
    #[instrument(skip(self), err)]
    pub async fn list_plans(&self, query: &PlanListQuery) -> Result<PlanMetadataResponse, OidccError> {
        let url = self.endpoint(&["plan"])?;
        debug!("Listing plans at: {}", url);
        let response = self
            .request(Method::GET, url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let body = success_body(response).await?;
        let plans: PlanMetadataResponse = serde_json::from_str(&body)?;
        debug!(
            returned = plans.data.len(),
            total = plans.records_total,
            "Fetched plan listing."
        );
        Ok(plans)
    }

    /// Deletes a plan. Returns whether the suite answered with a 2xx status; the body is ignored.
    ///
    /// # Errors
    ///
    /// `Validation` without touching the network when `id` is empty, `Transport` when the
    /// request cannot be sent.
    #[instrument(skip(self), err)]
    pub async fn delete_plan(&self, id: &str) -> Result<bool, OidccError> {
        let response = self.send_delete(id).await?;
        Ok(response.status().is_success())
    }

    /// Deletes up to 40 non-public plans, one after another, and returns how many were deleted.
    ///
    /// A deletion fails on a transport error or a non-2xx status. Under
    /// `DeletePolicy::FailFast` the first failure is returned at once; plans deleted before it
    /// stay deleted and the rest are left alone. Under `DeletePolicy::BestEffort` every plan is
    /// attempted and the last failure is returned afterwards.
    #[instrument(skip(self), err)]
    pub async fn delete_all_plans(&self) -> Result<usize, OidccError> {
        let listing = self
            .list_plans(&PlanListQuery::new().length(BULK_DELETE_PAGE_LENGTH))
            .await?;
        let policy = self.inner.config.delete_policy;

        let mut deleted = 0;
        let mut last_error = None;
        for plan in &listing.data {
            match self.delete_listed_plan(&plan.id).await {
                Ok(()) => deleted += 1,
                Err(e) if policy == DeletePolicy::FailFast => return Err(e),
                Err(e) => {
                    warn!(plan_id = %plan.id, "Failed to delete plan: {}", e);
                    last_error = Some(e);
                }
            }
        }

        debug!(deleted, listed = listing.data.len(), "Bulk plan deletion finished.");
        match last_error {
            Some(e) => Err(e),
            None => Ok(deleted),
        }
    }

    async fn delete_listed_plan(&self, id: &str) -> Result<(), OidccError> {
        let response = self.send_delete(id).await?;
        success_body(response).await.map(|_| ())
    }

    async fn send_delete(&self, id: &str) -> Result<Response, OidccError> {
        if id.is_empty() {
            return Err(OidccError::Validation("plan has no id".to_string()));
        }

        let url = self.endpoint(&["plan", id])?;
        debug!("Deleting plan at: {}", url);
        Ok(self.request(Method::DELETE, url).send().await?)
    }

    /// `<root>/<segments...>`
    fn endpoint(&self, segments: &[&str]) -> Result<Url, OidccError> {
        let root = &self.inner.config.root_url;
        join_path(root, segments)
            .ok_or_else(|| OidccError::InvalidUrl(format!("{} cannot be used as a base URL", root)))
    }

    /// A request carrying the configured default headers.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner
            .http_client
            .request(method, url)
            .headers(self.inner.config.headers.clone())
    }
}

/// Replaces any configured default `Content-Type` on requests that carry a JSON body.
fn json_content_type() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Reads the body, turning a non-2xx status into `Remote` with the raw body attached.
async fn success_body(response: Response) -> Result<String, OidccError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        debug!(%status, "Plan API request failed.");
        return Err(OidccError::Remote { status, body });
    }

    Ok(body)
}
