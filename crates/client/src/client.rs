//! HTTP client for the portfolio backend.
//!
//! Implements [`PortfolioDataProvider`] so the engine can read holdings,
//! activity logs and IRR values from the REST API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use wealthdesk_core::activities::ActivityLogEntry;
use wealthdesk_core::portfolio::holdings::{Fund, Holding};
use wealthdesk_core::portfolio::irr::{IrrRecalculationResult, LatestIrr};
use wealthdesk_core::{ActivityScope, PortfolioDataProvider};

use crate::error::{ClientError, Result};
use crate::types::{extract_error_message, RecalculateIrrRequest};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    /// Create a client with the default timeout and no credentials.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the backend API (e.g., "http://localhost:8000/api")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::invalid_request("Backend URL is empty"));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create headers for an API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::invalid_request("Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {} bytes", status, body.len());

        if !status.is_success() {
            return Err(ClientError::api(
                status.as_u16(),
                extract_error_message(&body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize response. Body: {}, Error: {}", body, e);
            ClientError::Json(e)
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Holdings and activity
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /portfolios/{id}/portfolio_funds
    pub async fn portfolio_funds(&self, portfolio_id: i64) -> Result<Vec<Holding>> {
        let url = self.url(&format!("/portfolios/{}/portfolio_funds", portfolio_id));
        self.get_json(&url).await
    }

    /// GET /holding_activity_logs?portfolio_id={id} or ?portfolio_fund_id={id}
    pub async fn activity_logs(&self, scope: ActivityScope) -> Result<Vec<ActivityLogEntry>> {
        let query = match scope {
            ActivityScope::Portfolio(id) => format!("portfolio_id={}", id),
            ActivityScope::Holding(id) => format!("portfolio_fund_id={}", id),
        };
        let url = self.url(&format!("/holding_activity_logs?{}", query));
        self.get_json(&url).await
    }

    /// GET /funds
    pub async fn funds(&self) -> Result<Vec<Fund>> {
        let url = self.url("/funds");
        self.get_json(&url).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // IRR
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /portfolio_funds/{id}/latest-irr
    ///
    /// A 404 or a `null` body means no IRR has been stored yet.
    pub async fn latest_irr(&self, holding_id: i64) -> Result<Option<LatestIrr>> {
        let url = self.url(&format!("/portfolio_funds/{}/latest-irr", holding_id));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No stored IRR for holding {}", holding_id);
            return Ok(None);
        }

        Self::parse_response(response).await
    }

    /// POST /portfolios/{id}/recalculate_all_irr
    pub async fn recalculate_all_irr(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> Result<IrrRecalculationResult> {
        let url = self.url(&format!("/portfolios/{}/recalculate_all_irr", portfolio_id));
        debug!(
            "Requesting IRR recalculation for portfolio {} as of {}",
            portfolio_id, as_of_date
        );

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&RecalculateIrrRequest {
                irr_date: as_of_date,
            })
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

#[async_trait]
impl PortfolioDataProvider for BackendClient {
    async fn get_portfolio_holdings(
        &self,
        portfolio_id: i64,
    ) -> wealthdesk_core::Result<Vec<Holding>> {
        Ok(self.portfolio_funds(portfolio_id).await?)
    }

    async fn get_activity_logs(
        &self,
        scope: ActivityScope,
    ) -> wealthdesk_core::Result<Vec<ActivityLogEntry>> {
        Ok(self.activity_logs(scope).await?)
    }

    async fn get_latest_irr(&self, holding_id: i64) -> wealthdesk_core::Result<Option<LatestIrr>> {
        Ok(self.latest_irr(holding_id).await?)
    }

    async fn recalculate_portfolio_irr(
        &self,
        portfolio_id: i64,
        as_of_date: NaiveDate,
    ) -> wealthdesk_core::Result<IrrRecalculationResult> {
        Ok(self.recalculate_all_irr(portfolio_id, as_of_date).await?)
    }

    async fn get_fund_catalog(&self) -> wealthdesk_core::Result<Vec<Fund>> {
        Ok(self.funds().await?)
    }
}
