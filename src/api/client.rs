//! HTTP client for the sales dashboard backend.
//!
//! Wraps the four backend endpoints: the representative listing, a
//! single representative, the flattened deal list, and the AI question
//! endpoint. Requests are sent once; failures are reported, not retried.

use crate::analysis::{validate_deals, validate_rep, validate_reps};
use crate::models::{
    AskRequest, AskResponse, Deal, DealsResponse, RawSalesRep, SalesRep, SalesRepsResponse,
};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Async client for the dashboard API.
pub struct DashboardClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl DashboardClient {
    /// Create a client for the given backend.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Using dashboard API at {}", config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Fetch every sales representative, validating their deals.
    pub async fn list_sales_reps(&self) -> Result<Vec<SalesRep>> {
        let response: SalesRepsResponse = self.get_json("/api/sales-reps").await?;
        let reps = validate_reps(response.sales_reps)
            .inspect_err(|e| warn!("Sales rep validation failed: {}", e))
            .context("Backend returned a malformed deal")?;
        debug!("Fetched {} sales reps", reps.len());
        Ok(reps)
    }

    /// Fetch a single sales representative by id.
    pub async fn get_sales_rep(&self, id: u32) -> Result<SalesRep> {
        let path = format!("/api/sales-reps/{}", id);
        let response = self.send(self.http_client.get(self.url(&path))).await?;

        if response.status() == StatusCode::NOT_FOUND {
            anyhow::bail!("Sales representative {} not found", id);
        }

        let rep: RawSalesRep = Self::parse(response).await?;
        validate_rep(rep).context("Backend returned a malformed deal")
    }

    /// Fetch all deals across all representatives, validating each value.
    pub async fn list_deals(&self) -> Result<Vec<Deal>> {
        let response: DealsResponse = self.get_json("/api/deals").await?;
        let deals = validate_deals(response.deals)
            .inspect_err(|e| warn!("Deal validation failed: {}", e))
            .context("Backend returned a malformed deal")?;
        debug!("Fetched {} deals", deals.len());
        Ok(deals)
    }

    /// Fetch representatives and deals concurrently.
    pub async fn fetch_dashboard(&self) -> Result<(Vec<SalesRep>, Vec<Deal>)> {
        futures::future::try_join(self.list_sales_reps(), self.list_deals()).await
    }

    /// Forward a question to the AI endpoint and return its answer.
    ///
    /// Blank questions are rejected without contacting the backend.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            anyhow::bail!("Question cannot be empty");
        }

        info!("Asking AI assistant ({} chars)", question.len());

        let request = AskRequest {
            question: question.to_string(),
        };
        let response = self
            .send(self.http_client.post(self.url("/api/ai")).json(&request))
            .await?;
        let reply: AskResponse = Self::parse(response).await?;

        Ok(reply.answer)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http_client.get(self.url(path))).await?;
        Self::parse(response).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
            } else if e.is_connect() {
                anyhow::anyhow!("Cannot connect to dashboard API at {}", self.config.base_url)
            } else {
                anyhow::anyhow!("Failed to send request: {}", e)
            }
        })
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Dashboard API error {}: {}", status, body));
        }

        response
            .json()
            .await
            .context("Failed to parse dashboard API response")
    }
}
