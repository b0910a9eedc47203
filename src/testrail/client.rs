//! TestRail HTTP client
//!
//! Talks to the v2 API under `index.php?/api/v2/` with basic authentication
//! (user name + API key).

use super::types::{AddRunRequest, ResultPayload, RunResponse};
use super::TestManagement;
use crate::error::TestRailError;
use crate::utils::config::TestRailConfig;
use async_trait::async_trait;
use serde::Serialize;

pub struct TestRailClient {
    config: TestRailConfig,
    client: reqwest::Client,
}

impl TestRailClient {
    pub fn new(config: TestRailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Full URL of an API endpoint, e.g. `add_run/3`
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/index.php?/api/v2/{}", self.config.host, endpoint)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, TestRailError> {
        let resp = self
            .client
            .post(self.endpoint_url(endpoint))
            .basic_auth(&self.config.user, Some(&self.config.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TestRailError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl TestManagement for TestRailClient {
    async fn add_run(&self, name: &str) -> Result<u64, TestRailError> {
        let endpoint = format!("add_run/{}", self.config.project_id);
        let request = AddRunRequest {
            suite_id: self.config.suite_id,
            name,
            include_all: true,
        };

        let resp = self.post(&endpoint, &request).await?;
        let run: RunResponse =
            resp.json()
                .await
                .map_err(|e| TestRailError::InvalidResponse {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                })?;

        log::debug!("Created run {} in project {}", run.id, self.config.project_id);
        Ok(run.id)
    }

    async fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &ResultPayload,
    ) -> Result<(), TestRailError> {
        let endpoint = format!("add_result_for_case/{}/{}", run_id, case_id);
        self.post(&endpoint, result).await?;
        Ok(())
    }
}
