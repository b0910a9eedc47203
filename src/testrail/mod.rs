pub mod client;
pub mod types;

pub use client::TestRailClient;
pub use types::ResultPayload;

use crate::error::TestRailError;
use async_trait::async_trait;

/// Remote test-case management operations the reporter needs
#[async_trait]
pub trait TestManagement: Send + Sync {
    /// Create a run containing every case of the configured suite
    async fn add_run(&self, name: &str) -> Result<u64, TestRailError>;

    /// Attach one result to a case of an existing run
    async fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &ResultPayload,
    ) -> Result<(), TestRailError>;
}
