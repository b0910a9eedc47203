use serde::{Deserialize, Serialize};

/// Body of `add_run`
#[derive(Debug, Serialize)]
pub struct AddRunRequest<'a> {
    pub suite_id: u64,
    pub name: &'a str,
    pub include_all: bool,
}

/// Subset of the run object returned by `add_run`
#[derive(Debug, Deserialize)]
pub struct RunResponse {
    pub id: u64,
}

/// Body of `add_result_for_case`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPayload {
    pub status_id: u32,
    pub comment: String,
}
