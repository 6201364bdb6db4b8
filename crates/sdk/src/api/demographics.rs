//! Demographics API endpoints.

use crate::client::UnhcrClient;
use crate::endpoint::Endpoint;
use crate::error::UnhcrResult;
use crate::query::Filter;
use serde_json::Value;

/// Demographics API: age and sex breakdowns of displaced populations.
pub struct DemographicsApi<'a> {
    client: &'a UnhcrClient,
}

impl<'a> DemographicsApi<'a> {
    pub(crate) fn new(client: &'a UnhcrClient) -> Self {
        Self { client }
    }

    /// Get demographics data. `filter.pop_type` is honoured here only.
    pub async fn get(&self, filter: &Filter) -> UnhcrResult<Value> {
        self.client.fetch(Endpoint::Demographics, filter).await
    }
}
