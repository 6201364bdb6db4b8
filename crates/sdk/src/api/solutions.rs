//! Durable solutions API endpoints.

use crate::client::UnhcrClient;
use crate::endpoint::Endpoint;
use crate::error::UnhcrResult;
use crate::query::Filter;
use serde_json::Value;

/// Solutions API: returnees, resettlement, naturalisation.
pub struct SolutionsApi<'a> {
    client: &'a UnhcrClient,
}

impl<'a> SolutionsApi<'a> {
    pub(crate) fn new(client: &'a UnhcrClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, filter: &Filter) -> UnhcrResult<Value> {
        self.client.fetch(Endpoint::Solutions, filter).await
    }
}
