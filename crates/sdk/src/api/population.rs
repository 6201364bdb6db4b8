//! Population API endpoints.

use crate::client::UnhcrClient;
use crate::endpoint::Endpoint;
use crate::error::UnhcrResult;
use crate::query::Filter;
use crate::summary::{self, AsylumStats, Country, CountryProfile, RefugeeCount, YearlySummary};
use serde_json::Value;

/// Page size used when a summary needs every breakdown row in one response.
pub const SUMMARY_PAGE_LIMIT: u32 = 10_000;

/// Population API for displaced population stocks.
pub struct PopulationApi<'a> {
    client: &'a UnhcrClient,
}

impl<'a> PopulationApi<'a> {
    pub(crate) fn new(client: &'a UnhcrClient) -> Self {
        Self { client }
    }

    /// Get raw population data.
    pub async fn get(&self, filter: &Filter) -> UnhcrResult<Value> {
        self.client.fetch(Endpoint::Population, filter).await
    }

    /// Refugees originating from `coo`, grouped by year.
    ///
    /// `Ok(None)` when upstream returned no rows.
    pub async fn refugee_count(
        &self,
        coo: &str,
        coa: Option<&str>,
        year: Option<&str>,
    ) -> UnhcrResult<Option<RefugeeCount>> {
        let mut filter = Filter::new().coo(coo);
        if let Some(coa) = coa {
            filter = filter.coa(coa);
        }
        if let Some(year) = year {
            filter = filter.year(year);
        }

        let payload = self.get(&filter).await?;
        Ok(summary::refugee_count(coo, &summary::rows(&payload)))
    }

    /// Refugees hosted by `coa`, broken down by origin and year.
    pub async fn asylum_stats(&self, coa: &str, year: Option<&str>) -> UnhcrResult<Option<AsylumStats>> {
        let mut filter = Filter::new().coa(coa).coo_all(true).limit(SUMMARY_PAGE_LIMIT);
        if let Some(year) = year {
            filter = filter.year(year);
        }

        let payload = self.get(&filter).await?;
        Ok(summary::asylum_stats(coa, &summary::rows(&payload)))
    }

    /// Global totals and the `top` largest origin and asylum countries for `year`.
    pub async fn yearly_summary(&self, year: &str, top: usize) -> UnhcrResult<Option<YearlySummary>> {
        let filter = Filter::new()
            .year(year)
            .coo_all(true)
            .coa_all(true)
            .limit(SUMMARY_PAGE_LIMIT);

        let payload = self.get(&filter).await?;
        Ok(summary::yearly_summary(year, &summary::rows(&payload), top))
    }

    /// Profile of `code` as both an origin and an asylum country.
    pub async fn country_profile(&self, code: &str, top: usize) -> UnhcrResult<CountryProfile> {
        let as_origin = Filter::new().coo(code).coa_all(true).limit(SUMMARY_PAGE_LIMIT);
        let as_asylum = Filter::new().coa(code).coo_all(true).limit(SUMMARY_PAGE_LIMIT);

        let origin_payload = self.get(&as_origin).await?;
        let asylum_payload = self.get(&as_asylum).await?;

        Ok(summary::country_profile(
            code,
            &summary::rows(&origin_payload),
            &summary::rows(&asylum_payload),
            top,
        ))
    }

    /// Countries appearing in the population dataset, sorted by name.
    pub async fn countries(&self, year: Option<&str>) -> UnhcrResult<Vec<Country>> {
        let mut filter = Filter::new()
            .coo_all(true)
            .coa_all(true)
            .limit(SUMMARY_PAGE_LIMIT);
        if let Some(year) = year {
            filter = filter.year(year);
        }

        let payload = self.get(&filter).await?;
        Ok(summary::countries(&summary::rows(&payload)))
    }
}
