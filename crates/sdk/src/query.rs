//! Query filters and their translation into UNHCR query strings.

use crate::endpoint::Endpoint;

/// Country-classification scheme requested from upstream. ISO3 codes throughout.
pub const CF_TYPE: &str = "ISO";

/// Filters applied to a single UNHCR API request.
///
/// Each list holds already split tokens. The string setters accept the
/// comma-separated form agents tend to send (`"SYR,AFG"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Countries of origin (ISO3).
    pub coo: Vec<String>,
    /// Countries of asylum (ISO3).
    pub coa: Vec<String>,
    /// Years, passed through uninterpreted.
    pub years: Vec<String>,
    /// Break results down by every country of origin.
    pub coo_all: bool,
    /// Break results down by every country of asylum.
    pub coa_all: bool,
    /// Break results down by population type. Demographics only.
    pub pop_type: bool,
    /// Upstream page size.
    pub limit: Option<u32>,
    /// Upstream page number.
    pub page: Option<u32>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set countries of origin from a comma-separated list.
    pub fn coo(mut self, codes: &str) -> Self {
        self.coo = split_list(codes);
        self
    }

    /// Set countries of asylum from a comma-separated list.
    pub fn coa(mut self, codes: &str) -> Self {
        self.coa = split_list(codes);
        self
    }

    /// Set years from a comma-separated list.
    pub fn year(mut self, years: impl ToString) -> Self {
        self.years = split_list(&years.to_string());
        self
    }

    pub fn coo_all(mut self, enabled: bool) -> Self {
        self.coo_all = enabled;
        self
    }

    pub fn coa_all(mut self, enabled: bool) -> Self {
        self.coa_all = enabled;
        self
    }

    pub fn pop_type(mut self, enabled: bool) -> Self {
        self.pop_type = enabled;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// True when no field would add a query parameter.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query parameters for `endpoint`, in the order they are sent.
    ///
    /// `cf_type=ISO` is always first. Unset fields add nothing. Years are
    /// repeated as `year[]`, country lists are comma-joined into one value.
    pub fn query_pairs(&self, endpoint: Endpoint) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("cf_type", CF_TYPE.to_string())];

        if !self.coo.is_empty() {
            pairs.push(("coo", self.coo.join(",")));
        }
        if !self.coa.is_empty() {
            pairs.push(("coa", self.coa.join(",")));
        }
        for year in &self.years {
            pairs.push(("year[]", year.clone()));
        }
        if self.coo_all {
            pairs.push(("coo_all", "true".to_string()));
        }
        if self.coa_all {
            pairs.push(("coa_all", "true".to_string()));
        }
        if self.pop_type && endpoint.supports_pop_type() {
            pairs.push(("pop_type", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }

        pairs
    }
}

/// Split a comma-separated list into trimmed, non-empty tokens.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Vec<&'a str> {
        pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_empty_filter_sends_only_cf_type() {
        for endpoint in Endpoint::ALL {
            let pairs = Filter::new().query_pairs(endpoint);
            assert_eq!(pairs, vec![("cf_type", "ISO".to_string())]);
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("SYR"), vec!["SYR"]);
        assert_eq!(split_list(" SYR , AFG,UKR "), vec!["SYR", "AFG", "UKR"]);
        assert_eq!(split_list("SYR,,AFG,"), vec!["SYR", "AFG"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_multi_value_counts_match_tokens() {
        let cases = ["2020", "2020,2021", "2019, 2020 ,2021,2022"];
        for input in cases {
            let filter = Filter::new().year(input).coo(input).coa(input);
            let pairs = filter.query_pairs(Endpoint::Population);
            let tokens = input.split(',').count();

            assert_eq!(values(&pairs, "year[]").len(), tokens, "year[] for {input:?}");
            let coo = values(&pairs, "coo");
            assert_eq!(coo.len(), 1);
            assert_eq!(coo[0].split(',').count(), tokens, "coo for {input:?}");
            assert_eq!(values(&pairs, "coa")[0].split(',').count(), tokens);
        }
    }

    #[test]
    fn test_country_lists_are_rejoined() {
        let pairs = Filter::new()
            .coo("SYR, AFG")
            .coa("DEU")
            .query_pairs(Endpoint::AsylumDecisions);

        assert_eq!(values(&pairs, "coo"), vec!["SYR,AFG"]);
        assert_eq!(values(&pairs, "coa"), vec!["DEU"]);
    }

    #[test]
    fn test_year_accepts_integers() {
        let pairs = Filter::new().year(2023).query_pairs(Endpoint::Solutions);
        assert_eq!(values(&pairs, "year[]"), vec!["2023"]);
    }

    #[test]
    fn test_malformed_year_passes_through() {
        let pairs = Filter::new().year("20x4").query_pairs(Endpoint::Population);
        assert_eq!(values(&pairs, "year[]"), vec!["20x4"]);
    }

    #[test]
    fn test_breakdown_flags() {
        let off = Filter::new().query_pairs(Endpoint::Population);
        assert!(values(&off, "coo_all").is_empty());
        assert!(values(&off, "coa_all").is_empty());

        let on = Filter::new()
            .coo_all(true)
            .coa_all(true)
            .query_pairs(Endpoint::Population);
        assert_eq!(values(&on, "coo_all"), vec!["true"]);
        assert_eq!(values(&on, "coa_all"), vec!["true"]);
    }

    #[test]
    fn test_pop_type_only_for_demographics() {
        let filter = Filter::new().pop_type(true);

        let pairs = filter.query_pairs(Endpoint::Demographics);
        assert_eq!(values(&pairs, "pop_type"), vec!["true"]);

        for endpoint in Endpoint::ALL.into_iter().filter(|e| !e.supports_pop_type()) {
            assert!(values(&filter.query_pairs(endpoint), "pop_type").is_empty());
        }

        let off = Filter::new().pop_type(false).query_pairs(Endpoint::Demographics);
        assert!(values(&off, "pop_type").is_empty());
    }

    #[test]
    fn test_pagination() {
        let pairs = Filter::new().limit(100).page(2).query_pairs(Endpoint::Population);
        assert_eq!(values(&pairs, "limit"), vec!["100"]);
        assert_eq!(values(&pairs, "page"), vec!["2"]);
    }

    #[test]
    fn test_is_empty() {
        assert!(Filter::new().is_empty());
        assert!(Filter::new().coo("").is_empty());
        assert!(!Filter::new().coo("SYR").is_empty());
        assert!(!Filter::new().coa_all(true).is_empty());
    }
}
