//! Aggregations over population payloads.
//!
//! The population endpoint returns `{"items": [...]}` where each item carries a
//! year, origin and asylum country, and counts per population type. Counts are
//! usually integers but upstream also emits strings (`"-"`, `"1,234"`) for
//! suppressed or formatted values, so parsing here is lenient: anything that
//! does not read as a count is zero.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const UNKNOWN: &str = "Unknown";

/// One row of a population payload, reduced to the fields summaries use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PopulationRow {
    #[serde(default, deserialize_with = "year_key")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coo_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coa: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub coa_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub refugees: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub asylum_seekers: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub idps: u64,
}

impl PopulationRow {
    fn origin_name(&self) -> &str {
        self.coo_name.as_deref().unwrap_or(UNKNOWN)
    }

    fn asylum_name(&self) -> &str {
        self.coa_name.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Refugees from one country of origin, totalled and grouped by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefugeeCount {
    pub country_of_origin: String,
    pub total_refugees: u64,
    pub by_year: BTreeMap<String, u64>,
}

/// Refugees hosted by one country of asylum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsylumStats {
    pub country_of_asylum: String,
    pub total_refugees_hosted: u64,
    pub countries_of_origin: BTreeMap<String, u64>,
    pub by_year: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCountry {
    pub name: String,
    pub refugees: u64,
}

/// Global totals for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlySummary {
    pub year: String,
    pub total_refugees: u64,
    pub total_asylum_seekers: u64,
    pub total_idps: u64,
    pub top_origins: Vec<RankedCountry>,
    pub top_asylums: Vec<RankedCountry>,
}

/// One side of a country profile: refugees from it, or refugees in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSide {
    pub total_refugees: u64,
    /// Asylum countries when profiling origin, origin countries when profiling asylum.
    pub top_partners: Vec<RankedCountry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryProfile {
    pub code: String,
    pub name: String,
    pub as_origin: Option<ProfileSide>,
    pub as_asylum: Option<ProfileSide>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Rows under `items`. Missing or malformed items yield nothing.
pub fn rows(payload: &Value) -> Vec<PopulationRow> {
    payload
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| PopulationRow::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// `None` when there are no rows.
pub fn refugee_count(coo: &str, rows: &[PopulationRow]) -> Option<RefugeeCount> {
    if rows.is_empty() {
        return None;
    }

    let mut by_year = BTreeMap::new();
    for row in rows {
        tally(by_year.entry(row.year.clone()).or_insert(0), row.refugees);
    }

    Some(RefugeeCount {
        country_of_origin: coo.to_string(),
        total_refugees: total(rows, |r| r.refugees),
        by_year,
    })
}

/// `None` when there are no rows.
pub fn asylum_stats(coa: &str, rows: &[PopulationRow]) -> Option<AsylumStats> {
    if rows.is_empty() {
        return None;
    }

    let mut countries_of_origin = BTreeMap::new();
    let mut by_year = BTreeMap::new();
    for row in rows {
        tally(
            countries_of_origin.entry(row.origin_name().to_string()).or_insert(0),
            row.refugees,
        );
        tally(by_year.entry(row.year.clone()).or_insert(0), row.refugees);
    }

    Some(AsylumStats {
        country_of_asylum: coa.to_string(),
        total_refugees_hosted: total(rows, |r| r.refugees),
        countries_of_origin,
        by_year,
    })
}

/// `None` when there are no rows.
pub fn yearly_summary(year: &str, rows: &[PopulationRow], top: usize) -> Option<YearlySummary> {
    if rows.is_empty() {
        return None;
    }

    Some(YearlySummary {
        year: year.to_string(),
        total_refugees: total(rows, |r| r.refugees),
        total_asylum_seekers: total(rows, |r| r.asylum_seekers),
        total_idps: total(rows, |r| r.idps),
        top_origins: rank(rows, PopulationRow::origin_name, top),
        top_asylums: rank(rows, PopulationRow::asylum_name, top),
    })
}

/// Profile `code` from rows where it is the origin and rows where it is the asylum country.
pub fn country_profile(
    code: &str,
    origin_rows: &[PopulationRow],
    asylum_rows: &[PopulationRow],
    top: usize,
) -> CountryProfile {
    let name = origin_rows
        .first()
        .and_then(|r| r.coo_name.clone())
        .or_else(|| asylum_rows.first().and_then(|r| r.coa_name.clone()))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let side = |rows: &[PopulationRow], partner: fn(&PopulationRow) -> &str| {
        (!rows.is_empty()).then(|| ProfileSide {
            total_refugees: total(rows, |r| r.refugees),
            top_partners: rank(rows, partner, top),
        })
    };

    CountryProfile {
        code: code.to_string(),
        name,
        as_origin: side(origin_rows, PopulationRow::asylum_name),
        as_asylum: side(asylum_rows, PopulationRow::origin_name),
    }
}

/// Distinct countries seen as origin or asylum, sorted by name then code.
pub fn countries(rows: &[PopulationRow]) -> Vec<Country> {
    let mut seen = BTreeSet::new();
    for row in rows {
        for (code, name) in [(&row.coo, &row.coo_name), (&row.coa, &row.coa_name)] {
            if let (Some(code), Some(name)) = (code, name) {
                if is_country_code(code) {
                    seen.insert((name.clone(), code.clone()));
                }
            }
        }
    }

    seen.into_iter()
        .map(|(name, code)| Country { code, name })
        .collect()
}

/// Sum refugees per key and keep the `top` largest, ties broken by name.
fn rank(rows: &[PopulationRow], key: fn(&PopulationRow) -> &str, top: usize) -> Vec<RankedCountry> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for row in rows {
        tally(totals.entry(key(row)).or_insert(0), row.refugees);
    }

    let mut ranked: Vec<RankedCountry> = totals
        .into_iter()
        .map(|(name, refugees)| RankedCountry {
            name: name.to_string(),
            refugees,
        })
        .collect();
    ranked.sort_by(|a, b| b.refugees.cmp(&a.refugees).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(top);
    ranked
}

// Aggregate rows use "-" in place of a code.
fn is_country_code(code: &str) -> bool {
    !code.is_empty() && code != "-"
}

fn year_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => "unknown".to_string(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Sum of `count` over `rows`, saturating at `u64::MAX`.
fn total(rows: &[PopulationRow], count: fn(&PopulationRow) -> u64) -> u64 {
    rows.iter().map(count).fold(0, u64::saturating_add)
}

fn tally(slot: &mut u64, count: u64) {
    *slot = slot.saturating_add(count);
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().replace(',', "").parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "page": 1,
            "items": [
                {"year": 2022, "coo": "SYR", "coo_name": "Syrian Arab Rep.", "coa": "TUR", "coa_name": "Türkiye", "refugees": 3500000, "asylum_seekers": 1000, "idps": 0},
                {"year": 2022, "coo": "SYR", "coo_name": "Syrian Arab Rep.", "coa": "DEU", "coa_name": "Germany", "refugees": 600000, "asylum_seekers": "50,000", "idps": "-"},
                {"year": 2023, "coo": "SYR", "coo_name": "Syrian Arab Rep.", "coa": "DEU", "coa_name": "Germany", "refugees": "700000", "asylum_seekers": null},
                {"year": "2023", "coo": "AFG", "coo_name": "Afghanistan", "coa": "DEU", "coa_name": "Germany", "refugees": 200000}
            ]
        })
    }

    #[test]
    fn test_rows_lenient_counts() {
        let rows = rows(&sample());

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].asylum_seekers, 50_000);
        assert_eq!(rows[1].idps, 0);
        assert_eq!(rows[2].refugees, 700_000);
        assert_eq!(rows[2].asylum_seekers, 0);
        assert_eq!(rows[3].year, "2023");
        assert_eq!(rows[3].idps, 0);
    }

    #[test]
    fn test_rows_without_items() {
        assert!(rows(&json!({"error": "x"})).is_empty());
        assert!(rows(&json!({"items": "nope"})).is_empty());
        assert!(rows(&json!({"items": [1, "two"]})).is_empty());
    }

    #[test]
    fn test_refugee_count() {
        let rows = rows(&sample());
        let count = refugee_count("SYR", &rows[..3]).unwrap();

        assert_eq!(count.country_of_origin, "SYR");
        assert_eq!(count.total_refugees, 4_800_000);
        assert_eq!(count.by_year["2022"], 4_100_000);
        assert_eq!(count.by_year["2023"], 700_000);
        assert!(refugee_count("SYR", &[]).is_none());
    }

    #[test]
    fn test_asylum_stats() {
        let rows = rows(&sample());
        let stats = asylum_stats("DEU", &rows[1..]).unwrap();

        assert_eq!(stats.total_refugees_hosted, 1_500_000);
        assert_eq!(stats.countries_of_origin["Syrian Arab Rep."], 1_300_000);
        assert_eq!(stats.countries_of_origin["Afghanistan"], 200_000);
        assert_eq!(stats.by_year["2023"], 900_000);
        assert!(asylum_stats("DEU", &[]).is_none());
    }

    #[test]
    fn test_yearly_summary_ranks_descending() {
        let rows = rows(&sample());
        let summary = yearly_summary("2022", &rows, 2).unwrap();

        assert_eq!(summary.total_asylum_seekers, 51_000);
        assert_eq!(summary.top_origins.len(), 2);
        assert_eq!(summary.top_origins[0].name, "Syrian Arab Rep.");
        assert_eq!(summary.top_origins[1].name, "Afghanistan");
        assert_eq!(summary.top_asylums[0].name, "Türkiye");
        assert_eq!(summary.top_asylums[0].refugees, 3_500_000);
        assert_eq!(summary.top_asylums[1].name, "Germany");
    }

    #[test]
    fn test_rank_ties_break_by_name() {
        let rows = vec![
            PopulationRow {
                coo_name: Some("Zeta".into()),
                refugees: 10,
                ..Default::default()
            },
            PopulationRow {
                coo_name: Some("Alpha".into()),
                refugees: 10,
                ..Default::default()
            },
        ];
        let ranked = rank(&rows, PopulationRow::origin_name, 5);
        assert_eq!(ranked[0].name, "Alpha");
        assert_eq!(ranked[1].name, "Zeta");
    }

    #[test]
    fn test_country_profile() {
        let all = rows(&sample());
        let origin: Vec<_> = all.iter().filter(|r| r.coo.as_deref() == Some("SYR")).cloned().collect();
        let profile = country_profile("SYR", &origin, &[], 5);

        assert_eq!(profile.name, "Syrian Arab Rep.");
        let side = profile.as_origin.unwrap();
        assert_eq!(side.total_refugees, 4_800_000);
        assert_eq!(side.top_partners[0].name, "Türkiye");
        assert!(profile.as_asylum.is_none());
    }

    #[test]
    fn test_country_profile_unknown() {
        let profile = country_profile("XXX", &[], &[], 5);
        assert_eq!(profile.name, "Unknown");
        assert!(profile.as_origin.is_none());
        assert!(profile.as_asylum.is_none());
    }

    #[test]
    fn test_countries_sorted_and_distinct() {
        let mut payload = sample();
        payload["items"]
            .as_array_mut()
            .unwrap()
            .push(json!({"coo": "-", "coo_name": "-", "coa": "-", "coa_name": "-"}));

        let countries = countries(&rows(&payload));
        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Afghanistan", "Germany", "Syrian Arab Rep.", "Türkiye"]);
        assert_eq!(countries[1].code, "DEU");
    }

    #[test]
    fn test_huge_counts_saturate() {
        let payload = json!({
            "items": [
                {"year": 2022, "coo": "SYR", "coo_name": "Syrian Arab Rep.", "coa_name": "Germany", "refugees": "18446744073709551615", "idps": "18446744073709551615"},
                {"year": 2022, "coo": "SYR", "coo_name": "Syrian Arab Rep.", "coa_name": "Germany", "refugees": 10, "idps": 10}
            ]
        });
        let rows = rows(&payload);

        let count = refugee_count("SYR", &rows).unwrap();
        assert_eq!(count.total_refugees, u64::MAX);
        assert_eq!(count.by_year["2022"], u64::MAX);

        let stats = asylum_stats("DEU", &rows).unwrap();
        assert_eq!(stats.countries_of_origin["Syrian Arab Rep."], u64::MAX);

        let summary = yearly_summary("2022", &rows, 5).unwrap();
        assert_eq!(summary.total_idps, u64::MAX);
        assert_eq!(summary.top_asylums[0].refugees, u64::MAX);
    }
}
