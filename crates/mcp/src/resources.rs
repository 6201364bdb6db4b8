// MCP resources: Markdown summaries of population data

use crate::protocol::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use std::fmt::Write as _;
use std::sync::Arc;
use unhcr_sdk::{Country, CountryProfile, ProfileSide, RankedCountry, UnhcrClient, UnhcrError, YearlySummary};

const MARKDOWN: &str = "text/markdown";
const COUNTRIES_URI: &str = "unhcr://countries";
const STATS_PREFIX: &str = "unhcr://stats/";
const COUNTRY_PREFIX: &str = "unhcr://country/";

const YEARLY_TOP: usize = 10;
const PROFILE_TOP: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] UnhcrError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourceUri {
    Countries,
    Stats(String),
    Country(String),
}

impl ResourceUri {
    fn parse(uri: &str) -> Option<Self> {
        if uri == COUNTRIES_URI {
            return Some(Self::Countries);
        }
        let segment = |prefix: &str| {
            uri.strip_prefix(prefix)
                .map(|rest| rest.trim_matches('/'))
                .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                .map(String::from)
        };
        segment(STATS_PREFIX)
            .map(Self::Stats)
            .or_else(|| segment(COUNTRY_PREFIX).map(|code| Self::Country(code.to_uppercase())))
    }
}

/// Serves the fixed resource set backed by the population endpoint
pub struct ResourceCatalog {
    client: Arc<UnhcrClient>,
}

impl ResourceCatalog {
    pub fn new(client: Arc<UnhcrClient>) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Vec<Resource> {
        vec![Resource {
            uri: COUNTRIES_URI.to_string(),
            name: "UNHCR Country Codes".to_string(),
            description: "ISO3 codes and names of countries in the UNHCR population dataset".to_string(),
            mime_type: MARKDOWN.to_string(),
        }]
    }

    pub fn templates(&self) -> Vec<ResourceTemplate> {
        vec![
            ResourceTemplate {
                uri_template: format!("{}{{year}}", STATS_PREFIX),
                name: "Global refugee statistics".to_string(),
                description: "Global totals and top countries of origin and asylum for a year".to_string(),
                mime_type: MARKDOWN.to_string(),
            },
            ResourceTemplate {
                uri_template: format!("{}{{country_code}}", COUNTRY_PREFIX),
                name: "Country refugee profile".to_string(),
                description: "Refugees from and hosted by a country (ISO3 code)".to_string(),
                mime_type: MARKDOWN.to_string(),
            },
        ]
    }

    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let parsed = ResourceUri::parse(uri).ok_or_else(|| ResourceError::NotFound(uri.to_string()))?;
        let population = self.client.population();

        let text = match parsed {
            ResourceUri::Countries => render_countries(&population.countries(None).await?),
            ResourceUri::Stats(year) => match population.yearly_summary(&year, YEARLY_TOP).await? {
                Some(summary) => render_yearly(&summary),
                None => format!("No data available for year {}", year),
            },
            ResourceUri::Country(code) => {
                render_profile(&population.country_profile(&code, PROFILE_TOP).await?)
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: MARKDOWN.to_string(),
                text,
            }],
        })
    }
}

fn render_countries(countries: &[Country]) -> String {
    let mut out = String::from("# UNHCR Country Codes\n\nISO Code | Country Name\n---------|-------------\n");
    for country in countries {
        let _ = writeln!(out, "{} | {}", country.code, country.name);
    }
    out
}

fn render_yearly(summary: &YearlySummary) -> String {
    let mut out = format!("# Global Refugee Statistics for {}\n\n", summary.year);
    let _ = writeln!(out, "Total refugees: {}", thousands(summary.total_refugees));
    let _ = writeln!(out, "Total asylum seekers: {}", thousands(summary.total_asylum_seekers));
    let _ = writeln!(
        out,
        "Total internally displaced persons: {}\n",
        thousands(summary.total_idps)
    );

    out.push_str(&format!("## Top {} Countries of Origin\n\n", YEARLY_TOP));
    push_ranking(&mut out, &summary.top_origins);
    out.push_str(&format!("\n## Top {} Countries of Asylum\n\n", YEARLY_TOP));
    push_ranking(&mut out, &summary.top_asylums);
    out
}

fn render_profile(profile: &CountryProfile) -> String {
    let mut out = format!("# {} ({}) Refugee Profile\n\n", profile.name, profile.code);

    let mut side = |heading: String, total_label: &str, partners_label: &str, side: &Option<ProfileSide>| {
        out.push_str(&heading);
        match side {
            Some(side) => {
                let _ = writeln!(out, "{}: {}\n", total_label, thousands(side.total_refugees));
                let _ = writeln!(out, "### Top {} {}\n", PROFILE_TOP, partners_label);
                push_ranking(&mut out, &side.top_partners);
            }
            None => out.push_str("No data available\n"),
        }
    };

    side(
        format!("## Refugees from {}\n\n", profile.name),
        "Total refugees",
        "Countries of Asylum",
        &profile.as_origin,
    );
    side(
        format!("\n## Refugees in {}\n\n", profile.name),
        "Total refugees hosted",
        "Countries of Origin",
        &profile.as_asylum,
    );
    out
}

fn push_ranking(out: &mut String, ranking: &[RankedCountry]) {
    out.push_str("Country | Refugee Count\n--------|-------------\n");
    for entry in ranking {
        let _ = writeln!(out, "{} | {}", entry.name, thousands(entry.refugees));
    }
}

/// `1234567` as `1,234,567`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
