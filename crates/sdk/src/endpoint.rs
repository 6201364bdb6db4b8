//! The fixed set of UNHCR population API endpoints.

use std::fmt;
use std::str::FromStr;

/// A logical UNHCR dataset and the path segment that serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Forcibly displaced population stocks.
    Population,
    /// Age and sex breakdowns.
    Demographics,
    /// Refugee Status Determination applications.
    AsylumApplications,
    /// Refugee Status Determination decisions.
    AsylumDecisions,
    /// Durable solutions: returns, resettlement, naturalisation.
    Solutions,
}

impl Endpoint {
    /// Every endpoint, in declaration order.
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Population,
        Endpoint::Demographics,
        Endpoint::AsylumApplications,
        Endpoint::AsylumDecisions,
        Endpoint::Solutions,
    ];

    /// Endpoint name as it appears in the URL.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Population => "population",
            Endpoint::Demographics => "demographics",
            Endpoint::AsylumApplications => "asylum-applications",
            Endpoint::AsylumDecisions => "asylum-decisions",
            Endpoint::Solutions => "solutions",
        }
    }

    /// Path relative to the API base, with the trailing slash upstream expects.
    pub fn path(self) -> String {
        format!("{}/", self.name())
    }

    /// Only the demographics endpoint understands `pop_type`.
    pub fn supports_pop_type(self) -> bool {
        matches!(self, Endpoint::Demographics)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|e| e.name() == s.trim().trim_end_matches('/'))
            .ok_or_else(|| format!("Unknown endpoint: {}", s))
    }
}
