//! API endpoint configuration.

use std::time::Duration;

pub const DEFAULT_STATFIN_BASE: &str = "https://pxdata.stat.fi/PxWeb/api/v1";
pub const DEFAULT_VISITFINLAND_BASE: &str = "https://visitfinland.stat.fi/PXWeb/api/v1";
pub const DEFAULT_DIGITRAFFIC_BASE: &str = "https://tie.digitraffic.fi/api";

/// Which PX-Web installation serves a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    StatFin,
    VisitFinland,
}

/// A PX-Web table, addressed relative to its host's API root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub host: Host,
    /// Language and database path, e.g. `en/StatFin/smat/statfin_smat_pxt_13h2.px`.
    pub path: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub statfin_base: String,
    pub visitfinland_base: String,
    pub digitraffic_base: String,
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            statfin_base: DEFAULT_STATFIN_BASE.to_string(),
            visitfinland_base: DEFAULT_VISITFINLAND_BASE.to_string(),
            digitraffic_base: DEFAULT_DIGITRAFFIC_BASE.to_string(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn table_url(&self, table: &TableRef) -> String {
        let base = match table.host {
            Host::StatFin => &self.statfin_base,
            Host::VisitFinland => &self.visitfinland_base,
        };
        join_url(base, table.path)
    }

    /// Station data URL for a Digitraffic feed path.
    pub fn digitraffic_url(&self, path: &str) -> String {
        format!("{}?lastUpdated=false", join_url(&self.digitraffic_base, path))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
