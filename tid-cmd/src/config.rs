//! Global options shared by every subcommand, read from flags or the
//! environment.

use crate::output::Output;
use anyhow::anyhow;
use clap::Args;
use directories::ProjectDirs;
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use tid_prefs::SqliteStore;
use tid_stat::config::{
    ApiConfig, DEFAULT_DIGITRAFFIC_BASE, DEFAULT_STATFIN_BASE, DEFAULT_VISITFINLAND_BASE,
};

const PREFS_FILE: &str = "preferences.sqlite";

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Root of the Statistics Finland PX-Web API
    #[arg(long, env = "TID_PXWEB_BASE", default_value = DEFAULT_STATFIN_BASE, global = true)]
    pub pxweb_base: String,

    /// Root of the Visit Finland PX-Web API
    #[arg(long, env = "TID_VISITFINLAND_BASE", default_value = DEFAULT_VISITFINLAND_BASE, global = true)]
    pub visitfinland_base: String,

    /// Root of the Digitraffic road API
    #[arg(long, env = "TID_DIGITRAFFIC_BASE", default_value = DEFAULT_DIGITRAFFIC_BASE, global = true)]
    pub digitraffic_base: String,

    /// Request timeout in seconds; none by default
    #[arg(long, env = "TID_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Preference database; defaults to the platform config directory
    #[arg(long, env = "TID_PREFS_DB", global = true)]
    pub prefs_db: Option<PathBuf>,

    /// Print comma-separated values instead of an aligned table
    #[arg(long, global = true)]
    pub csv: bool,

    /// Write to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            statfin_base: self.pxweb_base.clone(),
            visitfinland_base: self.visitfinland_base.clone(),
            digitraffic_base: self.digitraffic_base.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn output(&self) -> Output {
        Output::new(self.csv, self.output.clone())
    }

    /// The preference database path, creating its directory when it is the
    /// platform default.
    pub fn prefs_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.prefs_db {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("fi", "tid", "tid")
            .ok_or_else(|| anyhow!("no home directory to keep preferences in"))?;
        let dir = dirs.config_dir();
        std::fs::create_dir_all(dir)?;
        Ok(dir.join(PREFS_FILE))
    }

    pub fn open_preferences(&self) -> anyhow::Result<SqliteStore> {
        let path = self.prefs_path()?;
        info!("Using preferences at {}", path.display());
        SqliteStore::open(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn defaults_point_at_public_apis() {
        let cli = TestCli::try_parse_from(["tid"]).unwrap();
        let config = cli.global.api_config();
        assert_eq!(config.digitraffic_base, DEFAULT_DIGITRAFFIC_BASE);
        assert_eq!(config.timeout, None);
        assert!(!cli.global.csv);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "tid",
            "--pxweb-base",
            "http://localhost:8080/api/v1",
            "--timeout-secs",
            "5",
            "--prefs-db",
            "/tmp/prefs.sqlite",
        ])
        .unwrap();
        let config = cli.global.api_config();
        assert_eq!(config.statfin_base, "http://localhost:8080/api/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cli.global.prefs_path().unwrap(), PathBuf::from("/tmp/prefs.sqlite"));
    }

    #[test]
    fn opens_preferences_at_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.sqlite");
        let cli = TestCli::try_parse_from(["tid", "--prefs-db", path.to_str().unwrap()]).unwrap();
        let store = cli.global.open_preferences().unwrap();
        assert!(store.entries().unwrap().is_empty());
        assert!(path.exists());
    }
}
