//! Command implementations for the TID CLI.
//!
//! Every subcommand fetches one dataset, narrows it with the given (or
//! saved) selection, prints it, and remembers the selection for the next
//! run. A failed fetch is logged and prints an empty table; only argument
//! and preference errors end the run.

use clap::{Args, Subcommand, ValueEnum};
use log::{error, warn};
use tid_prefs::PreferenceStore;
use tid_stat::config::ApiConfig;
use tid_stat::stations::SensorFeed;
use tid_stat::Decoded;

pub mod config;
pub mod output;
pub mod prefs;
pub mod sensors;
pub mod tourism;

pub use config::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Nights spent by foreign tourists in the whole country and one municipality
    Visitors {
        /// Municipality name, e.g. "Tampere"; "Finland" for the whole country
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Trips by purpose
    Purposes {
        /// Comma-separated purpose codes: 1 personal, 6 work, 2-5 and 7-10 their breakdowns
        #[arg(short, long, default_value = tid_stat::datasets::visitors::MAIN_PURPOSES)]
        codes: String,
    },

    /// Yearly nights spent in one municipality
    Yearly {
        /// Municipality code, e.g. KU837; the saved location when omitted
        #[arg(short, long)]
        location_code: Option<String>,
    },

    /// Trips by destination region in one season
    Trips {
        /// Spring, Summer or Autumn
        #[arg(short, long)]
        season: Option<String>,
    },

    /// Overnight trips and average trip length per municipality in one year
    Duration {
        #[arg(short, long)]
        year: Option<String>,
    },

    /// Shares of one trip type by age group or gender
    Demographics {
        /// e.g. "Leisure Trip Abroad", "Cruise", "Domestic Visit"
        #[arg(short, long)]
        trip_type: Option<String>,

        #[arg(long, value_enum, default_value_t = GroupBy::AgeGroup)]
        by: GroupBy,
    },

    /// Tourism demand by product, region, year and type of tourism
    Economic {
        /// Product names (comma-separated)
        #[arg(long, value_delimiter = ',')]
        products: Vec<String>,

        /// Region names (comma-separated)
        #[arg(long, value_delimiter = ',')]
        regions: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        years: Vec<String>,

        /// Tourism type names (comma-separated)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },

    /// List the selectable products, regions, years and tourism types
    EconomicOptions,

    /// Road weather station readings
    Weather(SensorArgs),

    /// Traffic measurement station readings
    Traffic(SensorArgs),

    /// List station ids of one or both sensor feeds
    Stations {
        #[arg(value_enum)]
        feed: Option<Feed>,
    },

    /// Read or change saved preferences
    Prefs {
        #[command(subcommand)]
        action: prefs::PrefsAction,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SensorArgs {
    /// Station ids (comma-separated); the saved stations when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub stations: Vec<i64>,

    /// First day, YYYY-MM-DD; the saved date or yesterday when omitted
    #[arg(long)]
    pub from: Option<String>,

    /// Last day, YYYY-MM-DD; today when omitted
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    AgeGroup,
    Gender,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Weather,
    Traffic,
}

impl From<Feed> for SensorFeed {
    fn from(feed: Feed) -> Self {
        match feed {
            Feed::Weather => SensorFeed::Weather,
            Feed::Traffic => SensorFeed::Traffic,
        }
    }
}

/// Everything a subcommand needs.
pub struct Context<'a> {
    pub client: reqwest::Client,
    pub config: ApiConfig,
    pub prefs: &'a dyn PreferenceStore,
    pub output: output::Output,
}

pub async fn run(global: GlobalArgs, command: Command) -> anyhow::Result<()> {
    let store = global.open_preferences()?;
    let config = global.api_config();
    let client = tid_stat::client::build_client(&config)?;
    let ctx = Context {
        client,
        config,
        prefs: &store,
        output: global.output(),
    };

    match command {
        Command::Visitors { location } => tourism::run_visitors(&ctx, location).await,
        Command::Purposes { codes } => tourism::run_purposes(&ctx, &codes).await,
        Command::Yearly { location_code } => tourism::run_yearly(&ctx, location_code).await,
        Command::Trips { season } => tourism::run_trips(&ctx, season).await,
        Command::Duration { year } => tourism::run_duration(&ctx, year).await,
        Command::Demographics { trip_type, by } => {
            tourism::run_demographics(&ctx, trip_type, by).await
        }
        Command::Economic {
            products,
            regions,
            years,
            types,
        } => {
            let labels = tid_stat::datasets::EconomicSelection {
                products,
                regions,
                years,
                types,
            };
            tourism::run_economic(&ctx, labels).await
        }
        Command::EconomicOptions => tourism::run_economic_options(&ctx).await,
        Command::Weather(args) => sensors::run_weather(&ctx, &args).await,
        Command::Traffic(args) => sensors::run_traffic(&ctx, &args).await,
        Command::Stations { feed } => sensors::run_stations(&ctx, feed).await,
        Command::Prefs { action } => prefs::run_prefs(&store, action, &ctx.output),
    }
}

/// The records of a fetch; a failed fetch is logged and yields none.
pub(crate) fn or_empty<T>(what: &str, result: tid_stat::Result<Decoded<T>>) -> Vec<T> {
    match result {
        Ok(decoded) => {
            for issue in &decoded.issues {
                warn!("{}: {}", what, issue);
            }
            decoded.into_records()
        }
        Err(e) if e.is_fetch_failure() => {
            error!("Failed to fetch {}: {}", what, e);
            Vec::new()
        }
        Err(e) => {
            error!("Failed to decode {}: {}", what, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tid_stat::{IssueKind, StatError};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn parses_sensor_arguments() {
        let cli = TestCli::try_parse_from([
            "tid", "weather", "--stations", "1001,1012", "--from", "2024-12-01",
        ])
        .unwrap();
        match cli.command {
            Command::Weather(args) => {
                assert_eq!(args.stations, vec![1001, 1012]);
                assert_eq!(args.from.as_deref(), Some("2024-12-01"));
                assert_eq!(args.to, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_economic_lists_and_global_flags() {
        let cli = TestCli::try_parse_from([
            "tid", "economic", "--regions", "Uusimaa,Lapland", "--years", "2019", "--csv",
        ])
        .unwrap();
        assert!(cli.global.csv);
        match cli.command {
            Command::Economic { regions, years, products, .. } => {
                assert_eq!(regions, vec!["Uusimaa", "Lapland"]);
                assert_eq!(years, vec!["2019"]);
                assert!(products.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn purposes_default_to_main_codes() {
        let cli = TestCli::try_parse_from(["tid", "purposes"]).unwrap();
        assert!(matches!(cli.command, Command::Purposes { codes } if codes == "1,6"));
        assert!(TestCli::try_parse_from(["tid", "stations", "ferries"]).is_err());
    }

    #[test]
    fn failed_fetch_yields_no_rows() {
        let failed: tid_stat::Result<Decoded<u32>> = Err(StatError::Status(502));
        assert!(or_empty("test table", failed).is_empty());
        let malformed: tid_stat::Result<Decoded<u32>> =
            Err(StatError::MalformedResponse("expected value".into()));
        assert!(or_empty("test table", malformed).is_empty());
        let mut degraded = Decoded::empty_with(IssueKind::RowSkipped, "row 3");
        degraded.push(7u32);
        assert_eq!(or_empty("test table", Ok(degraded)), vec![7]);
    }
}
