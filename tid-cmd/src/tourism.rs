//! Tourism statistics subcommands.

use crate::{or_empty, Context, GroupBy};
use log::{info, warn};
use serde::Serialize;
use tid_data::summary::{share_totals, summarize_location, Breakdown};
use tid_prefs::{keys, PreferenceExt, PreferenceStore};
use tid_stat::datasets::economic::{fetch_economic_impact, fetch_economic_metadata, ECONOMIC_DIMENSIONS};
use tid_stat::datasets::trips::{fetch_destination_trips, fetch_trip_durations, fetch_visitor_shares};
use tid_stat::datasets::visitors::{
    fetch_purpose_visitors, fetch_region_visitors, fetch_yearly_visitors, region_code_for,
};
use tid_stat::datasets::{EconomicSelection, RegionVisitors};
use tid_stat::dimensions::WHOLE_COUNTRY_CODE;
use tid_stat::filter::{eq_ignore_case, filter_any_of, filter_eq, filter_region};
use tid_stat::metadata::TableMetadata;

#[derive(Debug, Serialize)]
struct GroupTotal {
    group: String,
    percentage: f64,
}

#[derive(Debug, Serialize)]
struct EconomicOption<'a> {
    dimension: &'a str,
    code: &'a str,
    text: &'a str,
}

/// The given value, saved for next time, or the saved one.
fn remembered(
    prefs: &dyn PreferenceStore,
    key: &str,
    given: Option<String>,
    default: &str,
) -> anyhow::Result<String> {
    match given {
        Some(value) => {
            prefs.put(key, &value)?;
            Ok(value)
        }
        None => prefs.get(key, default),
    }
}

/// Region code to remember for `selected`, or `None` when the rows carry
/// no such region.
fn location_code_to_save<'a>(rows: &'a [RegionVisitors], selected: &str) -> Option<&'a str> {
    if eq_ignore_case(selected, keys::DEFAULT_LOCATION) {
        return Some(WHOLE_COUNTRY_CODE);
    }
    region_code_for(rows, selected)
}

pub async fn run_visitors(ctx: &Context<'_>, location: Option<String>) -> anyhow::Result<()> {
    let selected = remembered(ctx.prefs, keys::SELECTED_LOCATION, location, keys::DEFAULT_LOCATION)?;
    let rows = or_empty(
        "visitors by region",
        fetch_region_visitors(&ctx.client, &ctx.config).await,
    );

    match location_code_to_save(&rows, &selected) {
        Some(code) => ctx.prefs.put(keys::SELECTED_LOCATION_CODE, code)?,
        None => warn!("No region code found for {}, keeping the saved one", selected),
    }

    let filtered = filter_region(
        &rows,
        |r| r.region_id.as_str(),
        |r| r.region_name.as_str(),
        Some(selected.as_str()),
    );
    match summarize_location(&filtered) {
        Some(summary) => {
            info!("{}: {} nights", summary.location, summary.nights);
            ctx.output.write(&[summary])
        }
        None => {
            warn!("No nights data for {}", selected);
            ctx.output.write::<tid_data::summary::LocationSummary>(&[])
        }
    }
}

pub async fn run_purposes(ctx: &Context<'_>, codes: &str) -> anyhow::Result<()> {
    let rows = or_empty(
        "visitors by purpose",
        fetch_purpose_visitors(&ctx.client, &ctx.config).await,
    );
    let selected = filter_any_of(&rows, |r| r.purpose_id.as_str(), codes);
    ctx.output.write(&selected)
}

pub async fn run_yearly(ctx: &Context<'_>, location_code: Option<String>) -> anyhow::Result<()> {
    let code = remembered(ctx.prefs, keys::SELECTED_LOCATION_CODE, location_code, "")?;
    let location = Some(code.as_str()).filter(|c| !c.is_empty());
    let rows = or_empty(
        "yearly visitors",
        fetch_yearly_visitors(&ctx.client, &ctx.config, location).await,
    );
    ctx.output.write(&rows)
}

pub async fn run_trips(ctx: &Context<'_>, season: Option<String>) -> anyhow::Result<()> {
    let season = remembered(ctx.prefs, keys::SEASON, season, keys::DEFAULT_SEASON)?;
    let rows = or_empty(
        "trips by destination",
        fetch_destination_trips(&ctx.client, &ctx.config).await,
    );
    ctx.output.write(&filter_eq(&rows, |r| r.season.as_str(), &season))
}

pub async fn run_duration(ctx: &Context<'_>, year: Option<String>) -> anyhow::Result<()> {
    let year = remembered(ctx.prefs, keys::YEAR, year, keys::DEFAULT_YEAR)?;
    let rows = or_empty(
        "trips and duration",
        fetch_trip_durations(&ctx.client, &ctx.config).await,
    );
    ctx.output.write(&filter_eq(&rows, |r| r.year.as_str(), &year))
}

pub async fn run_demographics(
    ctx: &Context<'_>,
    trip_type: Option<String>,
    by: GroupBy,
) -> anyhow::Result<()> {
    let trip_type = remembered(ctx.prefs, keys::TRIP_TYPE, trip_type, keys::DEFAULT_TRIP_TYPE)?;
    let rows = or_empty(
        "visitor statistics",
        fetch_visitor_shares(&ctx.client, &ctx.config).await,
    );
    let breakdown = match by {
        GroupBy::AgeGroup => Breakdown::AgeGroup,
        GroupBy::Gender => Breakdown::Gender,
    };
    let totals: Vec<GroupTotal> = share_totals(&rows, &trip_type, breakdown)
        .into_iter()
        .map(|(group, percentage)| GroupTotal { group, percentage })
        .collect();
    ctx.output.write(&totals)
}

/// The given labels for one dimension, saved for next time, or the saved ones.
fn remembered_list(
    prefs: &dyn PreferenceStore,
    key: &str,
    given: Vec<String>,
) -> anyhow::Result<Vec<String>> {
    if given.is_empty() {
        return prefs.get_list(key);
    }
    prefs.put_list(key, &given)?;
    Ok(given)
}

/// Codes to query. Each dimension takes the given labels, else the saved
/// labels. With nothing given or saved anywhere, the first option of every
/// dimension is used. Given labels are saved.
pub fn economic_selection(
    prefs: &dyn PreferenceStore,
    given: EconomicSelection,
    metadata: &TableMetadata,
) -> anyhow::Result<EconomicSelection> {
    let labels = EconomicSelection {
        products: remembered_list(prefs, keys::PRODUCTS, given.products)?,
        regions: remembered_list(prefs, keys::REGIONS, given.regions)?,
        years: remembered_list(prefs, keys::YEARS, given.years)?,
        types: remembered_list(prefs, keys::TYPES, given.types)?,
    };

    if labels.is_empty() {
        info!("No economic selection saved, using the first option of each dimension");
        return Ok(EconomicSelection::first_options(metadata));
    }
    let codes = labels.to_codes(metadata);
    for (dimension, values) in codes.entries() {
        if values.is_empty() {
            warn!("Nothing selected for {}", dimension);
        }
    }
    Ok(codes)
}

pub async fn run_economic(ctx: &Context<'_>, labels: EconomicSelection) -> anyhow::Result<()> {
    let metadata = match fetch_economic_metadata(&ctx.client, &ctx.config).await {
        Ok(metadata) => metadata,
        Err(e) => {
            log::error!("Failed to fetch economic table metadata: {}", e);
            TableMetadata::default()
        }
    };
    let selection = economic_selection(ctx.prefs, labels, &metadata)?;
    if selection.is_empty() {
        return ctx.output.write::<tid_stat::datasets::EconomicImpact>(&[]);
    }
    let rows = or_empty(
        "economic impact",
        fetch_economic_impact(&ctx.client, &ctx.config, &selection).await,
    );
    ctx.output.write(&rows)
}

pub async fn run_economic_options(ctx: &Context<'_>) -> anyhow::Result<()> {
    let metadata = fetch_economic_metadata(&ctx.client, &ctx.config).await?;
    let options: Vec<EconomicOption> = ECONOMIC_DIMENSIONS
        .iter()
        .flat_map(|&dimension| {
            metadata
                .options(dimension)
                .unwrap_or_default()
                .into_iter()
                .map(move |(code, text)| EconomicOption { dimension, code, text })
        })
        .collect();
    ctx.output.write(&options)
}
