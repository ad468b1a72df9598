//! The dashboard's concrete tables: where each one lives, what is asked of
//! it, and the typed records it decodes into.

pub mod economic;
pub mod trips;
pub mod visitors;

pub use economic::{EconomicImpact, EconomicSelection};
pub use trips::{DestinationTrips, TripDuration, VisitorShare};
pub use visitors::{PurposeVisitors, RegionVisitors, YearlyVisitors};

use crate::error::{Result, StatError};
use crate::row::FlatRow;

/// Code and label of `dimension` in `row`.
pub(crate) fn cell<'r>(row: &'r FlatRow, dimension: &str) -> Result<(&'r str, &'r str)> {
    row.cell(dimension)
        .map(|c| (c.code.as_str(), c.label.as_str()))
        .ok_or_else(|| StatError::MalformedResponse(format!("row has no {} cell", dimension)))
}
