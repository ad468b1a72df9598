//! Core types, decoders and API clients for Finnish tourism, weather and
//! traffic statistics.
//!
//! Tourism tables come from the Statistics Finland / Visit Finland PX-Web
//! API in two shapes: `json-stat2` (a dimension/index/label/value cube) and
//! the keyed `json` row shape. Road weather and traffic readings come from
//! the Digitraffic station APIs. Everything here decodes into plain owned
//! records; HTTP access lives behind the `api` feature.

pub mod config;
pub mod datasets;
pub mod decoded;
pub mod dimensions;
pub mod error;
pub mod filter;
pub mod json_stat;
pub mod keyed;
pub mod metadata;
pub mod query;
pub mod resolver;
pub mod row;
pub mod sensor;
pub mod stations;
pub mod time_range;

#[cfg(feature = "api")]
pub mod client;

pub use decoded::{DecodeIssue, Decoded, IssueKind};
pub use error::{Result, StatError};
pub use row::FlatRow;
