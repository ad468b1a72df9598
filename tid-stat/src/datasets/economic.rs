//! Regional tourism satellite account: tourism demand by product, region,
//! year and type of tourism. The selectable options come from the table's
//! own metadata.

use super::cell;
use crate::config::{Host, TableRef};
use crate::decoded::Decoded;
use crate::dimensions::*;
use crate::error::Result;
use crate::json_stat::{decode_dimensioned, DimensionedResponse};
use crate::metadata::TableMetadata;
use crate::query::{build_query, QueryDocument};
use serde::Serialize;

#[cfg(feature = "api")]
use crate::{client, config::ApiConfig};
#[cfg(feature = "api")]
use reqwest::Client;

pub const ECONOMIC_TABLE: TableRef = TableRef {
    host: Host::VisitFinland,
    path: "en/VisitFinland/Alueellinen_matkailutilinpito/040_amtp_tau_104.px",
};

/// Decode order of the cube, slowest first.
pub const ECONOMIC_DIMENSIONS: [&str; 4] = [PRODUCT, PROVINCE, YEAR, TOURISM_TYPE];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicImpact {
    pub product: String,
    pub region: String,
    pub year: String,
    #[serde(rename = "type")]
    pub tourism_type: String,
    pub value: f64,
}

/// Chosen entries per dimension. Holds either display texts or codes;
/// [`to_codes`](Self::to_codes) turns the former into the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomicSelection {
    pub products: Vec<String>,
    pub regions: Vec<String>,
    pub years: Vec<String>,
    pub types: Vec<String>,
}

impl EconomicSelection {
    /// The first option of every dimension.
    pub fn first_options(metadata: &TableMetadata) -> Self {
        let first = |code: &str| -> Vec<String> {
            metadata
                .options(code)
                .and_then(|options| options.first().map(|(code, _)| vec![code.to_string()]))
                .unwrap_or_default()
        };
        Self {
            products: first(PRODUCT),
            regions: first(PROVINCE),
            years: first(YEAR),
            types: first(TOURISM_TYPE),
        }
    }

    /// Same selection as codes, looked up by display text.
    pub fn to_codes(&self, metadata: &TableMetadata) -> Self {
        Self {
            products: metadata.codes_for_labels(PRODUCT, &self.products),
            regions: metadata.codes_for_labels(PROVINCE, &self.regions),
            years: metadata.codes_for_labels(YEAR, &self.years),
            types: metadata.codes_for_labels(TOURISM_TYPE, &self.types),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, values)| values.is_empty())
    }

    /// `(dimension, entries)` in decode order.
    pub fn entries(&self) -> [(&'static str, &Vec<String>); 4] {
        [
            (PRODUCT, &self.products),
            (PROVINCE, &self.regions),
            (YEAR, &self.years),
            (TOURISM_TYPE, &self.types),
        ]
    }
}

/// A query over the selected codes.
pub fn economic_query(selection: &EconomicSelection) -> QueryDocument {
    build_query(selection.entries().map(|(dimension, values)| (dimension, values.clone())))
}

pub fn economic_impact(response: &DimensionedResponse) -> Decoded<EconomicImpact> {
    decode_dimensioned(response, &ECONOMIC_DIMENSIONS).convert(|row| -> Result<EconomicImpact> {
        Ok(EconomicImpact {
            product: cell(&row, PRODUCT)?.1.to_string(),
            region: cell(&row, PROVINCE)?.1.to_string(),
            year: cell(&row, YEAR)?.1.to_string(),
            tourism_type: cell(&row, TOURISM_TYPE)?.1.to_string(),
            value: row.value(),
        })
    })
}

#[cfg(feature = "api")]
pub async fn fetch_economic_metadata(client: &Client, config: &ApiConfig) -> Result<TableMetadata> {
    client::fetch_metadata(client, config, &ECONOMIC_TABLE).await
}

#[cfg(feature = "api")]
pub async fn fetch_economic_impact(
    client: &Client,
    config: &ApiConfig,
    selection: &EconomicSelection,
) -> Result<Decoded<EconomicImpact>> {
    let response = client::fetch_dimensioned(client, config, &ECONOMIC_TABLE, &economic_query(selection)).await?;
    Ok(economic_impact(&response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> TableMetadata {
        TableMetadata::parse(include_str!("../../../fixtures/economic_metadata.json")).unwrap()
    }

    #[test]
    fn test_first_options() {
        let selection = EconomicSelection::first_options(&metadata());
        assert_eq!(selection.products, vec!["T1"]);
        assert_eq!(selection.regions, vec!["MK01"]);
        assert_eq!(selection.years, vec!["2018"]);
        assert_eq!(selection.types, vec!["D"]);
        assert!(EconomicSelection::first_options(&TableMetadata::default()).is_empty());
    }

    #[test]
    fn test_labels_to_query() {
        let labels = EconomicSelection {
            products: vec!["Food and beverage serving services".into()],
            regions: vec!["Southwest Finland".into(), "Uusimaa".into()],
            years: vec!["2019".into()],
            types: vec!["Inbound".into(), "Nonexistent".into()],
        };
        let query = economic_query(&labels.to_codes(&metadata()));
        assert_eq!(
            query.selections(),
            vec![
                (PRODUCT, &["T2".to_string()][..]),
                (PROVINCE, &["MK02".to_string(), "MK01".to_string()][..]),
                (YEAR, &["2019".to_string()][..]),
                (TOURISM_TYPE, &["I".to_string()][..]),
            ]
        );
    }

    #[test]
    fn test_economic_impact_records() {
        let response = DimensionedResponse::parse(include_str!("../../../fixtures/economic_impact.json")).unwrap();
        let decoded = economic_impact(&response);
        assert_eq!(decoded.len(), 8);
        let first = &decoded.records[0];
        assert_eq!(first.product, "Accommodation services");
        assert_eq!(first.region, "Uusimaa");
        assert_eq!(first.year, "2018");
        assert_eq!(first.tourism_type, "Domestic");
        assert_eq!(first.value, 10.0);
        assert_eq!(decoded.records[5].value, 0.0);
    }
}
