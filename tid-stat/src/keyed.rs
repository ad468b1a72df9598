//! Decoding of the PX-Web keyed `json` shape, where every row carries its
//! dimension codes in `key` (query order) and its measures as strings in
//! `values`.

use crate::decoded::{Decoded, IssueKind};
use crate::error::{Result, StatError};
use crate::resolver::CodeResolver;
use crate::row::{Cell, FlatRow, Measure};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// PX-Web marks a missing measure with dots ("." and its longer variants).
pub const MISSING_SENTINEL: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedRow {
    pub key: Vec<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyedResponse {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub data: Option<Vec<KeyedRow>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub code: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl KeyedResponse {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Decimal,
}

/// What a missing measure becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    Zero,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureSpec {
    pub name: String,
    pub kind: NumberKind,
    pub missing: MissingPolicy,
}

impl MeasureSpec {
    pub fn new(name: impl Into<String>, kind: NumberKind, missing: MissingPolicy) -> Self {
        Self {
            name: name.into(),
            kind,
            missing,
        }
    }

    /// Integer count; missing counts as zero.
    pub fn count(name: impl Into<String>) -> Self {
        Self::new(name, NumberKind::Integer, MissingPolicy::Zero)
    }

    /// Decimal; missing counts as zero.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, NumberKind::Decimal, MissingPolicy::Zero)
    }

    /// Decimal average; missing stays missing.
    pub fn average(name: impl Into<String>) -> Self {
        Self::new(name, NumberKind::Decimal, MissingPolicy::Null)
    }

    pub fn parse(&self, raw: &str) -> Result<Option<f64>> {
        let raw = raw.trim();
        if is_missing(raw) {
            return Ok(match self.missing {
                MissingPolicy::Zero => Some(0.0),
                MissingPolicy::Null => None,
            });
        }
        let parsed = match self.kind {
            NumberKind::Integer => raw.parse::<i64>().map(|n| n as f64).ok(),
            NumberKind::Decimal => raw.parse::<f64>().ok(),
        };
        parsed
            .map(Some)
            .ok_or_else(|| StatError::parse(&self.name, raw))
    }
}

pub fn is_missing(raw: &str) -> bool {
    !raw.is_empty() && raw.trim_start_matches(MISSING_SENTINEL).is_empty()
}

/// How one key position is named and labelled.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumn<'a> {
    pub dimension: &'a str,
    pub resolver: Option<&'a CodeResolver>,
}

impl<'a> KeyColumn<'a> {
    /// Code used as its own label.
    pub fn raw(dimension: &'a str) -> Self {
        Self {
            dimension,
            resolver: None,
        }
    }

    pub fn resolved(dimension: &'a str, resolver: &'a CodeResolver) -> Self {
        Self {
            dimension,
            resolver: Some(resolver),
        }
    }

    fn label(&self, code: &str) -> Result<String> {
        match self.resolver {
            Some(resolver) => resolver.resolve(code),
            None => Ok(code.to_string()),
        }
    }
}

/// Decode rows, skipping (and recording) any row that is short or has an
/// unparseable measure.
pub fn decode_keyed(
    rows: &[KeyedRow],
    key_columns: &[KeyColumn<'_>],
    measures: &[MeasureSpec],
) -> Decoded<FlatRow> {
    let mut decoded = Decoded::with_capacity(rows.len());
    for (n, row) in rows.iter().enumerate() {
        match decode_row(row, key_columns, measures) {
            Ok(flat) => decoded.push(flat),
            Err(e) => {
                debug!("Skipping row {} {:?}: {}", n, row.key, e);
                decoded.note(IssueKind::RowSkipped, format!("row {}: {}", n, e));
            }
        }
    }
    if decoded.is_degraded() {
        warn!(
            "Decoded {} of {} rows, {} skipped",
            decoded.len(),
            rows.len(),
            decoded.issues.len()
        );
    }
    decoded
}

pub fn decode_keyed_response(
    response: &KeyedResponse,
    key_columns: &[KeyColumn<'_>],
    measures: &[MeasureSpec],
) -> Decoded<FlatRow> {
    match &response.data {
        Some(rows) => decode_keyed(rows, key_columns, measures),
        None => {
            warn!("No data found in the response");
            Decoded::empty_with(IssueKind::MissingData, "response has no data array")
        }
    }
}

fn decode_row(row: &KeyedRow, key_columns: &[KeyColumn<'_>], measures: &[MeasureSpec]) -> Result<FlatRow> {
    if row.key.len() < key_columns.len() {
        return Err(StatError::MalformedResponse(format!(
            "expected {} key codes, found {}",
            key_columns.len(),
            row.key.len()
        )));
    }
    if row.values.len() < measures.len() {
        return Err(StatError::MalformedResponse(format!(
            "expected {} values, found {}",
            measures.len(),
            row.values.len()
        )));
    }
    let cells = key_columns
        .iter()
        .zip(&row.key)
        .map(|(column, code)| {
            Ok(Cell {
                dimension: column.dimension.to_string(),
                code: code.clone(),
                label: column.label(code)?,
            })
        })
        .collect::<Result<Vec<Cell>>>()?;
    let measures = measures
        .iter()
        .zip(&row.values)
        .map(|(spec, raw)| {
            Ok(Measure {
                name: spec.name.clone(),
                value: spec.parse(raw)?,
            })
        })
        .collect::<Result<Vec<Measure>>>()?;
    Ok(FlatRow { cells, measures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::*;
    use crate::resolver::{ResolverRegistry, UnknownCodePolicy};

    static DURATION: &str = include_str!("../../fixtures/trips_and_duration.json");
    static DESTINATIONS: &str = include_str!("../../fixtures/trips_by_destination.json");

    #[test]
    fn test_missing_policy_per_measure() {
        let response = KeyedResponse::parse(DURATION).unwrap();
        let registry = ResolverRegistry::builtin();
        let columns = [
            KeyColumn::raw(YEAR),
            KeyColumn::resolved(DESTINATION_MUNICIPALITY, registry.get(DESTINATION_MUNICIPALITY).unwrap()),
        ];
        let measures = [MeasureSpec::count("yop_matkoja"), MeasureSpec::average("viipyma")];
        let decoded = decode_keyed_response(&response, &columns, &measures);

        // the "n/a" row is dropped, the rest survive
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].kind, IssueKind::RowSkipped);

        let tampere_2023 = &decoded.records[1];
        assert_eq!(tampere_2023.label(DESTINATION_MUNICIPALITY), Some("Tampere"));
        assert_eq!(tampere_2023.measure("yop_matkoja"), Some(1_102_000.0));
        assert_eq!(tampere_2023.measure("viipyma"), None);

        let helsinki_2024 = &decoded.records[2];
        assert_eq!(helsinki_2024.measure("yop_matkoja"), Some(0.0));
        assert_eq!(helsinki_2024.measure("viipyma"), Some(2.6));

        // unknown municipality passes through
        assert_eq!(decoded.records[4].label(DESTINATION_MUNICIPALITY), Some("KU999"));
    }

    #[test]
    fn test_key_positions_map_to_columns() {
        let response = KeyedResponse::parse(DESTINATIONS).unwrap();
        let registry = ResolverRegistry::builtin();
        let columns = [
            KeyColumn::resolved(DESTINATION_REGION, registry.get(DESTINATION_REGION).unwrap()),
            KeyColumn::raw(PURPOSE),
            KeyColumn::raw(YEAR),
            KeyColumn::resolved(SEASON, registry.get(SEASON).unwrap()),
        ];
        let rows = decode_keyed_response(&response, &columns, &[MeasureSpec::decimal("matkat")]).into_records();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[1].label(DESTINATION_REGION), Some("Uusimaa"));
        assert_eq!(rows[1].label(SEASON), Some("Summer"));
        assert_eq!(rows[1].value(), 2_210_000.0);
        assert_eq!(rows[6].value(), 0.0);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let rows = vec![
            KeyedRow {
                key: vec!["2024".into()],
                values: vec!["1".into()],
            },
            KeyedRow {
                key: vec!["2024".into(), "KU091".into()],
                values: vec![],
            },
            KeyedRow {
                key: vec!["2024".into(), "KU091".into()],
                values: vec!["3".into()],
            },
        ];
        let columns = [KeyColumn::raw(YEAR), KeyColumn::raw(DESTINATION_MUNICIPALITY)];
        let decoded = decode_keyed(&rows, &columns, &[MeasureSpec::count("n")]);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.issues.len(), 2);
    }

    #[test]
    fn test_strict_resolver_skips_row() {
        let seasons = CodeResolver::from_pairs(SEASON, [("1", "Spring")], UnknownCodePolicy::Strict);
        let rows = vec![
            KeyedRow {
                key: vec!["1".into()],
                values: vec!["5".into()],
            },
            KeyedRow {
                key: vec!["7".into()],
                values: vec!["6".into()],
            },
        ];
        let decoded = decode_keyed(&rows, &[KeyColumn::resolved(SEASON, &seasons)], &[MeasureSpec::count("n")]);
        assert_eq!(decoded.len(), 1);
        assert!(decoded.issues[0].detail.contains("Unknown code"));
    }

    #[test]
    fn test_missing_data_array() {
        let response = KeyedResponse::parse(r#"{"columns": []}"#).unwrap();
        let decoded = decode_keyed_response(&response, &[], &[]);
        assert!(decoded.is_empty());
        assert!(decoded.has_issue(IssueKind::MissingData));
    }

    #[test]
    fn test_measure_parsing() {
        assert_eq!(MeasureSpec::count("n").parse(" 42 ").unwrap(), Some(42.0));
        assert!(MeasureSpec::count("n").parse("4.2").is_err());
        assert_eq!(MeasureSpec::decimal("n").parse("..").unwrap(), Some(0.0));
        assert_eq!(MeasureSpec::average("n").parse(".").unwrap(), None);
        assert!(!is_missing(""));
    }
}
