//! Decoding of PX-Web `json-stat2` responses.
//!
//! A `json-stat2` dataset is a cube: every dimension has a category index
//! (code → position) and a label map, and `value` holds the cells with the
//! first listed dimension varying slowest and the last fastest.

use crate::decoded::{Decoded, IssueKind};
use crate::error::Result;
use crate::resolver::ResolverRegistry;
use crate::row::{Cell, FlatRow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the single measure produced by dimensioned decoding.
pub const VALUE_MEASURE: &str = "value";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Dimension order as served.
    #[serde(default)]
    pub id: Vec<String>,
    #[serde(default)]
    pub size: Vec<usize>,
    #[serde(default)]
    pub dimension: Option<HashMap<String, Dimension>>,
    #[serde(default)]
    pub value: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub label: Option<String>,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub index: CategoryIndex,
    #[serde(default)]
    pub label: HashMap<String, String>,
}

/// `json-stat2` allows the index as an object of positions or as an array
/// of codes already in position order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryIndex {
    Positions(HashMap<String, usize>),
    Ordered(Vec<String>),
}

impl CategoryIndex {
    pub fn len(&self) -> usize {
        match self {
            CategoryIndex::Positions(map) => map.len(),
            CategoryIndex::Ordered(codes) => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Codes sorted by ascending position.
    pub fn sorted_codes(&self) -> Vec<String> {
        match self {
            CategoryIndex::Positions(map) => {
                let mut entries: Vec<(&String, &usize)> = map.iter().collect();
                entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
                entries.into_iter().map(|(code, _)| code.clone()).collect()
            }
            CategoryIndex::Ordered(codes) => codes.clone(),
        }
    }
}

impl Dimension {
    pub fn sorted_codes(&self) -> Vec<String> {
        self.category.index.sorted_codes()
    }

    /// The served label, falling back to the code.
    pub fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.category
            .label
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }
}

impl DimensionedResponse {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimension.as_ref().and_then(|d| d.get(name))
    }
}

struct Axis<'a> {
    name: &'a str,
    dimension: &'a Dimension,
    codes: Vec<String>,
}

/// Flatten the cube along `dimension_order`, labels from the response.
pub fn decode_dimensioned<S: AsRef<str>>(
    response: &DimensionedResponse,
    dimension_order: &[S],
) -> Decoded<FlatRow> {
    decode_dimensioned_with(response, dimension_order, &ResolverRegistry::new())
}

/// Flatten the cube along `dimension_order`. A label from `registry` takes
/// precedence over the served label, which takes precedence over the code.
pub fn decode_dimensioned_with<S: AsRef<str>>(
    response: &DimensionedResponse,
    dimension_order: &[S],
    registry: &ResolverRegistry,
) -> Decoded<FlatRow> {
    let Some(dimensions) = response.dimension.as_ref() else {
        warn!("Dimension data is missing in the response");
        return Decoded::empty_with(IssueKind::MissingDimension, "response has no dimension object");
    };

    let mut axes: Vec<Axis> = Vec::with_capacity(dimension_order.len());
    for name in dimension_order {
        let name = name.as_ref();
        match dimensions.get(name) {
            Some(dimension) => axes.push(Axis {
                name,
                dimension,
                codes: dimension.sorted_codes(),
            }),
            None => {
                warn!("Dimension {} is missing in the response", name);
                return Decoded::empty_with(
                    IssueKind::MissingDimension,
                    format!("dimension {:?} not present", name),
                );
            }
        }
    }

    let sizes: Vec<usize> = axes.iter().map(|a| a.codes.len()).collect();
    let expected: usize = sizes.iter().product();
    let mut decoded = Decoded::with_capacity(expected.min(response.value.len()));
    if expected != response.value.len() {
        warn!(
            "Expected {} values for {} dimensions, response has {}",
            expected,
            axes.len(),
            response.value.len()
        );
        decoded.note(
            IssueKind::ValueCountMismatch,
            format!("expected {} values, got {}", expected, response.value.len()),
        );
    }
    if expected == 0 {
        return decoded;
    }

    // Odometer over the axes, last axis fastest.
    let mut cursor = vec![0usize; axes.len()];
    for position in 0..expected {
        let cells = axes
            .iter()
            .zip(&cursor)
            .map(|(axis, &i)| {
                let code = &axis.codes[i];
                let label = registry
                    .get(axis.name)
                    .and_then(|r| r.lookup(code))
                    .unwrap_or_else(|| axis.dimension.label_for(code));
                Cell {
                    dimension: axis.name.to_string(),
                    code: code.clone(),
                    label: label.to_string(),
                }
            })
            .collect();
        let value = response.value.get(position).copied().flatten().unwrap_or(0.0);
        decoded.push(FlatRow::single(cells, value));
        advance(&mut cursor, &sizes);
    }
    debug!("Decoded {} rows over {} dimensions", decoded.len(), axes.len());
    decoded
}

/// Flatten the cube in the dimension order the response itself declares.
pub fn decode_in_response_order(response: &DimensionedResponse) -> Decoded<FlatRow> {
    decode_in_response_order_with(response, &ResolverRegistry::new())
}

pub fn decode_in_response_order_with(
    response: &DimensionedResponse,
    registry: &ResolverRegistry,
) -> Decoded<FlatRow> {
    if response.id.is_empty() {
        warn!("Response does not declare its dimension order");
        return Decoded::empty_with(IssueKind::MissingDimension, "response has no id list");
    }
    decode_dimensioned_with(response, &response.id, registry)
}

fn advance(cursor: &mut [usize], sizes: &[usize]) {
    for axis in (0..cursor.len()).rev() {
        cursor[axis] += 1;
        if cursor[axis] < sizes[axis] {
            return;
        }
        cursor[axis] = 0;
    }
}
