//! PX-Web query documents.
//!
//! ```json
//! {"query": [{"code": "Vuosi", "selection": {"filter": "item", "values": ["2021"]}}],
//!  "response": {"format": "json-stat2"}}
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Selection filter that lists the wanted codes explicitly.
pub const ITEM_FILTER: &str = "item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseFormat {
    /// Dimensioned cube, see [`crate::json_stat`].
    #[default]
    #[serde(rename = "json-stat2")]
    JsonStat2,
    /// Keyed rows, see [`crate::keyed`].
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub query: Vec<DimensionQuery>,
    pub response: ResponseSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionQuery {
    pub code: String,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    pub format: ResponseFormat,
}

/// A `json-stat2` query selecting `values` of each dimension, in order.
pub fn build_query<I, C, V, S>(selections: I) -> QueryDocument
where
    I: IntoIterator<Item = (C, V)>,
    C: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    selections
        .into_iter()
        .fold(QueryBuilder::new(), |builder, (code, values)| builder.select(code, values))
        .build()
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Vec<DimensionQuery>,
    format: ResponseFormat,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<C, V, S>(mut self, code: C, values: V) -> Self
    where
        C: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.push(DimensionQuery {
            code: code.into(),
            selection: Selection {
                filter: ITEM_FILTER.to_string(),
                values: values.into_iter().map(Into::into).collect(),
            },
        });
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> QueryDocument {
        QueryDocument {
            query: self.query,
            response: ResponseSpec {
                format: self.format,
            },
        }
    }
}

impl QueryDocument {
    /// The `(code, values)` pairs in query order.
    pub fn selections(&self) -> Vec<(&str, &[String])> {
        self.query
            .iter()
            .map(|q| (q.code.as_str(), q.selection.values.as_slice()))
            .collect()
    }

    pub fn format(&self) -> ResponseFormat {
        self.response.format
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
