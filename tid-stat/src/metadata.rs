//! PX-Web table metadata, served by `GET <table-url>`.

use crate::error::Result;
use crate::resolver::{CodeResolver, UnknownCodePolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub code: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub value_texts: Vec<String>,
    #[serde(default)]
    pub elimination: bool,
    #[serde(default)]
    pub time: bool,
}

impl Variable {
    /// `(code, text)` pairs in served order.
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .zip(&self.value_texts)
            .map(|(code, text)| (code.as_str(), text.as_str()))
            .collect()
    }

    /// Exact-match lookup of the code behind a display text.
    pub fn code_for_label(&self, label: &str) -> Option<&str> {
        self.options()
            .into_iter()
            .find(|(_, text)| *text == label)
            .map(|(code, _)| code)
    }
}

impl TableMetadata {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn variable(&self, code: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.code == code)
    }

    pub fn options(&self, code: &str) -> Option<Vec<(&str, &str)>> {
        self.variable(code).map(Variable::options)
    }

    /// Codes of the given display texts in the order given; unknown texts
    /// are dropped.
    pub fn codes_for_labels<S: AsRef<str>>(&self, code: &str, labels: &[S]) -> Vec<String> {
        let Some(variable) = self.variable(code) else {
            return Vec::new();
        };
        labels
            .iter()
            .filter_map(|label| variable.code_for_label(label.as_ref()))
            .map(str::to_string)
            .collect()
    }

    /// A passthrough resolver over one variable's value texts.
    pub fn resolver_for(&self, code: &str) -> Option<CodeResolver> {
        self.variable(code).map(|v| {
            CodeResolver::from_pairs(v.code.as_str(), v.options(), UnknownCodePolicy::Passthrough)
        })
    }
}
