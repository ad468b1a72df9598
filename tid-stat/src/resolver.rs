//! Code-to-label resolvers.
//!
//! Every PX-Web dimension family (trip purposes, seasons, age groups, ...)
//! gets one [`CodeResolver`]. The built-in tables are declared in a single
//! embedded CSV of `dimension,code,label` rows and grouped into a
//! [`ResolverRegistry`] keyed by dimension code.

use crate::dimensions;
use crate::error::{Result, StatError};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded code table for all built-in dimension families.
pub static CODE_LABELS_CSV: &str = include_str!("../../fixtures/code_labels.csv");

/// Families that answer unknown codes with a fixed label.
const DEFAULT_LABELS: &[(&str, &str)] = &[
    (dimensions::AGE_GROUP, "Unknown age group"),
    (dimensions::GENDER, "Unknown gender"),
];

/// What to do with a code the table does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownCodePolicy {
    /// Use the code itself as the label.
    Passthrough,
    Default(String),
    /// Fail with [`StatError::UnknownCode`].
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeResolver {
    family: String,
    labels: HashMap<String, String>,
    order: Vec<String>,
    policy: UnknownCodePolicy,
}

impl CodeResolver {
    pub fn new(family: impl Into<String>, policy: UnknownCodePolicy) -> Self {
        Self {
            family: family.into(),
            labels: HashMap::new(),
            order: Vec::new(),
            policy,
        }
    }

    pub fn from_pairs<I, C, L>(family: impl Into<String>, pairs: I, policy: UnknownCodePolicy) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut resolver = Self::new(family, policy);
        for (code, label) in pairs {
            resolver.insert(code, label);
        }
        resolver
    }

    fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        let code = code.into();
        if !self.labels.contains_key(&code) {
            self.order.push(code.clone());
        }
        self.labels.insert(code, label.into());
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn policy(&self) -> &UnknownCodePolicy {
        &self.policy
    }

    /// The table entry for `code`, ignoring the policy.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn resolve(&self, code: &str) -> Result<String> {
        if let Some(label) = self.lookup(code) {
            return Ok(label.to_string());
        }
        match &self.policy {
            UnknownCodePolicy::Passthrough => Ok(code.to_string()),
            UnknownCodePolicy::Default(label) => Ok(label.clone()),
            UnknownCodePolicy::Strict => Err(StatError::UnknownCode {
                family: self.family.clone(),
                code: code.to_string(),
            }),
        }
    }

    /// Like [`resolve`](Self::resolve) but never fails; strict resolvers
    /// fall back to the code.
    pub fn label_or_code(&self, code: &str) -> String {
        self.resolve(code).unwrap_or_else(|_| code.to_string())
    }

    /// Reverse lookup, case-insensitive on the label.
    pub fn code_for_label(&self, label: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|code| {
                self.labels
                    .get(code.as_str())
                    .is_some_and(|l| crate::filter::eq_ignore_case(l, label))
            })
            .map(String::as_str)
    }

    /// Codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CodeLabelRecord {
    dimension: String,
    code: String,
    label: String,
}

/// Resolvers keyed by PX-Web dimension code.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, CodeResolver>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry built from [`CODE_LABELS_CSV`].
    pub fn builtin() -> &'static ResolverRegistry {
        static BUILTIN: OnceLock<ResolverRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            ResolverRegistry::parse_table(CODE_LABELS_CSV).expect("failed to parse code_labels.csv")
        })
    }

    /// Parse a `dimension,code,label` table. Families listed in
    /// `DEFAULT_LABELS` get their default label; all others pass through.
    pub fn parse_table(csv_data: &str) -> Result<Self> {
        let mut registry = Self::new();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        for result in rdr.deserialize() {
            let record: CodeLabelRecord = result?;
            registry
                .resolvers
                .entry(record.dimension.clone())
                .or_insert_with(|| CodeResolver::new(&record.dimension, policy_for(&record.dimension)))
                .insert(record.code, record.label);
        }
        log::debug!("Loaded {} code families", registry.resolvers.len());
        Ok(registry)
    }

    pub fn insert(&mut self, resolver: CodeResolver) {
        self.resolvers.insert(resolver.family.clone(), resolver);
    }

    pub fn get(&self, dimension: &str) -> Option<&CodeResolver> {
        self.resolvers.get(dimension)
    }

    /// Resolve through the dimension's resolver; codes of unregistered
    /// dimensions pass through.
    pub fn resolve(&self, dimension: &str, code: &str) -> Result<String> {
        match self.get(dimension) {
            Some(resolver) => resolver.resolve(code),
            None => Ok(code.to_string()),
        }
    }

    pub fn label_or_code(&self, dimension: &str, code: &str) -> String {
        self.get(dimension)
            .map(|r| r.label_or_code(code))
            .unwrap_or_else(|| code.to_string())
    }
}

fn policy_for(dimension: &str) -> UnknownCodePolicy {
    DEFAULT_LABELS
        .iter()
        .find(|(family, _)| *family == dimension)
        .map(|(_, label)| UnknownCodePolicy::Default(label.to_string()))
        .unwrap_or(UnknownCodePolicy::Passthrough)
}
