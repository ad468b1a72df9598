use serde::Serialize;
use std::fmt;

/// What went wrong with part of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    MissingDimension,
    ValueCountMismatch,
    MissingData,
    RowSkipped,
    MissingTimestamp,
    UnparseableTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeIssue {
    pub kind: IssueKind,
    pub detail: String,
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}

/// Records decoded from one response, together with anything that had to be
/// skipped or defaulted on the way. A result with issues is degraded, not
/// failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub issues: Vec<DecodeIssue>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> Decoded<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            issues: Vec::new(),
        }
    }

    /// An empty result carrying a single issue.
    pub fn empty_with(kind: IssueKind, detail: impl Into<String>) -> Self {
        let mut decoded = Self::new();
        decoded.note(kind, detail);
        decoded
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn note(&mut self, kind: IssueKind, detail: impl Into<String>) {
        self.issues.push(DecodeIssue {
            kind,
            detail: detail.into(),
        });
    }

    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Decoded<U> {
        Decoded {
            records: self.records.into_iter().map(f).collect(),
            issues: self.issues,
        }
    }

    /// Convert every record, turning conversion failures into `RowSkipped`
    /// issues instead of failing the whole result.
    pub fn convert<U, E, F>(self, mut f: F) -> Decoded<U>
    where
        E: fmt::Display,
        F: FnMut(T) -> Result<U, E>,
    {
        let mut out = Decoded {
            records: Vec::with_capacity(self.records.len()),
            issues: self.issues,
        };
        for (n, record) in self.records.into_iter().enumerate() {
            match f(record) {
                Ok(converted) => out.records.push(converted),
                Err(e) => {
                    log::debug!("Skipping record {}: {}", n, e);
                    out.note(IssueKind::RowSkipped, format!("record {}: {}", n, e));
                }
            }
        }
        out
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}
