use serde::Serialize;

/// One dimension of a flat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub dimension: String,
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub name: String,
    pub value: Option<f64>,
}

/// A decoded table row: one cell per dimension plus named measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    pub cells: Vec<Cell>,
    pub measures: Vec<Measure>,
}

impl FlatRow {
    /// A row carrying the single `value` measure of a dimensioned decode.
    pub fn single(cells: Vec<Cell>, value: f64) -> Self {
        Self {
            cells,
            measures: vec![Measure {
                name: crate::json_stat::VALUE_MEASURE.to_string(),
                value: Some(value),
            }],
        }
    }

    pub fn cell(&self, dimension: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.dimension == dimension)
    }

    pub fn code(&self, dimension: &str) -> Option<&str> {
        self.cell(dimension).map(|c| c.code.as_str())
    }

    pub fn label(&self, dimension: &str) -> Option<&str> {
        self.cell(dimension).map(|c| c.label.as_str())
    }

    pub fn measure(&self, name: &str) -> Option<f64> {
        self.measures
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value)
    }

    /// First measure, 0.0 when it is missing.
    pub fn value(&self) -> f64 {
        self.measures.first().and_then(|m| m.value).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> FlatRow {
        FlatRow {
            cells: vec![
                Cell {
                    dimension: "Vuosi".into(),
                    code: "2024".into(),
                    label: "2024".into(),
                },
                Cell {
                    dimension: "Kausi".into(),
                    code: "2".into(),
                    label: "Summer".into(),
                },
            ],
            measures: vec![
                Measure {
                    name: "trips".into(),
                    value: Some(12.5),
                },
                Measure {
                    name: "length".into(),
                    value: None,
                },
            ],
        }
    }

    #[test]
    fn test_accessors() {
        let row = row();
        assert_eq!(row.code("Kausi"), Some("2"));
        assert_eq!(row.label("Kausi"), Some("Summer"));
        assert_eq!(row.code("Ikäryhmä"), None);
        assert_eq!(row.measure("trips"), Some(12.5));
        assert_eq!(row.measure("length"), None);
        assert_eq!(row.value(), 12.5);
    }
}
