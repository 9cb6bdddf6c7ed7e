/// One named line of a financial statement across period columns.
///
/// `values[i]` belongs to `columns[i]` of the owning table; a `None` marks a
/// period the provider did not report.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialLine {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Financial statements combined into a single row-major table.
///
/// Columns are labeled `N` (most recent), `N-1`, `N-2`, ... Rows keep the
/// order the statements were appended in; income-statement rows come before
/// balance-sheet rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialTable {
    columns: Vec<String>,
    rows: Vec<FinancialLine>,
}

impl FinancialTable {
    pub fn new(period_count: usize) -> Self {
        Self {
            columns: period_labels(period_count),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, name: impl Into<String>, mut values: Vec<Option<f64>>) {
        values.resize(self.columns.len(), None);
        self.rows.push(FinancialLine { name: name.into(), values });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Looks up one cell by row name and period label. A missing row, a
    /// missing column, and a null cell all come back as `None`.
    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        let line = self.rows.iter().find(|l| l.name == row)?;
        line.values.get(col).copied().flatten()
    }

    /// The given column of the last appended row, if any.
    pub fn last_row_value(&self, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.last()?.values.get(col).copied().flatten()
    }
}

/// `["N", "N-1", "N-2", ...]` for `count` periods.
pub fn period_labels(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| if i == 0 { "N".to_string() } else { format!("N-{i}") })
        .collect()
}
