use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Value – a single cell of the pipeline table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Dates are kept as text and parsed on
/// demand, so a column only becomes temporal when the classifier says so.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing / unknown.
    #[default]
    Empty,
    /// Finite real number.
    Number(f64),
    Text(String),
}

// -- Manual Eq/Ord so Value can live in BTreeSet / BTreeMap --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Empty => 0,
                Number(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Empty, Empty) => std::cmp::Ordering::Equal,
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Number(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Empty => {}
        }
    }
}

/// Renders the value the way it is written to CSV: `Empty` is blank and
/// integral numbers carry no trailing `.0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl Value {
    /// Type a raw text cell: blank → `Empty`, finite real → `Number`,
    /// anything else is kept verbatim as `Text`.
    pub fn parse_cell(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Number(v),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpret the value as a calendar date (see [`parse_date`]).
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse the date formats seen in pipeline spreadsheets. Datetimes are
/// truncated to their date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// Columns of a freshly initialised dataset.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "Country",
    "Project",
    "Vessel",
    "Pipe Type",
    "Line Type",
    "Pipe OD",
    "Pipe Wall Thickness",
    "Coating Thickness",
    "Steel Density",
    "Coating Density",
    "Clad Thickness",
    "Vessel Name",
    "Water Depth",
    "Estimated Optimal JLT Angle",
    "JLT Angle",
    "Installation Date",
];

/// One named column with one value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Present values, in row order.
    pub fn present(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_empty())
    }

    /// Distinct present values rendered as text, in order of first appearance.
    pub fn distinct_labels(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.present()
            .map(|v| v.to_string())
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }
}

/// A row handed to [`Table::push_row`]: column name → value, in the order
/// new columns should be created.
pub type Row = Vec<(String, Value)>;

/// Ordered, column-oriented table. Every column holds exactly `n_rows` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// An empty table with the given column names.
    pub fn with_columns<S: AsRef<str>>(names: &[S]) -> Self {
        Table {
            columns: names
                .iter()
                .map(|n| Column::new(n.as_ref(), Vec::new()))
                .collect(),
            n_rows: 0,
        }
    }

    /// Empty table with [`DEFAULT_COLUMNS`].
    pub fn default_schema() -> Self {
        Self::with_columns(DEFAULT_COLUMNS)
    }

    /// Build from columns. Short columns are padded with `Empty` so all
    /// columns share the longest length.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for col in &mut columns {
            col.values.resize(n_rows, Value::Empty);
        }
        Table { columns, n_rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// No rows (the column set may still be non-empty).
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn cell(&self, row: usize, column: usize) -> &Value {
        static EMPTY: Value = Value::Empty;
        self.columns
            .get(column)
            .and_then(|c| c.values.get(row))
            .unwrap_or(&EMPTY)
    }

    /// Append one row. Columns named in `row` but absent from the table are
    /// created, with `Empty` for every earlier row. Columns not named in
    /// `row` get `Empty` for the new row.
    pub fn push_row(&mut self, row: Row) {
        let mut values: BTreeMap<String, Value> = BTreeMap::new();
        for (name, value) in row {
            if self.column(&name).is_none() {
                self.columns
                    .push(Column::new(name.clone(), vec![Value::Empty; self.n_rows]));
            }
            values.insert(name, value);
        }
        for col in &mut self.columns {
            col.values
                .push(values.remove(&col.name).unwrap_or_default());
        }
        self.n_rows += 1;
    }

    /// A new table holding the given rows, in the given order, with every column.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices.iter().map(|&i| c.values[i].clone()).collect(),
                )
            })
            .collect();
        Table {
            columns,
            n_rows: indices.len(),
        }
    }

    /// Rewrite every column name with [`normalize_header`] and make the
    /// results unique.
    pub fn normalize_headers(&mut self) {
        let names: Vec<String> = self.columns.iter().map(|c| normalize_header(&c.name)).collect();
        for (col, name) in self.columns.iter_mut().zip(unique_names(names)) {
            col.name = name;
        }
    }
}

/// Collapse embedded line breaks to spaces and trim, so multi-line
/// spreadsheet headers become single-line column names.
pub fn normalize_header(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Suffix repeated names with `.1`, `.2`, … keeping the first occurrence as is.
pub fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut taken: std::collections::HashSet<String> = names.iter().cloned().collect();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            *count = 1;
            out.push(name);
            continue;
        }
        let mut candidate = format!("{name}.{count}");
        while taken.contains(&candidate) {
            *count += 1;
            candidate = format!("{name}.{count}");
        }
        *count += 1;
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_types_values() {
        assert_eq!(Value::parse_cell(""), Value::Empty);
        assert_eq!(Value::parse_cell("   "), Value::Empty);
        assert_eq!(Value::parse_cell("12.5"), Value::Number(12.5));
        assert_eq!(Value::parse_cell(" 7 "), Value::Number(7.0));
        assert_eq!(Value::parse_cell("NaN"), Value::Text("NaN".into()));
        assert_eq!(Value::parse_cell("Brazil"), Value::Text("Brazil".into()));
    }

    #[test]
    fn display_drops_trailing_zero_fraction() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::Empty.to_string(), "");
    }

    #[test]
    fn parses_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 17).unwrap();
        assert_eq!(parse_date("2023-04-17"), Some(expected));
        assert_eq!(parse_date("17/04/2023"), Some(expected));
        assert_eq!(parse_date("2023-04-17 08:30:00"), Some(expected));
        assert_eq!(parse_date("2023-04-17T08:30:00.250"), Some(expected));
        assert_eq!(parse_date("Q2 2023"), None);
    }

    #[test]
    fn header_normalization_collapses_line_breaks() {
        assert_eq!(normalize_header("Pipe\nOD"), "Pipe OD");
        assert_eq!(normalize_header("  Water\r\nDepth \n"), "Water Depth");
        assert_eq!(normalize_header("Country"), "Country");
    }

    #[test]
    fn unique_names_suffixes_duplicates() {
        let names = vec!["A".to_string(), "A".to_string(), "A.1".to_string(), "B".to_string()];
        assert_eq!(unique_names(names), vec!["A", "A.2", "A.1", "B"]);
    }

    #[test]
    fn push_row_creates_missing_columns() {
        let mut table = Table::with_columns(&["Country"]);
        table.push_row(vec![("Country".into(), "A".into())]);
        table.push_row(vec![
            ("Project".into(), "X".into()),
            ("Country".into(), "B".into()),
        ]);

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_names(), vec!["Country", "Project"]);
        let project = table.column("Project").unwrap();
        assert_eq!(project.values, vec![Value::Empty, Value::from("X")]);
    }

    #[test]
    fn distinct_labels_keep_first_appearance_order() {
        let col = Column::new(
            "Vessel",
            vec!["S7000".into(), Value::Empty, "Pioneer".into(), "S7000".into()],
        );
        assert_eq!(col.distinct_labels(), vec!["S7000", "Pioneer"]);
    }
}
