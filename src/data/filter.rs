use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::{Column, Table, Value};

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Which kind of filter control a column gets. Recomputed on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnKind {
    Categorical,
    Numeric,
    Temporal,
}

/// Classify every column of the table.
pub fn classify(table: &Table) -> BTreeMap<String, ColumnKind> {
    table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), classify_column(c)))
        .collect()
}

/// * date-like name and every present value parses as a date → `Temporal`
/// * every present value is a number → `Numeric`
/// * anything else, including an all-missing column → `Categorical`
pub fn classify_column(column: &Column) -> ColumnKind {
    let mut present = column.present().peekable();
    if present.peek().is_none() {
        return ColumnKind::Categorical;
    }

    if is_date_like_name(&column.name) {
        match column.present().find(|v| v.as_date().is_none()) {
            None => return ColumnKind::Temporal,
            Some(bad) => log::debug!(
                "Column {:?} has a date-like name but {:?} is not a date; treating as text",
                column.name,
                bad.to_string()
            ),
        }
    }

    if present.all(|v| v.as_f64().is_some()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

fn is_date_like_name(name: &str) -> bool {
    name.to_lowercase().contains("date")
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// A user's restriction on one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Chosen distinct values. Empty means no restriction.
    Values(BTreeSet<String>),
    /// Closed numeric interval.
    NumberRange { low: f64, high: f64 },
    /// Closed date interval.
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl Selection {
    fn kind(&self) -> ColumnKind {
        match self {
            Selection::Values(_) => ColumnKind::Categorical,
            Selection::NumberRange { .. } => ColumnKind::Numeric,
            Selection::DateRange { .. } => ColumnKind::Temporal,
        }
    }
}

/// Per-column selections for one session: column name → selection.
/// A column without an entry is unrestricted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    selections: BTreeMap<String, Selection>,
}

impl FilterState {
    pub fn get(&self, column: &str) -> Option<&Selection> {
        self.selections.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, selection: Selection) {
        self.selections.insert(column.into(), selection);
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Selection)> {
        self.selections.iter()
    }

    /// Bring every selection in line with `table`, e.g. after an upload
    /// replaced it. Selections on missing columns, on columns whose kind
    /// changed, or on columns with nothing to narrow are dropped. The rest
    /// are rewritten to what [`derive_control`] shows for them, so the
    /// applied filter always matches the visible control.
    pub fn retain_valid(&mut self, table: &Table) {
        let kinds = classify(table);
        let previous = std::mem::take(&mut self.selections);
        for (col, sel) in previous {
            let kind = sel.kind();
            if kinds.get(&col) != Some(&kind) {
                log::debug!("Dropping stale selection on column {col:?}");
                continue;
            }
            match derive_control(table, &col, kind, Some(&sel)).selection() {
                Some(clamped) => {
                    if clamped != sel {
                        log::debug!("Clamped selection on column {col:?} to {clamped:?}");
                    }
                    self.selections.insert(col, clamped);
                }
                None => log::debug!("Dropping selection on column {col:?} with no control"),
            }
        }
    }
}

impl FromIterator<(String, Selection)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, Selection)>>(iter: I) -> Self {
        FilterState {
            selections: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Control derivation
// ---------------------------------------------------------------------------

/// What the UI needs to render one column's filter widget.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSpec {
    /// Picker over the distinct values, first-appearance order.
    Categorical {
        options: Vec<String>,
        selected: BTreeSet<String>,
    },
    NumberRange {
        min: f64,
        max: f64,
        low: f64,
        high: f64,
    },
    DateRange {
        min: NaiveDate,
        max: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Nothing to narrow: no present values, or a constant numeric column.
    NoControl,
}

impl ControlSpec {
    /// The selection this control currently shows.
    pub fn selection(&self) -> Option<Selection> {
        match self {
            ControlSpec::Categorical { selected, .. } => Some(Selection::Values(selected.clone())),
            ControlSpec::NumberRange { low, high, .. } => Some(Selection::NumberRange {
                low: *low,
                high: *high,
            }),
            ControlSpec::DateRange { start, end, .. } => Some(Selection::DateRange {
                start: *start,
                end: *end,
            }),
            ControlSpec::NoControl => None,
        }
    }
}

/// Describe the control for `column`, seeded with `prior` (clamped to what
/// the column currently holds) or the unrestricted default.
pub fn derive_control(
    table: &Table,
    column: &str,
    kind: ColumnKind,
    prior: Option<&Selection>,
) -> ControlSpec {
    let Some(col) = table.column(column) else {
        return ControlSpec::NoControl;
    };

    match kind {
        ColumnKind::Categorical => {
            let options = col.distinct_labels();
            if options.is_empty() {
                return ControlSpec::NoControl;
            }
            let selected = match prior {
                Some(Selection::Values(chosen)) => chosen
                    .iter()
                    .filter(|v| options.contains(v))
                    .cloned()
                    .collect(),
                _ => BTreeSet::new(),
            };
            ControlSpec::Categorical { options, selected }
        }
        ColumnKind::Numeric => {
            let Some((min, max)) = number_bounds(col) else {
                return ControlSpec::NoControl;
            };
            if min == max {
                return ControlSpec::NoControl;
            }
            let (low, high) = match prior {
                Some(Selection::NumberRange { low, high }) => {
                    let low = low.clamp(min, max);
                    (low, high.clamp(low, max))
                }
                _ => (min, max),
            };
            ControlSpec::NumberRange { min, max, low, high }
        }
        ColumnKind::Temporal => {
            let Some((min, max)) = date_bounds(col) else {
                return ControlSpec::NoControl;
            };
            let (start, end) = match prior {
                Some(Selection::DateRange { start, end }) => {
                    let start = (*start).clamp(min, max);
                    (start, (*end).clamp(start, max))
                }
                _ => (min, max),
            };
            ControlSpec::DateRange {
                min,
                max,
                start,
                end,
            }
        }
    }
}

fn number_bounds(col: &Column) -> Option<(f64, f64)> {
    col.values
        .iter()
        .filter_map(|v| v.as_f64())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn date_bounds(col: &Column) -> Option<(NaiveDate, NaiveDate)> {
    col.values
        .iter()
        .filter_map(|v| v.as_date())
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Per-column row test compiled from a selection against the current table.
enum Predicate<'a> {
    Values(&'a BTreeSet<String>),
    NumberRange(f64, f64),
    DateRange(NaiveDate, NaiveDate),
}

impl Predicate<'_> {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::Values(chosen) => !value.is_empty() && chosen.contains(&value.to_string()),
            Predicate::NumberRange(low, high) => value
                .as_f64()
                .is_some_and(|v| *low <= v && v <= *high),
            Predicate::DateRange(start, end) => value
                .as_date()
                .is_some_and(|d| *start <= d && d <= *end),
        }
    }
}

/// Compile a selection into a predicate, or `None` when it restricts
/// nothing: an empty value set, or one that covers the column's whole
/// observed domain.
fn compile<'a>(col: &Column, selection: &'a Selection) -> Option<Predicate<'a>> {
    match selection {
        Selection::Values(chosen) => {
            if chosen.is_empty() {
                return None;
            }
            let covers_all = col
                .present()
                .all(|v| chosen.contains(&v.to_string()));
            (!covers_all).then_some(Predicate::Values(chosen))
        }
        Selection::NumberRange { low, high } => {
            let (min, max) = number_bounds(col)?;
            let covers_all = *low <= min && max <= *high;
            (!covers_all).then_some(Predicate::NumberRange(*low, *high))
        }
        Selection::DateRange { start, end } => {
            let (min, max) = date_bounds(col)?;
            let covers_all = *start <= min && max <= *end;
            (!covers_all).then_some(Predicate::DateRange(*start, *end))
        }
    }
}

/// Indices of rows passing every active selection, in table order.
///
/// Selections on columns the table does not have are ignored.
pub fn filtered_indices(table: &Table, selections: &FilterState) -> Vec<usize> {
    let active: Vec<(&Column, Predicate)> = selections
        .iter()
        .filter_map(|(name, sel)| {
            let col = table.column(name)?;
            compile(col, sel).map(|p| (col, p))
        })
        .collect();

    (0..table.n_rows())
        .filter(|&row| active.iter().all(|(col, p)| p.matches(&col.values[row])))
        .collect()
}

/// The rows of `table` passing every active selection, with all columns,
/// in original order.
pub fn apply_selections(table: &Table, selections: &FilterState) -> Table {
    if selections.is_empty() {
        return table.clone();
    }
    table.take_rows(&filtered_indices(table, selections))
}

// ---------------------------------------------------------------------------
// Bulk actions
// ---------------------------------------------------------------------------

/// Select every distinct value of every categorical column. Numeric and
/// temporal columns are left out, i.e. at their full-range default.
pub fn bulk_select_all(table: &Table) -> FilterState {
    table
        .columns()
        .iter()
        .filter(|c| classify_column(c) == ColumnKind::Categorical)
        .filter_map(|c| {
            let values: BTreeSet<String> = c.distinct_labels().into_iter().collect();
            (!values.is_empty()).then(|| (c.name.clone(), Selection::Values(values)))
        })
        .collect()
}

/// No restrictions anywhere.
pub fn bulk_clear(_selections: &FilterState) -> FilterState {
    FilterState::default()
}
