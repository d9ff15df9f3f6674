use chrono::NaiveDate;

use super::error::ValidationError;
use super::model::{Row, Value};

/// The "Add New Row" form. Country and project are mandatory; everything
/// else may be left blank / zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineRecord {
    pub country: String,
    pub project: String,
    pub vessel: String,
    pub pipe_type: String,
    pub line_type: String,
    /// mm
    pub pipe_od: f64,
    /// mm
    pub pipe_wall_thickness: f64,
    /// mm
    pub coating_thickness: f64,
    /// kg/m³
    pub steel_density: f64,
    /// kg/m³
    pub coating_density: f64,
    /// mm
    pub clad_thickness: f64,
    pub vessel_name: String,
    /// m
    pub water_depth: f64,
    /// degrees
    pub estimated_optimal_jlt_angle: f64,
    /// degrees
    pub jlt_angle: f64,
    pub installation_date: NaiveDate,
}

impl NewLineRecord {
    pub fn new(installation_date: NaiveDate) -> Self {
        NewLineRecord {
            country: String::new(),
            project: String::new(),
            vessel: String::new(),
            pipe_type: String::new(),
            line_type: String::new(),
            pipe_od: 0.0,
            pipe_wall_thickness: 0.0,
            coating_thickness: 0.0,
            steel_density: 0.0,
            coating_density: 0.0,
            clad_thickness: 0.0,
            vessel_name: String::new(),
            water_depth: 0.0,
            estimated_optimal_jlt_angle: 0.0,
            jlt_angle: 0.0,
            installation_date,
        }
    }

    /// Convert to a table row in default-schema column order.
    ///
    /// Quantities `<= 0` and angles `== 0` are stored as empty, so "unknown"
    /// stays distinct from a measured zero.
    pub fn to_row(&self) -> Result<Row, ValidationError> {
        if self.country.trim().is_empty() {
            return Err(ValidationError::MissingField("Country"));
        }
        if self.project.trim().is_empty() {
            return Err(ValidationError::MissingField("Project"));
        }

        let row = vec![
            ("Country", text(&self.country)),
            ("Project", text(&self.project)),
            ("Vessel", text(&self.vessel)),
            ("Pipe Type", text(&self.pipe_type)),
            ("Line Type", text(&self.line_type)),
            ("Pipe OD", positive(self.pipe_od)),
            ("Pipe Wall Thickness", positive(self.pipe_wall_thickness)),
            ("Coating Thickness", positive(self.coating_thickness)),
            ("Steel Density", positive(self.steel_density)),
            ("Coating Density", positive(self.coating_density)),
            ("Clad Thickness", positive(self.clad_thickness)),
            ("Vessel Name", text(&self.vessel_name)),
            ("Water Depth", positive(self.water_depth)),
            ("Estimated Optimal JLT Angle", nonzero(self.estimated_optimal_jlt_angle)),
            ("JLT Angle", nonzero(self.jlt_angle)),
            (
                "Installation Date",
                Value::Text(self.installation_date.format("%Y-%m-%d").to_string()),
            ),
        ];
        Ok(row
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect())
    }
}

impl Default for NewLineRecord {
    fn default() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

fn text(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        Value::Empty
    } else {
        Value::Text(s.to_string())
    }
}

fn positive(v: f64) -> Value {
    if v > 0.0 && v.is_finite() {
        Value::Number(v)
    } else {
        Value::Empty
    }
}

fn nonzero(v: f64) -> Value {
    if v != 0.0 && v.is_finite() {
        Value::Number(v)
    } else {
        Value::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Table, DEFAULT_COLUMNS};

    fn record() -> NewLineRecord {
        let mut rec = NewLineRecord::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        rec.country = "Brazil".into();
        rec.project = "Mero 2".into();
        rec
    }

    #[test]
    fn blank_mandatory_fields_are_rejected() {
        let mut rec = record();
        rec.project = "   ".into();
        assert_eq!(rec.to_row(), Err(ValidationError::MissingField("Project")));

        rec.country.clear();
        assert_eq!(rec.to_row(), Err(ValidationError::MissingField("Country")));
    }

    #[test]
    fn sentinels_become_empty() {
        let mut rec = record();
        rec.pipe_od = 323.9;
        rec.water_depth = 0.0;
        rec.steel_density = -1.0;
        rec.jlt_angle = -2.5;
        rec.estimated_optimal_jlt_angle = 0.0;

        let row = rec.to_row().unwrap();
        let get = |name: &str| row.iter().find(|(n, _)| n == name).unwrap().1.clone();
        assert_eq!(get("Pipe OD"), Value::Number(323.9));
        assert_eq!(get("Water Depth"), Value::Empty);
        assert_eq!(get("Steel Density"), Value::Empty);
        assert_eq!(get("JLT Angle"), Value::Number(-2.5));
        assert_eq!(get("Estimated Optimal JLT Angle"), Value::Empty);
        assert_eq!(get("Vessel"), Value::Empty);
        assert_eq!(get("Installation Date"), Value::from("2024-05-02"));
    }

    #[test]
    fn non_finite_quantities_become_empty() {
        let mut rec = record();
        rec.pipe_od = f64::INFINITY;
        rec.water_depth = f64::NAN;
        rec.jlt_angle = f64::NEG_INFINITY;

        let row = rec.to_row().unwrap();
        let get = |name: &str| row.iter().find(|(n, _)| n == name).unwrap().1.clone();
        assert_eq!(get("Pipe OD"), Value::Empty);
        assert_eq!(get("Water Depth"), Value::Empty);
        assert_eq!(get("JLT Angle"), Value::Empty);
    }

    #[test]
    fn row_follows_default_schema_order() {
        let row = record().to_row().unwrap();
        let names: Vec<&str> = row.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, DEFAULT_COLUMNS.to_vec());

        let mut table = Table::default();
        table.push_row(row);
        assert_eq!(table.column_names(), DEFAULT_COLUMNS.to_vec());
    }
}
