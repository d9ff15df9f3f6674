use chrono::NaiveDateTime;

use super::loader::write_csv;
use super::model::Table;

/// `pipeline_data_filtered_<YYYYMMDD_HHMMSS>.csv`
pub fn export_file_name(now: NaiveDateTime) -> String {
    format!("pipeline_data_filtered_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// CSV bytes of `table`, columns in table order.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::data::filter::{apply_selections, FilterState, Selection};
    use crate::data::model::Column;

    #[test]
    fn file_name_embeds_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 42)
            .unwrap();
        assert_eq!(export_file_name(now), "pipeline_data_filtered_20240309_070542.csv");
    }

    #[test]
    fn exports_filtered_rows_in_column_order() {
        let table = Table::from_columns(vec![
            Column::new("Project", vec!["P1".into(), "P2".into()]),
            Column::new("Country", vec!["A".into(), "B".into()]),
        ]);
        let mut state = FilterState::default();
        state.set("Country", Selection::Values(["B".to_string()].into_iter().collect()));

        let bytes = to_csv_bytes(&apply_selections(&table, &state)).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Project,Country\nP2,B\n");
    }
}
