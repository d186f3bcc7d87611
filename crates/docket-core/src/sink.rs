//! Tabular sink: CSV persistence with a stable column order.

use std::path::Path;

use crate::error::SinkError;
use crate::record::FieldMap;

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;

/// Write rows to a CSV file in the given column order. A field a row
/// does not carry is written as an empty cell; extra fields on a row
/// are dropped unless the columns name them.
pub fn write_csv(path: &Path, rows: &[FieldMap], columns: &[&str]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row.row(columns))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a CSV file back into field maps, one per row, keyed by the
/// header line. Inverse of [`write_csv`] for every declared column.
pub fn read_csv(path: &Path) -> Result<Vec<FieldMap>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: Vec<&str> = record.iter().collect();
        rows.push(FieldMap::from_pairs(&headers, &values));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EXPORT_COLUMNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_preserves_every_column() {
        let mut row = FieldMap::new(&EXPORT_COLUMNS);
        row.set("Delivery Number", "801234");
        row.set("Variety", "Almonds Kern");
        row.set("Grade", "Supr");
        row.set("Size", "23/25");
        row.set("Packaging", "50lb ctn");
        row.set("SSCC Qty", "12.000 PAL");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[row.clone()], &EXPORT_COLUMNS).unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 1);
        for column in EXPORT_COLUMNS {
            assert_eq!(rows[0].get(column), row.get(column), "column {column}");
        }
    }

    #[test]
    fn test_extra_column_appended() {
        let mut row = FieldMap::new(&EXPORT_COLUMNS);
        row.set("Delivery Number", "801234");
        row.set("Source_File", "a.pdf");

        let mut columns: Vec<&str> = EXPORT_COLUMNS.to_vec();
        columns.push("Source_File");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.csv");
        write_csv(&path, &[row], &columns).unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows[0].get("Source_File"), "a.pdf");
    }
}
