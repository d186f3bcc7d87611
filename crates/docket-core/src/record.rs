//! Ordered field-name -> value records.

use crate::schema;

/// An ordered mapping of field names to string values.
///
/// Seeded from a column schema so that every schema field is always
/// present; a field that never matched holds an empty string, never an
/// absent key. Consumers (the sink, QC, row deduplication) rely on that
/// invariant. Cloned wholesale into each batch row so per-document runs
/// never alias state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(String, String)>,
}

impl FieldMap {
    /// Create a map with every schema column present and empty.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            fields: columns
                .iter()
                .map(|c| (c.to_string(), String::new()))
                .collect(),
        }
    }

    /// Build a map from parallel header/value slices, e.g. a CSV row read
    /// back through the sink.
    pub fn from_pairs<N, V>(names: &[N], values: &[V]) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            fields: names
                .iter()
                .zip(values.iter())
                .map(|(n, v)| (n.as_ref().to_string(), v.as_ref().to_string()))
                .collect(),
        }
    }

    /// Value for a field; empty string when the field is unknown.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Set a field value, appending the field if it is not in the schema
    /// this map was seeded from. Appended fields are dropped on emission
    /// unless the output columns name them.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// True if the field exists in this map (even if empty).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Emit values in the given column order; unknown columns yield "".
    pub fn row(&self, columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| self.get(c).to_string()).collect()
    }
}

/// Deduplicate identical rows, keeping the first occurrence in order.
pub fn dedup_rows(rows: Vec<FieldMap>) -> Vec<FieldMap> {
    let mut out: Vec<FieldMap> = Vec::with_capacity(rows.len());
    for row in rows {
        if !out.contains(&row) {
            out.push(row);
        }
    }
    out
}

/// Tag each row with the originating file name for combined outputs.
pub fn tag_source(rows: &mut [FieldMap], source: &str) {
    for row in rows {
        row.set(schema::SOURCE_FILE_COLUMN, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EXPORT_COLUMNS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_schema_field_present_and_empty() {
        let map = FieldMap::new(&EXPORT_COLUMNS);
        for column in EXPORT_COLUMNS {
            assert!(map.contains(column));
            assert_eq!(map.get(column), "");
        }
    }

    #[test]
    fn test_unknown_field_reads_empty() {
        let map = FieldMap::new(&EXPORT_COLUMNS);
        assert_eq!(map.get("No Such Column"), "");
    }

    #[test]
    fn test_row_follows_column_order() {
        let mut map = FieldMap::new(&EXPORT_COLUMNS);
        map.set("Grade", "Supr");
        map.set("Variety", "Almonds Kern");
        let row = map.row(&["Variety", "Grade"]);
        assert_eq!(row, vec!["Almonds Kern".to_string(), "Supr".to_string()]);
    }

    #[test]
    fn test_dedup_rows_keeps_first_occurrence() {
        let mut a = FieldMap::new(&EXPORT_COLUMNS);
        a.set("Batch Number", "F012322001");
        let b = a.clone();
        let mut c = FieldMap::new(&EXPORT_COLUMNS);
        c.set("Batch Number", "F012322002");

        let rows = dedup_rows(vec![a.clone(), b, c.clone()]);
        assert_eq!(rows, vec![a, c]);
    }
}
