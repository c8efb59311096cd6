//! Positional (tabular) SQL responses.
//!
//! Both layouts carry a list of field descriptors and a list of positional
//! rows. They differ only in where the field name lives (`name` vs `alias`),
//! so a single zip routine serves both.

use crate::dialect::{Dialect, TabularShape};
use crate::error::{NormalizeError, Result};
use crate::record::FlatRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column descriptor of an X-Pack response. `type` and friends are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
}

/// Schema descriptor of an Open Distro / AWS response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub alias: String,
}

/// `{ columns: [{name}], rows: [[...]] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnarResult {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

/// `{ schema: [{alias}], datarows: [[...]] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResult {
    pub schema: Vec<SchemaField>,
    #[serde(default)]
    pub datarows: Vec<Vec<Value>>,
}

impl ColumnarResult {
    pub fn into_records(self) -> Result<Vec<FlatRecord>> {
        zip_rows(&self.columns, |c| c.name.as_str(), self.rows)
    }
}

impl SchemaResult {
    pub fn into_records(self) -> Result<Vec<FlatRecord>> {
        zip_rows(&self.schema, |s| s.alias.as_str(), self.datarows)
    }
}

/// Zip every positional row with the field names.
///
/// Row order is preserved. A row whose width differs from the number of
/// descriptors fails the whole call; nothing is truncated or padded.
pub fn zip_rows<D, F>(descriptors: &[D], name_of: F, rows: Vec<Vec<Value>>) -> Result<Vec<FlatRecord>>
where
    F: Fn(&D) -> &str,
{
    let names: Vec<&str> = descriptors.iter().map(&name_of).collect();
    let mut records: Vec<FlatRecord> = Vec::with_capacity(rows.len());

    for (row_idx, row) in rows.into_iter().enumerate() {
        if row.len() != names.len() {
            return Err(NormalizeError::ShapeMismatch {
                row: row_idx,
                expected: names.len(),
                actual: row.len(),
            });
        }

        records.push(names.iter().copied().zip(row).collect());
    }

    Ok(records)
}

/// Map a raw tabular response using the layout of `dialect`.
pub fn normalize_tabular(dialect: Dialect, response: &Value) -> Result<Vec<FlatRecord>> {
    let shape = dialect.shape();
    let names = section(dialect, response, shape.names_section())?;
    // A query matching nothing may omit the rows section entirely.
    let rows = match response.get(shape.rows_section()) {
        Some(Value::Null) | None => Vec::new(),
        Some(rows) => Vec::<Vec<Value>>::deserialize(rows)?,
    };

    match shape {
        TabularShape::Columnar => ColumnarResult {
            columns: Vec::<Column>::deserialize(names)?,
            rows,
        }
        .into_records(),
        TabularShape::Schema => SchemaResult {
            schema: Vec::<SchemaField>::deserialize(names)?,
            datarows: rows,
        }
        .into_records(),
    }
}

fn section<'a>(dialect: Dialect, response: &'a Value, name: &'static str) -> Result<&'a Value> {
    match response.get(name) {
        Some(Value::Null) | None => Err(NormalizeError::MissingSection {
            dialect: dialect.as_str(),
            section: name,
        }),
        Some(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zip_rows_preserves_order() {
        let columns = vec![
            Column { name: "a".into() },
            Column { name: "b".into() },
        ];
        let rows = vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]];
        let records = zip_rows(&columns, |c| c.name.as_str(), rows).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("a"), Some(&json!(1)));
        assert_eq!(records[1].get("b"), Some(&json!(4)));
    }

    #[test]
    fn test_zip_rows_short_row() {
        let schema = vec![
            SchemaField { alias: "x".into() },
            SchemaField { alias: "y".into() },
        ];
        let rows = vec![vec![json!(1), json!(2)], vec![json!(3)]];
        let err = zip_rows(&schema, |s| s.alias.as_str(), rows).unwrap_err();

        assert!(matches!(
            err,
            NormalizeError::ShapeMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_missing_names_section() {
        let response = json!({ "rows": [[1]] });
        let err = normalize_tabular(Dialect::Elasticsearch, &response).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingSection {
                dialect: "elasticsearch",
                section: "columns"
            }
        ));
    }

    #[test]
    fn test_absent_rows_is_empty_result() {
        let response = json!({ "schema": [{ "alias": "x", "type": "long" }] });
        let records = normalize_tabular(Dialect::OpenDistro, &response).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_wrong_section_type_is_json_error() {
        let response = json!({ "columns": "a,b", "rows": [] });
        let err = normalize_tabular(Dialect::Elasticsearch, &response).unwrap_err();
        assert!(matches!(err, NormalizeError::Json(_)));
    }
}
