//! Flattening of nested bucket aggregations into rows.
//!
//! A group-by query answered through the search API comes back as a tree:
//! every grouping dimension is a field holding `buckets`, every bucket holds
//! its `key` plus the next level, and the innermost level holds metric fields
//! with a scalar `value`:
//!
//! ```text
//! { "status": { "buckets": [
//!     { "key": "ok",  "doc_count": 3, "count": { "value": 3 } },
//!     { "key": "err", "doc_count": 1, "count": { "value": 1 } } ] } }
//! ```
//!
//! Flattening yields one row per leaf path, each carrying the metrics of the
//! leaf plus the key of every enclosing bucket under its dimension name:
//! `{count: 3, status: "ok"}`, `{count: 1, status: "err"}`.
//!
//! Rows come out in pre-order, following bucket order at every level.

use crate::error::{NormalizeError, Result};
use crate::record::FlatRecord;
use serde_json::{Map, Value};

/// Bucket metadata, never a metric or a dimension.
const RESERVED_FIELDS: [&str; 2] = ["key", "doc_count"];

const ROOT_PATH: &str = "<root>";

/// What a non-reserved field of a node turned out to be.
enum FieldKind<'a> {
    Metric(&'a Value),
    Group(&'a [Value]),
}

/// Flatten an aggregation tree into rows.
///
/// `root` is the `aggregations` object of a search response (or any
/// sub-tree of it). Values and keys are copied through untouched.
pub fn flatten_aggregations(root: &Value) -> Result<Vec<FlatRecord>> {
    flatten_node(root, "")
}

fn flatten_node(node: &Value, path: &str) -> Result<Vec<FlatRecord>> {
    let object = node
        .as_object()
        .ok_or_else(|| NormalizeError::malformed(display_path(path), "aggregation node is not an object"))?;

    let fields = classify_fields(object, path)?;

    // Bare count: nothing but key/doc_count left.
    if fields.is_empty() {
        return Ok(vec![FlatRecord::new()]);
    }

    let groups: Vec<&str> = fields
        .iter()
        .filter(|(_, kind)| matches!(kind, FieldKind::Group(_)))
        .map(|(name, _)| *name)
        .collect();

    if groups.is_empty() {
        let record: FlatRecord = fields
            .into_iter()
            .filter_map(|(name, kind)| match kind {
                FieldKind::Metric(value) => Some((name, value.clone())),
                FieldKind::Group(_) => None,
            })
            .collect();
        return Ok(vec![record]);
    }

    if let [(dimension, FieldKind::Group(buckets))] = fields.as_slice() {
        return expand_buckets(dimension, buckets, &child_path(path, dimension));
    }

    if groups.len() > 1 {
        return Err(NormalizeError::malformed(
            display_path(path),
            format!("multiple grouping fields at one level: {}", groups.join(", ")),
        ));
    }

    let metrics: Vec<&str> = fields
        .iter()
        .filter(|(_, kind)| matches!(kind, FieldKind::Metric(_)))
        .map(|(name, _)| *name)
        .collect();
    Err(NormalizeError::malformed(
        display_path(path),
        format!(
            "grouping field '{}' mixed with metric fields: {}",
            groups[0],
            metrics.join(", ")
        ),
    ))
}

/// Recurse into every bucket of `dimension`, tagging inner rows with the
/// bucket key.
fn expand_buckets(dimension: &str, buckets: &[Value], path: &str) -> Result<Vec<FlatRecord>> {
    let mut records = Vec::new();

    for (idx, bucket) in buckets.iter().enumerate() {
        let bucket_path = format!("{}.buckets[{}]", path, idx);

        let key = bucket
            .as_object()
            .ok_or_else(|| NormalizeError::malformed(&bucket_path, "bucket is not an object"))?
            .get("key")
            .ok_or_else(|| NormalizeError::malformed(&bucket_path, "bucket has no 'key'"))?;

        for mut inner in flatten_node(bucket, &bucket_path)? {
            // The enclosing dimension wins over a same-named inner field.
            inner.insert(dimension, key.clone());
            records.push(inner);
        }
    }

    Ok(records)
}

fn classify_fields<'a>(object: &'a Map<String, Value>, path: &str) -> Result<Vec<(&'a str, FieldKind<'a>)>> {
    object
        .iter()
        .filter(|(name, _)| !RESERVED_FIELDS.iter().any(|reserved| *reserved == name.as_str()))
        .map(|(name, child)| Ok((name.as_str(), classify(child, &child_path(path, name))?)))
        .collect()
}

fn classify<'a>(child: &'a Value, path: &str) -> Result<FieldKind<'a>> {
    let object = child
        .as_object()
        .ok_or_else(|| NormalizeError::malformed(path, "expected an object with 'value' or 'buckets'"))?;

    if let Some(value) = object.get("value") {
        return Ok(FieldKind::Metric(value));
    }

    match object.get("buckets") {
        Some(Value::Array(buckets)) => Ok(FieldKind::Group(buckets)),
        Some(_) => Err(NormalizeError::malformed(path, "'buckets' is not an array")),
        None => Err(NormalizeError::malformed(
            path,
            "field has neither a metric 'value' nor a 'buckets' sequence",
        )),
    }
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        ROOT_PATH
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn malformed_path(err: NormalizeError) -> String {
        match err {
            NormalizeError::MalformedAggregation { path, .. } => path,
            other => panic!("expected MalformedAggregation, got {:?}", other),
        }
    }

    #[test]
    fn test_metrics_only() {
        let records = flatten_aggregations(&json!({ "count": { "value": 10 } })).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("count"), Some(&json!(10)));
    }

    #[test]
    fn test_empty_node_yields_one_empty_record() {
        let records = flatten_aggregations(&json!({ "key": "x", "doc_count": 4 })).unwrap();
        assert_eq!(records, vec![FlatRecord::new()]);
    }

    #[test]
    fn test_count_only_buckets() {
        let tree = json!({ "host": { "buckets": [
            { "key": "a", "doc_count": 2 },
            { "key": "b", "doc_count": 5 }
        ] } });
        let records = flatten_aggregations(&tree).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[1].get("host"), Some(&json!("b")));
    }

    #[test]
    fn test_null_metric_value_passes_through() {
        let records = flatten_aggregations(&json!({ "max_price": { "value": null } })).unwrap();
        assert_eq!(records[0].get("max_price"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_bucket_list() {
        let records = flatten_aggregations(&json!({ "status": { "buckets": [] } })).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_two_groups_at_root() {
        let tree = json!({
            "a": { "buckets": [] },
            "b": { "buckets": [] }
        });
        let err = flatten_aggregations(&tree).unwrap_err();
        assert!(err.to_string().contains("a, b"));
        assert_eq!(malformed_path(err), "<root>");
    }

    #[test]
    fn test_group_mixed_with_metric() {
        let tree = json!({
            "status": { "buckets": [] },
            "count": { "value": 1 }
        });
        let err = flatten_aggregations(&tree).unwrap_err();
        assert!(err.to_string().contains("'status' mixed with metric fields: count"));
    }

    #[test]
    fn test_metric_without_value_names_field() {
        let tree = json!({ "status": { "buckets": [
            { "key": "ok", "count": { "value": 1 }, "sum": {} }
        ] } });
        let err = flatten_aggregations(&tree).unwrap_err();
        assert_eq!(malformed_path(err), "status.buckets[0].sum");
    }

    #[test]
    fn test_bucket_without_key() {
        let tree = json!({ "status": { "buckets": [ { "doc_count": 1 } ] } });
        let err = flatten_aggregations(&tree).unwrap_err();
        assert_eq!(malformed_path(err), "status.buckets[0]");
    }

    #[test]
    fn test_buckets_not_an_array() {
        let tree = json!({ "status": { "buckets": { "ok": {} } } });
        let err = flatten_aggregations(&tree).unwrap_err();
        assert_eq!(malformed_path(err), "status");
    }

    #[test]
    fn test_inner_field_named_like_dimension_is_overwritten() {
        let tree = json!({ "status": { "buckets": [
            { "key": "outer", "status": { "value": "inner" } }
        ] } });
        let records = flatten_aggregations(&tree).unwrap();
        assert_eq!(records[0].get("status"), Some(&json!("outer")));
    }
}
