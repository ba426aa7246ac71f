//! Document queries: equality filters plus one ordered range.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use super::Document;

/// Upper bound marker used for prefix ranges. Sorts after every character
/// that appears in ordinary names.
pub const PREFIX_END: char = '\u{f8ff}';

/// Inclusive `[start, end]` bounds matching every string that begins with
/// `prefix`.
pub fn prefix_bounds(prefix: &str) -> (String, String) {
    let mut end = String::with_capacity(prefix.len() + PREFIX_END.len_utf8());
    end.push_str(prefix);
    end.push(PREFIX_END);
    (prefix.to_owned(), end)
}

/// Equality condition on a top-level field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// A query over one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub collection: String,
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FieldFilter>,
    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(rename = "startAt", skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Value>,
    #[serde(rename = "endAt", skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Value>,
}

impl Query {
    /// Query every document of a collection.
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            collection: path.into(),
            filters: Vec::new(),
            order_by: None,
            start_at: None,
            end_at: None,
        }
    }

    /// Require `field == value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Order ascending by `field`. Documents without the field are excluded.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Inclusive lower bound on the order-by field.
    pub fn start_at(mut self, value: impl Into<Value>) -> Self {
        self.start_at = Some(value.into());
        self
    }

    /// Inclusive upper bound on the order-by field.
    pub fn end_at(mut self, value: impl Into<Value>) -> Self {
        self.end_at = Some(value.into());
        self
    }

    /// Order by `field` and keep values beginning with `prefix`.
    pub fn prefix(self, field: impl Into<String>, prefix: &str) -> Self {
        let (start, end) = prefix_bounds(prefix);
        self.order_by(field).start_at(start).end_at(end)
    }

    /// Check whether a document satisfies the filters and range.
    pub fn matches(&self, doc: &Document) -> bool {
        let equal = self
            .filters
            .iter()
            .all(|f| doc.get(&f.field) == Some(&f.value));
        if !equal {
            return false;
        }

        let Some(field) = &self.order_by else {
            return true;
        };
        let Some(value) = doc.get(field) else {
            return false;
        };

        if let Some(start) = &self.start_at {
            if compare_values(value, start) == Ordering::Less {
                return false;
            }
        }
        if let Some(end) = &self.end_at {
            if compare_values(value, end) == Ordering::Greater {
                return false;
            }
        }
        true
    }

    /// Filter and order documents. Ties keep their input order.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut out: Vec<Document> = docs
            .into_iter()
            .filter(|d| self.matches(d))
            .cloned()
            .collect();

        if let Some(field) = &self.order_by {
            out.sort_by(|a, b| match (a.get(field), b.get(field)) {
                (Some(x), Some(y)) => compare_values(x, y),
                _ => Ordering::Equal,
            });
        }
        out
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: by type first, then by value.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        Document::new(id, fields)
    }

    #[test]
    fn test_prefix_range() {
        let q = Query::collection("Skills").prefix("author_lower", "la");
        assert!(q.matches(&doc("1", json!({"author_lower": "lakshmi"}))));
        assert!(q.matches(&doc("2", json!({"author_lower": "la"}))));
        assert!(!q.matches(&doc("3", json!({"author_lower": "nagalakshmi"}))));
        assert!(!q.matches(&doc("4", json!({"author_lower": "divya"}))));
        assert!(!q.matches(&doc("5", json!({}))));
    }

    #[test]
    fn test_equality_and_order() {
        let docs = vec![
            doc("a", json!({"status": "Teach", "n": 3})),
            doc("b", json!({"status": "Learn", "n": 1})),
            doc("c", json!({"status": "Teach", "n": 1})),
        ];
        let q = Query::collection("x").where_eq("status", "Teach").order_by("n");
        let ids: Vec<_> = q.apply(&docs).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_query_wire_format() {
        let q = Query::collection("Skills").where_eq("status", "Learn");
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(
            v,
            json!({"collection": "Skills", "where": [{"field": "status", "value": "Learn"}]})
        );
    }
}
