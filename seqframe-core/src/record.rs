//! Rows that expose named fields

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::source::Element;

/// A row whose fields can be looked up by column name
pub trait Record {
    /// Type of a single field
    type Value: Element;

    /// Names of the fields present in this row, in row order
    fn field_names(&self) -> Vec<String>;

    /// The field called `name`, if present
    fn field(&self, name: &str) -> Option<Self::Value>;
}

impl Record for Map<String, Value> {
    type Value = Value;

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Only JSON objects have fields; any other JSON value is a row with none.
impl Record for Value {
    type Value = Value;

    fn field_names(&self) -> Vec<String> {
        self.as_object().map(Record::field_names).unwrap_or_default()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<V: Element> Record for BTreeMap<String, V> {
    type Value = V;

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn field(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

/// Column names in order of first appearance across `rows`
pub(crate) fn infer_column_names<'a, R, It>(rows: It) -> Vec<String>
where
    R: Record + 'a,
    It: IntoIterator<Item = &'a R>,
{
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for name in row.field_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_object_fields() {
        let row = json!({"a": 1, "b": "x"});
        assert_eq!(row.field("b"), Some(json!("x")));
        assert_eq!(row.field("missing"), None);
        assert_eq!(json!(5).field_names(), Vec::<String>::new());
    }

    #[test]
    fn column_names_follow_first_appearance() {
        let rows = vec![json!({"a": 1}), json!({"a": 2, "c": 3}), json!({"b": 4})];
        assert_eq!(infer_column_names(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn btree_rows() {
        let row: BTreeMap<String, i32> = [("x".to_string(), 1)].into_iter().collect();
        assert_eq!(row.field_names(), vec!["x"]);
        assert_eq!(row.field("x"), Some(1));
    }
}
