//! In-memory tables backing the mock server.
//!
//! Rows are plain JSON objects so every resource shares one code path. Ids are
//! auto-incrementing integers, except for tables flagged with string ids,
//! which get 24-hex-digit identifiers like MongoDB object ids.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

pub type Row = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Row>,
    next_id: u64,
    string_ids: bool,
}

impl Table {
    pub fn with_string_ids() -> Self {
        Self {
            string_ids: true,
            ..Self::default()
        }
    }

    /// Store `row` under a fresh id and return that id.
    pub fn insert(&mut self, mut row: Row) -> Value {
        let id = if self.string_ids {
            Value::String(object_id())
        } else {
            self.next_id += 1;
            Value::from(self.next_id)
        };
        row.insert("id".to_string(), id.clone());
        self.rows.push(row);
        id
    }

    pub fn find(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row_id(row).as_deref() == Some(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row_id(row).as_deref() == Some(id))
    }

    pub fn find_by(&self, field: &str, value: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.get(field).and_then(text).as_deref() == Some(value))
    }

    /// Remove every row whose id is in `ids`; returns how many went away.
    pub fn remove_all(&mut self, ids: &[String]) -> usize {
        let before = self.rows.len();
        self.rows
            .retain(|row| !row_id(row).is_some_and(|id| ids.contains(&id)));
        before - self.rows.len()
    }

    /// Rows whose fields equal every `(field, value)` pair, in insertion order.
    pub fn matching<'a>(&'a self, filters: &'a [(String, String)]) -> impl Iterator<Item = &'a Row> {
        self.rows.iter().filter(move |row| {
            filters
                .iter()
                .all(|(field, value)| row.get(field).and_then(text).as_deref() == Some(value.as_str()))
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    tables: HashMap<&'static str, Table>,
    /// Bearer token -> user id.
    pub sessions: HashMap<String, String>,
    /// Role -> granted API ids.
    pub casbin: HashMap<String, Vec<u64>>,
}

impl Store {
    pub fn new(tables: impl IntoIterator<Item = (&'static str, Table)>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The named table, created empty on first use.
    pub fn table(&mut self, name: &'static str) -> &mut Table {
        self.tables.entry(name).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

/// Scalar JSON values rendered the way they appear in a query string.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn row_id(row: &Row) -> Option<String> {
    row.get("id").and_then(text)
}

fn object_id() -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(24);
    hex
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn integer_ids_increment() {
        let mut table = Table::default();
        assert_eq!(table.insert(row(json!({"role": "a"}))), json!(1));
        assert_eq!(table.insert(row(json!({"role": "b"}))), json!(2));
        assert_eq!(table.find("2").unwrap()["role"], "b");
    }

    #[test]
    fn string_ids_look_like_object_ids() {
        let mut table = Table::with_string_ids();
        let id = table.insert(row(json!({"path": "/x"})));
        let id = id.as_str().unwrap();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(table.find(id).is_some());
    }

    #[test]
    fn matching_compares_rendered_values() {
        let mut table = Table::default();
        table.insert(row(json!({"oeType": 1, "name": "HQ"})));
        table.insert(row(json!({"oeType": 2, "name": "Sales"})));
        let filters = vec![("oeType".to_string(), "2".to_string())];
        let names: Vec<&Value> = table.matching(&filters).map(|r| &r["name"]).collect();
        assert_eq!(names, vec![&json!("Sales")]);
    }

    #[test]
    fn remove_all_counts_removed_rows() {
        let mut table = Table::default();
        for _ in 0..4 {
            table.insert(Row::new());
        }
        let removed = table.remove_all(&["1".to_string(), "3".to_string(), "9".to_string()]);
        assert_eq!(removed, 2);
        assert_eq!(table.len(), 2);
    }
}
