use crate::error::{Result, SearchError};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;

/// Property name → any value
pub type Record = Map<String, Value>;

/// Named records whose numeric properties get scanned.
///
/// Built from either a mapping of records (keyed by name) or an array of
/// records (keyed by index). Records keep their source order; JSON objects
/// are read with sorted keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<(String, Record)>,
}

impl Dataset {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// The top-level TOML table is the mapping of records
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Self::from_value(toml::from_str(raw)?)
    }

    /// Load by extension: `.toml` is TOML, anything else JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    /// Records that are not objects are skipped with a warning
    pub fn from_value(value: Value) -> Result<Self> {
        let entries: Vec<(String, Value)> = match value {
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            other => {
                return Err(SearchError::Dataset(format!(
                    "expected a mapping or an array of records, got {}",
                    kind(&other)
                )))
            }
        };

        let records = entries
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Object(record) => Some((name, record)),
                other => {
                    log::warn!("Skipping record {name}: expected an object, got {}", kind(&other));
                    None
                }
            })
            .collect();

        Ok(Self { records })
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of the property names of every record, sorted
    #[must_use]
    pub fn property_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .records
            .iter()
            .flat_map(|(_, record)| record.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    /// Numeric value of `property` in the record at `index`
    #[must_use]
    pub fn number(&self, index: usize, property: &str) -> Option<f64> {
        self.records
            .get(index)
            .and_then(|(_, record)| record.get(property))
            .and_then(Value::as_f64)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyed_records_are_named_by_key() {
        let dataset = Dataset::from_json_str(r#"{"B": {"mass": 2}, "A": {"mass": 1}}"#).unwrap();
        let names: Vec<&str> = dataset.records().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(dataset.number(0, "mass"), Some(1.0));
    }

    #[test]
    fn listed_records_are_named_by_index() {
        let dataset = Dataset::from_json_str(r#"[{"x": 1.5}, {"x": "n/a"}, {"y": 3}]"#).unwrap();
        let names: Vec<&str> = dataset.records().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["0", "1", "2"]);
        assert_eq!(dataset.number(0, "x"), Some(1.5));
        assert_eq!(dataset.number(1, "x"), None);
        assert_eq!(dataset.number(2, "x"), None);
        assert_eq!(dataset.property_names(), vec!["x", "y"]);
    }

    #[test]
    fn toml_tables_are_records() {
        let dataset = Dataset::from_toml_str(
            r#"
                [earth]
                radius = 6371.0

                [moon]
                radius = 1737.4
                name = "Moon"
            "#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.number(1, "radius"), Some(1737.4));
        assert_eq!(dataset.property_names(), vec!["name", "radius"]);
    }

    #[test]
    fn scalar_records_are_skipped() {
        let dataset = Dataset::from_json_str(r#"{"A": {"x": 1}, "B": 4}"#).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn scalar_datasets_are_rejected() {
        let err = Dataset::from_json_str("42").unwrap_err();
        assert!(matches!(err, SearchError::Dataset(_)));
    }

    #[test]
    fn files_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("planets.json");
        std::fs::write(&json, r#"{"earth": {"radius": 6371}}"#).unwrap();
        assert_eq!(Dataset::from_path(&json).unwrap().len(), 1);

        let toml = dir.path().join("planets.TOML");
        std::fs::write(&toml, "[earth]\nradius = 6371\n").unwrap();
        assert_eq!(Dataset::from_path(&toml).unwrap().number(0, "radius"), Some(6371.0));

        let missing = Dataset::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, SearchError::Io { .. }));
    }
}
