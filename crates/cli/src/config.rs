use crate::error::CliError;
use fql_engine::{
    BooleanKind, EnumValues, EnumerationKind, FieldSpec, IdentifierKind, Schema, TextKind,
    TimestampKind,
};
use fql_model::{Record, Value};
use fql_syntax::{Operator, OperatorSet};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Schema declaration as read from a JSON file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    #[serde(default)]
    pub unknown_suffix: Option<String>,
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindConfig {
    Identifier,
    Enumeration,
    Boolean,
    Timestamp,
    Text,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    pub kind: KindConfig,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub values: BTreeMap<String, i32>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub operators: Option<Vec<Operator>>,
}

/// A schema together with the configured kind of each field, used to type the
/// values of JSON records.
#[derive(Debug)]
pub struct LoadedSchema {
    schema: Schema,
    kinds: HashMap<String, KindConfig>,
}

impl SchemaConfig {
    pub fn build(self) -> Result<LoadedSchema, CliError> {
        let unknown_suffix = self.unknown_suffix;
        let mut kinds = HashMap::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            kinds.insert(field.name.clone(), field.kind);
            fields.push(field.build(unknown_suffix.as_deref())?);
        }

        let schema = Schema::new(fields)?;
        debug!("Built schema with {} field(s)", schema.fields().len());
        Ok(LoadedSchema { schema, kinds })
    }
}

impl KindConfig {
    /// Types a JSON value for a field of this kind. On mismatch, returns what
    /// the kind expects.
    fn convert(self, json: &serde_json::Value) -> Result<Value, String> {
        use serde_json::Value as Json;

        match (self, json) {
            (_, Json::Null) => Ok(Value::Null),
            (KindConfig::Identifier, Json::Number(n)) => {
                n.as_i64().map(Value::Int).ok_or_else(|| "an integer".to_string())
            }
            (KindConfig::Enumeration, Json::Number(n)) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| "a name or integer code".to_string()),
            (KindConfig::Enumeration | KindConfig::Text, Json::String(s)) => {
                Ok(Value::String(s.clone()))
            }
            (KindConfig::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
            (KindConfig::Timestamp, Json::String(s)) => {
                TimestampKind::parse(s).map(Value::Timestamp)
            }
            (KindConfig::Identifier, _) => Err("an integer".to_string()),
            (KindConfig::Enumeration, _) => Err("a name or integer code".to_string()),
            (KindConfig::Boolean, _) => Err("a boolean".to_string()),
            (KindConfig::Timestamp, _) => Err("an RFC 3339 string".to_string()),
            (KindConfig::Text, _) => Err("a string".to_string()),
        }
    }
}

impl FieldConfig {
    fn build(self, unknown_suffix: Option<&str>) -> Result<FieldSpec, CliError> {
        if self.kind != KindConfig::Enumeration && !self.values.is_empty() {
            return Err(CliError::InvalidConfig(format!(
                "field {} declares enumeration values but is not an enumeration",
                self.name
            )));
        }

        let mut spec = match self.kind {
            KindConfig::Identifier => FieldSpec::new(&self.name, IdentifierKind),
            KindConfig::Boolean => FieldSpec::new(&self.name, BooleanKind),
            KindConfig::Timestamp => FieldSpec::new(&self.name, TimestampKind),
            KindConfig::Text => FieldSpec::new(&self.name, TextKind),
            KindConfig::Enumeration => {
                if self.values.is_empty() {
                    return Err(CliError::InvalidConfig(format!(
                        "enumeration field {} declares no values",
                        self.name
                    )));
                }
                let mut kind = EnumerationKind::new(EnumValues::new(self.values));
                if let Some(suffix) = unknown_suffix {
                    kind = kind.with_unknown_suffix(suffix);
                }
                FieldSpec::new(&self.name, kind)
            }
        };

        if self.required {
            spec = spec.required();
        }
        if let Some(column) = &self.column {
            spec = spec.with_column(column);
        }
        if let Some(operators) = self.operators {
            spec = spec.with_operators(operators.into_iter().collect::<OperatorSet>());
        }

        Ok(spec)
    }
}

impl LoadedSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Converts a JSON object into a record, typing each value by its field's
    /// configured kind.
    ///
    /// Keys that the schema does not declare are left out of the record.
    fn to_record(
        &self,
        index: usize,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Record, CliError> {
        let mut record = Record::new();

        for (key, json) in object {
            let Some(kind) = self.kinds.get(key) else {
                debug!("Ignoring undeclared field {} of record {}", key, index);
                continue;
            };

            let value = kind.convert(json).map_err(|expected| CliError::InvalidRecord {
                index,
                reason: format!("field {key} expects {expected}, got {json}"),
            })?;
            record.insert(key, value);
        }

        Ok(record)
    }

    /// Keeps the JSON objects, unchanged, whose converted records match `query`.
    pub fn select(
        &self,
        query: &str,
        objects: Vec<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, CliError> {
        let query = self.schema.bind(query)?;

        let mut matched = Vec::new();
        for (index, object) in objects.into_iter().enumerate() {
            let record = self.to_record(index, &object)?;
            if query.matches(&record)? {
                matched.push(object);
            }
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fql_engine::ErrorKind;

    const SCHEMA: &str = r#"{
        "unknown_suffix": "_UNSPECIFIED",
        "fields": [
            { "name": "id", "kind": "identifier", "required": true },
            { "name": "status", "kind": "enumeration", "values": { "ACTIVE": 1, "DELETED": 2 } },
            { "name": "created-at", "kind": "timestamp", "column": "created_at" },
            { "name": "name", "kind": "text", "operators": ["=", ":"] },
            { "name": "enabled", "kind": "boolean" }
        ]
    }"#;

    fn loaded() -> LoadedSchema {
        serde_json::from_str::<SchemaConfig>(SCHEMA)
            .unwrap()
            .build()
            .unwrap()
    }

    fn object(json: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        let serde_json::Value::Object(object) = json else {
            panic!("not an object: {json}")
        };
        object
    }

    #[test]
    fn test_builds_schema() {
        let loaded = loaded();
        let schema = loaded.schema();
        assert_eq!(schema.fields().len(), 5);
        assert!(schema.field("id").unwrap().is_required());
        assert_eq!(schema.field("created-at").unwrap().sql_identifier(), "created_at");
        assert_eq!(
            schema.field("name").unwrap().operators(),
            OperatorSet::EQUAL | OperatorSet::CONTAINS
        );
    }

    #[test]
    fn test_configured_suffix() {
        let loaded = loaded();
        let schema = loaded.schema();
        let err = schema.bind("id=1 status=STATUS_UNSPECIFIED").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueDecode);

        let condition = schema
            .bind("id=1 status=DELETED created-at:*")
            .unwrap()
            .to_sql_condition()
            .unwrap();
        assert_eq!(
            condition.sql(),
            "(id = ?) AND (status = ?) AND (created_at IS NOT NULL)"
        );
    }

    #[test]
    fn test_narrowed_operators() {
        let err = loaded().schema().bind("id=1 name!=bob").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperatorNotAllowed);
    }

    #[test]
    fn test_rejects_bad_configs() {
        let config: SchemaConfig = serde_json::from_str(
            r#"{ "fields": [{ "name": "status", "kind": "enumeration" }] }"#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(CliError::InvalidConfig(_))));

        let config: SchemaConfig = serde_json::from_str(
            r#"{ "fields": [{ "name": "id", "kind": "identifier", "operators": [":"] }] }"#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(CliError::Schema(_))));

        assert!(serde_json::from_str::<SchemaConfig>(r#"{ "fields": [{ "name": "x", "kind": "float" }] }"#).is_err());
    }

    #[test]
    fn test_converts_records() {
        let loaded = loaded();
        let object = object(serde_json::json!({
            "id": 7,
            "status": 2,
            "created-at": "2019-03-02T14:15:16Z",
            "name": "alice",
            "enabled": null,
            "extra": [1, 2]
        }));

        let record = loaded.to_record(0, &object).unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int(7)));
        assert_eq!(record.get("enabled"), None);
        assert_eq!(record.get("extra"), None);

        let schema = loaded.schema();
        assert!(
            schema
                .bind("id=7 status=DELETED name:lic")
                .unwrap()
                .matches(&record)
                .unwrap()
        );
        assert!(
            schema
                .bind(r#"id=7 created-at>"2019-03-02""#)
                .unwrap()
                .matches(&record)
                .unwrap()
        );
    }

    #[test]
    fn test_rejects_mistyped_record_values() {
        let loaded = loaded();

        let err = loaded
            .to_record(3, &object(serde_json::json!({ "id": "seven" })))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidRecord { index: 3, .. }));
        assert!(err.to_string().contains("field id expects an integer"));

        let err = loaded
            .to_record(0, &object(serde_json::json!({ "enabled": "yes" })))
            .unwrap_err();
        assert!(err.to_string().contains("field enabled expects a boolean"));

        let err = loaded
            .to_record(0, &object(serde_json::json!({ "created-at": "2019-03-02 14:15:16Z" })))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_select_returns_original_objects() {
        let loaded = loaded();
        let objects = vec![
            object(serde_json::json!({
                "id": 1,
                "created-at": "2019-03-02T16:15:16+02:00",
                "note": "kept as written"
            })),
            object(serde_json::json!({ "id": 2, "created-at": "2019-03-01" })),
        ];

        let matched = loaded
            .select(r#"id=1 created-at>"2019-03-02""#, objects.clone())
            .unwrap();
        assert_eq!(matched, vec![objects[0].clone()]);
        assert_eq!(
            matched[0].get("created-at"),
            Some(&serde_json::json!("2019-03-02T16:15:16+02:00"))
        );
        assert_eq!(matched[0].get("note"), Some(&serde_json::json!("kept as written")));
    }

    #[test]
    fn test_conversion_follows_configured_kind() {
        assert_eq!(
            KindConfig::Enumeration.convert(&serde_json::json!(2)),
            Ok(Value::Int(2))
        );
        assert_eq!(
            KindConfig::Text.convert(&serde_json::json!("2")),
            Ok(Value::from("2"))
        );
        assert!(KindConfig::Text.convert(&serde_json::json!(2)).is_err());
        assert_eq!(
            KindConfig::Timestamp.convert(&serde_json::Value::Null),
            Ok(Value::Null)
        );
    }
}
