#![allow(dead_code)]

use fql_engine::{EnumValues, FieldSpec, Schema};

pub fn foo_enum() -> EnumValues {
    EnumValues::new([
        ("FOOENUM_UNKNOWN", 0),
        ("FOOENUM_FIRST", 1),
        ("FOOENUM_SECOND", 2),
    ])
}

/// Schema covering every built-in field kind.
pub fn full_schema() -> Schema {
    Schema::new(vec![
        FieldSpec::identifier("id"),
        FieldSpec::enumeration("enum", foo_enum()),
        FieldSpec::boolean("flag"),
        FieldSpec::timestamp("ts"),
        FieldSpec::text("name"),
    ])
    .expect("valid schema")
}
