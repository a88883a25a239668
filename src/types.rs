//! Core types and keyword tables for OpenAPI to Draft-04 conversion.

use serde::Deserialize;
use serde_json::Value;

/// `$schema` URI stamped on the root of every converted document.
pub const DRAFT_04_SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";

/// Keywords whose value is one schema or a list of schemas.
pub const STRUCTURES: &[&str] = &[
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "items",
    "additionalProperties",
];

/// Primitive types understood by Draft-04.
pub const SUPPORTED_TYPES: &[&str] = &["integer", "number", "string", "boolean", "object", "array"];

/// OpenAPI-only keywords stripped from every node unless kept via options.
pub const UNSUPPORTED_ATTRIBUTES: &[&str] = &[
    "deprecated",
    "discriminator",
    "example",
    "externalDocs",
    "nullable",
    "readOnly",
    "writeOnly",
    "xml",
];

/// OpenAPI type aliases as `(alias, draft-04 type, format)`.
///
/// The format always overwrites whatever the node declared. Plain `integer`
/// is not listed: it only gains `int32` when no format is present.
pub const TYPE_ALIASES: &[(&str, &str, &str)] = &[
    ("long", "integer", "int64"),
    ("float", "number", "float"),
    ("double", "number", "double"),
    ("byte", "string", "byte"),
    ("binary", "string", "binary"),
    ("date", "string", "date"),
    ("dateTime", "string", "date-time"),
    ("password", "string", "password"),
];

/// Format given to `integer` nodes that do not declare one.
pub const DEFAULT_INTEGER_FORMAT: &str = "int32";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up the Draft-04 type and format for an OpenAPI type alias.
pub fn type_alias(name: &str) -> Option<(&'static str, &'static str)> {
    TYPE_ALIASES
        .iter()
        .find(|(alias, _, _)| *alias == name)
        .map(|&(_, draft_type, format)| (draft_type, format))
}

/// Options controlling conversion.
///
/// Deserializes from the camelCase names used in options files:
///
/// ```json
/// { "removeReadOnly": true, "keepUnsupported": ["example"] }
/// ```
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Drop properties whose schema has `readOnly: true`.
    pub remove_read_only: bool,
    /// Drop properties whose schema has `writeOnly: true`.
    pub remove_write_only: bool,
    /// Unsupported attributes to leave in place.
    pub keep_unsupported: Vec<String>,
}

impl ConvertOptions {
    /// Options with every flag off and nothing kept.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether `readOnly: true` properties are dropped.
    pub fn remove_read_only(mut self, remove: bool) -> Self {
        self.remove_read_only = remove;
        self
    }

    /// Set whether `writeOnly: true` properties are dropped.
    pub fn remove_write_only(mut self, remove: bool) -> Self {
        self.remove_write_only = remove;
        self
    }

    /// Add attributes that should survive stripping.
    pub fn keep_unsupported<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_unsupported
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Fold another set of options into this one.
    ///
    /// Flags are OR-ed and kept attributes are appended, skipping duplicates.
    pub fn merge(mut self, other: ConvertOptions) -> Self {
        self.remove_read_only |= other.remove_read_only;
        self.remove_write_only |= other.remove_write_only;
        for attribute in other.keep_unsupported {
            if !self.keep_unsupported.contains(&attribute) {
                self.keep_unsupported.push(attribute);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_alias_lookup() {
        assert_eq!(type_alias("long"), Some(("integer", "int64")));
        assert_eq!(type_alias("dateTime"), Some(("string", "date-time")));
        assert_eq!(type_alias("integer"), None);
        assert_eq!(type_alias("datetime"), None);
    }

    #[test]
    fn aliases_map_to_supported_types() {
        for (alias, draft_type, _) in TYPE_ALIASES {
            assert!(
                SUPPORTED_TYPES.contains(draft_type),
                "{alias} maps to unsupported {draft_type}"
            );
        }
    }

    #[test]
    fn options_deserialize_camel_case() {
        let opts: ConvertOptions = serde_json::from_value(json!({
            "removeReadOnly": true,
            "keepUnsupported": ["example", "xml"],
            "somethingElse": 1
        }))
        .unwrap();

        assert!(opts.remove_read_only);
        assert!(!opts.remove_write_only);
        assert_eq!(opts.keep_unsupported, vec!["example", "xml"]);
    }

    #[test]
    fn options_deserialize_empty_is_default() {
        let opts: ConvertOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, ConvertOptions::default());
    }

    #[test]
    fn options_builder() {
        let opts = ConvertOptions::new()
            .remove_write_only(true)
            .keep_unsupported(["example"]);

        assert!(!opts.remove_read_only);
        assert!(opts.remove_write_only);
        assert_eq!(opts.keep_unsupported, vec!["example"]);
    }

    #[test]
    fn options_merge() {
        let base = ConvertOptions::new()
            .remove_read_only(true)
            .keep_unsupported(["example"]);
        let flags = ConvertOptions::new()
            .remove_write_only(true)
            .keep_unsupported(["example", "deprecated"]);

        let merged = base.merge(flags);
        assert!(merged.remove_read_only);
        assert!(merged.remove_write_only);
        assert_eq!(merged.keep_unsupported, vec!["example", "deprecated"]);
    }
}
