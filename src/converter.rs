//! Schema conversion - rewrites OpenAPI schema objects into JSON Schema Draft-04.

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::ConvertError;
use crate::types::{
    type_alias, ConvertOptions, DEFAULT_INTEGER_FORMAT, DRAFT_04_SCHEMA_URI, STRUCTURES,
    SUPPORTED_TYPES, UNSUPPORTED_ATTRIBUTES,
};

/// Convert a schema with one-off options.
///
/// Shorthand for `Converter::new(options).convert(schema.clone())`.
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedType` if any node declares a type
/// that has no Draft-04 equivalent.
pub fn convert(schema: &Value, options: &ConvertOptions) -> Result<Value, ConvertError> {
    Converter::new(options).convert(schema.clone())
}

/// Converts OpenAPI schema objects into Draft-04 schemas.
///
/// Holds only the attribute lists derived from [`ConvertOptions`], so one
/// converter can be reused for any number of documents.
#[derive(Debug, Clone)]
pub struct Converter {
    /// Properties carrying any of these set to `true` are dropped.
    remove_if_true: Vec<&'static str>,
    /// Attributes stripped from every node.
    unsupported: Vec<&'static str>,
}

impl Converter {
    pub fn new(options: &ConvertOptions) -> Self {
        let mut remove_if_true = Vec::new();
        if options.remove_read_only {
            remove_if_true.push("readOnly");
        }
        if options.remove_write_only {
            remove_if_true.push("writeOnly");
        }

        for kept in &options.keep_unsupported {
            if !UNSUPPORTED_ATTRIBUTES.contains(&kept.as_str()) {
                warn!(attribute = %kept, "keepUnsupported names an attribute that is never stripped");
            }
        }

        let unsupported = UNSUPPORTED_ATTRIBUTES
            .iter()
            .copied()
            .filter(|attr| !options.keep_unsupported.iter().any(|kept| kept == attr))
            .collect();

        Self {
            remove_if_true,
            unsupported,
        }
    }

    /// Attributes this converter strips from every node.
    pub fn unsupported_attributes(&self) -> &[&'static str] {
        &self.unsupported
    }

    /// Convert a schema, returning the Draft-04 document.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::UnsupportedType` on the first node whose type
    /// cannot be expressed in Draft-04. No partial result is returned.
    pub fn convert(&self, mut schema: Value) -> Result<Value, ConvertError> {
        self.convert_in_place(&mut schema)?;
        Ok(schema)
    }

    /// Convert a schema in place.
    ///
    /// Stamps `$schema` on the root, then rewrites every node reachable
    /// through `properties` and the structural keywords. A root that is not
    /// an object is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Converter::convert`]. On error the schema may be partially
    /// rewritten.
    pub fn convert_in_place(&self, schema: &mut Value) -> Result<(), ConvertError> {
        if let Value::Object(map) = schema {
            map.insert(
                "$schema".to_string(),
                Value::String(DRAFT_04_SCHEMA_URI.to_string()),
            );
        }
        self.convert_node(schema, "")
    }

    // --- Internal implementation ---

    fn convert_node(&self, node: &mut Value, path: &str) -> Result<(), ConvertError> {
        let Value::Object(map) = node else {
            return Ok(());
        };
        trace!(path = %fragment(path), "converting schema node");

        self.convert_structures(map, path)?;
        self.convert_properties(map, path)?;
        convert_type(map, path)?;

        for attribute in &self.unsupported {
            map.shift_remove(*attribute);
        }

        Ok(())
    }

    fn convert_structures(
        &self,
        map: &mut Map<String, Value>,
        path: &str,
    ) -> Result<(), ConvertError> {
        for key in STRUCTURES {
            let child_path = format!("{}/{}", path, key);
            match map.get_mut(*key) {
                Some(Value::Array(schemas)) => {
                    for (i, schema) in schemas.iter_mut().enumerate() {
                        self.convert_node(schema, &format!("{}/{}", child_path, i))?;
                    }
                }
                Some(schema @ Value::Object(_)) => self.convert_node(schema, &child_path)?,
                // Booleans (additionalProperties: false) and nulls stay as-is
                _ => {}
            }
        }
        Ok(())
    }

    fn convert_properties(
        &self,
        map: &mut Map<String, Value>,
        path: &str,
    ) -> Result<(), ConvertError> {
        let Some(Value::Object(props)) = map.get_mut("properties") else {
            return Ok(());
        };

        let dropped: Vec<String> = props
            .iter()
            .filter(|(_, prop)| self.should_remove_property(prop))
            .map(|(name, _)| name.clone())
            .collect();
        for name in &dropped {
            debug!(path = %fragment(path), property = %name, "dropping property");
            props.shift_remove(name);
        }

        for (name, prop) in props.iter_mut() {
            let prop_path = format!("{}/properties/{}", path, escape_token(name));
            self.convert_node(prop, &prop_path)?;
        }

        let remaining: Vec<String> = props.keys().cloned().collect();

        let required_emptied = match map.get_mut("required") {
            Some(Value::Array(required)) => {
                required.retain(|name| {
                    name.as_str()
                        .is_some_and(|name| remaining.iter().any(|prop| prop == name))
                });
                required.is_empty()
            }
            _ => false,
        };
        if required_emptied {
            map.shift_remove("required");
        }

        if remaining.is_empty() {
            map.shift_remove("properties");
        }

        Ok(())
    }

    /// True when the property sets a remove-listed attribute to exactly `true`.
    fn should_remove_property(&self, property: &Value) -> bool {
        self.remove_if_true
            .iter()
            .any(|attribute| matches!(property.get(*attribute), Some(Value::Bool(true))))
    }
}

/// Remap the node's `type`/`format` and fold `nullable` into the type.
fn convert_type(map: &mut Map<String, Value>, path: &str) -> Result<(), ConvertError> {
    let type_name = match map.get("type") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(ConvertError::UnsupportedType {
                type_name: other.to_string(),
                path: fragment(path),
            })
        }
    };

    if type_name == "integer" {
        if map.get("format").map_or(true, Value::is_null) {
            map.insert(
                "format".to_string(),
                Value::String(DEFAULT_INTEGER_FORMAT.to_string()),
            );
        }
    } else if let Some((draft_type, format)) = type_alias(&type_name) {
        debug!(path = %fragment(path), from = %type_name, to = draft_type, format = format, "remapping type");
        map.insert("type".to_string(), Value::String(draft_type.to_string()));
        map.insert("format".to_string(), Value::String(format.to_string()));
    } else if !SUPPORTED_TYPES.contains(&type_name.as_str()) {
        return Err(ConvertError::UnsupportedType {
            type_name,
            path: fragment(path),
        });
    }

    let nullable = match map.get("nullable") {
        None | Some(Value::Null) => return Ok(()),
        Some(nullable) => *nullable == Value::Bool(true),
    };

    if nullable {
        if let Some(ty) = map.get_mut("type") {
            let single = ty.take();
            *ty = Value::Array(vec![single, Value::String("null".to_string())]);
        }
        if let Some(Value::Array(values)) = map.get_mut("enum") {
            values.push(Value::String("null".to_string()));
        }
    }
    map.shift_remove("nullable");

    Ok(())
}

/// Render an internal pointer path as a `#`-prefixed fragment.
fn fragment(path: &str) -> String {
    format!("#{}", path)
}

/// Escape a JSON Pointer reference token (RFC 6901).
fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
