//! OpenAPI to JSON Schema Draft-04
//!
//! Converts OpenAPI 3 "Schema Object" documents into strict JSON Schema
//! Draft-04 documents.
//!
//! # Example
//!
//! ```
//! use openapi_draft4::{Converter, ConvertOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["id", "password"],
//!     "properties": {
//!         "id": { "type": "long", "readOnly": true },
//!         "name": { "type": "string", "nullable": true, "example": "Jane" },
//!         "password": { "type": "password", "writeOnly": true }
//!     }
//! });
//!
//! let converter = Converter::new(&ConvertOptions::new().remove_write_only(true));
//! let converted = converter.convert(schema).unwrap();
//!
//! assert_eq!(converted["$schema"], "http://json-schema.org/draft-04/schema#");
//! assert_eq!(converted["properties"]["id"], json!({ "type": "integer", "format": "int64" }));
//! assert_eq!(converted["properties"]["name"], json!({ "type": ["string", "null"] }));
//! // "password" is dropped, so it also leaves "required"
//! assert!(converted["properties"].get("password").is_none());
//! assert_eq!(converted["required"], json!(["id"]));
//! ```
//!
//! # Type Mapping
//!
//! | OpenAPI type | Draft-04 type | format |
//! |--------------|---------------|--------|
//! | `integer` | `integer` | `int32` unless already set |
//! | `long` | `integer` | `int64` |
//! | `float` | `number` | `float` |
//! | `double` | `number` | `double` |
//! | `byte` | `string` | `byte` |
//! | `binary` | `string` | `binary` |
//! | `date` | `string` | `date` |
//! | `dateTime` | `string` | `date-time` |
//! | `password` | `string` | `password` |
//!
//! `number`, `string`, `boolean`, `object` and `array` pass through. Any other
//! type fails with [`ConvertError::UnsupportedType`].
//!
//! # Stripped Attributes
//!
//! `deprecated`, `discriminator`, `example`, `externalDocs`, `nullable`,
//! `readOnly`, `writeOnly` and `xml` are removed from every node unless listed
//! in [`ConvertOptions::keep_unsupported`]. `nullable: true` widens the type
//! to `[type, "null"]` and appends `"null"` to any `enum`.

mod converter;
mod error;
mod loader;
mod types;

pub use converter::{convert, Converter};
pub use error::{ConvertError, LoadError};
pub use loader::{
    is_url, load_options, load_schema, load_schema_auto, load_schema_str, navigate_fragment,
    SourceFormat,
};
pub use types::{
    json_type_name, type_alias, ConvertOptions, DEFAULT_INTEGER_FORMAT, DRAFT_04_SCHEMA_URI,
    STRUCTURES, SUPPORTED_TYPES, TYPE_ALIASES, UNSUPPORTED_ATTRIBUTES,
};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
