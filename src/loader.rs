//! Schema loading from various sources.
//!
//! Handles loading schemas from files, stdin, strings, and HTTP URLs, in
//! either JSON or YAML, plus options files for the converter.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;
use crate::types::ConvertOptions;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Serialization format of a schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Json,
    Yaml,
}

impl SourceFormat {
    /// Guess the format from a path or URL: `.yaml`/`.yml` is YAML, anything
    /// else is JSON.
    pub fn detect(source: &str) -> Self {
        // Ignore query strings and fragments on URLs
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// Load a schema from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or a parse error if the content isn't valid for its format.
pub fn load_schema(path: &Path) -> Result<Value, LoadError> {
    debug!(path = %path.display(), "loading schema");
    let content = read_file(path)?;
    load_schema_str(&content, SourceFormat::detect(&path.to_string_lossy()))
}

/// Load a schema from a string in the given format.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` or `LoadError::InvalidYaml` if the
/// string doesn't parse.
pub fn load_schema_str(content: &str, format: SourceFormat) -> Result<Value, LoadError> {
    match format {
        SourceFormat::Json => {
            serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
        }
        SourceFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })
        }
    }
}

/// Load a schema from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default). The format is taken
/// from the URL's extension.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or a parse error
/// if the body isn't valid for its format.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    debug!(url, "fetching schema");
    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(network_error)?;

    load_schema_str(&body, SourceFormat::detect(url))
}

/// Load a schema from a file path, a URL, or `-` for stdin.
///
/// Stdin is always parsed as JSON.
///
/// # Errors
///
/// Returns the errors of the underlying loader.
pub fn load_schema_auto(source: &str) -> Result<Value, LoadError> {
    if source == "-" {
        let content =
            std::io::read_to_string(std::io::stdin()).map_err(|source| LoadError::ReadError {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return load_schema_str(&content, SourceFormat::Json);
    }

    if is_url(source) {
        #[cfg(feature = "remote")]
        return load_schema_url(source);
    }

    load_schema(Path::new(source))
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Select the value at a JSON Pointer fragment (e.g. `#/components/schemas/Pet`).
///
/// `#` or an empty fragment selects the whole document.
///
/// # Errors
///
/// Returns `LoadError::FragmentNotFound` if no value lives at the fragment.
pub fn navigate_fragment(schema: &Value, fragment: &str) -> Result<Value, LoadError> {
    let pointer = fragment.strip_prefix('#').unwrap_or(fragment);
    if pointer.is_empty() {
        return Ok(schema.clone());
    }

    let pointer = if pointer.starts_with('/') {
        pointer.to_string()
    } else {
        format!("/{}", pointer)
    };

    // serde_json unescapes ~1 and ~0 per RFC 6901
    schema
        .pointer(&pointer)
        .cloned()
        .ok_or_else(|| LoadError::FragmentNotFound {
            fragment: fragment.to_string(),
        })
}

/// Load converter options from a JSON or YAML file.
///
/// # Errors
///
/// Returns an IO error if the file can't be read, or
/// `LoadError::InvalidConfig` if it doesn't describe valid options.
pub fn load_options(path: &Path) -> Result<ConvertOptions, LoadError> {
    let content = read_file(path)?;
    let invalid = |message: String| LoadError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    };

    match SourceFormat::detect(&path.to_string_lossy()) {
        SourceFormat::Json => serde_json::from_str(&content).map_err(|e| invalid(e.to_string())),
        SourceFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string())),
    }
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detect_format() {
        assert_eq!(SourceFormat::detect("pet.yaml"), SourceFormat::Yaml);
        assert_eq!(SourceFormat::detect("dir/pet.YML"), SourceFormat::Yaml);
        assert_eq!(SourceFormat::detect("pet.json"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("pet"), SourceFormat::Json);
        assert_eq!(
            SourceFormat::detect("https://example.com/api.yaml?rev=2"),
            SourceFormat::Yaml
        );
    }

    #[test]
    fn load_json_and_yaml_strings() {
        let from_json = load_schema_str(r#"{"type":"long"}"#, SourceFormat::Json).unwrap();
        let from_yaml = load_schema_str("type: long\n", SourceFormat::Yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn invalid_json_errors() {
        let err = load_schema_str("{not json", SourceFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_yaml_errors() {
        let err = load_schema_str("type: [unclosed", SourceFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::InvalidYaml { .. }));
    }

    #[test]
    fn missing_file_errors() {
        let err = load_schema(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn navigate_fragment_selects_component() {
        let doc = json!({
            "components": {
                "schemas": {
                    "Pet": { "type": "object" },
                    "a/b": { "type": "string" }
                }
            }
        });

        let pet = navigate_fragment(&doc, "#/components/schemas/Pet").unwrap();
        assert_eq!(pet, json!({ "type": "object" }));

        let escaped = navigate_fragment(&doc, "#/components/schemas/a~1b").unwrap();
        assert_eq!(escaped, json!({ "type": "string" }));

        let bare = navigate_fragment(&doc, "components/schemas/Pet").unwrap();
        assert_eq!(bare, pet);

        assert_eq!(navigate_fragment(&doc, "#").unwrap(), doc);
    }

    #[test]
    fn navigate_fragment_missing() {
        let doc = json!({ "components": {} });
        let err = navigate_fragment(&doc, "#/components/schemas/Pet").unwrap_err();
        assert!(matches!(
            err,
            LoadError::FragmentNotFound { ref fragment } if fragment == "#/components/schemas/Pet"
        ));
    }

    #[test]
    fn load_options_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("options.yaml");
        fs::write(&path, "removeWriteOnly: true\nkeepUnsupported:\n  - example\n").unwrap();

        let opts = load_options(&path).unwrap();
        assert!(opts.remove_write_only);
        assert!(!opts.remove_read_only);
        assert_eq!(opts.keep_unsupported, vec!["example"]);
    }

    #[test]
    fn load_options_rejects_bad_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, r#"{"removeReadOnly": "yes"}"#).unwrap();

        let err = load_options(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(feature = "remote")]
    #[test]
    fn load_schema_url_fetches_yaml() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/schemas/pet.yaml")
            .with_status(200)
            .with_header("content-type", "application/yaml")
            .with_body("type: object\nproperties:\n  id:\n    type: long\n")
            .create();

        let url = format!("{}/schemas/pet.yaml", server.url());
        let schema = load_schema_url(&url).unwrap();

        mock.assert();
        assert_eq!(schema["properties"]["id"]["type"], json!("long"));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn load_schema_url_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing.json").with_status(404).create();

        let url = format!("{}/missing.json", server.url());
        let err = load_schema_url(&url).unwrap_err();
        assert!(matches!(err, LoadError::NetworkError { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
