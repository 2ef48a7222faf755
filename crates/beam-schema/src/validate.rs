//! Declarative metadata validation.
//!
//! The original back-office contract is expressed here as a rule table:
//! field name -> { required, check }, evaluated in a fixed schema order so
//! that "first error wins" is reproducible. Validation is fail-fast: the
//! first violation is reported as a dotted field path plus the violated
//! rule, and nothing later in the schema is inspected.

use crate::metadata::Metadata;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Icon-like paths must live under `./static/` and carry an image extension.
const ICON_PATTERN: &str = r"^\./static/.+\.(png|jpg|jpeg)$";

/// External hosting URLs must be plain http(s).
const URL_PATTERN: &str = "^https?://";

static ICON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ICON_PATTERN).unwrap_or_else(|e| panic!("invalid icon pattern: {e}"))
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(URL_PATTERN).unwrap_or_else(|e| panic!("invalid url pattern: {e}"))
});

/// A metadata object that failed validation, carrying the first (and only)
/// violation found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No metadata object was provided at all.
    #[error("metadata wasn't found, make sure it's provided through a metadata.json file")]
    Absent,

    /// A required field is missing.
    #[error("metadata is invalid: \"{0}\" is required")]
    Missing(String),

    /// A field is present but has the wrong JSON type.
    #[error("metadata is invalid: \"{path}\" is not of type {expected}")]
    Type {
        /// Dotted path of the offending field.
        path: String,
        /// The JSON type the rule expects.
        expected: &'static str,
    },

    /// A required string field is present but empty.
    #[error("metadata is invalid: \"{0}\" must not be empty")]
    Empty(String),

    /// A string field does not match its pattern.
    #[error("metadata is invalid: \"{path}\" does not match pattern {pattern}")]
    Pattern {
        /// Dotted path of the offending field.
        path: String,
        /// The violated pattern, verbatim.
        pattern: &'static str,
    },

    /// The object passed field-level checks but could not be deserialized
    /// into the typed record.
    #[error("metadata is invalid: {0}")]
    Shape(String),
}

/// How a single field is checked once present.
enum Check {
    /// A non-empty free-form string.
    Text,
    /// A string matching the given pattern.
    Matches(&'static LazyLock<Regex>, &'static str),
    /// An object whose every value is an icon-like path.
    PathMap,
}

struct Rule {
    field: &'static str,
    required: bool,
    check: Check,
}

/// The schema, in evaluation order. Order is load-bearing: the reported
/// error is always the first rule violated.
static RULES: &[Rule] = &[
    Rule {
        field: "name",
        required: true,
        check: Check::Text,
    },
    Rule {
        field: "identifier",
        required: true,
        check: Check::Text,
    },
    Rule {
        field: "version",
        required: true,
        check: Check::Text,
    },
    Rule {
        field: "externalUrl",
        required: false,
        check: Check::Matches(&URL_RE, URL_PATTERN),
    },
    Rule {
        field: "icon",
        required: true,
        check: Check::Matches(&ICON_RE, ICON_PATTERN),
    },
    Rule {
        field: "icons",
        required: false,
        check: Check::PathMap,
    },
    Rule {
        field: "splashImage",
        required: false,
        check: Check::Matches(&ICON_RE, ICON_PATTERN),
    },
    Rule {
        field: "artwork",
        required: false,
        check: Check::PathMap,
    },
];

/// Validate a parsed metadata object against the rule table and return the
/// typed record.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, in schema order.
pub fn validate(value: &Value) -> Result<Metadata, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::Absent);
    };

    for rule in RULES {
        let field = object.get(rule.field).filter(|v| !v.is_null());

        let Some(field_value) = field else {
            if rule.required {
                return Err(ValidationError::Missing(rule.field.to_string()));
            }
            continue;
        };

        check_field(rule.field, field_value, &rule.check)?;
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError::Shape(e.to_string()))
}

fn check_field(path: &str, value: &Value, check: &Check) -> Result<(), ValidationError> {
    match check {
        Check::Text => {
            let Some(s) = value.as_str() else {
                return Err(ValidationError::Type {
                    path: path.to_string(),
                    expected: "string",
                });
            };
            if s.is_empty() {
                return Err(ValidationError::Empty(path.to_string()));
            }
            Ok(())
        }
        Check::Matches(re, pattern) => {
            let Some(s) = value.as_str() else {
                return Err(ValidationError::Type {
                    path: path.to_string(),
                    expected: "string",
                });
            };
            if !re.is_match(s) {
                return Err(ValidationError::Pattern {
                    path: path.to_string(),
                    pattern: *pattern,
                });
            }
            Ok(())
        }
        Check::PathMap => {
            let Some(map) = value.as_object() else {
                return Err(ValidationError::Type {
                    path: path.to_string(),
                    expected: "object",
                });
            };
            // Map iteration is key-sorted, so the reported entry is
            // deterministic regardless of document order.
            for (key, entry) in map {
                check_field(
                    &format!("{path}.{key}"),
                    entry,
                    &Check::Matches(&ICON_RE, ICON_PATTERN),
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "MyApp",
            "identifier": "com.example.app.MyApp",
            "version": "1.2.3",
            "icon": "./static/icon.png",
        })
    }

    #[test]
    fn rejects_absent_metadata() {
        assert_eq!(validate(&Value::Null).unwrap_err(), ValidationError::Absent);
        assert_eq!(
            validate(&json!("just a string")).unwrap_err(),
            ValidationError::Absent
        );
    }

    #[test]
    fn reports_missing_name_first() {
        // Both name and icon are missing; name appears first in the schema.
        let err = validate(&json!({})).unwrap_err();
        assert_eq!(err, ValidationError::Missing("name".into()));
    }

    #[test]
    fn reports_missing_identifier_after_name() {
        let err = validate(&json!({ "name": "MyApp" })).unwrap_err();
        assert_eq!(err, ValidationError::Missing("identifier".into()));
    }

    #[test]
    fn reports_missing_version() {
        let err = validate(&json!({ "name": "MyApp", "identifier": "com.x" })).unwrap_err();
        assert_eq!(err, ValidationError::Missing("version".into()));
    }

    #[test]
    fn reports_missing_icon() {
        let err = validate(&json!({
            "name": "MyApp",
            "identifier": "com.x",
            "version": "1.0.0",
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing("icon".into()));
    }

    #[test]
    fn rejects_non_string_name() {
        let mut meta = valid();
        meta["name"] = json!(123);
        let err = validate(&meta).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Type {
                path: "name".into(),
                expected: "string",
            }
        );
    }

    #[test]
    fn rejects_empty_version() {
        let mut meta = valid();
        meta["version"] = json!("");
        assert_eq!(
            validate(&meta).unwrap_err(),
            ValidationError::Empty("version".into())
        );
    }

    #[test]
    fn rejects_invalid_external_url() {
        let mut meta = valid();
        meta["externalUrl"] = json!("/non-valid-url");
        let err = validate(&meta).unwrap_err();
        assert!(matches!(err, ValidationError::Pattern { path, .. } if path == "externalUrl"));
    }

    #[test]
    fn accepts_http_and_https_urls() {
        for url in ["http://example.com", "https://example.com/app"] {
            let mut meta = valid();
            meta["externalUrl"] = json!(url);
            assert!(validate(&meta).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn rejects_icon_without_extension() {
        let mut meta = valid();
        meta["icon"] = json!("./static/icon");
        let err = validate(&meta).unwrap_err();
        assert!(matches!(err, ValidationError::Pattern { path, .. } if path == "icon"));
    }

    #[test]
    fn rejects_icon_outside_static() {
        let mut meta = valid();
        meta["icon"] = json!("./assets/icon.png");
        assert!(validate(&meta).is_err());
    }

    #[test]
    fn icon_prefix_is_literal() {
        // The leading "./static/" is required verbatim.
        let mut meta = valid();
        meta["icon"] = json!("static/icon.png");
        assert!(validate(&meta).is_err());
    }

    #[test]
    fn icon_extension_is_case_sensitive() {
        let mut meta = valid();
        meta["icon"] = json!("./static/icon.PNG");
        assert!(validate(&meta).is_err());
    }

    #[test]
    fn accepts_jpg_and_jpeg_icons() {
        for icon in ["./static/a.jpg", "./static/deep/dir/b.jpeg"] {
            let mut meta = valid();
            meta["icon"] = json!(icon);
            assert!(validate(&meta).is_ok(), "{icon} should be accepted");
        }
    }

    #[test]
    fn reports_nested_icon_path() {
        let mut meta = valid();
        meta["icons"] = json!({ "square": "./static/square.gif" });
        let err = validate(&meta).unwrap_err();
        assert!(matches!(err, ValidationError::Pattern { path, .. } if path == "icons.square"));
    }

    #[test]
    fn nested_entries_checked_in_sorted_key_order() {
        // Two bad entries; the first reported path is the sorted-first key,
        // not the one written first in the document.
        let mut meta = valid();
        meta["icons"] = json!({
            "square": "./static/square.gif",
            "default": "./static/default.gif",
        });
        let err = validate(&meta).unwrap_err();
        assert!(matches!(err, ValidationError::Pattern { path, .. } if path == "icons.default"));
    }

    #[test]
    fn rejects_non_object_icons() {
        let mut meta = valid();
        meta["icons"] = json!("./static/icon.png");
        assert_eq!(
            validate(&meta).unwrap_err(),
            ValidationError::Type {
                path: "icons".into(),
                expected: "object",
            }
        );
    }

    #[test]
    fn validates_artwork_entries() {
        let mut meta = valid();
        meta["artwork"] = json!({ "1920x1080": "./static/artwork.bmp" });
        let err = validate(&meta).unwrap_err();
        assert!(
            matches!(err, ValidationError::Pattern { path, .. } if path == "artwork.1920x1080")
        );
    }

    #[test]
    fn accepts_minimal_valid_metadata() {
        let meta = validate(&valid()).unwrap();
        assert_eq!(meta.identifier, "com.example.app.MyApp");
        assert_eq!(meta.version, "1.2.3");
    }

    #[test]
    fn accepts_full_metadata() {
        let meta = validate(&json!({
            "name": "MyApp",
            "identifier": "com.example.app.MyApp",
            "version": "1.2.3",
            "externalUrl": "https://apps.example.com/my-app",
            "icon": "./static/icon.png",
            "icons": {
                "default": "./static/icon.png",
                "square": "./static/square.png",
                "rounded": "./static/rounded.jpg",
                "landscape": "./static/landscape.jpeg",
            },
            "splashImage": "./static/splash.png",
            "artwork": {
                "1920x1080": "./static/artwork-hd.png",
                "1280x720": "./static/artwork-sd.png",
            },
        }))
        .unwrap();
        assert!(meta.is_externally_hosted());
        assert_eq!(meta.icons.as_ref().map(std::collections::BTreeMap::len), Some(4));
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut meta = valid();
        meta["somethingElse"] = json!({ "nested": true });
        assert!(validate(&meta).is_ok());
    }
}
