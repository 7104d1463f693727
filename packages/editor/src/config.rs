//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Prefix for generated property names when no override is configured.
pub const DEFAULT_PROPERTY_PREFIX: &str = "newProperty";

/// Display label of the root breadcrumb.
pub const DEFAULT_ROOT_LABEL: &str = "Root";

/// Session-level knobs, loadable from the surrounding application's JSON
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    /// Label shown for the root breadcrumb.
    #[serde(default = "default_root_label")]
    pub root_label: String,

    /// Prefix used when generating fresh property names (`{prefix}{n}`).
    #[serde(default = "default_property_prefix")]
    pub property_prefix: String,
}

fn default_root_label() -> String {
    DEFAULT_ROOT_LABEL.to_string()
}

fn default_property_prefix() -> String {
    DEFAULT_PROPERTY_PREFIX.to_string()
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            root_label: default_root_label(),
            property_prefix: default_property_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: EditorOptions = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(options.root_label, "Root");
        assert_eq!(options.property_prefix, "newProperty");

        let options: EditorOptions =
            serde_json::from_str(r#"{"propertyPrefix": "property"}"#).unwrap();
        assert_eq!(options.property_prefix, "property");
        assert_eq!(options.root_label, "Root");
    }
}
