//! Variant configuration model.
//!
//! A [`VariantConfig`] is pure data describing one target kind: its type
//! spelling, the label used to name generated units, the example literals
//! substituted for the reference kind's, and a bag of named code fragments
//! that directive expressions can splice in. Configs are constructed once
//! (usually from a manifest) and never mutated during a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Describes one target kind for which a specialized copy of the annotated
/// source is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// The target kind's type spelling, e.g. `long` or `Object`.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Identifier-safe label used to name generated units, e.g. `Long`.
    #[serde(rename = "display")]
    pub display_name: String,

    /// Literal tokens replacing the reference kind's example literals.
    /// Cycled when the source declares more canonical literals than there
    /// are entries here. Empty means no substitution for this variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub example_values: Vec<String>,

    /// Named kind-specific code fragments referenced by directive
    /// expressions (a narrowing-cast prefix, a unary-negation template, a
    /// boxed-type spelling, extra test imports). Absent keys render as
    /// empty text rather than failing.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub snippets: BTreeMap<String, String>,

    /// Whether this is an object/reference kind. Drives the `equals` and
    /// `cast_unsafe` expression helpers.
    #[serde(default)]
    pub object: bool,

    /// Keep directive marker lines verbatim in this variant's output. Set
    /// for the identity configuration and for variants whose downstream
    /// tooling still expects the markers.
    #[serde(default)]
    pub retain_directives: bool,
}

impl VariantConfig {
    /// Creates a config with the given type and display names and no
    /// example values, snippets, or flags.
    pub fn new(type_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            display_name: display_name.into(),
            example_values: Vec::new(),
            snippets: BTreeMap::new(),
            object: false,
            retain_directives: false,
        }
    }

    /// Sets the example literals used for bulk substitution.
    pub fn with_example_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.example_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one named code fragment.
    pub fn with_snippet(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.snippets.insert(name.into(), value.into());
        self
    }

    /// Marks this as an object/reference kind.
    pub fn object_kind(mut self) -> Self {
        self.object = true;
        self
    }

    /// Keeps directive marker lines in this variant's output.
    pub fn retaining_directives(mut self) -> Self {
        self.retain_directives = true;
        self
    }

    /// Builds the evaluation context handed to the expression evaluator:
    /// snippet keys flattened to the top level, then the named fields
    /// (`type`, `display`, `object`, `example_values`), which win on
    /// collision so a snippet can never shadow a built-in name.
    pub fn context(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, fragment) in &self.snippets {
            map.insert(name.clone(), serde_json::Value::String(fragment.clone()));
        }
        map.insert(
            "type".to_string(),
            serde_json::Value::String(self.type_name.clone()),
        );
        map.insert(
            "display".to_string(),
            serde_json::Value::String(self.display_name.clone()),
        );
        map.insert("object".to_string(), serde_json::Value::Bool(self.object));
        map.insert(
            "example_values".to_string(),
            serde_json::Value::Array(
                self.example_values
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        );
        serde_json::Value::Object(map)
    }

    /// Derives the synthetic identity configuration used by round-trip
    /// validation: same kind and snippets, no example values (so literal
    /// substitution is a no-op), directive markers retained.
    pub fn identity(&self) -> VariantConfig {
        VariantConfig {
            example_values: Vec::new(),
            retain_directives: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_flattens_snippets() {
        let config = VariantConfig::new("long", "Long")
            .with_snippet("lambda", "(v) -> (long) v")
            .with_example_values(["505L", "606L"]);
        let ctx = config.context();
        assert_eq!(ctx["type"], "long");
        assert_eq!(ctx["display"], "Long");
        assert_eq!(ctx["lambda"], "(v) -> (long) v");
        assert_eq!(ctx["object"], false);
        assert_eq!(ctx["example_values"][1], "606L");
    }

    #[test]
    fn test_named_fields_win_over_snippets() {
        let config = VariantConfig::new("long", "Long").with_snippet("type", "not-a-type");
        assert_eq!(config.context()["type"], "long");
    }

    #[test]
    fn test_identity_retains_directives_and_drops_examples() {
        let config = VariantConfig::new("int", "Int")
            .with_example_values(["5", "6"])
            .with_snippet("lambda", "(v) -> v");
        let identity = config.identity();
        assert!(identity.retain_directives);
        assert!(identity.example_values.is_empty());
        assert_eq!(identity.type_name, "int");
        assert_eq!(identity.snippets, config.snippets);
    }

    #[test]
    fn test_deserialize_from_yaml_style_json() {
        let config: VariantConfig = serde_json::from_str(
            r#"{"type": "byte", "display": "Byte", "object": false,
                "example_values": ["(byte)55"], "snippets": {"demote": "(byte) "}}"#,
        )
        .unwrap();
        assert_eq!(config.type_name, "byte");
        assert_eq!(config.snippets["demote"], "(byte) ");
        assert!(!config.retain_directives);
    }
}
