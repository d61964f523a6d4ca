//! Generation manifest: which units to specialize and with which variants.
//!
//! The manifest is YAML. Paths are relative to the manifest's own
//! directory, so a checked-in manifest works from any working directory.
//!
//! ```yaml
//! reference:
//!   type: int
//!   display: Int
//!   snippets: { view: Integer }
//! variants:
//!   - type: long
//!     display: Long
//!     example_values: ["505L", "606L", "707L", "808L"]
//!     snippets: { view: Long }
//! units:
//!   - source: src/main/java/demo/IntCompactMap.java
//!     output: src/main/java/demo/{display}CompactMap.java
//!   - source: src/test/java/demo/IntCompactMapTest.java
//!     output: src/test/java/demo/{display}CompactMapTest.java
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use monomorph::VariantConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// The hand-written source's own kind. Used for round-trip validation
    /// only; never emitted.
    pub reference: VariantConfig,

    /// Target kinds shared by every unit.
    #[serde(default)]
    pub variants: Vec<VariantConfig>,

    /// Document pairs to process. Each unit is an independent run; there is
    /// no ordering dependency between them.
    pub units: Vec<Unit>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Unit {
    /// Annotated input, relative to the manifest's directory.
    pub source: PathBuf,

    /// Output path pattern; `{display}` expands to each variant's display
    /// name.
    pub output: String,

    /// Kinds generated for this unit only — e.g. an object kind that exists
    /// for the map source but not for its tests.
    #[serde(default)]
    pub extra_variants: Vec<VariantConfig>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest: Manifest = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        Ok(manifest)
    }
}

impl Unit {
    /// Shared variants followed by this unit's own, in manifest order.
    pub fn variant_set(&self, manifest: &Manifest) -> Vec<VariantConfig> {
        manifest
            .variants
            .iter()
            .chain(&self.extra_variants)
            .cloned()
            .collect()
    }

    /// Expands the output pattern for one variant.
    pub fn output_path(&self, variant: &VariantConfig) -> PathBuf {
        PathBuf::from(self.output.replace("{display}", &variant.display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
reference:
  type: int
  display: Int
variants:
  - type: long
    display: Long
    example_values: ["505L"]
units:
  - source: IntMap.java
    output: "{display}Map.java"
    extra_variants:
      - type: Object
        display: ""
        object: true
        snippets: { generic: "<V>" }
"#;

    #[test]
    fn test_manifest_parses_and_orders_variants() {
        let manifest: Manifest = serde_yaml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.reference.type_name, "int");
        let set = manifest.units[0].variant_set(&manifest);
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].type_name, "long");
        assert!(set[1].object);
        assert_eq!(set[1].snippets["generic"], "<V>");
    }

    #[test]
    fn test_output_pattern_expansion() {
        let manifest: Manifest = serde_yaml::from_str(MANIFEST).unwrap();
        let set = manifest.units[0].variant_set(&manifest);
        assert_eq!(
            manifest.units[0].output_path(&set[0]),
            PathBuf::from("LongMap.java")
        );
        // Empty display names collapse the placeholder entirely.
        assert_eq!(
            manifest.units[0].output_path(&set[1]),
            PathBuf::from("Map.java")
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = serde_yaml::from_str::<Manifest>("reference: {type: a, display: A}\nunits: []\nbogus: 1");
        assert!(err.is_err());
    }
}
