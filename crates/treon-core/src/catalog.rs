use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ratings::{is_placeholder_label, ShadeId};
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogShade {
    pub id: ShadeId,
    pub name: String,
    /// Display swatch, e.g. `"#B3122E"`.
    #[serde(default)]
    pub hex: Option<String>,
}

/// A brand's lipstick line as listed on the kiosk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub brand: String,
    #[serde(default)]
    pub colors: Vec<CatalogShade>,
}

impl CatalogProduct {
    /// A product is shown on the kiosk only if it names a real brand and
    /// offers at least one color.
    #[must_use]
    pub fn is_listable(&self) -> bool {
        !is_placeholder_label(&self.brand) && !self.colors.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

impl Catalog {
    pub fn listable_products(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.iter().filter(|p| p.is_listable())
    }

    #[must_use]
    pub fn valid_product_count(&self) -> usize {
        self.listable_products().count()
    }

    /// Look up the display name of a shade by brand and catalog id.
    #[must_use]
    pub fn shade_name(&self, brand: &str, shade_id: &ShadeId) -> Option<&str> {
        let key = shade_id.as_key();
        self.listable_products()
            .filter(|p| p.brand.trim() == brand.trim())
            .flat_map(|p| p.colors.iter())
            .find(|c| c.id.as_key() == key)
            .map(|c| c.name.as_str())
    }
}

/// Load and validate the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    for product in &catalog.products {
        let mut seen_ids = HashSet::new();

        for shade in &product.colors {
            if shade.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "shade {} of brand '{}' has an empty name",
                    shade.id, product.brand
                )));
            }

            if !seen_ids.insert(shade.id.as_key()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate shade id {} for brand '{}'",
                    shade.id, product.brand
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
products:
  - brand: MAC
    colors:
      - id: 1
        name: Ruby Woo
        hex: "#A4161A"
      - id: "2"
        name: Velvet Teddy
  - brand: NARS
    colors:
      - id: 7
        name: Cruella
  - brand: undefined
    colors:
      - id: 9
        name: Ghost
  - brand: Fenty
    colors: []
"##;

    #[test]
    fn parse_sample_catalog() {
        let catalog = parse_catalog(SAMPLE).expect("sample catalog should parse");
        assert_eq!(catalog.products.len(), 4);
        assert_eq!(catalog.products[0].colors[0].hex.as_deref(), Some("#A4161A"));
    }

    #[test]
    fn valid_product_count_skips_placeholder_and_empty_products() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.valid_product_count(), 2);
        let brands: Vec<&str> = catalog.listable_products().map(|p| p.brand.as_str()).collect();
        assert_eq!(brands, vec!["MAC", "NARS"]);
    }

    #[test]
    fn shade_name_matches_numeric_and_text_ids() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.shade_name("MAC", &ShadeId::Numeric(2)), Some("Velvet Teddy"));
        assert_eq!(
            catalog.shade_name("MAC", &ShadeId::Text("1".to_string())),
            Some("Ruby Woo")
        );
        assert_eq!(catalog.shade_name("NARS", &ShadeId::Numeric(1)), None);
    }

    #[test]
    fn shade_name_ignores_unlisted_products() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.shade_name("undefined", &ShadeId::Numeric(9)), None);
    }

    #[test]
    fn validate_rejects_duplicate_shade_id() {
        let yaml = r"
products:
  - brand: MAC
    colors:
      - id: 1
        name: Ruby Woo
      - id: '1'
        name: Russian Red
";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate shade id 1"), "got: {err}");
    }

    #[test]
    fn validate_rejects_empty_shade_name() {
        let yaml = r"
products:
  - brand: MAC
    colors:
      - id: 1
        name: '  '
";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("empty name"), "got: {err}");
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_catalog("products: [").unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileParse(_)));
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
    }

    #[test]
    fn load_catalog_from_repo_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("catalog.yaml");
        let catalog = load_catalog(&path).expect("config/catalog.yaml should load");
        assert!(catalog.valid_product_count() > 0);
    }
}
