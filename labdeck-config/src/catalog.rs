//! Labware catalog loading
//!
//! Catalog files use arrays of tables:
//!
//! ```toml
//! [[pipettes]]
//! size = "P10"
//! min_vol = 0.5
//! max_vol = 10.0
//!
//! [[microplates]]
//! model = "96"
//! rows = 8
//! cols = 12
//! # ...
//! ```

use alloc::string::ToString;
use alloc::vec::Vec;

use labdeck_core::Catalog;

use crate::error::{toml_error, ConfigError};

/// Standard catalog shipped with the crate (validated at build time)
pub const STANDARD_CATALOG: &str = include_str!("../standards.toml");

/// Parse and sanity-check a catalog file
pub fn parse_catalog(input: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = toml::from_str(input).map_err(toml_error)?;
    validate(&catalog)?;

    debug!(
        "catalog: {} pipette(s), {} tiprack(s), {} microplate(s)",
        catalog.pipettes.len(),
        catalog.tipracks.len(),
        catalog.microplates.len()
    );
    Ok(catalog)
}

/// The embedded standard catalog
pub fn standard_catalog() -> Result<Catalog, ConfigError> {
    parse_catalog(STANDARD_CATALOG)
}

/// Merge a site-specific catalog file into `base`
///
/// Entries with a tag already in `base` replace it; new tags are appended.
pub fn extend_catalog(base: &mut Catalog, input: &str) -> Result<(), ConfigError> {
    let extra = parse_catalog(input)?;

    for spec in extra.pipettes {
        base.insert_pipette(spec);
    }
    for spec in extra.tipracks {
        base.insert_tiprack(spec);
    }
    for spec in extra.microplates {
        base.insert_microplate(spec);
    }
    Ok(())
}

fn validate(catalog: &Catalog) -> Result<(), ConfigError> {
    check_tags(catalog.pipettes.iter().map(|p| p.size.as_str()))?;
    check_tags(catalog.tipracks.iter().map(|t| t.size.as_str()))?;
    check_tags(catalog.microplates.iter().map(|m| m.model.as_str()))?;

    if let Some(bad) = catalog.pipettes.iter().find(|p| !p.is_valid()) {
        return Err(ConfigError::InvalidCatalogEntry(bad.size.to_string()));
    }
    if let Some(bad) = catalog.microplates.iter().find(|m| !m.is_valid()) {
        return Err(ConfigError::InvalidCatalogEntry(bad.model.to_string()));
    }
    Ok(())
}

/// Tags within one section must be non-empty and unique ignoring case
fn check_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen: Vec<&str> = Vec::new();
    for tag in tags {
        if tag.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(tag)) {
            warn!("rejecting catalog tag {=str}", tag);
            return Err(ConfigError::InvalidCatalogEntry(tag.to_string()));
        }
        seen.push(tag);
    }
    Ok(())
}
