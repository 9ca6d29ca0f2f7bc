//! Deck layout files
//!
//! A layout file populates the deck, writes pipette settings and submits the
//! calibration document, in that order:
//!
//! ```toml
//! [slots]
//! A1 = { labware = "microplate", model = "96" }
//! B1 = { labware = "tiprack", model = "P200" }
//! C1 = { labware = "pipette", model = "P200" }
//! D1 = { labware = "trash" }
//!
//! [pipettes.C1]
//! volume = 100.0
//! side = "left"
//!
//! [calibration.A1]
//! x = 10.0
//! y = 20.0
//! z = 5.0
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;

use serde::Deserialize;

use labdeck_core::{
    CalibrationDocument, CalibrationParams, Catalog, Deck, LabwareKind, PipetteSettings,
};

use crate::error::{toml_error, ConfigError};

/// One `[slots]` entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotEntry {
    /// Labware variant
    pub labware: LabwareKind,
    /// Catalog tag; required for everything except trash, which takes none
    #[serde(default)]
    pub model: Option<String>,
}

/// Parsed layout file
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckLayout {
    /// Slot label -> labware
    #[serde(default)]
    pub slots: BTreeMap<String, SlotEntry>,
    /// Slot label -> pipette settings patch
    #[serde(default)]
    pub pipettes: BTreeMap<String, PipetteSettings>,
    /// Slot label -> calibration origin
    #[serde(default)]
    pub calibration: BTreeMap<String, CalibrationParams>,
}

impl DeckLayout {
    /// Calibration section as a document for [`Deck::configure`]
    pub fn calibration_document(&self) -> CalibrationDocument {
        CalibrationDocument {
            calibration: self.calibration.clone(),
        }
    }

    /// Build and configure a deck from this layout
    pub fn build(&self, catalog: &Catalog) -> Result<Deck, ConfigError> {
        let mut deck = Deck::new();

        for (label, entry) in &self.slots {
            let labware = catalog.labware(entry.labware, entry.model.as_deref())?;
            deck.add_module(label, labware)?;
        }

        for (label, settings) in &self.pipettes {
            deck.slot_mut(label)?.configure(settings)?;
        }

        deck.configure(&self.calibration_document())?;
        Ok(deck)
    }
}

/// Parse a layout file
pub fn parse_layout(input: &str) -> Result<DeckLayout, ConfigError> {
    toml::from_str(input).map_err(toml_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labdeck_core::{Capability, Coordinate, DeckError, Side};

    use crate::catalog::standard_catalog;

    const LAYOUT: &str = r#"
        [slots]
        A1 = { labware = "microplate", model = "96" }
        A2 = { labware = "microplate", model = "96-deepwell" }
        B1 = { labware = "tiprack", model = "P200" }
        C1 = { labware = "pipette", model = "P200" }
        D1 = { labware = "trash" }

        [pipettes.C1]
        volume = 100.0
        side = "left"

        [calibration.A1]
        x = 10.0
        y = 20.0
        z = 5.0
    "#;

    #[test]
    fn test_parse_layout_sections() {
        let layout = parse_layout(LAYOUT).unwrap();
        assert_eq!(layout.slots.len(), 5);
        assert_eq!(layout.slots["D1"].labware, LabwareKind::Trash);
        assert_eq!(layout.slots["D1"].model, None);
        assert_eq!(layout.pipettes["C1"].side, Some(Side::Left));
        assert_eq!(layout.pipettes["C1"].stop, None);
        assert_eq!(
            layout.calibration_document().calibration["A1"],
            CalibrationParams::new(10.0, 20.0, 5.0)
        );
    }

    #[test]
    fn test_build_populates_and_calibrates() {
        let deck = parse_layout(LAYOUT)
            .unwrap()
            .build(&standard_catalog().unwrap())
            .unwrap();

        assert_eq!(deck.len(), 5);
        assert_eq!(
            deck.slot("A1").unwrap().well_coordinates("B1").unwrap(),
            Coordinate::new(19.0, 20.0, 5.0)
        );
        assert_eq!(
            deck.slot("A2").unwrap().well_coordinates("A1"),
            Err(DeckError::UninitializedCalibration)
        );

        let pipette = deck.slot("C1").unwrap().as_pipette().unwrap();
        assert_eq!(pipette.settings().volume, Some(100.0));
        assert_eq!(pipette.max_vol(), 200.0);
        assert!(deck.slot("B1").unwrap().as_tiprack().unwrap().fits("P200"));
        deck.slot("D1").unwrap().dispose().unwrap();
    }

    #[test]
    fn test_empty_layout_builds_empty_deck() {
        let deck = parse_layout("").unwrap().build(&Catalog::new()).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_unknown_model() {
        let layout = parse_layout(r#"slots.A1 = { labware = "microplate", model = "384" }"#).unwrap();
        assert_eq!(
            layout.build(&standard_catalog().unwrap()).unwrap_err(),
            ConfigError::Deck(DeckError::UnknownLabware("384".into()))
        );
    }

    #[test]
    fn test_trash_with_model_is_rejected() {
        let layout = parse_layout(r#"slots.D1 = { labware = "trash", model = "X" }"#).unwrap();
        assert_eq!(
            layout.build(&Catalog::new()).unwrap_err(),
            ConfigError::Deck(DeckError::UnexpectedModel(LabwareKind::Trash))
        );
    }

    #[test]
    fn test_pipette_without_model_is_rejected() {
        let layout = parse_layout(r#"slots.C1 = { labware = "pipette" }"#).unwrap();
        assert_eq!(
            layout.build(&standard_catalog().unwrap()).unwrap_err(),
            ConfigError::Deck(DeckError::MissingModel(LabwareKind::Pipette))
        );
    }

    #[test]
    fn test_case_variant_labels_collide() {
        let layout = parse_layout(
            r#"
            [slots]
            A1 = { labware = "trash" }
            a1 = { labware = "trash" }
            "#,
        )
        .unwrap();
        assert!(matches!(
            layout.build(&Catalog::new()),
            Err(ConfigError::Deck(DeckError::DuplicateSlot(_)))
        ));
    }

    #[test]
    fn test_calibrating_unknown_slot() {
        let layout = parse_layout(
            r#"
            slots.A1 = { labware = "trash" }
            calibration.B4 = { x = 1.0, y = 2.0, z = 3.0 }
            "#,
        )
        .unwrap();
        assert!(matches!(
            layout.build(&Catalog::new()),
            Err(ConfigError::Deck(DeckError::UnknownSlot(_)))
        ));
    }

    #[test]
    fn test_calibration_case_variant_labels_collide() {
        let layout = parse_layout(
            r#"
            slots.A1 = { labware = "microplate", model = "96" }

            [calibration]
            a1 = { x = 1.0, y = 1.0, z = 1.0 }
            A1 = { x = 50.0, y = 50.0, z = 50.0 }
            "#,
        )
        .unwrap();
        assert!(matches!(
            layout.build(&standard_catalog().unwrap()),
            Err(ConfigError::Deck(DeckError::DuplicateSlot(_)))
        ));
    }

    #[test]
    fn test_calibrating_trash_is_rejected() {
        let layout = parse_layout(
            r#"
            slots.A1 = { labware = "trash" }
            calibration.A1 = { x = 1.0, y = 2.0, z = 3.0 }
            "#,
        )
        .unwrap();
        assert_eq!(
            layout.build(&Catalog::new()).unwrap_err(),
            ConfigError::Deck(DeckError::CapabilityNotSupported {
                kind: LabwareKind::Trash,
                capability: Capability::Calibrate,
            })
        );
    }

    #[test]
    fn test_settings_for_non_pipette() {
        let layout = parse_layout(
            r#"
            slots.A1 = { labware = "trash" }
            pipettes.A1 = { volume = 5.0 }
            "#,
        )
        .unwrap();
        assert!(matches!(
            layout.build(&Catalog::new()),
            Err(ConfigError::Deck(DeckError::CapabilityNotSupported {
                capability: Capability::Configure,
                ..
            }))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            parse_layout("[slot]\nA1 = { labware = \"trash\" }"),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            parse_layout("pipettes.C1 = { volume = 1.0, speed = 2.0 }"),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            parse_layout("slots.A1 = { labware = \"centrifuge\" }"),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
