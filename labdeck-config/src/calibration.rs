//! Calibration documents and stored records
//!
//! Calibration is done once per deck setup. The resulting origins can be
//! saved as a checksummed postcard record and re-applied on later runs, or
//! supplied as a TOML document with a `calibration` table.

use alloc::vec::Vec;

use labdeck_core::{CalibrationDocument, CalibrationRecord, Deck, RecordError};

use crate::error::{toml_error, ConfigError};

/// Parse a TOML calibration document
///
/// ```toml
/// [calibration.A1]
/// x = 10.0
/// y = 20.0
/// z = 5.0
/// ```
pub fn parse_calibration(input: &str) -> Result<CalibrationDocument, ConfigError> {
    toml::from_str(input).map_err(toml_error)
}

/// Encode the deck's current calibration as a stored record
pub fn save_calibration(deck: &Deck) -> Result<Vec<u8>, ConfigError> {
    let record = CalibrationRecord::new(deck.calibration())?;
    let bytes = record.to_bytes()?;
    info!("saved calibration for {} slot(s)", record.document.len());
    Ok(bytes)
}

/// Decode a stored record
///
/// Returns an empty document if the record is missing or unusable, so a
/// deck without stored calibration still loads.
pub fn load_calibration(bytes: &[u8]) -> CalibrationDocument {
    if bytes.is_empty() {
        debug!("no stored calibration, starting uncalibrated");
        return CalibrationDocument::new();
    }

    match CalibrationRecord::from_bytes(bytes) {
        Ok(record) => {
            info!("loaded calibration for {} slot(s)", record.document.len());
            record.into_document()
        }
        Err(e) => {
            warn!("failed to load calibration: {}, starting uncalibrated", e);
            CalibrationDocument::new()
        }
    }
}

/// Decode a stored record and apply it to a deck
///
/// Unlike [`load_calibration`], a damaged record is an error here.
pub fn restore_calibration(deck: &mut Deck, bytes: &[u8]) -> Result<(), ConfigError> {
    let record = CalibrationRecord::from_bytes(bytes).map_err(|e| {
        if e == RecordError::CrcMismatch {
            warn!("stored calibration is corrupt");
        }
        ConfigError::Record(e)
    })?;
    deck.configure(&record.into_document())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labdeck_core::{CalibrationParams, Coordinate, DeckError};

    use crate::catalog::standard_catalog;
    use crate::loader::load_deck_str;

    const LAYOUT: &str = r#"
        [slots]
        A1 = { labware = "microplate", model = "96" }
        A2 = { labware = "microplate", model = "96-deepwell" }
        B1 = { labware = "trash" }

        [calibration]
        A1 = { x = 10.0, y = 20.0, z = 5.0 }
        A2 = { x = 150.0, y = 20.0, z = 2.5 }
    "#;

    fn uncalibrated() -> Deck {
        let layout = LAYOUT.split("[calibration]").next().unwrap();
        load_deck_str(layout, &standard_catalog().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_calibration_document() {
        let doc = parse_calibration(
            r#"
            [calibration.b2]
            x = 1.5
            y = 2.5
            z = -3.0
            "#,
        )
        .unwrap();
        assert_eq!(doc.calibration["b2"], CalibrationParams::new(1.5, 2.5, -3.0));
    }

    #[test]
    fn test_parse_calibration_requires_all_axes() {
        let result = parse_calibration("calibration.A1 = { x = 1.0, y = 2.0 }");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_save_and_restore_on_fresh_deck() {
        let calibrated = load_deck_str(LAYOUT, &standard_catalog().unwrap()).unwrap();
        let bytes = save_calibration(&calibrated).unwrap();

        let mut deck = uncalibrated();
        assert_eq!(
            deck.slot("A2").unwrap().well_coordinates("A1"),
            Err(DeckError::UninitializedCalibration)
        );

        restore_calibration(&mut deck, &bytes).unwrap();
        assert_eq!(
            deck.slot("A2").unwrap().well_coordinates("B3").unwrap(),
            Coordinate::new(159.0, 38.0, 2.5)
        );
        assert_eq!(deck.calibration(), calibrated.calibration());
    }

    #[test]
    fn test_load_calibration_falls_back_to_empty() {
        assert!(load_calibration(&[]).is_empty());
        assert!(load_calibration(&[0xFF, 0x01]).is_empty());
    }

    #[test]
    fn test_load_calibration_decodes_record() {
        let calibrated = load_deck_str(LAYOUT, &standard_catalog().unwrap()).unwrap();
        let bytes = save_calibration(&calibrated).unwrap();
        assert_eq!(load_calibration(&bytes).len(), 2);
    }

    #[test]
    fn test_restore_rejects_corrupt_record() {
        let calibrated = load_deck_str(LAYOUT, &standard_catalog().unwrap()).unwrap();
        let mut bytes = save_calibration(&calibrated).unwrap();
        // Last byte belongs to the CRC varint
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let mut deck = uncalibrated();
        assert_eq!(
            restore_calibration(&mut deck, &bytes),
            Err(ConfigError::Record(RecordError::CrcMismatch))
        );
        assert!(deck.calibration().is_empty());
    }
}
