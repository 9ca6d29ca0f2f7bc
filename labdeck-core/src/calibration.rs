//! Calibration data types
//!
//! A calibration document maps slot labels to the machine coordinate of
//! well A1 in that slot. With the `serde` feature it can also be stored as a
//! checksummed postcard record and re-applied on the next run.

use alloc::collections::BTreeMap;
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute machine coordinate in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

/// Calibration origin of a microplate
///
/// Centre and near-bottom of well A1 with the reference tip in place.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationOrigin {
    pub start_x: f64,
    pub start_y: f64,
    pub transfer_z: f64,
}

impl CalibrationOrigin {
    pub const fn new(start_x: f64, start_y: f64, transfer_z: f64) -> Self {
        Self {
            start_x,
            start_y,
            transfer_z,
        }
    }
}

/// Calibration parameters for one slot as they appear in a document
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationParams {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CalibrationParams {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<CalibrationParams> for CalibrationOrigin {
    fn from(p: CalibrationParams) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<CalibrationOrigin> for CalibrationParams {
    fn from(o: CalibrationOrigin) -> Self {
        Self::new(o.start_x, o.start_y, o.transfer_z)
    }
}

/// Calibration document handed to [`Deck::configure`](crate::Deck::configure)
///
/// Keys are slot labels. Entries are applied in ascending key order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationDocument {
    #[cfg_attr(feature = "serde", serde(default))]
    pub calibration: BTreeMap<String, CalibrationParams>,
}

impl CalibrationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for a slot label
    pub fn insert(&mut self, slot: impl Into<String>, params: CalibrationParams) {
        self.calibration.insert(slot.into(), params);
    }

    pub fn len(&self) -> usize {
        self.calibration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calibration.is_empty()
    }
}

#[cfg(feature = "serde")]
pub use record::{CalibrationRecord, RecordError, RECORD_MAGIC, RECORD_VERSION};

#[cfg(feature = "serde")]
mod record {
    use alloc::vec::Vec;

    use serde::{Deserialize, Serialize};

    use super::CalibrationDocument;

    /// Magic number identifying a stored deck calibration
    pub const RECORD_MAGIC: u32 = 0x4443_414C; // "DCAL"

    /// Current record format version
    pub const RECORD_VERSION: u8 = 1;

    /// Persistence errors
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum RecordError {
        /// Serialization failed
        Serialize,
        /// Deserialization failed
        Deserialize,
        /// Invalid magic or version
        InvalidFormat,
        /// CRC check failed
        CrcMismatch,
    }

    impl core::fmt::Display for RecordError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            let msg = match self {
                Self::Serialize => "calibration record serialization failed",
                Self::Deserialize => "calibration record deserialization failed",
                Self::InvalidFormat => "calibration record has wrong magic or version",
                Self::CrcMismatch => "calibration record CRC mismatch",
            };
            f.write_str(msg)
        }
    }

    impl core::error::Error for RecordError {}

    /// Stored calibration with header and checksum
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CalibrationRecord {
        /// Magic number for validation
        pub magic: u32,
        /// Data format version
        pub version: u8,
        /// Calibrated slots
        pub document: CalibrationDocument,
        /// CRC32 over the postcard encoding of `document`
        pub crc: u32,
    }

    impl CalibrationRecord {
        /// Wrap a document and compute its checksum
        pub fn new(document: CalibrationDocument) -> Result<Self, RecordError> {
            let crc = document_crc(&document)?;
            Ok(Self {
                magic: RECORD_MAGIC,
                version: RECORD_VERSION,
                document,
                crc,
            })
        }

        /// Check the header matches this build's format
        pub fn is_valid(&self) -> bool {
            self.magic == RECORD_MAGIC && self.version == RECORD_VERSION
        }

        /// Recompute the checksum and compare with the stored one
        pub fn verify_crc(&self) -> bool {
            document_crc(&self.document).is_ok_and(|crc| crc == self.crc)
        }

        /// Serialize into postcard bytes
        pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
            let bytes = postcard::to_allocvec(self).map_err(|_| RecordError::Serialize)?;
            debug!(
                "encoded calibration record: {} slot(s), {} bytes",
                self.document.len(),
                bytes.len()
            );
            Ok(bytes)
        }

        /// Deserialize and validate a stored record
        pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
            let record: Self = postcard::from_bytes(bytes).map_err(|_| RecordError::Deserialize)?;

            if !record.is_valid() {
                return Err(RecordError::InvalidFormat);
            }

            if !record.verify_crc() {
                warn!("calibration record CRC mismatch");
                return Err(RecordError::CrcMismatch);
            }

            Ok(record)
        }

        /// Unwrap the calibration document
        pub fn into_document(self) -> CalibrationDocument {
            self.document
        }
    }

    fn document_crc(document: &CalibrationDocument) -> Result<u32, RecordError> {
        let bytes = postcard::to_allocvec(document).map_err(|_| RecordError::Serialize)?;
        Ok(!crc32_update(0xFFFF_FFFF, &bytes))
    }

    /// CRC32 update (IEEE 802.3 polynomial, reflected)
    fn crc32_update(crc: u32, data: &[u8]) -> u32 {
        const POLY: u32 = 0xEDB8_8320;
        let mut crc = crc;

        for &byte in data {
            crc ^= byte as u32;
            for _ in 0..8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ POLY;
                } else {
                    crc >>= 1;
                }
            }
        }

        crc
    }

    #[cfg(test)]
    mod tests {
        use super::super::CalibrationParams;
        use super::*;

        fn sample() -> CalibrationDocument {
            let mut doc = CalibrationDocument::new();
            doc.insert("A1", CalibrationParams::new(10.0, 20.0, 5.0));
            doc.insert("B2", CalibrationParams::new(150.25, 12.5, -3.0));
            doc
        }

        #[test]
        fn test_crc32_check_value() {
            assert_eq!(!crc32_update(0xFFFF_FFFF, b"123456789"), 0xCBF4_3926);
        }

        #[test]
        fn test_record_survives_storage() {
            let record = CalibrationRecord::new(sample()).unwrap();
            let bytes = record.to_bytes().unwrap();

            let restored = CalibrationRecord::from_bytes(&bytes).unwrap();
            assert_eq!(restored.into_document(), sample());
        }

        #[test]
        fn test_record_detects_tampering() {
            let mut record = CalibrationRecord::new(sample()).unwrap();
            record
                .document
                .insert("A1", CalibrationParams::new(11.0, 20.0, 5.0));
            assert!(!record.verify_crc());

            let bytes = record.to_bytes().unwrap();
            assert_eq!(
                CalibrationRecord::from_bytes(&bytes),
                Err(RecordError::CrcMismatch)
            );
        }

        #[test]
        fn test_record_rejects_wrong_version() {
            let mut record = CalibrationRecord::new(sample()).unwrap();
            record.version = RECORD_VERSION + 1;
            let bytes = record.to_bytes().unwrap();
            assert_eq!(
                CalibrationRecord::from_bytes(&bytes),
                Err(RecordError::InvalidFormat)
            );
        }

        #[test]
        fn test_record_rejects_garbage() {
            assert_eq!(
                CalibrationRecord::from_bytes(&[0xFF, 0x01]),
                Err(RecordError::Deserialize)
            );
        }
    }
}
