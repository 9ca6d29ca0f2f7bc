//! Deck errors
//!
//! Every failure here is a setup or programming mistake surfaced
//! synchronously to the caller. Nothing is retried.

use core::fmt;

use alloc::string::String;

use crate::labware::{Capability, LabwareKind};
use crate::position::Position;

/// Errors raised by the deck, labware and coordinate engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeckError {
    /// Label is not one letter followed by a positive integer
    InvalidPosition(String),
    /// Slot already holds labware
    DuplicateSlot(Position),
    /// No labware occupies the slot
    UnknownSlot(Position),
    /// Labware variant does not offer the requested operation
    CapabilityNotSupported {
        kind: LabwareKind,
        capability: Capability,
    },
    /// Microplate coordinates requested before `calibrate`
    UninitializedCalibration,
    /// Well lies outside the plate's rows/columns
    WellOutOfRange {
        position: Position,
        rows: u16,
        cols: u16,
    },
    /// Volume outside the pipette's envelope
    VolumeOutOfRange { volume: f64, min_vol: f64, max_vol: f64 },
    /// Catalog has no entry for this tag
    UnknownLabware(String),
    /// Labware variant needs a catalog tag and none was given
    MissingModel(LabwareKind),
    /// Labware variant has no catalog entry but a tag was given
    UnexpectedModel(LabwareKind),
    /// Well handle outlived its microplate
    DetachedWell(Position),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition(label) => write!(f, "invalid position label {label:?}"),
            Self::DuplicateSlot(pos) => write!(f, "trying to overwrite existing slot {pos}"),
            Self::UnknownSlot(pos) => write!(f, "no deck module at slot {pos}"),
            Self::CapabilityNotSupported { kind, capability } => {
                write!(f, "{kind:?} does not support {capability:?}")
            }
            Self::UninitializedCalibration => write!(f, "microplate has not been calibrated"),
            Self::WellOutOfRange { position, rows, cols } => {
                write!(f, "well {position} outside {rows}x{cols} plate")
            }
            Self::VolumeOutOfRange {
                volume,
                min_vol,
                max_vol,
            } => write!(f, "volume {volume} outside {min_vol}..={max_vol}"),
            Self::UnknownLabware(tag) => write!(f, "no catalog entry for {tag:?}"),
            Self::MissingModel(kind) => write!(f, "{} needs a model", kind.name()),
            Self::UnexpectedModel(kind) => write!(f, "{} takes no model", kind.name()),
            Self::DetachedWell(pos) => write!(f, "well {pos} outlived its microplate"),
        }
    }
}

impl core::error::Error for DeckError {}
